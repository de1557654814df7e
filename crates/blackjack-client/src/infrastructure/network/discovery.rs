//! Listens on the UDP discovery port for server OFFERs.
//!
//! Anything that fails to decode as an OFFER (wrong size, foreign cookie,
//! other message type, bad name) is logged at debug level and skipped.  The
//! connect address is the datagram's source IP plus the advertised TCP port.
//!
//! The socket is bound with address (and, on Unix, port) reuse so several
//! clients on one host can all listen on the discovery port.

use std::io;
use std::net::SocketAddr;

use blackjack_core::decode_offer;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, info};

use super::ClientNetworkError;

/// Larger than any OFFER so oversized datagrams are seen whole and rejected.
const RECV_BUF_LEN: usize = 1024;

/// A server that has offered a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredServer {
    /// Where to open the TCP connection.
    pub addr: SocketAddr,
    pub server_name: String,
}

/// A bound discovery socket.
pub struct DiscoveryListener {
    socket: UdpSocket,
}

impl DiscoveryListener {
    /// Binds the discovery socket, typically on `0.0.0.0:<discovery_port>`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientNetworkError::BindFailed`] if the socket cannot be
    /// created or bound, for example when the port is held without reuse.
    pub async fn bind(addr: SocketAddr) -> Result<Self, ClientNetworkError> {
        let socket = shared_udp_socket(addr)
            .and_then(UdpSocket::from_std)
            .map_err(|source| ClientNetworkError::BindFailed { addr, source })?;
        info!("listening for offers on UDP {addr}");
        Ok(Self { socket })
    }

    /// The bound address; useful when binding port 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClientNetworkError::Recv`] if the OS cannot report it.
    pub fn local_addr(&self) -> Result<SocketAddr, ClientNetworkError> {
        self.socket.local_addr().map_err(ClientNetworkError::Recv)
    }

    /// Waits for the next valid OFFER.
    ///
    /// # Errors
    ///
    /// Returns [`ClientNetworkError::Recv`] if the socket itself fails.
    pub async fn next_offer(&self) -> Result<DiscoveredServer, ClientNetworkError> {
        let mut buf = [0u8; RECV_BUF_LEN];
        loop {
            let (len, src) = self
                .socket
                .recv_from(&mut buf)
                .await
                .map_err(ClientNetworkError::Recv)?;

            match decode_offer(&buf[..len]) {
                Ok(offer) => {
                    info!("received offer from {} ({:?})", src.ip(), offer.server_name);
                    return Ok(DiscoveredServer {
                        addr: SocketAddr::new(src.ip(), offer.tcp_port),
                        server_name: offer.server_name,
                    });
                }
                Err(e) => debug!("ignoring datagram from {src}: {e}"),
            }
        }
    }
}

/// A non-blocking UDP socket on `addr` that other processes may bind too.
fn shared_udp_socket(addr: SocketAddr) -> io::Result<std::net::UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;
    Ok(socket.into())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack_core::{encode_offer, encode_request, OfferMessage, RequestMessage};
    use std::time::Duration;
    use tokio::time;

    async fn listener() -> (DiscoveryListener, SocketAddr) {
        let listener = DiscoveryListener::bind("127.0.0.1:0".parse().unwrap())
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        (listener, addr)
    }

    fn offer_bytes(port: u16, name: &str) -> [u8; 39] {
        encode_offer(&OfferMessage {
            tcp_port: port,
            server_name: name.to_string(),
        })
    }

    #[tokio::test]
    async fn test_valid_offer_yields_sender_ip_and_advertised_port() {
        // Arrange
        let (listener, addr) = listener().await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        // Act
        sender.send_to(&offer_bytes(5123, "Table One"), addr).await.unwrap();
        let found = time::timeout(Duration::from_secs(2), listener.next_offer())
            .await
            .expect("offer not seen")
            .unwrap();

        // Assert
        assert_eq!(found.addr, "127.0.0.1:5123".parse().unwrap());
        assert_eq!(found.server_name, "Table One");
    }

    #[tokio::test]
    async fn test_junk_datagrams_are_skipped() {
        let (listener, addr) = listener().await;
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        // Wrong size, wrong cookie, wrong type, then a real offer.
        sender.send_to(b"hello", addr).await.unwrap();
        let mut bad_cookie = offer_bytes(7000, "fake");
        bad_cookie[0] ^= 0xFF;
        sender.send_to(&bad_cookie, addr).await.unwrap();
        let request = encode_request(&RequestMessage {
            rounds: 1,
            client_name: "x".to_string(),
        })
        .unwrap();
        sender.send_to(&request, addr).await.unwrap();
        sender.send_to(&offer_bytes(6000, "real"), addr).await.unwrap();

        let found = time::timeout(Duration::from_secs(2), listener.next_offer())
            .await
            .expect("offer not seen")
            .unwrap();

        assert_eq!(found.addr.port(), 6000);
        assert_eq!(found.server_name, "real");
    }

    #[tokio::test]
    async fn test_two_listeners_share_the_port_and_both_hear_offers() {
        // Arrange
        let (first, addr) = listener().await;
        let second = DiscoveryListener::bind(addr)
            .await
            .expect("a second client must be able to bind the same port");

        // Fresh source ports spread unicast datagrams across the sharing sockets.
        let sender = tokio::spawn(async move {
            loop {
                let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
                socket.send_to(&offer_bytes(5555, "Shared"), addr).await.unwrap();
                time::sleep(Duration::from_millis(5)).await;
            }
        });

        // Act
        let (a, b) = time::timeout(Duration::from_secs(5), async {
            tokio::join!(first.next_offer(), second.next_offer())
        })
        .await
        .expect("both listeners must receive an offer");
        sender.abort();

        // Assert
        assert_eq!(a.unwrap().server_name, "Shared");
        assert_eq!(b.unwrap().addr, "127.0.0.1:5555".parse().unwrap());
    }

    #[tokio::test]
    async fn test_unbindable_address_is_bind_failed() {
        // TEST-NET-1 is never assigned to a local interface.
        let result = DiscoveryListener::bind("192.0.2.1:0".parse().unwrap()).await;

        assert!(matches!(result, Err(ClientNetworkError::BindFailed { .. })));
    }
}
