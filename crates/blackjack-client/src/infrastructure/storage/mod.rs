//! Persistent storage for the client: configuration file loading.

pub mod config;
