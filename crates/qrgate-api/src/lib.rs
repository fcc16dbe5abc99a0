// qrgate-api: Async Rust client for the QR-assignment GraphQL backend

pub mod admin;
pub mod auth;
pub mod business;
pub mod client;
pub mod error;
pub mod qr;
pub mod transport;
pub mod types;

mod queries;

pub use client::GraphqlClient;
pub use error::Error;
pub use transport::TransportConfig;
