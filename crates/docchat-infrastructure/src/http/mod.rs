//! HTTP transport for the docchat backend.

mod client;

pub use client::HttpBackend;
