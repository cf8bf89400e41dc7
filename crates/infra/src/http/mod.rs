//! Retry-capable HTTP transport shared by the provider clients.

mod client;

pub use client::{build_url, decode_body, HttpClient, HttpClientBuilder, RequestBody, RequestOptions};
