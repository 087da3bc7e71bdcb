//! HTTP module for host comparison
//!
//! Provides the fetcher used to query every configured host.

mod client;

pub use client::{FetchError, Fetcher, HostResponse, HttpFetcher};

#[cfg(test)]
pub use client::request_url;
