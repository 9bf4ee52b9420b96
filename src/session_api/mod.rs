//! Client for the external session generator service.

mod client;
mod endpoints;

pub use client::{FETCH_TIMEOUT, SessionApiClient, SessionFetcher};
