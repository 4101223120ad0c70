//! Filament - a small HTTP/1.x file server
//!
//! Reassembles requests from fragmented reads, routes them onto a flat
//! content store (list, fetch, store, delete) and writes framed responses.

pub mod config;
pub mod http;
pub mod router;
pub mod server;
pub mod store;
