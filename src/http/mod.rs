//! HTTP/1.x protocol engine.
//!
//! - **`parser`**: turns a header block into a [`request::RequestHead`]
//! - **`headers`**: ordered, case-insensitive header map
//! - **`framer`**: finds request boundaries in a fragmented byte stream
//! - **`connection`**: drives one transport through the request/response cycle
//! - **`request`** / **`response`**: message descriptors
//! - **`writer`**: serializes and writes responses
//! - **`mime`**: content types from target extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← AwaitingHeader → AwaitingBody (framer)
//!        └──────┬──────┘
//!               │ Request complete
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Route, in its own task
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ keep-alive → Reading (idle deadline re-armed)
//!               └─ close      → Closed
//! ```
//!
//! Framing errors answer 400/413 and close; a failed handler answers 500 and
//! closes; the idle deadline or a peer close ends the connection silently.

pub mod connection;
pub mod framer;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
