//! # threadpull core
//!
//! Shared, I/O-free logic for threadpull: the comment and job data model,
//! the reply-tree flattener, the decoder for Reddit's comment listing
//! payload, the plain-text exporter, and the job store abstraction.
//!
//! This crate contains no tokio, reqwest, or filesystem code. Everything
//! here is driven by the `threadpull` crate, which supplies the network
//! collaborators and the HTTP surface.

pub mod flatten;
pub mod format;
pub mod models;
pub mod store;
pub mod thread;
