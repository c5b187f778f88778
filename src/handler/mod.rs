//! Request handler module
//!
//! Routing dispatch and the two kinds of content the server knows how to
//! produce: named pages served verbatim and static assets served from a
//! mounted directory.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
