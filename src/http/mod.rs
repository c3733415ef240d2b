//! HTTP server module.
//!
//! The frontend serves plain HTTP; TLS is terminated by whatever sits in front
//! of it. The server includes:
//! - Static asset serving
//! - Graceful shutdown on SIGTERM/SIGINT

mod server;
mod shutdown;
pub mod static_files;

pub use server::{start_server, ServerError};
