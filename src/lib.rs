//! Zinad Status - status frontend for the Zinad backend
//!
//! Serves a single status page. Each visit mounts a page that calls the
//! backend `GET /api/hello` once and shows either the greeting or the failure.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod state;
pub mod templates;

pub use error::*;
