#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]

//! # rapport-api
//!
//! # Modules
//!
//! - [`error`]: `ApiError` and the status/envelope mapping
//! - [`response`]: The success envelope and pagination metadata
//! - [`extract`]: The `CurrentActor` extractor
//! - [`audit`]: Audit trail middleware
//! - [`routes`]: One router per resource
//! - [`server`]: Router assembly and the HTTP entry point

pub mod audit;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod server;
mod state;

pub use error::ApiError;
pub use server::{build_router, serve};
pub use state::AppState;
