#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # rapport-store
//!
//! # Modules
//!
//! - [`store`]: The in-memory record store and its directory/actor seams
//! - [`query`]: Pagination, owner scoping, and list filters
//! - [`seed`]: Permission catalog, system roles, default admin

pub mod query;
mod records;
pub mod seed;
pub mod store;

pub use query::{OwnerScope, Page, Paged};
pub use store::Store;
