//! One router per resource, assembled in [`crate::server`].

pub mod activities;
pub mod audit_logs;
pub mod auth;
pub mod contacts;
pub mod deals;
pub mod emails;
pub mod health;
pub mod roles;
pub mod support;
pub mod tasks;
pub mod teams;
pub mod users;
pub mod workflows;
