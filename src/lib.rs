//! SQL playground - an educational REST API and SQL teaching console.
//!
//! This library exposes the core modules for use by the server binary and
//! integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod safety;
pub mod server;
pub mod store;
