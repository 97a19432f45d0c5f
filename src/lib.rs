//! Shop Admin - coupon, discount offer and settings administration
//!
//! Architecture:
//! - SeaORM for database access (SQLite), schema in the `migration` crate
//! - Axum for the HTTP API with rate limiting
//! - Plugins supervised on the Tokio runtime (HTTP server, session cron)
//! - A client state layer (actions, reducers, thunks) over a reqwest client

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod plugins;
pub mod prelude;
pub mod state;
pub mod sv;
pub mod utils;
