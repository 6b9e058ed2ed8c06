//! HTTP service wrapping the listing pipeline.
//!
//! Stores watched companies in SQLite, exposes CRUD plus a `/run/:id`
//! trigger, and mails the resulting digest over SMTP.
//!
//! # Modules
//!
//! - [`app`] - router and shared state
//! - [`config`] - environment configuration
//! - [`email`] - digest rendering and SMTP delivery
//! - [`routes`] - request handlers
//! - [`store`] - company persistence

pub mod app;
pub mod config;
pub mod email;
pub mod routes;
pub mod store;

pub use app::{build_app, AppState};
pub use config::Config;
