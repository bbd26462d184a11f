//! Workout set logging: a typed client for the sets/exercises REST API,
//! the bundled backend that serves it, and the small helpers the front end
//! shares (date keys and the page route table).

pub mod client;
pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod handlers;
pub mod migrations;
pub mod models;
pub mod pages;
pub mod repositories;
pub mod routes;

pub use client::{ApiClient, ClientError, ErrorKind};
pub use config::{ClientConfig, ServerConfig};
pub use models::{Exercise, NewSet, Set};
