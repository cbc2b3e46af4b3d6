//! Pipes REST API client
//!
//! `Client` owns the HTTP transport; entity endpoints are reached through
//! sub-APIs such as `client.workspace(&scope, "dev").datatanks()`.

pub mod actor;
pub mod aggregator;
pub mod client;
pub mod collection;
pub mod common;
pub mod connection;
pub mod datatank;
pub mod error;
pub mod integration;
pub mod member;
pub mod mods;
pub mod notifier;
pub mod org;
pub mod pipeline;
pub mod scope;
pub mod tenant;
pub mod workspace;

pub use client::{api_base_url, Client, ClientConfig, DEFAULT_HOST};
pub use collection::Collection;
pub use error::{ApiError, ErrorKind};
pub use scope::Scope;
