//! # Taskdeck API Server Library
//!
//! HTTP layer for Taskdeck: configuration, error mapping, the router, and
//! the route handlers.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: The `Identity` extractor (per-handler authentication)
//! - `middleware`: Security response headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
