//! # Taskhub Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the taskhub API server and notification worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects, tasks) and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and the authentication middleware
//! - `redis`: Redis client wrapper shared by the cache and the event stream
//! - `cache`: Per-user task listing cache
//! - `events`: Task-created notification events and their publisher
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod cache;
pub mod db;
pub mod events;
pub mod models;
pub mod redis;

/// Current version of the taskhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
