//! # Taskhub Notification Worker Library
//!
//! Consumes task-created events from the notification stream, independently
//! of the API server. The current consumer only logs receipt; it is the
//! extension point for real downstream delivery (push, email).

pub mod consumer;
