//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! `PreviewSession` drives the entitlement gate at runtime.

pub mod handlers;
mod preview_session;

pub use preview_session::{
    PreviewError, PreviewSession, PreviewSessionConfig, UnlockCallback,
};
