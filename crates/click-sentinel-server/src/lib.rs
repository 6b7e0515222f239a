// click-sentinel-server/src/lib.rs
// ============================================================================
// Module: Click Sentinel Server Library
// Description: HTTP API surface for Click Sentinel.
// Purpose: Expose ingestion, retrieval, whitelist, and statistics endpoints.
// Dependencies: crate::{audit, error, hostname, payload, server, service}
// ============================================================================

//! ## Overview
//! The server crate wires the core runtime to an axum HTTP surface. Handlers
//! stay thin: every operation funnels through the service layer so the same
//! logic is reachable from tests without a socket.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod error;
pub mod hostname;
pub mod payload;
pub mod server;
pub mod service;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use error::ApiError;
pub use hostname::derive_hostname;
pub use server::AppState;
pub use server::ServerError;
pub use server::build_router;
pub use server::serve;
