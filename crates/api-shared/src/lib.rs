//! # API Shared
//!
//! Shared definitions for the MediChain triage APIs.
//!
//! Contains:
//! - JSON wire types (`wire` module) with OpenAPI schemas
//! - Translation from core diagnosis results into wire responses
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the CLI for common functionality.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
