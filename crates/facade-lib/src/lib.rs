//! Core library for the scheduling-state facade
//!
//! This crate provides:
//! - Canonical, UI-facing models for nodes, pods, local queues,
//!   resource flavors and hierarchical scheduler queues
//! - Source adapters for a live cluster and for static fixtures
//! - Normalization mappers from native objects to canonical models
//! - Write-body validation, health tracking and observability

pub mod crd;
pub mod error;
pub mod health;
pub mod models;
pub mod normalize;
pub mod observability;
pub mod source;
pub mod validation;
pub mod view;

pub use error::{ResourceKind, SourceError};
pub use health::{ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse};
pub use observability::{FacadeMetrics, StructuredLogger};
pub use source::{select, SourceKind, Sources};
pub use validation::ValidationError;
pub use view::ClusterView;
