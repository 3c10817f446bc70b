//! Driftscope - live and declared cloud inventories, ready for drift comparison.
//!
//! Enumerates resources from provider APIs, resolves and reads Terraform state from
//! local or remote backends, and reconciles both sides through a middleware pipeline.

pub mod alerter;
pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod enumeration;
pub mod middleware;
pub mod output;
pub mod remote;
pub mod resource;
pub mod state;
pub mod terraform;

mod error;

pub use alerter::{Alert, Alerter};
pub use error::ScanError;
pub use middleware::{Middleware, MiddlewareError, Pipeline};
pub use remote::{ProviderClients, RemoteRegistry};
pub use resource::{DriftscopeResourceFactory, Resource, ResourceFactory, SchemaRepository};
pub use state::StateSupplier;
