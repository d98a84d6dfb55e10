//! Emporium Groups — shop permission group management.
//!
//! [`GroupService`] creates groups and moves accounts in and out of
//! them behind an [`AuthorizationGate`](emporium_core::authz::AuthorizationGate);
//! [`MethodRegistry`] exposes the same operations under their remote
//! method names.

pub mod config;
pub mod gate;
pub mod methods;
pub mod service;

pub use config::{GateConfig, GroupServiceConfig};
pub use gate::{AccountRoleGate, StaticGate};
pub use methods::MethodRegistry;
pub use service::GroupService;
