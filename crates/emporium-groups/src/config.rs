//! Group management configuration.

/// Configuration for [`GroupService`](crate::service::GroupService).
#[derive(Debug, Clone)]
pub struct GroupServiceConfig {
    /// How many times a read-modify-write is attempted when the
    /// document changed underneath it (default: 5).
    pub max_write_attempts: u32,
}

impl Default for GroupServiceConfig {
    fn default() -> Self {
        Self {
            max_write_attempts: 5,
        }
    }
}

/// Configuration for [`AccountRoleGate`](crate::gate::AccountRoleGate).
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Holding any of these in a shop allows managing its groups
    /// (default: `owner`, `admin`).
    pub admin_permissions: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            admin_permissions: vec!["owner".into(), "admin".into()],
        }
    }
}
