use serde::{Deserialize, Serialize};

use super::message::RoleKind;
use crate::domain::errors::{DomainError, DomainResult};

/// Global bounds of a mesh walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub strategy: String,
    /// Maximum number of role-produced messages.
    pub max_hops: u32,
    /// Wall-clock budget, checked before each hop.
    pub timeout_ms: u64,
}

/// The starting edge of a walk plus its policy. Constant for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshRoute {
    pub from: RoleKind,
    pub to: Vec<RoleKind>,
    pub policy: RoutePolicy,
}

impl MeshRoute {
    /// Create a route, rejecting a zero hop budget.
    pub fn new(from: RoleKind, to: Vec<RoleKind>, policy: RoutePolicy) -> DomainResult<Self> {
        if policy.max_hops == 0 {
            return Err(DomainError::InvalidRoute(
                "max_hops must be at least 1".to_string(),
            ));
        }
        Ok(Self { from, to, policy })
    }

    /// The default planner-first route.
    pub fn standard(strategy: impl Into<String>, max_hops: u32, timeout_ms: u64) -> DomainResult<Self> {
        Self::new(
            RoleKind::Planner,
            vec![RoleKind::Researcher],
            RoutePolicy {
                strategy: strategy.into(),
                max_hops,
                timeout_ms,
            },
        )
    }
}
