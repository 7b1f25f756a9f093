//! Instance lifecycle model.
//!
//! The compute control plane reports instances in the usual cloud
//! lifecycle states. Anything outside the names we branch on is kept
//! verbatim in `Other` so it can be surfaced to users unchanged.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceState {
    Pending,
    Running,
    Stopped,
    ShuttingDown,
    Other(String),
}

impl InstanceState {
    /// Parse a state name as reported by the control plane.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "running" => Self::Running,
            "stopped" => Self::Stopped,
            "shutting-down" => Self::ShuttingDown,
            _ => Self::Other(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::ShuttingDown => "shutting-down",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One describe-call snapshot. Never cached: every decision point in
/// the orchestrator re-queries the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceObservation {
    pub state: InstanceState,
    pub address: Option<String>,
}

impl InstanceObservation {
    pub fn new(state: InstanceState, address: Option<String>) -> Self {
        Self { state, address }
    }
}
