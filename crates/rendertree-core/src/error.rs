use std::fmt;

use crate::component::ComponentError;
use crate::NodeId;

/// Lifecycle step during which a component failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecyclePhase {
    Construct,
    Render,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::Construct => f.write_str("construction"),
            LifecyclePhase::Render => f.write_str("render"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// User component code failed; `source` is the component's own error.
    Component {
        component: &'static str,
        phase: LifecyclePhase,
        source: ComponentError,
    },
    /// The tree never rendered, was torn down, or its render failed.
    InvalidInstanceState { reason: &'static str },
    /// The instance graph holds a construct the normalizer cannot represent.
    UnsupportedConstructKind { kind: String },
    Missing { id: NodeId },
    DepthExceeded { limit: usize },
}

impl TreeError {
    /// The component's original error, when this failure came from user code.
    pub fn component_error(&self) -> Option<&ComponentError> {
        match self {
            TreeError::Component { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Component {
                component,
                phase,
                source,
            } => write!(f, "{component} failed during {phase}: {source}"),
            TreeError::InvalidInstanceState { reason } => {
                write!(f, "invalid instance state: {reason}")
            }
            TreeError::UnsupportedConstructKind { kind } => {
                write!(f, "unsupported construct kind `{kind}`")
            }
            TreeError::Missing { id } => write!(f, "node {id} missing"),
            TreeError::DepthExceeded { limit } => {
                write!(f, "render depth exceeded the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Component { source, .. } => Some(source),
            _ => None,
        }
    }
}
