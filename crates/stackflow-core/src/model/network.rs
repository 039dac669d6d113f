//! Network topology records

use serde::{Deserialize, Serialize};

/// An isolated virtual network that other resources attach to.
///
/// The network unit is a leaf: it takes nothing but a name and exposes a
/// single [`NetworkHandle`] for downstream stacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vpc {
    /// Construct name within the stack
    pub name: String,

    /// Address range; the provisioning engine picks a default when omitted
    #[serde(default)]
    pub cidr_block: Option<String>,
}

impl Vpc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cidr_block: None,
        }
    }
}

/// Opaque reference to a provisioned virtual network.
///
/// Produced once by the stack that declares the VPC and consumed by exactly
/// one downstream stack. When the handle crosses a stack boundary the
/// synthesizer resolves it to an export/import pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkHandle {
    /// Stack that owns the VPC resource
    pub stack: String,

    /// Logical id of the VPC resource within that stack
    pub logical_id: String,
}

impl NetworkHandle {
    pub fn new(stack: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            logical_id: logical_id.into(),
        }
    }

    /// Export name used when this handle is consumed from another stack
    pub fn export_name(&self) -> String {
        format!("{}:{}", self.stack, self.logical_id)
    }
}
