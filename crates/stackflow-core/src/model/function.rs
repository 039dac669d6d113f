//! Compute function records

use super::network::NetworkHandle;
use serde::{Deserialize, Serialize};

/// Runtime identifier for a compute function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runtime {
    NodeJs16,
    NodeJs18,
    NodeJs20,
}

impl Runtime {
    /// Identifier understood by the provisioning engine
    pub fn identifier(&self) -> &'static str {
        match self {
            Runtime::NodeJs16 => "nodejs16.x",
            Runtime::NodeJs18 => "nodejs18.x",
            Runtime::NodeJs20 => "nodejs20.x",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Source payload of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCode {
    /// Source shipped inline with the template
    Inline(String),
}

impl FunctionCode {
    pub fn inline(source: impl Into<String>) -> Self {
        FunctionCode::Inline(source.into())
    }
}

/// A declared compute function
///
/// Created once at topology-definition time and never mutated; teardown is
/// owned by the provisioning engine together with the rest of the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub function_name: String,
    pub code: FunctionCode,
    pub runtime: Runtime,
    /// Entry-point symbol, e.g. `index.handler`
    pub handler: String,
    /// Network the function is attached to, if any
    #[serde(default)]
    pub network: Option<NetworkHandle>,
}

/// Which published version an alias resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionVersion {
    /// The version published from the function's current definition
    Current,
    /// A specific published version
    Pinned(String),
}

/// Named pointer to exactly one published version of a function.
///
/// The version an alias resolves to is swapped only by a deploy action,
/// never by re-declaring the topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionAlias {
    pub alias_name: String,
    pub function_name: String,
    pub version: FunctionVersion,
}

impl FunctionAlias {
    /// Alias pointing at the function's current published version
    pub fn new(alias_name: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            alias_name: alias_name.into(),
            function_name: function_name.into(),
            version: FunctionVersion::Current,
        }
    }
}
