//! Build project records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named phase of a build recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildPhase {
    pub commands: Vec<String>,
}

/// Declarative build recipe executed against a source artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSpec {
    pub version: String,
    /// Phases keyed by name (`install`, `build`, ...), sorted for
    /// deterministic output
    pub phases: BTreeMap<String, BuildPhase>,
}

impl BuildSpec {
    /// Buildspec with a single `build` phase running the given commands
    pub fn with_build_commands(commands: Vec<String>) -> Self {
        let mut phases = BTreeMap::new();
        phases.insert("build".to_string(), BuildPhase { commands });
        Self {
            version: "0.2".to_string(),
            phases,
        }
    }
}

/// A build project: runs its buildspec against the source artifact and
/// produces the build artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildProject {
    pub project_name: String,
    pub build_spec: BuildSpec,
}

impl BuildProject {
    pub fn new(project_name: impl Into<String>, build_spec: BuildSpec) -> Self {
        Self {
            project_name: project_name.into(),
            build_spec,
        }
    }
}
