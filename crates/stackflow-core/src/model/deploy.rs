//! Deployment application and group records

use serde::{Deserialize, Serialize};

/// A deployment application grouping deployment groups for one function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentApplication {
    pub application_name: String,
}

impl DeploymentApplication {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }
}

/// Binds exactly one function alias to deploy actions.
///
/// A deploy action targets a deployment group; the group swaps the alias to
/// the newly published version when a deployment succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentGroup {
    pub group_name: String,
    /// Owning deployment application
    pub application: String,
    /// The single alias this group deploys to
    pub alias: String,
}
