//! Source repository records

use serde::{Deserialize, Serialize};

/// A versioned source repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRepository {
    pub repository_name: String,
}

impl SourceRepository {
    pub fn new(repository_name: impl Into<String>) -> Self {
        Self {
            repository_name: repository_name.into(),
        }
    }
}

/// Commit trigger: a push to any branch of the repository starts the
/// target pipeline. This is the sole way a pipeline run begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitTrigger {
    /// Rule name, e.g. `trigger-build`
    pub rule_name: String,
    /// Repository watched for commits
    pub repository: String,
    /// Pipeline started on commit
    pub pipeline: String,
}
