use std::fmt;

use super::run_id::RunId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn for_run(run_id: &RunId, filename: &str) -> Self {
        Self(format!("{}-{}", run_id.as_uuid(), filename))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
