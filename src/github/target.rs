use std::fmt;

use serde::{Deserialize, Serialize};

/// Default directory that holds documents
pub const DEFAULT_BASE_PATH: &str = "docs/";
/// Default branch commits are made to
pub const DEFAULT_BRANCH: &str = "main";

/// Where documents live: `owner/name` at `branch`, under `path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoTarget {
    pub owner: String,
    pub name: String,
    pub path: String,
    pub branch: String,
}

impl Default for RepoTarget {
    fn default() -> Self {
        Self {
            owner: String::new(),
            name: String::new(),
            path: DEFAULT_BASE_PATH.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }
}

impl RepoTarget {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into().trim().to_string(),
            name: name.into().trim().to_string(),
            path: path.into().trim().to_string(),
            branch: branch.into().trim().to_string(),
        }
    }

    /// Owner and name are both set.
    pub fn is_configured(&self) -> bool {
        !self.owner.is_empty() && !self.name.is_empty()
    }

    /// Base path without leading or trailing slashes (`""` for the repo root).
    pub fn directory(&self) -> &str {
        self.path.trim_matches('/')
    }

    /// Repository path of `file_name` inside the base path.
    pub fn file_path(&self, file_name: &str) -> String {
        let dir = self.directory();
        let file_name = file_name.trim_start_matches('/');
        if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{dir}/{file_name}")
        }
    }
}

impl fmt::Display for RepoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.name, self.branch)?;
        let dir = self.directory();
        if !dir.is_empty() {
            write!(f, ":{dir}")?;
        }
        Ok(())
    }
}
