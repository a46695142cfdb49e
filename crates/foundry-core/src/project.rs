//! Project identifiers and the files that make a directory a project.
//!
//! A project has no record of its own: the directory `workspace_root/<id>`
//! existing is the whole of its state.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Marker file whose presence makes a directory a valid engine project.
pub const PROJECT_MARKER: &str = "project.godot";

/// Export configuration required before a build is attempted.
pub const EXPORT_PRESETS: &str = "export_presets.cfg";

/// Build output directory used when the caller does not name one.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Whether `raw` is one file or directory name with no separators, `.` or `..`.
pub fn is_plain_name(raw: &str) -> bool {
    let mut components = Path::new(raw).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    single_normal && !raw.contains(['/', '\\'])
}

/// Caller-supplied project name, one directory under the workspace root.
///
/// Only a single normal path component is accepted, so an identifier can
/// never address anything outside its own directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::InvalidInput("projectId must not be empty".to_string()));
        }

        if !is_plain_name(raw) {
            return Err(Error::InvalidInput(format!(
                "Invalid projectId '{}': must be a single directory name",
                raw
            )));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory this project occupies under `root`.
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

/// Relative build output directory inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir(PathBuf);

impl BuildDir {
    /// Parse an optional caller value, falling back to [`DEFAULT_BUILD_DIR`].
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let raw = match raw {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(Self(PathBuf::from(DEFAULT_BUILD_DIR))),
        };

        let path = Path::new(raw);
        let relative = path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));

        if !relative {
            return Err(Error::InvalidInput(format!(
                "Invalid buildDir '{}': must be a relative path inside the project",
                raw
            )));
        }

        Ok(Self(path.to_path_buf()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl Default for BuildDir {
    fn default() -> Self {
        Self(PathBuf::from(DEFAULT_BUILD_DIR))
    }
}
