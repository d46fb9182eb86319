//! Hierarchical resource names: project -> bucket -> object.
//!
//! Names are plain values. `key()` is the innermost identifier and `parent()`
//! rebuilds the name one level up from the child's own fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    #[error("Invalid {kind} name: {name:?}")]
    InvalidFormat { kind: &'static str, name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName {
    pub project_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketName {
    pub project_id: String,
    pub bucket_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectName {
    pub project_id: String,
    pub bucket_id: String,
    pub object_id: String,
}

impl ProjectName {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.project_id
    }
}

impl BucketName {
    pub fn new(project_id: impl Into<String>, bucket_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            bucket_id: bucket_id.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.bucket_id
    }

    pub fn parent(&self) -> ProjectName {
        ProjectName {
            project_id: self.project_id.clone(),
        }
    }

    /// Resource-name prefix shared by every object in this bucket.
    pub fn objects_prefix(&self) -> String {
        format!("{self}/objects/")
    }
}

impl ObjectName {
    pub fn new(
        project_id: impl Into<String>,
        bucket_id: impl Into<String>,
        object_id: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            bucket_id: bucket_id.into(),
            object_id: object_id.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.object_id
    }

    pub fn parent(&self) -> BucketName {
        BucketName {
            project_id: self.project_id.clone(),
            bucket_id: self.bucket_id.clone(),
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}", self.project_id)
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/buckets/{}", self.parent(), self.bucket_id)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/objects/{}", self.parent(), self.object_id)
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Split `projects/{project}/...` into the project id and the remainder after it.
fn split_project<'a>(
    s: &'a str,
    kind: &'static str,
) -> Result<(&'a str, Option<&'a str>), ResourceNameError> {
    let rest = s.strip_prefix("projects/").ok_or_else(|| invalid(kind, s))?;
    match rest.split_once('/') {
        Some((project, tail)) => Ok((project, Some(tail))),
        None => Ok((rest, None)),
    }
}

fn invalid(kind: &'static str, name: &str) -> ResourceNameError {
    ResourceNameError::InvalidFormat {
        kind,
        name: name.to_string(),
    }
}

impl FromStr for ProjectName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_project(s, "project")? {
            (project, None) => Ok(ProjectName::new(project)),
            _ => Err(invalid("project", s)),
        }
    }
}

impl FromStr for BucketName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (project, tail) = split_project(s, "bucket")?;
        let bucket = tail
            .and_then(|t| t.strip_prefix("buckets/"))
            .filter(|b| !b.contains('/'))
            .ok_or_else(|| invalid("bucket", s))?;
        Ok(BucketName::new(project, bucket))
    }
}

impl FromStr for ObjectName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (project, tail) = split_project(s, "object")?;
        let (bucket, object) = tail
            .and_then(|t| t.strip_prefix("buckets/"))
            .and_then(|t| t.split_once("/objects/"))
            .filter(|(bucket, _)| !bucket.contains('/'))
            .ok_or_else(|| invalid("object", s))?;
        Ok(ObjectName::new(project, bucket, object))
    }
}

// Names travel as their resource-name string.
macro_rules! string_serde {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(serde::de::Error::custom)
                }
            }
        )*
    };
}

string_serde!(ProjectName, BucketName, ObjectName);
