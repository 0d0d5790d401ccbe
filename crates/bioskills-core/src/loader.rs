//! Question-set loading.
//!
//! A set is named by a resource string. Absolute `http(s)://` and `file://`
//! names are used as-is; anything else is resolved against the configured
//! source, which is either a local directory or a base URL.

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;

use url::Url;

use crate::error::LoadError;
use crate::question::Question;

/// Anything that can produce the records of a named question set.
pub trait QuestionSource {
    fn fetch_set(
        &self,
        resource: &str,
    ) -> impl Future<Output = Result<Vec<Question>, LoadError>>;
}

/// Where unqualified resource names are looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceBase {
    Dir(PathBuf),
    Url(Url),
}

/// A fully resolved resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    File(PathBuf),
    Remote(Url),
}

#[derive(Debug, Clone)]
pub struct SetLoader {
    base: SourceBase,
    client: reqwest::Client,
}

impl SetLoader {
    /// Build a loader from a config-style source string: an `http(s)://`
    /// URL becomes a base URL, anything else a directory.
    pub fn new(source: &str) -> Self {
        let base = match Url::parse(source) {
            Ok(url) if is_remote(&url) => SourceBase::Url(with_trailing_slash(url)),
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map(SourceBase::Dir)
                .unwrap_or_else(|_| SourceBase::Dir(PathBuf::from(source))),
            _ => SourceBase::Dir(PathBuf::from(source)),
        };
        Self::with_base(base)
    }

    pub fn with_base(base: SourceBase) -> Self {
        Self {
            base,
            client: reqwest::Client::new(),
        }
    }

    pub fn base(&self) -> &SourceBase {
        &self.base
    }

    pub fn resolve(&self, resource: &str) -> Result<Location, LoadError> {
        let resource = resource.trim();
        if resource.is_empty() {
            return Err(LoadError::EmptyResourceName);
        }

        if let Ok(url) = Url::parse(resource) {
            if is_remote(&url) {
                return Ok(Location::Remote(url));
            }
            if url.scheme() == "file" {
                return url
                    .to_file_path()
                    .map(Location::File)
                    .map_err(|_| LoadError::UnsupportedLocation {
                        resource: resource.to_string(),
                    });
            }
        }

        match &self.base {
            SourceBase::Dir(dir) => Ok(Location::File(dir.join(resource))),
            SourceBase::Url(base) => base
                .join(resource)
                .map(Location::Remote)
                .map_err(|source| LoadError::InvalidLocation {
                    resource: resource.to_string(),
                    source,
                }),
        }
    }

    async fn fetch_bytes(&self, location: Location) -> Result<Vec<u8>, LoadError> {
        match location {
            Location::File(path) => tokio::fs::read(&path)
                .await
                .map_err(|source| LoadError::Io { path, source }),
            Location::Remote(url) => {
                let resp = self.client.get(url.clone()).send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(resp.bytes().await?.to_vec())
            }
        }
    }
}

impl QuestionSource for SetLoader {
    async fn fetch_set(&self, resource: &str) -> Result<Vec<Question>, LoadError> {
        let location = self.resolve(resource)?;
        tracing::debug!(?location, "fetching question set");
        let bytes = self.fetch_bytes(location).await?;
        parse_set(&bytes)
    }
}

/// In-memory source keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sets: HashMap<String, Vec<Question>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_set(mut self, resource: impl Into<String>, records: Vec<Question>) -> Self {
        self.sets.insert(resource.into(), records);
        self
    }
}

impl QuestionSource for MemorySource {
    async fn fetch_set(&self, resource: &str) -> Result<Vec<Question>, LoadError> {
        if resource.trim().is_empty() {
            return Err(LoadError::EmptyResourceName);
        }
        self.sets.get(resource).cloned().ok_or_else(|| LoadError::Io {
            path: PathBuf::from(resource),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such question set"),
        })
    }
}

/// Parse a question-set document. The payload must be a JSON array of
/// question records; shape checks beyond that belong to the store.
pub fn parse_set(bytes: &[u8]) -> Result<Vec<Question>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(LoadError::InvalidJson)?;
    let found = match &value {
        serde_json::Value::Array(_) => {
            return serde_json::from_value(value).map_err(LoadError::Malformed);
        }
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Object(_) => "object",
    };
    Err(LoadError::NotAnArray { found })
}

fn is_remote(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
