use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::decisions::codec;
use crate::decisions::{Command, RuleState};
use crate::error::{DecisionsError, Result};

pub mod reader;

pub use reader::{DefaultReader, SourceReader, LIBRARY_PATH_ENV};

/// Structured form of an inherited source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, alias = "library", skip_serializing_if = "Option::is_none")]
    pub gem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
}

/// A reference to another decisions file, exactly as the user wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InheritanceSpec {
    /// A local path, or a URL when it starts with `http://` or `https://`.
    Location(String),
    Table(SourceTable),
}

impl From<&str> for InheritanceSpec {
    fn from(location: &str) -> Self {
        InheritanceSpec::Location(location.to_string())
    }
}

impl From<String> for InheritanceSpec {
    fn from(location: String) -> Self {
        InheritanceSpec::Location(location)
    }
}

impl From<SourceTable> for InheritanceSpec {
    fn from(table: SourceTable) -> Self {
        InheritanceSpec::Table(table)
    }
}

impl fmt::Display for InheritanceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InheritanceSpec::Location(location) => f.write_str(location),
            InheritanceSpec::Table(table) => match (&table.url, &table.gem, &table.path) {
                (Some(url), _, _) => f.write_str(url),
                (None, Some(gem), Some(path)) => write!(f, "{}:{}", gem, path),
                (None, Some(gem), None) => f.write_str(gem),
                (None, None, Some(path)) => f.write_str(path),
                (None, None, None) => f.write_str("<empty source>"),
            },
        }
    }
}

/// A normalized, loadable inheritance source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InheritanceSource {
    Local(PathBuf),
    Remote {
        url: String,
        authorization: Option<String>,
    },
    Library {
        name: String,
        path: PathBuf,
    },
}

fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl InheritanceSource {
    pub fn from_spec(spec: &InheritanceSpec) -> Result<Self> {
        match spec {
            InheritanceSpec::Location(location) if is_url(location) => Ok(InheritanceSource::Remote {
                url: location.clone(),
                authorization: None,
            }),
            InheritanceSpec::Location(location) => Ok(InheritanceSource::Local(PathBuf::from(location))),
            InheritanceSpec::Table(table) => {
                if table.url.is_none() && table.authorization.is_some() {
                    warn!("ignoring authorization for non-remote source {}", spec);
                }
                match (&table.url, &table.gem, &table.path) {
                    (Some(url), _, _) => Ok(InheritanceSource::Remote {
                        url: url.clone(),
                        authorization: table.authorization.clone(),
                    }),
                    (None, Some(gem), Some(path)) => Ok(InheritanceSource::Library {
                        name: gem.clone(),
                        path: PathBuf::from(path),
                    }),
                    (None, None, Some(path)) => Ok(InheritanceSource::Local(PathBuf::from(path))),
                    (None, Some(gem), None) => Err(DecisionsError::InvalidSource {
                        source_name: spec.to_string(),
                        reason: format!("library `{}` needs a `path`", gem),
                    }),
                    (None, None, None) => Err(DecisionsError::InvalidSource {
                        source_name: spec.to_string(),
                        reason: "expected one of `url`, `gem` with `path`, or `path`".to_string(),
                    }),
                }
            }
        }
    }

    /// Read the raw decisions text, resolving secrets at load time.
    pub fn load(&self, reader: &dyn SourceReader) -> Result<String> {
        match self {
            InheritanceSource::Local(path) => reader.read_file(path),
            InheritanceSource::Remote { url, authorization } => {
                let header = authorization
                    .as_deref()
                    .map(|raw| resolve_authorization(raw, |name| reader.env_var(name)))
                    .transpose()?;
                reader.fetch(url, header.as_deref())
            }
            InheritanceSource::Library { name, path } => {
                let dir = reader.library_dir(name)?;
                reader.read_file(&dir.join(path))
            }
        }
    }
}

/// Substitute `$NAME` references and make sure the value is a bearer credential.
pub fn resolve_authorization<F>(raw: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolved = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('$') {
        resolved.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name_len = after
            .char_indices()
            .find(|&(i, c)| !(c == '_' || c.is_ascii_alphanumeric()) || (i == 0 && c.is_ascii_digit()))
            .map_or(after.len(), |(i, _)| i);
        if name_len == 0 {
            resolved.push('$');
            rest = after;
            continue;
        }
        let name = &after[..name_len];
        let value = lookup(name).ok_or_else(|| DecisionsError::UnresolvedSecret {
            name: name.to_string(),
        })?;
        resolved.push_str(&value);
        rest = &after[name_len..];
    }
    resolved.push_str(rest);

    if resolved.starts_with("Bearer ") {
        Ok(resolved)
    } else {
        Ok(format!("Bearer {}", resolved))
    }
}

/// Load `spec` and fold its rules into `state`, following nested sources.
///
/// Nothing is logged for replay: callers record the top-level spec only.
/// A failure leaves already-applied rules from earlier sources in place.
pub(crate) fn expand_into(
    state: &mut RuleState,
    spec: &InheritanceSpec,
    reader: &dyn SourceReader,
    stack: &mut Vec<InheritanceSpec>,
) -> Result<()> {
    if stack.contains(spec) {
        return Err(DecisionsError::InheritanceCycle {
            source_name: spec.to_string(),
        });
    }

    let source = InheritanceSource::from_spec(spec)?;
    let text = source.load(reader)?;
    let commands = codec::decode(&text)?;
    debug!("inheriting {} decisions from {}", commands.len(), spec);

    stack.push(spec.clone());
    for command in &commands {
        match command {
            Command::InheritFrom { source } => expand_into(state, source, reader, stack)?,
            other => state.apply(other),
        }
    }
    stack.pop();

    Ok(())
}
