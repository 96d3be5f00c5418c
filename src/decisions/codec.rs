//! YAML encoding of the operation log.
//!
//! Each record is a list: the operation name, its positional arguments, and
//! an optional trailing mapping with `who`/`why`/`when`/`versions`:
//!
//! ```yaml
//! - - license
//!   - dep
//!   - MIT
//!   - versions:
//!     - 1.0.0
//! - - inherit_from
//!   - url: https://example.com/decisions.yml
//! ```
//!
//! Names and keys written symbol-style (`:permit`) are accepted on read.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use log::warn;
use serde_yaml::{Mapping, Value};

use super::command::{Command, Txn};
use crate::error::{DecisionsError, Result};
use crate::inheritance::InheritanceSpec;

const DEPRECATED_OPERATIONS: [&str; 2] = ["whitelist", "blacklist"];

pub fn encode(log: &[Command]) -> Result<String> {
    let records = log.iter().map(encode_command).collect::<Result<Vec<_>>>()?;
    Ok(serde_yaml::to_string(&records)?)
}

fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn encode_txn(txn: &Txn) -> Value {
    let mut mapping = Mapping::new();
    if let Some(who) = &txn.who {
        mapping.insert(text("who"), text(who));
    }
    if let Some(why) = &txn.why {
        mapping.insert(text("why"), text(why));
    }
    if let Some(when) = &txn.when {
        mapping.insert(
            text("when"),
            Value::String(when.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        );
    }
    if !txn.versions.is_empty() {
        mapping.insert(
            text("versions"),
            Value::Sequence(txn.versions.iter().map(|v| text(v)).collect()),
        );
    }
    Value::Mapping(mapping)
}

fn encode_command(command: &Command) -> Result<Value> {
    let mut record = vec![text(command.operation_name())];
    match command {
        Command::AddPackage { name, version, .. } => {
            record.push(text(name));
            record.push(optional_text(version.as_deref()));
        }
        Command::License { name, license, .. } => {
            record.push(text(name));
            record.push(text(license));
        }
        Command::Unlicense { name, license, .. } => {
            record.push(text(name));
            record.push(optional_text(license.as_deref()));
        }
        Command::Homepage { name, homepage, .. } => {
            record.push(text(name));
            record.push(text(homepage));
        }
        Command::RemovePackage { name, .. }
        | Command::Approve { name, .. }
        | Command::Unapprove { name, .. }
        | Command::Ignore { name, .. }
        | Command::Heed { name, .. }
        | Command::NameProject { name, .. } => record.push(text(name)),
        Command::IgnoreGroup { group, .. } | Command::HeedGroup { group, .. } => {
            record.push(text(group))
        }
        Command::Permit { license, .. }
        | Command::Unpermit { license, .. }
        | Command::Restrict { license, .. }
        | Command::Unrestrict { license, .. } => record.push(text(license)),
        Command::UnnameProject { .. } => {}
        Command::InheritFrom { source } => record.push(serde_yaml::to_value(source)?),
    }
    if let Some(txn) = command.txn().filter(|txn| !txn.is_empty()) {
        record.push(encode_txn(txn));
    }
    Ok(Value::Sequence(record))
}

/// Parse a persisted log. Blank input and a bare `---` decode to no records.
pub fn decode(input: &str) -> Result<Vec<Command>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_yaml::from_str::<Value>(input)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(records) => records
            .into_iter()
            .enumerate()
            .map(|(index, record)| decode_record(index, record))
            .collect(),
        _ => Err(DecisionsError::malformed(0, "expected a list of records")),
    }
}

fn symbol_name(raw: &str) -> &str {
    raw.strip_prefix(':').unwrap_or(raw)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Rewrite `:key` mapping keys to `key`, recursively.
fn strip_symbol_keys(value: Value) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .into_iter()
                .map(|(key, value)| {
                    let key = match key {
                        Value::String(s) => Value::String(symbol_name(&s).to_string()),
                        other => other,
                    };
                    (key, strip_symbol_keys(value))
                })
                .collect(),
        ),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(strip_symbol_keys).collect()),
        other => other,
    }
}

fn parse_when(index: usize, raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(when) = DateTime::parse_from_rfc3339(raw) {
        return Ok(when.with_timezone(&Utc));
    }
    if let Ok(when) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f %:z") {
        return Ok(when.with_timezone(&Utc));
    }
    if let Ok(when) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f Z") {
        return Ok(when.and_utc());
    }
    Err(DecisionsError::malformed(index, format!("unrecognized timestamp `{}`", raw)))
}

fn decode_txn(index: usize, mapping: Mapping) -> Result<Txn> {
    let mut txn = Txn::default();
    for (key, value) in mapping {
        let key = scalar(&key).unwrap_or_default();
        match symbol_name(&key) {
            "who" => txn.who = scalar(&value),
            "why" => txn.why = scalar(&value),
            "when" => {
                if let Some(raw) = scalar(&value) {
                    txn.when = Some(parse_when(index, &raw)?);
                }
            }
            "versions" => {
                txn.versions = match value {
                    Value::Sequence(items) => items.iter().filter_map(scalar).collect(),
                    Value::Null => Vec::new(),
                    other => scalar(&other).into_iter().collect(),
                };
            }
            other => warn!("record #{}: ignoring unknown key `{}`", index, other),
        }
    }
    Ok(txn)
}

/// Positional arguments of one record.
struct Args {
    index: usize,
    operation: String,
    values: std::vec::IntoIter<Value>,
}

impl Args {
    fn required(&mut self, what: &str) -> Result<String> {
        self.values
            .next()
            .as_ref()
            .and_then(scalar)
            .ok_or_else(|| {
                DecisionsError::malformed(
                    self.index,
                    format!("`{}` needs a {}", self.operation, what),
                )
            })
    }

    fn optional(&mut self, what: &str) -> Result<Option<String>> {
        match self.values.next() {
            None | Some(Value::Null) => Ok(None),
            Some(value) => scalar(&value).map(Some).ok_or_else(|| {
                DecisionsError::malformed(
                    self.index,
                    format!("`{}` has an invalid {}", self.operation, what),
                )
            }),
        }
    }

    fn finish(mut self) -> Result<()> {
        match self.values.next() {
            None => Ok(()),
            Some(_) => Err(DecisionsError::malformed(
                self.index,
                format!("too many arguments for `{}`", self.operation),
            )),
        }
    }
}

fn decode_record(index: usize, record: Value) -> Result<Command> {
    let Value::Sequence(items) = record else {
        return Err(DecisionsError::malformed(index, "expected a list"));
    };
    let mut items = items.into_iter();
    let operation = items
        .next()
        .as_ref()
        .and_then(scalar)
        .ok_or_else(|| DecisionsError::malformed(index, "missing operation name"))?;
    let operation = symbol_name(&operation).to_string();

    if DEPRECATED_OPERATIONS.contains(&operation.as_str()) {
        return Err(DecisionsError::DeprecatedSyntax { operation });
    }

    let mut rest: Vec<Value> = items.map(strip_symbol_keys).collect();

    if operation == "inherit_from" {
        if rest.len() != 1 {
            return Err(DecisionsError::malformed(index, "`inherit_from` takes exactly one source"));
        }
        let source: InheritanceSpec = serde_yaml::from_value(rest.remove(0))
            .map_err(|e| DecisionsError::malformed(index, format!("invalid source: {}", e)))?;
        return Ok(Command::InheritFrom { source });
    }

    let txn = match rest.pop() {
        Some(Value::Mapping(mapping)) => decode_txn(index, mapping)?,
        Some(positional) => {
            rest.push(positional);
            Txn::default()
        }
        None => Txn::default(),
    };

    let mut args = Args {
        index,
        operation: operation.clone(),
        values: rest.into_iter(),
    };

    let command = match operation.as_str() {
        "add_package" => Command::AddPackage {
            name: args.required("package name")?,
            version: args.optional("version")?,
            txn,
        },
        "remove_package" => Command::RemovePackage {
            name: args.required("package name")?,
            txn,
        },
        "license" => Command::License {
            name: args.required("package name")?,
            license: args.required("license")?,
            txn,
        },
        "unlicense" => Command::Unlicense {
            name: args.required("package name")?,
            license: args.optional("license")?,
            txn,
        },
        "homepage" => Command::Homepage {
            name: args.required("package name")?,
            homepage: args.required("homepage")?,
            txn,
        },
        "approve" => Command::Approve {
            name: args.required("package name")?,
            txn,
        },
        "unapprove" => Command::Unapprove {
            name: args.required("package name")?,
            txn,
        },
        "ignore" => Command::Ignore {
            name: args.required("package name")?,
            txn,
        },
        "heed" => Command::Heed {
            name: args.required("package name")?,
            txn,
        },
        "ignore_group" => Command::IgnoreGroup {
            group: args.required("group")?,
            txn,
        },
        "heed_group" => Command::HeedGroup {
            group: args.required("group")?,
            txn,
        },
        "permit" => Command::Permit {
            license: args.required("license")?,
            txn,
        },
        "unpermit" => Command::Unpermit {
            license: args.required("license")?,
            txn,
        },
        "restrict" => Command::Restrict {
            license: args.required("license")?,
            txn,
        },
        "unrestrict" => Command::Unrestrict {
            license: args.required("license")?,
            txn,
        },
        "name_project" => Command::NameProject {
            name: args.required("project name")?,
            txn,
        },
        "unname_project" => Command::UnnameProject { txn },
        other => {
            return Err(DecisionsError::malformed(
                index,
                format!("unknown operation `{}`", other),
            ))
        }
    };
    args.finish()?;

    Ok(command)
}
