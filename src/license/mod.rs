use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

pub mod definitions;

pub use definitions::{LicenseDefinition, DEFINITIONS};

/// How the parts of a compound license expression combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    fn separator(self) -> &'static str {
        match self {
            Operator::And => " AND ",
            Operator::Or => " OR ",
        }
    }
}

/// A license identified by its canonical name.
///
/// Two licenses are equal iff their canonical names match; aliases are
/// resolved by [`find_by_name`] before a `License` is ever constructed.
#[derive(Debug, Clone)]
pub struct License {
    name: String,
    definition: Option<&'static LicenseDefinition>,
    compound: Option<(Operator, Vec<License>)>,
}

impl License {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable name for known licenses, the canonical name otherwise.
    pub fn pretty_name(&self) -> &str {
        self.definition.map_or(self.name.as_str(), |d| d.pretty_name)
    }

    /// Whether the name matched an entry of the built-in alias table.
    pub fn is_known(&self) -> bool {
        self.definition.is_some()
    }

    pub fn operator(&self) -> Option<Operator> {
        self.compound.as_ref().map(|(op, _)| *op)
    }

    /// Parts of a compound expression; empty for a single license.
    pub fn sub_licenses(&self) -> &[License] {
        self.compound
            .as_ref()
            .map_or(&[][..], |(_, parts)| parts.as_slice())
    }
}

impl PartialEq for License {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for License {}

impl Hash for License {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for License {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for License {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for License {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

fn alias_table() -> &'static HashMap<&'static str, &'static LicenseDefinition> {
    static TABLE: OnceLock<HashMap<&'static str, &'static LicenseDefinition>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = HashMap::new();
        for definition in DEFINITIONS {
            for name in definition.names() {
                table.entry(name).or_insert(definition);
            }
        }
        table
    })
}

fn find_single(raw: &str) -> License {
    match alias_table().get(raw) {
        Some(definition) => License {
            name: definition.short_name.to_string(),
            definition: Some(definition),
            compound: None,
        },
        None => License {
            name: raw.to_string(),
            definition: None,
            compound: None,
        },
    }
}

fn find_compound(raw: &str, operator: Operator) -> License {
    let parts: Vec<License> = raw
        .split(operator.separator())
        .map(|part| find_single(part.trim()))
        .collect();
    let name = parts
        .iter()
        .map(License::name)
        .collect::<Vec<_>>()
        .join(operator.separator());

    License {
        name,
        definition: None,
        compound: Some((operator, parts)),
    }
}

/// Resolve a raw license name to its canonical `License`.
///
/// Lookup is total: names missing from the alias table become their own
/// canonical identity. Expressions joined by ` AND ` or ` OR ` (but not both)
/// resolve to a compound license whose parts are normalized individually.
pub fn find_by_name(raw: &str) -> License {
    let has_and = raw.contains(Operator::And.separator());
    let has_or = raw.contains(Operator::Or.separator());

    match (has_and, has_or) {
        (true, false) => find_compound(raw, Operator::And),
        (false, true) => find_compound(raw, Operator::Or),
        _ => find_single(raw),
    }
}
