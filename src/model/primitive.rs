//! Primitive kinds and the value-type -> kind lookup.

use crate::config::ValueType;
use crate::error::BuildError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Primitive kinds understood by schema consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    String,
    TimeOfDay,
}

impl PrimitiveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Binary => "Binary",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::DateTimeOffset => "DateTimeOffset",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::Double => "Double",
            PrimitiveKind::Duration => "Duration",
            PrimitiveKind::Guid => "Guid",
            PrimitiveKind::Int16 => "Int16",
            PrimitiveKind::Int32 => "Int32",
            PrimitiveKind::Int64 => "Int64",
            PrimitiveKind::SByte => "SByte",
            PrimitiveKind::Single => "Single",
            PrimitiveKind::String => "String",
            PrimitiveKind::TimeOfDay => "TimeOfDay",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn qualified_path() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*(?:::[A-Za-z_][A-Za-z0-9_]*)+")
            .expect("path pattern is valid")
    })
}

// Crate roots whose types may be spelled by their last segment alone. Only
// the listed segments are shortened; every other path stays qualified.
const KNOWN_PATHS: &[(&[&str], &[&str])] = &[
    (
        &["core", "alloc", "std"],
        &["String", "Vec", "Cow", "Option", "Duration", "SystemTime"],
    ),
    (
        &["chrono"],
        &["DateTime", "Utc", "FixedOffset", "Local", "NaiveDate", "NaiveTime", "TimeDelta", "Duration"],
    ),
    (&["uuid"], &["Uuid"]),
    (&["rust_decimal"], &["Decimal"]),
    (&["time"], &["OffsetDateTime", "Duration"]),
    (&["bytes"], &["Bytes"]),
];

fn shorten_path(path: &str) -> &str {
    let root = path.split("::").next().unwrap_or(path);
    let last = path.rsplit("::").next().unwrap_or(path);
    let known = KNOWN_PATHS
        .iter()
        .any(|(roots, names)| roots.contains(&root) && names.contains(&last));
    if known {
        last
    } else {
        path
    }
}

/// Strip whitespace and references, and shorten well-known crate paths:
/// `core::option::Option<chrono::naive::date::NaiveDate>` -> `Option<NaiveDate>`.
/// Paths into any other crate or module are kept whole, so `billing::Uuid`
/// never reads as `Uuid`.
pub(crate) fn normalize_type_name(name: &str) -> String {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let shortened = qualified_path().replace_all(&compact, |caps: &regex::Captures<'_>| {
        shorten_path(&caps[0]).to_string()
    });
    shortened.trim_start_matches('&').to_string()
}

fn lookup(name: &str) -> Option<PrimitiveKind> {
    let kind = match name {
        "bool" => PrimitiveKind::Boolean,
        "u8" => PrimitiveKind::Byte,
        "i8" => PrimitiveKind::SByte,
        "i16" => PrimitiveKind::Int16,
        "u16" | "i32" => PrimitiveKind::Int32,
        "u32" | "i64" | "u64" => PrimitiveKind::Int64,
        "f32" => PrimitiveKind::Single,
        "f64" => PrimitiveKind::Double,
        "Decimal" | "decimal" => PrimitiveKind::Decimal,
        "String" | "str" | "char" | "Cow<str>" | "Vec<char>" => PrimitiveKind::String,
        "Vec<u8>" | "[u8]" | "Bytes" => PrimitiveKind::Binary,
        "Uuid" => PrimitiveKind::Guid,
        "DateTime<Utc>" | "DateTime<FixedOffset>" | "DateTime<Local>" | "OffsetDateTime"
        | "SystemTime" => PrimitiveKind::DateTimeOffset,
        "NaiveDate" => PrimitiveKind::Date,
        "NaiveTime" => PrimitiveKind::TimeOfDay,
        "Duration" | "TimeDelta" => PrimitiveKind::Duration,
        _ => return None,
    };
    Some(kind)
}

/// Resolve a backing field's value type to its primitive kind. `Option<T>`
/// resolves to the kind of `T`.
pub fn resolve_primitive_kind(value_type: &ValueType) -> Result<PrimitiveKind, BuildError> {
    let normalized = normalize_type_name(value_type.as_str());
    let inner = normalized
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
        .map(|rest| rest.trim_start_matches('&'))
        .unwrap_or(normalized.as_str());
    lookup(inner).ok_or_else(|| BuildError::NotPrimitive {
        type_name: value_type.to_string(),
    })
}
