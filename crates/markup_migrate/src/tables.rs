// SPDX-License-Identifier: Apache-2.0
//! Translation tables driving the conversion.
//!
//! Three tables make up a [`ConversionTables`] value:
//!
//! - [`ClassMappingTable`]: utility-class token → one `sx` declaration
//! - [`TagMap`]: source element name → toolkit component name
//! - [`VariantRules`]: which component receives a `variant` and which
//!   variant each source tag implies
//!
//! The builtin set is compiled in. A JSON file with the same shape can be
//! loaded in its place; every pipeline stage takes the tables as an explicit
//! argument so tests can substitute their own.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

// ── Builtin data ───────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Lit {
    Num(f64),
    Str(&'static str),
}

const BUILTIN_CLASSES: &[(&str, &str, Lit)] = &[
    // Spacing
    ("p-1", "p", Lit::Num(0.5)),
    ("p-2", "p", Lit::Num(1.0)),
    ("p-3", "p", Lit::Num(1.5)),
    ("p-4", "p", Lit::Num(2.0)),
    ("p-6", "p", Lit::Num(3.0)),
    ("p-8", "p", Lit::Num(4.0)),
    ("px-2", "px", Lit::Num(1.0)),
    ("px-4", "px", Lit::Num(2.0)),
    ("px-6", "px", Lit::Num(3.0)),
    ("py-2", "py", Lit::Num(1.0)),
    ("py-4", "py", Lit::Num(2.0)),
    ("m-2", "m", Lit::Num(1.0)),
    ("m-4", "m", Lit::Num(2.0)),
    ("mb-2", "mb", Lit::Num(1.0)),
    ("mb-4", "mb", Lit::Num(2.0)),
    ("mt-2", "mt", Lit::Num(1.0)),
    ("mt-4", "mt", Lit::Num(2.0)),
    ("gap-2", "gap", Lit::Num(1.0)),
    ("gap-4", "gap", Lit::Num(2.0)),
    // Colors
    ("bg-white", "bgcolor", Lit::Str("background.paper")),
    ("bg-gray-50", "bgcolor", Lit::Str("grey.50")),
    ("bg-gray-100", "bgcolor", Lit::Str("grey.100")),
    ("bg-gray-200", "bgcolor", Lit::Str("grey.200")),
    ("bg-blue-500", "bgcolor", Lit::Str("primary.main")),
    ("bg-blue-600", "bgcolor", Lit::Str("primary.dark")),
    ("text-gray-600", "color", Lit::Str("text.secondary")),
    ("text-gray-900", "color", Lit::Str("text.primary")),
    ("text-white", "color", Lit::Str("white")),
    // Border radius
    ("rounded", "borderRadius", Lit::Num(1.0)),
    ("rounded-md", "borderRadius", Lit::Num(1.5)),
    ("rounded-lg", "borderRadius", Lit::Num(2.0)),
    ("rounded-xl", "borderRadius", Lit::Num(3.0)),
    // Shadows
    ("shadow", "boxShadow", Lit::Num(1.0)),
    ("shadow-sm", "boxShadow", Lit::Num(1.0)),
    ("shadow-md", "boxShadow", Lit::Num(2.0)),
    ("shadow-lg", "boxShadow", Lit::Num(4.0)),
    // Display & layout
    ("flex", "display", Lit::Str("flex")),
    ("flex-col", "flexDirection", Lit::Str("column")),
    ("flex-row", "flexDirection", Lit::Str("row")),
    ("items-center", "alignItems", Lit::Str("center")),
    ("items-start", "alignItems", Lit::Str("flex-start")),
    ("justify-center", "justifyContent", Lit::Str("center")),
    ("justify-between", "justifyContent", Lit::Str("space-between")),
    ("justify-end", "justifyContent", Lit::Str("flex-end")),
    ("grid", "display", Lit::Str("grid")),
    ("hidden", "display", Lit::Str("none")),
    // Sizing
    ("w-full", "width", Lit::Str("100%")),
    ("h-full", "height", Lit::Str("100%")),
    ("min-h-screen", "minHeight", Lit::Str("100vh")),
    // Text
    ("text-sm", "fontSize", Lit::Str("0.875rem")),
    ("text-base", "fontSize", Lit::Str("1rem")),
    ("text-lg", "fontSize", Lit::Str("1.125rem")),
    ("text-xl", "fontSize", Lit::Str("1.25rem")),
    ("text-2xl", "fontSize", Lit::Str("1.5rem")),
    ("font-medium", "fontWeight", Lit::Num(500.0)),
    ("font-semibold", "fontWeight", Lit::Num(600.0)),
    ("font-bold", "fontWeight", Lit::Num(700.0)),
];

const BUILTIN_TAGS: &[(&str, &str)] = &[
    ("button", "Button"),
    ("input", "TextField"),
    ("textarea", "TextField"),
    ("select", "Select"),
    ("label", "Typography"),
    ("h1", "Typography"),
    ("h2", "Typography"),
    ("h3", "Typography"),
    ("h4", "Typography"),
    ("h5", "Typography"),
    ("h6", "Typography"),
    ("p", "Typography"),
    ("span", "Typography"),
    ("div", "Box"),
    ("section", "Box"),
    ("article", "Paper"),
    ("main", "Container"),
];

const DEFAULT_TEXT_COMPONENT: &str = "Typography";
const DEFAULT_FALLBACK_VARIANT: &str = "body1";
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

// ── Style declarations ─────────────────────────────────────────────────

/// Literal value of an `sx` declaration.
///
/// Numbers render bare (`2`, `0.5`), strings render double-quoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "\"{escaped}\"")
            }
        }
    }
}

/// One utility-class token and the declaration it maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMapping {
    pub token: String,
    pub property: String,
    pub value: StyleValue,
}

impl ClassMapping {
    /// Declaration text, e.g. `bgcolor: "background.paper"`.
    #[must_use]
    pub fn declaration(&self) -> String {
        format!("{}: {}", self.property, self.value)
    }
}

/// Ordered token → declaration table with exact, case-sensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct ClassMappingTable {
    entries: Vec<ClassMapping>,
    index: BTreeMap<String, usize>,
}

impl ClassMappingTable {
    /// Build a table, rejecting empty tokens, tokens containing whitespace
    /// and duplicate tokens.
    pub fn new(entries: Vec<ClassMapping>) -> Result<Self> {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.token.is_empty() || entry.token.chars().any(char::is_whitespace) {
                return Err(MigrateError::tables(
                    "classes",
                    format!("invalid class token: {:?}", entry.token),
                ));
            }
            if entry.property.trim().is_empty() {
                return Err(MigrateError::tables(
                    "classes",
                    format!("empty property for class token: {}", entry.token),
                ));
            }
            if index.insert(entry.token.clone(), position).is_some() {
                return Err(MigrateError::tables(
                    "classes",
                    format!("duplicate class token: {}", entry.token),
                ));
            }
        }
        Ok(Self { entries, index })
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<&ClassMapping> {
        self.index.get(token).map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassMapping> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tag map ────────────────────────────────────────────────────────────

/// One source element → target component entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    pub source: String,
    pub target: String,
}

/// Ordered element → component table. Several sources may share a target.
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    entries: Vec<TagMapping>,
}

impl TagMap {
    pub fn new(entries: Vec<TagMapping>) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            for name in [&entry.source, &entry.target] {
                if !is_tag_name(name) {
                    return Err(MigrateError::tables(
                        "tags",
                        format!("not a plain tag name: {name:?}"),
                    ));
                }
            }
            if !seen.insert(entry.source.as_str()) {
                return Err(MigrateError::tables(
                    "tags",
                    format!("duplicate source tag: {}", entry.source),
                ));
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn target_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| entry.target.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagMapping> {
        self.entries.iter()
    }

    /// Distinct targets in first-seen order.
    #[must_use]
    pub fn targets(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .map(|entry| entry.target.as_str())
            .filter(|target| seen.insert(*target))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tag and component names: an ASCII letter followed by letters, digits,
/// `_`, `-`, `.` or `:`.
#[must_use]
pub fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(is_tag_name_char)
}

#[must_use]
pub fn is_tag_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')
}

// ── Variant rules ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRules {
    /// Component whose substituted tags receive a `variant` attribute.
    pub component: String,
    /// Variant used when the source tag has no entry in `by_tag`.
    pub fallback: String,
    #[serde(default)]
    pub by_tag: BTreeMap<String, String>,
}

impl Default for VariantRules {
    fn default() -> Self {
        Self {
            component: DEFAULT_TEXT_COMPONENT.to_string(),
            fallback: DEFAULT_FALLBACK_VARIANT.to_string(),
            by_tag: HEADING_TAGS
                .iter()
                .map(|tag| ((*tag).to_string(), (*tag).to_string()))
                .collect(),
        }
    }
}

impl VariantRules {
    #[must_use]
    pub fn variant_for(&self, source_tag: &str) -> &str {
        self.by_tag
            .get(source_tag)
            .map_or(self.fallback.as_str(), String::as_str)
    }
}

// ── Combined tables ────────────────────────────────────────────────────

/// Everything the pipeline is configured with.
#[derive(Debug, Clone)]
pub struct ConversionTables {
    pub classes: ClassMappingTable,
    pub tags: TagMap,
    pub variants: VariantRules,
}

#[derive(Debug, Serialize, Deserialize)]
struct TablesFile {
    classes: Vec<ClassMapping>,
    tags: Vec<TagMapping>,
    #[serde(default)]
    variants: Option<VariantRules>,
}

impl ConversionTables {
    /// The compiled-in tables.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = builtin_class_entries();
        let index = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.token.clone(), position))
            .collect();
        Self {
            classes: ClassMappingTable { entries, index },
            tags: TagMap {
                entries: builtin_tag_entries(),
            },
            variants: VariantRules::default(),
        }
    }

    /// Parse a JSON table document. `origin` names the source in errors.
    pub fn from_json_str(content: &str, origin: &str) -> Result<Self> {
        let file: TablesFile = serde_json::from_str(content)
            .map_err(|error| MigrateError::tables(origin, error.to_string()))?;
        let classes = ClassMappingTable::new(file.classes)
            .map_err(|error| MigrateError::tables(origin, error.to_string()))?;
        let tags = TagMap::new(file.tags)
            .map_err(|error| MigrateError::tables(origin, error.to_string()))?;
        let variants = file.variants.unwrap_or_default();
        if !is_tag_name(&variants.component) {
            return Err(MigrateError::tables(
                origin,
                format!("not a plain component name: {:?}", variants.component),
            ));
        }
        Ok(Self {
            classes,
            tags,
            variants,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|error| MigrateError::conversion(path, error))?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Serialize back into the JSON table document shape.
    pub fn to_json_string(&self) -> Result<String> {
        let file = TablesFile {
            classes: self.classes.iter().cloned().collect(),
            tags: self.tags.iter().cloned().collect(),
            variants: Some(self.variants.clone()),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

fn builtin_class_entries() -> Vec<ClassMapping> {
    BUILTIN_CLASSES
        .iter()
        .map(|(token, property, value)| ClassMapping {
            token: (*token).to_string(),
            property: (*property).to_string(),
            value: match value {
                Lit::Num(number) => StyleValue::Number(*number),
                Lit::Str(text) => StyleValue::Text((*text).to_string()),
            },
        })
        .collect()
}

fn builtin_tag_entries() -> Vec<TagMapping> {
    BUILTIN_TAGS
        .iter()
        .map(|(source, target)| TagMapping {
            source: (*source).to_string(),
            target: (*target).to_string(),
        })
        .collect()
}
