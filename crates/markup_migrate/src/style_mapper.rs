// SPDX-License-Identifier: Apache-2.0
//! Utility-class token mapping.
//!
//! Turns one class attribute value (`"p-4 bg-white rounded-lg"`) into an
//! inline style object (`sx={{ p: 2, bgcolor: "background.paper", borderRadius: 2 }}`).
//!
//! Tokens absent from the table are dropped without error. Declarations keep
//! the order the tokens appeared in; two tokens writing the same property both
//! appear, and the runtime evaluating the object decides which one wins.

use serde::Serialize;

use crate::tables::ClassMappingTable;

/// Attribute names treated as utility-class lists.
pub const CLASS_ATTRIBUTE_NAMES: [&str; 2] = ["class", "className"];

/// Attribute name used for the generated style object.
pub const STYLE_ATTRIBUTE_NAME: &str = "sx";

#[must_use]
pub fn is_class_attribute(name: &str) -> bool {
    CLASS_ATTRIBUTE_NAMES.contains(&name)
}

/// Result of mapping one class attribute value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappedClasses {
    /// Declaration texts in token order.
    pub declarations: Vec<String>,
    /// Tokens with no table entry, in token order.
    pub unmapped: Vec<String>,
}

impl MappedClasses {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// `sx={{ … }}`, or an empty string when nothing matched.
    #[must_use]
    pub fn to_style_attribute(&self) -> String {
        if self.declarations.is_empty() {
            String::new()
        } else {
            format!(
                "{STYLE_ATTRIBUTE_NAME}={{{{ {} }}}}",
                self.declarations.join(", ")
            )
        }
    }
}

#[must_use]
pub fn map_class_tokens(class_value: &str, table: &ClassMappingTable) -> MappedClasses {
    let mut mapped = MappedClasses::default();
    for token in class_value.split_whitespace() {
        match table.get(token) {
            Some(entry) => mapped.declarations.push(entry.declaration()),
            None => mapped.unmapped.push(token.to_string()),
        }
    }
    mapped
}

/// Map a class attribute value straight to its style attribute text.
#[must_use]
pub fn style_attribute(class_value: &str, table: &ClassMappingTable) -> String {
    map_class_tokens(class_value, table).to_style_attribute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ClassMapping, ConversionTables, StyleValue};

    fn builtin() -> ClassMappingTable {
        ConversionTables::builtin().classes
    }

    #[test]
    fn maps_tokens_in_source_order() {
        assert_eq!(
            style_attribute("p-4 bg-white rounded-lg", &builtin()),
            r#"sx={{ p: 2, bgcolor: "background.paper", borderRadius: 2 }}"#
        );
        assert_eq!(
            style_attribute("rounded-lg p-4", &builtin()),
            "sx={{ borderRadius: 2, p: 2 }}"
        );
    }

    #[test]
    fn unmapped_tokens_are_dropped_silently() {
        let table = builtin();
        let mapped = map_class_tokens("unknown-token p-2 hover:bg-red-500", &table);
        assert_eq!(mapped.declarations, vec!["p: 1"]);
        assert_eq!(mapped.unmapped, vec!["unknown-token", "hover:bg-red-500"]);
        assert_eq!(
            style_attribute("unknown-token p-2", &table),
            style_attribute("p-2", &table)
        );
    }

    #[test]
    fn empty_or_fully_unmapped_values_yield_nothing() {
        let table = builtin();
        assert_eq!(style_attribute("", &table), "");
        assert_eq!(style_attribute("   ", &table), "");
        assert_eq!(style_attribute("nope also-nope", &table), "");
    }

    #[test]
    fn duplicate_properties_are_kept_in_order() {
        assert_eq!(
            style_attribute("p-2 p-4", &builtin()),
            "sx={{ p: 1, p: 2 }}"
        );
    }

    #[test]
    fn any_whitespace_separates_tokens() {
        assert_eq!(
            style_attribute("flex\n\titems-center  justify-between", &builtin()),
            r#"sx={{ display: "flex", alignItems: "center", justifyContent: "space-between" }}"#
        );
    }

    #[test]
    fn custom_table_is_used_verbatim() {
        let table = ClassMappingTable::new(vec![ClassMapping {
            token: "card".into(),
            property: "boxShadow".into(),
            value: StyleValue::Number(3.0),
        }])
        .expect("table");
        assert_eq!(style_attribute("card p-4", &table), "sx={{ boxShadow: 3 }}");
    }

    #[test]
    fn recognizes_both_class_attribute_spellings() {
        assert!(is_class_attribute("class"));
        assert!(is_class_attribute("className"));
        assert!(!is_class_attribute("classname"));
        assert!(!is_class_attribute("data-class"));
    }
}
