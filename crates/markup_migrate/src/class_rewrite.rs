// SPDX-License-Identifier: Apache-2.0
//! Buffer-level class attribute rewriting.
//!
//! Replaces each `class="…"` / `className="…"` attribute with the `sx`
//! object produced by [`crate::style_mapper`]. When nothing in the value maps,
//! the attribute and the whitespace before it are removed.

use std::collections::BTreeMap;

use regex_lite::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;
use crate::markup_scanner::{self, TagToken, ValueKind};
use crate::splice::{self, Edit};
use crate::style_mapper::{MappedClasses, is_class_attribute, map_class_tokens};
use crate::tables::ClassMappingTable;
use crate::tag_substitution::SubstitutionEngine;

const LEXICAL_CLASS_PATTERN: &str = r#"(\s+)(?:class|className)="([^"]*)""#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassRewriteStats {
    /// Attributes replaced by an `sx` object.
    pub attributes_rewritten: usize,
    /// Attributes dropped because no token mapped.
    pub attributes_removed: usize,
    pub tokens_mapped: usize,
    /// Unmapped token → occurrence count.
    pub tokens_unmapped: BTreeMap<String, usize>,
}

impl ClassRewriteStats {
    fn record(&mut self, mapped: &MappedClasses) {
        if mapped.is_empty() {
            self.attributes_removed += 1;
        } else {
            self.attributes_rewritten += 1;
        }
        self.tokens_mapped += mapped.declarations.len();
        for token in &mapped.unmapped {
            *self.tokens_unmapped.entry(token.clone()).or_default() += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassRewrite {
    pub text: String,
    pub stats: ClassRewriteStats,
}

pub fn rewrite_class_attributes(
    source: &str,
    classes: &ClassMappingTable,
    engine: SubstitutionEngine,
) -> Result<ClassRewrite> {
    match engine {
        SubstitutionEngine::Structural => Ok(rewrite_structural(source, classes)),
        SubstitutionEngine::Lexical => rewrite_lexical(source, classes),
    }
}

fn replacement(leading: &str, mapped: &MappedClasses) -> String {
    if mapped.is_empty() {
        String::new()
    } else {
        format!("{leading}{}", mapped.to_style_attribute())
    }
}

fn rewrite_structural(source: &str, classes: &ClassMappingTable) -> ClassRewrite {
    let tokens = markup_scanner::scan(source);
    let mut stats = ClassRewriteStats::default();
    let mut edits = Vec::new();

    markup_scanner::walk(&tokens, &mut |token| {
        let TagToken::Open(tag) = token else {
            return;
        };
        for attribute in &tag.attributes {
            let Some(name) = attribute.name.as_deref() else {
                continue;
            };
            let Some(value) = attribute.value.as_ref() else {
                continue;
            };
            if !is_class_attribute(name)
                || !matches!(value.kind, ValueKind::DoubleQuoted | ValueKind::SingleQuoted)
            {
                continue;
            }
            let mapped = map_class_tokens(&source[value.content.clone()], classes);
            stats.record(&mapped);
            let raw = &source[attribute.span.clone()];
            let leading = &raw[..raw.len() - raw.trim_start().len()];
            edits.push(Edit::new(
                attribute.span.clone(),
                replacement(leading, &mapped),
            ));
        }
    });

    ClassRewrite {
        text: splice::apply(source, edits, &mut []),
        stats,
    }
}

fn rewrite_lexical(source: &str, classes: &ClassMappingTable) -> Result<ClassRewrite> {
    let pattern = Regex::new(LEXICAL_CLASS_PATTERN)?;
    let mut stats = ClassRewriteStats::default();
    let text = pattern
        .replace_all(source, |caps: &Captures<'_>| {
            let mapped = map_class_tokens(&caps[2], classes);
            stats.record(&mapped);
            replacement(&caps[1], &mapped)
        })
        .into_owned();
    Ok(ClassRewrite { text, stats })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::ConversionTables;

    fn rewrite(source: &str, engine: SubstitutionEngine) -> ClassRewrite {
        rewrite_class_attributes(source, &ConversionTables::builtin().classes, engine)
            .expect("rewrite")
    }

    #[test]
    fn both_engines_rewrite_simple_markup_identically() {
        let source = r#"<div class="p-4 bg-white"><h1 className="text-2xl">Hi</h1></div>"#;
        let expected =
            r#"<div sx={{ p: 2, bgcolor: "background.paper" }}><h1 sx={{ fontSize: "1.5rem" }}>Hi</h1></div>"#;
        assert_eq!(rewrite(source, SubstitutionEngine::Structural).text, expected);
        assert_eq!(rewrite(source, SubstitutionEngine::Lexical).text, expected);
    }

    #[test]
    fn empty_and_unmapped_values_remove_the_attribute_without_residue() {
        for engine in [SubstitutionEngine::Structural, SubstitutionEngine::Lexical] {
            let result = rewrite(
                r#"<div class="" id="a"><span className="nope">x</span></div>"#,
                engine,
            );
            assert_eq!(result.text, r#"<div id="a"><span>x</span></div>"#);
            assert!(!result.text.contains("sx={{ }}"));
            assert_eq!(result.stats.attributes_removed, 2);
            assert_eq!(result.stats.tokens_unmapped.get("nope"), Some(&1));
        }
    }

    #[test]
    fn stats_count_mapped_and_unmapped_tokens() {
        let result = rewrite(
            r#"<div class="flex gap-4 sm:flex-row"><p class="text-sm sm:flex-row">x</p></div>"#,
            SubstitutionEngine::Structural,
        );
        assert_eq!(result.stats.attributes_rewritten, 2);
        assert_eq!(result.stats.tokens_mapped, 3);
        assert_eq!(result.stats.tokens_unmapped.get("sm:flex-row"), Some(&2));
    }

    #[test]
    fn expression_values_are_left_alone() {
        let source = r#"<div className={cn("p-4", active && "bg-white")}>x</div>"#;
        for engine in [SubstitutionEngine::Structural, SubstitutionEngine::Lexical] {
            assert_eq!(rewrite(source, engine).text, source);
        }
    }

    #[test]
    fn structural_engine_handles_single_quotes_and_embedded_tags() {
        let result = rewrite(
            r#"<Button startIcon={<span className='p-2'>+</span>} class="w-full">Add</Button>"#,
            SubstitutionEngine::Structural,
        );
        assert_eq!(
            result.text,
            r#"<Button startIcon={<span sx={{ p: 1 }}>+</span>} sx={{ width: "100%" }}>Add</Button>"#
        );
    }

    #[test]
    fn structural_engine_ignores_class_text_outside_tags() {
        let source = r#"<p>Use class="p-4" in your markup</p>"#;
        assert_eq!(rewrite(source, SubstitutionEngine::Structural).text, source);
        // The lexical pattern has no notion of tags and rewrites prose too.
        assert_eq!(
            rewrite(source, SubstitutionEngine::Lexical).text,
            "<p>Use sx={{ p: 2 }} in your markup</p>"
        );
    }

    #[test]
    fn structural_engine_skips_data_attributes_named_like_class() {
        let source = r#"<div data-class="p-4">x</div>"#;
        assert_eq!(rewrite(source, SubstitutionEngine::Structural).text, source);
    }
}
