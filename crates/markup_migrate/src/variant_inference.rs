// SPDX-License-Identifier: Apache-2.0
//! Display-variant inference for substituted text components.
//!
//! Works from the provenance records left by tag substitution: an opening
//! tag whose record targets the configured text component gets
//! `variant="<v>"` inserted right after the component name, where `<v>` is
//! looked up from the original element (`h1`…`h6` keep their level, anything
//! else takes the fallback). Tags that already carry a `variant` attribute
//! are left untouched.

use serde::Serialize;

use crate::markup_scanner::{self, LineIndex};
use crate::splice::{self, Edit};
use crate::tables::{VariantRules, is_tag_name_char};
use crate::tag_substitution::{SubstitutionRecord, TagKind};

const VARIANT_ATTRIBUTE: &str = "variant";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectedVariant {
    /// 1-based line of the tag in the output buffer.
    pub line: usize,
    pub source_tag: String,
    pub variant: String,
}

#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub text: String,
    pub injected: Vec<InjectedVariant>,
    /// Text-component tags that already had a `variant` attribute.
    pub kept_existing: usize,
}

pub fn infer_variants(
    text: &str,
    records: &[SubstitutionRecord],
    rules: &VariantRules,
) -> VariantOutcome {
    let mut edits = Vec::new();
    let mut injected = Vec::new();
    let mut kept_existing = 0;
    let lines = LineIndex::new(text);

    for record in records
        .iter()
        .filter(|record| record.kind == TagKind::Opening)
        .filter(|record| record.target == rules.component)
    {
        let Some(name_end) = component_name_end(text, record.offset, &rules.component) else {
            continue;
        };
        if has_variant_attribute(text, record.offset, &lines) {
            kept_existing += 1;
            continue;
        }
        let variant = rules.variant_for(&record.original);
        edits.push(Edit::new(
            name_end..name_end,
            format!(" {VARIANT_ATTRIBUTE}=\"{variant}\""),
        ));
        injected.push((record.offset, record.original.clone(), variant.to_string()));
    }

    let mut offsets: Vec<usize> = injected.iter().map(|(offset, _, _)| *offset).collect();
    let text = splice::apply(text, edits, &mut offsets);
    let lines = LineIndex::new(&text);
    let injected = injected
        .into_iter()
        .zip(offsets)
        .map(|((_, source_tag, variant), offset)| InjectedVariant {
            line: lines.line_of(offset),
            source_tag,
            variant,
        })
        .collect();

    VariantOutcome {
        text,
        injected,
        kept_existing,
    }
}

/// End offset of `<component` at `offset`, if the tag there is named exactly
/// `component` (a lexical rename can leave `<Typographyath`).
fn component_name_end(text: &str, offset: usize, component: &str) -> Option<usize> {
    let rest = text.get(offset..)?.strip_prefix('<')?.strip_prefix(component)?;
    if rest.chars().next().is_some_and(is_tag_name_char) {
        return None;
    }
    Some(offset + 1 + component.len())
}

fn has_variant_attribute(text: &str, offset: usize, lines: &LineIndex) -> bool {
    match markup_scanner::scan_open_tag_indexed(text, offset, lines) {
        Some(tag) => tag.attribute(VARIANT_ATTRIBUTE).is_some(),
        // Unterminated or malformed: fall back to the raw attribute run.
        None => {
            let run = &text[offset..];
            let run = run.find('>').map_or(run, |end| &run[..end]);
            run.contains(&format!("{VARIANT_ATTRIBUTE}="))
        }
    }
}
