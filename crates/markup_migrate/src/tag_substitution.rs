// SPDX-License-Identifier: Apache-2.0
//! Element → component tag substitution.
//!
//! Every opening tag of a mapped element keeps its attribute run verbatim and
//! gets the component name; every closing tag is renamed the same way. The
//! matching unit is a single tag occurrence: openers and closers are renamed
//! independently, never as balanced pairs.
//!
//! Each rename produces a [`SubstitutionRecord`] naming the original element.
//! Later passes need that name (a `Typography` that came from `<h2>` must
//! become `variant="h2"`) and cannot recover it from the rewritten text.
//!
//! Two engines are available:
//!
//! - [`SubstitutionEngine::Structural`] renames the tokens found by
//!   [`crate::markup_scanner`], so names match whole (`p` never matches
//!   `path`) and `>` or tag-like text inside attribute values is inert.
//! - [`SubstitutionEngine::Lexical`] runs one pattern pass per table entry:
//!   `<name([^>]*)>` for openers and the literal `</name>` for closers. A
//!   source name that prefixes another tag (`<p` in `<path>`) or a `>` inside
//!   an attribute value yields a wrong substitution. That behavior is kept
//!   as-is for parity with markup converted by earlier versions.

use std::collections::BTreeMap;

use clap::ValueEnum;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::markup_scanner::{self, TagToken};
use crate::splice::{self, Edit};
use crate::tables::{TagMap, TagMapping};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionEngine {
    #[default]
    Structural,
    Lexical,
}

impl SubstitutionEngine {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Lexical => "lexical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    Opening,
    Closing,
}

/// Provenance of one renamed tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRecord {
    /// Byte offset of the tag's `<` in the substituted buffer.
    pub offset: usize,
    pub kind: TagKind,
    pub original: String,
    pub target: String,
}

#[derive(Debug, Clone)]
pub struct SubstitutedBuffer {
    pub text: String,
    /// Sorted by offset.
    pub records: Vec<SubstitutionRecord>,
}

impl SubstitutedBuffer {
    pub fn openings(&self) -> impl Iterator<Item = &SubstitutionRecord> {
        self.records
            .iter()
            .filter(|record| record.kind == TagKind::Opening)
    }
}

pub fn substitute_tags(
    source: &str,
    tags: &TagMap,
    engine: SubstitutionEngine,
) -> Result<SubstitutedBuffer> {
    let mut buffer = match engine {
        SubstitutionEngine::Structural => substitute_structural(source, tags),
        SubstitutionEngine::Lexical => substitute_lexical(source, tags)?,
    };
    buffer.records.sort_by_key(|record| record.offset);
    Ok(buffer)
}

fn substitute_structural(source: &str, tags: &TagMap) -> SubstitutedBuffer {
    let tokens = markup_scanner::scan(source);
    let mut edits = Vec::new();
    let mut records = Vec::new();

    markup_scanner::walk(&tokens, &mut |token| {
        let Some(target) = tags.target_for(token.name()) else {
            return;
        };
        let (name_span, kind) = match token {
            TagToken::Open(tag) => (tag.name_span.clone(), TagKind::Opening),
            TagToken::Close(tag) => (tag.name_span.clone(), TagKind::Closing),
        };
        edits.push(Edit::new(name_span, target));
        records.push(SubstitutionRecord {
            offset: token.span().start,
            kind,
            original: token.name().to_string(),
            target: target.to_string(),
        });
    });

    let mut offsets: Vec<usize> = records.iter().map(|record| record.offset).collect();
    let text = splice::apply(source, edits, &mut offsets);
    for (record, offset) in records.iter_mut().zip(offsets) {
        record.offset = offset;
    }
    SubstitutedBuffer { text, records }
}

fn substitute_lexical(source: &str, tags: &TagMap) -> Result<SubstitutedBuffer> {
    let mut text = source.to_string();
    let mut records: Vec<SubstitutionRecord> = Vec::new();

    for entry in tags.iter() {
        let opening = Regex::new(&format!("<{}([^>]*)>", regex_lite::escape(&entry.source)))?;
        let starts: Vec<usize> = opening.find_iter(&text).map(|m| m.start()).collect();
        text = apply_pass(&text, &starts, TagKind::Opening, entry, &mut records);

        let closing_tag = format!("</{}>", entry.source);
        let starts: Vec<usize> = text
            .match_indices(&closing_tag)
            .map(|(start, _)| start)
            .collect();
        text = apply_pass(&text, &starts, TagKind::Closing, entry, &mut records);
    }

    Ok(SubstitutedBuffer { text, records })
}

/// Apply one lexical pass over the tags starting at `starts`. Only the name
/// is replaced, so the attribute run (and any record inside it) is kept. A
/// tag renamed by an earlier pass and matched again keeps its original name
/// and takes the new target.
fn apply_pass(
    text: &str,
    starts: &[usize],
    kind: TagKind,
    entry: &TagMapping,
    records: &mut Vec<SubstitutionRecord>,
) -> String {
    if starts.is_empty() {
        return text.to_string();
    }

    let name_offset = match kind {
        TagKind::Opening => 1,
        TagKind::Closing => 2,
    };
    let existing: BTreeMap<(usize, TagKind), usize> = records
        .iter()
        .enumerate()
        .map(|(idx, record)| ((record.offset, record.kind), idx))
        .collect();
    let mut edits = Vec::with_capacity(starts.len());
    let mut fresh = Vec::new();
    for &start in starts {
        let name_start = start + name_offset;
        edits.push(Edit::new(
            name_start..name_start + entry.source.len(),
            entry.target.as_str(),
        ));
        match existing.get(&(start, kind)) {
            Some(&idx) => records[idx].target.clone_from(&entry.target),
            None => fresh.push(SubstitutionRecord {
                offset: start,
                kind,
                original: entry.source.clone(),
                target: entry.target.clone(),
            }),
        }
    }
    records.extend(fresh);

    let mut offsets: Vec<usize> = records.iter().map(|record| record.offset).collect();
    let rewritten = splice::apply(text, edits, &mut offsets);
    for (record, offset) in records.iter_mut().zip(offsets) {
        record.offset = offset;
    }
    rewritten
}
