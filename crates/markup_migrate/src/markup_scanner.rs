// SPDX-License-Identifier: Apache-2.0
//! Tag-token scanner for HTML/JSX-like markup.
//!
//! Splits a buffer into opening and closing tag tokens with absolute byte
//! spans. Text between tags is not tokenized; callers rewrite the buffer by
//! splicing edits at token spans, so everything outside an edit is kept
//! byte-for-byte.
//!
//! The scanner understands just enough of the attribute grammar to find the
//! real end of a tag: double/single-quoted values, `{…}` expression values
//! (brace depth, string and template literals), spreads and bare boolean
//! attributes. Tags inside `{…}` attribute values are scanned recursively and
//! attached to that value. Comments (`<!-- … -->`) are skipped. Anything that
//! does not scan as a tag (`a < b`, an unterminated tag at end of input) is
//! left as text.
//!
//! [`build_tree`] pairs openers with closers into a minimal element tree and
//! reports unbalanced markup as diagnostics.

use std::ops::Range;

use serde::Serialize;

use crate::tables::{is_tag_name, is_tag_name_char};

/// HTML elements that never take a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

// ── Token types ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueKind {
    DoubleQuoted,
    SingleQuoted,
    Braced,
    Unquoted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeValue {
    pub kind: ValueKind,
    /// Whole value including quotes or braces.
    pub span: Range<usize>,
    /// Value without its delimiters.
    pub content: Range<usize>,
    /// Tags found inside a braced value.
    pub embedded: Vec<TagToken>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute including the whitespace that precedes it.
    pub span: Range<usize>,
    /// `None` for spreads such as `{...props}`.
    pub name: Option<String>,
    pub value: Option<AttributeValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenTag {
    pub span: Range<usize>,
    pub name: String,
    pub name_span: Range<usize>,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
    pub line: usize,
}

impl OpenTag {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloseTag {
    pub span: Range<usize>,
    pub name: String,
    pub name_span: Range<usize>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TagToken {
    Open(OpenTag),
    Close(CloseTag),
}

impl TagToken {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Open(tag) => &tag.name,
            Self::Close(tag) => &tag.name,
        }
    }

    #[must_use]
    pub fn span(&self) -> &Range<usize> {
        match self {
            Self::Open(tag) => &tag.span,
            Self::Close(tag) => &tag.span,
        }
    }
}

// ── Scanning ───────────────────────────────────────────────────────────

/// Line-start offsets of a buffer, built once and shared by every lookup.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(idx, _)| idx + 1),
        );
        Self { starts }
    }

    /// 1-based line containing `offset`.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|start| *start <= offset)
    }
}

/// Scan the whole buffer for tag tokens, in document order.
#[must_use]
pub fn scan(source: &str) -> Vec<TagToken> {
    let lines = LineIndex::new(source);
    scan_range(source, 0, source.len(), &lines)
}

/// Scan a single opening tag starting exactly at `offset`.
#[must_use]
pub fn scan_open_tag(source: &str, offset: usize) -> Option<OpenTag> {
    scan_open_tag_indexed(source, offset, &LineIndex::new(source))
}

/// [`scan_open_tag`] against a prebuilt index of `source`, for callers that
/// scan many tags in the same buffer.
#[must_use]
pub fn scan_open_tag_indexed(source: &str, offset: usize, lines: &LineIndex) -> Option<OpenTag> {
    open_tag_at(source, offset, source.len(), lines)
}

fn scan_range(source: &str, start: usize, end: usize, lines: &LineIndex) -> Vec<TagToken> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = start;

    while pos < end {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        if source[pos..end].starts_with("<!--") {
            pos = source[pos + 4..end]
                .find("-->")
                .map_or(end, |idx| pos + 4 + idx + 3);
            continue;
        }
        if let Some(tag) = close_tag_at(source, pos, end, lines) {
            pos = tag.span.end;
            tokens.push(TagToken::Close(tag));
            continue;
        }
        if let Some(tag) = open_tag_at(source, pos, end, lines) {
            pos = tag.span.end;
            tokens.push(TagToken::Open(tag));
            continue;
        }
        pos += 1;
    }

    tokens
}

fn scan_name(source: &str, start: usize, end: usize) -> Option<Range<usize>> {
    let name_end = source[start..end]
        .char_indices()
        .find(|(_, ch)| !is_tag_name_char(*ch))
        .map_or(end, |(idx, _)| start + idx);
    is_tag_name(&source[start..name_end]).then_some(start..name_end)
}

fn skip_whitespace(bytes: &[u8], mut pos: usize, end: usize) -> usize {
    while pos < end && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

fn close_tag_at(source: &str, pos: usize, end: usize, lines: &LineIndex) -> Option<CloseTag> {
    if !source[pos..end].starts_with("</") {
        return None;
    }
    let name_span = scan_name(source, pos + 2, end)?;
    let after = skip_whitespace(source.as_bytes(), name_span.end, end);
    if after >= end || source.as_bytes()[after] != b'>' {
        return None;
    }
    Some(CloseTag {
        span: pos..after + 1,
        name: source[name_span.clone()].to_string(),
        name_span,
        line: lines.line_of(pos),
    })
}

fn open_tag_at(source: &str, pos: usize, end: usize, lines: &LineIndex) -> Option<OpenTag> {
    let bytes = source.as_bytes();
    if pos >= end || bytes[pos] != b'<' {
        return None;
    }
    let name_span = scan_name(source, pos + 1, end)?;
    let mut cursor = name_span.end;
    if cursor >= end || !(bytes[cursor].is_ascii_whitespace() || matches!(bytes[cursor], b'>' | b'/'))
    {
        return None;
    }

    let mut attributes = Vec::new();
    loop {
        let attr_start = cursor;
        cursor = skip_whitespace(bytes, cursor, end);
        if cursor >= end {
            return None;
        }
        match bytes[cursor] {
            b'>' => {
                return Some(OpenTag {
                    span: pos..cursor + 1,
                    name: source[name_span.clone()].to_string(),
                    name_span,
                    attributes,
                    self_closing: false,
                    line: lines.line_of(pos),
                });
            }
            b'/' => {
                if cursor + 1 < end && bytes[cursor + 1] == b'>' {
                    return Some(OpenTag {
                        span: pos..cursor + 2,
                        name: source[name_span.clone()].to_string(),
                        name_span,
                        attributes,
                        self_closing: true,
                        line: lines.line_of(pos),
                    });
                }
                return None;
            }
            b'{' => {
                let value = braced_value_at(source, cursor, end, lines)?;
                cursor = value.span.end;
                attributes.push(Attribute {
                    span: attr_start..cursor,
                    name: None,
                    value: Some(value),
                });
            }
            _ => {
                let (attribute, next) = named_attribute_at(source, attr_start, cursor, end, lines)?;
                cursor = next;
                attributes.push(attribute);
            }
        }
    }
}

fn named_attribute_at(
    source: &str,
    attr_start: usize,
    name_start: usize,
    end: usize,
    lines: &LineIndex,
) -> Option<(Attribute, usize)> {
    let bytes = source.as_bytes();
    let mut name_end = name_start;
    while name_end < end
        && !bytes[name_end].is_ascii_whitespace()
        && !matches!(bytes[name_end], b'=' | b'>' | b'/' | b'{' | b'"' | b'\'' | b'<')
    {
        name_end += 1;
    }
    if name_end == name_start {
        return None;
    }
    let name = source[name_start..name_end].to_string();

    let after_name = skip_whitespace(bytes, name_end, end);
    if after_name >= end || bytes[after_name] != b'=' {
        return Some((
            Attribute {
                span: attr_start..name_end,
                name: Some(name),
                value: None,
            },
            name_end,
        ));
    }

    let value_start = skip_whitespace(bytes, after_name + 1, end);
    if value_start >= end {
        return None;
    }
    let value = match bytes[value_start] {
        quote @ (b'"' | b'\'') => {
            let close = source[value_start + 1..end].find(char::from(quote))? + value_start + 1;
            AttributeValue {
                kind: if quote == b'"' {
                    ValueKind::DoubleQuoted
                } else {
                    ValueKind::SingleQuoted
                },
                span: value_start..close + 1,
                content: value_start + 1..close,
                embedded: Vec::new(),
            }
        }
        b'{' => braced_value_at(source, value_start, end, lines)?,
        _ => {
            let mut value_end = value_start;
            while value_end < end
                && !bytes[value_end].is_ascii_whitespace()
                && bytes[value_end] != b'>'
            {
                value_end += 1;
            }
            if value_end == value_start {
                return None;
            }
            // `value=x/>` closes the tag rather than ending the value in `/`.
            if value_end < end && bytes[value_end] == b'>' && bytes[value_end - 1] == b'/' {
                value_end -= 1;
            }
            if value_end == value_start {
                return None;
            }
            AttributeValue {
                kind: ValueKind::Unquoted,
                span: value_start..value_end,
                content: value_start..value_end,
                embedded: Vec::new(),
            }
        }
    };
    let next = value.span.end;
    Some((
        Attribute {
            span: attr_start..next,
            name: Some(name),
            value: Some(value),
        },
        next,
    ))
}

fn braced_value_at(
    source: &str,
    start: usize,
    end: usize,
    lines: &LineIndex,
) -> Option<AttributeValue> {
    let close = matching_brace(source.as_bytes(), start, end)?;
    Some(AttributeValue {
        kind: ValueKind::Braced,
        span: start..close + 1,
        content: start + 1..close,
        embedded: scan_range(source, start + 1, close, lines),
    })
}

/// Index of the `}` closing the `{` at `start`, skipping string literals.
fn matching_brace(bytes: &[u8], start: usize, end: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    for (idx, &byte) in bytes.iter().enumerate().take(end).skip(start) {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == quote {
                in_string = None;
            }
            continue;
        }
        match byte {
            b'"' | b'\'' | b'`' => in_string = Some(byte),
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

// ── Element tree ───────────────────────────────────────────────────────

/// A paired opener/closer. Indices refer to the token slice given to
/// [`build_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    pub open: usize,
    pub close: Option<usize>,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostic {
    pub code: String,
    pub message: String,
    pub line: usize,
}

#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Pair openers with closers. Self-closing and void elements are leaves.
/// A closer that matches an element further up the stack implicitly closes
/// the elements above it; a closer matching nothing is reported and skipped.
#[must_use]
pub fn build_tree(tokens: &[TagToken]) -> (Vec<Element>, Vec<ScanDiagnostic>) {
    let mut roots = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut diagnostics = Vec::new();

    fn attach(stack: &mut [Element], roots: &mut Vec<Element>, element: Element) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => roots.push(element),
        }
    }

    for (idx, token) in tokens.iter().enumerate() {
        match token {
            TagToken::Open(tag) => {
                let element = Element {
                    name: tag.name.clone(),
                    open: idx,
                    close: None,
                    children: Vec::new(),
                };
                if tag.self_closing || is_void_element(&tag.name) {
                    attach(&mut stack, &mut roots, element);
                } else {
                    stack.push(element);
                }
            }
            TagToken::Close(tag) => {
                let Some(depth) = stack.iter().rposition(|open| open.name == tag.name) else {
                    diagnostics.push(ScanDiagnostic {
                        code: "MS002".to_string(),
                        message: format!("closing tag </{}> has no matching opener", tag.name),
                        line: tag.line,
                    });
                    continue;
                };
                while stack.len() > depth + 1 {
                    if let Some(unclosed) = stack.pop() {
                        diagnostics.push(unclosed_diagnostic(&unclosed, tokens));
                        attach(&mut stack, &mut roots, unclosed);
                    }
                }
                if let Some(mut element) = stack.pop() {
                    element.close = Some(idx);
                    attach(&mut stack, &mut roots, element);
                }
            }
        }
    }

    while let Some(unclosed) = stack.pop() {
        diagnostics.push(unclosed_diagnostic(&unclosed, tokens));
        attach(&mut stack, &mut roots, unclosed);
    }

    (roots, diagnostics)
}

/// Balance the whole buffer, including tags embedded in `{…}` values, and
/// return every diagnostic in document order.
#[must_use]
pub fn diagnose(source: &str) -> Vec<ScanDiagnostic> {
    let mut diagnostics = Vec::new();
    collect_diagnostics(&scan(source), &mut diagnostics);
    diagnostics.sort_by_key(|diagnostic| diagnostic.line);
    diagnostics
}

fn collect_diagnostics(tokens: &[TagToken], out: &mut Vec<ScanDiagnostic>) {
    out.extend(build_tree(tokens).1);
    for token in tokens {
        if let TagToken::Open(tag) = token {
            for value in tag.attributes.iter().filter_map(|a| a.value.as_ref()) {
                if !value.embedded.is_empty() {
                    collect_diagnostics(&value.embedded, out);
                }
            }
        }
    }
}

/// Visit every opening and closing tag, descending into braced values.
pub fn walk<'a>(tokens: &'a [TagToken], visit: &mut impl FnMut(&'a TagToken)) {
    for token in tokens {
        visit(token);
        if let TagToken::Open(tag) = token {
            for value in tag.attributes.iter().filter_map(|a| a.value.as_ref()) {
                walk(&value.embedded, visit);
            }
        }
    }
}

fn unclosed_diagnostic(element: &Element, tokens: &[TagToken]) -> ScanDiagnostic {
    let line = match &tokens[element.open] {
        TagToken::Open(tag) => tag.line,
        TagToken::Close(tag) => tag.line,
    };
    ScanDiagnostic {
        code: "MS001".to_string(),
        message: format!("<{}> is never closed", element.name),
        line,
    }
}
