//! Span edits over a text buffer.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

impl Edit {
    #[must_use]
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            range,
            replacement: replacement.into(),
        }
    }

    fn delta(&self) -> isize {
        self.replacement.len() as isize - self.range.len() as isize
    }
}

/// Apply non-overlapping edits and return the new buffer. `offsets` (byte
/// positions in `text`) are rewritten to the matching positions in the
/// result; an offset inside an edited range moves to the start of its
/// replacement.
pub fn apply(text: &str, mut edits: Vec<Edit>, offsets: &mut [usize]) -> String {
    edits.sort_by_key(|edit| (edit.range.start, edit.range.end));
    remap_sorted(offsets, &edits);

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for edit in &edits {
        if edit.range.start < last {
            continue;
        }
        out.push_str(&text[last..edit.range.start]);
        out.push_str(&edit.replacement);
        last = edit.range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Remap every offset in one sweep over the sorted edits.
fn remap_sorted(offsets: &mut [usize], edits: &[Edit]) {
    let mut order: Vec<usize> = (0..offsets.len()).collect();
    order.sort_by_key(|&idx| offsets[idx]);

    let mut next = 0;
    let mut delta = 0isize;
    for idx in order {
        let offset = offsets[idx];
        while let Some(edit) = edits.get(next) {
            if edit.range.start < offset && edit.range.end <= offset {
                delta += edit.delta();
                next += 1;
            } else {
                break;
            }
        }
        offsets[idx] = match edits.get(next) {
            Some(edit) if edit.range.start <= offset && offset < edit.range.end => {
                (edit.range.start as isize + delta) as usize
            }
            _ => (offset as isize + delta) as usize,
        };
    }
}
