#![no_main]

use markup_migrate::markup_scanner::{TagToken, diagnose, scan, walk};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process valid UTF-8.
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Scanning must never panic.
    let tokens = scan(text);

    // Every span is in bounds, starts at '<' and covers its name.
    let mut last_start = 0;
    walk(&tokens, &mut |token| {
        let span = token.span();
        assert!(span.start < span.end);
        assert!(span.end <= text.len());
        assert_eq!(text.as_bytes()[span.start], b'<');
        let name_span = match token {
            TagToken::Open(tag) => &tag.name_span,
            TagToken::Close(tag) => &tag.name_span,
        };
        assert!(span.start < name_span.start && name_span.end <= span.end);
        assert_eq!(&text[name_span.clone()], token.name());
        // Document order, embedded tags included.
        assert!(span.start >= last_start);
        last_start = span.start;
    });

    // Diagnostics are sorted and point at real lines.
    let line_count = text.lines().count().max(1);
    let diagnostics = diagnose(text);
    for pair in diagnostics.windows(2) {
        assert!(pair[0].line <= pair[1].line);
    }
    for diagnostic in &diagnostics {
        assert!(diagnostic.line >= 1 && diagnostic.line <= line_count + 1);
    }
});
