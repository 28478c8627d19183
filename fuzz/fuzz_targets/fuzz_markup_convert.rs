#![no_main]

use markup_migrate::tag_substitution::{SubstitutionEngine, TagKind, substitute_tags};
use markup_migrate::{ConversionTables, ConvertOptions, convert};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let engine = if selector & 1 == 0 {
        SubstitutionEngine::Structural
    } else {
        SubstitutionEngine::Lexical
    };
    let tables = ConversionTables::builtin();

    // Provenance offsets must land on the renamed tag in either engine.
    let buffer = substitute_tags(text, &tables.tags, engine).expect("builtin patterns compile");
    for record in &buffer.records {
        let prefix = match record.kind {
            TagKind::Opening => format!("<{}", record.target),
            TagKind::Closing => format!("</{}", record.target),
        };
        assert!(buffer.text[record.offset..].starts_with(&prefix));
    }

    // The full pipeline never fails on text input.
    let options = ConvertOptions {
        engine,
        ..ConvertOptions::default()
    };
    let result = convert(text, &tables, &options).expect("conversion of valid UTF-8");
    assert!(result.module.ends_with("export default V0Component;\n"));
});
