//! End-to-end conversion scenarios through the public library API.

use std::time::{Duration, Instant};

use markup_migrate::tables::{
    ClassMapping, ClassMappingTable, StyleValue, TagMap, TagMapping, VariantRules,
};
use markup_migrate::tag_substitution::SubstitutionEngine;
use markup_migrate::{ConversionTables, ConvertOptions, convert};

fn convert_builtin(source: &str) -> String {
    convert(source, &ConversionTables::builtin(), &ConvertOptions::default())
        .expect("convert")
        .module
}

#[test]
fn card_markup_converts_to_box_wrapping_heading() {
    let module = convert_builtin(
        r#"<div class="p-4 bg-white rounded-lg"><h1 class="text-2xl">Hello</h1></div>"#,
    );
    let squashed: String = module.split_whitespace().collect::<Vec<_>>().join(" ");
    assert!(squashed.contains(
        r#"<Box sx={{ p: 2, bgcolor: "background.paper", borderRadius: 2 }}><Typography variant="h1" sx={{ fontSize: "1.5rem" }}>Hello</Typography></Box>"#
    ));
}

#[test]
fn multi_line_markup_is_indented_inside_the_return() {
    let module = convert_builtin(
        "<main>\n  <article class=\"p-6\">\n    <p>Body</p>\n  </article>\n</main>\n",
    );
    assert!(module.contains(
        "  return (\n    <Container>\n      <Paper sx={{ p: 3 }}>\n        <Typography variant=\"body1\">Body</Typography>\n      </Paper>\n    </Container>\n  );"
    ));
}

#[test]
fn converting_output_again_wraps_it_a_second_time() {
    let tables = ConversionTables::builtin();
    let options = ConvertOptions::default();
    let once = convert("<div>x</div>", &tables, &options).expect("first run").module;
    let twice = convert(&once, &tables, &options).expect("second run").module;

    assert_eq!(twice.matches("} from '@mui/material';").count(), 2);
    assert_eq!(twice.matches("export default V0Component;").count(), 2);
    assert_eq!(
        twice.matches("const V0Component: React.FC<ComponentProps>").count(),
        2
    );
}

#[test]
fn heading_and_paragraph_variants() {
    let module = convert_builtin(r#"<h2 class="text-xl">Title</h2><p class="text-sm">Text</p>"#);
    assert!(module.contains(
        r#"<Typography variant="h2" sx={{ fontSize: "1.25rem" }}>Title</Typography>"#
    ));
    assert!(module.contains(
        r#"<Typography variant="body1" sx={{ fontSize: "0.875rem" }}>Text</Typography>"#
    ));
}

#[test]
fn authored_variant_survives_conversion() {
    let module = convert_builtin(r#"<h2 variant="overline" class="mb-2">Kicker</h2>"#);
    assert!(module.contains(
        r#"<Typography variant="overline" sx={{ mb: 1 }}>Kicker</Typography>"#
    ));
    assert_eq!(module.matches("variant=").count(), 1);
}

#[test]
fn injected_tables_drive_every_stage() {
    let tables = ConversionTables {
        classes: ClassMappingTable::new(vec![
            ClassMapping {
                token: "elevated".into(),
                property: "boxShadow".into(),
                value: StyleValue::Number(4.0),
            },
            ClassMapping {
                token: "muted".into(),
                property: "color".into(),
                value: StyleValue::Text("text.disabled".into()),
            },
        ])
        .expect("classes"),
        tags: TagMap::new(vec![
            TagMapping {
                source: "aside".into(),
                target: "Drawer".into(),
            },
            TagMapping {
                source: "small".into(),
                target: "Text".into(),
            },
        ])
        .expect("tags"),
        variants: VariantRules {
            component: "Text".into(),
            fallback: "caption".into(),
            by_tag: Default::default(),
        },
    };
    let result = convert(
        r#"<aside class="elevated p-4"><small class="muted">v1</small><div>kept</div></aside>"#,
        &tables,
        &ConvertOptions::default(),
    )
    .expect("convert");

    assert_eq!(
        result.body,
        r#"<Drawer sx={{ boxShadow: 4 }}><Text variant="caption" sx={{ color: "text.disabled" }}>v1</Text><div>kept</div></Drawer>"#
    );
    assert!(result.module.contains("  Drawer,\n  Text,\n} from '@mui/material';"));
}

#[test]
fn attribute_runs_survive_substitution_verbatim() {
    let module = convert_builtin(
        r#"<button type="submit" onClick={() => save({ id: 1 })} disabled>Save</button>"#,
    );
    assert!(module.contains(
        r#"<Button type="submit" onClick={() => save({ id: 1 })} disabled>Save</Button>"#
    ));
}

#[test]
fn lexical_engine_rewrites_tag_text_inside_attribute_values() {
    let options = ConvertOptions {
        engine: SubstitutionEngine::Lexical,
        ..ConvertOptions::default()
    };
    let source = r#"<span title="<div>">tip</span>"#;
    let lexical = convert(source, &ConversionTables::builtin(), &options).expect("lexical");
    assert!(lexical.body.contains(r#"title="<Box>""#));

    let structural = convert(source, &ConversionTables::builtin(), &ConvertOptions::default())
        .expect("structural");
    assert!(structural.body.contains(r#"title="<div>""#));
}

#[test]
fn empty_input_still_yields_a_module() {
    let result = convert("", &ConversionTables::builtin(), &ConvertOptions::default())
        .expect("convert");
    assert!(result.body.is_empty());
    assert!(result.module.contains("  return (\n  );"));
}

#[test]
fn large_inputs_convert_in_linear_time() {
    let source = "<p>x</p>\n".repeat(20_000);
    for engine in [SubstitutionEngine::Structural, SubstitutionEngine::Lexical] {
        let options = ConvertOptions {
            engine,
            ..ConvertOptions::default()
        };
        let started = Instant::now();
        let result = convert(&source, &ConversionTables::builtin(), &options).expect("convert");
        let elapsed = started.elapsed();

        assert_eq!(result.stats.openings_substituted, 20_000);
        assert_eq!(result.stats.closings_substituted, 20_000);
        assert_eq!(result.stats.variants_injected.len(), 20_000);
        assert_eq!(result.stats.variants_injected[19_999].line, 20_000);
        assert!(
            elapsed < Duration::from_secs(10),
            "{} engine took {elapsed:?} for 20k tags",
            engine.as_str()
        );
    }
}
