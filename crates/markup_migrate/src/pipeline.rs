// SPDX-License-Identifier: Apache-2.0
//! Conversion pipeline.
//!
//! read → map classes → substitute tags → infer variants → assemble. Each
//! stage is a pure function of its input buffer and the injected tables, so
//! the whole conversion is deterministic for a given (source, tables,
//! options) triple.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::assembler::{self, DEFAULT_COMPONENT_NAME};
use crate::class_rewrite::{self, ClassRewriteStats};
use crate::error::{MigrateError, Result};
use crate::markup_scanner::{self, ScanDiagnostic};
use crate::tables::ConversionTables;
use crate::tag_substitution::{self, SubstitutionEngine, TagKind};
use crate::variant_inference::{self, InjectedVariant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub engine: SubstitutionEngine,
    pub component_name: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            engine: SubstitutionEngine::default(),
            component_name: DEFAULT_COMPONENT_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    pub classes: ClassRewriteStats,
    pub openings_substituted: usize,
    pub closings_substituted: usize,
    /// Original element → substituted opening tags.
    pub substituted_by_source: BTreeMap<String, usize>,
    pub variants_injected: Vec<InjectedVariant>,
    pub variants_kept: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub engine: SubstitutionEngine,
    pub component_name: String,
    /// Transformed markup before module assembly.
    pub body: String,
    /// Complete module text.
    pub module: String,
    pub stats: ConversionStats,
    /// Balance problems found in the input markup.
    pub diagnostics: Vec<ScanDiagnostic>,
}

pub fn convert(
    source: &str,
    tables: &ConversionTables,
    options: &ConvertOptions,
) -> Result<ConversionResult> {
    if !assembler::is_component_name(&options.component_name) {
        return Err(MigrateError::invalid(format!(
            "component name must be a capitalized identifier: {:?}",
            options.component_name
        )));
    }

    let diagnostics = markup_scanner::diagnose(source);

    let rewritten =
        class_rewrite::rewrite_class_attributes(source, &tables.classes, options.engine)?;
    let substituted =
        tag_substitution::substitute_tags(&rewritten.text, &tables.tags, options.engine)?;
    let variants = variant_inference::infer_variants(
        &substituted.text,
        &substituted.records,
        &tables.variants,
    );

    let mut stats = ConversionStats {
        classes: rewritten.stats,
        variants_kept: variants.kept_existing,
        ..ConversionStats::default()
    };
    for record in &substituted.records {
        match record.kind {
            TagKind::Opening => {
                stats.openings_substituted += 1;
                *stats
                    .substituted_by_source
                    .entry(record.original.clone())
                    .or_default() += 1;
            }
            TagKind::Closing => stats.closings_substituted += 1,
        }
    }
    stats.variants_injected = variants.injected;

    let module =
        assembler::assemble_module(&variants.text, &tables.tags, &options.component_name);

    Ok(ConversionResult {
        engine: options.engine,
        component_name: options.component_name.clone(),
        body: variants.text,
        module,
        stats,
        diagnostics,
    })
}
