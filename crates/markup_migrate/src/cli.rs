use std::path::{Path, PathBuf};

use clap::Parser;

use crate::assembler::DEFAULT_COMPONENT_NAME;
use crate::error::{MigrateError, Result};
use crate::pipeline::{ConversionResult, ConvertOptions, convert};
use crate::tables::ConversionTables;
use crate::tag_substitution::SubstitutionEngine;
use crate::util::{
    CliOutput, OutputIntegration, ensure_input_file, now_utc_iso, output_for, read_input,
    resolve_path, sha256_hex, write_string,
};

const NEXT_STEPS: [&str; 4] = [
    "1. Review the converted component",
    "2. Add proper TypeScript interfaces",
    "3. Wire the component to your data and API services",
    "4. Test responsive behavior",
];

#[derive(Debug, Parser)]
#[command(
    name = "markup_migrate",
    about = "Convert utility-class HTML/JSX markup into a Material UI component module",
    version
)]
pub struct Cli {
    /// Markup file to convert.
    pub input: Option<PathBuf>,

    /// Destination of the generated module (created or overwritten).
    pub output: Option<PathBuf>,

    /// Tag substitution engine.
    #[arg(long, value_enum, default_value_t = SubstitutionEngine::Structural)]
    pub engine: SubstitutionEngine,

    /// JSON file replacing the builtin class, tag and variant tables.
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Name of the generated component.
    #[arg(long, default_value = DEFAULT_COMPONENT_NAME)]
    pub component_name: String,

    /// Positionals after the output path are accepted and ignored.
    #[arg(hide = true)]
    pub extra: Vec<String>,
}

#[must_use]
pub fn usage() -> String {
    [
        "Usage: markup_migrate <input-file> <output-file>",
        "Example: markup_migrate v0-component.jsx converted-component.tsx",
    ]
    .join("\n")
}

pub fn run_from_env() -> Result<()> {
    let cli = parse_args(std::env::args_os())?;
    run(cli)
}

/// Parse the command line. `--help` and `--version` print and exit 0; every
/// other parse failure becomes a usage error so the process exits 1.
pub fn parse_args<I, T>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(error) if !error.use_stderr() => error.exit(),
        Err(_) => Err(MigrateError::Usage { usage: usage() }),
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let integration = OutputIntegration::detect();
    run_with_integration(cli, &integration)
}

fn run_with_integration(cli: Cli, integration: &OutputIntegration) -> Result<()> {
    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        return Err(MigrateError::Usage { usage: usage() });
    };
    let ui = output_for(integration);

    let input_path = ensure_input_file(&input)?;
    let output_path = resolve_path(&output)?;
    let tables = match &cli.tables {
        Some(path) => ConversionTables::load(path)?,
        None => ConversionTables::builtin(),
    };
    let options = ConvertOptions {
        engine: cli.engine,
        component_name: cli.component_name,
    };

    let source = read_input(&input_path)?;
    let result = convert(&source, &tables, &options)?;
    write_string(&output_path, &result.module)?;

    report_human(&ui, &input, &output, &result);

    if integration.should_emit_json() {
        println!(
            "{}",
            serde_json::json!({
                "command": "convert",
                "status": "ok",
                "input": input_path.display().to_string(),
                "output": output_path.display().to_string(),
                "input_sha256": sha256_hex(&source),
                "engine": result.engine.as_str(),
                "component_name": result.component_name,
                "tables": cli.tables.as_ref().map(|path| path.display().to_string()),
                "generated_at": now_utc_iso(),
                "stats": result.stats,
                "diagnostics": result.diagnostics,
                "integration": integration,
            })
        );
    }

    Ok(())
}

fn report_human(ui: &CliOutput, input: &Path, output: &Path, result: &ConversionResult) {
    for diagnostic in &result.diagnostics {
        ui.warning(&format!(
            "{} line {}: {}",
            diagnostic.code, diagnostic.line, diagnostic.message
        ));
    }
    let unmapped = &result.stats.classes.tokens_unmapped;
    if !unmapped.is_empty() {
        let tokens: Vec<&str> = unmapped.keys().map(String::as_str).collect();
        ui.warning(&format!(
            "{} class token(s) had no mapping and were dropped: {}",
            tokens.len(),
            tokens.join(" ")
        ));
    }

    ui.success(&format!(
        "Successfully converted {} to {}",
        input.display(),
        output.display()
    ));
    ui.rule(Some("Next steps"));
    for step in NEXT_STEPS {
        ui.info(step);
    }
}
