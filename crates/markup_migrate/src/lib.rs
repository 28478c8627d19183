#![forbid(unsafe_code)]

pub mod assembler;
pub mod class_rewrite;
pub mod cli;
pub mod error;
pub mod markup_scanner;
pub mod pipeline;
pub mod splice;
pub mod style_mapper;
pub mod tables;
pub mod tag_substitution;
pub mod util;
pub mod variant_inference;

pub use cli::run_from_env;
pub use error::{MigrateError, Result};
pub use pipeline::{ConversionResult, ConvertOptions, convert};
pub use tables::ConversionTables;
