//! Renderers for command results.
//!
//! Every subcommand hands back a `serde_json::Value`; `--output` only decides
//! how that value reaches stdout.

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

pub fn emit(format: &OutputFormat, value: &Value) {
    let render: fn(&Value) = match format {
        OutputFormat::Json => json::print_json,
        OutputFormat::Table => table::print_table,
        OutputFormat::Csv => csv_out::print_csv,
        OutputFormat::Minimal => minimal::print_minimal,
    };
    tracing::debug!(?format, "rendering result");
    render(value);
}
