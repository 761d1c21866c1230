mod describe;
mod table;

pub use describe::render_describe;
pub use table::{format_age, render_table};

use crate::cli::OutputFormat;
use crate::record::ResourceRecord;

/// Render a list of records in the requested format.
///
/// `with_namespace` prepends a NAMESPACE column in table mode (the
/// `--all-namespaces` presentation).
pub fn render_records(
    records: &[ResourceRecord],
    format: &OutputFormat,
    with_namespace: bool,
) -> String {
    match format {
        OutputFormat::Table => render_table(records, with_namespace),
        OutputFormat::Json => {
            let values: Vec<_> = records.iter().map(|r| r.value()).collect();
            serde_json::to_string_pretty(&values).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Yaml => {
            let values: Vec<_> = records.iter().map(|r| r.value()).collect();
            serde_yaml::to_string(&values).unwrap_or_else(|_| "[]\n".to_string())
        }
    }
}
