//! Output formatting: table, JSON, YAML, plain.
//!
//! Every listing command renders through here so `--output` behaves the same
//! everywhere: tables via `tabled`, structured formats via serde, plain as
//! one identifier per line for scripting.

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Render a list of items in the chosen format.
///
/// `to_row` feeds the table renderer; `id_fn` produces the plain-format
/// identifier. Structured formats serialize the original items, not the
/// table rows, so scripts see full field names.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Table::new(&rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
        structured => render_structured(structured, data),
    }
}

/// Render a single item in the chosen format.
///
/// Detail views are pre-formatted strings rather than `Tabled` rows, so the
/// table arm delegates to `detail_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Plain => id_fn(data),
        structured => render_structured(structured, data),
    }
}

/// Print rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Structured formats ───────────────────────────────────────────────

fn render_structured<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    match format {
        OutputFormat::Json => render_json_pretty(data),
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).expect("serialization should not fail")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).expect("serialization should not fail")
        }
        // Table and Plain are handled by the callers.
        OutputFormat::Table | OutputFormat::Plain => String::new(),
    }
}

/// Pretty-printed JSON, also used directly for bulk-operation results.
pub(crate) fn render_json_pretty<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_json::to_string_pretty(data).expect("serialization should not fail")
}
