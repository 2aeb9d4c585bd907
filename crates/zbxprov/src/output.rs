//! Output formatting: table, JSON, YAML, plain, plus progress lines.
//!
//! Reports render to stdout in the format selected by `--output`. Table
//! uses `tabled`, structured formats use serde, plain emits one name per
//! line. Progress lines stream to stderr while a run is in flight.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use zbxprov_core::{ItemReport, Outcome};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Outcome label padded for alignment, colored by severity.
fn status_word(outcome: &Outcome, color: bool) -> String {
    let label = format!("{:<9}", outcome.label());
    if !color {
        return label;
    }
    match outcome {
        Outcome::Created { .. } | Outcome::Replaced { .. } => label.green().to_string(),
        Outcome::Existing { .. } | Outcome::Unchanged { .. } => label.dimmed().to_string(),
        Outcome::Planned { .. } => label.cyan().to_string(),
        Outcome::Skipped { .. } => label.yellow().to_string(),
        Outcome::Failed { .. } => label.red().bold().to_string(),
    }
}

// ── Progress ─────────────────────────────────────────────────────────

/// Streams one stderr line per step and per finished item.
pub struct Progress {
    color: bool,
    quiet: bool,
}

impl Progress {
    pub fn new(color: bool, quiet: bool) -> Self {
        Self { color, quiet }
    }

    pub fn step(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{}", message.bold());
        } else {
            eprintln!("{message}");
        }
    }

    pub fn item(&self, item: &ItemReport) {
        if self.quiet {
            return;
        }
        eprintln!(
            "  {} {} {}",
            status_word(&item.outcome, self.color),
            item.name,
            item.outcome.detail()
        );
    }

    pub fn note(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {message}");
        }
    }

    pub fn done(&self, banner: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("\n{}", banner.green().bold());
        } else {
            eprintln!("\n{banner}");
        }
    }
}

// ── Report table rows ────────────────────────────────────────────────

#[derive(Tabled)]
pub struct ItemRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&ItemReport> for ItemRow {
    fn from(item: &ItemReport) -> Self {
        Self {
            kind: item.kind.to_string(),
            name: item.name.clone(),
            status: item.outcome.label(),
            detail: item.outcome.detail(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted string.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Render item reports: a table of every item, or the structured `whole`
/// report for serde formats.
pub fn render_report<T: serde::Serialize>(
    format: OutputFormat,
    whole: &T,
    items: &[&ItemReport],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table if items.is_empty() => Ok(String::new()),
        OutputFormat::Table => {
            let rows: Vec<ItemRow> = items.iter().map(|i| ItemRow::from(*i)).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(items
            .iter()
            .map(|i| format!("{}\t{}", i.name, i.outcome.label()))
            .collect::<Vec<_>>()
            .join("\n")),
        other => render_single(other, whole, |_| String::new(), |_| String::new()),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}
