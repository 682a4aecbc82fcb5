//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, Write};
use std::time::Duration;

use tabled::{Table, Tabled, settings::Style};

use hydrawise_api::Timestamp;

use crate::cli::OutputFormat;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list: `Tabled` rows for tables, ids for plain, serde otherwise.
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
            Table::new(rows).with(Style::rounded()).to_string()
        }
        OutputFormat::Plain => data.iter().map(id_fn).collect::<Vec<_>>().join("\n"),
        structured => render_structured(structured, data),
    }
}

/// Render one item; detail views format their own table text.
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

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a confirmation line to stderr unless `--quiet`.
pub fn notice(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

// ── Value formatting ─────────────────────────────────────────────────

pub fn format_time(t: &Timestamp) -> String {
    t.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn format_seconds(secs: i64) -> String {
    u64::try_from(secs).map_or_else(
        |_| secs.to_string(),
        |s| humantime::format_duration(Duration::from_secs(s)).to_string(),
    )
}

// ── Serde renderers ──────────────────────────────────────────────────

fn render_structured<T: serde::Serialize + ?Sized>(format: &OutputFormat, data: &T) -> String {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(data).expect("domain types serialize to YAML"),
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).expect("domain types serialize to JSON")
        }
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Plain => {
            serde_json::to_string_pretty(data).expect("domain types serialize to JSON")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[derive(serde::Serialize, Tabled)]
    struct Item {
        id: i64,
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 5, name: "Lawn" }, Item { id: 6, name: "Beds" }]
    }

    fn row(item: &Item) -> Item {
        Item {
            id: item.id,
            name: item.name,
        }
    }

    fn id(item: &Item) -> String {
        item.id.to_string()
    }

    #[test]
    fn plain_lists_one_id_per_line() {
        let out = render_list(&OutputFormat::Plain, &items(), row, id);
        assert_eq!(out, "5\n6");
    }

    #[test]
    fn structured_formats_use_serde() {
        let compact = render_list(&OutputFormat::JsonCompact, &items(), row, id);
        assert_eq!(compact, r#"[{"id":5,"name":"Lawn"},{"id":6,"name":"Beds"}]"#);

        let yaml = render_single(&OutputFormat::Yaml, &items()[0], |_| String::new(), id);
        assert_eq!(yaml, "id: 5\nname: Lawn\n");
    }

    #[test]
    fn seconds_are_humanized() {
        assert_eq!(format_seconds(90), "1m 30s");
        assert_eq!(format_seconds(-1), "-1");
    }

    #[test]
    fn times_are_utc() {
        let Some(t) = Utc.with_ymd_and_hms(2024, 2, 29, 6, 5, 0).single() else {
            panic!("valid date");
        };
        assert_eq!(format_time(&t), "2024-02-29 06:05:00 UTC");
    }
}
