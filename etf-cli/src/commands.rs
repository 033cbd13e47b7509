// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use chrono::{DateTime, Utc};
use console::style;
use etf_core::{extract, ExtractOptions, ExtractResult, Extractor, ResultRecord};
use etf_providers::{local, LocalConfig};
use std::path::PathBuf;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

/// Format a timestamp for display
fn format_time(dt: Option<DateTime<Utc>>) -> String {
    dt.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Format file size
fn format_size(size: Option<u64>) -> String {
    size.map(|s| bytesize::ByteSize(s).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn to_row(record: &ResultRecord) -> FileRow {
    FileRow {
        path: record.full_path().unwrap_or("-").to_string(),
        name: record.name().to_string(),
        size: format_size(record.file.size()),
        modified: format_time(record.file.metadata.modified),
    }
}

/// Render records as JSON lines or as a table
fn render_records(records: &[ResultRecord], json: bool) -> ExtractResult<String> {
    if json {
        let mut out = String::new();
        for record in records {
            let line = serde_json::to_string(&record.summary()).map_err(std::io::Error::from)?;
            out.push_str(&line);
            out.push('\n');
        }
        return Ok(out);
    }

    if records.is_empty() {
        return Ok(format!("{}\n", style("No files").dim()));
    }

    let rows: Vec<FileRow> = records.iter().map(to_row).collect();
    Ok(format!(
        "{}\n{}\n",
        Table::new(rows),
        style(format!("{} file(s)", records.len())).dim()
    ))
}

fn print_records(records: &[ResultRecord], json: bool) -> ExtractResult<()> {
    print!("{}", render_records(records, json)?);
    Ok(())
}

/// Drop local paths and print the extracted files
pub async fn drop_paths(
    paths: &[PathBuf],
    options: ExtractOptions,
    config: LocalConfig,
    json: bool,
) -> ExtractResult<()> {
    let event = local::drop_event(paths, config).await?;
    let records = Extractor::new(options).extract(event).await?;
    print_records(&records, json)
}

/// Select local files and print the extracted files
pub async fn change_paths(paths: &[PathBuf], json: bool) -> ExtractResult<()> {
    let event = local::change_event(paths).await?;
    let records = extract(event).await?;
    print_records(&records, json)
}
