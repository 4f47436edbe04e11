//! Writing victim lists to JSON or CSV files.

use chrono::{DateTime, Local};
use color_eyre::{eyre::eyre, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::types::{display_value, Victim};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
  Json,
  Csv,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      ExportFormat::Json => "json",
      ExportFormat::Csv => "csv",
    }
  }
}

impl fmt::Display for ExportFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.extension().to_uppercase())
  }
}

/// `victims_<YYYYmmddHHMMSS>.<ext>` for the given local time.
pub fn file_name(format: ExportFormat, at: DateTime<Local>) -> String {
  format!("victims_{}.{}", at.format("%Y%m%d%H%M%S"), format.extension())
}

/// Write `victims` into `dir` and return the path of the new file.
pub fn export(victims: &[&Victim], format: ExportFormat, dir: &Path) -> Result<PathBuf> {
  std::fs::create_dir_all(dir)
    .map_err(|e| eyre!("Failed to create export directory {}: {}", dir.display(), e))?;

  let path = dir.join(file_name(format, Local::now()));
  let contents = match format {
    ExportFormat::Json => to_json(victims)?,
    ExportFormat::Csv => to_csv(victims),
  };

  std::fs::write(&path, contents)
    .map_err(|e| eyre!("Failed to write {}: {}", path.display(), e))?;

  info!(path = %path.display(), count = victims.len(), %format, "exported victims");
  Ok(path)
}

/// Pretty-printed JSON array with two-space indentation.
pub fn to_json(victims: &[&Victim]) -> Result<String> {
  serde_json::to_string_pretty(victims).map_err(|e| eyre!("Failed to serialize victims: {}", e))
}

/// CSV with a header row made of every field seen, in first-seen order.
///
/// Missing fields are left empty; nested values are written as JSON.
pub fn to_csv(victims: &[&Victim]) -> String {
  let mut columns: Vec<&str> = Vec::new();
  for victim in victims {
    for key in victim.fields().keys() {
      if !columns.contains(&key.as_str()) {
        columns.push(key);
      }
    }
  }

  if columns.is_empty() {
    return String::new();
  }

  let mut out = String::new();
  push_row(&mut out, columns.iter().map(|c| c.to_string()));
  for victim in victims {
    push_row(
      &mut out,
      columns.iter().map(|c| {
        victim
          .fields()
          .get(*c)
          .map(display_value)
          .unwrap_or_default()
      }),
    );
  }
  out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
  let row: Vec<String> = cells.map(|cell| escape_cell(&cell)).collect();
  out.push_str(&row.join(","));
  out.push_str("\r\n");
}

/// Quote a cell if it contains a delimiter, quote or line break.
fn escape_cell(cell: &str) -> String {
  if cell.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", cell.replace('"', "\"\""))
  } else {
    cell.to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;

  fn victims() -> Vec<Victim> {
    vec![
      serde_json::from_value(json!({"victim": "Acme, Inc.", "group": "akira"})).unwrap(),
      serde_json::from_value(json!({"victim": "Say \"hi\"", "country": "FR", "press": ["a"]}))
        .unwrap(),
    ]
  }

  #[test]
  fn test_file_name() {
    let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
    assert_eq!(file_name(ExportFormat::Json, at), "victims_20240309140507.json");
    assert_eq!(file_name(ExportFormat::Csv, at), "victims_20240309140507.csv");
  }

  #[test]
  fn test_csv_union_header_and_quoting() {
    let all = victims();
    let refs: Vec<&Victim> = all.iter().collect();
    let csv = to_csv(&refs);
    let lines: Vec<&str> = csv.split("\r\n").collect();

    assert_eq!(lines[0], "victim,group,country,press");
    assert_eq!(lines[1], "\"Acme, Inc.\",akira,,");
    assert_eq!(lines[2], "\"Say \"\"hi\"\"\",,FR,\"[\"\"a\"\"]\"");
    assert_eq!(lines[3], "");
  }

  #[test]
  fn test_csv_empty() {
    assert_eq!(to_csv(&[]), "");
  }

  #[test]
  fn test_export_json_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let all = victims();
    let refs: Vec<&Victim> = all.iter().collect();

    let path = export(&refs, ExportFormat::Json, &dir.path().join("out")).unwrap();
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("victims_"));
    assert!(name.ends_with(".json"));

    let written: serde_json::Value =
      serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written[0]["victim"], "Acme, Inc.");
    assert_eq!(written.as_array().unwrap().len(), 2);
  }

  #[test]
  fn test_export_csv_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let all = victims();
    let refs: Vec<&Victim> = all.iter().take(1).collect();

    let path = export(&refs, ExportFormat::Csv, dir.path()).unwrap();
    assert_eq!(
      std::fs::read_to_string(path).unwrap(),
      "victim,group\r\n\"Acme, Inc.\",akira\r\n"
    );
  }

  #[test]
  fn test_json_indent() {
    let all = victims();
    let refs: Vec<&Victim> = all.iter().take(1).collect();
    assert!(to_json(&refs).unwrap().contains("\n    \"victim\""));
  }
}
