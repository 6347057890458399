//! Output formatting for resolution results (JSON, CSV, console).

use crate::dictionary::DictionaryStats;
use crate::models::{MatchMethod, Resolution, ResolveSummary, ResolverParams};
use crate::store::ApplyReport;
use crate::vocabulary::VocabularyEntry;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One resolved (or unresolved) surface form, flattened for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRow {
    pub surface: String,
    pub matched: bool,
    pub method: Option<MatchMethod>,
    pub lookup: Option<String>,
    pub entry_id: Option<String>,
    pub headword: Option<String>,
    pub stem: Option<String>,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
    pub analysis: Option<String>,
}

impl ResolutionRow {
    pub fn new(surface: &str, resolution: &Resolution<'_>) -> Self {
        match resolution {
            Resolution::Matched(m) => Self {
                surface: surface.to_string(),
                matched: true,
                method: Some(m.method),
                lookup: Some(m.lookup.as_str().to_string()),
                entry_id: Some(m.entry.entry_id.clone()).filter(|id| !id.is_empty()),
                headword: Some(m.entry.headword.clone()),
                stem: Some(m.stem.clone()),
                prefixes: m.stripped_prefixes.iter().map(|a| a.form.clone()).collect(),
                suffixes: m.stripped_suffixes.iter().map(|a| a.form.clone()).collect(),
                analysis: Some(m.analysis()),
            },
            Resolution::Unresolved => Self {
                surface: surface.to_string(),
                matched: false,
                method: None,
                lookup: None,
                entry_id: None,
                headword: None,
                stem: None,
                prefixes: Vec::new(),
                suffixes: Vec::new(),
                analysis: None,
            },
        }
    }
}

/// Full report of a resolve run
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub version: String,
    pub dictionary: DictionaryStats,
    pub parameters: ResolverParams,
    pub summary: ResolveSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<ApplyReport>,
    pub words: Vec<ResolutionRow>,
}

impl ResolutionReport {
    pub fn new<S: AsRef<str>>(
        dictionary: DictionaryStats,
        parameters: ResolverParams,
        summary: ResolveSummary,
        words: &[S],
        resolutions: &[Resolution<'_>],
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            dictionary,
            parameters,
            summary,
            store: None,
            words: words
                .iter()
                .zip(resolutions)
                .map(|(word, resolution)| ResolutionRow::new(word.as_ref(), resolution))
                .collect(),
        }
    }
}

/// Write the report as JSON.
pub fn write_json<W: Write>(report: &ResolutionReport, writer: &mut W) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(report)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Write the report as JSON to a file.
pub fn write_json_file(report: &ResolutionReport, path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_json(report, &mut file)
}

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write rows as CSV. Multiple affixes are joined with `+`.
pub fn write_csv<W: Write>(rows: &[ResolutionRow], writer: &mut W) -> Result<(), OutputError> {
    writeln!(
        writer,
        "surface,matched,method,lookup,entry_id,headword,stem,prefixes,suffixes,analysis"
    )?;

    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{},{}",
            csv_field(&row.surface),
            row.matched,
            row.method.map(|m| m.as_str()).unwrap_or(""),
            row.lookup.as_deref().unwrap_or(""),
            csv_field(row.entry_id.as_deref().unwrap_or("")),
            csv_field(row.headword.as_deref().unwrap_or("")),
            csv_field(row.stem.as_deref().unwrap_or("")),
            csv_field(&row.prefixes.join("+")),
            csv_field(&row.suffixes.join("+")),
            csv_field(row.analysis.as_deref().unwrap_or("")),
        )?;
    }

    Ok(())
}

/// Write rows as CSV to a file.
pub fn write_csv_file(rows: &[ResolutionRow], path: &Path) -> Result<(), OutputError> {
    let mut file = std::fs::File::create(path)?;
    write_csv(rows, &mut file)
}

/// Write a vocabulary as CSV (word, count).
pub fn write_vocabulary_csv<W: Write>(
    entries: &[VocabularyEntry],
    writer: &mut W,
) -> Result<(), OutputError> {
    writeln!(writer, "word,count")?;
    for entry in entries {
        writeln!(writer, "{},{}", csv_field(&entry.word), entry.count)?;
    }
    Ok(())
}

/// Write a vocabulary as a JSON array of `{word, count}`.
pub fn write_vocabulary_json<W: Write>(
    entries: &[VocabularyEntry],
    writer: &mut W,
) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(entries)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// One-line rendering of a resolution.
pub fn format_resolution(surface: &str, resolution: &Resolution<'_>) -> String {
    match resolution {
        Resolution::Matched(m) => format!(
            "{} -> {} [{}{}] {}",
            surface,
            m.analysis(),
            m.method.as_str(),
            if m.method.is_affixed() {
                format!(", stem {}", m.lookup.as_str())
            } else {
                String::new()
            },
            m.citation()
        ),
        Resolution::Unresolved => format!("{} -> (unresolved)", surface),
    }
}

/// Print dictionary statistics.
pub fn print_dictionary_stats(stats: &DictionaryStats) {
    println!("=== Dictionary Statistics ===");
    println!("Entries: {}", stats.entries);
    println!("Indexed forms: {}", stats.indexed_forms);
    println!("Skeleton keys: {}", stats.skeleton_keys);
    println!("Colliding skeletons: {}", stats.colliding_skeletons);
    println!("Entries without id: {}", stats.entries_without_id);
    println!("Rejected entries: {}", stats.rejected_entries);
}

/// Write a summary report to stdout.
pub fn print_summary(report: &ResolutionReport) {
    println!("\n=== Resolution Summary ===");
    println!("Version: {}", report.version);
    println!();
    println!(
        "Dictionary: {} entries ({} forms, {} skeleton keys)",
        report.dictionary.entries, report.dictionary.indexed_forms, report.dictionary.skeleton_keys
    );
    println!();
    println!("Parameters:");
    println!("  Min stem length: {}", report.parameters.min_stem_len);
    println!("  Require entry id: {}", report.parameters.require_entry_id);
    println!("  Consonantal matching: {}", report.parameters.consonantal);
    println!();
    println!("Results:");
    println!("  Words: {}", report.summary.total);
    println!(
        "  Resolved: {} ({:.1}%)",
        report.summary.resolved,
        report.summary.resolution_rate() * 100.0
    );
    for method in MatchMethod::ALL {
        let count = report.summary.by_method.get(&method).copied().unwrap_or(0);
        println!("    {}: {}", method.as_str(), count);
    }
    println!("  Unresolved: {}", report.summary.unresolved);

    if let Some(store) = &report.store {
        println!();
        println!("Word store:");
        println!("  Verified: {}", store.verified);
        println!("  Manual assertions: {}", store.asserted);
        println!("  Fallback: {}", store.unresolved);
        println!("  Added: {}", store.added);
    }
}

/// Print the first `limit` unresolved words.
pub fn print_unresolved(rows: &[ResolutionRow], limit: usize) {
    let unresolved: Vec<&ResolutionRow> = rows.iter().filter(|r| !r.matched).collect();
    for row in unresolved.iter().take(limit) {
        println!("  {}", row.surface);
    }
    if unresolved.len() > limit {
        println!("  ... and {} more", unresolved.len() - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Affix, DictionaryEntry, Lookup, Match};

    fn entry() -> DictionaryEntry {
        DictionaryEntry {
            headword: "ክልኤ".to_string(),
            entry_id: "6112".to_string(),
            ..Default::default()
        }
    }

    fn create_test_match(entry: &DictionaryEntry) -> Resolution<'_> {
        Resolution::Matched(Match {
            entry,
            stem: "ክልኤ".to_string(),
            matched_form: "ክልኤ".to_string(),
            stripped_prefixes: vec![Affix::new("ወ", "wa-", "and")],
            stripped_suffixes: vec![Affix::new("ሁ", "-hu", "his/him (3ms)")],
            method: MatchMethod::PrefixAndSuffixStripped,
            lookup: Lookup::Exact,
        })
    }

    #[test]
    fn test_row_from_match() {
        let e = entry();
        let row = ResolutionRow::new("ወክልኤሁ", &create_test_match(&e));
        assert!(row.matched);
        assert_eq!(row.method, Some(MatchMethod::PrefixAndSuffixStripped));
        assert_eq!(row.entry_id.as_deref(), Some("6112"));
        assert_eq!(row.prefixes, vec!["ወ"]);
        assert_eq!(row.suffixes, vec!["ሁ"]);
        assert_eq!(row.analysis.as_deref(), Some("wa-[ክልኤ]-hu"));

        let row = ResolutionRow::new("ገብር", &Resolution::Unresolved);
        assert!(!row.matched);
        assert!(row.method.is_none());
    }

    #[test]
    fn test_format_resolution() {
        let e = entry();
        let formatted = format_resolution("ወክልኤሁ", &create_test_match(&e));
        assert!(formatted.contains("wa-[ክልኤ]-hu"));
        assert!(formatted.contains("prefix_and_suffix_stripped, stem exact"));
        assert!(formatted.contains("Dillmann #6112"));
        assert_eq!(format_resolution("ገብር", &Resolution::Unresolved), "ገብር -> (unresolved)");
    }

    #[test]
    fn test_write_csv() {
        let e = entry();
        let rows = vec![
            ResolutionRow::new("ወክልኤሁ", &create_test_match(&e)),
            ResolutionRow::new("ገብር", &Resolution::Unresolved),
        ];
        let mut output = Vec::new();

        write_csv(&rows, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert!(csv.starts_with("surface,matched,method")); // Header
        assert!(csv.contains("ወክልኤሁ,true,prefix_and_suffix_stripped,exact,6112,ክልኤ,ክልኤ,ወ,ሁ,wa-[ክልኤ]-hu"));
        assert!(csv.contains("ገብር,false,,,,,,,,"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn test_write_csv_empty() {
        let rows: Vec<ResolutionRow> = vec![];
        let mut output = Vec::new();

        write_csv(&rows, &mut output).unwrap();

        let csv = String::from_utf8(output).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("ክልኤ"), "ክልኤ");
        assert_eq!(csv_field("duo, ambo"), "\"duo, ambo\"");
        assert_eq!(csv_field("say \"two\""), "\"say \"\"two\"\"\"");
    }

    #[test]
    fn test_write_json_report() {
        let e = entry();
        let resolutions = vec![create_test_match(&e), Resolution::Unresolved];
        let words = ["ወክልኤሁ", "ገብር"];
        let summary = crate::batch::summarize(&resolutions);
        let report = ResolutionReport::new(
            DictionaryStats::default(),
            ResolverParams::default(),
            summary,
            &words,
            &resolutions,
        );
        let mut output = Vec::new();
        write_json(&report, &mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["summary"]["resolved"], 1);
        assert_eq!(value["words"][0]["method"], "prefix_and_suffix_stripped");
        assert_eq!(value["words"][1]["matched"], false);
        assert!(value.get("store").is_none());
    }

    #[test]
    fn test_write_vocabulary() {
        let entries = vec![
            VocabularyEntry { word: "ሰላም".to_string(), count: 3 },
            VocabularyEntry { word: "ክልኤ".to_string(), count: 1 },
        ];
        let mut csv = Vec::new();
        write_vocabulary_csv(&entries, &mut csv).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "word,count\nሰላም,3\nክልኤ,1\n");

        let mut json = Vec::new();
        write_vocabulary_json(&entries, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value[0]["count"], 3);
    }
}
