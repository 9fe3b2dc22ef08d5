//! Export functionality for CSV and JSON formats

use crate::analytics::{self, AnalysisReport, SummaryStats, TrendBucket};
use crate::range::ReportingWindow;
use crate::store::JournalStore;
use crate::PracticeRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Export data structure for JSON
#[derive(Debug, Serialize)]
pub struct ExportData {
    pub exported_at: DateTime<Utc>,
    pub window: ReportingWindow,
    pub summary: SummaryStats,
    pub trend: Vec<TrendBucket>,
    pub records: Vec<PracticeRecord>,
}

pub struct Exporter<'a> {
    store: &'a JournalStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a JournalStore) -> Self {
        Self { store }
    }

    /// Export the records of a reporting window to a writer
    pub fn export<W: Write>(
        &self,
        writer: W,
        window: &ReportingWindow,
        format: ExportFormat,
    ) -> Result<()> {
        let report = self.report_for(window)?;

        match format {
            ExportFormat::Csv => export_csv(writer, &report.filtered),
            ExportFormat::Json => export_json(writer, report),
        }
    }

    /// Export summary only (no raw records)
    pub fn export_summary<W: Write>(
        &self,
        writer: W,
        window: &ReportingWindow,
        format: ExportFormat,
    ) -> Result<()> {
        let report = self.report_for(window)?;

        match format {
            ExportFormat::Csv => export_summary_csv(writer, &report.stats),
            ExportFormat::Json => {
                let mut report = report;
                report.filtered.clear();
                export_json(writer, report)
            }
        }
    }

    fn report_for(&self, window: &ReportingWindow) -> Result<AnalysisReport> {
        let snapshot = self.store.all_records()?;
        Ok(analytics::aggregate(&snapshot, window))
    }
}

fn export_csv<W: Write>(writer: W, records: &[PracticeRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "id",
        "occurred_at",
        "style",
        "duration_minutes",
        "studio",
        "instructor",
        "difficulty",
        "mood",
        "notes",
        "music_title",
        "media_url",
        "media_kind",
    ])?;

    for record in records {
        csv_writer.write_record([
            record.id.to_string(),
            record.occurred_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            record.style.clone(),
            record.duration_minutes.to_string(),
            record.studio.clone(),
            record.instructor.clone(),
            record.difficulty.as_str().to_string(),
            record.mood.as_str().to_string(),
            record.notes.clone(),
            record.music_title.clone(),
            record
                .media
                .as_ref()
                .map(|m| m.url.clone())
                .unwrap_or_default(),
            record
                .media
                .as_ref()
                .map(|m| m.kind.as_str().to_string())
                .unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

fn export_json<W: Write>(mut writer: W, report: AnalysisReport) -> Result<()> {
    let export_data = ExportData {
        exported_at: Utc::now(),
        window: report.window,
        summary: report.stats,
        trend: report.trend,
        records: report.filtered,
    };

    let json = serde_json::to_string_pretty(&export_data)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

fn export_summary_csv<W: Write>(writer: W, stats: &SummaryStats) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["metric", "value"])?;
    csv_writer.write_record(["total_minutes", &stats.total_minutes.to_string()])?;
    csv_writer.write_record(["total_hours", &format!("{:.1}", stats.total_hours)])?;
    csv_writer.write_record(["session_count", &stats.session_count.to_string()])?;
    csv_writer.write_record(["top_instructor", &stats.top_instructor.name])?;
    csv_writer.write_record([
        "top_instructor_sessions",
        &stats.top_instructor.count.to_string(),
    ])?;
    csv_writer.write_record(["top_studio", &stats.top_studio.name])?;
    csv_writer.write_record(["top_studio_sessions", &stats.top_studio.count.to_string()])?;
    for style in &stats.style_breakdown {
        csv_writer.write_record([&format!("style:{}", style.name), &style.count.to_string()])?;
    }
    csv_writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::RangeSelector;
    use chrono::NaiveDate;

    fn seeded_store() -> JournalStore {
        let store = JournalStore::open(":memory:").unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 6, 11)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        store
            .upsert_record(&PracticeRecord::new(at, "Jazz", 75).with_instructor("Sarah"))
            .unwrap();
        store
    }

    fn june_window() -> ReportingWindow {
        RangeSelector::Month.resolve(
            NaiveDate::from_ymd_opt(2024, 6, 14)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn csv_export_contains_header_and_record() {
        let store = seeded_store();
        let mut out = Vec::new();

        Exporter::new(&store)
            .export(&mut out, &june_window(), ExportFormat::Csv)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("id,occurred_at,style"));
        let row = lines.next().unwrap();
        assert!(row.contains("Jazz"));
        assert!(row.contains("2024-06-11T19:30:00"));
    }

    #[test]
    fn json_export_carries_summary_and_trend() {
        let store = seeded_store();
        let mut out = Vec::new();

        Exporter::new(&store)
            .export(&mut out, &june_window(), ExportFormat::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["session_count"], 1);
        assert_eq!(value["summary"]["top_instructor"]["name"], "Sarah");
        assert_eq!(value["trend"].as_array().unwrap().len(), 5);
        assert_eq!(value["records"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn summary_export_omits_records() {
        let store = seeded_store();
        let mut out = Vec::new();

        Exporter::new(&store)
            .export_summary(&mut out, &june_window(), ExportFormat::Json)
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(value["records"].as_array().unwrap().is_empty());
        assert_eq!(value["summary"]["total_minutes"], 75);
    }

    #[test]
    fn summary_csv_reports_top_categories_with_counts() {
        let store = seeded_store();
        let mut out = Vec::new();

        Exporter::new(&store)
            .export_summary(&mut out, &june_window(), ExportFormat::Csv)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("top_instructor,Sarah"));
        assert!(text.contains("top_instructor_sessions,1"));
        assert!(text.contains("top_studio,Unknown Studio"));
        assert!(text.contains("top_studio_sessions,1"));
    }

    #[test]
    fn format_parses_with_json_default_at_call_sites() {
        assert_eq!(ExportFormat::from_str("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("yaml"), None);
        assert_eq!(ExportFormat::Csv.extension(), "csv");
    }
}
