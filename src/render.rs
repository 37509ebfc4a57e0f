//! Serialises a report for whoever consumes it (spreadsheet import, API response)

use crate::error::Result;
use crate::report::Report;
use serde::Serialize;
use std::io::Write;

/// Output encodings for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    unique_id: &'a str,
    name: &'a str,
    type_line: &'a str,
    color_identity: String,
    price_usd: Option<f64>,
    source: Option<&'a str>,
    target: Option<&'a str>,
    reshuffled: bool,
    ditched: bool,
    buylist: bool,
    inclusion_percentage: Option<f64>,
}

/// Write one CSV line per card, with a header row
pub fn write_csv<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in &report.rows {
        wtr.serialize(CsvRow {
            unique_id: &row.unique_id,
            name: &row.name,
            type_line: &row.type_line,
            color_identity: row.color_identity.concat(),
            price_usd: row.price_usd,
            source: row.source.as_deref(),
            target: row.target.as_deref(),
            reshuffled: row.reshuffled(),
            ditched: row.ditched(),
            buylist: row.buylist(),
            inclusion_percentage: row.inclusion.as_ref().map(|s| s.inclusion_percentage),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report as pretty-printed JSON
pub fn write_json<W: Write>(report: &Report, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn render<W: Write>(report: &Report, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(report, writer),
        OutputFormat::Json => write_json(report, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::InclusionStats;
    use crate::report::ReportRow;

    fn sample() -> Report {
        Report {
            rows: vec![
                ReportRow {
                    unique_id: "sol".to_string(),
                    name: "Sol Ring".to_string(),
                    type_line: "Artifact".to_string(),
                    color_identity: Vec::new(),
                    price_usd: Some(1.5),
                    source: Some("Binder".to_string()),
                    target: Some("Atraxa".to_string()),
                    inclusion: Some(InclusionStats {
                        inclusion_percentage: 83.8,
                        num_decks: 6_450_000,
                        total_decks: 7_700_000,
                    }),
                },
                ReportRow {
                    unique_id: "cradle".to_string(),
                    name: "Gaea's Cradle".to_string(),
                    type_line: "Legendary Land".to_string(),
                    color_identity: vec!["G".to_string()],
                    price_usd: None,
                    source: None,
                    target: Some("Atraxa".to_string()),
                    inclusion: None,
                },
            ],
        }
    }

    #[test]
    fn csv_has_header_and_flags() {
        let mut out = Vec::new();
        write_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "unique_id,name,type_line,color_identity,price_usd,source,target,reshuffled,ditched,buylist,inclusion_percentage"
        );
        assert_eq!(
            lines[1],
            "sol,Sol Ring,Artifact,,1.5,Binder,Atraxa,true,false,false,83.8"
        );
        assert_eq!(
            lines[2],
            "cradle,Gaea's Cradle,Legendary Land,G,,,Atraxa,false,false,true,"
        );
    }

    #[test]
    fn empty_report_csv_is_empty() {
        let mut out = Vec::new();
        write_csv(&Report::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn json_round_trips_names() {
        let mut out = Vec::new();
        render(&sample(), OutputFormat::Json, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rows"][0]["name"], "Sol Ring");
        assert_eq!(value["rows"][1]["inclusion"], serde_json::Value::Null);
    }
}
