//! CLI display utilities for formatting the lag report
//!
//! Text output is written as each consumer arrives. Table and JSON output need
//! every row first, so they are buffered until the session finishes or aborts.

use crate::core::styles::StyleRole;
use crate::lag::api::{LagError, LagReport, LagSummary, ReportSink, StreamSnapshot};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::io::{self, Write};

const SEPARATOR: &str = "--------------------------------------------------";

/// Report output format
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Text,
    Table,
    Json,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    consumer: &'a str,
    stream_last_seq: u64,
    consumer_last_seq: u64,
    lag: i64,
    num_pending: u64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    stream: &'a StreamSnapshot,
    reports: Vec<JsonRow<'a>>,
    // Counts are only known once enumeration completes
    #[serde(skip_serializing_if = "Option::is_none")]
    durable: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ephemeral: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Report sink that renders to a writer (stdout in the binary)
pub struct ConsoleReport<W: Write> {
    out: W,
    format: ReportFormat,
    clamp_negative: bool,
    color: bool,
    snapshot: Option<StreamSnapshot>,
    rows: Vec<LagReport>,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self {
            out,
            format,
            clamp_negative: false,
            color: false,
            snapshot: None,
            rows: Vec::new(),
        }
    }

    pub fn with_clamp_negative(mut self, clamp_negative: bool) -> Self {
        self.clamp_negative = clamp_negative;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_text_block(&mut self, report: &LagReport) -> io::Result<()> {
        let lag = report.display_lag(self.clamp_negative);
        let color = self.color;
        let label = |text: &str| StyleRole::Key.paint(text, color);
        writeln!(self.out, "{}", StyleRole::Dim.paint(SEPARATOR, color))?;
        writeln!(
            self.out,
            "{} {}",
            label("Consumer:"),
            StyleRole::Header.paint(&report.consumer_name, color)
        )?;
        writeln!(self.out, "  {} {}", label("Stream Last Seq:"), report.stream_last_seq)?;
        writeln!(
            self.out,
            "  {} {}",
            label("Consumer Last Seq:"),
            report.consumer_last_seq
        )?;
        writeln!(
            self.out,
            "  {} {}",
            label("Difference (Lag):"),
            StyleRole::for_lag(lag).paint(&lag.to_string(), color)
        )
    }

    fn build_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);

        table.set_titles(Row::new(vec![
            Cell::new("Consumer"),
            Cell::new("Stream Last Seq"),
            Cell::new("Consumer Last Seq"),
            Cell::new("Lag"),
            Cell::new("Pending"),
        ]));

        for report in &self.rows {
            let lag = report.display_lag(self.clamp_negative);
            table.add_row(Row::new(vec![
                Cell::new(&report.consumer_name),
                Cell::new(&report.stream_last_seq.to_string()).style_spec("r"),
                Cell::new(&report.consumer_last_seq.to_string()).style_spec("r"),
                Cell::new(&lag.to_string()).style_spec("r"),
                Cell::new(&report.num_pending.to_string()).style_spec("r"),
            ]));
        }
        table
    }

    // Tables stay uncoloured so they render into any writer
    fn write_table(&mut self) -> io::Result<()> {
        self.build_table().print(&mut self.out)?;
        Ok(())
    }

    fn write_json(&mut self, counts: Option<&LagSummary>, error: Option<String>) -> io::Result<()> {
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Ok(());
        };
        let clamp = self.clamp_negative;
        let document = JsonReport {
            stream: snapshot,
            reports: self
                .rows
                .iter()
                .map(|r| JsonRow {
                    consumer: &r.consumer_name,
                    stream_last_seq: r.stream_last_seq,
                    consumer_last_seq: r.consumer_last_seq,
                    lag: r.display_lag(clamp),
                    num_pending: r.num_pending,
                })
                .collect(),
            durable: counts.map(|s| s.durable),
            ephemeral: counts.map(|s| s.ephemeral),
            error,
        };
        let rendered = serde_json::to_string_pretty(&document)?;
        writeln!(self.out, "{}", rendered)
    }

    fn write_no_durables(&mut self, stream: &str) -> io::Result<()> {
        writeln!(self.out, "No durable consumers found on stream '{}'.", stream)
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn begin(&mut self, snapshot: &StreamSnapshot) -> io::Result<()> {
        self.snapshot = Some(snapshot.clone());
        self.rows.clear();
        Ok(())
    }

    fn record(&mut self, report: &LagReport) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                self.rows.push(report.clone());
                self.write_text_block(report)?;
                self.out.flush()
            }
            ReportFormat::Table | ReportFormat::Json => {
                self.rows.push(report.clone());
                Ok(())
            }
        }
    }

    fn finish(&mut self, summary: &LagSummary) -> io::Result<()> {
        let stream = summary.snapshot.name.as_str();
        match self.format {
            ReportFormat::Text => {
                if !summary.has_durable_consumers() {
                    self.write_no_durables(stream)?;
                }
                writeln!(self.out, "{}", StyleRole::Dim.paint(SEPARATOR, self.color))?;
            }
            ReportFormat::Table if summary.has_durable_consumers() => self.write_table()?,
            ReportFormat::Table => self.write_no_durables(stream)?,
            ReportFormat::Json => self.write_json(Some(summary), None)?,
        }
        self.out.flush()
    }

    fn abort(&mut self, error: &LagError) -> io::Result<()> {
        match self.format {
            ReportFormat::Text => {
                if !self.rows.is_empty() {
                    writeln!(self.out, "{}", StyleRole::Dim.paint(SEPARATOR, self.color))?;
                }
            }
            ReportFormat::Table => {
                if !self.rows.is_empty() {
                    self.write_table()?;
                }
            }
            ReportFormat::Json => self.write_json(None, Some(error.to_string()))?,
        }
        self.out.flush()
    }
}
