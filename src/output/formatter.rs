//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{PhaseSummary, PlanCatalog, RateSample, SpeedTestReport},
    speedtest::analysis,
    types::{PhaseOutcome, TestPhase},
};
use std::fmt::Write as _;

/// Main trait for output formatting
pub trait OutputFormatter: Send + Sync {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format a finished speed test report
    fn format_report(&self, report: &SpeedTestReport) -> Result<String>;

    /// Format one live sample while a phase runs
    fn format_sample(&self, sample: &RateSample) -> String;

    /// Format the plan catalog as tables
    fn format_plans(&self, catalog: &PlanCatalog) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> String;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> String;

    /// Format success messages
    fn format_success(&self, message: &str) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Show transfer details (bytes, samples, peak rate, failure reasons)
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 120,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
    pub max_column_width: usize,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Display text of a phase value
pub fn format_outcome(phase: TestPhase, outcome: &PhaseOutcome) -> String {
    match outcome {
        PhaseOutcome::Measured { value } => match phase {
            TestPhase::Latency => format!("{:.0} ms", value),
            TestPhase::Download | TestPhase::Upload => format!("{:.2} Mbps", value),
        },
        PhaseOutcome::Unavailable { .. } => "unavailable".to_string(),
    }
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let value = bytes as f64;
    if value >= GIB {
        format!("{:.2} GiB", value / GIB)
    } else if value >= MIB {
        format!("{:.1} MiB", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{} B", bytes)
    }
}

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Columns of the result table; verbose mode adds transfer details
    pub(crate) fn report_table_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::new("Test", Alignment::Left, 8, 12),
            Column::new("Result", Alignment::Right, 11, 16),
            Column::new("Rating", Alignment::Left, 9, 12),
        ];
        if self.options.verbose_mode {
            columns.push(Column::new("Transferred", Alignment::Right, 11, 14));
            columns.push(Column::new("Samples", Alignment::Right, 7, 8));
            columns.push(Column::new("Peak", Alignment::Right, 8, 16));
        }

        TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
            max_column_width: self.options.max_width,
        }
    }

    /// One table row per phase, latency first
    pub(crate) fn report_rows(&self, report: &SpeedTestReport) -> Vec<RowData> {
        let mut rows = Vec::new();

        let mut latency = vec![
            TestPhase::Latency.name().to_string(),
            format_outcome(TestPhase::Latency, &report.latency),
            rating_text(TestPhase::Latency, &report.latency),
        ];
        if self.options.verbose_mode {
            latency.extend(["-".to_string(), "-".to_string(), "-".to_string()]);
        }
        rows.push(latency);

        for summary in [&report.download, &report.upload] {
            rows.push(self.phase_row(summary));
        }

        rows
    }

    fn phase_row(&self, summary: &PhaseSummary) -> RowData {
        let mut row = vec![
            summary.phase.name().to_string(),
            format_outcome(summary.phase, &summary.outcome),
            rating_text(summary.phase, &summary.outcome),
        ];
        if self.options.verbose_mode {
            row.push(format_bytes(summary.total_bytes));
            row.push(summary.sample_count.to_string());
            row.push(
                summary
                    .peak_mbps
                    .map(|peak| format!("{:.2} Mbps", peak))
                    .unwrap_or_else(|| "-".to_string()),
            );
        }
        row
    }

    /// Why each unavailable phase failed
    pub(crate) fn failure_reasons(report: &SpeedTestReport) -> Vec<(TestPhase, &str)> {
        [
            (TestPhase::Latency, &report.latency),
            (TestPhase::Download, &report.download.outcome),
            (TestPhase::Upload, &report.upload.outcome),
        ]
        .into_iter()
        .filter_map(|(phase, outcome)| match outcome {
            PhaseOutcome::Unavailable { reason } => Some((phase, reason.as_str())),
            PhaseOutcome::Measured { .. } => None,
        })
        .collect()
    }

    pub(crate) fn plan_table_format(&self) -> TableFormat {
        let mut columns = vec![
            Column::new("Plan", Alignment::Left, 10, 32),
            Column::new("Speed", Alignment::Left, 10, 60),
            Column::new("Price", Alignment::Right, 8, 12),
        ];
        if self.options.verbose_mode {
            columns.push(Column::new("Eligibility", Alignment::Left, 10, 48));
        }

        TableFormat {
            columns,
            show_borders: self.options.table_borders,
            show_header: true,
            max_column_width: self.options.max_width,
        }
    }

    pub(crate) fn plan_rows(&self, plans: &[crate::models::Plan]) -> Vec<RowData> {
        plans
            .iter()
            .map(|plan| {
                let mut row = vec![plan.name.clone(), plan.speed.clone(), plan.price.clone()];
                if self.options.verbose_mode {
                    row.push(plan.features.last().map(|f| f.feature.clone()).unwrap_or_default());
                }
                row
            })
            .collect()
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output
    }

    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        let num_columns = format
            .columns
            .len()
            .max(rows.iter().map(|r| r.len()).max().unwrap_or(0));

        (0..num_columns)
            .map(|col_idx| {
                let column = format.columns.get(col_idx);
                let mut width = column
                    .map(|c| c.min_width.max(c.header.chars().count()))
                    .unwrap_or(0);

                for row in rows {
                    if let Some(cell) = row.get(col_idx) {
                        width = width.max(cell.chars().count());
                    }
                }

                width.min(column.map_or(format.max_column_width, |c| c.max_width))
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::new();

        if !widths.is_empty() {
            border.push('+');
            for &width in widths {
                border.push_str(&"-".repeat(width + 2));
                border.push('+');
            }
        }

        border
    }
}

fn rating_text(phase: TestPhase, outcome: &PhaseOutcome) -> String {
    outcome
        .value()
        .map(|value| analysis::rate(phase, value).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Align text within specified width, counting characters rather than bytes
pub(crate) fn align_text(text: &str, width: usize, alignment: &Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_report(&self, report: &SpeedTestReport) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Server: {}", report.server).map_err(fmt_err)?;
        if let Some(duration) = report.duration() {
            writeln!(output, "Duration: {:.1}s", duration.num_milliseconds() as f64 / 1000.0).map_err(fmt_err)?;
        }
        writeln!(output).map_err(fmt_err)?;

        let table = self.create_table(&self.report_table_format(), &self.report_rows(report));
        writeln!(output, "{}", table).map_err(fmt_err)?;

        let assessments = analysis::assess(report);
        if !assessments.is_empty() {
            writeln!(output).map_err(fmt_err)?;
            writeln!(output, "Analysis:").map_err(fmt_err)?;
            for assessment in &assessments {
                writeln!(
                    output,
                    "  {:<9} {:<10} {}",
                    assessment.phase.name(),
                    assessment.rating.as_str(),
                    assessment.advice
                )
                .map_err(fmt_err)?;
            }
        }

        if self.options.verbose_mode {
            let failures = Self::failure_reasons(report);
            if !failures.is_empty() {
                writeln!(output).map_err(fmt_err)?;
                writeln!(output, "Unavailable:").map_err(fmt_err)?;
                for (phase, reason) in failures {
                    writeln!(output, "  {}: {}", phase.name(), reason).map_err(fmt_err)?;
                }
            }
        }

        Ok(output.trim_end().to_string())
    }

    fn format_sample(&self, sample: &RateSample) -> String {
        format!(
            "{:<8} {:>6.1}s {:>10.2} Mbps  {}",
            sample.phase.name(),
            sample.elapsed.as_secs_f64(),
            sample.mbps,
            format_bytes(sample.total_bytes)
        )
    }

    fn format_plans(&self, catalog: &PlanCatalog) -> Result<String> {
        let mut output = String::new();
        let format = self.plan_table_format();

        writeln!(output, "Standard plans").map_err(fmt_err)?;
        writeln!(output, "{}", self.create_table(&format, &self.plan_rows(&catalog.standard))).map_err(fmt_err)?;
        writeln!(output).map_err(fmt_err)?;
        writeln!(output, "Rural plans").map_err(fmt_err)?;
        write!(output, "{}", self.create_table(&format, &self.plan_rows(&catalog.rural))).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_error(&self, error: &str) -> String {
        format!("ERROR: {}", error)
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("WARNING: {}", warning)
    }

    fn format_success(&self, message: &str) -> String {
        format!("OK: {}", message)
    }
}
