//! Colored formatter implementation with terminal color support

use super::formatter::{
    format_bytes, format_outcome, FormattingOptions, OutputFormatter, PlainFormatter,
};
use crate::{
    error::Result,
    models::{PlanCatalog, RateSample, SpeedTestReport},
    speedtest::analysis,
    types::{PhaseOutcome, SpeedRating, TestPhase},
};
use colored::*;

/// Color for a rating
pub fn rating_color(rating: SpeedRating) -> Color {
    match rating {
        SpeedRating::Excellent => Color::Green,
        SpeedRating::Good => Color::Cyan,
        SpeedRating::Fair => Color::Yellow,
        SpeedRating::Poor => Color::Red,
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter; tables are laid out by the plain formatter and
/// colored cell by cell
pub struct ColoredFormatter {
    plain: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            plain: PlainFormatter::new(options.clone()),
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.bold().color(color)
        } else {
            text.normal()
        }
    }

    fn section_header(&self, title: &str) -> String {
        self.emphasize(title, self.color_scheme.header).to_string()
    }

    fn colored_outcome(&self, phase: TestPhase, outcome: &PhaseOutcome) -> String {
        let text = format_outcome(phase, outcome);
        match outcome.value() {
            Some(value) => self
                .emphasize(&text, rating_color(analysis::rate(phase, value)))
                .to_string(),
            None => self.colorize(&text, self.color_scheme.muted).to_string(),
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.chars().count() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_report(&self, report: &SpeedTestReport) -> Result<String> {
        let mut lines = Vec::new();

        lines.push(format!("{} {}", self.colorize("Server:", self.color_scheme.muted), report.server));
        if let Some(duration) = report.duration() {
            lines.push(format!(
                "{} {:.1}s",
                self.colorize("Duration:", self.color_scheme.muted),
                duration.num_milliseconds() as f64 / 1000.0
            ));
        }
        lines.push(String::new());

        // Widths are computed on plain text; results are colored afterwards.
        let table = self
            .plain
            .create_table(&self.plain.report_table_format(), &self.plain.report_rows(report));
        let outcomes = [
            (TestPhase::Latency, &report.latency),
            (TestPhase::Download, &report.download.outcome),
            (TestPhase::Upload, &report.upload.outcome),
        ];
        for line in table.lines() {
            let mut line = line.to_string();
            for (phase, outcome) in outcomes {
                let plain = format_outcome(phase, outcome);
                if line.contains(phase.name()) && line.contains(&plain) {
                    line = line.replacen(&plain, &self.colored_outcome(phase, outcome), 1);
                }
            }
            lines.push(line);
        }

        let assessments = analysis::assess(report);
        if !assessments.is_empty() {
            lines.push(String::new());
            lines.push(self.section_header("Analysis"));
            for assessment in &assessments {
                lines.push(format!(
                    "  {:<9} {} {}",
                    assessment.phase.name(),
                    self.colorize(&format!("{:<10}", assessment.rating.as_str()), rating_color(assessment.rating)),
                    assessment.advice
                ));
            }
        }

        if self.options.verbose_mode {
            let failures = PlainFormatter::failure_reasons(report);
            if !failures.is_empty() {
                lines.push(String::new());
                lines.push(self.section_header("Unavailable"));
                for (phase, reason) in failures {
                    lines.push(format!(
                        "  {}: {}",
                        phase.name(),
                        self.colorize(reason, self.color_scheme.warning)
                    ));
                }
            }
        }

        Ok(lines.join("\n"))
    }

    fn format_sample(&self, sample: &RateSample) -> String {
        format!(
            "{:<8} {:>6.1}s {}  {}",
            self.colorize(sample.phase.name(), self.color_scheme.info),
            sample.elapsed.as_secs_f64(),
            self.bold(&format!("{:>10.2} Mbps", sample.mbps)),
            self.colorize(&format_bytes(sample.total_bytes), self.color_scheme.muted)
        )
    }

    fn format_plans(&self, catalog: &PlanCatalog) -> Result<String> {
        let format = self.plain.plan_table_format();
        Ok(format!(
            "{}\n{}\n\n{}\n{}",
            self.section_header("Standard plans"),
            self.plain.create_table(&format, &self.plain.plan_rows(&catalog.standard)),
            self.section_header("Rural plans"),
            self.plain.create_table(&format, &self.plain.plan_rows(&catalog.rural)),
        ))
    }

    fn format_error(&self, error: &str) -> String {
        format!("{} {}", self.emphasize("ERROR:", self.color_scheme.error), error)
    }

    fn format_warning(&self, warning: &str) -> String {
        format!("{} {}", self.emphasize("WARNING:", self.color_scheme.warning), warning)
    }

    fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.emphasize("OK:", self.color_scheme.success), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SpeedTestReport {
        let mut report = SpeedTestReport::new("http://127.0.0.1:3000".to_string());
        report.latency = PhaseOutcome::measured(120.0);
        report.download.outcome = PhaseOutcome::measured(150.25);
        report.upload.outcome = PhaseOutcome::unavailable("timed out");
        report
    }

    #[test]
    fn test_rating_colors() {
        assert_eq!(rating_color(SpeedRating::Excellent), Color::Green);
        assert_eq!(rating_color(SpeedRating::Poor), Color::Red);
    }

    #[test]
    fn test_colored_report_keeps_values() {
        colored::control::set_override(true);
        let formatter = ColoredFormatter::new(FormattingOptions::default());
        let output = formatter.format_report(&report()).unwrap();

        assert!(output.contains("150.25 Mbps"));
        assert!(output.contains("unavailable"));
        assert!(output.contains("\x1b["));
        assert!(output.contains("May experience lag in real-time applications"));
    }

    #[test]
    fn test_color_disabled_matches_plain_values() {
        let options = FormattingOptions {
            enable_color: false,
            ..FormattingOptions::default()
        };
        let output = ColoredFormatter::new(options).format_report(&report()).unwrap();
        assert!(output.contains("120 ms"));
        assert!(output.contains("Poor"));
    }
}
