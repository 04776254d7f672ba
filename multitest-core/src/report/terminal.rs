use std::io::{self, Write};

use colored::Colorize;

use super::{GroupParams, ReportError, Reporter, ScenarioSummary, SweepPoint};
use crate::stats::CorrectionResult;

const TABLE_WIDTH: usize = 64;

/// A reporter that prints correction results as a table on the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a rejection threshold; small thresholds switch to scientific notation.
    fn format_threshold(threshold: Option<f64>) -> String {
        match threshold {
            None => "none".to_string(),
            Some(t) if t != 0.0 && t < 1e-4 => format!("{:.3e}", t),
            Some(t) => format!("{:.6}", t),
        }
    }

    fn format_proportion(proportion: f64) -> String {
        format!("{:.2}%", proportion * 100.0)
    }

    fn format_group(group: &GroupParams) -> String {
        format!("N({}, {})", group.mean, group.std_dev)
    }

    /// Format the threshold column, highlighting corrections that reject nothing.
    fn format_threshold_colored(&self, result: &CorrectionResult) -> String {
        let text = Self::format_threshold(result.threshold);
        if !self.use_colors {
            return text;
        }
        if result.significant_count == 0 {
            text.yellow().to_string()
        } else {
            text
        }
    }

    /// Format the count column with appropriate coloring.
    fn format_count_colored(&self, result: &CorrectionResult) -> String {
        let text = result.significant_count.to_string();
        if !self.use_colors {
            return text;
        }
        if result.significant_count == 0 {
            text.yellow().to_string()
        } else {
            text.green().bold().to_string()
        }
    }

    /// Print the scenario heading.
    fn print_scenario(
        &self,
        writer: &mut impl Write,
        summary: &ScenarioSummary,
    ) -> io::Result<()> {
        writeln!(writer)?;
        let title = format!("Scenario: {}", summary.name);
        if self.use_colors {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        writeln!(
            writer,
            "  {} trials x {} samples, {} t-test, seed {}",
            summary.trials, summary.sample_size, summary.test, summary.seed
        )?;
        writeln!(
            writer,
            "  baseline {}, candidate {}",
            Self::format_group(&summary.baseline),
            Self::format_group(&summary.candidate)
        )?;
        Ok(())
    }

    /// Print the table header.
    fn print_header(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<22} {:>14} {:>12} {:>12}",
            "Method", "Threshold", "Significant", "Proportion"
        );
        if self.use_colors {
            writeln!(writer, "{}", header.bold())?;
        } else {
            writeln!(writer, "{}", header)?;
        }
        writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;
        Ok(())
    }

    /// Print a single correction row.
    fn print_row(&self, writer: &mut impl Write, result: &CorrectionResult) -> io::Result<()> {
        let threshold = self.format_threshold_colored(result);
        let count = self.format_count_colored(result);
        let proportion = Self::format_proportion(result.significant_proportion);

        // Pad the colored strings by their visible width, not their byte length
        let threshold_padding =
            14_usize.saturating_sub(Self::format_threshold(result.threshold).len());
        let count_padding = 12_usize.saturating_sub(result.significant_count.to_string().len());

        writeln!(
            writer,
            "{:<22} {:>width_threshold$}{} {:>width_count$}{} {:>12}",
            result.method.to_string(),
            "",
            threshold,
            "",
            count,
            proportion,
            width_threshold = threshold_padding,
            width_count = count_padding,
        )?;
        Ok(())
    }

    /// Print the family-wise error rate curve.
    fn print_sweep(&self, writer: &mut impl Write, points: &[SweepPoint]) -> io::Result<()> {
        writeln!(writer)?;
        let title = "Family-wise error rate";
        if self.use_colors {
            writeln!(writer, "{}", title.bold())?;
        } else {
            writeln!(writer, "{}", title)?;
        }
        writeln!(writer, "{:>8} {:>12} {:>12}", "tests", "uncorrected", "bonferroni")?;
        for point in points {
            writeln!(
                writer,
                "{:>8} {:>12.4} {:>12.4}",
                point.tests, point.uncorrected, point.bonferroni
            )?;
        }
        Ok(())
    }

    fn print_summary(
        &self,
        writer: &mut impl Write,
        summary: &ScenarioSummary,
    ) -> io::Result<()> {
        writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;
        let label = "Summary:";
        if self.use_colors {
            write!(writer, "{} ", label.bold())?;
        } else {
            write!(writer, "{} ", label)?;
        }
        let parts: Vec<String> = summary
            .corrections
            .iter()
            .map(|r| {
                format!(
                    "{} {}",
                    r.method,
                    Self::format_proportion(r.significant_proportion)
                )
            })
            .collect();
        writeln!(writer, "{}", parts.join(", "))?;
        Ok(())
    }

    fn write_summary(
        &self,
        writer: &mut impl Write,
        summary: &ScenarioSummary,
    ) -> io::Result<()> {
        self.print_scenario(writer, summary)?;
        self.print_header(writer)?;
        for result in &summary.corrections {
            self.print_row(writer, result)?;
        }
        self.print_summary(writer, summary)?;
        if !summary.error_rate_sweep.is_empty() {
            self.print_sweep(writer, &summary.error_rate_sweep)?;
        }
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn report(&self, summaries: &[ScenarioSummary]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();

        for summary in summaries {
            self.write_summary(&mut writer, summary)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::CorrectionMethod;

    fn make_summary() -> ScenarioSummary {
        ScenarioSummary {
            name: "shifted".to_string(),
            test: "student".to_string(),
            seed: 42,
            trials: 1000,
            sample_size: 10,
            baseline: GroupParams {
                mean: 1.0,
                std_dev: 1.0,
            },
            candidate: GroupParams {
                mean: 2.0,
                std_dev: 1.0,
            },
            corrections: vec![
                CorrectionResult {
                    method: CorrectionMethod::Uncorrected,
                    threshold: Some(0.05),
                    significant_count: 560,
                    significant_proportion: 0.56,
                },
                CorrectionResult {
                    method: CorrectionMethod::Bonferroni,
                    threshold: Some(0.00005),
                    significant_count: 21,
                    significant_proportion: 0.021,
                },
                CorrectionResult {
                    method: CorrectionMethod::BenjaminiHochberg,
                    threshold: None,
                    significant_count: 0,
                    significant_proportion: 0.0,
                },
            ],
            error_rate_sweep: vec![
                SweepPoint {
                    tests: 0,
                    uncorrected: 0.0,
                    bonferroni: 0.0,
                },
                SweepPoint {
                    tests: 1,
                    uncorrected: 0.05,
                    bonferroni: 0.05,
                },
                SweepPoint {
                    tests: 2,
                    uncorrected: 0.0975,
                    bonferroni: 0.049375,
                },
            ],
        }
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(TerminalReporter::format_threshold(None), "none");
        assert_eq!(TerminalReporter::format_threshold(Some(0.05)), "0.050000");
        assert_eq!(TerminalReporter::format_threshold(Some(0.00005)), "5.000e-5");
        assert_eq!(TerminalReporter::format_threshold(Some(0.0)), "0.000000");
    }

    #[test]
    fn test_format_proportion() {
        assert_eq!(TerminalReporter::format_proportion(0.0523), "5.23%");
        assert_eq!(TerminalReporter::format_proportion(1.0), "100.00%");
    }

    #[test]
    fn test_format_group() {
        let group = GroupParams {
            mean: 2.0,
            std_dev: 0.5,
        };
        assert_eq!(TerminalReporter::format_group(&group), "N(2, 0.5)");
    }

    #[test]
    fn test_report_to_buffer() {
        let reporter = TerminalReporter::without_colors();
        let mut buffer = Vec::new();
        reporter.write_summary(&mut buffer, &make_summary()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("Scenario: shifted"));
        assert!(output.contains("1000 trials x 10 samples, student t-test, seed 42"));
        assert!(output.contains("baseline N(1, 1), candidate N(2, 1)"));
        assert!(output.contains("Method"));
        assert!(output.contains("uncorrected"));
        assert!(output.contains("bonferroni"));
        assert!(output.contains("benjamini-hochberg"));
        assert!(output.contains("none"));
        assert!(output.contains("56.00%"));
        assert!(output.contains(
            "Summary: uncorrected 56.00%, bonferroni 2.10%, benjamini-hochberg 0.00%"
        ));
        assert!(output.contains("Family-wise error rate"));
        assert!(output
            .lines()
            .any(|line| line.split_whitespace().eq(["tests", "uncorrected", "bonferroni"])));
        assert!(output
            .lines()
            .any(|line| line.split_whitespace().eq(["2", "0.0975", "0.0494"])));
    }

    #[test]
    fn test_rows_align_without_colors() {
        let reporter = TerminalReporter::without_colors();
        let summary = make_summary();
        let widths: Vec<usize> = summary
            .corrections
            .iter()
            .map(|result| {
                let mut buffer = Vec::new();
                reporter.print_row(&mut buffer, result).unwrap();
                String::from_utf8(buffer).unwrap().trim_end().len()
            })
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }
}
