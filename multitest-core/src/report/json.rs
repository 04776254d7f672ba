use std::io::{self, Write};

use super::{ReportError, Reporter, ScenarioSummary};

/// Writes summaries to stdout as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }

    fn write(
        &self,
        writer: &mut impl Write,
        summaries: &[ScenarioSummary],
    ) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(&mut *writer, summaries)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for JsonReporter {
    fn report(&self, summaries: &[ScenarioSummary]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write(&mut writer, summaries)
    }
}
