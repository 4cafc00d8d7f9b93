//! Progress reporters

use super::format::OutputFormat;
use crate::results::{ExampleOutcome, OutcomeStatus, ResultSet};
use std::io::{self, Write};

/// Receives execution events in order
pub trait Reporter: Send {
    fn group_started(&mut self, _description: &str, _depth: usize) -> io::Result<()> {
        Ok(())
    }

    fn example_finished(&mut self, _outcome: &ExampleOutcome, _depth: usize) -> io::Result<()> {
        Ok(())
    }

    fn finished(&mut self, _results: &ResultSet) -> io::Result<()> {
        Ok(())
    }
}

/// Reporter for a format writing to `out`
pub fn reporter_for(format: OutputFormat, out: Box<dyn Write + Send>) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Progress => Box::new(ProgressReporter::new(out)),
        OutputFormat::Documentation => Box::new(DocumentationReporter::new(out)),
        OutputFormat::Json => Box::new(JsonReporter::new(out)),
    }
}

/// Discards every event
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// One character per example, then failures and a summary line
pub struct ProgressReporter {
    out: Box<dyn Write + Send>,
}

impl ProgressReporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }
}

impl Reporter for ProgressReporter {
    fn example_finished(&mut self, outcome: &ExampleOutcome, _depth: usize) -> io::Result<()> {
        let mark = match outcome.status {
            OutcomeStatus::Passed => '.',
            OutcomeStatus::Failed => 'F',
            OutcomeStatus::Skipped => '*',
            OutcomeStatus::Error => 'E',
        };
        write!(self.out, "{}", mark)?;
        self.out.flush()
    }

    fn finished(&mut self, results: &ResultSet) -> io::Result<()> {
        writeln!(self.out)?;
        write_problems(&mut self.out, results)?;
        write_summary(&mut self.out, results)
    }
}

/// Indented description tree
pub struct DocumentationReporter {
    out: Box<dyn Write + Send>,
}

impl DocumentationReporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }
}

impl Reporter for DocumentationReporter {
    fn group_started(&mut self, description: &str, depth: usize) -> io::Result<()> {
        if depth == 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{}{}", indent(depth), description)
    }

    fn example_finished(&mut self, outcome: &ExampleOutcome, depth: usize) -> io::Result<()> {
        let pad = indent(depth + 1);
        let message = outcome.message.as_deref().unwrap_or("");
        match outcome.status {
            OutcomeStatus::Passed => writeln!(self.out, "{}{}", pad, outcome.description),
            OutcomeStatus::Failed => {
                writeln!(self.out, "{}{} (FAILED - {})", pad, outcome.description, message)
            }
            OutcomeStatus::Skipped => writeln!(self.out, "{}{} (SKIPPED)", pad, outcome.description),
            OutcomeStatus::Error => {
                writeln!(self.out, "{}{} (ERROR - {})", pad, outcome.description, message)
            }
        }
    }

    fn finished(&mut self, results: &ResultSet) -> io::Result<()> {
        writeln!(self.out)?;
        write_summary(&mut self.out, results)
    }
}

/// Whole result set as pretty JSON once the run ends
pub struct JsonReporter {
    out: Box<dyn Write + Send>,
}

impl JsonReporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }
}

impl Reporter for JsonReporter {
    fn finished(&mut self, results: &ResultSet) -> io::Result<()> {
        let json = results
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writeln!(self.out, "{}", json)
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn write_problems(out: &mut dyn Write, results: &ResultSet) -> io::Result<()> {
    let problems: Vec<&ExampleOutcome> = results.examples().filter(|e| e.status.is_failure()).collect();
    if problems.is_empty() {
        return Ok(());
    }

    writeln!(out, "\nFailures:")?;
    for (n, example) in problems.iter().enumerate() {
        writeln!(out, "\n  {}) {}", n + 1, example.full_description)?;
        if let Some(message) = &example.message {
            writeln!(out, "     {}", message)?;
        }
        if let (Some(source), Some(line)) = (&example.source, example.line) {
            writeln!(out, "     # {}:{}", source, line)?;
        }
    }
    Ok(())
}

fn write_summary(out: &mut dyn Write, results: &ResultSet) -> io::Result<()> {
    let s = &results.summary;
    writeln!(
        out,
        "\nFinished in {:.3} seconds\n{} examples, {} failures, {} skipped, {} errors",
        s.duration_ms as f64 / 1000.0,
        s.examples,
        s.failed,
        s.skipped,
        s.errors
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Writer whose output stays readable after being boxed
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
