//! Script export: one statement per line, terminated by `;`, UTF-8.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;

/// Writes generated statements to a file or stream.
#[derive(Debug, Clone, Default)]
pub struct ScriptExporter {
    header: Vec<String>,
}

impl ScriptExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `-- ` comment line written before the statements.
    pub fn with_header_line(mut self, line: impl Into<String>) -> Self {
        self.header.push(line.into());
        self
    }

    /// Write statements to any writer.
    pub fn write_to<W: Write>(&self, writer: &mut W, scripts: &[String]) -> Result<()> {
        for line in &self.header {
            writeln!(writer, "-- {}", line)?;
        }
        for script in scripts {
            writeln!(writer, "{};", script.trim_end().trim_end_matches(';'))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Write statements to a file, replacing it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, scripts: &[String]) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, scripts)?;
        info!("Wrote {} statements to {:?}", scripts.len(), path);
        Ok(())
    }

    /// The exported text.
    pub fn render(&self, scripts: &[String]) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(&mut out, scripts)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}
