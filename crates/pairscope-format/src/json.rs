//! JSON output format.

use pairscope_analytics::AnalyticsReport;
use std::io::Write;

use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array of chart records.
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL), one chart record per line.
    Ndjson,
    /// The `{chart_data, metrics}` object served by the analyze endpoint.
    Response,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (not for NDJSON).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (ignored for NDJSON).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_value<W: Write, T: serde::Serialize>(
        &self,
        writer: &mut W,
        value: &T,
    ) -> Result<(), FormatError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, value)?;
        } else {
            serde_json::to_writer(&mut *writer, value)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_report<W: Write + Send>(
        &self,
        report: &AnalyticsReport,
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => self.write_value(&mut writer, &report.chart_records())?,
            JsonStyle::Response => self.write_value(&mut writer, &report.response())?,
            JsonStyle::Ndjson => {
                for record in report.chart_records() {
                    serde_json::to_writer(&mut writer, &record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array | JsonStyle::Response => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
