//! CSV output format.

use pairscope_analytics::{AnalyticsReport, ChartRecord};
use std::borrow::Cow;
use std::io::Write;

use crate::{FormatError, Formatter};

/// Header of the trailing column holding the stationarity p-value.
pub const ADF_COLUMN: &str = "ADF p-value";

/// CSV formatter.
///
/// Writes one row per annotated timestamp. The report's formatted ADF
/// p-value (`"%.4f"` or `N/A`) is repeated in a trailing column; undefined
/// statistics are empty cells.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Quotes a field holding the delimiter, a quote or a line break (RFC 4180).
fn quote(field: &str, delimiter: char) -> Cow<'_, str> {
    if field.contains([delimiter, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

impl CsvFormatter {
    fn write_line<W: Write, S: AsRef<str>>(
        &self,
        writer: &mut W,
        fields: &[S],
    ) -> std::io::Result<()> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                write!(writer, "{}", self.delimiter)?;
            }
            write!(writer, "{}", quote(field.as_ref(), self.delimiter))?;
        }
        writeln!(writer)
    }
}

impl Formatter for CsvFormatter {
    fn write_report<W: Write + Send>(
        &self,
        report: &AnalyticsReport,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let adf = report.metrics.adf_p_value.formatted();

        if self.include_header {
            let mut columns = ChartRecord::columns(&report.symbol_a, &report.symbol_b);
            columns.push(ADF_COLUMN.to_string());
            self.write_line(&mut writer, &columns)?;
        }

        for record in report.chart_records() {
            let row = record.row();
            let fields = [
                row.timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                row.price_a.to_string(),
                cell(row.volume_a),
                row.price_b.to_string(),
                cell(row.volume_b),
                row.spread.to_string(),
                cell(row.rolling_mean),
                cell(row.rolling_std),
                cell(row.zscore),
                cell(row.rolling_corr),
                adf.clone(),
            ];
            self.write_line(&mut writer, &fields)?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
