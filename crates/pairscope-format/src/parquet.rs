//! Apache Parquet output format.

use arrow::array::{Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use pairscope_analytics::{AnalyticsReport, AnnotatedRow};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::io::Write;
use std::sync::Arc;

use crate::{FormatError, Formatter};

/// Parquet formatter.
#[derive(Debug, Clone)]
pub struct ParquetFormatter {
    /// Row group size (number of rows per group).
    row_group_size: usize,
    /// Compression codec.
    compression: Compression,
}

impl Default for ParquetFormatter {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression: Compression::SNAPPY,
        }
    }
}

impl ParquetFormatter {
    /// Creates a new Parquet formatter with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row group size.
    #[must_use]
    pub const fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Sets the compression codec.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Creates the Arrow schema for a pair's report.
    fn report_schema(symbol_a: &str, symbol_b: &str) -> Schema {
        Schema::new(vec![
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
                false,
            ),
            Field::new(symbol_a, DataType::Float64, false),
            Field::new(format!("{symbol_a}_volume"), DataType::Float64, true),
            Field::new(symbol_b, DataType::Float64, false),
            Field::new(format!("{symbol_b}_volume"), DataType::Float64, true),
            Field::new("spread", DataType::Float64, false),
            Field::new("mean", DataType::Float64, true),
            Field::new("std", DataType::Float64, true),
            Field::new("zscore", DataType::Float64, true),
            Field::new("rolling_corr", DataType::Float64, true),
            Field::new("adf_p_value", DataType::Utf8, false),
        ])
    }

    /// Converts annotated rows to an Arrow RecordBatch.
    fn rows_to_batch(
        schema: Arc<Schema>,
        rows: &[AnnotatedRow],
        adf_p_value: &str,
    ) -> Result<RecordBatch, FormatError> {
        let timestamps: Vec<_> = rows.iter().map(|r| r.timestamp.timestamp_micros()).collect();
        let column = |f: fn(&AnnotatedRow) -> f64| -> Float64Array {
            rows.iter().map(f).collect::<Vec<_>>().into()
        };
        let nullable = |f: fn(&AnnotatedRow) -> Option<f64>| -> Float64Array {
            rows.iter().map(f).collect::<Vec<_>>().into()
        };

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
                Arc::new(column(|r| r.price_a)),
                Arc::new(nullable(|r| r.volume_a)),
                Arc::new(column(|r| r.price_b)),
                Arc::new(nullable(|r| r.volume_b)),
                Arc::new(column(|r| r.spread)),
                Arc::new(nullable(|r| r.rolling_mean)),
                Arc::new(nullable(|r| r.rolling_std)),
                Arc::new(nullable(|r| r.zscore)),
                Arc::new(nullable(|r| r.rolling_corr)),
                Arc::new(StringArray::from(vec![adf_p_value; rows.len()])),
            ],
        )
        .map_err(|e| FormatError::Parquet(e.to_string()))
    }
}

impl Formatter for ParquetFormatter {
    fn write_report<W: Write + Send>(
        &self,
        report: &AnalyticsReport,
        writer: W,
    ) -> Result<(), FormatError> {
        let schema = Arc::new(Self::report_schema(&report.symbol_a, &report.symbol_b));
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();
        let adf = report.metrics.adf_p_value.formatted();

        let mut arrow_writer = ArrowWriter::try_new(writer, Arc::clone(&schema), Some(props))
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        for chunk in report.rows.chunks(self.row_group_size.max(1)) {
            let batch = Self::rows_to_batch(Arc::clone(&schema), chunk, &adf)?;
            arrow_writer
                .write(&batch)
                .map_err(|e| FormatError::Parquet(e.to_string()))?;
        }

        arrow_writer
            .close()
            .map_err(|e| FormatError::Parquet(e.to_string()))?;

        Ok(())
    }

    fn extension(&self) -> &str {
        "parquet"
    }
}
