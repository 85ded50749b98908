//! Output formatting for featint results.
//!
//! Each input row is echoed with six result columns appended. Empty result
//! fields are written as ".".

use anyhow::Result;

use std::io::Write;

use crate::engine::Summary;
use crate::types::ResultRow;

/// Names of the appended result columns, in output order.
pub const RESULT_COLUMNS: [&str; 6] = [
    "Overlap_Count",
    "Name",
    "Type",
    "Strand",
    "Distance",
    "Overlap_Extent",
];

/// Written in place of an empty result field.
pub const NO_DATA: &str = ".";

/// Write the output header for table inputs. Headerless inputs get none.
pub fn write_header<W: Write>(writer: &mut W, input_header: Option<&[String]>) -> Result<()> {
    if let Some(header) = input_header {
        let mut columns: Vec<&str> = header.iter().map(|s| s.as_str()).collect();
        columns.extend(RESULT_COLUMNS);
        writeln!(writer, "{}", columns.join("\t"))?;
    }
    Ok(())
}

/// Format one output line: the original fields followed by the result.
pub fn format_output_line(fields: &[String], result: &ResultRow) -> String {
    fn or_no_data<T: ToString>(value: &Option<T>) -> String {
        value
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| NO_DATA.to_string())
    }

    let mut line = fields.join("\t");
    if !line.is_empty() {
        line.push('\t');
    }
    line.push_str(&format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        result.match_count,
        or_no_data(&result.name),
        or_no_data(&result.feature_type),
        or_no_data(&result.strand),
        or_no_data(&result.distance),
        or_no_data(&result.overlap),
    ));
    line
}

/// Write the end-of-run match summary.
pub fn write_summary<W: Write>(writer: &mut W, summary: &Summary) -> Result<()> {
    writeln!(writer, "Processed {} reference rows", summary.total())?;
    writeln!(
        writer,
        "  {:>10} ({:5.1}%) matched one feature",
        summary.one,
        summary.percent(summary.one)
    )?;
    writeln!(
        writer,
        "  {:>10} ({:5.1}%) matched no features",
        summary.zero,
        summary.percent(summary.zero)
    )?;
    writeln!(
        writer,
        "  {:>10} ({:5.1}%) matched multiple features",
        summary.multiple,
        summary.percent(summary.multiple)
    )?;
    Ok(())
}
