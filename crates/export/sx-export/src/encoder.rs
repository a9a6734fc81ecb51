//! CSV encoding of result pages.

use serde_json::Value;
use std::borrow::Cow;
use sx_error::{Result, SxError};
use sx_types::{ResultRow, Schema};

/// Encode rows against a schema as CSV text.
///
/// Emits the header line first when `include_header` is set, then one line
/// per row with one cell per schema field, in schema order. Every record ends
/// with `\r\n`, so the output of consecutive pages can be concatenated.
pub fn encode(schema: &Schema, rows: &[ResultRow], include_header: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    if include_header {
        writer.write_record(schema.fields()).map_err(encode_error)?;
    }

    for row in rows {
        let cells: Vec<Cow<'_, str>> =
            schema.fields().iter().map(|field| cell(row.get(field))).collect();
        writer
            .write_record(cells.iter().map(|c| c.as_bytes()))
            .map_err(encode_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SxError::Encode(format!("Failed to flush CSV writer: {e}")))?;

    String::from_utf8(bytes).map_err(|e| SxError::Encode(format!("CSV output is not UTF-8: {e}")))
}

/// Render one value as cell text.
fn cell(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

fn encode_error(e: csv::Error) -> SxError {
    SxError::Encode(format!("Failed to write CSV record: {e}"))
}
