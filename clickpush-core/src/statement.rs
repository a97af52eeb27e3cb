//! INSERT statement assembly.
//!
//! The generated SQL is the loader's only wire format. Its shape is fixed by
//! the target table:
//!
//! ```text
//! INSERT INTO <table> ([timestamp],[received],[deviceId],[eventCode],[msoName]) VALUES ('..', ...), ('..', ...)
//! ```
//!
//! Values are interpolated as quoted literals; the input is a trusted export,
//! not user input.

use crate::error::BatchError;
use crate::record::{EventRecord, EXPECTED_FIELDS};

/// Column list of the target table, fixed by its schema.
const COLUMN_LIST: &str = "([timestamp],[received],[deviceId],[eventCode],[msoName])";

/// Default target table.
pub const DEFAULT_TABLE: &str = "clickstreamEventsLog";

/// Characters a fixed-width timestamp keeps: `YYYY-MM-DD HH:MM:SS`.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Characters of statement text kept in failure reports.
const PREVIEW_CHARS: usize = 100;

/// How the raw timestamp field is trimmed down to what the target column
/// stores.
///
/// Historical loader builds disagreed on this, so the rule is explicit
/// configuration rather than a guess between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampRule {
    /// Keep the first 19 characters.
    #[default]
    FixedWidth,
    /// Cut one character before the last hyphen.
    BeforeLastHyphen,
}

/// A ready-to-execute statement plus its position in emission order.
///
/// Sequence numbers are zero-based and assigned in emission order; the unit
/// is immutable once built and consumed exactly once by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementUnit {
    sequence: usize,
    sql: String,
}

impl StatementUnit {
    pub(crate) fn new(sequence: usize, sql: String) -> Self {
        Self { sequence, sql }
    }

    /// Position of this unit in emission order.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// The full SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Truncated statement text for failure reports.
    pub fn preview(&self) -> &str {
        match self.sql.char_indices().nth(PREVIEW_CHARS) {
            Some((index, _)) => &self.sql[..index],
            None => &self.sql,
        }
    }
}

/// INSERT header for `table`, up to and including the `VALUES ` keyword.
pub(crate) fn insert_header(table: &str) -> String {
    format!("INSERT INTO {table} {COLUMN_LIST} VALUES ")
}

/// Format one record into its quoted value tuple.
///
/// `row` is the record's index in the overall input, used for error
/// reporting. Field 0 is trimmed by `rule`; field 1 loses its one-character
/// prefix and has underscores replaced by spaces; fields 2 through 4 lose
/// their prefix only.
pub(crate) fn value_tuple(
    record: &EventRecord,
    row: usize,
    rule: TimestampRule,
) -> Result<String, BatchError> {
    if record.len() < EXPECTED_FIELDS {
        return Err(BatchError::malformed(row, record.len(), "is missing"));
    }

    let field = |index: usize| {
        record
            .field(index)
            .ok_or_else(|| BatchError::malformed(row, index, "is missing"))
    };

    let timestamp = trim_timestamp(field(0)?, row, rule)?;
    let received = strip_prefix(field(1)?, row, 1)?.replace('_', " ");
    let device_id = strip_prefix(field(2)?, row, 2)?;
    let event_code = strip_prefix(field(3)?, row, 3)?;
    let mso_name = strip_prefix(field(4)?, row, 4)?;

    Ok(format!(
        "('{timestamp}', '{received}', '{device_id}', '{event_code}', '{mso_name}')"
    ))
}

fn trim_timestamp(raw: &str, row: usize, rule: TimestampRule) -> Result<&str, BatchError> {
    match rule {
        TimestampRule::FixedWidth => raw.get(..TIMESTAMP_WIDTH).ok_or_else(|| {
            BatchError::malformed(
                row,
                0,
                format!("is shorter than {TIMESTAMP_WIDTH} characters"),
            )
        }),
        TimestampRule::BeforeLastHyphen => {
            let hyphen = raw
                .rfind('-')
                .ok_or_else(|| BatchError::malformed(row, 0, "has no hyphen to trim at"))?;
            raw.get(..hyphen.saturating_sub(1))
                .filter(|trimmed| !trimmed.is_empty())
                .ok_or_else(|| {
                    BatchError::malformed(row, 0, "is too short to trim at its last hyphen")
                })
        }
    }
}

fn strip_prefix(raw: &str, row: usize, field: usize) -> Result<&str, BatchError> {
    raw.get(1..)
        .ok_or_else(|| BatchError::malformed(row, field, "has no prefix character to strip"))
}
