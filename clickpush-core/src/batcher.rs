//! Grouping records into bounded multi-row INSERT statements.

use tracing::debug;

use crate::error::BatchError;
use crate::record::EventRecord;
use crate::statement::{insert_header, value_tuple, StatementUnit, TimestampRule, DEFAULT_TABLE};

/// Default number of records combined into one INSERT.
pub const DEFAULT_MAX_RECORDS: usize = 100;

/// Batcher configuration.
#[derive(Debug, Clone)]
pub struct BatcherConfig {
    /// Target table name, substituted into the INSERT header.
    pub table: String,
    /// Maximum value tuples per statement; clamped to at least 1.
    pub max_records: usize,
    /// Timestamp trimming rule applied to field 0.
    pub timestamp_rule: TimestampRule,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            max_records: DEFAULT_MAX_RECORDS,
            timestamp_rule: TimestampRule::default(),
        }
    }
}

/// Turns an ordered record sequence into an ordered sequence of
/// [`StatementUnit`]s.
///
/// Every emitted unit except possibly the last holds exactly `max_records`
/// value tuples; the last holds the remainder and is only emitted when it is
/// non-empty, so an input of length `N` yields `ceil(N / max_records)` units
/// and an empty input yields none.
#[derive(Debug, Clone)]
pub struct StatementBatcher {
    config: BatcherConfig,
}

impl StatementBatcher {
    /// Create a batcher for `config`.
    pub fn new(mut config: BatcherConfig) -> Self {
        config.max_records = config.max_records.max(1);
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Lazy statement sequence over `records`.
    ///
    /// The iterator is finite, not restartable, and fused after the first
    /// malformed record: units emitted before the bad row are still valid,
    /// nothing after it is produced.
    pub fn batches(&self, records: Vec<EventRecord>) -> Batches {
        Batches {
            header: insert_header(&self.config.table),
            max_records: self.config.max_records,
            rule: self.config.timestamp_rule,
            records: records.into_iter(),
            row: 0,
            sequence: 0,
            tuples: Vec::with_capacity(self.config.max_records),
            done: false,
        }
    }

    /// Eagerly build every statement; used by the dry-run path.
    pub fn statements(&self, records: Vec<EventRecord>) -> Result<Vec<StatementUnit>, BatchError> {
        self.batches(records).collect()
    }
}

/// Iterator state for the lazy batch walk.
pub struct Batches {
    header: String,
    max_records: usize,
    rule: TimestampRule,
    records: std::vec::IntoIter<EventRecord>,
    row: usize,
    sequence: usize,
    tuples: Vec<String>,
    done: bool,
}

impl Batches {
    fn emit(&mut self) -> StatementUnit {
        let count = self.tuples.len();
        let sql = format!("{}{}", self.header, self.tuples.join(", "));
        self.tuples.clear();

        let unit = StatementUnit::new(self.sequence, sql);
        debug!(sequence = unit.sequence(), tuples = count, "emitting statement batch");
        self.sequence += 1;
        unit
    }
}

impl Iterator for Batches {
    type Item = Result<StatementUnit, BatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        for record in self.records.by_ref() {
            let tuple = match value_tuple(&record, self.row, self.rule) {
                Ok(tuple) => tuple,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };
            self.row += 1;
            self.tuples.push(tuple);

            if self.tuples.len() == self.max_records {
                return Some(Ok(self.emit()));
            }
        }

        self.done = true;
        if self.tuples.is_empty() {
            None
        } else {
            Some(Ok(self.emit()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records(count: usize) -> Vec<EventRecord> {
        (0..count)
            .map(|i| {
                [
                    "2016-05-10 17:14:30-1".to_string(),
                    format!("_room_{i}"),
                    format!("ddev{i}"),
                    format!("e{i}"),
                    "mAcme".to_string(),
                ]
                .into_iter()
                .collect()
            })
            .collect()
    }

    fn batcher(max_records: usize) -> StatementBatcher {
        StatementBatcher::new(BatcherConfig {
            max_records,
            ..BatcherConfig::default()
        })
    }

    fn tuple_count(unit: &StatementUnit) -> usize {
        unit.sql().matches("('").count()
    }

    #[test]
    fn test_three_records_batch_of_two() {
        let units = batcher(2).statements(records(3)).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(tuple_count(&units[0]), 2);
        assert_eq!(tuple_count(&units[1]), 1);
        assert_eq!(units[0].sequence(), 0);
        assert_eq!(units[1].sequence(), 1);
    }

    #[test]
    fn test_exact_multiple_emits_no_empty_trailer() {
        let units = batcher(2).statements(records(4)).unwrap();
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| tuple_count(u) == 2));
    }

    #[test]
    fn test_unit_count_is_ceiling_of_records_over_batch() {
        for (count, max, expected) in [(10, 3, 4), (1, 100, 1), (100, 100, 1), (101, 100, 2)] {
            let units = batcher(max).statements(records(count)).unwrap();
            assert_eq!(units.len(), expected, "count={count} max={max}");
        }
    }

    #[test]
    fn test_empty_input_emits_nothing() {
        let units = batcher(2).statements(Vec::new()).unwrap();
        assert!(units.is_empty());
    }

    #[test]
    fn test_sequence_numbers_are_gapless() {
        let units = batcher(1).statements(records(5)).unwrap();
        let sequences: Vec<usize> = units.iter().map(StatementUnit::sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_statement_text_is_pinned() {
        let units = batcher(100).statements(records(2)).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(
            units[0].sql(),
            "INSERT INTO clickstreamEventsLog \
             ([timestamp],[received],[deviceId],[eventCode],[msoName]) VALUES \
             ('2016-05-10 17:14:30', 'room 0', 'dev0', '0', 'Acme'), \
             ('2016-05-10 17:14:30', 'room 1', 'dev1', '1', 'Acme')"
        );
    }

    #[test]
    fn test_malformed_record_fuses_the_iterator() {
        let mut input = records(1);
        input.push(["2016", "_a", "db", "ec", "md"].into_iter().collect());

        let mut batches = batcher(1).batches(input);
        let first = batches.next().unwrap().unwrap();
        assert_eq!(first.sequence(), 0);

        let err = batches.next().unwrap().unwrap_err();
        assert_eq!(err.row(), 1);
        assert_eq!(err.field(), 0);

        assert!(batches.next().is_none());
    }

    #[test]
    fn test_zero_max_records_is_clamped() {
        let units = batcher(0).statements(records(3)).unwrap();
        assert_eq!(units.len(), 3);
    }
}
