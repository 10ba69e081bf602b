//! Record parser for learner treelogs.
//!
//! A treelog is a sequence of blank-line-delimited blocks, one per tree node:
//!
//! ```text
//! Root
//! Best ROC: 0.71
//! Best feature: age
//! Best split: 30.0
//!
//! Root_L
//! Core features:
//! 	income
//! Regression leaf
//!
//! ```
//!
//! Lines are classified one at a time, first match wins. A block is emitted
//! when a blank line closes it and a node name was seen.

use std::iter::Enumerate;
use std::str::Lines;

use tracing::{debug, instrument, trace};

use crate::domain::entities::{LeafKind, NodeRecord, ROOT_NAME};
use crate::domain::error::{DomainError, DomainResult};

const FEATURE_MARKER: &str = "Best feature:";
const SPLIT_MARKER: &str = "Best split:";
const CONSTANT_LEAF_MARKER: &str = "Constant leaf";
const REGRESSION_LEAF_MARKER: &str = "Regression leaf";

/// What a single treelog line contributes to the current block.
#[derive(Debug, PartialEq)]
enum LineKind<'l> {
    CoreFeature(&'l str),
    SplitFeature(&'l str),
    SplitValue(&'l str),
    Name(&'l str),
    Leaf(LeafKind),
    Blank,
    Other,
}

fn after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

fn classify(line: &str) -> LineKind<'_> {
    if line.starts_with('\t') {
        LineKind::CoreFeature(line.trim())
    } else if line.contains(FEATURE_MARKER) {
        LineKind::SplitFeature(after_colon(line))
    } else if line.contains(SPLIT_MARKER) {
        LineKind::SplitValue(after_colon(line))
    } else if line.contains(ROOT_NAME) {
        LineKind::Name(line.trim())
    } else if line.contains(CONSTANT_LEAF_MARKER) {
        LineKind::Leaf(LeafKind::Constant)
    } else if line.contains(REGRESSION_LEAF_MARKER) {
        LineKind::Leaf(LeafKind::Regression)
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Other
    }
}

/// Per-block state, reset whenever a blank line closes a block.
#[derive(Debug, Default)]
struct BlockAccumulator {
    name: Option<String>,
    split_feature: Option<String>,
    split_value: Option<f64>,
    core_features: Vec<String>,
    leaf_kind: Option<LeafKind>,
}

impl BlockAccumulator {
    /// Close the block. Yields a record only if a name was seen.
    fn finish(&mut self) -> Option<NodeRecord> {
        let block = std::mem::take(self);
        block.name.map(|name| NodeRecord {
            name,
            split_feature: block.split_feature,
            split_value: block.split_value,
            core_features: block.core_features,
            leaf_kind: block.leaf_kind,
        })
    }
}

/// Everything a full pass over a treelog produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLog {
    /// Records in block order
    pub records: Vec<NodeRecord>,
    /// Name of a trailing block that was never closed by a blank line
    pub unterminated: Option<String>,
}

/// Parses treelog text into [`NodeRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'a> {
    text: &'a str,
}

impl<'a> RecordParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Lazy iterator over the records. Each call starts from the top.
    pub fn records(&self) -> Records<'a> {
        Records {
            lines: self.text.lines().enumerate(),
            block: BlockAccumulator::default(),
            failed: false,
        }
    }

    /// Collect all records, stopping at the first malformed split value.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&self) -> DomainResult<ParsedLog> {
        let mut records = self.records();
        let parsed = records.by_ref().collect::<DomainResult<Vec<_>>>()?;
        let unterminated = records.unterminated().map(str::to_string);
        debug!(
            "parse: {} records, unterminated block: {:?}",
            parsed.len(),
            unterminated
        );
        Ok(ParsedLog {
            records: parsed,
            unterminated,
        })
    }
}

/// Iterator returned by [`RecordParser::records`].
#[derive(Debug)]
pub struct Records<'a> {
    lines: Enumerate<Lines<'a>>,
    block: BlockAccumulator,
    failed: bool,
}

impl Records<'_> {
    /// Name of the block still open. Only meaningful once the iterator is exhausted.
    pub fn unterminated(&self) -> Option<&str> {
        self.block.name.as_deref()
    }
}

impl Iterator for Records<'_> {
    type Item = DomainResult<NodeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for (idx, line) in self.lines.by_ref() {
            match classify(line) {
                LineKind::CoreFeature(feature) => {
                    self.block.core_features.push(feature.to_string())
                }
                LineKind::SplitFeature(feature) => {
                    self.block.split_feature = Some(feature.to_string())
                }
                LineKind::SplitValue(raw) => match raw.parse::<f64>() {
                    Ok(value) => self.block.split_value = Some(value),
                    Err(source) => {
                        self.failed = true;
                        return Some(Err(DomainError::InvalidSplitValue {
                            line: idx + 1,
                            value: raw.to_string(),
                            source,
                        }));
                    }
                },
                LineKind::Name(name) => self.block.name = Some(name.to_string()),
                LineKind::Leaf(kind) => self.block.leaf_kind = Some(kind),
                LineKind::Blank => {
                    if let Some(record) = self.block.finish() {
                        debug!("Parsed a node: {}", record);
                        return Some(Ok(record));
                    }
                    trace!("line {}: blank line closed a block without a name", idx + 1);
                }
                LineKind::Other => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(classify("\tRoot_L"), LineKind::CoreFeature("Root_L"));
        assert_eq!(classify("Best feature: age"), LineKind::SplitFeature("age"));
        assert_eq!(classify("Best split: 30.0"), LineKind::SplitValue("30.0"));
        assert_eq!(classify("  Root_L_R  "), LineKind::Name("Root_L_R"));
        assert_eq!(classify("Constant leaf"), LineKind::Leaf(LeafKind::Constant));
        assert_eq!(
            classify("Regression leaf: 12 instances"),
            LineKind::Leaf(LeafKind::Regression)
        );
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("Best ROC: 0.7"), LineKind::Other);
        assert_eq!(classify("Core features:"), LineKind::Other);
    }

    #[test]
    fn test_split_value_uses_text_after_first_colon() {
        assert_eq!(after_colon("Best split: 1.5"), "1.5");
        assert_eq!(after_colon("no colon"), "");
    }

    #[test]
    fn test_blank_line_without_name_discards_state() {
        let text = "Best feature: age\nBest split: 1.0\n\nRoot\n\n";
        let parsed = RecordParser::new(text).parse().unwrap();
        assert_eq!(parsed.records, vec![NodeRecord::named("Root")]);
    }

    #[test]
    fn test_records_is_restartable() {
        let parser = RecordParser::new("Root\n\nRoot_L\n\n");
        let first: Vec<_> = parser.records().map(|r| r.unwrap().name).collect();
        let second: Vec<_> = parser.records().map(|r| r.unwrap().name).collect();
        assert_eq!(first, vec!["Root", "Root_L"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_iteration_stops_after_error() {
        let parser = RecordParser::new("Root\nBest split: abc\n\nRoot_L\n\n");
        let mut records = parser.records();
        assert!(matches!(
            records.next(),
            Some(Err(DomainError::InvalidSplitValue { line: 2, .. }))
        ));
        assert!(records.next().is_none());
    }
}
