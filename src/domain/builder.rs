//! Tree builder: reassembles a decision tree from unordered node records.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::arena::DecisionTree;
use crate::domain::entities::{NodeRecord, Side, ROOT_NAME};
use crate::domain::error::{DomainError, DomainResult};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Recoverable anomalies seen while building.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Names that occurred more than once; the last record won
    pub duplicates: Vec<String>,
    /// Records not reachable from the root through `_L`/`_R` names, sorted
    pub unreachable: Vec<String>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.unreachable.is_empty()
    }
}

/// Constructs a [`DecisionTree`] from treelog records.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    lookup: HashMap<String, NodeRecord>,
    duplicates: Vec<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the tree rooted at the record named `Root`.
    ///
    /// Children are found by name: `<parent>_L` and `<parent>_R`. Each record
    /// is consumed at most once; whatever is left over is reported as
    /// unreachable.
    #[instrument(level = "debug", skip(self, records))]
    pub fn build(
        &mut self,
        records: impl IntoIterator<Item = NodeRecord>,
    ) -> TreeResult<(DecisionTree, BuildReport)> {
        // Reset state for a fresh build
        self.lookup.clear();
        self.duplicates.clear();

        self.index_records(records);

        let root = self
            .lookup
            .remove(ROOT_NAME)
            .ok_or(DomainError::MissingRoot)?;
        let mut tree = DecisionTree::with_root(root);
        let mut stack = vec![tree.root()];

        while let Some(current_idx) = stack.pop() {
            let parent_name = match tree.get_node(current_idx) {
                Some(node) => node.name().to_string(),
                None => continue,
            };

            for side in [Side::Left, Side::Right] {
                let child_name = side.child_name(&parent_name);
                if let Some(child) = self.lookup.remove(&child_name) {
                    if let Some(child_idx) = tree.attach(current_idx, side, child) {
                        stack.push(child_idx);
                    }
                }
            }
        }

        let mut unreachable: Vec<String> = self.lookup.drain().map(|(name, _)| name).collect();
        unreachable.sort();

        let report = BuildReport {
            duplicates: std::mem::take(&mut self.duplicates),
            unreachable,
        };
        debug!(
            "build: {} nodes, depth {}, {} duplicates, {} unreachable",
            tree.len(),
            tree.depth(),
            report.duplicates.len(),
            report.unreachable.len()
        );

        Ok((tree, report))
    }

    fn index_records(&mut self, records: impl IntoIterator<Item = NodeRecord>) {
        for record in records {
            let name = record.name.clone();
            if self.lookup.insert(name.clone(), record).is_some() {
                debug!("duplicate record name, keeping the last one: {}", name);
                if !self.duplicates.contains(&name) {
                    self.duplicates.push(name);
                }
            }
        }
    }
}
