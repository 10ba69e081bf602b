//! Treelog visualization service
//!
//! Reads a treelog, rebuilds the decision tree and applies the anomaly
//! policies before anything is rendered.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::render::{render, OutputFormat};
use crate::application::{Anomaly, AnomalyKind, ApplicationError, ApplicationResult, IoResultExt};
use crate::config::{AnomalyPolicy, PolicyConfig, RenderConfig};
use crate::domain::{BuildReport, DecisionTree, RecordParser, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// A rebuilt tree together with the anomalies that were tolerated.
#[derive(Debug)]
pub struct LoadedTree {
    pub tree: DecisionTree,
    /// Number of records the parser produced
    pub record_count: usize,
    /// Anomalies under the `warn` policy, for the caller to surface
    pub warnings: Vec<Anomaly>,
}

/// Service turning treelogs into rendered trees.
pub struct VisualizeService {
    fs: Arc<dyn FileSystem>,
    policy: PolicyConfig,
}

impl VisualizeService {
    pub fn new(fs: Arc<dyn FileSystem>, policy: PolicyConfig) -> Self {
        Self { fs, policy }
    }

    /// Read and rebuild the tree stored in `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LoadedTree> {
        if !self.fs.exists(path) {
            return Err(ApplicationError::TreelogNotFound(path.to_path_buf()));
        }
        let text = self
            .fs
            .read_to_string(path)
            .with_path_context("read treelog", path)?;
        self.load_str(&text)
    }

    /// Rebuild the tree from treelog text.
    ///
    /// Fatal: malformed split values, missing root, and any anomaly whose
    /// policy is `strict`. Nothing is returned on failure.
    pub fn load_str(&self, text: &str) -> ApplicationResult<LoadedTree> {
        let mut warnings = Vec::new();

        let parsed = RecordParser::new(text).parse()?;
        let record_count = parsed.records.len();
        if let Some(name) = parsed.unterminated {
            self.check(
                AnomalyKind::UnterminatedBlock,
                self.policy.unterminated_block,
                vec![name],
                &mut warnings,
            )?;
        }

        let (tree, report) = TreeBuilder::new().build(parsed.records)?;
        let BuildReport {
            duplicates,
            unreachable,
        } = report;
        self.check(
            AnomalyKind::DuplicateNames,
            self.policy.duplicate_names,
            duplicates,
            &mut warnings,
        )?;
        self.check(
            AnomalyKind::UnreachableRecords,
            self.policy.unreachable_records,
            unreachable,
            &mut warnings,
        )?;

        info!(
            "rebuilt tree: {} of {} records, depth {}, {} leaves",
            tree.len(),
            record_count,
            tree.depth(),
            tree.leaf_nodes().len()
        );

        Ok(LoadedTree {
            tree,
            record_count,
            warnings,
        })
    }

    /// Load `path` and render it. The result is complete or an error, never partial.
    pub fn render(
        &self,
        path: &Path,
        format: OutputFormat,
        config: &RenderConfig,
    ) -> ApplicationResult<(String, Vec<Anomaly>)> {
        let loaded = self.load(path)?;
        Ok((render(&loaded.tree, format, config), loaded.warnings))
    }

    fn check(
        &self,
        kind: AnomalyKind,
        policy: AnomalyPolicy,
        names: Vec<String>,
        warnings: &mut Vec<Anomaly>,
    ) -> ApplicationResult<()> {
        if names.is_empty() {
            return Ok(());
        }
        let anomaly = Anomaly { kind, names };
        match policy {
            AnomalyPolicy::Ignore => debug!("ignored: {}", anomaly),
            AnomalyPolicy::Warn => {
                debug!("tolerated: {}", anomaly);
                warnings.push(anomaly);
            }
            AnomalyPolicy::Strict => return Err(ApplicationError::Anomaly(anomaly)),
        }
        Ok(())
    }
}
