//! Domain entities: core data structures

use std::fmt;

/// Name of the single record every treelog must contain.
pub const ROOT_NAME: &str = "Root";

/// Suffix appended to a parent's name to name its left child.
pub const LEFT_SUFFIX: &str = "_L";

/// Suffix appended to a parent's name to name its right child.
pub const RIGHT_SUFFIX: &str = "_R";

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Left => LEFT_SUFFIX,
            Side::Right => RIGHT_SUFFIX,
        }
    }

    /// Name a child on this side of `parent` would carry.
    pub fn child_name(self, parent: &str) -> String {
        format!("{}{}", parent, self.suffix())
    }

    /// Comparison operator routing data to this side.
    pub fn operator(self) -> &'static str {
        match self {
            Side::Left => "<",
            Side::Right => ">=",
        }
    }
}

/// Terminal node type written by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// `Constant leaf`: predicts a constant
    Constant,
    /// `Regression leaf`: fits a model on its core features
    Regression,
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafKind::Constant => write!(f, "constant"),
            LeafKind::Regression => write!(f, "regression"),
        }
    }
}

/// One blank-line-delimited block of a treelog.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// `Root`, `Root_L`, `Root_L_R`, ...
    pub name: String,
    /// Feature chosen for the split, absent for leaves
    pub split_feature: Option<String>,
    /// Split threshold, absent for leaves
    pub split_value: Option<f64>,
    /// Tab-indented descriptive lines, in log order
    pub core_features: Vec<String>,
    pub leaf_kind: Option<LeafKind>,
}

impl NodeRecord {
    /// Record with a name only, as produced for a bare block.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            split_feature: None,
            split_value: None,
            core_features: Vec::new(),
            leaf_kind: None,
        }
    }

    pub fn with_split(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.split_feature = Some(feature.into());
        self.split_value = Some(value);
        self
    }

    pub fn with_core_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_leaf_kind(mut self, kind: LeafKind) -> Self {
        self.leaf_kind = Some(kind);
        self
    }

    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAME
    }

    /// Human readable split condition for the edge to the child on `side`.
    ///
    /// Missing feature or value renders as `?`.
    pub fn condition(&self, side: Side) -> String {
        let feature = self.split_feature.as_deref().unwrap_or("?");
        let value = self
            .split_value
            .map(format_threshold)
            .unwrap_or_else(|| "?".to_string());
        format!("{} {} {}", feature, side.operator(), value)
    }
}

impl fmt::Display for NodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let (Some(feature), Some(value)) = (&self.split_feature, self.split_value) {
            write!(f, " split={}@{}", feature, format_threshold(value))?;
        }
        if let Some(kind) = self.leaf_kind {
            write!(f, " leaf={}", kind)?;
        }
        if !self.core_features.is_empty() {
            write!(f, " core_features={:?}", self.core_features)?;
        }
        Ok(())
    }
}

/// Format a threshold the way the learner prints doubles.
///
/// Integral values keep one decimal (`30.0`), everything else uses the
/// shortest representation that round-trips.
pub fn format_threshold(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
