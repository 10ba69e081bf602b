//! Tree rendering: Graphviz DOT plus two plain-text views.

use std::collections::HashMap;
use std::fmt::Write;

use generational_arena::Index;
use itertools::Itertools;
use regex::Regex;
use termtree::Tree;
use tracing::instrument;

use crate::config::RenderConfig;
use crate::domain::{DecisionTree, TreeNode};

/// Output flavours of a rendered tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Graphviz digraph
    #[default]
    Dot,
    /// Indented text tree with edge conditions
    Outline,
    /// One line per leaf with its core features
    Leaves,
}

/// Render `tree` in the requested format.
pub fn render(tree: &DecisionTree, format: OutputFormat, config: &RenderConfig) -> String {
    match format {
        OutputFormat::Dot => DotRenderer::new(config).render(tree),
        OutputFormat::Outline => render_outline(tree),
        OutputFormat::Leaves => render_leaves(tree),
    }
}

/// Renders a [`DecisionTree`] as a Graphviz digraph.
///
/// Nodes are visited in pre-order. Leaves (or every node, with
/// `core_features` set) get an explicit label made of the node name and its
/// core features; edges carry the split condition.
pub struct DotRenderer<'a> {
    config: &'a RenderConfig,
    id_regex: Regex,
}

impl<'a> DotRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            id_regex: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap(),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn render(&self, tree: &DecisionTree) -> String {
        let mut out = String::new();
        self.write_header(&mut out);

        for (_, node) in tree.iter() {
            self.write_node(&mut out, node);
            for (side, child_idx) in node.children() {
                if let Some(child) = tree.get_node(child_idx) {
                    let _ = writeln!(
                        out,
                        "    {} -> {} [label={}]",
                        self.id(node.name()),
                        self.id(child.name()),
                        quote(&node.record.condition(side))
                    );
                }
            }
        }

        out.push_str("}\n");
        out
    }

    fn write_header(&self, out: &mut String) {
        let _ = writeln!(out, "digraph {{");
        let _ = writeln!(out, "    node [shape={}]", self.id(&self.config.node_shape));
        let _ = writeln!(out, "    compound={}", self.config.compound);
        let _ = writeln!(out, "    concentrate={}", self.config.concentrate);
        let _ = writeln!(out, "    ranksep={}", self.config.ranksep);
        out.push('\n');
    }

    fn write_node(&self, out: &mut String, node: &TreeNode) {
        let id = self.id(node.name());
        if node.is_leaf() || self.config.core_features {
            let _ = writeln!(out, "    {} [label=\"{}\"]", id, node_label(node));
        } else {
            let _ = writeln!(out, "    {}", id);
        }
    }

    /// Bare identifier if DOT accepts it as is, quoted string otherwise.
    fn id(&self, name: &str) -> String {
        if self.id_regex.is_match(name) {
            name.to_string()
        } else {
            quote(name)
        }
    }
}

/// Escaped label body: name and core features separated by `\n` markers.
fn node_label(node: &TreeNode) -> String {
    std::iter::once(node.name())
        .chain(node.record.core_features.iter().map(String::as_str))
        .map(escape)
        .join("\\n")
}

fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

fn outline_label(node: &TreeNode) -> String {
    let mut label = node.name().to_string();
    if let Some(kind) = node.record.leaf_kind {
        let _ = write!(label, " ({} leaf)", kind);
    }
    if node.is_leaf() && !node.record.core_features.is_empty() {
        let _ = write!(label, " [{}]", node.record.core_features.iter().join(", "));
    }
    label
}

/// Indented text tree; child lines are prefixed with their edge condition.
pub fn render_outline(tree: &DecisionTree) -> String {
    // Reverse pre-order guarantees children are built before their parent
    let order: Vec<(Index, &TreeNode)> = tree.iter().collect();
    let mut built: HashMap<Index, Tree<String>> = HashMap::new();

    for (idx, node) in order.into_iter().rev() {
        let leaves: Vec<Tree<String>> = node
            .children()
            .filter_map(|(side, child_idx)| {
                built.remove(&child_idx).map(|mut child| {
                    child.root = format!("{}: {}", node.record.condition(side), child.root);
                    child
                })
            })
            .collect();
        built.insert(idx, Tree::new(outline_label(node)).with_leaves(leaves));
    }

    built
        .remove(&tree.root())
        .map(|t| t.to_string())
        .unwrap_or_default()
}

/// One `NAME<TAB>core, features` line per leaf, in pre-order.
pub fn render_leaves(tree: &DecisionTree) -> String {
    tree.leaf_nodes()
        .iter()
        .map(|leaf| {
            format!(
                "{}\t{}\n",
                leaf.name(),
                leaf.record.core_features.iter().join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape(r"a\b"), r"a\\b");
        assert_eq!(escape("a\nb"), r"a\nb");
    }

    #[test]
    fn test_id_quotes_unsafe_names() {
        let config = RenderConfig::default();
        let renderer = DotRenderer::new(&config);
        assert_eq!(renderer.id("Root_L"), "Root_L");
        assert_eq!(renderer.id("Root L"), "\"Root L\"");
        assert_eq!(renderer.id("1Root"), "\"1Root\"");
    }
}
