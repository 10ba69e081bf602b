//! Tests for DOT, outline and leaves rendering

use rstest::{fixture, rstest};

use treelog_dot::application::render::{render_leaves, render_outline};
use treelog_dot::application::{render, DotRenderer, OutputFormat};
use treelog_dot::config::RenderConfig;
use treelog_dot::domain::{DecisionTree, NodeRecord, TreeBuilder};

fn build(records: Vec<NodeRecord>) -> DecisionTree {
    TreeBuilder::new().build(records).unwrap().0
}

#[fixture]
fn scenario_a() -> DecisionTree {
    build(vec![
        NodeRecord::named("Root").with_split("age", 30.0),
        NodeRecord::named("Root_L").with_core_features(["age>30", "income<50k"]),
        NodeRecord::named("Root_R").with_core_features(["education"]),
    ])
}

#[rstest]
fn given_scenario_a_when_rendering_dot_then_output_matches(scenario_a: DecisionTree) {
    let config = RenderConfig::default();

    let dot = DotRenderer::new(&config).render(&scenario_a);

    let expected = r#"digraph {
    node [shape=box]
    compound=true
    concentrate=true
    ranksep=1

    Root
    Root -> Root_L [label="age < 30.0"]
    Root -> Root_R [label="age >= 30.0"]
    Root_L [label="Root_L\nage>30\nincome<50k"]
    Root_R [label="Root_R\neducation"]
}
"#;
    assert_eq!(dot, expected);
}

#[rstest]
fn given_scenario_a_when_rendering_then_exactly_two_edges(scenario_a: DecisionTree) {
    let dot = render(&scenario_a, OutputFormat::Dot, &RenderConfig::default());

    let edges: Vec<&str> = dot.lines().filter(|l| l.contains("->")).collect();
    assert_eq!(edges.len(), 2);
    assert!(edges[0].ends_with(r#"[label="age < 30.0"]"#));
    assert!(edges[1].ends_with(r#"[label="age >= 30.0"]"#));
}

#[rstest]
fn given_same_tree_when_rendering_twice_then_output_is_identical(scenario_a: DecisionTree) {
    let config = RenderConfig::default();

    let first = render(&scenario_a, OutputFormat::Dot, &config);
    let second = render(&scenario_a, OutputFormat::Dot, &config);

    assert_eq!(first, second);
}

#[rstest]
fn given_core_features_flag_when_rendering_then_interior_nodes_are_labelled(
    scenario_a: DecisionTree,
) {
    let config = RenderConfig {
        core_features: true,
        ..RenderConfig::default()
    };

    let dot = render(&scenario_a, OutputFormat::Dot, &config);

    assert!(dot.contains(r#"    Root [label="Root"]"#));
    assert!(!dot.lines().any(|l| l == "    Root"));
}

#[test]
fn given_orphan_when_rendering_then_it_is_never_referenced() {
    let tree = build(vec![
        NodeRecord::named("Root").with_split("x", 0.5),
        NodeRecord::named("Root_L"),
        NodeRecord::named("Orphan_L"),
    ]);

    let dot = render(&tree, OutputFormat::Dot, &RenderConfig::default());

    assert!(!dot.contains("Orphan"));
    assert!(dot.contains(r#"Root -> Root_L [label="x < 0.5"]"#));
}

#[test]
fn given_special_characters_when_rendering_then_labels_are_escaped() {
    let tree = build(vec![NodeRecord::named("Root")
        .with_core_features([r#"name="a""#, r"C:\data"])]);

    let dot = render(&tree, OutputFormat::Dot, &RenderConfig::default());

    assert!(dot.contains(r#"Root [label="Root\nname=\"a\"\nC:\\data"]"#));
}

#[test]
fn given_custom_graph_attributes_when_rendering_then_header_uses_them() {
    let tree = build(vec![NodeRecord::named("Root")]);
    let config = RenderConfig {
        node_shape: "ellipse".into(),
        compound: false,
        concentrate: false,
        ranksep: 0.5,
        ..RenderConfig::default()
    };

    let dot = render(&tree, OutputFormat::Dot, &config);

    assert!(dot.starts_with(
        "digraph {\n    node [shape=ellipse]\n    compound=false\n    concentrate=false\n    ranksep=0.5\n"
    ));
    assert!(dot.ends_with("}\n"));
}

#[rstest]
fn given_tree_when_rendering_outline_then_conditions_prefix_children(scenario_a: DecisionTree) {
    let outline = render_outline(&scenario_a);

    let lines: Vec<&str> = outline.lines().collect();
    assert_eq!(lines[0], "Root");
    assert!(lines[1].ends_with("age < 30.0: Root_L [age>30, income<50k]"));
    assert!(lines[2].ends_with("age >= 30.0: Root_R [education]"));
}

#[rstest]
fn given_tree_when_rendering_leaves_then_one_line_per_leaf(scenario_a: DecisionTree) {
    let leaves = render_leaves(&scenario_a);

    assert_eq!(
        leaves,
        "Root_L\tage>30, income<50k\nRoot_R\teducation\n"
    );
}

#[test]
fn given_deep_chain_when_rendering_dot_then_every_node_is_emitted() {
    let mut records = Vec::new();
    let mut name = String::from("Root");
    for _ in 0..2_000 {
        records.push(NodeRecord::named(name.clone()).with_split("f", 1.0));
        name.push_str("_L");
    }
    let tree = build(records);

    let dot = render(&tree, OutputFormat::Dot, &RenderConfig::default());

    assert_eq!(dot.lines().filter(|l| l.contains("->")).count(), 1_999);
}
