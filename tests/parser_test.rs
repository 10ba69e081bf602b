//! Tests for RecordParser

use rstest::rstest;

use treelog_dot::domain::{DomainError, LeafKind, NodeRecord, RecordParser};

fn block(name: &str, feature: &str, split: &str) -> String {
    format!("{}\nBest feature: {}\nBest split: {}\n\n", name, feature, split)
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(5)]
fn given_n_terminated_blocks_when_parsing_then_yields_n_records(#[case] n: usize) {
    // Arrange
    let text: String = (0..n)
        .map(|i| block(&format!("Root{}", "_L".repeat(i)), "age", "1.5"))
        .collect();

    // Act
    let parsed = RecordParser::new(&text).parse().unwrap();

    // Assert
    assert_eq!(parsed.records.len(), n);
    assert!(parsed.unterminated.is_none());
}

#[test]
fn given_full_block_when_parsing_then_all_fields_are_extracted() {
    let text = "Root_L\nBest ROC: 0.8\nBest feature: income\nBest split: -2.5\n\tage>30\n\t income<50k \nRegression leaf\n\n";

    let parsed = RecordParser::new(text).parse().unwrap();

    assert_eq!(
        parsed.records,
        vec![NodeRecord::named("Root_L")
            .with_split("income", -2.5)
            .with_core_features(["age>30", "income<50k"])
            .with_leaf_kind(LeafKind::Regression)]
    );
}

#[test]
fn given_blocks_when_parsing_then_block_order_is_preserved() {
    let text = "Root_R\n\nRoot\n\nRoot_L\n\n";

    let names: Vec<String> = RecordParser::new(text)
        .records()
        .map(|r| r.unwrap().name)
        .collect();

    assert_eq!(names, vec!["Root_R", "Root", "Root_L"]);
}

#[test]
fn given_trailing_block_without_blank_line_when_parsing_then_it_is_not_emitted() {
    let text = "Root\nBest feature: age\nBest split: 30\n\nRoot_L\nConstant leaf";

    let parsed = RecordParser::new(text).parse().unwrap();

    assert_eq!(parsed.records.len(), 1);
    assert_eq!(parsed.unterminated.as_deref(), Some("Root_L"));
}

#[test]
fn given_unparseable_split_when_parsing_then_errors_with_line_number() {
    let text = "Root\nBest feature: age\nBest split: thirty\n\n";

    let err = RecordParser::new(text).parse().unwrap_err();

    match err {
        DomainError::InvalidSplitValue { line, value, .. } => {
            assert_eq!(line, 3);
            assert_eq!(value, "thirty");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case("Best split: 30", 30.0)]
#[case("Best split:  0.125 ", 0.125)]
#[case("  Best split: 1e3", 1000.0)]
fn given_split_line_when_parsing_then_value_after_colon_is_used(
    #[case] line: &str,
    #[case] expected: f64,
) {
    let text = format!("Root\n{}\n\n", line);

    let parsed = RecordParser::new(&text).parse().unwrap();

    assert_eq!(parsed.records[0].split_value, Some(expected));
}

#[test]
fn given_block_without_name_when_parsing_then_it_is_discarded() {
    let text = "Best feature: age\n\tcore\n\nRoot\n\n";

    let parsed = RecordParser::new(text).parse().unwrap();

    assert_eq!(parsed.records, vec![NodeRecord::named("Root")]);
}

#[test]
fn given_crlf_line_endings_when_parsing_then_blocks_are_split() {
    let text = "Root\r\nBest feature: age\r\nBest split: 30.0\r\n\r\nRoot_L\r\n\r\n";

    let parsed = RecordParser::new(text).parse().unwrap();

    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].split_feature.as_deref(), Some("age"));
    assert_eq!(parsed.records[1].name, "Root_L");
}
