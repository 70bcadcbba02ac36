//! A whole document through every provider, using scripted engine answers.

mod helpers;

use std::sync::Arc;

use exprbridge::gateway::Operation;
use exprbridge::highlight::{HighlightSpan, StyleCategory, style_at};
use exprbridge::syntax::{Bias, NodeKind};
use helpers::{ARITHMETIC, MAX_CALL, editor_for, fixture_analyzer};
use rstest::rstest;

fn span(start: usize, end: usize, style: StyleCategory) -> HighlightSpan {
    HighlightSpan { start, end, style }
}

#[test]
fn test_arithmetic_tree_shape() {
    let mut session = editor_for(Arc::new(fixture_analyzer()));
    session.open(ARITHMETIC);

    let tree = session.syntax_tree();
    let kinds: Vec<_> = tree.walk().into_iter().map(|(_, node)| node.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Expression,
            NodeKind::AddSubExpr,
            NodeKind::ColumnRefExpr,
            NodeKind::ColumnReference,
            NodeKind::Bracket,
            NodeKind::ColumnName,
            NodeKind::Bracket,
            NodeKind::ArithmeticOperator,
            NodeKind::MulDivExpr,
            NodeKind::ColumnRefExpr,
            NodeKind::ColumnReference,
            NodeKind::Bracket,
            NodeKind::ColumnName,
            NodeKind::Bracket,
            NodeKind::ArithmeticOperator,
            NodeKind::LiteralExpr,
            NodeKind::Literal,
            NodeKind::IntegerLiteral,
        ]
    );

    let root = tree.root();
    assert_eq!((root.start, root.end), (0, ARITHMETIC.len()));
    let root_record = tree.buffer().record(root.id.0).unwrap();
    assert_eq!(root_record.size as usize, 4 * tree.len());
}

#[test]
fn test_arithmetic_structural_highlight() {
    let mut session = editor_for(Arc::new(fixture_analyzer()));
    session.open(ARITHMETIC);

    assert_eq!(
        session.highlight(),
        vec![
            span(0, 9, StyleCategory::VariableName),
            span(10, 11, StyleCategory::Operator),
            span(12, 21, StyleCategory::VariableName),
            span(22, 23, StyleCategory::Operator),
            span(24, 25, StyleCategory::Number),
        ]
    );
}

#[rstest]
#[case::open_bracket(0, Some(StyleCategory::VariableName))]
#[case::column_name(3, Some(StyleCategory::VariableName))]
#[case::close_bracket(8, Some(StyleCategory::VariableName))]
#[case::whitespace(9, None)]
#[case::plus(10, Some(StyleCategory::Operator))]
#[case::times(22, Some(StyleCategory::Operator))]
#[case::number(24, Some(StyleCategory::Number))]
fn test_arithmetic_stream_highlight(#[case] pos: usize, #[case] expected: Option<StyleCategory>) {
    let mut session = editor_for(Arc::new(fixture_analyzer()));
    session.open(ARITHMETIC);

    assert_eq!(style_at(&session.highlight_document(), pos), expected);
    assert_eq!(style_at(&session.highlight_lines(), pos), expected);
}

#[test]
fn test_arithmetic_has_no_diagnostics_or_hover() {
    let analyzer = Arc::new(fixture_analyzer());
    let mut session = editor_for(analyzer.clone());
    session.open(ARITHMETIC);

    // No runtime here, so the lint ran as soon as the document opened.
    assert!(session.diagnostics().current().diagnostics.is_empty());
    assert_eq!(analyzer.calls(Operation::Lint), 1);
    for pos in 0..=ARITHMETIC.len() {
        assert!(session.hover(pos).is_none(), "unexpected hover at {}", pos);
    }
}

#[test]
fn test_same_input_builds_identical_trees() {
    let mut first = editor_for(Arc::new(fixture_analyzer()));
    let mut second = editor_for(Arc::new(fixture_analyzer()));
    first.open(MAX_CALL);
    second.open(MAX_CALL);

    assert_eq!(first.syntax_tree(), second.syntax_tree());
    assert_eq!(
        first.syntax_tree().buffer().as_slice(),
        second.syntax_tree().buffer().as_slice()
    );
    assert_eq!(first.highlight(), second.highlight());
}

#[test]
fn test_stream_cache_skips_unchanged_lines() {
    let analyzer = Arc::new(fixture_analyzer());
    let mut session = editor_for(analyzer.clone());
    session.open(format!("{}\n{}", ARITHMETIC, MAX_CALL));

    let spans = session.highlight_lines();
    let second_line = ARITHMETIC.len() + 1;
    assert_eq!(style_at(&spans, second_line), Some(StyleCategory::Keyword));
    assert_eq!(analyzer.calls(Operation::Tokenize), 2);

    session.highlight_lines();
    assert_eq!(analyzer.calls(Operation::Tokenize), 2);
}

#[test]
fn test_resolve_inner_in_column_reference() {
    let mut session = editor_for(Arc::new(fixture_analyzer()));
    session.open(ARITHMETIC);

    let tree = session.syntax_tree();
    assert_eq!(tree.resolve_inner(3, Bias::After).kind, NodeKind::ColumnName);
    assert_eq!(tree.resolve_inner(9, Bias::After).kind, NodeKind::AddSubExpr);
    assert_eq!(tree.resolve_inner(9, Bias::Before).kind, NodeKind::Bracket);
}
