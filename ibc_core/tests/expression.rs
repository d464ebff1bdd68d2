//! Expression compiler behavior that spans operators.

mod support;

use ibc_common::DataType;
use ibc_core::{Compiler, ProgramUnit};
use pretty_assertions::assert_eq;
use support::*;

#[test]
fn a_single_constant_is_an_expression() {
    let compiled = compile_expression("1");

    assert!(compiled.data_type.is_integer());
    assert_eq!(compiled.code_line.len(), 2);
}

#[test]
fn an_empty_input_produces_null_for_a_null_expectation() {
    let compiled = compile_expression("");

    assert!(compiled.data_type.is_null());
    assert_eq!(compiled.code_line.len(), 0);
}

#[test]
fn an_empty_input_is_an_error_when_a_value_is_expected() {
    let mut program = ProgramUnit::new();
    let mut compiler = Compiler::new("word ", &mut program);
    compiler.get_keyword();

    let error = compiler.compile_expression(DataType::Integer).unwrap_err();

    assert_eq!(error.message, "expected numeric expression");
    assert_eq!(error.column, 5);
}

#[test]
fn whitespace_is_skipped_around_operators_and_operands() {
    for expression in ["3^2", "3 ^2", "3^ 2", "  3 ^ 2  "] {
        let compiled = compile_expression(expression);
        assert_eq!(compiled.code_line.len(), 5, "expression {expression:?}");
    }
}

#[test]
fn precedence_orders_the_emitted_operators() {
    // 1 + 2 * 3 ^ 2 = 1 + (2 * (3 ^ 2)) = 19
    assert_eq!(run("PRINT 1 + 2 * 3 ^ 2\n"), "19\n");
    assert_eq!(recreate("PRINT 1+2*3^2\n"), "PRINT 1 + 2 * 3 ^ 2\n");
}

#[test]
fn parentheses_override_precedence_and_survive_recreation() {
    assert_eq!(run("PRINT (1 + 2) * 3\n"), "9\n");
    assert_eq!(recreate("PRINT (1+2)*3\n"), "PRINT (1 + 2) * 3\n");
    assert_eq!(recreate("PRINT 1*(2-3)\n"), "PRINT 1 * (2 - 3)\n");
}

#[test]
fn redundant_parentheses_canonicalize_away() {
    assert_eq!(recreate("PRINT (1)\n"), "PRINT 1\n");
    assert_eq!(recreate("PRINT (1 + 2) + 3\n"), "PRINT 1 + 2 + 3\n");
    assert_eq!(recreate("PRINT 1 + (2 * 3)\n"), "PRINT 1 + 2 * 3\n");
}

#[test]
fn a_missing_closing_parenthesis_is_an_error() {
    let error = try_compile_expression("(1 + 2").unwrap_err();

    assert_eq!(error.message, "expected closing parenthesis");
    assert_eq!(error.column, 6);
}

#[test]
fn an_empty_parenthesis_needs_an_expression() {
    let error = try_compile_expression("()").unwrap_err();

    assert_eq!(error.message, "expected numeric expression");
    assert_eq!(error.column, 1);
}

#[test]
fn an_exponent_letter_can_start_a_trailing_keyword() {
    // The E of "end" is first taken for an exponent, then given back.
    let compiled = compile_expression("2end");

    assert!(compiled.data_type.is_integer());
    assert_eq!(compiled.next_char, Some('e'));
}

#[test]
fn a_right_operand_keyword_binds_the_right_constants() {
    // MOD after the exponent-letter backtrack still parses as an operator.
    assert_eq!(run("PRINT 7 MOD 4\n"), "3\n");
    assert_eq!(run("PRINT 2E2 MOD 7\n"), "4\n");
}

#[test]
fn nested_parentheses_compile_and_run() {
    assert_eq!(run("PRINT ((2 + 3) * (4 - 1))\n"), "15\n");
    assert_eq!(
        recreate("PRINT ((2 + 3) * (4 - 1))\n"),
        "PRINT (2 + 3) * (4 - 1)\n"
    );
}
