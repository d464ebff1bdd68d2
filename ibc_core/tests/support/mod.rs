//! Shared helpers for the integration tests.

#![allow(dead_code)]

use ibc_common::{CompileError, DataType, WordType};
use ibc_core::{CommandCompiler, Compiler, ProgramCode, ProgramUnit};

/// Compiles a whole source, panicking on any compile error.
pub fn compile(source: &str) -> ProgramUnit {
    let mut program = ProgramUnit::new();
    let mut errors = Vec::new();
    let clean = program.compile_source(source, &mut errors).unwrap();
    assert!(
        clean,
        "unexpected compile errors:\n{}",
        String::from_utf8_lossy(&errors)
    );
    program
}

/// Compiles and runs, panicking on compile or run errors; returns stdout.
pub fn run(source: &str) -> String {
    let mut program = compile(source);
    let mut output = Vec::new();
    program.run(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Compiles and runs through the error-formatting path; returns everything
/// written, program output and run-error report alike.
pub fn run_code(source: &str) -> String {
    let mut program = compile(source);
    let mut output = Vec::new();
    program.run_code(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Compiles and recreates every line, panicking on compile errors.
pub fn recreate(source: &str) -> String {
    let program = compile(source);
    let mut output = Vec::new();
    program.recreate(&mut output).unwrap();
    String::from_utf8(output).unwrap()
}

/// Builds the expected run-error report block for one line.
pub fn run_error_block(line: usize, column: usize, message: &str, source_line: &str) -> String {
    run_error_block_with_length(line, column, 1, message, source_line)
}

pub fn run_error_block_with_length(
    line: usize,
    column: usize,
    length: usize,
    message: &str,
    source_line: &str,
) -> String {
    format!(
        "run error at line {line}:{column}: {message}\n    {source_line}\n    {}{}\n",
        " ".repeat(column),
        "^".repeat(length)
    )
}

/// Builds the expected compile-error report block for one line.
pub fn compile_error_block(
    line: usize,
    column: usize,
    length: usize,
    message: &str,
    source_line: &str,
) -> String {
    format!(
        "error on line {line}:{column}: {message}\n    {source_line}\n    {}{}\n",
        " ".repeat(column),
        "^".repeat(length)
    )
}

/// Compiles a source expected to fail and returns the error report text.
pub fn compile_errors(source: &str) -> String {
    let mut program = ProgramUnit::new();
    let mut errors = Vec::new();
    let clean = program.compile_source(source, &mut errors).unwrap();
    assert!(!clean, "expected compile errors in {source:?}");
    String::from_utf8(errors).unwrap()
}

/// Compiles a bare expression the way the original operator tests do and
/// returns the emitted code line plus the column parsing stopped at.
#[derive(Debug)]
pub struct CompiledExpression {
    pub code_line: ProgramCode,
    pub data_type: DataType,
    pub next_char: Option<char>,
}

pub fn compile_expression(expression: &str) -> CompiledExpression {
    try_compile_expression(expression).unwrap()
}

pub fn try_compile_expression(
    expression: &str,
) -> Result<CompiledExpression, CompileError> {
    let mut program = ProgramUnit::new();
    let mut compiler = Compiler::new(expression, &mut program);
    let data_type = compiler.compile_expression(DataType::Null)?;
    let next_char = compiler.peek_next_char();
    Ok(CompiledExpression {
        code_line: compiler.into_code_line(),
        data_type,
        next_char,
    })
}

/// Compiles a single line through the command compiler.
pub fn compile_line(line: &str) -> Result<ProgramCode, CompileError> {
    let mut program = ProgramUnit::new();
    CommandCompiler::new(line, &mut program).compile()
}

/// The typed opcode ids of a registered binary operator.
pub struct OperatorIds {
    pub dbl_dbl: WordType,
    pub int_dbl: WordType,
    pub dbl_int: WordType,
    pub int_int: WordType,
}

pub fn numeric_operator_ids(find: impl Fn() -> &'static ibc_core::table::OperatorDef) -> OperatorIds {
    match find().codes {
        ibc_core::table::OperatorCodes::Numeric {
            dbl_dbl,
            int_dbl,
            dbl_int,
            int_int,
        }
        | ibc_core::table::OperatorCodes::Comparison {
            dbl_dbl,
            int_dbl,
            dbl_int,
            int_int,
        } => OperatorIds {
            dbl_dbl,
            int_dbl,
            dbl_int,
            int_int,
        },
        _ => panic!("operator does not have four typed variants"),
    }
}

pub fn symbol_operator_ids(symbol: char) -> OperatorIds {
    numeric_operator_ids(move || {
        ibc_core::table()
            .symbol_operator(symbol)
            .expect("operator not registered")
    })
}

pub fn word_operator_ids(word: &'static str) -> OperatorIds {
    numeric_operator_ids(move || {
        ibc_core::table()
            .word_operator(word)
            .expect("operator not registered")
    })
}
