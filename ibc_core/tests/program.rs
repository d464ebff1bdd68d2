//! Whole-program compile, recreate and run behavior.

mod support;

use ibc_core::{Executer, Interrupt};
use pretty_assertions::assert_eq;
use support::*;

#[test]
fn a_multi_line_program_recreates_line_by_line() {
    let program = compile("PRINT -2.45\nPrint\nprint 123\nEND\n");

    assert_eq!(program.recreate_line(0), "PRINT -2.45");
    assert_eq!(program.recreate_line(1), "PRINT");
    assert_eq!(program.recreate_line(2), "PRINT 123");
    assert_eq!(program.recreate_line(3), "END");
}

#[test]
fn a_multi_line_program_executes_in_order() {
    assert_eq!(
        run("PRINT -2.45\nPrint\nprint 123\nEND\n"),
        "-2.45\n\n123\n"
    );
}

#[test]
fn a_program_without_end_still_terminates() {
    assert_eq!(
        run("print 1.704e123\nprint -87654321\n"),
        "1.704e+123\n-87654321\n"
    );
    assert_eq!(
        recreate("print 1.704e123\nprint -87654321\n"),
        "PRINT 1.704e123\nPRINT -87654321\n"
    );
}

#[test]
fn compile_errors_are_reported_per_line_and_compilation_continues() {
    let report = compile_errors("print 1.704e%23\nprint 2.45e3000\n");

    assert_eq!(
        report,
        compile_error_block(
            1,
            12,
            1,
            "expected sign or digit for exponent",
            "print 1.704e%23"
        ) + &compile_error_block(
            2,
            6,
            9,
            "floating point constant is out of range",
            "print 2.45e3000"
        )
    );
}

#[test]
fn empty_and_whitespace_lines_compile_to_nothing() {
    let program = compile("\n   \nPRINT 1\n");

    assert_eq!(program.line_count(), 3);
    assert_eq!(program.recreate_line(0), "");
    assert_eq!(program.recreate_line(1), "");
    assert_eq!(program.recreate_line(2), "PRINT 1");
}

#[test]
fn a_run_error_on_a_later_line_reports_its_line_number() {
    assert_eq!(
        run_code("PRINT 2^3^4\nPRINT 0^4^-1\n"),
        "4096\n".to_string()
            + &run_error_block(2, 12, "divide by zero", "PRINT 0 ^ 4 ^ -1")
    );
}

#[test]
fn a_successful_run_through_run_code_returns_clean_output() {
    assert_eq!(run_code("PRINT 2^3^4\n"), "4096\n");
}

#[test]
fn an_end_opcode_raises_the_end_of_program_interrupt() {
    let mut code = ibc_core::ProgramCode::new();
    code.emit(ibc_core::table().known.end);
    let mut output = Vec::new();
    let mut executer = Executer::new(code.words(), &[], &[], &mut output);

    assert_eq!(executer.execute_one(), Err(Interrupt::EndOfProgram));
}

#[test]
fn constants_are_interned_across_lines() {
    let program = compile("PRINT 7\nPRINT 7\nPRINT 7.0\n");

    // "7" is stored once, "7.0" separately.
    assert_eq!(program.const_nums().len(), 2);
}

#[test]
fn identical_literals_reuse_their_operand_index() {
    let compiled = compile_expression("7 + 7");

    assert_eq!(compiled.code_line[1].operand(), compiled.code_line[3].operand());
}

#[test]
fn scenario_compile_and_recreate_roundtrip_is_a_fixed_point() {
    for source in [
        "PRINT 3+2\n",
        "PRINT --2.0\n",
        "PRINT 2^3^4\n",
        "PRINT 2.0^- 2^3\n",
        "PRINT 100 MOD 2 MOD 1.5 MOD (5.0 MOD 4)\n",
        "PRINT 1 + 2 * (3 - 4) \\ 5.0\n",
    ] {
        let canonical = recreate(source);
        assert_eq!(recreate(&canonical), canonical, "source {source:?}");
    }
}
