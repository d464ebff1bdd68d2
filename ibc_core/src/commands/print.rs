//! The PRINT command.

use std::io::Write;

use ibc_common::{format_double, CompileError, DataType};

use crate::compiler::Compiler;
use crate::executer::{Executer, Interrupt};
use crate::recreator::{recreate_nothing, Recreator};
use crate::table::{table, Table};

pub(crate) fn register(table: &mut Table) {
    table.known.print = table.register_command("PRINT", compile_print, recreate_print, execute_print);
    table.known.print_dbl = table.register(recreate_nothing, execute_print_dbl);
    table.known.print_int = table.register(recreate_nothing, execute_print_int);
}

/// PRINT takes an optional expression: the typed print-item opcode writes
/// the value, the trailing print opcode writes the newline.
fn compile_print(compiler: &mut Compiler) -> Result<(), CompileError> {
    if compiler.peek_next_char().is_some() {
        let data_type = compiler.compile_expression(DataType::Null)?;
        if data_type.is_double() {
            compiler.add_instruction(table().known.print_dbl);
        } else if data_type.is_integer() {
            compiler.add_instruction(table().known.print_int);
        }
    }
    compiler.add_instruction(table().known.print);
    Ok(())
}

fn recreate_print(recreator: &mut Recreator) {
    recreator.add_command_keyword();
}

fn execute_print(executer: &mut Executer) -> Result<(), Interrupt> {
    let _ = writeln!(executer.output());
    Ok(())
}

fn execute_print_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let value = executer.pop_dbl();
    let _ = write!(executer.output(), "{}", format_double(value));
    Ok(())
}

fn execute_print_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let value = executer.pop_int();
    let _ = write!(executer.output(), "{}", value);
    Ok(())
}
