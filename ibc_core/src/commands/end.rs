//! The END command.

use ibc_common::CompileError;

use crate::compiler::Compiler;
use crate::executer::{Executer, Interrupt};
use crate::recreator::Recreator;
use crate::table::{table, Table};

pub(crate) fn register(table: &mut Table) {
    table.known.end = table.register_command("END", compile_end, recreate_end, execute_end);
}

fn compile_end(compiler: &mut Compiler) -> Result<(), CompileError> {
    compiler.add_instruction(table().known.end);
    Ok(())
}

fn recreate_end(recreator: &mut Recreator) {
    recreator.add_command_keyword();
}

fn execute_end(_executer: &mut Executer) -> Result<(), Interrupt> {
    Err(Interrupt::EndOfProgram)
}
