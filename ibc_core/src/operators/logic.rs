//! Logical word operators, operating bitwise on integers.

use crate::executer::{Executer, Interrupt};
use crate::recreator::{recreate_binary_operator, recreate_unary_operator};
use crate::table::{OperatorCodes, Precedence, Table};

macro_rules! logic_operator {
    ($table:ident, $keyword:literal, $precedence:expr, $combine:expr) => {{
        fn execute(executer: &mut Executer) -> Result<(), Interrupt> {
            let rhs = executer.pop_int();
            let lhs = executer.pop_int();
            let combine: fn(i32, i32) -> i32 = $combine;
            executer.push_int(combine(lhs, rhs));
            Ok(())
        }
        let code = $table.register(recreate_binary_operator, execute);
        $table.register_operator($precedence, $keyword, OperatorCodes::Logic { code });
    }};
}

pub(crate) fn register(table: &mut Table) {
    let not = table.register(recreate_unary_operator, execute_not);
    table.register_operator(Precedence::Not, "NOT", OperatorCodes::Not { code: not });

    logic_operator!(table, "AND", Precedence::And, |lhs, rhs| lhs & rhs);
    logic_operator!(table, "XOR", Precedence::Xor, |lhs, rhs| lhs ^ rhs);
    logic_operator!(table, "OR", Precedence::Or, |lhs, rhs| lhs | rhs);
    logic_operator!(table, "EQV", Precedence::Eqv, |lhs, rhs| !(lhs ^ rhs));
    logic_operator!(table, "IMP", Precedence::Imp, |lhs, rhs| !lhs | rhs);
}

fn execute_not(executer: &mut Executer) -> Result<(), Interrupt> {
    let operand = executer.pop_int();
    executer.push_int(!operand);
    Ok(())
}
