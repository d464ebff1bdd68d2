//! Comparison operators.
//!
//! Every comparison has the four typed variants and produces an Integer
//! truth value: `-1` for true, `0` for false.

use crate::executer::{Executer, Interrupt};
use crate::recreator::recreate_binary_operator;
use crate::table::{OperatorCodes, Precedence, Table};

fn truth(value: bool) -> i32 {
    if value {
        -1
    } else {
        0
    }
}

macro_rules! comparison_operator {
    ($table:ident, $keyword:literal, $precedence:expr, $op:tt) => {{
        fn dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
            let rhs = executer.pop_dbl();
            let lhs = executer.pop_dbl();
            executer.push_int(truth(lhs $op rhs));
            Ok(())
        }
        fn int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
            let rhs = executer.pop_dbl();
            let lhs = executer.pop_int() as f64;
            executer.push_int(truth(lhs $op rhs));
            Ok(())
        }
        fn dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
            let rhs = executer.pop_int() as f64;
            let lhs = executer.pop_dbl();
            executer.push_int(truth(lhs $op rhs));
            Ok(())
        }
        fn int_int(executer: &mut Executer) -> Result<(), Interrupt> {
            let rhs = executer.pop_int();
            let lhs = executer.pop_int();
            executer.push_int(truth(lhs $op rhs));
            Ok(())
        }
        let dbl_dbl = $table.register(recreate_binary_operator, dbl_dbl);
        let int_dbl = $table.register(recreate_binary_operator, int_dbl);
        let dbl_int = $table.register(recreate_binary_operator, dbl_int);
        let int_int = $table.register(recreate_binary_operator, int_int);
        $table.register_operator(
            $precedence,
            $keyword,
            OperatorCodes::Comparison {
                dbl_dbl,
                int_dbl,
                dbl_int,
                int_int,
            },
        );
    }};
}

pub(crate) fn register(table: &mut Table) {
    comparison_operator!(table, "<", Precedence::Relation, <);
    comparison_operator!(table, ">", Precedence::Relation, >);
    comparison_operator!(table, "<=", Precedence::Relation, <=);
    comparison_operator!(table, ">=", Precedence::Relation, >=);
    comparison_operator!(table, "=", Precedence::Equality, ==);
    comparison_operator!(table, "<>", Precedence::Equality, !=);
}
