//! Operator opcodes: registration and execute functions.

pub mod comparison;
pub mod logic;
pub mod math;

use ibc_common::RunError;

use crate::executer::{Executer, Interrupt};
use crate::table::Table;

pub(crate) fn register(table: &mut Table) {
    math::register(table);
    comparison::register(table);
    logic::register(table);
}

pub(crate) fn overflow(executer: &Executer) -> Interrupt {
    Interrupt::Error(RunError::new("overflow", executer.current_offset()))
}

pub(crate) fn divide_by_zero(executer: &Executer) -> Interrupt {
    Interrupt::Error(RunError::new("divide by zero", executer.current_offset()))
}

pub(crate) fn check_integer_overflow(executer: &Executer, result: i64) -> Result<i32, Interrupt> {
    if result > i32::MAX as i64 || result < i32::MIN as i64 {
        Err(overflow(executer))
    } else {
        Ok(result as i32)
    }
}

pub(crate) fn check_double_overflow(executer: &Executer, result: f64) -> Result<f64, Interrupt> {
    if result.abs() > f64::MAX {
        Err(overflow(executer))
    } else {
        Ok(result)
    }
}
