//! Arithmetic operators, the numeric conversions and the power algorithms.

use crate::constnum::within_integer_range;
use crate::executer::{Executer, Interrupt};
use crate::recreator::{
    recreate_binary_operator, recreate_cvt_int, recreate_nothing, recreate_unary_operator,
};
use crate::table::{OperatorCodes, Precedence, Table};

use super::{check_double_overflow, check_integer_overflow, divide_by_zero, overflow};

pub(crate) fn register(table: &mut Table) {
    let neg_dbl = table.register(recreate_unary_operator, execute_negate_dbl);
    let neg_int = table.register(recreate_unary_operator, execute_negate_int);
    table.register_operator(
        Precedence::Negate,
        "-",
        OperatorCodes::Unary {
            dbl: neg_dbl,
            int: neg_int,
        },
    );

    let exp_dbl_dbl = table.register(recreate_binary_operator, execute_exponential_dbl_dbl);
    let exp_int_dbl = table.register(recreate_binary_operator, execute_exponential_int_dbl);
    let exp_dbl_int = table.register(recreate_binary_operator, execute_exponential_dbl_int);
    let exp_int_int = table.register(recreate_binary_operator, execute_exponential_int_int);
    table.register_operator(
        Precedence::Exponential,
        "^",
        OperatorCodes::Numeric {
            dbl_dbl: exp_dbl_dbl,
            int_dbl: exp_int_dbl,
            dbl_int: exp_dbl_int,
            int_int: exp_int_int,
        },
    );

    let mul_dbl_dbl = table.register(recreate_binary_operator, execute_multiply_dbl_dbl);
    let mul_int_dbl = table.register(recreate_binary_operator, execute_multiply_int_dbl);
    let mul_dbl_int = table.register(recreate_binary_operator, execute_multiply_dbl_int);
    let mul_int_int = table.register(recreate_binary_operator, execute_multiply_int_int);
    table.register_operator(
        Precedence::Product,
        "*",
        OperatorCodes::Numeric {
            dbl_dbl: mul_dbl_dbl,
            int_dbl: mul_int_dbl,
            dbl_int: mul_dbl_int,
            int_int: mul_int_int,
        },
    );

    let div_dbl_dbl = table.register(recreate_binary_operator, execute_divide_dbl_dbl);
    let div_int_dbl = table.register(recreate_binary_operator, execute_divide_int_dbl);
    let div_dbl_int = table.register(recreate_binary_operator, execute_divide_dbl_int);
    let div_int_int = table.register(recreate_binary_operator, execute_divide_int_int);
    table.register_operator(
        Precedence::Product,
        "/",
        OperatorCodes::Numeric {
            dbl_dbl: div_dbl_dbl,
            int_dbl: div_int_dbl,
            dbl_int: div_dbl_int,
            int_int: div_int_int,
        },
    );

    let int_div = table.register(recreate_binary_operator, execute_integer_divide);
    table.register_operator(
        Precedence::IntDivide,
        "\\",
        OperatorCodes::IntDivide { code: int_div },
    );

    table.known.cvt_dbl = table.register(recreate_nothing, execute_cvt_dbl);
    table.known.cvt_int = table.register(recreate_cvt_int, execute_cvt_int);

    let mod_dbl_dbl = table.register(recreate_binary_operator, execute_modulo_dbl_dbl);
    let mod_int_dbl = table.register(recreate_binary_operator, execute_modulo_int_dbl);
    let mod_dbl_int = table.register(recreate_binary_operator, execute_modulo_dbl_int);
    let mod_int_int = table.register(recreate_binary_operator, execute_modulo_int_int);
    table.register_operator(
        Precedence::Modulo,
        "MOD",
        OperatorCodes::Numeric {
            dbl_dbl: mod_dbl_dbl,
            int_dbl: mod_int_dbl,
            dbl_int: mod_dbl_int,
            int_int: mod_int_int,
        },
    );

    let add_dbl_dbl = table.register(recreate_binary_operator, execute_add_dbl_dbl);
    let add_int_dbl = table.register(recreate_binary_operator, execute_add_int_dbl);
    let add_dbl_int = table.register(recreate_binary_operator, execute_add_dbl_int);
    let add_int_int = table.register(recreate_binary_operator, execute_add_int_int);
    table.register_operator(
        Precedence::Summation,
        "+",
        OperatorCodes::Numeric {
            dbl_dbl: add_dbl_dbl,
            int_dbl: add_int_dbl,
            dbl_int: add_dbl_int,
            int_int: add_int_int,
        },
    );

    let sub_dbl_dbl = table.register(recreate_binary_operator, execute_subtract_dbl_dbl);
    let sub_int_dbl = table.register(recreate_binary_operator, execute_subtract_int_dbl);
    let sub_dbl_int = table.register(recreate_binary_operator, execute_subtract_dbl_int);
    let sub_int_int = table.register(recreate_binary_operator, execute_subtract_int_int);
    table.register_operator(
        Precedence::Summation,
        "-",
        OperatorCodes::Numeric {
            dbl_dbl: sub_dbl_dbl,
            int_dbl: sub_int_dbl,
            dbl_int: sub_dbl_int,
            int_int: sub_int_int,
        },
    );
}

// ---------------------------------------- negate

fn execute_negate_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let operand = executer.pop_dbl();
    executer.push_dbl(-operand);
    Ok(())
}

fn execute_negate_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let operand = executer.pop_int();
    if operand == i32::MIN {
        return Err(overflow(executer));
    }
    executer.push_int(-operand);
    Ok(())
}

// ---------------------------------------- exponential

fn execute_exponential_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let y = executer.pop_dbl();
    let x = executer.pop_dbl();
    calculate_power_dbl_dbl(executer, x, y)
}

fn execute_exponential_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let y = executer.pop_dbl();
    let x = executer.pop_int() as f64;
    calculate_power_dbl_dbl(executer, x, y)
}

fn calculate_power_dbl_dbl(executer: &mut Executer, x: f64, y: f64) -> Result<(), Interrupt> {
    let result = x.powf(y);
    if result.is_nan() {
        return Err(Interrupt::Error(ibc_common::RunError::new(
            "domain error (non-integer exponent)",
            executer.current_offset(),
        )));
    }
    if result == f64::INFINITY {
        return Err(if x == 0.0 {
            divide_by_zero(executer)
        } else {
            overflow(executer)
        });
    }
    executer.push_dbl(result);
    Ok(())
}

fn execute_exponential_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let y = executer.pop_int();
    let x = executer.pop_dbl();
    let result = power_dbl_int(x, y).map_err(|message| trap(executer, message))?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_exponential_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let y = executer.pop_int();
    let x = executer.pop_int();
    let result = power_int_int(x, y).map_err(|message| trap(executer, message))?;
    executer.push_int(result);
    Ok(())
}

fn trap(executer: &Executer, message: &'static str) -> Interrupt {
    Interrupt::Error(ibc_common::RunError::new(message, executer.current_offset()))
}

/// Integer power with the dialect's exact overflow rules.
///
/// Below the iteration thresholds the power is accumulated in 64 bits with
/// a range check per step; above them a double `pow` stands in, which is
/// exact for every product that can still fit in an int32.
pub fn power_int_int(x: i32, y: i32) -> Result<i32, &'static str> {
    if y < 0 {
        if x == 0 {
            return Err("divide by zero");
        }
        return Ok(negative_exponent_result(x, y));
    }
    if x >= 0 {
        if y < 19 {
            multiply_positive_value(x, y)
        } else {
            double_power_positive_value(x, y)
        }
    } else if y < 17 {
        multiply_negative_value(x, y)
    } else {
        double_power_negative_value(x, y)
    }
}

fn negative_exponent_result(x: i32, y: i32) -> i32 {
    if x == 1 {
        1
    } else if x == -1 {
        if y & 1 != 0 {
            -1
        } else {
            1
        }
    } else {
        0
    }
}

fn multiply_positive_value(x: i32, y: i32) -> Result<i32, &'static str> {
    let mut result: i64 = 1;
    for _ in 0..y {
        result *= x as i64;
        if result > i32::MAX as i64 {
            return Err("overflow");
        }
    }
    Ok(result as i32)
}

fn double_power_positive_value(x: i32, y: i32) -> Result<i32, &'static str> {
    let result = (x as f64).powi(y);
    if result > i32::MAX as f64 {
        return Err("overflow");
    }
    Ok(result as i32)
}

fn multiply_negative_value(x: i32, y: i32) -> Result<i32, &'static str> {
    let mut result: i64 = 1;
    for _ in 0..y {
        result *= x as i64;
        if result > i32::MAX as i64 || result < i32::MIN as i64 {
            return Err("overflow");
        }
    }
    Ok(result as i32)
}

fn double_power_negative_value(x: i32, y: i32) -> Result<i32, &'static str> {
    let result = (x as f64).powi(y);
    if result > i32::MAX as f64 || result < i32::MIN as f64 {
        return Err("overflow");
    }
    Ok(result as i32)
}

/// Double base to integer exponent: iterative multiply or divide close to
/// zero, double `pow` beyond the iteration thresholds.
pub fn power_dbl_int(x: f64, y: i32) -> Result<f64, &'static str> {
    if y > 0 {
        if y < 19 {
            multiply_for_positive_exponent(x, y)
        } else {
            double_power(x, y)
        }
    } else if y > -17 {
        divide_for_negative_exponent(x, y)
    } else {
        double_power(x, y)
    }
}

fn multiply_for_positive_exponent(x: f64, y: i32) -> Result<f64, &'static str> {
    let mut result = 1.0;
    for _ in 0..y {
        result *= x;
    }
    check_huge(result)
}

fn divide_for_negative_exponent(x: f64, y: i32) -> Result<f64, &'static str> {
    if x == 0.0 {
        return Err("divide by zero");
    }
    let mut result = 1.0;
    for _ in 0..-y {
        result /= x;
    }
    Ok(result)
}

fn double_power(x: f64, y: i32) -> Result<f64, &'static str> {
    check_huge(x.powi(y))
}

fn check_huge(result: f64) -> Result<f64, &'static str> {
    if result == f64::INFINITY {
        Err("overflow")
    } else {
        Ok(result)
    }
}

// ---------------------------------------- multiply

fn execute_multiply_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_dbl();
    multiply_and_check(executer, lhs, rhs)
}

fn execute_multiply_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_int() as f64;
    multiply_and_check(executer, lhs, rhs)
}

fn execute_multiply_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int() as f64;
    let lhs = executer.pop_dbl();
    multiply_and_check(executer, lhs, rhs)
}

fn multiply_and_check(executer: &mut Executer, lhs: f64, rhs: f64) -> Result<(), Interrupt> {
    let result = check_double_overflow(executer, lhs * rhs)?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_multiply_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int();
    let lhs = executer.pop_int();
    let result = check_integer_overflow(executer, lhs as i64 * rhs as i64)?;
    executer.push_int(result);
    Ok(())
}

// ---------------------------------------- divide

fn pop_double_divisor(executer: &mut Executer) -> Result<f64, Interrupt> {
    let rhs = executer.pop_dbl();
    if rhs == 0.0 {
        return Err(divide_by_zero(executer));
    }
    Ok(rhs)
}

fn pop_integer_divisor(executer: &mut Executer) -> Result<i32, Interrupt> {
    let rhs = executer.pop_int();
    if rhs == 0 {
        return Err(divide_by_zero(executer));
    }
    Ok(rhs)
}

fn execute_divide_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_double_divisor(executer)?;
    let lhs = executer.pop_dbl();
    let result = check_double_overflow(executer, lhs / rhs)?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_divide_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_double_divisor(executer)?;
    let lhs = executer.pop_int() as f64;
    let result = check_double_overflow(executer, lhs / rhs)?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_divide_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_integer_divisor(executer)? as f64;
    let lhs = executer.pop_dbl();
    executer.push_dbl(lhs / rhs);
    Ok(())
}

fn execute_divide_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_integer_divisor(executer)?;
    let lhs = executer.pop_int();
    // i32::MIN / -1 does not fit back in an int32.
    match lhs.checked_div(rhs) {
        Some(result) => {
            executer.push_int(result);
            Ok(())
        }
        None => Err(overflow(executer)),
    }
}

// ---------------------------------------- integer divide

fn execute_integer_divide(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_double_divisor(executer)?;
    let lhs = executer.pop_dbl();
    let quotient = lhs / rhs;
    if !within_integer_range(quotient) {
        return Err(overflow(executer));
    }
    executer.push_int(quotient as i32);
    Ok(())
}

// ---------------------------------------- conversions

fn execute_cvt_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let value = executer.pop_int();
    executer.push_dbl(value as f64);
    Ok(())
}

fn execute_cvt_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let value = executer.pop_dbl();
    if !within_integer_range(value) {
        return Err(overflow(executer));
    }
    executer.push_int(value as i32);
    Ok(())
}

// ---------------------------------------- modulo

fn execute_modulo_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_double_divisor(executer)?;
    let lhs = executer.pop_dbl();
    executer.push_dbl(lhs % rhs);
    Ok(())
}

fn execute_modulo_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_double_divisor(executer)?;
    let lhs = executer.pop_int() as f64;
    executer.push_dbl(lhs % rhs);
    Ok(())
}

fn execute_modulo_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_integer_divisor(executer)? as f64;
    let lhs = executer.pop_dbl();
    executer.push_dbl(lhs % rhs);
    Ok(())
}

fn execute_modulo_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = pop_integer_divisor(executer)?;
    let lhs = executer.pop_int();
    executer.push_int(lhs.wrapping_rem(rhs));
    Ok(())
}

// ---------------------------------------- add

fn execute_add_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_dbl();
    let result = check_double_overflow(executer, lhs + rhs)?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_add_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_int() as f64;
    executer.push_dbl(lhs + rhs);
    Ok(())
}

fn execute_add_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int() as f64;
    let lhs = executer.pop_dbl();
    executer.push_dbl(lhs + rhs);
    Ok(())
}

fn execute_add_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int();
    let lhs = executer.pop_int();
    let result = check_integer_overflow(executer, lhs as i64 + rhs as i64)?;
    executer.push_int(result);
    Ok(())
}

// ---------------------------------------- subtract

fn execute_subtract_dbl_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_dbl();
    let result = check_double_overflow(executer, lhs - rhs)?;
    executer.push_dbl(result);
    Ok(())
}

fn execute_subtract_int_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_dbl();
    let lhs = executer.pop_int() as f64;
    executer.push_dbl(lhs - rhs);
    Ok(())
}

fn execute_subtract_dbl_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int() as f64;
    let lhs = executer.pop_dbl();
    executer.push_dbl(lhs - rhs);
    Ok(())
}

fn execute_subtract_int_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let rhs = executer.pop_int();
    let lhs = executer.pop_int();
    let result = check_integer_overflow(executer, lhs as i64 - rhs as i64)?;
    executer.push_int(result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_power_follows_the_iterative_path_below_nineteen() {
        assert_eq!(power_int_int(2, 10), Ok(1024));
        assert_eq!(power_int_int(3, 0), Ok(1));
        assert_eq!(power_int_int(0, 0), Ok(1));
        assert_eq!(power_int_int(16, 8), Err("overflow"));
    }

    #[test]
    fn integer_power_switches_to_double_pow_at_nineteen() {
        assert_eq!(power_int_int(2, 19), Ok(524288));
        assert_eq!(power_int_int(2, 30), Ok(1 << 30));
        assert_eq!(power_int_int(2, 31), Err("overflow"));
        assert_eq!(power_int_int(123, 20), Err("overflow"));
        assert_eq!(power_int_int(1, 1000), Ok(1));
        assert_eq!(power_int_int(0, 100), Ok(0));
    }

    #[test]
    fn negative_bases_check_both_bounds() {
        assert_eq!(power_int_int(-9, 3), Ok(-729));
        assert_eq!(power_int_int(-8, 11), Err("overflow"));
        assert_eq!(power_int_int(-4, 16), Err("overflow"));
        assert_eq!(power_int_int(-2, 19), Ok(-524288));
        assert_eq!(power_int_int(-123, 20), Err("overflow"));
        assert_eq!(power_int_int(-123, 19), Err("overflow"));
    }

    #[test]
    fn negative_exponents_collapse_to_reciprocal_integers() {
        assert_eq!(power_int_int(1, -5), Ok(1));
        assert_eq!(power_int_int(-1, -5), Ok(-1));
        assert_eq!(power_int_int(-1, -6), Ok(1));
        assert_eq!(power_int_int(4, -1), Ok(0));
        assert_eq!(power_int_int(0, -1), Err("divide by zero"));
    }

    #[test]
    fn double_power_multiplies_small_positive_exponents() {
        assert_eq!(power_dbl_int(2.0, 3), Ok(8.0));
        assert_eq!(power_dbl_int(-2.0, 19), Ok(-524288.0));
        assert_eq!(power_dbl_int(1e307, 4), Err("overflow"));
    }

    #[test]
    fn double_power_divides_small_negative_exponents() {
        assert_eq!(power_dbl_int(2.0, -4), Ok(0.0625));
        assert_eq!(power_dbl_int(2.0, 0), Ok(1.0));
        assert_eq!(power_dbl_int(0.0, 0), Err("divide by zero"));
        assert_eq!(power_dbl_int(0.0, -1), Err("divide by zero"));
    }

    #[test]
    fn double_power_falls_back_to_pow_for_large_exponents() {
        let result = power_dbl_int(2.0e6, -17).unwrap();
        assert_eq!(ibc_common::format_double(result), "7.62939e-108");
        assert_eq!(power_dbl_int(123.0, 456), Err("overflow"));
    }
}
