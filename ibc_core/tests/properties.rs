//! Property-based laws of the interpreter.

mod support;

use ibc_common::format_double;
use proptest::prelude::*;
use support::*;

/// Exact integer power oracle: the mathematical value when it fits in an
/// int32, `None` on overflow.
fn exact_power(x: i32, y: i32) -> Option<i32> {
    let mut result: i128 = 1;
    for _ in 0..y {
        result *= x as i128;
        if result > i32::MAX as i128 || result < i32::MIN as i128 {
            return None;
        }
    }
    i32::try_from(result).ok()
}

fn run_print(expression: &str) -> Result<String, String> {
    let source = format!("PRINT {expression}\n");
    let output = run_code(&source);
    match output.strip_suffix('\n') {
        Some(value) if !output.starts_with("run error") => Ok(value.to_string()),
        _ => Err(output),
    }
}

proptest! {
    #[test]
    fn integer_literals_print_themselves(value in any::<i32>()) {
        let printed = run_print(&value.to_string()).unwrap();
        prop_assert_eq!(printed, value.to_string());
    }

    #[test]
    fn nonnegative_integer_powers_match_the_oracle(x in -60i32..60, y in 0i32..12) {
        match (run_print(&format!("{x} ^ {y}")), exact_power(x, y)) {
            (Ok(printed), Some(value)) => prop_assert_eq!(printed, value.to_string()),
            (Err(report), None) => prop_assert!(report.contains("overflow")),
            (printed, oracle) => {
                return Err(TestCaseError::fail(format!(
                    "{x} ^ {y}: printed {printed:?}, oracle {oracle:?}"
                )));
            }
        }
    }

    #[test]
    fn double_powers_match_pow_or_trap(
        x in (prop::num::f64::POSITIVE | prop::num::f64::NEGATIVE | prop::num::f64::NORMAL)
            .prop_filter("printable", |v| v.abs() < 1e150 && v.abs() > 1e-150),
        y in -40.0f64..40.0,
    ) {
        let expression = format!("{x:e} ^ {y:e}");
        let result = x.powf(y);
        match run_print(&expression) {
            Ok(printed) => prop_assert_eq!(printed, format_double(result)),
            Err(report) => prop_assert!(
                report.contains("domain error")
                    || report.contains("divide by zero")
                    || report.contains("overflow"),
                "unexpected report for {}: {}",
                expression,
                report
            ),
        }
    }

    #[test]
    fn addition_matches_i64_arithmetic(x in any::<i32>(), y in any::<i32>()) {
        let sum = x as i64 + y as i64;
        match run_print(&format!("{x} + {y}")) {
            Ok(printed) => {
                prop_assert!(i32::try_from(sum).is_ok());
                prop_assert_eq!(printed, sum.to_string());
            }
            Err(report) => {
                prop_assert!(i32::try_from(sum).is_err());
                prop_assert!(report.contains("overflow"));
            }
        }
    }

    #[test]
    fn lower_precedence_groups_after_higher(a in 1i32..50, b in 1i32..50, c in 1i32..50) {
        // a + b * c must equal a + (b * c), and its recreation is flat.
        let printed = run_print(&format!("{a} + {b} * {c}")).unwrap();
        prop_assert_eq!(printed, (a + b * c).to_string());

        let canonical = recreate(&format!("PRINT {a}+{b}*{c}\n"));
        prop_assert_eq!(canonical, format!("PRINT {a} + {b} * {c}\n"));
    }

    #[test]
    fn subtraction_associates_left(a in -1000i32..1000, b in -1000i32..1000, c in 1i32..1000) {
        let printed = run_print(&format!("{a} - {b} - {c}")).unwrap();
        prop_assert_eq!(printed, ((a - b) - c).to_string());
    }

    #[test]
    fn recreation_is_a_fixed_point(a in 1i32..100, b in 1i32..100, c in 1i32..100) {
        for template in [
            format!("PRINT {a} + {b} - {c}\n"),
            format!("PRINT {a} * ({b} + {c})\n"),
            format!("PRINT {a} MOD {b} + {c}\n"),
            format!("PRINT -{a} ^ {b}\n"),
        ] {
            let canonical = recreate(&template);
            prop_assert_eq!(recreate(&canonical), canonical.clone(), "template {:?}", template);
        }
    }

    #[test]
    fn constant_interning_is_idempotent(value in any::<i32>()) {
        let source = format!("PRINT {value} + {value}\n");
        let compiled = compile_expression(&format!("{value} + {value}"));
        prop_assert_eq!(
            compiled.code_line[1].operand(),
            compiled.code_line[3].operand()
        );
        // And the program still prints the doubled value or overflows cleanly.
        let _ = run_code(&source);
    }
}
