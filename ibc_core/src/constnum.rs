//! The numeric constant pool and the constant-push opcodes.

use ibc_common::{DataType, Dictionary, WordType};

use crate::executer::{Executer, Interrupt};
use crate::recreator::Recreator;
use crate::table::Table;

/// What a literal added to the pool compiles to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstNumInfo {
    pub code: WordType,
    pub operand: WordType,
    pub data_type: DataType,
}

/// Raised when a literal does not fit in a double.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstNumRangeError;

/// Pool of numeric literals keyed by their exact source text.
///
/// Three parallel stores per entry: the literal text (for lossless
/// recreate), the double value (always populated) and the int32 value
/// (the truncated double for double-typed literals, so callers must check
/// [`ConstNumDictionary::convertible_to_integer`] before trusting it).
#[derive(Debug, Default)]
pub struct ConstNumDictionary {
    dictionary: Dictionary,
    dbl_values: Vec<f64>,
    int_values: Vec<i32>,
}

struct ConvertedNumber {
    floating_point: bool,
    dbl_value: f64,
    int_value: i32,
}

impl ConstNumDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a literal and reports the opcode, operand index and data type
    /// to compile it as.
    ///
    /// A non-floating-point literal that does not fit in an int32 falls back
    /// to a double constant. A literal that does not even fit in a double is
    /// a range error the compiler reports against the literal's span.
    pub fn add(
        &mut self,
        table: &Table,
        floating_point: bool,
        number: &str,
    ) -> Result<ConstNumInfo, ConstNumRangeError> {
        let converted = convert_number(floating_point, number)?;
        let entry = self.dictionary.add(number);
        if !entry.exists {
            self.dbl_values.push(converted.dbl_value);
            self.int_values.push(converted.int_value);
        }
        Ok(ConstNumInfo {
            code: if converted.floating_point {
                table.known.const_dbl
            } else {
                table.known.const_int
            },
            operand: entry.operand,
            data_type: if converted.floating_point {
                DataType::Double
            } else {
                DataType::Integer
            },
        })
    }

    /// True when the stored double value fits the int32 range.
    pub fn convertible_to_integer(&self, index: WordType) -> bool {
        within_integer_range(self.dbl_values[index as usize])
    }

    pub fn get(&self, index: WordType) -> &str {
        self.dictionary.get(index)
    }

    pub fn dbl_values(&self) -> &[f64] {
        &self.dbl_values
    }

    pub fn int_values(&self) -> &[i32] {
        &self.int_values
    }

    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }
}

fn convert_number(
    floating_point: bool,
    number: &str,
) -> Result<ConvertedNumber, ConstNumRangeError> {
    if !floating_point {
        // Out-of-range integers fall through to the double conversion.
        if let Ok(int_value) = number.parse::<i32>() {
            return Ok(ConvertedNumber {
                floating_point: false,
                dbl_value: int_value as f64,
                int_value,
            });
        }
    }
    let dbl_value: f64 = number.parse().map_err(|_| ConstNumRangeError)?;
    if dbl_value.is_infinite() {
        return Err(ConstNumRangeError);
    }
    Ok(ConvertedNumber {
        floating_point: true,
        dbl_value,
        int_value: dbl_value as i32,
    })
}

pub(crate) fn within_integer_range(value: f64) -> bool {
    (i32::MIN as f64..=i32::MAX as f64).contains(&value)
}

pub(crate) fn register(table: &mut Table) {
    table.known.const_dbl = table.register(recreate_const_num, execute_const_dbl);
    table.known.const_int = table.register(recreate_const_num, execute_const_int);
}

fn recreate_const_num(recreator: &mut Recreator) {
    let number = recreator.const_num_operand();
    recreator.push(number);
}

fn execute_const_dbl(executer: &mut Executer) -> Result<(), Interrupt> {
    let operand = executer.get_operand();
    executer.push_const_dbl(operand);
    Ok(())
}

fn execute_const_int(executer: &mut Executer) -> Result<(), Interrupt> {
    let operand = executer.get_operand();
    executer.push_const_int(operand);
    Ok(())
}
