//! The opcode table: the process-wide registry tying compilation, execution
//! and recreation together.
//!
//! Every opcode owns a recreate function and an execute function and is
//! identified by a dense id assigned at registration. Operator opcodes are
//! grouped into typed-variant sets that also carry a display keyword and a
//! precedence; command opcodes carry a keyword and a compile function. The
//! table is built once, before any source is compiled, by an explicit
//! registration sequence, and is read-only afterwards.

use hashbrown::HashMap;
use lazy_static::lazy_static;

use ibc_common::cistring::{CiStr, CiString};
use ibc_common::{CompileError, DataType, WordType};

use crate::compiler::Compiler;
use crate::executer::{Executer, Interrupt};
use crate::recreator::Recreator;
use crate::{commands, constnum, operators};

pub type CompileFn = fn(&mut Compiler) -> Result<(), CompileError>;
pub type ExecuteFn = fn(&mut Executer) -> Result<(), Interrupt>;
pub type RecreateFn = fn(&mut Recreator);

/// Operator precedence levels; a smaller level binds tighter.
///
/// `Operand` is the precedence of a bare operand on the recreator stack and
/// never belongs to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Operand,
    Exponential,
    Negate,
    Product,
    IntDivide,
    Modulo,
    Summation,
    Relation,
    Equality,
    Not,
    And,
    Xor,
    Or,
    Eqv,
    Imp,
}

/// The typed opcode ids behind one operator keyword plus the rule that
/// selects a variant from the operand data types.
#[derive(Debug, Clone, Copy)]
pub enum OperatorCodes {
    /// Unary operator with a double and an integer variant (negate).
    Unary { dbl: WordType, int: WordType },
    /// Binary numeric operator with all four typed variants; the result is
    /// Integer only when both sides are Integer.
    Numeric {
        dbl_dbl: WordType,
        int_dbl: WordType,
        dbl_int: WordType,
        int_int: WordType,
    },
    /// Comparison operator: same variant selection as `Numeric` but the
    /// result is always Integer.
    Comparison {
        dbl_dbl: WordType,
        int_dbl: WordType,
        dbl_int: WordType,
        int_int: WordType,
    },
    /// Integer divide: a single double-double opcode producing Integer; the
    /// compiler coerces both sides to double.
    IntDivide { code: WordType },
    /// Binary logical operator on two integers.
    Logic { code: WordType },
    /// Unary logical NOT on an integer.
    Not { code: WordType },
}

/// Selection result: the opcode to emit and the data type it produces.
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub code: WordType,
    pub result: DataType,
}

impl OperatorCodes {
    /// Picks the typed variant for the given operand types. For unary
    /// operators only the first data type is meaningful.
    pub fn select(&self, lhs: DataType, rhs: DataType) -> OperatorInfo {
        match *self {
            OperatorCodes::Unary { dbl, int } => OperatorInfo {
                code: if lhs.is_double() { dbl } else { int },
                result: lhs,
            },
            OperatorCodes::Numeric {
                dbl_dbl,
                int_dbl,
                dbl_int,
                int_int,
            } => select_numeric(dbl_dbl, int_dbl, dbl_int, int_int, lhs, rhs),
            OperatorCodes::Comparison {
                dbl_dbl,
                int_dbl,
                dbl_int,
                int_int,
            } => {
                let info = select_numeric(dbl_dbl, int_dbl, dbl_int, int_int, lhs, rhs);
                OperatorInfo {
                    code: info.code,
                    result: DataType::Integer,
                }
            }
            OperatorCodes::IntDivide { code } => OperatorInfo {
                code,
                result: DataType::Integer,
            },
            OperatorCodes::Logic { code } | OperatorCodes::Not { code } => OperatorInfo {
                code,
                result: DataType::Integer,
            },
        }
    }

    fn code_values(&self) -> Vec<WordType> {
        match *self {
            OperatorCodes::Unary { dbl, int } => vec![dbl, int],
            OperatorCodes::Numeric {
                dbl_dbl,
                int_dbl,
                dbl_int,
                int_int,
            }
            | OperatorCodes::Comparison {
                dbl_dbl,
                int_dbl,
                dbl_int,
                int_int,
            } => vec![dbl_dbl, int_dbl, dbl_int, int_int],
            OperatorCodes::IntDivide { code }
            | OperatorCodes::Logic { code }
            | OperatorCodes::Not { code } => vec![code],
        }
    }
}

fn select_numeric(
    dbl_dbl: WordType,
    int_dbl: WordType,
    dbl_int: WordType,
    int_int: WordType,
    lhs: DataType,
    rhs: DataType,
) -> OperatorInfo {
    if lhs.is_integer() && rhs.is_integer() {
        OperatorInfo {
            code: int_int,
            result: DataType::Integer,
        }
    } else if lhs.is_integer() {
        OperatorInfo {
            code: int_dbl,
            result: DataType::Double,
        }
    } else if rhs.is_integer() {
        OperatorInfo {
            code: dbl_int,
            result: DataType::Double,
        }
    } else {
        OperatorInfo {
            code: dbl_dbl,
            result: DataType::Double,
        }
    }
}

/// An operator grouping: keyword, precedence and typed opcode ids.
#[derive(Debug)]
pub struct OperatorDef {
    pub precedence: Precedence,
    pub keyword: &'static str,
    pub codes: OperatorCodes,
}

/// Opcode ids the compiler and the run guard refer to directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct KnownCodes {
    pub const_dbl: WordType,
    pub const_int: WordType,
    pub cvt_dbl: WordType,
    pub cvt_int: WordType,
    pub print: WordType,
    pub print_dbl: WordType,
    pub print_int: WordType,
    pub end: WordType,
}

/// The registry itself. Built once per process; see [`table`].
#[derive(Default)]
pub struct Table {
    recreate_fns: Vec<RecreateFn>,
    execute_fns: Vec<ExecuteFn>,
    keywords: HashMap<WordType, &'static str>,
    precedences: HashMap<WordType, Precedence>,
    operators: Vec<OperatorDef>,
    symbol_operators: HashMap<char, usize>,
    comparison_operators: HashMap<&'static str, usize>,
    word_operators: HashMap<CiString, usize>,
    negate_operator: usize,
    commands: HashMap<CiString, WordType>,
    compile_fns: HashMap<WordType, CompileFn>,
    pub known: KnownCodes,
}

impl Table {
    /// Registers a plain opcode and returns its id.
    pub fn register(&mut self, recreate: RecreateFn, execute: ExecuteFn) -> WordType {
        let code = self.recreate_fns.len() as WordType;
        self.recreate_fns.push(recreate);
        self.execute_fns.push(execute);
        code
    }

    /// Registers an operator grouping under its display keyword.
    ///
    /// Relation and Equality operators are indexed in the comparison table,
    /// alphabetic keywords in the word table, the unary minus as the negate
    /// operator, and everything else under its single symbol character.
    pub fn register_operator(
        &mut self,
        precedence: Precedence,
        keyword: &'static str,
        codes: OperatorCodes,
    ) {
        let index = self.operators.len();
        for code in codes.code_values() {
            self.keywords.insert(code, keyword);
            self.precedences.insert(code, precedence);
        }
        match codes {
            OperatorCodes::Unary { .. } => self.negate_operator = index,
            OperatorCodes::Not { .. } => {
                self.word_operators.insert(CiString::from(keyword), index);
            }
            _ if precedence == Precedence::Relation || precedence == Precedence::Equality => {
                self.comparison_operators.insert(keyword, index);
            }
            _ if keyword.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                self.word_operators.insert(CiString::from(keyword), index);
            }
            _ => {
                let symbol = keyword.chars().next().unwrap_or_default();
                self.symbol_operators.insert(symbol, index);
            }
        }
        self.operators.push(OperatorDef {
            precedence,
            keyword,
            codes,
        });
    }

    /// Registers a command opcode under its keyword and returns its id.
    pub fn register_command(
        &mut self,
        keyword: &'static str,
        compile: CompileFn,
        recreate: RecreateFn,
        execute: ExecuteFn,
    ) -> WordType {
        let code = self.register(recreate, execute);
        self.keywords.insert(code, keyword);
        self.commands.insert(CiString::from(keyword), code);
        self.compile_fns.insert(code, compile);
        code
    }

    pub fn recreate_fn(&self, code: WordType) -> RecreateFn {
        self.recreate_fns[code as usize]
    }

    pub fn execute_fn(&self, code: WordType) -> ExecuteFn {
        self.execute_fns[code as usize]
    }

    pub fn keyword(&self, code: WordType) -> &'static str {
        self.keywords[&code]
    }

    pub fn precedence(&self, code: WordType) -> Precedence {
        self.precedences[&code]
    }

    /// Looks up a binary operator written as a single symbol character.
    pub fn symbol_operator(&self, symbol: char) -> Option<&OperatorDef> {
        self.symbol_operators
            .get(&symbol)
            .map(|&index| &self.operators[index])
    }

    /// Looks up a comparison operator by its full symbol text.
    pub fn comparison_operator(&self, symbol: &str) -> Option<&OperatorDef> {
        self.comparison_operators
            .get(symbol)
            .map(|&index| &self.operators[index])
    }

    /// Looks up an operator written as an alphabetic keyword.
    pub fn word_operator(&self, word: &str) -> Option<&OperatorDef> {
        self.word_operators
            .get(CiStr::new(word))
            .map(|&index| &self.operators[index])
    }

    /// The unary minus operator.
    pub fn negate_operator(&self) -> &OperatorDef {
        &self.operators[self.negate_operator]
    }

    /// Case-insensitive command lookup.
    pub fn find_command(&self, keyword: &str) -> Option<WordType> {
        self.commands.get(CiStr::new(keyword)).copied()
    }

    pub fn compile_fn(&self, code: WordType) -> CompileFn {
        self.compile_fns[&code]
    }

    /// Number of registered opcodes.
    pub fn len(&self) -> usize {
        self.recreate_fns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recreate_fns.is_empty()
    }

    fn build() -> Table {
        let mut table = Table::default();
        constnum::register(&mut table);
        operators::register(&mut table);
        commands::register(&mut table);
        table
    }
}

lazy_static! {
    static ref TABLE: Table = Table::build();
}

/// The process-wide opcode table.
///
/// Construction happens on first use, before which no program can have been
/// compiled, so every id found in a program buffer is guaranteed to be
/// registered.
pub fn table() -> &'static Table {
    &TABLE
}
