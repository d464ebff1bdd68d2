//! Compilation of one source line into program words.
//!
//! [`Compiler`] owns the input cursor and the code line being emitted;
//! [`CommandCompiler`] dispatches the line's leading keyword; the
//! [`ExpressionCompiler`] and the constant-number parser do the rest.

mod constnum;
mod expression;

pub use constnum::ConstNumParser;
pub use expression::ExpressionCompiler;

use ibc_common::{CompileError, DataType, WordType};

use crate::code::ProgramCode;
use crate::program::ProgramUnit;
use crate::table::table;

struct ConstantSpan {
    column: usize,
    length: usize,
}

/// Per-line compilation state: the input cursor, the emitted code line and
/// the bookkeeping needed for in-place constant coercion.
pub struct Compiler<'a> {
    line: &'a str,
    pos: usize,
    program: &'a mut ProgramUnit,
    code_line: ProgramCode,
    last_constant: Option<ConstantSpan>,
}

impl<'a> Compiler<'a> {
    pub fn new(line: &'a str, program: &'a mut ProgramUnit) -> Self {
        Compiler {
            line,
            pos: 0,
            program,
            code_line: ProgramCode::new(),
            last_constant: None,
        }
    }

    /// Column of the next unconsumed character; stable across whitespace
    /// skips so it can anchor error reports.
    pub fn column(&self) -> usize {
        self.pos
    }

    pub fn peek_next_char(&self) -> Option<char> {
        self.line.as_bytes().get(self.pos).map(|&b| b as char)
    }

    pub fn get_next_char(&mut self) -> Option<char> {
        let next = self.peek_next_char();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    /// Backs the cursor up one character; used when a mistaken exponent
    /// letter turns out to start a keyword.
    pub fn unget_char(&mut self) {
        self.pos -= 1;
    }

    pub fn skip_white_space(&mut self) {
        while matches!(self.peek_next_char(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Saves the cursor so a speculative parse can be undone.
    pub fn mark(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }

    /// Consumes a run of letters without touching surrounding whitespace.
    pub fn get_word(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek_next_char(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        &self.line[start..self.pos]
    }

    /// Consumes a keyword with the whitespace around it.
    pub fn get_keyword(&mut self) -> &'a str {
        self.skip_white_space();
        let keyword = self.get_word();
        self.skip_white_space();
        keyword
    }

    /// Compiles a numeric expression at the current cursor position.
    pub fn compile_expression(
        &mut self,
        expected_data_type: DataType,
    ) -> Result<DataType, CompileError> {
        ExpressionCompiler::new(self).compile(expected_data_type)
    }

    /// Emits a plain instruction word.
    pub fn add_instruction(&mut self, code: WordType) {
        self.last_constant = None;
        self.code_line.emit(code);
    }

    /// Interns a numeric literal and emits its constant-push instruction.
    pub fn add_const_num_instruction(
        &mut self,
        floating_point: bool,
        number: &str,
        column: usize,
    ) -> Result<DataType, CompileError> {
        let info = self
            .program
            .const_nums_mut()
            .add(table(), floating_point, number)
            .map_err(|_| {
                CompileError::with_length(
                    "floating point constant is out of range",
                    column,
                    number.len(),
                )
            })?;
        self.code_line.emit(info.code);
        self.code_line.emit_operand(info.operand);
        self.last_constant = Some(ConstantSpan {
            column,
            length: number.len(),
        });
        Ok(info.data_type)
    }

    /// Coerces an integer operand to double: a just-emitted constant is
    /// rewritten to a double constant in place, anything else gets a
    /// run-time conversion instruction.
    pub fn convert_to_double(&mut self, operand_data_type: DataType) {
        if !operand_data_type.is_integer() {
            return;
        }
        if self.last_constant.is_some() {
            let offset = self.code_line.len() - 2;
            self.code_line.set_code(offset, table().known.const_dbl);
        } else {
            self.add_instruction(table().known.cvt_dbl);
        }
    }

    /// Coerces a double operand to integer, the mirror image of
    /// [`Compiler::convert_to_double`]. A constant outside the int32 range
    /// is a compile error spanning the literal.
    pub fn convert_to_integer(
        &mut self,
        operand_data_type: DataType,
    ) -> Result<(), CompileError> {
        if !operand_data_type.is_double() {
            return Ok(());
        }
        if let Some(constant) = &self.last_constant {
            let operand = self.code_line[self.code_line.len() - 1].operand();
            if !self.program.const_nums().convertible_to_integer(operand) {
                return Err(CompileError::with_length(
                    "integer constant is out of range",
                    constant.column,
                    constant.length,
                ));
            }
            let offset = self.code_line.len() - 2;
            self.code_line.set_code(offset, table().known.const_int);
        } else {
            self.add_instruction(table().known.cvt_int);
        }
        Ok(())
    }

    /// Hands the finished code line to the caller.
    pub fn into_code_line(self) -> ProgramCode {
        self.code_line
    }
}

/// Compiles one whole source line: leading keyword, then the command's own
/// compile function.
pub struct CommandCompiler<'a> {
    compiler: Compiler<'a>,
}

impl<'a> CommandCompiler<'a> {
    pub fn new(line: &'a str, program: &'a mut ProgramUnit) -> Self {
        CommandCompiler {
            compiler: Compiler::new(line, program),
        }
    }

    pub fn compile(mut self) -> Result<ProgramCode, CompileError> {
        self.compiler.skip_white_space();
        if self.compiler.peek_next_char().is_none() {
            return Ok(self.compiler.into_code_line());
        }
        let column = self.compiler.column();
        let keyword = self.compiler.get_keyword();
        if keyword.is_empty() {
            return Err(CompileError::new("expected command keyword", column));
        }
        let code = table().find_command(keyword).ok_or_else(|| {
            CompileError::with_length("unknown command", column, keyword.len())
        })?;
        (table().compile_fn(code))(&mut self.compiler)?;
        Ok(self.compiler.into_code_line())
    }
}
