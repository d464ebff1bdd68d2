//! Precedence-climbing expression compiler.

use ibc_common::{CompileError, DataType, WordType};

use crate::table::{table, OperatorCodes, OperatorDef, Precedence};

use super::constnum::ConstNumParser;
use super::Compiler;

/// Compiles a numeric expression, emitting typed opcodes and implicit
/// conversions as it goes.
pub struct ExpressionCompiler<'c, 'a> {
    compiler: &'c mut Compiler<'a>,
}

impl<'c, 'a> ExpressionCompiler<'c, 'a> {
    pub fn new(compiler: &'c mut Compiler<'a>) -> Self {
        ExpressionCompiler { compiler }
    }

    /// Compiles an expression and returns the data type it produces.
    ///
    /// `Null` as the expected type accepts any numeric result (or none at
    /// all); any other expected type makes a missing expression an error,
    /// and an expected `Double` coerces an integer result.
    pub fn compile(&mut self, expected_data_type: DataType) -> Result<DataType, CompileError> {
        self.compiler.skip_white_space();
        let column = self.compiler.column();
        let data_type = self.compile_num_expression(None)?;
        if !expected_data_type.is_null() && data_type.is_null() {
            return Err(CompileError::expected_num_expression(column));
        }
        if expected_data_type.is_double() {
            self.compiler.convert_to_double(data_type);
        }
        Ok(data_type)
    }

    /// The climb loop: parse an operand, then keep consuming operators that
    /// bind tighter than the enclosing one.
    fn compile_num_expression(
        &mut self,
        outer_precedence: Option<Precedence>,
    ) -> Result<DataType, CompileError> {
        let mut data_type = self.compile_operand()?;
        if data_type.is_null() {
            return Ok(data_type);
        }
        while let Some(operator) = self.peek_operator(outer_precedence) {
            data_type = self.compile_binary_operator(operator, data_type)?;
        }
        Ok(data_type)
    }

    fn compile_binary_operator(
        &mut self,
        operator: &'static OperatorDef,
        lhs_data_type: DataType,
    ) -> Result<DataType, CompileError> {
        // Left-side coercions must happen before the right side emits code,
        // while the constant-rewrite bookkeeping still refers to the left.
        match operator.codes {
            OperatorCodes::IntDivide { .. } => self.compiler.convert_to_double(lhs_data_type),
            OperatorCodes::Logic { .. } => self.compiler.convert_to_integer(lhs_data_type)?,
            _ => {}
        }

        self.compiler.skip_white_space();
        let rhs_column = self.compiler.column();
        let rhs_data_type = self.compile_num_expression(Some(operator.precedence))?;
        if rhs_data_type.is_null() {
            return Err(CompileError::expected_num_expression(rhs_column));
        }

        match operator.codes {
            OperatorCodes::IntDivide { code } => {
                self.compiler.convert_to_double(rhs_data_type);
                self.compiler.add_instruction(code);
                Ok(DataType::Integer)
            }
            OperatorCodes::Logic { code } => {
                self.compiler.convert_to_integer(rhs_data_type)?;
                self.compiler.add_instruction(code);
                Ok(DataType::Integer)
            }
            ref codes => {
                let info = codes.select(lhs_data_type, rhs_data_type);
                self.compiler.add_instruction(info.code);
                Ok(info.result)
            }
        }
    }

    /// Parses one operand: a numeric constant, a negation, a parenthesized
    /// subexpression or a NOT operation. Returns `Null`, consuming nothing,
    /// when none is present.
    fn compile_operand(&mut self) -> Result<DataType, CompileError> {
        self.compiler.skip_white_space();
        let mut constant = ConstNumParser::new(self.compiler);
        let data_type = constant.parse()?;
        if !data_type.is_null() {
            return Ok(data_type);
        }
        if constant.negate_operator() {
            return self.compile_negation();
        }
        match self.compiler.peek_next_char() {
            Some('(') => self.compile_parentheses(),
            Some(c) if c.is_ascii_alphabetic() => self.compile_word_operand(),
            _ => Ok(DataType::Null),
        }
    }

    fn compile_negation(&mut self) -> Result<DataType, CompileError> {
        self.compiler.skip_white_space();
        let column = self.compiler.column();
        let operator = table().negate_operator();
        let data_type = self.compile_num_expression(Some(operator.precedence))?;
        if data_type.is_null() {
            return Err(CompileError::expected_num_expression(column));
        }
        let info = operator.codes.select(data_type, DataType::Null);
        self.compiler.add_instruction(info.code);
        Ok(info.result)
    }

    fn compile_parentheses(&mut self) -> Result<DataType, CompileError> {
        self.compiler.get_next_char();
        self.compiler.skip_white_space();
        let column = self.compiler.column();
        let data_type = self.compile_num_expression(None)?;
        if data_type.is_null() {
            return Err(CompileError::expected_num_expression(column));
        }
        self.compiler.skip_white_space();
        if self.compiler.peek_next_char() != Some(')') {
            return Err(CompileError::new(
                "expected closing parenthesis",
                self.compiler.column(),
            ));
        }
        self.compiler.get_next_char();
        Ok(data_type)
    }

    /// A word in operand position is either the unary NOT operator or (in a
    /// future extension) a function keyword; anything else ends the operand.
    fn compile_word_operand(&mut self) -> Result<DataType, CompileError> {
        let mark = self.compiler.mark();
        let word = self.compiler.get_word();
        if let Some(operator) = table().word_operator(word) {
            if let OperatorCodes::Not { code } = operator.codes {
                return self.compile_not(operator.precedence, code);
            }
        }
        self.compiler.reset(mark);
        Ok(DataType::Null)
    }

    fn compile_not(
        &mut self,
        precedence: Precedence,
        code: WordType,
    ) -> Result<DataType, CompileError> {
        self.compiler.skip_white_space();
        let column = self.compiler.column();
        let data_type = self.compile_num_expression(Some(precedence))?;
        if data_type.is_null() {
            return Err(CompileError::expected_num_expression(column));
        }
        self.compiler.convert_to_integer(data_type)?;
        self.compiler.add_instruction(code);
        Ok(DataType::Integer)
    }

    /// Consumes and returns the next operator when one is present and binds
    /// tighter than the enclosing precedence; otherwise leaves the cursor
    /// untouched and returns `None`.
    fn peek_operator(
        &mut self,
        outer_precedence: Option<Precedence>,
    ) -> Option<&'static OperatorDef> {
        self.compiler.skip_white_space();
        let mark = self.compiler.mark();
        let operator = match self.compiler.peek_next_char()? {
            '<' | '>' | '=' => {
                let symbol = self.parse_comparison_symbol();
                table().comparison_operator(symbol)
            }
            c if c.is_ascii_alphabetic() => {
                let word = self.compiler.get_word();
                match table().word_operator(word) {
                    Some(operator) if !matches!(operator.codes, OperatorCodes::Not { .. }) => {
                        Some(operator)
                    }
                    _ => None,
                }
            }
            c => {
                let operator = table().symbol_operator(c);
                if operator.is_some() {
                    self.compiler.get_next_char();
                }
                operator
            }
        };
        match operator {
            Some(operator) if binds(operator.precedence, outer_precedence) => Some(operator),
            _ => {
                self.compiler.reset(mark);
                None
            }
        }
    }

    fn parse_comparison_symbol(&mut self) -> &'static str {
        let first = self.compiler.get_next_char();
        match (first, self.compiler.peek_next_char()) {
            (Some('<'), Some('=')) => {
                self.compiler.get_next_char();
                "<="
            }
            (Some('<'), Some('>')) => {
                self.compiler.get_next_char();
                "<>"
            }
            (Some('>'), Some('=')) => {
                self.compiler.get_next_char();
                ">="
            }
            (Some('<'), _) => "<",
            (Some('>'), _) => ">",
            _ => "=",
        }
    }
}

/// All operators are left-associative, so an operator binds only when it is
/// strictly tighter than the enclosing one.
fn binds(precedence: Precedence, outer_precedence: Option<Precedence>) -> bool {
    match outer_precedence {
        None => true,
        Some(outer) => precedence < outer,
    }
}
