//! State-machine parser for numeric literals.

use ibc_common::{CompileError, DataType};

use super::Compiler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Negative,
    Zero,
    Period,
    Mantissa,
    Exponent,
    ExponentSign,
    ExponentDigits,
}

/// Parses one numeric literal from the compiler's cursor.
///
/// Produces `Null` without consuming anything when no literal is present.
/// Two lexical ambiguities are resolved for the caller: a lone `-` sets the
/// negate-operator flag (the caller compiles a negation), and an `E` that
/// turns out to start a keyword is pushed back onto the cursor with the
/// literal truncated before it.
pub struct ConstNumParser<'c, 'a> {
    compiler: &'c mut Compiler<'a>,
    state: State,
    number: String,
    first_column: usize,
    floating_point: bool,
    done: bool,
    negate_operator: bool,
}

impl<'c, 'a> ConstNumParser<'c, 'a> {
    pub fn new(compiler: &'c mut Compiler<'a>) -> Self {
        let first_column = compiler.column();
        ConstNumParser {
            compiler,
            state: State::Start,
            number: String::new(),
            first_column,
            floating_point: false,
            done: false,
            negate_operator: false,
        }
    }

    /// Runs the state machine; on success the literal is interned and its
    /// constant-push instruction emitted.
    pub fn parse(&mut self) -> Result<DataType, CompileError> {
        while !self.done {
            let next_char = self.compiler.peek_next_char();
            self.step(next_char)?;
        }
        if self.number.is_empty() {
            return Ok(DataType::Null);
        }
        self.compiler
            .add_const_num_instruction(self.floating_point, &self.number, self.first_column)
    }

    /// True when the parsed `-` was actually the unary negate operator.
    pub fn negate_operator(&self) -> bool {
        self.negate_operator
    }

    fn step(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match self.state {
            State::Start => self.parse_start(next_char),
            State::Negative => self.parse_negative(next_char),
            State::Zero => self.parse_zero(next_char),
            State::Period => self.parse_period(next_char),
            State::Mantissa => self.parse_mantissa(next_char),
            State::Exponent => self.parse_exponent(next_char),
            State::ExponentSign => self.parse_exponent_sign(next_char),
            State::ExponentDigits => self.parse_exponent_digits(next_char),
        }
    }

    fn parse_start(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some('0') => {
                self.state = State::Zero;
                self.add_next_char();
            }
            Some('-') => {
                self.state = State::Negative;
                self.add_next_char();
            }
            _ if self.valid_mantissa_char(next_char) => self.add_next_char(),
            _ => self.done = true,
        }
        Ok(())
    }

    fn parse_negative(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        if self.valid_mantissa_char(next_char) {
            self.add_next_char();
        } else {
            self.set_negate_operator();
        }
        Ok(())
    }

    fn parse_zero(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some('.') => self.state = State::Mantissa,
            Some(c) if c.is_ascii_digit() => {
                return Err(CompileError::new(
                    "expected decimal point after leading zero",
                    self.compiler.column(),
                ));
            }
            _ => self.done = true,
        }
        Ok(())
    }

    fn parse_period(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some(c) if c.is_ascii_digit() => self.state = State::Mantissa,
            _ => {
                return Err(CompileError::new(
                    "expected digit after decimal point",
                    self.compiler.column(),
                ));
            }
        }
        Ok(())
    }

    fn parse_mantissa(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some('.') if !self.floating_point => self.floating_point = true,
            Some(c) if c.eq_ignore_ascii_case(&'e') => self.state = State::Exponent,
            Some(c) if c.is_ascii_digit() => {}
            _ => {
                self.done = true;
                return Ok(());
            }
        }
        self.add_next_char();
        Ok(())
    }

    fn parse_exponent(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some('-') | Some('+') => self.state = State::ExponentSign,
            Some(c) if c.is_ascii_digit() => self.state = State::ExponentDigits,
            Some(c) if c.is_ascii_alphabetic() => {
                self.remove_exponent_char();
                return Ok(());
            }
            _ => {
                return Err(CompileError::new(
                    "expected sign or digit for exponent",
                    self.compiler.column(),
                ));
            }
        }
        self.floating_point = true;
        self.add_next_char();
        Ok(())
    }

    fn parse_exponent_sign(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some(c) if c.is_ascii_digit() => self.state = State::ExponentDigits,
            _ => {
                return Err(CompileError::new(
                    "expected digit after exponent sign",
                    self.compiler.column(),
                ));
            }
        }
        Ok(())
    }

    fn parse_exponent_digits(&mut self, next_char: Option<char>) -> Result<(), CompileError> {
        match next_char {
            Some(c) if c.is_ascii_digit() => self.add_next_char(),
            _ => self.done = true,
        }
        Ok(())
    }

    fn valid_mantissa_char(&mut self, next_char: Option<char>) -> bool {
        match next_char {
            Some('.') => {
                self.floating_point = true;
                self.state = State::Period;
                true
            }
            Some(c) if c.is_ascii_digit() => {
                self.state = State::Mantissa;
                true
            }
            _ => false,
        }
    }

    fn add_next_char(&mut self) {
        if let Some(c) = self.compiler.get_next_char() {
            self.number.push(c);
        }
    }

    fn set_negate_operator(&mut self) {
        self.negate_operator = true;
        self.number.clear();
        self.done = true;
    }

    /// The mistaken exponent letter starts a keyword: push it back onto the
    /// cursor and end the literal before it.
    fn remove_exponent_char(&mut self) {
        self.number.pop();
        self.compiler.unget_char();
        self.done = true;
    }
}
