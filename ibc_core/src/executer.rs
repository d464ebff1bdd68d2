//! The bytecode executer: a fetch-execute loop over the program buffer.

use std::io::Write;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ibc_common::{RunError, WordType};

use crate::code::ProgramWord;
use crate::table::table;

/// Why the fetch-execute loop stopped.
///
/// `EndOfProgram` is normal termination, not a failure; keeping it a
/// distinct variant preserves the three-way separation between compile
/// errors, run errors and the termination signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    EndOfProgram,
    Error(RunError),
}

impl From<RunError> for Interrupt {
    fn from(error: RunError) -> Self {
        Interrupt::Error(error)
    }
}

/// One slot of the value stack.
///
/// Each typed opcode knows statically which alternative its operands are;
/// reading the wrong one is a compiler bug, not a user error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Dbl(f64),
    Int(i32),
}

/// Owns the program counter, the value stack and the output stream while a
/// program runs.
pub struct Executer<'a> {
    words: &'a [ProgramWord],
    dbl_values: &'a [f64],
    int_values: &'a [i32],
    program_counter: usize,
    stack: Vec<Value>,
    os: &'a mut dyn Write,
    rng: StdRng,
}

impl<'a> Executer<'a> {
    pub fn new(
        words: &'a [ProgramWord],
        dbl_values: &'a [f64],
        int_values: &'a [i32],
        os: &'a mut dyn Write,
    ) -> Self {
        Executer {
            words,
            dbl_values,
            int_values,
            program_counter: 0,
            stack: Vec::new(),
            os,
            // Deterministic across runs; reserved for the RND function.
            rng: StdRng::seed_from_u64(0),
        }
    }

    /// Runs until an opcode interrupts the loop.
    pub fn run(&mut self) -> Interrupt {
        self.program_counter = 0;
        loop {
            if let Err(interrupt) = self.execute_one() {
                return interrupt;
            }
        }
    }

    /// Fetches and executes a single instruction.
    pub fn execute_one(&mut self) -> Result<(), Interrupt> {
        let code = self.words[self.program_counter].code();
        self.program_counter += 1;
        (table().execute_fn(code))(self)
    }

    /// Reads the operand word following the current instruction.
    pub fn get_operand(&mut self) -> WordType {
        let operand = self.words[self.program_counter].operand();
        self.program_counter += 1;
        operand
    }

    /// Offset of the instruction currently executing; run errors anchor
    /// their markers here.
    pub fn current_offset(&self) -> usize {
        self.program_counter - 1
    }

    pub fn push_const_dbl(&mut self, operand: WordType) {
        self.stack.push(Value::Dbl(self.dbl_values[operand as usize]));
    }

    pub fn push_const_int(&mut self, operand: WordType) {
        self.stack.push(Value::Int(self.int_values[operand as usize]));
    }

    pub fn push_dbl(&mut self, value: f64) {
        self.stack.push(Value::Dbl(value));
    }

    pub fn push_int(&mut self, value: i32) {
        self.stack.push(Value::Int(value));
    }

    pub fn pop_dbl(&mut self) -> f64 {
        match self.stack.pop() {
            Some(Value::Dbl(value)) => value,
            _ => panic!("BUG: value stack slot is not a double"),
        }
    }

    pub fn pop_int(&mut self) -> i32 {
        match self.stack.pop() {
            Some(Value::Int(value)) => value,
            _ => panic!("BUG: value stack slot is not an integer"),
        }
    }

    pub fn stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn output(&mut self) -> &mut dyn Write {
        &mut *self.os
    }

    /// Uniform random double in `[0, 1)`; reserved for the RND function.
    pub fn random_number(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}
