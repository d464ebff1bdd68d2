//! The program unit: compiled code, line bookkeeping and the run loop.

use std::io::{self, Write};

use log::debug;

use ibc_common::RunError;

use crate::code::ProgramCode;
use crate::compiler::CommandCompiler;
use crate::constnum::ConstNumDictionary;
use crate::executer::{Executer, Interrupt};
use crate::recreator::{ErrorInfo, Recreator};
use crate::table::table;

#[derive(Debug, Clone, Copy)]
struct LineInfo {
    offset: usize,
    size: usize,
}

/// One compiled program: the word buffer, the per-line offsets and the
/// constant pool, plus the operations that run over them.
#[derive(Default)]
pub struct ProgramUnit {
    code: ProgramCode,
    line_info: Vec<LineInfo>,
    const_nums: ConstNumDictionary,
}

impl ProgramUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles every line of `source`, appending the good ones to the
    /// program and reporting the bad ones to `os`. Failed lines keep a
    /// zero-length entry so later line numbers stay aligned. Returns true
    /// when the whole source compiled cleanly.
    pub fn compile_source(&mut self, source: &str, os: &mut dyn Write) -> io::Result<bool> {
        let mut error_count = 0;
        for line in source.lines() {
            debug!("compiling line {}: {line:?}", self.line_info.len() + 1);
            match CommandCompiler::new(line, self).compile() {
                Ok(code_line) => self.append_code_line(code_line),
                Err(error) => {
                    error_count += 1;
                    self.append_code_line(ProgramCode::new());
                    let line_number = self.line_info.len();
                    writeln!(
                        os,
                        "error on line {}:{}: {}",
                        line_number, error.column, error.message
                    )?;
                    writeln!(os, "    {line}")?;
                    writeln!(
                        os,
                        "    {}{}",
                        " ".repeat(error.column),
                        "^".repeat(error.length)
                    )?;
                }
            }
        }
        Ok(error_count == 0)
    }

    /// Appends a compiled line and records its offset and length.
    pub fn append_code_line(&mut self, code_line: ProgramCode) {
        self.line_info.push(LineInfo {
            offset: self.code.len(),
            size: code_line.len(),
        });
        self.code.append(code_line);
    }

    /// Writes every line's canonical recreated form.
    pub fn recreate(&self, os: &mut dyn Write) -> io::Result<()> {
        for line_index in 0..self.line_info.len() {
            writeln!(os, "{}", self.recreate_line(line_index))?;
        }
        Ok(())
    }

    /// Rebuilds one line's canonical text.
    pub fn recreate_line(&self, line_index: usize) -> String {
        self.recreate_line_at(line_index, None)
    }

    /// Rebuilds one line's text with error markers around the instruction
    /// at `error_offset`.
    pub fn recreate_line_marked(&self, line_index: usize, error_offset: usize) -> String {
        self.recreate_line_at(line_index, Some(error_offset))
    }

    fn recreate_line_at(&self, line_index: usize, error_offset: Option<usize>) -> String {
        let info = self.line_info[line_index];
        let words = &self.code.words()[info.offset..info.offset + info.size];
        Recreator::new(self, words, info.offset, error_offset).recreate()
    }

    /// Runs the program, writing its output to `os`.
    ///
    /// An END opcode is appended for the duration of the run so programs
    /// without an explicit END still terminate, and removed again on every
    /// exit path.
    pub fn run(&mut self, os: &mut dyn Write) -> Result<(), RunError> {
        debug!("running {} words", self.code.len());
        self.code.emit(table().known.end);
        let result = {
            let mut executer = Executer::new(
                self.code.words(),
                self.const_nums.dbl_values(),
                self.const_nums.int_values(),
                os,
            );
            match executer.run() {
                Interrupt::EndOfProgram => {
                    if executer.stack_empty() {
                        Ok(())
                    } else {
                        Err(RunError::new(
                            "BUG: value stack not empty at end of program",
                            executer.current_offset(),
                        ))
                    }
                }
                Interrupt::Error(error) => Err(error),
            }
        };
        self.code.pop();
        result
    }

    /// Runs the program and formats any run error onto `os` instead of
    /// propagating it. Returns true when the program ran to completion.
    pub fn run_code(&mut self, os: &mut dyn Write) -> io::Result<bool> {
        match self.run(os) {
            Ok(()) => Ok(true),
            Err(error) => {
                self.output_run_error(os, &error)?;
                Ok(false)
            }
        }
    }

    fn output_run_error(&self, os: &mut dyn Write, error: &RunError) -> io::Result<()> {
        match self.line_index(error.offset) {
            None => writeln!(os, "run error at end of program: {}", error.message),
            Some(line_index) => {
                let marked = self.recreate_line_marked(line_index, error.offset);
                let info = ErrorInfo::new(&marked);
                writeln!(
                    os,
                    "run error at line {}:{}: {}",
                    line_index + 1,
                    info.column,
                    error.message
                )?;
                writeln!(os, "    {}", info.line)?;
                writeln!(
                    os,
                    "    {}{}",
                    " ".repeat(info.column),
                    "^".repeat(info.length)
                )
            }
        }
    }

    /// The unique line whose words cover the given offset.
    fn line_index(&self, offset: usize) -> Option<usize> {
        self.line_info
            .iter()
            .position(|info| offset >= info.offset && offset < info.offset + info.size)
    }

    pub fn const_nums(&self) -> &ConstNumDictionary {
        &self.const_nums
    }

    pub fn const_nums_mut(&mut self) -> &mut ConstNumDictionary {
        &mut self.const_nums
    }

    /// Number of source lines the program has seen, including failed and
    /// empty ones.
    pub fn line_count(&self) -> usize {
        self.line_info.len()
    }
}
