//! Core of the incremental BASIC compiler.
//!
//! A source line compiles into a flat stream of program words, the whole
//! program executes on a stack machine, and any line can be recreated back
//! into canonical text. The three passes meet in the opcode table: every
//! opcode registers an execute function and a recreate function, operators
//! additionally carry a keyword and a precedence, and commands carry a
//! compile function.

pub mod code;
pub mod commands;
pub mod compiler;
pub mod constnum;
pub mod executer;
pub mod operators;
pub mod program;
pub mod recreator;
pub mod table;

pub use code::{ProgramCode, ProgramWord};
pub use compiler::{CommandCompiler, Compiler, ExpressionCompiler};
pub use constnum::ConstNumDictionary;
pub use executer::{Executer, Interrupt};
pub use program::ProgramUnit;
pub use recreator::Recreator;
pub use table::{table, Precedence, Table};
