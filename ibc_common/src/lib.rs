//! Shared types for the incremental BASIC compiler.
//!
//! Everything here is a leaf: the case-insensitive keyword string, the
//! compile-time data type, the deduplicating dictionary that backs the
//! constant pools, the two error values, and the output formatter for
//! doubles. The interpreter core builds on these.

pub mod cistring;
pub mod datatype;
pub mod dictionary;
pub mod error;
pub mod numfmt;

pub use cistring::CiString;
pub use datatype::DataType;
pub use dictionary::{Dictionary, DictionaryEntry};
pub use error::{CompileError, RunError};
pub use numfmt::format_double;

/// One slot of a program buffer: either an opcode id or an operand.
pub type WordType = u16;
