//! Error values threaded through compilation and execution.

use thiserror::Error;

/// Compile-time failure with enough location detail to draw a caret line.
///
/// `column` is zero-based within the source line; `length` is the number of
/// caret characters the report should draw.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CompileError {
    pub message: String,
    pub column: usize,
    pub length: usize,
}

impl CompileError {
    pub fn new(message: impl Into<String>, column: usize) -> Self {
        Self::with_length(message, column, 1)
    }

    pub fn with_length(message: impl Into<String>, column: usize, length: usize) -> Self {
        CompileError {
            message: message.into(),
            column,
            length,
        }
    }

    pub fn expected_num_expression(column: usize) -> Self {
        Self::new("expected numeric expression", column)
    }
}

/// Runtime trap raised by an opcode handler.
///
/// `offset` is the program-buffer offset of the instruction that fired; the
/// recreator uses it to anchor the error marker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RunError {
    pub message: String,
    pub offset: usize,
}

impl RunError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        RunError {
            message: message.into(),
            offset,
        }
    }
}
