use thiserror::Error;

/// Raised when a source string cannot be turned into a tree.
///
/// Evaluation never produces errors; only the structure of the text can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `(` was never matched by a `)` before the end of the input.
    #[error("Brackets not closed properly: \"(\" at {position} is never closed.")]
    UnclosedBracket { position: usize },

    /// A `)` appeared outside of any bracketed group.
    #[error("Unexpected \")\" at {position}.")]
    UnexpectedCloseBracket { position: usize },

    /// An operand is not joined to the rest of the expression by an operator.
    #[error("Operand \"{operand}\" at {position} is not joined to the expression by an operator.")]
    DanglingOperand { operand: String, position: usize },
}
