// ABOUTME: Error types shared by the reader, value model, environment, and evaluator

use crate::value::Expr;
use thiserror::Error;

/// Every failure this core can raise. Reader, printer, value-model, environment
/// and evaluator operations all return `Result<_, LispError>` so a failure in any
/// of them unwinds the same way to the nearest caller of `eval`/`read_one_from_string`.
#[derive(Error, Debug, Clone)]
pub enum LispError {
    /// Driver-level: no command argument was given.
    #[error("missing command")]
    MissingCommand,

    /// Reader: the leading character of an atom didn't match any lexeme class.
    #[error("unexpected '{0}'")]
    UnexpectedChar(char),

    /// Reader: the stream ended while a list was still open.
    #[error("unexpected end of stream while parsing list")]
    UnexpectedEof,

    /// Reader: a dotted-pair tail wasn't followed by `)`.
    #[error("missing closing ')'")]
    MissingCloseParen,

    /// Value model: `car`/`cdr` (or a convenience composition of them) applied to a non-pair.
    #[error("not a pair: {0}")]
    NotAPair(Expr),

    /// Environment: `env_get`/`env_set` found no global binding.
    #[error("unbound variable {0}")]
    Unbound(Expr),

    /// Evaluator: fallthrough for an expression variant `eval` doesn't know how to evaluate.
    #[error("cannot eval {0}")]
    CannotEval(Expr),

    /// Printer: fallthrough for an expression variant `repr_expr` doesn't know how to render.
    #[error("cannot print {0}")]
    CannotPrint(Expr),

    /// Environment: `env_del` named a variable with no local binding.
    #[error("cannot remove variable {0}")]
    CannotRemove(Expr),

    /// Evaluator recursion depth exceeded what the host call stack can sustain.
    #[error("stack overflow during eval")]
    StackOverflow,
}
