//! Error types for the game core
//!
//! Every variant is a recoverable, user-facing rejection. The component that
//! owns the broken rule returns it and leaves its state untouched; the
//! front-end decides how to present it.

use crate::app::state::RoundState;
use crate::game::RoundType;
use thiserror::Error;

/// Why a word was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordRejection {
    #[error("missing letters: {}", .missing.iter().collect::<String>())]
    MissingLetters { missing: Vec<char> },

    #[error("not in dictionary")]
    NotInDictionary,
}

/// Why an arithmetic operation was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationFault {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{dividend} is not divisible by {divisor}")]
    NonIntegerDivision { dividend: i64, divisor: i64 },

    #[error("result out of range")]
    Overflow,
}

/// Why a token or operator selection was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionFault {
    #[error("number is no longer available")]
    Unavailable,

    #[error("the same number cannot be used twice")]
    SameToken,

    #[error("pick a number before an operator")]
    OperatorBeforeOperand,

    #[error("an operator is already chosen")]
    OperatorAlreadyChosen,

    #[error("pick an operator before the second number")]
    SecondBeforeOperator,

    #[error("the first number is locked once an operator is chosen")]
    FirstOperandLocked,

    #[error("the operation is incomplete")]
    Incomplete,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("nothing to submit")]
    EmptySubmission,

    #[error("invalid word: {0}")]
    InvalidWord(WordRejection),

    #[error("invalid operation: {0}")]
    InvalidOperation(OperationFault),

    #[error("illegal selection: {0}")]
    IllegalSelection(SelectionFault),

    #[error("no round is in progress")]
    NoActiveRound,

    #[error("game is not configured")]
    NotConfigured,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("not allowed while the round is {0}")]
    WrongPhase(RoundState),

    #[error("it is not {0}'s turn")]
    NotPlayersTurn(String),

    #[error("not available in a {0} round")]
    WrongRoundType(RoundType),

    #[error("the game is over")]
    GameFinished,
}

impl GameError {
    /// Errors that mean the caller should send the user back to setup.
    pub fn needs_setup(&self) -> bool {
        matches!(self, GameError::NotConfigured | GameError::NoActiveRound)
    }
}

impl From<OperationFault> for GameError {
    fn from(fault: OperationFault) -> Self {
        GameError::InvalidOperation(fault)
    }
}

impl From<SelectionFault> for GameError {
    fn from(fault: SelectionFault) -> Self {
        GameError::IllegalSelection(fault)
    }
}

impl From<WordRejection> for GameError {
    fn from(rejection: WordRejection) -> Self {
        GameError::InvalidWord(rejection)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
