use thiserror::Error;

/// Problems with the `symbol:location` requirement list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    #[error("Malformed requirement {token:?}: {reason}")]
    Malformed { token: String, reason: &'static str },
    #[error("Variable {symbol:?} is required more than once")]
    Duplicate { symbol: char },
    #[error("Required location {location} for {symbol:?} is outside 0..{count}")]
    OutOfRange {
        symbol: char,
        location: i64,
        count: usize,
    },
    #[error("Location {location} is required for both {first:?} and {second:?}")]
    Conflict {
        location: usize,
        first: char,
        second: char,
    },
    #[error("Required variable {symbol:?} does not appear in the program")]
    UnknownVariable { symbol: char },
}

/// Compiler errors, all raised before the search starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Requirement(#[from] RequirementError),
    #[error("Search space too large: {free} free variables")]
    SearchSpaceTooLarge { free: usize },
    #[error("No candidate assignment was generated")]
    EmptySearchSpace,
}

/// Tape interpreter errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TapeError {
    #[error("Pointer out of bounds at instruction {pc}")]
    PointerOutOfBounds { pc: usize },
    #[error("Unmatched {bracket:?} at instruction {pc}")]
    UnmatchedBracket { bracket: char, pc: usize },
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Program has no vbf header line")]
    Missing,
    #[error("Malformed vbf header: {0}")]
    Malformed(String),
}

pub type RequirementResult<T> = std::result::Result<T, RequirementError>;

pub type CompileResult<T> = std::result::Result<T, CompileError>;

pub type TapeResult<T> = std::result::Result<T, TapeError>;

pub type HeaderResult<T> = std::result::Result<T, HeaderError>;
