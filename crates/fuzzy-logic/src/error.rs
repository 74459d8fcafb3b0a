use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FuzzyError {
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("unknown term `{term}` of variable `{variable}`")]
    UnknownTerm { variable: String, term: String },

    #[error("variable `{0}` defined twice")]
    DuplicateVariable(String),

    #[error("configuration defines no output variable")]
    MissingOutput,

    #[error("configuration defines no rules")]
    MissingRules,

    #[error("input `{0}` given a non-finite value")]
    NonFiniteInput(String),
}
