//! Error taxonomy for term construction and engine boundaries.
//!
//! Only malformed input is a hard error: ill-sorted or wrong-arity term
//! construction, unknown names, rewrite rules whose right-hand side mentions
//! variables absent from the left. Unification and rewrite *failures*
//! (symbol clash, occurs check, no match, unsatisfiable, truncated search)
//! are ordinary return values in their respective modules, never `Err`.

use thiserror::Error;

/// Errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigilError {
    /// An application argument's sort is incompatible with the declared
    /// domain sort.
    #[error("sort mismatch for argument {index} of {func}: expected {expected}, found {found}")]
    Sort {
        /// Function being applied.
        func: String,
        /// Zero-based argument index.
        index: usize,
        /// Declared domain sort.
        expected: String,
        /// Actual argument sort.
        found: String,
    },

    /// An application was built with the wrong number of arguments.
    #[error("arity mismatch for {func}: expected {expected} arguments, found {found}")]
    Arity {
        /// Function being applied.
        func: String,
        /// Declared arity.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// A sort name was referenced before being registered.
    #[error("unknown sort: {0}")]
    UnknownSort(String),

    /// A function symbol was referenced before being declared.
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A rewrite rule's right-hand side mentions a variable that does not
    /// occur on the left-hand side.
    #[error("ill-formed rewrite rule: right-hand side variable {var} does not occur on the left")]
    IllFormedRule {
        /// Offending variable name.
        var: String,
    },

    /// A bounded computation ran out of budget before reaching a fixed point.
    #[error("bound exceeded after {limit} steps")]
    BoundExceeded {
        /// The exhausted step budget.
        limit: u64,
    },
}

/// Result type used throughout the Sigil crates.
pub type Result<T> = std::result::Result<T, SigilError>;
