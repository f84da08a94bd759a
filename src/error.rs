//! Error types for pragma parsing and validation.
//!
//! Two families, mirroring the two phases: [`ParseError`] for single-line
//! syntax problems (fail-fast within the line) and [`SemanticError`] for
//! cross-line rule violations (aggregated across the unit). [`Diagnostics`]
//! collects both so one pass reports every problem in a source unit.

use core::fmt;

use thiserror::Error;

use crate::directive::{Kind, Path};

/// A malformed pragma line. Carries the 1-based source line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The first word is not a recognized directive kind.
    #[error("line {line}: unknown pragma kind `{word}`")]
    UnknownKind {
        /// Source line.
        line: u32,
        /// The offending word.
        word: String,
    },

    /// The dotted path is malformed (empty segment, leading/trailing dot,
    /// non-identifier segment).
    #[error("line {line}: invalid path `{path}`")]
    InvalidPath {
        /// Source line.
        line: u32,
        /// The offending path text.
        path: String,
    },

    /// The `[n]` array count is not a positive integer.
    #[error("line {line}: array count `{count}` is not a positive integer")]
    InvalidArrayCount {
        /// Source line.
        line: u32,
        /// The offending count text.
        count: String,
    },

    /// A range bound's component count does not match the kind's arity.
    #[error("line {line}: range bound has {found} component(s), but `{kind}` expects {expected}")]
    RangeArityMismatch {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
        /// Arity required by the kind.
        expected: u32,
        /// Arity found in the bound.
        found: u32,
    },

    /// A range bound's scalar class does not match the kind (e.g. `0.5` on an
    /// `int`).
    #[error("line {line}: range bound is {found}, but `{kind}` expects {expected}")]
    RangeTypeMismatch {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
        /// Expected scalar class.
        expected: &'static str,
        /// Type name of the bound found.
        found: &'static str,
    },

    /// A `range(..)` clause on a kind that has no ordered value.
    #[error("line {line}: `{kind}` does not take a range clause")]
    RangeNotAllowed {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
    },

    /// The default literal does not have the kind's value shape.
    #[error("line {line}: default value is {found}, but `{kind}` expects {expected}")]
    DefaultTypeMismatch {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
        /// Expected value shape.
        expected: &'static str,
        /// Type name of the literal found.
        found: &'static str,
    },

    /// A default literal on a kind that carries no value.
    #[error("line {line}: `{kind}` does not take a default value")]
    DefaultNotAllowed {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
    },

    /// The same option key appears twice in one directive.
    #[error("line {line}: duplicate option `{name}`")]
    DuplicateOption {
        /// Source line.
        line: u32,
        /// The repeated key.
        name: String,
    },

    /// A literal was required but something else was found.
    #[error("line {line}: expected a literal, found `{found}`")]
    ExpectedLiteral {
        /// Source line.
        line: u32,
        /// What was found instead.
        found: String,
    },

    /// A `default` directive named something other than `uniform` or
    /// `sampler`.
    #[error("line {line}: expected `uniform` or `sampler` after `default`, found `{word}`")]
    ExpectedCategory {
        /// Source line.
        line: u32,
        /// The offending word.
        word: String,
    },

    /// A `label` directive without a quoted string argument.
    #[error("line {line}: expected a quoted string after `label`")]
    ExpectedString {
        /// Source line.
        line: u32,
    },

    /// A structural token (`)`, `]`, `..`, ...) was missing.
    #[error("line {line}: expected {what}")]
    Expected {
        /// Source line.
        line: u32,
        /// Description of the missing token.
        what: &'static str,
    },

    /// Text remained after a complete directive.
    #[error("line {line}: unexpected trailing input `{rest}`")]
    TrailingInput {
        /// Source line.
        line: u32,
        /// The leftover text.
        rest: String,
    },
}

impl ParseError {
    /// The 1-based source line this error was reported on.
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnknownKind { line, .. }
            | ParseError::InvalidPath { line, .. }
            | ParseError::InvalidArrayCount { line, .. }
            | ParseError::RangeArityMismatch { line, .. }
            | ParseError::RangeTypeMismatch { line, .. }
            | ParseError::RangeNotAllowed { line, .. }
            | ParseError::DefaultTypeMismatch { line, .. }
            | ParseError::DefaultNotAllowed { line, .. }
            | ParseError::DuplicateOption { line, .. }
            | ParseError::ExpectedLiteral { line, .. }
            | ParseError::ExpectedCategory { line, .. }
            | ParseError::ExpectedString { line }
            | ParseError::Expected { line, .. }
            | ParseError::TrailingInput { line, .. } => *line,
        }
    }
}

/// A cross-line rule violation found by the validator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    /// Two directives declared the same path.
    #[error("line {line}: path `{path}` already declared on line {first_line}")]
    DuplicatePath {
        /// Line of the second declaration.
        line: u32,
        /// Line of the first declaration.
        first_line: u32,
        /// The shared path.
        path: Path,
    },

    /// An option key that is not legal for the directive it appears on.
    #[error("line {line}: `{target}` does not accept option `{name}`")]
    UnknownOption {
        /// Source line.
        line: u32,
        /// What the option was declared on: a kind token, or
        /// `default <category>`.
        target: String,
        /// The offending key.
        name: String,
    },

    /// An option value with the wrong literal shape.
    #[error("line {line}: option `{name}` expects {expected}, found {found}")]
    OptionTypeMismatch {
        /// Source line.
        line: u32,
        /// Option key.
        name: String,
        /// Description of the accepted values.
        expected: String,
        /// Type name (or text) of the value found.
        found: String,
    },

    /// Two mutually exclusive options declared together on one directive.
    #[error("line {line}: options `{first}` and `{second}` are mutually exclusive on `{target}`")]
    ConflictingOptions {
        /// Source line.
        line: u32,
        /// What the options were declared on: a kind token, or
        /// `default <category>`.
        target: String,
        /// First key of the exclusive pair.
        first: &'static str,
        /// Second key of the exclusive pair.
        second: &'static str,
    },

    /// A declared default value lies outside the declared range.
    #[error("line {line}: default value of `{path}` lies outside its declared range")]
    DefaultOutOfRange {
        /// Source line.
        line: u32,
        /// Path of the declaration.
        path: Path,
    },

    /// A range whose lower bound exceeds its upper bound in some component.
    #[error("line {line}: range of `{path}` has low > high")]
    EmptyRange {
        /// Source line.
        line: u32,
        /// Path of the declaration.
        path: Path,
    },

    /// An array count on a kind that cannot form a binding array.
    #[error("line {line}: `{kind}` does not take an array count")]
    ArrayNotAllowed {
        /// Source line.
        line: u32,
        /// Directive kind.
        kind: Kind,
    },

    /// A `label` directive that no declaration consumed.
    #[error("line {line}: label is not followed by a declaration")]
    DanglingLabel {
        /// Line of the unconsumed label.
        line: u32,
    },
}

impl SemanticError {
    /// The 1-based source line this error was reported on.
    pub fn line(&self) -> u32 {
        match self {
            SemanticError::DuplicatePath { line, .. }
            | SemanticError::UnknownOption { line, .. }
            | SemanticError::OptionTypeMismatch { line, .. }
            | SemanticError::ConflictingOptions { line, .. }
            | SemanticError::DefaultOutOfRange { line, .. }
            | SemanticError::EmptyRange { line, .. }
            | SemanticError::ArrayNotAllowed { line, .. }
            | SemanticError::DanglingLabel { line } => *line,
        }
    }
}

/// Every problem found while processing one source unit.
///
/// Parse errors never hide later lines, and the validator runs over whatever
/// parsed cleanly, so a failing unit reports all of its problems in one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Single-line syntax errors, in source order.
    pub parse: Vec<ParseError>,
    /// Cross-line rule violations, in source order.
    pub semantic: Vec<SemanticError>,
}

impl Diagnostics {
    /// True if no error was collected.
    pub fn is_empty(&self) -> bool {
        self.parse.is_empty() && self.semantic.is_empty()
    }

    /// Total number of collected errors.
    pub fn len(&self) -> usize {
        self.parse.len() + self.semantic.len()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.parse {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
            first = false;
        }
        for err in &self.semantic {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{err}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
