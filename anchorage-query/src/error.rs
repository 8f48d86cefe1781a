//! Error types for plan construction and Include translation.
//!
//! Errors carry a numeric code for programmatic handling plus a builder-style
//! context describing which navigation or query source was involved.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: A{category}{number}
//! - 1xxx: Construction errors (invalid argument, empty navigation path)
//! - 2xxx: Translation errors (unanchored include, unknown navigation)
//! - 9xxx: Internal errors
//!
//! ```rust
//! use anchorage_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::invalid_argument("navigation_path", "must not be empty");
//! assert_eq!(err.code, ErrorCode::InvalidArgument);
//! assert_eq!(err.code.code(), "A1001");
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for plan operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Construction errors (1xxx)
    /// A required constructor argument was missing or malformed (A1001).
    InvalidArgument = 1001,
    /// A string navigation path had no usable segments (A1002).
    EmptyNavigationPath = 1002,

    // Translation errors (2xxx)
    /// An Include directive has no anchoring query source (A2001).
    UnanchoredInclude = 2001,
    /// A navigation could not be matched to entity metadata (A2002).
    UnknownNavigation = 2002,

    // Internal errors (9xxx)
    /// Internal error (A9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "A1001").
    pub fn code(&self) -> String {
        format!("A{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "Invalid argument",
            Self::EmptyNavigationPath => "Empty navigation path",
            Self::UnanchoredInclude => "Include is not anchored to a query source",
            Self::UnknownNavigation => "Unknown navigation",
            Self::Internal => "Internal error",
        }
    }

    /// Whether the error is raised while building a directive rather than translating it.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::InvalidArgument | Self::EmptyNavigationPath)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The argument that was rejected.
    pub argument: Option<String>,
    /// The navigation path involved, rendered as text.
    pub navigation: Option<String>,
    /// The query source involved.
    pub query_source: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while building or translating query plans.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the rejected argument.
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.context.argument = Some(argument.into());
        self
    }

    /// Set the navigation path.
    pub fn with_navigation(mut self, navigation: impl Into<String>) -> Self {
        self.context.navigation = Some(navigation.into());
        self
    }

    /// Set the query source.
    pub fn with_query_source(mut self, source: impl Into<String>) -> Self {
        self.context.query_source = Some(source.into());
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create an invalid argument error.
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        let argument = argument.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Invalid argument `{}`: {}", argument, message),
        )
        .with_argument(argument)
    }

    /// Create an empty navigation path error.
    pub fn empty_navigation_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::EmptyNavigationPath,
            format!("Navigation path {:?} contains an empty segment", path),
        )
        .with_argument("navigation_path")
        .with_navigation(path)
        .with_suggestion("Separate navigation names with a single '.' (e.g. \"Orders.OrderLines\")")
    }

    /// Create an unanchored include error.
    pub fn unanchored_include(navigation: impl Into<String>) -> Self {
        let navigation = navigation.into();
        Self::new(
            ErrorCode::UnanchoredInclude,
            format!("{} does not originate from a query source", navigation),
        )
        .with_navigation(navigation)
        .with_suggestion("Start the include path at a query source reference")
        .with_help("Includes on projected or correlated sub-expressions cannot be eager-loaded")
    }

    /// Create an unknown navigation error.
    pub fn unknown_navigation(entity: impl Into<String>, navigation: impl Into<String>) -> Self {
        let entity = entity.into();
        let navigation = navigation.into();
        Self::new(
            ErrorCode::UnknownNavigation,
            format!("'{}' is not a navigation of '{}'", navigation, entity),
        )
        .with_navigation(navigation)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
            .with_help("This is likely a bug in Anchorage - please report it")
    }

    // ============== Error Checks ==============

    /// Check if this is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::InvalidArgument | ErrorCode::EmptyNavigationPath
        )
    }

    /// Check if this is an unanchored include error.
    pub fn is_unanchored(&self) -> bool {
        self.code == ErrorCode::UnanchoredInclude
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref argument) = self.context.argument {
            output.push_str(&format!("  → Argument: {}\n", argument));
        }
        if let Some(ref navigation) = self.context.navigation {
            output.push_str(&format!("  → Navigation: {}\n", navigation));
        }
        if let Some(ref source) = self.context.query_source {
            output.push_str(&format!("  → Query source: {}\n", source));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}
