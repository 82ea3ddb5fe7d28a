//! Unified, `miette`-based diagnostics for Combinatoria.
//!
//! Every failure the crate can report is a [`CombinatoriaError`]. Filter
//! compilation errors carry the filter text as a named source and the byte
//! span of the offending character, so a rendered report underlines exactly
//! where the expression went wrong.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(Shape, "dimension '{}' declares no values", name)`
//!
//! - **Use `err_ctx!` for errors with a source and span.**
//!   - `err_ctx!(Syntax, "empty parentheses are not allowed", src, span)`
//!   - `err_ctx!(Syntax, "...", src, span, "help text")`
//!
//! Pass the `SourceArc` by reference; the macro clones the `Arc`.

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// Byte range inside a filter source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// A span covering the single character starting at `start`.
    pub fn at(start: usize, ch: char) -> Self {
        Self {
            start,
            end: start + ch.len_utf8(),
        }
    }

    /// A zero-width span, used for positions past the end of input.
    pub fn point(start: usize) -> Self {
        Self { start, end: start }
    }
}

/// Type-safe error classification that corresponds to `CombinatoriaError` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Malformed filter text
    Syntax,
    /// Filter names a dimension the engine does not have
    UnknownDimension,
    /// Dimension declarations with the wrong shape
    Shape,
    /// The combination file could not be read or decoded
    Load,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "Syntax",
            ErrorType::UnknownDimension => "UnknownDimension",
            ErrorType::Shape => "Shape",
            ErrorType::Load => "Load",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal, composable error context for diagnostics.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source this error points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Every failure mode of engine construction and file loading.
#[derive(Debug, Error)]
pub enum CombinatoriaError {
    #[error("Syntax error: {message}")]
    Syntax { message: String, ctx: ErrorContext },
    #[error("Unknown dimension: {message}")]
    UnknownDimension { message: String, ctx: ErrorContext },
    #[error("Shape error: {message}")]
    Shape { message: String, ctx: ErrorContext },
    #[error("Load error: {message}")]
    Load {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
    },
}

impl CombinatoriaError {
    fn get_ctx(&self) -> &ErrorContext {
        match self {
            CombinatoriaError::Syntax { ctx, .. } => ctx,
            CombinatoriaError::UnknownDimension { ctx, .. } => ctx,
            CombinatoriaError::Shape { ctx, .. } => ctx,
            CombinatoriaError::Load { ctx, .. } => ctx,
        }
    }

    fn message(&self) -> &str {
        match self {
            CombinatoriaError::Syntax { message, .. } => message,
            CombinatoriaError::UnknownDimension { message, .. } => message,
            CombinatoriaError::Shape { message, .. } => message,
            CombinatoriaError::Load { message, .. } => message,
        }
    }

    /// Returns the type-safe error classification for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            CombinatoriaError::Syntax { .. } => ErrorType::Syntax,
            CombinatoriaError::UnknownDimension { .. } => ErrorType::UnknownDimension,
            CombinatoriaError::Shape { .. } => ErrorType::Shape,
            CombinatoriaError::Load { .. } => ErrorType::Load,
        }
    }

    /// Primary span of the error inside its source, when it has one.
    pub fn span(&self) -> Option<Span> {
        self.get_ctx().span
    }

    /// Wraps an underlying I/O or decoding failure as a load error.
    pub fn load(
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CombinatoriaError::Load {
            message: message.into(),
            ctx: ErrorContext::none(),
            source: Some(Box::new(cause)),
        }
    }

    /// A load error with no underlying cause.
    pub fn load_message(message: impl Into<String>, help: Option<String>) -> Self {
        CombinatoriaError::Load {
            message: message.into(),
            ctx: ErrorContext {
                help,
                ..ErrorContext::none()
            },
            source: None,
        }
    }
}

impl Diagnostic for CombinatoriaError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            CombinatoriaError::Syntax { .. } => "combinatoria::syntax",
            CombinatoriaError::UnknownDimension { .. } => "combinatoria::unknown_dimension",
            CombinatoriaError::Shape { .. } => "combinatoria::shape",
            CombinatoriaError::Load { .. } => "combinatoria::load",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.get_ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.get_ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let ctx = self.get_ctx();
        // Labels without a source would point at nothing.
        ctx.source.as_ref()?;
        let span = ctx.span?;
        let len = span.end.saturating_sub(span.start);
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a filter text into a named source for error contexts.
pub fn to_error_source(name: impl AsRef<str>, source: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(
        name.as_ref(),
        source.as_ref().to_string(),
    ))
}

/// Constructs a `CombinatoriaError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($arg:tt)+) => {
        $crate::CombinatoriaError::$variant {
            message: format!($($arg)+),
            ctx: $crate::ErrorContext::none(),
        }
    };
}

/// Constructs a `CombinatoriaError` variant pointing at a span of a source.
#[macro_export]
macro_rules! err_ctx {
    // Message, src, span, help
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::CombinatoriaError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
        }
    };
    // Message, src, span
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::CombinatoriaError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
        }
    };
}
