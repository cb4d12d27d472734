//! Error types for webthumb-xml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// Zero-width span at a single position
    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset && self.start.line == 0
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input is not well-formed XML
    MalformedXml,
    MaxDepthExceeded {
        max: u16,
    },
    MaxSizeExceeded {
        max: usize,
    },
    /// No bindings are registered for the requested target type
    UnknownBinding {
        type_name: &'static str,
    },
    /// Two bindings of one type claim the same XML name
    DuplicateBinding {
        type_name: &'static str,
        name: &'static str,
    },
    /// Raw text could not be converted to the declared numeric type
    TypeCoercion {
        field: &'static str,
        raw: String,
        expected: &'static str,
    },
    /// Raw text is not in `YYYY-MM-DD hh:mm:ss` layout
    DateFormat {
        field: &'static str,
        raw: String,
    },
    /// A required source is missing from the element
    MissingChild {
        element: String,
        field: &'static str,
    },
    /// A target type received a field it does not handle
    UndeclaredField {
        type_name: &'static str,
        field: &'static str,
    },
    /// A target type read a field as a different kind than it declared
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedXml => write!(f, "malformed xml"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::UnknownBinding { type_name } => {
                write!(f, "no bindings registered for {type_name}")
            }
            Self::DuplicateBinding { type_name, name } => {
                write!(f, "{type_name} binds `{name}` more than once")
            }
            Self::TypeCoercion {
                field,
                raw,
                expected,
            } => write!(f, "field `{field}`: cannot read {raw:?} as {expected}"),
            Self::DateFormat { field, raw } => {
                write!(
                    f,
                    "field `{field}`: {raw:?} is not in YYYY-MM-DD hh:mm:ss format"
                )
            }
            Self::MissingChild { element, field } => {
                write!(f, "<{element}> has no source for required field `{field}`")
            }
            Self::UndeclaredField { type_name, field } => {
                write!(f, "{type_name} has no field `{field}`")
            }
            Self::FieldTypeMismatch { field, expected } => {
                write!(f, "field `{field}` is not bound as {expected}")
            }
        }
    }
}

/// Main error type for webthumb-xml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Error that is not tied to a source position
    pub fn mapping(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(kind, Span::new(pos, pos))
    }

    /// Prefix the message with the element the error surfaced under
    pub(crate) fn within(mut self, element: &str) -> Self {
        self.message = format!("{element}/{}", self.message);
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

/// Result type alias for webthumb-xml
pub type Result<T> = std::result::Result<T, Error>;
