pub(crate) type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The Errors that may occur when calling the biborg functions.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    position: Option<Position>,
    source: Option<DynError>,
}

/// Types of errors that make up an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Something other than an `@` was found where the next entry should start.
    UnexpectedChar,
    /// A block was expected but the input did not continue with a `{`.
    ExpectedBlockOpen,
    /// The input ended before a block was closed.
    UnterminatedBlock,
    /// The input ended before a quoted literal was closed.
    UnterminatedQuote,
    /// An entry body has no comma between the citation key and the fields.
    MissingCiteSeparator,
    /// A field key was not followed by an `=`.
    MissingFieldSeparator,
    /// The error is associated with an underlying IO error.
    IO,
    /// An error caused when parsing a non-BibTeX format fails.
    Deserialize,
}

/// A 1-based line and column in the source text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    /// Line number, starting at 1.
    pub line: usize,
    /// Column number in characters, starting at 1.
    pub column: usize,
}

impl Position {
    /// Locate the byte `offset` inside `input`.
    ///
    /// Offsets past the end of `input` are clamped to the end.
    #[must_use]
    pub fn locate(input: &str, offset: usize) -> Self {
        let mut offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }

        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;

        Self { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Error {
    /// Creates a new [`Error`] based on the [`ErrorKind`] and message to describe the error.
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            position: None,
            source: None,
        }
    }

    /// Creates a new [`Error`] for a failure detected at byte `offset` of `input`.
    pub fn at<S: Into<String>>(kind: ErrorKind, input: &str, offset: usize, message: S) -> Self {
        Self {
            kind,
            message: Some(message.into()),
            position: Some(Position::locate(input, offset)),
            source: None,
        }
    }

    /// Wraps an existing error as the source of [`Error`].
    pub fn wrap<E>(kind: ErrorKind, source: E) -> Self
    where
        E: Into<DynError>,
    {
        Self {
            kind,
            message: None,
            position: None,
            source: Some(source.into()),
        }
    }

    /// Wraps an existing error as the source of [`Error`] with an additional message.
    pub fn wrap_with<E, S>(kind: ErrorKind, source: E, message: S) -> Self
    where
        E: Into<DynError>,
        S: Into<String>,
    {
        Self {
            kind,
            message: Some(message.into()),
            position: None,
            source: Some(source.into()),
        }
    }

    /// Returns the kind of error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns where in the source text the error was detected, if known.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::UnexpectedChar
            | ErrorKind::ExpectedBlockOpen
            | ErrorKind::UnterminatedBlock
            | ErrorKind::UnterminatedQuote
            | ErrorKind::MissingCiteSeparator
            | ErrorKind::MissingFieldSeparator => f.write_str("Syntax error")?,
            ErrorKind::IO => f.write_str("IO error")?,
            ErrorKind::Deserialize => f.write_str("Deserialize error")?,
        };

        if let Some(position) = &self.position {
            write!(f, " at {position}")?;
        }

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }

        if let Some(cause) = &self.source {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| &**e as _)
    }
}
