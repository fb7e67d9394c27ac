use std::ffi::{OsStr, OsString};
use std::fmt;

use crate::Param;

/// Represents a scanning error.
///
/// The [`Display`](fmt::Display) output of an error is exactly the
/// diagnostic line the [`Scanner`](crate::Scanner) writes to its error
/// stream.  With the alternate flag (`{:#}`) invalid values additionally
/// show the offending value and the parse error.
pub struct Error {
    repr: Box<ErrorRepr>,
}

enum ErrorValue {
    String(String),
    OsString(OsString),
}

struct ErrorRepr {
    kind: ErrorKind,
    param: Option<Param>,
    value: Option<ErrorValue>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error {
            repr: Box::new(ErrorRepr {
                kind,
                param: None,
                value: None,
                source: None,
            }),
        }
    }

    pub(crate) fn with_param(mut self, param: Param) -> Error {
        self.repr.param = Some(param);
        self
    }

    pub(crate) fn with_value(mut self, value: String) -> Error {
        self.repr.value = Some(ErrorValue::String(value));
        self
    }

    pub(crate) fn with_raw_value(mut self, value: OsString) -> Error {
        self.repr.value = Some(ErrorValue::OsString(value));
        self
    }

    pub(crate) fn with_source(
        mut self,
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    ) -> Error {
        self.repr.source = Some(source);
        self
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> ErrorKind {
        self.repr.kind
    }

    /// Returns the option the error is about.
    pub fn param(&self) -> Option<&Param> {
        self.repr.param.as_ref()
    }

    /// Returns the offending value or the custom message.
    ///
    /// For [`ErrorKind::InvalidUnicode`] this is `None`, use
    /// [`raw_value`](Self::raw_value) instead.
    pub fn value(&self) -> Option<&str> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(s),
            ErrorValue::OsString(s) => s.to_str(),
        }
    }

    /// Returns the offending value as raw OS string.
    pub fn raw_value(&self) -> Option<&OsStr> {
        match self.repr.value.as_ref()? {
            ErrorValue::String(s) => Some(OsStr::new(s)),
            ErrorValue::OsString(s) => Some(s),
        }
    }
}

impl<'s> From<&'s str> for Error {
    fn from(message: &'s str) -> Error {
        Error::from(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Error {
        Error::new(ErrorKind::Custom).with_value(message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.param()) {
            (ErrorKind::UnrecognizedOption, Some(Param::Long(name))) => {
                write!(f, "unrecognized option '--{}'", name)?
            }
            (ErrorKind::UnrecognizedOption, Some(Param::Short(c))) => {
                write!(f, "invalid option -- {}", c)?
            }
            (ErrorKind::UnrecognizedOption, None) => write!(f, "unrecognized option")?,
            (ErrorKind::MissingArgument, Some(Param::Long(name))) => {
                write!(f, "option '--{}' requires an argument", name)?
            }
            (ErrorKind::MissingArgument, Some(Param::Short(c))) => {
                write!(f, "option requires an argument -- {}", c)?
            }
            (ErrorKind::MissingArgument, None) => write!(f, "option requires an argument")?,
            (ErrorKind::InvalidValue, Some(param)) => write!(f, "invalid value for '{}'", param)?,
            (ErrorKind::InvalidValue, None) => write!(f, "invalid value")?,
            (ErrorKind::InvalidUnicode, _) => write!(f, "argument is invalid unicode")?,
            (ErrorKind::Custom, _) => write!(f, "{}", self.value().unwrap_or_default())?,
        }

        if f.alternate() && matches!(self.kind(), ErrorKind::InvalidUnicode) {
            if let Some(value) = self.raw_value() {
                write!(f, ": {:?}", value)?;
            }
        }

        if f.alternate() && matches!(self.kind(), ErrorKind::InvalidValue) {
            if let Some(value) = self.value() {
                write!(f, ": {:?}", value)?;
            }
            if let Some(ref source) = self.repr.source {
                write!(f, " ({})", source)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind())
            .field("param", &self.param())
            .field("value", &self.value())
            .finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.repr.source {
            Some(ref source) => Some(&**source),
            None => None,
        }
    }
}

/// Classifies an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An option that is neither in the short specification nor in the
    /// long option table.
    UnrecognizedOption,
    /// An option requires an argument but none was given.
    MissingArgument,
    /// Parsing an option argument into another type failed.
    ///
    /// The failed value is available via [`Error::value`] and the parse
    /// error is returned from `source()`.
    InvalidValue,
    /// A command line argument is not valid unicode.
    ///
    /// The argument is available via [`Error::raw_value`].
    InvalidUnicode,
    /// A custom message.
    Custom,
}
