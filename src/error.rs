use std::fmt;

/// Errors surfaced by cage operations.
///
/// Every variant is a programmer or configuration error, not a data error:
/// a missing key on a `get*` read, an accessor name nothing recognizes, an
/// auto-filter rule naming an operation the catalog does not know, or
/// arguments an accessor cannot use. Input failing a validator is *not* an
/// error; `test*` accessors report that as a plain `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `get*` read addressed a path that did not resolve.
    ///
    /// Distinct from "value is falsy": the key is simply not there, which
    /// callers should treat as a contract bug and fail loud.
    KeyNotFound {
        /// The path expression that did not resolve.
        path: String,
    },
    /// An accessor name matched neither the built-in catalog nor the
    /// registered custom list.
    UnknownAccessor {
        /// The unrecognized accessor name.
        name: String,
    },
    /// An auto-filter rule named an operation the filter catalog does not
    /// recognize. Fatal at construction time: silently skipping it would
    /// mask a sanitization gap.
    UnknownOperation {
        /// The unrecognized operation name.
        name: String,
    },
    /// A dynamically dispatched accessor received arguments it could not
    /// decode (wrong count or wrong type).
    InvalidArguments {
        /// The accessor whose arguments were malformed.
        accessor: String,
    },
}

impl Error {
    pub(crate) fn key_not_found(path: &str) -> Self {
        Error::KeyNotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn unknown_accessor(name: &str) -> Self {
        Error::UnknownAccessor {
            name: name.to_string(),
        }
    }

    pub(crate) fn unknown_operation(name: &str) -> Self {
        Error::UnknownOperation {
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid_arguments(accessor: &str) -> Self {
        Error::InvalidArguments {
            accessor: accessor.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotFound { path } => write!(f, "key not found: '{}'", path),
            Error::UnknownAccessor { name } => write!(f, "unknown accessor: '{}'", name),
            Error::UnknownOperation { name } => {
                write!(f, "unknown auto-filter operation: '{}'", name)
            }
            Error::InvalidArguments { accessor } => {
                write!(f, "invalid arguments for accessor '{}'", accessor)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_offending_name() {
        let err = Error::key_not_found("x/woot/nope");
        assert_eq!(format!("{}", err), "key not found: 'x/woot/nope'");

        let err = Error::unknown_accessor("getBogus");
        assert!(format!("{}", err).contains("getBogus"));

        let err = Error::unknown_operation("frobnicate");
        assert!(format!("{}", err).contains("frobnicate"));

        let err = Error::invalid_arguments("testGreaterThan");
        assert!(format!("{}", err).contains("testGreaterThan"));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        assert_std_error(&Error::key_not_found("k"));
    }
}
