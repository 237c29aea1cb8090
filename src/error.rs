/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    /// A route declaration is missing its method or path
    MalformedRoute {
        method: String,
        path: String,
        reason: String,
    },
    /// Two declarations resolve to the same path and method
    DuplicateRoute { method: String, path: String },
    /// A module mounts itself, directly or transitively
    CyclicMount { cycle: Vec<String> },
    /// A mount references a module that was never declared
    UnknownModule { name: String, referenced_by: String },
    /// Two manifests declare the same module name
    DuplicateModule(String),
    InvalidArgument(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MalformedRoute {
                method,
                path,
                reason,
            } => write!(f, "malformed route {} '{}': {}", method, path, reason),
            Error::DuplicateRoute { method, path } => {
                write!(f, "duplicate route: {} '{}' is declared more than once", method, path)
            }
            Error::CyclicMount { cycle } => {
                write!(f, "cyclic mount: {}", cycle.join(" -> "))
            }
            Error::UnknownModule {
                name,
                referenced_by,
            } => write!(
                f,
                "module '{}' mounts unknown module '{}'",
                referenced_by, name
            ),
            Error::DuplicateModule(name) => write!(f, "module '{}' is declared twice", name),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
