pub use crate::types::SubEnumError;

pub type Result<T> = std::result::Result<T, SubEnumError>;

/// Attach a description of what was being attempted to an I/O failure.
pub trait ErrorContext<T> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| SubEnumError::io(f(), e))
    }
}
