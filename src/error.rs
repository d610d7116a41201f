use thiserror::Error;

/// Errors raised while reading a corpus or writing the report.
#[derive(Debug, Error)]
pub enum Error {
    /// The report sink or an input stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input has no header row at all.
    #[error("missing header row")]
    MissingHeader,

    /// The header row lacks one of the required columns.
    #[error("missing column `{name}` in header")]
    MissingColumn {
        /// Name of the column that was looked for.
        name: &'static str,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = Error::MissingColumn { name: "tag" };
        assert_eq!(err.to_string(), "missing column `tag` in header");
        assert_eq!(Error::MissingHeader.to_string(), "missing header row");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
