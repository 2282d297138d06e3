/// Core error type.
///
/// Adapter crates should map their specific errors into this type so the bot
/// core can handle failures consistently (fatal config problem vs a remote
/// send that the caller may choose to ignore).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("remote error: {0}")]
    Remote(String),
}

impl Error {
    /// Whether this looks like a temporary network failure that can safely be
    /// ignored by a logging caller (the remote copy of the log is lost, the
    /// process keeps running).
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Remote(msg) => {
                const TEMP_MARKERS: [&str; 5] = [
                    "ENETUNREACH",
                    "ENETDOWN",
                    "ENOTFOUND",
                    "ETIMEDOUT",
                    "ECONNRESET",
                ];
                TEMP_MARKERS.iter().any(|m| msg.contains(m))
                    || [500, 502, 503, 504]
                        .iter()
                        .any(|c| msg.contains(&c.to_string()))
            }
            Error::Io(err) => matches!(
                err.kind(),
                std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
