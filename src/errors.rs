use std::io;
use thiserror::Error;

/// Errors returned while encoding, exchanging or resolving a query.
#[derive(Error, Debug)]
pub enum Error {
    /// The name could not be turned into a query (empty label, label or
    /// name too long, invalid IDNA).
    #[error("unable to encode query: {0}")]
    Encoding(String),

    /// The response could not be decoded.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// No reply was received within the read timeout.
    #[error("timed out waiting for a reply")]
    Timeout,

    /// A send or receive failed for some reason other than a timeout.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A UDP socket could not be created. This is never retried.
    #[error("unable to create socket: {0}")]
    Socket(io::Error),

    /// Every nameserver at one level of the delegation failed to reply.
    #[error("no nameserver replied")]
    Exhausted,

    /// A nameserver replied, but with nothing that answers or delegates.
    #[error("no answer found for {0}")]
    NoAnswer(String),

    /// An authoritative server said the name does not exist.
    #[error("{0} does not exist")]
    NxDomain(String),

    /// The delegation chain went deeper than the configured limit.
    #[error("gave up after {0} levels of delegation")]
    TooDeep(usize),

    /// The seed nameserver list could not be loaded.
    #[error("invalid seed nameservers: {0}")]
    Seed(String),
}

impl Error {
    /// Returns true if the error means the resolution cannot continue at all,
    /// as opposed to just this nameserver or delegation level failing.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Socket(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Returns early with a `io::Error` of the given `io::ErrorKind`.
///
/// ```ignore
/// bail!(InvalidData, "label '{}' longer than 63 characters", label);
/// ```
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($arg:tt)*) => {{
        return Err(std::io::Error::new(
            std::io::ErrorKind::$kind,
            format!($($arg)*),
        ))
    }}
}
