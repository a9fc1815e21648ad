pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("resource exhausted: {0}")]
    Exhausted(String),

    /// Every slot was busy at submission time. An expected outcome, not a
    /// fault: the caller decides whether to retry, drop, or run inline.
    #[error("no free slot")]
    NoFreeSlot,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub fn exhausted<S: Into<String>>(msg: S) -> Self {
        Error::Exhausted(msg.into())
    }
}
