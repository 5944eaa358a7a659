use chrono::ParseError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid timestamp `{timestamp}`")]
    InvalidTimestamp {
        timestamp: String,

        #[source]
        source: ParseError,
    },

    #[error("the number of hours must be positive")]
    InvalidCount,

    #[error("{count} hours is out of the cached range 1..={max}")]
    OutOfRange { count: usize, max: usize },

    #[error("the cheapest hours have not been calculated yet")]
    NotReady,
}
