use std::fmt::{Debug, Formatter};

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{
    core::Price,
    error::{Error, Result},
};

/// One hourly price quote.
#[derive(Clone, Copy, PartialEq, Deserialize, Serialize, derive_more::Constructor)]
pub struct Quote {
    /// Start of the hour, keeping the offset the provider recorded.
    pub time: DateTime<FixedOffset>,

    pub price: Price,
}

impl Debug for Quote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{:?}", self.time.to_rfc3339(), self.price)
    }
}

impl Quote {
    /// Parse the timestamp into an absolute instant.
    ///
    /// Accepts RFC 3339 and its variant with a space instead of `T`.
    pub fn try_parse(timestamp: &str, price: impl Into<Price>) -> Result<Self> {
        let time = if timestamp.as_bytes().get(10) == Some(&b' ') {
            DateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S%.f%:z")
        } else {
            DateTime::parse_from_rfc3339(timestamp)
        };
        let time = time
            .map_err(|source| Error::InvalidTimestamp { timestamp: timestamp.to_owned(), source })?;
        Ok(Self::new(time, price.into()))
    }

    /// Whether the quoted hour covers the instant.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<FixedOffset>) -> bool {
        (self.time <= now) && (now < self.time + TimeDelta::hours(1))
    }
}
