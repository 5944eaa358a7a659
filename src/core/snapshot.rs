use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::{
    core::{Price, Quote},
    error::{Error, Result},
};

/// Cheapest hours for every count, computed for a single anchor time.
///
/// Never mutated after construction: a recompute produces a new snapshot.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub since: DateTime<FixedOffset>,

    /// Chronologically sorted cheapest hours, keyed by their count.
    pub hours: BTreeMap<usize, Vec<Quote>>,
}

impl Snapshot {
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.hours.keys().next_back().copied().unwrap_or_default()
    }

    pub fn get(&self, count: usize) -> Result<&[Quote]> {
        self.hours
            .get(&count)
            .map(Vec::as_slice)
            .ok_or(Error::OutOfRange { count, max: self.max_count() })
    }

    /// Summarize the first of the `count` cheapest hours.
    pub fn upcoming(&self, count: usize, now: DateTime<FixedOffset>) -> Result<Option<Upcoming>> {
        Ok(self.get(count)?.first().map(|quote| Upcoming {
            start: quote.time,
            price: quote.price,
            is_active: quote.is_active_at(now),
        }))
    }
}

/// Next hour of a cheapest-hours block.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Upcoming {
    pub start: DateTime<FixedOffset>,
    pub price: Price,

    /// Whether the hour is running right now.
    pub is_active: bool,
}
