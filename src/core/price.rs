use std::fmt::{Debug, Display, Formatter};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Price of one hour, in whatever unit and currency the provider quotes.
#[derive(
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Price(pub f64);

impl Price {
    /// Total order key: negative prices first, NaN last.
    #[must_use]
    pub const fn ordered(self) -> OrderedFloat<f64> {
        OrderedFloat(self.0)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
