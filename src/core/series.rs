use itertools::Itertools;

use crate::{
    core::{Price, Quote},
    error::Result,
};

/// Price series as supplied by the provider, in its original order.
#[derive(Clone, Debug, Default, derive_more::Deref, derive_more::IntoIterator)]
pub struct PriceSeries(Vec<Quote>);

impl PriceSeries {
    /// Parse all the timestamps upfront, failing on the first bad one.
    pub fn try_from_pairs<I, S, P>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: AsRef<str>,
        P: Into<Price>,
    {
        pairs
            .into_iter()
            .map(|(timestamp, price)| Quote::try_parse(timestamp.as_ref(), price))
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    /// Minimum, mean, and maximum price, or [`None`] for an empty series.
    #[must_use]
    pub fn summary(&self) -> Option<Summary> {
        let (min, max) = self
            .iter()
            .map(|quote| quote.price)
            .minmax_by_key(|price| price.ordered())
            .into_option()?;
        #[expect(clippy::cast_precision_loss)]
        let mean = self.iter().map(|quote| quote.price.0).sum::<f64>() / self.len() as f64;
        Some(Summary { min, mean: Price(mean), max })
    }
}

impl From<Vec<Quote>> for PriceSeries {
    fn from(quotes: Vec<Quote>) -> Self {
        Self(quotes)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize)]
pub struct Summary {
    pub min: Price,
    pub mean: Price,
    pub max: Price,
}
