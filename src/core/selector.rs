use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, FixedOffset};
use itertools::Itertools;

use crate::{
    core::{PriceSeries, Quote, Recorder, Snapshot, TracingRecorder},
    error::{Error, Result},
    prelude::*,
};

#[derive(bon::Builder)]
pub struct Options {
    /// Largest count to precompute on every recompute.
    #[builder(default = 10)]
    pub max_count: usize,

    #[builder(default = TracingRecorder::shared())]
    pub recorder: Arc<dyn Recorder>,
}

impl Default for Options {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Picks the cheapest hours out of a fixed price series.
pub struct Selector {
    /// Quotes sorted by price. Equal prices keep the series order.
    ranked: Vec<Quote>,

    options: Options,

    /// Latest computed snapshot, replaced as a whole.
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl Selector {
    #[must_use]
    pub fn new(series: PriceSeries) -> Self {
        Self::with_options(series, Options::default())
    }

    #[must_use]
    pub fn with_options(series: PriceSeries, options: Options) -> Self {
        let ranked = series.into_iter().sorted_by_key(|quote| quote.price.ordered()).collect();
        Self { ranked, options, snapshot: RwLock::new(None) }
    }

    #[must_use]
    pub const fn max_count(&self) -> usize {
        self.options.max_count
    }

    /// Find the `count` cheapest hours starting at `since` (inclusive), in chronological order.
    ///
    /// Returns fewer hours when there are not enough eligible quotes.
    pub fn find_cheapest_hours(
        &self,
        count: usize,
        since: Option<DateTime<FixedOffset>>,
    ) -> Result<Vec<Quote>> {
        if count == 0 {
            return Err(Error::InvalidCount);
        }
        Ok(chronological(self.eligible(since).take(count)))
    }

    /// Recompute the cheapest hours for every count up to the maximum and publish the snapshot.
    #[instrument(skip_all, fields(since = %since))]
    pub fn calculate_cheapest_hours(&self, since: DateTime<FixedOffset>) -> Arc<Snapshot> {
        let eligible = self.eligible(Some(since)).collect_vec();
        let hours = (1..=self.options.max_count)
            .map(|count| {
                let hours = chronological(eligible.iter().copied().take(count));
                self.options.recorder.record(since, count, &hours);
                (count, hours)
            })
            .collect();
        let snapshot = Arc::new(Snapshot { since, hours });
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&snapshot));
        debug!(n_eligible = eligible.len(), max_count = self.options.max_count, "calculated");
        snapshot
    }

    /// Latest snapshot, unaffected by later recomputes.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Get the `count` cheapest hours as of the last [`Selector::calculate_cheapest_hours`].
    pub fn get_cheapest_hours(&self, count: usize) -> Result<Vec<Quote>> {
        if !(1..=self.options.max_count).contains(&count) {
            return Err(Error::OutOfRange { count, max: self.options.max_count });
        }
        let snapshot = self.snapshot().ok_or(Error::NotReady)?;
        Ok(snapshot.get(count)?.to_vec())
    }

    fn eligible(&self, since: Option<DateTime<FixedOffset>>) -> impl Iterator<Item = &Quote> {
        self.ranked.iter().filter(move |quote| since.is_none_or(|since| quote.time >= since))
    }
}

fn chronological<'a>(quotes: impl Iterator<Item = &'a Quote>) -> Vec<Quote> {
    quotes.copied().sorted_by_key(|quote| quote.time).collect()
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, thread};

    use super::*;
    use crate::core::{NoopRecorder, Price, fixtures};

    fn time(timestamp: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(timestamp).unwrap()
    }

    fn quiet(series: PriceSeries) -> Selector {
        Selector::with_options(series, Options::builder().recorder(Arc::new(NoopRecorder)).build())
    }

    fn pairs(quotes: &[Quote]) -> Vec<(String, Price)> {
        quotes
            .iter()
            .map(|quote| (quote.time.format("%H:%M").to_string(), quote.price))
            .collect()
    }

    fn expected(hours: &[(&str, f64)]) -> Vec<(String, Price)> {
        hours.iter().map(|(hour, price)| ((*hour).to_string(), Price(*price))).collect()
    }

    #[test]
    fn test_find_cheapest_hours() -> Result<()> {
        let selector = quiet(fixtures::series());
        assert_eq!(pairs(&selector.find_cheapest_hours(1, None)?), expected(&[("03:00", 0.7232)]));
        assert_eq!(
            pairs(&selector.find_cheapest_hours(2, None)?),
            expected(&[("03:00", 0.7232), ("04:00", 0.8054)]),
        );
        assert_eq!(
            pairs(&selector.find_cheapest_hours(3, None)?),
            expected(&[("01:00", 0.8275), ("03:00", 0.7232), ("04:00", 0.8054)]),
        );
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_since() -> Result<()> {
        let selector = quiet(fixtures::series());
        let since = Some(time("2023-01-02T04:00:00+01:00"));
        assert_eq!(pairs(&selector.find_cheapest_hours(1, since)?), expected(&[("04:00", 0.8054)]));
        assert_eq!(
            pairs(&selector.find_cheapest_hours(3, since)?),
            expected(&[("04:00", 0.8054), ("05:00", 1.0925), ("06:00", 1.5349)]),
        );
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_more_than_available() -> Result<()> {
        let selector = quiet(fixtures::series());
        let hours = selector.find_cheapest_hours(100, None)?;
        assert_eq!(hours.len(), 24);
        assert!(hours.is_sorted_by_key(|quote| quote.time));
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_since_after_last_quote() -> Result<()> {
        let selector = quiet(fixtures::series());
        let hours = selector.find_cheapest_hours(5, Some(time("2023-01-03T00:00:01+01:00")))?;
        assert!(hours.is_empty());
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_zero_count() {
        let selector = quiet(fixtures::series());
        assert!(matches!(selector.find_cheapest_hours(0, None), Err(Error::InvalidCount)));
    }

    #[test]
    fn test_find_cheapest_hours_empty_series() -> Result<()> {
        let selector = quiet(PriceSeries::default());
        assert!(selector.find_cheapest_hours(3, None)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_properties() -> Result<()> {
        let selector = quiet(fixtures::series());
        let since = time("2023-01-02T10:00:00+01:00");
        let n_eligible = fixtures::PRICES.len() - 10;
        for count in 1..=30 {
            let hours = selector.find_cheapest_hours(count, Some(since))?;
            assert_eq!(hours.len(), count.min(n_eligible));
            assert!(hours.is_sorted_by_key(|quote| quote.time));
            assert!(hours.iter().all(|quote| quote.time >= since));
            assert_eq!(hours, selector.find_cheapest_hours(count, Some(since))?);

            // Nothing left out is cheaper than anything taken.
            let most_expensive =
                hours.iter().map(|quote| quote.price.ordered()).max().unwrap_or_default();
            let left_out = fixtures::series()
                .into_iter()
                .filter(|quote| quote.time >= since && !hours.contains(quote));
            assert!(left_out.into_iter().all(|quote| quote.price.ordered() >= most_expensive));
        }
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_compares_absolute_time() -> Result<()> {
        // Autumn DST transition in Amsterdam: 02:00+02:00 is followed by 02:00+01:00.
        let series = PriceSeries::try_from_pairs([
            ("2023-10-29T01:00:00+02:00", 0.10),
            ("2023-10-29T02:00:00+02:00", 0.20),
            ("2023-10-29T02:00:00+01:00", 0.05),
            ("2023-10-29T03:00:00+01:00", 0.30),
        ])?;
        let selector = quiet(series);

        let hours = selector.find_cheapest_hours(4, Some(time("2023-10-29T01:30:00+01:00")))?;
        assert_eq!(
            hours.iter().map(|quote| quote.price).collect_vec(),
            [Price(0.05), Price(0.30)],
        );

        let hours = selector.find_cheapest_hours(4, None)?;
        assert_eq!(
            hours.iter().map(|quote| quote.price).collect_vec(),
            [Price(0.10), Price(0.20), Price(0.05), Price(0.30)],
        );
        Ok(())
    }

    #[test]
    fn test_find_cheapest_hours_negative_prices_and_ties() -> Result<()> {
        let series = PriceSeries::try_from_pairs([
            ("2023-05-28T13:00:00+02:00", 0.0),
            ("2023-05-28T12:00:00+02:00", 0.0),
            ("2023-05-28T14:00:00+02:00", -0.05),
            ("2023-05-28T15:00:00+02:00", 0.12),
        ])?;
        let selector = quiet(series);

        let hours = selector.find_cheapest_hours(2, None)?;
        assert_eq!(pairs(&hours), expected(&[("13:00", 0.0), ("14:00", -0.05)]));
        Ok(())
    }

    #[test]
    fn test_calculate_matches_find() -> Result<()> {
        let selector = quiet(fixtures::series());
        let since = time("2023-01-02T04:00:00+01:00");
        let snapshot = selector.calculate_cheapest_hours(since);
        assert_eq!(snapshot.since, since);
        for count in 1..=10 {
            let expected = selector.find_cheapest_hours(count, Some(since))?;
            assert_eq!(selector.get_cheapest_hours(count)?, expected);
            assert_eq!(snapshot.get(count)?, expected.as_slice());
        }
        Ok(())
    }

    #[test]
    fn test_calculate_replaces_snapshot() -> Result<()> {
        let selector = quiet(fixtures::series());
        let first = selector.calculate_cheapest_hours(time("2023-01-02T00:00:00+01:00"));
        selector.calculate_cheapest_hours(time("2023-01-02T04:00:00+01:00"));

        assert_eq!(pairs(&selector.get_cheapest_hours(1)?), expected(&[("04:00", 0.8054)]));
        assert_eq!(pairs(first.get(1)?), expected(&[("03:00", 0.7232)]));
        Ok(())
    }

    #[test]
    fn test_get_cheapest_hours_not_ready() {
        let selector = quiet(fixtures::series());
        assert!(selector.snapshot().is_none());
        assert!(matches!(selector.get_cheapest_hours(1), Err(Error::NotReady)));
    }

    #[test]
    fn test_get_cheapest_hours_out_of_range() {
        let selector = quiet(fixtures::series());
        selector.calculate_cheapest_hours(time("2023-01-02T00:00:00+01:00"));
        assert!(matches!(
            selector.get_cheapest_hours(0),
            Err(Error::OutOfRange { count: 0, max: 10 }),
        ));
        assert!(matches!(
            selector.get_cheapest_hours(11),
            Err(Error::OutOfRange { count: 11, max: 10 }),
        ));
    }

    #[test]
    fn test_custom_max_count() -> Result<()> {
        let selector = Selector::with_options(
            fixtures::series(),
            Options::builder().max_count(24).recorder(Arc::new(NoopRecorder)).build(),
        );
        let snapshot = selector.calculate_cheapest_hours(time("2023-01-02T00:00:00+01:00"));
        assert_eq!(selector.max_count(), 24);
        assert_eq!(snapshot.max_count(), 24);
        assert_eq!(selector.get_cheapest_hours(24)?.len(), 24);
        Ok(())
    }

    #[derive(Default)]
    struct CollectingRecorder(Mutex<Vec<(usize, usize)>>);

    impl Recorder for CollectingRecorder {
        fn record(&self, _since: DateTime<FixedOffset>, count: usize, hours: &[Quote]) {
            self.0.lock().unwrap().push((count, hours.len()));
        }
    }

    #[test]
    fn test_recorder_receives_every_count() {
        let recorder = Arc::new(CollectingRecorder::default());
        let selector = Selector::with_options(
            fixtures::series(),
            Options::builder().recorder(recorder.clone()).build(),
        );
        selector.calculate_cheapest_hours(time("2023-01-02T20:00:00+01:00"));
        assert_eq!(
            *recorder.0.lock().unwrap(),
            [(1, 1), (2, 2), (3, 3), (4, 4), (5, 4), (6, 4), (7, 4), (8, 4), (9, 4), (10, 4)],
        );
    }

    #[test]
    fn test_concurrent_reads_see_whole_snapshots() {
        let selector = quiet(fixtures::series());
        let anchors = [time("2023-01-02T00:00:00+01:00"), time("2023-01-02T04:00:00+01:00")];
        selector.calculate_cheapest_hours(anchors[0]);

        thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..100 {
                    selector.calculate_cheapest_hours(anchors[i % 2]);
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let snapshot = selector.snapshot().unwrap();
                        for count in 1..=10 {
                            let hours = snapshot.get(count).unwrap();
                            assert!(hours.iter().all(|quote| quote.time >= snapshot.since));
                        }
                    }
                });
            }
        });
    }
}
