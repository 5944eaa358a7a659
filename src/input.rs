//! Price files: a JSON object or a TOML table mapping timestamps to prices.

use std::{fmt::Debug, fs, path::Path};

use serde::Deserialize;
use serde_with::{DisplayFromStr, Map, PickFirst, serde_as};

use crate::{core::PriceSeries, prelude::*};

/// Entries in the file order. Prices may be numbers or numeric strings.
#[serde_as]
#[derive(Deserialize)]
#[serde(transparent)]
struct PriceFile(#[serde_as(as = "Map<_, PickFirst<(_, DisplayFromStr)>>")] Vec<(String, f64)>);

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_series<P: AsRef<Path> + Debug>(path: P) -> Result<PriceSeries> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).context("failed to read the price file")?;
    let is_toml = path.extension().is_some_and(|extension| extension.eq_ignore_ascii_case("toml"));
    let series = if is_toml { parse_toml(&contents)? } else { parse_json(&contents)? };
    info!(n_quotes = series.len(), "loaded");
    Ok(series)
}

pub fn parse_json(contents: &str) -> Result<PriceSeries> {
    let PriceFile(pairs) =
        serde_json::from_str(contents).context("failed to deserialize the JSON prices")?;
    Ok(PriceSeries::try_from_pairs(pairs)?)
}

pub fn parse_toml(contents: &str) -> Result<PriceSeries> {
    let PriceFile(pairs) = toml::from_str(contents).context("failed to deserialize the TOML prices")?;
    Ok(PriceSeries::try_from_pairs(pairs)?)
}
