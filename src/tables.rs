use cheapest_hours::{Price, Quote, Snapshot, Summary};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// One row per count: the chosen hours and their average price.
#[must_use]
pub fn build_snapshot_table(
    snapshot: &Snapshot,
    counts: &[usize],
    summary: Option<Summary>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hours", "Start times", "Average"]);
    let rows = counts.iter().filter_map(|count| Some((count, snapshot.get(*count).ok()?)));
    for (count, hours) in rows {
        let average = average_price(hours);
        table.add_row(vec![
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(hours.iter().map(|quote| quote.time.format("%a %H:%M")).join(", ")),
            Cell::new(average.map_or_else(String::new, |price| price.to_string()))
                .set_alignment(CellAlignment::Right)
                .fg(price_color(average, summary)),
        ]);
    }
    table
}

#[must_use]
pub fn build_hours_table(hours: &[Quote], summary: Option<Summary>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Start", "Price"]);
    for quote in hours {
        table.add_row(vec![
            Cell::new(quote.time.format("%Y-%m-%d %H:%M %:z")),
            Cell::new(quote.price)
                .set_alignment(CellAlignment::Right)
                .fg(price_color(Some(quote.price), summary)),
        ]);
    }
    table
}

#[must_use]
pub fn build_summary_table(summary: Summary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Min", "Mean", "Max"]);
    table.add_row(vec![
        Cell::new(summary.min).fg(Color::Green),
        Cell::new(summary.mean).add_attribute(Attribute::Dim),
        Cell::new(summary.max).fg(Color::Red),
    ]);
    table
}

#[expect(clippy::cast_precision_loss)]
fn average_price(hours: &[Quote]) -> Option<Price> {
    (!hours.is_empty())
        .then(|| Price(hours.iter().map(|quote| quote.price.0).sum::<f64>() / hours.len() as f64))
}

fn price_color(price: Option<Price>, summary: Option<Summary>) -> Color {
    match (price, summary) {
        (Some(price), Some(summary)) if price.ordered() <= summary.mean.ordered() => Color::Green,
        (Some(_), Some(_)) => Color::Red,
        _ => Color::Reset,
    }
}
