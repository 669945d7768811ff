use std::io::Write;

pub mod cards;
pub mod config;
pub mod display;
pub mod error;
pub mod menu;
pub mod parsing;
pub mod query;
pub mod stats;

pub use cards::{parse_record, Card};
pub use config::{get_config, Config};
pub use error::{Error, Result};
pub use parsing::{load_catalog, read_decklist_ids};
pub use query::{filter_by_field, resolve_by_ids, FieldTag};
pub use stats::{compute_stats, rank, Stats};

use display::{write_report, Format};

/// Prints a result set with its statistics, or just the empty set when nothing matched.
pub fn report<W: Write>(out: &mut W, format: Format, cards: &[Card]) -> Result<()> {
    let stats = if cards.is_empty() {
        None
    } else {
        Some(compute_stats(cards)?)
    };
    write_report(out, format, cards, stats.as_ref())?;
    Ok(())
}
