use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::{cards::Card, stats::{total_price, Stats}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Table,
    Json,
    Yaml,
}

/// Two decimals with thousands separators, e.g. `1,234.50`.
pub fn format_price(price: f64) -> String {
    let text = format!("{:.2}", price);
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", whole),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, fraction)
}

pub fn write_table<W: Write>(out: &mut W, cards: &[Card]) -> io::Result<()> {
    writeln!(out, "{:<50}{:<30}{:<20}{:<40}{:<12}", "Name", "Type", "Race", "Archetype", "TCGPlayer")?;
    for card in cards {
        writeln!(
            out,
            "{:<50}{:<30}{:<20}{:<40}{:>12}",
            card.name, card.kind, card.race, card.archetype, format_price(card.price),
        )?;
    }
    writeln!(out, "\n{:<50}{:<30}{:<20}{:<40}{:>12}", "Totals", "", "", "", format_price(total_price(cards)))
}

pub fn write_stats<W: Write>(out: &mut W, stats: &Stats) -> io::Result<()> {
    let sections = [
        ("least expensive", stats.min_price, &stats.min),
        ("most expensive", stats.max_price, &stats.max),
        ("median", stats.median_price, &stats.median),
    ];
    for (label, price, cards) in sections {
        writeln!(out, "\nThe price of the {} card(s) is {}", label, format_price(price))?;
        for card in cards {
            writeln!(out, "\t{}", card.name)?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct Report<'a> {
    count: usize,
    total: f64,
    cards: &'a [Card],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<&'a Stats>,
}

/// Writes a result set in the requested format. Stats are omitted for an empty set.
pub fn write_report<W: Write>(out: &mut W, format: Format, cards: &[Card], stats: Option<&Stats>) -> io::Result<()> {
    let report = Report {
        count: cards.len(),
        total: total_price(cards),
        cards,
        stats,
    };
    match format {
        Format::Table => {
            write_table(out, cards)?;
            match stats {
                Some(s) => write_stats(out, s),
                None => Ok(()),
            }
        },
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, &report).map_err(io::Error::from)?;
            writeln!(out)
        },
        Format::Yaml => {
            let text = serde_yaml::to_string(&report)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            out.write_all(text.as_bytes())
        },
    }
}

#[cfg(test)]
fn rendered<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
    let mut buf = vec![];
    f(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn prices_grouped() {
    assert_eq!(format_price(0.0), "0.00");
    assert_eq!(format_price(5.5), "5.50");
    assert_eq!(format_price(999.999), "1,000.00");
    assert_eq!(format_price(1234567.891), "1,234,567.89");
    assert_eq!(format_price(123456.0), "123,456.00");
}

#[test]
fn table_has_totals() {
    let cards = vec![
        Card::new("1", "Pot of Greed", "Spell Card", "", "Normal", "", 1000.0),
        Card::new("2", "Raigeki", "Spell Card", "", "Normal", "", 2.5),
    ];
    let text = rendered(|out| write_table(out, &cards));
    let lines: Vec<_> = text.lines().collect();

    assert!(lines[0].starts_with("Name"));
    assert!(lines[1].starts_with("Pot of Greed"));
    assert!(lines[1].ends_with("    1,000.00"));
    assert_eq!(lines[1].len(), 50 + 30 + 20 + 40 + 12);
    assert!(lines[4].starts_with("Totals"));
    assert!(lines[4].ends_with("1,002.50"));
}

#[test]
fn stats_block() {
    let stats = Stats {
        min_price: 1.0,
        min: vec![Card::new("1", "Cheap", "", "", "", "", 1.0)],
        max_price: 3.0,
        max: vec![Card::new("3", "Pricey", "", "", "", "", 3.0)],
        median_price: 2.0,
        median: vec![Card::new("2", "Middle", "", "", "", "", 2.0)],
    };
    let text = rendered(|out| write_stats(out, &stats));

    assert_eq!(
        text,
        "\nThe price of the least expensive card(s) is 1.00\n\tCheap\n\
         \nThe price of the most expensive card(s) is 3.00\n\tPricey\n\
         \nThe price of the median card(s) is 2.00\n\tMiddle\n"
    );
}

#[test]
fn json_report() {
    let cards = vec![Card::new("1", "Raigeki", "Spell Card", "", "Normal", "", 2.5)];
    let text = rendered(|out| write_report(out, Format::Json, &cards, None));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["count"], 1);
    assert_eq!(value["cards"][0]["type"], "Spell Card");
    assert!(value.get("stats").is_none());
}

#[test]
fn yaml_report() {
    let cards = vec![Card::new("1", "Raigeki", "Spell Card", "", "Normal", "", 2.5)];
    let text = rendered(|out| write_report(out, Format::Yaml, &cards, None));

    assert!(text.contains("name: Raigeki"));
    assert!(text.contains("count: 1"));
}
