use serde::Serialize;

use crate::{display::format_price, error::{Error, Result}};

/// Names longer than this are cut when a record is parsed.
pub const NAME_LIMIT: usize = 45;

/// Number of columns a catalog row must carry.
pub const FIELD_COUNT: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub race: String,
    pub archetype: String,
    pub price: f64,
}

impl Card {
    pub fn new(
        id: &str,
        name: &str,
        kind: &str,
        description: &str,
        race: &str,
        archetype: &str,
        price: f64,
    ) -> Card {
        Card {
            id: id.to_string(),
            name: truncate_name(name),
            kind: kind.to_string(),
            description: description.to_string(),
            race: race.to_string(),
            archetype: archetype.to_string(),
            price,
        }
    }

    /// Price as it is shown in listings, which is also what a price search matches against.
    pub fn price_text(&self) -> String {
        format_price(self.price)
    }
}

/// Builds a card from one catalog row. Columns past the seventh are ignored.
pub fn parse_record<S: AsRef<str>>(fields: &[S], line: u64) -> Result<Card> {
    if fields.len() < FIELD_COUNT {
        return Err(Error::MalformedRecord {
            line,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }
    let field = |i: usize| fields[i].as_ref().to_string();

    Ok(Card {
        id: field(0),
        name: truncate_name(fields[1].as_ref()),
        kind: field(2),
        description: field(3),
        race: field(4),
        archetype: field(5),
        price: parse_price(fields[6].as_ref(), line)?,
    })
}

fn parse_price(text: &str, line: u64) -> Result<f64> {
    let price: f64 = text.trim().parse()
        .map_err(|_| Error::MalformedRecord {
            line,
            reason: format!("price '{}' is not a number", text),
        })?;
    if !price.is_finite() || price < 0.0 {
        return Err(Error::MalformedRecord {
            line,
            reason: format!("price '{}' must be a non-negative number", text),
        });
    }
    // -0 would otherwise rank below 0 and print as -0.00
    Ok(price + 0.0)
}

fn truncate_name(name: &str) -> String {
    name.chars().take(NAME_LIMIT).collect()
}

#[test]
fn parses_full_row() {
    let card = parse_record(&["89631139", "Blue-Eyes White Dragon", "Normal Monster",
        "This legendary dragon...", "Dragon", "Blue-Eyes", "3.49"], 2).unwrap();

    assert_eq!(card.id, "89631139");
    assert_eq!(card.name, "Blue-Eyes White Dragon");
    assert_eq!(card.kind, "Normal Monster");
    assert_eq!(card.description, "This legendary dragon...");
    assert_eq!(card.race, "Dragon");
    assert_eq!(card.archetype, "Blue-Eyes");
    assert_eq!(card.price, 3.49);
}

#[test]
fn truncates_long_names() {
    let long = "A".repeat(60);
    let card = parse_record(&["1", long.as_str(), "t", "d", "r", "a", "1"], 2).unwrap();

    assert_eq!(card.name.chars().count(), NAME_LIMIT);
}

#[test]
fn truncates_by_character_not_byte() {
    let long = "é".repeat(50);
    let card = parse_record(&["1", long.as_str(), "t", "d", "r", "a", "1"], 2).unwrap();

    assert_eq!(card.name, "é".repeat(NAME_LIMIT));
}

#[test]
fn extra_columns_ignored() {
    let card = parse_record(&["1", "n", "t", "d", "r", "a", "0.5", "extra"], 2).unwrap();

    assert_eq!(card.price, 0.5);
}

#[test]
fn short_row_rejected() {
    let result = parse_record(&["1", "n", "t", "d", "r", "a"], 7);

    assert!(matches!(result, Err(Error::MalformedRecord { line: 7, .. })));
}

#[test]
fn bad_price_rejected() {
    for price in ["abc", "", "$1.00", "-2.00", "NaN", "inf"] {
        let result = parse_record(&["1", "n", "t", "d", "r", "a", price], 3);
        assert!(matches!(result, Err(Error::MalformedRecord { .. })), "price {:?} accepted", price);
    }
}

#[test]
fn price_text_has_two_decimals() {
    let card = Card::new("1", "n", "t", "", "r", "a", 1234.5);

    assert_eq!(card.price_text(), "1,234.50");
}

#[test]
fn negative_zero_price_is_zero() {
    for price in ["-0", "-0.00"] {
        let card = parse_record(&["1", "n", "t", "d", "r", "a", price], 2).unwrap();
        assert!(card.price.is_sign_positive(), "price {:?} kept its sign", price);
        assert_eq!(card.price_text(), "0.00");
    }
}

#[test]
fn new_keeps_description() {
    let card = Card::new("1", "n", "t", "Draw 2 cards.", "r", "a", 1.0);

    assert_eq!(card.description, "Draw 2 cards.");
}
