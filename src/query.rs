use std::{borrow::Cow, fmt, str::FromStr};

use itertools::Itertools;
use log::debug;

use crate::{cards::Card, error::Error, stats::ranked};

/// Card attribute a search can be run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    Id,
    Name,
    Type,
    Description,
    Race,
    Archetype,
    Price,
}

impl FieldTag {
    pub const ALL: [FieldTag; 7] = [
        FieldTag::Id,
        FieldTag::Name,
        FieldTag::Type,
        FieldTag::Description,
        FieldTag::Race,
        FieldTag::Archetype,
        FieldTag::Price,
    ];

    /// The token users type to pick this field.
    pub fn token(&self) -> &'static str {
        match self {
            FieldTag::Id => "id",
            FieldTag::Name => "name",
            FieldTag::Type => "type",
            FieldTag::Description => "desc",
            FieldTag::Race => "race",
            FieldTag::Archetype => "archetype",
            FieldTag::Price => "card price",
        }
    }

    pub fn value<'a>(&self, card: &'a Card) -> Cow<'a, str> {
        match self {
            FieldTag::Id => Cow::Borrowed(&card.id),
            FieldTag::Name => Cow::Borrowed(&card.name),
            FieldTag::Type => Cow::Borrowed(&card.kind),
            FieldTag::Description => Cow::Borrowed(&card.description),
            FieldTag::Race => Cow::Borrowed(&card.race),
            FieldTag::Archetype => Cow::Borrowed(&card.archetype),
            FieldTag::Price => Cow::Owned(card.price_text()),
        }
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FieldTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        FieldTag::ALL.into_iter()
            .find(|f| f.token() == token)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Cards whose `field` contains `query`, case-sensitively, ranked.
pub fn filter_by_field(catalog: &[Card], query: &str, field: FieldTag) -> Vec<Card> {
    let matches = ranked(
        catalog.iter()
            .filter(|c| field.value(c).contains(query))
            .cloned()
    );
    debug!("{} cards match '{}' in {}", matches.len(), query, field);
    matches
}

/// Every catalog card whose id equals one of `ids`, ranked.
///
/// Each occurrence of an id contributes all of its matches again, so a deck
/// holding three copies of a card lists it three times. Unknown ids contribute
/// nothing.
pub fn resolve_by_ids<S: AsRef<str>>(catalog: &[Card], ids: &[S]) -> Vec<Card> {
    let by_id = catalog.iter()
        .into_group_map_by(|c| c.id.as_str());

    let mut deck = vec![];
    for id in ids {
        match by_id.get(id.as_ref()) {
            Some(cards) => deck.extend(cards.iter().map(|&c| c.clone())),
            None => debug!("id {} is not in the catalog", id.as_ref()),
        }
    }
    ranked(deck)
}

#[cfg(test)]
fn catalog() -> Vec<Card> {
    vec![
        Card::new("A", "Zeta", "Spell Card", "", "Normal", "", 5.0),
        Card::new("B", "Alpha", "Spell Card", "", "Normal", "", 5.0),
        Card::new("C", "Mid", "Trap Card", "", "Continuous", "Mid", 10.0),
    ]
}

#[cfg(test)]
fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn tokens_parse_case_insensitively() {
    assert_eq!("NAME".parse::<FieldTag>().unwrap(), FieldTag::Name);
    assert_eq!("Desc".parse::<FieldTag>().unwrap(), FieldTag::Description);
    assert_eq!(" Card Price ".parse::<FieldTag>().unwrap(), FieldTag::Price);
    for field in FieldTag::ALL {
        assert_eq!(field.token().parse::<FieldTag>().unwrap(), field);
    }
}

#[test]
fn unknown_token_rejected() {
    for token in ["price", "description", "attack", ""] {
        assert!(matches!(token.parse::<FieldTag>(), Err(Error::UnknownField(_))), "{} accepted", token);
    }
}

#[test]
fn substring_is_case_sensitive() {
    let result = filter_by_field(&catalog(), "a", FieldTag::Name);
    assert_eq!(names(&result), vec!["Alpha", "Zeta"]);

    let result = filter_by_field(&catalog(), "A", FieldTag::Name);
    assert_eq!(names(&result), vec!["Alpha"]);
}

#[test]
fn empty_query_matches_all() {
    let result = filter_by_field(&catalog(), "", FieldTag::Archetype);

    assert_eq!(names(&result), vec!["Alpha", "Zeta", "Mid"]);
}

#[test]
fn narrowing_query_narrows_result() {
    let cards = catalog();
    let wide = filter_by_field(&cards, "Card", FieldTag::Type);
    let narrow = filter_by_field(&cards, "Spell Card", FieldTag::Type);

    assert!(narrow.iter().all(|c| wide.contains(c)));
    assert_eq!(names(&narrow), vec!["Alpha", "Zeta"]);
    assert_eq!(wide.len(), 3);
}

#[test]
fn price_searched_as_text() {
    let result = filter_by_field(&catalog(), "10.00", FieldTag::Price);

    assert_eq!(names(&result), vec!["Mid"]);
}

#[test]
fn price_searched_with_thousands_separator() {
    let cards = vec![Card::new("X", "Pricey", "Spell Card", "", "Normal", "", 1234.0)];

    assert_eq!(names(&filter_by_field(&cards, "1,234", FieldTag::Price)), vec!["Pricey"]);
    assert!(filter_by_field(&cards, "1234", FieldTag::Price).is_empty());
}

#[test]
fn input_untouched() {
    let cards = vec![catalog()[2].clone(), catalog()[0].clone()];
    let before = cards.clone();
    let _ = filter_by_field(&cards, "", FieldTag::Id);

    assert_eq!(cards, before);
}

#[test]
fn resolves_exact_ids_ranked() {
    let deck = resolve_by_ids(&catalog(), &["C", "A", "Z", "B"]);

    assert_eq!(names(&deck), vec!["Alpha", "Zeta", "Mid"]);
}

#[test]
fn id_is_not_substring_matched() {
    let deck = resolve_by_ids(&catalog(), &["", "AB"]);

    assert!(deck.is_empty());
}

#[test]
fn repeated_id_repeats_card() {
    let deck = resolve_by_ids(&catalog(), &["C", "C", "C"]);

    assert_eq!(names(&deck), vec!["Mid", "Mid", "Mid"]);
}

#[test]
fn duplicate_catalog_ids_all_included() {
    let mut cards = catalog();
    cards.push(Card::new("A", "Another A", "Spell Card", "", "Normal", "", 1.0));
    let deck = resolve_by_ids(&cards, &["A"]);

    assert_eq!(names(&deck), vec!["Another A", "Zeta"]);
}
