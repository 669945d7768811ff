use pretty_assertions::assert_eq;
use std::io::Write;

use ygodata::{
    compute_stats, filter_by_field, load_catalog, read_decklist_ids, resolve_by_ids,
    Card, Error, FieldTag,
};

fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn catalog_loads_ranked() {
    let cards = load_catalog("test_files/cards.csv").unwrap();

    assert_eq!(cards.len(), 10);
    assert_eq!(
        names(&cards),
        vec![
            "Summoned Skull",
            "Monster Reborn",
            "Raigeki",
            "Dark Magician",
            "Pot of Greed",
            "Mirror Force",
            "Blue-Eyes White Dragon",
            "Dark Magician Girl",
            "Exodia the Forbidden One",
            "Ash Blossom & Joyous Spring, the Extremely Lo",
        ]
    );
}

#[test]
fn catalog_stats() {
    let cards = load_catalog("test_files/cards.csv").unwrap();
    let stats = compute_stats(&cards).unwrap();

    assert_eq!(stats.min_price, 0.25);
    assert_eq!(names(&stats.min), vec!["Summoned Skull"]);
    assert_eq!(stats.max_price, 1234.0);
    assert_eq!(stats.max.len(), 1);
    assert_eq!(stats.median_price, 2.10);
    assert_eq!(names(&stats.median), vec!["Mirror Force"]);
}

#[test]
fn prefix_stats() {
    let cards = load_catalog("test_files/cards.csv").unwrap();
    let stats = compute_stats(&cards[..5]).unwrap();

    assert_eq!(stats.max_price, 1.25);
    assert_eq!(names(&stats.max), vec!["Dark Magician", "Pot of Greed"]);
    assert_eq!(stats.median_price, 0.89);
    assert_eq!(names(&stats.median), vec!["Monster Reborn", "Raigeki"]);
}

#[test]
fn search_archetype() {
    let cards = load_catalog("test_files/cards.csv").unwrap();
    let found = filter_by_field(&cards, "Dark Magician", FieldTag::Archetype);

    assert_eq!(names(&found), vec!["Dark Magician", "Dark Magician Girl"]);

    let stats = compute_stats(&found).unwrap();
    assert_eq!(stats.median_price, 12.0);
}

#[test]
fn search_price_text() {
    let cards = load_catalog("test_files/cards.csv").unwrap();
    let found = filter_by_field(&cards, "1.25", FieldTag::Price);

    assert_eq!(names(&found), vec!["Dark Magician", "Pot of Greed"]);
}

#[test]
fn search_type_case_sensitive() {
    let cards = load_catalog("test_files/cards.csv").unwrap();

    assert_eq!(filter_by_field(&cards, "Spell", FieldTag::Type).len(), 3);
    assert!(filter_by_field(&cards, "spell", FieldTag::Type).is_empty());
}

#[test]
fn decklist_resolves() {
    let cards = load_catalog("test_files/cards.csv").unwrap();
    let ids = read_decklist_ids("test_files/deck.ydk").unwrap();
    let deck = resolve_by_ids(&cards, ids.as_slice());

    assert_eq!(names(&deck), vec!["Raigeki", "Dark Magician", "Dark Magician", "Dark Magician Girl"]);

    let stats = compute_stats(&deck).unwrap();
    assert_eq!(names(&stats.min), vec!["Raigeki"]);
    assert_eq!(names(&stats.max), vec!["Dark Magician Girl"]);
    assert_eq!(stats.median_price, 1.25);
    assert_eq!(names(&stats.median), vec!["Dark Magician", "Dark Magician"]);
}

#[test]
fn malformed_price_aborts() {
    let result = load_catalog("test_files/bad_price.csv");

    assert!(matches!(result, Err(Error::MalformedRecord { line: 3, .. })), "{:?}", result);
}

#[test]
fn missing_decklist() {
    let result = read_decklist_ids("test_files/missing.ydk");

    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
}

#[test]
fn catalog_from_temp_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "id,name,type,desc,race,archetype,price").unwrap();
    writeln!(file, "A,Zeta,Spell Card,,Normal,,5.00").unwrap();
    writeln!(file, "B,Alpha,Spell Card,,Normal,,5.00").unwrap();
    writeln!(file, "C,Mid,Trap Card,,Normal,,10.00").unwrap();
    file.flush().unwrap();

    let cards = load_catalog(file.path()).unwrap();
    let stats = compute_stats(&cards).unwrap();

    assert_eq!(names(&cards), vec!["Alpha", "Zeta", "Mid"]);
    assert_eq!(names(&stats.min), vec!["Alpha", "Zeta"]);
    assert_eq!(names(&stats.max), vec!["Mid"]);
    assert_eq!(stats.median_price, 5.0);
    assert_eq!(names(&stats.median), vec!["Alpha", "Zeta"]);
}
