use std::cmp::Ordering;

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::{cards::Card, error::{Error, Result}};

/// Price ascending, name ascending on ties.
pub fn ranking(a: &Card, b: &Card) -> Ordering {
    a.price.total_cmp(&b.price)
        .then_with(|| a.name.cmp(&b.name))
}

pub fn rank(cards: &mut [Card]) {
    cards.sort_by(ranking);
}

pub fn ranked<I: IntoIterator<Item = Card>>(cards: I) -> Vec<Card> {
    cards.into_iter()
        .sorted_by(ranking)
        .collect()
}

pub fn total_price(cards: &[Card]) -> f64 {
    cards.iter().map(|c| c.price).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub min_price: f64,
    pub min: Vec<Card>,
    pub max_price: f64,
    pub max: Vec<Card>,
    pub median_price: f64,
    pub median: Vec<Card>,
}

/// Cheapest, most expensive and median cards, every tie included.
///
/// The median is positional: the price of the card at index `n / 2` once the
/// records are ranked. Its set keeps the order of `records`, while the min and
/// max sets are sorted by name.
pub fn compute_stats(records: &[Card]) -> Result<Stats> {
    let (min_price, max_price) = match records.iter().map(|c| c.price).minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => return Err(Error::EmptyInput),
        MinMaxResult::OneElement(p) => (p, p),
        MinMaxResult::MinMax(min, max) => (min, max),
    };

    let sorted = ranked(records.iter().cloned());
    let median_price = sorted[sorted.len() / 2].price;

    let priced_at = |price: f64| -> Vec<Card> {
        records.iter()
            .filter(|c| c.price.total_cmp(&price).is_eq())
            .cloned()
            .collect()
    };
    let by_name = |cards: Vec<Card>| -> Vec<Card> {
        cards.into_iter()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect()
    };

    Ok(Stats {
        min_price,
        min: by_name(priced_at(min_price)),
        max_price,
        max: by_name(priced_at(max_price)),
        median_price,
        median: priced_at(median_price),
    })
}

#[cfg(test)]
fn sample() -> Vec<Card> {
    vec![
        Card::new("A", "Zeta", "Spell Card", "", "Normal", "", 5.0),
        Card::new("B", "Alpha", "Spell Card", "", "Normal", "", 5.0),
        Card::new("C", "Mid", "Trap Card", "", "Normal", "", 10.0),
    ]
}

#[cfg(test)]
fn names(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn ranks_by_price_then_name() {
    let cards = ranked(sample());

    assert_eq!(names(&cards), vec!["Alpha", "Zeta", "Mid"]);
}

#[test]
fn ranking_is_idempotent() {
    let once = ranked(sample());
    let mut twice = once.clone();
    rank(&mut twice);

    assert_eq!(once, twice);
}

#[test]
fn stats_of_sample() {
    let stats = compute_stats(&sample()).unwrap();

    assert_eq!(stats.min_price, 5.0);
    assert_eq!(names(&stats.min), vec!["Alpha", "Zeta"]);
    assert_eq!(stats.max_price, 10.0);
    assert_eq!(names(&stats.max), vec!["Mid"]);
    assert_eq!(stats.median_price, 5.0);
    // input order, not name order
    assert_eq!(names(&stats.median), vec!["Zeta", "Alpha"]);
}

#[test]
fn median_is_positional() {
    // ranked prices: 1, 1, 1, 9 -> index 2 is 1, not the arithmetic median
    let cards = vec![
        Card::new("1", "a", "", "", "", "", 1.0),
        Card::new("2", "b", "", "", "", "", 1.0),
        Card::new("3", "c", "", "", "", "", 1.0),
        Card::new("4", "d", "", "", "", "", 9.0),
    ];
    let stats = compute_stats(&cards).unwrap();

    assert_eq!(stats.median_price, 1.0);
    assert_eq!(stats.median.len(), 3);
}

#[test]
fn median_of_unsorted_input_uses_ranked_position() {
    let cards = vec![
        Card::new("1", "c", "", "", "", "", 30.0),
        Card::new("2", "a", "", "", "", "", 10.0),
        Card::new("3", "b", "", "", "", "", 20.0),
    ];
    let stats = compute_stats(&cards).unwrap();

    assert_eq!(stats.median_price, 20.0);
    assert_eq!(names(&stats.median), vec!["b"]);
}

#[test]
fn single_record() {
    let cards = vec![Card::new("1", "Solo", "", "", "", "", 2.5)];
    let stats = compute_stats(&cards).unwrap();

    assert_eq!((stats.min_price, stats.max_price, stats.median_price), (2.5, 2.5, 2.5));
    assert_eq!(names(&stats.min), vec!["Solo"]);
    assert_eq!(names(&stats.max), vec!["Solo"]);
    assert_eq!(names(&stats.median), vec!["Solo"]);
}

#[test]
fn prices_within_bounds() {
    let cards = vec![
        Card::new("1", "a", "", "", "", "", 0.1),
        Card::new("2", "b", "", "", "", "", 99.0),
        Card::new("3", "c", "", "", "", "", 4.2),
        Card::new("4", "d", "", "", "", "", 0.0),
    ];
    let stats = compute_stats(&cards).unwrap();

    assert!(cards.iter().all(|c| stats.min_price <= c.price && c.price <= stats.max_price));
    assert_eq!(stats.median_price, ranked(cards.clone())[2].price);
}

#[test]
fn empty_input_rejected() {
    assert!(matches!(compute_stats(&[]), Err(Error::EmptyInput)));
}

#[test]
fn totals() {
    assert_eq!(total_price(&sample()), 20.0);
    assert_eq!(total_price(&[]), 0.0);
}

#[test]
fn tie_sets_agree_with_bounds() {
    let cards = vec![
        Card::new("1", "pos", "", "", "", "", 0.0),
        Card::new("2", "neg", "", "", "", "", -0.0),
    ];
    let stats = compute_stats(&cards).unwrap();

    assert!(stats.min.iter().all(|c| c.price.total_cmp(&stats.min_price).is_eq()));
    assert!(stats.max.iter().all(|c| c.price.total_cmp(&stats.max_price).is_eq()));
    assert_eq!(stats.min.len() + stats.max.len(), 2);
}
