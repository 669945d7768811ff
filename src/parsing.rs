use std::{io::{self, BufRead, Read}, fs::File, path::Path};

use log::{debug, info};

use crate::{cards::{parse_record, Card}, error::{Error, Result}, stats::rank};

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|source| Error::SourceUnavailable { path: path.to_path_buf(), source })
}

/// Loads the catalog at `path`, ranked by price then name.
/// A single bad row fails the whole load.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let cards = read_catalog(open(path)?)
        .map_err(|e| unreadable(path, e))?;
    info!("loaded {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Parses catalog rows from any reader. The first row is a header and is skipped.
pub fn read_catalog<R: Read>(source: R) -> Result<Vec<Card>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut cards = vec![];
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let fields: Vec<&str> = record.iter().collect();
        cards.push(parse_record(fields.as_slice(), line)?);
    }

    rank(&mut cards);
    Ok(cards)
}

/// A source that opened but cannot be read, such as a directory, is as
/// unavailable as one that is missing.
fn unreadable(path: &Path, err: Error) -> Error {
    match err {
        Error::Io(source) => Error::SourceUnavailable { path: path.to_path_buf(), source },
        other => other,
    }
}

fn csv_error(err: csv::Error) -> Error {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        _ => Error::MalformedRecord { line, reason },
    }
}

/// Reads the identifiers of a decklist file, one per line.
pub fn read_decklist_ids<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = open(path.as_ref())?;
    let ids = read_ids(io::BufReader::new(file))
        .map_err(|e| unreadable(path.as_ref(), e))?;
    debug!("read {} ids from {}", ids.len(), path.as_ref().display());
    Ok(ids)
}

/// Surrounding whitespace is dropped and blank lines are skipped.
pub fn read_ids<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut ids = vec![];
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[test]
fn header_skipped_and_ranked() {
    let data = "id,name,type,desc,race,archetype,card price\n\
        1,Zeta,Spell Card,,Normal,,5.00\n\
        2,Mid,Trap Card,,Normal,,10.00\n\
        3,Alpha,Spell Card,,Normal,,5.00\n";
    let cards = read_catalog(data.as_bytes()).unwrap();

    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta", "Mid"]);
}

#[test]
fn quoted_fields_keep_commas() {
    let data = "id,name,type,desc,race,archetype,card price\n\
        1,\"Dark Magician, the Legend\",Normal Monster,\"A wizard, strong\",Spellcaster,Dark Magician,0.25\n";
    let cards = read_catalog(data.as_bytes()).unwrap();

    assert_eq!(cards[0].name, "Dark Magician, the Legend");
    assert_eq!(cards[0].description, "A wizard, strong");
}

#[test]
fn header_only_is_empty() {
    let cards = read_catalog("id,name,type,desc,race,archetype,card price\n".as_bytes()).unwrap();

    assert!(cards.is_empty());
}

#[test]
fn bad_row_aborts_load() {
    let data = "id,name,type,desc,race,archetype,card price\n\
        1,Fine,Spell Card,,Normal,,1.00\n\
        2,Broken,Spell Card,,Normal,,cheap\n";
    let result = read_catalog(data.as_bytes());

    assert!(matches!(result, Err(Error::MalformedRecord { line: 3, .. })), "{:?}", result);
}

#[test]
fn short_row_aborts_load() {
    let data = "id,name,type,desc,race,archetype,card price\n1,Short,Spell Card\n";
    let result = read_catalog(data.as_bytes());

    assert!(matches!(result, Err(Error::MalformedRecord { .. })));
}

#[test]
fn nonexistent() {
    let result = load_catalog("test_files/nonexistent.csv");

    assert!(matches!(result, Err(Error::SourceUnavailable { .. })), "The nonexistent catalog exists");
}

#[test]
fn negative_zero_ties_with_zero() {
    let data = "id,name,type,desc,race,archetype,card price\n\
        1,Zeta,Spell Card,,Normal,,-0\n\
        2,Alpha,Spell Card,,Normal,,0\n";
    let cards = read_catalog(data.as_bytes()).unwrap();

    let names: Vec<_> = cards.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
    assert_eq!(cards[1].price_text(), "0.00");
}

#[test]
fn directory_is_unavailable() {
    let catalog = load_catalog("test_files");
    let ids = read_decklist_ids("test_files");

    assert!(matches!(catalog, Err(Error::SourceUnavailable { .. })), "{:?}", catalog);
    assert!(matches!(ids, Err(Error::SourceUnavailable { .. })), "{:?}", ids);
}

#[test]
fn ids_trimmed() {
    let ids = read_ids("  46986414 \n\n#main\n89631139\r\n".as_bytes()).unwrap();

    assert_eq!(ids, vec!["46986414", "#main", "89631139"]);
}
