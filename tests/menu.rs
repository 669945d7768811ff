use ygodata::{menu::Menu, Config, Error};

fn run_session(input: &str, config: &Config) -> (ygodata::Result<()>, String) {
    let mut menu = Menu::new(input.as_bytes(), vec![], config);
    let result = menu.open_catalog()
        .and_then(|catalog| match catalog {
            Some(cards) => menu.run(&cards),
            None => Ok(()),
        });
    (result, String::from_utf8(menu.into_output()).unwrap())
}

#[test]
fn list_all_shows_prefix_and_full_stats() {
    let config = Config { list_limit: 3, ..Config::default() };
    let (result, out) = run_session("test_files/cards.csv\n1\n4\n", &config);

    assert!(result.is_ok());
    assert!(out.contains("There are 10 cards in the dataset."));
    assert!(out.contains("Raigeki"));
    assert!(!out.contains("Pot of Greed"));
    assert!(out.contains("The price of the most expensive card(s) is 1,234.00"));
    assert!(out.contains("The price of the median card(s) is 2.10\n\tMirror Force"));
}

#[test]
fn missing_catalog_reprompts() {
    let (result, out) = run_session("nope.csv\ntest_files/cards.csv\n4\n", &Config::default());

    assert!(result.is_ok());
    assert_eq!(out.matches("File not Found. Please try again!").count(), 1);
    assert!(out.ends_with("Thanks for your support in Yu-Gi-Oh! TCG\n"));
}

#[test]
fn catalog_prompt_is_bounded() {
    let config = Config { max_attempts: 2, ..Config::default() };
    let (result, out) = run_session("a.csv\nb.csv\ntest_files/cards.csv\n", &config);

    assert!(matches!(result, Err(Error::SourceUnavailable { .. })));
    assert_eq!(out.matches("Enter cards file name: ").count(), 2);
}

#[test]
fn malformed_catalog_not_retried() {
    let (result, out) = run_session("test_files/bad_price.csv\ntest_files/cards.csv\n", &Config::default());

    assert!(matches!(result, Err(Error::MalformedRecord { .. })));
    assert!(!out.contains("Please try again"));
}

#[test]
fn decklist_option() {
    let (result, out) = run_session("test_files/cards.csv\n3\nmissing.ydk\ntest_files/deck.ydk\n4\n", &Config::default());

    assert!(result.is_ok());
    assert!(out.contains("File not Found. Please try again!"));
    assert!(out.contains("Search results"));
    assert!(out.contains("The price of the least expensive card(s) is 0.89\n\tRaigeki"));
    assert!(out.contains("The price of the median card(s) is 1.25\n\tDark Magician\n\tDark Magician\n"));
}

#[test]
fn search_option() {
    let (result, out) = run_session("test_files/cards.csv\n2\nDark\n  Name \n4\n", &Config::default());

    assert!(result.is_ok());
    assert!(out.contains("There are 2 cards with 'Dark' in the 'name' category."));
}

#[test]
fn directory_reprompts() {
    let (result, out) = run_session("test_files/cards.csv\n3\ntest_files\ntest_files/deck.ydk\n4\n", &Config::default());

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(out.matches("File not Found. Please try again!").count(), 1);
    assert!(out.contains("The price of the least expensive card(s) is 0.89\n\tRaigeki"));
}
