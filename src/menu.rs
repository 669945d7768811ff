use std::{io::{BufRead, Write}, path::Path};

use log::{debug, warn};

use crate::{
    cards::Card,
    config::Config,
    display::{write_stats, write_table},
    error::{Error, Result},
    parsing::{load_catalog, read_decklist_ids},
    query::{filter_by_field, resolve_by_ids, FieldTag},
    stats::compute_stats,
};

const MENU: &str = "\nYu-Gi-Oh! Card Data Analysis\
    \n1) Check All Cards\
    \n2) Search Cards\
    \n3) View Decklist\
    \n4) Exit\
    \nEnter option: ";

enum Action {
    ListAll,
    Search,
    Decklist,
    Exit,
}

/// The interactive prompt loop. Reaching the end of `input` behaves like choosing exit.
pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    config: &'a Config,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(input: R, output: W, config: &'a Config) -> Menu<'a, R, W> {
        Menu {
            input,
            output,
            config,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks for a line of input. `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks for a file name until `open` succeeds, at most `max_attempts` times.
    /// Only a missing file is retried; any other failure is returned at once.
    fn ask_for_file<T, F>(&mut self, text: &str, open: F) -> Result<Option<T>>
    where
        F: Fn(&Path) -> Result<T>,
    {
        let mut attempt = 1;
        loop {
            let Some(name) = self.prompt(text)? else {
                return Ok(None);
            };
            match open(Path::new(name.trim())) {
                Ok(value) => return Ok(Some(value)),
                Err(e @ Error::SourceUnavailable { .. }) => {
                    warn!("{}", e);
                    if attempt >= self.config.max_attempts {
                        return Err(e);
                    }
                    writeln!(self.output, "\nFile not Found. Please try again!")?;
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }

    pub fn open_catalog(&mut self) -> Result<Option<Vec<Card>>> {
        self.ask_for_file("\nEnter cards file name: ", |p| load_catalog(p))
    }

    fn choose_action(&mut self) -> Result<Option<Action>> {
        loop {
            let Some(choice) = self.prompt(MENU)? else {
                return Ok(None);
            };
            let action = match choice.trim() {
                "1" => Action::ListAll,
                "2" => Action::Search,
                "3" => Action::Decklist,
                "4" => Action::Exit,
                other => {
                    debug!("invalid menu option '{}'", other);
                    writeln!(self.output, "\nInvalid option. Please try again!")?;
                    continue;
                },
            };
            return Ok(Some(action));
        }
    }

    fn choose_field(&mut self) -> Result<Option<FieldTag>> {
        loop {
            let Some(token) = self.prompt("\nEnter category to search: ")? else {
                return Ok(None);
            };
            match token.parse::<FieldTag>() {
                Ok(field) => return Ok(Some(field)),
                Err(_) => writeln!(self.output, "\nIncorrect category was selected!")?,
            }
        }
    }

    /// Table followed by the min, max and median block.
    fn show(&mut self, cards: &[Card]) -> Result<()> {
        let stats = compute_stats(cards)?;
        write_table(&mut self.output, cards)?;
        write_stats(&mut self.output, &stats)?;
        Ok(())
    }

    fn list_all(&mut self, catalog: &[Card]) -> Result<()> {
        writeln!(self.output, "\nThere are {} cards in the dataset.", catalog.len())?;
        if catalog.is_empty() {
            return Ok(());
        }
        let shown = &catalog[..catalog.len().min(self.config.list_limit)];
        write_table(&mut self.output, shown)?;
        let stats = compute_stats(catalog)?;
        write_stats(&mut self.output, &stats)?;
        Ok(())
    }

    fn search(&mut self, catalog: &[Card]) -> Result<bool> {
        let Some(query) = self.prompt("\nEnter query: ")? else {
            return Ok(false);
        };
        let Some(field) = self.choose_field()? else {
            return Ok(false);
        };

        let found = filter_by_field(catalog, &query, field);
        writeln!(self.output, "\nSearch results")?;
        if found.is_empty() {
            writeln!(self.output, "\nThere are no cards with '{}' in the '{}' category.", query, field)?;
        } else {
            writeln!(
                self.output,
                "\nThere are {} cards with '{}' in the '{}' category.",
                found.len(), query, field,
            )?;
            self.show(&found)?;
        }
        Ok(true)
    }

    fn decklist(&mut self, catalog: &[Card]) -> Result<bool> {
        let Some(ids) = self.ask_for_file("\nEnter decklist filename: ", |p| read_decklist_ids(p))? else {
            return Ok(false);
        };

        let deck = resolve_by_ids(catalog, ids.as_slice());
        writeln!(self.output, "\nSearch results")?;
        if deck.is_empty() {
            writeln!(self.output, "\nThere are no cards from the decklist in the dataset.")?;
        } else {
            self.show(&deck)?;
        }
        Ok(true)
    }

    /// Serves menu choices until exit is chosen or input runs out.
    pub fn run(&mut self, catalog: &[Card]) -> Result<()> {
        while let Some(action) = self.choose_action()? {
            let keep_going = match action {
                Action::ListAll => {
                    self.list_all(catalog)?;
                    true
                },
                Action::Search => self.search(catalog)?,
                Action::Decklist => self.decklist(catalog)?,
                Action::Exit => {
                    writeln!(self.output, "\nThanks for your support in Yu-Gi-Oh! TCG")?;
                    false
                },
            };
            if !keep_going {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn session(input: &str, catalog: &[Card]) -> String {
    let config = Config::default();
    let mut menu = Menu::new(input.as_bytes(), vec![], &config);
    menu.run(catalog).unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

#[test]
fn invalid_option_reprompts() {
    let out = session("9\n4\n", &[]);

    assert!(out.contains("Invalid option. Please try again!"));
    assert!(out.ends_with("Thanks for your support in Yu-Gi-Oh! TCG\n"));
}

#[test]
fn end_of_input_exits() {
    let out = session("", &[]);

    assert!(out.ends_with("Enter option: "));
}

#[test]
fn bad_category_reprompts() {
    let catalog = vec![Card::new("1", "Raigeki", "Spell Card", "", "Normal", "", 2.5)];
    let out = session("2\nRai\nattack\nNAME\n4\n", &catalog);

    assert!(out.contains("Incorrect category was selected!"));
    assert!(out.contains("There are 1 cards with 'Rai' in the 'name' category."));
    assert!(out.contains("The price of the median card(s) is 2.50"));
}

#[test]
fn no_results_skips_stats() {
    let catalog = vec![Card::new("1", "Raigeki", "Spell Card", "", "Normal", "", 2.5)];
    let out = session("2\nrai\nname\n4\n", &catalog);

    assert!(out.contains("There are no cards with 'rai' in the 'name' category."));
    assert!(!out.contains("least expensive"));
}
