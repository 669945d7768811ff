use std::{io::{self, Write}, path::PathBuf};

use clap::{Parser, Subcommand};
use env_logger::Env;

use ygodata::{
    compute_stats,
    display::{write_report, Format},
    filter_by_field,
    get_config,
    load_catalog,
    menu::Menu,
    read_decklist_ids,
    report,
    resolve_by_ids,
    Config,
    Error,
    FieldTag,
    Result,
};

#[derive(Parser)]
#[command(name = "ygodata", version, about = "Browse a Yu-Gi-Oh! card price catalog")]
struct Cli {
    /// Configuration file (defaults to $YGODATA_CONFIG, then ./ygodata.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog CSV file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Without a command the interactive menu is started
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the cheapest cards with statistics over the whole catalog
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Find cards whose field contains the query
    Search {
        query: String,
        /// One of: id, name, type, desc, race, archetype, "card price"
        #[arg(long, short)]
        field: FieldTag,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Look up the cards of a decklist file
    Deck {
        path: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = get_config(cli.config.as_deref())?;
    let catalog_path = cli.catalog.or_else(|| config.catalog.clone());

    let Some(command) = cli.command else {
        return interactive(catalog_path, &config);
    };

    let path = catalog_path
        .ok_or_else(|| Error::Config("no catalog given, use --catalog or set `catalog` in the config".to_string()))?;
    let catalog = load_catalog(&path)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::List { limit, format } => {
            let limit = limit.unwrap_or(config.list_limit);
            let shown = &catalog[..catalog.len().min(limit)];
            if format == Format::Table {
                writeln!(out, "There are {} cards in the dataset.", catalog.len())?;
            }
            let stats = if catalog.is_empty() { None } else { Some(compute_stats(&catalog)?) };
            write_report(&mut out, format, shown, stats.as_ref())?;
        },
        Command::Search { query, field, format } => {
            let found = filter_by_field(&catalog, &query, field);
            if found.is_empty() && format == Format::Table {
                writeln!(out, "There are no cards with '{}' in the '{}' category.", query, field)?;
            } else {
                report(&mut out, format, &found)?;
            }
        },
        Command::Deck { path, format } => {
            let ids = read_decklist_ids(&path)?;
            let deck = resolve_by_ids(&catalog, ids.as_slice());
            if deck.is_empty() && format == Format::Table {
                writeln!(out, "There are no cards from the decklist in the dataset.")?;
            } else {
                report(&mut out, format, &deck)?;
            }
        },
    }
    Ok(())
}

fn interactive(catalog_path: Option<PathBuf>, config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut menu = Menu::new(stdin.lock(), stdout.lock(), config);

    let catalog = match catalog_path {
        Some(path) => load_catalog(path)?,
        None => match menu.open_catalog()? {
            Some(catalog) => catalog,
            None => return Ok(()),
        },
    };
    menu.run(&catalog)
}
