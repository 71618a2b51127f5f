mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use utils::report::stats_report;
use utils::stats::StatsStore;
use utils::storage::FileStore;
use utils::word_list::{WordList, WordLists, WordMode};
use utils::wordle::Wordle;

const LOG_FILE: &str = "wordle.log";
const REPORT_BAR_CELLS: u32 = 40;

#[derive(Parser)]
#[command(
    name = "term_wordle",
    about = "Wordle in the terminal, with stats, long words and the word of the day",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory for the saved game, stats, settings and log.
    /// Defaults to $WORDLE_DATA_DIR, then ~/.term_wordle
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Play 7-letter words (remembered for next time)
    #[arg(long, conflicts_with = "classic")]
    long: bool,

    /// Play 5-letter words (remembered for next time)
    #[arg(long)]
    classic: bool,

    /// Start with today's word, fetched from the web
    #[arg(long)]
    daily: bool,

    /// Replace the built-in 5-letter word list
    #[arg(long, value_name = "FILE")]
    words5: Option<PathBuf>,

    /// Replace the built-in 7-letter word list
    #[arg(long, value_name = "FILE")]
    words7: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive game (default)
    Play,

    /// Print stats, the guess distribution and recent games
    Stats,
}

fn data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return dir.clone();
    }
    if let Ok(dir) = std::env::var("WORDLE_DATA_DIR") {
        return PathBuf::from(dir);
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".term_wordle"),
        Err(_) => PathBuf::from(".term_wordle"),
    }
}

/// Logs go to a file, the terminal belongs to the game.
fn init_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let log_path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open {}", log_path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_word_lists(cli: &Cli) -> Result<WordLists> {
    if cli.words5.is_none() && cli.words7.is_none() {
        return WordLists::embedded();
    }
    let classic = match &cli.words5 {
        Some(path) => WordList::load_from_file(WordMode::Classic, path)?,
        None => WordList::embedded(WordMode::Classic)?,
    };
    let long = match &cli.words7 {
        Some(path) => WordList::load_from_file(WordMode::Long, path)?,
        None => WordList::embedded(WordMode::Long)?,
    };
    Ok(WordLists::new(classic, long))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = data_dir(&cli);
    init_logging(&data_dir)?;

    match &cli.command {
        Some(Commands::Stats) => {
            let stats = StatsStore::load(Box::new(FileStore::new(&data_dir)?));
            print!("{}", stats_report(stats.stats(), REPORT_BAR_CELLS));
        }
        Some(Commands::Play) | None => {
            let mode = match (cli.long, cli.classic) {
                (true, _) => Some(WordMode::Long),
                (_, true) => Some(WordMode::Classic),
                _ => None,
            };
            let word_lists = load_word_lists(&cli)?;
            let mut game = Wordle::new(
                word_lists,
                Box::new(FileStore::new(&data_dir)?),
                Box::new(FileStore::new(&data_dir)?),
                mode,
            );
            if cli.daily {
                game.request_daily();
            }
            info!("starting in {} mode", game.mode());
            game.run()?;
        }
    }

    Ok(())
}
