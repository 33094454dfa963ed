//! Console front end: two players share the terminal and type moves such as
//! `c3 d4` or a capture chain `b2 d4 f6`.
//!
//! The process exits with 1 when `o` wins and 2 when `x` wins.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use checkers::config::DEFAULT_BOARD_SIZE;
use checkers::{ChainPolicy, Game, GameConfig, OpeningLayout, TurnReport};
use clap::{Parser, ValueEnum};

const ERROR_EXIT: u8 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-player checkers in the terminal", long_about = None)]
struct Args {
    /// Number of rows and columns.
    #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Starting layout file: one line per row using `.`, `o`, `O`, `x`, `X`.
    #[arg(short, long)]
    board: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OpeningArg::Standard)]
    opening: OpeningArg,

    /// Whether a failed capture chain keeps the steps made before the failure.
    #[arg(long, value_enum, default_value_t = ChainArg::Atomic)]
    chain: ChainArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpeningArg {
    Standard,
    Legacy,
}

impl From<OpeningArg> for OpeningLayout {
    fn from(arg: OpeningArg) -> Self {
        match arg {
            OpeningArg::Standard => OpeningLayout::Standard,
            OpeningArg::Legacy => OpeningLayout::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChainArg {
    Atomic,
    BestEffort,
}

impl From<ChainArg> for ChainPolicy {
    fn from(arg: ChainArg) -> Self {
        match arg {
            ChainArg::Atomic => ChainPolicy::Atomic,
            ChainArg::BestEffort => ChainPolicy::BestEffort,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let config = GameConfig {
        size: args.size,
        opening: args.opening.into(),
        chain_policy: args.chain.into(),
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(ERROR_EXIT);
        }
    };
    if let Some(path) = &args.board {
        load_custom_board(&mut game, path);
    }

    if let Err(err) = run(&mut game) {
        eprintln!("error: {err}");
        return ExitCode::from(ERROR_EXIT);
    }

    match game.winner() {
        Some(side) => {
            println!("\n{}\n", game.board());
            println!("player {side} wins");
            ExitCode::from(side.exit_code())
        }
        None => ExitCode::SUCCESS,
    }
}

/// Prompts until the game ends or stdin is exhausted.
fn run(game: &mut Game) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    game.check_win_condition();
    while game.is_running() {
        println!("\n{}\n", game.board());
        print!("player {}> ", game.current_player());
        stdout.flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match game.process_input(&tokens) {
            Ok(report) => describe(game, &report),
            Err(err) => eprintln!("Invalid input: {err}"),
        }
    }

    Ok(())
}

fn describe(game: &Game, report: &TurnReport) {
    let names: Vec<String> = report
        .captured
        .iter()
        .filter_map(|&coord| game.square_name(coord))
        .collect();
    if !names.is_empty() {
        println!("captured {}", names.join(", "));
    }
    if report.promoted {
        println!("player {} crowned a king", report.side);
    }
}

/// Replaces the opening with the layout stored at `path`, keeping the
/// opening when the file is unreadable or malformed.
fn load_custom_board(game: &mut Game, path: &Path) {
    let loaded = fs::read_to_string(path)
        .map_err(|err| err.to_string())
        .and_then(|text| game.load_board_text(&text).map_err(|err| err.to_string()));

    if let Err(err) = loaded {
        eprintln!(
            "warning: ignoring board file {}: {err}; using the opening layout",
            path.display()
        );
        game.initialize_board();
    }
}
