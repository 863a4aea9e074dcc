//! Workshop runner CLI.
//!
//! Reads `workshop.toml` from the application directory, registers the
//! exercises listed in `<exercise_dir>/menu.toml` and dispatches one command.
//! The process exit code comes from the command's outcome.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use workshop::app::open_engine;
use workshop::commands;
use workshop::engine::{Engine, Outcome};
use workshop::exit_codes;
use workshop::io::console::Console;
use workshop::io::menu::PromptMenu;
use workshop::logging;

#[derive(Parser)]
#[command(
    name = "workshop",
    version,
    disable_help_subcommand = true,
    about = "Terminal runner for self-paced programming workshops"
)]
struct Cli {
    /// Directory containing `workshop.toml`.
    #[arg(long, global = true, default_value = ".")]
    app_dir: PathBuf,
    /// Disable ANSI styling.
    #[arg(long, global = true)]
    no_color: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Show the exercise menu (default).
    Menu,
    /// List all exercises with their completion state.
    List,
    /// Print the name of the current exercise.
    Current,
    /// Print the instructions of an exercise (default: the current one).
    Print { name: Option<String> },
    /// Make an exercise current and print it.
    Select { name: String },
    /// Print the exercise after the current one.
    Next,
    /// Verify a solution against the current exercise.
    Verify {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run a solution against the current exercise without scoring it.
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Forget all completed exercises.
    Reset,
    /// Show or change the language.
    Language { lang: Option<String> },
    /// Show usage help for learners.
    Help,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let color = !cli.no_color && io::stdout().is_terminal();
    let mut engine = open_engine(&cli.app_dir, |config| {
        Console::stdio(color && config.color)
    })?;
    let outcome = dispatch(
        &mut engine,
        &cli.app_dir,
        cli.command.unwrap_or(Command::Menu),
    )?;
    Ok(outcome.exit_code())
}

fn dispatch(engine: &mut Engine, app_dir: &Path, command: Command) -> Result<Outcome> {
    match command {
        Command::Menu => {
            let catalog = engine.catalog().clone();
            let styler = engine.console_mut().styler();
            let mut renderer = PromptMenu::new(io::stdin().lock(), io::stdout(), catalog, styler);
            commands::menu(engine, app_dir, &mut renderer)
        }
        Command::List => commands::list(engine),
        Command::Current => commands::current(engine),
        Command::Print { name } => commands::print(engine, name.as_deref()),
        Command::Select { name } => engine.print_exercise(&name),
        Command::Next => commands::next(engine),
        Command::Verify { args } => commands::execute(engine, "verify", &args),
        Command::Run { args } => commands::execute(engine, "run", &args),
        Command::Reset => commands::reset(engine),
        Command::Language { lang } => commands::language(engine, app_dir, lang.as_deref()),
        Command::Help => commands::help(engine),
    }
}
