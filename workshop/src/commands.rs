//! CLI commands on top of the [`Engine`].
//!
//! Every command returns an [`Outcome`] so `main` can map it to an exit code.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::core::menu::{AuxCommand, Menu, MenuAction, MenuContext, MenuEntry};
use crate::engine::{Engine, Outcome, Terminal};
use crate::io::compose::Document;
use crate::io::i18n::load_catalog;
use crate::io::menu::MenuRenderer;

/// Auxiliary commands offered by the menu, in registration order.
pub const MENU_COMMANDS: [AuxCommand; 3] = [
    AuxCommand {
        name: "help",
        in_menu: true,
        visible: None,
    },
    AuxCommand {
        name: "reset",
        in_menu: true,
        visible: None,
    },
    AuxCommand {
        name: "language",
        in_menu: true,
        visible: Some(several_languages),
    },
];

fn several_languages(ctx: &MenuContext) -> bool {
    ctx.languages > 1
}

fn informational() -> Outcome {
    Outcome::new(Terminal::Informational)
}

/// The current exercise, or a reported `error.no_exercise`.
fn current_or_report(engine: &mut Engine) -> Result<Result<String, Outcome>> {
    match engine.progress().current()? {
        Some(name) => Ok(Ok(name)),
        None => Ok(Err(engine.report("error.no_exercise", &[])?)),
    }
}

pub fn list(engine: &mut Engine) -> Result<Outcome> {
    let completed = engine.progress().completed()?;
    let marker = format!("[{}]", engine.catalog().text("menu.completed"));
    let lines: Vec<String> = engine
        .registry()
        .iter()
        .map(|meta| {
            let label = engine.catalog().text(&format!("exercise.{}", meta.name));
            if completed.contains(&meta.name) {
                format!("{:>3}. {label} {marker}", meta.number)
            } else {
                format!("{:>3}. {label}", meta.number)
            }
        })
        .collect();
    let console = engine.console_mut();
    for line in lines {
        console.line(&line)?;
    }
    Ok(informational())
}

pub fn current(engine: &mut Engine) -> Result<Outcome> {
    let name = match current_or_report(engine)? {
        Ok(name) => name,
        Err(outcome) => return Ok(outcome),
    };
    engine.console_mut().line(&name)?;
    Ok(informational())
}

/// Print `name`, or the current exercise when no name is given.
pub fn print(engine: &mut Engine, name: Option<&str>) -> Result<Outcome> {
    let name = match name {
        Some(name) => name.to_string(),
        None => match current_or_report(engine)? {
            Ok(name) => name,
            Err(outcome) => return Ok(outcome),
        },
    };
    engine.print_exercise(&name)
}

pub fn next(engine: &mut Engine) -> Result<Outcome> {
    let current = match current_or_report(engine)? {
        Ok(name) => name,
        Err(outcome) => return Ok(outcome),
    };
    let next = engine
        .registry()
        .next_after(&current)
        .map(|meta| meta.name.clone());
    match next {
        Some(name) => engine.print_exercise(&name),
        None => engine.report("error.no_next", &[("name", &current)]),
    }
}

/// `verify` / `run` against the current exercise.
pub fn execute(engine: &mut Engine, mode: &str, args: &[String]) -> Result<Outcome> {
    let current = match current_or_report(engine)? {
        Ok(name) => name,
        Err(outcome) => return Ok(outcome),
    };
    engine.run_exercise(&current, mode, args)
}

pub fn reset(engine: &mut Engine) -> Result<Outcome> {
    engine.progress().reset()?;
    info!("progress reset");
    let message = engine.catalog().text("progress.reset");
    engine.console_mut().line(&message)?;
    Ok(informational())
}

/// Show the active language, or switch to `lang`.
pub fn language(engine: &mut Engine, app_dir: &Path, lang: Option<&str>) -> Result<Outcome> {
    let Some(lang) = lang else {
        let message = engine
            .catalog()
            .text_with("language.current", &[("lang", engine.catalog().lang())]);
        engine.console_mut().line(&message)?;
        return Ok(informational());
    };
    if !engine.config().languages.iter().any(|known| known == lang) {
        let languages = engine.config().languages.join(", ");
        return engine.report(
            "language.unsupported",
            &[("lang", lang), ("languages", &languages)],
        );
    }
    engine.progress().set_language(lang)?;
    engine.set_catalog(load_catalog(app_dir, lang)?);
    let message = engine.catalog().text_with("language.changed", &[("lang", lang)]);
    engine.console_mut().line(&message)?;
    Ok(informational())
}

pub fn help(engine: &mut Engine) -> Result<Outcome> {
    let text = engine
        .catalog()
        .text_with("help.text", &[("appName", &engine.config().name)]);
    let mut doc = Document::new(engine.catalog().lang());
    doc.append_plus(text);
    engine.write_document(&doc)?;
    Ok(informational())
}

/// Interactive menu. Picking an exercise prints it; `reset` and `language`
/// return to the menu afterwards.
pub fn menu(
    engine: &mut Engine,
    app_dir: &Path,
    renderer: &mut dyn MenuRenderer,
) -> Result<Outcome> {
    loop {
        let menu = engine.menu(&MENU_COMMANDS)?;
        let Some(action) = renderer.select(&menu)? else {
            return Ok(informational());
        };
        debug!(?action, "menu selection");
        match action {
            MenuAction::Exercise(name) => return engine.print_exercise(&name),
            MenuAction::Exit => return Ok(informational()),
            MenuAction::Command(command) => match command.as_str() {
                "help" => return help(engine),
                "reset" => {
                    reset(engine)?;
                }
                "language" => {
                    let choices = language_menu(engine);
                    if let Some(MenuAction::Command(lang)) = renderer.select(&choices)? {
                        let outcome = language(engine, app_dir, Some(&lang))?;
                        if outcome.exit_code() != crate::exit_codes::OK {
                            return Ok(outcome);
                        }
                    }
                }
                other => {
                    debug!(command = other, "unknown menu command");
                    return Ok(informational());
                }
            },
        }
    }
}

fn language_menu(engine: &Engine) -> Menu {
    let catalog = engine.catalog();
    let active = catalog.lang();
    let items = engine
        .config()
        .languages
        .iter()
        .map(|lang| MenuEntry {
            label: lang.clone(),
            marker: if lang == active {
                "*".to_string()
            } else {
                String::new()
            },
            action: MenuAction::Command(lang.clone()),
        })
        .collect();
    Menu {
        title: catalog.text("menu.language"),
        subtitle: Some(catalog.text_with("language.current", &[("lang", active)])),
        items,
        extras: vec![MenuEntry {
            label: catalog.text("menu.exit"),
            marker: String::new(),
            action: MenuAction::Exit,
        }],
    }
}
