//! Terminal menu renderer.
//!
//! The [`MenuRenderer`] trait decouples the CLI from how a composed menu is
//! drawn and how a choice is read. [`PromptMenu`] prints a numbered list and
//! reads the choice as a line of input.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use super::render::Styler;
use crate::core::catalog::Catalog;
use crate::core::menu::{Menu, MenuAction};

pub trait MenuRenderer {
    /// Draw `menu` and return the chosen action, `None` on end of input.
    fn select(&mut self, menu: &Menu) -> Result<Option<MenuAction>>;
}

pub struct PromptMenu<R, W> {
    input: R,
    output: W,
    catalog: Catalog,
    styler: Styler,
    width: usize,
}

impl<R: BufRead, W: Write> PromptMenu<R, W> {
    pub fn new(input: R, output: W, catalog: Catalog, styler: Styler) -> Self {
        Self {
            input,
            output,
            catalog,
            styler,
            width: 65,
        }
    }

    fn draw(&mut self, menu: &Menu) -> Result<()> {
        let rule = "\u{2500}".repeat(self.width);
        writeln!(self.output, "{}", self.styler.bold(&menu.title)).context("write menu")?;
        if let Some(subtitle) = &menu.subtitle {
            writeln!(self.output, "{subtitle}").context("write menu")?;
        }
        writeln!(self.output, "{rule}").context("write menu")?;
        let numbered = menu.entries().enumerate();
        for (idx, entry) in numbered {
            if idx == menu.items.len() {
                writeln!(self.output, "{rule}").context("write menu")?;
            }
            let label = format!("{:>3}. {}", idx + 1, entry.label);
            let pad = self
                .width
                .saturating_sub(label.chars().count() + entry.marker.chars().count());
            writeln!(
                self.output,
                "{label}{}{}",
                " ".repeat(pad),
                self.styler.bold(&entry.marker)
            )
            .context("write menu")?;
        }
        writeln!(self.output, "{rule}").context("write menu")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> MenuRenderer for PromptMenu<R, W> {
    fn select(&mut self, menu: &Menu) -> Result<Option<MenuAction>> {
        self.draw(menu)?;
        let total = menu.entries().count();
        let last = total.to_string();
        loop {
            write!(
                self.output,
                "{}",
                self.catalog
                    .text_with("menu.prompt", &[("first", "1"), ("last", &last)])
            )
            .context("write prompt")?;
            self.output.flush().context("flush prompt")?;

            let mut line = String::new();
            let read = self.input.read_line(&mut line).context("read selection")?;
            if read == 0 {
                return Ok(None);
            }
            let choice = line.trim();
            if let Some(action) = parse_choice(menu, choice) {
                return Ok(Some(action));
            }
            let message = self.catalog.text_with("menu.invalid", &[("input", choice)]);
            writeln!(self.output, "{}", self.styler.red(&message)).context("write menu")?;
        }
    }
}

/// A 1-based entry number, or an exercise/command label typed verbatim.
fn parse_choice(menu: &Menu, choice: &str) -> Option<MenuAction> {
    if let Ok(number) = choice.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|idx| menu.entries().nth(idx))
            .map(|entry| entry.action.clone());
    }
    menu.entries()
        .find(|entry| match &entry.action {
            MenuAction::Exercise(name) => name.eq_ignore_ascii_case(choice),
            MenuAction::Command(name) => name.eq_ignore_ascii_case(choice),
            MenuAction::Exit => choice.eq_ignore_ascii_case("exit"),
        })
        .map(|entry| entry.action.clone())
}
