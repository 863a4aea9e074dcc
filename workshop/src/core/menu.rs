//! Menu composition: exercises with completion markers plus auxiliary commands.
//!
//! Composition is pure. Drawing the menu and acting on a selection belong to
//! the renderer and the CLI.

use crate::core::catalog::Catalog;

/// Facts a command's visibility predicate may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuContext {
    pub languages: usize,
    pub completed: usize,
    pub total: usize,
}

/// An auxiliary command that may appear under the exercise list.
#[derive(Debug, Clone, Copy)]
pub struct AuxCommand {
    pub name: &'static str,
    /// Explicit opt-out from the menu.
    pub in_menu: bool,
    pub visible: Option<fn(&MenuContext) -> bool>,
}

impl AuxCommand {
    fn shown(&self, ctx: &MenuContext) -> bool {
        if self.visible.is_some_and(|visible| !visible(ctx)) {
            return false;
        }
        self.in_menu
    }
}

/// What selecting an entry should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Show the named exercise.
    Exercise(String),
    /// Run the named auxiliary command.
    Command(String),
    /// Leave the menu with status 0.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub marker: String,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: String,
    pub subtitle: Option<String>,
    pub items: Vec<MenuEntry>,
    pub extras: Vec<MenuEntry>,
}

impl Menu {
    /// All selectable entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.items.iter().chain(self.extras.iter())
    }
}

pub struct MenuInput<'a> {
    pub exercises: &'a [String],
    pub completed: &'a [String],
    /// Commands in registration order.
    pub commands: &'a [AuxCommand],
    pub context: MenuContext,
    pub catalog: &'a Catalog,
}

/// Localized exercise name, the bare name when the catalogue has none.
fn exercise_label(catalog: &Catalog, name: &str) -> String {
    let key = format!("exercise.{name}");
    if catalog.has(&key) {
        catalog.text(&key)
    } else {
        name.to_string()
    }
}

pub fn compose_menu(input: &MenuInput<'_>) -> Menu {
    let catalog = input.catalog;
    let completed_marker = format!("[{}]", catalog.text("menu.completed"));

    let items = input
        .exercises
        .iter()
        .map(|name| MenuEntry {
            label: format!("» {}", exercise_label(catalog, name)),
            marker: if input.completed.contains(name) {
                completed_marker.clone()
            } else {
                String::new()
            },
            action: MenuAction::Exercise(name.clone()),
        })
        .collect();

    let mut extras: Vec<MenuEntry> = input
        .commands
        .iter()
        .rev()
        .filter(|command| command.shown(&input.context))
        .map(|command| MenuEntry {
            label: catalog.text(&format!("menu.{}", command.name)),
            marker: String::new(),
            action: MenuAction::Command(command.name.to_string()),
        })
        .collect();
    extras.push(MenuEntry {
        label: catalog.text("menu.exit"),
        marker: String::new(),
        action: MenuAction::Exit,
    });

    Menu {
        title: catalog.text("title"),
        subtitle: catalog.has("subtitle").then(|| catalog.text("subtitle")),
        items,
        extras,
    }
}
