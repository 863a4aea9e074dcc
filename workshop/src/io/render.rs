//! Turns a composed [`Document`] into terminal text.
//!
//! Text blocks may carry `{marker}` tokens: style tags (`{bold}`…`{/bold}`,
//! `{green}`…`{/green}`) become ANSI codes (or vanish without color), and any
//! other token that names a catalogue key is replaced by its message.

use std::sync::LazyLock;

use crossterm::style::{Attribute, Color, SetAttribute, SetForegroundColor};
use regex::{Captures, Regex};

use super::compose::{Block, Document};
use crate::core::catalog::Catalog;
use crate::core::content::{Content, ContentType};

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(/?)([A-Za-z][A-Za-z0-9_.\-]*)\}").expect("valid marker regex"));

/// Messages may reference other messages; stop following after this depth.
const MAX_MARKER_DEPTH: usize = 3;

/// ANSI styling switch shared by every writer of product output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    pub color: bool,
}

impl Styler {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap(text, None, true)
    }

    pub fn green_bold(&self, text: &str) -> String {
        self.wrap(text, Some(Color::Green), true)
    }

    pub fn red_bold(&self, text: &str) -> String {
        self.wrap(text, Some(Color::Red), true)
    }

    pub fn red(&self, text: &str) -> String {
        self.wrap(text, Some(Color::Red), false)
    }

    pub fn gray(&self, text: &str) -> String {
        self.wrap(text, Some(Color::DarkGrey), false)
    }

    fn wrap(&self, text: &str, color: Option<Color>, bold: bool) -> String {
        if !self.color {
            return text.to_string();
        }
        let mut out = String::new();
        if bold {
            out.push_str(&SetAttribute(Attribute::Bold).to_string());
        }
        if let Some(color) = color {
            out.push_str(&SetForegroundColor(color).to_string());
        }
        out.push_str(text);
        out.push_str(&SetAttribute(Attribute::Reset).to_string());
        out
    }

    /// ANSI sequence for a style tag, `None` if `name` is not a style tag.
    fn tag(&self, closing: bool, name: &str) -> Option<String> {
        let code = match (closing, name) {
            (false, "bold") => SetAttribute(Attribute::Bold).to_string(),
            (true, "bold") | (true, "dim") => SetAttribute(Attribute::NormalIntensity).to_string(),
            (false, "dim") => SetAttribute(Attribute::Dim).to_string(),
            (false, "italic") => SetAttribute(Attribute::Italic).to_string(),
            (true, "italic") => SetAttribute(Attribute::NoItalic).to_string(),
            (false, "underline") => SetAttribute(Attribute::Underlined).to_string(),
            (true, "underline") => SetAttribute(Attribute::NoUnderline).to_string(),
            (closing, color) => {
                let color = color_named(color)?;
                if closing {
                    SetForegroundColor(Color::Reset).to_string()
                } else {
                    SetForegroundColor(color).to_string()
                }
            }
        };
        Some(if self.color { code } else { String::new() })
    }
}

fn color_named(name: &str) -> Option<Color> {
    Some(match name {
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::DarkGrey,
        _ => return None,
    })
}

/// Render every block in queue order; each block ends with a newline.
pub fn render_document(doc: &Document, catalog: &Catalog, styler: Styler) -> String {
    let mut out = String::new();
    for block in doc.blocks() {
        let rendered = match block {
            Block::Text(content) => render_content(content, catalog, styler),
            Block::Files(files) => files
                .iter()
                .map(|file| styler.gray(&format!("file://{}", file.display())))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        out.push_str(&rendered);
        if !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

pub fn render_content(content: &Content, catalog: &Catalog, styler: Styler) -> String {
    let text = apply_markers(&content.text, catalog, styler, 0);
    match content.kind {
        ContentType::Md => emphasize_headings(&text, styler),
        ContentType::Txt | ContentType::Other(_) => text,
    }
}

fn apply_markers(text: &str, catalog: &Catalog, styler: Styler, depth: usize) -> String {
    MARKER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let closing = !caps[1].is_empty();
            let name = &caps[2];
            if let Some(code) = styler.tag(closing, name) {
                return code;
            }
            if !closing && catalog.has(name) && depth < MAX_MARKER_DEPTH {
                return apply_markers(&catalog.text(name), catalog, styler, depth + 1);
            }
            caps[0].to_string()
        })
        .into_owned()
}

fn emphasize_headings(text: &str, styler: Styler) -> String {
    let mut out = text
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                styler.bold(line)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}
