//! Typed exercise content and the per-exercise content fields.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a piece of content should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// Plain text with `{style}` tags and `{catalogue.key}` markers.
    #[default]
    Txt,
    /// Markdown; heading lines are emphasised when rendered.
    Md,
    /// Any other tag, rendered like plain text.
    Other(String),
}

impl ContentType {
    /// Infer the content type from a file extension (`.md` / `.markdown`).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("md") | Some("markdown") => ContentType::Md,
            _ => ContentType::Txt,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Txt => "txt",
            ContentType::Md => "md",
            ContentType::Other(tag) => tag,
        }
    }
}

impl From<String> for ContentType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "txt" | "text" => ContentType::Txt,
            "md" | "markdown" => ContentType::Md,
            _ => ContentType::Other(tag),
        }
    }
}

impl From<ContentType> for String {
    fn from(kind: ContentType) -> Self {
        kind.as_str().to_string()
    }
}

/// A renderable piece of text with its type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    #[serde(default, rename = "type")]
    pub kind: ContentType,
}

impl Content {
    pub fn new(text: impl Into<String>, kind: ContentType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn txt(text: impl Into<String>) -> Self {
        Self::new(text, ContentType::Txt)
    }

    pub fn md(text: impl Into<String>) -> Self {
        Self::new(text, ContentType::Md)
    }

    /// Whitespace-only content counts as absent.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::txt(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::txt(text)
    }
}

/// Static content an exercise declares for its display and outcome screens.
///
/// Every slot is optional; the engine falls back to workshop-level defaults or
/// synthesized messages when a slot is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseContent {
    pub header: Option<Content>,
    pub header_file: Option<PathBuf>,
    pub problem: Option<Content>,
    pub problem_file: Option<PathBuf>,
    pub footer: Option<Content>,
    pub footer_file: Option<PathBuf>,
    pub pass: Option<Content>,
    /// A declared `fail` forces every verification onto the fail screen.
    pub fail: Option<Content>,
    pub solution: Option<Content>,
    pub hide_solutions: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_inferred_from_extension() {
        assert_eq!(ContentType::from_path(Path::new("problem.md")), ContentType::Md);
        assert_eq!(ContentType::from_path(Path::new("problem.txt")), ContentType::Txt);
        assert_eq!(ContentType::from_path(Path::new("problem")), ContentType::Txt);
    }

    #[test]
    fn unknown_tags_are_preserved() {
        let kind = ContentType::from("ansi".to_string());
        assert_eq!(kind, ContentType::Other("ansi".to_string()));
        assert_eq!(kind.as_str(), "ansi");
    }

    #[test]
    fn whitespace_content_is_empty() {
        assert!(Content::txt("  \n\t").is_empty());
        assert!(!Content::txt(" x ").is_empty());
    }
}
