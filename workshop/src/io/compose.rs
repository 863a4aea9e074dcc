//! Content composition: an ordered document built from prioritized alternatives.
//!
//! Every `append*` call reports whether it queued anything, so callers chain
//! alternatives with `||` and the first non-empty one wins:
//!
//! ```ignore
//! doc.append(exercise.header.as_ref())
//!     || doc.append_file(exercise.header_file.as_deref())?
//!     || doc.append(config_header.as_ref());
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::content::{Content, ContentType};

/// One queued piece of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Content),
    /// Solution file listing.
    Files(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lang: String,
    blocks: Vec<Block>,
}

impl Document {
    /// `lang` replaces `{lang}` in appended file paths.
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            blocks: Vec::new(),
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Queue `content` if present and non-blank.
    pub fn append(&mut self, content: Option<&Content>) -> bool {
        match content {
            Some(content) if !content.is_empty() => {
                self.blocks.push(Block::Text(content.clone()));
                true
            }
            _ => false,
        }
    }

    /// Like [`Document::append`], also taking a bare string as text content.
    pub fn append_plus(&mut self, content: impl Into<Content>) -> bool {
        let content = content.into();
        self.append(Some(&content))
    }

    /// Queue the contents of a file. A missing path, a missing file or an
    /// empty file queue nothing.
    pub fn append_file(&mut self, path: Option<&Path>) -> Result<bool> {
        let Some(path) = path else {
            return Ok(false);
        };
        let path = self.localize(path);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "content file not found");
                return Ok(false);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read content file {}", path.display()));
            }
        };
        let kind = ContentType::from_path(&path);
        Ok(self.append(Some(&Content::new(text, kind))))
    }

    /// Queue a solution file listing; an empty list queues nothing.
    pub fn append_files(&mut self, files: &[PathBuf]) -> bool {
        if files.is_empty() {
            return false;
        }
        self.blocks.push(Block::Files(files.to_vec()));
        true
    }

    fn localize(&self, path: &Path) -> PathBuf {
        let raw = path.to_string_lossy();
        if raw.contains("{lang}") {
            PathBuf::from(raw.replace("{lang}", &self.lang))
        } else {
            path.to_path_buf()
        }
    }
}
