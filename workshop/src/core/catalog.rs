//! In-memory message catalogue.
//!
//! Keys are dotted paths (`progress.remaining`). Values are minijinja
//! templates; plural forms live under `<key>.one` / `<key>.other`. Unknown keys
//! render as the key itself so a missing translation is visible, never fatal.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use minijinja::Environment;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Catalog {
    lang: String,
    messages: BTreeMap<String, String>,
}

impl Catalog {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            messages: BTreeMap::new(),
        }
    }

    /// Parse a TOML catalogue, flattening nested tables into dotted keys.
    pub fn from_toml_str(lang: impl Into<String>, source: &str) -> Result<Self> {
        let mut catalog = Self::new(lang);
        catalog.merge_toml_str(source)?;
        Ok(catalog)
    }

    /// Overlay entries from another TOML catalogue; later entries win.
    pub fn merge_toml_str(&mut self, source: &str) -> Result<()> {
        let table: toml::Table = toml::from_str(source).context("parse message catalogue")?;
        flatten("", &toml::Value::Table(table), &mut self.messages);
        Ok(())
    }

    /// Insert `key` only when no translation exists yet.
    pub fn insert_default(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.messages.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Raw template for `key`, without substitution.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn text(&self, key: &str) -> String {
        self.text_with(key, &[])
    }

    pub fn text_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        match self.messages.get(key) {
            Some(template) => render(key, template, vars),
            None => key.to_string(),
        }
    }

    /// Pluralized lookup; `count` is also available to the template.
    pub fn plural(&self, key: &str, count: i64) -> String {
        let form = if count == 1 { "one" } else { "other" };
        let count_str = count.to_string();
        let vars = [("count", count_str.as_str())];
        let plural_key = format!("{key}.{form}");
        if let Some(template) = self.messages.get(&plural_key) {
            return render(&plural_key, template, &vars);
        }
        self.text_with(key, &vars)
    }

    /// Derived catalogue with extra literal entries (not templates).
    pub fn extend<I, K, V>(&self, overrides: I) -> Catalog
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut derived = self.clone();
        for (key, value) in overrides {
            derived
                .messages
                .insert(key.into(), escape_template(&value.into()));
        }
        derived
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        toml::Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}

fn render(key: &str, template: &str, vars: &[(&str, &str)]) -> String {
    if !template.contains("{{") && !template.contains("{%") {
        return template.to_string();
    }
    let ctx: BTreeMap<&str, &str> = vars.iter().copied().collect();
    let env = Environment::new();
    match env.render_str(template, ctx) {
        Ok(rendered) => rendered,
        Err(err) => {
            warn!(key, error = %err, "message template failed to render");
            template.to_string()
        }
    }
}

fn escape_template(value: &str) -> String {
    if value.contains("{{") || value.contains("{%") {
        format!("{{% raw %}}{value}{{% endraw %}}")
    } else {
        value.to_string()
    }
}
