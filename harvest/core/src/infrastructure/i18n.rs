// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Translations
//!
//! Locale catalogues for outbound mail, loaded from YAML and interpolated with
//! Handlebars.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Look up localised strings by dotted key
//!
//! # Catalogue Format
//!
//! Nested YAML mappings are flattened into dotted keys, so
//!
//! ```yaml
//! producer_mailer:
//!   order_cycle:
//!     subject: "Order cycle report for {{producer}}"
//! ```
//!
//! is addressed as `producer_mailer.order_cycle.subject`. Lookups fall back to
//! the default locale, then to the key itself.

use crate::domain::locale::Locale;
use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use std::collections::HashMap;
use tracing::warn;

const EMBEDDED_CATALOGUES: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.yml")),
    ("fr", include_str!("../../locales/fr.yml")),
    ("es", include_str!("../../locales/es.yml")),
];

pub struct Translations {
    catalogues: HashMap<Locale, HashMap<String, String>>,
    default: Locale,
    handlebars: Handlebars<'static>,
}

impl Translations {
    pub fn new(default: Locale) -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(handlebars::no_escape);

        Self {
            catalogues: HashMap::new(),
            default,
            handlebars,
        }
    }

    /// Catalogues shipped with the crate
    pub fn embedded(default: Locale) -> Result<Self> {
        let mut translations = Self::new(default);
        for (tag, source) in EMBEDDED_CATALOGUES {
            let locale = Locale::parse(tag)?;
            translations
                .add_catalogue_yaml(locale, source)
                .with_context(|| format!("Failed to load embedded '{}' catalogue", tag))?;
        }
        Ok(translations)
    }

    pub fn add_catalogue_yaml(&mut self, locale: Locale, yaml: &str) -> Result<()> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).context("Invalid catalogue YAML")?;
        let mut entries = HashMap::new();
        flatten(None, &value, &mut entries)?;
        self.catalogues.entry(locale).or_default().extend(entries);
        Ok(())
    }

    pub fn has_catalogue(&self, locale: &Locale) -> bool {
        self.catalogues.contains_key(locale)
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    fn lookup(&self, locale: &Locale, key: &str) -> Option<&str> {
        self.catalogues
            .get(locale)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogues.get(&self.default).and_then(|c| c.get(key)))
            .map(String::as_str)
    }

    /// Translate `key` for `locale`, interpolating `params`
    pub fn translate<P: Serialize>(&self, locale: &Locale, key: &str, params: &P) -> String {
        let Some(template) = self.lookup(locale, key) else {
            warn!(locale = %locale, key, "Missing translation");
            return key.to_string();
        };

        match self.handlebars.render_template(template, params) {
            Ok(text) => text,
            Err(e) => {
                warn!(locale = %locale, key, error = %e, "Failed to interpolate translation");
                template.to_string()
            }
        }
    }

    /// Translate every key under `prefix`, keyed by the remainder of the key
    pub fn section<P: Serialize>(&self, locale: &Locale, prefix: &str, params: &P) -> HashMap<String, String> {
        let dotted = format!("{}.", prefix);
        let mut keys: Vec<&String> = self
            .catalogues
            .get(&self.default)
            .into_iter()
            .chain(self.catalogues.get(locale))
            .flat_map(|c| c.keys())
            .filter(|k| k.starts_with(&dotted))
            .collect();
        keys.sort();
        keys.dedup();

        keys.into_iter()
            .map(|k| {
                let short = k[dotted.len()..].to_string();
                (short, self.translate(locale, k, params))
            })
            .collect()
    }
}

fn flatten(prefix: Option<&str>, value: &serde_yaml::Value, out: &mut HashMap<String, String>) -> Result<()> {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                let k = k
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("Catalogue keys must be strings"))?;
                let key = match prefix {
                    Some(p) => format!("{}.{}", p, k),
                    None => k.to_string(),
                };
                flatten(Some(&key), v, out)?;
            }
        }
        serde_yaml::Value::String(s) => {
            let key = prefix.ok_or_else(|| anyhow::anyhow!("Catalogue root must be a mapping"))?;
            out.insert(key.to_string(), s.clone());
        }
        serde_yaml::Value::Null => {}
        other => {
            let key = prefix.unwrap_or("<root>");
            anyhow::bail!("Unsupported catalogue value at '{}': {:?}", key, other);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn test_embedded_catalogues_load() {
        let t = Translations::embedded(locale("en")).unwrap();
        for tag in ["en", "fr", "es"] {
            assert!(t.has_catalogue(&locale(tag)));
        }
    }

    #[test]
    fn test_subject_interpolation() {
        let t = Translations::embedded(locale("en")).unwrap();
        let params = json!({ "producer": "Green & Sons" });

        assert_eq!(
            t.translate(&locale("en"), "producer_mailer.order_cycle.subject", &params),
            "Order cycle report for Green & Sons"
        );
        assert_eq!(
            t.translate(&locale("fr"), "producer_mailer.order_cycle.subject", &params),
            "Rapport du cycle de vente pour Green & Sons"
        );
    }

    #[test]
    fn test_fallbacks() {
        let mut t = Translations::embedded(locale("en")).unwrap();
        t.add_catalogue_yaml(locale("de"), "producer_mailer:\n  order_cycle:\n    thanks: Danke!\n")
            .unwrap();

        assert_eq!(t.translate(&locale("de"), "producer_mailer.order_cycle.thanks", &json!({})), "Danke!");
        assert_eq!(
            t.translate(&locale("de"), "producer_mailer.order_cycle.sku", &json!({})),
            "SKU"
        );
        assert_eq!(t.translate(&locale("en"), "no.such.key", &json!({})), "no.such.key");
    }

    #[test]
    fn test_section_strips_prefix() {
        let t = Translations::embedded(locale("en")).unwrap();
        let labels = t.section(&locale("es"), "producer_mailer.order_cycle", &json!({ "producer": "Finca" }));
        assert_eq!(labels.get("product").map(String::as_str), Some("Producto"));
        assert!(labels["greeting"].contains("Finca"));
        assert!(labels.contains_key("thanks"));
    }

    #[test]
    fn test_rejects_non_string_values() {
        let mut t = Translations::new(locale("en"));
        assert!(t.add_catalogue_yaml(locale("en"), "a:\n  b: [1, 2]\n").is_err());
    }
}
