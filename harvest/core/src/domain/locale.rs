// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Locale
//!
//! Validated locale identifiers and the fallback policy used to choose the
//! language of outbound mail.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Replace ambient "current locale" state with an explicit value

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

fn locale_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z]{2,3}(?:[_-][A-Za-z0-9]{2,8})*$").expect("locale pattern compiles")
    })
}

/// A syntactically valid locale tag such as `en`, `fr` or `en_AU`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let tag = tag.trim();
        if locale_pattern().is_match(tag) {
            Ok(Self(tag.to_string()))
        } else {
            Err(LocaleError::Malformed(tag.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("Malformed locale tag: '{0}'")]
    Malformed(String),

    #[error("Default locale '{0}' is not in the available locales")]
    DefaultUnavailable(String),
}

/// Chooses the locale for a user's stored preference.
///
/// A preference is honoured only when it parses and is one of the available
/// locales; anything else resolves to the default.
#[derive(Debug, Clone)]
pub struct LocalePolicy {
    default: Locale,
    available: Vec<Locale>,
}

impl LocalePolicy {
    pub fn new(default: Locale, available: Vec<Locale>) -> Result<Self, LocaleError> {
        if !available.contains(&default) {
            return Err(LocaleError::DefaultUnavailable(default.to_string()));
        }
        Ok(Self { default, available })
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default
    }

    pub fn available(&self) -> &[Locale] {
        &self.available
    }

    pub fn is_available(&self, locale: &Locale) -> bool {
        self.available.contains(locale)
    }

    pub fn resolve(&self, preference: Option<&str>) -> Locale {
        preference
            .filter(|p| !p.trim().is_empty())
            .and_then(|p| Locale::parse(p).ok())
            .filter(|locale| self.is_available(locale))
            .unwrap_or_else(|| self.default.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> LocalePolicy {
        LocalePolicy::new(
            Locale::parse("en").unwrap(),
            vec![Locale::parse("en").unwrap(), Locale::parse("fr").unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_accepts_region_variants() {
        assert!(Locale::parse("en").is_ok());
        assert!(Locale::parse("en_AU").is_ok());
        assert!(Locale::parse("pt-BR").is_ok());
        assert_eq!(Locale::parse(" fr ").unwrap().as_str(), "fr");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("english please").is_err());
        assert!(Locale::parse("E").is_err());
    }

    #[test]
    fn test_resolve_honours_available_preference() {
        assert_eq!(policy().resolve(Some("fr")).as_str(), "fr");
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let policy = policy();
        assert_eq!(policy.resolve(None).as_str(), "en");
        assert_eq!(policy.resolve(Some("")).as_str(), "en");
        assert_eq!(policy.resolve(Some("de")).as_str(), "en");
        assert_eq!(policy.resolve(Some("not a locale")).as_str(), "en");
    }

    #[test]
    fn test_default_must_be_available() {
        let result = LocalePolicy::new(
            Locale::parse("es").unwrap(),
            vec![Locale::parse("en").unwrap()],
        );
        assert!(matches!(result, Err(LocaleError::DefaultUnavailable(_))));
    }
}
