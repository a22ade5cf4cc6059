// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Addressing Types
//
// Countries with their ordered states, postal addresses, and zones (named
// groups of countries used by shipping and tax rules).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryId(pub Uuid);

impl CountryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CountryId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub Uuid);

impl ZoneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ZoneId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    pub abbr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    /// ISO 3166-1 alpha-2 code, upper case
    pub iso: String,
    pub name: String,
    /// States in their canonical order
    #[serde(default)]
    pub states: Vec<State>,
}

impl Country {
    pub fn new(iso: &str, name: impl Into<String>) -> Self {
        Self {
            id: CountryId::new(),
            iso: iso.trim().to_uppercase(),
            name: name.into(),
            states: Vec::new(),
        }
    }

    pub fn with_state(mut self, name: impl Into<String>, abbr: impl Into<String>) -> Self {
        self.states.push(State {
            name: name.into(),
            abbr: abbr.into(),
        });
        self
    }

    pub fn first_state(&self) -> Option<&State> {
        self.states.first()
    }
}

/// Postal address; built in memory, never persisted by this crate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub city: String,
    pub zipcode: String,
    pub state: State,
    pub country: Country,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<CountryId>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ZoneId::new(),
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn contains(&self, country_id: CountryId) -> bool {
        self.members.contains(&country_id)
    }

    /// Adds the country unless already a member. Returns whether it was added.
    pub fn add_member(&mut self, country_id: CountryId) -> bool {
        if self.contains(country_id) {
            return false;
        }
        self.members.push(country_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_normalises_iso() {
        let country = Country::new(" au ", "Australia").with_state("Victoria", "VIC");
        assert_eq!(country.iso, "AU");
        assert_eq!(country.first_state().map(|s| s.abbr.as_str()), Some("VIC"));
    }

    #[test]
    fn test_zone_membership_is_idempotent() {
        let country = Country::new("AU", "Australia");
        let mut zone = Zone::new("Australia");
        assert!(zone.add_member(country.id));
        assert!(!zone.add_member(country.id));
        assert_eq!(zone.members.len(), 1);
    }
}
