// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnterpriseId(pub Uuid);

impl EnterpriseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EnterpriseId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EnterpriseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Person to address mail to on behalf of an enterprise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: String,
}

/// User owning an enterprise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub email: String,
    /// Stored language preference, unvalidated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

/// A producer, distributor or coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enterprise {
    pub id: EnterpriseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    pub owner: Owner,
    /// Free-text collection time used when an order cycle gives no pickup time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_collection_at: Option<String>,
}

impl Enterprise {
    pub fn new(name: impl Into<String>, owner: Owner) -> Self {
        Self {
            id: EnterpriseId::new(),
            name: name.into(),
            contact: None,
            owner,
            next_collection_at: None,
        }
    }

    pub fn with_contact(mut self, name: Option<&str>, email: impl Into<String>) -> Self {
        self.contact = Some(Contact {
            name: name.map(str::to_string),
            email: email.into(),
        });
        self
    }

    pub fn with_next_collection_at(mut self, text: impl Into<String>) -> Self {
        self.next_collection_at = Some(text.into());
        self
    }

    pub fn contact_email(&self) -> Option<&str> {
        self.contact
            .as_ref()
            .map(|c| c.email.as_str())
            .filter(|email| !email.trim().is_empty())
    }
}
