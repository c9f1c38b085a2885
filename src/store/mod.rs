//! In-memory collection store.
//!
//! Holds the four collections (contacts, team members, programs,
//! initiatives) for the lifetime of the process. Nothing survives a restart
//! except the contact log.
//!
//! The store is an explicit object handed to the HTTP layer as shared
//! state. Every operation runs under one mutex for its whole
//! read-modify-write sequence, so concurrent requests never observe a
//! half-applied change.
//!
//! Contact submissions are written to the [`ContactLog`] *before* they are
//! inserted in memory. A failed append leaves the in-memory list untouched
//! and the caller gets [`StoreError::Internal`].

pub mod contact_log;
pub mod model;

use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use contact_log::ContactLog;
use model::{
    ContactList, ContactSubmission, Initiative, Program, Socials, Stats, TeamMember,
    DEFAULT_IMAGE, DEFAULT_INTEREST,
};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

pub const TEAM_FIELDS_REQUIRED: &str = "Name and role are required";
pub const CONTACT_FIELDS_REQUIRED: &str = "Name, email, and message are required";

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Missing or malformed input; nothing was changed.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Fields accepted when adding a team member. Empty strings count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewTeamMember {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Fields accepted from the contact form. Empty strings count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub interest: Option<String>,
    pub message: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a `.` after it.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

// ── Store ─────────────────────────────────────────────────────────────────────

struct Collections {
    contacts: Vec<ContactSubmission>,
    team: Vec<TeamMember>,
    programs: Vec<Program>,
    initiatives: Vec<Initiative>,
}

pub struct Store {
    inner: Mutex<Collections>,
    contact_log: Box<dyn ContactLog>,
}

impl Store {
    /// Empty contacts, seeded team/programs/initiatives.
    pub fn seeded(contact_log: Box<dyn ContactLog>) -> Self {
        Self {
            inner: Mutex::new(Collections {
                contacts: Vec::new(),
                team: model::seed_team(),
                programs: model::seed_programs(),
                initiatives: model::seed_initiatives(),
            }),
            contact_log,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Internal("store lock poisoned".into()))
    }

    // ── Team ──────────────────────────────────────────────────────────

    pub fn list_team(&self) -> Result<Vec<TeamMember>, StoreError> {
        Ok(self.lock()?.team.clone())
    }

    pub fn get_team(&self, id: &str) -> Result<TeamMember, StoreError> {
        self.lock()?
            .team
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("Team member not found".into()))
    }

    pub fn create_team(&self, input: NewTeamMember) -> Result<TeamMember, StoreError> {
        let (Some(name), Some(role)) = (present(&input.name), present(&input.role)) else {
            return Err(StoreError::Validation(TEAM_FIELDS_REQUIRED.into()));
        };

        let member = TeamMember {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            role: role.to_string(),
            bio: present(&input.bio).unwrap_or_default().to_string(),
            image: present(&input.image).unwrap_or(DEFAULT_IMAGE).to_string(),
            socials: Socials::default(),
        };

        self.lock()?.team.push(member.clone());
        info!(member_id = %member.id, role = %member.role, "team member added");
        Ok(member)
    }

    // ── Reference data ────────────────────────────────────────────────

    pub fn list_programs(&self) -> Result<Vec<Program>, StoreError> {
        Ok(self.lock()?.programs.clone())
    }

    /// Exact, case-sensitive match on `category`; `None` returns everything.
    pub fn list_initiatives(&self, category: Option<&str>) -> Result<Vec<Initiative>, StoreError> {
        let inner = self.lock()?;
        Ok(match category {
            Some(c) => inner
                .initiatives
                .iter()
                .filter(|i| i.category == c)
                .cloned()
                .collect(),
            None => inner.initiatives.clone(),
        })
    }

    // ── Contacts ──────────────────────────────────────────────────────

    pub fn submit_contact(&self, input: NewContact) -> Result<ContactSubmission, StoreError> {
        let (Some(name), Some(email), Some(message)) = (
            present(&input.name),
            present(&input.email),
            present(&input.message),
        ) else {
            return Err(StoreError::Validation(CONTACT_FIELDS_REQUIRED.into()));
        };

        if !is_valid_email(email) {
            return Err(StoreError::Validation("Invalid email format".into()));
        }

        let contact = ContactSubmission {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            interest: present(&input.interest).unwrap_or(DEFAULT_INTEREST).to_string(),
            message: message.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        // Held across the append so log order matches list order.
        let mut inner = self.lock()?;
        self.contact_log
            .append(&contact)
            .map_err(|e| StoreError::Internal(e.to_string()))?;
        inner.contacts.push(contact.clone());
        drop(inner);

        info!(contact_id = %contact.id, interest = %contact.interest, "contact submitted");
        Ok(contact)
    }

    pub fn list_contacts(&self) -> Result<ContactList, StoreError> {
        let inner = self.lock()?;
        Ok(ContactList {
            total: inner.contacts.len(),
            contacts: inner.contacts.clone(),
        })
    }

    pub fn delete_contact(&self, id: &str) -> Result<ContactSubmission, StoreError> {
        let mut inner = self.lock()?;
        let index = inner
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound("Contact not found".into()))?;
        let deleted = inner.contacts.remove(index);
        debug!(contact_id = %deleted.id, "contact deleted");
        Ok(deleted)
    }

    // ── Aggregates ────────────────────────────────────────────────────

    pub fn stats(&self) -> Result<Stats, StoreError> {
        let inner = self.lock()?;
        let mut by_interest: BTreeMap<String, usize> = BTreeMap::new();
        for c in &inner.contacts {
            *by_interest.entry(c.interest.clone()).or_default() += 1;
        }
        Ok(Stats {
            total_contacts: inner.contacts.len(),
            total_team_members: inner.team.len(),
            total_programs: inner.programs.len(),
            total_initiatives: inner.initiatives.len(),
            contacts_by_interest: by_interest,
        })
    }
}
