//! Record types held by the [`Store`](super::Store) and their seed data.
//!
//! Field names serialize in camelCase so the JSON matches what the site
//! front end reads (`createdAt`, `contactId`, …).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTEREST: &str = "general";
pub const DEFAULT_IMAGE: &str = "🧑‍💼";
const PLACEHOLDER_SOCIAL: &str = "#";

/// A contact-form submission. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    pub interest: String,
    pub message: String,
    /// RFC 3339 UTC timestamp, millisecond precision.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
}

impl Default for Socials {
    fn default() -> Self {
        Self {
            github: PLACEHOLDER_SOCIAL.into(),
            linkedin: PLACEHOLDER_SOCIAL.into(),
            twitter: PLACEHOLDER_SOCIAL.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    /// Emoji avatar token.
    pub image: String,
    pub socials: Socials,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon name the front end maps to an SVG.
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiative {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
}

/// Body of `GET /api/admin/contacts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactList {
    pub total: usize,
    pub contacts: Vec<ContactSubmission>,
}

/// Body of `GET /api/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_contacts: usize,
    pub total_team_members: usize,
    pub total_programs: usize,
    pub total_initiatives: usize,
    /// Raw `interest` value → number of contacts. Keys are not normalized.
    pub contacts_by_interest: BTreeMap<String, usize>,
}

// ── Seed data ─────────────────────────────────────────────────────────────────

fn member(id: &str, name: &str, role: &str, bio: &str, image: &str) -> TeamMember {
    TeamMember {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        bio: bio.into(),
        image: image.into(),
        socials: Socials::default(),
    }
}

pub fn seed_team() -> Vec<TeamMember> {
    vec![
        member(
            "1",
            "Dr. Raj Kumar",
            "Director",
            "Visionary leader with 20+ years in AI research and innovation",
            "🧑‍💼",
        ),
        member(
            "2",
            "Priya Sharma",
            "AI Research Lead",
            "PhD in Machine Learning, pioneering AI solutions for social good",
            "👩‍💻",
        ),
        member(
            "3",
            "Arjun Nair",
            "Ecosystem Manager",
            "Building connections between startups, enterprises, and institutions",
            "🧑‍💼",
        ),
    ]
}

pub fn seed_programs() -> Vec<Program> {
    [
        (
            "1",
            "AI Research Excellence",
            "World-class research centers collaborating with global institutions to advance AI technology",
            "brain",
        ),
        (
            "2",
            "Talent Development",
            "Comprehensive training programs to create 100,000 AI-ready professionals by 2030",
            "users",
        ),
        (
            "3",
            "Startup Ecosystem",
            "Incubation support, funding, and mentorship for AI-driven entrepreneurship",
            "rocket",
        ),
    ]
    .into_iter()
    .map(|(id, name, description, icon)| Program {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
    })
    .collect()
}

pub fn seed_initiatives() -> Vec<Initiative> {
    [
        ("1", "Healthcare AI", "AI solutions for disease diagnosis and treatment"),
        ("2", "Smart Agriculture", "Precision farming using AI and IoT technologies"),
        ("3", "Digital Education", "AI-powered personalized learning systems"),
        ("4", "Climate Tech", "Environmental monitoring and prediction using AI"),
    ]
    .into_iter()
    .map(|(id, title, description)| Initiative {
        id: id.into(),
        title: title.into(),
        category: "vision".into(),
        description: description.into(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn contact_serializes_camel_case() {
        let c = ContactSubmission {
            id: "abc".into(),
            name: "Jo".into(),
            email: "jo@x.com".into(),
            interest: DEFAULT_INTEREST.into(),
            message: "hi".into(),
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["createdAt"], "2026-01-01T00:00:00.000Z");
        assert!(v.get("created_at").is_none());
    }

    #[test]
    fn stats_serialize_camel_case() {
        let s = Stats {
            total_contacts: 0,
            total_team_members: 3,
            total_programs: 3,
            total_initiatives: 4,
            contacts_by_interest: BTreeMap::new(),
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["totalTeamMembers"], 3);
        assert!(v["contactsByInterest"].as_object().unwrap().is_empty());
    }

    #[test]
    fn seed_ids_unique() {
        let team: HashSet<_> = seed_team().into_iter().map(|m| m.id).collect();
        let programs: HashSet<_> = seed_programs().into_iter().map(|p| p.id).collect();
        let initiatives: HashSet<_> = seed_initiatives().into_iter().map(|i| i.id).collect();
        assert_eq!(team.len(), 3);
        assert_eq!(programs.len(), 3);
        assert_eq!(initiatives.len(), 4);
    }

    #[test]
    fn seeded_members_use_placeholder_socials() {
        for m in seed_team() {
            assert_eq!(m.socials.github, "#");
            assert_eq!(m.socials.twitter, "#");
        }
    }
}
