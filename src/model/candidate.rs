use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type CandidateId = u32;

/// The fields an admin supplies when creating a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpec {
    pub name: String,
    pub party: String,
    pub experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_image: Option<String>,
}

impl CandidateSpec {
    /// Reject empty required fields.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name must be a non-empty string".to_string());
        }
        if self.party.trim().is_empty() {
            errors.push("party must be a non-empty string".to_string());
        }
        if self.experience.trim().is_empty() {
            errors.push("experience must be a non-empty string".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

/// A stored candidate, with its unique ID and running tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(flatten)]
    pub spec: CandidateSpec,
    /// The tally. Only ever mutated by an accepted vote.
    pub votes: u32,
}

impl Candidate {
    /// A fresh candidate starts with an empty tally.
    pub fn new(id: CandidateId, spec: CandidateSpec) -> Self {
        Self { id, spec, votes: 0 }
    }
}

impl Deref for Candidate {
    type Target = CandidateSpec;

    fn deref(&self) -> &Self::Target {
        &self.spec
    }
}

impl DerefMut for Candidate {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.spec
    }
}

/// A partial update to a candidate: only supplied fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_image: Option<String>,
}

impl CandidateUpdate {
    /// Reject supplied-but-empty fields; absent fields are fine.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        for (field, value) in [
            ("name", &self.name),
            ("party", &self.party),
            ("experience", &self.experience),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    errors.push(format!("{field} must be a non-empty string"));
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Overwrite the supplied fields, leaving the rest untouched.
    pub fn apply_to(self, candidate: &mut Candidate) {
        if let Some(name) = self.name {
            candidate.spec.name = name;
        }
        if let Some(party) = self.party {
            candidate.spec.party = party;
        }
        if let Some(experience) = self.experience {
            candidate.spec.experience = experience;
        }
        if let Some(symbol_image) = self.symbol_image {
            candidate.spec.symbol_image = Some(symbol_image);
        }
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl CandidateSpec {
        pub fn example1() -> Self {
            Self {
                name: "John Mitchell".to_string(),
                party: "Unity Party".to_string(),
                experience: "15 years in public service".to_string(),
                symbol_image: None,
            }
        }

        pub fn example2() -> Self {
            Self {
                name: "Sarah Chen".to_string(),
                party: "Progress Alliance".to_string(),
                experience: "Former Mayor, 8 years".to_string(),
                symbol_image: Some("https://example.com/symbols/chen.png".to_string()),
            }
        }

        pub fn example3() -> Self {
            Self {
                name: "Robert Taylor".to_string(),
                party: "Independent".to_string(),
                experience: "Business Leader, Community Advocate".to_string(),
                symbol_image: None,
            }
        }
    }
}
