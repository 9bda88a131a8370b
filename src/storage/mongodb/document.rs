//! DB representations of the domain types: snake_case field names, with the
//! auto-increment ID stored as `_id`.

use serde::{Deserialize, Serialize};

use crate::model::{
    admin::{Admin, AdminId, NewAdmin},
    candidate::{Candidate, CandidateId, CandidateSpec},
    vote::{Vote, VoteId},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDocument {
    #[serde(rename = "_id")]
    pub id: CandidateId,
    pub name: String,
    pub party: String,
    pub experience: String,
    #[serde(default)]
    pub symbol_image: Option<String>,
    pub votes: u32,
}

impl CandidateDocument {
    pub fn new(id: CandidateId, spec: CandidateSpec) -> Self {
        Self {
            id,
            name: spec.name,
            party: spec.party,
            experience: spec.experience,
            symbol_image: spec.symbol_image,
            votes: 0,
        }
    }
}

impl From<CandidateDocument> for Candidate {
    fn from(doc: CandidateDocument) -> Self {
        Self {
            id: doc.id,
            spec: CandidateSpec {
                name: doc.name,
                party: doc.party,
                experience: doc.experience,
                symbol_image: doc.symbol_image,
            },
            votes: doc.votes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteDocument {
    #[serde(rename = "_id")]
    pub id: VoteId,
    pub candidate_id: CandidateId,
    pub voter_token: String,
}

impl From<VoteDocument> for Vote {
    fn from(doc: VoteDocument) -> Self {
        Self {
            id: doc.id,
            candidate_id: doc.candidate_id,
            voter_token: doc.voter_token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDocument {
    #[serde(rename = "_id")]
    pub id: AdminId,
    pub username: String,
    pub password: String,
}

impl AdminDocument {
    pub fn new(id: AdminId, admin: NewAdmin) -> Self {
        Self {
            id,
            username: admin.username,
            password: admin.password,
        }
    }
}

impl From<AdminDocument> for Admin {
    fn from(doc: AdminDocument) -> Self {
        Self {
            id: doc.id,
            admin: NewAdmin {
                username: doc.username,
                password: doc.password,
            },
        }
    }
}
