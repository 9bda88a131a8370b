use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::candidate::CandidateId;

pub type VoteId = u32;

/// A vote that a client wishes to cast.
///
/// The voter token is an opaque client-generated string used as the sole
/// deduplication key; it is not a verified identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSpec {
    pub candidate_id: CandidateId,
    pub voter_token: String,
}

impl VoteSpec {
    pub fn validate(&self) -> Result<()> {
        if self.voter_token.trim().is_empty() {
            return Err(Error::Validation(vec![
                "voterToken must be a non-empty string".to_string(),
            ]));
        }
        Ok(())
    }
}

/// A stored vote row. Immutable once created; never updated or deleted,
/// even when the referenced candidate is later removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: VoteId,
    pub candidate_id: CandidateId,
    pub voter_token: String,
}
