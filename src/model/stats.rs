use serde::{Deserialize, Serialize};

use crate::model::candidate::{Candidate, CandidateId};

/// One candidate's line in the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStats {
    pub id: CandidateId,
    pub name: String,
    pub votes: u32,
    /// Share of the total vote, always with exactly one fractional digit.
    pub percentage: String,
}

/// Aggregated tallies across all candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStats {
    pub candidates: Vec<CandidateStats>,
    pub total_votes: u32,
}

impl VoteStats {
    pub fn from_candidates(candidates: &[Candidate]) -> Self {
        let total_votes = candidates.iter().map(|c| c.votes).sum();
        let candidates = candidates
            .iter()
            .map(|candidate| CandidateStats {
                id: candidate.id,
                name: candidate.name.clone(),
                votes: candidate.votes,
                percentage: percentage(candidate.votes, total_votes),
            })
            .collect();
        Self {
            candidates,
            total_votes,
        }
    }
}

/// One-decimal percentage string. A zero denominator gives the literal
/// `"0.0"` rather than computing 0/0.
pub fn percentage(part: u32, whole: u32) -> String {
    if whole == 0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", f64::from(part) / f64::from(whole) * 100.0)
    }
}
