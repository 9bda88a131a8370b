//! The storage service: owns candidate, vote, and admin records behind a
//! backend-agnostic contract.
//!
//! A backend is selected once at ignite time (see
//! [`crate::config::StorageFairing`]) and managed as [`DynStorage`]; the
//! request layer depends only on the [`Storage`] trait.

mod memory;
pub mod mongodb;

pub use memory::MemoryStorage;
pub use mongodb::MongoStorage;

use crate::error::Result;
use crate::model::{
    admin::{Admin, NewAdmin},
    candidate::{Candidate, CandidateId, CandidateSpec, CandidateUpdate},
    stats::VoteStats,
    vote::Vote,
};

/// The storage backend in managed state.
pub type DynStorage = Box<dyn Storage>;

#[rocket::async_trait]
pub trait Storage: Send + Sync {
    /// All candidates, ordered by creation.
    async fn list_candidates(&self) -> Result<Vec<Candidate>>;

    /// A single candidate; absence is a valid outcome, not an error.
    async fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>>;

    /// Create a candidate with a fresh ID and an empty tally.
    async fn create_candidate(&self, spec: CandidateSpec) -> Result<Candidate>;

    /// Apply only the supplied fields; `None` when the ID is unknown.
    async fn update_candidate(
        &self,
        id: CandidateId,
        update: CandidateUpdate,
    ) -> Result<Option<Candidate>>;

    /// Remove a candidate. Existing vote rows referencing it are kept;
    /// returns whether a record was removed.
    async fn delete_candidate(&self, id: CandidateId) -> Result<bool>;

    /// All stored vote rows, orphans included.
    async fn list_votes(&self) -> Result<Vec<Vote>>;

    /// Insert a vote and increment the candidate's tally by exactly one.
    ///
    /// The token check, the insert, and the increment are atomic with
    /// respect to concurrent casts: of two calls bearing the same token,
    /// exactly one succeeds. Fails with a conflict if the token has voted,
    /// or not-found if the candidate doesn't exist.
    async fn cast_vote(&self, candidate_id: CandidateId, voter_token: String) -> Result<Vote>;

    /// Whether any stored vote carries this exact token.
    async fn has_voted(&self, voter_token: &str) -> Result<bool>;

    /// Look up an admin account; absence is a valid outcome.
    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;

    /// Create the operator account at startup if it doesn't already exist.
    /// Idempotent.
    async fn seed_admin(&self, admin: NewAdmin) -> Result<()>;

    /// Aggregate tallies across all candidates.
    async fn vote_stats(&self) -> Result<VoteStats> {
        Ok(VoteStats::from_candidates(&self.list_candidates().await?))
    }
}
