use std::collections::BTreeMap;

use rocket::tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::{
    admin::{Admin, AdminId, NewAdmin},
    candidate::{Candidate, CandidateId, CandidateSpec, CandidateUpdate},
    vote::{Vote, VoteId},
};

use super::Storage;

/// The in-memory storage backend.
///
/// All state lives behind a single mutex, so every mutation is a short
/// transaction: in particular the whole check-then-write sequence of
/// [`Storage::cast_vote`] runs under the lock, which is what makes two
/// near-simultaneous casts with the same token unable to both succeed.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<State>,
}

#[derive(Debug)]
struct State {
    candidates: BTreeMap<CandidateId, Candidate>,
    votes: BTreeMap<VoteId, Vote>,
    admins: BTreeMap<AdminId, Admin>,
    next_candidate_id: CandidateId,
    next_vote_id: VoteId,
    next_admin_id: AdminId,
}

impl Default for State {
    fn default() -> Self {
        Self {
            candidates: BTreeMap::new(),
            votes: BTreeMap::new(),
            admins: BTreeMap::new(),
            next_candidate_id: 1,
            next_vote_id: 1,
            next_admin_id: 1,
        }
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[rocket::async_trait]
impl Storage for MemoryStorage {
    async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let state = self.state.lock().await;
        // IDs are monotonic, so map order is creation order.
        Ok(state.candidates.values().cloned().collect())
    }

    async fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>> {
        let state = self.state.lock().await;
        Ok(state.candidates.get(&id).cloned())
    }

    async fn create_candidate(&self, spec: CandidateSpec) -> Result<Candidate> {
        let mut state = self.state.lock().await;
        let id = state.next_candidate_id;
        state.next_candidate_id += 1;
        let candidate = Candidate::new(id, spec);
        state.candidates.insert(id, candidate.clone());
        Ok(candidate)
    }

    async fn update_candidate(
        &self,
        id: CandidateId,
        update: CandidateUpdate,
    ) -> Result<Option<Candidate>> {
        let mut state = self.state.lock().await;
        Ok(state.candidates.get_mut(&id).map(|candidate| {
            update.apply_to(candidate);
            candidate.clone()
        }))
    }

    async fn delete_candidate(&self, id: CandidateId) -> Result<bool> {
        let mut state = self.state.lock().await;
        // Vote rows referencing the candidate stay behind by design.
        Ok(state.candidates.remove(&id).is_some())
    }

    async fn list_votes(&self) -> Result<Vec<Vote>> {
        let state = self.state.lock().await;
        Ok(state.votes.values().cloned().collect())
    }

    async fn cast_vote(&self, candidate_id: CandidateId, voter_token: String) -> Result<Vote> {
        let mut state = self.state.lock().await;

        if state.votes.values().any(|v| v.voter_token == voter_token) {
            return Err(Error::bad_request("You have already voted"));
        }
        if !state.candidates.contains_key(&candidate_id) {
            return Err(Error::not_found("Candidate not found"));
        }

        let id = state.next_vote_id;
        state.next_vote_id += 1;
        let vote = Vote {
            id,
            candidate_id,
            voter_token,
        };
        state.votes.insert(id, vote.clone());
        state
            .candidates
            .get_mut(&candidate_id)
            .unwrap() // Presence already checked.
            .votes += 1;

        Ok(vote)
    }

    async fn has_voted(&self, voter_token: &str) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state.votes.values().any(|v| v.voter_token == voter_token))
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let state = self.state.lock().await;
        Ok(state
            .admins
            .values()
            .find(|admin| admin.username == username)
            .cloned())
    }

    async fn seed_admin(&self, admin: NewAdmin) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.admins.values().any(|a| a.username == admin.username) {
            return Ok(());
        }
        let id = state.next_admin_id;
        state.next_admin_id += 1;
        state.admins.insert(id, Admin { id, admin });
        Ok(())
    }
}
