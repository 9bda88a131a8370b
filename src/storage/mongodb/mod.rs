//! The MongoDB storage backend.
//!
//! IDs are auto-increment integers driven by [`Counter`] documents, the
//! one-vote-per-token rule is enforced by a unique index on `voter_token`,
//! and the vote insert plus tally increment run in one transaction.

mod collection;
mod counter;
pub mod document;

pub use collection::{ensure_indexes_exist, Coll, MongoCollection};
pub use counter::{ensure_counters_exist, Counter};

use mongodb::{
    bson::{doc, Document},
    error::{Error as DbError, ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client, Database,
};
use rocket::futures::TryStreamExt;

use crate::error::{Error, Result};
use crate::model::{
    admin::{Admin, NewAdmin},
    candidate::{Candidate, CandidateId, CandidateSpec, CandidateUpdate},
    vote::Vote,
};

use self::counter::{ADMIN_ID_COUNTER, CANDIDATE_ID_COUNTER, VOTE_ID_COUNTER};
use self::document::{AdminDocument, CandidateDocument, VoteDocument};

use super::Storage;

/// The mongodb crate doesn't provide error code constants; this is the
/// server's code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

/// Was this write rejected by a unique index?
fn is_duplicate_key(err: &DbError) -> bool {
    if let ErrorKind::Write(WriteFailure::WriteError(ref e)) = *err.kind {
        return e.code == DUPLICATE_KEY;
    }
    false
}

/// Filter on the integer `_id`. Mongo compares numerics across types, so
/// i64 matches however the ID was stored.
fn id_filter(id: u32) -> Document {
    doc! { "_id": i64::from(id) }
}

pub struct MongoStorage {
    client: Client,
    db: Database,
}

impl MongoStorage {
    pub fn new(client: Client, db: Database) -> Self {
        Self { client, db }
    }

    fn coll<T: MongoCollection>(&self) -> Coll<T> {
        Coll::from_db(&self.db)
    }
}

#[rocket::async_trait]
impl Storage for MongoStorage {
    async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let docs: Vec<CandidateDocument> = self
            .coll::<CandidateDocument>()
            .find(None, options)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(Candidate::from).collect())
    }

    async fn get_candidate(&self, id: CandidateId) -> Result<Option<Candidate>> {
        let doc = self
            .coll::<CandidateDocument>()
            .find_one(id_filter(id), None)
            .await?;
        Ok(doc.map(Candidate::from))
    }

    async fn create_candidate(&self, spec: CandidateSpec) -> Result<Candidate> {
        let id = Counter::next(&self.coll(), CANDIDATE_ID_COUNTER).await?;
        let doc = CandidateDocument::new(id, spec);
        self.coll::<CandidateDocument>()
            .insert_one(&doc, None)
            .await?;
        Ok(doc.into())
    }

    async fn update_candidate(
        &self,
        id: CandidateId,
        update: CandidateUpdate,
    ) -> Result<Option<Candidate>> {
        let mut set = Document::new();
        if let Some(name) = update.name {
            set.insert("name", name);
        }
        if let Some(party) = update.party {
            set.insert("party", party);
        }
        if let Some(experience) = update.experience {
            set.insert("experience", experience);
        }
        if let Some(symbol_image) = update.symbol_image {
            set.insert("symbol_image", symbol_image);
        }
        if set.is_empty() {
            // Nothing to apply; report the current record.
            return self.get_candidate(id).await;
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let doc = self
            .coll::<CandidateDocument>()
            .find_one_and_update(id_filter(id), doc! { "$set": set }, options)
            .await?;
        Ok(doc.map(Candidate::from))
    }

    async fn delete_candidate(&self, id: CandidateId) -> Result<bool> {
        // Vote rows referencing the candidate stay behind by design.
        let result = self
            .coll::<CandidateDocument>()
            .delete_one(id_filter(id), None)
            .await?;
        Ok(result.deleted_count == 1)
    }

    async fn list_votes(&self) -> Result<Vec<Vote>> {
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let docs: Vec<VoteDocument> = self
            .coll::<VoteDocument>()
            .find(None, options)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(Vote::from).collect())
    }

    async fn cast_vote(&self, candidate_id: CandidateId, voter_token: String) -> Result<Vote> {
        let candidates = self.coll::<CandidateDocument>();
        let votes = self.coll::<VoteDocument>();

        let id = Counter::next(&self.coll(), VOTE_ID_COUNTER).await?;
        let vote = VoteDocument {
            id,
            candidate_id,
            voter_token,
        };

        // Insert the vote and increment the tally in one transaction, so a
        // failed cast is never partially visible.
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;

        match votes.insert_one_with_session(&vote, None, &mut session).await {
            Ok(_) => {}
            Err(err) if is_duplicate_key(&err) => {
                session.abort_transaction().await?;
                return Err(Error::bad_request("You have already voted"));
            }
            Err(err) => return Err(err.into()),
        }

        let update = doc! {
            "$inc": { "votes": 1 }
        };
        let result = candidates
            .update_one_with_session(id_filter(candidate_id), update, None, &mut session)
            .await?;
        if result.matched_count != 1 {
            session.abort_transaction().await?;
            return Err(Error::not_found("Candidate not found"));
        }

        session.commit_transaction().await?;
        Ok(vote.into())
    }

    async fn has_voted(&self, voter_token: &str) -> Result<bool> {
        let vote = self
            .coll::<VoteDocument>()
            .find_one(doc! { "voter_token": voter_token }, None)
            .await?;
        Ok(vote.is_some())
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let doc = self
            .coll::<AdminDocument>()
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(doc.map(Admin::from))
    }

    async fn seed_admin(&self, admin: NewAdmin) -> Result<()> {
        let admins = self.coll::<AdminDocument>();
        let with_username = doc! {
            "username": &admin.username,
        };
        if admins.find_one(with_username, None).await?.is_some() {
            return Ok(());
        }

        let id = Counter::next(&self.coll(), ADMIN_ID_COUNTER).await?;
        match admins
            .insert_one(AdminDocument::new(id, admin), None)
            .await
        {
            Ok(_) => Ok(()),
            // Another instance seeded first; the account exists either way.
            Err(err) if is_duplicate_key(&err) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
