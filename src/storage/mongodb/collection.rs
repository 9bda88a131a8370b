use std::ops::Deref;

use mongodb::{
    bson::doc, error::Error as DbError, options::IndexOptions, Collection, Database, IndexModel,
};

use super::{
    document::{AdminDocument, CandidateDocument, VoteDocument},
    Counter,
};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl MongoCollection for CandidateDocument {
    const NAME: &'static str = "candidates";
}

impl MongoCollection for VoteDocument {
    const NAME: &'static str = "votes";
}

impl MongoCollection for AdminDocument {
    const NAME: &'static str = "admins";
}

impl MongoCollection for Counter {
    const NAME: &'static str = "counters";
}

/// Ensure that all the required indexes exist on the given database.
///
/// The unique index on `voter_token` is what enforces one-vote-per-token
/// under concurrency: of two simultaneous inserts with the same token,
/// the storage engine admits exactly one.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    let vote_index = IndexModel::builder()
        .keys(doc! {"voter_token": 1})
        .options(unique.clone())
        .build();
    Coll::<VoteDocument>::from_db(db)
        .create_index(vote_index, None)
        .await?;

    let admin_index = IndexModel::builder()
        .keys(doc! {"username": 1})
        .options(unique)
        .build();
    Coll::<AdminDocument>::from_db(db)
        .create_index(admin_index, None)
        .await?;

    Ok(())
}
