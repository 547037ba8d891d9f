//! MongoDB-backed prayer store

use std::collections::HashMap;

use async_trait::async_trait;
use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};
use mongodb::options::FindOptions;
use tracing::debug;

use super::{PrayerStore, RequestFilter};
use crate::db::schemas::{
    CommentDoc, PrayerDoc, PrayerRequestDoc, COMMENT_COLLECTION, PRAYER_COLLECTION,
    PRAYER_REQUEST_COLLECTION,
};
use crate::db::{MongoClient, MongoCollection};
use crate::model::{Comment, ObjectId, Prayer, PrayerRequest};
use crate::types::Result;

/// Store over the `prayer_requests`, `comments` and `prayers` collections
pub struct MongoPrayerStore {
    mongo: MongoClient,
    requests: MongoCollection<PrayerRequestDoc>,
    comments: MongoCollection<CommentDoc>,
    prayers: MongoCollection<PrayerDoc>,
}

impl MongoPrayerStore {
    /// Open the collections and ensure their indexes
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        let requests = mongo.collection(PRAYER_REQUEST_COLLECTION).await?;
        let comments = mongo.collection(COMMENT_COLLECTION).await?;
        let prayers = mongo.collection(PRAYER_COLLECTION).await?;
        debug!("Prayer collections ready in '{}'", mongo.db_name());

        Ok(Self {
            mongo: mongo.clone(),
            requests,
            comments,
            prayers,
        })
    }

    async fn find_request_docs(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<PrayerRequest>> {
        self.requests
            .find_many(filter, options)
            .await?
            .into_iter()
            .map(PrayerRequest::try_from)
            .collect()
    }
}

/// Translate a filter into a MongoDB query document
pub(crate) fn filter_document(filter: &RequestFilter) -> Document {
    match filter {
        RequestFilter::All => doc! {},
        RequestFilter::Text(term) => {
            // The term is matched literally, never as a pattern
            let pattern = regex::escape(term);
            doc! {
                "$or": [
                    { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                    { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                    { "tags": term.as_str() },
                ]
            }
        }
        RequestFilter::Category(category) => doc! { "category": category.as_str() },
        RequestFilter::Answered(answered) => doc! { "is_answered": *answered },
        RequestFilter::Priority(priority) => doc! { "priority": priority.as_str() },
    }
}

/// Pipeline update for the pray counter
///
/// A missing counter counts from zero. `updated_at` becomes `now`, or one
/// millisecond past the stored stamp when that is later; the whole update
/// applies to the document atomically.
pub(crate) fn increment_pipeline(now: DateTime<Utc>) -> Vec<Document> {
    let now = bson::DateTime::from_chrono(now);
    vec![doc! {
        "$set": {
            "pray_count": { "$add": [{ "$ifNull": ["$pray_count", 0_i64] }, 1_i64] },
            "updated_at": { "$max": [now, { "$add": ["$updated_at", 1_i64] }] },
        }
    }]
}

/// Read a `$sum` result, which MongoDB widens as it sees fit
fn bson_to_u64(value: Option<&Bson>) -> u64 {
    match value {
        Some(Bson::Int32(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Int64(n)) => u64::try_from(*n).unwrap_or(0),
        Some(Bson::Double(n)) if *n > 0.0 => *n as u64,
        _ => 0,
    }
}

#[async_trait]
impl PrayerStore for MongoPrayerStore {
    async fn insert_request(&self, request: &PrayerRequest) -> Result<()> {
        self.requests
            .insert_one(&PrayerRequestDoc::from(request))
            .await
    }

    async fn find_request(&self, id: ObjectId) -> Result<Option<PrayerRequest>> {
        self.requests
            .find_one(doc! { "_id": id })
            .await?
            .map(PrayerRequest::try_from)
            .transpose()
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<PrayerRequest>> {
        self.find_request_docs(filter_document(filter), None).await
    }

    async fn find_recent(&self, limit: u64) -> Result<Vec<PrayerRequest>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1, "_id": 1 })
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        self.find_request_docs(doc! {}, Some(options)).await
    }

    async fn replace_request(&self, request: &PrayerRequest) -> Result<bool> {
        let matched = self
            .requests
            .replace_one(doc! { "_id": request.id }, &PrayerRequestDoc::from(request))
            .await?;
        Ok(matched > 0)
    }

    async fn delete_request(&self, id: ObjectId) -> Result<bool> {
        Ok(self.requests.delete_one(doc! { "_id": id }).await? > 0)
    }

    async fn increment_pray_count(&self, id: ObjectId, now: DateTime<Utc>) -> Result<bool> {
        let result = self
            .requests
            .update_one(doc! { "_id": id }, increment_pipeline(now))
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count_requests(&self, filter: &RequestFilter) -> Result<u64> {
        self.requests.count(filter_document(filter)).await
    }

    async fn sum_pray_count(&self) -> Result<u64> {
        let results = self
            .requests
            .aggregate(vec![doc! {
                "$group": { "_id": Bson::Null, "total": { "$sum": "$pray_count" } }
            }])
            .await?;

        // An empty collection yields no group at all
        Ok(results
            .first()
            .map(|group| bson_to_u64(group.get("total")))
            .unwrap_or(0))
    }

    async fn count_by_category(&self) -> Result<HashMap<String, u64>> {
        let results = self
            .requests
            .aggregate(vec![doc! {
                "$group": { "_id": "$category", "count": { "$sum": 1 } }
            }])
            .await?;

        let mut counts = HashMap::new();
        for group in results {
            // Documents without the field group under null
            let category = group.get_str("_id").unwrap_or("").to_string();
            *counts.entry(category).or_insert(0) += bson_to_u64(group.get("count"));
        }
        Ok(counts)
    }

    async fn insert_comment(&self, comment: &Comment) -> Result<()> {
        self.comments.insert_one(&CommentDoc::from(comment)).await
    }

    async fn find_comments(&self, prayer_request_id: ObjectId) -> Result<Vec<Comment>> {
        let docs = self
            .comments
            .find_many(doc! { "prayer_request_id": prayer_request_id }, None)
            .await?;
        Ok(docs.into_iter().map(Comment::from).collect())
    }

    async fn insert_prayer(&self, prayer: &Prayer) -> Result<()> {
        self.prayers.insert_one(&PrayerDoc::from(prayer)).await
    }

    async fn find_prayers(&self, prayer_request_id: ObjectId) -> Result<Vec<Prayer>> {
        let docs = self
            .prayers
            .find_many(doc! { "prayer_request_id": prayer_request_id }, None)
            .await?;
        Ok(docs.into_iter().map(Prayer::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        self.mongo.ping().await
    }
}
