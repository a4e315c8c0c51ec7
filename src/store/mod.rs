//! Document store client
//!
//! Uniform CRUD and query surface over the embedded SurrealDB instance.
//! Every collection is a schemaless table; cross-entity links are stored in
//! their string form (`table:key`, see `models::serde_helpers`), parsed back
//! to [`RecordId`] on read and resolved with explicit lookups, never joined
//! more than one level deep.
//!
//! Failure semantics are deliberately flat: any transport or query error
//! surfaces as [`StoreError::Unavailable`]; absence is `None`, with no
//! retry and no backoff.

pub mod filter;
pub mod page;
pub mod projection;

pub use filter::{Filter, FilterValue, Op, Sort};
pub use page::{Page, PageRequest};

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::AppError;

const NAMESPACE: &str = "comanda";
const DATABASE: &str = "main";

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Documents that expose their own record id (needed to re-align batch
/// resolution results with the requested reference order)
pub trait Identified {
    fn record_id(&self) -> Option<&RecordId>;
}

/// Store client - owns the embedded database handle
#[derive(Clone)]
pub struct Client {
    db: Surreal<Db>,
}

impl Client {
    /// Open (or create) the on-disk store
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        tracing::info!(path = %path.display(), "Store opened");
        Ok(Self { db })
    }

    /// Open an in-memory store (tests)
    pub async fn memory() -> StoreResult<Self> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        Ok(Self { db })
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Insert a new document with an auto-generated id
    pub async fn insert<T, C>(&self, collection: &str, body: C) -> StoreResult<T>
    where
        T: DeserializeOwned,
        C: Serialize + 'static,
    {
        filter::check_ident(collection)?;
        let created: Option<T> = self.db.create(collection.to_string()).content(body).await?;
        created.ok_or_else(|| {
            StoreError::Unavailable(format!("insert into '{collection}' returned no document"))
        })
    }

    /// Fetch a document by id; absent (or empty) reads as `None`
    pub async fn get_by_id<T>(&self, id: &RecordId) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let doc: Option<T> = self.db.select(id.clone()).await?;
        Ok(doc)
    }

    /// First document matching the filter, store-defined order
    pub async fn get_one<T>(&self, collection: &str, filter: &Filter) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        filter::check_ident(collection)?;
        let (clause, binds) = filter.compile()?;
        let sql = format!("SELECT * FROM type::table($tb){clause} LIMIT 1");

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for (name, value) in binds {
            query = query.bind((name, value));
        }
        let rows: Vec<T> = query.await?.take(0)?;
        Ok(rows.into_iter().next())
    }

    /// All documents matching the filter
    pub async fn get_many<T>(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        filter::check_ident(collection)?;
        let (clause, binds) = filter.compile()?;
        let order = match sort {
            Some(sort) => sort.compile()?,
            None => String::new(),
        };
        let sql = format!("SELECT * FROM type::table($tb){clause}{order}");

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for (name, value) in binds {
            query = query.bind((name, value));
        }
        let rows: Vec<T> = query.await?.take(0)?;
        Ok(rows)
    }

    /// Count documents matching the filter
    pub async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        filter::check_ident(collection)?;
        let (clause, binds) = filter.compile()?;
        let sql = format!("SELECT count() AS total FROM type::table($tb){clause} GROUP ALL");

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for (name, value) in binds {
            query = query.bind((name, value));
        }

        #[derive(serde::Deserialize)]
        struct CountRow {
            total: usize,
        }

        let rows: Vec<CountRow> = query.await?.take(0)?;
        Ok(rows.into_iter().next().map(|row| row.total).unwrap_or(0))
    }

    /// One page of documents plus metadata
    ///
    /// Runs the count query and a single windowed fetch. Page limits and
    /// offsets are inlined as integers, never as user text.
    pub async fn get_page<T>(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&Sort>,
        page: PageRequest,
    ) -> StoreResult<Page<T>>
    where
        T: DeserializeOwned,
    {
        filter::check_ident(collection)?;
        let total_docs = self.count(collection, filter).await?;

        let (clause, binds) = filter.compile()?;
        let order = match sort {
            Some(sort) => sort.compile()?,
            None => String::new(),
        };
        let sql = format!(
            "SELECT * FROM type::table($tb){clause}{order} LIMIT {} START {}",
            page.limit(),
            page.start()
        );

        let mut query = self.db.query(sql).bind(("tb", collection.to_string()));
        for (name, value) in binds {
            query = query.bind((name, value));
        }
        let docs: Vec<T> = query.await?.take(0)?;

        Ok(Page::assemble(docs, total_docs, page))
    }

    /// Replace the entire document (read-modify-write contract)
    ///
    /// Returns `None` when the record does not exist.
    pub async fn replace<T, C>(&self, id: &RecordId, body: C) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
        C: Serialize + 'static,
    {
        let updated: Option<T> = self.db.update(id.clone()).content(body).await?;
        Ok(updated)
    }

    /// Replace the document only if its `version` field still matches
    ///
    /// Returns `None` on a version conflict (or a missing record); the
    /// caller decides whether to retry or give up. The replacement body
    /// must already carry the incremented version.
    pub async fn replace_if_version<T, C>(
        &self,
        id: &RecordId,
        body: C,
        expected_version: i64,
    ) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
        C: Serialize + 'static,
    {
        let rows: Vec<T> = self
            .db
            .query("UPDATE $id CONTENT $body WHERE version = $expected")
            .bind(("id", id.clone()))
            .bind(("body", body))
            .bind(("expected", expected_version))
            .await?
            .take(0)?;
        Ok(rows.into_iter().next())
    }

    /// Delete a document by id; deleting a missing document is a no-op
    pub async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.db
            .query("DELETE $id")
            .bind(("id", id.clone()))
            .await?
            .check()?;
        Ok(())
    }

    /// Delete every document in a collection
    pub async fn delete_all(&self, collection: &str) -> StoreResult<()> {
        filter::check_ident(collection)?;
        self.db
            .query("DELETE type::table($tb)")
            .bind(("tb", collection.to_string()))
            .await?
            .check()?;
        Ok(())
    }

    /// Follow a stored reference to its document
    pub async fn resolve<T>(&self, reference: &RecordId) -> StoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.get_by_id(reference).await
    }

    /// Resolve a batch of references in a single multi-get
    ///
    /// The result is aligned with the input: slot `i` holds the document
    /// behind `refs[i]`, or `None` when the reference is dangling.
    pub async fn resolve_many<T>(&self, refs: &[RecordId]) -> StoreResult<Vec<Option<T>>>
    where
        T: DeserializeOwned + Identified + Clone,
    {
        if refs.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<T> = self
            .db
            .query("SELECT * FROM $refs")
            .bind(("refs", refs.to_vec()))
            .await?
            .take(0)?;

        let aligned = refs
            .iter()
            .map(|reference| {
                rows.iter()
                    .find(|doc| doc.record_id() == Some(reference))
                    .cloned()
            })
            .collect();
        Ok(aligned)
    }
}
