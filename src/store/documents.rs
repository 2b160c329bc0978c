use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;

use super::{insertion_order, ClaimStore};
use crate::db::entities::claim_document;
use crate::domain::{new_id, now_timestamp, DocumentKind};
use crate::error::{Result, ServerError};

/// Metadata of a file already written to the document store
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub kind: DocumentKind,
    pub filename: String,
    pub path: String,
    pub mimetype: String,
    pub size: i64,
}

pub struct DocumentStore<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DocumentStore<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_claim_ref(&self, claim_id: &str) -> Result<Vec<claim_document::Model>> {
        Ok(claim_document::Entity::find()
            .filter(claim_document::Column::ClaimId.eq(claim_id))
            .order_by(insertion_order("claim_documents"), Order::Asc)
            .all(self.db)
            .await?)
    }
}

impl<'a, C: ConnectionTrait + TransactionTrait> DocumentStore<'a, C> {
    /// Attach a document to a claim. Single-slot kinds replace the
    /// previous upload of the same kind.
    ///
    /// The replacement and the insert share one transaction, so a failed
    /// insert keeps the previous document.
    pub async fn attach(&self, claim_id: &str, new: NewDocument) -> Result<claim_document::Model> {
        if new.filename.trim().is_empty() || new.path.trim().is_empty() {
            return Err(ServerError::InvalidRequest("filename and path are required".to_string()));
        }
        if new.size < 0 {
            return Err(ServerError::InvalidRequest(format!("Invalid document size: {}", new.size)));
        }

        let txn = self.db.begin().await?;
        match write_document(&txn, claim_id, new).await {
            Ok(document) => {
                txn.commit().await?;
                Ok(document)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Rollback failed for claim {} document: {}", claim_id, rollback_err);
                }
                Err(e)
            }
        }
    }
}

async fn write_document<T: ConnectionTrait>(txn: &T, claim_id: &str, new: NewDocument) -> Result<claim_document::Model> {
    let claim = ClaimStore::new(txn).get(claim_id).await?;

    if new.kind.is_single() {
        let replaced = claim_document::Entity::delete_many()
            .filter(claim_document::Column::ClaimId.eq(claim.id.as_str()))
            .filter(claim_document::Column::Kind.eq(new.kind.as_str()))
            .exec(txn)
            .await?;
        if replaced.rows_affected > 0 {
            tracing::debug!("Replacing {} document on claim {}", new.kind.as_str(), claim.id);
        }
    }

    let document = claim_document::ActiveModel {
        id: Set(new_id()),
        claim_id: Set(claim.id),
        kind: Set(new.kind.as_str().to_string()),
        filename: Set(new.filename),
        path: Set(new.path),
        mimetype: Set(new.mimetype),
        size: Set(new.size),
        created_at: Set(now_timestamp()),
    }
    .insert(txn)
    .await?;

    Ok(document)
}
