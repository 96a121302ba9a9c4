//! Database repository for the `properties` and `shortlists` collections.
//!
//! Rows are mapped to the canonical models here, so callers never see the
//! stored JSON shapes.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Availability, Category, CreatePropertyRequest, MediaDocument, Property, Shortlist,
    UpdatePropertyRequest,
};

const PROPERTY_COLUMNS: &str = "id, title, address, price, category, availability, landlord_contact, notes, media, created_at, updated_at";

const SHORTLIST_COLUMNS: &str =
    "id, owner_ref, label, property_ids, share_token, is_active, created_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PROPERTY OPERATIONS ====================

    /// List all properties in store order.
    pub async fn list_properties(&self) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM properties", PROPERTY_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        Ok(readable_properties(&rows))
    }

    /// Get a property by ID.
    pub async fn get_property(&self, id: &str) -> Result<Option<Property>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM properties WHERE id = ?",
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(property_from_row).transpose()
    }

    /// Fetch several properties at once.
    ///
    /// The result follows the order of `ids`; ids with no record are skipped.
    pub async fn get_properties_by_ids(&self, ids: &[String]) -> Result<Vec<Property>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM properties WHERE id IN ({})",
            PROPERTY_COLUMNS, placeholders
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut found = readable_properties(&rows);

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(pos) = found.iter().position(|p| &p.id == id) {
                ordered.push(found.swap_remove(pos));
            }
        }
        Ok(ordered)
    }

    /// Create a new property.
    pub async fn create_property(
        &self,
        request: &CreatePropertyRequest,
    ) -> Result<Property, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();
        let availability = request.availability.unwrap_or_default();
        let media = request.media_document();
        let media_json = serde_json::to_string(&media)?;

        sqlx::query(
            "INSERT INTO properties (id, title, address, price, category, availability, landlord_contact, notes, media, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(request.title.trim())
        .bind(request.address.trim())
        .bind(request.price)
        .bind(request.category.as_str())
        .bind(availability.as_str())
        .bind(&request.landlord_contact)
        .bind(&request.notes)
        .bind(&media_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Property {
            id,
            title: request.title.trim().to_string(),
            address: request.address.trim().to_string(),
            price: request.price,
            category: request.category,
            availability,
            landlord_contact: request.landlord_contact.clone(),
            notes: request.notes.clone(),
            media,
            created_at: now,
            updated_at: None,
        })
    }

    /// Apply a partial update and stamp `updated_at`.
    pub async fn update_property(
        &self,
        id: &str,
        request: &UpdatePropertyRequest,
    ) -> Result<Property, AppError> {
        let existing = self
            .get_property(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", id)))?;

        let now = timestamp();

        let title = request.title.clone().unwrap_or(existing.title);
        let address = request.address.clone().unwrap_or(existing.address);
        let price = request.price.unwrap_or(existing.price);
        let category = request.category.unwrap_or(existing.category);
        let availability = request.availability.unwrap_or(existing.availability);
        let landlord_contact = match &request.landlord_contact {
            Some(value) => value.clone(),
            None => existing.landlord_contact,
        };
        let notes = match &request.notes {
            Some(value) => value.clone(),
            None => existing.notes,
        };
        let media = match &request.media {
            Some(items) => MediaDocument::from_items(items.clone()),
            None => existing.media,
        };
        let media_json = serde_json::to_string(&media)?;

        let result = sqlx::query(
            "UPDATE properties SET title = ?, address = ?, price = ?, category = ?, availability = ?, landlord_contact = ?, notes = ?, media = ?, updated_at = ? WHERE id = ?"
        )
        .bind(&title)
        .bind(&address)
        .bind(price)
        .bind(category.as_str())
        .bind(availability.as_str())
        .bind(&landlord_contact)
        .bind(&notes)
        .bind(&media_json)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Property {} not found", id)));
        }

        Ok(Property {
            id: id.to_string(),
            title,
            address,
            price,
            category,
            availability,
            landlord_contact,
            notes,
            media,
            created_at: existing.created_at,
            updated_at: Some(now),
        })
    }

    /// Remove a property record. Media cleanup is the caller's job.
    pub async fn delete_property(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Property {} not found", id)));
        }

        Ok(())
    }

    // ==================== SHORTLIST OPERATIONS ====================

    /// Insert a shortlist. The caller supplies the normalized fields and token.
    pub async fn create_shortlist(
        &self,
        owner_ref: &str,
        label: &str,
        property_ids: &[String],
        share_token: &str,
    ) -> Result<Shortlist, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = timestamp();
        let ids_json = serde_json::to_string(property_ids)?;

        sqlx::query(
            "INSERT INTO shortlists (id, owner_ref, label, property_ids, share_token, is_active, created_at) VALUES (?, ?, ?, ?, ?, 1, ?)"
        )
        .bind(&id)
        .bind(owner_ref)
        .bind(label)
        .bind(&ids_json)
        .bind(share_token)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Shortlist {
            id,
            owner_ref: owner_ref.to_string(),
            label: label.to_string(),
            property_ids: property_ids.to_vec(),
            share_token: share_token.to_string(),
            is_active: true,
            created_at: now,
        })
    }

    /// Look up an active shortlist by its share token.
    ///
    /// Unknown and deactivated tokens both yield `None`.
    pub async fn get_shortlist_by_token(&self, token: &str) -> Result<Option<Shortlist>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM shortlists WHERE share_token = ? AND is_active = 1 LIMIT 1",
            SHORTLIST_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(shortlist_from_row).transpose()
    }

    /// List all shortlists, newest first.
    pub async fn list_shortlists(&self) -> Result<Vec<Shortlist>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM shortlists ORDER BY created_at DESC",
            SHORTLIST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(shortlist_from_row).collect()
    }

    /// Turn off public access for a shortlist. The token is kept, never reissued.
    pub async fn deactivate_shortlist(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE shortlists SET is_active = 0 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shortlist {} not found", id)));
        }

        Ok(())
    }
}

// Helper functions for row conversion

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn property_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Property, AppError> {
    let id: String = row.get("id");
    let category_str: String = row.get("category");
    let availability_str: String = row.get("availability");
    let media_str: String = row.get("media");

    let category = Category::parse(&category_str).ok_or_else(|| {
        AppError::Internal(format!(
            "Property {} has unknown category '{}'",
            id, category_str
        ))
    })?;
    let availability = Availability::parse(&availability_str).unwrap_or_default();
    let media: MediaDocument = serde_json::from_str(&media_str).unwrap_or_else(|e| {
        tracing::warn!("Property {} has unreadable media document: {}", id, e);
        MediaDocument::default()
    });

    Ok(Property {
        id,
        title: row.get("title"),
        address: row.get("address"),
        price: row.get("price"),
        category,
        availability,
        landlord_contact: row.get("landlord_contact"),
        notes: row.get("notes"),
        media,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn shortlist_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Shortlist, AppError> {
    let id: String = row.get("id");
    let is_active: i32 = row.get("is_active");
    let ids_str: String = row.get("property_ids");
    let property_ids: Vec<String> = serde_json::from_str(&ids_str).map_err(|e| {
        tracing::error!("Shortlist {} has unreadable property ids: {}", id, e);
        AppError::Internal(format!("Shortlist {} is corrupt", id))
    })?;

    Ok(Shortlist {
        id,
        owner_ref: row.get("owner_ref"),
        label: row.get("label"),
        property_ids,
        share_token: row.get("share_token"),
        is_active: is_active != 0,
        created_at: row.get("created_at"),
    })
}

/// Map rows to properties, skipping any that cannot be read.
fn readable_properties(rows: &[sqlx::sqlite::SqliteRow]) -> Vec<Property> {
    rows.iter()
        .filter_map(|row| match property_from_row(row) {
            Ok(property) => Some(property),
            Err(e) => {
                tracing::warn!("Skipping unreadable property: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{MediaItem, MediaKind};
    use tempfile::TempDir;

    async fn repository() -> (Repository, SqlitePool, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("repo.sqlite")).await.unwrap();
        (Repository::new(pool.clone()), pool, dir)
    }

    fn listing(title: &str) -> CreatePropertyRequest {
        CreatePropertyRequest {
            title: title.to_string(),
            address: "Riverside Drive, Nairobi".to_string(),
            price: 50_000,
            category: Category::TwoBedroom,
            availability: None,
            landlord_contact: Some("0711 222 333".to_string()),
            notes: Some("Gate code 4411".to_string()),
            media: vec![MediaItem {
                url: "https://h/x/image/upload/v1/properties/a.jpg".to_string(),
                host_id: Some("properties/a".to_string()),
                original_name: None,
                byte_size: None,
                width: None,
                height: None,
                duration_seconds: None,
                kind: MediaKind::Image,
            }],
            photos: vec![],
            videos: vec![],
        }
    }

    #[tokio::test]
    async fn test_update_can_clear_optional_text() {
        let (repo, _pool, _dir) = repository().await;
        let created = repo.create_property(&listing("A")).await.unwrap();

        let untouched = repo
            .update_property(&created.id, &UpdatePropertyRequest::default())
            .await
            .unwrap();
        assert_eq!(untouched.notes.as_deref(), Some("Gate code 4411"));

        let request = UpdatePropertyRequest {
            landlord_contact: Some(None),
            notes: Some(None),
            ..Default::default()
        };
        repo.update_property(&created.id, &request).await.unwrap();

        let stored = repo.get_property(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.landlord_contact, None);
        assert_eq!(stored.notes, None);
    }

    #[tokio::test]
    async fn test_unreadable_property_is_skipped_in_listings() {
        let (repo, pool, _dir) = repository().await;
        let good = repo.create_property(&listing("Good")).await.unwrap();
        let bad = repo.create_property(&listing("Bad")).await.unwrap();
        sqlx::query("UPDATE properties SET category = 'Castle' WHERE id = ?")
            .bind(&bad.id)
            .execute(&pool)
            .await
            .unwrap();

        let listed = repo.list_properties().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, good.id);

        let batch = repo
            .get_properties_by_ids(&[bad.id.clone(), good.id.clone()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, good.id);

        assert!(repo.get_property(&bad.id).await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_shortlist_ids_are_an_error() {
        let (repo, pool, _dir) = repository().await;
        let shortlist = repo
            .create_shortlist("clients/x", "Dana", &["p1".to_string()], "token-1")
            .await
            .unwrap();
        sqlx::query("UPDATE shortlists SET property_ids = 'not json' WHERE id = ?")
            .bind(&shortlist.id)
            .execute(&pool)
            .await
            .unwrap();

        assert!(matches!(
            repo.get_shortlist_by_token("token-1").await,
            Err(AppError::Internal(_))
        ));
    }
}
