use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::{purchase_order_lines, styles};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

/// Denormalized image-URL lists keep at most this many entries.
pub const MAX_IMAGE_URLS: usize = 3;

/// Where uploaded image bytes end up. The filesystem backend below is the
/// only implementation shipped; object-store backends slot in behind the
/// same trait.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Store the bytes under the given relative key and return the public URL.
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String, ServiceError>;
}

/// Stores blobs under a local root directory and serves them from a public
/// base URL.
pub struct FilesystemBackend {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemBackend {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String, ServiceError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::StorageError(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::StorageError(e.to_string()))?;
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

/// Insert `url` at the front of an image-URL list, deduped and capped at
/// [`MAX_IMAGE_URLS`], most recent first.
pub fn push_image_url(existing: &[String], url: &str) -> Vec<String> {
    let mut urls = Vec::with_capacity(MAX_IMAGE_URLS);
    urls.push(url.to_string());
    for u in existing {
        if u != url && urls.len() < MAX_IMAGE_URLS {
            urls.push(u.clone());
        }
    }
    urls
}

fn urls_from_json(value: &Option<serde_json::Value>) -> Vec<String> {
    value
        .as_ref()
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Upload request: raw bytes plus the records to attach the URL to.
#[derive(Debug)]
pub struct ImageUpload {
    pub style_id: i64,
    pub po_line_id: Option<i64>,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Per-target success flags for one attachment. Storage failure aborts the
/// whole operation, but a failed database update on one target never rolls
/// back the upload or the other targets.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AttachmentOutcome {
    pub url: String,
    pub storage_path: String,
    pub style_updated: bool,
    pub main_image_updated: bool,
    pub po_line_updated: bool,
}

/// Stores uploaded images and fans the resulting URL out to the style record
/// and, optionally, a PO line.
pub struct ImageService {
    db: Arc<DbPool>,
    storage: Arc<dyn StorageBackend>,
    event_sender: EventSender,
}

impl ImageService {
    pub fn new(db: Arc<DbPool>, storage: Arc<dyn StorageBackend>, event_sender: EventSender) -> Self {
        Self {
            db,
            storage,
            event_sender,
        }
    }

    #[instrument(skip(self, upload), fields(style_id = upload.style_id, filename = %upload.filename))]
    pub async fn attach(&self, upload: ImageUpload) -> Result<AttachmentOutcome, ServiceError> {
        if upload.bytes.is_empty() {
            return Err(ServiceError::ValidationError(
                "Uploaded file is empty".to_string(),
            ));
        }

        // Validate the style up front so a bad id fails before any bytes land
        // in storage.
        let style = styles::Entity::find_by_id(upload.style_id)
            .filter(styles::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Style {} not found", upload.style_id))
            })?;

        let filename = sanitize_filename(&upload.filename);
        let key = format!("styles/{}/{}-{}", upload.style_id, Uuid::new_v4(), filename);
        let url = self.storage.store(&key, &upload.bytes).await?;

        // Each denormalized target is its own statement: one failing never
        // rolls back the upload or the sibling targets.
        let style_updated = self.update_style_urls(style.clone(), &url).await;
        let main_image_updated = self.update_main_image(style.style_id, &url).await;
        let po_line_updated = match upload.po_line_id {
            Some(po_line_id) => self.update_po_line(po_line_id, &url).await,
            None => false,
        };

        info!(url = %url, style_updated, main_image_updated, po_line_updated, "image attached");
        self.event_sender
            .send(Event::ImageAttached {
                style_id: upload.style_id,
                url: url.clone(),
            })
            .await;

        Ok(AttachmentOutcome {
            url,
            storage_path: key,
            style_updated,
            main_image_updated,
            po_line_updated,
        })
    }

    async fn update_style_urls(&self, style: styles::Model, url: &str) -> bool {
        let urls = push_image_url(&urls_from_json(&style.image_urls), url);
        let style_id = style.style_id;
        let mut active: styles::ActiveModel = style.into();
        active.image_urls = Set(Some(serde_json::json!(urls)));
        active.updated_at = Set(Utc::now());
        match active.update(&*self.db).await {
            Ok(_) => true,
            Err(e) => {
                warn!(style_id, error = %e, "style image_urls update failed");
                false
            }
        }
    }

    async fn update_main_image(&self, style_id: i64, url: &str) -> bool {
        let style = match styles::Entity::find_by_id(style_id).one(&*self.db).await {
            Ok(Some(style)) => style,
            Ok(None) => return false,
            Err(e) => {
                warn!(style_id, error = %e, "style lookup failed");
                return false;
            }
        };
        let mut active: styles::ActiveModel = style.into();
        active.main_image_url = Set(Some(url.to_string()));
        active.updated_at = Set(Utc::now());
        match active.update(&*self.db).await {
            Ok(_) => true,
            Err(e) => {
                warn!(style_id, error = %e, "style main_image_url update failed");
                false
            }
        }
    }

    async fn update_po_line(&self, po_line_id: i64, url: &str) -> bool {
        let line = match purchase_order_lines::Entity::find_by_id(po_line_id)
            .filter(purchase_order_lines::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await
        {
            Ok(Some(line)) => line,
            Ok(None) => {
                warn!(po_line_id, "po line not found, skipping image attach");
                return false;
            }
            Err(e) => {
                warn!(po_line_id, error = %e, "po line lookup failed");
                return false;
            }
        };

        let urls = push_image_url(&urls_from_json(&line.image_urls), url);
        let mut active: purchase_order_lines::ActiveModel = line.into();
        active.image_urls = Set(Some(serde_json::json!(urls)));
        active.updated_at = Set(Utc::now());
        match active.update(&*self.db).await {
            Ok(_) => true,
            Err(e) => {
                warn!(po_line_id, error = %e, "po line image update failed");
                false
            }
        }
    }
}

fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn new_url_goes_first() {
        let result = push_image_url(&urls(&["a", "b"]), "c");
        assert_eq!(result, urls(&["c", "a", "b"]));
    }

    #[test]
    fn list_is_capped_at_three() {
        let result = push_image_url(&urls(&["a", "b", "c"]), "d");
        assert_eq!(result, urls(&["d", "a", "b"]));
    }

    #[test]
    fn re_upload_moves_url_to_front_without_duplicating() {
        let result = push_image_url(&urls(&["a", "b", "c"]), "b");
        assert_eq!(result, urls(&["b", "a", "c"]));
    }

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("front view (1).png"), "front_view__1_.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn filesystem_backend_writes_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FilesystemBackend::new(dir.path(), "http://localhost:8080/files/");
        let url = backend.store("styles/1/test.png", b"png-bytes").await.unwrap();
        assert_eq!(url, "http://localhost:8080/files/styles/1/test.png");
        let stored = tokio::fs::read(dir.path().join("styles/1/test.png"))
            .await
            .unwrap();
        assert_eq!(stored, b"png-bytes");
    }
}
