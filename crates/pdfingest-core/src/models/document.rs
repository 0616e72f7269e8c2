use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A document row inside a tenant's document store.
///
/// `storage_path`/`storage_url` point into the object store; the object store owns the
/// bytes. `deleted_at` is set exactly when `is_deleted` is true.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub tenant_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub storage_path: String,
    pub storage_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extracted_text: String,
    pub summary: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Values for a document insert. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub tenant_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub storage_path: String,
    pub storage_url: String,
    pub extracted_text: String,
    pub summary: String,
    pub uploaded_at: DateTime<Utc>,
}

/// `POST /api/v1/upload` payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub tenant_name: String,
    pub file_name: String,
    pub file_size: i64,
    pub summary: String,
    pub storage_url: String,
    pub uploaded_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}

impl UploadResponse {
    pub fn from_document(document: Document, processing_time_ms: u64) -> Self {
        UploadResponse {
            document_id: document.id,
            tenant_name: document.tenant_name,
            file_name: document.file_name,
            file_size: document.file_size,
            summary: document.summary,
            storage_url: document.storage_url,
            uploaded_at: document.uploaded_at,
            processing_time_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_document() -> Document {
        Document {
            id: Uuid::new_v4(),
            tenant_name: "acme_test".to_string(),
            file_name: "sample.pdf".to_string(),
            file_size: 10240,
            storage_path: "acme_test/2026/10/19/0192a3f0.pdf".to_string(),
            storage_url: "http://localhost:9000/pdf-uploads/acme_test/2026/10/19/0192a3f0.pdf"
                .to_string(),
            extracted_text: "Intro. Body.".to_string(),
            summary: "Intro. Body.".to_string(),
            uploaded_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        }
    }

    #[test]
    fn test_upload_response_from_document() {
        let document = test_document();
        let response = UploadResponse::from_document(document.clone(), 42);

        assert_eq!(response.document_id, document.id);
        assert_eq!(response.tenant_name, "acme_test");
        assert_eq!(response.file_name, "sample.pdf");
        assert_eq!(response.file_size, 10240);
        assert_eq!(response.storage_url, document.storage_url);
        assert_eq!(response.uploaded_at, document.uploaded_at);
        assert_eq!(response.processing_time_ms, 42);
    }

    #[test]
    fn test_document_omits_unset_deleted_at() {
        let json = serde_json::to_value(test_document()).unwrap();
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["is_deleted"], false);
    }
}
