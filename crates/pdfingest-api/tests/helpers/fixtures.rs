//! Request fixtures.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;

use super::api_path;

/// Bytes that pass upload validation. Only the in-memory extractor reads them.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj\ntrailer << /Root 1 0 R >>\n%%EOF\n".to_vec()
}

pub fn upload_form(tenant_name: &str, file_name: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new()
        .add_text("tenantName", tenant_name.to_string())
        .add_part(
            "pdf",
            Part::bytes(data)
                .file_name(file_name.to_string())
                .mime_type("application/pdf"),
        )
}

/// Upload a valid PDF and return the response body, asserting success.
pub async fn upload_pdf(client: &TestServer, tenant_name: &str, file_name: &str) -> Value {
    let response = client
        .post(&api_path("/upload"))
        .multipart(upload_form(tenant_name, file_name, pdf_bytes()))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    response.json::<Value>()
}
