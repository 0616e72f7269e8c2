//! Shared key generation for storage backends.
//!
//! Key format: `{tenant_name}/{YYYY}/{MM}/{DD}/{uuid}{ext}`.

use chrono::{DateTime, Utc};
use std::path::Path;
use uuid::Uuid;

const DEFAULT_EXTENSION: &str = ".pdf";

/// Generate a storage key for a file uploaded by `tenant_name` at `now`.
///
/// The extension is taken from `file_name` (lowercased); files without one get `.pdf`.
pub fn generate_storage_key(tenant_name: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}{}",
        tenant_name,
        now.format("%Y/%m/%d"),
        Uuid::now_v7(),
        file_extension(file_name)
    )
}

fn file_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_layout() {
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
        let key = generate_storage_key("acme_test", "Report.PDF", now);

        let parts: Vec<&str> = key.split('/').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(&parts[..4], &["acme_test", "2026", "03", "07"]);
        let (id, ext) = parts[4].split_at(parts[4].len() - 4);
        assert_eq!(ext, ".pdf");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_keys_are_unique() {
        let now = Utc::now();
        let a = generate_storage_key("acme_test", "a.pdf", now);
        let b = generate_storage_key("acme_test", "a.pdf", now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_missing_or_odd_extension_defaults_to_pdf() {
        assert_eq!(file_extension("scan"), ".pdf");
        assert_eq!(file_extension("scan.p d"), ".pdf");
        assert_eq!(file_extension("scan.pdf"), ".pdf");
    }
}
