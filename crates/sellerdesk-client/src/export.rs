//! Spreadsheet export. The server builds the file; the client only stores
//! the bytes.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::request::ApiRequest;

/// `heyseller_<YYYY-MM-DD>.xlsx`.
#[must_use]
pub fn default_export_name(date: NaiveDate) -> String {
    format!("heyseller_{}.xlsx", date.format("%Y-%m-%d"))
}

impl ApiClient {
    /// Download the export for the current selection and write it to `dest`.
    ///
    /// When `dest` is an existing directory the file is named with
    /// [`default_export_name`] for today's UTC date. Returns the written path.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty selection, `Io` when the file cannot be
    /// written, or the wrapper's failure.
    pub async fn export_spreadsheet(&self, selected: &[String], dest: &Path) -> ApiResult<PathBuf> {
        if selected.is_empty() {
            return Err(ApiError::validation("select at least one product to export"));
        }

        let target = if dest.is_dir() {
            dest.join(default_export_name(Utc::now().date_naive()))
        } else {
            dest.to_path_buf()
        };

        let bytes = self
            .send_bytes(&ApiRequest::get("export", endpoints::EXPORT))
            .await?;
        tokio::fs::write(&target, &bytes)
            .await
            .map_err(|source| ApiError::Io {
                path: target.clone(),
                source,
            })?;

        info!(path = %target.display(), bytes = bytes.len(), "export written");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::client_for;
    use httpmock::prelude::*;
    use sellerdesk_test_support::session::seeded_handle;

    const XLSX_MAGIC: &[u8] = b"PK\x03\x04fake-sheet";

    #[test]
    fn default_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).expect("date");
        assert_eq!(default_export_name(date), "heyseller_2024-03-07.xlsx");
    }

    #[tokio::test]
    async fn export_writes_raw_bytes_into_directory() {
        let server = MockServer::start_async().await;
        let download = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/download_heyseller")
                    .query_param("uid", "u1");
                then.status(200).body(XLSX_MAGIC);
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let api = client_for(&server, seeded_handle("u1", "t1", None));
        let written = api
            .export_spreadsheet(&["c1".to_string()], dir.path())
            .await
            .expect("export");

        let name = written.file_name().and_then(|name| name.to_str()).expect("name");
        assert!(name.starts_with("heyseller_") && name.ends_with(".xlsx"));
        assert_eq!(std::fs::read(&written).expect("read"), XLSX_MAGIC);
        download.assert_async().await;
    }

    #[tokio::test]
    async fn export_requires_a_selection() {
        let server = MockServer::start_async().await;
        let download = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let api = client_for(&server, seeded_handle("u1", "t1", None));
        let err = api
            .export_spreadsheet(&[], dir.path())
            .await
            .expect_err("validation");
        assert!(matches!(err, ApiError::Validation { .. }));
        download.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn failed_export_writes_nothing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/download_heyseller");
                then.status(500).json_body(serde_json::json!({"error": "no products"}));
            })
            .await;

        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("out.xlsx");
        let api = client_for(&server, seeded_handle("u1", "t1", None));
        let err = api
            .export_spreadsheet(&["c1".to_string()], &target)
            .await
            .expect_err("server error");
        assert_eq!(err.user_message(), "no products");
        assert!(!target.exists());
    }
}
