//! Bulk CSV import.

use kitchen_models::{ImportKind, ImportReport};

use crate::client::KitchenClient;
use crate::error::SdkError;
use crate::request::{MultipartForm, RequestOptions};

const IMPORT_PATH: &str = "/api/import/csv/";

impl KitchenClient {
    /// Upload a CSV file. With `dry_run` the backend validates the rows and
    /// reports counts without writing anything.
    pub async fn import_csv(
        &self,
        kind: ImportKind,
        file_name: &str,
        bytes: Vec<u8>,
        dry_run: bool,
    ) -> Result<ImportReport, SdkError> {
        let form = MultipartForm::new()
            .text("kind", kind.to_string())
            .text("dry_run", if dry_run { "true" } else { "false" })
            .file("file", file_name, bytes);

        let body = self
            .fetch_json(IMPORT_PATH, RequestOptions::post().multipart(form))
            .await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_kitchen::MockKitchen;

    use crate::config::ClientConfig;
    use crate::store::Session;

    async fn signed_in(mock: &MockKitchen) -> KitchenClient {
        let (addr, _server) = mock_kitchen::spawn(mock.clone()).await.unwrap();
        let client = KitchenClient::new(
            ClientConfig::new(format!("http://{addr}")),
            Session::in_memory(),
        )
        .unwrap();
        client.session().set_tokens(&mock.issue_tokens()).unwrap();
        client
    }

    const CSV: &[u8] = b"name,slug\nDesserts,desserts\nDrinks,drinks\n\n";

    #[tokio::test]
    async fn dry_run_reports_without_writing() {
        let mock = MockKitchen::new();
        let client = signed_in(&mock).await;

        let report = client
            .import_csv(ImportKind::Categories, "categories.csv", CSV.to_vec(), true)
            .await
            .unwrap();
        assert_eq!(report.created, 2);
        assert!(report.dry_run);
        assert_eq!(report.kind.as_deref(), Some("categories"));
        assert_eq!(client.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_survives_a_token_refresh() {
        let mock = MockKitchen::new();
        let client = signed_in(&mock).await;
        mock.expire_access_tokens();

        let report = client
            .import_csv(ImportKind::Categories, "categories.csv", CSV.to_vec(), false)
            .await
            .unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(mock.refresh_calls(), 1);
        assert_eq!(client.list_categories().await.unwrap().len(), 3);
    }
}
