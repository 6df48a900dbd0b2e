// Folder ("tag") endpoints.

use crate::client::ElementClient;
use crate::error::Error;
use crate::models::Folder;

impl ElementClient {
    /// List all folders visible to the API key.
    ///
    /// `GET /tags` -- paginated, followed to exhaustion.
    pub async fn folders(&self) -> Result<Vec<Folder>, Error> {
        self.fetch_collection("tags", &[], None).await
    }

    /// All folder slugs, e.g. `stadt-dortmund-klimasensoren-aktiv-sht35`.
    ///
    /// Projection of [`folders`](Self::folders).
    pub async fn folder_slugs(&self) -> Result<Vec<String>, Error> {
        let folders = self.folders().await?;
        Ok(folders.into_iter().map(|f| f.slug).collect())
    }
}
