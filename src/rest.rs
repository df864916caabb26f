//! The minimal REST collaborator contract the CSE requires (§6.4).
//!
//! Everything else under `/api` — auth, token CRUD, the bulk of file
//! handling — belongs to the surrounding shell and is out of scope here
//! (§1). These three endpoints are the ones the optimistic layer and the
//! on-demand profile/emoji lookups actually need.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CheckStatus;
use crate::model::ids::{AttachmentId, ServerId};
use crate::Result;

/// Response shape of `POST /api/uploads`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AttachmentInfo {
    pub id: AttachmentId,
    pub filename: String,
    pub url: String,
    pub content_type: Option<String>,
    pub size: u64,
}

/// Response shape of `GET /api/users/{nickname}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublicUserProfile {
    pub user_id: crate::model::ids::UserId,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub pronouns: Option<String>,
}

/// One entry of `GET /api/servers/{id}/emoji`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomEmojiEntry {
    pub id: String,
    pub server_id: ServerId,
    pub name: String,
    pub image_url: String,
}

/// The HTTP surface the CSE consumes as an external collaborator (§6.4).
///
/// Kept as a trait, in the teacher crate's own spirit of splitting REST
/// calls out of the gateway connection (see the teacher's `rest` module
/// doc), so tests can substitute a fake without standing up a server.
#[allow(async_fn_in_trait)]
pub trait RestClient {
    async fn upload_attachment(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<AttachmentInfo>;

    async fn get_user_profile(&self, nickname: &str) -> Result<PublicUserProfile>;

    async fn list_server_emoji(&self, server_id: &ServerId) -> Result<Vec<CustomEmojiEntry>>;
}

/// Default [`RestClient`] backed by `reqwest`, carrying whatever ambient
/// session cookie the host application configured on its `Client` (§1: OAuth
/// and session handling are the shell's concern, not this crate's).
pub struct HttpRestClient {
    client: reqwest::Client,
    api_base: String,
}

impl HttpRestClient {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        HttpRestClient {
            client,
            api_base: api_base.into(),
        }
    }
}

impl RestClient for HttpRestClient {
    async fn upload_attachment(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<AttachmentInfo> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_owned())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/uploads", self.api_base))
            .multipart(form)
            .send()
            .await
            .check_status()
            .await?;

        Ok(response.json().await?)
    }

    async fn get_user_profile(&self, nickname: &str) -> Result<PublicUserProfile> {
        let response = self
            .client
            .get(format!(
                "{}/users/{}",
                self.api_base,
                urlencoding::encode(nickname)
            ))
            .send()
            .await
            .check_status()
            .await?;

        Ok(response.json().await?)
    }

    async fn list_server_emoji(&self, server_id: &ServerId) -> Result<Vec<CustomEmojiEntry>> {
        let response = self
            .client
            .get(format!("{}/servers/{}/emoji", self.api_base, server_id))
            .send()
            .await
            .check_status()
            .await;

        match response {
            Ok(response) => Ok(response.json().await?),
            Err(err) => {
                warn!("list_server_emoji failed for {server_id}: {err}");
                Err(err)
            }
        }
    }
}
