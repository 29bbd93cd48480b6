//! REST implementation of the repository traits.
//!
//! Every call goes through one [`reqwest::Client`] with a cookie store, so the
//! session cookie obtained at login is replayed on all later requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use url::Url;

use crate::domain::{
    auth::{AuthStatus, Credentials, SessionUser},
    dashboard::{
        Demographics, DensityMap, HealthStats, NeedsPotential, SocialWelfareStats,
        UrgentNeedDetail,
    },
    filter::FilterOptions,
    lansia::{LansiaDetail, NewLansia, UpdateLansia},
    types::LansiaId,
    upload::UploadReport,
};
use crate::repository::{
    AuthGateway, DashboardReader, LansiaListQuery, LansiaPage, LansiaReader, LansiaWriter,
    SpreadsheetTransfer,
    errors::{RepositoryError, RepositoryResult},
};

/// `{ message }` envelope used by the backend for most responses.
#[derive(Debug, Default, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: LansiaId,
}

#[derive(Debug, Deserialize)]
struct BulkDeleted {
    #[serde(default)]
    deleted_count: usize,
}

#[derive(Debug, Serialize)]
struct BulkDeleteRequest<'a> {
    ids: &'a [LansiaId],
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    password: &'a str,
}

fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

#[derive(Debug, Clone)]
pub struct HttpRepository {
    client: Client,
    base_url: Url,
}

impl HttpRepository {
    /// Builds a client for the API rooted at `base_url` (e.g.
    /// `http://localhost:5000/api`).
    pub fn new(base_url: &str, request_timeout: Duration) -> RepositoryResult<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: ensure_slash(&base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> RepositoryResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn lansia_endpoint(&self, id: LansiaId) -> RepositoryResult<Url> {
        self.endpoint(&format!("lansia/{id}"))
    }

    /// Sends the request and maps non-success statuses onto
    /// [`RepositoryError`].
    async fn send(&self, request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<MessageEnvelope>(&body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.is_empty());

        match status {
            StatusCode::UNAUTHORIZED => Err(RepositoryError::Unauthorized(message)),
            StatusCode::NOT_FOUND => Err(RepositoryError::NotFound(message)),
            _ => {
                let message = message.unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unexpected status")
                        .to_string()
                });
                log::error!("Request failed with status {status}: {message}");
                Err(RepositoryError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> RepositoryResult<T> {
        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|err| {
            log::error!("Failed to decode response body: {err}");
            log::debug!("Response body was: {body}");
            RepositoryError::Decode(err.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> RepositoryResult<T> {
        let url = self.endpoint(path)?;
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn read_message(response: Response) -> RepositoryResult<String> {
        let envelope: MessageEnvelope = Self::read_json(response).await?;
        Ok(envelope.message.unwrap_or_default())
    }
}

#[async_trait]
impl LansiaReader for HttpRepository {
    async fn list_lansia(&self, query: LansiaListQuery) -> RepositoryResult<LansiaPage> {
        let url = self.endpoint("lansia")?;
        let request = self.client.get(url).query(&query.to_query_pairs());
        let response = self.send(request).await?;
        Self::read_json(response).await
    }

    async fn get_lansia(&self, id: LansiaId) -> RepositoryResult<Option<LansiaDetail>> {
        let url = self.lansia_endpoint(id)?;
        match self.send(self.client.get(url)).await {
            Ok(response) => Self::read_json(response).await.map(Some),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn filter_options(&self) -> RepositoryResult<FilterOptions> {
        self.get_json("filter-options").await
    }
}

#[async_trait]
impl LansiaWriter for HttpRepository {
    async fn create_lansia(&self, lansia: &NewLansia) -> RepositoryResult<LansiaId> {
        let url = self.endpoint("lansia")?;
        let response = self.send(self.client.post(url).json(lansia)).await?;
        let created: Created = Self::read_json(response).await?;
        Ok(created.id)
    }

    async fn update_lansia(&self, id: LansiaId, lansia: &UpdateLansia) -> RepositoryResult<()> {
        let url = self.lansia_endpoint(id)?;
        self.send(self.client.put(url).json(lansia)).await?;
        Ok(())
    }

    async fn delete_lansia(&self, id: LansiaId) -> RepositoryResult<()> {
        let url = self.lansia_endpoint(id)?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn bulk_delete_lansia(&self, ids: &[LansiaId]) -> RepositoryResult<usize> {
        let url = self.endpoint("lansia/bulk-delete")?;
        let request = self.client.post(url).json(&BulkDeleteRequest { ids });
        let response = self.send(request).await?;
        let deleted: BulkDeleted = Self::read_json(response).await?;
        Ok(deleted.deleted_count)
    }
}

#[async_trait]
impl SpreadsheetTransfer for HttpRepository {
    async fn upload_spreadsheet(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> RepositoryResult<UploadReport> {
        let url = self.endpoint("upload-excel")?;
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);
        let response = self.send(self.client.post(url).multipart(form)).await?;
        Self::read_json(response).await
    }

    async fn export_template(&self) -> RepositoryResult<Vec<u8>> {
        let url = self.endpoint("export-template")?;
        let response = self.send(self.client.get(url)).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DashboardReader for HttpRepository {
    async fn demographics(&self) -> RepositoryResult<Demographics> {
        self.get_json("dashboard/demographics").await
    }

    async fn health(&self) -> RepositoryResult<HealthStats> {
        self.get_json("dashboard/health").await
    }

    async fn social_welfare(&self) -> RepositoryResult<SocialWelfareStats> {
        self.get_json("dashboard/social-welfare").await
    }

    async fn needs_potential(&self) -> RepositoryResult<NeedsPotential> {
        self.get_json("dashboard/needs-potential").await
    }

    async fn urgent_need_details(&self, need: &str) -> RepositoryResult<Vec<UrgentNeedDetail>> {
        let mut url = self.endpoint("dashboard/urgent-need-details/")?;
        url.path_segments_mut()
            .map_err(|_| RepositoryError::InvalidRequest("base URL cannot have a path".into()))?
            .pop_if_empty()
            .push(need);
        let response = self.send(self.client.get(url)).await?;
        Self::read_json(response).await
    }

    async fn density_map(&self) -> RepositoryResult<DensityMap> {
        self.get_json("density-map").await
    }
}

#[async_trait]
impl AuthGateway for HttpRepository {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionUser> {
        let url = self.endpoint("login")?;
        let response = self.send(self.client.post(url).json(credentials)).await?;
        let status: AuthStatus = Self::read_json(response).await?;
        status
            .user
            .ok_or_else(|| RepositoryError::Decode("login response has no user".to_string()))
    }

    async fn logout(&self) -> RepositoryResult<()> {
        let url = self.endpoint("logout")?;
        self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn check_auth(&self) -> RepositoryResult<Option<SessionUser>> {
        let url = self.endpoint("check-auth")?;
        let response = match self.send(self.client.get(url)).await {
            Ok(response) => response,
            Err(RepositoryError::Unauthorized(_)) => return Ok(None),
            Err(err) => return Err(err),
        };
        let status: AuthStatus = Self::read_json(response).await?;
        let authenticated = status.authenticated;
        Ok(status.user.filter(|_| authenticated))
    }

    async fn forgot_password(&self, email: &str) -> RepositoryResult<String> {
        let url = self.endpoint("forgot-password")?;
        let request = self.client.post(url).json(&ForgotPasswordRequest { email });
        let response = self.send(request).await?;
        Self::read_message(response).await
    }

    async fn reset_password(&self, token: &str, password: &str) -> RepositoryResult<String> {
        let url = self.endpoint("reset-password")?;
        let request = self
            .client
            .put(url)
            .json(&ResetPasswordRequest { token, password });
        let response = self.send(request).await?;
        Self::read_message(response).await
    }
}
