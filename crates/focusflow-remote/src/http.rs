use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::instrument;

use focusflow_core::color::AreaColor;
use focusflow_core::errors::RemoteError;
use focusflow_core::ids::{NoteId, TaskId};
use focusflow_core::model::{Area, Note, NoteFields, SearchResult, Task, TaskFields, User};
use focusflow_core::remote::{CrudRemote, SearchRemote, SearchScope};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const UNKNOWN_ERROR_DETAIL: &str = "an unknown error occurred";

/// HTTP client for the FocusFlow REST store. Carries the bearer token for the
/// current session; obtain one via [`HttpRemote::login`] or
/// [`HttpRemote::register`].
pub struct HttpRemote {
    client: Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
}

#[derive(Debug, serde::Serialize)]
struct RegisterBody<'a> {
    email: &'a str,
    full_name: &'a str,
    password: &'a str,
}

#[derive(Debug, serde::Serialize)]
struct AreaBody<'a> {
    name: &'a str,
    color: AreaColor,
}

#[derive(Debug, serde::Serialize)]
struct ToggleBody {
    completed: bool,
}

impl HttpRemote {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:5000/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    pub fn with_token(self, token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
            ..self
        }
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Drop the session token. Subsequent calls will be rejected by the
    /// remote with an auth error.
    pub async fn logout(&self) {
        *self.token.write().await = None;
    }

    /// Exchange credentials for a bearer token (OAuth2 password form). The
    /// token is installed on this client and returned for persistence.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<SecretString, RemoteError> {
        let req = self
            .client
            .post(self.url("/users/login"))
            .form(&[("username", email), ("password", password)]);
        let body: TokenBody = send_json(req).await?;
        let token = SecretString::from(body.access_token);
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Create an account. The remote also provisions a default area and
    /// returns a token, which is installed on this client.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<SecretString, RemoteError> {
        let req = self.client.post(self.url("/users/register")).json(&RegisterBody {
            email,
            full_name,
            password,
        });
        let body: TokenBody = send_json(req).await?;
        let token = SecretString::from(body.access_token);
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self.client.request(method, self.url(path));
        if let Some(token) = self.token.read().await.as_ref() {
            req = req.bearer_auth(token.expose_secret());
        }
        req
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        send_json(self.request(Method::GET, path).await).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        send_json(self.request(Method::POST, path).await.json(body)).await
    }

    async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        send_json(self.request(Method::PATCH, path).await.json(body)).await
    }
}

/// Issue the request and decode the response, classifying non-2xx statuses
/// through [`RemoteError::from_status`] with the server's `detail` string.
async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, RemoteError> {
    let resp = req
        .send()
        .await
        .map_err(|e| RemoteError::Unavailable(format!("network error: {e}")))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(RemoteError::from_status(status.as_u16(), extract_detail(&body)));
    }
    resp.json::<T>()
        .await
        .map_err(|e| RemoteError::Unavailable(format!("malformed response: {e}")))
}

fn extract_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| UNKNOWN_ERROR_DETAIL.to_string())
}

#[async_trait]
impl CrudRemote for HttpRemote {
    async fn get_user(&self) -> Result<User, RemoteError> {
        self.get("/users/me").await
    }

    async fn get_areas(&self) -> Result<Vec<Area>, RemoteError> {
        self.get("/areas/").await
    }

    async fn get_tasks(&self) -> Result<Vec<Task>, RemoteError> {
        self.get("/tasks/").await
    }

    async fn get_notes(&self) -> Result<Vec<Note>, RemoteError> {
        self.get("/notes/").await
    }

    #[instrument(skip(self))]
    async fn create_area(&self, name: &str, color: AreaColor) -> Result<Area, RemoteError> {
        self.post("/areas/", &AreaBody { name, color }).await
    }

    #[instrument(skip(self, fields))]
    async fn create_task(&self, fields: &TaskFields) -> Result<Task, RemoteError> {
        self.post("/tasks/", fields).await
    }

    #[instrument(skip(self, fields))]
    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Task, RemoteError> {
        self.patch(&format!("/tasks/{id}"), fields).await
    }

    #[instrument(skip(self))]
    async fn toggle_task_completion(
        &self,
        id: TaskId,
        target_completed: bool,
    ) -> Result<Task, RemoteError> {
        self.patch(&format!("/tasks/{id}"), &ToggleBody { completed: target_completed })
            .await
    }

    #[instrument(skip(self, fields))]
    async fn create_note(&self, fields: &NoteFields) -> Result<Note, RemoteError> {
        self.post("/notes/", fields).await
    }

    #[instrument(skip(self, fields))]
    async fn update_note(&self, id: NoteId, fields: &NoteFields) -> Result<Note, RemoteError> {
        self.patch(&format!("/notes/{id}"), fields).await
    }
}

#[async_trait]
impl SearchRemote for HttpRemote {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        scope: SearchScope,
    ) -> Result<Vec<SearchResult>, RemoteError> {
        let mut req = self
            .request(Method::GET, "/search/")
            .await
            .query(&[("query", query)]);
        if let Some(item_type) = scope.item_type() {
            req = req.query(&[("item_type", item_type)]);
        }
        send_json(req).await
    }
}
