// Hand-crafted async HTTP client for the Rackbook API.
//
// Base path: /api/
// Auth: Bearer token obtained from POST /api/auth/login

use reqwest::multipart;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    Company, InventoryTree, LoginResponse, NewDocument, ObjectDetail, ObjectId, Page, PageId,
    UserProfile,
};

// ── Error response shape ─────────────────────────────────────────────

/// The backend reports failures as `{"detail": ...}` where `detail` is
/// usually a string but may be a structured validation payload.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<Value>,
}

impl ErrorResponse {
    fn message(&self) -> Option<String> {
        match &self.detail {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Rackbook API.
///
/// Read endpoints are anonymous; writes take a bearer token per call so
/// one client instance can serve both states.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL ending in `/api/`.
    ///
    /// Accepts both a bare host (`https://docs.example.com`) and a URL
    /// that already carries the API prefix.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"objects/42"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining `tree` etc. works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn get_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url} (authed)");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn put_authed<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        token: &SecretString,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // Truncate by chars, not bytes: a byte slice could land
                // mid-codepoint in a non-ASCII error page.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|body| body.message())
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.clone()
                }
            });

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Error::Authentication { message },
            reqwest::StatusCode::FORBIDDEN => Error::Forbidden { message },
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { resource: message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ─────────────────────────────────────────────────────────

    /// Authenticate with username/password and receive a bearer token.
    ///
    /// The endpoint is OAuth2-password-flow shaped: credentials go as a
    /// form-encoded body, not JSON.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, Error> {
        let url = self.url("auth/login");
        debug!("logging in at {url}");

        let resp = self
            .http
            .post(url)
            .form(&[("username", username), ("password", password.expose_secret())])
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// Fetch the profile of the token's owner.
    pub async fn me(&self, token: &SecretString) -> Result<UserProfile, Error> {
        self.get_authed("auth/me", token).await
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// Fetch the full company / datacenter / object tree.
    pub async fn tree(&self) -> Result<InventoryTree, Error> {
        self.get("tree").await
    }

    /// List companies without their datacenters.
    pub async fn companies(&self) -> Result<Vec<Company>, Error> {
        self.get("companies").await
    }

    /// Fetch one object with its pages, relations, documents, and incidents.
    pub async fn object(&self, id: ObjectId) -> Result<ObjectDetail, Error> {
        self.get(&format!("objects/{id}")).await
    }

    // ── Pages ────────────────────────────────────────────────────────

    /// Replace the markdown body of a page. Requires editor rights.
    pub async fn update_page(
        &self,
        token: &SecretString,
        id: PageId,
        content_md: &str,
    ) -> Result<Page, Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            content_md: &'a str,
        }

        self.put_authed(&format!("pages/{id}"), token, &Body { content_md })
            .await
    }

    // ── Documents ────────────────────────────────────────────────────

    /// List the documents attached to an object.
    pub async fn object_documents(
        &self,
        id: ObjectId,
    ) -> Result<Vec<crate::types::Document>, Error> {
        self.get(&format!("objects/{id}/documents")).await
    }

    /// Attach a document to an object. Requires editor rights.
    ///
    /// The body is multipart form data; `file` becomes a file part for
    /// uploads and is omitted for plain links.
    pub async fn upload_document(
        &self,
        token: &SecretString,
        object_id: ObjectId,
        doc: NewDocument,
    ) -> Result<crate::types::Document, Error> {
        let url = self.url(&format!("objects/{object_id}/documents"));
        debug!("POST {url} (multipart)");

        let mut form = multipart::Form::new()
            .text("title", doc.title)
            .text("kind", doc.kind.to_string());
        if let Some(link) = doc.url {
            form = form.text("url", link);
        }
        if let Some((file_name, bytes)) = doc.file {
            form = form.part("file", multipart::Part::bytes(bytes).file_name(file_name));
        }

        let resp = self
            .http
            .post(url)
            .bearer_auth(token.expose_secret())
            .multipart(form)
            .send()
            .await?;
        Self::handle_response(resp).await
    }
}
