//! Backend API Bindings
//!
//! Frontend bindings to the garden REST API, organized by domain. Every
//! request carries the session cookie.

mod garden;
mod notification;
mod user;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{GardenId, Notification, NotificationId, RawGarden, User};

pub use garden::{CreateGardenArgs, UpdateGardenArgs};
pub use notification::CreateNotificationArgs;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("not signed in")]
    Unauthorized,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("json error: {0}")]
    Decode(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Everything the client asks of the backend.
///
/// `?Send`: in the browser these futures run on the single JS thread.
#[async_trait(?Send)]
pub trait GardenApi {
    async fn current_user(&self) -> Result<User, ApiError>;

    /// Gardens with their nested log rows
    async fn list_gardens(&self) -> Result<Vec<RawGarden>, ApiError>;

    /// Notification groups, left untyped so malformed entries can be skipped
    async fn list_notifications(&self) -> Result<Vec<Value>, ApiError>;

    async fn create_garden(&self, args: &CreateGardenArgs<'_>) -> Result<RawGarden, ApiError>;

    async fn update_garden(&self, id: GardenId, args: &UpdateGardenArgs<'_>) -> Result<(), ApiError>;

    async fn delete_garden(&self, id: GardenId) -> Result<(), ApiError>;

    async fn create_notification(
        &self,
        args: &CreateNotificationArgs<'_>,
    ) -> Result<Notification, ApiError>;

    async fn delete_notification(&self, id: NotificationId) -> Result<(), ApiError>;
}

/// reqwest-backed client (fetch in the browser)
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: Client,
    base: Url,
}

impl HttpApi {
    #[cfg(not(target_arch = "wasm32"))]
    const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base = resolve_base(&config.api_base)?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .cookie_store(true)
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("garden-tracker-ui/", env!("CARGO_PKG_VERSION")));
        let http = builder.build().map_err(map_reqwest_error)?;

        tracing::debug!(base = %base, "api client ready");
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `path` is relative to the base, e.g. `api/users/me/`
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.http.request(method, self.url(path)?);
        #[cfg(target_arch = "wasm32")]
        let builder = builder.fetch_credentials_include();
        Ok(builder)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let res = request.send().await.map_err(map_reqwest_error)?;
        let res = check_status(res).await?;
        res.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let res = request.send().await.map_err(map_reqwest_error)?;
        check_status(res).await?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl GardenApi for HttpApi {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.fetch_current_user().await
    }

    async fn list_gardens(&self) -> Result<Vec<RawGarden>, ApiError> {
        self.fetch_gardens().await
    }

    async fn list_notifications(&self) -> Result<Vec<Value>, ApiError> {
        self.fetch_notifications().await
    }

    async fn create_garden(&self, args: &CreateGardenArgs<'_>) -> Result<RawGarden, ApiError> {
        self.post_garden(args).await
    }

    async fn update_garden(&self, id: GardenId, args: &UpdateGardenArgs<'_>) -> Result<(), ApiError> {
        self.put_garden(id, args).await
    }

    async fn delete_garden(&self, id: GardenId) -> Result<(), ApiError> {
        self.remove_garden(id).await
    }

    async fn create_notification(
        &self,
        args: &CreateNotificationArgs<'_>,
    ) -> Result<Notification, ApiError> {
        self.post_notification(args).await
    }

    async fn delete_notification(&self, id: NotificationId) -> Result<(), ApiError> {
        self.remove_notification(id).await
    }
}

/// Base URL with a trailing slash so relative paths join under it.
fn resolve_base(api_base: &str) -> Result<Url, ApiError> {
    let base = if api_base.is_empty() {
        page_origin().ok_or_else(|| ApiError::InvalidUrl("api base is not configured".to_string()))?
    } else {
        api_base.to_string()
    };
    Url::parse(&format!("{}/", base.trim_end_matches('/')))
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))
}

#[cfg(target_arch = "wasm32")]
fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn page_origin() -> Option<String> {
    None
}

async fn check_status(res: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    match res.status() {
        s if s.is_success() => Ok(res),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
        s => {
            let status = s.as_u16();
            let body = res.text().await.unwrap_or_default();
            tracing::warn!(status, %body, "api request failed");
            Err(ApiError::Http { status, body })
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Transport(e.to_string())
    }
}
