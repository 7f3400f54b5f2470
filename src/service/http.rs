use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::UserService;
use crate::error::{ServiceError, ServiceResult};
use crate::model::{NewUser, User, UserId};

/// Public demo API the dashboard talks to unless configured otherwise.
pub const DEFAULT_API_URL: &str = "https://jsonplaceholder.typicode.com";

/// `UserService` backed by a JSON REST API exposing `/users` and `/users/{id}`.
#[derive(Clone, Debug)]
pub struct HttpUserService {
    http: Client,
    base_url: String,
}

impl HttpUserService {
    /// Create a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> ServiceResult<Self> {
        let url = base_url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(ServiceError::InvalidUrl("URL cannot be empty".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServiceError::InvalidUrl(format!(
                "{url}: URL must start with http:// or https://"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(format!("user-dashboard/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;

        Ok(Self { http, base_url: url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: UserId) -> String {
        format!("{}/users/{}", self.base_url, id)
    }
}

/// Turn a non-2xx answer into `ServiceError::Http`.
fn check_status(response: Response, what: &str) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        warn!(status = status.as_u16(), "{what} rejected by service");
        Err(ServiceError::Http { status: status.as_u16() })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ServiceError::Decode(e.to_string()))
}

#[async_trait]
impl UserService for HttpUserService {
    async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let url = self.users_url();
        debug!(url = %url, "Fetching users");
        let response = self.http.get(&url).send().await?;
        let users: Vec<User> = decode(check_status(response, "list users")?).await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    async fn get_user(&self, id: UserId) -> ServiceResult<User> {
        let url = self.user_url(id);
        debug!(url = %url, "Fetching user");
        let response = self.http.get(&url).send().await?;
        decode(check_status(response, "get user")?).await
    }

    async fn create_user(&self, user: &NewUser) -> ServiceResult<User> {
        let url = self.users_url();
        debug!(url = %url, name = %user.name, "Creating user");
        let response = self.http.post(&url).json(user).send().await?;
        decode(check_status(response, "create user")?).await
    }

    async fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        let url = self.user_url(id);
        debug!(url = %url, "Deleting user");
        let response = self.http.delete(&url).send().await?;
        check_status(response, "delete user")?;
        Ok(())
    }
}
