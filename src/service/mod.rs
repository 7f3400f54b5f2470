//! Remote user service: the REST resource that owns the user records.
//!
//! The dashboard never persists anything itself. Every list mutation is
//! confirmed by one of the four calls below before the in-memory set changes.

mod http;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::model::{NewUser, User, UserId};

pub use http::{DEFAULT_API_URL, HttpUserService};

/// The four operations the dashboard consumes.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn list_users(&self) -> ServiceResult<Vec<User>>;

    async fn get_user(&self, id: UserId) -> ServiceResult<User>;

    /// The returned user carries the identifier assigned by the service.
    async fn create_user(&self, user: &NewUser) -> ServiceResult<User>;

    async fn delete_user(&self, id: UserId) -> ServiceResult<()>;
}
