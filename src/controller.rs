//! List mutation controller: keeps the in-memory user set in step with the
//! remote user service.
//!
//! Every mutation is confirm-then-mutate. The set only changes in the
//! `finish_*` methods, after the service has answered with success; a failed
//! call never touches it.
//!
//! Each operation is split in two so an event loop can own the controller on
//! one thread while the network call runs elsewhere:
//!
//! ```ignore
//! let call = controller.begin_delete(7)?;   // marks 7 in flight
//! let result = runtime.block_on(call);      // or spawn and send back
//! controller.finish_delete(7, result)?;     // applies or reports
//! ```
//!
//! The `load`, `create` and `delete` helpers do all three steps in place.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::error::{MutationError, Result, ServiceResult};
use crate::model::{NewUser, User, UserId};
use crate::service::UserService;

/// Per-operation lifecycle. Success and failure are reported by the
/// `finish_*` call and the operation drops straight back to `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpState {
    #[default]
    Idle,
    InFlight,
}

/// What a confirmed mutation did to the set.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Loaded { count: usize },
    Deleted { id: UserId, removed: bool },
}

pub struct ListController {
    service: Arc<dyn UserService>,
    users: Vec<User>,
    load: OpState,
    create: OpState,
    deleting: HashSet<UserId>,
    fetching: HashSet<UserId>,
}

impl std::fmt::Debug for ListController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("users", &self.users.len())
            .field("load", &self.load)
            .field("create", &self.create)
            .field("deleting", &self.deleting)
            .finish()
    }
}

impl ListController {
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self::with_users(service, Vec::new())
    }

    /// Start from an already known set (tests, restored sessions).
    pub fn with_users(service: Arc<dyn UserService>, users: Vec<User>) -> Self {
        Self {
            service,
            users,
            load: OpState::Idle,
            create: OpState::Idle,
            deleting: HashSet::new(),
            fetching: HashSet::new(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn load_state(&self) -> OpState {
        self.load
    }

    pub fn create_state(&self) -> OpState {
        self.create
    }

    pub fn is_loading(&self) -> bool {
        self.load == OpState::InFlight
    }

    pub fn is_creating(&self) -> bool {
        self.create == OpState::InFlight
    }

    /// A user's delete control is disabled while this is true.
    pub fn is_deleting(&self, id: UserId) -> bool {
        self.deleting.contains(&id)
    }

    pub fn is_fetching(&self, id: UserId) -> bool {
        self.fetching.contains(&id)
    }

    // ---- load ----

    pub fn begin_load(&mut self) -> Result<BoxFuture<'static, ServiceResult<Vec<User>>>> {
        if self.is_loading() {
            return Err(MutationError::AlreadyInFlight("load".into()));
        }
        self.load = OpState::InFlight;
        let service = Arc::clone(&self.service);
        Ok(Box::pin(async move { service.list_users().await }))
    }

    /// Replace the set wholesale, or keep the previous contents on failure.
    pub fn finish_load(&mut self, result: ServiceResult<Vec<User>>) -> Result<Outcome> {
        self.load = OpState::Idle;
        match result {
            Ok(users) => {
                let count = users.len();
                self.users = users;
                info!(count, "Loaded users");
                Ok(Outcome::Loaded { count })
            }
            Err(e) => {
                warn!(error = %e, kept = self.users.len(), "Failed to load users; keeping previous data");
                Err(MutationError::LoadFailed(e))
            }
        }
    }

    pub async fn load(&mut self) -> Result<Outcome> {
        let call = self.begin_load()?;
        let result = call.await;
        self.finish_load(result)
    }

    // ---- create ----

    /// Validate `user` and hand back the create call. Nothing is inserted yet.
    pub fn begin_create(&mut self, user: NewUser) -> Result<BoxFuture<'static, ServiceResult<User>>> {
        if self.is_creating() {
            return Err(MutationError::AlreadyInFlight("create".into()));
        }
        user.validate().map_err(MutationError::InvalidUser)?;
        self.create = OpState::InFlight;
        debug!(name = %user.name, "Create in flight");
        let service = Arc::clone(&self.service);
        Ok(Box::pin(async move { service.create_user(&user).await }))
    }

    /// Prepend the confirmed user and return it. An entry already holding
    /// the returned id is dropped first so identifiers stay unique.
    pub fn finish_create(&mut self, result: ServiceResult<User>) -> Result<User> {
        self.create = OpState::Idle;
        match result {
            Ok(user) => {
                let before = self.users.len();
                self.users.retain(|u| u.id != user.id);
                if self.users.len() != before {
                    warn!(id = user.id, "Service reused an existing id; replacing the stale entry");
                }
                info!(id = user.id, name = %user.name, "Created user");
                self.users.insert(0, user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create user");
                Err(MutationError::CreateFailed(e))
            }
        }
    }

    pub async fn create(&mut self, user: NewUser) -> Result<User> {
        let call = self.begin_create(user)?;
        let result = call.await;
        self.finish_create(result)
    }

    // ---- delete ----

    /// Mark `id` in flight and hand back the delete call. A second call for
    /// the same id is refused until the first one finishes.
    pub fn begin_delete(&mut self, id: UserId) -> Result<BoxFuture<'static, ServiceResult<()>>> {
        if !self.deleting.insert(id) {
            debug!(id, "Delete already in flight; ignoring");
            return Err(MutationError::AlreadyInFlight(format!("delete of user {id}")));
        }
        debug!(id, "Delete in flight");
        let service = Arc::clone(&self.service);
        Ok(Box::pin(async move { service.delete_user(id).await }))
    }

    /// Remove `id` once the service confirmed it; leave the set alone otherwise.
    pub fn finish_delete(&mut self, id: UserId, result: ServiceResult<()>) -> Result<Outcome> {
        self.deleting.remove(&id);
        match result {
            Ok(()) => {
                let before = self.users.len();
                self.users.retain(|u| u.id != id);
                let removed = self.users.len() != before;
                info!(id, removed, "Deleted user");
                Ok(Outcome::Deleted { id, removed })
            }
            Err(source) => {
                warn!(id, error = %source, "Failed to delete user");
                Err(MutationError::DeleteFailed { id, source })
            }
        }
    }

    pub async fn delete(&mut self, id: UserId) -> Result<Outcome> {
        let call = self.begin_delete(id)?;
        let result = call.await;
        self.finish_delete(id, result)
    }

    // ---- fetch (read-only) ----

    /// Read one user from the service. Never changes the set.
    pub fn begin_fetch(&mut self, id: UserId) -> Result<BoxFuture<'static, ServiceResult<User>>> {
        if !self.fetching.insert(id) {
            return Err(MutationError::AlreadyInFlight(format!("fetch of user {id}")));
        }
        let service = Arc::clone(&self.service);
        Ok(Box::pin(async move { service.get_user(id).await }))
    }

    pub fn finish_fetch(&mut self, id: UserId, result: ServiceResult<User>) -> Result<User> {
        self.fetching.remove(&id);
        result.map_err(|source| {
            warn!(id, error = %source, "Failed to fetch user");
            MutationError::FetchFailed { id, source }
        })
    }

    pub async fn fetch(&mut self, id: UserId) -> Result<User> {
        let call = self.begin_fetch(id)?;
        let result = call.await;
        self.finish_fetch(id, result)
    }
}
