//! Remote-backed department store.
//!
//! # Responsibility
//! - Run each remote operation through `pending -> fulfilled | rejected`.
//! - Bound every call with the configured timeout.
//!
//! # Invariants
//! - Failures never escape to the caller; they land in `SyncState::error`.
//! - The state lock is never held across an `.await`.
//! - Overlapping operations are not serialized; whichever settles last
//!   writes the flags last.

use super::action::{Operation, Phase, SyncAction, UiAction};
use super::api::{DepartmentApi, DepartmentInput};
use super::error::SyncError;
use super::state::SyncState;
use crate::config::REMOTE_TIMEOUT;
use crate::model::department::{Department, DepartmentId, DepartmentPatch, NewDepartment};
use crate::service::form::{DepartmentForm, FormSubmission};
use log::{info, warn};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Department store synchronized with the remote service.
pub struct RemoteDepartmentStore<A: DepartmentApi> {
    api: A,
    state: Mutex<SyncState>,
    timeout: Duration,
}

impl<A: DepartmentApi> RemoteDepartmentStore<A> {
    /// Creates an empty store bounded by the default 5 s timeout.
    pub fn new(api: A) -> Self {
        Self::with_timeout(api, REMOTE_TIMEOUT)
    }

    pub fn with_timeout(api: A, timeout: Duration) -> Self {
        Self {
            api,
            state: Mutex::new(SyncState::new()),
            timeout,
        }
    }

    /// Copy of the current observable state.
    pub fn snapshot(&self) -> SyncState {
        self.lock().clone()
    }

    /// Runs `read` against the current state without copying it.
    pub fn with_state<T>(&self, read: impl FnOnce(&SyncState) -> T) -> T {
        read(&*self.lock())
    }

    /// Applies a synchronous UI action.
    pub fn dispatch_ui(&self, action: UiAction) {
        self.lock().apply_ui(action);
    }

    /// Loads the full collection, replacing whatever is held locally.
    pub async fn fetch(&self) {
        self.dispatch(SyncAction::Fetch(Phase::Pending));
        let started_at = Instant::now();
        let result = self.bounded(self.api.fetch_all()).await;
        self.settle(Operation::Fetch, started_at, result, |items| {
            SyncAction::Fetch(Phase::Fulfilled(items))
        });
    }

    /// Creates a department remotely and appends the server's record.
    ///
    /// A requested `parent_id` is rejected without a request.
    pub async fn create(&self, input: NewDepartment) {
        self.dispatch(SyncAction::Create(Phase::Pending));
        let started_at = Instant::now();
        let result = match input.normalized() {
            Ok(input) if input.parent_id.is_some() => Err(SyncError::ParentChangeUnsupported),
            Ok(input) => {
                let payload = DepartmentInput {
                    name: input.name,
                    sub_departments: input.sub_departments,
                };
                self.bounded(self.api.create(&payload)).await
            }
            Err(err) => Err(err.into()),
        };
        self.settle(Operation::Create, started_at, result, |created| {
            SyncAction::Create(Phase::Fulfilled(created))
        });
    }

    /// Shallow-merges `patch` onto the held record and sends the result.
    ///
    /// A patch that would change `parent_id` is rejected without a request.
    pub async fn update(&self, id: &DepartmentId, patch: &DepartmentPatch) {
        self.dispatch(SyncAction::Update(Phase::Pending));
        let started_at = Instant::now();
        let result = match self.merged(id, patch) {
            Ok(merged) => {
                let payload = DepartmentInput {
                    name: merged.name,
                    sub_departments: merged.sub_departments,
                };
                self.bounded(self.api.update(id, &payload)).await
            }
            Err(err) => Err(err),
        };
        self.settle(Operation::Update, started_at, result, |updated| {
            SyncAction::Update(Phase::Fulfilled(updated))
        });
    }

    /// Deletes remotely and drops the record locally.
    ///
    /// Children keep their `parent_id` until the next fetch.
    pub async fn delete(&self, id: &DepartmentId) {
        self.dispatch(SyncAction::Delete(Phase::Pending));
        let started_at = Instant::now();
        let result = self.bounded(self.api.delete(id)).await;
        self.settle(Operation::Delete, started_at, result, |deleted| {
            SyncAction::Delete(Phase::Fulfilled(deleted))
        });
    }

    /// Submits a department form as a create or an update.
    pub async fn submit(&self, form: &DepartmentForm) {
        match form.submission() {
            FormSubmission::Create(input) => self.create(input).await,
            FormSubmission::Update { id, patch } => self.update(&id, &patch).await,
        }
    }

    fn merged(&self, id: &DepartmentId, patch: &DepartmentPatch) -> Result<Department, SyncError> {
        let mut target = self
            .with_state(|state| state.departments.get(id).cloned())
            .ok_or_else(|| SyncError::NotFound(id.clone()))?;
        if patch
            .parent_id
            .as_ref()
            .is_some_and(|parent_id| *parent_id != target.parent_id)
        {
            return Err(SyncError::ParentChangeUnsupported);
        }
        patch.apply_to(&mut target)?;
        Ok(target)
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, SyncError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SyncError::timeout(self.timeout)),
        }
    }

    fn settle<T>(
        &self,
        operation: Operation,
        started_at: Instant,
        result: Result<T, SyncError>,
        fulfilled: impl FnOnce(T) -> SyncAction,
    ) {
        let duration_ms = started_at.elapsed().as_millis();
        let action = match result {
            Ok(value) => {
                info!(
                    "event=remote_{} module=sync status=ok duration_ms={duration_ms}",
                    operation.as_str()
                );
                fulfilled(value)
            }
            Err(err) => {
                warn!(
                    "event=remote_{} module=sync status=error duration_ms={duration_ms} network={} error={}",
                    operation.as_str(),
                    err.is_network(),
                    err
                );
                let message = match &err {
                    SyncError::Network(_) => err
                        .message()
                        .or_else(|| Some(operation.network_fallback().to_string())),
                    _ => err.message(),
                };
                rejected(operation, message)
            }
        };
        self.dispatch(action);
    }

    fn dispatch(&self, action: SyncAction) {
        self.lock().apply(action);
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn rejected(operation: Operation, message: Option<String>) -> SyncAction {
    match operation {
        Operation::Fetch => SyncAction::Fetch(Phase::Rejected(message)),
        Operation::Create => SyncAction::Create(Phase::Rejected(message)),
        Operation::Update => SyncAction::Update(Phase::Rejected(message)),
        Operation::Delete => SyncAction::Delete(Phase::Rejected(message)),
    }
}
