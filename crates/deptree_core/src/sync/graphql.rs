//! GraphQL-over-HTTP implementation of the remote department API.
//!
//! # Responsibility
//! - Build query/mutation bodies and attach the optional bearer token.
//! - Turn GraphQL envelopes and transport failures into `SyncError`.
//!
//! # Invariants
//! - The first GraphQL error message wins over every other failure detail.
//! - Request bodies never carry blank sub-department names.

use super::action::Operation;
use super::api::{DepartmentApi, DepartmentInput};
use super::credentials::CredentialProvider;
use super::error::SyncError;
use crate::config::RemoteConfig;
use crate::model::department::{Department, DepartmentId, SubDepartment};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

const FETCH_QUERY: &str = "query {
  getDepartments {
    id
    name
    subDepartments {
      id
      name
    }
  }
}";

const CREATE_MUTATION: &str = "mutation CreateDepartment($input: CreateDepartmentInput!) {
  createDepartment(input: $input) {
    id
    name
    subDepartments {
      name
    }
  }
}";

const UPDATE_MUTATION: &str =
    "mutation UpdateDepartment($id: Int!, $input: UpdateDepartmentInput!) {
  updateDepartment(id: $id, input: $input) {
    id
    name
    subDepartments {
      name
    }
  }
}";

const DELETE_MUTATION: &str = "mutation DeleteDepartment($id: Int!) {
  deleteDepartment(id: $id)
}";

/// Reqwest-backed GraphQL client.
pub struct GraphqlDepartmentApi {
    client: reqwest::Client,
    config: RemoteConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl GraphqlDepartmentApi {
    pub fn new(config: RemoteConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self::with_client(reqwest::Client::new(), config, credentials)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: RemoteConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            client,
            config,
            credentials,
        }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    async fn execute(
        &self,
        operation: Operation,
        body: Value,
        field: &str,
    ) -> Result<Value, SyncError> {
        let mut request = self
            .client
            .post(self.config.endpoint.as_str())
            .timeout(self.config.timeout)
            .json(&body);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.transport_error(operation, err))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.transport_error(operation, err))?;
        debug!(
            "event=graphql_response module=sync operation={} http_status={} body_bytes={}",
            operation.as_str(),
            status.as_u16(),
            text.len()
        );

        extract_field(operation, status.is_success(), status.as_u16(), &text, field)
    }

    fn transport_error(&self, operation: Operation, err: reqwest::Error) -> SyncError {
        if err.is_timeout() {
            return SyncError::timeout(self.config.timeout);
        }
        let message = err.to_string();
        if message.is_empty() {
            SyncError::Network(operation.network_fallback().to_string())
        } else {
            SyncError::Network(message)
        }
    }
}

#[async_trait]
impl DepartmentApi for GraphqlDepartmentApi {
    async fn fetch_all(&self) -> Result<Vec<Department>, SyncError> {
        let value = self
            .execute(
                Operation::Fetch,
                json!({ "query": FETCH_QUERY }),
                "getDepartments",
            )
            .await?;
        let items: Vec<WireDepartment> = decode(value, "getDepartments")?;
        items
            .into_iter()
            .map(|item| item.into_department(None))
            .collect()
    }

    async fn create(&self, input: &DepartmentInput) -> Result<Department, SyncError> {
        let value = self
            .execute(
                Operation::Create,
                json!({ "query": CREATE_MUTATION, "variables": { "input": input } }),
                "createDepartment",
            )
            .await?;
        decode::<WireDepartment>(value, "createDepartment")?.into_department(None)
    }

    async fn update(
        &self,
        id: &DepartmentId,
        input: &DepartmentInput,
    ) -> Result<Department, SyncError> {
        let value = self
            .execute(
                Operation::Update,
                json!({ "query": UPDATE_MUTATION, "variables": { "id": id, "input": input } }),
                "updateDepartment",
            )
            .await?;
        decode::<WireDepartment>(value, "updateDepartment")?.into_department(Some(id))
    }

    async fn delete(&self, id: &DepartmentId) -> Result<DepartmentId, SyncError> {
        self.execute(
            Operation::Delete,
            json!({ "query": DELETE_MUTATION, "variables": { "id": id } }),
            "deleteDepartment",
        )
        .await?;
        Ok(id.clone())
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Department as returned by the service; every field but `name` is optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireDepartment {
    #[serde(default)]
    id: Option<DepartmentId>,
    name: String,
    #[serde(default)]
    parent_id: Option<DepartmentId>,
    #[serde(default)]
    sub_departments: Option<Vec<SubDepartment>>,
}

impl WireDepartment {
    fn into_department(self, fallback_id: Option<&DepartmentId>) -> Result<Department, SyncError> {
        let id = self
            .id
            .or_else(|| fallback_id.cloned())
            .ok_or_else(|| SyncError::Remote("department payload is missing `id`".to_string()))?;
        Ok(Department {
            id,
            name: self.name,
            parent_id: self.parent_id,
            sub_departments: self.sub_departments.unwrap_or_default(),
        })
    }
}

/// Pulls `data.<field>` out of a GraphQL response body.
fn extract_field(
    operation: Operation,
    is_success: bool,
    status: u16,
    body: &str,
    field: &str,
) -> Result<Value, SyncError> {
    let envelope: GraphqlEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !is_success => return Err(status_error(status)),
        Err(err) => {
            return Err(SyncError::Network(format!(
                "invalid response body: {err}"
            )))
        }
    };

    if let Some(errors) = envelope.errors {
        let message = errors
            .into_iter()
            .find_map(|entry| entry.message.filter(|value| !value.is_empty()))
            .unwrap_or_else(|| operation.rejected_fallback().to_string());
        return Err(SyncError::Remote(message));
    }
    if !is_success {
        return Err(status_error(status));
    }

    match envelope.data.and_then(|mut data| data.get_mut(field).map(Value::take)) {
        Some(value) if !value.is_null() => Ok(value),
        // Deletes only acknowledge; an error-free response is success.
        _ if operation == Operation::Delete => Ok(Value::Null),
        _ if operation == Operation::Fetch => Err(SyncError::Remote(
            "No departments found in response".to_string(),
        )),
        _ => Err(SyncError::Remote(operation.rejected_fallback().to_string())),
    }
}

fn status_error(status: u16) -> SyncError {
    SyncError::Network(format!("Request failed with status code {status}"))
}

fn decode<T: DeserializeOwned>(value: Value, field: &str) -> Result<T, SyncError> {
    serde_json::from_value(value)
        .map_err(|err| SyncError::Remote(format!("invalid `{field}` payload: {err}")))
}
