//! REST client for the attendance backend
//!
//! Every table is exposed as `GET /api/<table>` returning a JSON array of
//! row objects. Errors come back FastAPI style as `{"detail": "..."}`.

use crate::model::{TableData, TableId};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Path of the backend health endpoint
pub const HEALTH_PATH: &str = "/api/health";

/// Errors from talking to the backend
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not reach backend: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("invalid JSON in response: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("unexpected response: {0}")]
    UnexpectedShape(String),
    #[error("request worker stopped before replying")]
    Interrupted,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Blocking HTTP client bound to one backend base URL
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch every row of a table
    pub fn fetch_table(&self, table: TableId) -> Result<TableData, FetchError> {
        let body = self.get_json(table.endpoint_path())?;
        let rows = parse_rows(body)?;
        debug!(table = %table, rows = rows.len(), "fetched table");
        Ok(TableData::from_rows(&rows))
    }

    /// Ask the backend whether it can reach its database
    pub fn health(&self) -> Result<HealthStatus, FetchError> {
        let body = self.get_json(HEALTH_PATH)?;
        Ok(serde_json::from_value(body)?)
    }

    fn get_json(&self, path: &str) -> Result<Value, FetchError> {
        let response = self.get(path)?;
        let text = response.text()?;
        Ok(serde_json::from_str(&text)?)
    }

    fn get(&self, path: &str) -> Result<Response, FetchError> {
        let url = self.url_for(path);
        debug!(%url, "GET");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let detail = error_detail(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        warn!(%url, status = status.as_u16(), %detail, "backend returned an error");

        Err(FetchError::Status {
            status: status.as_u16(),
            detail,
        })
    }
}

/// Check that a response body is an array of row objects
fn parse_rows(body: Value) -> Result<Vec<Map<String, Value>>, FetchError> {
    let Value::Array(items) = body else {
        return Err(FetchError::UnexpectedShape(
            "expected a JSON array of rows".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(FetchError::UnexpectedShape(format!(
                "row {} is not an object: {}",
                i, other
            ))),
        })
        .collect()
}

/// Pull `detail` out of a FastAPI error body
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_fetch_table_success() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/teachers")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"teacher_id": 1, "full_name": "Nguyen Van A", "email": "a@school.vn", "phone": null},
                    {"teacher_id": 2, "full_name": "Tran Thi B", "email": "b@school.vn", "phone": "0901"}
                ]"#,
            )
            .expect(1)
            .create();

        let data = client_for(&server).fetch_table(TableId::Teachers).unwrap();

        mock.assert();
        assert_eq!(data.headers, vec!["teacher_id", "full_name", "email", "phone"]);
        assert_eq!(data.row_count(), 2);
        assert_eq!(data.rows[0], vec!["1", "Nguyen Van A", "a@school.vn", ""]);
    }

    #[test]
    fn test_fetch_table_empty_array() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/cameras")
            .with_status(200)
            .with_body("[]")
            .create();

        let data = client_for(&server).fetch_table(TableId::Cameras).unwrap();

        mock.assert();
        assert!(data.is_empty());
    }

    #[test]
    fn test_fetch_table_server_error_uses_detail() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/attendance")
            .with_status(500)
            .with_body(r#"{"detail": "database is not connected"}"#)
            .create();

        let err = client_for(&server)
            .fetch_table(TableId::Attendance)
            .unwrap_err();

        mock.assert();
        match err {
            FetchError::Status { status, detail } => {
                assert_eq!(status, 500);
                assert_eq!(detail, "database is not connected");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fetch_table_not_found_without_body() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/api/students").with_status(404).create();

        let err = client_for(&server).fetch_table(TableId::Students).unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "server returned 404: Not Found");
    }

    #[test]
    fn test_fetch_table_rejects_non_array() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/api/classes")
            .with_status(200)
            .with_body(r#"{"message": "Attendance System API"}"#)
            .create();

        let err = client_for(&server).fetch_table(TableId::Classes).unwrap_err();

        assert!(matches!(err, FetchError::UnexpectedShape(_)));
    }

    #[test]
    fn test_fetch_table_rejects_invalid_json() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/api/embeddings")
            .with_status(200)
            .with_body("not json")
            .create();

        let err = client_for(&server)
            .fetch_table(TableId::Embeddings)
            .unwrap_err();

        assert!(matches!(err, FetchError::InvalidJson(_)));
    }

    #[test]
    fn test_health() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", HEALTH_PATH)
            .with_status(200)
            .with_body(r#"{"status": "healthy", "database": "connected"}"#)
            .create();

        let health = client_for(&server).health().unwrap();

        assert!(health.is_healthy());
        assert_eq!(health.database, "connected");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url_for(TableId::Teachers.endpoint_path()),
            "http://localhost:8000/api/teachers"
        );
    }

    #[test]
    fn test_error_detail_non_string() {
        assert_eq!(
            error_detail(r#"{"detail": [{"msg": "bad"}]}"#),
            Some(r#"[{"msg":"bad"}]"#.to_string())
        );
        assert_eq!(error_detail("Internal Server Error"), None);
    }
}
