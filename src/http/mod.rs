//! HTTP delivery
//!
//! Response documents and faults both travel as `application/xml`. Faults
//! render as `ows:ExceptionReport` with the matching HTTP status; errors that
//! already carry an HTTP status pass through unchanged.

use std::fs;
use std::io::ErrorKind;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::exception::WpsError;
use crate::response::ExecuteResponse;
use crate::xml::to_bytes_pretty;

/// Content type for response documents and faults.
pub const CONTENT_TYPE_XML: &str = "application/xml";

/// An `application/xml` response body.
pub struct XmlResponse(pub Vec<u8>);

impl IntoResponse for XmlResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, CONTENT_TYPE_XML)], self.0).into_response()
    }
}

impl WpsError {
    /// HTTP status this fault maps to.
    pub fn http_status(&self) -> StatusCode {
        match self {
            WpsError::Http { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            WpsError::StatusNotFound(_) => StatusCode::NOT_FOUND,
            WpsError::InvalidParameterValue { .. } | WpsError::MissingParameterValue(_) => {
                StatusCode::BAD_REQUEST
            }
            WpsError::OperationNotSupported(_) => StatusCode::NOT_IMPLEMENTED,
            WpsError::NoApplicableCode(_)
            | WpsError::WriteFailure(_)
            | WpsError::OutputSerialization(_)
            | WpsError::DocumentSerialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WpsError {
    fn into_response(self) -> Response {
        if let WpsError::Http { message, .. } = &self {
            // Already an HTTP-shaped error; no WPS fault wrapping.
            return (self.http_status(), message.clone()).into_response();
        }

        let status = self.http_status();
        match to_bytes_pretty(&self.report_xml()) {
            Ok(body) => {
                (status, [(header::CONTENT_TYPE, CONTENT_TYPE_XML)], body).into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to render exception report");
                (StatusCode::INTERNAL_SERVER_ERROR, "exception report unavailable")
                    .into_response()
            }
        }
    }
}

/// Deliver an execute response over HTTP.
///
/// Rebuilds the document from current state. A terminal status triggers run
/// cleanup when `store.cleanup` is enabled; cleanup failure at delivery time
/// is logged, not fatal, since the document is already built.
pub fn respond(response: &ExecuteResponse) -> Result<XmlResponse, WpsError> {
    let doc = response.construct_doc()?;
    let body = to_bytes_pretty(&doc)?;

    if response.status().is_terminal() && response.context().cleanup {
        if let Err(e) = response.process().clean() {
            tracing::error!(
                run_id = %response.run_id(),
                error = %e,
                "run cleanup failed after delivery"
            );
        }
    }

    Ok(XmlResponse(body))
}

/// Shared state for the status routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
}

/// Router serving persisted status documents under `/outputs`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/outputs/:file", get(status_document))
        .with_state(state)
}

/// Serve a persisted status document (`statusLocation` target).
pub async fn status_document(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<XmlResponse, WpsError> {
    // Only `<uuid>.xml` names resolve; everything else is rejected before it
    // can touch the filesystem.
    let run_id = file
        .strip_suffix(".xml")
        .and_then(|stem| Uuid::parse_str(stem).ok())
        .ok_or_else(|| WpsError::InvalidParameterValue {
            parameter: "run_id".to_string(),
            message: format!("not a status document name: {:?}", file),
        })?;

    let location = state.config.status_location(&run_id);
    match fs::read(&location) {
        Ok(bytes) => Ok(XmlResponse(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(WpsError::StatusNotFound(run_id.to_string()))
        }
        Err(e) => Err(WpsError::NoApplicableCode(format!(
            "reading status document failed: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, StoreConfig};
    use crate::process::ProcessMetadata;
    use crate::request::ExecuteRequest;
    use crate::status::{ExecutionStatus, StatusPercentage};
    use axum::body::to_bytes;
    use tempfile::TempDir;

    fn test_config(output_path: &std::path::Path) -> ServiceConfig {
        ServiceConfig {
            server: ServerConfig {
                url: "http://localhost:5000/wps".to_string(),
                bind: "127.0.0.1:5000".to_string(),
                language: "en-US".to_string(),
            },
            store: StoreConfig {
                output_path: output_path.to_path_buf(),
                output_url: "http://localhost:5000/outputs".to_string(),
                cleanup: true,
            },
        }
    }

    fn state(dir: &TempDir) -> AppState {
        AppState {
            config: Arc::new(test_config(dir.path())),
        }
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_xml_response_content_type() {
        let response = XmlResponse(b"<doc/>".to_vec()).into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_XML
        );
        assert_eq!(body_string(response).await, "<doc/>");
    }

    #[tokio::test]
    async fn test_fault_renders_exception_report() {
        let response = WpsError::StatusNotFound("abc".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            CONTENT_TYPE_XML
        );
        let body = body_string(response).await;
        assert!(body.contains("ows:ExceptionReport"));
        assert!(body.contains("NoApplicableCode"));
    }

    #[tokio::test]
    async fn test_http_error_passes_through_unwrapped() {
        let response = WpsError::Http {
            status: 418,
            message: "teapot".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        let body = body_string(response).await;
        assert_eq!(body, "teapot");
        assert!(!body.contains("ExceptionReport"));
    }

    #[tokio::test]
    async fn test_respond_delivers_document_and_cleans_terminal_run() {
        let dir = TempDir::new().unwrap();
        let workdir = dir.path().join("work");
        fs::create_dir(&workdir).unwrap();

        let process = ProcessMetadata::new("greeter", "Greeter", "1.0").with_workdir(&workdir);
        let context = test_config(dir.path()).context();
        let mut response =
            ExecuteResponse::new(Uuid::new_v4(), process, ExecuteRequest::new(), context);
        response.update_status(
            ExecutionStatus::DoneStatus,
            "done",
            StatusPercentage::new(100).unwrap(),
        );

        let xml = respond(&response).unwrap();
        assert!(String::from_utf8(xml.0).unwrap().contains("wps:ProcessSucceeded"));
        assert!(!workdir.exists());
    }

    #[tokio::test]
    async fn test_respond_honors_cleanup_opt_out() {
        let dir = TempDir::new().unwrap();
        let workdir = dir.path().join("work");
        fs::create_dir(&workdir).unwrap();

        let mut config = test_config(dir.path());
        config.store.cleanup = false;

        let process = ProcessMetadata::new("greeter", "Greeter", "1.0").with_workdir(&workdir);
        let mut response =
            ExecuteResponse::new(Uuid::new_v4(), process, ExecuteRequest::new(), config.context());
        response.update_status(
            ExecutionStatus::DoneStatus,
            "done",
            StatusPercentage::new(100).unwrap(),
        );

        respond(&response).unwrap();
        assert!(workdir.exists());
    }

    #[tokio::test]
    async fn test_respond_keeps_workdir_for_running_process() {
        let dir = TempDir::new().unwrap();
        let workdir = dir.path().join("work");
        fs::create_dir(&workdir).unwrap();

        let process = ProcessMetadata::new("greeter", "Greeter", "1.0").with_workdir(&workdir);
        let context = test_config(dir.path()).context();
        let mut response =
            ExecuteResponse::new(Uuid::new_v4(), process, ExecuteRequest::new(), context);
        response.update_status(
            ExecutionStatus::StoreAndUpdateStatus,
            "crunching",
            StatusPercentage::new(40).unwrap(),
        );

        respond(&response).unwrap();
        assert!(workdir.exists());
    }

    #[tokio::test]
    async fn test_status_document_served() {
        let dir = TempDir::new().unwrap();
        let run_id = Uuid::new_v4();
        let stored = b"<?xml version=\"1.0\"?><wps:ExecuteResponse/>".to_vec();
        fs::write(dir.path().join(format!("{}.xml", run_id)), &stored).unwrap();

        let result = status_document(State(state(&dir)), Path(format!("{}.xml", run_id)))
            .await
            .unwrap();
        assert_eq!(result.0, stored);
    }

    #[tokio::test]
    async fn test_status_document_unknown_run() {
        let dir = TempDir::new().unwrap();
        let result =
            status_document(State(state(&dir)), Path(format!("{}.xml", Uuid::new_v4()))).await;
        assert!(matches!(result, Err(WpsError::StatusNotFound(_))));
    }

    #[tokio::test]
    async fn test_status_document_rejects_non_run_names() {
        let dir = TempDir::new().unwrap();
        for name in ["../etc/passwd", "run.xml", "nope", "a.xml.xml"] {
            let result = status_document(State(state(&dir)), Path(name.to_string())).await;
            assert!(
                matches!(result, Err(WpsError::InvalidParameterValue { .. })),
                "{} should be rejected",
                name
            );
        }
    }
}
