//! Status document lifecycle tests
//!
//! Drives a run through accepted → started → succeeded the way the executor
//! would, with the status file persisted at every step, plus the failure path
//! and the lineage echo.

use std::fs;

use tempfile::TempDir;
use uuid::Uuid;

use wps_status::config::{ServerConfig, ServiceConfig, StoreConfig};
use wps_status::process::{LiteralInput, LiteralOutput, ProcessMetadata};
use wps_status::{ExecuteRequest, ExecuteResponse, ExecutionStatus, StatusPercentage};

fn config(dir: &TempDir) -> ServiceConfig {
    ServiceConfig {
        server: ServerConfig {
            url: "http://wps.example.org/wps".to_string(),
            bind: "127.0.0.1:5000".to_string(),
            language: "en-US".to_string(),
        },
        store: StoreConfig {
            output_path: dir.path().to_path_buf(),
            output_url: "http://wps.example.org/outputs".to_string(),
            cleanup: true,
        },
    }
}

fn make_response(dir: &TempDir, run_id: Uuid, request: ExecuteRequest) -> ExecuteResponse {
    let config = config(dir);
    let process = ProcessMetadata::new("greeter", "Greeter", "1.0")
        .with_abstract("Greets the caller")
        .with_status_store(config.status_location(&run_id), config.status_url(&run_id));

    ExecuteResponse::new(run_id, process, request, config.context())
        .with_output(Box::new(LiteralOutput::new(
            "greeting",
            "Greeting",
            "string",
            "hello ada",
        )))
        .with_output(Box::new(LiteralOutput::new(
            "length",
            "Greeting length",
            "integer",
            "9",
        )))
}

fn stored_doc(dir: &TempDir, run_id: Uuid) -> String {
    let path = dir.path().join(format!("{}.xml", run_id));
    String::from_utf8(fs::read(path).unwrap()).unwrap()
}

#[test]
fn test_accepted_then_started_then_succeeded() {
    let dir = TempDir::new().unwrap();
    let run_id = Uuid::new_v4();
    let mut response = make_response(&dir, run_id, ExecuteRequest::new());

    // accepted
    response.update_status(
        ExecutionStatus::StoreAndUpdateStatus,
        "",
        StatusPercentage::ZERO,
    );
    response.write_response_doc(true).unwrap();
    let doc = stored_doc(&dir, run_id);
    assert!(doc.contains("wps:ProcessAccepted"));
    assert!(doc.contains("Process greeter accepted"));
    assert!(!doc.contains("percentCompleted"));

    // progress updates overwrite the same file
    response.update_status(
        ExecutionStatus::StoreAndUpdateStatus,
        "half way",
        StatusPercentage::new(50).unwrap(),
    );
    response.write_response_doc(true).unwrap();
    let doc = stored_doc(&dir, run_id);
    assert!(doc.contains("wps:ProcessStarted"));
    assert!(doc.contains("percentCompleted=\"50\""));
    assert!(!doc.contains("wps:ProcessAccepted"));

    // done
    response.update_status(
        ExecutionStatus::DoneStatus,
        "finished",
        StatusPercentage::new(100).unwrap(),
    );
    response.write_response_doc(true).unwrap();
    let doc = stored_doc(&dir, run_id);
    assert!(doc.contains("wps:ProcessSucceeded"));
    assert!(doc.contains("wps:ProcessOutputs"));

    // outputs in collection order
    let greeting = doc.find("greeting").unwrap();
    let length = doc.find("length").unwrap();
    assert!(greeting < length, "outputs must keep collection order");
}

#[test]
fn test_document_envelope_attributes() {
    let dir = TempDir::new().unwrap();
    let run_id = Uuid::new_v4();
    let mut response = make_response(&dir, run_id, ExecuteRequest::new());
    response.update_status(
        ExecutionStatus::StoreAndUpdateStatus,
        "",
        StatusPercentage::ZERO,
    );
    response.write_response_doc(true).unwrap();

    let doc = stored_doc(&dir, run_id);
    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(doc.contains("service=\"WPS\""));
    assert!(doc.contains("version=\"1.0.0\""));
    assert!(doc.contains("xml:lang=\"en-US\""));
    assert!(doc.contains(
        "serviceInstance=\"http://wps.example.org/wps?service=WPS&amp;request=GetCapabilities\""
    ));
    assert!(doc.contains(&format!(
        "statusLocation=\"http://wps.example.org/outputs/{}.xml\"",
        run_id
    )));
}

#[test]
fn test_failure_path_stores_exception_report() {
    let dir = TempDir::new().unwrap();
    let run_id = Uuid::new_v4();
    let mut response = make_response(&dir, run_id, ExecuteRequest::new());

    response.update_status(
        ExecutionStatus::ErrorStatus,
        "out of memory",
        StatusPercentage::failure(),
    );
    response.write_response_doc(true).unwrap();

    let doc = stored_doc(&dir, run_id);
    assert!(doc.contains("wps:ProcessFailed"));
    assert!(doc.contains("ows:ExceptionReport"));
    assert!(doc.contains("exceptionCode=\"NoApplicableCode\""));
    assert!(doc.contains("out of memory"));
    assert!(!doc.contains("wps:ProcessOutputs"));
}

#[test]
fn test_lineage_echo_round_trips_through_disk() {
    let dir = TempDir::new().unwrap();
    let run_id = Uuid::new_v4();
    let request = ExecuteRequest::new()
        .with_lineage()
        .with_input(Box::new(LiteralInput::new("name", "Name", "string", "ada")));
    let mut response = make_response(&dir, run_id, request);

    response.update_status(
        ExecutionStatus::DoneStatus,
        "finished",
        StatusPercentage::new(100).unwrap(),
    );
    response.write_response_doc(true).unwrap();

    let doc = stored_doc(&dir, run_id);
    let inputs = doc.find("wps:DataInputs").unwrap();
    let definitions = doc.find("wps:OutputDefinitions").unwrap();
    let outputs = doc.find("wps:ProcessOutputs").unwrap();
    assert!(inputs < definitions && definitions < outputs);
    assert!(doc.contains("ada"));
}

#[test]
fn test_unstored_statuses_leave_no_file() {
    let dir = TempDir::new().unwrap();
    let run_id = Uuid::new_v4();
    let mut response = make_response(&dir, run_id, ExecuteRequest::new());

    response.write_response_doc(true).unwrap();
    response.update_status(ExecutionStatus::StoreStatus, "", StatusPercentage::ZERO);
    response.write_response_doc(true).unwrap();

    assert!(!dir.path().join(format!("{}.xml", run_id)).exists());
}
