//! The execute-response builder.
//!
//! The document is a pure function of the current run state: every render
//! call rebuilds the full tree and selects exactly one status branch from
//! the status/percentage pair. Persistence rewrites the status file in place
//! and syncs it to stable storage before returning.

use std::fs::File;
use std::io::Write;

use chrono::Utc;
use uuid::Uuid;

use crate::config::ServiceContext;
use crate::exception::{exception_report, ExceptionCode, WpsError};
use crate::process::{ExecuteOutput, InOutError, ProcessMetadata};
use crate::request::ExecuteRequest;
use crate::status::{ExecutionStatus, StatusPercentage};
use crate::xml::{ns, to_bytes_pretty, XmlElement};

/// `version` attribute on the response document.
pub const WPS_VERSION: &str = "1.0.0";

/// `xsi:schemaLocation` for the execute-response schema.
pub const SCHEMA_LOCATION: &str = "http://www.opengis.net/wps/1.0.0 \
     http://schemas.opengis.net/wps/1.0.0/wpsExecute_response.xsd";

/// Execute-response state for a single run.
pub struct ExecuteResponse {
    run_id: Uuid,
    status: ExecutionStatus,
    percentage: StatusPercentage,
    message: String,
    context: ServiceContext,
    process: ProcessMetadata,
    request: ExecuteRequest,
    outputs: Vec<Box<dyn ExecuteOutput + Send + Sync>>,
}

impl ExecuteResponse {
    /// Create a response for a run, with no status reporting requested yet.
    pub fn new(
        run_id: Uuid,
        process: ProcessMetadata,
        request: ExecuteRequest,
        context: ServiceContext,
    ) -> Self {
        ExecuteResponse {
            run_id,
            status: ExecutionStatus::NoStatus,
            percentage: StatusPercentage::ZERO,
            message: String::new(),
            context,
            process,
            request,
            outputs: Vec::new(),
        }
    }

    /// Add a process output; collection order is preserved in the document.
    pub fn with_output(mut self, output: Box<dyn ExecuteOutput + Send + Sync>) -> Self {
        self.outputs.push(output);
        self
    }

    /// Update the run state the next render call reflects.
    pub fn update_status(
        &mut self,
        status: ExecutionStatus,
        message: impl Into<String>,
        percentage: StatusPercentage,
    ) {
        self.status = status;
        self.message = message.into();
        self.percentage = percentage;
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn status(&self) -> ExecutionStatus {
        self.status
    }

    pub fn percentage(&self) -> StatusPercentage {
        self.percentage
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn process(&self) -> &ProcessMetadata {
        &self.process
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Build the full response document for the current state.
    pub fn construct_doc(&self) -> Result<XmlElement, WpsError> {
        let mut doc = XmlElement::new("wps:ExecuteResponse")
            .with_attr("xmlns:wps", ns::WPS)
            .with_attr("xmlns:ows", ns::OWS)
            .with_attr("xmlns:xsi", ns::XSI)
            .with_attr("xmlns:xlink", ns::XLINK)
            .with_attr("xsi:schemaLocation", SCHEMA_LOCATION)
            .with_attr("service", "WPS")
            .with_attr("version", WPS_VERSION)
            .with_attr("xml:lang", &self.context.language)
            .with_attr("serviceInstance", &self.context.service_instance);

        if self.status >= ExecutionStatus::StoreStatus && self.process.status_location.is_some() {
            if let Some(url) = &self.process.status_url {
                doc.set_attr("statusLocation", url);
            }
        }

        doc.push(self.process_header());

        // The failure sentinel wins over any status value.
        if self.percentage.is_failure() {
            doc.push(self.process_failed());
            return Ok(doc);
        }

        if self.status == ExecutionStatus::StoreAndUpdateStatus {
            if self.percentage.value() == 0 {
                doc.push(self.process_accepted());
            } else {
                doc.push(self.process_started());
            }
            return Ok(doc);
        }

        if self.status == ExecutionStatus::DoneStatus {
            doc.push(self.process_succeeded());

            if self.request.lineage {
                // Lineage is best-effort supplementary output; a broken input
                // echo must not abort the response.
                match self.lineage_inputs() {
                    Ok(inputs) => doc.push(inputs),
                    Err(e) => tracing::error!(
                        run_id = %self.run_id,
                        error = %e,
                        "failed to serialize lineage inputs, omitting wps:DataInputs"
                    ),
                }
                doc.push(self.lineage_output_definitions()?);
            }

            doc.push(self.process_outputs()?);
        }

        Ok(doc)
    }

    /// Persist the document to the run's status file.
    ///
    /// No-op below the store-and-update threshold. The write is durable: the
    /// file is flushed and synced before this returns, so readers never
    /// observe a partial document. After a terminal status is stored, cleans
    /// up the run workdir unless `clean` is false or `store.cleanup` is
    /// disabled in configuration.
    pub fn write_response_doc(&self, clean: bool) -> Result<(), WpsError> {
        if self.status < ExecutionStatus::StoreAndUpdateStatus {
            return Ok(());
        }

        let doc = self.construct_doc()?;
        let bytes = to_bytes_pretty(&doc)?;

        let Some(location) = &self.process.status_location else {
            return Err(WpsError::WriteFailure(
                "no status location configured".to_string(),
            ));
        };

        let mut file = File::create(location).map_err(write_failure)?;
        file.write_all(&bytes).map_err(write_failure)?;
        file.flush().map_err(write_failure)?;
        file.sync_all().map_err(write_failure)?;

        if self.status.is_terminal() && clean && self.context.cleanup {
            self.process.clean().map_err(write_failure)?;
        }

        Ok(())
    }

    fn process_header(&self) -> XmlElement {
        let mut header = XmlElement::new("wps:Process")
            .with_attr("wps:processVersion", &self.process.version)
            .with_child(XmlElement::new("ows:Identifier").with_text(&self.process.identifier))
            .with_child(XmlElement::new("ows:Title").with_text(&self.process.title));

        if let Some(text) = &self.process.abstract_text {
            header.push(XmlElement::new("ows:Abstract").with_text(text));
        }
        if let Some(profile) = &self.process.profile {
            header.push(XmlElement::new("ows:Profile").with_text(profile));
        }

        header
    }

    fn status_element(&self, branch: XmlElement) -> XmlElement {
        XmlElement::new("wps:Status")
            .with_attr("creationTime", creation_time())
            .with_child(branch)
    }

    /// `wps:ProcessAccepted` fragment with the default accepted message.
    pub fn process_accepted(&self) -> XmlElement {
        let message = format!("Process {} accepted", self.process.identifier);
        self.status_element(XmlElement::new("wps:ProcessAccepted").with_text(message))
    }

    /// `wps:ProcessStarted` fragment with the progress percentage.
    pub fn process_started(&self) -> XmlElement {
        self.status_element(
            XmlElement::new("wps:ProcessStarted")
                .with_attr("percentCompleted", self.percentage.value().to_string())
                .with_text(&self.message),
        )
    }

    /// `wps:ProcessPaused` fragment.
    ///
    /// No lifecycle status selects this branch yet; the fragment exists
    /// because the schema defines it, and a paused state upstream would wire
    /// straight in.
    pub fn process_paused(&self) -> XmlElement {
        self.status_element(
            XmlElement::new("wps:ProcessPaused")
                .with_attr("percentCompleted", self.percentage.value().to_string())
                .with_text(&self.message),
        )
    }

    /// `wps:ProcessSucceeded` fragment.
    pub fn process_succeeded(&self) -> XmlElement {
        self.status_element(XmlElement::new("wps:ProcessSucceeded").with_text(&self.message))
    }

    /// `wps:ProcessFailed` fragment wrapping an exception report.
    pub fn process_failed(&self) -> XmlElement {
        let report = exception_report(ExceptionCode::NoApplicableCode, None, &self.message);
        self.status_element(XmlElement::new("wps:ProcessFailed").with_child(report))
    }

    fn lineage_inputs(&self) -> Result<XmlElement, InOutError> {
        let mut inputs = XmlElement::new("wps:DataInputs");
        for input in &self.request.inputs {
            inputs.push(input.execute_xml()?);
        }
        Ok(inputs)
    }

    fn lineage_output_definitions(&self) -> Result<XmlElement, WpsError> {
        let mut definitions = XmlElement::new("wps:OutputDefinitions");
        for output in &self.outputs {
            definitions.push(output.execute_xml_lineage()?);
        }
        Ok(definitions)
    }

    fn process_outputs(&self) -> Result<XmlElement, WpsError> {
        let mut outputs = XmlElement::new("wps:ProcessOutputs");
        for output in &self.outputs {
            outputs.push(output.execute_xml()?);
        }
        Ok(outputs)
    }
}

/// `creationTime` attribute value: UTC, second precision.
fn creation_time() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn write_failure(e: std::io::Error) -> WpsError {
    WpsError::WriteFailure(e.to_string())
}
