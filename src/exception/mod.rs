//! OWS exception registry and the WPS fault type
//!
//! Faults surface to clients as `ows:ExceptionReport` documents. Every error
//! maps to one of the standard OWS exception codes; anything without a more
//! specific code falls back to `NoApplicableCode`.

use crate::process::InOutError;
use crate::xml::{ns, XmlElement, XmlWriteError};

/// OWS 1.1 version carried on exception reports.
pub const OWS_VERSION: &str = "1.0.0";

/// Standard OWS exception codes for WPS faults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionCode {
    /// No other code applies
    NoApplicableCode,
    /// Request parameter has an invalid value
    InvalidParameterValue,
    /// Required request parameter is absent
    MissingParameterValue,
    /// Requested operation is not supported
    OperationNotSupported,
}

impl ExceptionCode {
    /// Returns the schema string for this exception code
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionCode::NoApplicableCode => "NoApplicableCode",
            ExceptionCode::InvalidParameterValue => "InvalidParameterValue",
            ExceptionCode::MissingParameterValue => "MissingParameterValue",
            ExceptionCode::OperationNotSupported => "OperationNotSupported",
        }
    }
}

impl std::fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// WPS service fault
#[derive(Debug, thiserror::Error)]
pub enum WpsError {
    #[error("no applicable code: {0}")]
    NoApplicableCode(String),

    #[error("invalid value for parameter {parameter}: {message}")]
    InvalidParameterValue { parameter: String, message: String },

    #[error("missing parameter value: {0}")]
    MissingParameterValue(String),

    #[error("operation not supported: {0}")]
    OperationNotSupported(String),

    #[error("writing response document failed: {0}")]
    WriteFailure(String),

    #[error("no status document for run {0}")]
    StatusNotFound(String),

    #[error("output serialization failed: {0}")]
    OutputSerialization(#[from] InOutError),

    #[error("document serialization failed: {0}")]
    DocumentSerialization(#[from] XmlWriteError),

    /// An error that already carries an HTTP status; delivery passes it
    /// through unchanged instead of wrapping it as a WPS fault.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
}

impl WpsError {
    /// Returns the OWS exception code for this fault
    pub fn code(&self) -> ExceptionCode {
        match self {
            WpsError::InvalidParameterValue { .. } => ExceptionCode::InvalidParameterValue,
            WpsError::MissingParameterValue(_) => ExceptionCode::MissingParameterValue,
            WpsError::OperationNotSupported(_) => ExceptionCode::OperationNotSupported,
            WpsError::NoApplicableCode(_)
            | WpsError::WriteFailure(_)
            | WpsError::StatusNotFound(_)
            | WpsError::OutputSerialization(_)
            | WpsError::DocumentSerialization(_)
            | WpsError::Http { .. } => ExceptionCode::NoApplicableCode,
        }
    }

    /// Locator attribute for the exception element, where one applies.
    pub fn locator(&self) -> Option<&str> {
        match self {
            WpsError::InvalidParameterValue { parameter, .. } => Some(parameter),
            WpsError::MissingParameterValue(parameter) => Some(parameter),
            _ => None,
        }
    }

    /// Render this fault as an `ows:ExceptionReport` tree.
    pub fn report_xml(&self) -> XmlElement {
        exception_report(self.code(), self.locator(), &self.to_string())
    }
}

/// Build an `ows:ExceptionReport` wrapping a single exception.
pub fn exception_report(code: ExceptionCode, locator: Option<&str>, text: &str) -> XmlElement {
    let mut exception = XmlElement::new("ows:Exception").with_attr("exceptionCode", code.as_str());
    if let Some(locator) = locator {
        exception.set_attr("locator", locator);
    }
    exception.push(XmlElement::new("ows:ExceptionText").with_text(text));

    XmlElement::new("ows:ExceptionReport")
        .with_attr("xmlns:ows", ns::OWS)
        .with_attr("version", OWS_VERSION)
        .with_child(exception)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_code_str() {
        assert_eq!(ExceptionCode::NoApplicableCode.as_str(), "NoApplicableCode");
        assert_eq!(
            ExceptionCode::InvalidParameterValue.as_str(),
            "InvalidParameterValue"
        );
    }

    #[test]
    fn test_write_failure_maps_to_no_applicable_code() {
        let err = WpsError::WriteFailure("disk full".to_string());
        assert_eq!(err.code(), ExceptionCode::NoApplicableCode);
        assert!(err.locator().is_none());
    }

    #[test]
    fn test_parameter_errors_carry_locator() {
        let err = WpsError::InvalidParameterValue {
            parameter: "percentage".to_string(),
            message: "out of range".to_string(),
        };
        assert_eq!(err.code(), ExceptionCode::InvalidParameterValue);
        assert_eq!(err.locator(), Some("percentage"));
    }

    #[test]
    fn test_report_xml_shape() {
        let err = WpsError::NoApplicableCode("boom".to_string());
        let report = err.report_xml();

        assert_eq!(report.name(), "ows:ExceptionReport");
        assert_eq!(report.attr("version"), Some(OWS_VERSION));

        let exception = report.find("ows:Exception").unwrap();
        assert_eq!(exception.attr("exceptionCode"), Some("NoApplicableCode"));
        let text = exception.find("ows:ExceptionText").unwrap().text();
        assert!(text.contains("boom"));
    }
}
