//! Output and input descriptors.
//!
//! Each descriptor serializes itself: the full `wps:Output` for the process
//! outputs block, and a definition stub for the lineage echo. The response
//! renderer only sees these trait objects and preserves collection order.

use crate::xml::XmlElement;

/// Errors raised by descriptor serialization
#[derive(Debug, thiserror::Error)]
pub enum InOutError {
    #[error("failed to serialize {identifier}: {message}")]
    Serialization { identifier: String, message: String },
}

impl InOutError {
    pub fn serialization(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        InOutError::Serialization {
            identifier: identifier.into(),
            message: message.into(),
        }
    }
}

/// A process output able to render itself into the response document.
pub trait ExecuteOutput {
    /// Output identifier.
    fn identifier(&self) -> &str;

    /// Full `wps:Output` element carrying the output data.
    fn execute_xml(&self) -> Result<XmlElement, InOutError>;

    /// `wps:Output` definition stub for the lineage echo.
    fn execute_xml_lineage(&self) -> Result<XmlElement, InOutError>;
}

/// A request input able to echo itself into the lineage block.
pub trait ExecuteInput {
    /// Input identifier.
    fn identifier(&self) -> &str;

    /// `wps:Input` element echoing the supplied value.
    fn execute_xml(&self) -> Result<XmlElement, InOutError>;
}

/// A literal-valued process output.
#[derive(Debug, Clone)]
pub struct LiteralOutput {
    pub identifier: String,
    pub title: String,
    pub data_type: String,
    pub value: String,
}

impl LiteralOutput {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        data_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        LiteralOutput {
            identifier: identifier.into(),
            title: title.into(),
            data_type: data_type.into(),
            value: value.into(),
        }
    }

    fn header(&self) -> XmlElement {
        XmlElement::new("wps:Output")
            .with_child(XmlElement::new("ows:Identifier").with_text(&self.identifier))
            .with_child(XmlElement::new("ows:Title").with_text(&self.title))
    }
}

impl ExecuteOutput for LiteralOutput {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn execute_xml(&self) -> Result<XmlElement, InOutError> {
        let data = XmlElement::new("wps:Data").with_child(
            XmlElement::new("wps:LiteralData")
                .with_attr("dataType", &self.data_type)
                .with_text(&self.value),
        );
        Ok(self.header().with_child(data))
    }

    fn execute_xml_lineage(&self) -> Result<XmlElement, InOutError> {
        Ok(self.header())
    }
}

/// A literal-valued request input, echoed in the lineage block.
#[derive(Debug, Clone)]
pub struct LiteralInput {
    pub identifier: String,
    pub title: String,
    pub data_type: String,
    pub value: String,
}

impl LiteralInput {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        data_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        LiteralInput {
            identifier: identifier.into(),
            title: title.into(),
            data_type: data_type.into(),
            value: value.into(),
        }
    }
}

impl ExecuteInput for LiteralInput {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn execute_xml(&self) -> Result<XmlElement, InOutError> {
        let data = XmlElement::new("wps:Data").with_child(
            XmlElement::new("wps:LiteralData")
                .with_attr("dataType", &self.data_type)
                .with_text(&self.value),
        );
        Ok(XmlElement::new("wps:Input")
            .with_child(XmlElement::new("ows:Identifier").with_text(&self.identifier))
            .with_child(XmlElement::new("ows:Title").with_text(&self.title))
            .with_child(data))
    }
}
