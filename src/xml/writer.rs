//! Pretty-printed UTF-8 serialization of element trees.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::{XmlElement, XmlNode};

/// Indent width for pretty-printed documents.
const INDENT_WIDTH: usize = 2;

/// Errors while serializing an element tree
#[derive(Debug, thiserror::Error)]
pub enum XmlWriteError {
    #[error("XML write error: {0}")]
    Write(#[from] quick_xml::Error),

    #[error("serialized document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Serialize a tree to pretty-printed UTF-8 XML bytes with a declaration.
pub fn to_bytes_pretty(root: &XmlElement) -> Result<Vec<u8>, XmlWriteError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serialize a tree to a pretty-printed XML string.
pub fn to_string_pretty(root: &XmlElement) -> Result<String, XmlWriteError> {
    Ok(String::from_utf8(to_bytes_pretty(root)?)?)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &XmlElement,
) -> Result<(), quick_xml::Error> {
    let mut start = BytesStart::new(element.name());
    for (name, value) in element.attrs() {
        start.push_attribute((name, value));
    }

    if element.nodes().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in element.nodes() {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}
