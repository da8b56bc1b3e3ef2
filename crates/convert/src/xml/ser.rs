//! XML writing from [`MarkupNode`] trees.
//!
//! The writer emits quick-xml events directly. Elements with neither text nor
//! children are written as empty elements (`<x/>`). No XML declaration is
//! written. Every element and attribute name is checked before anything is
//! written, so an invalid name never leaves a partial document behind.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::{ConvertError, Result};
use crate::xml::{MAX_DEPTH, MarkupNode, utils};

/// Serialize an element tree to an XML string.
///
/// # Examples
///
/// ```
/// use helios_convert::xml::{MarkupNode, to_xml_string};
///
/// let root = MarkupNode::new("root")?
///     .with_child(MarkupNode::new("x")?.with_text("hi"));
/// assert_eq!(to_xml_string(&root)?, "<root><x>hi</x></root>");
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn to_xml_string(node: &MarkupNode) -> Result<String> {
    to_xml_string_with_indent(node, None)
}

/// Serialize an element tree to an XML string, indenting nested elements by
/// `indent` spaces per level when given.
pub fn to_xml_string_with_indent(node: &MarkupNode, indent: Option<usize>) -> Result<String> {
    let mut buffer = Vec::new();
    to_xml_writer(node, &mut buffer, indent)?;
    String::from_utf8(buffer).map_err(|e| ConvertError::conversion(&node.tag, "XML", e))
}

/// Serialize an element tree to an XML byte vector.
pub fn to_xml_vec(node: &MarkupNode) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(node, &mut buffer, None)?;
    Ok(buffer)
}

/// Serialize an element tree to a writer.
pub fn to_xml_writer<W: Write>(node: &MarkupNode, writer: W, indent: Option<usize>) -> Result<()> {
    validate_names(node)?;
    let mut serializer = XmlSerializer::new(writer, indent);
    serializer.write_node(node)
}

/// Checks every element and attribute name in the tree, and the nesting
/// depth.
fn validate_names(root: &MarkupNode) -> Result<()> {
    let mut pending = vec![(root, 1usize)];
    while let Some((node, depth)) = pending.pop() {
        if depth > MAX_DEPTH {
            return Err(ConvertError::conversion(
                node.tag.clone(),
                "XML",
                format!("elements may not nest deeper than {} levels", MAX_DEPTH),
            ));
        }
        if !utils::is_valid_name(&node.tag) {
            return Err(ConvertError::InvalidTagName {
                name: node.tag.clone(),
            });
        }
        if let Some(name) = node
            .attributes
            .keys()
            .find(|name| !utils::is_valid_name(name))
        {
            return Err(ConvertError::conversion(
                name.clone(),
                "XML attribute name",
                format!("not a legal name on <{}>", node.tag),
            ));
        }
        pending.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }
    Ok(())
}

/// XML serializer that writes element trees through quick-xml.
struct XmlSerializer<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSerializer<W> {
    fn new(writer: W, indent: Option<usize>) -> Self {
        let writer = match indent {
            Some(width) if width > 0 => Writer::new_with_indent(writer, b' ', width),
            _ => Writer::new(writer),
        };
        Self { writer }
    }

    fn write_node(&mut self, node: &MarkupNode) -> Result<()> {
        let mut element = BytesStart::new(node.tag.as_str());
        for (name, value) in &node.attributes {
            element.push_attribute((name.as_str(), value.as_str()));
        }

        let text = node.text.as_deref().filter(|text| !text.is_empty());
        if text.is_none() && node.children.is_empty() {
            return self.write_event(&node.tag, Event::Empty(element));
        }

        self.write_event(&node.tag, Event::Start(element))?;
        if let Some(text) = text {
            self.write_event(&node.tag, Event::Text(BytesText::new(text)))?;
        }
        for child in &node.children {
            self.write_node(child)?;
        }
        self.write_event(&node.tag, Event::End(BytesEnd::new(node.tag.as_str())))
    }

    fn write_event(&mut self, tag: &str, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ConvertError::conversion(tag, "XML", e))
    }
}
