//! XML reading into [`MarkupNode`] trees.
//!
//! This module pulls quick-xml events and assembles them into a tree with a
//! stack of open elements. Only the character data before an element's first
//! child counts as that element's text; text following a child (the "tail")
//! is dropped, as are comments, processing instructions and the doctype.
//! Namespace declarations are not treated as attributes. Documents nested
//! deeper than [`MAX_DEPTH`] are rejected.

use std::io::BufRead;

use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

use crate::error::{ConvertError, Result};
use crate::xml::{MAX_DEPTH, MarkupNode, utils};

const FORMAT: &str = "XML";

/// Parses an XML document from a string.
///
/// # Examples
///
/// ```
/// use helios_convert::xml::from_xml_str;
///
/// let root = from_xml_str(r#"<root a="1"><x>hi</x></root>"#)?;
/// assert_eq!(root.tag, "root");
/// assert_eq!(root.attributes["a"], "1");
/// assert_eq!(root.children[0].text.as_deref(), Some("hi"));
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn from_xml_str(xml: &str) -> Result<MarkupNode> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_error(reader.error_position(), e))?;
        if !builder.feed(&reader, event)? {
            break;
        }
    }
    builder.finish()
}

/// Parses an XML document from bytes.
pub fn from_xml_slice(xml: &[u8]) -> Result<MarkupNode> {
    let xml_str = std::str::from_utf8(xml)
        .map_err(|e| ConvertError::malformed(FORMAT, format!("invalid UTF-8: {}", e)))?;
    from_xml_str(xml_str)
}

/// Parses an XML document from a buffered reader.
pub fn from_xml_reader<R: BufRead>(reader: R) -> Result<MarkupNode> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let event = xml_reader
            .read_event_into(&mut buf)
            .map_err(|e| parse_error(xml_reader.error_position(), e))?;
        if !builder.feed(&xml_reader, event)? {
            break;
        }
    }
    builder.finish()
}

fn parse_error(position: u64, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::malformed(FORMAT, format!("{} at position {}", err, position))
}

/// An element whose end tag has not been seen yet.
struct OpenElement {
    node: MarkupNode,
    text: String,
    seen_child: bool,
}

/// Assembles reader events into a tree.
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenElement>,
    root: Option<MarkupNode>,
}

impl TreeBuilder {
    /// Consumes one event. Returns `false` once the end of input is reached.
    fn feed<R>(&mut self, reader: &Reader<R>, event: Event<'_>) -> Result<bool> {
        match event {
            Event::Start(start) => {
                let node = start_node(reader, &start)?;
                self.open(node)?;
            }
            Event::Empty(start) => {
                let node = start_node(reader, &start)?;
                self.open(node)?;
                self.close()?;
            }
            Event::End(_) => self.close()?,
            Event::Text(text) => {
                let decoded = text
                    .decode()
                    .map_err(|e| ConvertError::malformed(FORMAT, e))?;
                self.text(&decoded)?;
            }
            Event::CData(cdata) => {
                let decoded = cdata
                    .decode()
                    .map_err(|e| ConvertError::malformed(FORMAT, e))?;
                self.text(&decoded)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference)?;
                self.text(&resolved)?;
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => {}
            Event::Eof => return Ok(false),
        }
        Ok(true)
    }

    fn open(&mut self, node: MarkupNode) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => parent.seen_child = true,
            None if self.root.is_some() => {
                return Err(ConvertError::malformed(
                    FORMAT,
                    format!("unexpected second root element <{}>", node.tag),
                ));
            }
            None => {}
        }
        if self.stack.len() >= MAX_DEPTH {
            return Err(ConvertError::malformed(
                FORMAT,
                format!(
                    "element <{}> is nested deeper than {} levels",
                    node.tag, MAX_DEPTH
                ),
            ));
        }
        self.stack.push(OpenElement {
            node,
            text: String::new(),
            seen_child: false,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let OpenElement { mut node, text, .. } = self
            .stack
            .pop()
            .ok_or_else(|| ConvertError::malformed(FORMAT, "end tag without a start tag"))?;

        if !utils::is_blank(&text) {
            node.text = Some(text);
        }

        match self.stack.last_mut() {
            Some(parent) => parent.node.children.push(node),
            None => self.root = Some(node),
        }
        Ok(())
    }

    fn text(&mut self, content: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(open) if !open.seen_child => open.text.push_str(content),
            Some(_) => {}
            None if utils::is_blank(content) => {}
            None => {
                return Err(ConvertError::malformed(
                    FORMAT,
                    "character data outside the root element",
                ));
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<MarkupNode> {
        if let Some(open) = self.stack.last() {
            return Err(ConvertError::malformed(
                FORMAT,
                format!("unclosed element <{}>", open.node.tag),
            ));
        }
        self.root
            .ok_or_else(|| ConvertError::malformed(FORMAT, "no root element"))
    }
}

fn start_node<R>(reader: &Reader<R>, start: &BytesStart<'_>) -> Result<MarkupNode> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| ConvertError::malformed(FORMAT, format!("invalid UTF-8 in tag name: {}", e)))?
        .to_string();

    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| {
            ConvertError::malformed(FORMAT, format!("failed to parse attribute: {}", e))
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        // Skip xmlns namespace declarations
        if utils::is_namespace_declaration(&key) {
            continue;
        }
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| {
                ConvertError::malformed(FORMAT, format!("invalid value for attribute '{}': {}", key, e))
            })?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(MarkupNode {
        tag,
        attributes,
        text: None,
        children: Vec::new(),
    })
}

/// Resolves a character reference (`&#38;`) or one of the five predefined
/// entities (`&amp;`). Any other entity is rejected.
fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| ConvertError::malformed(FORMAT, e))?
    {
        return Ok(ch.to_string());
    }

    let name = reference
        .decode()
        .map_err(|e| ConvertError::malformed(FORMAT, e))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| ConvertError::malformed(FORMAT, format!("unknown entity '&{};'", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_nested_document() -> Result<()> {
        let root = from_xml_str(
            r#"<?xml version="1.0"?>
            <library>
              <book id="b1"><title>Dune</title></book>
              <book id="b2"><title>Emma</title></book>
            </library>"#,
        )?;

        assert_eq!(root.tag, "library");
        assert_eq!(root.text, None);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].attributes["id"], "b2");
        assert_eq!(root.children[1].children[0].text.as_deref(), Some("Emma"));
        Ok(())
    }

    #[test]
    fn test_text_before_first_child_only() -> Result<()> {
        let root = from_xml_str("<r> lead <a/> tail </r>")?;
        assert_eq!(root.text.as_deref(), Some(" lead "));
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].text, None);
        Ok(())
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() -> Result<()> {
        let root = from_xml_str(
            r#"<r note="a &lt; b">x &amp; y &#65;<![CDATA[<raw>]]></r>"#,
        )?;
        assert_eq!(root.attributes["note"], "a < b");
        assert_eq!(root.text.as_deref(), Some("x & y A<raw>"));
        Ok(())
    }

    #[test]
    fn test_comments_and_namespace_declarations_are_skipped() -> Result<()> {
        let root = from_xml_str(
            r#"<r xmlns="urn:x" xmlns:p="urn:p" keep="1"><!-- note --><p:a/></r>"#,
        )?;
        assert_eq!(root.attributes.len(), 1);
        assert_eq!(root.attributes["keep"], "1");
        assert_eq!(root.children[0].tag, "p:a");
        Ok(())
    }

    #[test]
    fn test_blank_text_is_absent() -> Result<()> {
        let root = from_xml_str("<r>\n   \n</r>")?;
        assert_eq!(root.text, None);
        Ok(())
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "",
            "<r>",
            "<r></s>",
            "</r>",
            "<a/><b/>",
            "text<r/>",
            "<r>&bogus;</r>",
        ] {
            let err = from_xml_str(xml).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput, "input: {:?}", xml);
        }
    }

    #[test]
    fn test_nesting_depth_is_limited() -> Result<()> {
        let deepest = "<a>".repeat(MAX_DEPTH) + &"</a>".repeat(MAX_DEPTH);
        assert_eq!(from_xml_str(&deepest)?.node_count(), MAX_DEPTH);

        let too_deep = "<a>".repeat(MAX_DEPTH + 1) + &"</a>".repeat(MAX_DEPTH + 1);
        let err = from_xml_str(&too_deep).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("deeper than 512 levels"));
        Ok(())
    }

    #[test]
    fn test_from_slice_and_reader() -> Result<()> {
        let bytes = b"<r><x>1</x></r>";
        let from_slice = from_xml_slice(bytes)?;
        let from_reader = from_xml_reader(&bytes[..])?;
        assert_eq!(from_slice, from_reader);
        assert!(from_xml_slice(&[0x3c, 0xff, 0x3e]).is_err());
        Ok(())
    }
}
