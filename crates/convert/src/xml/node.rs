//! The parsed element tree exchanged between the XML reader, the writer and
//! the transcoder.

use indexmap::IndexMap;

use crate::error::{ConvertError, Result};
use crate::xml::utils;

/// A single XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupNode {
    /// Element name. Never empty.
    pub tag: String,
    /// Attributes in document order.
    pub attributes: IndexMap<String, String>,
    /// Character data preceding the first child element, if any.
    pub text: Option<String>,
    /// Child elements in document order.
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Creates an element with no attributes, text or children.
    ///
    /// Fails with [`ConvertError::InvalidTagName`] if `tag` is not a legal
    /// XML name.
    pub fn new(tag: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        if !utils::is_valid_name(&tag) {
            return Err(ConvertError::InvalidTagName { name: tag });
        }
        Ok(Self {
            tag,
            ..Default::default()
        })
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the direct text trimmed, or `None` if it is absent or blank.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(&node.children);
        }
        count
    }
}
