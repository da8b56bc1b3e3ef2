//! XML support: element trees, reading, writing, and the dictionary transcoder.
//!
//! ## Architecture
//!
//! - **Reading** ([`de`]): quick-xml events are assembled into a
//!   [`MarkupNode`] tree. Ill-formed input fails with
//!   [`ConvertError::MalformedInput`](crate::ConvertError::MalformedInput).
//! - **Writing** ([`ser`]): a [`MarkupNode`] tree is written back out as
//!   quick-xml events. Illegal names fail with a conversion error.
//! - **Transcoding** ([`tree`]): [`tree_to_map`] and [`map_to_tree`] convert
//!   between element trees and [`GenericMap`](crate::generic::GenericMap).
//!
//! ## XML ↔ Map Mapping
//!
//! **XML**:
//! ```xml
//! <root a="1">
//!   <x>hi</x>
//!   <x>bye</x>
//! </root>
//! ```
//!
//! **Map**:
//! ```json
//! { "a": "1", "x": [ {"_text": "hi"}, {"_text": "bye"} ] }
//! ```
//!
//! Converting the map back yields `<root><x>hi</x><x>bye</x></root>`. The
//! attribute `a` would come back as a child element `<a>1</a>`; attributes
//! are only ever read, never written.
//!
//! ## Namespace Handling
//!
//! Namespaces are not interpreted. Prefixed names are kept verbatim
//! (`p:item`), and `xmlns` declarations are dropped on read.

pub mod de;
mod node;
pub mod ser;
pub mod tree;
mod utils;

pub use node::MarkupNode;

// Re-export reading functions
pub use de::{from_xml_reader, from_xml_slice, from_xml_str};

// Re-export writing functions
pub use ser::{to_xml_string, to_xml_string_with_indent, to_xml_vec, to_xml_writer};

// Re-export transcoder
pub use tree::{
    CollisionPolicy, DEFAULT_ROOT_TAG, MAX_DEPTH, map_to_tree, tree_to_map, tree_to_map_with,
};

pub use utils::is_valid_name;

use crate::generic::GenericMap;

/// Parses XML text into an element tree. Alias for [`from_xml_str`].
pub fn parse(xml: &str) -> crate::Result<MarkupNode> {
    from_xml_str(xml)
}

/// Writes an element tree as compact XML text. Alias for [`to_xml_string`].
pub fn write(node: &MarkupNode) -> crate::Result<String> {
    to_xml_string(node)
}

/// Parses XML text and converts the root element into a generic map.
pub fn xml_to_dict(xml: &str, policy: CollisionPolicy) -> crate::Result<GenericMap> {
    let root = from_xml_str(xml)?;
    tree_to_map_with(&root, policy)
}

/// Converts a generic map into XML text under a `root_tag` element.
///
/// # Examples
///
/// ```
/// use helios_convert::xml::{dict_to_xml, xml_to_dict, CollisionPolicy, DEFAULT_ROOT_TAG};
///
/// let map = xml_to_dict(r#"<root a="1"><x>hi</x><x>bye</x></root>"#, CollisionPolicy::Overwrite)?;
/// let mut without_attribute = map.clone();
/// without_attribute.shift_remove("a");
/// assert_eq!(
///     dict_to_xml(&without_attribute, DEFAULT_ROOT_TAG, None)?,
///     "<root><x>hi</x><x>bye</x></root>"
/// );
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn dict_to_xml(map: &GenericMap, root_tag: &str, indent: Option<usize>) -> crate::Result<String> {
    let root = map_to_tree(map, root_tag)?;
    to_xml_string_with_indent(&root, indent)
}
