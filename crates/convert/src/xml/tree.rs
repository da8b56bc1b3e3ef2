//! Conversion between element trees and the generic map representation.
//!
//! ## Mapping
//!
//! | XML | Generic map |
//! |-----|-------------|
//! | `<r id="5"/>` | `{"id": "5"}` |
//! | `<r> hi </r>` | `{"_text": "hi"}` |
//! | `<r><x>hi</x></r>` | `{"x": {"_text": "hi"}}` |
//! | `<r><x/><x/></r>` | `{"x": [{}, {}]}` |
//!
//! The mapping is deliberately asymmetric: [`tree_to_map`] reads attributes,
//! but [`map_to_tree`] only ever writes elements, so attribute data comes
//! back as child elements after a round trip.
//!
//! ## Collisions
//!
//! Attributes and text are written before children. When the first child
//! with a given tag finds its key already taken by an attribute or by
//! `_text`, the child's value replaces it under
//! [`CollisionPolicy::Overwrite`] (the default), and the conversion fails
//! under [`CollisionPolicy::Error`]. Later children with the same tag are
//! collected into a sequence.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::{trace, warn};

use crate::error::{ConvertError, Result};
use crate::generic::{GenericMap, GenericValue, TEXT_KEY};
use crate::xml::MarkupNode;

/// Root element name used by [`map_to_tree`] when the caller has no preference.
pub const DEFAULT_ROOT_TAG: &str = "root";

/// Deepest element nesting accepted when reading, writing or building
/// element trees. The root element is level 1.
pub const MAX_DEPTH: usize = 512;

/// What to do when a child element's tag matches an attribute or the text key
/// of the same element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// The child's value silently replaces the earlier entry.
    #[default]
    Overwrite,
    /// The conversion fails with [`ConvertError::KeyCollision`].
    Error,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::Overwrite => write!(f, "overwrite"),
            CollisionPolicy::Error => write!(f, "error"),
        }
    }
}

impl FromStr for CollisionPolicy {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "overwrite" => Ok(CollisionPolicy::Overwrite),
            "error" => Ok(CollisionPolicy::Error),
            other => Err(ConvertError::invalid_option(
                "collisions",
                format!("expected 'overwrite' or 'error', got '{}'", other),
            )),
        }
    }
}

/// Converts an element tree into a generic map using
/// [`CollisionPolicy::Overwrite`].
///
/// # Examples
///
/// ```
/// use helios_convert::xml::{self, tree_to_map};
///
/// let node = xml::parse(r#"<root a="1"><x>hi</x><x>bye</x></root>"#)?;
/// let map = tree_to_map(&node);
/// assert_eq!(map["a"].as_scalar(), Some("1"));
/// assert_eq!(map["x"].as_sequence().map(|s| s.len()), Some(2));
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn tree_to_map(node: &MarkupNode) -> GenericMap {
    let mut overwrite = |key: &str, tag: &str| -> std::result::Result<(), Infallible> {
        warn!(key = %key, tag = %tag, "Child element overwrites attribute or text entry");
        Ok(())
    };
    match build_map(node, &mut overwrite) {
        Ok(map) => map,
        Err(never) => match never {},
    }
}

/// Converts an element tree into a generic map with an explicit collision
/// policy.
pub fn tree_to_map_with(node: &MarkupNode, policy: CollisionPolicy) -> Result<GenericMap> {
    match policy {
        CollisionPolicy::Overwrite => Ok(tree_to_map(node)),
        CollisionPolicy::Error => {
            let mut reject = |key: &str, tag: &str| -> Result<()> {
                Err(ConvertError::KeyCollision {
                    key: key.to_string(),
                    tag: tag.to_string(),
                })
            };
            build_map(node, &mut reject)
        }
    }
}

/// An element whose children are still being converted.
struct PendingMap<'a> {
    node: &'a MarkupNode,
    map: GenericMap,
    next_child: usize,
    // Keys written by children, as opposed to attributes and text
    child_keys: HashSet<&'a str>,
}

impl<'a> PendingMap<'a> {
    fn new(node: &'a MarkupNode) -> Self {
        let mut map = GenericMap::with_capacity(node.attributes.len() + node.children.len() + 1);

        for (name, value) in &node.attributes {
            map.insert(name.clone(), GenericValue::Scalar(value.clone()));
        }

        if let Some(text) = node.trimmed_text() {
            map.insert(TEXT_KEY.to_string(), GenericValue::Scalar(text.to_string()));
        }

        Self {
            node,
            map,
            next_child: 0,
            child_keys: HashSet::with_capacity(node.children.len()),
        }
    }

    fn next_child(&mut self) -> Option<&'a MarkupNode> {
        let child = self.node.children.get(self.next_child)?;
        self.next_child += 1;
        Some(child)
    }

    fn attach<E, F>(
        &mut self,
        tag: &'a str,
        child: GenericMap,
        on_collision: &mut F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(&str, &str) -> std::result::Result<(), E>,
    {
        let child_value = GenericValue::Map(child);

        if self.child_keys.insert(tag) {
            if self.map.contains_key(tag) {
                on_collision(tag, &self.node.tag)?;
            }
            self.map.insert(tag.to_string(), child_value);
            return Ok(());
        }

        match self.map.get_mut(tag) {
            Some(GenericValue::Sequence(items)) => items.push(child_value),
            Some(previous) => {
                let first = std::mem::replace(previous, GenericValue::Sequence(Vec::new()));
                *previous = GenericValue::Sequence(vec![first, child_value]);
            }
            None => {
                self.map.insert(tag.to_string(), child_value);
            }
        }
        Ok(())
    }
}

/// Walks the tree depth-first with an explicit stack, so deep trees cannot
/// exhaust the call stack.
fn build_map<E, F>(node: &MarkupNode, on_collision: &mut F) -> std::result::Result<GenericMap, E>
where
    F: FnMut(&str, &str) -> std::result::Result<(), E>,
{
    let mut current = PendingMap::new(node);
    let mut ancestors: Vec<PendingMap<'_>> = Vec::new();
    let mut visited = 1usize;

    loop {
        if let Some(child) = current.next_child() {
            visited += 1;
            ancestors.push(std::mem::replace(&mut current, PendingMap::new(child)));
            continue;
        }

        let PendingMap {
            node: finished,
            map: finished_map,
            ..
        } = current;

        match ancestors.pop() {
            Some(mut parent) => {
                parent.attach(finished.tag.as_str(), finished_map, on_collision)?;
                current = parent;
            }
            None => {
                trace!(nodes = visited, "Converted element tree to map");
                return Ok(finished_map);
            }
        }
    }
}

/// Converts a generic map into an element tree rooted at `root_tag`.
///
/// Sequences become repeated sibling elements, `_text` becomes the element's
/// text, and scalars become the text of their element. No attributes are
/// produced.
///
/// Fails if any key (or `root_tag`) is not a legal XML name, if a sequence
/// directly contains another sequence, or if `_text` holds a non-scalar.
/// Nothing is returned on failure.
pub fn map_to_tree(map: &GenericMap, root_tag: &str) -> Result<MarkupNode> {
    let mut root = MarkupNode::new(root_tag)?;
    fill_map(map, &mut root, 1)?;
    trace!(
        root = %root_tag,
        nodes = root.node_count(),
        "Converted map to element tree"
    );
    Ok(root)
}

fn fill_element(value: &GenericValue, target: &mut MarkupNode, depth: usize) -> Result<()> {
    match value {
        GenericValue::Map(map) => fill_map(map, target, depth),
        GenericValue::Scalar(text) => {
            target.text = Some(text.clone());
            Ok(())
        }
        GenericValue::Sequence(_) => Err(ConvertError::conversion(
            target.tag.clone(),
            "XML",
            "a sequence nested directly inside a sequence has no element form",
        )),
    }
}

/// Adds the entries of `map` to `target`, which sits `depth` levels below
/// the document (the root is level 1).
fn fill_map(map: &GenericMap, target: &mut MarkupNode, depth: usize) -> Result<()> {
    for (key, value) in map {
        if key == TEXT_KEY {
            match value {
                GenericValue::Scalar(text) => target.text = Some(text.clone()),
                other => {
                    return Err(ConvertError::conversion(
                        TEXT_KEY,
                        "XML text",
                        format!("expected a scalar, found a {}", other.type_name()),
                    ));
                }
            }
            continue;
        }

        if depth >= MAX_DEPTH {
            return Err(ConvertError::conversion(
                key.as_str(),
                "XML",
                format!("elements may not nest deeper than {} levels", MAX_DEPTH),
            ));
        }

        match value {
            GenericValue::Sequence(items) => {
                for item in items {
                    let mut child = MarkupNode::new(key.as_str())?;
                    fill_element(item, &mut child, depth + 1)?;
                    target.children.push(child);
                }
            }
            other => {
                let mut child = MarkupNode::new(key.as_str())?;
                fill_element(other, &mut child, depth + 1)?;
                target.children.push(child);
            }
        }
    }
    Ok(())
}
