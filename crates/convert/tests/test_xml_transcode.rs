use helios_convert::xml::{
    self, CollisionPolicy, DEFAULT_ROOT_TAG, MAX_DEPTH, dict_to_xml, map_to_tree,
    to_xml_string_with_indent, tree_to_map, xml_to_dict,
};
use helios_convert::{ConvertError, ErrorKind, GenericMap, GenericValue, MarkupNode, Result};

fn text(s: &str) -> GenericValue {
    let mut map = GenericMap::new();
    map.insert("_text".to_string(), s.into());
    GenericValue::Map(map)
}

#[test]
fn test_repeated_children_with_attribute() -> Result<()> {
    let map = xml_to_dict(
        r#"<root a="1"><x>hi</x><x>bye</x></root>"#,
        CollisionPolicy::Overwrite,
    )?;

    assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "x"]);
    assert_eq!(map["a"], GenericValue::from("1"));
    assert_eq!(
        map["x"],
        GenericValue::Sequence(vec![text("hi"), text("bye")])
    );

    // Attribute data comes back as a child element.
    assert_eq!(
        dict_to_xml(&map, DEFAULT_ROOT_TAG, None)?,
        "<root><a>1</a><x>hi</x><x>bye</x></root>"
    );

    Ok(())
}

#[test]
fn test_map_with_only_children_round_trips() -> Result<()> {
    let source = "<root><x>hi</x><x>bye</x><y><z>deep</z></y></root>";
    let map = xml_to_dict(source, CollisionPolicy::Overwrite)?;
    let rendered = dict_to_xml(&map, DEFAULT_ROOT_TAG, None)?;

    assert_eq!(rendered, source);
    assert_eq!(xml_to_dict(&rendered, CollisionPolicy::Overwrite)?, map);

    Ok(())
}

#[test]
fn test_whitespace_and_empty_elements() -> Result<()> {
    let map = xml_to_dict(
        "<root>\n  <empty/>\n  <padded>  value  </padded>\n</root>",
        CollisionPolicy::Overwrite,
    )?;

    assert!(!map.contains_key("_text"));
    assert_eq!(map["empty"], GenericValue::Map(GenericMap::new()));
    assert_eq!(map["padded"], text("value"));

    Ok(())
}

#[test]
fn test_three_siblings_form_one_sequence() -> Result<()> {
    let map = xml_to_dict(
        "<list><i>1</i><i>2</i><i>3</i></list>",
        CollisionPolicy::Overwrite,
    )?;

    assert_eq!(
        map["i"],
        GenericValue::Sequence(vec![text("1"), text("2"), text("3")])
    );

    Ok(())
}

#[test]
fn test_attribute_child_collision() -> Result<()> {
    let source = r#"<r id="attr"><id>child</id></r>"#;

    let map = xml_to_dict(source, CollisionPolicy::Overwrite)?;
    assert_eq!(map["id"], text("child"));
    assert_eq!(map.len(), 1);

    let err = xml_to_dict(source, CollisionPolicy::Error).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::KeyCollision { ref key, ref tag } if key == "id" && tag == "r"
    ));
    assert_eq!(err.kind(), ErrorKind::Conversion);

    Ok(())
}

#[test]
fn test_malformed_xml() {
    for source in ["", "<a><b></a>", "<a/><b/>", "just text", "<a>&bogus;</a>"] {
        let err = xml_to_dict(source, CollisionPolicy::Overwrite).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput, "{:?}", source);
    }
}

#[test]
fn test_very_deep_documents_are_rejected() {
    let depth = 100_000;
    let source = "<a>".repeat(depth) + &"</a>".repeat(depth);

    let err = xml_to_dict(&source, CollisionPolicy::Overwrite).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedInput);
    assert!(err.to_string().contains(&MAX_DEPTH.to_string()));
}

#[test]
fn test_deepest_accepted_document_round_trips() -> Result<()> {
    let source = "<root>".to_string()
        + &"<a>".repeat(MAX_DEPTH - 1)
        + &"</a>".repeat(MAX_DEPTH - 1)
        + "</root>";

    let map = xml_to_dict(&source, CollisionPolicy::Overwrite)?;
    let rendered = dict_to_xml(&map, DEFAULT_ROOT_TAG, None)?;
    assert!(rendered.starts_with("<root><a><a>"));
    assert_eq!(xml_to_dict(&rendered, CollisionPolicy::Overwrite)?, map);
    Ok(())
}

#[test]
fn test_invalid_names_produce_no_output() {
    let mut map = GenericMap::new();
    map.insert("ok".to_string(), "1".into());
    map.insert("not valid".to_string(), "2".into());

    assert!(matches!(
        dict_to_xml(&map, DEFAULT_ROOT_TAG, None),
        Err(ConvertError::InvalidTagName { ref name }) if name == "not valid"
    ));
    assert!(matches!(
        dict_to_xml(&GenericMap::new(), "", None),
        Err(ConvertError::InvalidTagName { .. })
    ));
}

#[test]
fn test_tree_level_api() -> Result<()> {
    let node = MarkupNode::new("doc")?
        .with_attribute("lang", "en")
        .with_child(MarkupNode::new("title")?.with_text("Hello"));

    let map = tree_to_map(&node);
    assert_eq!(map["lang"], GenericValue::from("en"));
    assert_eq!(map["title"], text("Hello"));

    let rebuilt = map_to_tree(&map, "doc")?;
    assert_eq!(rebuilt.tag, "doc");
    assert!(rebuilt.attributes.is_empty());
    assert_eq!(rebuilt.children.len(), 2);

    assert_eq!(
        to_xml_string_with_indent(&rebuilt, Some(2))?,
        "<doc>\n  <lang>en</lang>\n  <title>Hello</title>\n</doc>"
    );

    Ok(())
}

#[test]
fn test_parse_then_write() -> Result<()> {
    let node = xml::parse("<a x=\"1\"><b>t &amp; u</b><c/></a>")?;
    assert_eq!(xml::write(&node)?, "<a x=\"1\"><b>t &amp; u</b><c/></a>");
    Ok(())
}
