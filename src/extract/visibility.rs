use crate::dom::LiveDocument;
use crate::error::Result;
use crate::extract::ExtractorConfig;

/// Elements that look interactive to a user
pub const INTERACTIVE_SELECTOR: &str = r#"a, button, [onclick], input[type="button"], input[type="submit"]"#;

/// Serialize a snapshot of `doc` with visible interactive elements marked
///
/// An element counts as visible when its bounding box lies entirely inside the
/// viewport. Only the snapshot is marked; `doc` itself is left untouched.
pub fn mark_visible(doc: &dyn LiveDocument, config: &ExtractorConfig) -> Result<String> {
    let viewport = doc.viewport()?;
    let mut snapshot = doc.clone_document()?;
    let root = snapshot.root();

    let mut marked = 0;
    for node in snapshot.query(root, INTERACTIVE_SELECTOR, false)? {
        let visible = snapshot.bounding_box(node)?.is_some_and(|bbox| viewport.contains(&bbox));
        if visible {
            snapshot.set_attribute(node, &config.visible_attribute, "true")?;
            marked += 1;
        }
    }

    log::debug!("Marked {} visible interactive elements", marked);
    snapshot.serialize(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundingBox, MemoryDocument, NodeId};

    fn page() -> (MemoryDocument, Vec<NodeId>) {
        let mut doc = MemoryDocument::new("body").with_viewport(BoundingBox::new(0.0, 0.0, 800.0, 600.0));
        let root = doc.root();

        let mut add = |tag: &str, attrs: &[(&str, &str)], bbox: Option<BoundingBox>| {
            let node = doc.append_element(root, tag);
            for (name, value) in attrs {
                doc.insert_attribute(node, name, value);
            }
            if let Some(bbox) = bbox {
                doc.set_bounding_box(node, bbox);
            }
            node
        };

        let nodes = vec![
            add("a", &[("href", "/cart")], Some(BoundingBox::new(10.0, 10.0, 50.0, 20.0))),
            add("button", &[], Some(BoundingBox::new(700.0, 580.0, 200.0, 40.0))),
            add("div", &[("onclick", "go()")], Some(BoundingBox::new(0.0, 0.0, 800.0, 600.0))),
            add("input", &[("type", "submit")], None),
            add("p", &[], Some(BoundingBox::new(10.0, 10.0, 10.0, 10.0))),
            add("a", &[("href", "/collapsed")], Some(BoundingBox::new(0.0, 0.0, 0.0, 0.0))),
            add("a", &[("href", "/offscreen")], Some(BoundingBox::new(-10.0, 0.0, 0.0, 0.0))),
        ];
        (doc, nodes)
    }

    #[test]
    fn test_marks_interactive_nodes_inside_viewport() {
        let (doc, _) = page();
        let markup = mark_visible(&doc, &ExtractorConfig::default()).unwrap();

        assert!(markup.contains(r#"<a href="/cart" data-visible="true">"#));
        assert!(markup.contains("<button></button>"));
        assert!(markup.contains(r#"<div onclick="go()" data-visible="true">"#));
        assert!(markup.contains(r#"<input type="submit">"#));
        assert!(markup.contains("<p></p>"));
        assert!(markup.contains(r#"<a href="/collapsed" data-visible="true">"#));
        assert!(markup.contains(r#"<a href="/offscreen"></a>"#));
    }

    #[test]
    fn test_live_document_untouched() {
        let (doc, nodes) = page();
        mark_visible(&doc, &ExtractorConfig::default()).unwrap();

        assert_eq!(doc.attribute(nodes[0], "data-visible").unwrap(), None);
    }
}
