use crate::dom::memory::MemoryDocument;
use crate::dom::LiveDocument;
use crate::dom::NodeId;
use scraper::{ElementRef, Html};

/// Tags whose content is never rendered as text
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

impl MemoryDocument {
    /// Parse an HTML document
    ///
    /// Comments, doctypes and non-rendered elements are dropped; the root is the
    /// `<html>` element. Bounding boxes are unknown for parsed documents.
    pub fn parse_html(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let root_element = parsed.root_element();

        let mut doc = MemoryDocument::new(root_element.value().name());
        let root = doc.root();
        for (name, value) in root_element.value().attrs() {
            doc.insert_attribute(root, name, value);
        }
        doc.import_children(root, root_element);
        doc
    }

    fn import_children(&mut self, parent: NodeId, element: ElementRef<'_>) {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                let tag = child_element.value().name();
                if SKIPPED_TAGS.contains(&tag) {
                    continue;
                }
                let id = self.append_element(parent, tag);
                for (name, value) in child_element.value().attrs() {
                    self.insert_attribute(id, name, value);
                }
                self.import_children(id, child_element);
            } else if let Some(text) = child.value().as_text() {
                self.append_text(parent, text);
            }
        }
    }
}
