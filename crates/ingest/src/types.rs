//! Layout element model returned by the partition API.
//!
//! The partition service responds with a JSON array of elements, each
//! carrying a `type` tag, the extracted text, and per-element metadata.
//! Only the fields the pipeline consumes are modeled here; unknown
//! metadata keys are ignored on deserialization and unknown element
//! types collapse into [`ElementKind::Other`].

use serde::{Deserialize, Serialize};

/// Element categories assigned by the layout model.
///
/// The variants mirror the partition API's `type` strings. Anything the
/// API adds later lands in `Other` rather than failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Title,
    NarrativeText,
    ListItem,
    Table,
    Image,
    Header,
    Footer,
    FigureCaption,
    Address,
    PageBreak,
    UncategorizedText,
    #[serde(other)]
    Other,
}

/// Per-element metadata subset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementMetadata {
    /// 1-based page the element was extracted from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,

    /// Name of the uploaded file, echoed back by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// One layout-aware span of the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub metadata: ElementMetadata,
}

impl Element {
    /// Construct an element with just a kind and text, for tests and
    /// synthetic inputs.
    pub fn new(kind: ElementKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            element_id: None,
            text: text.into(),
            metadata: ElementMetadata::default(),
        }
    }

    /// Attach a page number.
    pub fn on_page(mut self, page: u32) -> Self {
        self.metadata.page_number = Some(page);
        self
    }

    /// Page the element originated from, if the layout model reported one.
    pub fn page_number(&self) -> Option<u32> {
        self.metadata.page_number
    }
}

/// Drop elements that represent pagination artifacts rather than content.
pub fn filter_page_breaks(elements: Vec<Element>) -> Vec<Element> {
    elements
        .into_iter()
        .filter(|el| el.kind != ElementKind::PageBreak)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kind_deserializes_known_types() {
        let el: Element = serde_json::from_value(serde_json::json!({
            "type": "NarrativeText",
            "element_id": "abc123",
            "text": "Some paragraph.",
            "metadata": { "page_number": 3, "filename": "doc.pdf" }
        }))
        .unwrap();

        assert_eq!(el.kind, ElementKind::NarrativeText);
        assert_eq!(el.text, "Some paragraph.");
        assert_eq!(el.page_number(), Some(3));
        assert_eq!(el.metadata.filename.as_deref(), Some("doc.pdf"));
    }

    #[test]
    fn element_kind_tolerates_unknown_types() {
        let el: Element = serde_json::from_value(serde_json::json!({
            "type": "EmailAddress",
            "text": "ops@example.com"
        }))
        .unwrap();

        assert_eq!(el.kind, ElementKind::Other);
        assert_eq!(el.page_number(), None);
    }

    #[test]
    fn filter_page_breaks_removes_only_page_breaks() {
        let elements = vec![
            Element::new(ElementKind::Title, "Heading"),
            Element::new(ElementKind::PageBreak, ""),
            Element::new(ElementKind::NarrativeText, "Body"),
            Element::new(ElementKind::PageBreak, ""),
        ];

        let kept = filter_page_breaks(elements);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|el| el.kind != ElementKind::PageBreak));
        assert_eq!(kept[0].text, "Heading");
        assert_eq!(kept[1].text, "Body");
    }

    #[test]
    fn twelve_elements_with_one_page_break() {
        let mut elements: Vec<Element> = (0..12)
            .map(|i| Element::new(ElementKind::NarrativeText, format!("Paragraph {i}")).on_page(1))
            .collect();
        elements.insert(6, Element::new(ElementKind::PageBreak, ""));

        let kept = filter_page_breaks(elements);
        assert_eq!(kept.len(), 12);
    }
}
