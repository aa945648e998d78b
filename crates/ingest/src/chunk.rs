//! Title-bounded chunking of layout elements.
//!
//! Elements are grouped under the nearest preceding title into chunks
//! bounded by three thresholds (see [`ChunkingConfig`]). The algorithm is
//! a pure function of its inputs: the same elements and the same config
//! always produce the same chunks.

use serde::{Deserialize, Serialize};

use crate::error::IngestError;
use crate::types::{Element, ElementKind};

/// Characters spent joining two element texts inside one chunk (`"\n\n"`).
const SEPARATOR_CHARS: usize = 2;

/// Thresholds governing chunk boundaries.
///
/// All counts are Unicode scalar values, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Hard maximum characters per chunk. An element that alone exceeds
    /// this is split on character boundaries.
    pub max_characters: usize,

    /// Soft threshold: once a chunk has grown past this, the next element
    /// starts a new chunk even if it would still fit under the hard cap.
    pub new_after_n_chars: usize,

    /// Chunks shorter than this are merged with the following chunk when
    /// the combined text still fits under `max_characters`. Keeps bare
    /// headings attached to their section text.
    pub combine_text_under_n_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_characters: 1000,
            new_after_n_chars: 800,
            combine_text_under_n_chars: 500,
        }
    }
}

impl ChunkingConfig {
    pub fn with_max_characters(mut self, max: usize) -> Self {
        self.max_characters = max;
        self
    }

    pub fn with_new_after_n_chars(mut self, soft: usize) -> Self {
        self.new_after_n_chars = soft;
        self
    }

    pub fn with_combine_text_under_n_chars(mut self, min: usize) -> Self {
        self.combine_text_under_n_chars = min;
        self
    }

    /// Check the thresholds are internally consistent.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_characters == 0 {
            return Err(IngestError::InvalidConfig(
                "max_characters must be greater than zero".to_string(),
            ));
        }
        if self.new_after_n_chars > self.max_characters {
            return Err(IngestError::InvalidConfig(format!(
                "new_after_n_chars ({}) must not exceed max_characters ({})",
                self.new_after_n_chars, self.max_characters
            )));
        }
        if self.combine_text_under_n_chars > self.max_characters {
            return Err(IngestError::InvalidConfig(format!(
                "combine_text_under_n_chars ({}) must not exceed max_characters ({})",
                self.combine_text_under_n_chars, self.max_characters
            )));
        }
        Ok(())
    }
}

/// A bounded span of document text, ready to become a chunk record.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    /// Page of the first element that contributed to this chunk.
    pub page_number: Option<u32>,
}

/// Accumulates element texts for the chunk currently being built.
#[derive(Default)]
struct ChunkBuilder {
    text: String,
    chars: usize,
    page_number: Option<u32>,
}

impl ChunkBuilder {
    fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn push(&mut self, text: &str, chars: usize, page: Option<u32>) {
        if self.text.is_empty() {
            self.page_number = page;
        } else {
            self.text.push_str("\n\n");
            self.chars += SEPARATOR_CHARS;
        }
        self.text.push_str(text);
        self.chars += chars;
    }

    fn finish(&mut self) -> Chunk {
        let chunk = Chunk {
            text: std::mem::take(&mut self.text),
            page_number: self.page_number.take(),
        };
        self.chars = 0;
        chunk
    }
}

/// Group elements into title-bounded chunks.
///
/// Walks the elements in document order. A `Title` element always closes
/// the running chunk and starts a new one; within a section, elements are
/// appended until the hard cap would be exceeded or the soft threshold
/// has been passed. Empty and whitespace-only elements are skipped. After
/// grouping, undersized chunks are merged forward (see
/// [`ChunkingConfig::combine_text_under_n_chars`]).
pub fn chunk_by_title(
    elements: &[Element],
    config: &ChunkingConfig,
) -> Result<Vec<Chunk>, IngestError> {
    config.validate()?;

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut builder = ChunkBuilder::default();

    for element in elements {
        let text = element.text.trim();
        if text.is_empty() {
            continue;
        }

        if element.kind == ElementKind::Title && !builder.is_empty() {
            chunks.push(builder.finish());
        }

        let chars = text.chars().count();

        if chars > config.max_characters {
            if !builder.is_empty() {
                chunks.push(builder.finish());
            }
            for piece in split_oversized(text, config.max_characters) {
                chunks.push(Chunk {
                    text: piece,
                    page_number: element.page_number(),
                });
            }
            continue;
        }

        if !builder.is_empty()
            && (builder.chars + SEPARATOR_CHARS + chars > config.max_characters
                || builder.chars >= config.new_after_n_chars)
        {
            chunks.push(builder.finish());
        }

        builder.push(text, chars, element.page_number());
    }

    if !builder.is_empty() {
        chunks.push(builder.finish());
    }

    Ok(combine_small_chunks(chunks, config))
}

/// Split a single oversized text on character boundaries.
fn split_oversized(text: &str, max_characters: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_characters)
        .map(|piece| piece.iter().collect())
        .collect()
}

/// Merge a chunk shorter than the combine threshold into its successor
/// when the result still fits under the hard cap.
fn combine_small_chunks(chunks: Vec<Chunk>, config: &ChunkingConfig) -> Vec<Chunk> {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());

    for chunk in chunks {
        if let Some(last) = merged.last_mut() {
            let last_chars = last.text.chars().count();
            let next_chars = chunk.text.chars().count();
            if last_chars < config.combine_text_under_n_chars
                && last_chars + SEPARATOR_CHARS + next_chars <= config.max_characters
            {
                last.text.push_str("\n\n");
                last.text.push_str(&chunk.text);
                if last.page_number.is_none() {
                    last.page_number = chunk.page_number;
                }
                continue;
            }
        }
        merged.push(chunk);
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{filter_page_breaks, Element, ElementKind};

    fn narrative(text: &str, page: u32) -> Element {
        Element::new(ElementKind::NarrativeText, text).on_page(page)
    }

    fn title(text: &str, page: u32) -> Element {
        Element::new(ElementKind::Title, text).on_page(page)
    }

    #[test]
    fn default_thresholds() {
        let cfg = ChunkingConfig::default();
        assert_eq!(cfg.max_characters, 1000);
        assert_eq!(cfg.new_after_n_chars, 800);
        assert_eq!(cfg.combine_text_under_n_chars, 500);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inconsistent_thresholds() {
        let cfg = ChunkingConfig::default().with_new_after_n_chars(2000);
        assert!(matches!(cfg.validate(), Err(IngestError::InvalidConfig(_))));

        let cfg = ChunkingConfig::default().with_max_characters(0);
        assert!(cfg.validate().is_err());

        let cfg = ChunkingConfig::default()
            .with_max_characters(400)
            .with_new_after_n_chars(300)
            .with_combine_text_under_n_chars(500);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn title_starts_a_new_chunk() {
        let body_a = "a".repeat(600);
        let body_b = "b".repeat(600);
        let elements = vec![
            title("Setup", 1),
            narrative(&body_a, 1),
            title("Usage", 2),
            narrative(&body_b, 2),
        ];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("Setup"));
        assert!(chunks[0].text.contains(&body_a));
        assert!(chunks[1].text.starts_with("Usage"));
        assert_eq!(chunks[0].page_number, Some(1));
        assert_eq!(chunks[1].page_number, Some(2));
    }

    #[test]
    fn hard_cap_closes_the_chunk() {
        let elements = vec![
            narrative(&"a".repeat(400), 1),
            narrative(&"b".repeat(400), 1),
            narrative(&"c".repeat(400), 1),
        ];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        // 400 + 2 + 400 fits under 1000; the third element would not.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 802);
        assert_eq!(chunks[1].text.chars().count(), 400);
    }

    #[test]
    fn soft_threshold_starts_a_new_chunk_early() {
        let cfg = ChunkingConfig::default()
            .with_max_characters(10_000)
            .with_new_after_n_chars(350)
            .with_combine_text_under_n_chars(0);
        let elements = vec![
            narrative(&"a".repeat(300), 1),
            narrative(&"b".repeat(300), 1),
            narrative(&"c".repeat(300), 1),
        ];

        let chunks = chunk_by_title(&elements, &cfg).unwrap();
        // First two combine to 602 chars; that exceeds the soft threshold,
        // so the third element opens a fresh chunk.
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 602);
        assert_eq!(chunks[1].text.chars().count(), 300);
    }

    #[test]
    fn small_chunks_combine_forward() {
        let body = "d".repeat(600);
        let elements = vec![title("Overview", 1), title("Details", 1), narrative(&body, 2)];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        // "Overview" is far under the combine threshold and fits in front
        // of the "Details" section, so one chunk remains.
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.starts_with("Overview\n\nDetails"));
        assert_eq!(chunks[0].page_number, Some(1));
    }

    #[test]
    fn oversized_element_is_split_on_char_boundaries() {
        let elements = vec![narrative(&"x".repeat(2500), 4)];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text.chars().count(), 1000);
        assert_eq!(chunks[1].text.chars().count(), 1000);
        assert_eq!(chunks[2].text.chars().count(), 500);
        assert!(chunks.iter().all(|c| c.page_number == Some(4)));
    }

    #[test]
    fn multibyte_text_is_counted_in_chars() {
        let elements = vec![narrative(&"é".repeat(1200), 1)];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text.chars().count(), 1000);
        assert_eq!(chunks[1].text.chars().count(), 200);
    }

    #[test]
    fn whitespace_elements_are_skipped() {
        let elements = vec![
            narrative("   \n\t ", 1),
            narrative("Real content.", 1),
            narrative("", 1),
        ];

        let chunks = chunk_by_title(&elements, &ChunkingConfig::default()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Real content.");
    }

    #[test]
    fn rerunning_produces_identical_chunks() {
        let elements = vec![
            title("Intro", 1),
            narrative(&"a".repeat(450), 1),
            narrative(&"b".repeat(450), 2),
            title("Appendix", 3),
            narrative(&"c".repeat(200), 3),
        ];
        let cfg = ChunkingConfig::default();

        let first = chunk_by_title(&elements, &cfg).unwrap();
        let second = chunk_by_title(&elements, &cfg).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn page_break_scenario_yields_at_most_twelve_chunks() {
        let mut elements: Vec<Element> = (0..12)
            .map(|i| narrative(&format!("Short paragraph {i}."), 1 + i / 6))
            .collect();
        elements.insert(5, Element::new(ElementKind::PageBreak, ""));

        let kept = filter_page_breaks(elements);
        let chunks = chunk_by_title(&kept, &ChunkingConfig::default()).unwrap();

        assert!(chunks.len() <= 12);
        assert!(!chunks.iter().any(|c| c.text.is_empty()));
    }
}
