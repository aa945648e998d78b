//! Chunk records and their on-disk JSON representation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;
use crate::error::IngestError;

/// One chunk of a source document, as stored in the records file and in
/// the search index.
///
/// `content_vector` is absent until an embedding pass fills it in, and is
/// omitted from serialized output while unset so partitioner output stays
/// free of index-only fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Identifier of the originating document, e.g. its file name.
    pub source: String,

    /// Chunk text.
    pub content: String,

    /// Position of the chunk within its document, formatted `chunk_<i>`
    /// with a zero-based index. Unique per source document.
    pub chunk_id: String,

    /// Page the chunk starts on, when the partitioner reported one.
    pub page_number: Option<u32>,

    /// Embedding of `content`, filled in by the index loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_vector: Option<Vec<f32>>,
}

/// Turn chunks into records for `source`, assigning sequential ids.
pub fn build_records(source: &str, chunks: &[Chunk]) -> Vec<ChunkRecord> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| ChunkRecord {
            source: source.to_string(),
            content: chunk.text.clone(),
            chunk_id: format!("chunk_{i}"),
            page_number: chunk.page_number,
            content_vector: None,
        })
        .collect()
}

/// Write records as a pretty-printed JSON array.
///
/// The file is written to a temporary sibling path and renamed into
/// place, so a crash mid-write never leaves a truncated records file.
pub fn write_records(path: &Path, records: &[ChunkRecord]) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(records).map_err(IngestError::Serialize)?;

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");

    fs::write(&tmp, json).map_err(|source| IngestError::Io {
        path: tmp.clone().into(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Read a records file produced by [`write_records`].
pub fn read_records(path: &Path) -> Result<Vec<ChunkRecord>, IngestError> {
    let json = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(IngestError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            Chunk {
                text: "First section.".to_string(),
                page_number: Some(1),
            },
            Chunk {
                text: "Second section.".to_string(),
                page_number: Some(3),
            },
            Chunk {
                text: "Trailing text without a page.".to_string(),
                page_number: None,
            },
        ]
    }

    #[test]
    fn build_records_assigns_sequential_ids() {
        let records = build_records("manual.pdf", &sample_chunks());

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].chunk_id, "chunk_0");
        assert_eq!(records[1].chunk_id, "chunk_1");
        assert_eq!(records[2].chunk_id, "chunk_2");
        assert!(records.iter().all(|r| r.source == "manual.pdf"));
        assert!(records.iter().all(|r| r.content_vector.is_none()));
        assert_eq!(records[2].page_number, None);
    }

    #[test]
    fn unset_vector_is_omitted_from_json() {
        let records = build_records("manual.pdf", &sample_chunks()[..1]);
        let json = serde_json::to_string(&records).unwrap();

        assert!(!json.contains("content_vector"));
        assert!(json.contains("\"chunk_id\":\"chunk_0\""));
    }

    #[test]
    fn set_vector_round_trips() {
        let mut record = build_records("manual.pdf", &sample_chunks()[..1]).remove(0);
        record.content_vector = Some(vec![0.25, -0.5, 1.0]);

        let json = serde_json::to_string(&record).unwrap();
        let back: ChunkRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
        assert_eq!(back.content_vector.as_deref(), Some(&[0.25, -0.5, 1.0][..]));
    }

    #[test]
    fn write_then_read_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let records = build_records("manual.pdf", &sample_chunks());

        write_records(&path, &records).unwrap();
        let back = read_records(&path).unwrap();

        assert_eq!(back, records);
        // No temporary file left behind after the rename.
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[test]
    fn written_file_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        write_records(&path, &build_records("manual.pdf", &sample_chunks())).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n"));
        assert!(text.contains("  \"source\": \"manual.pdf\""));
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = read_records(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/data.json"));
    }
}
