//! Batch pipeline operations: partition a document, load the index.

use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;
use tracing::{info, warn};

use embeddings::{EmbeddingsError, TextEmbedder};
use ingest::{
    build_records, chunk_by_title, filter_page_breaks, read_records, write_records,
    ChunkingConfig, IngestError, PartitionClient,
};
use search::{SearchError, SearchIndex};

/// Errors from the batch pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Partitioning, chunking, or record file handling failed.
    #[error("ingest failure")]
    Ingest(#[from] IngestError),

    /// One record could not be embedded under the fail-run policy.
    #[error("failed to embed {chunk_id}")]
    Embedding {
        chunk_id: String,
        #[source]
        source: EmbeddingsError,
    },

    /// The index request itself failed.
    #[error("search failure")]
    Search(#[from] SearchError),

    /// The index accepted the batch request but rejected documents.
    #[error("index rejected {failed} of {total} documents")]
    UploadRejected { failed: usize, total: usize },
}

/// What to do when one record fails to embed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum UploadPolicy {
    /// Abort the run on the first embedding failure.
    #[default]
    FailRun,

    /// Log the failure, skip the record, upload the rest.
    SkipFailed,
}

/// Counters reported after a partition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionSummary {
    /// Layout elements returned by the partition service.
    pub elements: usize,
    /// Page-break markers dropped before chunking.
    pub page_breaks_removed: usize,
    /// Chunk records written to the output file.
    pub chunks: usize,
}

/// Counters reported after an index load run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records read from the input file.
    pub total: usize,
    /// Records that embedded successfully.
    pub embedded: usize,
    /// Records skipped under [`UploadPolicy::SkipFailed`].
    pub skipped: usize,
    /// Documents accepted by the index.
    pub uploaded: usize,
}

/// Partition a document into chunk records and write them to `output`.
///
/// Runs the partition service on `source`, drops page-break markers,
/// groups the remaining elements into title-bounded chunks, and writes
/// the records file. Re-running with the same inputs produces the same
/// file.
pub async fn partition_document(
    client: &PartitionClient,
    source: &Path,
    output: &Path,
    config: &ChunkingConfig,
) -> Result<PartitionSummary, PipelineError> {
    let elements = client.partition_file(source).await?;
    let total = elements.len();

    let kept = filter_page_breaks(elements);
    let page_breaks_removed = total - kept.len();
    if page_breaks_removed > 0 {
        info!(removed = page_breaks_removed, "dropped page-break elements");
    }

    let chunks = chunk_by_title(&kept, config)?;

    let source_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string());
    let records = build_records(&source_name, &chunks);
    write_records(output, &records)?;

    info!(
        records = records.len(),
        output = %output.display(),
        "wrote chunk records"
    );

    Ok(PartitionSummary {
        elements: total,
        page_breaks_removed,
        chunks: records.len(),
    })
}

/// Embed the records in `input` and upload them to the index.
///
/// Records are embedded one at a time, in file order. `policy` decides
/// what a single embedding failure does to the run. The surviving
/// records go up in one batch; any document the index rejects is logged
/// with its key and reason, and a run with rejections fails after the
/// whole batch has been reported.
pub async fn load_records(
    embedder: &dyn TextEmbedder,
    index: &dyn SearchIndex,
    input: &Path,
    policy: UploadPolicy,
) -> Result<LoadSummary, PipelineError> {
    let records = read_records(input)?;
    let total = records.len();
    info!(records = total, input = %input.display(), "read chunk records");

    let mut embedded = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for mut record in records {
        match embedder.embed(&record.content).await {
            Ok(vector) => {
                record.content_vector = Some(vector);
                embedded.push(record);
            }
            Err(err) => match policy {
                UploadPolicy::FailRun => {
                    return Err(PipelineError::Embedding {
                        chunk_id: record.chunk_id,
                        source: err,
                    });
                }
                UploadPolicy::SkipFailed => {
                    warn!(
                        chunk_id = %record.chunk_id,
                        error = %err,
                        "skipping record that failed to embed"
                    );
                    skipped += 1;
                }
            },
        }
    }

    if embedded.is_empty() {
        info!(skipped, "no records to upload");
        return Ok(LoadSummary {
            total,
            embedded: 0,
            skipped,
            uploaded: 0,
        });
    }

    let outcomes = index.upload_documents(&embedded).await?;
    let mut failed = 0usize;
    for outcome in &outcomes {
        if !outcome.succeeded {
            failed += 1;
            warn!(
                key = %outcome.key,
                status_code = outcome.status_code,
                message = outcome.error_message.as_deref().unwrap_or("unknown"),
                "index rejected document"
            );
        }
    }
    if failed > 0 {
        return Err(PipelineError::UploadRejected {
            failed,
            total: embedded.len(),
        });
    }

    info!(uploaded = embedded.len(), skipped, "upload complete");
    Ok(LoadSummary {
        total,
        embedded: embedded.len(),
        skipped,
        uploaded: embedded.len(),
    })
}
