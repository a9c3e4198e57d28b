//! Integration tests for basic PDF merging operations.

use pdfmerge::io::BlobWriter;
use pdfmerge::{
    CompressionLevel, FileHandle, LopdfCapability, MergeOptions, MergeOrchestrator,
    OperationStatus, SaveOptions,
};
use rstest::rstest;
use tempfile::TempDir;

use crate::common::{labels, page_labels, pdf_handle, temp_output_path, write_pdf};

fn orchestrator() -> MergeOrchestrator<LopdfCapability> {
    MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default())
}

#[tokio::test]
async fn test_merge_two_files_from_disk() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "a", 2);
    let b = write_pdf(dir.path(), "b.pdf", "b", 3);

    let mut orch = orchestrator();
    orch.select(vec![FileHandle::from_path(&a), FileHandle::from_path(&b)]);

    let result = orch.merge().await.expect("merge failed");
    assert_eq!(result.files, 2);
    assert_eq!(result.pages, 5);
    assert_eq!(orch.status(), &OperationStatus::Succeeded);

    let bytes = orch.download(&result.download).unwrap();
    assert_eq!(result.bytes, bytes.len());

    let mut expected = labels("a", 2);
    expected.extend(labels("b", 3));
    assert_eq!(page_labels(&bytes), expected);
}

#[tokio::test]
async fn test_merge_preserves_selection_order() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("c.pdf", "c", 1),
        pdf_handle("a.pdf", "a", 2),
        pdf_handle("b.pdf", "b", 1),
    ]);

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(page_labels(&bytes), vec!["c-1", "a-1", "a-2", "b-1"]);
}

#[tokio::test]
async fn test_merge_single_file() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("only.pdf", "only", 4)]);

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(result.pages, 4);
    assert_eq!(page_labels(&bytes), labels("only", 4));
    assert!(bytes.starts_with(b"%PDF-1.7"));
}

#[tokio::test]
async fn test_merge_same_file_twice() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("x.pdf", "x", 2), pdf_handle("x.pdf", "x", 2)]);

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(page_labels(&bytes), vec!["x-1", "x-2", "x-1", "x-2"]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_merge_with_compression(#[case] compression: CompressionLevel) {
    let options = MergeOptions {
        save: SaveOptions { compression },
        ..Default::default()
    };
    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), options);
    orch.select(vec![pdf_handle("a.pdf", "a", 2), pdf_handle("b.pdf", "b", 1)]);

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(page_labels(&bytes), vec!["a-1", "a-2", "b-1"]);
}

#[tokio::test]
async fn test_remerge_is_equivalent_and_revokes_first() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("a.pdf", "a", 1), pdf_handle("b.pdf", "b", 2)]);

    let first = orch.merge().await.unwrap();
    let first_labels = page_labels(&orch.download(&first.download).unwrap());

    let second = orch.merge().await.unwrap();
    let second_labels = page_labels(&orch.download(&second.download).unwrap());

    assert_eq!(first_labels, second_labels);
    assert_eq!(first.pages, second.pages);
    assert!(orch.download(&first.download).is_err());
}

#[tokio::test]
async fn test_write_download_to_disk() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("a.pdf", "a", 1), pdf_handle("b.pdf", "b", 1)]);
    let result = orch.merge().await.unwrap();

    let output = temp_output_path();
    let bytes = orch.download(&result.download).unwrap();
    let stats = BlobWriter::new().write_shared(bytes, &output).await.unwrap();

    assert_eq!(stats.file_size as usize, result.bytes);
    let written = std::fs::read(&output).unwrap();
    assert_eq!(page_labels(&written), vec!["a-1", "b-1"]);
}

#[tokio::test]
async fn test_merged_output_carries_producer() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("a.pdf", "a", 1)]);
    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    let info_id = doc
        .trailer
        .get(b"Info")
        .and_then(lopdf::Object::as_reference)
        .unwrap();
    let producer = doc.get_dictionary(info_id).unwrap().get(b"Producer").unwrap();
    assert!(matches!(producer, lopdf::Object::String(bytes, _) if bytes == b"pdfmerge"));
}
