//! Integration tests for error handling and edge cases.

use pdfmerge::config::Config;
use pdfmerge::io::{open_input, open_inputs};
use pdfmerge::{
    FileHandle, LopdfCapability, MergeOptions, MergeOrchestrator, OperationStatus,
    PdfMergeError, StatusEvent,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::common::{
    encrypted_pdf_bytes, labels, page_labels, pdf_handle, rootless_pdf_bytes, write_pdf,
};

fn orchestrator() -> MergeOrchestrator<LopdfCapability> {
    MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default())
}

fn failure_reason(orch: &MergeOrchestrator<LopdfCapability>) -> String {
    match orch.status() {
        OperationStatus::Failed { reason } => reason.clone(),
        other => panic!("expected failed status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_corrupted_pdf() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("good.pdf", "good", 1),
        FileHandle::from_bytes("bad.pdf", "application/pdf", b"this is not a pdf".to_vec()),
    ]);

    let err = orch.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::ParseFailure { ref name, .. } if name == "bad.pdf"));
    assert_eq!(err.exit_code(), 3);
    assert!(orch.result().is_none());
    assert_eq!(orch.selection().len(), 2);

    let reason = failure_reason(&orch);
    assert!(reason.starts_with("An error occurred while merging the PDFs: "));
    assert!(reason.contains("bad.pdf"));
    assert!(reason.ends_with("Make sure the files are not corrupted or protected."));
}

#[tokio::test]
async fn test_error_password_protected_pdf() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("a.pdf", "a", 1),
        FileHandle::from_bytes(
            "locked.pdf",
            "application/pdf",
            encrypted_pdf_bytes("locked", 2, "secret"),
        ),
    ]);

    let err = orch.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::ParseFailure { ref name, .. } if name == "locked.pdf"));
    assert!(orch.result().is_none());
    assert!(failure_reason(&orch).contains("password"));
}

#[tokio::test]
async fn test_error_pdf_without_catalog() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("a.pdf", "a", 1),
        FileHandle::from_bytes("rootless.pdf", "application/pdf", rootless_pdf_bytes("r", 3)),
    ]);

    let err = orch.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::ParseFailure { ref name, .. } if name == "rootless.pdf"));
    assert!(matches!(orch.status(), OperationStatus::Failed { .. }));
}

#[tokio::test]
async fn test_pdf_with_empty_user_password_merges() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("a.pdf", "a", 1),
        FileHandle::from_bytes("enc.pdf", "application/pdf", encrypted_pdf_bytes("enc", 2, "")),
    ]);

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(result.pages, 3);
    let mut expected = labels("a", 1);
    expected.extend(labels("enc", 2));
    assert_eq!(page_labels(&bytes), expected);
}

#[tokio::test]
async fn test_error_empty_file() {
    let temp_file = tempfile::NamedTempFile::with_suffix(".pdf").unwrap();

    let mut orch = orchestrator();
    orch.select(vec![FileHandle::from_path(temp_file.path())]);

    let err = orch.merge().await.unwrap_err();
    assert!(matches!(err, PdfMergeError::ParseFailure { .. }));
}

#[tokio::test]
async fn test_error_file_removed_after_selection() {
    let dir = TempDir::new().unwrap();
    let path = write_pdf(dir.path(), "gone.pdf", "gone", 1);

    let mut orch = orchestrator();
    orch.select(vec![FileHandle::from_path(&path)]);
    std::fs::remove_file(&path).unwrap();

    let err = orch.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::ReadFailure { ref name, .. } if name == "gone.pdf"));
    assert!(matches!(orch.status(), OperationStatus::Failed { .. }));
}

#[tokio::test]
async fn test_error_empty_selection() {
    let mut orch = orchestrator();
    let mut events = orch.subscribe();

    let err = orch.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::EmptySelection));
    assert_eq!(orch.status(), &OperationStatus::Idle);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_error_only_non_pdf_selected() {
    let mut orch = orchestrator();
    let retained = orch.select(vec![FileHandle::from_bytes(
        "notes.txt",
        "text/plain",
        b"hello".to_vec(),
    )]);

    assert_eq!(retained, 0);
    assert!(matches!(
        orch.merge().await,
        Err(PdfMergeError::EmptySelection)
    ));
}

#[tokio::test]
async fn test_failed_merge_event_sequence() {
    let mut orch = orchestrator();
    orch.select(vec![
        pdf_handle("a.pdf", "a", 2),
        FileHandle::from_bytes("bad.pdf", "application/pdf", b"garbage".to_vec()),
        pdf_handle("c.pdf", "c", 1),
    ]);
    let mut events = orch.subscribe();

    let _ = orch.merge().await;

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }

    assert_eq!(received.len(), 3);
    assert_eq!(received[0], StatusEvent::Started { files: 3 });
    assert!(matches!(
        received[1],
        StatusEvent::FileMerged {
            index: 1,
            pages: 2,
            ..
        }
    ));
    assert!(matches!(received[2], StatusEvent::Failed { .. }));
}

#[tokio::test]
async fn test_recovers_after_failure() {
    let mut orch = orchestrator();
    orch.select(vec![FileHandle::from_bytes(
        "bad.pdf",
        "application/pdf",
        b"junk".to_vec(),
    )]);
    assert!(orch.merge().await.is_err());

    orch.select(vec![pdf_handle("a.pdf", "a", 1)]);
    let result = orch.merge().await.unwrap();

    assert_eq!(result.pages, 1);
    assert_eq!(orch.status(), &OperationStatus::Succeeded);
}

#[tokio::test]
async fn test_revoked_reference_after_clear() {
    let mut orch = orchestrator();
    orch.select(vec![pdf_handle("a.pdf", "a", 1)]);
    let result = orch.merge().await.unwrap();

    orch.clear();

    let err = orch.download(&result.download).unwrap_err();
    assert!(matches!(err, PdfMergeError::ReferenceRevoked { ref url } if url == result.download.url()));
    assert!(matches!(
        orch.merge().await,
        Err(PdfMergeError::EmptySelection)
    ));
}

#[tokio::test]
async fn test_error_nonexistent_input() {
    let err = open_input(Path::new("/nonexistent/file.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMergeError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_error_stops_at_first_bad_input() {
    let dir = TempDir::new().unwrap();
    let good = write_pdf(dir.path(), "good.pdf", "good", 1);

    let result = open_inputs(&[good, PathBuf::from("/nonexistent/missing.pdf")]).await;
    assert!(matches!(result, Err(PdfMergeError::FileNotFound { .. })));
}

#[test]
fn test_error_output_same_as_input() {
    let config = Config {
        inputs: vec![PathBuf::from("a.pdf")],
        output: PathBuf::from("a.pdf"),
        ..Default::default()
    };

    assert!(config.validate().is_err());
}
