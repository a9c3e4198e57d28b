//! Integration tests for merge plans.

use pdfmerge::orchestrator::PlannedFile;
use pdfmerge::{
    FileHandle, LopdfCapability, MergeOptions, MergeOrchestrator, OperationStatus,
    PdfMergeError,
};
use tempfile::TempDir;

use crate::common::{pdf_handle, write_pdf};

#[tokio::test]
async fn test_plan_counts_pages() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "a", 3);
    let b = write_pdf(dir.path(), "b.pdf", "b", 1);

    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    orch.select(vec![FileHandle::from_path(a), FileHandle::from_path(b)]);

    let plan = orch.plan().await.unwrap();

    assert_eq!(
        plan.files,
        vec![
            PlannedFile {
                name: "a.pdf".into(),
                pages: 3
            },
            PlannedFile {
                name: "b.pdf".into(),
                pages: 1
            },
        ]
    );
    assert_eq!(plan.total_pages, 4);
}

#[tokio::test]
async fn test_plan_produces_no_output() {
    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    orch.select(vec![pdf_handle("a.pdf", "a", 2)]);
    let mut events = orch.subscribe();

    orch.plan().await.unwrap();

    assert_eq!(orch.status(), &OperationStatus::Idle);
    assert!(orch.result().is_none());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_plan_reports_corrupt_input() {
    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    orch.select(vec![
        pdf_handle("a.pdf", "a", 1),
        FileHandle::from_bytes("broken.pdf", "application/pdf", b"not a pdf at all".to_vec()),
    ]);

    let err = orch.plan().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::ParseFailure { ref name, .. } if name == "broken.pdf"));
    assert_eq!(orch.status(), &OperationStatus::Idle);
}

#[tokio::test]
async fn test_plan_serializes() {
    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    orch.select(vec![pdf_handle("a.pdf", "a", 2)]);

    let plan = orch.plan().await.unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["total_pages"], 2);
    assert_eq!(json["files"][0]["name"], "a.pdf");
}
