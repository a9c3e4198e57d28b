//! Integration tests for file selection.

use pdfmerge::io::open_inputs;
use pdfmerge::utils::collect_paths_for_patterns;
use pdfmerge::{LopdfCapability, MergeOptions, MergeOrchestrator, StatusEvent};
use tempfile::TempDir;

use crate::common::{labels, page_labels, write_pdf};

#[tokio::test]
async fn test_select_drops_non_pdf_files() {
    let dir = TempDir::new().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "a", 1);
    let b = dir.path().join("b.txt");
    std::fs::write(&b, b"plain text").unwrap();
    let c = write_pdf(dir.path(), "c.pdf", "c", 2);

    let (inputs, stats) = open_inputs(&[a, b, c]).await.unwrap();
    assert_eq!(stats.pdf_files, 2);

    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    let mut events = orch.subscribe();
    let retained = orch.select(inputs.into_iter().map(|input| input.handle));

    assert_eq!(retained, 2);
    assert_eq!(orch.selection().names(), vec!["a.pdf", "c.pdf"]);
    assert_eq!(
        events.try_recv().unwrap(),
        StatusEvent::Selected {
            retained: 2,
            dropped: 1
        }
    );

    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    let mut expected = labels("a", 1);
    expected.extend(labels("c", 2));
    assert_eq!(page_labels(&bytes), expected);
}

#[tokio::test]
async fn test_pdf_content_with_wrong_extension_is_dropped() {
    let dir = TempDir::new().unwrap();
    let disguised = dir.path().join("scan.bin");
    std::fs::copy(write_pdf(dir.path(), "real.pdf", "r", 1), &disguised).unwrap();

    let (inputs, _) = open_inputs(&[disguised]).await.unwrap();

    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    assert_eq!(orch.select(inputs.into_iter().map(|i| i.handle)), 0);
}

#[tokio::test]
async fn test_glob_selection_merges_in_name_order() {
    let dir = TempDir::new().unwrap();
    write_pdf(dir.path(), "02.pdf", "second", 1);
    write_pdf(dir.path(), "01.pdf", "first", 1);
    write_pdf(dir.path(), "03.pdf", "third", 1);

    let paths = collect_paths_for_patterns([format!("{}/*.pdf", dir.path().display())]).unwrap();
    let (inputs, _) = open_inputs(&paths).await.unwrap();

    let mut orch = MergeOrchestrator::new(LopdfCapability::new(), MergeOptions::default());
    orch.select(inputs.into_iter().map(|i| i.handle));
    let result = orch.merge().await.unwrap();
    let bytes = orch.download(&result.download).unwrap();

    assert_eq!(page_labels(&bytes), vec!["first-1", "second-1", "third-1"]);
}
