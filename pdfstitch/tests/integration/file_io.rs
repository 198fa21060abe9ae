//! Integration tests for reading uploads and delivering artifacts.

use pdfstitch::io::{ArtifactWriter, UploadReader};
use pdfstitch::merge::{MergeSession, OrderSpecification};
use pdfstitch::validation::Validator;
use pdfstitch::{Outcome, Processor, Request, StitchError};
use tempfile::TempDir;

use crate::common::{archive_entries, dir_entries, labels, write_pdf};

#[tokio::test]
async fn test_files_to_merged_file() {
    let temp_dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(temp_dir.path(), "intro", 1),
        write_pdf(temp_dir.path(), "body", 2),
    ];

    let uploads = UploadReader::new().load_uploads(&paths, 2).await.unwrap();

    let mut session = MergeSession::new();
    session.add_all(uploads).set_order(["body.pdf", "intro.pdf"]);
    let merged = session.merge().unwrap();

    let output = temp_dir.path().join(merged.file_name());
    ArtifactWriter::new()
        .save(merged.artifact(), &output)
        .await
        .unwrap();

    let written = std::fs::read(&output).unwrap();
    assert_eq!(labels(&written), ["body-1", "body-2", "intro-1"]);
    assert_eq!(
        dir_entries(temp_dir.path()),
        ["body.pdf", "intro.pdf", "merged.pdf"]
    );
}

#[tokio::test]
async fn test_split_to_archive_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_pdf(temp_dir.path(), "doc", 2);
    let upload = UploadReader::new().load(&path).await.unwrap().upload;

    let Outcome::Split(archive) = Processor::default().process(Request::split(upload)).unwrap()
    else {
        panic!("expected split outcome");
    };

    let output = temp_dir.path().join(&archive.file_name);
    ArtifactWriter::new().save(&archive, &output).await.unwrap();

    assert_eq!(dir_entries(temp_dir.path()), ["doc.pdf", "split_pages.zip"]);
    let written = std::fs::read(&output).unwrap();
    let names: Vec<String> = archive_entries(&written)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["page_1.pdf", "page_2.pdf"]);
}

#[tokio::test]
async fn test_failed_write_leaves_no_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_pdf(temp_dir.path(), "doc", 1);
    let upload = UploadReader::new().load(&path).await.unwrap().upload;

    let Outcome::Compressed { artifact, .. } = Processor::default()
        .process(Request::compress(upload))
        .unwrap()
    else {
        panic!("expected compress outcome");
    };

    // The destination is an existing directory, so the final rename fails.
    let blocked = temp_dir.path().join("blocked");
    std::fs::create_dir(&blocked).unwrap();
    std::fs::write(blocked.join("keep.txt"), b"x").unwrap();

    let err = ArtifactWriter::new()
        .save(&artifact, &blocked)
        .await
        .unwrap_err();

    assert!(matches!(err, StitchError::FailedToWrite { .. }));
    assert_eq!(dir_entries(temp_dir.path()), ["blocked", "doc.pdf"]);
}

#[tokio::test]
async fn test_missing_input_is_reported_by_path() {
    let temp_dir = TempDir::new().unwrap();
    let present = write_pdf(temp_dir.path(), "a", 1);
    let missing = temp_dir.path().join("b.pdf");

    let err = UploadReader::new()
        .load_uploads(&[present, missing.clone()], 2)
        .await
        .unwrap_err();

    match err {
        StitchError::FileNotFound { path } => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_dry_run_plan_from_files() {
    let temp_dir = TempDir::new().unwrap();
    let paths = vec![
        write_pdf(temp_dir.path(), "a", 2),
        write_pdf(temp_dir.path(), "b", 3),
    ];
    let uploads = UploadReader::new().load_uploads(&paths, 1).await.unwrap();

    let plan = Validator::new()
        .plan(
            &uploads,
            &OrderSpecification::new(["b.pdf", "a.pdf"]),
            "merged.pdf",
        )
        .unwrap();

    assert_eq!(plan.summary.total_pages, 5);
    assert_eq!(plan.summary.results[0].name, "b.pdf");
    assert_eq!(plan.summary.results[0].page_dimensions, Some((595.0, 842.0)));

    // Nothing besides the inputs was created.
    assert_eq!(dir_entries(temp_dir.path()), ["a.pdf", "b.pdf"]);
}
