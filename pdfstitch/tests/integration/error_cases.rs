//! Integration tests for rejected requests.

use pdfstitch::merge::{Merger, OrderSpecification};
use pdfstitch::request::ProcessOptions;
use pdfstitch::{Action, Processor, Request, StitchError, UploadedDocument};
use rstest::rstest;

use crate::common::{encrypted_upload, upload};

fn merge(documents: Vec<UploadedDocument>, names: &[&str]) -> pdfstitch::Result<()> {
    Processor::default()
        .process(Request::merge(
            documents,
            OrderSpecification::new(names.iter().copied()),
        ))
        .map(|_| ())
}

#[test]
fn test_empty_order_is_rejected() {
    let err = merge(vec![upload("A", 1)], &[]).unwrap_err();
    assert!(matches!(err, StitchError::Validation { .. }));
    assert!(err.is_rejection());
}

#[rstest]
#[case::missing_name(&["A.pdf"])]
#[case::unknown_name(&["A.pdf", "Z.pdf"])]
#[case::repeated_name(&["A.pdf", "A.pdf"])]
#[case::extra_name(&["A.pdf", "B.pdf", "C.pdf"])]
fn test_order_must_be_a_permutation(#[case] names: &[&str]) {
    let err = merge(vec![upload("A", 1), upload("B", 1)], names).unwrap_err();
    assert!(
        matches!(err, StitchError::Validation { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_duplicate_upload_names_are_rejected() {
    let documents = vec![upload("A", 1), upload("A", 2)];
    let err = merge(documents, &["A.pdf", "A.pdf"]).unwrap_err();
    assert!(matches!(err, StitchError::Validation { .. }));
}

#[test]
fn test_count_exceeded_before_parsing() {
    // None of these payloads is a PDF; the count check must fire first.
    let documents: Vec<_> = (0..21)
        .map(|i| UploadedDocument::new(format!("{i}.pdf"), b"garbage".to_vec()))
        .collect();
    let names: Vec<String> = (0..21).map(|i| format!("{i}.pdf")).collect();

    let err = Processor::default()
        .process(Request::merge(documents, OrderSpecification::new(names)))
        .unwrap_err();

    assert!(matches!(
        err,
        StitchError::CountExceeded {
            count: 21,
            limit: 20
        }
    ));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_count_exceeded_regardless_of_order() {
    let documents: Vec<_> = (0..21).map(|i| upload(&format!("D{i}"), 1)).collect();

    let err = Merger::new()
        .merge(&documents, &OrderSpecification::new(["nonsense"]))
        .unwrap_err();
    assert!(matches!(err, StitchError::CountExceeded { .. }));
}

#[test]
fn test_custom_limit() {
    let processor = Processor::new(ProcessOptions {
        max_documents: 2,
        ..ProcessOptions::default()
    });
    let documents = vec![upload("A", 1), upload("B", 1), upload("C", 1)];
    let order = OrderSpecification::upload_order(&documents);

    let err = processor
        .process(Request::merge(documents, order))
        .unwrap_err();
    assert!(matches!(err, StitchError::CountExceeded { count: 3, limit: 2 }));
}

#[test]
fn test_malformed_upload_fails_whole_merge() {
    let documents = vec![
        upload("A", 1),
        UploadedDocument::new("broken.pdf", b"this is not a pdf".to_vec()),
    ];

    let err = merge(documents, &["A.pdf", "broken.pdf"]).unwrap_err();
    match err {
        StitchError::MalformedInput { name, .. } => assert_eq!(name, "broken.pdf"),
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

#[test]
fn test_encrypted_upload_fails_whole_merge() {
    let documents = vec![upload("B", 1), encrypted_upload("locked", 1)];

    let err = merge(documents, &["B.pdf", "locked.pdf"]).unwrap_err();
    match err {
        StitchError::EncryptedInput { ref name } => assert_eq!(name, "locked.pdf"),
        ref other => panic!("expected EncryptedInput, got {other:?}"),
    }
    assert!(err.is_rejection());
    assert_eq!(err.exit_code(), 3);
}

#[rstest]
#[case(Action::Split)]
#[case(Action::Compress)]
fn test_single_document_actions_reject_batches(#[case] action: Action) {
    let documents = vec![upload("A", 1), upload("B", 1)];
    let request = Request {
        order: OrderSpecification::upload_order(&documents),
        documents,
        action,
    };

    let err = Processor::default().process(request).unwrap_err();
    assert!(matches!(err, StitchError::Validation { .. }));
}
