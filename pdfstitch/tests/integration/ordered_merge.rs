//! Integration tests for ordered merging.

use pdfstitch::merge::{MergeSession, Merger, OrderSpecification};
use pdfstitch::{Outcome, Processor, Request, UploadedDocument};
use proptest::prelude::*;

use lopdf::{Document, Object};

use crate::common::{
    effective_attribute, labels, page_count, pdf_document, root_pages, to_bytes, upload,
};

fn media_box(doc: &Document, page_id: lopdf::ObjectId) -> Vec<i64> {
    effective_attribute(doc, page_id, b"MediaBox")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|value| value.as_i64().unwrap())
        .collect()
}

#[test]
fn test_merge_follows_chosen_order() {
    let documents = vec![upload("A", 2), upload("B", 1)];
    let order = OrderSpecification::new(["B.pdf", "A.pdf"]);

    let Outcome::Merged(merged) = Processor::default()
        .process(Request::merge(documents, order))
        .unwrap()
    else {
        panic!("expected a merged artifact");
    };

    assert_eq!(merged.file_name(), "merged.pdf");
    assert_eq!(labels(merged.bytes()), ["B-1", "A-1", "A-2"]);

    let origins: Vec<(String, usize)> = merged
        .pages()
        .iter()
        .map(|origin| (origin.document.clone(), origin.page))
        .collect();
    assert_eq!(
        origins,
        [
            ("B.pdf".to_string(), 1),
            ("A.pdf".to_string(), 1),
            ("A.pdf".to_string(), 2)
        ]
    );
}

#[test]
fn test_merge_keeps_page_resources_and_inherited_media_box() {
    // Resources live on each page; MediaBox on each source's Pages node.
    let documents = vec![upload("A", 1), upload("B", 2)];
    let order = OrderSpecification::new(["B.pdf", "A.pdf"]);

    let merged = Merger::new().merge(&documents, &order).unwrap();

    let doc = Document::load_mem(merged.bytes()).unwrap();
    for page_id in doc.get_pages().into_values() {
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = match page.get(b"Resources").unwrap() {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
            Object::Dictionary(dict) => dict,
            other => panic!("unexpected resources: {other:?}"),
        };
        let fonts = match resources.get(b"Font").unwrap() {
            Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
            Object::Dictionary(dict) => dict,
            other => panic!("unexpected font entry: {other:?}"),
        };
        assert!(fonts.has(b"F1"), "page {page_id:?} lost its font");
        assert_eq!(media_box(&doc, page_id), [0, 0, 595, 842]);
    }
}

#[test]
fn test_first_document_attributes_stay_on_its_pages() {
    let mut first = pdf_document("A", 2);
    let root = root_pages(&mut first);
    root.set("Rotate", 90);
    root.set("MediaBox", vec![0.into(), 0.into(), 612.into(), 792.into()]);

    let documents = vec![
        UploadedDocument::new("A.pdf", to_bytes(first)),
        upload("B", 1),
    ];
    let order = OrderSpecification::new(["A.pdf", "B.pdf"]);

    let merged = Merger::new().merge(&documents, &order).unwrap();
    assert_eq!(labels(merged.bytes()), ["A-1", "A-2", "B-1"]);

    let doc = Document::load_mem(merged.bytes()).unwrap();
    let pages: Vec<_> = doc.get_pages().into_values().collect();

    let rotations: Vec<Option<i64>> = pages
        .iter()
        .map(|&id| effective_attribute(&doc, id, b"Rotate").map(|r| r.as_i64().unwrap()))
        .collect();
    assert_eq!(rotations, [Some(90), Some(90), None]);

    assert_eq!(media_box(&doc, pages[0]), [0, 0, 612, 792]);
    assert_eq!(media_box(&doc, pages[2]), [0, 0, 595, 842]);
}

#[test]
fn test_merge_is_repeatable() {
    let documents = vec![upload("A", 3), upload("B", 2), upload("C", 1)];
    let order = OrderSpecification::new(["C.pdf", "A.pdf", "B.pdf"]);
    let merger = Merger::new();

    let first = merger.merge(&documents, &order).unwrap();
    let second = merger.merge(&documents, &order).unwrap();

    assert_eq!(labels(first.bytes()), labels(second.bytes()));
    assert_eq!(first.pages(), second.pages());
}

#[test]
fn test_twenty_documents_is_within_limit() {
    let documents: Vec<_> = (0..20).map(|i| upload(&format!("D{i}"), 1)).collect();
    let order = OrderSpecification::upload_order(&documents);

    let merged = Merger::new().merge(&documents, &order).unwrap();
    assert_eq!(merged.page_count(), 20);
    assert_eq!(page_count(merged.bytes()), 20);
}

#[test]
fn test_session_merges_in_upload_order() {
    let mut session = MergeSession::new();
    session.add(upload("X", 1)).add(upload("Y", 2));

    let merged = session.merge().unwrap();
    assert_eq!(labels(merged.bytes()), ["X-1", "Y-1", "Y-2"]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_permutation_preserves_page_count(
        (pages, order) in prop::collection::vec(1usize..4, 1..5)
            .prop_flat_map(|pages| {
                let indices: Vec<usize> = (0..pages.len()).collect();
                (Just(pages), Just(indices).prop_shuffle())
            })
    ) {
        let documents: Vec<_> = pages
            .iter()
            .enumerate()
            .map(|(i, &n)| upload(&format!("D{i}"), n))
            .collect();
        let names: Vec<String> = order.iter().map(|&i| format!("D{i}.pdf")).collect();

        let merged = Merger::new()
            .merge(&documents, &OrderSpecification::new(names))
            .unwrap();

        let expected: usize = pages.iter().sum();
        prop_assert_eq!(merged.page_count(), expected);
        prop_assert_eq!(page_count(merged.bytes()), expected);

        let first_labels: Vec<String> = labels(merged.bytes())
            .into_iter()
            .filter(|label| label.ends_with("-1"))
            .collect();
        let expected_firsts: Vec<String> = order.iter().map(|i| format!("D{i}-1")).collect();
        prop_assert_eq!(first_labels, expected_firsts);
    }
}
