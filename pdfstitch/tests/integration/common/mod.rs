//! Shared helpers for integration tests.
//!
//! Documents are generated in memory: every page carries a text operator
//! showing `<label>-<n>`, so tests can read back which source page landed
//! where.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pdfstitch::UploadedDocument;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Build a document with `pages` pages labelled `<label>-1` .. `<label>-<pages>`.
///
/// Every page carries its own `Resources`; the `MediaBox` sits on the root
/// `Pages` node and is inherited.
pub fn pdf_document(label: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 10.into()]),
                    Operation::new("Tj", vec![Object::string_literal(format!("{label}-{n}"))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Serialize a document.
pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Build a PDF with `pages` pages labelled `<label>-1` .. `<label>-<pages>`.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    to_bytes(pdf_document(label, pages))
}

/// Root `Pages` node of a document.
pub fn root_pages(doc: &mut Document) -> &mut Dictionary {
    let pages_id = doc
        .catalog()
        .unwrap()
        .get(b"Pages")
        .unwrap()
        .as_reference()
        .unwrap();
    doc.get_dictionary_mut(pages_id).unwrap()
}

/// Upload protected by a standard security handler nobody can open.
pub fn encrypted_upload(label: &str, pages: usize) -> UploadedDocument {
    let mut doc = pdf_document(label, pages);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 2,
        "R" => 3,
        "Length" => 128,
        "P" => -1028,
        "O" => Object::string_literal(vec![0xa5_u8; 32]),
        "U" => Object::string_literal(vec![0x5a_u8; 32]),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![0x42_u8; 16]),
            Object::string_literal(vec![0x42_u8; 16]),
        ],
    );
    UploadedDocument::new(format!("{label}.pdf"), to_bytes(doc))
}

/// Value of `key` as a page sees it, own or inherited.
pub fn effective_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    loop {
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
}

/// Entry names and contents of a zip archive, in archive order.
pub fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).unwrap();
            (entry.name().to_string(), contents)
        })
        .collect()
}

/// Upload named `<label>.pdf`.
pub fn upload(label: &str, pages: usize) -> UploadedDocument {
    UploadedDocument::new(format!("{label}.pdf"), pdf_bytes(label, pages))
}

/// Page labels of a serialized document, in page order.
pub fn labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).unwrap();
            let text = String::from_utf8_lossy(&content).into_owned();
            let start = text.find('(').unwrap() + 1;
            let end = text[start..].find(')').unwrap() + start;
            text[start..end].to_string()
        })
        .collect()
}

/// Number of pages in a serialized document.
pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// Write `<label>.pdf` into `dir` and return its path.
pub fn write_pdf(dir: &Path, label: &str, pages: usize) -> PathBuf {
    let path = dir.join(format!("{label}.pdf"));
    std::fs::write(&path, pdf_bytes(label, pages)).unwrap();
    path
}

/// Sorted file names in `dir`.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
