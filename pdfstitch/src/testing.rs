//! In-memory PDF fixtures shared by unit tests.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use crate::document::UploadedDocument;

/// Build a document with `pages` pages whose content shows `<label>-<n>`.
///
/// `Resources` sit on the root `Pages` node and are inherited by every page.
pub fn sample_document(label: &str, pages: usize) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages);
    for n in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("{label}-{n}"))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Serialize a fixture document.
pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture serializes");
    buffer
}

/// Build a PDF with `pages` pages whose content shows `<label>-<n>`.
pub fn sample_pdf(label: &str, pages: usize) -> Vec<u8> {
    to_bytes(sample_document(label, pages))
}

/// Build a PDF with a standard security handler whose keys match no
/// password.
pub fn encrypted_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = sample_document(label, pages);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 2,
        "R" => 3,
        "Length" => 128,
        "P" => -3904,
        "O" => Object::string_literal(vec![0x4f_u8; 32]),
        "U" => Object::string_literal(vec![0x55_u8; 32]),
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![0x01_u8; 16]),
            Object::string_literal(vec![0x01_u8; 16]),
        ],
    );
    to_bytes(doc)
}

/// Root `Pages` node of a fixture document.
pub fn root_pages_mut(doc: &mut Document) -> &mut lopdf::Dictionary {
    let pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .expect("fixture has a page tree");
    doc.get_dictionary_mut(pages_id).expect("pages node")
}

/// Upload named `<label>.pdf` with `pages` pages.
pub fn sample_upload(label: &str, pages: usize) -> UploadedDocument {
    UploadedDocument::new(format!("{label}.pdf"), sample_pdf(label, pages))
}

/// Read back the `<label>-<n>` marker of every page, in page order.
pub fn page_labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).expect("page has content");
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').expect("marker start") + 1;
            let end = text[start..].find(')').expect("marker end") + start;
            text[start..end].to_string()
        })
        .collect()
}

/// Entry names and contents of a zip archive, in archive order.
pub fn archive_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).expect("valid archive");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).expect("archive entry");
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents).expect("entry reads");
            (entry.name().to_string(), contents)
        })
        .collect()
}
