#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfstitch::merge::{Merger, OrderSpecification};
use pdfstitch::{StitchError, UploadedDocument};

fuzz_target!(|data: &[u8]| {
    let (first, second) = data.split_at(data.len() / 2);
    let documents = vec![
        UploadedDocument::new("a.pdf", first),
        UploadedDocument::new("b.pdf", second),
    ];
    let order = OrderSpecification::new(["b.pdf", "a.pdf"]);

    // Arbitrary bytes must never panic; a successful merge is a PDF.
    match Merger::new().merge(&documents, &order) {
        Ok(merged) => assert!(merged.bytes().starts_with(b"%PDF")),
        Err(
            StitchError::MalformedInput { .. }
            | StitchError::EncryptedInput { .. }
            | StitchError::MergeFailed { .. },
        ) => {}
        Err(other) => panic!("unexpected error: {other:?}"),
    }
});
