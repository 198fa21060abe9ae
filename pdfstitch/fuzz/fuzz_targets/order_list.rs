#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfstitch::UploadedDocument;
use pdfstitch::merge::OrderSpecification;

fuzz_target!(|data: &[u8]| {
    let list = String::from_utf8_lossy(data);
    let order = OrderSpecification::parse_list(&list);

    let documents: Vec<UploadedDocument> = ["a.pdf", "b.pdf", "c.pdf"]
        .into_iter()
        .map(|name| UploadedDocument::new(name, Vec::new()))
        .collect();

    // A resolved order is always a permutation of the uploads.
    if let Ok(sequence) = order.resolve(&documents) {
        let mut sorted = sequence.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }
});
