use std::io::Write;
use std::path::{Path, PathBuf};

use dokid::{
    DocumentCategory, DocumentKind, Pipeline, PipelineConfig, TextEvidence, TextRecognizer,
};

struct NoOcr;

impl TextRecognizer for NoOcr {
    fn recognize(&self, _path: &Path) -> Result<Vec<TextEvidence>, dokid::OcrError> {
        Err(dokid::OcrError::Unavailable("text formats only".into()))
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(PipelineConfig::default(), Box::new(NoOcr)).expect("valid default config")
}

fn write_txt(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create test file");
    file.write_all(content.as_bytes()).expect("write test file");
    path
}

const INVOICE_TEXT: &str = "Faktura VAT nr FV/2025/00142\n\
                            Sprzedawca NIP: 5213017228\n\
                            Data wystawienia: 2025-01-15\n\
                            Brutto: 1230,50 zł\n";

#[test]
fn text_formats_carry_full_confidence() {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in ["f.txt", "f.xml", "f.html", "f.htm"] {
        let path = write_txt(dir.path(), name, INVOICE_TEXT);
        let processed = pipeline().process(&path).expect("processes");
        assert!((processed.ocr_confidence - 1.0).abs() < f32::EPSILON, "{name}");
        assert_eq!(processed.kind, DocumentKind::Invoice, "{name}");
    }
}

#[test]
fn invalid_utf8_is_read_lossily() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dirty.txt");
    let mut bytes = INVOICE_TEXT.as_bytes().to_vec();
    bytes.push(0xFF);
    bytes.push(0xFE);
    std::fs::File::create(&path)
        .expect("create")
        .write_all(&bytes)
        .expect("write");

    let processed = pipeline().process(&path).expect("lossy read still processes");
    assert_eq!(processed.kind, DocumentKind::Invoice);
}

#[test]
fn forced_kind_overrides_the_recipe_not_the_extraction() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_txt(dir.path(), "faktura.txt", INVOICE_TEXT);

    let p = pipeline();
    let forced = p
        .process_as(&path, Some(DocumentKind::Proforma))
        .expect("processes");

    assert_eq!(forced.kind, DocumentKind::Proforma);
    assert!(forced.document_id.starts_with("DOC-PRO-"));
    // Extraction still ran the classifier.
    assert_eq!(forced.extraction.category, DocumentCategory::Invoice);
    // Kinds without a typed recipe canonicalize through the full-text hash.
    let seed = forced.canonical_string.split('|').next().expect("first segment");
    assert_eq!(seed.len(), 64);
    assert!(seed.bytes().all(|b| b.is_ascii_hexdigit()));
}

#[test]
fn duplicate_annotation_keeps_the_identifier() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = write_txt(dir.path(), "a.txt", INVOICE_TEXT);
    let second = write_txt(dir.path(), "b.txt", INVOICE_TEXT);

    let p = pipeline();
    let original = p.process(&first).expect("first");
    let duplicate = p.process(&second).expect("second");

    assert!(!original.is_duplicate);
    assert!(duplicate.is_duplicate);
    assert_eq!(duplicate.document_id, original.document_id);
    assert_eq!(duplicate.duplicate_of.as_deref(), Some(original.document_id.as_str()));
}

#[test]
fn duplicate_cache_is_per_pipeline_instance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_txt(dir.path(), "a.txt", INVOICE_TEXT);

    assert!(!pipeline().process(&path).expect("fresh instance").is_duplicate);
    assert!(!pipeline().process(&path).expect("another fresh instance").is_duplicate);
}

#[test]
fn batch_reports_failures_and_can_skip_duplicates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = vec![
        write_txt(dir.path(), "a.txt", INVOICE_TEXT),
        write_txt(dir.path(), "b.txt", INVOICE_TEXT), // duplicate of a
        write_txt(dir.path(), "c.txt", "notatka bez żadnej struktury"),
        dir.path().join("missing.txt"),
    ];

    let outcomes = pipeline().process_batch(&paths, true);

    // The duplicate was skipped; everything else is reported.
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert_eq!(outcomes[1].path.file_name().and_then(|n| n.to_str()), Some("c.txt"));
    assert!(outcomes[1].result.is_ok());
    assert!(outcomes[2].result.is_err());
}

#[test]
fn batch_keeps_duplicates_when_asked() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = vec![
        write_txt(dir.path(), "a.txt", INVOICE_TEXT),
        write_txt(dir.path(), "b.txt", INVOICE_TEXT),
    ];

    let outcomes = pipeline().process_batch(&paths, false);
    assert_eq!(outcomes.len(), 2);
    let second = outcomes[1].result.as_ref().expect("second processes");
    assert!(second.is_duplicate);
}

#[test]
fn universal_identifier_is_file_sensitive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = write_txt(dir.path(), "a.txt", INVOICE_TEXT);
    let b = write_txt(dir.path(), "b.txt", &format!("{INVOICE_TEXT}\n"));

    let p = pipeline();
    // Same economic act, byte-different files: business ids agree...
    assert_eq!(
        p.process(&a).expect("a").document_id,
        p.process(&b).expect("b").document_id
    );
    // ...while the universal ids differ, by design.
    let universal_a = p.universal_id(&a).expect("universal a");
    let universal_b = p.universal_id(&b).expect("universal b");
    assert!(universal_a.starts_with("UNIV-TXT-"));
    assert_ne!(universal_a, universal_b);

    let comparison = p.compare_files(&a, &b).expect("comparison");
    assert!(!comparison.identical_ids);
    assert!(comparison.same_kind);
    assert!(!comparison.same_content_hash);
}

#[test]
fn classify_all_offers_ranked_diagnostics() {
    let text = "Faktura VAT, paragon fiskalny, kasa, suma: 10,00 zł, NIP 5213017228";
    let evidence = TextEvidence::scan(text, 0.9);
    let ranked = dokid::Classifier::default().classify_all(&evidence);
    assert!(ranked.len() >= 2);
    assert!(ranked[0].confidence >= ranked[1].confidence);
}
