//! Pipeline orchestration: acquisition, classification, identification,
//! duplicate annotation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn, Level};

use canonical::{DocumentIdBuilder, DocumentKind};
use evidence::TextEvidence;
use extract::{Classifier, ExtractionResult};
use universal::{FeatureComparison, FileFeatures, PdfInspector, UniversalExtractor};

use crate::config::{ConfigError, PipelineConfig};
use crate::error::PipelineError;
use crate::ocr::TextRecognizer;

/// Extensions routed through the OCR collaborator.
const OCR_EXTENSIONS: [&str; 6] = ["pdf", "png", "jpg", "jpeg", "bmp", "tiff"];
/// Extensions read directly as UTF-8 text.
const TEXT_EXTENSIONS: [&str; 4] = ["xml", "html", "htm", "txt"];

/// Full result of processing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    /// The business identifier, e.g. `DOC-FV-A7B3C9D2E1F04856`.
    pub document_id: String,
    /// Kind the identifier was issued under.
    pub kind: DocumentKind,
    /// The canonical string whose hash is the identifier's last segment.
    pub canonical_string: String,
    /// The fields the identifier was built from.
    pub extraction: ExtractionResult,
    /// The evidence the fields were extracted from.
    pub evidence: TextEvidence,
    /// Mean recognition confidence carried through from acquisition.
    pub ocr_confidence: f32,
    /// The file this document came from.
    pub source_file: String,
    /// Wall-clock processing time. Not part of any identifier.
    pub processed_at: DateTime<Utc>,
    /// Whether the canonical string was already seen by this pipeline.
    pub is_duplicate: bool,
    /// Identifier of the first occurrence, when `is_duplicate`.
    pub duplicate_of: Option<String>,
}

/// Per-file outcome of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub path: PathBuf,
    pub result: Result<ProcessedDocument, PipelineError>,
}

/// The document-identification pipeline.
///
/// One instance holds the classifier, the identifier builder, and the
/// advisory duplicate cache. The core stages are pure; the cache is the
/// only mutable state and is serialized behind a mutex, so a pipeline can
/// be shared across threads.
pub struct Pipeline {
    recognizer: Box<dyn TextRecognizer>,
    classifier: Classifier,
    builder: DocumentIdBuilder,
    universal: UniversalExtractor,
    seen: Mutex<HashMap<String, String>>,
}

impl Pipeline {
    /// Build a pipeline from a validated configuration and an OCR
    /// collaborator.
    pub fn new(
        config: PipelineConfig,
        recognizer: Box<dyn TextRecognizer>,
    ) -> Result<Pipeline, ConfigError> {
        config.validate()?;
        Ok(Pipeline {
            recognizer,
            classifier: Classifier::default(),
            builder: DocumentIdBuilder::new(config.id_prefix),
            universal: UniversalExtractor::new(config.universal_prefix),
            seen: Mutex::new(HashMap::new()),
        })
    }

    /// Attach a PDF collaborator for universal feature extraction.
    pub fn with_pdf_inspector(mut self, inspector: Box<dyn PdfInspector>) -> Pipeline {
        self.universal = self.universal.with_pdf_inspector(inspector);
        self
    }

    /// Process a file into an identified document.
    pub fn process(&self, path: &Path) -> Result<ProcessedDocument, PipelineError> {
        self.process_as(path, None)
    }

    /// Process a file, optionally overriding the classified kind.
    ///
    /// The override changes which canonical recipe is applied; extraction
    /// itself still runs the classifier so the recovered fields are the
    /// best available.
    pub fn process_as(
        &self,
        path: &Path,
        force_kind: Option<DocumentKind>,
    ) -> Result<ProcessedDocument, PipelineError> {
        let start = Instant::now();
        let span = tracing::span!(Level::INFO, "pipeline.process", path = %path.display());
        let _guard = span.enter();

        let evidence = self.acquire(path)?;
        let extraction = self.classifier.classify(&evidence);
        let kind = force_kind.unwrap_or_else(|| extraction.category.kind());
        let (document_id, canonical_string) = self.identify(kind, &extraction, &evidence);

        // Advisory duplicate annotation; never alters the identifier.
        let (is_duplicate, duplicate_of) = self.note_seen(&canonical_string, &document_id);
        if let Some(original) = &duplicate_of {
            warn!(id = %document_id, duplicate_of = %original, "duplicate_detected");
        }

        let elapsed_ms = start.elapsed().as_millis();
        info!(
            id = %document_id,
            kind = %kind,
            confidence = evidence.average_confidence,
            is_duplicate,
            elapsed_ms,
            "document_processed"
        );

        Ok(ProcessedDocument {
            document_id,
            kind,
            canonical_string,
            ocr_confidence: evidence.average_confidence,
            extraction,
            evidence,
            source_file: path.display().to_string(),
            processed_at: Utc::now(),
            is_duplicate,
            duplicate_of,
        })
    }

    /// Process a file and compare its identifier to an expected one.
    pub fn verify(&self, path: &Path, expected_id: &str) -> Result<bool, PipelineError> {
        let processed = self.process(path)?;
        Ok(processed.document_id == expected_id)
    }

    /// The canonical string a file resolves to. Diagnostic helper.
    pub fn canonical_string(&self, path: &Path) -> Result<String, PipelineError> {
        Ok(self.process(path)?.canonical_string)
    }

    /// Process many files, continuing past individual failures.
    ///
    /// With `skip_duplicates`, documents whose canonical string was already
    /// seen are dropped from the outcomes entirely; failures are always
    /// reported and never touch the duplicate cache.
    pub fn process_batch(
        &self,
        paths: &[PathBuf],
        skip_duplicates: bool,
    ) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            let result = self.process(path);
            match &result {
                Ok(processed) if skip_duplicates && processed.is_duplicate => {
                    info!(path = %path.display(), "skipping_duplicate");
                    continue;
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "batch_item_failed");
                }
                Ok(_) => {}
            }
            outcomes.push(BatchOutcome {
                path: path.clone(),
                result,
            });
        }
        outcomes
    }

    /// The universal (format-sensitive) identifier for a file.
    ///
    /// Unlike [`Pipeline::process`], this hashes raw file features, so two
    /// renderings of the same document get different universal identifiers.
    pub fn universal_id(&self, path: &Path) -> Result<String, PipelineError> {
        Ok(self.universal.generate_id(path)?)
    }

    /// The raw feature record behind the universal identifier.
    pub fn universal_features(&self, path: &Path) -> Result<FileFeatures, PipelineError> {
        Ok(self.universal.features(path)?)
    }

    /// Compare two files feature by feature.
    pub fn compare_files(
        &self,
        a: &Path,
        b: &Path,
    ) -> Result<FeatureComparison, PipelineError> {
        Ok(self.universal.compare(a, b)?)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Route the file to its acquisition path by extension.
    fn acquire(&self, path: &Path) -> Result<TextEvidence, PipelineError> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if OCR_EXTENSIONS.contains(&extension.as_str()) {
            let pages = self.recognizer.recognize(path)?;
            return TextEvidence::merge_pages(pages)
                .ok_or_else(|| PipelineError::EmptyDocument(path.display().to_string()));
        }

        if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            let bytes = fs::read(path).map_err(|source| PipelineError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes).into_owned();
            return Ok(TextEvidence::scan(content, 1.0).with_source(path.display().to_string()));
        }

        Err(PipelineError::UnsupportedFormat(extension))
    }

    /// Apply the kind's canonical recipe to the extracted fields.
    ///
    /// Kinds without a dedicated extractor fall through to the generic
    /// recipe seeded by the full-text hash — intentionally less stable than
    /// the typed recipes, since OCR noise leaks into it.
    fn identify(
        &self,
        kind: DocumentKind,
        extraction: &ExtractionResult,
        evidence: &TextEvidence,
    ) -> (String, String) {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        let canonical = match kind {
            DocumentKind::Invoice => self.builder.invoice_canonical(
                &field(&extraction.issuer_tax_id),
                &field(&extraction.invoice_number),
                &field(&extraction.document_date),
                extraction.gross_amount.as_deref().unwrap_or("0"),
            ),
            DocumentKind::Receipt => self.builder.receipt_canonical(
                &field(&extraction.issuer_tax_id),
                &field(&extraction.document_date),
                extraction.gross_amount.as_deref().unwrap_or("0"),
                extraction.receipt_number.as_deref(),
                extraction.cash_register_number.as_deref(),
            ),
            DocumentKind::Contract => self.builder.contract_canonical(
                &field(&extraction.issuer_tax_id),
                &field(&extraction.second_party_tax_id),
                &field(&extraction.document_date),
                extraction.contract_number.as_deref(),
                extraction.contract_type.as_deref(),
            ),
            _ => {
                let digest = Sha256::digest(evidence.full_text.as_bytes());
                let content_hash = hex::encode(digest);
                self.builder.generic_canonical(
                    &content_hash,
                    extraction.document_date.as_deref(),
                    extraction.issuer_tax_id.as_deref(),
                )
            }
        };

        let id = self.builder.issue(kind, &canonical);
        (id.into_string(), canonical)
    }

    /// Record the canonical string; returns the duplicate annotation.
    fn note_seen(&self, canonical: &str, id: &str) -> (bool, Option<String>) {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        match seen.get(canonical) {
            Some(original) => (true, Some(original.clone())),
            None => {
                seen.insert(canonical.to_string(), id.to_string());
                (false, None)
            }
        }
    }
}
