//! textlens-view
//!
//! One entry point for the rendering surface: highlighted fields for each
//! document of a result set, and the word cloud over the whole set.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use textlens_cloud::{AggregateOutcome, FrequencyAggregator};
use textlens_core::config::{AppSettings, ViewSettings};
use textlens_core::data_processor::DataProcessor;
use textlens_core::traits::BatchTokenizer;
use textlens_core::types::{Annotation, AnnotationIndex, Document, Segment};
use textlens_highlight::resolve_field;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub name: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    /// Value of the configured id field, if the document has one.
    pub id: Option<String>,
    pub fields: Vec<RenderedField>,
}

impl RenderedDocument {
    pub fn field(&self, name: &str) -> Option<&RenderedField> { self.fields.iter().find(|f| f.name == name) }
}

pub struct ResultSetAnalyzer {
    view: ViewSettings,
    processor: DataProcessor,
    aggregator: FrequencyAggregator,
    tokenizer: Arc<dyn BatchTokenizer>,
}

impl ResultSetAnalyzer {
    pub fn new(settings: &AppSettings, tokenizer: Arc<dyn BatchTokenizer>) -> Self {
        Self {
            view: settings.view.clone(),
            processor: DataProcessor::with_config(settings.cloud.preparation()),
            aggregator: FrequencyAggregator::new(settings.cloud.clone()),
            tokenizer,
        }
    }

    /// Field the annotations of this result set refer to: the configured one,
    /// else the detected content column.
    pub fn annotated_field(&self, documents: &[Document]) -> Option<String> {
        self.view.annotated_field.clone().or_else(|| self.processor.detect_content_column(documents))
    }

    /// Render every field of every document. Fields are sorted by name;
    /// search terms skip temporal fields.
    pub fn render_documents<S: AsRef<str>>(
        &self,
        documents: &[Document],
        annotations: &AnnotationIndex,
        terms: &[S],
    ) -> Vec<RenderedDocument> {
        let annotated = self.annotated_field(documents);
        debug!("Rendering {} documents, annotations on {:?}", documents.len(), annotated);
        documents.iter().map(|doc| self.render_document(doc, annotated.as_deref(), annotations, terms)).collect()
    }

    pub fn render_document<S: AsRef<str>>(
        &self,
        doc: &Document,
        annotated_field: Option<&str>,
        annotations: &AnnotationIndex,
        terms: &[S],
    ) -> RenderedDocument {
        let id = doc.get(&self.view.id_field).filter(|v| !v.is_null()).map(|v| v.as_text());
        let doc_annotations: &[Annotation] =
            id.as_ref().and_then(|id| annotations.get(id)).map(Vec::as_slice).unwrap_or_default();

        let mut names: Vec<&String> = doc.keys().collect();
        names.sort();
        let fields = names
            .into_iter()
            .map(|name| {
                let text = doc[name].as_text();
                let anns: &[Annotation] = if Some(name.as_str()) == annotated_field { doc_annotations } else { &[] };
                RenderedField { name: name.clone(), segments: resolve_field(name, &text, anns, terms) }
            })
            .collect();
        RenderedDocument { id, fields }
    }

    /// Word cloud over the whole result set. See [`FrequencyAggregator::aggregate`].
    pub async fn word_cloud<F>(&self, documents: &[Document], progress: F) -> AggregateOutcome
    where
        F: FnMut(u8) + Send,
    {
        self.aggregator.aggregate(documents, self.tokenizer.as_ref(), progress).await
    }

    pub fn tokenizer_name(&self) -> &str { self.tokenizer.name() }
}
