//! Collaborators shared by every structuring run.

use std::fmt;
use std::sync::Arc;

use super::sentence::{RuleSentenceDetector, SentenceDetector};
use crate::email::{DefaultNameVariants, NameVariantGenerator};
use crate::error::{Error, Result};

/// External services used by the pipeline.
///
/// The context is read-only during processing and can be shared across
/// threads when processing a batch.
#[derive(Clone)]
pub struct ProcessingContext {
    sentence_detector: Option<Arc<dyn SentenceDetector>>,
    name_variants: Option<Arc<dyn NameVariantGenerator>>,
}

impl ProcessingContext {
    /// Context with the built-in detector and name variant generator.
    pub fn new() -> Self {
        Self {
            sentence_detector: Some(Arc::new(RuleSentenceDetector::new())),
            name_variants: Some(Arc::new(DefaultNameVariants)),
        }
    }

    /// Context without any collaborator.
    pub fn empty() -> Self {
        Self {
            sentence_detector: None,
            name_variants: None,
        }
    }

    /// Use a custom sentence detector.
    pub fn with_sentence_detector(mut self, detector: Arc<dyn SentenceDetector>) -> Self {
        self.sentence_detector = Some(detector);
        self
    }

    /// Use a custom name variant generator.
    pub fn with_name_variants(mut self, generator: Arc<dyn NameVariantGenerator>) -> Self {
        self.name_variants = Some(generator);
        self
    }

    /// The sentence detector, required when segmentation is requested.
    pub fn sentence_detector(&self) -> Result<&dyn SentenceDetector> {
        self.sentence_detector
            .as_deref()
            .ok_or_else(|| Error::MissingResource("sentence detector".to_string()))
    }

    /// The name variant generator, required to assign emails.
    pub fn name_variants(&self) -> Result<&dyn NameVariantGenerator> {
        self.name_variants
            .as_deref()
            .ok_or_else(|| Error::MissingResource("name variant generator".to_string()))
    }
}

impl Default for ProcessingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ProcessingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessingContext")
            .field("sentence_detector", &self.sentence_detector.is_some())
            .field("name_variants", &self.name_variants.is_some())
            .finish()
    }
}
