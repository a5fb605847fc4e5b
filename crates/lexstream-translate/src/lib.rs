pub mod content;
pub mod markers;
pub mod service;

pub use content::{AnalysisTranslation, translate_analysis};
pub use markers::{TranslatedContent, TranslatedRisk, pack_for_translation, unpack_translated};
pub use service::{
    DictionaryStrategy, HttpTranslateStrategy, TranslateError, TranslateRequest, TranslateStrategy,
    Translation, Translator,
};
