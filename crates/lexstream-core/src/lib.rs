pub mod event;
pub mod ledger;
pub mod normalize;
pub mod sse;
pub mod types;

pub use event::{StreamEvent, classify};
pub use ledger::ProgressLedger;
pub use sse::{FrameDecoder, Utf8Chunker};
pub use types::{
    Analysis, AnalysisResult, DocumentInfo, ProgressStatus, ProgressUpdate, RiskItem, RiskLevel,
};
