pub mod client;
pub mod driver;
pub mod session;
pub mod tee;

pub use client::{AnalyzeClient, AnalyzeResponse, ClientError, MAX_UPLOAD_BYTES};
pub use driver::{AnalysisObserver, run_analysis};
pub use session::run_with_persistence;
pub use tee::tee;
