pub mod collector;
pub mod error;
pub mod record;
pub mod store;

pub use collector::{collect_and_save, spawn_collector};
pub use error::StoreError;
pub use record::AnalysisRecord;
pub use store::{AnalysisStore, JsonlStore, MemoryStore};
