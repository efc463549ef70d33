pub mod code_engine;
pub mod pipeline;
pub mod presence;

pub use code_engine::{CodeEngine, CodeEngineConfig, CodeEngineError, CurrentCode, Validation};
pub use pipeline::{RejectKind, SubmissionPipeline, SubmitOutcome};
pub use presence::PresenceBus;
