pub mod coordinator;
pub mod error;
pub mod refinement;
pub mod role_unit;
pub mod sequence;

pub use coordinator::{Coordinator, CriticVerdict, RunPhase};
pub use error::WorkflowError;
pub use refinement::RefinementLoop;
pub use role_unit::{LlmRoleUnit, RoleUnit};
pub use sequence::{PipelineStage, SequentialStage};

use crate::shared::ids::RunId;
use crate::shared::logging::append_run_log_line;
use std::path::PathBuf;

/// Per-run context handed to every stage: the run identity plus where the
/// run's diagnostics log lives. Session state travels separately so stages
/// can borrow it mutably.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: RunId,
    pub state_root: PathBuf,
}

impl RunContext {
    pub fn new(run_id: RunId, state_root: PathBuf) -> Self {
        Self { run_id, state_root }
    }

    pub fn log(&self, level: &str, event: &str, message: &str) {
        append_run_log_line(&self.state_root, level, event, self.run_id.as_str(), message);
    }
}
