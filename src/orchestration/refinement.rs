use crate::event::EventSink;
use crate::orchestration::error::WorkflowError;
use crate::orchestration::role_unit::RoleUnit;
use crate::orchestration::sequence::PipelineStage;
use crate::orchestration::RunContext;
use crate::session::SessionState;
use std::sync::Arc;

/// Bounded, fixed-order refinement: generator, tone checker, revisor, critic,
/// applied for exactly `max_passes` full passes.
///
/// There is no content-based early exit; the pass cap is the sole
/// termination guarantee, which also bounds model spend. Each pass
/// overwrites the four output keys from the previous pass.
pub struct RefinementLoop {
    roles: Vec<Arc<dyn RoleUnit>>,
    max_passes: u32,
}

impl RefinementLoop {
    pub fn new(roles: Vec<Arc<dyn RoleUnit>>, max_passes: u32) -> Self {
        Self { roles, max_passes }
    }

    pub fn max_passes(&self) -> u32 {
        self.max_passes
    }

    pub fn run(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        for pass in 1..=self.max_passes {
            run.log(
                "info",
                "refinement",
                &format!("refinement pass {pass}/{}", self.max_passes),
            );
            for role in &self.roles {
                role.invoke(run, session, sink)?;
            }
        }
        Ok(())
    }
}

impl PipelineStage for RefinementLoop {
    fn name(&self) -> &str {
        "refinement_loop"
    }

    fn run(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        RefinementLoop::run(self, run, session, sink)
    }
}
