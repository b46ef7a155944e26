use crate::event::EventSink;
use crate::orchestration::error::WorkflowError;
use crate::orchestration::role_unit::RoleUnit;
use crate::orchestration::RunContext;
use crate::session::SessionState;
use std::sync::Arc;

/// A unit of the linear pipeline. Stages run strictly one after another;
/// data flows between them only through the session state.
pub trait PipelineStage: Send + Sync {
    fn name(&self) -> &str;

    fn run(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError>;
}

/// Adapts a single role unit into a pipeline stage.
pub struct RoleStage {
    role: Arc<dyn RoleUnit>,
}

impl RoleStage {
    pub fn new(role: Arc<dyn RoleUnit>) -> Self {
        Self { role }
    }
}

impl PipelineStage for RoleStage {
    fn name(&self) -> &str {
        self.role.descriptor().id.as_str()
    }

    fn run(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        self.role.invoke(run, session, sink)
    }
}

/// Runs an ordered list of stages to completion, each before the next.
pub struct SequentialStage {
    name: String,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl SequentialStage {
    pub fn new(name: &str, stages: Vec<Box<dyn PipelineStage>>) -> Self {
        Self {
            name: name.to_string(),
            stages,
        }
    }
}

impl PipelineStage for SequentialStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        for stage in &self.stages {
            run.log(
                "info",
                "pipeline",
                &format!("pipeline `{}` entering stage `{}`", self.name, stage.name()),
            );
            stage.run(run, session, sink)?;
        }
        Ok(())
    }
}
