use crate::config::Settings;
use crate::event::{EventSink, RunStream, EVENT_CHANNEL_BOUND};
use crate::orchestration::error::WorkflowError;
use crate::orchestration::refinement::RefinementLoop;
use crate::orchestration::role_unit::{LlmRoleUnit, RoleUnit};
use crate::orchestration::sequence::{PipelineStage, RoleStage, SequentialStage};
use crate::orchestration::RunContext;
use crate::provider::GeminiClient;
use crate::roles::{
    article_generator_role, critic_role, formatter_role, revisor_role, searcher_role,
    tone_checker_role,
};
use crate::session::{SessionState, CRITIC_CHECK_KEY, RESEARCH_RESULTS_KEY};
use crate::shared::ids::generate_run_id;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

/// Coordinator phases, in declared order. Every transition is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Init,
    Researching,
    ResearchCheck,
    Generating,
    CriticCheck,
    Regenerating,
    Done,
    Terminated,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunPhase::Init => write!(f, "init"),
            RunPhase::Researching => write!(f, "researching"),
            RunPhase::ResearchCheck => write!(f, "research_check"),
            RunPhase::Generating => write!(f, "generating"),
            RunPhase::CriticCheck => write!(f, "critic_check"),
            RunPhase::Regenerating => write!(f, "regenerating"),
            RunPhase::Done => write!(f, "done"),
            RunPhase::Terminated => write!(f, "terminated"),
        }
    }
}

/// Closed classification of the critic's session value.
///
/// The critic's contract is to write exactly `negative` when the article is
/// not ready. Anything else, including absent, null, or free-text feedback,
/// counts as approval; that misclassification risk is inherited from the
/// instruction-driven critic and is documented rather than raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticVerdict {
    Approved,
    NeedsRevision,
}

impl CriticVerdict {
    pub fn classify(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) if text == "negative" => CriticVerdict::NeedsRevision,
            _ => CriticVerdict::Approved,
        }
    }
}

/// Top-level workflow coordinator.
///
/// Holds the six immutable role units and the main pipeline; `stream` starts
/// one run per call on its own thread. Runs share nothing but these
/// read-only roles, so any number may execute concurrently.
#[derive(Clone)]
pub struct Coordinator {
    settings: Settings,
    searcher: Arc<dyn RoleUnit>,
    critic: Arc<dyn RoleUnit>,
    pipeline: Arc<SequentialStage>,
}

impl Coordinator {
    /// Builds the reference configuration: six Gemini-backed roles sharing
    /// one client.
    pub fn from_settings(settings: Settings) -> Result<Self, WorkflowError> {
        settings.validate()?;
        let client = Arc::new(
            GeminiClient::from_settings(&settings).map_err(WorkflowError::ProviderSetup)?,
        );
        let llm_role =
            |descriptor| Arc::new(LlmRoleUnit::new(descriptor, client.clone())) as Arc<dyn RoleUnit>;
        Ok(Self::from_roles(
            settings,
            llm_role(searcher_role()),
            llm_role(article_generator_role()),
            llm_role(tone_checker_role()),
            llm_role(revisor_role()),
            llm_role(critic_role()),
            llm_role(formatter_role()),
        ))
    }

    /// Wires arbitrary role units into the fixed workflow shape. This is the
    /// seam tests use to substitute scripted roles.
    #[allow(clippy::too_many_arguments)]
    pub fn from_roles(
        settings: Settings,
        searcher: Arc<dyn RoleUnit>,
        article_generator: Arc<dyn RoleUnit>,
        tone_checker: Arc<dyn RoleUnit>,
        revisor: Arc<dyn RoleUnit>,
        critic: Arc<dyn RoleUnit>,
        formatter: Arc<dyn RoleUnit>,
    ) -> Self {
        let refinement = RefinementLoop::new(
            vec![article_generator, tone_checker, revisor, critic.clone()],
            settings.max_refinement_passes,
        );
        let pipeline = SequentialStage::new(
            "article_pipeline",
            vec![Box::new(refinement), Box::new(RoleStage::new(formatter))],
        );
        Self {
            settings,
            searcher,
            critic,
            pipeline: Arc::new(pipeline),
        }
    }

    /// Starts one workflow run for `topic` and returns its lazy event
    /// stream. The run executes on its own thread; dropping the stream
    /// abandons it at its next event.
    pub fn stream(&self, topic: &str) -> Result<RunStream, WorkflowError> {
        let now = chrono::Utc::now().timestamp();
        let run_id = generate_run_id(now).map_err(WorkflowError::RunId)?;
        let run = RunContext::new(run_id.clone(), self.settings.state_root.clone());
        let mut session = SessionState::for_topic(topic);
        let (sender, receiver) = mpsc::sync_channel(EVENT_CHANNEL_BOUND);
        let sink = EventSink::new(sender);

        let coordinator = self.clone();
        let worker = thread::spawn(move || {
            match coordinator.execute(&run, &mut session, &sink) {
                Ok(()) => {}
                Err(WorkflowError::StreamClosed(_)) => {
                    run.log("warn", "run", "consumer dropped the stream; run abandoned");
                }
                Err(err) => {
                    run.log("error", "run", &format!("run aborted: {err}"));
                }
            }
        });

        Ok(RunStream::new(run_id, receiver, worker))
    }

    /// Drives one run to termination against the given session. Exposed so
    /// embedders and tests can run synchronously with their own sink.
    pub fn execute(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        self.enter(run, RunPhase::Init, RunPhase::Researching);
        self.searcher.invoke(run, session, sink)?;

        self.enter(run, RunPhase::Researching, RunPhase::ResearchCheck);
        if !session.has_usable_value(RESEARCH_RESULTS_KEY) {
            run.log("error", "research_check", "research produced no usable results; aborting run");
            self.enter(run, RunPhase::ResearchCheck, RunPhase::Terminated);
            return Ok(());
        }
        run.log("info", "research_check", "research succeeded");

        self.enter(run, RunPhase::ResearchCheck, RunPhase::Generating);
        self.pipeline.run(run, session, sink)?;

        self.enter(run, RunPhase::Generating, RunPhase::CriticCheck);
        match CriticVerdict::classify(session.get(CRITIC_CHECK_KEY)) {
            CriticVerdict::NeedsRevision => {
                self.enter(run, RunPhase::CriticCheck, RunPhase::Regenerating);
                self.critic.invoke(run, session, sink)?;
                self.enter(run, RunPhase::Regenerating, RunPhase::Done);
            }
            CriticVerdict::Approved => {
                run.log("info", "critic_check", "article approved; keeping current article");
                self.enter(run, RunPhase::CriticCheck, RunPhase::Done);
            }
        }

        run.log("info", "run", "workflow finished");
        self.enter(run, RunPhase::Done, RunPhase::Terminated);
        Ok(())
    }

    fn enter(&self, run: &RunContext, from: RunPhase, to: RunPhase) {
        run.log("info", "phase_transition", &format!("phase {from} -> {to}"));
    }
}
