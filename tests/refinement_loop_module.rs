use postforge::event::{self, EventSink};
use postforge::orchestration::role_unit::RoleUnit;
use postforge::orchestration::{RefinementLoop, RunContext, WorkflowError};
use postforge::roles::{
    article_generator_role, critic_role, revisor_role, tone_checker_role, RoleDescriptor,
};
use postforge::session::{
    SessionState, CRITIC_CHECK_KEY, CURRENT_ARTICLE_KEY, REVISED_KEY, TONE_CHECKED_KEY,
};
use postforge::shared::ids::RunId;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Writes `<output_key> pass <n>` so each pass's overwrite is observable.
struct CountingRole {
    descriptor: RoleDescriptor,
    invocations: Arc<AtomicU32>,
}

impl CountingRole {
    fn new(descriptor: RoleDescriptor) -> (Arc<Self>, Arc<AtomicU32>) {
        let invocations = Arc::new(AtomicU32::new(0));
        let role = Arc::new(Self {
            descriptor,
            invocations: invocations.clone(),
        });
        (role, invocations)
    }
}

impl RoleUnit for CountingRole {
    fn descriptor(&self) -> &RoleDescriptor {
        &self.descriptor
    }

    fn invoke(
        &self,
        _run: &RunContext,
        session: &mut SessionState,
        _sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        let pass = self.invocations.fetch_add(1, Ordering::SeqCst) + 1;
        session.set(
            &self.descriptor.output_key,
            Value::String(format!("{} pass {pass}", self.descriptor.output_key)),
        );
        Ok(())
    }
}

fn run_context() -> RunContext {
    RunContext::new(
        RunId::parse("run-test-loop").expect("run id"),
        std::env::temp_dir().join("postforge-refinement-tests"),
    )
}

#[test]
fn loop_runs_exactly_the_configured_passes_in_order() {
    let (generator, generator_calls) = CountingRole::new(article_generator_role());
    let (tone_checker, tone_calls) = CountingRole::new(tone_checker_role());
    let (revisor, revisor_calls) = CountingRole::new(revisor_role());
    let (critic, critic_calls) = CountingRole::new(critic_role());
    let refinement = RefinementLoop::new(vec![generator, tone_checker, revisor, critic], 5);

    let mut session = SessionState::for_topic("t");
    let (sink, _receiver) = event::channel(64);
    refinement
        .run(&run_context(), &mut session, &sink)
        .expect("refinement");

    assert_eq!(generator_calls.load(Ordering::SeqCst), 5);
    assert_eq!(tone_calls.load(Ordering::SeqCst), 5);
    assert_eq!(revisor_calls.load(Ordering::SeqCst), 5);
    assert_eq!(critic_calls.load(Ordering::SeqCst), 5);
}

#[test]
fn each_pass_overwrites_the_previous_values() {
    let (generator, _) = CountingRole::new(article_generator_role());
    let (tone_checker, _) = CountingRole::new(tone_checker_role());
    let (revisor, _) = CountingRole::new(revisor_role());
    let (critic, _) = CountingRole::new(critic_role());
    let refinement = RefinementLoop::new(vec![generator, tone_checker, revisor, critic], 3);

    let mut session = SessionState::for_topic("t");
    let (sink, _receiver) = event::channel(64);
    refinement
        .run(&run_context(), &mut session, &sink)
        .expect("refinement");

    for key in [CURRENT_ARTICLE_KEY, TONE_CHECKED_KEY, REVISED_KEY, CRITIC_CHECK_KEY] {
        assert_eq!(
            session.get_text(key),
            Some(format!("{key} pass 3").as_str()),
            "last writer wins for {key}"
        );
    }
}

#[test]
fn loop_has_no_content_based_early_exit() {
    // A critic that declares the article perfect on pass one.
    struct ApprovingCritic {
        descriptor: RoleDescriptor,
        invocations: Arc<AtomicU32>,
    }
    impl RoleUnit for ApprovingCritic {
        fn descriptor(&self) -> &RoleDescriptor {
            &self.descriptor
        }
        fn invoke(
            &self,
            _run: &RunContext,
            session: &mut SessionState,
            _sink: &EventSink,
        ) -> Result<(), WorkflowError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            session.set(CRITIC_CHECK_KEY, json!("perfect, ship it"));
            Ok(())
        }
    }

    let invocations = Arc::new(AtomicU32::new(0));
    let critic = Arc::new(ApprovingCritic {
        descriptor: critic_role(),
        invocations: invocations.clone(),
    });
    let refinement = RefinementLoop::new(vec![critic], 5);

    let mut session = SessionState::for_topic("t");
    let (sink, _receiver) = event::channel(64);
    refinement
        .run(&run_context(), &mut session, &sink)
        .expect("refinement");

    assert_eq!(invocations.load(Ordering::SeqCst), 5);
}
