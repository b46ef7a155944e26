use crate::event::{Event, EventSink};
use crate::orchestration::error::WorkflowError;
use crate::orchestration::RunContext;
use crate::provider::{GeminiClient, GenerateRequest};
use crate::roles::{RoleDescriptor, RoleTool};
use crate::session::SessionState;
use serde_json::Value;
use std::sync::Arc;

/// One configured task executor.
///
/// Contract: by the time `invoke` returns `Ok`, the descriptor's output key
/// has been written to the session, or deliberately left unset on a soft
/// failure. Events emitted through the sink are relayed to the run's
/// consumer unmodified. The only hard error a role unit may surface is a
/// closed event stream.
pub trait RoleUnit: Send + Sync {
    fn descriptor(&self) -> &RoleDescriptor;

    fn invoke(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError>;
}

/// Provider-backed role unit: renders the session into a user turn, sends it
/// with the role's instruction, writes the reply under the output key, and
/// emits one content event.
pub struct LlmRoleUnit {
    descriptor: RoleDescriptor,
    client: Arc<GeminiClient>,
}

impl LlmRoleUnit {
    pub fn new(descriptor: RoleDescriptor, client: Arc<GeminiClient>) -> Self {
        Self { descriptor, client }
    }
}

impl RoleUnit for LlmRoleUnit {
    fn descriptor(&self) -> &RoleDescriptor {
        &self.descriptor
    }

    fn invoke(
        &self,
        run: &RunContext,
        session: &mut SessionState,
        sink: &EventSink,
    ) -> Result<(), WorkflowError> {
        let request = GenerateRequest {
            system_instruction: self.descriptor.instruction.clone(),
            user_content: render_session_context(session),
            enable_web_search: self.descriptor.tools.contains(&RoleTool::WebSearch),
        };

        // Provider failures are soft: log and leave the output key unset.
        let result = match self.client.generate(&request) {
            Ok(result) => result,
            Err(err) => {
                run.log(
                    "error",
                    "provider_call",
                    &format!(
                        "role `{}` provider call failed, leaving `{}` unset: {err}",
                        self.descriptor.id, self.descriptor.output_key
                    ),
                );
                return Ok(());
            }
        };

        session.set(
            &self.descriptor.output_key,
            Value::String(result.text.clone()),
        );
        sink.emit(Event::new(&run.run_id, &self.descriptor.id, &result.text))?;
        Ok(())
    }
}

/// Renders the session as a `key: value` block. Instructions address keys by
/// name, so every key currently present is surfaced.
fn render_session_context(session: &SessionState) -> String {
    let mut lines = vec!["Session state:".to_string()];
    for key in session.keys() {
        let rendered = match session.get(key) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => continue,
        };
        lines.push(format!("{key}: {rendered}"));
    }
    lines.join("\n")
}
