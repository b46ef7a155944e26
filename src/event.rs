use crate::shared::ids::{RoleId, RunId};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::JoinHandle;

/// Bounded channel capacity between a run's worker thread and its consumer.
/// The bound is what makes production cooperative: the worker suspends on
/// `emit` until the consumer pulls the next event.
pub(crate) const EVENT_CHANNEL_BOUND: usize = 16;

/// Immutable progress record emitted by a role unit during its execution.
///
/// The coordinator relays events to the caller without inspecting their
/// contents; control decisions read session state instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub run_id: RunId,
    pub author: RoleId,
    pub content: String,
    pub timestamp: i64,
}

impl Event {
    pub fn new(run_id: &RunId, author: &RoleId, content: &str) -> Self {
        Self {
            run_id: run_id.clone(),
            author: author.clone(),
            content: content.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// The consumer hung up: the `RunStream` was dropped and the channel closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event stream closed by consumer")]
pub struct StreamClosed;

/// Producer half handed to role units. `emit` blocks while the channel is
/// full and fails once the consumer has dropped the stream, which is the
/// cancellation signal for the whole run.
#[derive(Debug, Clone)]
pub struct EventSink {
    sender: SyncSender<Event>,
}

impl EventSink {
    pub(crate) fn new(sender: SyncSender<Event>) -> Self {
        Self { sender }
    }

    pub fn emit(&self, event: Event) -> Result<(), StreamClosed> {
        self.sender.send(event).map_err(|_| StreamClosed)
    }
}

/// Bounded sink/receiver pair for callers that drive a run synchronously
/// with their own consumer.
pub fn channel(bound: usize) -> (EventSink, Receiver<Event>) {
    let (sender, receiver) = mpsc::sync_channel(bound);
    (EventSink::new(sender), receiver)
}

/// Lazy event sequence for one workflow run.
///
/// End of iteration means the run terminated; a research abort and a normal
/// completion both end the stream without a distinguishing event (the log
/// carries the difference). Dropping the stream mid-run abandons the worker
/// at its next `emit`.
#[derive(Debug)]
pub struct RunStream {
    run_id: RunId,
    receiver: Receiver<Event>,
    _worker: JoinHandle<()>,
}

impl RunStream {
    pub(crate) fn new(run_id: RunId, receiver: Receiver<Event>, worker: JoinHandle<()>) -> Self {
        Self {
            run_id,
            receiver,
            _worker: worker,
        }
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }
}

impl Iterator for RunStream {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn sample_ids() -> (RunId, RoleId) {
        (
            RunId::parse("run-1-aaaa").expect("run id"),
            RoleId::parse("searcher").expect("role id"),
        )
    }

    #[test]
    fn emit_fails_after_consumer_drops_receiver() {
        let (run_id, role_id) = sample_ids();
        let (tx, rx) = mpsc::sync_channel(1);
        let sink = EventSink::new(tx);
        drop(rx);
        assert_eq!(
            sink.emit(Event::new(&run_id, &role_id, "finding")),
            Err(StreamClosed)
        );
    }

    #[test]
    fn bounded_channel_suspends_producer_until_consumer_pulls() {
        let (run_id, role_id) = sample_ids();
        let (tx, rx) = mpsc::sync_channel(1);
        let sink = EventSink::new(tx);

        let producer = thread::spawn(move || {
            for idx in 0..3 {
                sink.emit(Event::new(&run_id, &role_id, &format!("part {idx}")))
                    .expect("emit");
            }
        });

        let collected: Vec<String> = rx.iter().map(|event| event.content).collect();
        producer.join().expect("producer");
        assert_eq!(collected, vec!["part 0", "part 1", "part 2"]);
    }
}
