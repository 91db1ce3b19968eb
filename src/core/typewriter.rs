/// Typewriter reveal — grows a visible prefix of a body one character per tick.
///
/// Each body assignment owns a reveal task with a fresh `RevealId`. Ticks
/// address a task by id, so a timer armed for a superseded body is refused
/// instead of leaking its prefix or its finished signal into the new one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};

use crate::core::config::DEFAULT_REVEAL_INTERVAL;

/// Identity of one reveal task. Never reused within a `Typewriter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevealId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealEvent {
    /// A new reveal began; the visible prefix is empty.
    Started { id: RevealId },
    /// One more character is visible.
    Progress { id: RevealId, shown: usize },
    /// The whole body is visible. Fires once per task.
    Finished { id: RevealId },
}

impl RevealEvent {
    pub fn id(&self) -> RevealId {
        match self {
            Self::Started { id } | Self::Progress { id, .. } | Self::Finished { id } => *id,
        }
    }
}

#[derive(Debug, Clone)]
struct RevealTask {
    id: RevealId,
    body: String,
    total: usize,
    shown: usize,
    finished: bool,
    carry: Duration,
}

impl RevealTask {
    fn prefix(&self) -> &str {
        self.body
            .char_indices()
            .nth(self.shown)
            .map(|(i, _)| &self.body[..i])
            .unwrap_or(&self.body)
    }
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    interval: Duration,
    task: Option<RevealTask>,
    next_id: u64,
}

impl Typewriter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
            next_id: 1,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Assign a body. Re-assigning the body already being shown is a no-op;
    /// anything else restarts the reveal.
    pub fn set_body(&mut self, body: &str) -> Vec<RevealEvent> {
        if self.task.as_ref().is_some_and(|t| t.body == body) {
            return Vec::new();
        }
        self.restart(body)
    }

    /// Cancel any in-flight reveal and start revealing `body` from the empty
    /// prefix, even if it equals the current body.
    ///
    /// An empty body starts and finishes immediately.
    pub fn restart(&mut self, body: &str) -> Vec<RevealEvent> {
        if let Some(old) = self.task.take() {
            if !old.finished {
                debug!(reveal = old.id.0, shown = old.shown, "reveal cancelled");
            }
        }

        let id = RevealId(self.next_id);
        self.next_id += 1;

        let total = body.chars().count();
        let mut events = vec![RevealEvent::Started { id }];
        let finished = total == 0;
        if finished {
            events.push(RevealEvent::Finished { id });
        }
        debug!(reveal = id.0, chars = total, "reveal started");

        self.task = Some(RevealTask {
            id,
            body: body.to_string(),
            total,
            shown: 0,
            finished,
            carry: Duration::ZERO,
        });
        events
    }

    /// Deliver one timer tick for reveal `id`.
    ///
    /// Returns `None` when `id` is not the active task or the task is already
    /// finished; such ticks change nothing.
    pub fn tick(&mut self, id: RevealId) -> Option<RevealEvent> {
        let task = self.task.as_mut().filter(|t| t.id == id && !t.finished)?;
        task.shown += 1;
        trace!(reveal = id.0, shown = task.shown, "reveal tick");
        if task.shown >= task.total {
            task.finished = true;
            debug!(reveal = id.0, "reveal finished");
            Some(RevealEvent::Finished { id })
        } else {
            Some(RevealEvent::Progress {
                id,
                shown: task.shown,
            })
        }
    }

    /// Feed elapsed wall time to the active reveal, emitting one tick per
    /// whole interval. Leftover time carries over to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<RevealEvent> {
        let mut events = Vec::new();
        let Some(id) = self.active_id() else {
            return events;
        };

        if self.interval.is_zero() {
            while let Some(event) = self.tick(id) {
                events.push(event);
            }
            return events;
        }

        if let Some(task) = self.task.as_mut() {
            task.carry += elapsed;
        }
        loop {
            let due = self
                .task
                .as_ref()
                .is_some_and(|t| !t.finished && t.carry >= self.interval);
            if !due {
                break;
            }
            if let Some(task) = self.task.as_mut() {
                task.carry -= self.interval;
            }
            match self.tick(id) {
                Some(event) => events.push(event),
                None => break,
            }
        }
        events
    }

    /// Id of the current task, finished or not.
    pub fn active_id(&self) -> Option<RevealId> {
        self.task.as_ref().map(|t| t.id)
    }

    pub fn is_revealing(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.finished)
    }

    /// The currently visible prefix.
    pub fn prefix(&self) -> &str {
        self.task.as_ref().map(RevealTask::prefix).unwrap_or("")
    }

    pub fn body(&self) -> &str {
        self.task.as_ref().map(|t| t.body.as_str()).unwrap_or("")
    }
}

impl Default for Typewriter {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_id(events: &[RevealEvent]) -> RevealId {
        match events.first() {
            Some(RevealEvent::Started { id }) => *id,
            other => panic!("expected Started, got {other:?}"),
        }
    }

    #[test]
    fn reveals_one_char_per_tick() {
        let mut tw = Typewriter::default();
        let id = started_id(&tw.restart("abc"));
        assert_eq!(tw.prefix(), "");
        assert!(tw.is_revealing());

        assert_eq!(tw.tick(id), Some(RevealEvent::Progress { id, shown: 1 }));
        assert_eq!(tw.prefix(), "a");
        assert_eq!(tw.tick(id), Some(RevealEvent::Progress { id, shown: 2 }));
        assert_eq!(tw.prefix(), "ab");
        assert_eq!(tw.tick(id), Some(RevealEvent::Finished { id }));
        assert_eq!(tw.prefix(), "abc");
        assert!(!tw.is_revealing());
    }

    #[test]
    fn finished_fires_once() {
        let mut tw = Typewriter::default();
        let id = started_id(&tw.restart("x"));
        assert_eq!(tw.tick(id), Some(RevealEvent::Finished { id }));
        assert_eq!(tw.tick(id), None);
        assert_eq!(tw.tick(id), None);
        assert_eq!(tw.prefix(), "x");
    }

    #[test]
    fn empty_body_finishes_immediately() {
        let mut tw = Typewriter::default();
        let events = tw.restart("");
        let id = started_id(&events);
        assert_eq!(events, vec![RevealEvent::Started { id }, RevealEvent::Finished { id }]);
        assert!(!tw.is_revealing());
        assert_eq!(tw.tick(id), None);
    }

    #[test]
    fn stale_ticks_are_refused() {
        let mut tw = Typewriter::default();
        let old = started_id(&tw.restart("first body"));
        tw.tick(old);
        let new = started_id(&tw.restart("second"));
        assert_ne!(old, new);
        assert_eq!(tw.prefix(), "");

        for _ in 0..20 {
            assert_eq!(tw.tick(old), None);
        }
        assert_eq!(tw.prefix(), "");
        assert!(tw.is_revealing());
    }

    #[test]
    fn set_body_is_idempotent() {
        let mut tw = Typewriter::default();
        let id = started_id(&tw.set_body("same"));
        tw.tick(id);
        assert!(tw.set_body("same").is_empty());
        assert_eq!(tw.active_id(), Some(id));
        assert_eq!(tw.prefix(), "s");
    }

    #[test]
    fn restart_same_body_resets_prefix() {
        let mut tw = Typewriter::default();
        let first = started_id(&tw.restart("again"));
        while tw.tick(first).is_some() {}
        let second = started_id(&tw.restart("again"));
        assert_ne!(first, second);
        assert_eq!(tw.prefix(), "");
        assert!(tw.is_revealing());
    }

    #[test]
    fn multibyte_prefixes_split_on_chars() {
        let mut tw = Typewriter::default();
        let id = started_id(&tw.restart("Āe…"));
        tw.tick(id);
        assert_eq!(tw.prefix(), "Ā");
        tw.tick(id);
        assert_eq!(tw.prefix(), "Āe");
        assert_eq!(tw.tick(id), Some(RevealEvent::Finished { id }));
        assert_eq!(tw.prefix(), "Āe…");
    }

    #[test]
    fn advance_converts_time_to_ticks() {
        let mut tw = Typewriter::new(Duration::from_millis(10));
        let id = started_id(&tw.restart("hello"));

        assert!(tw.advance(Duration::from_millis(9)).is_empty());
        let events = tw.advance(Duration::from_millis(12));
        assert_eq!(events, vec![
            RevealEvent::Progress { id, shown: 1 },
            RevealEvent::Progress { id, shown: 2 },
        ]);
        assert_eq!(tw.prefix(), "he");

        let events = tw.advance(Duration::from_secs(1));
        assert_eq!(events.last(), Some(&RevealEvent::Finished { id }));
        assert_eq!(events.len(), 3);
        assert!(tw.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn zero_interval_reveals_at_once() {
        let mut tw = Typewriter::new(Duration::ZERO);
        let id = started_id(&tw.restart("abc"));
        let events = tw.advance(Duration::ZERO);
        assert_eq!(events.last(), Some(&RevealEvent::Finished { id }));
        assert_eq!(tw.prefix(), "abc");
    }

    #[test]
    fn carry_does_not_survive_restart() {
        let mut tw = Typewriter::new(Duration::from_millis(10));
        tw.restart("abc");
        tw.advance(Duration::from_millis(9));
        let id = started_id(&tw.restart("xyz"));
        assert!(tw.advance(Duration::from_millis(2)).is_empty());
        assert_eq!(tw.advance(Duration::from_millis(8)), vec![RevealEvent::Progress { id, shown: 1 }]);
    }
}
