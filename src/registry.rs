//! Handler Registry - slot table and aggregate executor
//!
//! Single source of truth for who has a handler for what event, and in what
//! order they run.

use crate::owner::OwnerId;
use crate::value::Handler;
use crate::Result;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

// ============================================================================
// DispatchOutcome - aggregate result of one dispatch
// ============================================================================

/// Aggregate result of executing every handler registered for one event.
///
/// `NoHandlers` is deliberately distinct from `Approved`: hosts that treat a
/// `false` return as cancel must be able to tell "nothing ran" apart from
/// "everything approved".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No handler was registered for the event.
    NoHandlers,

    /// Every handler returned `true` or no verdict.
    Approved,

    /// At least one handler returned exactly `false`.
    Rejected,
}

impl DispatchOutcome {
    /// Whether some handler vetoed the event.
    pub fn vetoed(&self) -> bool {
        matches!(self, DispatchOutcome::Rejected)
    }

    /// Collapse to the host-side callable signal: `None` when nothing ran,
    /// otherwise the aggregate boolean.
    pub fn into_signal(self) -> Option<bool> {
        match self {
            DispatchOutcome::NoHandlers => None,
            DispatchOutcome::Approved => Some(true),
            DispatchOutcome::Rejected => Some(false),
        }
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHandlers => write!(f, "no_handlers"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

// ============================================================================
// HandlerRegistry
// ============================================================================

/// One slot entry: an owner and its callback.
#[derive(Clone)]
struct SlotEntry {
    owner: OwnerId,
    handler: Handler,
}

/// Slot table mapping event names to their ordered handler lists.
///
/// Entries are keyed by (event name, owner id), so owners never see or
/// clobber each other. Execution order within a slot is registration order;
/// re-registering an owner replaces its callback in place and keeps its
/// position. All methods take `&self`; the table lives behind one
/// registry-wide lock, which is plenty since registration typically happens
/// once at startup.
pub struct HandlerRegistry {
    slots: RwLock<HashMap<String, Vec<SlotEntry>>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// The callback registered for (event, owner), if any.
    pub fn get(&self, event: &str, owner: &OwnerId) -> Option<Handler> {
        let slots = self.slots.read();
        slots
            .get(event)?
            .iter()
            .find(|e| &e.owner == owner)
            .map(|e| e.handler.clone())
    }

    /// Whether (event, owner) has a registered callback.
    pub fn has(&self, event: &str, owner: &OwnerId) -> bool {
        let slots = self.slots.read();
        slots
            .get(event)
            .is_some_and(|slot| slot.iter().any(|e| &e.owner == owner))
    }

    /// Insert or overwrite the callback for (event, owner).
    ///
    /// The slot is created lazily on first registration. An owner that is
    /// already registered keeps its position in execution order.
    pub fn set(&self, event: &str, owner: &OwnerId, handler: Handler) {
        let mut slots = self.slots.write();
        let slot = slots.entry(event.to_string()).or_default();
        match slot.iter_mut().find(|e| &e.owner == owner) {
            Some(entry) => {
                entry.handler = handler;
                trace!(event, %owner, "replaced handler in place");
            }
            None => {
                debug!(event, %owner, position = slot.len(), "registered handler");
                slot.push(SlotEntry {
                    owner: owner.clone(),
                    handler,
                });
            }
        }
    }

    /// Remove the callback for (event, owner).
    ///
    /// Idempotent: absent entries and absent slots are ignored, and other
    /// owners are untouched.
    pub fn unset(&self, event: &str, owner: &OwnerId) {
        let mut slots = self.slots.write();
        if let Some(slot) = slots.get_mut(event) {
            let before = slot.len();
            slot.retain(|e| &e.owner != owner);
            if slot.len() != before {
                debug!(event, %owner, "unregistered handler");
            }
            if slot.is_empty() {
                slots.remove(event);
            }
        }
    }

    /// Execute every handler registered for `event`, in registration order,
    /// with identical arguments.
    ///
    /// Iterates over a snapshot taken before the first call, so a handler
    /// that registers or unregisters handlers mid-dispatch never affects the
    /// in-flight iteration. The first handler error aborts the remaining
    /// handlers and propagates unchanged.
    pub fn execute_all(&self, event: &str, args: &[Value]) -> Result<DispatchOutcome> {
        let snapshot: Vec<Handler> = {
            let slots = self.slots.read();
            match slots.get(event) {
                Some(slot) if !slot.is_empty() => {
                    slot.iter().map(|e| e.handler.clone()).collect()
                }
                _ => {
                    trace!(event, "dispatch with no handlers");
                    return Ok(DispatchOutcome::NoHandlers);
                }
            }
        };

        trace!(event, handlers = snapshot.len(), "dispatching");
        let mut outcome = DispatchOutcome::Approved;
        for handler in &snapshot {
            if handler.call(args)? == Some(false) {
                outcome = DispatchOutcome::Rejected;
            }
        }
        Ok(outcome)
    }

    /// Number of owners currently registered for `event`.
    pub fn owner_count(&self, event: &str) -> usize {
        self.slots.read().get(event).map_or(0, Vec::len)
    }

    /// Event names that currently have at least one handler.
    pub fn event_names(&self) -> Vec<String> {
        self.slots.read().keys().cloned().collect()
    }

    /// Whether no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    fn logging_handler(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str, verdict: Option<bool>) -> Handler {
        let log = Arc::clone(log);
        Handler::from_fn(move |_| {
            log.lock().push(tag);
            verdict
        })
    }

    #[test]
    fn set_get_round_trip() {
        let registry = HandlerRegistry::new();
        let owner = OwnerId::from("a");
        let h = Handler::from_fn(|_| Some(true));

        registry.set("onTick", &owner, h.clone());
        assert!(registry.has("onTick", &owner));
        assert!(registry.get("onTick", &owner).unwrap().same_as(&h));
    }

    #[test]
    fn owners_are_independent() {
        let registry = HandlerRegistry::new();
        let a = OwnerId::from("a");
        let b = OwnerId::from("b");

        registry.set("onTick", &a, Handler::from_fn(|_| Some(true)));
        assert!(!registry.has("onTick", &b));
        assert!(registry.get("onTick", &b).is_none());

        let hb = Handler::from_fn(|_| Some(false));
        registry.set("onTick", &b, hb.clone());
        registry.unset("onTick", &a);
        assert!(registry.get("onTick", &b).unwrap().same_as(&hb));
    }

    #[test]
    fn unset_is_idempotent() {
        let registry = HandlerRegistry::new();
        let a = OwnerId::from("a");

        registry.unset("onTick", &a); // nothing registered anywhere
        registry.set("onTick", &a, Handler::from_fn(|_| None));
        registry.unset("onTick", &a);
        registry.unset("onTick", &a); // again, after removal
        assert!(!registry.has("onTick", &a));
        assert!(registry.is_empty());
    }

    #[test]
    fn execution_follows_registration_order() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.set("onTick", &OwnerId::from("a"), logging_handler(&log, "h1", Some(true)));
        registry.set("onTick", &OwnerId::from("b"), logging_handler(&log, "h2", Some(true)));
        registry.set("onTick", &OwnerId::from("c"), logging_handler(&log, "h3", Some(true)));

        registry.execute_all("onTick", &[]).unwrap();
        assert_eq!(*log.lock(), vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn reregistration_preserves_position() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.set("onTick", &OwnerId::from("a"), logging_handler(&log, "a1", None));
        registry.set("onTick", &OwnerId::from("b"), logging_handler(&log, "b", None));
        // overwriting a's callback must not move a behind b
        registry.set("onTick", &OwnerId::from("a"), logging_handler(&log, "a2", None));

        registry.execute_all("onTick", &[]).unwrap();
        assert_eq!(*log.lock(), vec!["a2", "b"]);
        assert_eq!(registry.owner_count("onTick"), 2);
    }

    #[test]
    fn remove_and_readd_moves_to_the_end() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = OwnerId::from("a");

        registry.set("onTick", &a, logging_handler(&log, "a", None));
        registry.set("onTick", &OwnerId::from("b"), logging_handler(&log, "b", None));
        registry.unset("onTick", &a);
        registry.set("onTick", &a, logging_handler(&log, "a", None));

        registry.execute_all("onTick", &[]).unwrap();
        assert_eq!(*log.lock(), vec!["b", "a"]);
    }

    #[test]
    fn false_wins_aggregation() {
        let registry = HandlerRegistry::new();
        registry.set("onTick", &OwnerId::from("a"), Handler::from_fn(|_| Some(true)));
        registry.set("onTick", &OwnerId::from("b"), Handler::from_fn(|_| None));
        assert_eq!(registry.execute_all("onTick", &[]).unwrap(), DispatchOutcome::Approved);

        registry.set("onTick", &OwnerId::from("c"), Handler::from_fn(|_| Some(false)));
        let outcome = registry.execute_all("onTick", &[]).unwrap();
        assert_eq!(outcome, DispatchOutcome::Rejected);
        assert!(outcome.vetoed());
    }

    #[test]
    fn no_handlers_is_a_distinct_outcome() {
        let registry = HandlerRegistry::new();
        let outcome = registry.execute_all("onTick", &[]).unwrap();
        assert_eq!(outcome, DispatchOutcome::NoHandlers);
        assert_ne!(outcome, DispatchOutcome::Approved);
        assert_eq!(outcome.into_signal(), None);
    }

    #[test]
    fn all_handlers_see_identical_args() {
        let registry = HandlerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for owner in ["a", "b"] {
            let seen = Arc::clone(&seen);
            registry.set(
                "onTick",
                &OwnerId::from(owner),
                Handler::from_fn(move |args| {
                    seen.lock().push(args.to_vec());
                    None
                }),
            );
        }

        let args = [json!({"player": "alice"}), json!(3)];
        registry.execute_all("onTick", &args).unwrap();
        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], args);
        assert_eq!(seen[1], args);
    }

    #[test]
    fn handler_error_aborts_remaining_handlers() {
        let registry = HandlerRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        registry.set("onTick", &OwnerId::from("a"), logging_handler(&log, "a", None));
        registry.set(
            "onTick",
            &OwnerId::from("b"),
            Handler::new(|_| Err(anyhow::anyhow!("boom"))),
        );
        registry.set("onTick", &OwnerId::from("c"), logging_handler(&log, "c", None));

        let err = registry.execute_all("onTick", &[]).unwrap_err();
        assert!(err.is_handler_error());
        assert_eq!(err.to_string(), "boom");
        // a ran, c never did
        assert_eq!(*log.lock(), vec!["a"]);
    }

    #[test]
    fn dispatch_iterates_a_snapshot() {
        let registry = Arc::new(HandlerRegistry::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        // first handler unregisters the second mid-dispatch
        let reg = Arc::clone(&registry);
        let inner_log = Arc::clone(&log);
        registry.set(
            "onTick",
            &OwnerId::from("a"),
            Handler::from_fn(move |_| {
                inner_log.lock().push("a");
                reg.unset("onTick", &OwnerId::from("b"));
                None
            }),
        );
        registry.set("onTick", &OwnerId::from("b"), logging_handler(&log, "b", None));

        registry.execute_all("onTick", &[]).unwrap();
        // b still ran this dispatch, but is gone for the next one
        assert_eq!(*log.lock(), vec!["a", "b"]);
        assert!(!registry.has("onTick", &OwnerId::from("b")));
    }

    #[test]
    fn event_names_track_live_slots() {
        let registry = HandlerRegistry::new();
        let a = OwnerId::from("a");
        registry.set("onJoin", &a, Handler::from_fn(|_| None));
        registry.set("onLeave", &a, Handler::from_fn(|_| None));

        let mut names = registry.event_names();
        names.sort();
        assert_eq!(names, vec!["onJoin", "onLeave"]);

        registry.unset("onJoin", &a);
        assert_eq!(registry.event_names(), vec!["onLeave"]);
    }
}
