//! Per-kind timed tasks.
//!
//! Every entity that waits on simulated time (stun, flicker, explosion fuse, shield
//! regeneration, ...) owns one `TaskTimers<K>`. Each *kind* has at most one slot:
//!
//! ```text
//!   start(Stun, 2.0)  -> slot Stun = { remaining: 2.0, generation: 7 }
//!   start(Stun, 2.0)  -> slot Stun = { remaining: 2.0, generation: 8 }   (7 is gone)
//!   start(Flash, 0.1) -> slot Flash untouched by the stun restarts
//! ```
//!
//! Superseding only ever touches the slot of the same kind, so restarting a stun can
//! never cancel an unrelated flicker. Kinds that report `cancellable() == false` keep
//! their first start: a lit fuse cannot be restarted or cancelled.
//!
//! Tasks only progress inside `tick`, which the owner calls once per fixed step.

use std::fmt::Debug;

/// A kind of timed task. One slot per kind per owner.
pub trait TaskKind: Copy + Eq + Debug {
    /// Whether a running task of this kind may be superseded or cancelled.
    fn cancellable(self) -> bool {
        true
    }
}

/// Handle identifying one particular start of a task.
///
/// Holders compare tickets to tell "the stun I started" apart from a later stun that
/// replaced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaskTicket<K> {
    pub kind: K,
    pub generation: u32,
}

#[derive(Clone, Debug)]
struct Slot<K> {
    kind: K,
    remaining: f32,
    generation: u32,
}

#[derive(Clone, Debug)]
pub struct TaskTimers<K> {
    slots: Vec<Slot<K>>,
    next_generation: u32,
}

impl<K> Default for TaskTimers<K> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            next_generation: 0,
        }
    }
}

impl<K: TaskKind> TaskTimers<K> {
    /// Start (or supersede) the task of `kind`.
    ///
    /// Returns `None` when a non-cancellable task of the same kind is already running.
    pub fn start(&mut self, kind: K, secs: f32) -> Option<TaskTicket<K>> {
        let generation = self.next_generation;
        let remaining = secs.max(0.0);

        match self.slots.iter_mut().find(|s| s.kind == kind) {
            Some(_) if !kind.cancellable() => return None,
            Some(slot) => {
                slot.remaining = remaining;
                slot.generation = generation;
            }
            None => self.slots.push(Slot {
                kind,
                remaining,
                generation,
            }),
        }

        self.next_generation = self.next_generation.wrapping_add(1);
        Some(TaskTicket { kind, generation })
    }

    /// Cancel the running task of `kind`. Non-cancellable kinds are left alone.
    pub fn cancel(&mut self, kind: K) -> bool {
        if !kind.cancellable() {
            return false;
        }
        let before = self.slots.len();
        self.slots.retain(|s| s.kind != kind);
        self.slots.len() != before
    }

    /// Drop every task, including non-cancellable ones. Used by pool resets only.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    #[inline]
    pub fn is_running(&self, kind: K) -> bool {
        self.slots.iter().any(|s| s.kind == kind)
    }

    #[inline]
    pub fn remaining(&self, kind: K) -> Option<f32> {
        self.slots.iter().find(|s| s.kind == kind).map(|s| s.remaining)
    }

    /// True if `ticket` still names the running task of its kind.
    pub fn is_current(&self, ticket: TaskTicket<K>) -> bool {
        self.slots
            .iter()
            .any(|s| s.kind == ticket.kind && s.generation == ticket.generation)
    }

    /// Advance every task by `dt` and return the ones that completed, oldest first.
    pub fn tick(&mut self, dt: f32) -> Vec<TaskTicket<K>> {
        let mut done = Vec::new();
        self.slots.retain_mut(|s| {
            s.remaining -= dt;
            if s.remaining <= 0.0 {
                done.push(TaskTicket {
                    kind: s.kind,
                    generation: s.generation,
                });
                false
            } else {
                true
            }
        });
        done.sort_by_key(|t| t.generation);
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Kind {
        Stun,
        Flash,
        Fuse,
    }

    impl TaskKind for Kind {
        fn cancellable(self) -> bool {
            !matches!(self, Kind::Fuse)
        }
    }

    #[test]
    fn restarting_a_kind_supersedes_only_that_kind() {
        let mut t = TaskTimers::default();
        let first = t.start(Kind::Stun, 1.0).unwrap();
        t.start(Kind::Flash, 0.5).unwrap();

        t.tick(0.4);
        let second = t.start(Kind::Stun, 1.0).unwrap();

        assert!(!t.is_current(first));
        assert!(t.is_current(second));
        assert!((t.remaining(Kind::Flash).unwrap() - 0.1).abs() < 1e-6);
        assert!((t.remaining(Kind::Stun).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tick_reports_completions_once() {
        let mut t = TaskTimers::default();
        t.start(Kind::Flash, 0.1);

        let done = t.tick(0.2);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].kind, Kind::Flash);
        assert!(t.tick(0.2).is_empty());
        assert!(!t.is_running(Kind::Flash));
    }

    #[test]
    fn fuse_cannot_be_restarted_or_cancelled() {
        let mut t = TaskTimers::default();
        t.start(Kind::Fuse, 2.0).unwrap();
        t.tick(1.5);

        assert!(t.start(Kind::Fuse, 2.0).is_none());
        assert!(!t.cancel(Kind::Fuse));
        assert!((t.remaining(Kind::Fuse).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn cancel_leaves_other_kinds_running() {
        let mut t = TaskTimers::default();
        t.start(Kind::Stun, 1.0);
        t.start(Kind::Flash, 1.0);

        assert!(t.cancel(Kind::Stun));
        assert!(!t.is_running(Kind::Stun));
        assert!(t.is_running(Kind::Flash));
    }
}
