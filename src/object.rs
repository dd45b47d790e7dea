//! Lifecycle base shared by every I/O object.
//!
//! Each object is created healthy, may fail at most once, and is closed
//! exactly once. [`ObjectState`] holds the tri-state health cell; the
//! [`Object`] trait layers the failure and close protocol on top of two
//! state accessors plus a per-type finalize hook.
//!
//! Health transitions are monotonic:
//!
//! ```text
//! Healthy ──► Closed
//!    │
//!    └──────► Failed ──► Failed + Closed
//! ```
//!
//! `fail` is the only operation safe to call concurrently on one object;
//! everything else requires external exclusion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::status::Status;

/// Current health of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Health {
    /// Open and usable.
    Healthy,
    /// Closed without a recorded failure.
    Closed,
    /// A failure has been recorded; permanent.
    Failed,
}

/// Type discriminator for checked narrowing of trait objects.
///
/// The default tag is empty; concrete types that want to be recognized
/// through `dyn` interfaces override [`Object::type_tag`] with a tag of
/// their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeTag(Option<&'static str>);

impl TypeTag {
    /// Create a named tag.
    pub const fn of(name: &'static str) -> Self {
        TypeTag(Some(name))
    }

    /// Get the tag name, if any.
    #[inline]
    pub fn name(self) -> Option<&'static str> {
        self.0
    }
}

/// Health cell: a one-shot failure record plus a closed flag.
///
/// The failure cell is writable through `&self` so that a background path
/// can fail an object raced by the foreground write path. The first
/// successful installer wins; a losing record is dropped, never leaked.
#[derive(Debug, Default)]
pub struct ObjectState {
    failure: OnceLock<Box<Status>>,
    closed: AtomicBool,
}

impl ObjectState {
    /// Create a healthy, open state.
    pub fn new() -> Self {
        ObjectState::default()
    }

    /// Check that no failure is recorded and the object is open.
    #[inline]
    pub fn healthy(&self) -> bool {
        !self.is_failed() && !self.closed()
    }

    /// Check whether the object has been closed.
    #[inline]
    pub fn closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Check whether a failure has been recorded.
    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failure.get().is_some()
    }

    /// Get the current health.
    pub fn health(&self) -> Health {
        if self.is_failed() {
            Health::Failed
        } else if self.closed() {
            Health::Closed
        } else {
            Health::Healthy
        }
    }

    /// Get the recorded status: the failure if one exists, otherwise ok.
    pub fn status(&self) -> Status {
        match self.failure.get() {
            Some(status) => (**status).clone(),
            None => Status::ok(),
        }
    }

    /// Record a failure.
    ///
    /// Installs `status` with a single release-ordered compare-and-swap
    /// from the healthy sentinel: any thread that later observes the
    /// failed state also observes the fully constructed record. If another
    /// failure won the race, the new record is dropped.
    ///
    /// Always returns `false`, so callers can `return state.fail(...)`.
    ///
    /// # Panics
    ///
    /// Panics if `status` is ok or the object is already closed; both are
    /// caller bugs, not runtime conditions.
    pub fn fail(&self, status: Status) -> bool {
        assert!(!status.is_ok(), "ObjectState::fail() requires a failure status");
        assert!(!self.closed(), "ObjectState::fail() called on a closed object");
        let _ = self.failure.set(Box::new(status));
        false
    }

    /// Freeze the closed flag. Called once from [`Object::close`].
    pub(crate) fn mark_closed(&mut self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Return to a fresh healthy state, discarding any recorded failure.
    pub(crate) fn reset(&mut self) {
        *self = ObjectState::new();
    }
}

/// The lifecycle protocol shared by all I/O objects.
///
/// Implementors provide the two state accessors and, where finalization
/// work exists, override [`Object::done`]; the failure and close logic is
/// supplied here.
pub trait Object {
    /// Shared access to the health cell.
    fn state(&self) -> &ObjectState;

    /// Exclusive access to the health cell.
    fn state_mut(&mut self) -> &mut ObjectState;

    /// Per-type finalize hook, run exactly once by the first `close()`.
    ///
    /// Runs even when the object has failed, so owned resources are still
    /// released.
    fn done(&mut self) {}

    /// Type discriminator; empty unless overridden.
    fn type_tag(&self) -> TypeTag {
        TypeTag::default()
    }

    /// Check that the object is open and has no recorded failure.
    #[inline]
    fn healthy(&self) -> bool {
        self.state().healthy()
    }

    /// Check whether the object has been closed.
    #[inline]
    fn closed(&self) -> bool {
        self.state().closed()
    }

    /// Get the current health.
    #[inline]
    fn health(&self) -> Health {
        self.state().health()
    }

    /// Get the recorded status; ok unless a failure was recorded.
    #[inline]
    fn status(&self) -> Status {
        self.state().status()
    }

    /// Record a failure. See [`ObjectState::fail`]. Returns `false`.
    fn fail(&self, status: Status) -> bool {
        self.state().fail(status)
    }

    /// Adopt an unhealthy dependency's status verbatim.
    ///
    /// # Panics
    ///
    /// Panics if `dependency` is healthy.
    fn fail_dependency(&self, dependency: &dyn Object) -> bool {
        assert!(
            !dependency.healthy(),
            "Object::fail_dependency() called with a healthy dependency"
        );
        self.fail(dependency.status())
    }

    /// Adopt the dependency's status if it is unhealthy, otherwise install
    /// `fallback`. Defensive path for callers that expect but cannot
    /// guarantee dependency unhealthiness.
    fn fail_dependency_or(&self, dependency: &dyn Object, fallback: Status) -> bool {
        let dep_status = dependency.status();
        if !dependency.healthy() && !dep_status.is_ok() {
            self.fail(dep_status)
        } else {
            self.fail(fallback)
        }
    }

    /// Close the object.
    ///
    /// The first call runs [`Object::done`] and freezes the closed flag;
    /// later calls are no-ops. Returns `true` unless a failure was
    /// recorded (before or during finalization).
    fn close(&mut self) -> bool {
        if !self.state().closed() {
            self.done();
            self.state_mut().mark_closed();
        }
        !self.state().is_failed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Probe {
        state: ObjectState,
        finalized: u32,
    }

    impl Probe {
        fn new() -> Self {
            Probe {
                state: ObjectState::new(),
                finalized: 0,
            }
        }
    }

    impl Object for Probe {
        fn state(&self) -> &ObjectState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut ObjectState {
            &mut self.state
        }

        fn done(&mut self) {
            self.finalized += 1;
        }

        fn type_tag(&self) -> TypeTag {
            TypeTag::of("probe")
        }
    }

    #[test]
    fn test_starts_healthy() {
        let probe = Probe::new();
        assert!(probe.healthy());
        assert_eq!(probe.health(), Health::Healthy);
        assert!(probe.status().is_ok());
    }

    #[test]
    fn test_fail_records_once() {
        let probe = Probe::new();
        assert!(!probe.fail(Status::internal("first")));
        assert!(!probe.fail(Status::internal("second")));
        assert_eq!(probe.status().message(), "first");
        assert_eq!(probe.health(), Health::Failed);
    }

    #[test]
    fn test_close_idempotent_runs_done_once() {
        let mut probe = Probe::new();
        assert!(probe.close());
        assert!(probe.close());
        assert_eq!(probe.finalized, 1);
        assert_eq!(probe.health(), Health::Closed);
    }

    #[test]
    fn test_close_after_failure_keeps_failure() {
        let mut probe = Probe::new();
        probe.fail(Status::data_loss("bad frame"));
        assert!(!probe.close());
        assert_eq!(probe.finalized, 1);
        assert_eq!(probe.health(), Health::Failed);
        assert_eq!(probe.status().message(), "bad frame");
    }

    #[test]
    #[should_panic(expected = "closed object")]
    fn test_fail_after_close_panics() {
        let mut probe = Probe::new();
        probe.close();
        probe.fail(Status::internal("too late"));
    }

    #[test]
    #[should_panic(expected = "failure status")]
    fn test_fail_with_ok_status_panics() {
        let probe = Probe::new();
        probe.fail(Status::ok());
    }

    #[test]
    fn test_fail_dependency_adopts_verbatim() {
        let dep = Probe::new();
        dep.fail(Status::resource_exhausted("limit"));
        let outer = Probe::new();
        outer.fail_dependency(&dep);
        assert_eq!(outer.status(), dep.status());
    }

    #[test]
    fn test_fail_dependency_or_uses_fallback_for_healthy_dep() {
        let dep = Probe::new();
        let outer = Probe::new();
        outer.fail_dependency_or(&dep, Status::internal("fallback"));
        assert_eq!(outer.status().message(), "fallback");
    }

    #[test]
    fn test_type_tag_narrowing() {
        let probe = Probe::new();
        assert_eq!(probe.type_tag(), TypeTag::of("probe"));
        assert_ne!(probe.type_tag(), TypeTag::default());
    }

    #[test]
    fn test_concurrent_fail_single_winner_from_attempted_set() {
        let state = Arc::new(ObjectState::new());
        let mut handles = Vec::new();
        for i in 0..8 {
            let state = Arc::clone(&state);
            handles.push(std::thread::spawn(move || {
                state.fail(Status::internal(format!("racer {i}")))
            }));
        }
        for handle in handles {
            assert!(!handle.join().unwrap());
        }
        let survivor = state.status();
        assert!(!survivor.is_ok());
        let attempted: Vec<String> = (0..8).map(|i| format!("racer {i}")).collect();
        assert!(attempted.iter().any(|m| m == survivor.message()));
    }
}
