//! Message list load latch.
//!
//! Only one message list request may be in flight. Search input that
//! arrives meanwhile is remembered and replayed once the request finishes;
//! refresh requests from the channel or the minute timer only mark the list
//! stale and are picked up by the periodic refresh check.

/// Latch state for message list loads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadGuard {
    loading: bool,
    search_pending: bool,
    refresh_due: bool,
}

impl LoadGuard {
    /// Creates an idle guard.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            loading: false,
            search_pending: false,
            refresh_due: false,
        }
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the list has been marked stale since the last load started.
    #[must_use]
    pub const fn refresh_due(&self) -> bool {
        self.refresh_due
    }

    /// Whether a search arrived during the current load.
    #[must_use]
    pub const fn search_pending(&self) -> bool {
        self.search_pending
    }

    /// Starts a load unless one is in flight.
    ///
    /// Starting clears both the pending search and the stale mark, since the
    /// new request covers them.
    pub const fn try_begin(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        self.search_pending = false;
        self.refresh_due = false;
        true
    }

    /// Handles new search input: starts a load now, or defers it until the
    /// in-flight load finishes.
    pub const fn request_search(&mut self) -> bool {
        if self.loading {
            self.search_pending = true;
            return false;
        }
        self.try_begin()
    }

    /// Ends the in-flight load, successful or not.
    ///
    /// Returns `true` when a deferred search must run now; the caller then
    /// calls [`try_begin`](Self::try_begin).
    pub const fn finish(&mut self) -> bool {
        self.loading = false;
        self.search_pending
    }

    /// Marks the list stale.
    pub const fn mark_stale(&mut self) {
        self.refresh_due = true;
    }

    /// Periodic check: starts a load if the list is stale and none is in
    /// flight. A stale mark survives a busy check.
    pub const fn begin_if_due(&mut self) -> bool {
        self.refresh_due && self.try_begin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_idle_search_starts_immediately() {
        let mut guard = LoadGuard::new();
        assert!(guard.request_search());
        assert!(guard.is_loading());
    }

    #[test]
    fn test_search_during_load_is_deferred_once() {
        let mut guard = LoadGuard::new();
        assert!(guard.try_begin());
        assert!(!guard.request_search());
        assert!(!guard.request_search());
        assert!(guard.search_pending());

        assert!(guard.finish());
        assert!(guard.try_begin());
        assert!(!guard.search_pending());

        assert!(!guard.finish());
    }

    #[test]
    fn test_stale_mark_survives_busy_check() {
        let mut guard = LoadGuard::new();
        assert!(guard.try_begin());
        guard.mark_stale();
        assert!(!guard.begin_if_due());
        assert!(guard.refresh_due());

        assert!(!guard.finish());
        assert!(guard.begin_if_due());
        assert!(!guard.refresh_due());
    }

    #[test]
    fn test_check_without_stale_mark_does_nothing() {
        let mut guard = LoadGuard::new();
        assert!(!guard.begin_if_due());
        assert!(!guard.is_loading());
    }

    #[test]
    fn test_begin_clears_stale_mark() {
        let mut guard = LoadGuard::new();
        guard.mark_stale();
        assert!(guard.request_search());
        assert!(!guard.refresh_due());
    }

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Search,
        Stale,
        Check,
        Complete,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Search),
            Just(Op::Stale),
            Just(Op::Check),
            Just(Op::Complete),
        ]
    }

    proptest! {
        /// Drives the guard like the console does and checks that requests
        /// never overlap and every search is eventually served.
        #[test]
        fn prop_never_overlaps_and_serves_searches(ops in prop::collection::vec(op(), 0..64)) {
            let mut guard = LoadGuard::new();
            let mut in_flight = 0_u32;
            let mut unserved_search = false;

            for op in ops {
                match op {
                    Op::Search => {
                        if guard.request_search() {
                            in_flight += 1;
                            unserved_search = false;
                        } else {
                            unserved_search = true;
                        }
                    }
                    Op::Stale => guard.mark_stale(),
                    Op::Check => {
                        if guard.begin_if_due() {
                            in_flight += 1;
                            unserved_search = false;
                        }
                    }
                    Op::Complete => {
                        if in_flight == 1 {
                            in_flight -= 1;
                            if guard.finish() {
                                prop_assert!(guard.try_begin());
                                in_flight += 1;
                                unserved_search = false;
                            }
                        }
                    }
                }
                prop_assert!(in_flight <= 1);
                prop_assert_eq!(guard.is_loading(), in_flight == 1);
                if unserved_search {
                    prop_assert!(guard.search_pending());
                }
            }
        }
    }
}
