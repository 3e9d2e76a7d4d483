//! Scrub gesture state.
//!
//! While a gesture is active the progress display follows the pointer and
//! never the engine. Nothing reaches the engine until the gesture ends, and a
//! gesture started on one load never seeks another.

#[derive(Debug, Clone, Copy, PartialEq)]
struct Gesture {
    /// Load sequence number the gesture was started on.
    owner: u64,
    baseline: f64,
    value: f64,
}

#[derive(Debug, Default)]
pub struct DragCoordinator {
    gesture: Option<Gesture>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Begin a gesture at the currently displayed position. Restarting an
    /// active gesture rebases it.
    pub fn start(&mut self, owner: u64, baseline: f64) {
        self.gesture = Some(Gesture {
            owner,
            baseline,
            value: baseline,
        });
    }

    /// Move the local display value. Returns `false` when no gesture is active.
    pub fn update(&mut self, candidate: f64) -> bool {
        match self.gesture.as_mut() {
            Some(g) => {
                g.value = candidate;
                true
            }
            None => false,
        }
    }

    /// End the gesture, yielding the position to commit if it still belongs to
    /// `owner`.
    pub fn finish(&mut self, owner: u64, final_position: f64) -> Option<f64> {
        let g = self.gesture.take()?;
        (g.owner == owner).then_some(final_position)
    }

    /// Drop an in-flight gesture without committing it.
    pub fn abort(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    pub fn value(&self) -> Option<f64> {
        self.gesture.map(|g| g.value)
    }

    pub fn baseline(&self) -> Option<f64> {
        self.gesture.map(|g| g.baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_without_gesture_is_ignored() {
        let mut drag = DragCoordinator::new();
        assert!(!drag.update(10.0));
        assert_eq!(drag.value(), None);
    }

    #[test]
    fn gesture_tracks_value_and_keeps_baseline() {
        let mut drag = DragCoordinator::new();
        drag.start(1, 12.0);
        assert!(drag.update(30.0));
        assert!(drag.update(45.0));
        assert_eq!(drag.baseline(), Some(12.0));
        assert_eq!(drag.value(), Some(45.0));
        assert_eq!(drag.finish(1, 47.0), Some(47.0));
        assert!(!drag.is_active());
    }

    #[test]
    fn finish_for_another_owner_commits_nothing() {
        let mut drag = DragCoordinator::new();
        drag.start(1, 0.0);
        assert_eq!(drag.finish(2, 60.0), None);
        assert!(!drag.is_active());
    }

    #[test]
    fn abort_reports_whether_a_gesture_was_dropped() {
        let mut drag = DragCoordinator::new();
        assert!(!drag.abort());
        drag.start(4, 5.0);
        assert!(drag.abort());
        assert_eq!(drag.finish(4, 9.0), None);
    }
}
