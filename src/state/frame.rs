use serde::{Deserialize, Serialize};

/// Frame range of the scene timeline, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameBounds {
    /// First frame.
    pub min: f64,
    /// Last frame.
    pub max: f64,
}

/// Active frame plus the timeline range it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameState {
    /// Active frame. `None` disables frame filtering entirely.
    pub current: Option<f64>,
    /// Timeline range.
    pub range: FrameBounds,
}

impl FrameState {
    /// Timeline `min..=max` with the active frame at `min`.
    #[must_use]
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            current: Some(min as f64),
            range: FrameBounds {
                min: min as f64,
                max: max as f64,
            },
        }
    }

    /// Timeline `min..=max` with frame filtering disabled.
    #[must_use]
    pub fn unfiltered(min: i64, max: i64) -> Self {
        Self {
            current: None,
            ..Self::new(min, max)
        }
    }

    /// Normalize the range and active frame in place and return the
    /// active frame to filter on.
    ///
    /// Bounds are truncated to integers (a non-finite `min` becomes 0, a
    /// non-finite `max` becomes `min`) and swapped when inverted. The
    /// active frame is truncated and clamped into range; a non-finite one
    /// snaps to `min`.
    pub fn canonicalize(&mut self) -> Option<i64> {
        let min = if self.range.min.is_finite() {
            self.range.min.trunc()
        } else {
            0.0
        };
        let max = if self.range.max.is_finite() {
            self.range.max.trunc()
        } else {
            min
        };
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        self.range = FrameBounds { min, max };

        let current = self.current.map(|c| {
            if c.is_finite() {
                c.trunc().clamp(min, max)
            } else {
                min
            }
        });
        self.current = current;
        current.map(|c| c as i64)
    }

    /// Integer bounds. Only meaningful after [`canonicalize`](Self::canonicalize).
    #[must_use]
    pub fn bounds(&self) -> (i64, i64) {
        (self.range.min as i64, self.range.max as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(current: Option<f64>, min: f64, max: f64) -> FrameState {
        FrameState {
            current,
            range: FrameBounds { min, max },
        }
    }

    #[test]
    fn clamps_and_truncates() {
        let mut frame = state(Some(12.7), 0.0, 10.0);
        assert_eq!(frame.canonicalize(), Some(10));
        assert_eq!(frame.current, Some(10.0));

        let mut frame = state(Some(3.9), 0.0, 10.0);
        assert_eq!(frame.canonicalize(), Some(3));

        let mut frame = state(Some(-4.0), 1.5, 10.0);
        assert_eq!(frame.canonicalize(), Some(1));
    }

    #[test]
    fn swaps_inverted_range() {
        let mut frame = state(Some(5.0), 8.0, 2.0);
        assert_eq!(frame.canonicalize(), Some(5));
        assert_eq!(frame.range, FrameBounds { min: 2.0, max: 8.0 });
    }

    #[test]
    fn non_finite_values_fall_back() {
        let mut frame = state(Some(f64::NAN), f64::INFINITY, f64::NAN);
        assert_eq!(frame.canonicalize(), Some(0));
        assert_eq!(frame.range, FrameBounds { min: 0.0, max: 0.0 });

        let mut frame = state(Some(f64::INFINITY), 3.0, f64::NAN);
        assert_eq!(frame.canonicalize(), Some(3));
        assert_eq!(frame.bounds(), (3, 3));
    }

    #[test]
    fn absent_frame_stays_absent() {
        let mut frame = FrameState::unfiltered(0, 4);
        assert_eq!(frame.canonicalize(), None);
        assert_eq!(frame.current, None);
    }
}
