//! Discrete zoom levels for page rendering.

use thiserror::Error;

/// Scale factors offered by the reader, smallest first.
pub const DEFAULT_ZOOM_LEVELS: [f32; 5] = [0.5, 0.75, 1.0, 1.25, 1.5];

/// Index of `1.0` in [`DEFAULT_ZOOM_LEVELS`].
pub const DEFAULT_ZOOM_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ZoomError {
    #[error("zoom level list is empty")]
    Empty,
    #[error("zoom levels must be positive")]
    NonPositive,
    #[error("zoom levels must be strictly ascending")]
    NotAscending,
    #[error("default zoom index {index} out of range for {len} levels")]
    DefaultOutOfRange { index: usize, len: usize },
}

/// Zoom state: an index into an ascending level table that never leaves
/// its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomController {
    levels: Vec<f32>,
    index: usize,
    default_index: usize,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            levels: DEFAULT_ZOOM_LEVELS.to_vec(),
            index: DEFAULT_ZOOM_INDEX,
            default_index: DEFAULT_ZOOM_INDEX,
        }
    }
}

impl ZoomController {
    /// Build a controller over custom levels.
    ///
    /// # Errors
    ///
    /// Fails when `levels` is empty, holds a non-positive or non-ascending
    /// value, or `default_index` is out of range.
    pub fn with_levels(levels: Vec<f32>, default_index: usize) -> Result<Self, ZoomError> {
        if levels.is_empty() {
            return Err(ZoomError::Empty);
        }
        if levels.iter().any(|level| level.is_nan() || *level <= 0.0) {
            return Err(ZoomError::NonPositive);
        }
        if levels.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ZoomError::NotAscending);
        }
        if default_index >= levels.len() {
            return Err(ZoomError::DefaultOutOfRange {
                index: default_index,
                len: levels.len(),
            });
        }
        Ok(Self {
            levels,
            index: default_index,
            default_index,
        })
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    pub fn current_scale(&self) -> f32 {
        self.levels[self.index]
    }

    /// Scale as a whole percentage, e.g. `125`.
    pub fn percent(&self) -> u16 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.current_scale() * 100.0).round() as u16;
        percent
    }

    pub fn can_zoom_in(&self) -> bool {
        self.index + 1 < self.levels.len()
    }

    pub const fn can_zoom_out(&self) -> bool {
        self.index > 0
    }

    /// Step up one level. Returns `false` at the top.
    pub fn zoom_in(&mut self) -> bool {
        if !self.can_zoom_in() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step down one level. Returns `false` at the bottom.
    pub const fn zoom_out(&mut self) -> bool {
        if !self.can_zoom_out() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Return to the default level. Returns `false` if already there.
    pub const fn zoom_reset(&mut self) -> bool {
        if self.index == self.default_index {
            return false;
        }
        self.index = self.default_index;
        true
    }

    /// Index of the level matching `scale`, if any.
    pub fn index_of_scale(&self, scale: f32) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| (level - scale).abs() < 1e-3)
    }

    /// Jump to the level matching `scale`. Returns `false` if no level matches.
    pub fn set_scale(&mut self, scale: f32) -> bool {
        match self.index_of_scale(scale) {
            Some(index) => {
                self.index = index;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_actual_size() {
        let zoom = ZoomController::default();
        assert_eq!(zoom.index(), DEFAULT_ZOOM_INDEX);
        assert!((zoom.current_scale() - 1.0).abs() < f32::EPSILON);
        assert_eq!(zoom.percent(), 100);
    }

    #[test]
    fn test_zoom_out_clamps_at_smallest_level() {
        let mut zoom = ZoomController::default();
        zoom.zoom_out();
        zoom.zoom_out();
        zoom.zoom_out();
        zoom.zoom_out();
        assert_eq!(zoom.index(), 0);
        assert!((zoom.current_scale() - 0.5).abs() < f32::EPSILON);
        assert!(!zoom.zoom_out());
        assert_eq!(zoom.index(), 0);
    }

    #[test]
    fn test_zoom_in_clamps_at_largest_level() {
        let mut zoom = ZoomController::default();
        assert!(zoom.zoom_in());
        assert!(zoom.zoom_in());
        assert!(!zoom.zoom_in());
        assert_eq!(zoom.percent(), 150);
    }

    #[test]
    fn test_reset_returns_to_default() {
        let mut zoom = ZoomController::default();
        assert!(!zoom.zoom_reset());
        zoom.zoom_in();
        assert!(zoom.zoom_reset());
        assert_eq!(zoom.index(), DEFAULT_ZOOM_INDEX);
    }

    #[test]
    fn test_with_levels_validates() {
        assert_eq!(ZoomController::with_levels(vec![], 0), Err(ZoomError::Empty));
        assert_eq!(
            ZoomController::with_levels(vec![0.0, 1.0], 0),
            Err(ZoomError::NonPositive)
        );
        assert_eq!(
            ZoomController::with_levels(vec![1.0, 1.0], 0),
            Err(ZoomError::NotAscending)
        );
        assert_eq!(
            ZoomController::with_levels(vec![1.0, 2.0], 2),
            Err(ZoomError::DefaultOutOfRange { index: 2, len: 2 })
        );
        let zoom = ZoomController::with_levels(vec![1.0, 2.0], 1).unwrap();
        assert_eq!(zoom.percent(), 200);
    }

    #[test]
    fn test_set_scale_picks_matching_level() {
        let mut zoom = ZoomController::default();
        assert!(zoom.set_scale(1.25));
        assert_eq!(zoom.index(), 3);
        assert!(!zoom.set_scale(3.0));
        assert_eq!(zoom.index(), 3);
    }
}
