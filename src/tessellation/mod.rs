mod arc_polyline;

pub use arc_polyline::ArcPolyline;

use crate::math::arc_2d::arc_subdivision_count;

/// Parameters controlling arc tessellation quality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationParams {
    /// Maximum allowed chordal deviation from the true arc, in coordinate units.
    pub max_error: f64,
    /// Minimum number of segments per arc.
    pub min_segments: u32,
    /// Maximum number of segments per arc.
    pub max_segments: u32,
}

impl Default for TessellationParams {
    fn default() -> Self {
        Self {
            max_error: 5000.0,
            min_segments: 2,
            max_segments: 4096,
        }
    }
}

impl TessellationParams {
    /// Default parameters with a custom maximum chordal error.
    #[must_use]
    pub fn with_max_error(max_error: f64) -> Self {
        Self {
            max_error,
            ..Self::default()
        }
    }

    /// Number of segments for an arc of the given radius and sweep magnitude.
    #[must_use]
    pub fn segment_count(&self, radius: f64, abs_sweep: f64) -> u32 {
        let min = self.min_segments.max(1);
        let max = self.max_segments.max(min);
        arc_subdivision_count(radius, abs_sweep, self.max_error).clamp(min, max)
    }
}
