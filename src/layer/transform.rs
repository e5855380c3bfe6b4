//! Bounded pan/zoom state mapping buffer space onto the render target.

use super::error::LayerError;

/// Lower zoom bound (exclusive).
pub const MIN_ZOOM: f64 = 0.1;

/// Upper zoom bound (exclusive).
pub const MAX_ZOOM: f64 = 10.0;

/// Origin and per-axis zoom of a layer.
///
/// A buffer pixel at `(x, y)` is presented at
/// `(origin_x + x * zoom_x, origin_y + y * zoom_y)` on the target. Both zoom
/// factors always stay strictly inside `(MIN_ZOOM, MAX_ZOOM)`; every mutation
/// either commits completely or leaves the state untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    origin_x: f64,
    origin_y: f64,
    zoom_x: f64,
    zoom_y: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformState {
    /// Origin (0, 0), zoom (1, 1).
    pub const fn identity() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            zoom_x: 1.0,
            zoom_y: 1.0,
        }
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    pub fn zoom(&self) -> (f64, f64) {
        (self.zoom_x, self.zoom_y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Restores the identity transform.
    pub fn reset(&mut self) {
        *self = Self::identity();
    }

    /// Adds `(step_x, step_y)` to the zoom factors while keeping the target
    /// point `(center_x, center_y)` fixed on screen.
    ///
    /// # Errors
    /// [`LayerError::ZoomRejected`] if either candidate zoom is `<= MIN_ZOOM`
    /// or `>= MAX_ZOOM`, or if the anchored origin is not finite. The state is
    /// unchanged in that case.
    pub fn zoom_by(
        &mut self,
        step_x: f64,
        step_y: f64,
        center_x: f64,
        center_y: f64,
    ) -> Result<(), LayerError> {
        let zoom_x = self.zoom_x + step_x;
        let zoom_y = self.zoom_y + step_y;
        if !zoom_in_range(zoom_x) || !zoom_in_range(zoom_y) {
            return Err(LayerError::ZoomRejected { zoom_x, zoom_y });
        }

        // center - origin' = (center - origin) * (zoom' / zoom)
        let origin_x = center_x - (center_x - self.origin_x) * (zoom_x / self.zoom_x);
        let origin_y = center_y - (center_y - self.origin_y) * (zoom_y / self.zoom_y);
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return Err(LayerError::ZoomRejected { zoom_x, zoom_y });
        }

        *self = Self {
            origin_x,
            origin_y,
            zoom_x,
            zoom_y,
        };
        Ok(())
    }

    /// Moves the origin by `(tx, ty)` if the result keeps the content in view
    /// of a `width` x `height` target.
    ///
    /// # Errors
    /// [`LayerError::TranslateRejected`] if either axis leaves its pan bounds
    /// (see [`pan_bounds`]). Neither axis moves in that case.
    pub fn translate_within(
        &mut self,
        tx: f64,
        ty: f64,
        width: f64,
        height: f64,
    ) -> Result<(), LayerError> {
        let origin_x = self.origin_x + tx;
        let origin_y = self.origin_y + ty;
        if !within(origin_x, pan_bounds(self.zoom_x, width))
            || !within(origin_y, pan_bounds(self.zoom_y, height))
        {
            return Err(LayerError::TranslateRejected { origin_x, origin_y });
        }

        self.origin_x = origin_x;
        self.origin_y = origin_y;
        Ok(())
    }

    /// Maps a buffer-space point to target space.
    pub fn to_target(&self, x: f64, y: f64) -> (f64, f64) {
        (self.origin_x + x * self.zoom_x, self.origin_y + y * self.zoom_y)
    }

    /// Maps a target-space point back to buffer space.
    pub fn to_buffer(&self, x: f64, y: f64) -> (f64, f64) {
        ((x - self.origin_x) / self.zoom_x, (y - self.origin_y) / self.zoom_y)
    }

    /// Applies translate-then-scale to a Cairo context.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.translate(self.origin_x, self.origin_y);
        ctx.scale(self.zoom_x, self.zoom_y);
    }
}

fn zoom_in_range(zoom: f64) -> bool {
    zoom > MIN_ZOOM && zoom < MAX_ZOOM
}

fn within(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}

/// Allowed origin range `(min, max)` on one axis of length `extent` at `zoom`.
///
/// Magnified content may slide left until its far edge meets the far edge of
/// the target; shrunken content may slide right until its far edge does.
pub fn pan_bounds(zoom: f64, extent: f64) -> (f64, f64) {
    let slack = -extent * zoom + extent;
    if zoom >= 1.0 {
        (slack, 0.0)
    } else {
        (0.0, slack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn zoomed(zoom_x: f64, zoom_y: f64, origin_x: f64, origin_y: f64) -> TransformState {
        TransformState {
            origin_x,
            origin_y,
            zoom_x,
            zoom_y,
        }
    }

    #[test]
    fn zoom_around_center_moves_origin() {
        let mut state = TransformState::identity();
        state.zoom_by(0.5, 0.5, 50.0, 50.0).unwrap();
        assert_eq!(state.zoom(), (1.5, 1.5));
        assert_eq!(state.origin(), (-25.0, -25.0));
    }

    #[test]
    fn zoom_reaching_upper_bound_is_rejected() {
        let mut state = TransformState::identity();
        let err = state.zoom_by(9.0, 9.0, 50.0, 50.0).unwrap_err();
        assert!(matches!(err, LayerError::ZoomRejected { .. }));
        assert!(err.is_rejection());
        assert!(state.is_identity());
    }

    #[test]
    fn zoom_rejects_when_only_one_axis_is_out_of_range() {
        let mut state = zoomed(2.0, 0.5, -10.0, 5.0);
        let before = state;
        assert!(state.zoom_by(1.0, -0.4, 0.0, 0.0).is_err());
        assert_eq!(state, before);
        assert!(state.zoom_by(8.0, 0.0, 0.0, 0.0).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn zoom_rejection_covers_both_bounds() {
        let steps = [(-0.9, 0.0), (0.0, -0.9), (-2.0, 1.0), (9.0, 0.0), (0.0, 9.5)];
        for (step_x, step_y) in steps {
            let mut state = TransformState::identity();
            assert!(
                state.zoom_by(step_x, step_y, 10.0, 20.0).is_err(),
                "step ({step_x}, {step_y}) should be rejected"
            );
            assert!(state.is_identity());
        }
    }

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let mut state = zoomed(1.3, 0.7, -12.0, 8.0);
        let anchors = [(0.0, 0.0), (50.0, 25.0), (99.0, 3.5), (-4.0, 120.0)];
        let steps = [(0.4, -0.2), (-0.5, 0.1), (2.0, 3.0)];
        for (cx, cy) in anchors {
            for (sx, sy) in steps {
                let before = state;
                let content = before.to_buffer(cx, cy);
                if state.zoom_by(sx, sy, cx, cy).is_ok() {
                    let (tx, ty) = state.to_target(content.0, content.1);
                    assert!(close(tx, cx) && close(ty, cy), "anchor drifted: {tx},{ty}");
                } else {
                    assert_eq!(state, before);
                }
            }
        }
    }

    #[test]
    fn zoom_with_non_finite_anchor_is_rejected() {
        let anchors = [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 10.0),
            (f64::MAX, f64::MAX),
        ];
        for (cx, cy) in anchors {
            let mut state = zoomed(1.5, 1.5, -20.0, -20.0);
            let before = state;
            let err = state.zoom_by(0.5, 0.5, cx, cy).unwrap_err();
            assert!(matches!(err, LayerError::ZoomRejected { .. }));
            assert_eq!(state, before, "anchor ({cx}, {cy}) leaked into state");
        }

        let mut state = TransformState::identity();
        assert!(state.zoom_by(f64::NAN, 0.5, 0.0, 0.0).is_err());
        assert!(state.is_identity());
        // Still usable afterwards.
        state.zoom_by(1.0, 1.0, 0.0, 0.0).unwrap();
        state.translate_within(-10.0, -10.0, 100.0, 100.0).unwrap();
    }

    #[test]
    fn translate_with_non_finite_delta_is_rejected() {
        let mut state = zoomed(2.0, 2.0, -50.0, -50.0);
        for (tx, ty) in [
            (f64::NAN, 0.0),
            (0.0, f64::NAN),
            (f64::NEG_INFINITY, 0.0),
            (0.0, f64::MIN),
        ] {
            let err = state.translate_within(tx, ty, 100.0, 100.0).unwrap_err();
            assert!(err.is_rejection());
            assert_eq!(state.origin(), (-50.0, -50.0));
        }
    }

    #[test]
    fn translate_at_unit_zoom_is_pinned() {
        let mut state = TransformState::identity();
        let err = state.translate_within(10.0, 0.0, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, LayerError::TranslateRejected { .. }));
        assert_eq!(state.origin(), (0.0, 0.0));
        assert!(state.translate_within(0.0, 0.0, 100.0, 100.0).is_ok());
    }

    #[test]
    fn translate_past_lower_bound_is_rejected() {
        let mut state = zoomed(2.0, 2.0, -50.0, -50.0);
        assert!(state.translate_within(-60.0, 0.0, 100.0, 100.0).is_err());
        assert_eq!(state.origin(), (-50.0, -50.0));

        state.translate_within(-50.0, 0.0, 100.0, 100.0).unwrap();
        assert_eq!(state.origin(), (-100.0, -50.0));
    }

    #[test]
    fn translate_is_atomic_across_axes() {
        let mut state = zoomed(2.0, 2.0, -50.0, -50.0);
        // X alone would be fine, Y overshoots past 0.
        assert!(state.translate_within(10.0, 60.0, 100.0, 100.0).is_err());
        assert_eq!(state.origin(), (-50.0, -50.0));
    }

    #[test]
    fn translate_when_shrunk_stays_inside_target() {
        let mut state = zoomed(0.5, 0.5, 0.0, 0.0);
        state.translate_within(30.0, 50.0, 100.0, 100.0).unwrap();
        assert_eq!(state.origin(), (30.0, 50.0));
        assert!(state.translate_within(21.0, 0.0, 100.0, 100.0).is_err());
        assert!(state.translate_within(-31.0, 0.0, 100.0, 100.0).is_err());
        assert_eq!(state.origin(), (30.0, 50.0));
    }

    #[test]
    fn accepted_translations_respect_pan_bounds() {
        let mut state = zoomed(3.0, 0.25, -100.0, 10.0);
        for (tx, ty) in [(-50.0, 5.0), (40.0, -20.0), (-300.0, 70.0), (10.0, 1.0)] {
            if state.translate_within(tx, ty, 100.0, 80.0).is_ok() {
                let (ox, oy) = state.origin();
                let (min_x, max_x) = pan_bounds(3.0, 100.0);
                let (min_y, max_y) = pan_bounds(0.25, 80.0);
                assert!(min_x <= ox && ox <= max_x);
                assert!(min_y <= oy && oy <= max_y);
            }
        }
    }

    #[test]
    fn reset_restores_identity() {
        let mut state = zoomed(4.0, 0.2, -250.0, 33.0);
        state.reset();
        assert!(state.is_identity());
        state.reset();
        assert_eq!(state, TransformState::default());
    }

    #[test]
    fn to_buffer_inverts_to_target() {
        let state = zoomed(2.5, 0.5, -30.0, 12.0);
        let (x, y) = state.to_target(17.0, 40.0);
        let (bx, by) = state.to_buffer(x, y);
        assert!(close(bx, 17.0) && close(by, 40.0));
    }
}
