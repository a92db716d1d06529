//! Pixel-grid snapping for finished layouts.
//!
//! Frames are rounded in absolute coordinates so that two siblings sharing an
//! edge before rounding still share it afterwards. Each rounded frame is then
//! re-expressed relative to its parent's *rounded* origin, and the parent's
//! rounding error is carried down in a [`RoundingContext`] so children can
//! recover their exact absolute position.

use crate::{Point, Rect, error::GeometryError};

/// How a scaled coordinate is snapped to an integer pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingRule {
    /// Round half-way cases away from zero.
    #[default]
    ToNearestOrAwayFromZero,
    /// Round half-way cases to the even neighbour.
    ToNearestOrEven,
    /// Round toward positive infinity.
    Up,
    /// Round toward negative infinity.
    Down,
}

impl RoundingRule {
    fn apply(self, value: f32) -> f32 {
        match self {
            Self::ToNearestOrAwayFromZero => value.round(),
            Self::ToNearestOrEven => value.round_ties_even(),
            Self::Up => value.ceil(),
            Self::Down => value.floor(),
        }
    }
}

/// A display scale (points to pixels) paired with a rounding rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundingScale {
    scale: f32,
    rule: RoundingRule,
}

impl Default for RoundingScale {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rule: RoundingRule::default(),
        }
    }
}

impl RoundingScale {
    /// Creates a scale with the default rounding rule.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not a finite value greater than zero.
    #[must_use]
    pub fn new(scale: f32) -> Self {
        match Self::try_new(scale, RoundingRule::default()) {
            Ok(scale) => scale,
            Err(error) => panic!("invalid rounding scale: {error}"),
        }
    }

    /// Creates a scale with an explicit rule.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if `scale` is NaN, negative, infinite or zero.
    pub fn try_new(scale: f32, rule: RoundingRule) -> Result<Self, GeometryError> {
        let scale = GeometryError::check_finite(scale)?;
        if scale == 0.0 {
            return Err(GeometryError::ZeroScale);
        }
        Ok(Self { scale, rule })
    }

    /// The number of pixels per point.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// The rounding rule.
    #[must_use]
    pub const fn rule(&self) -> RoundingRule {
        self.rule
    }

    /// Snaps a coordinate to the nearest pixel boundary for this scale.
    #[must_use]
    pub fn round(&self, value: f32) -> f32 {
        self.rule.apply(value * self.scale) / self.scale
    }

    /// Snaps each edge of a rectangle independently.
    #[must_use]
    pub fn round_rect(&self, rect: Rect) -> Rect {
        Rect::from_edges(
            self.round(rect.min_x()),
            self.round(rect.min_y()),
            self.round(rect.max_x()),
            self.round(rect.max_y()),
        )
    }

    /// Rounds a frame expressed relative to its parent.
    ///
    /// Returns the rounded frame, relative to the parent's rounded origin, and
    /// the context to hand to this frame's children.
    #[must_use]
    pub fn round_frame(&self, frame: Rect, parent: RoundingContext) -> (Rect, RoundingContext) {
        let absolute = frame.offset_by(parent.unrounded_origin());
        let snapped = self.round_rect(absolute);
        let local = snapped.offset_by(Point::zero() - parent.origin);
        let context = RoundingContext {
            origin: snapped.origin(),
            correction: snapped.origin() - absolute.origin(),
        };
        (local, context)
    }
}

/// Rounding state carried from a parent frame to its children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundingContext {
    /// The parent's rounded absolute origin.
    pub origin: Point,
    /// How far rounding moved the parent's origin.
    pub correction: Point,
}

impl RoundingContext {
    /// The parent's absolute origin before rounding.
    #[must_use]
    pub fn unrounded_origin(&self) -> Point {
        self.origin - self.correction
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::Size;

    #[test]
    fn rounds_to_pixel_grid() {
        let scale = RoundingScale::new(2.0);
        assert_eq!(scale.round(1.3), 1.5);
        assert_eq!(scale.round(1.2), 1.0);
        assert_eq!(RoundingScale::new(3.0).round(1.0 / 3.0), 1.0 / 3.0);
    }

    #[test]
    fn rules_differ_on_ties() {
        let even = RoundingScale::try_new(1.0, RoundingRule::ToNearestOrEven).unwrap();
        let away = RoundingScale::new(1.0);
        assert_eq!(even.round(2.5), 2.0);
        assert_eq!(away.round(2.5), 3.0);
        let up = RoundingScale::try_new(1.0, RoundingRule::Up).unwrap();
        let down = RoundingScale::try_new(1.0, RoundingRule::Down).unwrap();
        assert_eq!(up.round(2.1), 3.0);
        assert_eq!(down.round(2.9), 2.0);
    }

    #[test]
    fn invalid_scales_are_rejected() {
        assert_eq!(
            RoundingScale::try_new(0.0, RoundingRule::Up),
            Err(GeometryError::ZeroScale)
        );
        assert!(RoundingScale::try_new(f32::NAN, RoundingRule::Up).is_err());
        assert!(RoundingScale::try_new(-2.0, RoundingRule::Up).is_err());
    }

    #[test]
    fn child_edges_are_absolute() {
        let scale = RoundingScale::new(1.0);
        let (parent, context) = scale.round_frame(
            Rect::new(Point::new(0.3, 0.0), Size::new(10.0, 10.0)),
            RoundingContext::default(),
        );
        assert_eq!(parent, Rect::from_edges(0.0, 0.0, 10.0, 10.0));

        // Absolute child edges are 0.3 + 4.4 = 4.7 and 0.3 + 9.6 = 9.9.
        let (child, _) = scale.round_frame(
            Rect::new(Point::new(4.4, 0.0), Size::new(5.2, 10.0)),
            context,
        );
        assert_eq!(child, Rect::from_edges(5.0, 0.0, 10.0, 10.0));
    }

    proptest! {
        #[test]
        fn nested_edges_stay_within_half_a_pixel(
            frames in prop::collection::vec((0.0f32..50.0, 0.0f32..50.0, 0.0f32..100.0), 1..8),
            scale in prop::sample::select(vec![1.0f32, 2.0, 3.0]),
        ) {
            let scale = RoundingScale::new(scale);
            let tolerance = 0.5 / scale.scale() + 1e-3;
            let mut context = RoundingContext::default();
            let mut exact = Point::zero();

            for (x, y, length) in frames {
                let frame = Rect::new(Point::new(x, y), Size::new(length, length));
                let (local, child) = scale.round_frame(frame, context);

                let exact_origin = Point::new(exact.x + x, exact.y + y);
                let min_x = context.origin.x + local.min_x();
                let max_x = context.origin.x + local.max_x();
                let min_y = context.origin.y + local.min_y();
                prop_assert!((min_x - exact_origin.x).abs() <= tolerance);
                prop_assert!((max_x - (exact_origin.x + length)).abs() <= tolerance);
                prop_assert!((min_y - exact_origin.y).abs() <= tolerance);

                exact = exact_origin;
                context = child;
            }
        }
    }
}
