//! Point-to-string proximity detection.
//!
//! Detection runs every frame over the full cross product of points and
//! strings, O(P·L). Scenes hold a handful of instruments so this is cheap, but
//! it is the engine's scalability ceiling: there is no spatial index.

use crate::geometry::Vec2;

/// Segments shorter than this are treated as a single point.
pub const DEGENERATE_SEGMENT_EPSILON: f32 = 0.001;

/// Shortest distance from `point` to the segment `start..end`.
///
/// The projection onto the infinite line is clamped to the segment, so points
/// beyond either end measure to that endpoint.
pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length = segment.length();
    if length < DEGENERATE_SEGMENT_EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / (length * length)).clamp(0.0, 1.0);
    let closest = start + segment * t;
    point.distance(closest)
}

/// Interaction strength for a distance: `clamp(1 - distance / radius, 0, 1)`.
///
/// A non-positive radius never interacts.
pub fn strength(distance: f32, radius: f32) -> f32 {
    if !(radius > 0.0) || !distance.is_finite() {
        return 0.0;
    }
    (1.0 - distance / radius).clamp(0.0, 1.0)
}

/// One point touching one string this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    /// Index of the point in the slice passed to [`InteractionDetector::detect`].
    pub point: usize,
    /// Index of the string.
    pub string: usize,
    /// World position of the point.
    pub position: Vec2,
    /// Distance from the point to the string.
    pub distance: f32,
    /// Strength in `(0, 1]`.
    pub strength: f32,
}

impl Interaction {
    /// Falloff used for visual deformation: the square of the strength.
    pub fn deformation_influence(&self) -> f32 {
        self.strength * self.strength
    }
}

/// Finds every point within `detection_radius` of every string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionDetector {
    detection_radius: f32,
}

impl InteractionDetector {
    /// Creates a detector.
    pub fn new(detection_radius: f32) -> Self {
        Self { detection_radius }
    }

    /// Detection radius in world units.
    pub fn detection_radius(&self) -> f32 {
        self.detection_radius
    }

    /// Returns all interacting pairs, ordered by string then point.
    ///
    /// # Arguments
    /// * `points` - Point positions
    /// * `strings` - String segments as `(start, end)`
    pub fn detect(&self, points: &[Vec2], strings: &[(Vec2, Vec2)]) -> Vec<Interaction> {
        let mut interactions = Vec::new();
        for (string, &(start, end)) in strings.iter().enumerate() {
            for (point, &position) in points.iter().enumerate() {
                let distance = distance_to_segment(position, start, end);
                if distance < self.detection_radius {
                    interactions.push(Interaction {
                        point,
                        string,
                        position,
                        distance,
                        strength: strength(distance, self.detection_radius),
                    });
                }
            }
        }
        interactions
    }

    /// The strongest interaction per string; `None` for untouched strings.
    ///
    /// Ties keep the lower point index.
    pub fn strongest_per_string(
        &self,
        points: &[Vec2],
        strings: &[(Vec2, Vec2)],
    ) -> Vec<Option<Interaction>> {
        let mut strongest: Vec<Option<Interaction>> = vec![None; strings.len()];
        for interaction in self.detect(points, strings) {
            let slot = &mut strongest[interaction.string];
            match slot {
                Some(best) if best.strength >= interaction.strength => {}
                _ => *slot = Some(interaction),
            }
        }
        strongest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_at_midpoint_is_zero() {
        let d = distance_to_segment(Vec2::new(1.0, 1.0), Vec2::ZERO, Vec2::new(2.0, 2.0));
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_distance_perpendicular() {
        let d = distance_to_segment(Vec2::new(1.0, 3.0), Vec2::ZERO, Vec2::new(2.0, 0.0));
        assert!((d - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance_beyond_end_measures_to_endpoint() {
        let end = Vec2::new(2.0, 0.0);
        let point = Vec2::new(5.0, 4.0);
        let d = distance_to_segment(point, Vec2::ZERO, end);
        assert!((d - 5.0).abs() < 1e-6);
        // The infinite line would have said 4
        assert!(d > 4.0);
    }

    #[test]
    fn test_distance_before_start_measures_to_start() {
        let d = distance_to_segment(Vec2::new(-3.0, 4.0), Vec2::ZERO, Vec2::new(2.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment_uses_point_distance() {
        let p = Vec2::new(3.0, 4.0);
        let d = distance_to_segment(p, Vec2::ZERO, Vec2::new(0.0005, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_strength_falloff() {
        assert_eq!(strength(0.0, 2.0), 1.0);
        assert_eq!(strength(1.0, 2.0), 0.5);
        assert_eq!(strength(2.0, 2.0), 0.0);
        assert_eq!(strength(5.0, 2.0), 0.0);
        assert_eq!(strength(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_detect_cross_product() {
        let detector = InteractionDetector::new(1.0);
        let points = [Vec2::new(0.5, 0.5), Vec2::new(10.0, 10.0), Vec2::new(0.5, 3.2)];
        let strings = [
            (Vec2::ZERO, Vec2::new(1.0, 0.0)),
            (Vec2::new(0.0, 3.0), Vec2::new(1.0, 3.0)),
        ];

        let found = detector.detect(&points, &strings);
        assert_eq!(found.len(), 2);
        assert_eq!((found[0].string, found[0].point), (0, 0));
        assert_eq!((found[1].string, found[1].point), (1, 2));
        assert!((found[0].strength - 0.5).abs() < 1e-6);
        assert!((found[0].deformation_influence() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_strongest_per_string() {
        let detector = InteractionDetector::new(2.0);
        let points = [Vec2::new(0.5, 1.5), Vec2::new(0.5, 0.5)];
        let strings = [
            (Vec2::ZERO, Vec2::new(1.0, 0.0)),
            (Vec2::new(50.0, 0.0), Vec2::new(51.0, 0.0)),
        ];

        let strongest = detector.strongest_per_string(&points, &strings);
        assert_eq!(strongest[0].map(|i| i.point), Some(1));
        assert!(strongest[1].is_none());
    }
}
