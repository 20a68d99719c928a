use std::ops::Range;

use bevy::prelude::*;

/// Index of a point in the registry. Stable for the lifetime of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(pub usize);

impl PointId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One visualisable item after normalisation.
/// Fields are private so a registered position can never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    position: Vec3,
    image: String,
    title: String,
}

impl Point {
    pub fn new(position: Vec3, image: String, title: String) -> Self {
        Self {
            position,
            image,
            title,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Encoded image payload, decoded lazily by the billboard systems.
    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Append-only collection of every loaded point.
/// The chunk loader is the only writer; billboards and selection read it.
#[derive(Resource, Debug, Default)]
pub struct PointRegistry {
    points: Vec<Point>,
}

impl PointRegistry {
    /// Append a batch in order and return the ids it was assigned.
    pub fn append(&mut self, batch: Vec<Point>) -> Range<usize> {
        let start = self.points.len();
        self.points.extend(batch);
        start..self.points.len()
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points with ids in `range`, clamped to what is loaded.
    pub fn slice(&self, range: Range<usize>) -> impl Iterator<Item = (PointId, &Point)> {
        let end = range.end.min(self.points.len());
        let start = range.start.min(end);
        self.points[start..end]
            .iter()
            .enumerate()
            .map(move |(offset, point)| (PointId(start + offset), point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f32) -> Point {
        Point::new(Vec3::new(x, 0.0, 0.0), String::new(), format!("p{x}"))
    }

    #[test]
    fn append_assigns_sequential_ids() {
        let mut registry = PointRegistry::default();
        assert_eq!(registry.append(vec![point(0.0), point(1.0)]), 0..2);
        assert_eq!(registry.append(vec![point(2.0)]), 2..3);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.get(PointId(2)).map(Point::position),
            Some(Vec3::new(2.0, 0.0, 0.0))
        );
        assert!(registry.get(PointId(3)).is_none());
    }

    #[test]
    fn slice_clamps_to_loaded_points() {
        let mut registry = PointRegistry::default();
        registry.append(vec![point(0.0), point(1.0), point(2.0)]);

        let ids: Vec<PointId> = registry.slice(1..10).map(|(id, _)| id).collect();
        assert_eq!(ids, vec![PointId(1), PointId(2)]);
        assert_eq!(registry.slice(5..8).count(), 0);
    }
}
