//! Spawn placement with overlap rejection
//!
//! Bounded random search: candidates are drawn uniformly over the placeable
//! area and the first one whose spacing-inflated box clears every existing
//! item wins. Running out of attempts is a normal outcome on a crowded field.

use glam::Vec2;
use rand::Rng;

use super::bounds::Bounds;
use super::state::SpawnedItem;

/// Where and how big the new item is allowed to be
#[derive(Debug, Clone, Copy)]
pub struct PlacementArea {
    /// Top-left of the placeable area
    pub origin: Vec2,
    /// Span available to the item's top-left corner (both components > 0)
    pub range: Vec2,
    /// Item side length in pixels
    pub size: f32,
    /// Margin added around every box before the overlap test
    pub spacing: f32,
}

impl PlacementArea {
    /// Spacing-inflated box of a candidate position
    pub fn candidate_bounds(&self, pos: Vec2) -> Bounds {
        Bounds::square(pos, self.size).inflate(self.spacing)
    }

    /// Whether a candidate at `pos` keeps clear of all `items`
    pub fn is_clear(&self, pos: Vec2, items: &[SpawnedItem]) -> bool {
        let candidate = self.candidate_bounds(pos);
        !items
            .iter()
            .any(|existing| candidate.overlaps(&existing.bounds(self.spacing)))
    }
}

/// Try up to `attempts` random positions; `None` if every one collides
pub fn find_position<R: Rng + ?Sized>(
    rng: &mut R,
    area: &PlacementArea,
    items: &[SpawnedItem],
    attempts: u32,
) -> Option<Vec2> {
    for _ in 0..attempts {
        let pos = Vec2::new(
            area.origin.x + rng.random::<f32>() * area.range.x,
            area.origin.y + rng.random::<f32>() * area.range.y,
        );
        if area.is_clear(pos, items) {
            return Some(pos);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ItemKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn item(id: u32, x: f32, y: f32) -> SpawnedItem {
        SpawnedItem {
            id,
            kind: ItemKind::Seed,
            size: 72.0,
            pos: Vec2::new(x, y),
            spawned_at_ms: 0,
        }
    }

    fn area() -> PlacementArea {
        PlacementArea {
            origin: Vec2::new(24.0, 24.0),
            range: Vec2::new(280.0, 464.0),
            size: 72.0,
            spacing: 12.0,
        }
    }

    #[test]
    fn test_empty_field_places_within_area() {
        let mut rng = Pcg32::seed_from_u64(7);
        let area = area();
        let pos = find_position(&mut rng, &area, &[], 24).expect("empty field must place");
        assert!(pos.x >= area.origin.x && pos.x <= area.origin.x + area.range.x);
        assert!(pos.y >= area.origin.y && pos.y <= area.origin.y + area.range.y);
    }

    #[test]
    fn test_spacing_counts_on_both_sides() {
        let area = area();
        let existing = [item(0, 100.0, 100.0)];
        // 20px gap between boxes is less than 12px + 12px of spacing
        assert!(!area.is_clear(Vec2::new(192.0, 100.0), &existing));
        // 24px gap exactly touches, which is clear
        assert!(area.is_clear(Vec2::new(196.0, 100.0), &existing));
    }

    #[test]
    fn test_blocked_field_gives_up() {
        let mut rng = Pcg32::seed_from_u64(11);
        // A single tiny area fully covered by one item
        let area = PlacementArea {
            origin: Vec2::new(24.0, 24.0),
            range: Vec2::new(4.0, 4.0),
            size: 72.0,
            spacing: 12.0,
        };
        let existing = [item(0, 26.0, 26.0)];
        assert_eq!(find_position(&mut rng, &area, &existing, 24), None);
    }

    #[test]
    fn test_zero_attempts_never_places() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(find_position(&mut rng, &area(), &[], 0), None);
    }
}
