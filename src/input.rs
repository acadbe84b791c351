//! Drag-release resolution
//!
//! The UI reports where an item's center was when the finger lifted; this
//! decides what that release means for the game.

use glam::Vec2;

use crate::sim::{Bounds, ItemKind};

/// What a release should do to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Seed fed to the chick
    Success,
    /// Wrong item fed, or a seed dropped on the ground
    Mistake,
    /// Wrong item thrown away - fine
    Discard,
}

/// Mouth hit region: the chick's measured bounds plus a forgiving margin
pub fn mouth_hit_region(chick_bounds: Bounds, margin_px: f32) -> Bounds {
    chick_bounds.inflate(margin_px)
}

/// Classify a release of `kind` centered at `center`
///
/// `mouth` is `None` until the chick has been laid out; every release
/// counts as outside until then.
pub fn resolve_release(kind: ItemKind, center: Vec2, mouth: Option<&Bounds>) -> ReleaseOutcome {
    let in_mouth = mouth.is_some_and(|m| m.contains(center));
    match (in_mouth, kind.is_correct()) {
        (true, true) => ReleaseOutcome::Success,
        (true, false) => ReleaseOutcome::Mistake,
        (false, true) => ReleaseOutcome::Mistake,
        (false, false) => ReleaseOutcome::Discard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouth() -> Bounds {
        mouth_hit_region(Bounds::new(Vec2::new(100.0, 600.0), Vec2::new(300.0, 800.0)), 16.0)
    }

    #[test]
    fn test_resolution_table() {
        let m = mouth();
        let inside = Vec2::new(200.0, 700.0);
        let outside = Vec2::new(20.0, 20.0);

        assert_eq!(resolve_release(ItemKind::Seed, inside, Some(&m)), ReleaseOutcome::Success);
        assert_eq!(resolve_release(ItemKind::Rock, inside, Some(&m)), ReleaseOutcome::Mistake);
        assert_eq!(resolve_release(ItemKind::Frog, inside, Some(&m)), ReleaseOutcome::Mistake);
        assert_eq!(resolve_release(ItemKind::Seed, outside, Some(&m)), ReleaseOutcome::Mistake);
        assert_eq!(resolve_release(ItemKind::Frog, outside, Some(&m)), ReleaseOutcome::Discard);
    }

    #[test]
    fn test_margin_extends_mouth() {
        let m = mouth();
        // 10px left of the chick, inside the 16px margin
        assert_eq!(
            resolve_release(ItemKind::Seed, Vec2::new(90.0, 700.0), Some(&m)),
            ReleaseOutcome::Success
        );
        assert_eq!(
            resolve_release(ItemKind::Seed, Vec2::new(80.0, 700.0), Some(&m)),
            ReleaseOutcome::Mistake
        );
    }

    #[test]
    fn test_unmeasured_mouth_is_outside() {
        assert_eq!(
            resolve_release(ItemKind::Seed, Vec2::new(200.0, 700.0), None),
            ReleaseOutcome::Mistake
        );
        assert_eq!(
            resolve_release(ItemKind::Rock, Vec2::new(200.0, 700.0), None),
            ReleaseOutcome::Discard
        );
    }
}
