//! Furniture footprints, hit-testing and drag clamping

use super::transform::PlanTransform;
use crate::catalog::CatalogLookup;
use crate::design::{Design, FurnitureInstance, InstanceId, Room};
use crate::rasterizer::Color;

/// Screen-space rotated rectangle for one placed item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center_x: f32,
    pub center_y: f32,
    pub half_w: f32,
    pub half_d: f32,
    /// Radians, clockwise on screen
    pub angle: f32,
}

impl Footprint {
    pub fn of(item: &FurnitureInstance, catalog: &dyn CatalogLookup, transform: &PlanTransform) -> Option<Self> {
        let entry = catalog.get(&item.catalog_id)?;
        let (cx, cy) = transform.to_screen(item.x, item.y);
        Some(Self {
            center_x: cx,
            center_y: cy,
            half_w: entry.dimensions.width * item.scale * transform.zoom * 0.5,
            half_d: entry.dimensions.depth * item.scale * transform.zoom * 0.5,
            angle: item.rotation.to_radians(),
        })
    }

    pub fn corners(&self) -> [(f32, f32); 4] {
        let (sin, cos) = self.angle.sin_cos();
        let place = |lx: f32, ly: f32| {
            (
                self.center_x + lx * cos - ly * sin,
                self.center_y + lx * sin + ly * cos,
            )
        };
        [
            place(-self.half_w, -self.half_d),
            place(self.half_w, -self.half_d),
            place(self.half_w, self.half_d),
            place(-self.half_w, self.half_d),
        ]
    }

    /// Inverse-rotate the pointer into the rectangle frame
    pub fn contains(&self, px: f32, py: f32) -> bool {
        let dx = px - self.center_x;
        let dy = py - self.center_y;
        let (sin, cos) = self.angle.sin_cos();
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;
        lx.abs() <= self.half_w && ly.abs() <= self.half_d
    }
}

/// Topmost item under the pointer. Later items draw on top, so search backwards.
pub fn hit_test(
    design: &Design,
    catalog: &dyn CatalogLookup,
    transform: &PlanTransform,
    px: f32,
    py: f32,
) -> Option<InstanceId> {
    design
        .furniture
        .iter()
        .rev()
        .find(|item| {
            Footprint::of(item, catalog, transform)
                .map(|f| f.contains(px, py))
                .unwrap_or(false)
        })
        .map(|item| item.instance_id)
}

/// Keep the unrotated, scaled half extents inside the room bounds
pub fn clamp_to_room(x: f32, y: f32, half_w: f32, half_d: f32, room: &Room) -> (f32, f32) {
    (
        half_w.max((room.width - half_w).min(x)),
        half_d.max((room.depth - half_d).min(y)),
    )
}

/// Fill color for an item, never white-on-white
pub fn visible_color(color: Option<&str>) -> Color {
    match color.map(str::trim) {
        None | Some("") => Color::FALLBACK_GRAY,
        Some(c) => {
            let lower = c.to_ascii_lowercase();
            if matches!(lower.as_str(), "#ffffff" | "#fff" | "white") {
                Color::FALLBACK_GRAY
            } else {
                Color::from_hex_or(c, Color::FALLBACK_GRAY)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn design_with(items: Vec<FurnitureInstance>) -> Design {
        let mut design = Design::blank("tester");
        design.room.width = 500.0;
        design.room.depth = 400.0;
        design.furniture = items;
        design
    }

    #[test]
    fn test_rotated_rect_contains() {
        let f = Footprint { center_x: 0.0, center_y: 0.0, half_w: 50.0, half_d: 10.0, angle: 0.0 };
        assert!(f.contains(45.0, 0.0));
        assert!(!f.contains(0.0, 45.0));

        let turned = Footprint { angle: 90f32.to_radians(), ..f };
        assert!(!turned.contains(45.0, 0.0));
        assert!(turned.contains(0.0, 45.0));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let catalog = Catalog::builtin();
        let id = catalog.entries()[0].id.clone();
        let design = design_with(vec![
            FurnitureInstance::new(InstanceId(1), id.clone(), 100.0, 100.0),
            FurnitureInstance::new(InstanceId(2), id, 100.0, 100.0),
        ]);
        let t = PlanTransform::fit(500.0, 400.0, &design.room, 1.0);
        assert_eq!(hit_test(&design, &catalog, &t, 100.0, 100.0), Some(InstanceId(2)));
        assert_eq!(hit_test(&design, &catalog, &t, 480.0, 380.0), None);
    }

    #[test]
    fn test_hit_test_skips_unknown_catalog_ids() {
        let catalog = Catalog::builtin();
        let design = design_with(vec![FurnitureInstance::new(InstanceId(1), "missing", 100.0, 100.0)]);
        let t = PlanTransform::fit(500.0, 400.0, &design.room, 1.0);
        assert_eq!(hit_test(&design, &catalog, &t, 100.0, 100.0), None);
    }

    #[test]
    fn test_clamp_keeps_half_width_clearance() {
        let room = Room { width: 120.0, depth: 300.0, ..Room::default() };
        assert_eq!(clamp_to_room(200.0, 150.0, 25.0, 25.0, &room), (95.0, 150.0));
        assert_eq!(clamp_to_room(-40.0, -5.0, 25.0, 25.0, &room), (25.0, 25.0));
        // Items larger than the room pin to their half extent
        assert_eq!(clamp_to_room(60.0, 10.0, 80.0, 10.0, &room).0, 80.0);
    }

    #[test]
    fn test_visible_color() {
        assert_eq!(visible_color(None), Color::FALLBACK_GRAY);
        assert_eq!(visible_color(Some("#FFFFFF")), Color::FALLBACK_GRAY);
        assert_eq!(visible_color(Some("#fff")), Color::FALLBACK_GRAY);
        assert_eq!(visible_color(Some("White")), Color::FALLBACK_GRAY);
        assert_eq!(visible_color(Some("#8B4513")), Color::new(0x8B, 0x45, 0x13));
        assert_eq!(visible_color(Some("not a color")), Color::FALLBACK_GRAY);
    }
}
