//! Room plane to canvas pixel mapping

use crate::design::{Room, RoomShape};

pub const MIN_ZOOM: f32 = 0.2;
pub const MAX_ZOOM: f32 = 1.5;
pub const ZOOM_STEP: f32 = 0.1;

pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        MIN_ZOOM
    }
}

/// Centers the room inside a canvas at a fixed pixels-per-centimeter scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanTransform {
    pub offset_x: f32,
    pub offset_y: f32,
    pub zoom: f32,
}

impl PlanTransform {
    pub fn fit(canvas_width: f32, canvas_height: f32, room: &Room, zoom: f32) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            offset_x: (canvas_width - room.width * zoom) * 0.5,
            offset_y: (canvas_height - room.depth * zoom) * 0.5,
            zoom,
        }
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (self.offset_x + x * self.zoom, self.offset_y + y * self.zoom)
    }

    #[cfg(test)]
    pub fn to_plane(&self, sx: f32, sy: f32) -> (f32, f32) {
        ((sx - self.offset_x) / self.zoom, (sy - self.offset_y) / self.zoom)
    }

    /// Screen-space outline of the room floor
    pub fn room_outline(&self, room: &Room) -> Vec<(f32, f32)> {
        room_polygon(room)
            .into_iter()
            .map(|(x, y)| self.to_screen(x, y))
            .collect()
    }
}

/// Floor outline in room coordinates
pub fn room_polygon(room: &Room) -> Vec<(f32, f32)> {
    let (w, d) = (room.width, room.depth);
    match room.shape {
        RoomShape::Rectangle | RoomShape::Square => vec![(0.0, 0.0), (w, 0.0), (w, d), (0.0, d)],
        RoomShape::LShaped => {
            let (notch_x, notch_y) = (w * 2.0 / 5.0, d * 3.0 / 5.0);
            vec![(0.0, 0.0), (w, 0.0), (w, notch_y), (notch_x, notch_y), (notch_x, d), (0.0, d)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_is_centered() {
        let room = Room { width: 400.0, depth: 200.0, ..Room::default() };
        let t = PlanTransform::fit(800.0, 600.0, &room, 1.0);
        assert_eq!(t.to_screen(0.0, 0.0), (200.0, 200.0));
        assert_eq!(t.to_screen(400.0, 200.0), (600.0, 400.0));
        assert_eq!(t.to_plane(600.0, 400.0), (400.0, 200.0));
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(clamp_zoom(0.05), MIN_ZOOM);
        assert_eq!(clamp_zoom(4.0), MAX_ZOOM);
        assert_eq!(clamp_zoom(f32::NAN), MIN_ZOOM);
        let t = PlanTransform::fit(100.0, 100.0, &Room::default(), 9.0);
        assert_eq!(t.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_l_shape_outline() {
        let room = Room { width: 500.0, depth: 400.0, shape: RoomShape::LShaped, ..Room::default() };
        let poly = room_polygon(&room);
        assert_eq!(poly.len(), 6);
        let expected = [(500.0, 240.0), (200.0, 240.0), (200.0, 400.0)];
        for (got, want) in poly[2..5].iter().zip(expected) {
            assert!((got.0 - want.0).abs() < 1e-3 && (got.1 - want.1).abs() < 1e-3, "{:?} != {:?}", got, want);
        }
    }
}
