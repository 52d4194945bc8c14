use glam::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Screen dimensions used to map control space (origin at the centre, y up)
/// into pointer space (origin at the top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSettings {
    pub size: Vec2,
    /// Scale applied to control space before projecting to the screen.
    pub ratio: f32,
}

impl ScreenSettings {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            ratio: 1.0,
        }
    }

    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn half(&self) -> Vec2 {
        self.size * 0.5
    }
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform2D {
    pub position: [f32; 3],
    /// Rotation around z in degrees.
    pub rotation: f32,
    pub scale: [f32; 3],
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: 0.0,
            scale: [1.0; 3],
        }
    }
}

impl Transform2D {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y, 0.0],
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from(self.scale),
            Quat::from_rotation_z(self.rotation.to_radians()),
            Vec3::from(self.position),
        )
    }
}

/// Convex quadrilateral in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quad {
    pub points: [Vec2; 4],
}

impl Quad {
    /// Points on an edge count as inside. The test only uses the sign of
    /// edge cross products so the answer is stable for a fixed quad.
    pub fn contains(&self, point: Vec2) -> bool {
        let mut positive = false;
        let mut negative = false;
        for index in 0..4 {
            let a = self.points[index];
            let b = self.points[(index + 1) % 4];
            let cross = (b - a).perp_dot(point - a);
            if cross > 0.0 {
                positive = true;
            } else if cross < 0.0 {
                negative = true;
            }
            if positive && negative {
                return false;
            }
        }
        true
    }
}

/// Projects a control's half extents through its world matrix into screen
/// space. Returns the quad and the projected centre.
pub fn screen_collision(world: &Mat4, half_extents: Vec2, screen: &ScreenSettings) -> (Quad, Vec2) {
    let ratio = screen.ratio;
    let invert_y = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0));
    let projection = invert_y * Mat4::from_scale(Vec3::new(ratio, ratio, 1.0)) * *world;
    let half_screen = screen.half();

    let corners = [
        Vec2::new(-half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, -half_extents.y),
        Vec2::new(half_extents.x, half_extents.y),
        Vec2::new(-half_extents.x, half_extents.y),
    ];
    let mut quad = Quad::default();
    for (slot, corner) in quad.points.iter_mut().zip(corners) {
        *slot = projection.transform_point3(corner.extend(0.0)).truncate() + half_screen;
    }
    let center = projection.transform_point3(Vec3::ZERO).truncate() + half_screen;
    (quad, center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenSettings {
        ScreenSettings::new(800.0, 600.0)
    }

    #[test]
    fn centred_control_maps_to_screen_centre() {
        let (quad, center) = screen_collision(&Mat4::IDENTITY, Vec2::new(50.0, 25.0), &screen());
        assert_eq!(center, Vec2::new(400.0, 300.0));
        assert!(quad.contains(Vec2::new(400.0, 300.0)));
        assert!(quad.contains(Vec2::new(449.0, 324.0)));
        assert!(!quad.contains(Vec2::new(451.0, 300.0)));
    }

    #[test]
    fn positive_y_moves_up_the_screen() {
        let world = Transform2D::at(100.0, 50.0).matrix();
        let (_, center) = screen_collision(&world, Vec2::new(10.0, 10.0), &screen());
        assert_eq!(center, Vec2::new(500.0, 250.0));
    }

    #[test]
    fn edge_points_classify_consistently() {
        let (quad, _) = screen_collision(&Mat4::IDENTITY, Vec2::new(50.0, 25.0), &screen());
        let edge = Vec2::new(350.0, 300.0);
        let first = quad.contains(edge);
        for _ in 0..100 {
            assert_eq!(quad.contains(edge), first);
        }
        assert!(first);
        assert!(!quad.contains(Vec2::new(349.9, 300.0)));
    }

    #[test]
    fn rotated_quad_still_hit_tests() {
        let mut transform = Transform2D::default();
        transform.rotation = 45.0;
        let (quad, _) = screen_collision(&transform.matrix(), Vec2::new(50.0, 50.0), &screen());
        assert!(quad.contains(Vec2::new(400.0, 300.0)));
        assert!(quad.contains(Vec2::new(400.0, 365.0)));
        assert!(!quad.contains(Vec2::new(445.0, 345.0)));
    }

    #[test]
    fn ratio_scales_the_projection() {
        let settings = screen().with_ratio(2.0);
        let (quad, _) = screen_collision(&Mat4::IDENTITY, Vec2::new(10.0, 10.0), &settings);
        assert!(quad.contains(Vec2::new(419.0, 300.0)));
        assert!(!quad.contains(Vec2::new(421.0, 300.0)));
    }
}
