//! Mouse-ray picking of annotation markers and tooltip state.

use glam::Vec3;

use crate::camera::OrbitCamera;

/// A point of interest on the model, pickable as a small sphere.
#[derive(Debug, Clone)]
pub struct Marker {
    /// Marker center in world space.
    pub position: Vec3,
    /// Text shown when the marker is hovered.
    pub label: String,
    /// Radius of the pickable sphere.
    pub radius: f32,
}

impl Marker {
    /// Create a marker with the default visual radius.
    pub fn new(position: Vec3, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
            radius: MARKER_RADIUS,
        }
    }
}

/// Sphere radius shared by marker rendering and picking.
pub const MARKER_RADIUS: f32 = 0.05;

/// A ray in world space.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Normalized ray direction.
    pub dir: Vec3,
}

/// Result of a marker pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerHit {
    /// Index of the marker in registration order.
    pub index: usize,
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
}

/// Convert a cursor position to a world-space ray through the camera.
///
/// `screen_pos` is in physical pixels with origin at the top-left;
/// `screen_size` is the current viewport in pixels.
pub fn screen_to_ray(screen_pos: (f32, f32), screen_size: (u32, u32), camera: &OrbitCamera) -> Ray {
    // Normalized device coordinates (-1 to 1), Y flipped
    let x = (2.0 * screen_pos.0) / screen_size.0 as f32 - 1.0;
    let y = 1.0 - (2.0 * screen_pos.1) / screen_size.1 as f32;

    // Unproject an arbitrary point on the pick ray back to world space
    let inv_view_proj = camera.view_projection_matrix().inverse();
    let world_point = inv_view_proj.project_point3(Vec3::new(x, y, 0.5));

    let origin = camera.eye();
    Ray {
        origin,
        dir: (world_point - origin).normalize(),
    }
}

/// Test a ray against a sphere.
///
/// Returns the distance to the nearest intersection in front of the ray
/// origin, or None if the ray misses or the sphere is entirely behind it.
pub fn ray_sphere_intersection(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - c;

    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    if near >= 0.0 {
        return Some(near);
    }

    // Origin inside the sphere still counts as a hit
    let far = -b + sqrt_d;
    if far >= 0.0 {
        return Some(far);
    }

    None
}

/// Find the first marker (in registration order) the ray intersects.
///
/// Later markers are not tested once a hit is found.
pub fn pick_marker(markers: &[Marker], ray: &Ray) -> Option<MarkerHit> {
    for (index, marker) in markers.iter().enumerate() {
        if let Some(distance) = ray_sphere_intersection(ray, marker.position, marker.radius) {
            return Some(MarkerHit { index, distance });
        }
    }
    None
}

/// Screen-space tooltip anchored to the pointer.
#[derive(Debug, Clone, Default)]
pub struct Tooltip {
    /// Whether the tooltip is currently shown.
    pub visible: bool,
    /// Tooltip text (the hovered marker's label).
    pub text: String,
    /// Anchor position in physical pixels.
    pub screen_pos: (f32, f32),
}

/// Offset from the cursor so the tooltip does not sit under it.
pub const TOOLTIP_OFFSET: (f32, f32) = (12.0, 12.0);

impl Tooltip {
    /// Create a hidden tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the outcome of one hover pick.
    ///
    /// State is set exactly once per event: a hit shows the hovered marker's
    /// label at the cursor, no hit hides the tooltip.
    pub fn apply_hover(&mut self, hovered: Option<&Marker>, cursor: (f32, f32)) {
        match hovered {
            Some(marker) => {
                self.text.clear();
                self.text.push_str(&marker.label);
                self.screen_pos = (cursor.0 + TOOLTIP_OFFSET.0, cursor.1 + TOOLTIP_OFFSET.1);
                self.visible = true;
            }
            None => {
                self.visible = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> OrbitCamera {
        OrbitCamera::from_eye(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            75f32.to_radians(),
            16.0 / 9.0,
        )
    }

    #[test]
    fn test_ray_sphere_hit() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let distance = ray_sphere_intersection(&ray, Vec3::ZERO, 1.0);
        assert!(distance.is_some());
        assert!((distance.unwrap() - 4.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(ray_sphere_intersection(&ray, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_ray_sphere_behind_origin() {
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, 1.0),
        };
        // Sphere is behind the ray
        assert!(ray_sphere_intersection(&ray, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_ray_sphere_origin_inside() {
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let distance = ray_sphere_intersection(&ray, Vec3::ZERO, 1.0);
        assert!(distance.is_some());
        assert!((distance.unwrap() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_screen_center_ray_points_at_target() {
        let camera = test_camera();
        let ray = screen_to_ray((640.0, 360.0), (1280, 720), &camera);

        assert!((ray.origin - Vec3::new(0.0, 0.0, 5.0)).length() < 0.001);
        assert!((ray.dir - Vec3::new(0.0, 0.0, -1.0)).length() < 0.001);
    }

    #[test]
    fn test_screen_corner_rays_diverge() {
        let camera = test_camera();
        let top_left = screen_to_ray((0.0, 0.0), (1280, 720), &camera);
        let bottom_right = screen_to_ray((1280.0, 720.0), (1280, 720), &camera);

        assert!(top_left.dir.x < 0.0);
        assert!(top_left.dir.y > 0.0);
        assert!(bottom_right.dir.x > 0.0);
        assert!(bottom_right.dir.y < 0.0);
    }

    #[test]
    fn test_pick_first_marker_in_order_wins() {
        // Two markers stacked along the same ray
        let markers = vec![
            Marker::new(Vec3::new(0.0, 0.0, 1.0), "front"),
            Marker::new(Vec3::new(0.0, 0.0, -1.0), "back"),
        ];
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 5.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };

        let hit = pick_marker(&markers, &ray).expect("ray should hit");
        assert_eq!(hit.index, 0);

        // Order wins even when a later marker is closer to the origin
        let reversed = vec![markers[1].clone(), markers[0].clone()];
        let hit = pick_marker(&reversed, &ray).expect("ray should hit");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_pick_no_markers() {
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        assert!(pick_marker(&[], &ray).is_none());
    }

    #[test]
    fn test_tooltip_shows_label_then_hides() {
        let mut tooltip = Tooltip::new();
        let marker = Marker::new(Vec3::ZERO, "Casque de l'astronaute");

        tooltip.apply_hover(Some(&marker), (100.0, 200.0));
        assert!(tooltip.visible);
        assert_eq!(tooltip.text, "Casque de l'astronaute");
        assert_eq!(
            tooltip.screen_pos,
            (100.0 + TOOLTIP_OFFSET.0, 200.0 + TOOLTIP_OFFSET.1)
        );

        tooltip.apply_hover(None, (500.0, 500.0));
        assert!(!tooltip.visible);
    }
}
