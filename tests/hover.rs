//! End-to-end hover scenarios over camera + scene + picking, no GPU needed.

use astroview::{pick_marker, screen_to_ray, ModelSource, OrbitCamera, SceneState, Tooltip};
use glam::{Vec3, Vec4Swizzles};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

/// Camera matching the viewer's startup pose: eye (3, 3, 5) looking at the origin.
fn startup_camera() -> OrbitCamera {
    OrbitCamera::from_eye(
        Vec3::new(3.0, 3.0, 5.0),
        Vec3::ZERO,
        75f32.to_radians(),
        WIDTH as f32 / HEIGHT as f32,
    )
}

/// Project a world point to screen pixels through the camera.
fn project_to_screen(camera: &OrbitCamera, point: Vec3) -> (f32, f32) {
    let clip = camera.view_projection_matrix() * point.extend(1.0);
    let ndc = clip.xyz() / clip.w;
    (
        (ndc.x + 1.0) * 0.5 * WIDTH as f32,
        (1.0 - ndc.y) * 0.5 * HEIGHT as f32,
    )
}

fn ready_scene() -> SceneState {
    // A ready scene needs some mesh; its content is irrelevant to picking
    let mesh = astroview::uv_sphere(1.0, 8, 6, [1.0; 4]);
    SceneState::from_load_result(&ModelSource::default(), Ok(vec![mesh]))
}

#[test]
fn hovering_the_helmet_marker_shows_its_label() {
    let camera = startup_camera();
    let scene = ready_scene();
    let mut tooltip = Tooltip::new();

    let cursor = project_to_screen(&camera, Vec3::new(0.0, 1.8, 0.4));
    let ray = screen_to_ray(cursor, (WIDTH, HEIGHT), &camera);

    let markers = scene.markers();
    let hovered = pick_marker(markers, &ray).map(|hit| &markers[hit.index]);
    tooltip.apply_hover(hovered, cursor);

    assert!(tooltip.visible);
    assert_eq!(tooltip.text, "Casque de l'astronaute");
}

#[test]
fn pointer_far_from_markers_hides_the_tooltip() {
    let camera = startup_camera();
    let scene = ready_scene();
    let mut tooltip = Tooltip::new();

    // Start visible to check the event overwrites prior state
    let markers = scene.markers();
    tooltip.apply_hover(Some(&markers[0]), (0.0, 0.0));
    assert!(tooltip.visible);

    let cursor = (5.0, 5.0); // top-left corner, far from both markers
    let ray = screen_to_ray(cursor, (WIDTH, HEIGHT), &camera);
    let hovered = pick_marker(markers, &ray).map(|hit| &markers[hit.index]);
    tooltip.apply_hover(hovered, cursor);

    assert!(!tooltip.visible);
}

#[test]
fn every_offscreen_corner_misses_both_markers() {
    let camera = startup_camera();
    let scene = ready_scene();
    let markers = scene.markers();

    for cursor in [
        (1.0, 1.0),
        (WIDTH as f32 - 1.0, 1.0),
        (1.0, HEIGHT as f32 - 1.0),
        (WIDTH as f32 - 1.0, HEIGHT as f32 - 1.0),
    ] {
        let ray = screen_to_ray(cursor, (WIDTH, HEIGHT), &camera);
        assert!(
            pick_marker(markers, &ray).is_none(),
            "corner {cursor:?} should not hover any marker"
        );
    }
}

#[test]
fn overlapping_markers_resolve_to_registration_order() {
    use astroview::Marker;

    let camera = startup_camera();

    // Both markers at the same position: whichever is registered first wins
    let position = Vec3::new(0.0, 1.0, 0.0);
    let markers = vec![
        Marker::new(position, "first"),
        Marker::new(position, "second"),
    ];

    let cursor = project_to_screen(&camera, position);
    let ray = screen_to_ray(cursor, (WIDTH, HEIGHT), &camera);
    let hit = pick_marker(&markers, &ray).expect("overlapping markers should be hit");

    assert_eq!(hit.index, 0);
    assert_eq!(markers[hit.index].label, "first");
}

#[test]
fn resize_updates_aspect_ratio_only() {
    let mut camera = startup_camera();
    let scene = ready_scene();
    let mut tooltip = Tooltip::new();
    tooltip.apply_hover(Some(&scene.markers()[0]), (10.0, 10.0));
    let markers_before: Vec<Vec3> = scene.markers().iter().map(|m| m.position).collect();

    camera.set_aspect(1920.0 / 1080.0);

    assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    let markers_after: Vec<Vec3> = scene.markers().iter().map(|m| m.position).collect();
    assert_eq!(markers_before, markers_after);
    assert!(tooltip.visible, "resize must not touch tooltip state");
}

#[test]
fn failed_load_never_shows_a_tooltip() {
    let camera = startup_camera();
    let scene = SceneState::from_load_result(
        &ModelSource::default(),
        Err(anyhow::anyhow!("network error")),
    );
    let mut tooltip = Tooltip::new();

    assert!(scene.markers().is_empty());

    // Sweep the cursor across the screen; nothing can ever be hovered
    for x in (0..WIDTH).step_by(64) {
        for y in (0..HEIGHT).step_by(64) {
            let cursor = (x as f32, y as f32);
            let ray = screen_to_ray(cursor, (WIDTH, HEIGHT), &camera);
            let markers = scene.markers();
            let hovered = pick_marker(markers, &ray).map(|hit| &markers[hit.index]);
            tooltip.apply_hover(hovered, cursor);
            assert!(!tooltip.visible);
        }
    }
}
