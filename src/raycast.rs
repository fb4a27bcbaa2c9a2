use crate::config::{DELTA_ANGLE, FOV, MAX_DEPTH, STEP_SIZE, TILE_SIZE};
use crate::movement::Pose;
use crate::world::WorldGrid;

/// Which boundary of the surface-point cell the ray crosses into the
/// wall. Named from the empty cell the ray is leaving: a ray travelling
/// in +x strikes a wall to its east through that cell's `Right` face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
}

/// Result of one ray march. Transient; produced and consumed within a
/// single column render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Depth along the ray at the first solid sample, not back-tracked.
    pub depth: f32,
    /// Perpendicular (camera-plane) depth after fisheye correction.
    pub corrected_depth: f32,
    pub face: Face,
    /// Where along the face the ray crossed, in [0, TILE_SIZE).
    pub offset: f32,
}

/// Angle of ray `ray` (0..NUM_RAYS) fanned across the field of view
/// centered on `heading`.
pub fn ray_angle(heading: f32, ray: usize) -> f32 {
    heading - FOV / 2.0 + ray as f32 * DELTA_ANGLE
}

/// Marches from the pose along `angle` in STEP_SIZE increments until the
/// first solid sample, up to MAX_DEPTH. Pure function of its arguments;
/// identical inputs give bit-identical hits.
pub fn cast(grid: &WorldGrid, pose: &Pose, angle: f32) -> Option<RayHit> {
    let (sin, cos) = angle.sin_cos();
    let steps = (MAX_DEPTH / STEP_SIZE) as u32;

    for step in 0..steps {
        let depth = step as f32 * STEP_SIZE;
        let x = pose.x + depth * cos;
        let y = pose.y + depth * sin;
        if !grid.is_solid(x, y) {
            continue;
        }

        // Back up one step to a surface point just outside the wall.
        let back = (depth - STEP_SIZE).max(0.0);
        let sx = pose.x + back * cos;
        let sy = pose.y + back * sin;
        let local_x = sx.rem_euclid(TILE_SIZE);
        let local_y = sy.rem_euclid(TILE_SIZE);

        let face = nearest_face(local_x, local_y);
        let offset = match face {
            Face::Left | Face::Right => sy.rem_euclid(TILE_SIZE),
            Face::Top | Face::Bottom => sx.rem_euclid(TILE_SIZE),
        };

        return Some(RayHit {
            depth,
            corrected_depth: depth * (pose.heading - angle).cos(),
            face,
            offset,
        });
    }

    None
}

/// Nearest cell boundary to the surface point, with fixed
/// left -> right -> top -> bottom priority on ties.
fn nearest_face(local_x: f32, local_y: f32) -> Face {
    let to_left = local_x;
    let to_right = TILE_SIZE - local_x;
    let to_top = local_y;
    let to_bottom = TILE_SIZE - local_y;
    let min = to_left.min(to_right).min(to_top).min(to_bottom);

    if to_left == min {
        Face::Left
    } else if to_right == min {
        Face::Right
    } else if to_top == min {
        Face::Top
    } else {
        Face::Bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn ring3() -> WorldGrid {
        WorldGrid::parse("111\n101\n111\n").unwrap()
    }

    fn center_pose(heading: f32) -> Pose {
        Pose::new(1.5 * TILE_SIZE, 1.5 * TILE_SIZE, heading)
    }

    #[test]
    fn head_on_hit_depth_and_face() {
        let grid = ring3();
        let pose = center_pose(0.0);
        let hit = cast(&grid, &pose, 0.0).unwrap();

        // distance from the cell center to the east wall face is 40
        assert!((hit.depth - 40.0).abs() <= STEP_SIZE);
        assert_eq!(hit.face, Face::Right);
        // head-on ray crosses the face at the cell's vertical middle
        assert!((hit.offset - 40.0).abs() <= STEP_SIZE);
    }

    #[test]
    fn face_matches_ray_direction() {
        let grid = ring3();
        let pose = center_pose(0.0);
        assert_eq!(cast(&grid, &pose, 0.0).unwrap().face, Face::Right);
        assert_eq!(cast(&grid, &pose, PI).unwrap().face, Face::Left);
        assert_eq!(cast(&grid, &pose, FRAC_PI_2).unwrap().face, Face::Bottom);
        assert_eq!(cast(&grid, &pose, -FRAC_PI_2).unwrap().face, Face::Top);
    }

    #[test]
    fn fisheye_correction_is_identity_on_the_view_axis() {
        let grid = ring3();
        let pose = center_pose(0.7);
        let hit = cast(&grid, &pose, 0.7).unwrap();
        assert_eq!(hit.corrected_depth, hit.depth);
    }

    #[test]
    fn off_axis_ray_has_shorter_corrected_depth() {
        let grid = ring3();
        let pose = center_pose(0.0);
        let hit = cast(&grid, &pose, 0.3).unwrap();
        assert!(hit.corrected_depth < hit.depth);
        assert!((hit.corrected_depth - hit.depth * 0.3f32.cos()).abs() < 1e-3);
    }

    #[test]
    fn no_wall_within_max_depth_is_no_hit() {
        // single empty cell; everything beyond is out of bounds
        let grid = WorldGrid::parse("0\n").unwrap();
        let pose = Pose::new(0.5 * TILE_SIZE, 0.5 * TILE_SIZE, 0.0);
        assert_eq!(cast(&grid, &pose, 0.0), None);
    }

    #[test]
    fn cast_is_idempotent() {
        let grid = ring3();
        let pose = center_pose(0.25);
        let first = cast(&grid, &pose, 0.4).unwrap();
        let second = cast(&grid, &pose, 0.4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn ray_fan_spans_the_field_of_view() {
        assert_eq!(ray_angle(0.0, 0), -FOV / 2.0);
        let last = ray_angle(0.0, crate::config::NUM_RAYS - 1);
        assert!((last - (FOV / 2.0 - DELTA_ANGLE)).abs() < 1e-6);
    }

    #[test]
    fn offset_stays_within_tile() {
        let grid = ring3();
        let pose = center_pose(0.0);
        for ray in 0..crate::config::NUM_RAYS {
            if let Some(hit) = cast(&grid, &pose, ray_angle(pose.heading, ray)) {
                assert!((0.0..TILE_SIZE).contains(&hit.offset));
            }
        }
    }
}
