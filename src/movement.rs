use crate::config::{MOVE_SPEED, TILE_SIZE, TURN_INCREMENT, WALL_GAP};
use crate::world::WorldGrid;

/// Viewpoint: continuous world position plus heading in radians. The
/// heading is rotation-only and may grow unbounded. Written once per
/// frame by [`advance`], read-only everywhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    pub heading: f32,
}

impl Pose {
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }
}

/// Held-key state sampled once per frame. Quit is a side channel owned
/// by the event loop and is not part of the pose update.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub forward: bool,
    pub backward: bool,
}

/// Applies one frame of input to the pose. Turning is independent of
/// translation and both turn keys may apply in the same frame. Forward
/// takes precedence over backward when both are held. Translation is
/// resolved against the grid with axis sliding; no input means no
/// displacement.
pub fn advance(pose: &mut Pose, input: &InputState, grid: &WorldGrid) {
    if input.turn_left {
        pose.heading -= TURN_INCREMENT;
    }
    if input.turn_right {
        pose.heading += TURN_INCREMENT;
    }

    let direction = if input.forward {
        1.0
    } else if input.backward {
        -1.0
    } else {
        return;
    };

    let dx = direction * MOVE_SPEED * pose.heading.cos();
    let dy = direction * MOVE_SPEED * pose.heading.sin();
    let (x, y) = slide(grid, pose.x, pose.y, dx, dy);
    pose.x = x;
    pose.y = y;
}

/// Sliding collision: try the full displacement, then the horizontal
/// component, then the vertical component, in that fixed order. A blocked
/// axis clamps flush against the wall face (minus WALL_GAP) instead of
/// stopping short, so an oversized step never tunnels into the wall and
/// ends exactly at the boundary. A horizontal attempt that only clamps
/// still falls through to the vertical component, so diagonal movement
/// into a wall keeps sliding along it.
pub fn slide(grid: &WorldGrid, x: f32, y: f32, dx: f32, dy: f32) -> (f32, f32) {
    if !grid.blocks_movement(x + dx, y + dy) {
        return (x + dx, y + dy);
    }
    let nx = axis_step(x, dx, |px| grid.blocks_movement(px, y));
    if dx != 0.0 && nx == x + dx {
        // horizontal slide applied in full
        return (nx, y);
    }
    let ny = axis_step(y, dy, |py| grid.blocks_movement(nx, py));
    (nx, ny)
}

/// Moves one coordinate by `delta`, clamping flush to the blocking cell
/// boundary when the destination is solid. Displacements are well below
/// TILE_SIZE, so a blocked destination is always in the adjacent cell.
fn axis_step(from: f32, delta: f32, blocked: impl Fn(f32) -> bool) -> f32 {
    if delta == 0.0 {
        return from;
    }
    let target = from + delta;
    if !blocked(target) {
        return target;
    }
    let flush = if delta > 0.0 {
        (target / TILE_SIZE).floor() * TILE_SIZE - WALL_GAP
    } else {
        ((target / TILE_SIZE).floor() + 1.0) * TILE_SIZE + WALL_GAP
    };
    // never move backward past the current position
    if (delta > 0.0 && flush > from) || (delta < 0.0 && flush < from) {
        flush
    } else {
        from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring3() -> WorldGrid {
        WorldGrid::parse("111\n101\n111\n").unwrap()
    }

    fn corridor() -> WorldGrid {
        // one open row, two cells wide
        WorldGrid::parse("1111\n1001\n1111\n").unwrap()
    }

    #[test]
    fn no_input_is_no_displacement() {
        let grid = ring3();
        let mut pose = Pose::new(120.0, 120.0, 0.3);
        advance(&mut pose, &InputState::default(), &grid);
        assert_eq!(pose, Pose::new(120.0, 120.0, 0.3));
    }

    #[test]
    fn turn_keys_apply_independently() {
        let grid = ring3();
        let mut pose = Pose::new(120.0, 120.0, 0.0);
        let input = InputState {
            turn_right: true,
            ..Default::default()
        };
        advance(&mut pose, &input, &grid);
        assert_eq!(pose.heading, TURN_INCREMENT);

        let both = InputState {
            turn_left: true,
            turn_right: true,
            ..Default::default()
        };
        advance(&mut pose, &both, &grid);
        assert_eq!(pose.heading, TURN_INCREMENT); // they cancel
    }

    #[test]
    fn forward_wins_over_backward() {
        let grid = corridor();
        let mut pose = Pose::new(120.0, 120.0, 0.0);
        let input = InputState {
            forward: true,
            backward: true,
            ..Default::default()
        };
        advance(&mut pose, &input, &grid);
        assert_eq!(pose.x, 120.0 + MOVE_SPEED);
        assert_eq!(pose.y, 120.0);
    }

    #[test]
    fn open_move_applies_full_displacement() {
        let grid = corridor();
        let (x, y) = slide(&grid, 120.0, 120.0, 5.0, 0.0);
        assert_eq!((x, y), (125.0, 120.0));
    }

    #[test]
    fn oversized_step_lands_flush_on_the_wall() {
        let grid = corridor();
        // east wall face at x = 240; remaining gap is 2 world units
        let (x, y) = slide(&grid, 238.0, 120.0, MOVE_SPEED, 0.0);
        assert_eq!(y, 120.0);
        assert_eq!(x, 240.0 - WALL_GAP);
        assert!(!grid.blocks_movement(x, y));
    }

    #[test]
    fn diagonal_block_slides_along_open_axis() {
        let grid = corridor();
        // northeast into the top wall: y blocked, x open
        let (x, y) = slide(&grid, 120.0, 80.0 + WALL_GAP, 3.0, -3.0);
        assert_eq!(x, 123.0);
        assert_eq!(y, 80.0 + WALL_GAP);
    }

    #[test]
    fn flush_corner_pose_is_unchanged() {
        let grid = ring3();
        // flush against both the east and south faces of the open cell
        let x0 = 160.0 - WALL_GAP;
        let y0 = 160.0 - WALL_GAP;
        let (x, y) = slide(&grid, x0, y0, 4.0, 4.0);
        assert_eq!((x, y), (x0, y0));
    }

    #[test]
    fn clamped_axis_still_slides_along_the_open_one() {
        let grid = corridor();
        // diagonal into the east wall: x clamps flush, y keeps its
        // full open component
        let (x, y) = slide(&grid, 238.0, 120.0, MOVE_SPEED, 3.0);
        assert_eq!(x, 240.0 - WALL_GAP);
        assert_eq!(y, 123.0);
    }

    #[test]
    fn backward_slide_clamps_too() {
        let grid = corridor();
        // west wall face at x = 80; moving backward with heading 0
        let (x, y) = slide(&grid, 82.0, 120.0, -MOVE_SPEED, 0.0);
        assert_eq!(y, 120.0);
        assert_eq!(x, 80.0 + WALL_GAP);
    }
}
