use std::f32::consts::PI;

/// Internal framebuffer size; the scaler stretches it to the window.
pub const SCREEN_WIDTH: usize = 800;
pub const SCREEN_HEIGHT: usize = 600;

/// Edge length of one grid cell in world units.
pub const TILE_SIZE: f32 = 80.0;

pub const FOV: f32 = PI / 3.0; // 60 degrees
pub const NUM_RAYS: usize = 240;
pub const DELTA_ANGLE: f32 = FOV / NUM_RAYS as f32;

/// Rays give up past this distance; also the fog horizon.
pub const MAX_DEPTH: f32 = 800.0;

/// March step in world units. Smaller steps cost iterations but reduce
/// missed thin walls and texture-seam error.
pub const STEP_SIZE: f32 = 0.5;

/// Per-frame translation and turn increments (the frame clock fixes the
/// tick rate, so these are per-tick, not per-second).
pub const MOVE_SPEED: f32 = 5.0;
pub const TURN_INCREMENT: f32 = 0.05;

/// Fog never darkens a wall past this fraction toward black.
pub const MAX_FOG_DARKNESS: f32 = 0.85;

/// Divisor clamp for the wall-height projection at near-zero depth.
pub const DEPTH_EPSILON: f32 = 0.001;

/// Gap kept between the player and a wall face when movement clamps
/// flush against it.
pub const WALL_GAP: f32 = 0.001;

pub const TICK_RATE: u32 = 30;
