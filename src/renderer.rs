use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::{
    DEPTH_EPSILON, MAX_DEPTH, MAX_FOG_DARKNESS, NUM_RAYS, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE,
};
use crate::movement::Pose;
use crate::raycast::{self, RayHit};
use crate::texture::Texture;
use crate::world::WorldGrid;

#[inline]
const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // 0x00RRGGBB in little-endian memory, alpha at 0
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

const SKY_TOP: u32 = pack_rgb(135, 206, 235);
const SKY_BOTTOM: u32 = pack_rgb(255, 255, 255);
const FLOOR_TOP: u32 = pack_rgb(74, 10, 3);
const FLOOR_BOTTOM: u32 = pack_rgb(20, 5, 2);

/// Flat wall color when no texture is available.
const WALL_COLOR: u32 = pack_rgb(0, 255, 0);

/// Projected vertical extent of one wall column.
#[derive(Debug, Clone, Copy)]
pub struct WallSpan {
    /// Theoretical column height before clipping, in pixels.
    pub wall_height: f32,
    /// Unclipped top edge; negative when the wall overflows the screen.
    pub raw_top: f32,
    /// Clipped pixel bounds, top >= 0 and bottom <= SCREEN_HEIGHT.
    pub top: i32,
    pub bottom: i32,
    /// Normalized distance fog, saturating at 1.
    pub fog: f32,
}

impl WallSpan {
    pub fn visible_height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }
}

/// Perspective projection of a hit into screen-space column bounds. The
/// divisor clamp keeps near-zero depths from blowing up the height.
pub fn project_wall(hit: &RayHit) -> WallSpan {
    let wall_height = TILE_SIZE * SCREEN_HEIGHT as f32 / hit.corrected_depth.max(DEPTH_EPSILON);
    let raw_top = SCREEN_HEIGHT as f32 * 0.5 - wall_height * 0.5;
    let raw_bottom = raw_top + wall_height;

    // ceil the top and floor the bottom so the pixel span never rounds
    // outward past the continuous bounds
    WallSpan {
        wall_height,
        raw_top,
        top: raw_top.max(0.0).ceil() as i32,
        bottom: raw_bottom.min(SCREEN_HEIGHT as f32).floor() as i32,
        fog: (hit.depth / MAX_DEPTH).min(1.0),
    }
}

/// Texture coordinates for one column: the sampled texture column plus
/// the vertical sub-range left after clipping.
#[derive(Debug, Clone, Copy)]
pub struct TexSlice {
    pub x: u32,
    pub y0: f32,
    pub y1: f32,
}

/// Maps the face-local offset to a texture column and the clipped pixel
/// amounts proportionally into texture rows, so a clipped wall keeps its
/// texture anchored to the same apparent world height.
pub fn texture_slice(offset: f32, span: &WallSpan, tex_w: u32, tex_h: u32) -> TexSlice {
    let x = (((offset / TILE_SIZE) * tex_w as f32) as i64).clamp(0, tex_w as i64 - 1) as u32;

    let clip_top = (-span.raw_top).max(0.0);
    let clip_bottom = (span.raw_top + span.wall_height - SCREEN_HEIGHT as f32).max(0.0);

    let y0 = ((clip_top / span.wall_height) * tex_h as f32).min(tex_h as f32 - 1.0);
    let y1 = (((span.wall_height - clip_bottom) / span.wall_height) * tex_h as f32)
        .clamp(y0 + 1.0, tex_h as f32);

    TexSlice { x, y0, y1 }
}

#[inline]
fn scale_color(color: u32, keep: f32) -> u32 {
    let r = (((color >> 16) & 0xFF) as f32 * keep) as u32;
    let g = (((color >> 8) & 0xFF) as f32 * keep) as u32;
    let b = ((color & 0xFF) as f32 * keep) as u32;
    (r << 16) | (g << 8) | b
}

/// Distance fog over a textured sample; capped so walls never reach
/// full black.
#[inline]
fn shade(color: u32, fog: f32) -> u32 {
    scale_color(color, 1.0 - fog * MAX_FOG_DARKNESS)
}

#[inline]
fn lerp_color(a: u32, b: u32, t: f32) -> u32 {
    let ch = |shift: u32| {
        let ca = ((a >> shift) & 0xFF) as f32;
        let cb = ((b >> shift) & 0xFF) as f32;
        (ca + (cb - ca) * t) as u32
    };
    (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

/// Sky gradient above the horizon, floor gradient below. Runs before the
/// column pass so columns whose ray hits nothing show through as
/// background.
fn draw_background(buf: &mut [u32]) {
    let horizon = SCREEN_HEIGHT / 2;
    for y in 0..horizon {
        let t = y as f32 / horizon as f32;
        let row = y * SCREEN_WIDTH;
        buf[row..row + SCREEN_WIDTH].fill(lerp_color(SKY_TOP, SKY_BOTTOM, t));
    }
    for y in horizon..SCREEN_HEIGHT {
        let t = (y - horizon) as f32 / (SCREEN_HEIGHT - horizon) as f32;
        let row = y * SCREEN_WIDTH;
        buf[row..row + SCREEN_WIDTH].fill(lerp_color(FLOOR_TOP, FLOOR_BOTTOM, t));
    }
}

/// Renders one full frame into the internal framebuffer. Rays are pure
/// functions of (grid, pose, angle), so the cast pass runs in parallel;
/// columns are then drawn sequentially in ray order.
pub fn render_frame(buf: &mut [u32], grid: &WorldGrid, pose: &Pose, texture: Option<&Texture>) {
    draw_background(buf);

    let hits: Vec<Option<RayHit>> = (0..NUM_RAYS)
        .into_par_iter()
        .map(|ray| raycast::cast(grid, pose, raycast::ray_angle(pose.heading, ray)))
        .collect();

    for (ray, hit) in hits.into_iter().enumerate() {
        let Some(hit) = hit else { continue };
        let span = project_wall(&hit);
        let x0 = ray * SCREEN_WIDTH / NUM_RAYS;
        let x1 = ((ray + 1) * SCREEN_WIDTH / NUM_RAYS).min(SCREEN_WIDTH);
        match texture {
            Some(tex) => draw_textured_column(buf, x0, x1, &span, &hit, tex),
            None => draw_flat_column(buf, x0, x1, &span),
        }
    }
}

fn draw_textured_column(
    buf: &mut [u32],
    x0: usize,
    x1: usize,
    span: &WallSpan,
    hit: &RayHit,
    tex: &Texture,
) {
    let visible = span.visible_height();
    if visible <= 0 {
        return;
    }
    let slice = texture_slice(hit.offset, span, tex.width(), tex.height());
    for y in span.top..span.bottom {
        let t = (y - span.top) as f32 / visible as f32;
        let ty = slice.y0 + t * (slice.y1 - slice.y0);
        let color = shade(tex.sample(slice.x, ty as u32), span.fog);
        let row = y as usize * SCREEN_WIDTH;
        buf[row + x0..row + x1].fill(color);
    }
}

/// Fallback when no texture is loaded: flat color with intensity scaled
/// by the full remaining visibility, all the way to black at the fog
/// horizon.
fn draw_flat_column(buf: &mut [u32], x0: usize, x1: usize, span: &WallSpan) {
    let color = scale_color(WALL_COLOR, 1.0 - span.fog);
    for y in span.top..span.bottom {
        let row = y as usize * SCREEN_WIDTH;
        buf[row + x0..row + x1].fill(color);
    }
}
