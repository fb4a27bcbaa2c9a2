/// Immutable CPU pixmap for per-pixel wall sampling. Pixels are packed
/// 0x00RRGGBB to match the framebuffer.
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Wrapping sample, so callers never index out of range.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u32 {
        let xi = (x % self.width) as usize;
        let yi = (y % self.height) as usize;
        self.pixels[yi * self.width as usize + xi]
    }

    /// Procedural brick wall: staggered courses with mortar seams and a
    /// small per-brick tint so columns read as distinct at a glance.
    pub fn brick(size: u32) -> Self {
        const MORTAR: u32 = 0x009A9A90;
        let course_h = size / 4;
        let brick_w = size / 2;

        let mut pixels = vec![MORTAR; (size * size) as usize];
        for y in 0..size {
            let course = y / course_h;
            let in_course = y % course_h;
            if in_course < 2 {
                continue; // horizontal mortar seam
            }
            // odd courses shift by half a brick
            let shift = if course % 2 == 0 { 0 } else { brick_w / 2 };
            for x in 0..size {
                let sx = (x + shift) % size;
                if sx % brick_w < 2 {
                    continue; // vertical mortar seam
                }
                let brick = (x + shift) / brick_w + course * 7;
                let tint = (brick * 13 % 32) as i32 - 16;
                let r = (158 + tint).clamp(0, 255) as u32;
                let g = (62 + tint / 2).clamp(0, 255) as u32;
                let b = (48 + tint / 2).clamp(0, 255) as u32;
                pixels[(y * size + x) as usize] = (r << 16) | (g << 8) | b;
            }
        }
        Self::new(size, size, pixels)
    }
}
