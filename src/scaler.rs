use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed source index per destination pixel, rebuilt on resize so
/// the per-frame blit is index lookups only.
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_y: Vec<usize>,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_y: Vec::new(),
        }
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    let sx = src_w as f32 / dst_w as f32;
    let sy = src_h as f32 / dst_h as f32;

    let src_x = (0..dst_w)
        .map(|x| ((x as f32 * sx) as usize).min(src_w - 1))
        .collect();
    let src_y = (0..dst_h)
        .map(|y| ((y as f32 * sy) as usize).min(src_h - 1))
        .collect();

    ScaleLut { src_x, src_y }
}

/// Stretches the internal framebuffer to the window surface. Rows are
/// processed in parallel for cache friendly writes.
pub fn blit_stretch(dst: &mut [u32], dst_w: usize, src: &[u32], src_w: usize, lut: &ScaleLut) {
    dst.par_chunks_mut(dst_w).enumerate().for_each(|(y, row)| {
        let src_row = lut.src_y[y] * src_w;
        for (x, out) in row.iter_mut().enumerate() {
            *out = src[src_row + lut.src_x[x]];
        }
    });
}
