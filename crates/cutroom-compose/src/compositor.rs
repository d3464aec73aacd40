//! Multi-layer "over" compositing on the CPU.

use cutroom_core::VideoFrame;

/// Blends stacked RGBA layers into one output frame.
///
/// Layers are processed in input order: index 0 first, each subsequent
/// layer composited on top with the standard "over" operator. Output is
/// deterministic, bit-identical for identical inputs.
pub struct Compositor {
    width: u32,
    height: u32,
}

impl Compositor {
    /// Create a compositor with a fixed output size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Composite `layers[i]` with `opacities[i]` (0.0–1.0) into one frame.
    ///
    /// Both slices must be the same length. A layer only touches the
    /// region where it overlaps the output; pixels outside a smaller
    /// layer keep their accumulated value. With no layers the result is
    /// fully transparent black.
    pub fn composite(&self, layers: &[VideoFrame], opacities: &[f32]) -> VideoFrame {
        debug_assert_eq!(layers.len(), opacities.len());

        let mut out = VideoFrame::blank(self.width, self.height);

        for (layer, &opacity) in layers.iter().zip(opacities) {
            let opacity = opacity.clamp(0.0, 1.0);
            let w = self.width.min(layer.width);
            let h = self.height.min(layer.height);

            for y in 0..h {
                for x in 0..w {
                    let si = ((y * layer.width + x) * 4) as usize;
                    let di = ((y * self.width + x) * 4) as usize;

                    let src = &layer.data[si..si + 4];
                    let src_alpha = (src[3] as f32 / 255.0) * opacity;

                    let dst = &mut out.data[di..di + 4];
                    let dst_alpha = dst[3] as f32 / 255.0;

                    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
                    if out_alpha > 0.0 {
                        for c in 0..3 {
                            let blended = (src[c] as f32 * src_alpha
                                + dst[c] as f32 * dst_alpha * (1.0 - src_alpha))
                                / out_alpha;
                            dst[c] = blended.round().clamp(0.0, 255.0) as u8;
                        }
                        dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
                    }
                }
            }
        }

        out
    }
}
