//! RGBA frame buffer for decoded and composited video frames.

/// A video frame in CPU memory.
///
/// Pixels are packed RGBA8, row-major, top-to-bottom, with no stride
/// padding: `data.len() == width * height * 4`.
///
/// A frame has a single logical owner. The frame cache keeps canonical
/// copies and hands out clones, so mutation by a consumer never corrupts
/// cached state.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Packed RGBA8 pixel data
    pub data: Vec<u8>,
    /// Presentation timestamp in seconds
    pub pts: f64,
}

impl VideoFrame {
    /// Create a frame from an existing RGBA buffer.
    ///
    /// The buffer length must match the dimensions exactly.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, pts: f64) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data,
            pts,
        }
    }

    /// Create a fully transparent black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
            pts: 0.0,
        }
    }

    /// Create a frame filled with a single RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
            pts: 0.0,
        }
    }

    /// Total memory usage of this frame in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    /// Get a row of pixel data.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    /// Get the RGBA value of a single pixel.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let mut frame = Self::blank(width, height);
        let colors: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];
        for y in 0..height {
            for x in 0..width {
                let bar = (x * 8 / width).min(7) as usize;
                let i = ((y * width + x) * 4) as usize;
                frame.data[i..i + 4].copy_from_slice(&colors[bar]);
            }
        }
        frame
    }
}
