use blockforge_voxel::Rgba;
use image::DynamicImage;

/// Decoded texture pixels, row-major from the top-left, 1/3/4 bytes per pixel.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Texture {
    /// `None` when `data` does not hold exactly `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Option<Self> {
        let expect = width as usize * height as usize * channels as usize;
        if data.len() != expect {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Keeps grey, RGB and RGBA 8-bit images as-is; anything else becomes RGBA8.
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());
        let (channels, data) = match img {
            DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
            DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
            DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
            other => (4, other.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Pixel at `(tx, ty)`; out-of-range or unsupported layouts give magenta.
    pub fn pixel(&self, tx: u32, ty: u32) -> Rgba {
        if tx >= self.width || ty >= self.height {
            return Rgba::MAGENTA;
        }
        let n = self.channels as usize;
        let i = (ty as usize * self.width as usize + tx as usize) * n;
        match (n, self.data.get(i..i + n)) {
            (1, Some(p)) => Rgba::rgb(p[0], p[0], p[0]),
            (3, Some(p)) => Rgba::rgb(p[0], p[1], p[2]),
            (4, Some(p)) => Rgba::new(p[0], p[1], p[2], p[3]),
            _ => Rgba::MAGENTA,
        }
    }

    /// Samples at texture coordinate `(u, v)`. V grows upward while image rows
    /// grow downward; the pixel index is clamped to the image.
    pub fn sample_uv(&self, u: f64, v: f64) -> Rgba {
        if u.is_nan() || v.is_nan() || self.width == 0 || self.height == 0 {
            return Rgba::MAGENTA;
        }
        let tx = (u * self.width as f64) as i64;
        let ty = ((1.0 - v) * self.height as f64) as i64;
        let tx = tx.clamp(0, self.width as i64 - 1) as u32;
        let ty = ty.clamp(0, self.height as i64 - 1) as u32;
        self.pixel(tx, ty)
    }
}
