use crate::error::TerrainError;

/// 8-bit RGB colour.
///
/// Channels are stored as-is; no colour-space conversion is applied anywhere in
/// this crate. The renderer decides how to interpret them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(src: &str) -> Result<Self, TerrainError> {
        let hex = src.strip_prefix('#').unwrap_or(src);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(TerrainError::InvalidColor(src.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| TerrainError::InvalidColor(src.to_string()))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels scaled to `[0, 1]`.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Squared euclidean distance in 8-bit channel space.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> u32 {
        let d = |a: u8, b: u8| {
            let v = a as i32 - b as i32;
            (v * v) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

/// Fixed depth → colour mapping.
///
/// One colour per row slot of the window, computed once. Depth `d` maps to
/// `t = (d / len)^exponent` and the two stops are blended linearly at `t`,
/// then rounded back to 8 bits.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    start: Rgb,
    end: Rgb,
    exponent: f32,
    colors: Vec<Rgb>,
}

impl ColorRamp {
    pub fn new(start: Rgb, end: Rgb, exponent: f32, depth_count: usize) -> Self {
        let colors = (0..depth_count)
            .map(|depth| {
                let t = (depth as f32 / depth_count as f32).powf(exponent);
                blend(start, end, t)
            })
            .collect();

        Self { start, end, exponent, colors }
    }

    /// Colour for the row slot at `depth`. Depths past the end clamp to the last slot.
    pub fn color_at(&self, depth: usize) -> Rgb {
        match self.colors.get(depth) {
            Some(c) => *c,
            None => self.colors.last().copied().unwrap_or(self.start),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Rgb {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Rgb {
        self.end
    }

    #[inline]
    pub fn exponent(&self) -> f32 {
        self.exponent
    }
}

fn blend(start: Rgb, end: Rgb, t: f32) -> Rgb {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb::new(mix(start.r, end.r), mix(start.g, end.g), mix(start.b, end.b))
}
