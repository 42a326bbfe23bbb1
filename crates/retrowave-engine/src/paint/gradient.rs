use super::Color;

/// A single gradient stop.
///
/// `t` is expected in [0, 1]; [`LinearGradient::new`] sorts stops by `t`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Gradient along one screen axis (top → bottom for the backdrop).
///
/// Out-of-range positions clamp to the edge stops.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        Self { stops }
    }

    /// Evenly spaced stops, first at `t = 0`, last at `t = 1`.
    pub fn evenly_spaced(colors: &[Color]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        Self::new(
            colors
                .iter()
                .enumerate()
                .map(|(i, c)| ColorStop::new(i as f32 / last, *c))
                .collect(),
        )
    }

    #[inline]
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Returns true when the gradient definition is structurally usable.
    pub fn is_valid(&self) -> bool {
        self.stops.len() >= 2 && self.stops.iter().all(|s| s.t.is_finite() && s.color.is_finite())
    }

    /// Color at position `t`.
    pub fn sample(&self, t: f32) -> Color {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Color::transparent();
        };

        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.t {
                let span = b.t - a.t;
                let local = if span > 0.0 { (t - a.t) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }

        last.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_stop() -> LinearGradient {
        LinearGradient::evenly_spaced(&[
            Color::from_rgb_u8(0, 0, 0),
            Color::white(),
            Color::from_rgb_u8(0, 0, 0),
        ])
    }

    #[test]
    fn evenly_spaced_positions() {
        let g = three_stop();
        let ts: Vec<f32> = g.stops().iter().map(|s| s.t).collect();
        assert_eq!(ts, vec![0.0, 0.5, 1.0]);
        assert!(g.is_valid());
    }

    #[test]
    fn sample_hits_stops_and_midpoints() {
        let g = three_stop();
        assert_eq!(g.sample(0.5), Color::white());
        assert_eq!(g.sample(0.25).r, 0.5);
        assert_eq!(g.sample(-1.0), g.sample(0.0));
        assert_eq!(g.sample(2.0), g.sample(1.0));
    }

    #[test]
    fn unsorted_stops_are_sorted() {
        let g = LinearGradient::new(vec![
            ColorStop::new(1.0, Color::white()),
            ColorStop::new(0.0, Color::transparent()),
        ]);
        assert_eq!(g.stops()[0].t, 0.0);
    }

    #[test]
    fn empty_gradient_is_transparent() {
        let g = LinearGradient::new(Vec::new());
        assert!(!g.is_valid());
        assert_eq!(g.sample(0.3), Color::transparent());
    }
}
