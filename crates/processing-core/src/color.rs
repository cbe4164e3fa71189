//! Color mapping for normalized heat values.
//!
//! A [`ColorRamp`] is an ordered list of stops running cool to hot. Values
//! between stops are interpolated per channel; values outside the stop
//! range clamp to the nearest stop. A value of exactly zero is always
//! fully transparent.

use std::fmt;

use heatlens_common::error::{HeatError, HeatResult};

/// Straight-alpha color with 8-bit channels and a unit alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2], f32::from(px[3]) / 255.0)
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let a = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r, self.g, self.b, a]
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Per-channel linear interpolation, alpha included.
    pub fn lerp(a: Rgba, b: Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| -> u8 {
            let v = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: (f64::from(a.a) + (f64::from(b.a) - f64::from(a.a)) * t) as f32,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// One stop on the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position in `[0, 1]`.
    pub position: f64,
    pub rgb: [u8; 3],
    /// Stop alpha in `[0, 1]`, multiplied by the caller's alpha.
    pub alpha: f64,
}

impl ColorStop {
    pub const fn new(position: f64, rgb: [u8; 3], alpha: f64) -> Self {
        Self {
            position,
            rgb,
            alpha,
        }
    }

    fn with_alpha(&self, alpha: f64) -> Rgba {
        Rgba::new(
            self.rgb[0],
            self.rgb[1],
            self.rgb[2],
            (self.alpha * alpha).clamp(0.0, 1.0) as f32,
        )
    }
}

/// Blue, cyan, green, yellow, red.
const DEFAULT_STOPS: [ColorStop; 5] = [
    ColorStop::new(0.0, [0, 0, 255], 0.2),
    ColorStop::new(0.25, [0, 255, 255], 0.5),
    ColorStop::new(0.5, [0, 255, 0], 0.7),
    ColorStop::new(0.75, [255, 255, 0], 0.85),
    ColorStop::new(1.0, [255, 0, 0], 1.0),
];

/// Piecewise-linear color ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            stops: DEFAULT_STOPS.to_vec(),
        }
    }
}

impl ColorRamp {
    /// Build a ramp from stops; they are ordered by position.
    pub fn new(mut stops: Vec<ColorStop>) -> HeatResult<Self> {
        if stops.is_empty() {
            return Err(HeatError::config("color ramp needs at least one stop"));
        }
        for stop in &stops {
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(HeatError::config(format!(
                    "color stop position {} outside [0, 1]",
                    stop.position
                )));
            }
            if !(0.0..=1.0).contains(&stop.alpha) {
                return Err(HeatError::config(format!(
                    "color stop alpha {} outside [0, 1]",
                    stop.alpha
                )));
            }
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color for a normalized value, with the stop alpha scaled by `alpha`.
    pub fn color_for(&self, normalized: f64, alpha: f64) -> Rgba {
        if normalized == 0.0 || normalized.is_nan() {
            return Rgba::TRANSPARENT;
        }
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let first = &self.stops[0];
        let last = &self.stops[self.stops.len() - 1];
        if normalized <= first.position {
            return first.with_alpha(alpha);
        }
        if normalized >= last.position {
            return last.with_alpha(alpha);
        }

        let upper = self
            .stops
            .iter()
            .position(|s| s.position >= normalized)
            .unwrap_or(self.stops.len() - 1);
        let hi = &self.stops[upper];
        let lo = &self.stops[upper.saturating_sub(1)];
        let span = hi.position - lo.position;
        let t = if span <= 0.0 {
            1.0
        } else {
            (normalized - lo.position) / span
        };
        Rgba::lerp(lo.with_alpha(alpha), hi.with_alpha(alpha), t)
    }

    /// Three-stop radial gradient for one hotspot: an opaque-ish core, a
    /// faded ring at 40% of the radius, and a transparent edge.
    pub fn radial_gradient(
        &self,
        center: (f64, f64),
        radius: f64,
        normalized: f64,
    ) -> RadialGradient {
        RadialGradient {
            center,
            radius,
            stops: [
                (0.0, self.color_for(normalized, 0.8)),
                (0.4, self.color_for(normalized * 0.3, 0.4)),
                (1.0, self.color_for(normalized * 0.1, 0.0)),
            ],
        }
    }
}

/// A circular gradient sampled by distance from its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: (f64, f64),
    pub radius: f64,
    /// `(offset, color)` with offsets ascending in `[0, 1]`.
    pub stops: [(f64, Rgba); 3],
}

impl RadialGradient {
    /// Color at a point. Anything at or beyond the radius is transparent.
    pub fn sample(&self, x: f64, y: f64) -> Rgba {
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let d = (dx * dx + dy * dy).sqrt() / self.radius;
        if d >= 1.0 {
            return Rgba::TRANSPARENT;
        }

        let [(o0, c0), (o1, c1), (o2, c2)] = self.stops;
        if d <= o0 {
            c0
        } else if d <= o1 {
            Rgba::lerp(c0, c1, (d - o0) / (o1 - o0))
        } else {
            Rgba::lerp(c1, c2, (d - o1) / (o2 - o1))
        }
    }
}
