//! Value-to-color interpolation for result rendering.

use crate::error::{WnError, WnResult};

/// A single anchor of a color ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub value: f64,
    pub rgb: [u8; 3],
}

/// Piecewise-linear color ramp over a scalar result variable (pressure,
/// velocity, ...). Stops are kept sorted by value; lookups clamp at the
/// ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl ColorRamp {
    pub fn new(mut stops: Vec<ColorStop>) -> WnResult<Self> {
        if stops.is_empty() {
            return Err(WnError::InvalidArg {
                what: "color ramp needs at least one stop",
            });
        }
        for stop in &stops {
            if !stop.value.is_finite() {
                return Err(WnError::NonFinite {
                    what: "color ramp stop value",
                    value: stop.value,
                });
            }
        }
        stops.sort_by(|a, b| a.value.total_cmp(&b.value));
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Interpolated color for `value`, clamped to the outermost stops.
    pub fn color_at(&self, value: f64) -> [u8; 3] {
        let first = &self.stops[0];
        if !value.is_finite() || value <= first.value {
            return first.rgb;
        }
        let last = &self.stops[self.stops.len() - 1];
        if value >= last.value {
            return last.rgb;
        }

        // value is strictly inside the ramp, so a bracketing pair exists
        for pair in self.stops.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if value <= hi.value {
                let span = hi.value - lo.value;
                let t = if span > 0.0 { (value - lo.value) / span } else { 0.0 };
                return lerp_rgb(lo.rgb, hi.rgb, t);
            }
        }
        last.rgb
    }

    /// Color as `#rrggbb` for web-facing consumers.
    pub fn hex_at(&self, value: f64) -> String {
        let [r, g, b] = self.color_at(value);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let mix = |x: u8, y: u8| -> u8 {
        let v = f64::from(x) + (f64::from(y) - f64::from(x)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> ColorRamp {
        ColorRamp::new(vec![
            ColorStop {
                value: 0.0,
                rgb: [0, 0, 255],
            },
            ColorStop {
                value: 10.0,
                rgb: [255, 0, 0],
            },
        ])
        .unwrap()
    }

    #[test]
    fn clamps_outside_range() {
        let r = ramp();
        assert_eq!(r.color_at(-5.0), [0, 0, 255]);
        assert_eq!(r.color_at(50.0), [255, 0, 0]);
        assert_eq!(r.color_at(f64::NAN), [0, 0, 255]);
    }

    #[test]
    fn interpolates_midpoint() {
        let r = ramp();
        assert_eq!(r.color_at(5.0), [128, 0, 128]);
    }

    #[test]
    fn sorts_unordered_stops() {
        let r = ColorRamp::new(vec![
            ColorStop {
                value: 10.0,
                rgb: [255, 255, 255],
            },
            ColorStop {
                value: 0.0,
                rgb: [0, 0, 0],
            },
        ])
        .unwrap();
        assert_eq!(r.stops()[0].value, 0.0);
    }

    #[test]
    fn hex_rendering() {
        let r = ramp();
        assert_eq!(r.hex_at(0.0), "#0000ff");
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert!(ColorRamp::new(vec![]).is_err());
        assert!(
            ColorRamp::new(vec![ColorStop {
                value: f64::NAN,
                rgb: [0, 0, 0],
            }])
            .is_err()
        );
    }
}
