//! Named continuous color gradients.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{color::Rgb, error::MapError};

/// Supported color gradients. Each one is a piecewise-linear ramp through
/// evenly spaced control colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Gradient {
    #[default]
    Viridis,
    Inferno,
    Magma,
    Plasma,
    Heat,
    Reds,
    Blues,
    Greys,
}

const VIRIDIS: &[u32] = &[
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e,
    0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b, 0xfde725,
];

const INFERNO: &[u32] = &[
    0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60,
    0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d, 0xfcffa4,
];

const MAGMA: &[u32] = &[
    0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f,
    0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d, 0xfcfdbf,
];

const PLASMA: &[u32] = &[
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786,
    0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26, 0xf0f921,
];

// Light yellow through orange to dark red.
const HEAT: &[u32] = &[
    0xffffcc, 0xffeda0, 0xfed976, 0xfeb24c, 0xfd8d3c,
    0xfc4e2a, 0xe31a1c, 0xbd0026, 0x800026,
];

const REDS: &[u32] = &[
    0xfff5f0, 0xfee0d2, 0xfcbba1, 0xfc9272, 0xfb6a4a,
    0xef3b2c, 0xcb181d, 0xa50f15, 0x67000d,
];

const BLUES: &[u32] = &[
    0xf7fbff, 0xdeebf7, 0xc6dbef, 0x9ecae1, 0x6baed6,
    0x4292c6, 0x2171b5, 0x08519c, 0x08306b,
];

const GREYS: &[u32] = &[0xf0f0f0, 0x252525];

impl Gradient {
    /// Every registered gradient, in listing order.
    pub const ALL: [Gradient; 8] = [
        Self::Viridis, Self::Inferno, Self::Magma, Self::Plasma,
        Self::Heat, Self::Reds, Self::Blues, Self::Greys,
    ];

    /// Registry name of this gradient.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viridis => "viridis",
            Self::Inferno => "inferno",
            Self::Magma => "magma",
            Self::Plasma => "plasma",
            Self::Heat => "heat",
            Self::Reds => "reds",
            Self::Blues => "blues",
            Self::Greys => "greys",
        }
    }

    fn stops(self) -> &'static [u32] {
        match self {
            Self::Viridis => VIRIDIS,
            Self::Inferno => INFERNO,
            Self::Magma => MAGMA,
            Self::Plasma => PLASMA,
            Self::Heat => HEAT,
            Self::Reds => REDS,
            Self::Blues => BLUES,
            Self::Greys => GREYS,
        }
    }

    /// Color at position `t`. `t` is clamped to [0,1]; callers are expected
    /// to pass normalized values (see [`map_color`](crate::color::map_color)).
    pub fn at(self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let segments = (stops.len() - 1) as f64;
        let pos = t * segments;
        let lo = (pos.floor() as usize).min(stops.len() - 2);
        let frac = pos - lo as f64;

        Rgb::from_u32(stops[lo]).lerp(Rgb::from_u32(stops[lo + 1]), frac)
    }

    fn known_names() -> String {
        Self::ALL.iter().map(|g| g.name()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gradient {
    type Err = MapError;

    /// Look up a gradient by name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL.into_iter()
            .find(|g| g.name() == wanted)
            .ok_or_else(|| MapError::UnknownGradient { name: s.to_string(), known: Self::known_names() })
    }
}

impl TryFrom<String> for Gradient {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}
