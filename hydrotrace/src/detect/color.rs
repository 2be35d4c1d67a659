//! Color models and target ranges for water detection.
//!
//! Hue/saturation/value is expressed on the OpenCV byte scale
//! (H 0–179, S and V 0–255) so the reference thresholds carry over
//! unchanged from the tuning that produced them.

/// Inclusive HSV channel range on the OpenCV byte scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl HsvRange {
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

/// Inclusive RGB channel range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl RgbRange {
    pub fn contains(&self, rgb: [u8; 3]) -> bool {
        (0..3).all(|i| rgb[i] >= self.lower[i] && rgb[i] <= self.upper[i])
    }
}

/// HSV ranges matching the blues used for water on standard map tiles:
/// standard water blue, light blue / cyan, and river blue.
pub const WATER_HSV_RANGES: [HsvRange; 3] = [
    HsvRange {
        lower: [100, 50, 50],
        upper: [130, 255, 255],
    },
    HsvRange {
        lower: [80, 50, 100],
        upper: [110, 255, 255],
    },
    HsvRange {
        lower: [90, 30, 100],
        upper: [120, 200, 255],
    },
];

/// Direct-channel backup range OR-ed into the HSV match, catching
/// water pixels whose hue falls just outside the ranges above.
pub const WATER_RGB_BACKUP: RgbRange = RgbRange {
    lower: [0, 100, 150],
    upper: [100, 200, 255],
};

/// RGB-only range set for the [`DetectorKind::Rgb`](super::DetectorKind::Rgb)
/// strategy: standard, light, dark and cyan-ish water blues.
pub const WATER_RGB_RANGES: [RgbRange; 4] = [
    RgbRange {
        lower: [0, 100, 150],
        upper: [100, 180, 255],
    },
    RgbRange {
        lower: [100, 150, 200],
        upper: [180, 200, 255],
    },
    RgbRange {
        lower: [0, 50, 100],
        upper: [80, 120, 200],
    },
    RgbRange {
        lower: [0, 150, 150],
        upper: [120, 255, 255],
    },
];

/// Converts an RGB pixel to HSV on the OpenCV byte scale.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> [u8; 3] {
    let rf = r as f32 / 255.0;
    let gf = g as f32 / 255.0;
    let bf = b as f32 / 255.0;

    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let value = max;
    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    let hue_deg = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * ((gf - bf) / delta)
    } else if max == gf {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };
    let hue_deg = if hue_deg < 0.0 {
        hue_deg + 360.0
    } else {
        hue_deg
    };

    [
        ((hue_deg / 2.0).round() as u8).min(179),
        (saturation * 255.0).round() as u8,
        (value * 255.0).round() as u8,
    ]
}
