use crate::color::calibration::CalibratedColor;
use crate::color::hsv::{rgb_to_hsv, Hsv, Rgb};
use serde_derive::Serialize;
use std::fmt;

/// Corrected counts that map to full scale when converting to HSV
pub const RGB_FULL_SCALE: f32 = 50.0;

/// Calibrated color together with its HSV presentation
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorReport {
    pub color: CalibratedColor,
    pub hsv: Hsv,
}

impl ColorReport {
    pub fn new(color: CalibratedColor) -> ColorReport {
        let rgb = to_rgb(&color, RGB_FULL_SCALE);
        ColorReport {
            color,
            hsv: rgb_to_hsv(rgb),
        }
    }

    /// Single line JSON record
    pub fn to_json(&self, timestamp_ms: u64) -> serde_json::Result<String> {
        serde_json::to_string(&JsonRecord {
            timestamp: timestamp_ms,
            hue: self.hsv.h.round(),
            saturation: self.hsv.s.round(),
            value: self.hsv.v.round(),
        })
    }
}

/// Scale IR corrected channels to RGB fractions
pub fn to_rgb(color: &CalibratedColor, full_scale: f32) -> Rgb {
    Rgb::new(
        f64::from(color.red / full_scale),
        f64::from(color.green / full_scale),
        f64::from(color.blue / full_scale),
    )
}

#[derive(Serialize)]
struct JsonRecord {
    timestamp: u64,
    hue: f64,
    saturation: f64,
    value: f64,
}

impl fmt::Display for ColorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.color;
        writeln!(f, "|CLEAR   |RED     |GREEN   |BLUE    |LUX     |CCT     |")?;
        writeln!(
            f,
            "|{:<8.0}|{:<8.0}|{:<8.0}|{:<8.0}|{:<8.0}|{:<8.0}|",
            c.clear, c.red, c.green, c.blue, c.lux, c.cct
        )?;
        writeln!(f, "|HUE     |SAT     |VUE     |")?;
        write!(
            f,
            "|{:<8.0}|{:<8.0}|{:<8.0}|",
            self.hsv.h, self.hsv.s, self.hsv.v
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        let report = ColorReport::new(CalibratedColor {
            red: 50.0,
            green: 0.0,
            blue: 0.0,
            clear: 60.0,
            ir: 0.0,
            cpl: 1.0,
            lux: 12.4,
            cct: 1804.0,
        });
        assert_eq!(report.hsv, Hsv::new(0.0, 1.0, 1.0));
        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "|60      |50      |0       |0       |12      |1804    |");
        assert_eq!(lines[2], "|HUE     |SAT     |VUE     |");
        assert_eq!(lines[3], "|0       |1       |1       |");
    }

    #[test]
    fn json_record() {
        let report = ColorReport::new(CalibratedColor {
            red: 0.0,
            green: 50.0,
            blue: 0.0,
            ..CalibratedColor::default()
        });
        let json = report.to_json(1234).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["timestamp"], 1234);
        assert_eq!(v["hue"], 120.0);
        assert_eq!(v["saturation"], 1.0);
        assert_eq!(v["value"], 1.0);
    }
}
