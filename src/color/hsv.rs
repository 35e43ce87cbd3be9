/// Channels as fractions between 0 and 1
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue in degrees [0, 360), saturation and value between 0 and 1
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Below this spread between channels the color counts as gray
pub const GRAY_DELTA: f64 = 0.00001;

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Rgb {
        Rgb { r, g, b }
    }
}

impl Hsv {
    pub const fn new(h: f64, s: f64, v: f64) -> Hsv {
        Hsv { h, s, v }
    }
}

pub fn rgb_to_hsv(rgb: Rgb) -> Hsv {
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let delta = max - min;
    // Hue is undefined for grays and black, report 0
    if delta < GRAY_DELTA || max <= 0.0 {
        return Hsv::new(0.0, 0.0, max);
    }
    let s = delta / max;
    let h = if rgb.r >= max {
        (rgb.g - rgb.b) / delta
    } else if rgb.g >= max {
        2.0 + (rgb.b - rgb.r) / delta
    } else {
        4.0 + (rgb.r - rgb.g) / delta
    };
    let mut h = h * 60.0;
    if h < 0.0 {
        h += 360.0;
    }
    Hsv::new(h, s, max)
}

pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    let v = hsv.v;
    if hsv.s <= 0.0 {
        return Rgb::new(v, v, v);
    }
    let mut hh = hsv.h;
    if hh >= 360.0 {
        hh = 0.0;
    }
    hh /= 60.0;
    let sector = hh as i64;
    let ff = hh - sector as f64;
    let p = v * (1.0 - hsv.s);
    let q = v * (1.0 - hsv.s * ff);
    let t = v * (1.0 - hsv.s * (1.0 - ff));

    match sector {
        0 => Rgb::new(v, t, p),
        1 => Rgb::new(q, v, p),
        2 => Rgb::new(p, v, t),
        3 => Rgb::new(p, q, v),
        4 => Rgb::new(t, p, v),
        _ => Rgb::new(v, p, q),
    }
}
