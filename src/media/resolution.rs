// src/media/resolution.rs

use std::fmt;
use std::str::FromStr;

/// Output frame size, written `WIDTHxHEIGHT` on the encoder command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Sizes offered by default.
pub const STANDARD_RESOLUTIONS: [Resolution; 4] = [
    Resolution::new(640, 480),
    Resolution::new(1280, 720),
    Resolution::new(1920, 1080),
    Resolution::new(2560, 1440),
];

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether this is one of [`STANDARD_RESOLUTIONS`].
    pub fn is_standard(&self) -> bool {
        STANDARD_RESOLUTIONS.contains(self)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("invalid resolution '{s}' (expected WIDTHxHEIGHT)"))?;

        let width: u32 = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid resolution width '{w}': {e}"))?;
        let height: u32 = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid resolution height '{h}': {e}"))?;

        if width == 0 || height == 0 {
            return Err(format!("resolution '{s}' must be non-zero in both dimensions"));
        }

        Ok(Resolution { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let r: Resolution = "1920x1080".parse().unwrap();
        assert_eq!(r, Resolution::new(1920, 1080));
        assert_eq!(r.to_string(), "1920x1080");
        assert!(r.is_standard());
        assert!(!Resolution::new(1000, 1000).is_standard());
    }

    #[test]
    fn rejects_malformed() {
        assert!("1920".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
        assert!("widexhigh".parse::<Resolution>().is_err());
    }
}
