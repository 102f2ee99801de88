//! Snap point descriptors and their resolution to pixel heights.
//!
//! A descriptor is either a percentage of the viewport (`"50%"`) or an absolute
//! height in pixels (`320.0`). Resolution never fails: anything that cannot be
//! understood resolves to a height of `0`, so a bad configuration leaves the
//! sheet collapsed instead of taking the host UI down with it.
//!
//! # Example
//!
//! ```
//! use snapsheet::snap_point::{SnapPoint, SnapPoints};
//!
//! let points = SnapPoints::new(vec!["25%".into(), "50%".into(), SnapPoint::Pixels(600.0)], 800.0);
//!
//! assert_eq!(points.height(0), Some(200.0));
//! assert_eq!(points.translate_y_for_index(1), Some(400.0));
//! assert_eq!(points.index_of(&SnapPoint::Pixels(600.0)), Some(2));
//! ```

use std::fmt;
use std::str::FromStr;

/// A configured resting height for the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapPoint {
    /// Integer percentage of the viewport height. Clamped to `[0, 100]` on resolve.
    Percent(i32),
    /// Absolute height in pixels. Clamped to `[0, viewport]` on resolve.
    Pixels(f32),
    /// A descriptor that could not be parsed, kept verbatim. Resolves to `0`.
    Malformed(String),
}

/// Errors produced by the strict [`SnapPoint::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapPointError {
    /// The descriptor was empty or whitespace.
    Empty,
    /// A `%` descriptor without a leading integer.
    InvalidPercent {
        /// The offending descriptor.
        descriptor: String,
    },
    /// A pixel descriptor that is not a number.
    InvalidPixels {
        /// The offending descriptor.
        descriptor: String,
    },
}

impl fmt::Display for SnapPointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapPointError::Empty => write!(f, "Empty snap point descriptor"),
            SnapPointError::InvalidPercent { descriptor } => {
                write!(f, "Invalid percentage snap point: '{}'", descriptor)
            }
            SnapPointError::InvalidPixels { descriptor } => {
                write!(f, "Invalid pixel snap point: '{}'", descriptor)
            }
        }
    }
}

impl std::error::Error for SnapPointError {}

impl SnapPoint {
    /// Parse a descriptor strictly.
    ///
    /// A trailing `%` selects a percentage; only the leading integer is read, so
    /// `"33.3%"` is 33. Anything else must be a plain number of pixels.
    pub fn parse(descriptor: &str) -> Result<Self, SnapPointError> {
        let trimmed = descriptor.trim();
        if trimmed.is_empty() {
            return Err(SnapPointError::Empty);
        }

        if let Some(body) = trimmed.strip_suffix('%') {
            return parse_int_prefix(body).map(SnapPoint::Percent).ok_or_else(|| {
                SnapPointError::InvalidPercent {
                    descriptor: descriptor.to_owned(),
                }
            });
        }

        match trimmed.parse::<f32>() {
            Ok(px) if !px.is_nan() => Ok(SnapPoint::Pixels(px)),
            _ => Err(SnapPointError::InvalidPixels {
                descriptor: descriptor.to_owned(),
            }),
        }
    }

    /// Check whether this descriptor failed to parse.
    pub fn is_malformed(&self) -> bool {
        matches!(self, SnapPoint::Malformed(_))
    }

    /// Resolve to a pixel height in `[0, viewport_height]`.
    pub fn resolve(&self, viewport_height: f32) -> f32 {
        let viewport = sanitize_extent(viewport_height);

        match self {
            &SnapPoint::Percent(pct) => viewport * pct.clamp(0, 100) as f32 / 100.0,
            &SnapPoint::Pixels(px) if px.is_nan() => 0.0,
            &SnapPoint::Pixels(px) => px.clamp(0.0, viewport),
            SnapPoint::Malformed(raw) => {
                tracing::warn!("Malformed snap point '{}' resolved to 0", raw);
                0.0
            }
        }
    }
}

impl fmt::Display for SnapPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapPoint::Percent(pct) => write!(f, "{}%", pct),
            SnapPoint::Pixels(px) => write!(f, "{}", px),
            SnapPoint::Malformed(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for SnapPoint {
    type Err = SnapPointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SnapPoint::parse(s)
    }
}

/// Lenient conversion: unparseable descriptors become [`SnapPoint::Malformed`].
impl From<&str> for SnapPoint {
    fn from(descriptor: &str) -> Self {
        SnapPoint::parse(descriptor).unwrap_or_else(|_| SnapPoint::Malformed(descriptor.to_owned()))
    }
}

impl From<String> for SnapPoint {
    fn from(descriptor: String) -> Self {
        SnapPoint::from(descriptor.as_str())
    }
}

impl From<f32> for SnapPoint {
    fn from(px: f32) -> Self {
        SnapPoint::Pixels(px)
    }
}

impl From<u32> for SnapPoint {
    fn from(px: u32) -> Self {
        SnapPoint::Pixels(px as f32)
    }
}

/// Parse a leading integer the way a lenient number reader would: optional
/// whitespace and sign, then digits, ignoring whatever follows.
fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }

    // Saturate instead of overflowing; anything past 100 clamps anyway.
    let magnitude = digits.bytes().fold(0i32, |acc, b| {
        acc.saturating_mul(10).saturating_add((b - b'0') as i32)
    });

    Some(if negative { -magnitude } else { magnitude })
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Where the sheet rests or is heading: closed, or a snap index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SnapTarget {
    /// Fully hidden. Reported as index `-1`.
    #[default]
    Closed,
    /// Resting at the snap point with this index.
    Index(usize),
}

impl SnapTarget {
    /// Index value reported to callbacks, with `-1` for closed.
    pub fn as_i32(self) -> i32 {
        match self {
            SnapTarget::Closed => -1,
            SnapTarget::Index(index) => i32::try_from(index).unwrap_or(i32::MAX),
        }
    }

    /// Get the snap index, if not closed.
    pub fn index(self) -> Option<usize> {
        match self {
            SnapTarget::Closed => None,
            SnapTarget::Index(index) => Some(index),
        }
    }

    /// Check if this is the closed target.
    pub fn is_closed(self) -> bool {
        self == SnapTarget::Closed
    }
}

impl From<usize> for SnapTarget {
    fn from(index: usize) -> Self {
        SnapTarget::Index(index)
    }
}

/// A snap point list resolved against one viewport height.
///
/// The list is replaced wholesale when the configuration changes; indices stay
/// stable for the lifetime of one instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapPoints {
    points: Vec<SnapPoint>,
    heights: Vec<f32>,
    viewport_height: f32,
}

impl SnapPoints {
    /// Resolve `points` against `viewport_height`.
    pub fn new(points: Vec<SnapPoint>, viewport_height: f32) -> Self {
        let mut resolved = Self {
            points,
            heights: Vec::new(),
            viewport_height: sanitize_extent(viewport_height),
        };
        resolved.resolve_all();
        resolved
    }

    fn resolve_all(&mut self) {
        let viewport = self.viewport_height;
        self.heights = self.points.iter().map(|p| p.resolve(viewport)).collect();
    }

    /// The configured descriptors.
    pub fn points(&self) -> &[SnapPoint] {
        &self.points
    }

    /// The resolved heights, in configuration order.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Number of snap points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if no snap points are configured.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The viewport height the heights were resolved against.
    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Re-resolve every descriptor for a new viewport height.
    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = sanitize_extent(viewport_height);
        self.resolve_all();
    }

    /// Check if `index` names a configured snap point.
    pub fn contains(&self, index: usize) -> bool {
        index < self.points.len()
    }

    /// The highest snap index, if any are configured.
    pub fn highest_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// Resolved height of a snap point.
    pub fn height(&self, index: usize) -> Option<f32> {
        self.heights.get(index).copied()
    }

    /// Vertical offset that rests the sheet at `index`.
    ///
    /// Floored at `0` so a snap point taller than the viewport never pushes the
    /// sheet past the top edge.
    pub fn translate_y_for_index(&self, index: usize) -> Option<f32> {
        self.height(index)
            .map(|height| (self.viewport_height - height).max(0.0))
    }

    /// Vertical offset of a fully closed sheet.
    pub fn closed_translate_y(&self) -> f32 {
        self.viewport_height
    }

    /// Vertical offset for a target, `None` for an unknown index.
    pub fn translate_y(&self, target: SnapTarget) -> Option<f32> {
        match target {
            SnapTarget::Closed => Some(self.closed_translate_y()),
            SnapTarget::Index(index) => self.translate_y_for_index(index),
        }
    }

    /// Find the index of an exactly matching descriptor.
    pub fn index_of(&self, point: &SnapPoint) -> Option<usize> {
        self.points.iter().position(|p| p == point)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::SnapPoint;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSnapPoint {
        Number(f64),
        Text(String),
    }

    impl Serialize for SnapPoint {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                SnapPoint::Pixels(px) => serializer.serialize_f32(*px),
                other => serializer.collect_str(other),
            }
        }
    }

    impl<'de> Deserialize<'de> for SnapPoint {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Ok(match RawSnapPoint::deserialize(deserializer)? {
                RawSnapPoint::Number(px) => SnapPoint::Pixels(px as f32),
                RawSnapPoint::Text(text) => SnapPoint::from(text),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(SnapPoint::parse("25%"), Ok(SnapPoint::Percent(25)));
        assert_eq!(SnapPoint::parse(" 90% "), Ok(SnapPoint::Percent(90)));
        assert_eq!(SnapPoint::parse("33.3%"), Ok(SnapPoint::Percent(33)));
        assert_eq!(SnapPoint::parse("-10%"), Ok(SnapPoint::Percent(-10)));
    }

    #[test]
    fn test_parse_pixels() {
        assert_eq!(SnapPoint::parse("320"), Ok(SnapPoint::Pixels(320.0)));
        assert_eq!(SnapPoint::parse("12.5"), Ok(SnapPoint::Pixels(12.5)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(SnapPoint::parse("  "), Err(SnapPointError::Empty));
        assert!(matches!(
            SnapPoint::parse("abc%"),
            Err(SnapPointError::InvalidPercent { .. })
        ));
        assert!(matches!(
            SnapPoint::parse("tall"),
            Err(SnapPointError::InvalidPixels { .. })
        ));
        assert!(matches!(
            SnapPoint::parse("NaN"),
            Err(SnapPointError::InvalidPixels { .. })
        ));
    }

    #[test]
    fn test_lenient_conversion_keeps_malformed() {
        let point = SnapPoint::from("abc%");
        assert_eq!(point, SnapPoint::Malformed("abc%".to_string()));
        assert!(point.is_malformed());
        assert_eq!(point.to_string(), "abc%");
    }

    #[test]
    fn test_percent_overflow_saturates() {
        let point = SnapPoint::from("99999999999999%");
        assert_eq!(point, SnapPoint::Percent(i32::MAX));
        assert_eq!(point.resolve(500.0), 500.0);
    }

    #[test]
    fn test_resolve_percent_clamped() {
        for pct in -50..=150 {
            let height = SnapPoint::Percent(pct).resolve(800.0);
            assert!((0.0..=800.0).contains(&height), "{}% -> {}", pct, height);
        }
        assert_eq!(SnapPoint::Percent(0).resolve(800.0), 0.0);
        assert_eq!(SnapPoint::Percent(-1).resolve(800.0), 0.0);
        assert_eq!(SnapPoint::Percent(100).resolve(800.0), 800.0);
        assert_eq!(SnapPoint::Percent(250).resolve(800.0), 800.0);
        assert_eq!(SnapPoint::Percent(25).resolve(800.0), 200.0);
    }

    #[test]
    fn test_resolve_pixels_clamped() {
        assert_eq!(SnapPoint::Pixels(300.0).resolve(800.0), 300.0);
        assert_eq!(SnapPoint::Pixels(-5.0).resolve(800.0), 0.0);
        assert_eq!(SnapPoint::Pixels(1200.0).resolve(800.0), 800.0);
        assert_eq!(SnapPoint::Pixels(f32::NAN).resolve(800.0), 0.0);
        assert_eq!(SnapPoint::Pixels(f32::INFINITY).resolve(800.0), 800.0);
    }

    #[test]
    fn test_resolve_bad_viewport() {
        assert_eq!(SnapPoint::Percent(50).resolve(f32::NAN), 0.0);
        assert_eq!(SnapPoint::Pixels(100.0).resolve(-10.0), 0.0);
    }

    #[test]
    fn test_malformed_resolves_to_zero() {
        assert_eq!(SnapPoint::from("abc%").resolve(800.0), 0.0);
        assert_eq!(SnapPoint::from("").resolve(800.0), 0.0);
    }

    #[test]
    fn test_translate_y_for_index() {
        let points = SnapPoints::new(vec!["25%".into(), "50%".into(), "90%".into()], 800.0);

        assert_eq!(points.translate_y_for_index(0), Some(600.0));
        assert_eq!(points.translate_y_for_index(1), Some(400.0));
        assert_eq!(points.translate_y_for_index(2), Some(80.0));
        assert_eq!(points.translate_y_for_index(3), None);
        assert_eq!(points.translate_y(SnapTarget::Closed), Some(800.0));
    }

    #[test]
    fn test_translate_y_never_negative() {
        let points = SnapPoints::new(vec![SnapPoint::Pixels(5000.0), "120%".into()], 640.0);

        for index in 0..points.len() {
            let y = points.translate_y_for_index(index).unwrap();
            assert!(y >= 0.0);
        }
    }

    #[test]
    fn test_viewport_change_reresolves() {
        let mut points = SnapPoints::new(vec!["50%".into()], 800.0);
        assert_eq!(points.height(0), Some(400.0));

        points.set_viewport_height(600.0);
        assert_eq!(points.height(0), Some(300.0));
        assert_eq!(points.closed_translate_y(), 600.0);
    }

    #[test]
    fn test_index_of_exact_match() {
        let points = SnapPoints::new(vec!["25%".into(), SnapPoint::Pixels(400.0)], 800.0);

        assert_eq!(points.index_of(&"25%".into()), Some(0));
        assert_eq!(points.index_of(&SnapPoint::Pixels(400.0)), Some(1));
        // Same height, different descriptor.
        assert_eq!(points.index_of(&"50%".into()), None);
    }

    #[test]
    fn test_snap_target_index() {
        assert_eq!(SnapTarget::Closed.as_i32(), -1);
        assert_eq!(SnapTarget::Index(2).as_i32(), 2);
        assert_eq!(SnapTarget::Index(2).index(), Some(2));
        assert!(SnapTarget::default().is_closed());
    }
}
