//! Background color for an expanded group, picked from a three-color diagonal
//! gradient (high importance and urgency in one corner, low in the opposite).
//!
//! The plane is split into four quadrants around (50, 50). Each quadrant is a
//! bilinear blend of four corner colors taken from `high`, `mid`, `low` and
//! the two midpoints `high_mid` and `low_mid`.

use crate::color::{ColorError, Rgba};
use crate::theme::Theme;

/// Reference colors of the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientPalette {
    pub high: Rgba,
    pub mid: Rgba,
    pub low: Rgba,
}

impl GradientPalette {
    pub fn new(high: Rgba, mid: Rgba, low: Rgba) -> Self {
        Self { high, mid, low }
    }

    pub fn from_theme(theme: &Theme) -> Result<Self, ColorError> {
        Ok(Self {
            high: Rgba::parse(&theme.gradient_high)?,
            mid: Rgba::parse(&theme.gradient_mid)?,
            low: Rgba::parse(&theme.gradient_low)?,
        })
    }

    pub fn high_mid(&self) -> Rgba {
        self.high.midpoint(self.mid)
    }

    pub fn low_mid(&self) -> Rgba {
        self.low.midpoint(self.mid)
    }

    /// Group background for the given averaged ratings.
    pub fn color_for(&self, importance: u8, urgency: u8) -> Rgba {
        Quadrant::containing(importance, urgency).blend(self, importance, urgency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// importance > 50, urgency > 50
    ImportantUrgent,
    /// importance > 50, urgency <= 50
    ImportantNotUrgent,
    /// importance <= 50, urgency <= 50
    Neither,
    /// importance <= 50, urgency > 50
    UrgentNotImportant,
}

/// Corner colors in upper-left, upper-right, lower-right, lower-left order.
struct Corners {
    upper_left: Rgba,
    upper_right: Rgba,
    lower_right: Rgba,
    lower_left: Rgba,
}

impl Quadrant {
    pub fn containing(importance: u8, urgency: u8) -> Self {
        match (importance > 50, urgency > 50) {
            (true, true) => Quadrant::ImportantUrgent,
            (true, false) => Quadrant::ImportantNotUrgent,
            (false, false) => Quadrant::Neither,
            (false, true) => Quadrant::UrgentNotImportant,
        }
    }

    fn corners(self, palette: &GradientPalette) -> Corners {
        let (high, mid, low) = (palette.high, palette.mid, palette.low);
        let (high_mid, low_mid) = (palette.high_mid(), palette.low_mid());
        let [upper_left, upper_right, lower_right, lower_left] = match self {
            Quadrant::ImportantUrgent => [high, high_mid, mid, high_mid],
            Quadrant::ImportantNotUrgent => [high_mid, mid, low_mid, mid],
            Quadrant::Neither => [mid, low_mid, low, low_mid],
            Quadrant::UrgentNotImportant => [high_mid, mid, low_mid, mid],
        };
        Corners {
            upper_left,
            upper_right,
            lower_right,
            lower_left,
        }
    }

    /// Local `(x, y)` weights in `[0, 1]`; 1 means fully toward the
    /// upper-left corner of the quadrant.
    fn weights(self, importance: u8, urgency: u8) -> (f32, f32) {
        let upper = |value: u8| (value as f32 - 50.0) / 50.0;
        let lower = |value: u8| value as f32 / 50.0;
        let (xw, yw) = match self {
            Quadrant::ImportantUrgent => (upper(urgency), upper(importance)),
            Quadrant::ImportantNotUrgent => (lower(urgency), upper(importance)),
            Quadrant::Neither => (lower(urgency), lower(importance)),
            Quadrant::UrgentNotImportant => (upper(urgency), lower(importance)),
        };
        (xw.clamp(0.0, 1.0), yw.clamp(0.0, 1.0))
    }

    /// Bilinear blend of this quadrant's corners. The ratings are not required
    /// to lie inside the quadrant; weights are clamped to its edges.
    pub fn blend(self, palette: &GradientPalette, importance: u8, urgency: u8) -> Rgba {
        let corners = self.corners(palette);
        let (xw, yw) = self.weights(importance, urgency);
        let ul = corners.upper_left.channels();
        let ur = corners.upper_right.channels();
        let lr = corners.lower_right.channels();
        let ll = corners.lower_left.channels();
        let mut out = [0u8; 4];
        for (idx, channel) in out.iter_mut().enumerate() {
            let value = ul[idx] as f32 * (yw * xw)
                + lr[idx] as f32 * ((1.0 - xw) * (1.0 - yw))
                + ur[idx] as f32 * (yw * (1.0 - xw))
                + ll[idx] as f32 * ((1.0 - yw) * xw);
            *channel = value.clamp(0.0, 255.0) as u8;
        }
        Rgba::from_channels(out)
    }
}
