use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

/// Heatmap cell colour: white at -1, deep blue at +1, gray when undefined.
pub fn heat_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let t = ((r.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;
    let low = Srgb::new(0.97, 0.98, 1.0);
    let high = Srgb::new(0.03, 0.19, 0.42);
    to_color32(low.mix(high, t))
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the group labels of a scatter plot to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, label: Option<&str>) -> Color32 {
        label
            .and_then(|l| self.mapping.get(l))
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn test_heat_color_extremes() {
        assert_eq!(heat_color(f64::NAN), Color32::GRAY);
        assert_ne!(heat_color(-1.0), heat_color(1.0));
        assert_eq!(heat_color(5.0), heat_color(1.0));
    }

    #[test]
    fn test_color_map_falls_back() {
        let cm = ColorMap::new(["male", "female"]);
        assert_ne!(cm.color_for(Some("male")), cm.color_for(Some("female")));
        assert_eq!(cm.color_for(Some("other")), Color32::LIGHT_BLUE);
        assert_eq!(cm.color_for(None), Color32::LIGHT_BLUE);
    }
}
