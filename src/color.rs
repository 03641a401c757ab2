use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0 + 210.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chart colours
// ---------------------------------------------------------------------------

/// One colour per line on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColors {
    pub data: Color32,
    pub trend: Color32,
    pub moving_average: Color32,
}

impl Default for SeriesColors {
    fn default() -> Self {
        match generate_palette(3).as_slice() {
            &[data, trend, moving_average] => SeriesColors {
                data,
                trend,
                moving_average,
            },
            _ => SeriesColors {
                data: Color32::LIGHT_BLUE,
                trend: Color32::RED,
                moving_average: Color32::GREEN,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(5).len(), 5);
    }

    #[test]
    fn series_colours_are_distinct() {
        let c = SeriesColors::default();
        assert_ne!(c.data, c.trend);
        assert_ne!(c.trend, c.moving_average);
        assert_ne!(c.data, c.moving_average);
    }
}
