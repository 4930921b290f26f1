use iced::Color;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const SATURATION: f32 = 0.65;
const LIGHTNESS: f32 = 0.45;

/// Stable per-key colour: the key hashes to a hue at fixed saturation and lightness.
pub fn color_for(seed: &str) -> Color {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let hue = (hasher.finish() % 360) as f32;
    let (r, g, b) = hsl_to_rgb(hue, SATURATION, LIGHTNESS);
    Color::from_rgb(r, g, b)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_color() {
        assert_eq!(color_for("team-1"), color_for("team-1"));
    }

    #[test]
    fn primary_hues_convert() {
        let (r, g, b) = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((r - 1.0).abs() < 1e-6 && g.abs() < 1e-6 && b.abs() < 1e-6);
        let (r, g, b) = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!(r.abs() < 1e-6 && g.abs() < 1e-6 && (b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn channels_stay_in_unit_range() {
        for hue in (0..360).step_by(7) {
            let (r, g, b) = hsl_to_rgb(hue as f32, SATURATION, LIGHTNESS);
            for channel in [r, g, b] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }
}
