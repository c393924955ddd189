//! Hue/saturation/brightness to RGB conversion.
//!
//! Inputs use the units HomeKit-style controllers send: hue in degrees
//! `[0, 360)`, saturation and brightness in percent `[0, 100]`.

use rgb::RGB8;

pub const BLACK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Converts a hue/saturation/brightness triple into an 8-bit RGB color.
///
/// Channels are truncated, not rounded. A saturation of zero always yields
/// black, whatever the hue and brightness. Hues exactly on a sextant edge
/// (60, 120, ...) use the formula of the lower sextant; both neighbours
/// agree there. Hues outside `[0, 360]` (including NaN) yield black.
///
/// ```
/// use rgb::RGB8;
/// use rgb_lightbulb::color::hsv_to_rgb;
///
/// assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), RGB8::new(0, 255, 0));
/// assert_eq!(hsv_to_rgb(42.0, 0.0, 100.0), RGB8::new(0, 0, 0));
/// ```
pub fn hsv_to_rgb(hue: f64, saturation: f64, brightness: f64) -> RGB8 {
    let h = hue / 60.0;
    let s = saturation / 100.0;
    let v = brightness / 100.0;

    if s <= 0.0 {
        return BLACK;
    }

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());

    let (r, g, b) = if (0.0..=1.0).contains(&h) {
        (c, x, 0.0)
    } else if (1.0..=2.0).contains(&h) {
        (x, c, 0.0)
    } else if (2.0..=3.0).contains(&h) {
        (0.0, c, x)
    } else if (3.0..=4.0).contains(&h) {
        (0.0, x, c)
    } else if (4.0..=5.0).contains(&h) {
        (x, 0.0, c)
    } else if (5.0..=6.0).contains(&h) {
        (c, 0.0, x)
    } else {
        return BLACK;
    };

    let m = v - c;
    RGB8::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

// `as` truncates toward zero and saturates, so float noise never wraps.
fn to_channel(value: f64) -> u8 {
    (value * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(hsv_to_rgb(0.0, 100.0, 100.0), RGB8::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 100.0, 100.0), RGB8::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(240.0, 100.0, 100.0), RGB8::new(0, 0, 255));
    }

    #[test]
    fn test_secondary_colors_on_sextant_edges() {
        assert_eq!(hsv_to_rgb(60.0, 100.0, 100.0), RGB8::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(180.0, 100.0, 100.0), RGB8::new(0, 255, 255));
        assert_eq!(hsv_to_rgb(300.0, 100.0, 100.0), RGB8::new(255, 0, 255));
    }

    #[test]
    fn test_channels_are_truncated() {
        // h' = 1.5, C = 0.5, X = 0.25, m = 0.5 -> (191.25, 255, 127.5)
        assert_eq!(hsv_to_rgb(90.0, 50.0, 100.0), RGB8::new(191, 255, 127));
        // v = 0.5 -> 127.5 on the dominant channel
        assert_eq!(hsv_to_rgb(0.0, 100.0, 50.0), RGB8::new(127, 0, 0));
    }

    #[test]
    fn test_zero_saturation_is_black() {
        assert_eq!(hsv_to_rgb(0.0, 0.0, 100.0), BLACK);
        assert_eq!(hsv_to_rgb(200.0, 0.0, 50.0), BLACK);
    }

    #[test]
    fn test_zero_brightness_is_black() {
        assert_eq!(hsv_to_rgb(200.0, 100.0, 0.0), BLACK);
    }

    #[test]
    fn test_out_of_range_hue_is_black() {
        assert_eq!(hsv_to_rgb(-30.0, 100.0, 100.0), BLACK);
        assert_eq!(hsv_to_rgb(400.0, 100.0, 100.0), BLACK);
        assert_eq!(hsv_to_rgb(f64::NAN, 100.0, 100.0), BLACK);
    }

    #[test]
    fn test_hue_360_falls_in_last_sextant() {
        assert_eq!(hsv_to_rgb(360.0, 100.0, 100.0), RGB8::new(255, 0, 0));
    }

    proptest! {
        #[test]
        fn test_desaturated_is_always_black(h in 0.0f64..360.0, v in 0.0f64..=100.0) {
            prop_assert_eq!(hsv_to_rgb(h, 0.0, v), BLACK);
        }

        #[test]
        fn test_full_brightness_and_saturation_has_a_full_channel(h in 0.0f64..360.0) {
            let rgb = hsv_to_rgb(h, 100.0, 100.0);
            prop_assert!(rgb.r == 255 || rgb.g == 255 || rgb.b == 255);
        }

        #[test]
        fn test_brightness_bounds_every_channel(
            h in 0.0f64..360.0,
            s in 0.0f64..=100.0,
            v in 0.0f64..=100.0,
        ) {
            let rgb = hsv_to_rgb(h, s, v);
            let ceiling = (v / 100.0 * 255.0).ceil() as u8;
            prop_assert!(rgb.r <= ceiling && rgb.g <= ceiling && rgb.b <= ceiling);
        }
    }
}
