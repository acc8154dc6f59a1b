//! Tri-color LED device keeping RGB and HSL views of one color coherent.
//!
//! [`RgbLed`] wraps a [`PwmOutput`] (three duty cycles) and owns the color
//! bookkeeping: the RGB triple is authoritative, the HSL triple is a lazily
//! recomputed cache. Writing RGB invalidates the cache; writing HSL updates
//! RGB immediately and marks the cache valid.

use crate::color::{self, Hsl, Rgb};

/// Narrow seam to the three hardware PWM channels.
pub trait PwmOutput {
    /// Applies one duty-cycle level per channel.
    fn set_levels(&mut self, r: u8, g: u8, b: u8);
}

/// Control surface the node state machine drives.
pub trait LedDevice {
    /// Current RGB view of the color.
    fn rgb(&self) -> Rgb;

    /// Writes the RGB view; invalidates any cached HSL view.
    fn set_rgb(&mut self, color: Rgb);

    /// Current HSL view, recomputed from RGB when the cache is stale.
    fn hsl(&mut self) -> Hsl;

    /// Writes the HSL view and refreshes RGB from it.
    fn set_hsl(&mut self, color: Hsl);

    /// Drives every channel to full scale.
    fn all_on(&mut self);

    /// Drives every channel to zero.
    fn all_off(&mut self);

    /// Flips between dark and the last lit color.
    fn toggle(&mut self);

    /// Runs the short staircase blink animation, then restores the color.
    fn blink(&mut self);
}

/// Per-channel brightness correction applied on the way to the hardware.
///
/// The green die in the reference LED package is noticeably brighter than
/// the red and blue ones, so green defaults to a 0.3 scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChannelScale {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ChannelScale {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 0.3,
            b: 1.0,
        }
    }
}

impl ChannelScale {
    /// No correction on any channel.
    #[must_use]
    pub const fn unity() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }

    fn apply(self, color: Rgb) -> (u8, u8, u8) {
        (
            scale_channel(color.r, self.r),
            scale_channel(color.g, self.g),
            scale_channel(color.b, self.b),
        )
    }
}

fn scale_channel(level: u8, scale: f32) -> u8 {
    color::unit_to_byte(f32::from(level) / 255.0 * scale)
}

/// Tri-color LED over a [`PwmOutput`].
pub struct RgbLed<P> {
    output: P,
    scale: ChannelScale,
    rgb: Rgb,
    hsl: Hsl,
    hsl_valid: bool,
    /// Last lit color, remembered so `toggle` can restore it.
    lit: Rgb,
}

impl<P: PwmOutput> RgbLed<P> {
    /// Creates a dark LED with the default channel correction.
    pub fn new(output: P) -> Self {
        Self::with_scale(output, ChannelScale::default())
    }

    /// Creates a dark LED with an explicit channel correction.
    pub fn with_scale(output: P, scale: ChannelScale) -> Self {
        let mut led = Self {
            output,
            scale,
            rgb: Rgb::OFF,
            hsl: Hsl::default(),
            hsl_valid: false,
            lit: Rgb::OFF,
        };
        led.write_output();
        led
    }

    /// Accesses the underlying output.
    pub fn output(&self) -> &P {
        &self.output
    }

    /// Mutably accesses the underlying output.
    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }

    fn write_output(&mut self) {
        let (r, g, b) = self.scale.apply(self.rgb);
        self.output.set_levels(r, g, b);
    }

    fn refresh_hsl(&mut self) {
        if !self.hsl_valid {
            self.hsl = color::rgb_to_hsl(self.rgb);
            self.hsl_valid = true;
        }
    }
}

impl<P: PwmOutput> LedDevice for RgbLed<P> {
    fn rgb(&self) -> Rgb {
        self.rgb
    }

    fn set_rgb(&mut self, color: Rgb) {
        self.rgb = color;
        self.hsl_valid = false;
        if color != Rgb::OFF {
            self.lit = color;
        }
        self.write_output();
    }

    fn hsl(&mut self) -> Hsl {
        self.refresh_hsl();
        self.hsl
    }

    fn set_hsl(&mut self, color: Hsl) {
        self.hsl = color;
        self.rgb = color::hsl_to_rgb(color);
        // set_rgb would invalidate the cache we just filled, so write the
        // fields directly and mark the cache valid afterwards.
        if self.rgb != Rgb::OFF {
            self.lit = self.rgb;
        }
        self.hsl_valid = true;
        self.write_output();
    }

    fn all_on(&mut self) {
        self.set_rgb(Rgb::WHITE);
    }

    fn all_off(&mut self) {
        self.set_rgb(Rgb::OFF);
    }

    fn toggle(&mut self) {
        if self.rgb == Rgb::OFF {
            let restore = self.lit;
            self.set_rgb(restore);
        } else {
            self.set_rgb(Rgb::OFF);
        }
    }

    fn blink(&mut self) {
        // Staircase ramp up and back down, then restore the held color. The
        // PWM writes are fast enough that no explicit delay is needed.
        let mut level: u8 = 0;
        while level < 255 {
            self.output.set_levels(level, level, level);
            level = level.saturating_add(51);
        }
        let mut level: u8 = 255;
        while level > 0 {
            self.output.set_levels(level, level, level);
            level = level.saturating_sub(51);
        }
        self.write_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Default)]
    struct RecordingPwm {
        levels: Vec<(u8, u8, u8), 32>,
    }

    impl PwmOutput for RecordingPwm {
        fn set_levels(&mut self, r: u8, g: u8, b: u8) {
            let _ = self.levels.push((r, g, b));
        }
    }

    fn unscaled_led() -> RgbLed<RecordingPwm> {
        RgbLed::with_scale(RecordingPwm::default(), ChannelScale::unity())
    }

    #[test]
    fn writing_rgb_invalidates_cached_hsl() {
        let mut led = unscaled_led();
        led.set_hsl(Hsl::new(0.0, 1.0, 0.5));
        assert_eq!(led.rgb(), Rgb::new(255, 0, 0));

        led.set_rgb(Rgb::new(0, 255, 0));
        let hsl = led.hsl();
        assert!((hsl.h - 1.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn writing_hsl_updates_rgb_immediately() {
        let mut led = unscaled_led();
        led.set_hsl(Hsl::new(0.0, 0.0, 0.5));
        assert_eq!(led.rgb(), Rgb::splat(128));
        assert_eq!(
            led.output().levels.last().copied(),
            Some((128, 128, 128))
        );
    }

    #[test]
    fn channel_scale_shapes_hardware_levels_only() {
        let mut led = RgbLed::new(RecordingPwm::default());
        led.set_rgb(Rgb::splat(255));
        // Logical color is untouched; hardware sees the green correction.
        assert_eq!(led.rgb(), Rgb::splat(255));
        assert_eq!(led.output().levels.last().copied(), Some((255, 77, 255)));
    }

    #[test]
    fn toggle_restores_last_lit_color() {
        let mut led = unscaled_led();
        led.set_rgb(Rgb::new(10, 20, 30));
        led.toggle();
        assert_eq!(led.rgb(), Rgb::OFF);
        led.toggle();
        assert_eq!(led.rgb(), Rgb::new(10, 20, 30));
    }

    #[test]
    fn blink_ends_on_the_held_color() {
        let mut led = unscaled_led();
        led.set_rgb(Rgb::new(40, 50, 60));
        led.blink();
        assert_eq!(led.output().levels.last().copied(), Some((40, 50, 60)));
        // The ramp actually drove the channels away from the held color.
        assert!(led.output().levels.iter().any(|&l| l == (255, 255, 255)));
    }
}
