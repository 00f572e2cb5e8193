//! Ink palette for the e-paper dashboard
//!
//! The panel shows greys only, so every color is an RGB565 grey level.
//! To convert from 8-bit grey: R>>3, G>>2, B>>3

use embedded_graphics::pixelcolor::Rgb565;

/// Paper background
pub const COLOR_PAPER: Rgb565 = Rgb565::new(31, 63, 31);

/// Full ink (filled dots, text, outlines)
pub const COLOR_INK: Rgb565 = Rgb565::new(0, 0, 0);

/// Half-tone ink for empty counter dots
pub const COLOR_INK_EMPTY: Rgb565 = Rgb565::new(128 >> 3, 128 >> 2, 128 >> 3);

/// Dark grey used for the dice shuffle noise
pub const COLOR_NOISE: Rgb565 = Rgb565::new(77 >> 3, 77 >> 2, 77 >> 3);

/// Faint grey for the debug grid overlay and frames
pub const COLOR_GRID: Rgb565 = Rgb565::new(170 >> 3, 170 >> 2, 170 >> 3);
