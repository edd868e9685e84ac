//! RGBA colors and CSS color string parsing.

use std::str::FromStr;

use crate::error::ColorParseError;

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from 8-bit channels.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS color string, logging and falling back on failure.
    pub fn parse_or(value: &str, fallback: Self) -> Self {
        match value.parse() {
            Ok(color) => color,
            Err(err) => {
                log::warn!("{err}; using fallback color");
                fallback
            }
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        let err = || ColorParseError(trimmed.to_string());
        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
        {
            let args = args.strip_suffix(')').ok_or_else(err)?;
            return parse_rgb_args(args).ok_or_else(err);
        }
        named(&lower).ok_or_else(err)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 | 4 => {
            let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
            (digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, a)
        }
        6 | 8 => {
            let a = if hex.len() == 8 { byte(6)? } else { 255 };
            (byte(0)?, byte(2)?, byte(4)?, a)
        }
        _ => return None,
    };
    Some(Color::rgb8(r, g, b).with_alpha(a as f32 / 255.0))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |part: &str| -> Option<f32> {
        let value: f32 = part.parse().ok()?;
        Some(value.clamp(0.0, 255.0) / 255.0)
    };
    let alpha = match parts.get(3) {
        Some(part) => part.parse::<f32>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Some(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn named(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::RED,
        "transparent" => Color::TRANSPARENT,
        "green" => Color::rgb8(0, 128, 0),
        "lime" => Color::rgb8(0, 255, 0),
        "blue" => Color::rgb8(0, 0, 255),
        "navy" => Color::rgb8(0, 0, 128),
        "yellow" => Color::rgb8(255, 255, 0),
        "gold" => Color::rgb8(255, 215, 0),
        "orange" => Color::rgb8(255, 165, 0),
        "purple" => Color::rgb8(128, 0, 128),
        "magenta" | "fuchsia" => Color::rgb8(255, 0, 255),
        "cyan" | "aqua" => Color::rgb8(0, 255, 255),
        "teal" => Color::rgb8(0, 128, 128),
        "olive" => Color::rgb8(128, 128, 0),
        "maroon" => Color::rgb8(128, 0, 0),
        "pink" => Color::rgb8(255, 192, 203),
        "brown" => Color::rgb8(165, 42, 42),
        "gray" | "grey" => Color::rgb8(128, 128, 128),
        "silver" => Color::rgb8(192, 192, 192),
        _ => return None,
    };
    Some(color)
}
