//! Tracker tuning.

use serde::{Deserialize, Serialize};

/// Layout and timing constants for section tracking.
///
/// The defaults describe the blog layout: a 56px fixed header, with the
/// activation line sitting 100px below it. Everything is overridable so a
/// page with a different chrome can reuse the tracker unchanged.
#[derive(Clone, Debug, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Height of the fixed page header, in pixels.
    pub header_height: f64,
    /// How far below the header the activation line sits.
    pub activation_padding: f64,
    /// Breathing room left above a heading after click navigation.
    pub click_padding: f64,
    /// Distance multiplier for headings below the activation line.
    pub below_penalty: f64,
    /// How far below the line a heading may sit and still qualify.
    pub below_tolerance: f64,
    /// Bottom viewport margin for the intersection observer, in percent.
    pub bottom_margin_percent: f64,
    /// Scroll offsets under this count as the top of the page.
    pub top_region: f64,
    /// DOM resolution attempts before giving up.
    pub max_retries: u32,
    /// Delay between DOM resolution attempts, in milliseconds.
    pub retry_delay_ms: u32,
    /// Time allowed for smooth scrolling to settle, in milliseconds.
    pub settle_delay_ms: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            header_height: 56.0,
            activation_padding: 100.0,
            click_padding: 20.0,
            below_penalty: 1.5,
            below_tolerance: 150.0,
            bottom_margin_percent: 70.0,
            top_region: 100.0,
            max_retries: 10,
            retry_delay_ms: 100,
            settle_delay_ms: 300,
        }
    }
}

impl TrackerConfig {
    /// Viewport y position where a section becomes the active one.
    pub fn activation_line(&self) -> f64 {
        self.header_height + self.activation_padding
    }

    /// Offset subtracted from a heading's page position when scrolling
    /// to it after a click.
    pub fn click_offset(&self) -> f64 {
        self.header_height + self.click_padding
    }
}
