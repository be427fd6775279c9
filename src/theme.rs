//! Colour palette for the TUI

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,    // Active borders, key hints
    pub danger: Color,    // Errors, NaN results
    pub success: Color,   // Enabled toggles, sums
    pub warning: Color,   // Status messages
    pub text: Color,
    pub text_dim: Color,
    pub inactive: Color,  // Inactive borders, disabled toggles
    pub header: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(250, 179, 135),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(243, 139, 168),
        }
    }
}
