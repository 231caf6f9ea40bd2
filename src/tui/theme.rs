//! Centralized theme module for TUI color constants and styles

use ratatui::prelude::*;

use crate::config::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Pick a concrete theme. `Auto` queries the terminal background; must run
/// before the terminal enters raw mode.
pub fn resolve_theme(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Light => Theme::Light,
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(e) => {
                tracing::debug!("Could not detect terminal background: {}", e);
                Theme::Dark
            }
        },
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Estimate panel
    pub estimate_color: Color,
    pub bar_positive: Color, // adds days
    pub bar_negative: Color, // removes days
    pub bar_axis: Color,
    pub note_color: Color,

    // Form table
    pub row_alt_bg: Color,
    pub label_color: Color,
    pub header_style: Style,
    pub row_selected: Style,
    pub edit_style: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,

    // Tab colors
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,
    pub flash_info: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            estimate_color: Color::Green,
            bar_positive: Color::Yellow,
            bar_negative: Color::Green,
            bar_axis: Color::DarkGray,
            note_color: Color::Yellow,
            row_alt_bg: Color::Indexed(235),
            label_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            edit_style: Style::new().fg(Color::Cyan).bold(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            flash_info: Color::White,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    pub fn light() -> Self {
        Self {
            estimate_color: Color::Rgb(0, 110, 40),
            bar_positive: Color::Rgb(190, 110, 0),
            bar_negative: Color::Rgb(0, 130, 60),
            bar_axis: Color::Gray,
            note_color: Color::Rgb(160, 90, 0),
            row_alt_bg: Color::Indexed(254),
            label_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            edit_style: Style::new().fg(Color::Blue).bold(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            tab_active_style: Style::new().fg(Color::Blue).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::Gray),
            status_bar_bg: Color::Indexed(252),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 120, 40),
            flash_error: Color::Red,
            flash_info: Color::Black,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            popup_bg: Color::Indexed(255),
        }
    }

    /// Bar color by sign: additions warn, reductions reassure
    pub fn bar_color(&self, days: f64) -> Color {
        if days < 0.0 {
            self.bar_negative
        } else {
            self.bar_positive
        }
    }
}
