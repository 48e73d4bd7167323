//! Color palettes for the interactive form

use ratatui::prelude::*;

use crate::config::ThemeMode;

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Title and tabs
    pub title_color: Color,
    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Form rows
    pub label_color: Color,
    pub hint_color: Color,
    pub focus_style: Style,
    pub choice_selected: Style,
    pub choice_idle: Style,
    pub input_style: Style,
    pub button_style: Style,

    // Results
    pub aggregate_color: Color,
    pub percentage_color: Color,
    pub bonus_color: Color,
    pub bar_empty: Color,

    // Status bar
    pub muted: Color,
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            title_color: Color::Indexed(105),
            tab_active_style: Style::new().fg(Color::Indexed(105)).bold().underlined(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            label_color: Color::Gray,
            hint_color: Color::DarkGray,
            focus_style: Style::new().bg(Color::Indexed(237)),
            choice_selected: Style::new().fg(Color::White).bg(Color::Indexed(62)).bold(),
            choice_idle: Style::new().fg(Color::Gray).bg(Color::Indexed(238)),
            input_style: Style::new().fg(Color::White),
            button_style: Style::new().fg(Color::White).bg(Color::Indexed(62)).bold(),
            aggregate_color: Color::Indexed(105),
            percentage_color: Color::Indexed(147),
            bonus_color: Color::Green,
            bar_empty: Color::DarkGray,
            muted: Color::Gray,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Indexed(105),
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Indexed(105),
            popup_title: Style::new().fg(Color::Indexed(105)).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            title_color: Color::Indexed(55),
            tab_active_style: Style::new().fg(Color::Indexed(55)).bold().underlined(),
            tab_inactive_style: Style::new().fg(Color::Indexed(244)),
            label_color: Color::Indexed(238),
            hint_color: Color::Indexed(244),
            focus_style: Style::new().bg(Color::Indexed(254)),
            choice_selected: Style::new().fg(Color::White).bg(Color::Indexed(61)).bold(),
            choice_idle: Style::new().fg(Color::Indexed(238)).bg(Color::Indexed(252)),
            input_style: Style::new().fg(Color::Black),
            button_style: Style::new().fg(Color::White).bg(Color::Indexed(61)).bold(),
            aggregate_color: Color::Indexed(55),
            percentage_color: Color::Indexed(61),
            bonus_color: Color::Indexed(28),
            bar_empty: Color::Indexed(250),
            muted: Color::Indexed(242),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Indexed(55),
            flash_success: Color::Indexed(28),
            flash_error: Color::Indexed(160),
            popup_border: Color::Indexed(55),
            popup_title: Style::new().fg(Color::Indexed(55)).bold(),
        }
    }
}

/// Pick a palette. `auto` asks the terminal for its background luma and
/// falls back to dark when the terminal does not answer.
pub fn resolve_theme(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
        ThemeMode::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => {
                tracing::debug!(luma, "light terminal background detected");
                ThemeColors::light()
            }
            Ok(_) => ThemeColors::dark(),
            Err(e) => {
                tracing::debug!("could not detect terminal background: {}", e);
                ThemeColors::dark()
            }
        },
    }
}
