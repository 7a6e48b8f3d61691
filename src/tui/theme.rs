//! Theme and styling definitions

use ratatui::style::{Color, Modifier, Style};

/// Colors used to draw a table view
///
/// Row colors come from the renderer's colorer; the theme only decides
/// chrome and whether row colors are applied at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub table_header: Color,
    pub table_selected: Color,
    pub table_selected_bg: Color,
    pub border: Color,
    pub title: Color,
    pub title_namespace_all: Color,
    /// Apply colorer output to rows
    pub colorize_rows: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            table_header: Color::Cyan,
            table_selected: Color::Blue,
            table_selected_bg: Color::DarkGray,
            border: Color::Gray,
            title: Color::Yellow,
            title_namespace_all: Color::Green,
            colorize_rows: true,
        }
    }
}

impl Theme {
    /// Built-in skin names
    pub const SKINS: &'static [&'static str] = &["default", "mono"];

    /// Look up a built-in skin
    pub fn named(skin: &str) -> Option<Self> {
        match skin {
            "default" => Some(Self::default()),
            "mono" => Some(Self {
                table_header: Color::Reset,
                table_selected: Color::Reset,
                table_selected_bg: Color::Reset,
                border: Color::Reset,
                title: Color::Reset,
                title_namespace_all: Color::Reset,
                colorize_rows: false,
            }),
            _ => None,
        }
    }

    /// Skin by name, falling back to the default skin
    pub fn load(skin: &str) -> Self {
        Self::named(skin).unwrap_or_else(|| {
            tracing::warn!("Unknown skin '{}', using default", skin);
            Self::default()
        })
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.table_header)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(&self, is_all: bool) -> Style {
        Style::default()
            .fg(if is_all {
                self.title_namespace_all
            } else {
                self.title
            })
            .add_modifier(Modifier::BOLD)
    }

    pub fn table_selected_style(&self) -> Style {
        let style = Style::default()
            .fg(self.table_selected)
            .bg(self.table_selected_bg);
        if self.colorize_rows {
            style
        } else {
            style.add_modifier(Modifier::REVERSED)
        }
    }

    pub fn row_style(&self, color: Color) -> Style {
        if self.colorize_rows {
            Style::default().fg(color)
        } else {
            Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_skins() {
        for skin in Theme::SKINS {
            assert!(Theme::named(skin).is_some(), "{}", skin);
        }
        assert!(Theme::named("dracula").is_none());
        assert_eq!(Theme::load("dracula"), Theme::default());
    }

    #[test]
    fn test_mono_ignores_row_colors() {
        let theme = Theme::load("mono");
        assert_eq!(theme.row_style(Color::Red), Style::default());
        assert_eq!(
            Theme::default().row_style(Color::Red),
            Style::default().fg(Color::Red)
        );
    }
}
