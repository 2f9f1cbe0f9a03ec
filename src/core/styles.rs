//! Colour roles for the lag report and the `--help` output.
//!
//! Painting is explicit: `paint()` only emits escape codes when its `enabled`
//! argument is true, so nothing here depends on global terminal state.
//!
//! ```
//! use streamlag::core::styles::StyleRole;
//! assert_eq!(StyleRole::Key.paint("Consumer", false), "Consumer");
//! let painted = StyleRole::Key.paint("Consumer", true);
//! assert!(painted.starts_with("\x1b[") && painted.ends_with("\x1b[0m"));
//! ```

use clap::builder::styling::{AnsiColor, Color as ClapColor, Style, Styles};
use colored::Color;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleRole {
    /// Consumer names and help section headings
    Header,
    /// Field labels and literal flags in help
    Key,
    /// Separators and help placeholders
    Dim,
    Error,
    CaughtUp,
    Behind,
    Ahead,
}

impl StyleRole {
    pub fn color(self) -> Color {
        match self {
            StyleRole::Header => Color::Yellow,
            StyleRole::Key => Color::BrightGreen,
            StyleRole::Dim => Color::BrightBlack,
            StyleRole::Error => Color::BrightRed,
            StyleRole::CaughtUp => Color::Green,
            StyleRole::Behind => Color::BrightYellow,
            StyleRole::Ahead => Color::BrightMagenta,
        }
    }

    /// Role for a lag value: caught up, behind, or ahead of the snapshot
    pub fn for_lag(lag: i64) -> Self {
        match lag {
            0 => StyleRole::CaughtUp,
            l if l > 0 => StyleRole::Behind,
            _ => StyleRole::Ahead,
        }
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match basic_color(self.color()) {
            Some((code, _)) if enabled => format!("\x1b[{}m{}\x1b[0m", code, text),
            _ => text.to_string(),
        }
    }

    fn clap_style(self) -> Style {
        let ansi = basic_color(self.color()).map(|(_, ansi)| ClapColor::Ansi(ansi));
        Style::new().fg_color(ansi)
    }
}

// SGR foreground code and clap colour for the sixteen basic terminal colours
fn basic_color(color: Color) -> Option<(u8, AnsiColor)> {
    use AnsiColor as A;
    Some(match color {
        Color::Black => (30, A::Black),
        Color::Red => (31, A::Red),
        Color::Green => (32, A::Green),
        Color::Yellow => (33, A::Yellow),
        Color::Blue => (34, A::Blue),
        Color::Magenta => (35, A::Magenta),
        Color::Cyan => (36, A::Cyan),
        Color::White => (37, A::White),
        Color::BrightBlack => (90, A::BrightBlack),
        Color::BrightRed => (91, A::BrightRed),
        Color::BrightGreen => (92, A::BrightGreen),
        Color::BrightYellow => (93, A::BrightYellow),
        Color::BrightBlue => (94, A::BrightBlue),
        Color::BrightMagenta => (95, A::BrightMagenta),
        Color::BrightCyan => (96, A::BrightCyan),
        Color::BrightWhite => (97, A::BrightWhite),
        _ => return None,
    })
}

/// Help output styles built from the same roles as the report
pub fn palette_to_clap(enabled: bool) -> Styles {
    if !enabled {
        return Styles::plain();
    }
    Styles::styled()
        .header(StyleRole::Header.clap_style().bold())
        .usage(StyleRole::Header.clap_style().bold())
        .literal(StyleRole::Key.clap_style())
        .placeholder(StyleRole::Dim.clap_style())
        .valid(StyleRole::CaughtUp.clap_style())
        .invalid(StyleRole::Error.clap_style())
        .error(StyleRole::Error.clap_style().bold())
}
