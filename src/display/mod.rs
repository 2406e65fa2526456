use owo_colors::OwoColorize;

use crate::types::Vocabulary;

pub mod cards;
pub mod table;
pub mod toast;

pub use cards::render_cards;
pub use table::render_table;
pub use toast::{Toast, ToastLevel};

/// Badge palette shared by every status/stage vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeColor {
    Blue,
    Purple,
    Teal,
    Green,
    Yellow,
    Orange,
    Red,
    /// Fallback for unknown values
    Gray,
}

pub fn format_badge<V: Vocabulary>(value: &V) -> String {
    format_badge_with_format(value, |s| format!("[{}]", s))
}

pub fn format_badge_with_format<V, F>(value: &V, format_fn: F) -> String
where
    V: Vocabulary,
    F: Fn(&str) -> String,
{
    paint(&format_fn(value.label()), value.badge())
}

/// Apply a badge color to already-formatted text
pub fn paint(text: &str, color: BadgeColor) -> String {
    match color {
        BadgeColor::Blue => text.blue().to_string(),
        BadgeColor::Purple => text.magenta().to_string(),
        BadgeColor::Teal => text.cyan().to_string(),
        BadgeColor::Green => text.green().to_string(),
        BadgeColor::Yellow => text.yellow().to_string(),
        BadgeColor::Orange => text.bright_yellow().to_string(),
        BadgeColor::Red => text.red().to_string(),
        BadgeColor::Gray => text.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ApplicationStatus, StudentStage};

    #[test]
    fn test_badge_colors_for_known_values() {
        assert_eq!(StudentStage::Inquiry.badge(), BadgeColor::Blue);
        assert_eq!(StudentStage::Enrollment.badge(), BadgeColor::Teal);
        assert_eq!(ApplicationStatus::Rejected.badge(), BadgeColor::Red);
    }

    #[test]
    fn test_badge_falls_back_to_gray() {
        let stage = StudentStage::parse_lossy("on_hold");
        assert_eq!(stage.badge(), BadgeColor::Gray);
        assert!(format_badge(&stage).contains("[Unknown]"));
    }

    #[test]
    fn test_format_badge_with_custom_format() {
        let badge = format_badge_with_format(&StudentStage::Offer, |s| s.to_uppercase());
        assert!(badge.contains("OFFER"));
    }
}
