use crate::card::Color;

/// Log levels.
///
/// Each level carries a fixed set of attributes: [`color`](Self::color) is the
/// accent used for any card in the log message, [`force_card`](Self::force_card)
/// wraps even plain text in a card, and
/// [`routes_to_error_channel`](Self::routes_to_error_channel) sends the log to
/// the error channel instead of the regular one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Regular,
}

impl LogLevel {
    pub fn color(self) -> Color {
        match self {
            LogLevel::Error => Color::ERROR,
            LogLevel::Warn => Color::WARN,
            LogLevel::Info => Color::INFO,
            LogLevel::Regular => Color::REGULAR,
        }
    }

    pub fn force_card(self) -> bool {
        !matches!(self, LogLevel::Regular)
    }

    pub fn routes_to_error_channel(self) -> bool {
        matches!(self, LogLevel::Error)
    }
}
