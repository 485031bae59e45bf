//! Console command parser.
//!
//! One command per line. Addresses may contain spaces, so `book` separates
//! pickup and dropoff with the word `to`:
//!
//! ```text
//! book 12 Main St to JFK Airport
//! ride comfort
//! cancel | cancel yes | cancel no
//! call | message
//! another | rate 5
//! go profile | back
//! logout | logout yes | logout no
//! quit
//! ```

use ridehail_app::AppEvent;
use ridehail_core::{Destination, Screen};

use crate::catalog;

/// A console line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line names no known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// A required argument is missing.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// The ride tier is not in the catalog.
    #[error("unknown ride tier: {0}")]
    UnknownTier(String),

    /// `go` was given a screen that needs parameters or does not exist.
    #[error("cannot open screen directly: {0}")]
    Screen(String),
}

/// Parse one console line.
pub fn parse(line: &str) -> Result<AppEvent, CommandError> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match (command.to_ascii_lowercase().as_str(), rest) {
        ("book", rest) => {
            let (pickup, dropoff) =
                rest.split_once(" to ").ok_or(CommandError::Usage("book <pickup> to <dropoff>"))?;
            Ok(AppEvent::BookRide {
                pickup: pickup.trim().to_string(),
                dropoff: dropoff.trim().to_string(),
            })
        },
        ("ride", tier) => {
            let tier = if tier.is_empty() { catalog::DEFAULT_TIER } else { tier };
            let ride = catalog::find(tier).ok_or_else(|| CommandError::UnknownTier(tier.to_string()))?;
            Ok(AppEvent::ConfirmRide { ride })
        },
        ("cancel", "") => Ok(AppEvent::RequestCancel),
        ("cancel", "yes") => Ok(AppEvent::ConfirmCancel),
        ("cancel", "no") => Ok(AppEvent::DeclineCancel),
        ("cancel", _) => Err(CommandError::Usage("cancel [yes|no]")),
        ("call", _) => Ok(AppEvent::CallDriver),
        ("message", _) => Ok(AppEvent::MessageDriver),
        ("another", _) => Ok(AppEvent::BookAnother),
        ("rate", stars) => {
            let stars = stars.parse().map_err(|_| CommandError::Usage("rate <1-5>"))?;
            Ok(AppEvent::RateRide { stars })
        },
        ("go", screen) => destination(screen).map(AppEvent::Navigate),
        ("back", _) => Ok(AppEvent::Back),
        ("logout", "") => Ok(AppEvent::RequestLogout),
        ("logout", "yes") => Ok(AppEvent::ConfirmLogout),
        ("logout", "no") => Ok(AppEvent::DeclineLogout),
        ("logout", _) => Err(CommandError::Usage("logout [yes|no]")),
        ("quit" | "exit", _) => Ok(AppEvent::Quit),
        _ => Err(CommandError::Unknown(line.to_string())),
    }
}

fn destination(name: &str) -> Result<Destination, CommandError> {
    let screen: Screen = name.parse().map_err(|_| CommandError::Screen(name.to_string()))?;
    match screen {
        Screen::Home => Ok(Destination::Home),
        Screen::Driver => Ok(Destination::Driver),
        Screen::Rides => Ok(Destination::Rides),
        Screen::Payment => Ok(Destination::Payment),
        Screen::Profile => Ok(Destination::Profile),
        Screen::RideBooking | Screen::RideDetails => Err(CommandError::Screen(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_splits_on_to() {
        assert_eq!(
            parse("book 12 Main St to JFK Airport"),
            Ok(AppEvent::BookRide { pickup: "12 Main St".into(), dropoff: "JFK Airport".into() })
        );
        assert_eq!(parse("book Main St"), Err(CommandError::Usage("book <pickup> to <dropoff>")));
    }

    #[test]
    fn ride_defaults_to_economy() {
        let Ok(AppEvent::ConfirmRide { ride }) = parse("ride") else {
            unreachable!("ride without tier must parse");
        };
        assert_eq!(ride.id, "economy");
        assert_eq!(parse("ride limo"), Err(CommandError::UnknownTier("limo".into())));
    }

    #[test]
    fn two_step_commands() {
        assert_eq!(parse("cancel"), Ok(AppEvent::RequestCancel));
        assert_eq!(parse("cancel yes"), Ok(AppEvent::ConfirmCancel));
        assert_eq!(parse("  logout no "), Ok(AppEvent::DeclineLogout));
    }

    #[test]
    fn go_refuses_parameterised_screens() {
        assert_eq!(parse("go profile"), Ok(AppEvent::Navigate(Destination::Profile)));
        assert_eq!(parse("go ride-details"), Err(CommandError::Screen("ride-details".into())));
        assert_eq!(parse("go moon"), Err(CommandError::Screen("moon".into())));
    }

    #[test]
    fn rate_needs_a_number() {
        assert_eq!(parse("rate 4"), Ok(AppEvent::RateRide { stars: 4 }));
        assert_eq!(parse("rate lots"), Err(CommandError::Usage("rate <1-5>")));
        assert_eq!(parse("fly"), Err(CommandError::Unknown("fly".into())));
    }
}
