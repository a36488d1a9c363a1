use std::fmt;

use crate::date::CityDate;

/// Capability code the host uses to route the date cheat to its handler.
pub const CHEAT_ID_SIM_DATE: u32 = 0x8A78_BEFF;

/// The corrective date cheat, `SimDate <month> <day> <year>`.
///
/// The host interprets the submitted date as the day *before* the date the
/// simulator should show, so the command built for a target date carries
/// the preceding calendar day. To land on 1/1/2000 the command text must
/// read `SimDate 12 31 1999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimDateCommand {
    command_date: CityDate,
}

impl SimDateCommand {
    /// Command that moves the simulator to `target`. `None` when the
    /// preceding day cannot be represented.
    pub fn for_target(target: CityDate) -> Option<Self> {
        target
            .previous_day()
            .map(|command_date| Self { command_date })
    }

    /// The date carried in the command text (one day before the target).
    pub fn command_date(self) -> CityDate {
        self.command_date
    }
}

impl fmt::Display for SimDateCommand {
    /// Renders plain ASCII decimal digits; integer formatting ignores the
    /// process locale, so the command text is byte-stable everywhere.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SimDate {}", self.command_date)
    }
}
