use std::rc::Rc;

use tracing::debug;

use crate::command::{SimDateCommand, CHEAT_ID_SIM_DATE};
use crate::date::CityDate;
use crate::host::{AppAccess, CityAccess, CommandExecutor, SimulatorAccess};
use crate::log::SessionLog;

/// Applies the date-continuity policy across the four lifecycle
/// notifications.
///
/// Owns two pieces of cross-event state: the date captured by the most
/// recent save, and a latch distinguishing "returned to the region view
/// after leaving a city" from a genuine region switch. Corrections only
/// ever move a city's date forward; a loaded city that is already at or
/// past the remembered date is left alone. Every failure path degrades to
/// a session-log line; no operation panics or returns an error.
pub struct DateSyncController {
    remembered_date: Option<CityDate>,
    exiting_city: bool,
    log: Rc<dyn SessionLog>,
}

impl DateSyncController {
    pub fn new(log: Rc<dyn SessionLog>) -> Self {
        Self {
            remembered_date: None,
            exiting_city: false,
            log,
        }
    }

    /// Date captured by the most recent save, until a correction consumes
    /// it or a region switch discards it.
    pub fn remembered_date(&self) -> Option<CityDate> {
        self.remembered_date
    }

    pub fn is_exiting_city(&self) -> bool {
        self.exiting_city
    }

    /// A city finished loading: compare its date against the remembered
    /// one and push it forward when it lags behind.
    pub fn on_city_loaded(&mut self, city: Option<&dyn CityAccess>, app: Option<&dyn AppAccess>) {
        let Some(city) = city else {
            self.log
                .write_line("Unable to check the date because no city was provided.");
            return;
        };
        if !city.established() {
            self.log.write_line(
                "The city has not been established; once it is established the date \
                 may be changed the next time it is loaded.",
            );
            return;
        }
        let Some(simulator) = city.simulator() else {
            self.log
                .write_line("Unable to check the date because the simulator was unavailable.");
            return;
        };
        let Some(remembered) = self.remembered_date else {
            // Normal case for the first city loaded in a region session.
            self.log
                .write_line("The city date has not been set for the current region.");
            return;
        };
        let Some(current) = simulator.sim_date() else {
            self.log
                .write_line("Unable to check the date because the city date was unavailable.");
            return;
        };
        if current >= remembered {
            self.log
                .write_line("The city has a more recent date than the previous city.");
            return;
        }
        self.correct_date(current, remembered, app);
    }

    fn correct_date(&mut self, current: CityDate, target: CityDate, app: Option<&dyn AppAccess>) {
        let Some(app) = app else {
            self.log
                .write_line("Unable to change the date because the application was unavailable.");
            return;
        };
        let Some(executor) = app.cheat_codes() else {
            self.log.write_line(
                "Unable to change the date because the cheat executor was unavailable.",
            );
            return;
        };
        let Some(command) = SimDateCommand::for_target(target) else {
            self.log.write_line("Failed to create the date cheat command.");
            return;
        };

        // The host reports no outcome for cheat submission; the date is
        // assumed to be applied and the remembered value is consumed.
        let command_text = command.to_string();
        executor.submit_cheat(&command_text, CHEAT_ID_SIM_DATE);
        self.remembered_date = None;
        debug!(command = %command_text, "date_correction_submitted");
        self.log
            .write_line(&format!("Changed the city date from {current} to {target}."));
    }

    /// A city was saved: capture its current date as the new reference for
    /// the rest of the region session.
    pub fn on_city_saved(&mut self, app: Option<&dyn AppAccess>) {
        let Some(app) = app else {
            self.log
                .write_line("Ignoring the date because the application was unavailable.");
            return;
        };
        let Some(city) = app.city() else {
            self.log
                .write_line("Ignoring the date because no city was available.");
            return;
        };
        if !city.established() {
            self.log
                .write_line("Ignoring the date because the city has not been established.");
            return;
        }
        let Some(simulator) = city.simulator() else {
            self.log
                .write_line("Ignoring the date because the simulator was unavailable.");
            return;
        };
        let Some(date) = simulator.sim_date() else {
            self.log
                .write_line("Ignoring the date because the city date was unavailable.");
            return;
        };

        self.remembered_date = Some(date);
        debug!(date = %date, "city_date_remembered");
        self.log
            .write_line(&format!("Saved the current city date: {date}."));
    }

    /// A city is shutting down back to the region view.
    pub fn on_city_shutting_down(&mut self) {
        self.exiting_city = true;
    }

    /// The region view loaded. The first region load after leaving a city
    /// is the return to the region view, not a region switch; a second one
    /// means the player changed regions and the remembered date no longer
    /// applies.
    pub fn on_region_loaded(&mut self) {
        if self.exiting_city {
            self.exiting_city = false;
            return;
        }
        if self.remembered_date.is_some() {
            debug!("remembered_date_discarded_on_region_change");
        }
        self.remembered_date = None;
    }
}
