use std::cell::{Cell, RefCell};

use datesync::{
    AppAccess, CityAccess, CityDate, CommandExecutor, HostFramework, NotificationSubscriber,
    SimulatorAccess,
};
use tracing::{debug, warn};

/// The open city slot of the scripted host.
pub struct ScriptedCity {
    established: Cell<bool>,
    date: Cell<CityDate>,
}

impl CityAccess for ScriptedCity {
    fn established(&self) -> bool {
        self.established.get()
    }

    fn simulator(&self) -> Option<&dyn SimulatorAccess> {
        Some(self)
    }
}

impl SimulatorAccess for ScriptedCity {
    fn sim_date(&self) -> Option<CityDate> {
        Some(self.date.get())
    }
}

/// In-process stand-in for the hosting game, driven by a session script.
///
/// Submitted `SimDate` commands are applied to the open city the way the
/// game applies them: the simulator lands on the day *after* the date in
/// the command text.
#[derive(Default)]
pub struct ScriptedHost {
    city: Option<ScriptedCity>,
    subscriptions: RefCell<Vec<u32>>,
    executed: RefCell<Vec<String>>,
    debug_enabled: Cell<bool>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_city(&mut self, date: CityDate, established: bool) {
        if self.city.is_some() {
            warn!("replacing an already open city slot");
        }
        self.city = Some(ScriptedCity {
            established: Cell::new(established),
            date: Cell::new(date),
        });
    }

    pub fn close_city(&mut self) {
        self.city = None;
    }

    /// Saving a city establishes it.
    pub fn mark_established(&self) {
        if let Some(city) = &self.city {
            city.established.set(true);
        }
    }

    pub fn advance_days(&self, days: u64) {
        let Some(city) = &self.city else {
            warn!(days, "cannot advance the simulator with no open city");
            return;
        };
        match city.date.get().plus_days(days) {
            Some(advanced) => city.date.set(advanced),
            None => warn!(days, "simulator date overflow while advancing"),
        }
    }

    pub fn city_access(&self) -> Option<&dyn CityAccess> {
        self.city.as_ref().map(|city| city as _)
    }

    pub fn current_city_date(&self) -> Option<CityDate> {
        self.city.as_ref().map(|city| city.date.get())
    }

    pub fn executed_commands(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }

    pub fn subscriptions(&self) -> Vec<u32> {
        self.subscriptions.borrow().clone()
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_enabled.get()
    }

    fn apply_sim_date(&self, command: &str) {
        let Some(command_date) = parse_sim_date(command) else {
            warn!(command, "unrecognized cheat command");
            return;
        };
        let Some(landing_date) = command_date.next_day() else {
            warn!(command, "cheat date has no following day");
            return;
        };
        match &self.city {
            Some(city) => {
                city.date.set(landing_date);
                debug!(%landing_date, "simulator date set by cheat");
            }
            None => warn!(command, "cheat received with no open city"),
        }
    }
}

impl HostFramework for ScriptedHost {
    fn app(&self) -> Option<&dyn AppAccess> {
        Some(self)
    }

    fn message_server(&self) -> Option<&dyn NotificationSubscriber> {
        Some(self)
    }
}

impl AppAccess for ScriptedHost {
    fn city(&self) -> Option<&dyn CityAccess> {
        self.city_access()
    }

    fn cheat_codes(&self) -> Option<&dyn CommandExecutor> {
        Some(self)
    }

    fn set_debug_functionality_enabled(&self, enabled: bool) {
        self.debug_enabled.set(enabled);
    }
}

impl NotificationSubscriber for ScriptedHost {
    fn add_notification(&self, message_type: u32) -> bool {
        self.subscriptions.borrow_mut().push(message_type);
        true
    }
}

impl CommandExecutor for ScriptedHost {
    fn submit_cheat(&self, command: &str, _cheat_id: u32) -> bool {
        self.executed.borrow_mut().push(command.to_string());
        self.apply_sim_date(command);
        false
    }
}

fn parse_sim_date(command: &str) -> Option<CityDate> {
    let mut fields = command.split_whitespace();
    if fields.next()? != "SimDate" {
        return None;
    }
    let month = fields.next()?.parse().ok()?;
    let day = fields.next()?.parse().ok()?;
    let year = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    CityDate::new(year, month, day)
}
