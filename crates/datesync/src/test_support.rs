//! Scripted stand-ins for the host capability traits, shared by the unit
//! tests in this crate.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::date::CityDate;
use crate::host::{
    AppAccess, CityAccess, CommandExecutor, HostFramework, NotificationSubscriber, SimulatorAccess,
};
use crate::log::SessionLog;

/// In-memory session log; clones share the same line buffer so tests can
/// hand one handle to the controller and inspect the other.
#[derive(Clone, Default)]
pub(crate) struct MemoryLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryLog {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub(crate) fn last_line(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }
}

impl SessionLog for MemoryLog {
    fn write_line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// Records every submitted cheat command; clones share the buffer.
#[derive(Clone, Default)]
pub(crate) struct RecordingExecutor {
    submissions: Rc<RefCell<Vec<(String, u32)>>>,
}

impl RecordingExecutor {
    pub(crate) fn submissions(&self) -> Vec<(String, u32)> {
        self.submissions.borrow().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn submit_cheat(&self, command: &str, cheat_id: u32) -> bool {
        self.submissions
            .borrow_mut()
            .push((command.to_string(), cheat_id));
        false
    }
}

/// A city whose simulator reports a scripted date.
pub(crate) struct FakeCity {
    pub(crate) established: bool,
    pub(crate) date: Cell<Option<CityDate>>,
    pub(crate) simulator_available: bool,
}

impl FakeCity {
    pub(crate) fn established_at(date: CityDate) -> Self {
        Self {
            established: true,
            date: Cell::new(Some(date)),
            simulator_available: true,
        }
    }

    pub(crate) fn unestablished() -> Self {
        Self {
            established: false,
            date: Cell::new(None),
            simulator_available: true,
        }
    }
}

impl CityAccess for FakeCity {
    fn established(&self) -> bool {
        self.established
    }

    fn simulator(&self) -> Option<&dyn SimulatorAccess> {
        if self.simulator_available {
            Some(self)
        } else {
            None
        }
    }
}

impl SimulatorAccess for FakeCity {
    fn sim_date(&self) -> Option<CityDate> {
        self.date.get()
    }
}

/// Application interface whose accessors can be scripted away one by one.
#[derive(Default)]
pub(crate) struct FakeApp {
    pub(crate) city: Option<FakeCity>,
    pub(crate) executor: RecordingExecutor,
    pub(crate) executor_available: bool,
    pub(crate) debug_enabled: Cell<bool>,
}

impl FakeApp {
    pub(crate) fn with_city(city: FakeCity) -> Self {
        Self {
            city: Some(city),
            executor_available: true,
            ..Self::default()
        }
    }

    pub(crate) fn without_city() -> Self {
        Self {
            executor_available: true,
            ..Self::default()
        }
    }
}

impl AppAccess for FakeApp {
    fn city(&self) -> Option<&dyn CityAccess> {
        self.city.as_ref().map(|city| city as _)
    }

    fn cheat_codes(&self) -> Option<&dyn CommandExecutor> {
        if self.executor_available {
            Some(&self.executor)
        } else {
            None
        }
    }

    fn set_debug_functionality_enabled(&self, enabled: bool) {
        self.debug_enabled.set(enabled);
    }
}

/// Host framework whose app and notification service can be withheld.
pub(crate) struct FakeHost {
    pub(crate) app: Option<FakeApp>,
    pub(crate) subscriber: Option<FakeSubscriber>,
}

impl FakeHost {
    pub(crate) fn with_app(app: FakeApp) -> Self {
        Self {
            app: Some(app),
            subscriber: Some(FakeSubscriber::default()),
        }
    }
}

impl HostFramework for FakeHost {
    fn app(&self) -> Option<&dyn AppAccess> {
        self.app.as_ref().map(|app| app as _)
    }

    fn message_server(&self) -> Option<&dyn NotificationSubscriber> {
        self.subscriber.as_ref().map(|subscriber| subscriber as _)
    }
}

/// Notification service that records subscriptions and refuses the
/// message types it is told to refuse.
#[derive(Clone, Default)]
pub(crate) struct FakeSubscriber {
    pub(crate) refused: Rc<RefCell<Vec<u32>>>,
    pub(crate) subscribed: Rc<RefCell<Vec<u32>>>,
}

impl FakeSubscriber {
    pub(crate) fn subscribed(&self) -> Vec<u32> {
        self.subscribed.borrow().clone()
    }

    pub(crate) fn refuse(&self, message_type: u32) {
        self.refused.borrow_mut().push(message_type);
    }
}

impl NotificationSubscriber for FakeSubscriber {
    fn add_notification(&self, message_type: u32) -> bool {
        if self.refused.borrow().contains(&message_type) {
            return false;
        }
        self.subscribed.borrow_mut().push(message_type);
        true
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> CityDate {
    CityDate::new(year, month, day).expect("valid date")
}
