//! Capability seams between the plugin and the hosting game.
//!
//! The host is reached only through these narrow traits, so every consumer
//! can be exercised against scripted stand-ins instead of a live game.

use crate::date::CityDate;

/// Notification fired after a city finishes loading.
pub const MSG_POST_CITY_INIT: u32 = 0x26D3_1EC1;
/// Notification fired before a city shuts down back to the region view.
pub const MSG_PRE_CITY_SHUTDOWN: u32 = 0x26D3_1EC2;
/// Notification fired after a city is saved.
pub const MSG_POST_CITY_SAVE: u32 = 0x26C6_3345;
/// Notification fired after the region view finishes loading.
pub const MSG_POST_REGION_INIT: u32 = 0xCBB5_BB45;

/// Every notification type the plugin subscribes to, in subscription order.
pub const SUBSCRIBED_MESSAGES: [u32; 4] = [
    MSG_POST_CITY_INIT,
    MSG_PRE_CITY_SHUTDOWN,
    MSG_POST_CITY_SAVE,
    MSG_POST_REGION_INIT,
];

/// Read access to a city's simulator.
pub trait SimulatorAccess {
    /// Immutable snapshot of the simulator's current date, or `None` when
    /// the simulator cannot report one.
    fn sim_date(&self) -> Option<CityDate>;
}

/// Read access to a loaded city.
pub trait CityAccess {
    /// Whether the city has been saved at least once in this region
    /// session. Unestablished cities never have their date rewritten.
    fn established(&self) -> bool;

    fn simulator(&self) -> Option<&dyn SimulatorAccess>;
}

/// Submits cheat command lines to the host.
pub trait CommandExecutor {
    /// Submit one command line under the given capability code. The host
    /// provides no success signal; the returned value carries no meaning
    /// and callers ignore it.
    fn submit_cheat(&self, command: &str, cheat_id: u32) -> bool;
}

/// The host's platform application interface.
pub trait AppAccess {
    /// The currently open city, if any.
    fn city(&self) -> Option<&dyn CityAccess>;

    fn cheat_codes(&self) -> Option<&dyn CommandExecutor>;

    /// The date cheat is only honored while host debug functionality is
    /// switched on.
    fn set_debug_functionality_enabled(&self, enabled: bool);
}

/// The host's notification dispatch service.
pub trait NotificationSubscriber {
    /// Register interest in one notification type. Returns `false` when
    /// the host refuses the subscription.
    fn add_notification(&self, message_type: u32) -> bool;
}

/// Entry point into the host environment, queried during startup and on
/// each delivered notification.
pub trait HostFramework {
    fn app(&self) -> Option<&dyn AppAccess>;

    fn message_server(&self) -> Option<&dyn NotificationSubscriber>;
}

/// Raw notification envelope as delivered by the host dispatcher. The city
/// payload is only populated for city lifecycle notifications.
pub struct Message<'a> {
    pub message_type: u32,
    pub city: Option<&'a dyn CityAccess>,
}

/// A decoded lifecycle notification. Ephemeral; never retained beyond the
/// handling of the message it was decoded from.
pub enum HostEvent<'a> {
    CityLoaded { city: Option<&'a dyn CityAccess> },
    CityShuttingDown,
    CitySaved,
    RegionLoaded,
}

impl<'a> HostEvent<'a> {
    /// Decode an envelope; `None` for message types the plugin does not
    /// handle.
    pub fn from_message(message: &Message<'a>) -> Option<Self> {
        match message.message_type {
            MSG_POST_CITY_INIT => Some(Self::CityLoaded { city: message.city }),
            MSG_PRE_CITY_SHUTDOWN => Some(Self::CityShuttingDown),
            MSG_POST_CITY_SAVE => Some(Self::CitySaved),
            MSG_POST_REGION_INIT => Some(Self::RegionLoaded),
            _ => None,
        }
    }

    pub fn message_type(&self) -> u32 {
        match self {
            Self::CityLoaded { .. } => MSG_POST_CITY_INIT,
            Self::CityShuttingDown => MSG_PRE_CITY_SHUTDOWN,
            Self::CitySaved => MSG_POST_CITY_SAVE,
            Self::RegionLoaded => MSG_POST_REGION_INIT,
        }
    }
}
