use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::controller::DateSyncController;
use crate::host::{
    AppAccess, HostEvent, HostFramework, Message, NotificationSubscriber, SUBSCRIBED_MESSAGES,
};
use crate::log::SessionLog;

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("the host did not provide the application interface")]
    AppUnavailable,
    #[error("the host did not provide the notification service")]
    NotificationServiceUnavailable,
    #[error("the host refused the subscription for message type 0x{0:08X}")]
    SubscriptionRefused(u32),
}

/// Plugin shell: performs the startup handshake and routes host
/// notifications into the controller.
///
/// A failed handshake leaves the plugin loaded but inert for the rest of
/// the session; it never retries and never propagates an error into the
/// host.
pub struct DateSyncPlugin {
    controller: DateSyncController,
    log: Rc<dyn SessionLog>,
    active: bool,
}

impl DateSyncPlugin {
    pub fn new(log: Rc<dyn SessionLog>) -> Self {
        Self {
            controller: DateSyncController::new(Rc::clone(&log)),
            log,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn controller(&self) -> &DateSyncController {
        &self.controller
    }

    /// Startup handshake: obtain the application interface, switch on host
    /// debug functionality (the date cheat is rejected without it), then
    /// subscribe to the four lifecycle notifications. Returns whether the
    /// plugin came up active.
    pub fn post_app_init(&mut self, host: &dyn HostFramework) -> bool {
        match handshake(host) {
            Ok(()) => {
                self.active = true;
                debug!("handshake_complete");
            }
            Err(error) => {
                warn!(error = %error, "handshake_failed");
                self.log.write_line(&format!(
                    "Startup failed: {error}. The plugin is disabled for this session."
                ));
            }
        }
        self.active
    }

    /// Route one host notification into the controller. Message types the
    /// plugin did not subscribe to are ignored, as is everything while the
    /// plugin is inert.
    pub fn do_message(&mut self, host: &dyn HostFramework, message: &Message<'_>) {
        if !self.active {
            trace!(
                message_type = message.message_type,
                "message_dropped_while_inactive"
            );
            return;
        }
        let Some(event) = HostEvent::from_message(message) else {
            trace!(message_type = message.message_type, "message_ignored");
            return;
        };
        match event {
            HostEvent::CityLoaded { city } => self.controller.on_city_loaded(city, host.app()),
            HostEvent::CityShuttingDown => self.controller.on_city_shutting_down(),
            HostEvent::CitySaved => self.controller.on_city_saved(host.app()),
            HostEvent::RegionLoaded => self.controller.on_region_loaded(),
        }
    }
}

fn handshake(host: &dyn HostFramework) -> Result<(), HandshakeError> {
    let app = host.app().ok_or(HandshakeError::AppUnavailable)?;
    app.set_debug_functionality_enabled(true);

    let server = host
        .message_server()
        .ok_or(HandshakeError::NotificationServiceUnavailable)?;
    for message_type in SUBSCRIBED_MESSAGES {
        if !server.add_notification(message_type) {
            return Err(HandshakeError::SubscriptionRefused(message_type));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{
        MSG_POST_CITY_INIT, MSG_POST_CITY_SAVE, MSG_POST_REGION_INIT, MSG_PRE_CITY_SHUTDOWN,
    };
    use crate::test_support::{date, FakeApp, FakeCity, FakeHost, MemoryLog};

    fn plugin(log: &MemoryLog) -> DateSyncPlugin {
        DateSyncPlugin::new(Rc::new(log.clone()))
    }

    fn message(message_type: u32) -> Message<'static> {
        Message {
            message_type,
            city: None,
        }
    }

    #[test]
    fn handshake_enables_debug_mode_and_subscribes_in_order() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost::with_app(FakeApp::without_city());

        assert!(plugin.post_app_init(&host));

        assert!(plugin.is_active());
        let app = host.app.as_ref().expect("app");
        assert!(app.debug_enabled.get());
        let subscriber = host.subscriber.as_ref().expect("subscriber");
        assert_eq!(subscriber.subscribed(), SUBSCRIBED_MESSAGES.to_vec());
        assert!(log.lines().is_empty());
    }

    #[test]
    fn missing_app_leaves_plugin_inert() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost {
            app: None,
            subscriber: None,
        };

        assert!(!plugin.post_app_init(&host));

        assert!(!plugin.is_active());
        assert_eq!(
            log.last_line().as_deref(),
            Some(
                "Startup failed: the host did not provide the application interface. \
                 The plugin is disabled for this session."
            )
        );
    }

    #[test]
    fn missing_notification_service_leaves_plugin_inert() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost {
            app: Some(FakeApp::without_city()),
            subscriber: None,
        };

        assert!(!plugin.post_app_init(&host));
        assert!(!plugin.is_active());
    }

    #[test]
    fn refused_subscription_leaves_plugin_inert() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost::with_app(FakeApp::without_city());
        host.subscriber
            .as_ref()
            .expect("subscriber")
            .refuse(MSG_POST_CITY_SAVE);

        assert!(!plugin.post_app_init(&host));

        assert!(!plugin.is_active());
        assert_eq!(
            log.last_line().as_deref(),
            Some(
                "Startup failed: the host refused the subscription for message type \
                 0x26C63345. The plugin is disabled for this session."
            )
        );
    }

    #[test]
    fn inert_plugin_drops_messages_without_side_effects() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost::with_app(FakeApp::with_city(FakeCity::established_at(date(
            2003, 6, 15,
        ))));

        plugin.do_message(&host, &message(MSG_POST_CITY_SAVE));

        assert_eq!(plugin.controller().remembered_date(), None);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn unknown_message_types_are_ignored() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);
        let host = FakeHost::with_app(FakeApp::without_city());
        assert!(plugin.post_app_init(&host));

        plugin.do_message(&host, &message(0x1234_5678));

        assert_eq!(plugin.controller().remembered_date(), None);
        assert!(log.lines().is_empty());
    }

    #[test]
    fn save_then_load_round_trip_issues_a_correction() {
        let log = MemoryLog::default();
        let mut plugin = plugin(&log);

        let saved_host = FakeHost::with_app(FakeApp::with_city(FakeCity::established_at(date(
            2003, 6, 15,
        ))));
        assert!(plugin.post_app_init(&saved_host));
        plugin.do_message(&saved_host, &message(MSG_POST_CITY_SAVE));
        assert_eq!(
            plugin.controller().remembered_date(),
            Some(date(2003, 6, 15))
        );

        // Leave the city, return to the region view, open a lagging city.
        plugin.do_message(&saved_host, &message(MSG_PRE_CITY_SHUTDOWN));
        plugin.do_message(&saved_host, &message(MSG_POST_REGION_INIT));

        let lagging_host = FakeHost::with_app(FakeApp::with_city(FakeCity::established_at(date(
            2003, 6, 1,
        ))));
        let lagging_app = lagging_host.app.as_ref().expect("app");
        let lagging_city = lagging_app.city.as_ref().expect("city");
        plugin.do_message(
            &lagging_host,
            &Message {
                message_type: MSG_POST_CITY_INIT,
                city: Some(lagging_city),
            },
        );

        assert_eq!(
            lagging_app.executor.submissions(),
            vec![(
                "SimDate 6 14 2003".to_string(),
                crate::command::CHEAT_ID_SIM_DATE
            )]
        );
        assert_eq!(plugin.controller().remembered_date(), None);
    }
}
