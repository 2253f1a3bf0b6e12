//! Game events and their canonical wire form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::GameEventType;
use crate::clock::{Clock, SystemClock};

/// A game event to be published to external systems.
///
/// Serializes to the wire contract consumed by the web editor and the chat
/// bridge: `type`, `timestamp` (milliseconds since the Unix epoch) and
/// `message` are always present; `playerName`, `zoneId`, `roomId` and
/// `metadata` appear only when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    /// The event category.
    #[serde(rename = "type")]
    pub event_type: GameEventType,
    /// When the event was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Player the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    /// Zone the event happened in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<i32>,
    /// Room the event happened in, as `"zone:local"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Additional structured fields (chat target, login address, ...).
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl GameEvent {
    /// Creates an event stamped with the current system time.
    #[must_use]
    pub fn create(event_type: GameEventType, message: impl Into<String>) -> Self {
        Self::create_at(event_type, message, &SystemClock)
    }

    /// Creates an event stamped by `clock`.
    #[must_use]
    pub fn create_at(
        event_type: GameEventType,
        message: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            event_type,
            timestamp: clock.now(),
            player_name: None,
            zone_id: None,
            room_id: None,
            message: message.into(),
            metadata: Map::new(),
        }
    }

    /// Creates a player-related event.
    #[must_use]
    pub fn player_event(
        event_type: GameEventType,
        player_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::player_event_at(event_type, player_name, message, &SystemClock)
    }

    /// Creates a player-related event stamped by `clock`.
    #[must_use]
    pub fn player_event_at(
        event_type: GameEventType,
        player_name: impl Into<String>,
        message: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        let mut event = Self::create_at(event_type, message, clock);
        event.player_name = Some(player_name.into());
        event
    }

    /// Creates a chat event. A `target` (the recipient of a tell, for
    /// instance) is stored under `metadata["target"]`.
    #[must_use]
    pub fn chat_event(
        event_type: GameEventType,
        player_name: impl Into<String>,
        message: impl Into<String>,
        target: Option<&str>,
    ) -> Self {
        Self::chat_event_at(event_type, player_name, message, target, &SystemClock)
    }

    /// Creates a chat event stamped by `clock`.
    #[must_use]
    pub fn chat_event_at(
        event_type: GameEventType,
        player_name: impl Into<String>,
        message: impl Into<String>,
        target: Option<&str>,
        clock: &dyn Clock,
    ) -> Self {
        let event = Self::player_event_at(event_type, player_name, message, clock);
        match target {
            Some(target) => event.with_metadata("target", target),
            None => event,
        }
    }

    /// Creates a zone-related event.
    #[must_use]
    pub fn zone_event(event_type: GameEventType, zone_id: i32, message: impl Into<String>) -> Self {
        Self::zone_event_at(event_type, zone_id, message, &SystemClock)
    }

    /// Creates a zone-related event stamped by `clock`.
    #[must_use]
    pub fn zone_event_at(
        event_type: GameEventType,
        zone_id: i32,
        message: impl Into<String>,
        clock: &dyn Clock,
    ) -> Self {
        Self::create_at(event_type, message, clock).with_zone(zone_id)
    }

    /// Sets the zone the event happened in.
    #[must_use]
    pub fn with_zone(mut self, zone_id: i32) -> Self {
        self.zone_id = Some(zone_id);
        self
    }

    /// Sets the room the event happened in.
    #[must_use]
    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    /// Adds (or replaces) a metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the broker channel this event is routed to.
    #[must_use]
    pub fn channel(&self) -> &'static str {
        self.event_type.channel()
    }

    /// Returns the canonical structured representation of the event.
    #[must_use]
    pub fn to_wire_form(&self) -> Value {
        let mut object = Map::new();
        object.insert("type".to_owned(), Value::from(self.event_type.as_str()));
        object.insert(
            "timestamp".to_owned(),
            Value::from(self.timestamp.timestamp_millis()),
        );
        if let Some(player_name) = &self.player_name {
            object.insert("playerName".to_owned(), Value::from(player_name.as_str()));
        }
        if let Some(zone_id) = self.zone_id {
            object.insert("zoneId".to_owned(), Value::from(zone_id));
        }
        if let Some(room_id) = &self.room_id {
            object.insert("roomId".to_owned(), Value::from(room_id.as_str()));
        }
        object.insert("message".to_owned(), Value::from(self.message.as_str()));
        if !self.metadata.is_empty() {
            object.insert("metadata".to_owned(), Value::Object(self.metadata.clone()));
        }
        Value::Object(object)
    }

    /// Returns the wire form rendered as compact JSON text.
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        self.to_wire_form().to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::category::{ADMIN_CHANNEL, CHAT_CHANNEL, WORLD_CHANNEL};

    struct StaticClock(DateTime<Utc>);

    impl Clock for StaticClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn keys(value: &Value) -> Vec<String> {
        let mut keys: Vec<String> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_event_without_optional_fields_has_only_required_keys() {
        // Arrange
        let event = GameEvent::create(GameEventType::AdminWarning, "disk nearly full");

        // Act
        let wire = event.to_wire_form();

        // Assert
        assert_eq!(keys(&wire), vec!["message", "timestamp", "type"]);
        assert_eq!(wire["type"], "ADMIN_WARNING");
        assert_eq!(wire["message"], "disk nearly full");
    }

    #[test]
    fn test_empty_message_is_still_emitted() {
        let wire = GameEvent::create(GameEventType::ZoneLoaded, "").to_wire_form();

        assert_eq!(wire["message"], "");
    }

    #[test]
    fn test_timestamp_is_integer_milliseconds_since_epoch() {
        // Arrange
        let fixed = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        let clock = StaticClock(fixed);

        // Act
        let wire = GameEvent::create_at(GameEventType::BossSpawn, "a dragon stirs", &clock)
            .to_wire_form();

        // Assert
        assert!(wire["timestamp"].is_i64());
        assert_eq!(wire["timestamp"].as_i64().unwrap(), fixed.timestamp_millis());
    }

    #[test]
    fn test_player_event_includes_player_name_only() {
        let wire =
            GameEvent::player_event(GameEventType::PlayerLogin, "Alice", "Alice has entered")
                .to_wire_form();

        assert_eq!(keys(&wire), vec!["message", "playerName", "timestamp", "type"]);
        assert_eq!(wire["playerName"], "Alice");
    }

    #[test]
    fn test_chat_event_with_target_stores_target_in_metadata() {
        // Arrange
        let event =
            GameEvent::chat_event(GameEventType::ChatTell, "Alice", "psst", Some("Bob"));

        // Act
        let wire = event.to_wire_form();

        // Assert
        assert_eq!(event.channel(), CHAT_CHANNEL);
        assert_eq!(wire["metadata"]["target"], "Bob");
        assert_eq!(wire["playerName"], "Alice");
    }

    #[test]
    fn test_chat_event_without_target_omits_metadata() {
        let wire =
            GameEvent::chat_event(GameEventType::ChatGossip, "Alice", "hi all", None).to_wire_form();

        assert!(wire.get("metadata").is_none());
    }

    #[test]
    fn test_zone_event_includes_zone_id() {
        // Arrange
        let event = GameEvent::zone_event(GameEventType::ZoneReset, 30, "Zone 30 reset");

        // Act
        let wire = event.to_wire_form();

        // Assert
        assert_eq!(event.channel(), WORLD_CHANNEL);
        assert_eq!(wire["zoneId"], 30);
        assert!(wire.get("playerName").is_none());
        assert!(wire.get("roomId").is_none());
    }

    #[test]
    fn test_builders_attach_room_and_structured_metadata() {
        // Arrange
        let event = GameEvent::player_event(GameEventType::PlayerLogin, "Alice", "hello")
            .with_zone(30)
            .with_room("30:1")
            .with_metadata("ip", "10.0.0.1")
            .with_metadata("level", 42);

        // Act
        let wire = event.to_wire_form();

        // Assert
        assert_eq!(wire["roomId"], "30:1");
        assert_eq!(wire["zoneId"], 30);
        assert_eq!(wire["metadata"]["ip"], "10.0.0.1");
        assert_eq!(wire["metadata"]["level"], 42);
    }

    #[test]
    fn test_clocked_constructors_share_shape_with_system_constructors() {
        // Arrange
        let fixed = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = StaticClock(fixed);

        // Act
        let chat = GameEvent::chat_event_at(
            GameEventType::ChatTell,
            "Alice",
            "psst",
            Some("Bob"),
            &clock,
        );
        let zone = GameEvent::zone_event_at(GameEventType::ZoneLoaded, 30, "loaded", &clock);

        // Assert
        let mut expected_chat =
            GameEvent::chat_event(GameEventType::ChatTell, "Alice", "psst", Some("Bob"));
        expected_chat.timestamp = fixed;
        assert_eq!(chat, expected_chat);

        let mut expected_zone = GameEvent::zone_event(GameEventType::ZoneLoaded, 30, "loaded");
        expected_zone.timestamp = fixed;
        assert_eq!(zone, expected_zone);
    }

    #[test]
    fn test_wire_form_matches_serde_serialization() {
        let event = GameEvent::zone_event(GameEventType::MobKilled, 30, "a rat dies")
            .with_room("30:12")
            .with_metadata("mob", "rat");

        assert_eq!(event.to_wire_form(), serde_json::to_value(&event).unwrap());
    }

    #[test]
    fn test_wire_string_parses_back_to_same_event() {
        // Arrange
        let clock = StaticClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
        let event = GameEvent::create_at(GameEventType::AdminShutdown, "rebooting", &clock)
            .with_metadata("reason", "upgrade");

        // Act
        let parsed: GameEvent = serde_json::from_str(&event.to_wire_string()).unwrap();

        // Assert
        assert_eq!(parsed, event);
        assert_eq!(parsed.channel(), ADMIN_CHANNEL);
    }
}
