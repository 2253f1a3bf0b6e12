//! Event categories and their channel routing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownEventType;

/// Channel for player lifecycle events.
pub const PLAYER_CHANNEL: &str = "fierymud:events:player";

/// Channel for chat events.
pub const CHAT_CHANNEL: &str = "fierymud:events:chat";

/// Channel for admin and system alerts.
pub const ADMIN_CHANNEL: &str = "fierymud:events:admin";

/// Channel for world events.
pub const WORLD_CHANNEL: &str = "fierymud:events:world";

/// Fallback channel for messages that carry no known category.
pub const UNKNOWN_CHANNEL: &str = "fierymud:events:unknown";

/// Categories of game events published to external systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventType {
    // Player lifecycle
    PlayerLogin,
    PlayerLogout,
    PlayerDeath,
    PlayerLevelUp,
    PlayerQuit,
    PlayerZoneEnter,

    // Communication channels
    ChatGossip,
    ChatShout,
    ChatOoc,
    ChatClan,
    ChatGroup,
    ChatTell,
    ChatSay,
    ChatEmote,

    // Admin/system alerts
    AdminCrash,
    AdminZoneReset,
    AdminWarning,
    AdminShutdown,
    AdminBroadcast,

    // World
    ZoneLoaded,
    ZoneReset,
    MobKilled,
    BossSpawn,
    QuestComplete,
}

/// The four channel groups every category falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventChannel {
    /// Player lifecycle events.
    Player,
    /// Chat events.
    Chat,
    /// Admin and system alerts.
    Admin,
    /// World events.
    World,
}

impl EventChannel {
    /// Returns the broker channel name for this group.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => PLAYER_CHANNEL,
            Self::Chat => CHAT_CHANNEL,
            Self::Admin => ADMIN_CHANNEL,
            Self::World => WORLD_CHANNEL,
        }
    }
}

impl GameEventType {
    /// Every category, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::PlayerLogin,
        Self::PlayerLogout,
        Self::PlayerDeath,
        Self::PlayerLevelUp,
        Self::PlayerQuit,
        Self::PlayerZoneEnter,
        Self::ChatGossip,
        Self::ChatShout,
        Self::ChatOoc,
        Self::ChatClan,
        Self::ChatGroup,
        Self::ChatTell,
        Self::ChatSay,
        Self::ChatEmote,
        Self::AdminCrash,
        Self::AdminZoneReset,
        Self::AdminWarning,
        Self::AdminShutdown,
        Self::AdminBroadcast,
        Self::ZoneLoaded,
        Self::ZoneReset,
        Self::MobKilled,
        Self::BossSpawn,
        Self::QuestComplete,
    ];

    /// Returns the wire name of this category (e.g. `"CHAT_SAY"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlayerLogin => "PLAYER_LOGIN",
            Self::PlayerLogout => "PLAYER_LOGOUT",
            Self::PlayerDeath => "PLAYER_DEATH",
            Self::PlayerLevelUp => "PLAYER_LEVEL_UP",
            Self::PlayerQuit => "PLAYER_QUIT",
            Self::PlayerZoneEnter => "PLAYER_ZONE_ENTER",
            Self::ChatGossip => "CHAT_GOSSIP",
            Self::ChatShout => "CHAT_SHOUT",
            Self::ChatOoc => "CHAT_OOC",
            Self::ChatClan => "CHAT_CLAN",
            Self::ChatGroup => "CHAT_GROUP",
            Self::ChatTell => "CHAT_TELL",
            Self::ChatSay => "CHAT_SAY",
            Self::ChatEmote => "CHAT_EMOTE",
            Self::AdminCrash => "ADMIN_CRASH",
            Self::AdminZoneReset => "ADMIN_ZONE_RESET",
            Self::AdminWarning => "ADMIN_WARNING",
            Self::AdminShutdown => "ADMIN_SHUTDOWN",
            Self::AdminBroadcast => "ADMIN_BROADCAST",
            Self::ZoneLoaded => "ZONE_LOADED",
            Self::ZoneReset => "ZONE_RESET",
            Self::MobKilled => "MOB_KILLED",
            Self::BossSpawn => "BOSS_SPAWN",
            Self::QuestComplete => "QUEST_COMPLETE",
        }
    }

    /// Returns the channel group this category is routed to.
    #[must_use]
    pub const fn channel_group(self) -> EventChannel {
        match self {
            Self::PlayerLogin
            | Self::PlayerLogout
            | Self::PlayerDeath
            | Self::PlayerLevelUp
            | Self::PlayerQuit
            | Self::PlayerZoneEnter => EventChannel::Player,

            Self::ChatGossip
            | Self::ChatShout
            | Self::ChatOoc
            | Self::ChatClan
            | Self::ChatGroup
            | Self::ChatTell
            | Self::ChatSay
            | Self::ChatEmote => EventChannel::Chat,

            Self::AdminCrash
            | Self::AdminZoneReset
            | Self::AdminWarning
            | Self::AdminShutdown
            | Self::AdminBroadcast => EventChannel::Admin,

            Self::ZoneLoaded
            | Self::ZoneReset
            | Self::MobKilled
            | Self::BossSpawn
            | Self::QuestComplete => EventChannel::World,
        }
    }

    /// Returns the broker channel name for this category.
    #[must_use]
    pub const fn channel(self) -> &'static str {
        self.channel_group().name()
    }
}

/// Returns the broker channel name for `event_type`.
#[must_use]
pub const fn channel_for(event_type: GameEventType) -> &'static str {
    event_type.channel()
}

impl fmt::Display for GameEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameEventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_owned()))
    }
}
