use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::codec::CodecError;
use crate::codec::fields::{Fields, Fragment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    Campaign,
    Creative,
    Free,
    Settlement,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Campaign,
        GameMode::Creative,
        GameMode::Free,
        GameMode::Settlement,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            GameMode::Campaign => "ModeCampaign",
            GameMode::Creative => "ModeCreative",
            GameMode::Free => "ModeFree",
            GameMode::Settlement => "ModeSettlement",
        }
    }

    pub fn from_wire(name: &str) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|m| m.wire_name() == name)
            .ok_or_else(|| CodecError::UnknownEnumValue {
                kind: "game mode",
                value: name.to_string(),
            })
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Campaign => "Campaign",
            GameMode::Creative => "Creative",
            GameMode::Free => "Free",
            GameMode::Settlement => "Settlement",
        };
        f.write_str(name)
    }
}

// === Flags ===

/// One independently toggled world option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameFlag {
    BadgeUnlocks,
    BotLimit,
    BotRecharging,
    RandomObjects,
    Recording,
    Tutorial,
}

impl GameFlag {
    pub const ALL: [GameFlag; 6] = [
        GameFlag::BadgeUnlocks,
        GameFlag::BotLimit,
        GameFlag::BotRecharging,
        GameFlag::RandomObjects,
        GameFlag::Recording,
        GameFlag::Tutorial,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GameFlag::BadgeUnlocks => "BadgeUnlocks",
            GameFlag::BotLimit => "BotLimit",
            GameFlag::BotRecharging => "BotRecharging",
            GameFlag::RandomObjects => "RandomObjects",
            GameFlag::Recording => "Recording",
            GameFlag::Tutorial => "Tutorial",
        }
    }

    /// Key of this flag inside the `GameOptions` section.
    pub fn wire_key(self) -> &'static str {
        match self {
            GameFlag::BadgeUnlocks => "BadgeUnlocksEnabled",
            GameFlag::BotLimit => "BotLimitEnabled",
            GameFlag::BotRecharging => "BotRechargingEnabled",
            GameFlag::RandomObjects => "RandomObjectsEnabled",
            GameFlag::Recording => "RecordingEnabled",
            GameFlag::Tutorial => "TutorialEnabled",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for GameFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the flag name in any case, with or without dashes or underscores,
/// so `bot-limit`, `bot_limit` and `BotLimit` all parse.
impl FromStr for GameFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().to_lowercase() == wanted)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown option flag '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// Set of enabled [`GameFlag`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GameFlags(u8);

impl GameFlags {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, flag: GameFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: GameFlag) {
        self.0 |= flag.bit();
    }

    pub fn remove(&mut self, flag: GameFlag) {
        self.0 &= !flag.bit();
    }

    pub fn set(&mut self, flag: GameFlag, enabled: bool) {
        if enabled {
            self.insert(flag);
        } else {
            self.remove(flag);
        }
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = GameFlag> {
        GameFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Read every `<Flag>Enabled` key. All six are required JSON booleans.
    pub fn read(f: &Fields<'_>) -> Result<Self, CodecError> {
        let mut flags = Self::empty();
        for flag in GameFlag::ALL {
            flags.set(flag, f.boolean(flag.wire_key())?);
        }
        Ok(flags)
    }

    pub fn write(self, out: &mut Fragment) {
        for flag in GameFlag::ALL {
            out.insert(flag.wire_key().into(), Value::Bool(self.contains(flag)));
        }
    }
}

impl FromIterator<GameFlag> for GameFlags {
    fn from_iter<I: IntoIterator<Item = GameFlag>>(iter: I) -> Self {
        let mut flags = Self::empty();
        for flag in iter {
            flags.insert(flag);
        }
        flags
    }
}

impl fmt::Display for GameFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<_> = self.iter().map(GameFlag::name).collect();
        f.write_str(&names.join(", "))
    }
}
