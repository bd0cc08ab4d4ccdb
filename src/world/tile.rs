use std::fmt;

use crate::codec::CodecError;
use crate::objects::{Entity, Uid};

// === Tile types ===

/// Terrain kind of a single world cell, stored on the wire as its code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TileType {
    Grass,
    Soil,
    TilledSoil,
    HoledSoil,
    OrangeSoil,
    SoilDung,
    FreshWater,
    FreshWaterDeep,
    SeaWater,
    SeaWaterDeep,
    Sand,
    DredgedLand,
    SwampWater,
    TurfedMetalOre,
    TraceMetalOre,
    MetalOre,
    RichMetalOre,
    UsedMetalOre,
    TurfedClay,
    Clay,
    RichClay,
    UsedClay,
    TurfedCoal,
    TraceCoal,
    Coal,
    RichCoal,
    PureCoal,
    UsedCoal,
    TurfedStone,
    Stone,
    RichStone,
    UsedStone,
}

impl TileType {
    /// Every tile type, indexed by wire code.
    pub const ALL: [TileType; 32] = [
        TileType::Grass,
        TileType::Soil,
        TileType::TilledSoil,
        TileType::HoledSoil,
        TileType::OrangeSoil,
        TileType::SoilDung,
        TileType::FreshWater,
        TileType::FreshWaterDeep,
        TileType::SeaWater,
        TileType::SeaWaterDeep,
        TileType::Sand,
        TileType::DredgedLand,
        TileType::SwampWater,
        TileType::TurfedMetalOre,
        TileType::TraceMetalOre,
        TileType::MetalOre,
        TileType::RichMetalOre,
        TileType::UsedMetalOre,
        TileType::TurfedClay,
        TileType::Clay,
        TileType::RichClay,
        TileType::UsedClay,
        TileType::TurfedCoal,
        TileType::TraceCoal,
        TileType::Coal,
        TileType::RichCoal,
        TileType::PureCoal,
        TileType::UsedCoal,
        TileType::TurfedStone,
        TileType::Stone,
        TileType::RichStone,
        TileType::UsedStone,
    ];

    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| CodecError::UnknownEnumValue {
                kind: "tile type",
                value: code.to_string(),
            })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Name shown to players in game.
    pub fn display_name(self) -> &'static str {
        match self {
            TileType::Grass => "Grass",
            TileType::Soil => "Soil",
            TileType::TilledSoil => "Tilled Soil",
            TileType::HoledSoil => "Holed Soil",
            TileType::OrangeSoil => "Orange Soil",
            TileType::SoilDung => "Soil (Dung)",
            TileType::FreshWater => "Fresh Water",
            TileType::FreshWaterDeep => "Fresh Water (Deep)",
            TileType::SeaWater => "Sea Water",
            TileType::SeaWaterDeep => "Sea Water (Deep)",
            TileType::Sand => "Sand",
            TileType::DredgedLand => "Dredged Land",
            TileType::SwampWater => "Swamp Water",
            TileType::TurfedMetalOre => "Turfed Metal Ore Deposit",
            TileType::TraceMetalOre => "Trace Metal Ore Deposit",
            TileType::MetalOre => "Metal Ore Deposit",
            TileType::RichMetalOre => "Rich Metal Ore Deposit",
            TileType::UsedMetalOre => "Used Metal Ore Deposit",
            TileType::TurfedClay => "Turfed Clay Deposit",
            TileType::Clay => "Clay Deposit",
            TileType::RichClay => "Rich Clay Deposit",
            TileType::UsedClay => "Used Clay Deposit",
            TileType::TurfedCoal => "Turfed Coal Deposit",
            TileType::TraceCoal => "Trace Coal Deposit",
            TileType::Coal => "Coal Deposit",
            TileType::RichCoal => "Rich Coal Deposit",
            TileType::PureCoal => "Pure Coal Deposit",
            TileType::UsedCoal => "Used Coal Deposit",
            TileType::TurfedStone => "Turfed Stone",
            TileType::Stone => "Stone",
            TileType::RichStone => "Rich Stone",
            TileType::UsedStone => "Used Stone",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// === Tile ===

/// One world cell: its terrain plus whatever has been placed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub tile_type: TileType,
    pub entities: Vec<Entity>,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            entities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn find(&self, uid: Uid) -> Option<&Entity> {
        self.entities.iter().find(|e| e.uid() == uid)
    }

    /// Detach the entity with `uid`, keeping the order of the rest.
    pub fn take(&mut self, uid: Uid) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.uid() == uid)?;
        Some(self.entities.remove(index))
    }
}
