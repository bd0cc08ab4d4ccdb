use std::fmt;

use super::uid::{Uid, UidSource};
use super::{GameObject, Position};

/// Kind identifier the player is saved under.
pub const PLAYER_KIND: &str = "FarmerPlayer";

/// The four inventories a player carries, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventorySlot {
    Held,
    Backpack,
    Upgrades,
    Worn,
}

impl InventorySlot {
    pub const ALL: [InventorySlot; 4] = [
        InventorySlot::Held,
        InventorySlot::Backpack,
        InventorySlot::Upgrades,
        InventorySlot::Worn,
    ];

    /// Section name and list name of this inventory in the player fragment.
    pub fn wire_keys(self) -> (&'static str, &'static str) {
        match self {
            InventorySlot::Held => ("Carry", "CarryObjects"),
            InventorySlot::Backpack => ("Inv", "InvObjects"),
            InventorySlot::Upgrades => ("Up", "UpgradeObjects"),
            InventorySlot::Worn => ("Clothes", "ClothesObjects"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Inventories {
    pub held: Vec<GameObject>,
    pub backpack: Vec<GameObject>,
    pub upgrades: Vec<GameObject>,
    pub worn: Vec<GameObject>,
}

impl Inventories {
    pub fn slot(&self, slot: InventorySlot) -> &Vec<GameObject> {
        match slot {
            InventorySlot::Held => &self.held,
            InventorySlot::Backpack => &self.backpack,
            InventorySlot::Upgrades => &self.upgrades,
            InventorySlot::Worn => &self.worn,
        }
    }

    pub fn slot_mut(&mut self, slot: InventorySlot) -> &mut Vec<GameObject> {
        match slot {
            InventorySlot::Held => &mut self.held,
            InventorySlot::Backpack => &mut self.backpack,
            InventorySlot::Upgrades => &mut self.upgrades,
            InventorySlot::Worn => &mut self.worn,
        }
    }

    pub fn is_empty(&self) -> bool {
        InventorySlot::ALL.iter().all(|&s| self.slot(s).is_empty())
    }

    pub fn len(&self) -> usize {
        InventorySlot::ALL.iter().map(|&s| self.slot(s).len()).sum()
    }
}

/// The player character. Exactly one exists per world.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub uid: Uid,
    pub position: Position,
    pub rotation: i64,
    pub inventory: Inventories,
}

impl Player {
    pub fn new(position: Position, rotation: i64, uids: &mut dyn UidSource) -> Self {
        Self::with_uid(position, rotation, uids.issue())
    }

    pub fn with_uid(position: Position, rotation: i64, uid: Uid) -> Self {
        Self {
            uid,
            position,
            rotation,
            inventory: Inventories::default(),
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    pub fn collect_uids(&self, out: &mut Vec<Uid>) {
        out.push(self.uid);
        for slot in InventorySlot::ALL {
            for item in self.inventory.slot(slot) {
                item.collect_uids(out);
            }
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PLAYER_KIND} #{} at {} rot={} carrying {} item(s)",
            self.uid,
            self.position,
            self.rotation,
            self.inventory.len()
        )
    }
}
