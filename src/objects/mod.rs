pub mod graph;
pub mod player;
pub mod property;
pub mod structure;
pub mod uid;

use std::fmt;

pub use player::{Inventories, InventorySlot, Player};
pub use property::{Assembly, FlowerKind, Property, PropertyKind};
pub use structure::{Capabilities, Structure};
pub use uid::{SharedUidAllocator, Uid, UidAllocator, UidSource};

/// A world tile coordinate as stored in `TX`/`TY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// === GameObject ===

/// An item, plant, or other loose thing in the world or in an inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct GameObject {
    pub kind: String,
    pub uid: Uid,
    pub properties: Vec<Property>,
}

impl GameObject {
    /// Create an object with a freshly issued identity.
    pub fn new(kind: impl Into<String>, uids: &mut dyn UidSource) -> Self {
        Self::with_uid(kind, uids.issue())
    }

    /// Create an object with a known identity; the allocator is not consulted.
    pub fn with_uid(kind: impl Into<String>, uid: Uid) -> Self {
        Self {
            kind: kind.into(),
            uid,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, kind: PropertyKind) -> Option<&Property> {
        self.properties.iter().find(|p| p.kind() == kind)
    }

    /// Identities of this object and everything nested inside it, bee
    /// colonies included.
    pub fn collect_uids(&self, out: &mut Vec<Uid>) {
        out.push(self.uid);
        collect_property_uids(&self.properties, out);
    }
}

impl fmt::Display for GameObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.uid)?;
        for property in &self.properties {
            write!(f, " [{property}]")?;
        }
        Ok(())
    }
}

fn collect_property_uids(properties: &[Property], out: &mut Vec<Uid>) {
    for property in properties {
        match property {
            Property::Assembly(assembly) => {
                for item in &assembly.ingredients {
                    item.collect_uids(out);
                }
            }
            Property::TreeAttachment {
                bee_colony: Some(uid),
                ..
            } => out.push(*uid),
            _ => {}
        }
    }
}

// === Entity ===

/// Anything that can be placed on a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Object(GameObject),
    Structure(Structure),
}

impl Entity {
    pub fn uid(&self) -> Uid {
        match self {
            Entity::Object(o) => o.uid,
            Entity::Structure(s) => s.uid,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Entity::Object(o) => &o.kind,
            Entity::Structure(s) => s.kind(),
        }
    }

    pub fn collect_uids(&self, out: &mut Vec<Uid>) {
        match self {
            Entity::Object(o) => o.collect_uids(out),
            Entity::Structure(s) => {
                out.push(s.uid);
                collect_property_uids(s.properties(), out);
            }
        }
    }
}

impl From<GameObject> for Entity {
    fn from(object: GameObject) -> Self {
        Entity::Object(object)
    }
}

impl From<Structure> for Entity {
    fn from(structure: Structure) -> Self {
        Entity::Structure(structure)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Object(o) => fmt::Display::fmt(o, f),
            Entity::Structure(s) => fmt::Display::fmt(s, f),
        }
    }
}
