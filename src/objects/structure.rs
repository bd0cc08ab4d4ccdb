use std::fmt;

use super::property::{Assembly, Property, PropertyKind};
use super::uid::{Uid, UidSource};
use crate::codec::CodecError;

/// What a structure kind can do, which decides the extra state it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Crafts items and carries an [`Assembly`] property.
    pub assembly: bool,
    /// Burns fuel while working.
    pub fueled: bool,
    /// Holds stored items.
    pub storage: bool,
}

const PLAIN: Capabilities = Capabilities {
    assembly: false,
    fueled: false,
    storage: false,
};
const CRAFTER: Capabilities = Capabilities {
    assembly: true,
    ..PLAIN
};
const FUELED_CRAFTER: Capabilities = Capabilities {
    assembly: true,
    fueled: true,
    ..PLAIN
};
const STORAGE: Capabilities = Capabilities {
    storage: true,
    ..PLAIN
};

/// Every kind identifier that decodes as a structure rather than a plain
/// game object, with its capabilities.
pub const STRUCTURE_KINDS: &[(&str, Capabilities)] = &[
    // Landmarks and infrastructure
    ("Transmitter", PLAIN),
    ("Wardrobe", PLAIN),
    ("BotServer", PLAIN),
    ("StoneHeads", PLAIN),
    ("Ziggurat", PLAIN),
    ("StoneHenge", PLAIN),
    ("SpacePort", PLAIN),
    ("BeltLinkage", PLAIN),
    // Workshop
    ("Workbench", CRAFTER),
    ("WorkbenchMk2", CRAFTER),
    ("ChoppingBlock", CRAFTER),
    ("BenchSaw", CRAFTER),
    ("BenchSaw2", CRAFTER),
    ("CogBench", CRAFTER),
    ("MasonryBench", CRAFTER),
    ("WorkbenchStructural", CRAFTER),
    ("WorkerWorkbenchMk1", CRAFTER),
    ("WorkerWorkbenchMk2", CRAFTER),
    ("WorkerWorkbenchMk3", CRAFTER),
    ("WorkerAssembler", CRAFTER),
    ("VehicleAssembler", CRAFTER),
    ("VehicleAssemblerGood", CRAFTER),
    ("BasicMetalWorkbench", CRAFTER),
    ("MetalWorkbench", CRAFTER),
    // Folks
    ("FolkSeedPod", CRAFTER),
    ("FolkSeedRehydrator", CRAFTER),
    // Cooking
    ("OvenCrude", FUELED_CRAFTER),
    ("Oven", FUELED_CRAFTER),
    ("PotCrude", CRAFTER),
    ("CookingPotCrude", FUELED_CRAFTER),
    ("Cauldron", FUELED_CRAFTER),
    ("Quern", CRAFTER),
    ("Gristmill", CRAFTER),
    ("ButterChurn", CRAFTER),
    ("KitchenTable", CRAFTER),
    // Nature
    ("CrudeAnimalBreedingStation", CRAFTER),
    ("CrudePlantBreedingStation", CRAFTER),
    ("Barn", CRAFTER),
    ("ChickenCoop", CRAFTER),
    ("HayBalerCrude", CRAFTER),
    // Clothing
    ("LoomCrude", CRAFTER),
    ("LoomGood", CRAFTER),
    ("SpinningWheel", CRAFTER),
    ("SpinningJenny", CRAFTER),
    ("HatMaker", CRAFTER),
    ("SewingStation", CRAFTER),
    ("RockingChair", CRAFTER),
    // Misc crafting
    ("WheatHammer", CRAFTER),
    ("ClayStationCrude", CRAFTER),
    ("ClayStation", CRAFTER),
    ("StringWinderCrude", CRAFTER),
    ("MortarMixerCrude", CRAFTER),
    ("MortarMixerGood", CRAFTER),
    ("ToyStationCrude", CRAFTER),
    ("Easel", CRAFTER),
    ("PaperMill", CRAFTER),
    ("PrintingPress", CRAFTER),
    ("MedicineStation", CRAFTER),
    ("KilnCrude", FUELED_CRAFTER),
    ("ClayFurnace", FUELED_CRAFTER),
    ("Furnace", FUELED_CRAFTER),
    // Storage
    ("StorageGeneric", STORAGE),
    ("StorageGenericMedium", STORAGE),
    ("StoragePalette", STORAGE),
    ("StoragePaletteMedium", STORAGE),
    ("StorageLiquid", STORAGE),
    ("StorageLiquidMedium", STORAGE),
    ("StorageWorker", STORAGE),
    ("StorageFertiliser", STORAGE),
    ("StorageSand", STORAGE),
    ("StorageSandMedium", STORAGE),
    ("StorageSeedlings", STORAGE),
];

/// Capabilities of a structure kind, or `None` if `kind` is not a structure.
pub fn capabilities_of(kind: &str) -> Option<Capabilities> {
    STRUCTURE_KINDS
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, caps)| *caps)
}

pub fn is_structure_kind(kind: &str) -> bool {
    capabilities_of(kind).is_some()
}

/// A building placed in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    kind: String,
    pub uid: Uid,
    pub name: Option<String>,
    pub rotation: i64,
    pub flipped: bool,
    capabilities: Capabilities,
    properties: Vec<Property>,
}

impl Structure {
    /// Create a structure with a freshly issued identity. Assembly-capable
    /// kinds start with an idle [`Assembly`].
    pub fn new(kind: impl Into<String>, uids: &mut dyn UidSource) -> Result<Self, CodecError> {
        let kind = kind.into();
        // Validate before drawing an identity so failures do not burn one.
        let capabilities = lookup(&kind)?;
        Ok(Self::build(kind, uids.issue(), capabilities))
    }

    pub fn with_uid(kind: impl Into<String>, uid: Uid) -> Result<Self, CodecError> {
        let kind = kind.into();
        let capabilities = lookup(&kind)?;
        Ok(Self::build(kind, uid, capabilities))
    }

    fn build(kind: String, uid: Uid, capabilities: Capabilities) -> Self {
        let properties = if capabilities.assembly {
            vec![Property::Assembly(Assembly::idle())]
        } else {
            Vec::new()
        };
        Self {
            kind,
            uid,
            name: None,
            rotation: 0,
            flipped: false,
            capabilities,
            properties,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Attach a property, replacing any existing one of the same kind.
    ///
    /// Only assembly-capable kinds accept [`Property::Assembly`].
    pub fn attach(&mut self, property: Property) -> Result<(), CodecError> {
        if property.kind() == PropertyKind::Assembly && !self.capabilities.assembly {
            return Err(CodecError::schema(
                self.kind.clone(),
                "structure kind cannot carry an assembly property",
            ));
        }
        match self.properties.iter_mut().find(|p| p.kind() == property.kind()) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        Ok(())
    }

    pub fn assembly(&self) -> Option<&Assembly> {
        self.properties.iter().find_map(|p| match p {
            Property::Assembly(a) => Some(a),
            _ => None,
        })
    }

    pub fn assembly_mut(&mut self) -> Option<&mut Assembly> {
        self.properties.iter_mut().find_map(|p| match p {
            Property::Assembly(a) => Some(a),
            _ => None,
        })
    }
}

fn lookup(kind: &str) -> Result<Capabilities, CodecError> {
    capabilities_of(kind).ok_or_else(|| CodecError::UnknownEnumValue {
        kind: "structure kind",
        value: kind.to_string(),
    })
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind, self.uid)?;
        if let Some(name) = &self.name {
            write!(f, " \"{name}\"")?;
        }
        write!(f, " rot={}", self.rotation)?;
        if self.flipped {
            f.write_str(" flipped")?;
        }
        for property in &self.properties {
            write!(f, " [{property}]")?;
        }
        Ok(())
    }
}
