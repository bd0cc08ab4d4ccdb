//! Optional traits attached to game objects and structures.
//!
//! Properties are recognised structurally: each entry of the detection table
//! checks for the fields it owns in the raw object fragment and, when they are
//! present, decodes them. Entries are independent, so an object can carry any
//! combination. Fields no entry claims are ignored.

use std::fmt;

use serde_json::Value;

use super::graph;
use super::uid::{Uid, UidSource};
use super::{GameObject, Position};
use crate::codec::CodecError;
use crate::codec::fields::{Fields, Fragment, flag_value};

const USED: &str = "Used";
const STAGE: &str = "ST";
const STAGE_TIMER: &str = "STT";
const SL_MARKER: &str = "SL";
const BEES_NEST: &str = "BeesNest";
const FLOWER_TYPE: &str = "Type";
const TO_CREATE: &str = "ToCreateItem";
const NUM_CREATED: &str = "NumCreated";
const STATE: &str = "State";
const INGREDIENTS: &str = "IngredientsItems";

/// Value of `ToCreateItem` meaning no particular output is selected.
pub const NO_TARGET_SENTINEL: &str = "Total";

// === Values ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowerKind {
    Aster,
    Tulip,
    Delphinium,
    Primrose,
    Rose,
    Gladioli,
    Chamomile,
}

impl FlowerKind {
    pub const ALL: [FlowerKind; 7] = [
        FlowerKind::Aster,
        FlowerKind::Tulip,
        FlowerKind::Delphinium,
        FlowerKind::Primrose,
        FlowerKind::Rose,
        FlowerKind::Gladioli,
        FlowerKind::Chamomile,
    ];

    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| CodecError::UnknownEnumValue {
                kind: "flower type",
                value: code.to_string(),
            })
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Crafting state of an assembly-capable structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    /// Item being produced; `None` when the bench has no target selected.
    pub output: Option<String>,
    pub produced: i64,
    pub active: bool,
    pub ingredients: Vec<GameObject>,
}

impl Assembly {
    /// A bench with nothing selected and nothing loaded.
    pub fn idle() -> Self {
        Self {
            output: None,
            produced: 0,
            active: false,
            ingredients: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Durability,
    GrowthStage,
    TreeAttachment,
    Flower,
    Assembly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Durability {
        uses: i64,
    },
    GrowthStage {
        stage: i64,
        timer: i64,
    },
    /// Present on tree-like objects. `marker` is the raw `SL` value.
    TreeAttachment {
        marker: i64,
        bee_colony: Option<Uid>,
    },
    Flower(FlowerKind),
    Assembly(Assembly),
}

impl Property {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Property::Durability { .. } => PropertyKind::Durability,
            Property::GrowthStage { .. } => PropertyKind::GrowthStage,
            Property::TreeAttachment { .. } => PropertyKind::TreeAttachment,
            Property::Flower(_) => PropertyKind::Flower,
            Property::Assembly(_) => PropertyKind::Assembly,
        }
    }

    /// Tree attachment with the usual marker value and an optional colony.
    pub fn tree(bee_colony: Option<Uid>) -> Self {
        Property::TreeAttachment {
            marker: 0,
            bee_colony,
        }
    }

    /// Write this property's fields into an object fragment. Nested objects
    /// (assembly ingredients) are written at `position`.
    pub fn write_fields(&self, out: &mut Fragment, position: Position) -> Result<(), CodecError> {
        match self {
            Property::Durability { uses } => {
                out.insert(USED.into(), Value::from(*uses));
            }
            Property::GrowthStage { stage, timer } => {
                out.insert(STAGE.into(), Value::from(*stage));
                out.insert(STAGE_TIMER.into(), Value::from(*timer));
            }
            Property::TreeAttachment { marker, bee_colony } => {
                out.insert(SL_MARKER.into(), Value::from(*marker));
                if let Some(uid) = bee_colony {
                    let nest = graph::base_fragment(BEES_NEST, *uid, Position::ORIGIN);
                    out.insert(BEES_NEST.into(), Value::Object(nest));
                }
            }
            Property::Flower(kind) => {
                out.insert(FLOWER_TYPE.into(), Value::from(kind.code()));
            }
            Property::Assembly(assembly) => {
                let output = assembly.output.as_deref().unwrap_or(NO_TARGET_SENTINEL);
                out.insert(TO_CREATE.into(), Value::from(output));
                out.insert(NUM_CREATED.into(), Value::from(assembly.produced));
                out.insert(STATE.into(), flag_value(assembly.active));
                let ingredients = assembly
                    .ingredients
                    .iter()
                    .map(|item| graph::encode_object(item, position).map(Value::Object))
                    .collect::<Result<Vec<_>, _>>()?;
                out.insert(INGREDIENTS.into(), Value::Array(ingredients));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Durability { uses } => write!(f, "uses={uses}"),
            Property::GrowthStage { stage, timer } => write!(f, "stage={stage} timer={timer}"),
            Property::TreeAttachment {
                bee_colony: Some(uid),
                ..
            } => write!(f, "bees={uid}"),
            Property::TreeAttachment { .. } => write!(f, "bees=none"),
            Property::Flower(kind) => write!(f, "flower={kind:?}"),
            Property::Assembly(a) => write!(
                f,
                "output={} created={} active={} ingredients={}",
                a.output.as_deref().unwrap_or("-"),
                a.produced,
                a.active,
                a.ingredients.len()
            ),
        }
    }
}

// === Detection table ===

type Detect = fn(&Fields<'_>) -> bool;
type Decode = fn(&Fields<'_>, &mut dyn UidSource) -> Result<Property, CodecError>;

/// One row of the structural detection table.
pub struct PropertyEntry {
    pub kind: PropertyKind,
    detect: Detect,
    decode: Decode,
}

impl PropertyEntry {
    pub fn matches(&self, fields: &Fields<'_>) -> bool {
        (self.detect)(fields)
    }

    pub fn decode(&self, fields: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Property, CodecError> {
        (self.decode)(fields, uids)
    }
}

/// Properties any game object may carry, in detection order.
pub const OBJECT_PROPERTIES: [PropertyEntry; 4] = [
    PropertyEntry {
        kind: PropertyKind::Durability,
        detect: |f| f.has(USED),
        decode: decode_durability,
    },
    PropertyEntry {
        kind: PropertyKind::GrowthStage,
        detect: |f| f.has(STAGE) && f.has(STAGE_TIMER),
        decode: decode_growth_stage,
    },
    PropertyEntry {
        kind: PropertyKind::TreeAttachment,
        detect: |f| f.has(SL_MARKER),
        decode: decode_tree,
    },
    PropertyEntry {
        kind: PropertyKind::Flower,
        detect: |f| f.has(FLOWER_TYPE),
        decode: decode_flower,
    },
];

/// Crafting state; only consulted for assembly-capable structures, where the
/// fields are mandatory.
pub const ASSEMBLY_PROPERTY: PropertyEntry = PropertyEntry {
    kind: PropertyKind::Assembly,
    detect: |_| true,
    decode: decode_assembly,
};

/// Run every entry of `table` against the fragment and decode all matches.
pub fn detect_all(
    table: &[PropertyEntry],
    fields: &Fields<'_>,
    uids: &mut dyn UidSource,
) -> Result<Vec<Property>, CodecError> {
    table
        .iter()
        .filter(|entry| entry.matches(fields))
        .map(|entry| entry.decode(fields, uids))
        .collect()
}

fn decode_durability(f: &Fields<'_>, _: &mut dyn UidSource) -> Result<Property, CodecError> {
    Ok(Property::Durability { uses: f.int(USED)? })
}

fn decode_growth_stage(f: &Fields<'_>, _: &mut dyn UidSource) -> Result<Property, CodecError> {
    Ok(Property::GrowthStage {
        stage: f.int(STAGE)?,
        timer: f.int(STAGE_TIMER)?,
    })
}

fn decode_tree(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Property, CodecError> {
    let marker = f.int(SL_MARKER)?;
    let bee_colony = match f.get(BEES_NEST) {
        None | Some(Value::Null) => None,
        Some(_) => {
            // Nest position is always the origin; only the identity matters.
            let nest = f.section(BEES_NEST)?;
            let uid = graph::read_uid(&nest)?;
            uids.observe(uid);
            Some(uid)
        }
    };
    Ok(Property::TreeAttachment { marker, bee_colony })
}

fn decode_flower(f: &Fields<'_>, _: &mut dyn UidSource) -> Result<Property, CodecError> {
    Ok(Property::Flower(FlowerKind::from_code(f.int(FLOWER_TYPE)?)?))
}

fn decode_assembly(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Property, CodecError> {
    let output = match f.string(TO_CREATE)? {
        NO_TARGET_SENTINEL => None,
        item => Some(item.to_string()),
    };
    let ingredients = f
        .array(INGREDIENTS)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let fields = Fields::of(item, format!("{}[{i}]", f.path_to(INGREDIENTS)))?;
            graph::decode_object(&fields, uids)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Property::Assembly(Assembly {
        output,
        produced: f.int(NUM_CREATED)?,
        active: f.flag(STATE)?,
        ingredients,
    }))
}
