//! Decoding and encoding of object fragments: loose game objects, the player
//! with its inventories, and structures.
//!
//! Every identity read here is reported to the [`UidSource`] so that objects
//! created afterwards never reuse a persisted identity.

use serde_json::Value;
use tracing::trace;

use super::player::{InventorySlot, PLAYER_KIND, Player};
use super::property::{self, ASSEMBLY_PROPERTY, OBJECT_PROPERTIES, PropertyKind};
use super::structure::{Structure, is_structure_kind};
use super::uid::{Uid, UidSource};
use super::{Entity, GameObject, Position};
use crate::codec::CodecError;
use crate::codec::fields::{Fields, Fragment, flag_value};

const KIND: &str = "ID";
const UID: &str = "UID";
const TILE_X: &str = "TX";
const TILE_Y: &str = "TY";
const ROTATION: &str = "Rotation";
const FLIPPED: &str = "F";
const NAME: &str = "Name";

/// A decoded entry of the document's object list.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Player(Player),
    Placed { position: Position, entity: Entity },
}

pub fn read_uid(f: &Fields<'_>) -> Result<Uid, CodecError> {
    let raw = f.int(UID)?;
    Uid::from_wire(raw)
        .ok_or_else(|| CodecError::schema(f.path_to(UID), format!("identity {raw} is not positive")))
}

pub fn read_position(f: &Fields<'_>) -> Result<Position, CodecError> {
    Ok(Position::new(f.int_as(TILE_X)?, f.int_as(TILE_Y)?))
}

/// The fields every object fragment starts with.
pub fn base_fragment(kind: &str, uid: Uid, position: Position) -> Fragment {
    let mut out = Fragment::new();
    out.insert(KIND.into(), Value::from(kind));
    out.insert(UID.into(), Value::from(uid.get()));
    out.insert(TILE_X.into(), Value::from(position.x));
    out.insert(TILE_Y.into(), Value::from(position.y));
    out
}

// === Decode ===

pub fn decode_object(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<GameObject, CodecError> {
    let kind = f.string(KIND)?;
    let uid = read_uid(f)?;
    uids.observe(uid);
    let properties = property::detect_all(&OBJECT_PROPERTIES, f, uids)?;
    Ok(GameObject {
        kind: kind.to_string(),
        uid,
        properties,
    })
}

pub fn decode_player(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Player, CodecError> {
    let uid = read_uid(f)?;
    uids.observe(uid);
    let mut player = Player::with_uid(read_position(f)?, f.int(ROTATION)?, uid);

    for slot in InventorySlot::ALL {
        let (section, list) = slot.wire_keys();
        let container = f.section(section)?;
        let list_path = container.path_to(list);
        for (i, item) in container.array(list)?.iter().enumerate() {
            let item = Fields::of(item, format!("{list_path}[{i}]"))?;
            if item.string(KIND)?.is_empty() {
                trace!(path = %item.path(), "Skipping empty inventory slot");
                continue;
            }
            let object = decode_object(&item, uids)?;
            player.inventory.slot_mut(slot).push(object);
        }
    }
    Ok(player)
}

pub fn decode_structure(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Structure, CodecError> {
    let uid = read_uid(f)?;
    uids.observe(uid);
    let mut structure = Structure::with_uid(f.string(KIND)?, uid)?;
    structure.name = f.opt_string(NAME)?.map(str::to_string);
    structure.rotation = f.int(ROTATION)?;
    structure.flipped = f.flag(FLIPPED)?;

    if structure.capabilities().assembly {
        structure.attach(ASSEMBLY_PROPERTY.decode(f, uids)?)?;
    }
    Ok(structure)
}

/// Classify an entry of the object list by its kind identifier and decode it.
pub fn decode_entity(f: &Fields<'_>, uids: &mut dyn UidSource) -> Result<Decoded, CodecError> {
    let kind = f.string(KIND)?;
    if kind == PLAYER_KIND {
        return decode_player(f, uids).map(Decoded::Player);
    }

    let position = read_position(f)?;
    let entity = if is_structure_kind(kind) {
        Entity::Structure(decode_structure(f, uids)?)
    } else {
        Entity::Object(decode_object(f, uids)?)
    };
    Ok(Decoded::Placed { position, entity })
}

// === Encode ===

pub fn encode_object(object: &GameObject, position: Position) -> Result<Fragment, CodecError> {
    let mut out = base_fragment(&object.kind, object.uid, position);
    for property in &object.properties {
        if property.kind() == PropertyKind::Assembly {
            return Err(CodecError::schema(
                object.kind.clone(),
                "assembly state is only valid on assembly-capable structures",
            ));
        }
        property.write_fields(&mut out, position)?;
    }
    Ok(out)
}

/// Inventory items are written at the player's position; empty inventories
/// become empty lists.
pub fn encode_player(player: &Player) -> Result<Fragment, CodecError> {
    let mut out = base_fragment(PLAYER_KIND, player.uid, player.position);
    out.insert(ROTATION.into(), Value::from(player.rotation));

    for slot in InventorySlot::ALL {
        let (section, list) = slot.wire_keys();
        let items = player
            .inventory
            .slot(slot)
            .iter()
            .map(|item| encode_object(item, player.position).map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        let mut container = Fragment::new();
        container.insert(list.into(), Value::Array(items));
        out.insert(section.into(), Value::Object(container));
    }
    Ok(out)
}

pub fn encode_structure(structure: &Structure, position: Position) -> Result<Fragment, CodecError> {
    let mut out = base_fragment(structure.kind(), structure.uid, position);
    out.insert(ROTATION.into(), Value::from(structure.rotation));
    out.insert(FLIPPED.into(), flag_value(structure.flipped));
    if let Some(name) = &structure.name {
        out.insert(NAME.into(), Value::from(name.as_str()));
    }
    for property in structure.properties() {
        property.write_fields(&mut out, position)?;
    }
    Ok(out)
}

pub fn encode_entity(entity: &Entity, position: Position) -> Result<Fragment, CodecError> {
    match entity {
        Entity::Object(object) => encode_object(object, position),
        Entity::Structure(structure) => encode_structure(structure, position),
    }
}
