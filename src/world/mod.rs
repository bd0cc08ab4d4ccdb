pub mod options;
pub mod plot;
pub mod tile;
pub mod topology;

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{debug, warn};

use crate::codec::fields::{Fields, Fragment};
use crate::codec::{self, CodecError};
use crate::objects::graph::{self, Decoded};
use crate::objects::{
    Entity, GameObject, InventorySlot, Player, Position, Structure, Uid, UidAllocator, UidSource,
};
pub use options::{GameFlag, GameFlags, GameMode};
pub use plot::Plot;
pub use tile::{Tile, TileType};
pub use topology::{PLOT_WIDTH, PlotAddress, PlotLayout};

/// Save format versions this crate reads and writes, with the plot height
/// each one uses.
pub const FORMAT_VERSIONS: &[(&str, u32)] = &[("140.2", 10)];

/// Version written into newly created worlds.
pub const CURRENT_VERSION: &str = "140.2";

const WORLD_MARKER: &str = "AutonautsWorld";
const EXTERNAL_MARKER: &str = "External";
const VERSION: &str = "Version";
const GAME_OPTIONS: &str = "GameOptions";
const PLOTS: &str = "Plots";
const PLOTS_VISIBLE: &str = "PlotsVisible";
const TILES: &str = "Tiles";
const TILES_WIDE: &str = "TilesWide";
const TILES_HIGH: &str = "TilesHigh";
const TILE_TYPES: &str = "TileTypes";
const OBJECTS: &str = "Objects";

fn plot_height_for(version: &str) -> Option<(&'static str, u32)> {
    FORMAT_VERSIONS
        .iter()
        .find(|(v, _)| *v == version)
        .map(|&(v, h)| (v, h))
}

/// An entire save: settings, terrain split into plots, everything placed on
/// the terrain, and the player.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub name: String,
    pub seed: Option<i64>,
    pub game_mode: GameMode,
    pub spawn: Position,
    pub options: GameFlags,
    version: &'static str,
    layout: PlotLayout,
    plots: Vec<Plot>,
    player: Player,
    uids: UidAllocator,
    /// Every identity held by the player, a placed entity, or anything nested
    /// in them.
    in_use: HashSet<Uid>,
}

impl World {
    /// A fresh world covered in `terrain`, every plot visible, with the
    /// player standing on the spawn point at the origin.
    pub fn new(
        name: impl Into<String>,
        game_mode: GameMode,
        width: u32,
        height: u32,
        terrain: TileType,
    ) -> Result<Self, CodecError> {
        let (version, plot_height) = plot_height_for(CURRENT_VERSION)
            .ok_or_else(|| CodecError::schema(VERSION, "no plot height for the current version"))?;
        let layout = PlotLayout::new(width, height, plot_height)?;
        let plots = (0..layout.plot_count())
            .map(|_| Plot::filled(layout.plot_width(), layout.plot_height(), terrain, true))
            .collect();
        let mut uids = UidAllocator::new();
        let player = Player::new(Position::ORIGIN, 0, &mut uids);
        let in_use = HashSet::from([player.uid]);
        Ok(Self {
            name: name.into(),
            seed: None,
            game_mode,
            spawn: Position::ORIGIN,
            options: GameFlags::empty(),
            version,
            layout,
            plots,
            player,
            uids,
            in_use,
        })
    }

    // === Accessors ===

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    pub fn height(&self) -> u32 {
        self.layout.height()
    }

    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Identity the next created object will receive.
    pub fn next_uid(&self) -> Uid {
        self.uids.peek()
    }

    pub fn tile(&self, x: i32, y: i32) -> Result<&Tile, CodecError> {
        let addr = self.layout.world_to_plot(x, y)?;
        self.plots[addr.plot]
            .get(addr.local_x, addr.local_y)
            .ok_or_else(|| CodecError::OutOfBounds(format!("({x}, {y}) has no tile")))
    }

    fn tile_mut(&mut self, x: i32, y: i32) -> Result<&mut Tile, CodecError> {
        let addr = self.layout.world_to_plot(x, y)?;
        self.plots[addr.plot]
            .get_mut(addr.local_x, addr.local_y)
            .ok_or_else(|| CodecError::OutOfBounds(format!("({x}, {y}) has no tile")))
    }

    /// Every tile with its coordinate in canonical order: x fastest, then y.
    ///
    /// Plots are only ever built from the layout, so every index in range
    /// maps to a tile.
    pub fn tiles_row_major(&self) -> impl Iterator<Item = (Position, &Tile)> + '_ {
        (0..self.layout.tile_count()).filter_map(move |i| {
            let (x, y) = self.layout.coordinate_of(i)?;
            let tile = self.tile(x, y).ok()?;
            Some((Position::new(x, y), tile))
        })
    }

    /// Placed entities in the order they are written to the document.
    pub fn entities(&self) -> impl Iterator<Item = (Position, &Entity)> + '_ {
        self.tiles_row_major()
            .flat_map(|(pos, tile)| tile.entities.iter().map(move |e| (pos, e)))
    }

    pub fn entity_count(&self) -> usize {
        self.plots.iter().map(Plot::entity_count).sum()
    }

    pub fn tile_type_counts(&self) -> BTreeMap<TileType, usize> {
        let mut counts = BTreeMap::new();
        for plot in &self.plots {
            for tile in plot.tiles() {
                *counts.entry(tile.tile_type).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn find(&self, uid: Uid) -> Option<(Position, &Entity)> {
        self.entities().find(|(_, e)| e.uid() == uid)
    }

    pub fn uid_in_use(&self, uid: Uid) -> bool {
        self.in_use.contains(&uid)
    }

    /// Identities of the player, everything placed, and everything nested.
    pub fn all_uids(&self) -> Vec<Uid> {
        let mut out = Vec::new();
        self.player.collect_uids(&mut out);
        for (_, entity) in self.entities() {
            entity.collect_uids(&mut out);
        }
        out
    }

    // === Mutation ===

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_option(&mut self, flag: GameFlag, enabled: bool) {
        self.options.set(flag, enabled);
    }

    pub fn set_plot_visible(&mut self, index: usize, visible: bool) -> Result<(), CodecError> {
        let count = self.plots.len();
        let plot = self
            .plots
            .get_mut(index)
            .ok_or_else(|| CodecError::OutOfBounds(format!("plot {index} of {count}")))?;
        plot.visible = visible;
        Ok(())
    }

    pub fn set_tile_type(&mut self, x: i32, y: i32, tile_type: TileType) -> Result<(), CodecError> {
        self.tile_mut(x, y)?.tile_type = tile_type;
        Ok(())
    }

    pub fn move_player(&mut self, x: i32, y: i32) -> Result<(), CodecError> {
        if !self.layout.contains(x, y) {
            return Err(CodecError::OutOfBounds(format!(
                "cannot move the player to ({x}, {y})"
            )));
        }
        self.player.set_position(x, y);
        Ok(())
    }

    /// A new loose object with the next free identity. It is not placed.
    pub fn new_object(&mut self, kind: impl Into<String>) -> GameObject {
        GameObject::new(kind, &mut self.uids)
    }

    pub fn new_structure(&mut self, kind: impl Into<String>) -> Result<Structure, CodecError> {
        Structure::new(kind, &mut self.uids)
    }

    /// Put `entity` on the tile at (x, y). Its identities must not already be
    /// in use anywhere in the world.
    pub fn place(&mut self, x: i32, y: i32, entity: impl Into<Entity>) -> Result<(), CodecError> {
        let entity = entity.into();
        let mut incoming = Vec::new();
        entity.collect_uids(&mut incoming);
        self.check_unused(&incoming)?;

        self.tile_mut(x, y)?.entities.push(entity);
        self.claim(incoming);
        Ok(())
    }

    /// Add `item` to one of the player's inventories.
    pub fn give_player(&mut self, slot: InventorySlot, item: GameObject) -> Result<(), CodecError> {
        let mut incoming = Vec::new();
        item.collect_uids(&mut incoming);
        self.check_unused(&incoming)?;

        self.player.inventory.slot_mut(slot).push(item);
        self.claim(incoming);
        Ok(())
    }

    /// Detach the entity with `uid` from whichever tile holds it.
    pub fn remove(&mut self, uid: Uid) -> Option<(Position, Entity)> {
        let (position, _) = self.find(uid)?;
        let entity = self.tile_mut(position.x, position.y).ok()?.take(uid)?;
        let mut released = Vec::new();
        entity.collect_uids(&mut released);
        for uid in &released {
            self.in_use.remove(uid);
        }
        Some((position, entity))
    }

    fn check_unused(&self, incoming: &[Uid]) -> Result<(), CodecError> {
        if let Some(uid) = incoming.iter().find(|&u| self.in_use.contains(u)) {
            return Err(CodecError::Consistency(format!(
                "identity {uid} is already in use"
            )));
        }
        if let Some(uid) = first_duplicate(&mut incoming.to_vec()) {
            return Err(CodecError::Consistency(format!(
                "identity {uid} appears twice in the added entity"
            )));
        }
        Ok(())
    }

    fn claim(&mut self, incoming: Vec<Uid>) {
        for uid in incoming {
            self.uids.observe(uid);
            self.in_use.insert(uid);
        }
    }

    // === Decode ===

    pub fn decode(document: &Value) -> Result<Self, CodecError> {
        let root = Fields::of(document, "")?;

        if root.int(WORLD_MARKER)? != 1 {
            return Err(CodecError::schema(WORLD_MARKER, "not an Autonauts world document"));
        }
        if root.int(EXTERNAL_MARKER)? != 0 {
            return Err(CodecError::schema(EXTERNAL_MARKER, "external worlds are not supported"));
        }
        let raw_version = root.string(VERSION)?;
        let (version, plot_height) = plot_height_for(raw_version).ok_or_else(|| {
            CodecError::schema(VERSION, format!("unsupported format version '{raw_version}'"))
        })?;

        let opts = root.section(GAME_OPTIONS)?;
        let name = opts.string("Name")?.to_string();
        let seed = opts.opt_int("Seed")?;
        let game_mode = GameMode::from_wire(opts.string("GameModeName")?)?;
        let spawn = Position::new(opts.int_as("StartPositionX")?, opts.int_as("StartPositionY")?);
        let options = GameFlags::read(&opts)?;

        let tiles = root.section(TILES)?;
        let layout = PlotLayout::new(
            tiles.int_as(TILES_WIDE)?,
            tiles.int_as(TILES_HIGH)?,
            plot_height,
        )?;
        let terrain = codec::decode_wire(tiles.array(TILE_TYPES)?, layout.tile_count())?;

        let visibility = read_visibility(&root.section(PLOTS)?)?;
        if visibility.len() != layout.plot_count() {
            return Err(CodecError::Consistency(format!(
                "{} plot visibility entries for {} plots",
                visibility.len(),
                layout.plot_count()
            )));
        }
        let plots = visibility
            .iter()
            .enumerate()
            .map(|(i, &visible)| Plot::from_world(&layout, i, &terrain, visible))
            .collect::<Result<Vec<_>, _>>()?;

        let mut uids = UidAllocator::new();
        let mut player = None;
        let mut placed = Vec::new();
        let objects_path = root.path_to(OBJECTS);
        for (i, item) in root.array(OBJECTS)?.iter().enumerate() {
            let fields = Fields::of(item, format!("{objects_path}[{i}]"))?;
            match graph::decode_entity(&fields, &mut uids)? {
                Decoded::Player(p) => {
                    if player.is_some() {
                        return Err(CodecError::schema(objects_path, "more than one player object"));
                    }
                    player = Some(p);
                }
                Decoded::Placed { position, entity } => {
                    if !layout.contains(position.x, position.y) {
                        return Err(CodecError::OutOfBounds(format!(
                            "{} at {position} lies outside the {}x{} world",
                            fields.path(),
                            layout.width(),
                            layout.height()
                        )));
                    }
                    placed.push((position, entity));
                }
            }
        }
        let player = player.ok_or_else(|| CodecError::schema(objects_path, "no player object"))?;
        if !layout.contains(player.x(), player.y()) {
            warn!(position = %player.position, "Player stands outside the world extent");
        }

        let mut world = Self {
            name,
            seed,
            game_mode,
            spawn,
            options,
            version,
            layout,
            plots,
            player,
            uids,
            in_use: HashSet::new(),
        };
        for (position, entity) in placed {
            world.tile_mut(position.x, position.y)?.entities.push(entity);
        }

        let mut all = world.all_uids();
        if let Some(uid) = first_duplicate(&mut all) {
            return Err(CodecError::Consistency(format!(
                "identity {uid} is used by more than one object"
            )));
        }
        world.in_use = all.into_iter().collect();

        debug!(
            name = %world.name,
            width = world.width(),
            height = world.height(),
            plots = world.plots.len(),
            entities = world.entity_count(),
            next_uid = %world.uids.peek(),
            "Decoded world"
        );
        Ok(world)
    }

    // === Encode ===

    pub fn encode(&self) -> Result<Value, CodecError> {
        let mut opts = Fragment::new();
        opts.insert("Name".into(), Value::from(self.name.as_str()));
        if let Some(seed) = self.seed {
            opts.insert("Seed".into(), Value::from(seed));
        }
        opts.insert("GameModeName".into(), Value::from(self.game_mode.wire_name()));
        opts.insert("StartPositionX".into(), Value::from(self.spawn.x));
        opts.insert("StartPositionY".into(), Value::from(self.spawn.y));
        self.options.write(&mut opts);

        let visible: Vec<Value> = self
            .plots
            .iter()
            .map(|p| Value::from(u8::from(p.visible)))
            .collect();
        let mut plots = Fragment::new();
        plots.insert(PLOTS_VISIBLE.into(), Value::Array(visible));

        let mut terrain = Vec::with_capacity(self.layout.tile_count());
        for i in 0..self.layout.tile_count() {
            let (x, y) = self
                .layout
                .coordinate_of(i)
                .ok_or_else(|| CodecError::OutOfBounds(format!("tile index {i}")))?;
            terrain.push(self.tile(x, y)?.tile_type);
        }
        let runs = codec::encode(&terrain)?;
        let mut tiles = Fragment::new();
        tiles.insert(TILES_WIDE.into(), Value::from(self.width()));
        tiles.insert(TILES_HIGH.into(), Value::from(self.height()));
        tiles.insert(TILE_TYPES.into(), Value::Array(codec::flatten(&runs)));

        let mut objects = Vec::with_capacity(self.entity_count() + 1);
        for (position, entity) in self.entities() {
            objects.push(Value::Object(graph::encode_entity(entity, position)?));
        }
        objects.push(Value::Object(graph::encode_player(&self.player)?));
        let object_count = objects.len();

        let mut root = Fragment::new();
        root.insert(WORLD_MARKER.into(), Value::from(1));
        root.insert(VERSION.into(), Value::from(self.version));
        root.insert(EXTERNAL_MARKER.into(), Value::from(0));
        root.insert(GAME_OPTIONS.into(), Value::Object(opts));
        root.insert(PLOTS.into(), Value::Object(plots));
        root.insert(TILES.into(), Value::Object(tiles));
        root.insert(OBJECTS.into(), Value::Array(objects));

        debug!(
            name = %self.name,
            runs = runs.len(),
            objects = object_count,
            "Encoded world"
        );
        Ok(Value::Object(root))
    }
}

/// Visibility flags are written as 0/1 but booleans are accepted too.
fn read_visibility(plots: &Fields<'_>) -> Result<Vec<bool>, CodecError> {
    let path = plots.path_to(PLOTS_VISIBLE);
    plots
        .array(PLOTS_VISIBLE)?
        .iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Bool(b) => Ok(*b),
            _ => match v.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(CodecError::schema(
                    format!("{path}[{i}]"),
                    format!("expected 0, 1 or a boolean, got {v}"),
                )),
            },
        })
        .collect()
}

fn first_duplicate(uids: &mut [Uid]) -> Option<Uid> {
    uids.sort_unstable();
    uids.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::Property;
    use serde_json::json;

    /// A 42x20 world: grass on top, sand below, with a tree, a workbench
    /// and the player.
    fn sample_document() -> Value {
        json!({
            "AutonautsWorld": 1,
            "Version": "140.2",
            "External": 0,
            "GameOptions": {
                "Name": "Sample",
                "Seed": 1234,
                "GameModeName": "ModeFree",
                "StartPositionX": 5,
                "StartPositionY": 6,
                "BadgeUnlocksEnabled": true,
                "BotLimitEnabled": false,
                "BotRechargingEnabled": true,
                "RandomObjectsEnabled": false,
                "RecordingEnabled": false,
                "TutorialEnabled": false
            },
            "Plots": { "PlotsVisible": [1, 0, 1, 1] },
            "Tiles": { "TilesWide": 42, "TilesHigh": 20, "TileTypes": [0, 420, 10, 420] },
            "Objects": [
                { "ID": "TreePine", "UID": 3, "TX": 2, "TY": 1, "ST": 2, "STT": 15, "SL": 0 },
                {
                    "ID": "Workbench", "UID": 4, "TX": 30, "TY": 12, "Rotation": 1, "F": 0,
                    "ToCreateItem": "Total", "NumCreated": 0, "State": 0, "IngredientsItems": []
                },
                {
                    "ID": "FarmerPlayer", "UID": 1, "TX": 5, "TY": 6, "Rotation": 0,
                    "Carry": { "CarryObjects": [{ "ID": "Axe", "UID": 2, "TX": 5, "TY": 6, "Used": 10 }] },
                    "Inv": { "InvObjects": [] },
                    "Up": { "UpgradeObjects": [] },
                    "Clothes": { "ClothesObjects": [] }
                }
            ]
        })
    }

    #[test]
    fn decodes_sample_document() {
        let world = World::decode(&sample_document()).unwrap();
        assert_eq!(world.name, "Sample");
        assert_eq!(world.seed, Some(1234));
        assert_eq!(world.game_mode, GameMode::Free);
        assert_eq!(world.spawn, Position::new(5, 6));
        assert!(world.options.contains(GameFlag::BotRecharging));
        assert_eq!(world.plots().len(), 4);
        assert!(!world.plots()[1].visible);
        assert_eq!(world.tile(41, 9).unwrap().tile_type, TileType::Grass);
        assert_eq!(world.tile(0, 10).unwrap().tile_type, TileType::Sand);
        assert_eq!(world.entity_count(), 2);
        assert_eq!(world.player().inventory.held[0].kind, "Axe");
        assert_eq!(world.next_uid().get(), 5);

        let tree = &world.tile(2, 1).unwrap().entities[0];
        let Entity::Object(tree) = tree else {
            panic!("expected a game object");
        };
        assert!(tree.properties.contains(&Property::GrowthStage { stage: 2, timer: 15 }));
    }

    #[test]
    fn round_trips_sample_document() {
        let doc = sample_document();
        let world = World::decode(&doc).unwrap();
        assert_eq!(world.encode().unwrap(), doc);
    }

    #[test]
    fn missing_game_options_names_the_section() {
        let mut doc = sample_document();
        doc.as_object_mut().unwrap().remove("GameOptions");
        let err = World::decode(&doc).unwrap_err();
        assert_eq!(err, CodecError::missing("GameOptions"));
    }

    #[test]
    fn markers_and_version_checked() {
        let mut doc = sample_document();
        doc["Version"] = json!("139.0");
        assert!(matches!(World::decode(&doc), Err(CodecError::Schema { field, .. }) if field == "Version"));

        let mut doc = sample_document();
        doc["AutonautsWorld"] = json!(0);
        assert!(World::decode(&doc).is_err());

        let mut doc = sample_document();
        doc["External"] = json!(1);
        assert!(World::decode(&doc).is_err());
    }

    #[test]
    fn tile_count_mismatch_is_inconsistent() {
        let mut doc = sample_document();
        doc["Tiles"]["TileTypes"] = json!([0, 420, 10, 419]);
        assert!(matches!(World::decode(&doc), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn oversized_tile_stream_is_inconsistent() {
        let mut doc = sample_document();
        let huge: Vec<Value> = (0..10).flat_map(|_| [json!(0), json!(4_000_000_000u64)]).collect();
        doc["Tiles"]["TileTypes"] = Value::Array(huge);
        assert!(matches!(World::decode(&doc), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn visibility_count_mismatch_is_inconsistent() {
        let mut doc = sample_document();
        doc["Plots"]["PlotsVisible"] = json!([1, 1, 1]);
        assert!(matches!(World::decode(&doc), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn indivisible_dimensions_are_inconsistent() {
        let mut doc = sample_document();
        doc["Tiles"] = json!({ "TilesWide": 40, "TilesHigh": 21, "TileTypes": [0, 840] });
        assert!(matches!(World::decode(&doc), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn player_cardinality_enforced() {
        let mut doc = sample_document();
        let player = doc["Objects"][2].clone();
        doc["Objects"].as_array_mut().unwrap().pop();
        assert!(matches!(World::decode(&doc), Err(CodecError::Schema { .. })));

        let mut twice = player.clone();
        twice["UID"] = json!(50);
        twice["Carry"]["CarryObjects"] = json!([]);
        let mut doc = sample_document();
        doc["Objects"].as_array_mut().unwrap().push(twice);
        assert!(matches!(World::decode(&doc), Err(CodecError::Schema { .. })));
    }

    #[test]
    fn object_outside_world_rejected() {
        let mut doc = sample_document();
        doc["Objects"][0]["TX"] = json!(42);
        assert!(matches!(World::decode(&doc), Err(CodecError::OutOfBounds(_))));
    }

    #[test]
    fn duplicate_uids_rejected() {
        let mut doc = sample_document();
        doc["Objects"][1]["UID"] = json!(2);
        assert!(matches!(World::decode(&doc), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn created_objects_never_reuse_identities() {
        let mut world = World::decode(&sample_document()).unwrap();
        let stick = world.new_object("Stick");
        assert_eq!(stick.uid.get(), 5);
        world.place(10, 10, stick).unwrap();

        let crate_ = world.new_structure("StorageGeneric").unwrap();
        assert_eq!(crate_.uid.get(), 6);
        world.place(11, 10, crate_).unwrap();

        let uids = world.all_uids();
        let mut sorted = uids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), uids.len());
    }

    #[test]
    fn place_rejects_identity_in_use() {
        let mut world = World::decode(&sample_document()).unwrap();
        let clash = GameObject::with_uid("Rock", Uid::new(2).unwrap());
        assert!(matches!(world.place(0, 0, clash), Err(CodecError::Consistency(_))));

        let outside = world.new_object("Rock");
        assert!(matches!(world.place(0, 20, outside), Err(CodecError::OutOfBounds(_))));
    }

    #[test]
    fn place_with_foreign_uid_advances_allocator() {
        let mut world = World::new("Fresh", GameMode::Creative, 21, 10, TileType::Grass).unwrap();
        world.place(1, 1, GameObject::with_uid("Rock", Uid::new(40).unwrap())).unwrap();
        assert_eq!(world.new_object("Rock").uid.get(), 41);
    }

    #[test]
    fn plot_visibility_edits_keep_world_decodable() {
        let mut world = World::new("Fog", GameMode::Free, 42, 10, TileType::Grass).unwrap();
        world.set_plot_visible(1, false).unwrap();
        assert!(matches!(world.set_plot_visible(2, true), Err(CodecError::OutOfBounds(_))));

        let doc = world.encode().unwrap();
        assert_eq!(doc["Plots"]["PlotsVisible"], json!([1, 0]));
        assert_eq!(doc["Tiles"]["TileTypes"], json!([0, 420]));
        assert_eq!(World::decode(&doc).unwrap(), world);
    }

    #[test]
    fn painted_tiles_encode_in_row_major_order() {
        let mut world = World::new("Paint", GameMode::Free, 42, 10, TileType::Grass).unwrap();
        world.set_tile_type(41, 0, TileType::Sand).unwrap();
        world.set_tile_type(0, 1, TileType::Sand).unwrap();
        assert!(matches!(
            world.set_tile_type(42, 0, TileType::Sand),
            Err(CodecError::OutOfBounds(_))
        ));
        let doc = world.encode().unwrap();
        assert_eq!(doc["Tiles"]["TileTypes"], json!([0, 41, 10, 2, 0, 377]));
    }

    #[test]
    fn player_inventory_shares_identity_space() {
        let mut world = World::decode(&sample_document()).unwrap();
        let clash = GameObject::with_uid("Stick", Uid::new(4).unwrap());
        assert!(matches!(
            world.give_player(InventorySlot::Backpack, clash),
            Err(CodecError::Consistency(_))
        ));

        let stick = world.new_object("Stick");
        let uid = stick.uid;
        world.give_player(InventorySlot::Backpack, stick).unwrap();
        assert!(world.uid_in_use(uid));
        assert_eq!(world.player().inventory.backpack.len(), 1);

        let again = GameObject::with_uid("Rock", uid);
        assert!(matches!(world.place(1, 1, again), Err(CodecError::Consistency(_))));
    }

    #[test]
    fn removed_identities_can_be_placed_again() {
        let mut world = World::decode(&sample_document()).unwrap();
        let uid = Uid::new(4).unwrap();
        assert!(world.uid_in_use(uid));
        let (_, bench) = world.remove(uid).unwrap();
        assert!(!world.uid_in_use(uid));
        world.place(0, 0, bench).unwrap();
        assert!(world.uid_in_use(uid));
        assert_eq!(world.all_uids().len(), 4);
    }

    #[test]
    fn many_placements_track_every_identity() {
        let mut world = World::new("Busy", GameMode::Free, 42, 20, TileType::Grass).unwrap();
        for i in 0..840 {
            let log = world.new_object("Log");
            world.place(i % 42, i / 42, log).unwrap();
        }
        assert_eq!(world.entity_count(), 840);
        assert_eq!(world.all_uids().len(), 841);
        assert!(world.all_uids().iter().all(|&u| world.uid_in_use(u)));
    }

    #[test]
    fn remove_detaches_entity() {
        let mut world = World::decode(&sample_document()).unwrap();
        let (position, entity) = world.remove(Uid::new(4).unwrap()).unwrap();
        assert_eq!(position, Position::new(30, 12));
        assert_eq!(entity.kind(), "Workbench");
        assert!(world.remove(Uid::new(4).unwrap()).is_none());
        assert_eq!(world.entity_count(), 1);
    }

    #[test]
    fn edits_show_up_in_encoding() {
        let mut world = World::decode(&sample_document()).unwrap();
        world.rename("Renamed");
        world.set_option(GameFlag::Tutorial, true);
        world.set_option(GameFlag::BadgeUnlocks, false);
        world.move_player(7, 8).unwrap();
        assert!(world.move_player(-1, 0).is_err());

        let doc = world.encode().unwrap();
        assert_eq!(doc["GameOptions"]["Name"], json!("Renamed"));
        assert_eq!(doc["GameOptions"]["TutorialEnabled"], json!(true));
        assert_eq!(doc["GameOptions"]["BadgeUnlocksEnabled"], json!(false));
        let player = doc["Objects"].as_array().unwrap().last().unwrap().clone();
        assert_eq!((player["TX"].clone(), player["TY"].clone()), (json!(7), json!(8)));
        assert_eq!(player["Carry"]["CarryObjects"][0]["TX"], json!(7));
    }

    #[test]
    fn objects_encode_in_row_major_order_with_player_last() {
        let mut world = World::new("Order", GameMode::Campaign, 42, 20, TileType::Soil).unwrap();
        let late = world.new_object("Late");
        let early = world.new_object("Early");
        world.place(0, 5, late).unwrap();
        world.place(40, 0, early).unwrap();

        let doc = world.encode().unwrap();
        let kinds: Vec<_> = doc["Objects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["ID"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["Early", "Late", "FarmerPlayer"]);
        assert_eq!(doc["Tiles"]["TileTypes"], json!([1, 840]));
        assert!(doc["GameOptions"].get("Seed").is_none());
    }

    #[test]
    fn fresh_world_round_trips() {
        let world = World::new("Fresh", GameMode::Settlement, 21, 10, TileType::Grass).unwrap();
        let back = World::decode(&world.encode().unwrap()).unwrap();
        assert_eq!(back, world);
    }

    #[test]
    fn tile_type_counts_cover_world() {
        let world = World::decode(&sample_document()).unwrap();
        let counts = world.tile_type_counts();
        assert_eq!(counts[&TileType::Grass], 420);
        assert_eq!(counts[&TileType::Sand], 420);
    }
}
