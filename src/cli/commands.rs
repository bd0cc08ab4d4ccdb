use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::codec::CodecError;
use crate::objects::{Entity, InventorySlot, Position};
use crate::persistence::{self, SaveOptions};
use crate::world::{GameFlag, PlotAddress, Tile, World};

/// Print the world overview for a save file.
pub fn summary(path: &Path) -> Result<(), String> {
    let world = persistence::load_world(path).map_err(|e| e.to_string())?;
    print!("{}", WorldSummary(&world));
    Ok(())
}

/// Print the terrain and contents of one tile.
pub fn inspect_tile(path: &Path, x: i32, y: i32) -> Result<(), String> {
    let world = persistence::load_world(path).map_err(|e| e.to_string())?;
    print!("{}", TileReport::new(&world, x, y).map_err(|e| e.to_string())?);
    Ok(())
}

/// Option changes applied by `rewrite`.
#[derive(Debug, Clone, Default)]
pub struct RewriteRequest {
    pub output: Option<PathBuf>,
    pub enable: Vec<GameFlag>,
    pub disable: Vec<GameFlag>,
    pub name: Option<String>,
}

/// Decode `path`, apply `request`, and write the result back (or to
/// `request.output`).
pub fn rewrite(path: &Path, request: &RewriteRequest, options: SaveOptions) -> Result<PathBuf, String> {
    if let Some(flag) = request.enable.iter().find(|f| request.disable.contains(f)) {
        return Err(format!("Option {flag} is both enabled and disabled"));
    }

    let mut world = persistence::load_world(path).map_err(|e| e.to_string())?;
    apply(&mut world, request);

    let target = request.output.clone().unwrap_or_else(|| path.to_path_buf());
    persistence::save_world(&world, &target, options).map_err(|e| e.to_string())?;
    info!(path = %target.display(), options = %world.options, "Rewrote world");
    Ok(target)
}

fn apply(world: &mut World, request: &RewriteRequest) {
    if let Some(name) = &request.name {
        world.rename(name.clone());
    }
    for &flag in &request.enable {
        world.set_option(flag, true);
    }
    for &flag in &request.disable {
        world.set_option(flag, false);
    }
}

/// World overview rendered by `summary`.
pub struct WorldSummary<'a>(pub &'a World);

impl fmt::Display for WorldSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let world = self.0;
        let tiles = world.layout().tile_count();
        let visible = world.plots().iter().filter(|p| p.visible).count();

        writeln!(f, "=== World: {} ===", world.name)?;
        writeln!(f, "Version: {}", world.version())?;
        writeln!(f, "Mode: {}", world.game_mode)?;
        match world.seed {
            Some(seed) => writeln!(f, "Seed: {seed}")?,
            None => writeln!(f, "Seed: (none)")?,
        }
        writeln!(f, "Size: {}x{} ({} tiles)", world.width(), world.height(), tiles)?;
        writeln!(f, "Plots: {} visible of {}", visible, world.plots().len())?;
        writeln!(f, "Spawn: {}", world.spawn)?;
        writeln!(f, "Options: {}", world.options)?;
        writeln!(f, "Next UID: {}", world.next_uid())?;

        writeln!(f, "\nTerrain:")?;
        let mut terrain: Vec<_> = world.tile_type_counts().into_iter().collect();
        terrain.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        for (tile_type, count) in &terrain {
            let pct = *count as f64 / tiles as f64 * 100.0;
            writeln!(f, "  {:<26} {:>7} ({:.1}%)", tile_type.display_name(), count, pct)?;
        }

        let mut objects = 0;
        let mut structures = 0;
        let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
        for (_, entity) in world.entities() {
            match entity {
                Entity::Object(_) => objects += 1,
                Entity::Structure(_) => structures += 1,
            }
            *kinds.entry(entity.kind()).or_insert(0) += 1;
        }
        writeln!(f, "\nPlaced: {objects} object(s), {structures} structure(s)")?;
        for (kind, count) in &kinds {
            writeln!(f, "  {kind:<26} {count:>7}")?;
        }

        let player = world.player();
        writeln!(f, "\nPlayer: #{} at {}", player.uid, player.position)?;
        for slot in InventorySlot::ALL {
            let (section, _) = slot.wire_keys();
            writeln!(f, "  {:<8} {} item(s)", section, player.inventory.slot(slot).len())?;
        }
        Ok(())
    }
}

pub fn format_summary(world: &World) -> String {
    WorldSummary(world).to_string()
}

/// One tile and everything on it, rendered by `tile`.
pub struct TileReport<'a> {
    world: &'a World,
    position: Position,
    tile: &'a Tile,
    address: PlotAddress,
}

impl<'a> TileReport<'a> {
    pub fn new(world: &'a World, x: i32, y: i32) -> Result<Self, CodecError> {
        Ok(Self {
            world,
            position: Position::new(x, y),
            tile: world.tile(x, y)?,
            address: world.layout().world_to_plot(x, y)?,
        })
    }
}

impl fmt::Display for TileReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { world, position, tile, address } = self;
        let plot = &world.plots()[address.plot];

        writeln!(f, "=== Tile {position} ===")?;
        writeln!(f, "Terrain: {} (code {})", tile.tile_type, tile.tile_type.code())?;
        writeln!(
            f,
            "Plot: {} at local ({}, {}){}",
            address.plot,
            address.local_x,
            address.local_y,
            if plot.visible { "" } else { " [hidden]" }
        )?;

        let player = world.player();
        if player.position == *position {
            writeln!(f, "Player: {player}")?;
        }

        writeln!(f, "\n--- Entities ---")?;
        if tile.entities.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for entity in &tile.entities {
            writeln!(f, "  {entity}")?;
        }
        Ok(())
    }
}

pub fn format_tile(world: &World, x: i32, y: i32) -> Result<String, String> {
    TileReport::new(world, x, y)
        .map(|report| report.to_string())
        .map_err(|e| e.to_string())
}
