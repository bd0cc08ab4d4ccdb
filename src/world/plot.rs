use super::tile::{Tile, TileType};
use super::topology::PlotLayout;
use crate::codec::CodecError;

/// A fixed-size window of the tile grid. Tiles are stored row-major in local
/// coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub visible: bool,
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Plot {
    /// Cut plot `index` out of the whole-world row-major tile sequence.
    pub(crate) fn from_world(
        layout: &PlotLayout,
        index: usize,
        world: &[TileType],
        visible: bool,
    ) -> Result<Self, CodecError> {
        if world.len() != layout.tile_count() {
            return Err(CodecError::Consistency(format!(
                "tile sequence has {} entries, the world needs {}",
                world.len(),
                layout.tile_count()
            )));
        }
        let (ox, oy) = layout.plot_origin(index)?;
        let mut tiles = Vec::with_capacity(layout.plot_tile_count());
        for ly in 0..layout.plot_height() as i32 {
            for lx in 0..layout.plot_width() as i32 {
                let i = layout.world_index(ox + lx, oy + ly)?;
                tiles.push(Tile::new(world[i]));
            }
        }
        Ok(Self {
            visible,
            width: layout.plot_width(),
            height: layout.plot_height(),
            tiles,
        })
    }

    /// A plot where every tile has the same terrain.
    pub(crate) fn filled(width: u32, height: u32, tile_type: TileType, visible: bool) -> Self {
        Self {
            visible,
            width,
            height,
            tiles: vec![Tile::new(tile_type); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    fn offset(&self, local_x: u32, local_y: u32) -> Option<usize> {
        (local_x < self.width && local_y < self.height)
            .then(|| local_y as usize * self.width as usize + local_x as usize)
    }

    pub fn get(&self, local_x: u32, local_y: u32) -> Option<&Tile> {
        self.offset(local_x, local_y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, local_x: u32, local_y: u32) -> Option<&mut Tile> {
        self.offset(local_x, local_y).map(|i| &mut self.tiles[i])
    }

    pub fn entity_count(&self) -> usize {
        self.tiles.iter().map(|t| t.entities.len()).sum()
    }
}
