use crate::codec::CodecError;

/// Width of every plot in tiles.
pub const PLOT_WIDTH: u32 = 21;

/// Where a world coordinate lands inside the plot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotAddress {
    pub plot: usize,
    pub local_x: u32,
    pub local_y: u32,
}

/// Plot-grid arithmetic for one world size.
///
/// Plots tile the world without overlap, numbered row-major: plot 0 is the
/// top-left window, the index grows along x first, then y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotLayout {
    width: u32,
    height: u32,
    plot_width: u32,
    plot_height: u32,
}

impl PlotLayout {
    /// Layout with the standard plot width.
    pub fn new(width: u32, height: u32, plot_height: u32) -> Result<Self, CodecError> {
        Self::with_plot_size(width, height, PLOT_WIDTH, plot_height)
    }

    pub fn with_plot_size(
        width: u32,
        height: u32,
        plot_width: u32,
        plot_height: u32,
    ) -> Result<Self, CodecError> {
        if width == 0 || height == 0 || plot_width == 0 || plot_height == 0 {
            return Err(CodecError::Consistency(format!(
                "world {width}x{height} with plots {plot_width}x{plot_height} has a zero dimension"
            )));
        }
        if width % plot_width != 0 || height % plot_height != 0 {
            return Err(CodecError::Consistency(format!(
                "world {width}x{height} is not divisible into {plot_width}x{plot_height} plots"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(CodecError::Consistency(format!(
                "world {width}x{height} exceeds the addressable coordinate range"
            )));
        }
        Ok(Self {
            width,
            height,
            plot_width,
            plot_height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn plot_width(&self) -> u32 {
        self.plot_width
    }

    pub fn plot_height(&self) -> u32 {
        self.plot_height
    }

    pub fn plots_per_row(&self) -> u32 {
        self.width / self.plot_width
    }

    pub fn plots_per_column(&self) -> u32 {
        self.height / self.plot_height
    }

    pub fn plot_count(&self) -> usize {
        self.plots_per_row() as usize * self.plots_per_column() as usize
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn plot_tile_count(&self) -> usize {
        self.plot_width as usize * self.plot_height as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.checked(x, y).is_some()
    }

    fn checked(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = u32::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> CodecError {
        CodecError::OutOfBounds(format!(
            "({x}, {y}) lies outside the {}x{} world",
            self.width, self.height
        ))
    }

    pub fn world_to_plot(&self, x: i32, y: i32) -> Result<PlotAddress, CodecError> {
        let (ux, uy) = self.checked(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        let column = ux / self.plot_width;
        let row = uy / self.plot_height;
        Ok(PlotAddress {
            plot: (column + row * self.plots_per_row()) as usize,
            local_x: ux % self.plot_width,
            local_y: uy % self.plot_height,
        })
    }

    /// World coordinate of the top-left tile of `plot`.
    pub fn plot_origin(&self, plot: usize) -> Result<(i32, i32), CodecError> {
        if plot >= self.plot_count() {
            return Err(CodecError::OutOfBounds(format!(
                "plot {plot} does not exist; the world has {} plots",
                self.plot_count()
            )));
        }
        let per_row = self.plots_per_row() as usize;
        let x = (plot % per_row) as u32 * self.plot_width;
        let y = (plot / per_row) as u32 * self.plot_height;
        // Both are below width/height, which fit in i32.
        Ok((x as i32, y as i32))
    }

    /// Row-major index of a coordinate in the whole-world tile sequence.
    pub fn world_index(&self, x: i32, y: i32) -> Result<usize, CodecError> {
        let (ux, uy) = self.checked(x, y).ok_or_else(|| self.out_of_bounds(x, y))?;
        Ok(uy as usize * self.width as usize + ux as usize)
    }

    /// Inverse of [`world_index`](Self::world_index) for in-range indices.
    pub fn coordinate_of(&self, index: usize) -> Option<(i32, i32)> {
        if index >= self.tile_count() {
            return None;
        }
        let width = self.width as usize;
        Some(((index % width) as i32, (index / width) as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_42x20() -> PlotLayout {
        PlotLayout::new(42, 20, 10).unwrap()
    }

    #[test]
    fn four_plots_for_42_by_20() {
        let layout = layout_42x20();
        assert_eq!(layout.plot_count(), 4);
        assert_eq!(layout.plots_per_row(), 2);
        assert_eq!(layout.plots_per_column(), 2);
        assert_eq!(layout.plot_tile_count(), 210);
    }

    #[test]
    fn plot_extents_for_42_by_20() {
        let layout = layout_42x20();
        assert_eq!(layout.plot_origin(0).unwrap(), (0, 0));
        assert_eq!(layout.plot_origin(3).unwrap(), (21, 10));

        for x in 0..21 {
            for y in 0..10 {
                assert_eq!(layout.world_to_plot(x, y).unwrap().plot, 0);
            }
        }
        for x in 21..42 {
            for y in 10..20 {
                assert_eq!(layout.world_to_plot(x, y).unwrap().plot, 3);
            }
        }
    }

    #[test]
    fn local_offsets_wrap_at_plot_edges() {
        let layout = layout_42x20();
        let addr = layout.world_to_plot(22, 11).unwrap();
        assert_eq!(
            addr,
            PlotAddress {
                plot: 3,
                local_x: 1,
                local_y: 1
            }
        );
        let addr = layout.world_to_plot(20, 9).unwrap();
        assert_eq!((addr.plot, addr.local_x, addr.local_y), (0, 20, 9));
    }

    #[test]
    fn every_coordinate_round_trips() {
        let layout = layout_42x20();
        for y in 0..20 {
            for x in 0..42 {
                let addr = layout.world_to_plot(x, y).unwrap();
                let (ox, oy) = layout.plot_origin(addr.plot).unwrap();
                assert_eq!((ox + addr.local_x as i32, oy + addr.local_y as i32), (x, y));
            }
        }
    }

    #[test]
    fn out_of_range_coordinates_rejected() {
        let layout = layout_42x20();
        for (x, y) in [(-1, 0), (0, -1), (42, 0), (0, 20), (i32::MAX, i32::MIN)] {
            assert!(matches!(
                layout.world_to_plot(x, y),
                Err(CodecError::OutOfBounds(_))
            ));
            assert!(!layout.contains(x, y));
        }
        assert!(layout.plot_origin(4).is_err());
    }

    #[test]
    fn indivisible_world_rejected() {
        assert!(matches!(
            PlotLayout::new(40, 20, 10),
            Err(CodecError::Consistency(_))
        ));
        assert!(matches!(
            PlotLayout::new(42, 25, 10),
            Err(CodecError::Consistency(_))
        ));
        assert!(PlotLayout::new(0, 0, 10).is_err());
        assert!(PlotLayout::new(21, 10, 0).is_err());
    }

    #[test]
    fn world_index_is_row_major() {
        let layout = layout_42x20();
        assert_eq!(layout.world_index(0, 0).unwrap(), 0);
        assert_eq!(layout.world_index(41, 0).unwrap(), 41);
        assert_eq!(layout.world_index(0, 1).unwrap(), 42);
        assert_eq!(layout.coordinate_of(43), Some((1, 1)));
        assert_eq!(layout.coordinate_of(840), None);
    }
}
