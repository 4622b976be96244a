use image::{GrayImage, Luma};
use nanorand::{Rng, WyRand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

/// Occupied pixels of the canvas and their summed-area table.
///
/// The table is padded by one row and one column of zeros, so entry
/// `(x, y)` holds the number of occupied pixels in `[0, x) x [0, y)`.
pub struct OccupancyMap {
    grid: GrayImage,
    table: Vec<u32>,
}

impl OccupancyMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_grid(GrayImage::from_pixel(width, height, Luma([0])))
    }

    /// Any non-zero pixel of `grid` is treated as occupied.
    pub fn from_grid(grid: GrayImage) -> Self {
        let size = (grid.width() as usize + 1) * (grid.height() as usize + 1);
        let mut table = vec![0; size];
        to_summed_area_table(&grid, &mut table, 0);

        OccupancyMap { grid, table }
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn is_occupied(&self, x: u32, y: u32) -> bool {
        self.grid.get_pixel(x, y).0[0] > 0
    }

    pub fn region_is_empty(&self, x: u32, y: u32, rect: &Rect) -> bool {
        region_is_empty(
            &self.table,
            self.width() as usize + 1,
            x as usize,
            y as usize,
            rect.width as usize,
            rect.height as usize,
        )
    }

    pub fn find_space_for_rect(&self, rect: &Rect, rng: &mut WyRand) -> Option<Point> {
        find_space_for_rect(
            &self.table,
            self.width(),
            self.height(),
            rect,
            rng,
        )
    }

    /// Marks the inked pixels of `bitmap`, placed with its top-left corner at
    /// `origin`, as occupied. Pixels falling off the canvas are dropped.
    pub fn occupy(&mut self, bitmap: &GrayImage, origin: Point) {
        let mut first_row = None;

        for (x, y, px) in bitmap.enumerate_pixels() {
            if px.0[0] == 0 {
                continue;
            }
            let (gx, gy) = (origin.x + x, origin.y + y);
            if gx >= self.width() || gy >= self.height() {
                continue;
            }
            self.grid.put_pixel(gx, gy, Luma([1]));
            first_row = Some(first_row.map_or(gy, |row: u32| row.min(gy)));
        }

        if let Some(row) = first_row {
            to_summed_area_table(&self.grid, &mut self.table, row as usize);
        }
    }
}

pub fn region_is_empty(
    table: &[u32],
    table_width: usize,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> bool {
    let tl = table[y * table_width + x];
    let tr = table[y * table_width + x + width];

    let bl = table[(y + height) * table_width + x];
    let br = table[(y + height) * table_width + x + width];

    tl as i64 + br as i64 - tr as i64 - bl as i64 == 0
}

/// 在图片寻找位置写字
///
/// Picks uniformly among every position where `rect` fits without touching an
/// occupied pixel. `table` must be padded, see [`OccupancyMap`].
pub fn find_space_for_rect(
    table: &[u32],
    table_width: u32,
    table_height: u32,
    rect: &Rect,
    rng: &mut WyRand,
) -> Option<Point> {
    let max_x = table_width.checked_sub(rect.width)?;
    let max_y = table_height.checked_sub(rect.height)?;
    let stride = table_width as usize + 1;

    let is_free = |x: u32, y: u32| {
        region_is_empty(
            table,
            stride,
            x as usize,
            y as usize,
            rect.width as usize,
            rect.height as usize,
        )
    };

    let mut available_points: u64 = 0;
    for y in 0..=max_y {
        for x in 0..=max_x {
            if is_free(x, y) {
                available_points += 1;
            }
        }
    }

    if available_points == 0 {
        return None;
    }

    let mut target = rng.generate_range(0..available_points);
    for y in 0..=max_y {
        for x in 0..=max_x {
            if is_free(x, y) {
                if target == 0 {
                    return Some(Point { x, y });
                }
                target -= 1;
            }
        }
    }

    None
}

/// https://blog.demofox.org/2018/04/16/prefix-sums-and-summed-area-tables/
///
/// Rebuilds the padded table from grid row `start_row` downwards; rows above
/// it must already be up to date.
pub fn to_summed_area_table(grid: &GrayImage, table: &mut [u32], start_row: usize) {
    let stride = grid.width() as usize + 1;

    for (y, row) in grid.rows().enumerate().skip(start_row) {
        let mut sum = 0;
        for (x, px) in row.enumerate() {
            sum += u32::from(px.0[0] > 0);
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + sum;
        }
    }
}
