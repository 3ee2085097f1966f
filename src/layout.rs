//! Board sizing from the available screen space

use crate::game::MIN_BOARD_SIZE;

/// Approximate pixel size of one terminal character
pub const CHAR_WIDTH_PX: f64 = 8.0;
pub const CHAR_HEIGHT_PX: f64 = 16.0;

/// Root font size assumed for the narrow-screen margin
const REM_PX: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSize {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f64,
}

/// Pick board dimensions for a `width` x `height` pixel viewport.
///
/// Wide screens give the board half the width with large cells, medium
/// screens most of the width, and narrow screens everything but a margin.
/// Never returns fewer than [`MIN_BOARD_SIZE`] rows or columns.
pub fn compute_board_size(width: f64, height: f64) -> BoardSize {
    let (usable_width, cell_size, usable_height) = if width > 992.0 {
        ((width * 0.5).floor(), 40.0, height - 100.0)
    } else if width > 768.0 {
        ((width * 0.85).floor(), 32.0, height - 80.0)
    } else {
        (width - REM_PX - 4.0, 28.0, height - 60.0)
    };

    let fit = |length: f64| ((length / cell_size).floor().max(0.0) as usize).max(MIN_BOARD_SIZE);

    BoardSize {
        rows: fit(usable_height),
        cols: fit(usable_width),
        cell_size,
    }
}

/// Pixel size of a terminal `cols` x `rows` characters large
pub fn terminal_pixels(cols: u16, rows: u16) -> (f64, f64) {
    (
        f64::from(cols) * CHAR_WIDTH_PX,
        f64::from(rows) * CHAR_HEIGHT_PX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_screen() {
        let size = compute_board_size(1920.0, 1080.0);
        assert_eq!(size.cell_size, 40.0);
        assert_eq!(size.cols, 24);
        assert_eq!(size.rows, 24);
    }

    #[test]
    fn test_medium_screen() {
        let size = compute_board_size(800.0, 600.0);
        assert_eq!(size.cell_size, 32.0);
        assert_eq!(size.cols, 21);
        assert_eq!(size.rows, 16);
    }

    #[test]
    fn test_narrow_screen() {
        let size = compute_board_size(400.0, 800.0);
        assert_eq!(size.cell_size, 28.0);
        assert_eq!(size.cols, 13);
        assert_eq!(size.rows, 26);
    }

    #[test]
    fn test_tiny_screen_is_clamped_to_minimum() {
        let size = compute_board_size(50.0, 20.0);
        assert_eq!(size.cols, MIN_BOARD_SIZE);
        assert_eq!(size.rows, MIN_BOARD_SIZE);
    }

    #[test]
    fn test_terminal_pixels() {
        assert_eq!(terminal_pixels(80, 24), (640.0, 384.0));
    }
}
