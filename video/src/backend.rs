//! Drawing surface the reel renders onto.

use crate::VideoResult;

// Colors are 0xRRGGBBAA.
pub const REEL_BG_COLOR: u32 = 0x0000_0000;
pub const REEL_FRAME_COLOR: u32 = 0xC7C7_C7FF;
pub const REEL_TEXT_COLOR: u32 = 0xE6E6_E6FF;
pub const REEL_DIM_TEXT_COLOR: u32 = 0x7A7A_7AFF;
pub const REEL_ITEM_COLOR: u32 = 0x1E1E_1EFF;
pub const REEL_CENTER_COLOR: u32 = 0x3333_33FF;
pub const REEL_WIN_COLOR: u32 = 0x2DD4_B3FF;
pub const REEL_POINTER_COLOR: u32 = 0xE35D_5BFF;
pub const REEL_BANNER_COLOR: u32 = 0x144E_44FF;

/// Minimal raster surface. Coordinates are in backend units (pixels for a
/// framebuffer, cells for a terminal).
pub trait ReelBackend {
    fn size(&self) -> VideoResult<(i32, i32)>;

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) -> VideoResult;

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) -> VideoResult;

    fn draw_text(&mut self, x: i32, y: i32, text: &str, fg: u32, bg: u32) -> VideoResult;

    /// Flush the finished frame.
    fn present(&mut self) -> VideoResult {
        Ok(())
    }

    /// Advance of one glyph, in backend units.
    fn glyph_width(&self) -> i32 {
        8
    }

    fn glyph_height(&self) -> i32 {
        16
    }
}

/// Width of `text` when drawn on `backend`.
pub fn text_width<B: ReelBackend + ?Sized>(backend: &B, text: &str) -> i32 {
    text.chars().count() as i32 * backend.glyph_width()
}

/// Longest prefix of `text` that fits in `max_width` backend units.
pub fn clip_text<'a, B: ReelBackend + ?Sized>(backend: &B, text: &'a str, max_width: i32) -> &'a str {
    let glyph = backend.glyph_width().max(1);
    let max_chars = (max_width / glyph).max(0) as usize;
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}
