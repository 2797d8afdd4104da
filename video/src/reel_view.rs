//! Reel renderer: draws the seven-element pool through a [`ReelBackend`].
//!
//! Only the pool elements that intersect the three-item viewport are
//! painted, so the per-frame cost is constant no matter how many
//! participants the roster holds. After a landing the center item flashes a
//! few times and a result banner is drawn beneath the reel.

use alloc::format;
use alloc::string::String;

use raffle_abi::{Background, POOL_CENTER, POOL_SIZE, SpinPhase, VIEWPORT_ITEMS};
use raffle_core::{PoolSink, PoolView};
use raffle_lib::{klog_debug, klog_warn};

use crate::backend::{
    REEL_BANNER_COLOR, REEL_BG_COLOR, REEL_CENTER_COLOR, REEL_DIM_TEXT_COLOR, REEL_FRAME_COLOR,
    REEL_ITEM_COLOR, REEL_POINTER_COLOR, REEL_TEXT_COLOR, REEL_WIN_COLOR, ReelBackend, clip_text,
    text_width,
};
use crate::{VideoError, VideoResult};

pub const LANDING_FLASHES: u32 = 5;
/// Frames the highlight stays lit per flash.
pub const FLASH_ON_FRAMES: u32 = 15;
pub const FLASH_OFF_FRAMES: u32 = 9;
pub const MAX_ITEM_PX: i32 = 120;

const VIEWPORT: i32 = VIEWPORT_ITEMS as i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReelLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub item_px: i32,
    pub viewport_px: i32,
    pub banner_y: i32,
}

impl ReelLayout {
    /// Center a three-item viewport on a `width` x `height` surface.
    pub fn fit(width: i32, height: i32, glyph_height: i32) -> VideoResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(VideoError::NoSurface);
        }
        let item_px = ((height * 2 / 3) / VIEWPORT).clamp(glyph_height.clamp(1, MAX_ITEM_PX), MAX_ITEM_PX);
        let viewport_px = item_px * VIEWPORT;
        let x = width / 8;
        let y = ((height - viewport_px) / 2).max(0);
        let banner_y = (y + viewport_px + item_px / 2).min(height - 1);
        Ok(Self {
            x,
            y,
            width: (width - 2 * x).max(1),
            item_px,
            viewport_px,
            banner_y,
        })
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.viewport_px
    }
}

#[derive(Debug, Clone)]
struct Announcement {
    label: String,
    draw_number: u32,
    frames: u32,
}

impl Announcement {
    fn highlight_on(&self) -> bool {
        let period = FLASH_ON_FRAMES + FLASH_OFF_FRAMES;
        self.frames / period >= LANDING_FLASHES || self.frames % period < FLASH_ON_FRAMES
    }

    fn flashing(&self) -> bool {
        self.frames < LANDING_FLASHES * (FLASH_ON_FRAMES + FLASH_OFF_FRAMES)
    }
}

fn to_px(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

pub struct ReelView<B: ReelBackend> {
    backend: B,
    layout: Option<ReelLayout>,
    background: u32,
    announcement: Option<Announcement>,
    last_error: Option<VideoError>,
}

impl<B: ReelBackend> ReelView<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            layout: None,
            background: REEL_BG_COLOR,
            announcement: None,
            last_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn layout(&self) -> Option<ReelLayout> {
        self.layout
    }

    pub fn set_background(&mut self, background: &Background) {
        self.background = match background {
            Background::Color(rgba) => *rgba,
            Background::Image(path) => {
                klog_debug!("reel: image background {} not supported, using default", path);
                REEL_BG_COLOR
            }
            Background::Default => REEL_BG_COLOR,
        };
    }

    /// Recompute the layout from the backend's current size.
    pub fn relayout(&mut self) -> VideoResult<ReelLayout> {
        let (w, h) = self.backend.size()?;
        let layout = ReelLayout::fit(w, h, self.backend.glyph_height())?;
        self.layout = Some(layout);
        Ok(layout)
    }

    /// Start the landing flash and show the result banner.
    pub fn announce(&mut self, label: &str, draw_number: u32) {
        self.announcement = Some(Announcement {
            label: String::from(label),
            draw_number,
            frames: 0,
        });
    }

    pub fn dismiss(&mut self) {
        self.announcement = None;
    }

    /// Whether the landing flash still needs frames.
    pub fn is_flashing(&self) -> bool {
        self.announcement.as_ref().is_some_and(Announcement::flashing)
    }

    /// First draw error since the last call.
    pub fn take_error(&mut self) -> Option<VideoError> {
        self.last_error.take()
    }

    pub fn draw(&mut self, view: &PoolView<'_>) -> VideoResult {
        let layout = match self.layout {
            Some(layout) => layout,
            None => self.relayout()?,
        };
        let (w, h) = self.backend.size()?;
        self.backend.fill_rect(0, 0, w, h, self.background)?;

        let frame = view.frame;
        if frame.item_height <= 0.0 {
            return Err(VideoError::Invalid);
        }
        let scale = layout.item_px as f64 / frame.item_height;
        let offset = to_px(frame.translate_y * scale);
        let highlight = match (&self.announcement, view.phase) {
            (Some(a), SpinPhase::Stopped) => a.highlight_on(),
            _ => false,
        };

        for element in 0..POOL_SIZE {
            let top = layout.y + offset + element as i32 * layout.item_px;
            let bottom = top + layout.item_px;
            let clip_top = top.max(layout.y);
            let clip_bottom = bottom.min(layout.bottom());
            if clip_bottom <= clip_top {
                continue;
            }

            let is_center = element == POOL_CENTER;
            let fill = match (is_center, highlight) {
                (true, true) => REEL_WIN_COLOR,
                (true, false) => REEL_CENTER_COLOR,
                _ => REEL_ITEM_COLOR,
            };
            self.backend
                .fill_rect(layout.x, clip_top, layout.width, clip_bottom - clip_top, fill)?;

            let text_y = top + (layout.item_px - self.backend.glyph_height()) / 2;
            if text_y < layout.y || text_y + self.backend.glyph_height() > layout.bottom() {
                continue;
            }
            let label = clip_text(&self.backend, view.label(element), layout.width);
            let text_x = layout.x + (layout.width - text_width(&self.backend, label)) / 2;
            let fg = if is_center { REEL_TEXT_COLOR } else { REEL_DIM_TEXT_COLOR };
            self.backend.draw_text(text_x, text_y, label, fg, fill)?;
        }

        self.draw_frame(&layout)?;
        self.draw_banner(&layout)?;
        if let Some(a) = self.announcement.as_mut() {
            a.frames = a.frames.saturating_add(1);
        }
        self.backend.present()
    }

    fn draw_frame(&mut self, layout: &ReelLayout) -> VideoResult {
        let right = layout.x + layout.width;
        let center_top = layout.y + layout.item_px;
        let center_bottom = center_top + layout.item_px;
        self.backend
            .draw_line(layout.x, layout.y, right, layout.y, REEL_FRAME_COLOR)?;
        self.backend
            .draw_line(layout.x, layout.bottom(), right, layout.bottom(), REEL_FRAME_COLOR)?;
        self.backend
            .draw_line(layout.x, center_top, right, center_top, REEL_POINTER_COLOR)?;
        self.backend
            .draw_line(layout.x, center_bottom, right, center_bottom, REEL_POINTER_COLOR)
    }

    fn draw_banner(&mut self, layout: &ReelLayout) -> VideoResult {
        let Some(announcement) = self.announcement.as_ref() else {
            return Ok(());
        };
        let text = format!("Winner #{}: {}", announcement.draw_number, announcement.label);
        let height = self.backend.glyph_height() * 2;
        self.backend
            .fill_rect(layout.x, layout.banner_y, layout.width, height, REEL_BANNER_COLOR)?;
        let shown = clip_text(&self.backend, &text, layout.width);
        let x = layout.x + (layout.width - text_width(&self.backend, shown)) / 2;
        let y = layout.banner_y + self.backend.glyph_height() / 2;
        self.backend
            .draw_text(x, y, shown, REEL_TEXT_COLOR, REEL_BANNER_COLOR)
    }
}

impl<B: ReelBackend> PoolSink for ReelView<B> {
    fn present(&mut self, view: &PoolView<'_>) {
        if let Err(err) = self.draw(view) {
            if self.last_error.replace(err).is_none() {
                klog_warn!("reel: frame dropped: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use raffle_abi::Participant;
    use raffle_core::{MemoryStorage, RaffleEngine, SpinConfig};
    use raffle_lib::{FixedClock, Lfsr64};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Fill { y: i32, h: i32, color: u32 },
        Line,
        Text { y: i32, text: String },
        Present,
    }

    struct MockBackend {
        size: (i32, i32),
        ops: Vec<Op>,
    }

    impl MockBackend {
        fn new(w: i32, h: i32) -> Self {
            Self {
                size: (w, h),
                ops: Vec::new(),
            }
        }

        fn texts(&self) -> Vec<(i32, &str)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text { y, text } => Some((*y, text.as_str())),
                    _ => None,
                })
                .collect()
        }
    }

    impl ReelBackend for MockBackend {
        fn size(&self) -> VideoResult<(i32, i32)> {
            if self.size.0 <= 0 || self.size.1 <= 0 {
                return Err(VideoError::NoSurface);
            }
            Ok(self.size)
        }

        fn fill_rect(&mut self, _x: i32, y: i32, _w: i32, h: i32, color: u32) -> VideoResult {
            self.ops.push(Op::Fill { y, h, color });
            Ok(())
        }

        fn draw_line(&mut self, _x0: i32, _y0: i32, _x1: i32, _y1: i32, _c: u32) -> VideoResult {
            self.ops.push(Op::Line);
            Ok(())
        }

        fn draw_text(&mut self, _x: i32, y: i32, text: &str, _fg: u32, _bg: u32) -> VideoResult {
            self.ops.push(Op::Text {
                y,
                text: text.to_string(),
            });
            Ok(())
        }

        fn present(&mut self) -> VideoResult {
            self.ops.push(Op::Present);
            Ok(())
        }
    }

    type Engine = RaffleEngine<MemoryStorage, Lfsr64, FixedClock>;

    fn engine(names: &[&str]) -> Engine {
        let mut engine = Engine::new(
            MemoryStorage::new(),
            Lfsr64::with_seed(77),
            FixedClock::at(0),
            SpinConfig::default(),
        );
        engine.load(false);
        let roster = names
            .iter()
            .map(|n| Participant::new(n, "", 0).unwrap())
            .collect();
        engine.replace_all(roster).unwrap();
        engine
    }

    #[test]
    fn layout_rejects_empty_surface() {
        assert_eq!(ReelLayout::fit(0, 480, 16), Err(VideoError::NoSurface));
        let layout = ReelLayout::fit(640, 480, 16).unwrap();
        assert_eq!(layout.viewport_px, layout.item_px * 3);
        assert!(layout.bottom() <= 480);
    }

    #[test]
    fn resting_reel_draws_three_rows_with_center_label() {
        let engine = engine(&["Ron", "Dana", "Avi", "Noa"]);
        let mut view = ReelView::new(MockBackend::new(640, 480));
        engine.render(&mut view);
        assert_eq!(view.take_error(), None);

        let layout = view.layout().unwrap();
        let center_y = layout.y + layout.item_px + (layout.item_px - 16) / 2;
        let texts = view.backend().texts();
        assert_eq!(texts.len(), 3);

        let center = engine.current_frame().center_entry().unwrap();
        let expected = engine.store().participants()[center].name.as_str();
        assert!(texts.contains(&(center_y, expected)));
        assert_eq!(view.backend().ops.last(), Some(&Op::Present));
    }

    #[test]
    fn mid_item_offset_clips_partial_rows() {
        let mut engine = engine(&["Ron", "Dana", "Avi", "Noa"]);
        let mut view = ReelView::new(MockBackend::new(640, 480));
        engine.trigger().unwrap();
        engine.frame(&mut view);
        let layout = view.layout().unwrap();
        for op in &view.backend().ops {
            if let Op::Fill { y, h, color } = op {
                if *color == REEL_ITEM_COLOR || *color == REEL_CENTER_COLOR {
                    assert!(*y >= layout.y);
                    assert!(y + h <= layout.bottom());
                }
            }
        }
    }

    #[test]
    fn landing_flash_toggles_then_holds() {
        let mut engine = engine(&["Ron"]);
        let mut view = ReelView::new(MockBackend::new(640, 480));
        engine.trigger().unwrap();
        engine.trigger().unwrap();
        while engine.frame(&mut view) {}
        view.announce("Ron", 1);
        assert!(view.is_flashing());

        let mut lit = Vec::new();
        while view.is_flashing() {
            view.backend_mut().ops.clear();
            engine.render(&mut view);
            let on = view
                .backend()
                .ops
                .iter()
                .any(|op| matches!(op, Op::Fill { color, .. } if *color == REEL_WIN_COLOR));
            lit.push(on);
        }
        assert_eq!(lit.len() as u32, LANDING_FLASHES * (FLASH_ON_FRAMES + FLASH_OFF_FRAMES));
        assert!(lit[0]);
        assert!(!lit[FLASH_ON_FRAMES as usize]);

        view.backend_mut().ops.clear();
        engine.render(&mut view);
        let texts = view.backend().texts();
        assert!(texts.iter().any(|(_, t)| *t == "Winner #1: Ron"));
    }

    #[test]
    fn draw_errors_are_kept_not_raised() {
        let engine = engine(&["Ron"]);
        let mut view = ReelView::new(MockBackend::new(0, 0));
        engine.render(&mut view);
        assert_eq!(view.take_error(), Some(VideoError::NoSurface));
        assert_eq!(view.take_error(), None);
    }

    #[test]
    fn long_labels_are_clipped_to_reel_width() {
        let backend = MockBackend::new(80, 60);
        assert_eq!(clip_text(&backend, "abcdefghij", 40), "abcde");
        assert_eq!(clip_text(&backend, "דני", 40), "דני");
    }
}
