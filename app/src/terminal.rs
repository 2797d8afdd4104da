//! ANSI terminal surface: one backend unit is one character cell.

use std::fmt::Write as _;
use std::io::{self, Write};

use raffle_video::{ReelBackend, VideoError, VideoResult};

const DEFAULT_COLS: i32 = 80;
const DEFAULT_ROWS: i32 = 24;

fn rgb(color: u32) -> (u8, u8, u8) {
    ((color >> 24) as u8, (color >> 16) as u8, (color >> 8) as u8)
}

/// Size from `COLUMNS`/`LINES`, falling back to 80x24.
pub fn terminal_size() -> (i32, i32) {
    let read = |name: &str, default: i32| {
        std::env::var(name)
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(default)
    };
    (read("COLUMNS", DEFAULT_COLS), read("LINES", DEFAULT_ROWS))
}

pub struct TerminalBackend<W: Write> {
    out: W,
    cols: i32,
    rows: i32,
    frame: String,
    status: String,
    bell: bool,
}

impl<W: Write> TerminalBackend<W> {
    pub fn new(out: W, cols: i32, rows: i32) -> Self {
        Self {
            out,
            cols,
            rows,
            frame: String::new(),
            status: String::new(),
            bell: false,
        }
    }

    /// Footer line shown under the reel.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Ring the terminal bell with the next frame.
    pub fn ring_bell(&mut self) {
        self.bell = true;
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn move_to(&mut self, x: i32, y: i32) {
        let _ = write!(self.frame, "\x1b[{};{}H", y + 1, x + 1);
    }

    fn set_colors(&mut self, fg: u32, bg: u32) {
        let (fr, fg_, fb) = rgb(fg);
        let (br, bg_, bb) = rgb(bg);
        let _ = write!(
            self.frame,
            "\x1b[38;2;{fr};{fg_};{fb}m\x1b[48;2;{br};{bg_};{bb}m"
        );
    }

    /// Clamp a horizontal span to the surface; `None` if nothing is left.
    fn clip_span(&self, x: i32, y: i32, w: i32) -> Option<(i32, i32)> {
        if y < 0 || y >= self.rows {
            return None;
        }
        let start = x.max(0);
        let end = (x + w).min(self.cols);
        (end > start).then_some((start, end - start))
    }
}

impl<W: Write> ReelBackend for TerminalBackend<W> {
    fn size(&self) -> VideoResult<(i32, i32)> {
        if self.cols <= 0 || self.rows <= 0 {
            return Err(VideoError::NoSurface);
        }
        // Last row is the status line.
        Ok((self.cols, self.rows - 1))
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) -> VideoResult {
        if w < 0 || h < 0 {
            return Err(VideoError::Invalid);
        }
        for row in y..y + h {
            let Some((start, len)) = self.clip_span(x, row, w) else {
                continue;
            };
            self.move_to(start, row);
            self.set_colors(color, color);
            self.frame.extend(std::iter::repeat_n(' ', len as usize));
        }
        Ok(())
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) -> VideoResult {
        if y0 != y1 {
            return Err(VideoError::Invalid);
        }
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let Some((start, len)) = self.clip_span(left, y0, right - left) else {
            return Ok(());
        };
        self.move_to(start, y0);
        let _ = write!(self.frame, "\x1b[49m");
        let (r, g, b) = rgb(color);
        let _ = write!(self.frame, "\x1b[38;2;{r};{g};{b}m");
        self.frame.extend(std::iter::repeat_n('─', len as usize));
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str, fg: u32, bg: u32) -> VideoResult {
        let width = text.chars().count() as i32;
        let Some((start, len)) = self.clip_span(x, y, width) else {
            return Ok(());
        };
        let skip = (start - x) as usize;
        self.move_to(start, y);
        self.set_colors(fg, bg);
        self.frame.extend(text.chars().skip(skip).take(len as usize));
        Ok(())
    }

    fn present(&mut self) -> VideoResult {
        let status_row = self.rows - 1;
        self.move_to(0, status_row);
        self.frame.push_str("\x1b[0m\x1b[2K");
        let status: String = self.status.chars().take(self.cols.max(0) as usize).collect();
        self.frame.push_str(&status);
        if self.bell {
            self.frame.push('\x07');
            self.bell = false;
        }

        let result = self
            .out
            .write_all(self.frame.as_bytes())
            .and_then(|()| self.out.flush());
        self.frame.clear();
        result.map_err(|_: io::Error| VideoError::Invalid)
    }

    fn glyph_width(&self) -> i32 {
        1
    }

    fn glyph_height(&self) -> i32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(backend: &TerminalBackend<Vec<u8>>) -> String {
        String::from_utf8(backend.writer().clone()).unwrap()
    }

    #[test]
    fn status_row_is_reserved() {
        let backend = TerminalBackend::new(Vec::new(), 40, 12);
        assert_eq!(backend.size(), Ok((40, 11)));
        let empty = TerminalBackend::new(Vec::new(), 0, 12);
        assert_eq!(empty.size(), Err(VideoError::NoSurface));
    }

    #[test]
    fn text_is_clipped_at_the_right_edge() {
        let mut backend = TerminalBackend::new(Vec::new(), 10, 5);
        backend.draw_text(7, 1, "Avraham", 0xFFFF_FFFF, 0).unwrap();
        backend.present().unwrap();
        let out = output(&backend);
        assert!(out.contains("\x1b[2;8H"));
        assert!(out.contains("Avr"));
        assert!(!out.contains("Avra"));
    }

    #[test]
    fn text_left_of_the_surface_keeps_its_tail() {
        let mut backend = TerminalBackend::new(Vec::new(), 10, 5);
        backend.draw_text(-2, 0, "abcdef", 0xFFFF_FFFF, 0).unwrap();
        backend.present().unwrap();
        let out = output(&backend);
        assert!(out.contains("\x1b[1;1H"));
        assert!(out.contains("cdef"));
    }

    #[test]
    fn fill_uses_truecolor_background() {
        let mut backend = TerminalBackend::new(Vec::new(), 10, 5);
        backend.fill_rect(0, 0, 3, 2, 0x2DD4_B3FF).unwrap();
        backend.present().unwrap();
        let out = output(&backend);
        assert!(out.contains("\x1b[48;2;45;212;179m   "));
        assert_eq!(out.matches("   ").count(), 2);
    }

    #[test]
    fn bell_rings_once_with_status() {
        let mut backend = TerminalBackend::new(Vec::new(), 20, 5);
        backend.set_status("Ready");
        backend.ring_bell();
        backend.present().unwrap();
        backend.present().unwrap();
        let out = output(&backend);
        assert_eq!(out.matches('\x07').count(), 1);
        assert_eq!(out.matches("Ready").count(), 2);
    }

    #[test]
    fn vertical_lines_are_rejected() {
        let mut backend = TerminalBackend::new(Vec::new(), 20, 5);
        assert_eq!(backend.draw_line(0, 0, 0, 3, 0), Err(VideoError::Invalid));
    }
}
