use std::io;

use crossterm::{cursor, execute};
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::{Framebuffer, SCREEN_BUFFER_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Display is used by the interpreter to put the framebuffer on a screen.
/// It should abstract the implementation details, so a variety of kinds of
/// screen would work. Only called when the framebuffer has changed.
pub trait Display {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error>;
}

// store useful metadata about the terminal canvas
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates for each lit pixel; y grows downward on the
    /// screen but upward on the canvas
    fn points_from_frame(&self, frame: &Framebuffer) -> Vec<(f64, f64)> {
        frame
            .lit_pixels()
            .map(|(x, y)| (x as f64, -1.0 * y as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(SCREEN_WIDTH, SCREEN_HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        let coords = self.resolution.points_from_frame(frame);
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();
        let size = Rect::new(
            0,
            0,
            2 + self.resolution.0 as u16,
            2 + self.resolution.1 as u16,
        );

        // for now this assumes a 1:1 ratio between terminal cells and
        // chip-8 pixels
        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &coords,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show) {
            log::warn!("couldn't restore the cursor: {}", e);
        }
    }
}

/// useful for testing non-display routines; keeps what it was given
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub last_frame: Option<[u8; SCREEN_BUFFER_SIZE]>,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay {
            frames_drawn: 0,
            last_frame: None,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, frame: &Framebuffer) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        self.last_frame = Some(*frame.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.x_bounds(), [0.0, 63.0]);
    }

    #[test]
    fn test_y_bounds() {
        let r = Resolution(64, 32);
        assert_eq!(r.y_bounds(), [-31.0, 0.0]);
    }

    #[test]
    fn test_points_from_blank_frame() {
        let r = Resolution(64, 32);
        assert!(r.points_from_frame(&Framebuffer::new()).is_empty());
    }

    #[test]
    fn test_points_flip_y() {
        let r = Resolution(64, 32);
        let mut fb = Framebuffer::new();
        fb.blit_sprite(3, 4, &[0x80]);
        assert_eq!(r.points_from_frame(&fb), vec![(3.0, -4.0)]);
    }

    #[test]
    fn test_dummy_records_frames() -> Result<(), io::Error> {
        let mut d = DummyDisplay::new();
        let mut fb = Framebuffer::new();
        fb.blit_sprite(0, 0, &[0xff]);
        d.draw(&fb)?;
        assert_eq!(d.frames_drawn, 1);
        assert_eq!(d.last_frame.map(|b| b[0]), Some(0xff));
        Ok(())
    }
}
