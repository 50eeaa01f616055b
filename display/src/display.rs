use std::io::{self, Write};

use chip8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use chip8_core::state::FrameBuffer;

/// # Display
/// The Chip-8 display is composed of 64x32 pixels black/white pixels.
/// The on/off state of these pixels is encoded as 1/0 respectively in a 2d array of 64x32 bits.
/// This renders them as text, one character per pixel and one line per row.
pub struct Display {
    on: char,
    off: char,
}

impl Display {
    /// Creates a new display.
    ///
    /// # Arguments
    /// * `on` the character drawn for a lit pixel
    /// * `off` the character drawn for a dark pixel
    pub fn new(on: char, off: char) -> Self {
        Display { on, off }
    }

    /// Formats a Chip-8 FrameBuffer as text.
    ///
    /// Every row becomes a line terminated by `\n`.
    ///
    /// # Arguments
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render(&self, frame: &FrameBuffer) -> String {
        let width = self.on.len_utf8().max(self.off.len_utf8());
        let mut text = String::with_capacity((DISPLAY_WIDTH * width + 1) * DISPLAY_HEIGHT);
        for row in frame.iter() {
            text.extend(
                row.iter()
                    .map(|&pixel| if pixel == 0 { self.off } else { self.on }),
            );
            text.push('\n');
        }
        text
    }

    /// Formats the Chip-8 FrameBuffer as text and writes it out.
    ///
    /// # Arguments
    /// * `writer` where the frame should go, e.g. stdout
    /// * `frame` a Chip-8 FrameBuffer
    pub fn render_to(&self, writer: &mut dyn Write, frame: &FrameBuffer) -> io::Result<()> {
        writer.write_all(self.render(frame).as_bytes())?;
        writer.flush()
    }
}

impl Default for Display {
    fn default() -> Self {
        Display::new('█', ' ')
    }
}
