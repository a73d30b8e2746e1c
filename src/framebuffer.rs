pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_BUFFER_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT / 8;

const BYTES_PER_ROW: usize = SCREEN_WIDTH / 8;

/// Monochrome 64x32 display memory, 8 pixels per byte, row-major, most
/// significant bit leftmost. Only ever mutated by clearing or XOR-blitting.
#[derive(Clone)]
pub struct Framebuffer {
    buffer: [u8; SCREEN_BUFFER_SIZE],
    dirty: bool,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            buffer: [0; SCREEN_BUFFER_SIZE],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.buffer = [0; SCREEN_BUFFER_SIZE];
        self.dirty = true;
    }

    pub fn as_bytes(&self) -> &[u8; SCREEN_BUFFER_SIZE] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let x = x % SCREEN_WIDTH;
        let y = y % SCREEN_HEIGHT;
        self.buffer[y * BYTES_PER_ROW + x / 8] & (0x80 >> (x % 8)) != 0
    }

    /// coordinates of every pixel that is on
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..SCREEN_HEIGHT)
            .flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| self.pixel(x, y))
    }

    /// Checks and clears the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// XOR each row of `sprite` onto the screen at (x, y). Both axes wrap
    /// around the edges. Returns true if any lit pixel was switched off.
    pub fn blit_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let x = x % SCREEN_WIDTH;
        let mut collision = false;
        for (i, &row) in sprite.iter().enumerate() {
            collision |= self.blit_byte(x, (y + i) % SCREEN_HEIGHT, row);
        }
        if !sprite.is_empty() {
            self.dirty = true;
        }
        collision
    }

    /// returns a collision flag
    fn blit_byte(&mut self, x: usize, y: usize, data: u8) -> bool {
        let row = y * BYTES_PER_ROW;
        let column = x / 8;
        let offset = x % 8;
        if offset == 0 {
            self.xor_byte(row + column, data)
        } else {
            // the sprite straddles two bytes; the right one wraps to the
            // start of the same row
            let next = (column + 1) % BYTES_PER_ROW;
            let left = self.xor_byte(row + column, data >> offset);
            let right = self.xor_byte(row + next, data << (8 - offset));
            left | right
        }
    }

    fn xor_byte(&mut self, i: usize, data: u8) -> bool {
        let collision = self.buffer[i] & data != 0;
        self.buffer[i] ^= data;
        collision
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blit_byte_aligned() {
        let mut fb = Framebuffer::new();
        let flag = fb.blit_byte(8, 0, 0b10101011);
        assert!(!flag);
        assert_eq!(fb.buffer[0], 0x0);
        assert_eq!(fb.buffer[1], 0b10101011);
        assert_eq!(fb.buffer[2], 0x0);
    }

    #[test]
    fn test_blit_byte_with_y() {
        let mut fb = Framebuffer::new();
        fb.blit_byte(8, 2, 0b10101011);
        let target = (8 + 2 * 64) / 8;
        assert_eq!(fb.buffer[target - 1], 0x0);
        assert_eq!(fb.buffer[target], 0b10101011);
        assert_eq!(fb.buffer[target + 1], 0x0);
    }

    #[test]
    fn test_blit_byte_unaligned() {
        let mut fb = Framebuffer::new();
        let flag = fb.blit_byte(2, 0, 0b10101011);
        assert!(!flag);
        assert_eq!(fb.buffer[0], 0b00101010);
        assert_eq!(fb.buffer[1], 0b11000000);
        assert_eq!(fb.buffer[2], 0x0);
    }

    #[test]
    fn test_blit_byte_unaligned_collision() {
        let mut fb = Framebuffer::new();
        fb.buffer[1] = 0b10111111;
        let flag = fb.blit_byte(2, 0, 0b10101011);
        assert!(flag);
        assert_eq!(fb.buffer[0], 0b00101010);
        assert_eq!(fb.buffer[1], 0b01111111);
    }

    #[test]
    fn test_no_collision_when_only_setting() {
        let mut fb = Framebuffer::new();
        fb.buffer[1] = 0b00001111;
        assert!(!fb.blit_byte(8, 0, 0b11110000));
        assert_eq!(fb.buffer[1], 0xff);
    }

    #[test]
    fn test_blit_wraps_horizontally_within_row() {
        let mut fb = Framebuffer::new();
        fb.blit_byte(60, 3, 0xff);
        let row = 3 * BYTES_PER_ROW;
        assert_eq!(fb.buffer[row + 7], 0b00001111);
        assert_eq!(fb.buffer[row], 0b11110000);
        // nothing leaked onto the next row
        assert_eq!(fb.buffer[row + BYTES_PER_ROW], 0);
        assert!(fb.pixel(63, 3));
        assert!(fb.pixel(0, 3));
        assert!(!fb.pixel(4, 3));
    }

    #[test]
    fn test_blit_sprite_wraps_vertically() {
        let mut fb = Framebuffer::new();
        fb.blit_sprite(0, 31, &[0x80, 0x80]);
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(0, 0));
        assert_eq!(fb.lit_pixels().count(), 2);
    }

    #[test]
    fn test_blit_sprite_origin_wraps() {
        let mut fb = Framebuffer::new();
        fb.blit_sprite(64 + 1, 32 + 2, &[0x80]);
        assert!(fb.pixel(1, 2));
    }

    #[test]
    fn test_double_blit_restores_and_collides() {
        let mut fb = Framebuffer::new();
        fb.blit_sprite(5, 5, &[0b11000000]);
        let before = *fb.as_bytes();
        let sprite = [0x3c, 0x42, 0x81];
        assert!(!fb.blit_sprite(13, 7, &sprite));
        assert!(fb.blit_sprite(13, 7, &sprite));
        assert_eq!(fb.as_bytes(), &before);
    }

    #[test]
    fn test_dirty_flag() {
        let mut fb = Framebuffer::new();
        assert!(!fb.take_dirty());
        fb.blit_sprite(0, 0, &[0x01]);
        assert!(fb.take_dirty());
        assert!(!fb.take_dirty());
        fb.clear();
        assert!(fb.take_dirty());
        assert_eq!(fb.as_bytes(), &[0; SCREEN_BUFFER_SIZE]);
    }
}
