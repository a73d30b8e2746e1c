use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// an access that would run off the end of memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub addr: usize,
    pub len: usize,
}

/// Represents memory map, ROM, RAM etc.
pub trait MemoryMap {
    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), OutOfRange> {
        let bytes = self.get_rw_slice(addr, data.len())?;
        bytes.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> Result<u16, OutOfRange> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], OutOfRange>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], OutOfRange>;
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// where the hex digit glyphs live; `Fx29` indexes from here
pub const CHIP8_FONT_ADDR: u16 = 0x0000;

/// bytes per glyph in the font table
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map
///   0x0000-0x004f  hex font, 16 glyphs of 5 bytes
///   0x0050-0x01ff  unused (historically the interpreter)
///   0x0200-0x0fff  program, writable
///
/// the display lives outside the address space, see `Framebuffer`
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], OutOfRange> {
        let a = addr as usize;
        self.bytes
            .get_mut(a..a + len)
            .ok_or(OutOfRange { addr: a, len })
    }
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], OutOfRange> {
        let a = addr as usize;
        self.bytes.get(a..a + len).ok_or(OutOfRange { addr: a, len })
    }
}

impl Chip8MemoryMap {
    /// initialises 4K of zeroed RAM with the font baked in
    pub fn new() -> Self {
        let mut bytes = vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice();
        let font = CHIP8_FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8MemoryMap { bytes }
    }

    /// Copy a ROM image to 0x200. Anything that doesn't fit is dropped;
    /// returns how many bytes actually landed in memory.
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        let start = CHIP8_PROGRAM_ADDR as usize;
        let len = rom.len().min(CHIP8_RAM_SIZE_BYTES - start);
        self.bytes[start..start + len].copy_from_slice(&rom[..len]);
        len
    }

    /// load a CHIP-8 program at 0x200 from a reader; returns the full size
    /// of the image read, which may be more than was loaded
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, io::Error> {
        let mut buf = Vec::new();
        let len = reader.read_to_end(&mut buf)?;
        self.load_rom(&buf);
        Ok(len)
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
