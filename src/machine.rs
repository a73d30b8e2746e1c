use crate::framebuffer::Framebuffer;
use crate::memory::{Chip8MemoryMap, CHIP8_PROGRAM_ADDR};

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;
pub const KEY_COUNT: usize = 16;

/// the flag register
pub const VF: usize = 0xf;

/// Key-down state for this frame and the one before it. Refreshed once
/// per frame from the input source.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    current: [bool; KEY_COUNT],
    previous: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// shift this frame's state into history and take a new snapshot
    pub fn latch(&mut self, keys: [bool; KEY_COUNT]) {
        self.previous = self.current;
        self.current = keys;
    }

    /// only the low nibble of `key` is significant
    pub fn is_down(&self, key: u8) -> bool {
        self.current[(key & 0xf) as usize]
    }

    /// lowest key that was down last frame and is up now
    pub fn released(&self) -> Option<u8> {
        (0..KEY_COUNT)
            .find(|&k| self.previous[k] && !self.current[k])
            .map(|k| k as u8)
    }
}

/// All CHIP-8 machine state. Owned by whoever drives it; nothing here is
/// shared.
pub struct Machine {
    pub(crate) memory: Chip8MemoryMap,
    pub(crate) framebuffer: Framebuffer,
    pub(crate) v: [u8; REGISTER_COUNT],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) keypad: Keypad,
    /// register waiting for a key release (`Fx0A`)
    pub(crate) key_wait: Option<usize>,
}

impl Machine {
    pub fn new() -> Self {
        Machine {
            memory: Chip8MemoryMap::new(),
            framebuffer: Framebuffer::new(),
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            key_wait: None,
        }
    }

    /// copy a program image to 0x200, truncating; returns bytes loaded
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        self.memory.load_rom(rom)
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn register(&self, x: usize) -> u8 {
        self.v[x]
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn stack_depth(&self) -> usize {
        self.sp
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.key_wait.is_some()
    }

    /// one 60Hz tick of both timers, stopping at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// If a key wait is pending and a key was released this frame, store
    /// it and move past the `Fx0A`. Returns true if the wait ended.
    pub fn resolve_key_wait(&mut self) -> bool {
        let x = match self.key_wait {
            Some(x) => x,
            None => return false,
        };
        match self.keypad.released() {
            Some(key) => {
                self.v[x] = key;
                self.key_wait = None;
                self.pc = self.pc.wrapping_add(2);
                true
            }
            None => false,
        }
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(down: &[usize]) -> [bool; KEY_COUNT] {
        let mut k = [false; KEY_COUNT];
        for &d in down {
            k[d] = true;
        }
        k
    }

    #[test]
    fn test_initial_state() {
        let m = Machine::new();
        assert_eq!(m.pc(), 0x200);
        assert_eq!(m.stack_depth(), 0);
        assert_eq!(m.index(), 0);
        assert!(!m.is_waiting_for_key());
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut m = Machine::new();
        m.delay_timer = 5;
        m.sound_timer = 1;
        for _ in 0..5 {
            m.tick_timers();
        }
        assert_eq!(m.delay_timer(), 0);
        assert_eq!(m.sound_timer(), 0);
        m.tick_timers();
        assert_eq!(m.delay_timer(), 0);
        assert_eq!(m.sound_timer(), 0);
    }

    #[test]
    fn test_keypad_release_edge() {
        let mut k = Keypad::new();
        k.latch(keys(&[3, 9]));
        assert_eq!(k.released(), None);
        assert!(k.is_down(3));
        assert!(k.is_down(0x13));
        k.latch(keys(&[3]));
        assert_eq!(k.released(), Some(9));
        k.latch(keys(&[]));
        assert_eq!(k.released(), Some(3));
        k.latch(keys(&[]));
        assert_eq!(k.released(), None);
    }

    #[test]
    fn test_keypad_lowest_release_wins() {
        let mut k = Keypad::new();
        k.latch(keys(&[0xa, 0x2, 0xf]));
        k.latch(keys(&[]));
        assert_eq!(k.released(), Some(2));
    }

    #[test]
    fn test_resolve_key_wait() {
        let mut m = Machine::new();
        assert!(!m.resolve_key_wait());
        m.key_wait = Some(4);
        m.keypad.latch(keys(&[7]));
        assert!(!m.resolve_key_wait());
        assert_eq!(m.pc(), 0x200);
        m.keypad.latch(keys(&[]));
        assert!(m.resolve_key_wait());
        assert_eq!(m.register(4), 7);
        assert_eq!(m.pc(), 0x202);
        assert!(!m.is_waiting_for_key());
    }
}
