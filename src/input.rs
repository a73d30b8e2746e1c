use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

use crate::machine::KEY_COUNT;

/// keypad layout on the left-hand side of a qwerty keyboard
///   1 2 3 C      1 2 3 4
///   4 5 6 D      q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses, so a key counts as held for this many
/// frames after its last press (or auto-repeat)
const KEY_HOLD_FRAMES: u8 = 6;

/// what the keypad looks like this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    pub keys: [bool; KEY_COUNT],
    pub quit: bool,
}

/// reads the 16 logical keys, already mapped from whatever the host has
pub trait Input {
    /// called once at the start of every frame
    fn poll(&mut self) -> Result<InputFrame, io::Error>;
}

/// keyboard input from a raw-mode terminal
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: [u8; KEY_COUNT],
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: [0; KEY_COUNT],
        })
    }

    /// drain pending terminal events; returns true if asked to quit
    fn read_events(&mut self) -> Result<bool, io::Error> {
        let mut quit = false;
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                match evt.code {
                    KeyCode::Esc => quit = true,
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        quit = true
                    }
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => self.held[mapped_key as usize] = KEY_HOLD_FRAMES,
                        None => log::warn!("can't map {:?} to a CHIP-8 key", key),
                    },
                    other => log::debug!("ignoring key {:?}", other),
                }
            }
        }
        Ok(quit)
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("couldn't leave raw mode: {}", e);
        }
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<InputFrame, io::Error> {
        for frames in self.held.iter_mut() {
            *frames = frames.saturating_sub(1);
        }
        let quit = self.read_events()?;
        let mut keys = [false; KEY_COUNT];
        for (key, &frames) in keys.iter_mut().zip(self.held.iter()) {
            *key = frames > 0;
        }
        Ok(InputFrame { keys, quit })
    }
}

/// dummy Input implementation for testing: plays back one key state per
/// frame, then reports nothing pressed
pub struct DummyInput {
    frames: VecDeque<[bool; KEY_COUNT]>,
    quit_when_done: bool,
}

impl DummyInput {
    pub fn new(frames: &[[bool; KEY_COUNT]]) -> Self {
        DummyInput {
            frames: frames.iter().copied().collect(),
            quit_when_done: false,
        }
    }

    /// ask to quit once the script has run out
    pub fn then_quit(mut self) -> Self {
        self.quit_when_done = true;
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<InputFrame, io::Error> {
        match self.frames.pop_front() {
            Some(keys) => Ok(InputFrame { keys, quit: false }),
            None => Ok(InputFrame {
                keys: [false; KEY_COUNT],
                quit: self.quit_when_done,
            }),
        }
    }
}
