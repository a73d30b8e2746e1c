//! # interpreter
//!
//! Runs the machine one display frame at a time:
//!
//!  1. latch the keypad from the input device
//!  2. resolve a pending `Fx0A` wait, or run a batch of instructions
//!  3. hand the framebuffer to the display if it changed
//!  4. tick the delay and sound timers
//!  5. beep if the sound timer was high enough to hear this frame
//!
//! `main_loop` adds wall-clock pacing so that frames, and so timers, run at
//! 60Hz. Instruction throughput is whatever fits in the batch.
use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::executor::Flow;
use crate::input::Input;
use crate::machine::Machine;
use crate::random::RandomSource;
use crate::sound::Sound;
use std::io;
use std::time::{Duration, Instant};

pub const FRAMES_PER_SECOND: u32 = 60;

/// whether the interpreter should keep going after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Running,
    Quit,
}

pub struct Chip8Interpreter<'a> {
    machine: Machine,
    config: Config,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    random: &'a mut dyn RandomSource,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        random: &'a mut dyn RandomSource,
        config: Config,
    ) -> Chip8Interpreter<'a> {
        Chip8Interpreter {
            machine: Machine::new(),
            config,
            display,
            input,
            sound,
            random,
        }
    }

    /// load a chip8 program; returns the size of the image, which may be
    /// more than fits in memory
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, io::Error> {
        self.machine.memory.load_program(reader)
    }

    /// returns how many bytes were loaded
    pub fn load_rom(&mut self, rom: &[u8]) -> usize {
        self.machine.load_rom(rom)
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// run one frame without any pacing
    pub fn frame(&mut self) -> Result<FrameState, Chip8Error> {
        let polled = self.input.poll()?;
        self.machine.keypad.latch(polled.keys);

        if !polled.quit {
            self.run_batch()?;
        }

        if self.machine.framebuffer.take_dirty() {
            self.display.draw(&self.machine.framebuffer)?;
        }

        if polled.quit {
            return Ok(FrameState::Quit);
        }

        let audible = self.machine.sound_timer >= self.config.beep_threshold;
        self.machine.tick_timers();
        if audible {
            self.sound.trigger_beep();
        } else {
            self.sound.silence();
        }
        Ok(FrameState::Running)
    }

    fn run_batch(&mut self) -> Result<(), Chip8Error> {
        if self.machine.is_waiting_for_key() {
            self.machine.resolve_key_wait();
            return Ok(());
        }
        for _ in 0..self.config.instructions_per_frame {
            let flow = self.machine.step(&self.config.quirks, &mut *self.random)?;
            if flow == Flow::WaitingForKey {
                break;
            }
        }
        Ok(())
    }

    /// Run frames at 60Hz until the input asks to quit, a fault stops the
    /// program, or `max_frames` have run. Returns the number of frames run.
    pub fn main_loop(&mut self, max_frames: Option<u64>) -> Result<u64, Chip8Error> {
        let budget = Duration::from_secs(1) / FRAMES_PER_SECOND;
        let mut frames = 0;
        while max_frames.map_or(true, |max| frames < max) {
            let start = Instant::now();
            let state = self.frame()?;
            frames += 1;
            if state == FrameState::Quit {
                break;
            }
            // an overrunning frame just starts the next one late
            spin_sleep::sleep(budget.saturating_sub(start.elapsed()));
        }
        Ok(frames)
    }
}
