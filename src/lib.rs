//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the machine is plain owned data (`Machine`); no globals
//! * decoding is a pure, total function from a 16-bit word to an `Operation`
//! * the executor applies one `Operation` and says whether `PC` moved
//! * the interpreter runs frames: a batch of instructions, then timers,
//!   display and sound, paced to 60Hz
//! * display, input, audio and randomness sit behind traits so the
//!   interpreter doesn't need to know how any of them work
//! * behaviour that historical interpreters disagree on is a `Quirks` toggle
//!
//! Model
//!
//! Environment (main.rs)
//!  |-- display, input, sound, random, config
//!  |-- interpreter(display, input, sound, random, config)
//!  |    `-- machine(memory, framebuffer, registers, stack, timers, keypad)
//!  `-- main loop
//!       |-- input.poll() -> keypad.latch()
//!       |-- key wait ? resolve_key_wait() : step() x instructions_per_frame
//!       |-- framebuffer dirty ? display.draw()
//!       |-- tick_timers(); sound timer audible ? sound.trigger_beep()
//!       `-- sleep out the rest of the 1/60s
pub mod config;
pub mod display;
pub mod error;
pub mod executor;
pub mod framebuffer;
pub mod input;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod random;
pub mod sound;
