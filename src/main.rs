use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use chip8vm::config::{Config, Quirks, DEFAULT_BEEP_THRESHOLD, DEFAULT_INSTRUCTIONS_PER_FRAME};
use chip8vm::display::MonoTermDisplay;
use chip8vm::input::TermInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::memory::{CHIP8_PROGRAM_ADDR, CHIP8_RAM_SIZE_BYTES};
use chip8vm::random::{RandomSource, SeededRandom, ThreadRandom};
use chip8vm::sound::{Mute, SimpleBeep, Sound};

/// Run a CHIP-8 program in the terminal. Keys 1234/qwer/asdf/zxcv are the
/// keypad; Esc quits. Logs go to stderr, so redirect them somewhere.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// ROM image to load at 0x200
    rom: PathBuf,

    #[arg(short, long, default_value_t = DEFAULT_INSTRUCTIONS_PER_FRAME)]
    instructions_per_frame: u32,

    /// sound timer value needed to beep
    #[arg(long, default_value_t = DEFAULT_BEEP_THRESHOLD)]
    beep_threshold: u8,

    /// stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    #[arg(long)]
    mute: bool,

    /// seed for Cxnn; fresh randomness every time if absent
    #[arg(long)]
    seed: Option<u64>,

    /// 8xy6/8xyE shift Vx in place instead of reading Vy
    #[arg(long)]
    shift_vx: bool,

    /// Fx55/Fx65 leave I where it was
    #[arg(long)]
    no_index_increment: bool,

    /// 8xy1/8xy2/8xy3 clear VF
    #[arg(long)]
    logic_resets_vf: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            quirks: Quirks {
                shift_uses_vy: !self.shift_vx,
                load_store_increments_i: !self.no_index_increment,
                logic_resets_vf: self.logic_resets_vf,
            },
            instructions_per_frame: self.instructions_per_frame,
            beep_threshold: self.beep_threshold,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();

    let config = args.config();
    log::info!("{:?}", config);

    let mut f = File::open(&args.rom).with_context(|| format!("opening {}", args.rom.display()))?;

    // initialise
    let mut display = MonoTermDisplay::new()?;
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };
    let mut random: Box<dyn RandomSource> = match args.seed {
        Some(seed) => Box::new(SeededRandom::new(seed)),
        None => Box::new(ThreadRandom::new()),
    };
    let mut interpreter = Chip8Interpreter::new(
        &mut display,
        &mut input,
        &mut *sound,
        &mut *random,
        config,
    );

    // load a program
    let size = interpreter.load_program(&mut f)?;
    let capacity = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;
    log::info!("loaded {} ({} bytes)", args.rom.display(), size);
    if size > capacity {
        log::warn!("ROM is {} bytes; only the first {} were loaded", size, capacity);
    }

    let result = interpreter.main_loop(args.max_frames);
    drop(interpreter);
    drop(input);
    drop(display);

    // shove some junk on stdout to stop the shell messing up the last frame
    for _ in 0..4 {
        println!();
    }
    match result {
        Ok(frames) => {
            log::info!("stopped after {} frames", frames);
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e.into())
        }
    }
}
