/// Behaviour that differs between historical CHIP-8 interpreters. Real
/// programs rely on one reading or the other, so these are switchable.
/// `Default` gives the canonical behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// `8xy6`/`8xyE` shift `Vy` into `Vx`; otherwise `Vx` is shifted in place
    pub shift_uses_vy: bool,
    /// `Fx55`/`Fx65` leave `I` pointing just past the transferred block
    pub load_store_increments_i: bool,
    /// `8xy1`/`8xy2`/`8xy3` clear `VF` (COSMAC VIP)
    pub logic_resets_vf: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            shift_uses_vy: true,
            load_store_increments_i: true,
            logic_resets_vf: false,
        }
    }
}

pub const DEFAULT_INSTRUCTIONS_PER_FRAME: u32 = 10;

/// sound timer value needed for a frame to be audible
pub const DEFAULT_BEEP_THRESHOLD: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    pub instructions_per_frame: u32,
    pub beep_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            instructions_per_frame: DEFAULT_INSTRUCTIONS_PER_FRAME,
            beep_threshold: DEFAULT_BEEP_THRESHOLD,
        }
    }
}
