use beep::beep;

/// where the sound timer's beep goes
pub trait Sound {
    /// called at most once per frame while the sound timer is audible
    fn trigger_beep(&mut self);

    /// called on frames that shouldn't make a sound
    fn silence(&mut self) {}
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// drives the PC speaker; the tone keeps going until silenced
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn trigger_beep(&mut self) {
        if self.is_beeping {
            return;
        }
        match beep(SIMPLEBEEP_PITCH) {
            Ok(()) => self.is_beeping = true,
            Err(e) => log::warn!("couldn't start beep: {}", e),
        }
    }

    fn silence(&mut self) {
        if !self.is_beeping {
            return;
        }
        if let Err(e) = beep(0) {
            log::warn!("couldn't stop beep: {}", e);
        }
        self.is_beeping = false;
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        self.silence();
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Default for Mute {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for Mute {
    fn trigger_beep(&mut self) {}
}
