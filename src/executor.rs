use crate::config::Quirks;
use crate::error::{Fault, FaultKind};
use crate::machine::{Machine, STACK_DEPTH, VF};
use crate::memory::{MemoryMap, OutOfRange, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES};
use crate::opcode::{decode, Operation};
use crate::random::RandomSource;

/// what the program counter should do after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// move on to the next instruction
    Advance,
    /// the instruction already set `PC`
    Jumped,
    /// `Fx0A` is holding `PC` until a key is released
    WaitingForKey,
}

/// `I` is a 12-bit address; the upper bits never reach memory
fn address(i: u16) -> u16 {
    i & 0x0fff
}

impl Machine {
    /// read the instruction at `PC`
    pub fn fetch(&self) -> Result<u16, Fault> {
        self.memory
            .get_word(self.pc)
            .map_err(|e| Fault::new(FaultKind::OutOfBoundsFetch { addr: e.addr }, self.pc, None))
    }

    /// Fetch, decode and execute one instruction. Does nothing while a key
    /// wait is pending.
    pub fn step(&mut self, quirks: &Quirks, rng: &mut dyn RandomSource) -> Result<Flow, Fault> {
        if self.key_wait.is_some() {
            return Ok(Flow::WaitingForKey);
        }
        let opcode = self.fetch()?;
        let flow = self.execute(decode(opcode), opcode, quirks, rng)?;
        if flow == Flow::Advance {
            self.pc = self.pc.wrapping_add(2);
        }
        Ok(flow)
    }

    /// Apply one decoded instruction. `opcode` is only used to report
    /// faults. `PC` is left alone unless the instruction sets it.
    pub fn execute(
        &mut self,
        op: Operation,
        opcode: u16,
        quirks: &Quirks,
        rng: &mut dyn RandomSource,
    ) -> Result<Flow, Fault> {
        use Operation::*;

        let pc = self.pc;
        let fault = |kind| Fault::new(kind, pc, Some(opcode));
        let out_of_bounds = |e: OutOfRange| fault(FaultKind::OutOfBoundsFetch { addr: e.addr });

        match op {
            ClearScreen => self.framebuffer.clear(),
            Return => {
                if self.sp == 0 {
                    return Err(fault(FaultKind::StackUnderflow));
                }
                self.sp -= 1;
                self.pc = self.stack[self.sp];
                return Ok(Flow::Jumped);
            }
            Jump(nnn) => {
                self.pc = nnn;
                return Ok(Flow::Jumped);
            }
            Call(nnn) => {
                if self.sp == STACK_DEPTH {
                    return Err(fault(FaultKind::StackOverflow));
                }
                self.stack[self.sp] = self.pc.wrapping_add(2);
                self.sp += 1;
                self.pc = nnn;
                return Ok(Flow::Jumped);
            }
            SkipIfEqual { x, nn } => return Ok(self.skip_if(self.v[x] == nn)),
            SkipIfNotEqual { x, nn } => return Ok(self.skip_if(self.v[x] != nn)),
            SkipIfRegistersEqual { x, y } => return Ok(self.skip_if(self.v[x] == self.v[y])),
            SkipIfRegistersNotEqual { x, y } => {
                return Ok(self.skip_if(self.v[x] != self.v[y]))
            }
            Load { x, nn } => self.v[x] = nn,
            Add { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Assign { x, y } => self.v[x] = self.v[y],
            Or { x, y } => {
                self.v[x] |= self.v[y];
                self.reset_flag_after_logic(quirks);
            }
            And { x, y } => {
                self.v[x] &= self.v[y];
                self.reset_flag_after_logic(quirks);
            }
            Xor { x, y } => {
                self.v[x] ^= self.v[y];
                self.reset_flag_after_logic(quirks);
            }
            AddWithCarry { x, y } => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[VF] = carry as u8;
            }
            Subtract { x, y } => {
                let no_borrow = self.v[x] >= self.v[y];
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
                self.v[VF] = no_borrow as u8;
            }
            ReverseSubtract { x, y } => {
                let no_borrow = self.v[y] >= self.v[x];
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
                self.v[VF] = no_borrow as u8;
            }
            ShiftRight { x, y } => {
                let source = self.v[if quirks.shift_uses_vy { y } else { x }];
                self.v[x] = source >> 1;
                self.v[VF] = source & 0x01;
            }
            ShiftLeft { x, y } => {
                let source = self.v[if quirks.shift_uses_vy { y } else { x }];
                self.v[x] = source << 1;
                self.v[VF] = source >> 7;
            }
            SetIndex(nnn) => self.i = nnn,
            JumpWithOffset(nnn) => {
                self.pc = nnn + self.v[0] as u16;
                return Ok(Flow::Jumped);
            }
            Random { x, nn } => self.v[x] = rng.next_byte() & nn,
            Draw { x, y, n } => {
                self.v[VF] = 0;
                let sprite = self
                    .memory
                    .get_ro_slice(address(self.i), n as usize)
                    .map_err(out_of_bounds)?;
                let collision = self.framebuffer.blit_sprite(
                    self.v[x] as usize,
                    self.v[y] as usize,
                    sprite,
                );
                if collision {
                    self.v[VF] = 1;
                }
            }
            SkipIfKeyDown { x } => return Ok(self.skip_if(self.keypad.is_down(self.v[x]))),
            SkipIfKeyUp { x } => return Ok(self.skip_if(!self.keypad.is_down(self.v[x]))),
            ReadDelayTimer { x } => self.v[x] = self.delay_timer,
            WaitForKey { x } => {
                self.key_wait = Some(x);
                return Ok(Flow::WaitingForKey);
            }
            SetDelayTimer { x } => self.delay_timer = self.v[x],
            SetSoundTimer { x } => self.sound_timer = self.v[x],
            AddToIndex { x } => self.i = self.i.wrapping_add(self.v[x] as u16),
            LoadGlyph { x } => {
                self.i = CHIP8_FONT_ADDR + self.v[x] as u16 * CHIP8_FONT_GLYPH_BYTES
            }
            StoreBcd { x } => {
                let value = self.v[x];
                let digits = self
                    .memory
                    .get_rw_slice(address(self.i), 3)
                    .map_err(out_of_bounds)?;
                digits.copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
            }
            StoreRegisters { x } => {
                self.memory
                    .write(&self.v[..=x], address(self.i))
                    .map_err(out_of_bounds)?;
                self.advance_index_after_transfer(x, quirks);
            }
            LoadRegisters { x } => {
                let block = self
                    .memory
                    .get_ro_slice(address(self.i), x + 1)
                    .map_err(out_of_bounds)?;
                self.v[..=x].copy_from_slice(block);
                self.advance_index_after_transfer(x, quirks);
            }
            Unknown(_) => (),
        }
        Ok(Flow::Advance)
    }

    fn skip_if(&mut self, condition: bool) -> Flow {
        if condition {
            self.pc = self.pc.wrapping_add(4);
            Flow::Jumped
        } else {
            Flow::Advance
        }
    }

    fn reset_flag_after_logic(&mut self, quirks: &Quirks) {
        if quirks.logic_resets_vf {
            self.v[VF] = 0;
        }
    }

    fn advance_index_after_transfer(&mut self, x: usize, quirks: &Quirks) {
        if quirks.load_store_increments_i {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }
}
