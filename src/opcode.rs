//! CHIP-8 instruction decoding
//!
//! Every instruction is two bytes, big-endian, split into four nibbles:
//!
//! ```text
//!   op   x    y    n
//!  15-12 11-8 7-4  3-0
//! ```
//!
//! `nn` is the low byte and `nnn` the low twelve bits. Decoding is total:
//! anything that isn't a recognised instruction becomes `Operation::Unknown`.
use std::fmt;

/// the raw fields of an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: u8,
    pub x: usize,
    pub y: usize,
    pub n: u8,
    pub nn: u8,
    pub nnn: u16,
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction {
            op: (word >> 12) as u8,
            x: ((word >> 8) & 0xf) as usize,
            y: ((word >> 4) & 0xf) as usize,
            n: (word & 0xf) as u8,
            nn: (word & 0xff) as u8,
            nnn: word & 0x0fff,
        }
    }
}

/// A decoded instruction. Register operands are indices into `V0..VF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1nnn
    Jump(u16),
    /// 2nnn
    Call(u16),
    /// 3xnn
    SkipIfEqual { x: usize, nn: u8 },
    /// 4xnn
    SkipIfNotEqual { x: usize, nn: u8 },
    /// 5xy0
    SkipIfRegistersEqual { x: usize, y: usize },
    /// 6xnn
    Load { x: usize, nn: u8 },
    /// 7xnn
    Add { x: usize, nn: u8 },
    /// 8xy0
    Assign { x: usize, y: usize },
    /// 8xy1
    Or { x: usize, y: usize },
    /// 8xy2
    And { x: usize, y: usize },
    /// 8xy3
    Xor { x: usize, y: usize },
    /// 8xy4
    AddWithCarry { x: usize, y: usize },
    /// 8xy5
    Subtract { x: usize, y: usize },
    /// 8xy6
    ShiftRight { x: usize, y: usize },
    /// 8xy7
    ReverseSubtract { x: usize, y: usize },
    /// 8xyE
    ShiftLeft { x: usize, y: usize },
    /// 9xy0
    SkipIfRegistersNotEqual { x: usize, y: usize },
    /// Annn
    SetIndex(u16),
    /// Bnnn
    JumpWithOffset(u16),
    /// Cxnn
    Random { x: usize, nn: u8 },
    /// Dxyn
    Draw { x: usize, y: usize, n: u8 },
    /// Ex9E
    SkipIfKeyDown { x: usize },
    /// ExA1
    SkipIfKeyUp { x: usize },
    /// Fx07
    ReadDelayTimer { x: usize },
    /// Fx0A
    WaitForKey { x: usize },
    /// Fx15
    SetDelayTimer { x: usize },
    /// Fx18
    SetSoundTimer { x: usize },
    /// Fx1E
    AddToIndex { x: usize },
    /// Fx29
    LoadGlyph { x: usize },
    /// Fx33
    StoreBcd { x: usize },
    /// Fx55
    StoreRegisters { x: usize },
    /// Fx65
    LoadRegisters { x: usize },
    /// anything else, including the machine-code call `0nnn`
    Unknown(u16),
}

/// decode a big-endian instruction word
pub fn decode(word: u16) -> Operation {
    use Operation::*;

    let Instruction { op, x, y, n, nn, nnn } = Instruction::from(word);
    match (op, n) {
        (0x0, _) => match nnn {
            0x0e0 => ClearScreen,
            0x0ee => Return,
            _ => Unknown(word),
        },
        (0x1, _) => Jump(nnn),
        (0x2, _) => Call(nnn),
        (0x3, _) => SkipIfEqual { x, nn },
        (0x4, _) => SkipIfNotEqual { x, nn },
        (0x5, 0x0) => SkipIfRegistersEqual { x, y },
        (0x6, _) => Load { x, nn },
        (0x7, _) => Add { x, nn },
        (0x8, 0x0) => Assign { x, y },
        (0x8, 0x1) => Or { x, y },
        (0x8, 0x2) => And { x, y },
        (0x8, 0x3) => Xor { x, y },
        (0x8, 0x4) => AddWithCarry { x, y },
        (0x8, 0x5) => Subtract { x, y },
        (0x8, 0x6) => ShiftRight { x, y },
        (0x8, 0x7) => ReverseSubtract { x, y },
        (0x8, 0xe) => ShiftLeft { x, y },
        (0x9, 0x0) => SkipIfRegistersNotEqual { x, y },
        (0xa, _) => SetIndex(nnn),
        (0xb, _) => JumpWithOffset(nnn),
        (0xc, _) => Random { x, nn },
        (0xd, _) => Draw { x, y, n },
        (0xe, _) => match nn {
            0x9e => SkipIfKeyDown { x },
            0xa1 => SkipIfKeyUp { x },
            _ => Unknown(word),
        },
        (0xf, _) => match nn {
            0x07 => ReadDelayTimer { x },
            0x0a => WaitForKey { x },
            0x15 => SetDelayTimer { x },
            0x18 => SetSoundTimer { x },
            0x1e => AddToIndex { x },
            0x29 => LoadGlyph { x },
            0x33 => StoreBcd { x },
            0x55 => StoreRegisters { x },
            0x65 => LoadRegisters { x },
            _ => Unknown(word),
        },
        _ => Unknown(word),
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Operation::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(nnn) => write!(f, "JP 0x{:03x}", nnn),
            Call(nnn) => write!(f, "CALL 0x{:03x}", nnn),
            SkipIfEqual { x, nn } => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            SkipIfNotEqual { x, nn } => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            SkipIfRegistersEqual { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, nn } => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            Assign { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddWithCarry { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Subtract { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            ReverseSubtract { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipIfRegistersNotEqual { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetIndex(nnn) => write!(f, "LD I, 0x{:03x}", nnn),
            JumpWithOffset(nnn) => write!(f, "JP V0, 0x{:03x}", nnn),
            Random { x, nn } => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfKeyDown { x } => write!(f, "SKP V{:X}", x),
            SkipIfKeyUp { x } => write!(f, "SKNP V{:X}", x),
            ReadDelayTimer { x } => write!(f, "LD V{:X}, DT", x),
            WaitForKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelayTimer { x } => write!(f, "LD DT, V{:X}", x),
            SetSoundTimer { x } => write!(f, "LD ST, V{:X}", x),
            AddToIndex { x } => write!(f, "ADD I, V{:X}", x),
            LoadGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(word) => write!(f, "??? {:04x}", word),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Operation::*;

    #[test]
    fn test_split_fields() {
        let i = Instruction::from(0xd4c3);
        assert_eq!(i.op, 0xd);
        assert_eq!(i.x, 0x4);
        assert_eq!(i.y, 0xc);
        assert_eq!(i.n, 0x3);
        assert_eq!(i.nn, 0xc3);
        assert_eq!(i.nnn, 0x4c3);
    }

    #[test]
    fn test_decode_flow_control() {
        assert_eq!(decode(0x00e0), ClearScreen);
        assert_eq!(decode(0x00ee), Return);
        assert_eq!(decode(0x1a5f), Jump(0xa5f));
        assert_eq!(decode(0x2a5f), Call(0xa5f));
        assert_eq!(decode(0xb300), JumpWithOffset(0x300));
    }

    #[test]
    fn test_decode_alu() {
        assert_eq!(decode(0x8120), Assign { x: 1, y: 2 });
        assert_eq!(decode(0x8124), AddWithCarry { x: 1, y: 2 });
        assert_eq!(decode(0x8ab5), Subtract { x: 0xa, y: 0xb });
        assert_eq!(decode(0x8ab6), ShiftRight { x: 0xa, y: 0xb });
        assert_eq!(decode(0x8ab7), ReverseSubtract { x: 0xa, y: 0xb });
        assert_eq!(decode(0x8abe), ShiftLeft { x: 0xa, y: 0xb });
    }

    #[test]
    fn test_decode_misc() {
        assert_eq!(decode(0x62c5), Load { x: 2, nn: 0xc5 });
        assert_eq!(decode(0xd01f), Draw { x: 0, y: 1, n: 0xf });
        assert_eq!(decode(0xe59e), SkipIfKeyDown { x: 5 });
        assert_eq!(decode(0xe5a1), SkipIfKeyUp { x: 5 });
        assert_eq!(decode(0xf30a), WaitForKey { x: 3 });
        assert_eq!(decode(0xf333), StoreBcd { x: 3 });
        assert_eq!(decode(0xfe65), LoadRegisters { x: 0xe });
    }

    #[test]
    fn test_unassigned_opcodes_are_unknown() {
        for word in [0x0000, 0x0123, 0x5121, 0x8128, 0x812f, 0x9121, 0xe1ff, 0xf1ff] {
            assert_eq!(decode(word), Unknown(word), "{:04x}", word);
        }
    }

    #[test]
    fn test_decode_is_total() {
        // every word decodes to something, and only the documented holes
        // are unknown
        let unknown = (0..=u16::MAX)
            .filter(|&w| matches!(decode(w), Unknown(_)))
            .count();
        let known = 0x10000 - unknown;
        // 1nnn 2nnn 3xnn 4xnn 6xnn 7xnn Annn Bnnn Cxnn Dxyn take 4096 each,
        // 5xy0 9xy0 256 each, 8xy? 9 x 256, Ex?? 2 x 16, Fx?? 9 x 16, 00E0 00EE
        assert_eq!(known, 10 * 4096 + 2 * 256 + 9 * 256 + 2 * 16 + 9 * 16 + 2);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(decode(0x2200).to_string(), "CALL 0x200");
        assert_eq!(decode(0xd01f).to_string(), "DRW V0, V1, 15");
        assert_eq!(decode(0xfa55).to_string(), "LD [I], VA");
        assert_eq!(decode(0x0123).to_string(), "??? 0123");
    }
}
