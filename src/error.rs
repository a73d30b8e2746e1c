use std::error::Error;
use std::fmt;
use std::io;

use crate::opcode;

/// what went wrong while executing a program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// `2nnn` with all 16 stack slots in use
    StackOverflow,
    /// `00EE` with an empty stack
    StackUnderflow,
    /// fetch or `I`-relative access outside the 4K address space
    OutOfBoundsFetch { addr: usize },
}

/// A fatal execution fault. Carries the program counter of the offending
/// instruction and, when it could be fetched, the instruction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub pc: u16,
    pub opcode: Option<u16>,
}

impl Fault {
    pub fn new(kind: FaultKind, pc: u16, opcode: Option<u16>) -> Self {
        Fault { kind, pc, opcode }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FaultKind::StackOverflow => write!(f, "stack overflow")?,
            FaultKind::StackUnderflow => write!(f, "stack underflow")?,
            FaultKind::OutOfBoundsFetch { addr } => {
                write!(f, "out of bounds access at 0x{:04x}", addr)?
            }
        }
        write!(f, " (pc 0x{:04x}", self.pc)?;
        if let Some(opcode) = self.opcode {
            write!(f, ", {:04x} {}", opcode, opcode::decode(opcode))?;
        }
        write!(f, ")")
    }
}

impl Error for Fault {}

/// everything that can stop the interpreter
#[derive(Debug)]
pub enum Chip8Error {
    Fault(Fault),
    Io(io::Error),
}

impl fmt::Display for Chip8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chip8Error::Fault(fault) => write!(f, "program fault: {}", fault),
            Chip8Error::Io(e) => write!(f, "i/o error: {}", e),
        }
    }
}

impl Error for Chip8Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Chip8Error::Fault(fault) => Some(fault),
            Chip8Error::Io(e) => Some(e),
        }
    }
}

impl From<Fault> for Chip8Error {
    fn from(fault: Fault) -> Self {
        Chip8Error::Fault(fault)
    }
}

impl From<io::Error> for Chip8Error {
    fn from(e: io::Error) -> Self {
        Chip8Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_message_names_instruction() {
        let fault = Fault::new(FaultKind::StackOverflow, 0x0200, Some(0x2200));
        assert_eq!(
            fault.to_string(),
            "stack overflow (pc 0x0200, 2200 CALL 0x200)"
        );
    }

    #[test]
    fn test_fault_message_without_opcode() {
        let fault = Fault::new(FaultKind::OutOfBoundsFetch { addr: 0x0fff }, 0x0fff, None);
        assert_eq!(
            fault.to_string(),
            "out of bounds access at 0x0fff (pc 0x0fff)"
        );
    }

    #[test]
    fn test_error_conversions() {
        let e: Chip8Error = Fault::new(FaultKind::StackUnderflow, 0x0202, Some(0x00ee)).into();
        assert!(matches!(
            e,
            Chip8Error::Fault(Fault {
                kind: FaultKind::StackUnderflow,
                ..
            })
        ));
        let e: Chip8Error = io::Error::new(io::ErrorKind::Other, "gone").into();
        assert!(e.source().is_some());
    }
}
