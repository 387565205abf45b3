pub trait OpCode {
    fn op_code(&self) -> u8;
}

/// ROM commands. Only the single-drop shortcut is supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    SkipRom = 0xCC,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}
