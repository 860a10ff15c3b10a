//! Operation codes identifying the file operations carried over the wire.
//!
//! Values match the `OP_*` constants in the original `serde.h`: fixed small
//! integers, one per supported operation, chosen so the server's dispatch
//! `match` and the client's frame construction never have to agree on
//! anything beyond this enum.

/// One RPC opcode per intercepted file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    /// `open(2)`
    Open = 1,
    /// `write(2)`
    Write = 2,
    /// `close(2)`
    Close = 3,
    /// `read(2)`
    Read = 4,
    /// `lseek(2)`
    Lseek = 5,
    /// `__xstat` (the versioned `stat(2)`)
    Stat = 6,
    /// `unlink(2)`
    Unlink = 7,
    /// `getdirentries(2)`
    Getdirentries = 8,
    /// `getdirtree`
    Getdirtree = 9,
}

impl Opcode {
    /// Numeric value as it appears on the wire.
    #[must_use]
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Recover an [`Opcode`] from its wire value, `None` if unrecognized.
    #[must_use]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Open),
            2 => Some(Self::Write),
            3 => Some(Self::Close),
            4 => Some(Self::Read),
            5 => Some(Self::Lseek),
            6 => Some(Self::Stat),
            7 => Some(Self::Unlink),
            8 => Some(Self::Getdirentries),
            9 => Some(Self::Getdirtree),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Opcode;

    #[test]
    fn round_trips_every_variant() {
        let variants = [
            Opcode::Open,
            Opcode::Write,
            Opcode::Close,
            Opcode::Read,
            Opcode::Lseek,
            Opcode::Stat,
            Opcode::Unlink,
            Opcode::Getdirentries,
            Opcode::Getdirtree,
        ];
        for op in variants {
            assert_eq!(Opcode::from_u32(op.to_u32()), Some(op));
        }
    }

    #[test]
    fn rejects_unknown_value() {
        assert_eq!(Opcode::from_u32(0), None);
        assert_eq!(Opcode::from_u32(10), None);
    }
}
