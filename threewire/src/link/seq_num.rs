use core::{
    fmt::{self, Write},
    ops::{Add, AddAssign},
};

/// A 3-bit H5 sequence or acknowledgement number.
///
/// This type implements wrapping arithmetic (although only `+` and `+=` operators are supported)
/// modulo 8, matching the `Seq` and `Ack` header fields.
#[derive(PartialEq, Eq, Copy, Clone, Default)]
pub struct SeqNum(u8);

impl SeqNum {
    /// A sequence number of 0 (default value).
    pub const ZERO: Self = SeqNum(0);

    /// A sequence number of 1.
    pub const ONE: Self = SeqNum(1);

    /// Creates a sequence number from the low 3 bits of `raw`.
    pub const fn new(raw: u8) -> Self {
        SeqNum(raw & 0b111)
    }

    /// Returns the raw value in range `0..8`.
    pub fn to_u8(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(char::from(b'0' + self.0))
    }
}

impl fmt::Debug for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl Add for SeqNum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        SeqNum::new(self.0.wrapping_add(rhs.0))
    }
}

impl Add<&'_ SeqNum> for SeqNum {
    type Output = Self;

    fn add(self, rhs: &'_ SeqNum) -> Self {
        self + *rhs
    }
}

impl AddAssign for SeqNum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl AddAssign<&'_ SeqNum> for SeqNum {
    fn add_assign(&mut self, rhs: &'_ SeqNum) {
        *self = *self + *rhs;
    }
}
