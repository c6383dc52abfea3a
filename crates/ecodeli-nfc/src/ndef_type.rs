/// Type name format, the low three bits of an NDEF record header
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, uniffi::Enum)]
pub enum NdefType {
    Empty,
    WellKnown,
    Mime,
    AbsoluteUri,
    External,
    Unknown,
    Unchanged,
    Reserved,
}

impl NdefType {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => NdefType::Empty,
            1 => NdefType::WellKnown,
            2 => NdefType::Mime,
            3 => NdefType::AbsoluteUri,
            4 => NdefType::External,
            5 => NdefType::Unknown,
            6 => NdefType::Unchanged,
            _ => NdefType::Reserved,
        }
    }

    pub const fn to_bits(self) -> u8 {
        match self {
            NdefType::Empty => 0,
            NdefType::WellKnown => 1,
            NdefType::Mime => 2,
            NdefType::AbsoluteUri => 3,
            NdefType::External => 4,
            NdefType::Unknown => 5,
            NdefType::Unchanged => 6,
            NdefType::Reserved => 7,
        }
    }
}
