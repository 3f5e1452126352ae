use std::convert::TryFrom;

// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.4
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum CpTag {
    Utf8 = 1,
    Integer = 3,
    Float = 4,
    Long = 5,
    Double = 6,
    Class = 7,
    String = 8,
    FieldRef = 9,
    MethodRef = 10,
    InterfaceMethodRef = 11,
    NameAndType = 12,
    MethodHandle = 15,
    MethodType = 16,
    Dynamic = 17,
    InvokeDynamic = 18,
    Module = 19,
    Package = 20,
}
impl CpTag {
    /// Width of the payload that follows the tag byte. `None` for `Utf8`, whose payload is
    /// prefixed by its own length.
    pub fn payload_len(self) -> Option<usize> {
        match self {
            CpTag::Utf8 => None,
            CpTag::Class
            | CpTag::String
            | CpTag::MethodType
            | CpTag::Module
            | CpTag::Package => Some(2),
            CpTag::MethodHandle => Some(3),
            CpTag::Integer
            | CpTag::Float
            | CpTag::FieldRef
            | CpTag::MethodRef
            | CpTag::InterfaceMethodRef
            | CpTag::NameAndType
            | CpTag::Dynamic
            | CpTag::InvokeDynamic => Some(4),
            CpTag::Long | CpTag::Double => Some(8),
        }
    }

    /// Number of constant pool indices taken by one entry of this kind.
    ///
    /// "If a CONSTANT_Long_info or CONSTANT_Double_info structure is the entry at index n in the
    /// constant_pool table, then the next usable entry in the table is located at index n+2."
    pub fn slot_size(self) -> u32 {
        match self {
            CpTag::Long | CpTag::Double => 2,
            _ => 1,
        }
    }
}

impl TryFrom<u8> for CpTag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(CpTag::Utf8),
            3 => Ok(CpTag::Integer),
            4 => Ok(CpTag::Float),
            5 => Ok(CpTag::Long),
            6 => Ok(CpTag::Double),
            7 => Ok(CpTag::Class),
            8 => Ok(CpTag::String),
            9 => Ok(CpTag::FieldRef),
            10 => Ok(CpTag::MethodRef),
            11 => Ok(CpTag::InterfaceMethodRef),
            12 => Ok(CpTag::NameAndType),
            15 => Ok(CpTag::MethodHandle),
            16 => Ok(CpTag::MethodType),
            17 => Ok(CpTag::Dynamic),
            18 => Ok(CpTag::InvokeDynamic),
            19 => Ok(CpTag::Module),
            20 => Ok(CpTag::Package),
            _ => Err(value),
        }
    }
}

/// One decoded constant pool entry. The bytes borrow the transcoder's scratch buffer and are
/// only valid until the next entry is read.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum CpEntry<'a> {
    Utf8(&'a [u8]),
    Opaque { tag: CpTag, payload: &'a [u8] },
}

#[cfg(test)]
mod cp_tag_tests {
    use super::*;

    #[test]
    fn it_should_round_trip_every_known_tag() {
        for byte in 0..=u8::MAX {
            if let Ok(tag) = CpTag::try_from(byte) {
                assert_eq!(tag as u8, byte);
            }
        }
    }

    #[test]
    fn it_should_reject_unassigned_tags() {
        for byte in [0, 2, 13, 14, 21, 0xff] {
            assert_eq!(CpTag::try_from(byte), Err(byte));
        }
    }

    #[test]
    fn it_should_know_the_fixed_widths() {
        let widths = [
            (3, 4),
            (4, 4),
            (5, 8),
            (6, 8),
            (7, 2),
            (8, 2),
            (9, 4),
            (10, 4),
            (11, 4),
            (12, 4),
            (15, 3),
            (16, 2),
            (17, 4),
            (18, 4),
            (19, 2),
            (20, 2),
        ];
        for (byte, width) in widths {
            assert_eq!(CpTag::try_from(byte).unwrap().payload_len(), Some(width));
        }
        assert_eq!(CpTag::Utf8.payload_len(), None);
    }

    #[test]
    fn it_should_give_wide_constants_two_slots() {
        assert_eq!(CpTag::Long.slot_size(), 2);
        assert_eq!(CpTag::Double.slot_size(), 2);
        assert_eq!(CpTag::Integer.slot_size(), 1);
        assert_eq!(CpTag::Utf8.slot_size(), 1);
    }
}
