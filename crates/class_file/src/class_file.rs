use std::{
    fmt,
    io::{Read, Write},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{ClassFileError, Result};

const MAGIC: u32 = 0xCAFEBABE;

/// The fixed prefix of a class file, up to and including the constant pool count.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ClassFileHeader {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    // One more than the number of addressable entries, index 0 is never used.
    pub constant_pool_count: u16,
}
impl ClassFileHeader {
    pub fn read(r: &mut impl Read) -> Result<Self> {
        let magic = match r.read_u32::<BigEndian>()? {
            MAGIC => MAGIC,
            magic_identifier => {
                return Err(ClassFileError::InvalidMagicIdentifier(magic_identifier))
            }
        };
        let minor_version = r.read_u16::<BigEndian>()?;
        let major_version = r.read_u16::<BigEndian>()?;
        let constant_pool_count = r.read_u16::<BigEndian>()?;

        Ok(Self {
            magic,
            minor_version,
            major_version,
            constant_pool_count,
        })
    }

    pub fn write(&self, w: &mut impl Write) -> Result<()> {
        w.write_u32::<BigEndian>(self.magic)?;
        w.write_u16::<BigEndian>(self.minor_version)?;
        w.write_u16::<BigEndian>(self.major_version)?;
        w.write_u16::<BigEndian>(self.constant_pool_count)?;

        Ok(())
    }
}

impl fmt::Display for ClassFileHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class file {}.{}, {} constant pool slots",
            self.major_version,
            self.minor_version,
            self.constant_pool_count.saturating_sub(1)
        )
    }
}
