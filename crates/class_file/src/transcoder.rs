use std::{
    convert::TryFrom,
    io::{self, BufReader, BufWriter, Read, Write},
};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace};

use crate::{
    class_file::ClassFileHeader,
    constant_pool::{CpEntry, CpTag},
    report::{Hit, MemberReport},
    ClassFileError, Mode, Result,
};

type Endian = BigEndian;

/// Walks the constant pool of one class file at a time, optionally writing a transformed copy
/// in lock-step with the input.
pub struct Transcoder {
    mode: Mode,
    buf: Vec<u8>,
}
impl Transcoder {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            buf: Vec::with_capacity(u16::MAX as usize),
        }
    }

    /// Transcodes the class file read from `r`. When `w` is given it receives the complete
    /// class file: unchanged in `Scan` and `Filter` mode, with substitutions applied in
    /// `Rewrite` mode. Nothing is written unless the header is valid.
    pub fn transcode<R: Read, W: Write>(
        &mut self,
        name: &str,
        r: R,
        w: Option<W>,
    ) -> Result<MemberReport> {
        let mut stream = Stream {
            r: BufReader::new(r),
            w: w.map(BufWriter::new),
        };
        let mut report = MemberReport::new(name);

        let header = ClassFileHeader::read(&mut stream.r)?;
        debug!("{}: {}", name, header);
        if let Some(w) = stream.w.as_mut() {
            header.write(w)?;
        }

        let mut index = 1u32;
        while index < header.constant_pool_count as u32 {
            let tag = CpTag::try_from(stream.read_u8()?)
                .map_err(ClassFileError::InvalidCpInfoTag)?;
            stream.echo_u8(tag as u8)?;

            match stream.read_entry(tag, &mut self.buf)? {
                CpEntry::Utf8(bytes) => {
                    trace!("#{} Utf8 ({} bytes)", index, bytes.len());
                    transcode_utf8(
                        &self.mode,
                        index as u16,
                        bytes,
                        &mut stream,
                        &mut report,
                    )?;
                }
                CpEntry::Opaque { tag, payload } => {
                    trace!("#{} {:?}", index, tag);
                    stream.echo(payload)?;
                }
            }

            index += tag.slot_size();
        }

        stream.finish()?;
        Ok(report)
    }
}

fn transcode_utf8<R: Read, W: Write>(
    mode: &Mode,
    index: u16,
    bytes: &[u8],
    stream: &mut Stream<R, W>,
    report: &mut MemberReport,
) -> Result<()> {
    match mode {
        Mode::Scan => {
            report.push(Hit::Listed {
                index,
                value: bytes.to_vec(),
            });
            stream.echo_utf8(index, bytes)
        }
        Mode::Filter(pattern) => {
            if pattern.is_match(bytes) {
                report.push(Hit::Listed {
                    index,
                    value: bytes.to_vec(),
                });
            }
            stream.echo_utf8(index, bytes)
        }
        Mode::Rewrite(substitution) => {
            let result = substitution.apply(bytes);
            // Checked in dry runs too
            let length = utf8_length(index, &result.rewritten)?;
            if result.changed {
                report.push(Hit::Changed {
                    index,
                    original: result.original.to_vec(),
                    rewritten: result.rewritten.to_vec(),
                });
            }
            stream.echo_u16(length)?;
            stream.echo(&result.rewritten)
        }
    }
}

fn utf8_length(index: u16, bytes: &[u8]) -> Result<u16> {
    u16::try_from(bytes.len()).map_err(|_| ClassFileError::Utf8LengthOverflow {
        index,
        length: bytes.len(),
    })
}

struct Stream<R, W: Write> {
    r: BufReader<R>,
    w: Option<BufWriter<W>>,
}
impl<R: Read, W: Write> Stream<R, W> {
    fn read_entry<'b>(&mut self, tag: CpTag, buf: &'b mut Vec<u8>) -> Result<CpEntry<'b>> {
        match tag.payload_len() {
            None => {
                let length = self.read_u16()?;
                Ok(CpEntry::Utf8(self.read_bytes(length as usize, buf)?))
            }
            Some(length) => Ok(CpEntry::Opaque {
                tag,
                payload: self.read_bytes(length, buf)?,
            }),
        }
    }

    fn read_bytes<'b>(&mut self, length: usize, buf: &'b mut Vec<u8>) -> Result<&'b [u8]> {
        buf.clear();
        buf.resize(length, 0);
        self.r.read_exact(buf)?;

        Ok(&buf[..])
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(self.r.read_u16::<Endian>()?)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.r.read_u8()?)
    }

    fn echo_utf8(&mut self, index: u16, bytes: &[u8]) -> Result<()> {
        self.echo_u16(utf8_length(index, bytes)?)?;
        self.echo(bytes)
    }

    fn echo_u16(&mut self, value: u16) -> Result<()> {
        if let Some(w) = self.w.as_mut() {
            w.write_u16::<Endian>(value)?;
        }
        Ok(())
    }

    fn echo_u8(&mut self, value: u8) -> Result<()> {
        if let Some(w) = self.w.as_mut() {
            w.write_u8(value)?;
        }
        Ok(())
    }

    fn echo(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(w) = self.w.as_mut() {
            w.write_all(bytes)?;
        }
        Ok(())
    }

    /// Copies the rest of the class file, everything after the constant pool, verbatim.
    fn finish(mut self) -> Result<()> {
        if let Some(mut w) = self.w.take() {
            io::copy(&mut self.r, &mut w)?;
            w.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod transcode_tests {
    use std::io::{self, Cursor};

    use super::*;

    const HEADER: [u8; 8] = [0xca, 0xfe, 0xba, 0xbe, 0x00, 0x00, 0x00, 0x34];

    fn class_file(constant_pool_count: u16, pool: &[u8]) -> Vec<u8> {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(&constant_pool_count.to_be_bytes());
        bytes.extend_from_slice(pool);
        bytes
    }

    #[test]
    fn it_should_accept_an_empty_constant_pool() {
        let bytes = class_file(1, &[0x00, 0x21]);
        let mut out = Vec::new();

        let report = Transcoder::new(Mode::scan())
            .transcode("A.class", Cursor::new(&bytes), Some(&mut out))
            .unwrap();

        assert!(report.is_empty());
        assert_eq!(out, bytes);
    }

    #[test]
    fn it_should_tolerate_a_zero_constant_pool_count() {
        let bytes = class_file(0, &[]);

        assert!(Transcoder::new(Mode::scan())
            .transcode("A.class", Cursor::new(&bytes), None::<io::Sink>)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn it_should_fail_on_an_unknown_tag() {
        let bytes = class_file(2, &[0x02, 0x00, 0x00]);

        assert!(matches!(
            Transcoder::new(Mode::scan()).transcode(
                "A.class",
                Cursor::new(&bytes),
                None::<io::Sink>
            ),
            Err(ClassFileError::InvalidCpInfoTag(2))
        ));
    }

    #[test]
    fn it_should_fail_if_a_utf8_entry_is_cut_short() {
        let bytes = class_file(2, &[0x01, 0x00, 0x05, b'a', b'b']);

        assert!(matches!(
            Transcoder::new(Mode::scan()).transcode(
                "A.class",
                Cursor::new(&bytes),
                None::<io::Sink>
            ),
            Err(ClassFileError::Truncated)
        ));
    }

    #[test]
    fn it_should_fail_if_the_pool_ends_early() {
        let bytes = class_file(3, &[0x07, 0x00, 0x01]);

        assert!(matches!(
            Transcoder::new(Mode::scan()).transcode(
                "A.class",
                Cursor::new(&bytes),
                None::<io::Sink>
            ),
            Err(ClassFileError::Truncated)
        ));
    }

    #[test]
    fn it_should_reject_a_rewrite_that_no_longer_fits() {
        let bytes = class_file(2, &[0x01, 0x00, 0x01, b'x']);
        let replacement = vec![b'y'; u16::MAX as usize + 1];

        match Transcoder::new(Mode::rewrite("x", replacement).unwrap()).transcode(
            "A.class",
            Cursor::new(&bytes),
            None::<io::Sink>,
        ) {
            Err(ClassFileError::Utf8LengthOverflow { index, length }) => {
                assert_eq!(index, 1);
                assert_eq!(length, 65536);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn it_should_accept_a_rewrite_that_exactly_fits() {
        let bytes = class_file(2, &[0x01, 0x00, 0x01, b'x']);
        let replacement = vec![b'y'; u16::MAX as usize];
        let mut out = Vec::new();

        Transcoder::new(Mode::rewrite("x", replacement).unwrap())
            .transcode("A.class", Cursor::new(&bytes), Some(&mut out))
            .unwrap();

        assert_eq!(&out[10..13], &[0x01, 0xff, 0xff]);
        assert_eq!(out.len(), 13 + u16::MAX as usize);
    }
}
