use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::BspError;

use super::consts::LumpType;

/// A fixed-size record stored in one of the map's lumps.
pub trait Lump
where
    Self: Sized,
{
    /// Size of one record on disk, in bytes.
    const SIZE: usize;

    fn max() -> usize;
    fn lump_type() -> LumpType;
    fn read<R: Read>(reader: &mut R) -> io::Result<Self>;
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BSPLump {
    pub file_ofs: i32, // offset into file (bytes)
    pub file_len: i32, // length of lump (bytes)
}

impl BSPLump {
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            file_ofs: reader.read_i32::<LittleEndian>()?,
            file_len: reader.read_i32::<LittleEndian>()?,
        })
    }

    /// Byte range of this lump, checked against a file of `file_size` bytes.
    pub fn range(&self, lump: LumpType, file_size: usize) -> Result<Range<usize>, BspError> {
        if self.file_ofs < 0 || self.file_len < 0 {
            return Err(BspError::malformed(
                lump,
                format!(
                    "negative offset {} or length {}",
                    self.file_ofs, self.file_len
                ),
            ));
        }
        let start = self.file_ofs as usize;
        let end = start.saturating_add(self.file_len as usize);
        if end > file_size {
            return Err(BspError::malformed(
                lump,
                format!("range {start}..{end} exceeds file size {file_size}"),
            ));
        }
        Ok(start..end)
    }

    pub fn bytes<'a>(&self, lump: LumpType, data: &'a [u8]) -> Result<&'a [u8], BspError> {
        Ok(&data[self.range(lump, data.len())?])
    }

    pub fn decode<T: Lump>(&self, data: &[u8]) -> Result<Box<[T]>, BspError> {
        let bytes = self.bytes(T::lump_type(), data)?;

        if bytes.len() % T::SIZE != 0 {
            return Err(BspError::malformed(
                T::lump_type(),
                format!(
                    "length {} is not a multiple of the {} byte record size",
                    bytes.len(),
                    T::SIZE
                ),
            ));
        }

        let len = bytes.len() / T::SIZE;

        if u32::try_from(len).is_err() {
            return Err(BspError::SizeLimit(format!(
                "{:?} lump holds {len} records",
                T::lump_type()
            )));
        }
        if len > T::max() {
            log::warn!(
                "{:?} lump holds {len} records, more than the engine limit of {}",
                T::lump_type(),
                T::max()
            );
        }

        let mut reader = bytes;
        let table = (0..len)
            .map(|_| T::read(&mut reader))
            .collect::<io::Result<Box<[T]>>>()?;

        Ok(table)
    }
}
