use std::{fmt, fs, path::Path};

use byteorder::{LittleEndian, ReadBytesExt};
use num_traits::FromPrimitive;

use crate::error::{BspError, ImportWarning};

use super::{
    consts::{LumpType, BSP_VERSION_GOLDSRC, BSP_VERSION_QUAKE, HEADER_LUMPS, HEADER_SIZE},
    lump::{BSPLump, Lump},
};

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct BSPHeader {
    pub version: i32,                   // BSP file version
    pub lumps: [BSPLump; HEADER_LUMPS], // lump directory array
}

impl fmt::Debug for BSPHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BSPHeader")
            .field("version", &self.version)
            .finish()
    }
}

impl BSPHeader {
    /// Reads the whole map into memory without decoding it. The file handle is closed on return.
    pub fn read_file(path: &Path) -> Result<Box<[u8]>, BspError> {
        let size = fs::metadata(path)?.len();
        if size > i32::MAX as u64 {
            return Err(BspError::SizeLimit(format!(
                "{} is {size} bytes",
                path.display()
            )));
        }
        Ok(fs::read(path)?.into_boxed_slice())
    }

    pub fn parse(data: &[u8]) -> Result<Self, BspError> {
        if data.len() > i32::MAX as usize {
            return Err(BspError::SizeLimit(format!(
                "map buffer is {} bytes",
                data.len()
            )));
        }
        if data.len() < HEADER_SIZE {
            return Err(BspError::malformed(
                LumpType::Entities,
                format!(
                    "file is {} bytes, shorter than the {HEADER_SIZE} byte header",
                    data.len()
                ),
            ));
        }

        let mut reader = data;
        let mut header = Self {
            version: reader.read_i32::<LittleEndian>()?,
            ..Default::default()
        };
        for (i, lump) in header.lumps.iter_mut().enumerate() {
            *lump = BSPLump::read(&mut reader)?;

            let lump_type = LumpType::from_usize(i).unwrap_or(LumpType::Entities);
            lump.range(lump_type, data.len())?;

            log::debug!(
                "{: <14} offset = 0x{:>08x} | size = 0x{:>08x}",
                format!("{lump_type:?}:"),
                lump.file_ofs,
                lump.file_len
            );
        }

        Ok(header)
    }

    pub fn get_lump_header(&self, lump: LumpType) -> &BSPLump {
        &self.lumps[lump as usize]
    }

    pub fn get_lump<T: Lump>(&self, data: &[u8]) -> Result<Box<[T]>, BspError> {
        self.get_lump_header(T::lump_type()).decode(data)
    }

    pub fn get_lump_bytes<'a>(&self, lump: LumpType, data: &'a [u8]) -> Result<&'a [u8], BspError> {
        self.get_lump_header(lump).bytes(lump, data)
    }

    /// Entity lump text, up to its terminating nul.
    pub fn entities(&self, data: &[u8]) -> Result<String, BspError> {
        let bytes = self.get_lump_bytes(LumpType::Entities, data)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    pub fn validate(&self) -> Option<ImportWarning> {
        match self.version {
            BSP_VERSION_QUAKE | BSP_VERSION_GOLDSRC => None,
            version => Some(ImportWarning::UnexpectedVersion(version)),
        }
    }
}
