use std::{
    io::{self, Read},
    ops::Range,
};

use byteorder::{LittleEndian, ReadBytesExt};
use flagset::{flags, FlagSet};
use glam::{vec2, Vec2, Vec3, Vec4};

use crate::error::BspError;

use super::{
    consts::{LumpType, MAX_MAP_TEXINFO, MAX_MAP_TEXTURES, MAX_TEXTURE_DIMENSION, MIP_LEVELS, TEXTURE_NAME_CHARS, TEXTURE_NAME_LENGTH},
    lump::BSPLump,
    Lump,
};

// Texinfo
//
// struct texinfo_t
// {
// 	float   vecs[2][4];    // [s/t][xyz offset]
// 	int     miptex;        // index into the texture directory
// 	int     flags;         // miptex flags overrides
// }
//
// Each texinfo is 40 bytes long.
//
// The two vectors, s and t, are the mapping of the left-to-right and down-to-up directions in the texture pixel
// coordinate space, onto the world. Each vector has an x, y, and z component, plus an offset which is the "shift" of
// the texture in that direction relative to the world.
//
// u = tv0,0 * x + tv0,1 * y + tv0,2 * z + tv0,3
//
// v = tv1,0 * x + tv1,1 * y + tv1,2 * z + tv1,3
//
// After calculating (u, v), divide by the width and height of the texture to get normalized coordinates.
//
// Lightmaps use the same vectors without the offsets, at one luxel per 16 units.

flags! {
    pub enum TexInfoFlags: i32 {
        /// sky or liquid: animated surface without a lightmap
        Special = 0x1,
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BSPTexInfo {
    /// [s][xyz offset]
    pub tex_s: Vec4,
    /// [t][xyz offset]
    pub tex_t: Vec4,
    /// index into the texture directory
    pub texture: i32,
    pub flags: i32,
}

impl BSPTexInfo {
    /// Texel-space coordinates of `vertex`, including the texture shift.
    pub fn project(&self, vertex: Vec3) -> Vec2 {
        let p = Vec4::from((vertex, 1.0));
        vec2(self.tex_s.dot(p), self.tex_t.dot(p))
    }

    /// Projection onto the S/T axes without the shift, as used for lightmaps.
    pub fn project_lightmap(&self, vertex: Vec3) -> Vec2 {
        vec2(vertex.dot(self.tex_s.truncate()), vertex.dot(self.tex_t.truncate()))
    }

    pub fn flags(&self) -> FlagSet<TexInfoFlags> {
        FlagSet::new_truncated(self.flags)
    }
}

impl Lump for BSPTexInfo {
    const SIZE: usize = 40;

    fn max() -> usize {
        MAX_MAP_TEXINFO
    }
    fn lump_type() -> LumpType {
        LumpType::TexInfo
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut vecs = [0.0; 8];
        reader.read_f32_into::<LittleEndian>(&mut vecs)?;
        Ok(Self {
            tex_s: Vec4::from_slice(&vecs[..4]),
            tex_t: Vec4::from_slice(&vecs[4..]),
            texture: reader.read_i32::<LittleEndian>()?,
            flags: reader.read_i32::<LittleEndian>()?,
        })
    }
}

/// Size of a texture header inside the texture lump: name, width, height and four mip offsets.
pub const MIPTEX_HEADER_SIZE: usize = TEXTURE_NAME_LENGTH + 8 + MIP_LEVELS * 4;

///Miptex
///
///The texture lump starts with a directory: a count followed by one offset per texture, relative to the start of the
/// lump. Each offset locates a header holding the name, the dimensions and the offsets (relative to the header) of
/// the four mip levels of 8-bit palettized pixels. An offset of -1 marks a texture the compiler could not find.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BSPMipTex {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// offset of the header, relative to the texture lump
    pub offset: u32,
    /// offsets of the mip levels, relative to the header
    pub mip_offsets: [u32; MIP_LEVELS],
}

impl BSPMipTex {
    /// Textures with equal dimensions can share a texture array.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_valid(&self) -> bool {
        (1..MAX_TEXTURE_DIMENSION).contains(&self.width)
            && (1..MAX_TEXTURE_DIMENSION).contains(&self.height)
    }

    pub fn mip_size(&self, mip: usize) -> (usize, usize) {
        ((self.width >> mip) as usize, (self.height >> mip) as usize)
    }

    /// Bytes taken by all mip levels together, or `None` on overflow.
    pub fn mip_chain_size(&self) -> Option<usize> {
        (0..MIP_LEVELS).try_fold(0usize, |total, mip| {
            let (w, h) = self.mip_size(mip);
            total.checked_add(w.checked_mul(h)?)
        })
    }

    /// Byte range of mip level `mip` inside the file, given the texture lump's file offset.
    pub fn mip_range(&self, mip: usize, lump_ofs: usize) -> Option<Range<usize>> {
        let (w, h) = self.mip_size(mip);
        let start = lump_ofs
            .checked_add(self.offset as usize)?
            .checked_add(self.mip_offsets[mip] as usize)?;
        Some(start..start.checked_add(w.checked_mul(h)?)?)
    }

    fn read<R: Read>(reader: &mut R, offset: u32) -> io::Result<Self> {
        let mut name = [0u8; TEXTURE_NAME_LENGTH];
        reader.read_exact(&mut name)?;
        let name = &name[..TEXTURE_NAME_CHARS];
        let end = name.iter().position(|&c| c == 0).unwrap_or(name.len());

        let width = reader.read_u32::<LittleEndian>()?;
        let height = reader.read_u32::<LittleEndian>()?;
        let mut mip_offsets = [0; MIP_LEVELS];
        reader.read_u32_into::<LittleEndian>(&mut mip_offsets)?;

        Ok(Self {
            name: String::from_utf8_lossy(&name[..end]).into_owned(),
            width,
            height,
            offset,
            mip_offsets,
        })
    }

    /// Reads the texture directory and every texture header it lists.
    pub fn read_directory(lump: &BSPLump, data: &[u8]) -> Result<Box<[Self]>, BspError> {
        let bytes = lump.bytes(LumpType::Textures, data)?;
        if bytes.is_empty() {
            return Ok(Box::default());
        }
        if bytes.len() < 4 {
            return Err(BspError::malformed(
                LumpType::Textures,
                "lump too short for a texture count",
            ));
        }

        let mut reader = bytes;
        let count = reader.read_i32::<LittleEndian>()?;
        let count = usize::try_from(count).map_err(|_| {
            BspError::malformed(LumpType::Textures, format!("negative texture count {count}"))
        })?;
        if (bytes.len() - 4) / 4 < count {
            return Err(BspError::malformed(
                LumpType::Textures,
                format!("directory of {count} textures does not fit in {} bytes", bytes.len()),
            ));
        }
        if count > MAX_MAP_TEXTURES {
            log::warn!("{count} textures, more than the engine limit of {MAX_MAP_TEXTURES}");
        }

        let mut offsets = vec![0i32; count];
        reader.read_i32_into::<LittleEndian>(&mut offsets)?;

        let mut textures = Vec::with_capacity(count);
        for (i, ofs) in offsets.into_iter().enumerate() {
            let Ok(ofs) = usize::try_from(ofs) else {
                log::debug!("Texture {i}: missing");
                textures.push(Self::default());
                continue;
            };
            let Some(mut header) = bytes.get(ofs..).filter(|h| h.len() >= MIPTEX_HEADER_SIZE) else {
                return Err(BspError::malformed(
                    LumpType::Textures,
                    format!("texture {i} header at {ofs} lies outside the lump"),
                ));
            };
            let texture = Self::read(&mut header, ofs as u32)?;
            log::debug!("Texture {i}: {} {}x{}", texture.name, texture.width, texture.height);
            textures.push(texture);
        }

        Ok(textures.into_boxed_slice())
    }
}
