use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::{vec3, Vec3};

use super::{
    consts::{LumpType, MAX_MAP_VERTS},
    Lump,
};

pub fn read_vec3<R: Read>(reader: &mut R) -> io::Result<Vec3> {
    Ok(vec3(
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
        reader.read_f32::<LittleEndian>()?,
    ))
}

/// Swaps file space (Z up) into Y up.
pub fn swizzle(v: Vec3) -> Vec3 {
    vec3(v.x, v.z, v.y)
}

impl Lump for Vec3 {
    const SIZE: usize = 12;

    fn max() -> usize {
        MAX_MAP_VERTS
    }
    fn lump_type() -> LumpType {
        LumpType::Vertexes
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        read_vec3(reader)
    }
}
