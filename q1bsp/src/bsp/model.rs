use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;

use super::{
    consts::{LumpType, MAX_MAP_MODELS},
    vert::read_vec3,
    Lump,
};

///Model
///
///A model is a collection of brushes: model 0 is the static world, the others are brush entities (doors, platforms,
/// triggers) placed by the entity lump through their `*n` model key. Each one owns a contiguous range of faces.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BSPModel {
    pub mins: Vec3,
    pub maxs: Vec3, // bounding box
    pub origin: Vec3,
    pub head_nodes: [i32; 4], // index into node array
    pub vis_leafs: i32,       // not including the solid leaf 0
    pub first_face: i32,
    pub num_faces: i32, // index into face array
}

impl BSPModel {
    /// Face indices owned by this model. Negative fields give an empty range.
    pub fn faces(&self) -> std::ops::Range<usize> {
        let first = self.first_face.max(0) as usize;
        first..first + self.num_faces.max(0) as usize
    }
}

impl Lump for BSPModel {
    const SIZE: usize = 64;

    fn max() -> usize {
        MAX_MAP_MODELS
    }
    fn lump_type() -> LumpType {
        LumpType::Models
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mins = read_vec3(reader)?;
        let maxs = read_vec3(reader)?;
        let origin = read_vec3(reader)?;
        let mut head_nodes = [0; 4];
        reader.read_i32_into::<LittleEndian>(&mut head_nodes)?;

        Ok(Self {
            mins,
            maxs,
            origin,
            head_nodes,
            vis_leafs: reader.read_i32::<LittleEndian>()?,
            first_face: reader.read_i32::<LittleEndian>()?,
            num_faces: reader.read_i32::<LittleEndian>()?,
        })
    }
}
