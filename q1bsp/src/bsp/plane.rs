use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;

use super::{
    consts::{LumpType, MAX_MAP_PLANES},
    vert::read_vec3,
    Lump,
};

///Plane
///
/// The plane is represented by the element normal, a vector perpendicular to the plane's surface. Compilers write
/// it normalized, but nothing in the format guarantees it. The position of the plane is given by dist, which is the
/// distance from the map origin (0,0,0) to the nearest point on the plane.
///
/// `Ax + By + Cz = D`
///
/// The type member contains the axis that the plane is facing. 0, 1, and 2 correspond with X, Y, and Z; 3, 4 and 5
/// are used when planes are not along an axis, with each number corresponding to the axis it is closest to.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BSPPlane {
    pub normal: Vec3, // normal vector
    pub dist: f32,    // distance from origin
    pub axis: i32,    // plane axis identifier
}

impl Lump for BSPPlane {
    const SIZE: usize = 20;

    fn max() -> usize {
        MAX_MAP_PLANES
    }
    fn lump_type() -> LumpType {
        LumpType::Planes
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            normal: read_vec3(reader)?,
            dist: reader.read_f32::<LittleEndian>()?,
            axis: reader.read_i32::<LittleEndian>()?,
        })
    }
}
