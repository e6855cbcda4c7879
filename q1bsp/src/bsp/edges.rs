use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::OutOfRange;

use super::{
    consts::{LumpType, MAX_MAP_EDGES, MAX_MAP_SURFEDGES},
    Lump,
};

///Edge
///
///Each edge is simply a pair of vertex indices (which index into the vertex lump array). The edge is defined as the
/// straight line between the two vertices. Usually, the edge array is referenced through the Surfedge array (see below).
///
///Edge 0 is never referenced by a surfedge, since its sign could not carry a direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BSPEdge {
    pub v0: u16, // vertex indices
    pub v1: u16, // vertex indices
}

impl Lump for BSPEdge {
    const SIZE: usize = 4;

    fn max() -> usize {
        MAX_MAP_EDGES
    }
    fn lump_type() -> LumpType {
        LumpType::Edges
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            v0: reader.read_u16::<LittleEndian>()?,
            v1: reader.read_u16::<LittleEndian>()?,
        })
    }
}

///Surfedge
///
///The value in the surfedge array can be positive or negative. The absolute value of this number is an index into the edge array:
/// if positive, it means the edge is defined from the first to the second vertex; if negative, from the second to the first vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BSPSurfEdge {
    pub index: i32,
}

impl Lump for BSPSurfEdge {
    const SIZE: usize = 4;

    fn max() -> usize {
        MAX_MAP_SURFEDGES
    }
    fn lump_type() -> LumpType {
        LumpType::SurfEdges
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            index: reader.read_i32::<LittleEndian>()?,
        })
    }
}

impl BSPSurfEdge {
    /// The referenced edge's vertices, in traversal order.
    pub fn get_edge(&self, edges: &[BSPEdge]) -> Result<(u16, u16), OutOfRange> {
        let id = self.index.unsigned_abs() as usize;
        let edge = edges
            .get(id)
            .ok_or(OutOfRange::new("edge", id as i64, edges.len()))?;
        Ok(if self.index < 0 {
            (edge.v1, edge.v0)
        } else {
            (edge.v0, edge.v1)
        })
    }
}
