use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::OutOfRange;

use super::{
    consts::{LumpType, MAX_MAP_FACES},
    edges::{BSPEdge, BSPSurfEdge},
    Lump,
};

///Face
///
///The face array is limited to 65535 (MAX_MAP_FACES) entries.
///
///Faces are convex polygons. Each one lies on a plane, carries a texture projection and four light styles, and
/// points into the lightmap lump for its precomputed light samples.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BSPFace {
    /// the plane number, i.e. the index into the plane array of the plane this face lies on
    pub plane_num: i16,
    /// Side is zero if this plane faces in the same direction as the face (i.e. "out" of the face) or non-zero otherwise.
    pub side: i16,
    /// Firstedge is an index into the Surfedge array; this and the following numedges entries in the surfedge array define the edges of the face.
    /// Whether the value in the surfedge array is positive or negative indicates whether the corresponding pair of vertices listed
    /// in the Edge array should be traced from the first vertex to the second, or vice versa.
    pub first_edge: i32,
    /// number of surfedges
    pub num_edges: i16,
    ///Texinfo is an index into the Texinfo array, and represents the texture to be drawn on the face.
    pub tex_info: i16,
    /// switchable lighting info
    pub styles: [u8; 4],
    /// offset into lightmap lump. Passed through as stored, including negative values.
    pub light_ofs: i32,
}

impl BSPFace {
    /// Walks the face's surfedges and returns the first vertex of each directed edge.
    ///
    /// The loop is closed, so the second vertex of every edge is listed as the first vertex of the next one.
    pub fn get_verts(
        &self,
        edges: &[BSPEdge],
        surf_edges: &[BSPSurfEdge],
    ) -> Result<Vec<u16>, OutOfRange> {
        let count = self.num_edges.max(0) as i64;
        (0..count)
            .map(|i| -> Result<u16, OutOfRange> {
                let surf_edge = OutOfRange::get("surfedge", surf_edges, self.first_edge as i64 + i)?;
                Ok(surf_edge.get_edge(edges)?.0)
            })
            .collect()
    }

    pub fn is_degenerate(&self) -> bool {
        self.num_edges < 3
    }
}

impl Lump for BSPFace {
    const SIZE: usize = 20;

    fn max() -> usize {
        MAX_MAP_FACES
    }
    fn lump_type() -> LumpType {
        LumpType::Faces
    }
    fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let plane_num = reader.read_i16::<LittleEndian>()?;
        let side = reader.read_i16::<LittleEndian>()?;
        let first_edge = reader.read_i32::<LittleEndian>()?;
        let num_edges = reader.read_i16::<LittleEndian>()?;
        let tex_info = reader.read_i16::<LittleEndian>()?;
        let mut styles = [0; 4];
        reader.read_exact(&mut styles)?;
        let light_ofs = reader.read_i32::<LittleEndian>()?;

        Ok(Self {
            plane_num,
            side,
            first_edge,
            num_edges,
            tex_info,
            styles,
            light_ofs,
        })
    }
}
