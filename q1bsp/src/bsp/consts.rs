use num_derive::FromPrimitive;

pub const HEADER_LUMPS: usize = 15;

/// version word + one (offset, length) pair per lump
pub const HEADER_SIZE: usize = 4 + HEADER_LUMPS * 8;

pub const BSP_VERSION_QUAKE: i32 = 29;
pub const BSP_VERSION_GOLDSRC: i32 = 30;

// upper design bounds
pub const MAX_MAP_MODELS: usize = 256;
pub const MAX_MAP_PLANES: usize = 32767;
pub const MAX_MAP_VERTS: usize = 65535;
pub const MAX_MAP_FACES: usize = 65535;
pub const MAX_MAP_TEXINFO: usize = 4096;
pub const MAX_MAP_EDGES: usize = 256000;
pub const MAX_MAP_SURFEDGES: usize = 512000;
pub const MAX_MAP_TEXTURES: usize = 512;
pub const MAX_MAP_LIGHTING: usize = 0x100000;
pub const MAX_MAP_ENTSTRING: usize = 0x40000;

pub const MIP_LEVELS: usize = 4;
pub const TEXTURE_NAME_LENGTH: usize = 16;
/// Only this many bytes of the name field are meaningful.
pub const TEXTURE_NAME_CHARS: usize = 12;

/// Textures at or beyond this width are considered corrupt.
pub const MAX_TEXTURE_DIMENSION: u32 = 4096;

/// World units covered by one lightmap luxel.
pub const LIGHTMAP_TEXEL_SIZE: f32 = 16.0;

#[derive(Copy, Clone, FromPrimitive, Debug, PartialEq, Eq, Hash)]
pub enum LumpType {
    Entities = 0,
    Planes = 1,
    Textures = 2,
    Vertexes = 3,
    Visibility = 4,
    Nodes = 5,
    TexInfo = 6,
    Faces = 7,
    Lighting = 8,
    ClipNodes = 9,
    Leafs = 10,
    MarkSurfaces = 11,
    Edges = 12,
    SurfEdges = 13,
    Models = 14,
}
