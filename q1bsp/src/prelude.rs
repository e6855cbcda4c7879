pub use crate::bsp::{
    consts::LumpType,
    edges::{BSPEdge, BSPSurfEdge},
    face::BSPFace,
    header::BSPHeader,
    lightmap::LightingData,
    model::BSPModel,
    plane::BSPPlane,
    textures::{BSPMipTex, BSPTexInfo, TexInfoFlags},
    BSPData,
};
pub use crate::atlas::{LightmapAtlas, TextureAtlas, TextureAtlases, TextureSlot};
pub use crate::config::{ImportConfig, VertexSharing};
pub use crate::error::{BspError, ImportWarning};
pub use crate::import::{import_bytes, import_file, ImportResult};
pub use crate::meshes::{ModelMesh, SubMesh};
pub use crate::vertex::MapVertex;
