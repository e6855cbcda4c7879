pub mod consts;
pub mod edges;
pub mod face;
pub mod header;
pub mod lightmap;
pub mod lump;
pub mod model;
pub mod plane;
pub mod textures;
pub mod vert;

pub use lump::Lump;

use glam::Vec3;

use crate::error::{BspError, ImportWarning};

use self::{
    consts::{LumpType, MAX_MAP_ENTSTRING},
    edges::{BSPEdge, BSPSurfEdge},
    face::BSPFace,
    header::BSPHeader,
    lightmap::LightingData,
    model::BSPModel,
    plane::BSPPlane,
    textures::{BSPMipTex, BSPTexInfo},
};

// https://www.gamers.org/dEngine/quake/spec/quake-spec34/qkspec_4.htm
//
// A Quake map is a single little-endian file. It starts with the format version and a directory of fifteen lumps,
// each an offset and a length in bytes. The lumps hold the entity text, the geometry (vertices, edges, surfedges,
// planes, faces), the texture projections and the palettized textures themselves, the lightmap samples, the BSP
// tree used for collision and visibility, and the models: the world and every brush entity.
//
// The lumps may appear in any order in the file, and only the directory says where they are.

/// Every lump the importer reads, decoded from one map buffer.
#[derive(Clone, Debug, Default)]
pub struct BSPData {
    pub header: BSPHeader,
    pub entities: String,
    pub planes: Box<[BSPPlane]>,
    pub textures: Box<[BSPMipTex]>,
    pub verts: Box<[Vec3]>,
    pub tex_info: Box<[BSPTexInfo]>,
    pub faces: Box<[BSPFace]>,
    pub lighting: LightingData,
    pub edges: Box<[BSPEdge]>,
    pub surf_edges: Box<[BSPSurfEdge]>,
    pub models: Box<[BSPModel]>,
}

impl BSPData {
    pub fn parse(data: &[u8], warnings: &mut Vec<ImportWarning>) -> Result<Self, BspError> {
        let header = BSPHeader::parse(data)?;

        if let Some(warning) = header.validate() {
            warning.report(warnings);
        }

        let entities = header.entities(data)?;
        if entities.len() > MAX_MAP_ENTSTRING {
            log::warn!(
                "{} bytes of entities, more than the engine limit of {MAX_MAP_ENTSTRING}",
                entities.len()
            );
        }

        let bsp = Self {
            entities,
            planes: header.get_lump(data)?,
            textures: BSPMipTex::read_directory(header.get_lump_header(LumpType::Textures), data)?,
            verts: header.get_lump(data)?,
            tex_info: header.get_lump(data)?,
            faces: header.get_lump(data)?,
            lighting: LightingData::new(header.get_lump_bytes(LumpType::Lighting, data)?),
            edges: header.get_lump(data)?,
            surf_edges: header.get_lump(data)?,
            models: header.get_lump(data)?,
            header,
        };

        log::info!(
            "Loaded BSP version {}: {} models, {} faces, {} vertices, {} textures, {} bytes of lighting",
            bsp.header.version,
            bsp.models.len(),
            bsp.faces.len(),
            bsp.verts.len(),
            bsp.textures.len(),
            bsp.lighting.len()
        );

        Ok(bsp)
    }
}
