use std::path::Path;

use crate::{
    atlas::{LightmapAtlas, TextureAtlas, TextureAtlases, TextureSlot},
    bsp::{consts::LumpType, header::BSPHeader, BSPData},
    config::ImportConfig,
    error::{BspError, ImportWarning},
    meshes::{build_meshes, MapGeometry, ModelMesh},
};

/// Everything decoded from one map.
#[derive(Clone, Debug)]
pub struct ImportResult {
    pub version: i32,
    /// entity lump text, uninterpreted
    pub entities: String,
    /// one atlas per texture size
    pub textures: Vec<TextureAtlas>,
    /// atlas and layer of each texture, by texture directory index
    pub texture_slots: Box<[TextureSlot]>,
    pub lightmap: LightmapAtlas,
    /// in model order, without the models that failed to build
    pub models: Vec<ModelMesh>,
    pub warnings: Vec<ImportWarning>,
}

/// Imports a map held in memory.
pub fn import_bytes(data: &[u8], config: &ImportConfig) -> Result<ImportResult, BspError> {
    let mut warnings = Vec::new();

    let bsp = BSPData::parse(data, &mut warnings)?;

    let textures_ofs = bsp.header.get_lump_header(LumpType::Textures).file_ofs as usize;
    let TextureAtlases { atlases, slots } =
        TextureAtlases::build(&bsp.textures, textures_ofs, data, &mut warnings);

    let lightmap = LightmapAtlas::build(&bsp.lighting.samples);

    let geometry = MapGeometry {
        bsp: &bsp,
        slots: &slots,
        config,
    };
    let models = build_meshes(&geometry, &mut warnings);

    log::info!(
        "Imported {} of {} models, {} texture atlases, {}x{} lightmap, {} warnings",
        models.len(),
        bsp.models.len(),
        atlases.len(),
        lightmap.width,
        lightmap.height,
        warnings.len()
    );

    Ok(ImportResult {
        version: bsp.header.version,
        entities: bsp.entities,
        textures: atlases,
        texture_slots: slots,
        lightmap,
        models,
        warnings,
    })
}

/// Reads and imports a map file. The file is read once, and closed before decoding starts.
pub fn import_file(path: impl AsRef<Path>, config: &ImportConfig) -> Result<ImportResult, BspError> {
    let path = path.as_ref();
    log::info!("Loading {}", path.display());
    let data = BSPHeader::read_file(path)?;
    import_bytes(&data, config)
}
