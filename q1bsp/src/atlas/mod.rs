pub mod lightmap;
pub mod texture;

pub use lightmap::LightmapAtlas;
pub use texture::{TextureAtlas, TextureAtlases, TextureSlot};
