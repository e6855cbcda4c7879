use glam::{Vec2, Vec3};

/// One vertex of an imported map mesh, laid out for direct upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MapVertex {
    pub position: Vec3,
    pub normal: Vec3,
    /// the face's four light styles
    pub color: [u8; 4],
    pub uv: Vec2,
    /// in luxels, relative to the face's lightmap patch
    pub lightmap_uv: Vec2,
    /// patch width, patch height, then the bits of the lightmap offset and of the texture layer
    pub lightmap_info: [f32; 4],
}

impl MapVertex {
    /// Lightmap byte offset stored in [`Self::lightmap_info`].
    pub fn light_ofs(&self) -> i32 {
        bytemuck::cast(self.lightmap_info[2])
    }

    /// Texture array layer stored in [`Self::lightmap_info`].
    pub fn layer(&self) -> i32 {
        bytemuck::cast(self.lightmap_info[3])
    }
}
