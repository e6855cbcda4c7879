use ahash::AHashMap;
use glam::{vec2, Vec2, Vec3};
use rayon::prelude::*;

use crate::{
    bsp::{consts::LIGHTMAP_TEXEL_SIZE, vert::swizzle},
    error::OutOfRange,
    prelude::*,
};

/// Triangles of one model drawn with one texture atlas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubMesh {
    /// index into the texture atlases
    pub bin: usize,
    pub indices: Vec<u32>,
}

impl SubMesh {
    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelMesh {
    pub model: usize,
    pub vertices: Vec<MapVertex>,
    pub submeshes: Vec<SubMesh>,
    /// Y-up and multiplied by the import scale, like the vertices
    pub origin: Vec3,
    /// bounds in the same space as `origin`
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl ModelMesh {
    pub fn tri_count(&self) -> usize {
        self.submeshes.iter().map(SubMesh::tri_count).sum()
    }
}

/// Accumulates the vertices of one model and its per-atlas index buffers.
pub struct MeshBuilder {
    sharing: VertexSharing,
    verts: Vec<MapVertex>,
    /// map vertex to local vertex
    vert_map: AHashMap<u16, u32>,
    submeshes: Vec<SubMesh>,
    /// atlas bin to submesh
    submesh_map: AHashMap<usize, usize>,
}

impl MeshBuilder {
    pub fn new(sharing: VertexSharing) -> Self {
        Self {
            sharing,
            verts: Vec::new(),
            vert_map: AHashMap::new(),
            submeshes: Vec::new(),
            submesh_map: AHashMap::new(),
        }
    }

    /// Submesh drawing with atlas `bin`, created on first use.
    pub fn submesh(&mut self, bin: usize) -> usize {
        *self.submesh_map.entry(bin).or_insert_with(|| {
            self.submeshes.push(SubMesh {
                bin,
                indices: Vec::new(),
            });
            self.submeshes.len() - 1
        })
    }

    /// Adds map vertex `index`, returning its local index. When vertices are shared, an existing vertex is returned
    /// untouched.
    pub fn add_vert(&mut self, index: u16, vertex: MapVertex) -> u32 {
        let next = self.verts.len() as u32;
        match self.sharing {
            VertexSharing::FirstWins => {
                let local = *self.vert_map.entry(index).or_insert(next);
                if local == next {
                    self.verts.push(vertex);
                }
                local
            }
            VertexSharing::PerFace => {
                self.verts.push(vertex);
                next
            }
        }
    }

    pub fn add_tri(&mut self, submesh: usize, tri: [u32; 3]) {
        self.submeshes[submesh].indices.extend_from_slice(&tri);
    }

    /// Triangulates a convex polygon as a fan around its first vertex.
    pub fn add_fan(&mut self, submesh: usize, polygon: &[u32]) {
        for v in 0..polygon.len().saturating_sub(2) {
            self.add_tri(submesh, [polygon[0], polygon[v + 1], polygon[v + 2]]);
        }
    }
}

/// Everything the mesh builders read, shared by all models.
pub struct MapGeometry<'a> {
    pub bsp: &'a BSPData,
    /// indexed by texture directory index
    pub slots: &'a [TextureSlot],
    pub config: &'a ImportConfig,
}

struct FaceTexture<'a> {
    info: &'a BSPTexInfo,
    texture: &'a BSPMipTex,
    slot: TextureSlot,
}

impl<'a> MapGeometry<'a> {
    fn face_texture(&self, model: usize, i_face: usize, face: &BSPFace) -> Result<FaceTexture<'a>, BspError> {
        let unresolved = |index: i64| BspError::UnresolvedTextureIndex {
            model,
            face: i_face,
            index,
        };
        let bsp = self.bsp;
        let info = OutOfRange::get("texinfo", &bsp.tex_info, face.tex_info as i64)
            .map_err(|e| unresolved(e.index))?;
        let texture = OutOfRange::get("texture", &bsp.textures, info.texture as i64)
            .map_err(|e| unresolved(e.index))?;
        let slot = *OutOfRange::get("texture", self.slots, info.texture as i64)
            .map_err(|e| unresolved(e.index))?;
        Ok(FaceTexture {
            info,
            texture,
            slot,
        })
    }

    /// Builds the mesh of model `index`. Warnings are logged and added to `warnings`.
    pub fn build_model_mesh(
        &self,
        index: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> Result<ModelMesh, BspError> {
        let bsp = self.bsp;
        let model = &bsp.models[index];
        let scale = self.config.scale;

        let faces = model
            .faces()
            .map(|i_face| {
                OutOfRange::get("face", &bsp.faces, i_face as i64)
                    .map(|face| (i_face, face))
                    .map_err(|e| e.at(index, i_face))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = MeshBuilder::new(self.config.vertex_sharing);

        // submeshes are numbered in order of first use, before any face is skipped
        let mut face_textures = Vec::with_capacity(faces.len());
        for &(i_face, face) in &faces {
            let texture = self.face_texture(index, i_face, face)?;
            let submesh = builder.submesh(texture.slot.bin);
            face_textures.push((texture, submesh));
        }

        let mut polygon = Vec::new();
        for (&(i_face, face), (texture, submesh)) in faces.iter().zip(face_textures) {
            if face.is_degenerate() {
                ImportWarning::DegenerateFace {
                    model: index,
                    face: i_face,
                    edges: face.num_edges,
                }
                .report(warnings);
                continue;
            }

            let plane = OutOfRange::get("plane", &bsp.planes, face.plane_num as i64)
                .map_err(|e| e.at(index, i_face))?;
            let mut normal = swizzle(plane.normal);
            if face.side != 0 {
                normal = -normal;
            }
            let normal = normal.normalize_or_zero();

            let tex_size = vec2(
                texture.texture.width.max(1) as f32,
                texture.texture.height.max(1) as f32,
            );

            let face_verts = face
                .get_verts(&bsp.edges, &bsp.surf_edges)
                .map_err(|e| e.at(index, i_face))?;

            let first_new = builder.verts.len();
            let mut lightmap_min = Vec2::MAX;
            let mut lightmap_max = Vec2::MIN;
            polygon.clear();

            for &i_vert in &face_verts {
                let vertex = *OutOfRange::get("vertex", &bsp.verts, i_vert as i64)
                    .map_err(|e| e.at(index, i_face))?;

                let st = texture.info.project(vertex);
                let lightmap_uv = texture.info.project_lightmap(vertex);
                lightmap_min = lightmap_min.min(lightmap_uv);
                lightmap_max = lightmap_max.max(lightmap_uv);

                polygon.push(builder.add_vert(
                    i_vert,
                    MapVertex {
                        position: swizzle(vertex) * scale,
                        normal,
                        color: face.styles,
                        uv: vec2(st.x / tex_size.x, -st.y / tex_size.y),
                        lightmap_uv,
                        lightmap_info: [0.0; 4],
                    },
                ));
            }

            // luxel grid covering the face
            let min_bb = (lightmap_min / LIGHTMAP_TEXEL_SIZE).floor();
            let max_bb = (lightmap_max / LIGHTMAP_TEXEL_SIZE).ceil();
            let bounds = max_bb - min_bb;
            let lightmap_info = [
                bounds.x,
                bounds.y,
                bytemuck::cast(face.light_ofs),
                bytemuck::cast(texture.slot.layer as i32),
            ];
            for vert in &mut builder.verts[first_new..] {
                vert.lightmap_uv = vert.lightmap_uv / LIGHTMAP_TEXEL_SIZE - min_bb + 0.5;
                vert.lightmap_info = lightmap_info;
            }

            builder.add_fan(submesh, &polygon);
        }

        let mesh = ModelMesh {
            model: index,
            vertices: builder.verts,
            submeshes: builder.submeshes,
            origin: swizzle(model.origin) * scale,
            mins: swizzle(model.mins) * scale,
            maxs: swizzle(model.maxs) * scale,
        };

        log::debug!(
            "Model {index}: {} faces, {} vertices, {} triangles in {} submeshes",
            faces.len(),
            mesh.vertices.len(),
            mesh.tri_count(),
            mesh.submeshes.len()
        );

        Ok(mesh)
    }
}

/// Builds every model in parallel. A model with broken references is left out, with a
/// [`ImportWarning::ModelSkipped`] in its place.
pub fn build_meshes(geometry: &MapGeometry, warnings: &mut Vec<ImportWarning>) -> Vec<ModelMesh> {
    let results: Vec<_> = (0..geometry.bsp.models.len())
        .into_par_iter()
        .map(|index| {
            let mut model_warnings = Vec::new();
            let mesh = geometry.build_model_mesh(index, &mut model_warnings);
            (index, mesh, model_warnings)
        })
        .collect();

    let mut meshes = Vec::with_capacity(results.len());
    for (model, mesh, model_warnings) in results {
        warnings.extend(model_warnings);
        match mesh {
            Ok(mesh) => meshes.push(mesh),
            Err(error) => ImportWarning::ModelSkipped {
                model,
                error: error.to_string(),
            }
            .report(warnings),
        }
    }
    meshes
}
