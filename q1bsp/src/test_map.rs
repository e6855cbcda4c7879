//! Writes small map files in memory, for tests.

use byteorder::{LittleEndian, WriteBytesExt};
use glam::{vec3, vec4, Vec3};

use crate::bsp::{
    consts::{LumpType, BSP_VERSION_QUAKE, HEADER_LUMPS, HEADER_SIZE, MIP_LEVELS, TEXTURE_NAME_LENGTH},
    edges::{BSPEdge, BSPSurfEdge},
    face::BSPFace,
    model::BSPModel,
    plane::BSPPlane,
    textures::{BSPTexInfo, MIPTEX_HEADER_SIZE},
};

pub struct TestTexture {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub mips: [Vec<u8>; MIP_LEVELS],
    /// replaces the computed mip offsets in the header
    pub mip_offsets: Option<[u32; MIP_LEVELS]>,
}

impl TestTexture {
    pub fn from_fn(name: &str, width: u32, height: u32, pixel: impl Fn(usize, u32, u32) -> u8) -> Self {
        let mips = std::array::from_fn(|mip| {
            let (w, h) = (width >> mip, height >> mip);
            (0..h)
                .flat_map(|y| (0..w).map(move |x| (x, y)))
                .map(|(x, y)| pixel(mip, x, y))
                .collect()
        });
        Self {
            name: name.to_owned(),
            width,
            height,
            mips,
            mip_offsets: None,
        }
    }

    pub fn solid(name: &str, width: u32, height: u32, value: u8) -> Self {
        Self::from_fn(name, width, height, |_, _, _| value)
    }

    fn write(&self, out: &mut Vec<u8>) {
        let mut name = [0u8; TEXTURE_NAME_LENGTH];
        let len = self.name.len().min(TEXTURE_NAME_LENGTH);
        name[..len].copy_from_slice(&self.name.as_bytes()[..len]);
        out.extend_from_slice(&name);
        out.write_u32::<LittleEndian>(self.width).unwrap();
        out.write_u32::<LittleEndian>(self.height).unwrap();

        let mut ofs = MIPTEX_HEADER_SIZE as u32;
        let computed: [u32; MIP_LEVELS] = std::array::from_fn(|mip| {
            let at = ofs;
            ofs += self.mips[mip].len() as u32;
            at
        });
        for mip_ofs in self.mip_offsets.unwrap_or(computed) {
            out.write_u32::<LittleEndian>(mip_ofs).unwrap();
        }
        for mip in &self.mips {
            out.extend_from_slice(mip);
        }
    }
}

pub struct TestMap {
    pub version: i32,
    pub entities: String,
    pub planes: Vec<BSPPlane>,
    pub textures: Vec<TestTexture>,
    /// directory entries of -1 written after `textures`
    pub missing_textures: usize,
    pub verts: Vec<Vec3>,
    pub tex_info: Vec<BSPTexInfo>,
    pub faces: Vec<BSPFace>,
    pub lighting: Vec<u8>,
    pub edges: Vec<BSPEdge>,
    pub surf_edges: Vec<BSPSurfEdge>,
    pub models: Vec<BSPModel>,
    /// lay the lumps out back to front
    pub reverse_lumps: bool,
    /// junk appended to the edge lump
    pub trailing_edge_bytes: usize,
}

impl TestMap {
    /// A 64x64 quad on the ground plane, one 16x16 texture, one model.
    pub fn unit_quad() -> Self {
        Self {
            version: BSP_VERSION_QUAKE,
            entities: "{\n\"classname\" \"worldspawn\"\n}\n".to_owned(),
            planes: vec![BSPPlane {
                normal: Vec3::Z,
                dist: 0.0,
                axis: 2,
            }],
            textures: vec![TestTexture::solid("wall", 16, 16, 1)],
            missing_textures: 0,
            verts: vec![
                vec3(0.0, 0.0, 0.0),
                vec3(64.0, 0.0, 0.0),
                vec3(64.0, 64.0, 0.0),
                vec3(0.0, 64.0, 0.0),
            ],
            tex_info: vec![BSPTexInfo {
                tex_s: vec4(1.0, 0.0, 0.0, 0.0),
                tex_t: vec4(0.0, 1.0, 0.0, 0.0),
                texture: 0,
                flags: 0,
            }],
            faces: vec![BSPFace {
                plane_num: 0,
                side: 0,
                first_edge: 0,
                num_edges: 4,
                tex_info: 0,
                styles: [0, 255, 255, 255],
                light_ofs: 0,
            }],
            // (64 / 16 + 1) squared samples
            lighting: vec![200; 25],
            edges: vec![
                BSPEdge::default(),
                BSPEdge { v0: 0, v1: 1 },
                BSPEdge { v0: 1, v1: 2 },
                BSPEdge { v0: 2, v1: 3 },
                BSPEdge { v0: 3, v1: 0 },
            ],
            surf_edges: [1, 2, 3, 4].map(|index| BSPSurfEdge { index }).into(),
            models: vec![BSPModel {
                mins: Vec3::ZERO,
                maxs: vec3(64.0, 64.0, 0.0),
                first_face: 0,
                num_faces: 1,
                ..Default::default()
            }],
            reverse_lumps: false,
            trailing_edge_bytes: 0,
        }
    }

    /// Appends a face traced through `verts` with its own edges, and returns its index.
    pub fn push_face(&mut self, verts: &[Vec3], tex_info: i16) -> usize {
        let base = self.verts.len() as u16;
        self.verts.extend_from_slice(verts);

        let first_edge = self.surf_edges.len() as i32;
        for i in 0..verts.len() as u16 {
            self.surf_edges.push(BSPSurfEdge {
                index: self.edges.len() as i32,
            });
            self.edges.push(BSPEdge {
                v0: base + i,
                v1: base + (i + 1) % verts.len() as u16,
            });
        }

        self.faces.push(BSPFace {
            first_edge,
            num_edges: verts.len() as i16,
            tex_info,
            ..self.faces[0]
        });
        self.faces.len() - 1
    }

    fn lump(&self, lump: LumpType) -> Vec<u8> {
        let mut out = Vec::new();
        match lump {
            LumpType::Entities => {
                out.extend_from_slice(self.entities.as_bytes());
                out.push(0);
            }
            LumpType::Planes => {
                for plane in &self.planes {
                    write_vec3(&mut out, plane.normal);
                    out.write_f32::<LittleEndian>(plane.dist).unwrap();
                    out.write_i32::<LittleEndian>(plane.axis).unwrap();
                }
            }
            LumpType::Textures => {
                let count = self.textures.len() + self.missing_textures;
                if count == 0 {
                    return out;
                }
                out.write_i32::<LittleEndian>(count as i32).unwrap();

                let mut body = Vec::new();
                let dir_size = 4 + count * 4;
                for texture in &self.textures {
                    out.write_i32::<LittleEndian>((dir_size + body.len()) as i32)
                        .unwrap();
                    texture.write(&mut body);
                }
                for _ in 0..self.missing_textures {
                    out.write_i32::<LittleEndian>(-1).unwrap();
                }
                out.extend_from_slice(&body);
            }
            LumpType::Vertexes => {
                for &v in &self.verts {
                    write_vec3(&mut out, v);
                }
            }
            LumpType::TexInfo => {
                for info in &self.tex_info {
                    for f in info.tex_s.to_array().into_iter().chain(info.tex_t.to_array()) {
                        out.write_f32::<LittleEndian>(f).unwrap();
                    }
                    out.write_i32::<LittleEndian>(info.texture).unwrap();
                    out.write_i32::<LittleEndian>(info.flags).unwrap();
                }
            }
            LumpType::Faces => {
                for face in &self.faces {
                    out.write_i16::<LittleEndian>(face.plane_num).unwrap();
                    out.write_i16::<LittleEndian>(face.side).unwrap();
                    out.write_i32::<LittleEndian>(face.first_edge).unwrap();
                    out.write_i16::<LittleEndian>(face.num_edges).unwrap();
                    out.write_i16::<LittleEndian>(face.tex_info).unwrap();
                    out.extend_from_slice(&face.styles);
                    out.write_i32::<LittleEndian>(face.light_ofs).unwrap();
                }
            }
            LumpType::Lighting => out.extend_from_slice(&self.lighting),
            LumpType::Edges => {
                for edge in &self.edges {
                    out.write_u16::<LittleEndian>(edge.v0).unwrap();
                    out.write_u16::<LittleEndian>(edge.v1).unwrap();
                }
                out.resize(out.len() + self.trailing_edge_bytes, 0);
            }
            LumpType::SurfEdges => {
                for surf_edge in &self.surf_edges {
                    out.write_i32::<LittleEndian>(surf_edge.index).unwrap();
                }
            }
            LumpType::Models => {
                for model in &self.models {
                    write_vec3(&mut out, model.mins);
                    write_vec3(&mut out, model.maxs);
                    write_vec3(&mut out, model.origin);
                    for node in model.head_nodes {
                        out.write_i32::<LittleEndian>(node).unwrap();
                    }
                    out.write_i32::<LittleEndian>(model.vis_leafs).unwrap();
                    out.write_i32::<LittleEndian>(model.first_face).unwrap();
                    out.write_i32::<LittleEndian>(model.num_faces).unwrap();
                }
            }
            LumpType::Visibility
            | LumpType::Nodes
            | LumpType::ClipNodes
            | LumpType::Leafs
            | LumpType::MarkSurfaces => {}
        }
        out
    }

    pub fn build(&self) -> Vec<u8> {
        let lumps: Vec<Vec<u8>> = (0..HEADER_LUMPS)
            .map(|i| self.lump(num_traits::FromPrimitive::from_usize(i).unwrap()))
            .collect();

        let mut order: Vec<usize> = (0..HEADER_LUMPS).collect();
        if self.reverse_lumps {
            order.reverse();
        }

        let mut directory = [(0i32, 0i32); HEADER_LUMPS];
        let mut body = Vec::new();
        for i in order {
            directory[i] = ((HEADER_SIZE + body.len()) as i32, lumps[i].len() as i32);
            body.extend_from_slice(&lumps[i]);
            // keep lumps word aligned, as compilers do
            body.resize(body.len().next_multiple_of(4), 0);
        }

        let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
        out.write_i32::<LittleEndian>(self.version).unwrap();
        for (ofs, len) in directory {
            out.write_i32::<LittleEndian>(ofs).unwrap();
            out.write_i32::<LittleEndian>(len).unwrap();
        }
        out.extend_from_slice(&body);
        out
    }
}

fn write_vec3(out: &mut Vec<u8>, v: Vec3) {
    for f in v.to_array() {
        out.write_f32::<LittleEndian>(f).unwrap();
    }
}
