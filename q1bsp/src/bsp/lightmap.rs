use super::consts::MAX_MAP_LIGHTING;

///Lighting
///
///The lighting lump is a blob of 8-bit light levels. Faces point into it with `light_ofs`; each face stores one
/// sample per 16x16 unit luxel for each of its light styles, row by row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LightingData {
    pub samples: Box<[u8]>,
}

impl LightingData {
    pub fn new(bytes: &[u8]) -> Self {
        if bytes.len() > MAX_MAP_LIGHTING {
            log::warn!(
                "{} bytes of lighting, more than the engine limit of {MAX_MAP_LIGHTING}",
                bytes.len()
            );
        }
        Self {
            samples: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
