/// The map's light samples packed into one R8 texture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightmapAtlas {
    pub width: u32,
    pub height: u32,
    pub data: Box<[u8]>,
    /// the map has no lighting, and should render at full brightness
    pub fullbright: bool,
}

/// Dimensions of the smallest power of two square, or half square, that holds `len` samples.
pub fn lightmap_dimensions(len: usize) -> (u32, u32) {
    let side = ceil_sqrt(len);
    let pow2 = side.next_power_of_two();
    if side * side >= pow2 * pow2 / 2 {
        (pow2 as u32, pow2 as u32)
    } else {
        (pow2 as u32, (pow2 / 2) as u32)
    }
}

fn ceil_sqrt(n: usize) -> usize {
    // correct for float rounding either way
    let mut root = ((n as f64).sqrt() as usize).saturating_sub(1);
    while root * root < n {
        root += 1;
    }
    root
}

impl LightmapAtlas {
    pub fn build(samples: &[u8]) -> Self {
        if samples.is_empty() {
            log::debug!("No lighting, lightmap is fullbright");
            return Self {
                width: 1,
                height: 1,
                data: Box::new([0]),
                fullbright: true,
            };
        }

        let (width, height) = lightmap_dimensions(samples.len());
        let mut data = vec![0; width as usize * height as usize].into_boxed_slice();
        data[..samples.len()].copy_from_slice(samples);

        log::debug!("Lightmap atlas {width}x{height} for {} samples", samples.len());

        Self {
            width,
            height,
            data,
            fullbright: false,
        }
    }
}
