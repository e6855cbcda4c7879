use std::{borrow::Cow, sync::OnceLock};

use ahash::AHashMap;
use regex::Regex;

use crate::{
    bsp::{consts::MIP_LEVELS, textures::BSPMipTex},
    error::ImportWarning,
};

/// Where a texture landed: which atlas, and which layer of it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureSlot {
    pub bin: usize,
    pub layer: usize,
}

/// A texture array of same-sized R8 palette-index textures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureAtlas {
    pub width: u32,
    pub height: u32,
    pub layers: usize,
    /// one buffer per mip level, holding every layer back to back
    pub mips: Vec<Box<[u8]>>,
    pub names: Vec<String>,
    /// placeholder for textures with unusable dimensions
    pub corrupt: bool,
}

impl TextureAtlas {
    const CORRUPT_SIZE: u32 = 2;

    pub fn mip_count(&self) -> usize {
        self.mips.len()
    }

    pub fn mip_size(&self, mip: usize) -> (usize, usize) {
        ((self.width >> mip) as usize, (self.height >> mip) as usize)
    }

    /// Pixels of one layer at one mip level.
    pub fn layer(&self, mip: usize, layer: usize) -> &[u8] {
        let (w, h) = self.mip_size(mip);
        let size = w * h;
        &self.mips[mip][layer * size..(layer + 1) * size]
    }

    fn layer_mut(&mut self, mip: usize, layer: usize) -> &mut [u8] {
        let (w, h) = self.mip_size(mip);
        let size = w * h;
        &mut self.mips[mip][layer * size..(layer + 1) * size]
    }

    /// Member names, one per line, in layer order.
    pub fn name_list(&self) -> String {
        self.names.join("\n")
    }

    fn new(width: u32, height: u32, mip_count: usize, names: Vec<String>, corrupt: bool) -> Self {
        let layers = names.len();
        let mips = (0..mip_count)
            .map(|mip| {
                let size = (width >> mip) as usize * (height >> mip) as usize;
                vec![0; size * layers].into_boxed_slice()
            })
            .collect();
        Self {
            width,
            height,
            layers,
            mips,
            names,
            corrupt,
        }
    }
}

/// Sort key for a texture name. Animated and toggled textures carry a `+0`..`+9` or `+a`..`+j` frame prefix, which
/// is moved to the end so every frame of one animation sorts together.
pub fn sort_key(name: &str) -> Cow<'_, str> {
    static FRAME_PREFIX: OnceLock<Regex> = OnceLock::new();
    FRAME_PREFIX
        .get_or_init(|| Regex::new(r"^(\+[0-9A-Za-z])\s*(.+)$").expect("frame prefix pattern"))
        .replace(name, "$2$1")
}

/// Groups texture indices by dimensions, in order of first appearance, each group sorted by [`sort_key`].
pub fn bin_textures(textures: &[BSPMipTex]) -> Vec<Vec<usize>> {
    let mut bin_of = AHashMap::<(u32, u32), usize>::new();
    let mut bins: Vec<Vec<usize>> = Vec::new();

    for (i, texture) in textures.iter().enumerate() {
        let bin = *bin_of.entry(texture.dimensions()).or_insert_with(|| {
            bins.push(Vec::new());
            bins.len() - 1
        });
        bins[bin].push(i);
    }

    for bin in &mut bins {
        bin.sort_by_cached_key(|&i| sort_key(&textures[i].name).into_owned());
    }

    bins
}

/// Reverses the row order of a `width` wide image in place.
pub fn flip_rows(pixels: &mut [u8], width: usize) {
    if width == 0 {
        return;
    }
    let rows = pixels.len() / width;
    for y in 0..rows / 2 {
        let (top, bottom) = pixels.split_at_mut((rows - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

/// Every texture atlas of a map, and where each texture went.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextureAtlases {
    pub atlases: Vec<TextureAtlas>,
    /// indexed by texture directory index
    pub slots: Box<[TextureSlot]>,
}

impl TextureAtlases {
    /// Builds one atlas per dimension bin. `lump_ofs` is the file offset of the texture lump, which texture offsets
    /// are relative to.
    pub fn build(
        textures: &[BSPMipTex],
        lump_ofs: usize,
        data: &[u8],
        warnings: &mut Vec<ImportWarning>,
    ) -> Self {
        let mut slots = vec![TextureSlot::default(); textures.len()].into_boxed_slice();

        let atlases = bin_textures(textures)
            .into_iter()
            .enumerate()
            .map(|(bin, members)| {
                for (layer, &i) in members.iter().enumerate() {
                    slots[i] = TextureSlot { bin, layer };
                }

                // members share dimensions
                let first = &textures[members[0]];
                if !first.is_valid() {
                    for &i in &members {
                        let texture = &textures[i];
                        ImportWarning::CorruptTexture {
                            bin,
                            name: texture.name.clone(),
                            width: texture.width,
                            height: texture.height,
                        }
                        .report(warnings);
                    }
                    return Self::build_corrupt(textures, &members);
                }

                // layers are copied out of the file, so they cannot outgrow it
                let bytes = first
                    .mip_chain_size()
                    .and_then(|size| size.checked_mul(members.len()));
                if bytes.map_or(true, |bytes| bytes > data.len()) {
                    ImportWarning::TextureBinTooLarge {
                        bin,
                        width: first.width,
                        height: first.height,
                        layers: members.len(),
                        available: data.len(),
                    }
                    .report(warnings);
                    return Self::build_corrupt(textures, &members);
                }

                Self::build_bin(textures, &members, lump_ofs, data, warnings)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Built {} texture atlases from {} textures",
            atlases.len(),
            textures.len()
        );

        Self { atlases, slots }
    }

    fn build_bin(
        textures: &[BSPMipTex],
        members: &[usize],
        lump_ofs: usize,
        data: &[u8],
        warnings: &mut Vec<ImportWarning>,
    ) -> TextureAtlas {
        let first = &textures[members[0]];
        let names = members.iter().map(|&i| textures[i].name.clone()).collect();
        let mut atlas = TextureAtlas::new(first.width, first.height, MIP_LEVELS, names, false);

        for (layer, &i) in members.iter().enumerate() {
            let texture = &textures[i];
            for mip in 0..MIP_LEVELS {
                let Some(pixels) = texture
                    .mip_range(mip, lump_ofs)
                    .and_then(|range| data.get(range))
                else {
                    ImportWarning::MissingMipData {
                        name: texture.name.clone(),
                        mip,
                    }
                    .report(warnings);
                    continue;
                };
                let (w, _) = atlas.mip_size(mip);
                let dst = atlas.layer_mut(mip, layer);
                dst.copy_from_slice(pixels);
                flip_rows(dst, w);
            }
        }

        log::debug!(
            "Texture atlas {}x{} with {} layers: {}",
            atlas.width,
            atlas.height,
            atlas.layers,
            atlas.names.join(", ")
        );
        atlas
    }

    fn build_corrupt(textures: &[BSPMipTex], members: &[usize]) -> TextureAtlas {
        let names = members
            .iter()
            .map(|&i| format!("{} CORRUPT", textures[i].name))
            .collect();

        TextureAtlas::new(
            TextureAtlas::CORRUPT_SIZE,
            TextureAtlas::CORRUPT_SIZE,
            1,
            names,
            true,
        )
    }
}

#[cfg(test)]
mod texture_atlas_tests {
    use super::*;
    use crate::{
        bsp::{consts::LumpType, header::BSPHeader},
        test_map::{TestMap, TestTexture},
    };

    fn tex(name: &str, width: u32, height: u32) -> BSPMipTex {
        BSPMipTex {
            name: name.to_owned(),
            width,
            height,
            ..Default::default()
        }
    }

    fn build(map: &TestMap) -> (TextureAtlases, Vec<ImportWarning>) {
        let data = map.build();
        let header = BSPHeader::parse(&data).unwrap();
        let lump = header.get_lump_header(LumpType::Textures);
        let textures = BSPMipTex::read_directory(lump, &data).unwrap();
        let mut warnings = Vec::new();
        let atlases = TextureAtlases::build(&textures, lump.file_ofs as usize, &data, &mut warnings);
        (atlases, warnings)
    }

    #[test]
    fn frame_prefix_moves_to_end() {
        assert_eq!(sort_key("+0lava"), "lava+0");
        assert_eq!(sort_key("+a button"), "button+a");
        assert_eq!(sort_key("wall"), "wall");
        assert_eq!(sort_key("+"), "+");
        assert_eq!(sort_key("*water"), "*water");
    }

    #[test]
    fn bins_partition_by_dimensions_in_first_seen_order() {
        let textures = [
            tex("a", 64, 64),
            tex("b", 32, 32),
            tex("c", 64, 64),
            tex("d", 64, 32),
            tex("e", 32, 32),
        ];
        let bins = bin_textures(&textures);
        assert_eq!(bins, [vec![0, 2], vec![1, 4], vec![3]]);

        let mut seen: Vec<usize> = bins.iter().flatten().copied().collect();
        seen.sort();
        assert_eq!(seen, [0, 1, 2, 3, 4]);
        for bin in &bins {
            assert!(bin
                .iter()
                .all(|&i| textures[i].dimensions() == textures[bin[0]].dimensions()));
        }
    }

    #[test]
    fn bin_sort_groups_animation_frames() {
        let textures = [
            tex("+1lava", 64, 64),
            tex("wall", 64, 64),
            tex("+0lava", 64, 64),
            tex("lava", 64, 64),
            tex("dup", 64, 64),
            tex("dup", 64, 64),
        ];
        let bins = bin_textures(&textures);
        // "dup" < "lava" < "lava+0" < "lava+1" < "wall", equal keys keep file order
        assert_eq!(bins, [vec![4, 5, 3, 2, 0, 1]]);

        let names: Vec<_> = bins[0].iter().map(|&i| textures[i].clone()).collect();
        assert_eq!(bin_textures(&names), [vec![0, 1, 2, 3, 4, 5]]);
    }

    #[test]
    fn flip_reverses_rows() {
        let mut pixels = [0, 1, 2, 10, 11, 12, 20, 21, 22];
        flip_rows(&mut pixels, 3);
        assert_eq!(pixels, [20, 21, 22, 10, 11, 12, 0, 1, 2]);

        let mut pixels = [1, 2, 3, 4];
        flip_rows(&mut pixels, 2);
        assert_eq!(pixels, [3, 4, 1, 2]);
    }

    #[test]
    fn layers_hold_flipped_mips() {
        let mut map = TestMap::unit_quad();
        map.textures = vec![
            TestTexture::from_fn("zz", 16, 16, |mip, _, y| (mip * 100) as u8 + y as u8),
            TestTexture::solid("aa", 16, 16, 9),
        ];
        let (atlases, warnings) = build(&map);
        assert!(warnings.is_empty());

        let atlas = &atlases.atlases[0];
        assert_eq!(atlases.atlases.len(), 1);
        assert_eq!((atlas.width, atlas.height, atlas.layers), (16, 16, 2));
        assert_eq!(atlas.mip_count(), 4);
        assert_eq!(atlas.name_list(), "aa\nzz");
        assert_eq!(&*atlases.slots, [TextureSlot { bin: 0, layer: 1 }, TextureSlot { bin: 0, layer: 0 }]);

        assert!(atlas.layer(0, 0).iter().all(|&p| p == 9));
        let zz = atlas.layer(0, 1);
        assert_eq!(zz[0], 15);
        assert_eq!(zz[15 * 16], 0);
        let zz = atlas.layer(2, 1);
        assert_eq!(zz.len(), 16);
        assert_eq!(zz[0], 203);
        assert_eq!(zz[12], 200);
    }

    #[test]
    fn zero_width_gives_placeholder() {
        let mut map = TestMap::unit_quad();
        map.textures.push(TestTexture::solid("broken", 0, 16, 0));
        let (atlases, warnings) = build(&map);

        let atlas = &atlases.atlases[1];
        assert!(atlas.corrupt);
        assert_eq!((atlas.width, atlas.height, atlas.layers), (2, 2, 1));
        assert_eq!(atlas.mip_count(), 1);
        assert_eq!(atlas.names, ["broken CORRUPT"]);
        assert_eq!(atlas.mips[0].len(), 4);
        assert_eq!(atlases.slots[1], TextureSlot { bin: 1, layer: 0 });
        assert_eq!(
            warnings,
            [ImportWarning::CorruptTexture {
                bin: 1,
                name: "broken".to_owned(),
                width: 0,
                height: 16,
            }]
        );
    }

    #[test]
    fn oversized_texture_is_corrupt() {
        let textures = [tex("huge", 4096, 16)];
        let mut warnings = Vec::new();
        let atlases = TextureAtlases::build(&textures, 0, &[], &mut warnings);
        assert!(atlases.atlases[0].corrupt);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn dimensions_with_equal_packed_keys_get_separate_bins() {
        // 16 | 1 << 16 == 0x10010 | 0 << 16
        let textures = [tex("good", 16, 1), tex("zzz", 0x10010, 0)];
        assert_eq!(bin_textures(&textures), [vec![0], vec![1]]);

        let mut map = TestMap::unit_quad();
        map.textures = vec![
            TestTexture::solid("good", 16, 1, 5),
            TestTexture::solid("zzz", 0x10010, 0, 0),
        ];
        let (atlases, warnings) = build(&map);

        assert_eq!(atlases.atlases.len(), 2);
        let good = &atlases.atlases[0];
        assert!(!good.corrupt);
        assert_eq!((good.width, good.height, good.layers), (16, 1, 1));
        assert!(good.layer(0, 0).iter().all(|&p| p == 5));
        assert!(atlases.atlases[1].corrupt);
        assert_eq!(
            warnings,
            [ImportWarning::CorruptTexture {
                bin: 1,
                name: "zzz".to_owned(),
                width: 0x10010,
                height: 0,
            }]
        );
    }

    #[test]
    fn bin_larger_than_file_gets_placeholder() {
        let textures = [tex("a", 4000, 4000), tex("b", 4000, 4000), tex("c", 4000, 4000)];
        let mut warnings = Vec::new();
        let atlases = TextureAtlases::build(&textures, 0, &[0; 64], &mut warnings);

        let atlas = &atlases.atlases[0];
        assert!(atlas.corrupt);
        assert_eq!((atlas.width, atlas.height, atlas.layers), (2, 2, 3));
        assert_eq!(atlas.mips.len(), 1);
        assert_eq!(atlas.mips[0].len(), 12);
        assert_eq!(atlas.names, ["a CORRUPT", "b CORRUPT", "c CORRUPT"]);
        assert_eq!(
            warnings,
            [ImportWarning::TextureBinTooLarge {
                bin: 0,
                width: 4000,
                height: 4000,
                layers: 3,
                available: 64,
            }]
        );
    }

    #[test]
    fn mip_outside_file_is_left_blank() {
        let mut map = TestMap::unit_quad();
        map.textures[0].mip_offsets = Some([40, 296, 360, 1 << 30]);
        let (atlases, warnings) = build(&map);

        assert_eq!(
            warnings,
            [ImportWarning::MissingMipData {
                name: "wall".to_owned(),
                mip: 3,
            }]
        );
        let atlas = &atlases.atlases[0];
        assert!(atlas.layer(0, 0).iter().all(|&p| p == 1));
        assert!(atlas.layer(3, 0).iter().all(|&p| p == 0));
    }
}
