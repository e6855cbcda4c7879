use std::{path::Path, str::FromStr};

use ini::Ini;

use crate::error::BspError;

/// How vertices shared between faces of one model are emitted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VertexSharing {
    /// A map vertex is written once per model. Later faces reuse it, keeping the first face's normal and UVs.
    #[default]
    FirstWins,
    /// Every face writes its own copy of each vertex.
    PerFace,
}

impl FromStr for VertexSharing {
    type Err = BspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first_wins" => Ok(Self::FirstWins),
            "per_face" => Ok(Self::PerFace),
            other => Err(BspError::Config(format!(
                "unknown vertex_sharing {other:?}, expected first_wins or per_face"
            ))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImportConfig {
    /// world units to output units
    pub scale: f32,
    pub vertex_sharing: VertexSharing,
}

impl ImportConfig {
    /// 58 world units come out 1.67 units long.
    pub const DEFAULT_SCALE: f32 = 1.67 / 58.0;

    /// Reads the `[import]` section. Missing keys keep their defaults.
    pub fn from_ini(ini: &Ini) -> Result<Self, BspError> {
        let mut config = Self::default();
        let Some(import) = ini.section(Some("import")) else {
            return Ok(config);
        };

        if let Some(scale) = import.get("scale") {
            config.scale = scale
                .trim()
                .parse()
                .map_err(|e| BspError::Config(format!("scale {scale:?}: {e}")))?;
            if !config.scale.is_finite() || config.scale <= 0.0 {
                return Err(BspError::Config(format!("scale must be positive, got {scale}")));
            }
        }
        if let Some(sharing) = import.get("vertex_sharing") {
            config.vertex_sharing = sharing.parse()?;
        }

        log::debug!("{config:?}");
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, BspError> {
        let ini = Ini::load_from_file(path)
            .map_err(|e| BspError::Config(format!("{}: {e}", path.display())))?;
        Self::from_ini(&ini)
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            vertex_sharing: VertexSharing::default(),
        }
    }
}
