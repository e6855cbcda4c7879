use std::io;

use thiserror::Error;

use crate::bsp::consts::LumpType;

/// Failures that stop an import, or a single model when reported through
/// [`ImportWarning::ModelSkipped`].
#[derive(Debug, Error)]
pub enum BspError {
    #[error("failed to read map: {0}")]
    Io(#[from] io::Error),
    #[error("malformed {lump:?} lump: {reason}")]
    MalformedLump { lump: LumpType, reason: String },
    #[error("size limit exceeded: {0}")]
    SizeLimit(String),
    #[error("model {model}, face {face}: texture index {index} does not resolve")]
    UnresolvedTextureIndex {
        model: usize,
        face: usize,
        index: i64,
    },
    #[error("model {model}, face {face}: {what} index {index} out of range (len {len})")]
    InvalidReference {
        model: usize,
        face: usize,
        what: &'static str,
        index: i64,
        len: usize,
    },
    #[error("invalid import config: {0}")]
    Config(String),
}

impl BspError {
    pub(crate) fn malformed(lump: LumpType, reason: impl Into<String>) -> Self {
        Self::MalformedLump {
            lump,
            reason: reason.into(),
        }
    }
}

/// A record index that points past the end of its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    pub what: &'static str,
    pub index: i64,
    pub len: usize,
}

impl OutOfRange {
    pub fn new(what: &'static str, index: i64, len: usize) -> Self {
        Self { what, index, len }
    }

    /// Looks up `index` in `table`, rejecting negative and past-the-end indices.
    pub fn get<'a, T>(what: &'static str, table: &'a [T], index: i64) -> Result<&'a T, Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| table.get(i))
            .ok_or(Self::new(what, index, table.len()))
    }

    pub fn at(self, model: usize, face: usize) -> BspError {
        BspError::InvalidReference {
            model,
            face,
            what: self.what,
            index: self.index,
            len: self.len,
        }
    }
}

impl ImportWarning {
    /// Logs the warning and records it.
    pub fn report(self, warnings: &mut Vec<ImportWarning>) {
        log::warn!("{self}");
        warnings.push(self);
    }
}

/// Recoverable conditions, returned next to a successful import.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportWarning {
    #[error("unexpected BSP version {0}, decoding as Quake")]
    UnexpectedVersion(i32),
    #[error("corrupt texture {name:?} of size {width}x{height} in bin {bin}, using placeholder")]
    CorruptTexture {
        bin: usize,
        name: String,
        width: u32,
        height: u32,
    },
    #[error("texture bin {bin} of {layers} {width}x{height} textures needs more pixels than the {available} byte file holds, using placeholder")]
    TextureBinTooLarge {
        bin: usize,
        width: u32,
        height: u32,
        layers: usize,
        available: usize,
    },
    #[error("texture {name:?} mip {mip} lies outside the file, left blank")]
    MissingMipData { name: String, mip: usize },
    #[error("model {model}, face {face}: degenerate face with {edges} edges, skipped")]
    DegenerateFace {
        model: usize,
        face: usize,
        edges: i16,
    },
    #[error("model {model} skipped: {error}")]
    ModelSkipped { model: usize, error: String },
}
