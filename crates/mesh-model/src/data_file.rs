//! The project data file: both mesh collections behind a versioned header.
//!
//! ```text
//! "QWRP"  u32 version
//! repeated: [u8; 4] tag, u64 length, <length bytes>
//! ```
//!
//! The `warp` and `blnd` sections each hold one mesh container. Unknown
//! sections are skipped so newer writers can add data older readers ignore.

use tracing::{debug, warn};

use crate::blend::BlendMesh;
use crate::codec::{DecodeError, Decoder, Encoder};
use crate::collection::{MeshCollection, MeshPayload};
use crate::geom::Vec2;
use crate::warp::WarpMesh;

pub const MAGIC: [u8; 4] = *b"QWRP";
pub const VERSION: u32 = 1;

pub const WARP_SECTION: [u8; 4] = *b"warp";
pub const BLEND_SECTION: [u8; 4] = *b"blnd";

/// Per-section scale applied at the file boundary. Warp coordinates are
/// normalized by the texture size and blend coordinates by the output
/// (bridge) resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackScale {
    pub warp: Vec2,
    pub blend: Vec2,
}

impl PackScale {
    pub const UNIT: PackScale = PackScale {
        warp: Vec2::ONE,
        blend: Vec2::ONE,
    };

    /// Scale that maps pixel sizes to `[0, 1]`. Zero dimensions fall back
    /// to unit scale on that axis.
    pub fn normalizing(texture_size: [u32; 2], bridge_resolution: [u32; 2]) -> Self {
        Self {
            warp: reciprocal(texture_size),
            blend: reciprocal(bridge_resolution),
        }
    }
}

fn reciprocal(size: [u32; 2]) -> Vec2 {
    let axis = |v: u32| if v == 0 { 1.0 } else { 1.0 / v as f32 };
    Vec2::new(axis(size[0]), axis(size[1]))
}

/// Everything a project stores besides its JSON settings.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub warp: MeshCollection<WarpMesh>,
    pub blend: MeshCollection<BlendMesh>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.warp.is_empty() && self.blend.is_empty()
    }

    /// Per-frame step for both collections.
    pub fn update(&mut self) {
        self.warp.update();
        self.blend.update();
    }

    /// Encode with each section's coordinates multiplied by its scale.
    pub fn encode(&self, scale: PackScale) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_bytes(&MAGIC);
        enc.write_u32(VERSION);
        write_section(&mut enc, WARP_SECTION, &self.warp, scale.warp);
        write_section(&mut enc, BLEND_SECTION, &self.blend, scale.blend);
        enc.into_inner()
    }

    /// Decode a whole data file. A missing section leaves that collection
    /// empty.
    pub fn decode(bytes: &[u8], scale: PackScale) -> Result<Self, DecodeError> {
        let mut dec = Decoder::new(bytes);
        let magic = dec.read_bytes(MAGIC.len(), "magic")?;
        if magic != MAGIC {
            let mut found = [0u8; 4];
            found.copy_from_slice(magic);
            return Err(DecodeError::BadMagic { found });
        }
        let version = dec.read_u32("version")?;
        if version == 0 || version > VERSION {
            return Err(DecodeError::UnsupportedVersion(version));
        }

        let mut data = Self::new();
        while !dec.is_empty() {
            let tag = dec.read_bytes(4, "section tag")?;
            let len = dec.read_count(1, "section length")?;
            let body = dec.read_bytes(len, "section body")?;
            match <[u8; 4]>::try_from(tag) {
                Ok(WARP_SECTION) => read_section(&mut data.warp, tag, body, scale.warp)?,
                Ok(BLEND_SECTION) => read_section(&mut data.blend, tag, body, scale.blend)?,
                _ => warn!(
                    tag = %String::from_utf8_lossy(tag),
                    len,
                    "skipping unknown data file section"
                ),
            }
        }
        debug!(
            version,
            warp = data.warp.len(),
            blend = data.blend.len(),
            "decoded data file"
        );
        Ok(data)
    }
}

fn write_section<T: MeshPayload>(
    enc: &mut Encoder,
    tag: [u8; 4],
    meshes: &MeshCollection<T>,
    scale: Vec2,
) {
    let body = meshes.to_bytes(scale);
    enc.write_bytes(&tag);
    enc.write_size(body.len());
    enc.write_bytes(&body);
}

fn read_section<T: MeshPayload>(
    meshes: &mut MeshCollection<T>,
    tag: &[u8],
    body: &[u8],
    scale: Vec2,
) -> Result<(), DecodeError> {
    if !meshes.is_empty() {
        warn!(tag = %String::from_utf8_lossy(tag), "repeated section replaces earlier one");
    }
    let mut dec = Decoder::new(body);
    meshes.unpack(&mut dec, scale)?;
    if !dec.is_empty() {
        return Err(DecodeError::SectionLength {
            id: String::from_utf8_lossy(tag).into_owned(),
            declared: body.len(),
            consumed: dec.position(),
        });
    }
    Ok(())
}
