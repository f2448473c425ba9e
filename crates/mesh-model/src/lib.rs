//! Quadwarp Mesh Model
//!
//! Defines the data core of the projection-mapping editor:
//! - **Collections:** named warp and blend meshes with hide/lock/solo flags
//! - **Geometry:** quads, control grids, interpolation and resampling
//! - **Editing:** the blend quad editor and its edit modes
//! - **Persistence:** the binary data file and the project folder
//!
//! Quad corners are stored top-left, top-right, bottom-left, bottom-right, so
//! `i ^ 1` names the corner sharing `y` with corner `i` and `i ^ 2` the one
//! sharing `x`.

pub mod blend;
pub mod codec;
pub mod collection;
pub mod control_mesh;
pub mod data_file;
pub mod editor;
pub mod geom;
pub mod project;
pub mod quad;
pub mod render;
pub mod resample;
pub mod warp;

pub use blend::{BlendMesh, BlendQuadSet};
pub use codec::{DecodeError, Decoder, Encoder};
pub use collection::{
    ControlMeshRef, MeshCollection, MeshEntry, MeshId, MeshPayload, QuadRef, RenderSource,
};
pub use control_mesh::{ControlMesh, ControlPoint, GridSize, Interpolator};
pub use data_file::{MeshData, PackScale};
pub use editor::{editable_quad_indices, BlendQuadEditor, EditMode, GridData, PointIndex, Selection};
pub use geom::{Rect, Vec2};
pub use project::*;
pub use quad::Quad;
pub use render::RenderMesh;
pub use resample::Resampler;
pub use warp::WarpMesh;

/// Warp entries keyed by name.
pub type WarpMeshes = MeshCollection<WarpMesh>;

/// Blend entries keyed by name.
pub type BlendMeshes = MeshCollection<BlendMesh>;
