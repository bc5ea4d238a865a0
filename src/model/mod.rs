// MODEL: simulation state and mesh data
pub mod body;
pub mod camera;
pub mod mesh;

pub use body::{ArenaBounds, BodyState, Telemetry};
pub use camera::{Camera, CameraMode};
pub use mesh::{build_uv_sphere, Mesh, MeshBuffer, MeshError, Vertex};
