/// Twisty Core Library - puzzle state mirroring and cubie geometry
///
/// This library holds the synchronous model behind every front end: the piece
/// registry, cubie construction, snapshot application, move notation and the
/// wire types exchanged with the puzzle engine.

pub mod applier;
pub mod config;
pub mod cubie;
pub mod error;
pub mod geometry;
pub mod moves;
pub mod projection;
pub mod puzzle;
pub mod registry;
pub mod session;
pub mod state;
pub mod transform;

// Re-export commonly used types
pub use applier::TransformApplier;
pub use config::ClientConfig;
pub use cubie::{lattice_positions, Cubie, CubieFactory, CubieMetrics, Direction, Sticker};
pub use error::{CubeError, CubeResult};
pub use geometry::{FaceColor, Mesh, Triangle, Vertex};
pub use moves::{parse_sequence, Face, Modifier, MoveToken};
pub use projection::Camera;
pub use puzzle::PuzzleModel;
pub use registry::PieceRegistry;
pub use session::{Applied, Notice, RequestId, Session};
pub use state::{MoveRequest, MoveResponse, PieceState, StateSnapshot};
pub use transform::{Orientation, Placement, RotationState, Transform};
