pub mod engine;
pub mod frame;
pub mod passthrough;
pub mod pipeline;

pub use engine::{DecodeEngine, DecodeRequest};
pub use frame::{PixelFormat, PlanarDestination, PlanarFrame, PlaneMut};
pub use passthrough::{PassthroughEngine, PassthroughSession};
pub use pipeline::{decode_frame, DecoderSession};
