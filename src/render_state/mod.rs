//! Render-state records and the command stream that batches them.

pub mod record;
pub mod stream;

pub use record::{RenderFlags, RenderState, SamplerMode, ShaderKind, RENDER_STATE_ALIGN};
pub use stream::{should_flush, CommandStream, DEFAULT_BATCH_LIMIT};
