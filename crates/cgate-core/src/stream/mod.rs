//! The event pipeline: bytes → records → fragments → response text.
//!
//! Every stage is a pull-based stream or a plain value type, so the same
//! pipeline drives the SSE gateway, batch responses and the terminal front end.

pub mod classifier;
pub mod framer;
pub mod multiplexer;
pub mod narration;

pub use classifier::{Classifier, Fragment, RunOutcome, Variant, classify_records};
pub use framer::{LineFramer, frame_records};
pub use multiplexer::{EmptyResponse, Mode, ResponseMultiplexer};
pub use narration::{ToolPhase, narrate};
