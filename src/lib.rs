//! Detect numbered image sequences and stamp them into preview renders.
//!
//! The [`pattern`] module holds the pure name handling: splitting a file name
//! into digit runs, deriving the pattern shared by a sequence, reading frame
//! numbers and rendering `#` templates. [`sequence`] finds the siblings of a
//! sample frame, and [`stamp`] drives a [`host::SequencerHost`] to lay out the
//! timeline, overlay frame labels and render.

pub mod consts;
pub mod error;
pub mod host;
pub mod pattern;
pub mod sequence;
pub mod stamp;

pub use error::{PatternError, SequenceError};
pub use pattern::{
    PathStyle, get_frame_number, get_name_pattern, get_name_pattern_with, render_template,
    render_template_with, tokenize,
};
pub use sequence::{
    DiskSource, Frame, FrameSequence, FrameSource, MemorySource, SequenceOptions,
    discover_sequence, resolve_inputs, select_sequence,
};
