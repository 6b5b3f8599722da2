use regex::Regex;
use std::sync::LazyLock;

/// Splits a name into alternating runs of ASCII digits and non-digits.
pub static RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+|[^0-9]+").unwrap());

/// A contiguous group of `#` placeholders; its length is the padding width.
pub static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#+").unwrap());

/// Parses a `WIDTHxHEIGHT` resolution override.
pub static RESOLUTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\s*[xX]\s*(\d+)\s*$").unwrap());

/// Token substituted for the last digit run of a name.
pub const PLACEHOLDER: &str = "#";

/// Width of the frame suffix appended to templates without placeholders.
pub const DEFAULT_SUFFIX_WIDTH: usize = 4;

/// Sequencer channel of the image strip's per-frame text label.
pub const FRAME_LABEL_CHANNEL: u32 = 2;

/// Sequencer channel of the metadata line spanning the whole sequence.
pub const METADATA_CHANNEL: u32 = 5;

pub const FRAME_LABEL_LOCATION: [f32; 2] = [0.5, 0.0];
pub const METADATA_LOCATION: [f32; 2] = [0.5, 0.95];
pub const FRAME_LABEL_BACKGROUND: [f32; 3] = [0.0, 0.0, 1.0];
