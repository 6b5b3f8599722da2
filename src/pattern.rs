//! Frame-number handling for numbered file names.
//!
//! A name like `shot_0012.png` is split into runs of digits and non-digits
//! (`shot_`, `0012`, `.png`). The last digit run is the frame number; replacing
//! it with a placeholder yields the pattern shared by every frame of the
//! sequence (`shot_#.png`). Output names go the other way: every group of `#`
//! in a template becomes the frame number padded to the group's length.

use crate::consts::{DEFAULT_SUFFIX_WIDTH, PLACEHOLDER, PLACEHOLDER_RE, RUN_RE};
use crate::error::PatternError;
use regex::Captures;

/// How to find the final component of a path string.
///
/// `render_template` only looks at the last component when deciding whether a
/// frame suffix must be appended, so the separator convention of the host
/// filesystem matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStyle {
    /// The convention of the platform this crate was built for.
    #[default]
    Native,
    /// `/` separated.
    Posix,
    /// `/` or `\` separated, with an optional `C:` drive prefix.
    Windows,
}

impl PathStyle {
    /// Return the final component of `path`. A trailing separator yields `""`.
    pub fn basename(self, path: &str) -> &str {
        match self {
            PathStyle::Native if cfg!(windows) => PathStyle::Windows.basename(path),
            PathStyle::Native | PathStyle::Posix => path.rsplit('/').next().unwrap_or(path),
            PathStyle::Windows => {
                let rest = strip_drive(path);
                rest.rsplit(['/', '\\']).next().unwrap_or(rest)
            }
        }
    }
}

fn strip_drive(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        &path[2..]
    } else {
        path
    }
}

/// Split `name` into alternating runs of ASCII digits and non-digits.
///
/// Concatenating the runs gives back `name`.
pub fn tokenize(name: &str) -> Result<Vec<&str>, PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyInputName);
    }
    Ok(RUN_RE.find_iter(name).map(|m| m.as_str()).collect())
}

fn is_digit_run(run: &str) -> bool {
    run.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Index of the last digit run, scanning from the end.
fn last_digit_run(runs: &[&str]) -> Option<usize> {
    runs.iter().rposition(|r| is_digit_run(r))
}

/// Replace the last digit run of `name` with `#`.
///
/// `shot_0012.png` -> `shot_#.png`. A name without digits is its own pattern.
pub fn get_name_pattern(name: &str) -> Result<String, PatternError> {
    get_name_pattern_with(name, PLACEHOLDER)
}

/// Replace the last digit run of `name` with `token`.
///
/// The run is replaced by `token` as a whole, so padding width is dropped:
/// `shot_12.png` and `shot_0012.png` share a pattern.
pub fn get_name_pattern_with(name: &str, token: &str) -> Result<String, PatternError> {
    let mut runs = tokenize(name)?;
    if let Some(i) = last_digit_run(&runs) {
        runs[i] = token;
    }
    let out = runs.concat();
    tracing::trace!(name, pattern = %out);
    Ok(out)
}

/// Parse the last digit run of `name` as a frame number.
pub fn get_frame_number(name: &str) -> Result<u64, PatternError> {
    let runs = tokenize(name)?;
    let digits = last_digit_run(&runs)
        .map(|i| runs[i])
        .ok_or_else(|| PatternError::NoDigitRunFound(name.to_string()))?;
    digits
        .parse::<u64>()
        .map_err(|_| PatternError::FrameNumberOutOfRange {
            name: name.to_string(),
            digits: digits.to_string(),
        })
}

/// Render an output name for `frame` using the native path convention.
///
/// See [`render_template_with`].
pub fn render_template(template: &str, frame: u64) -> String {
    render_template_with(template, frame, PathStyle::Native)
}

/// Substitute `frame` into every `#` group of `template`.
///
/// Each group is replaced by `frame` zero-padded to the group's length; a
/// wider number is written in full. When the final path component of
/// `template` has no `#`, a 4-digit frame suffix is appended instead:
/// `frame_##.png` -> `frame_07.png`, `renders/take` -> `renders/take0007`.
pub fn render_template_with(template: &str, frame: u64, style: PathStyle) -> String {
    let mut out = PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let width = caps[0].len();
            let number = format!("{frame:0width$}");
            if number.len() > width {
                tracing::debug!(template, frame, width, "frame number wider than placeholder");
            }
            number
        })
        .into_owned();

    if !style.basename(template).contains('#') {
        out.push_str(&format!("{frame:0width$}", width = DEFAULT_SUFFIX_WIDTH));
    }
    out
}
