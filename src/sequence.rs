use crate::error::{PatternError, SequenceError};
use crate::pattern::{get_frame_number, get_name_pattern};
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};

/// How sample names without a frame number are treated.
///
/// With `strict` unset a name like `poster.png` is a sequence of one frame;
/// with `strict` set it is rejected with [`PatternError::NoDigitRunFound`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceOptions {
    pub strict: bool,
}

/// One frame of a discovered sequence.
///
/// `path` is the sample's directory joined with the frame's file name, and
/// `number` is the frame number read from that name.
///
/// # Examples
///
/// ```rust
/// use seqstamp::{MemorySource, SequenceOptions, discover_sequence};
/// use std::path::{Path, PathBuf};
///
/// let src = MemorySource::new(["shot_0002.png", "shot_0001.png"]);
/// let seq = discover_sequence(&src, Path::new("plates/shot_0001.png"), SequenceOptions::default())
///     .unwrap();
///
/// let first = &seq.frames[0];
/// assert_eq!(first.path, PathBuf::from("plates").join("shot_0001.png"));
/// assert_eq!(first.number, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub path: PathBuf,
    /// `None` only for the single frame of a digit-less sample.
    pub number: Option<u64>,
}

/// Frames sharing a name pattern, ordered by frame number.
///
/// Returned by [`discover_sequence`]. `dir` is the directory part of the
/// sample path (empty for a bare file name) and `pattern` the sample's name
/// with its frame number replaced by `#`.
///
/// # Examples
///
/// ```rust
/// use seqstamp::{MemorySource, SequenceOptions, discover_sequence};
/// use std::path::Path;
///
/// let src = MemorySource::new(["a10.png", "a2.png", "a1.png", "b1.png"]);
/// let seq = discover_sequence(&src, Path::new("a1.png"), SequenceOptions::default()).unwrap();
///
/// assert_eq!(seq.pattern, "a#.png");
/// assert_eq!(seq.len(), 3);
/// let numbers: Vec<_> = seq.frames.iter().map(|f| f.number).collect();
/// assert_eq!(numbers, vec![Some(1), Some(2), Some(10)]);
/// ```
#[derive(Debug, Clone)]
pub struct FrameSequence {
    pub dir: PathBuf,
    pub pattern: String,
    pub frames: Vec<Frame>,
}

impl FrameSequence {
    /// Number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame paths in playback order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use seqstamp::{MemorySource, SequenceOptions, discover_sequence};
    /// use std::path::{Path, PathBuf};
    ///
    /// let src = MemorySource::new(["f_2.exr", "f_1.exr"]);
    /// let seq = discover_sequence(&src, Path::new("f_1.exr"), SequenceOptions::default()).unwrap();
    /// assert_eq!(seq.paths(), vec![PathBuf::from("f_1.exr"), PathBuf::from("f_2.exr")]);
    /// ```
    pub fn paths(&self) -> Vec<PathBuf> {
        self.frames.iter().map(|f| f.path.clone()).collect()
    }
}

/// A place to list candidate frame names from.
///
/// Implementations return bare file names (no directory part). Order does not
/// matter; selection sorts by frame number.
///
/// # Examples
///
/// ```rust,ignore
/// use seqstamp::{DiskSource, FrameSource};
/// use std::path::Path;
///
/// // List the frames sitting next to a render.
/// let names = DiskSource.list(Path::new("renders")).expect("read renders");
/// for name in names {
///     println!("found {name}");
/// }
/// ```
pub trait FrameSource {
    /// List the file names in `dir`.
    ///
    /// Returns bare names; an `Err` means the listing itself failed.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;
}

/// A `FrameSource` reading directory entries from the filesystem.
///
/// Subdirectories and names that are not valid UTF-8 are skipped.
///
/// # Examples
///
/// ```rust,ignore
/// use seqstamp::{DiskSource, SequenceOptions, discover_sequence};
/// use std::path::Path;
///
/// let seq = discover_sequence(&DiskSource, Path::new("renders/shot_0001.png"), SequenceOptions::default())
///     .expect("find sequence");
/// println!("{} frames matching {}", seq.len(), seq.pattern);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskSource;

impl FrameSource for DiskSource {
    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = std::fs::read_dir(dir)
            .wrap_err_with(|| format!("failed to list `{}`", dir.display()))?;

        for entry in entries.filter_map(|r| r.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => tracing::trace!(path = %path.display(), "skipping non UTF-8 name"),
            }
        }

        tracing::trace!(dir = %dir.display(), count = names.len(), "listed directory");
        Ok(names)
    }
}

/// A `FrameSource` serving a fixed listing, whatever directory is asked for.
///
/// Useful when names come from somewhere other than a local directory, such
/// as a render farm manifest.
///
/// # Examples
///
/// ```rust
/// use seqstamp::{FrameSource, MemorySource};
/// use std::path::Path;
///
/// let src = MemorySource::new(["a1.png", "a2.png"]);
/// assert_eq!(src.list(Path::new("anywhere")).unwrap(), vec!["a1.png", "a2.png"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<String>,
}

impl MemorySource {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}

impl FrameSource for MemorySource {
    fn list(&self, _dir: &Path) -> Result<Vec<String>> {
        Ok(self.entries.clone())
    }
}

fn select_frames<S: AsRef<str>>(
    sample: &str,
    candidates: &[S],
    options: SequenceOptions,
) -> Result<Vec<(String, Option<u64>)>, SequenceError> {
    let pattern = get_name_pattern(sample)?;

    match get_frame_number(sample) {
        Ok(_) => {}
        Err(PatternError::NoDigitRunFound(_)) if !options.strict => {
            if !candidates.iter().any(|c| c.as_ref() == sample) {
                tracing::debug!(sample, "no frame number and not listed");
                return Ok(Vec::new());
            }
            tracing::debug!(sample, "no frame number; using a single frame");
            return Ok(vec![(sample.to_string(), None)]);
        }
        Err(e) => return Err(e.into()),
    }

    let mut frames = Vec::new();
    for candidate in candidates {
        let name = candidate.as_ref();
        match get_name_pattern(name) {
            Ok(p) if p == pattern => {}
            _ => continue,
        }
        // A literal `#` in a digit-less name can match the pattern too.
        match get_frame_number(name) {
            Ok(n) => frames.push((name.to_string(), Some(n))),
            Err(e) => tracing::warn!(name, error = %e, "skipping frame"),
        }
    }

    frames.sort_by_key(|(_, n)| *n);
    tracing::debug!(sample, pattern = %pattern, frames = frames.len(), "selected sequence");
    Ok(frames)
}

/// Pick the names in `candidates` that belong to the same sequence as
/// `sample`, ordered by frame number (`a2` before `a10`).
pub fn select_sequence<S: AsRef<str>>(
    sample: &str,
    candidates: &[S],
    options: SequenceOptions,
) -> Result<Vec<String>, SequenceError> {
    Ok(select_frames(sample, candidates, options)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

/// Find every sibling of `sample` in its directory that shares its pattern.
pub fn discover_sequence<F: FrameSource>(
    source: &F,
    sample: &Path,
    options: SequenceOptions,
) -> Result<FrameSequence> {
    let name = sample
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SequenceError::InvalidSample(sample.to_path_buf()))?;

    let dir = sample.parent().unwrap_or(Path::new("")).to_path_buf();
    let listing_dir = if dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        dir.as_path()
    };

    let names = source.list(listing_dir)?;
    let pattern = get_name_pattern(name).map_err(SequenceError::from)?;
    let selected = select_frames(name, &names, options)?;

    if selected.is_empty() {
        return Err(SequenceError::NoSequenceFound { dir, pattern }.into());
    }

    let frames = selected
        .into_iter()
        .map(|(n, number)| Frame {
            path: dir.join(n),
            number,
        })
        .collect();

    Ok(FrameSequence {
        dir,
        pattern,
        frames,
    })
}

/// Turn command-line image arguments into an ordered frame list.
///
/// A single path is expanded to its sequence; several paths are taken as
/// given, in the given order.
pub fn resolve_inputs<F: FrameSource>(
    source: &F,
    images: &[PathBuf],
    options: SequenceOptions,
) -> Result<Vec<PathBuf>> {
    match images {
        [] => Err(SequenceError::NoInputs.into()),
        [sample] => {
            let sequence = discover_sequence(source, sample, options)?;
            tracing::info!(
                pattern = %sequence.pattern,
                frames = sequence.len(),
                "detected image sequence"
            );
            Ok(sequence.paths())
        }
        many => Ok(many.to_vec()),
    }
}
