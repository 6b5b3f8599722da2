use crate::consts::{
    FRAME_LABEL_BACKGROUND, FRAME_LABEL_CHANNEL, FRAME_LABEL_LOCATION, METADATA_CHANNEL,
    METADATA_LOCATION, RESOLUTION_RE,
};
use crate::host::{
    BlendMode, ColorOverlay, OutputFormat, RenderParams, SequencerHost, TextOverlay,
};
use eyre::{Result, WrapErr, eyre};
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Shot information burnt into every frame of the preview.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampMetadata {
    pub date: Option<String>,
    pub author: Option<String>,
    pub project: Option<String>,
    pub shot: Option<String>,
    pub sequence: Option<String>,
    pub focal: Option<String>,
    pub rendertime: Option<String>,
    pub text: Option<String>,
}

impl StampMetadata {
    fn fields(&self) -> [(&'static str, &Option<String>); 8] {
        [
            ("Project", &self.project),
            ("Sequence", &self.sequence),
            ("Shot", &self.shot),
            ("Author", &self.author),
            ("Date", &self.date),
            ("Focal", &self.focal),
            ("Render time", &self.rendertime),
            ("Text", &self.text),
        ]
    }

    /// One line of `Label: value` pairs for the fields that are set.
    pub fn summary(&self) -> String {
        self.fields()
            .iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{label}: {v}"))
            })
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}

/// Parse a `WIDTHxHEIGHT` string such as `1920x1080`.
pub fn parse_resolution(s: &str) -> Result<(u32, u32)> {
    let caps = RESOLUTION_RE
        .captures(s)
        .ok_or_else(|| eyre!("invalid resolution `{s}`, expected WIDTHxHEIGHT"))?;
    let width: u32 = caps[1].parse().wrap_err("invalid width")?;
    let height: u32 = caps[2].parse().wrap_err("invalid height")?;
    if width == 0 || height == 0 {
        eyre::bail!("resolution must be non-zero, got {width}x{height}");
    }
    Ok((width, height))
}

/// Output used when none is given: the first frame's directory, with a
/// trailing separator so rendered names are just frame numbers.
pub fn default_output(first_frame: &Path) -> String {
    let dir = first_frame
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();
    if dir.is_empty() || dir.ends_with(MAIN_SEPARATOR) {
        dir
    } else {
        format!("{dir}{MAIN_SEPARATOR}")
    }
}

/// Everything needed to stamp and render one image sequence.
#[derive(Debug, Clone)]
pub struct StampJob {
    /// Frames in playback order.
    pub frames: Vec<PathBuf>,
    /// Output path or `#` template.
    pub output: String,
    pub metadata: StampMetadata,
    /// Render size; probed from the first frame when unset.
    pub resolution: Option<(u32, u32)>,
    pub format: OutputFormat,
    /// Prefix of the per-frame label, `Frame` gives `Frame: 0000`.
    pub frame_label: String,
}

impl StampJob {
    pub fn new(frames: Vec<PathBuf>) -> Self {
        let output = frames.first().map(|f| default_output(f)).unwrap_or_default();
        Self {
            frames,
            output,
            metadata: StampMetadata::default(),
            resolution: None,
            format: OutputFormat::default(),
            frame_label: "Frame".to_string(),
        }
    }

    fn resolution(&self) -> Result<(u32, u32)> {
        if let Some(r) = self.resolution {
            return Ok(r);
        }
        let first = self
            .frames
            .first()
            .ok_or_else(|| eyre!("stamp job has no frames"))?;
        let size = image::image_dimensions(first)
            .wrap_err_with(|| format!("failed to read image size of `{}`", first.display()))?;
        tracing::debug!(width = size.0, height = size.1, "probed resolution");
        Ok(size)
    }

    /// Build the timeline on `host` and render it.
    ///
    /// Returns the files the host reports as written.
    pub fn run<H: SequencerHost>(&self, host: &mut H) -> Result<Vec<PathBuf>> {
        let (_, duration) = host.create_sequence("img", &self.frames, 1)?;
        let resolution = self.resolution()?;

        host.set_render_params(RenderParams {
            output: self.output.clone(),
            resolution,
            percentage: 100,
            frame_start: 1,
            frame_end: duration,
            format: self.format,
        })?;
        tracing::info!(
            frames = duration,
            output = %self.output,
            "configured render of {}x{}",
            resolution.0,
            resolution.1
        );

        for f in 0..duration {
            self.add_frame_label(host, f)?;
        }

        let summary = self.metadata.summary();
        if !summary.is_empty() {
            host.add_text_overlay(TextOverlay {
                name: "metadata".to_string(),
                text: summary,
                channel: METADATA_CHANNEL,
                start: 1,
                end: duration + 1,
                location: METADATA_LOCATION,
            })?;
        }

        let outputs = host.render_animation()?;
        tracing::info!(files = outputs.len(), "render finished");
        Ok(outputs)
    }

    /// Label frame `f` (0-based) with its number over a tinted band.
    fn add_frame_label<H: SequencerHost>(&self, host: &mut H, f: u64) -> Result<()> {
        let text = format!("{}: {f:04}", self.frame_label);
        let name = format!("{text}_f{f:04}");

        let label = host.add_text_overlay(TextOverlay {
            name: name.clone(),
            text,
            channel: FRAME_LABEL_CHANNEL,
            start: f + 1,
            end: f + 2,
            location: FRAME_LABEL_LOCATION,
        })?;
        let band = host.add_color_overlay(ColorOverlay {
            name: format!("{name}_BG"),
            channel: FRAME_LABEL_CHANNEL + 1,
            start: f + 1,
            end: f + 2,
            color: FRAME_LABEL_BACKGROUND,
            blend: BlendMode::Multiply,
        })?;
        host.group_strips(&[label, band], BlendMode::OverDrop)?;

        tracing::trace!(frame = f, "added frame label");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PlanHost, PlanStep};

    #[test]
    fn summary_skips_missing_and_blank_fields() {
        let meta = StampMetadata {
            project: Some("Tide".into()),
            shot: Some("sh010".into()),
            author: Some("  ".into()),
            date: Some("2026-10-18".into()),
            ..Default::default()
        };
        assert_eq!(
            meta.summary(),
            "Project: Tide  |  Shot: sh010  |  Date: 2026-10-18"
        );
        assert_eq!(StampMetadata::default().summary(), "");
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!(parse_resolution("1920x1080").unwrap(), (1920, 1080));
        assert_eq!(parse_resolution(" 64 X 32 ").unwrap(), (64, 32));
        assert!(parse_resolution("1920").is_err());
        assert!(parse_resolution("0x10").is_err());
    }

    #[test]
    fn default_output_is_the_frame_directory() {
        let first = Path::new("renders").join("a_0001.png");
        assert_eq!(default_output(&first), format!("renders{MAIN_SEPARATOR}"));
        assert_eq!(default_output(Path::new("a_0001.png")), "");
    }

    #[test]
    fn run_builds_labels_and_renders() {
        let frames = vec![PathBuf::from("a_1.png"), PathBuf::from("a_2.png")];
        let mut job = StampJob::new(frames);
        job.resolution = Some((320, 240));
        job.output = "out/prev_####".into();
        job.format = OutputFormat::ImageSequence;
        job.metadata.shot = Some("sh020".into());

        let mut host = PlanHost::new();
        let outputs = job.run(&mut host).unwrap();
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/prev_0001"),
                PathBuf::from("out/prev_0002")
            ]
        );

        let steps = &host.plan().steps;
        // sequence, params, 2 x (text, colour, group), metadata, render
        assert_eq!(steps.len(), 10);

        let labels: Vec<_> = steps
            .iter()
            .filter_map(|s| match s {
                PlanStep::AddTextOverlay { overlay, .. } => Some(overlay.text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Frame: 0000", "Frame: 0001", "Shot: sh020"]);

        match &steps[1] {
            PlanStep::SetRenderParams(p) => {
                assert_eq!(p.resolution, (320, 240));
                assert_eq!((p.frame_start, p.frame_end), (1, 2));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn missing_image_fails_without_override() {
        let job = StampJob::new(vec![PathBuf::from("does/not/exist_0001.png")]);
        let mut host = PlanHost::new();
        let err = job.run(&mut host).unwrap_err();
        assert!(err.to_string().contains("failed to read image size"));
    }
}
