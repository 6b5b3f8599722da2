//! The sequencer capabilities a stamp job needs from its host application.
//!
//! The host owns the timeline, the strips and the renderer; a job only sees
//! the [`SequencerHost`] trait. [`PlanHost`] is a headless implementation that
//! records every call so a job can be inspected, serialised and replayed by a
//! real host later.

use crate::pattern::{PathStyle, render_template};
use eyre::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Handle to a strip created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StripId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    Replace,
    AlphaOver,
    Multiply,
    OverDrop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One H.264 QuickTime movie for the whole range.
    #[default]
    H264Quicktime,
    /// One image per frame, named from the output template.
    ImageSequence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub name: String,
    pub text: String,
    pub channel: u32,
    pub start: u64,
    pub end: u64,
    /// Normalised position within the frame, `[x, y]`.
    pub location: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorOverlay {
    pub name: String,
    pub channel: u32,
    pub start: u64,
    pub end: u64,
    pub color: [f32; 3],
    pub blend: BlendMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    /// Output path or template; `#` groups are replaced by the frame number.
    pub output: String,
    pub resolution: (u32, u32),
    pub percentage: u32,
    pub frame_start: u64,
    pub frame_end: u64,
    pub format: OutputFormat,
}

/// Timeline and render operations provided by the host application.
pub trait SequencerHost {
    /// Add an image strip holding `frames` in order, starting at `start`.
    ///
    /// Returns the strip and its duration in frames.
    fn create_sequence(&mut self, name: &str, frames: &[PathBuf], start: u64)
    -> Result<(StripId, u64)>;

    fn add_text_overlay(&mut self, overlay: TextOverlay) -> Result<StripId>;

    fn add_color_overlay(&mut self, overlay: ColorOverlay) -> Result<StripId>;

    /// Combine `strips` into one meta strip composited with `blend`.
    fn group_strips(&mut self, strips: &[StripId], blend: BlendMode) -> Result<StripId>;

    fn set_render_params(&mut self, params: RenderParams) -> Result<()>;

    /// Render the configured frame range, returning the files written.
    fn render_animation(&mut self) -> Result<Vec<PathBuf>>;
}

/// A recorded host call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanStep {
    CreateSequence {
        id: StripId,
        name: String,
        frames: Vec<PathBuf>,
        start: u64,
    },
    AddTextOverlay {
        id: StripId,
        #[serde(flatten)]
        overlay: TextOverlay,
    },
    AddColorOverlay {
        id: StripId,
        #[serde(flatten)]
        overlay: ColorOverlay,
    },
    GroupStrips {
        id: StripId,
        strips: Vec<StripId>,
        blend: BlendMode,
    },
    SetRenderParams(RenderParams),
    RenderAnimation {
        outputs: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    pub steps: Vec<PlanStep>,
}

impl RenderPlan {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A `SequencerHost` that renders nothing and records every call.
#[derive(Debug, Default)]
pub struct PlanHost {
    plan: RenderPlan,
    next_id: u32,
    params: Option<RenderParams>,
}

impl PlanHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    pub fn into_plan(self) -> RenderPlan {
        self.plan
    }

    fn allocate(&mut self) -> StripId {
        let id = StripId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl SequencerHost for PlanHost {
    fn create_sequence(
        &mut self,
        name: &str,
        frames: &[PathBuf],
        start: u64,
    ) -> Result<(StripId, u64)> {
        if frames.is_empty() {
            bail!("image strip `{name}` has no frames");
        }
        let id = self.allocate();
        self.plan.steps.push(PlanStep::CreateSequence {
            id,
            name: name.to_string(),
            frames: frames.to_vec(),
            start,
        });
        Ok((id, frames.len() as u64))
    }

    fn add_text_overlay(&mut self, overlay: TextOverlay) -> Result<StripId> {
        let id = self.allocate();
        self.plan.steps.push(PlanStep::AddTextOverlay { id, overlay });
        Ok(id)
    }

    fn add_color_overlay(&mut self, overlay: ColorOverlay) -> Result<StripId> {
        let id = self.allocate();
        self.plan.steps.push(PlanStep::AddColorOverlay { id, overlay });
        Ok(id)
    }

    fn group_strips(&mut self, strips: &[StripId], blend: BlendMode) -> Result<StripId> {
        if strips.is_empty() {
            bail!("cannot group an empty set of strips");
        }
        let id = self.allocate();
        self.plan.steps.push(PlanStep::GroupStrips {
            id,
            strips: strips.to_vec(),
            blend,
        });
        Ok(id)
    }

    fn set_render_params(&mut self, params: RenderParams) -> Result<()> {
        if params.frame_end < params.frame_start {
            bail!(
                "invalid frame range {}..={}",
                params.frame_start,
                params.frame_end
            );
        }
        self.params = Some(params.clone());
        self.plan.steps.push(PlanStep::SetRenderParams(params));
        Ok(())
    }

    fn render_animation(&mut self) -> Result<Vec<PathBuf>> {
        let Some(params) = &self.params else {
            bail!("render parameters were not set");
        };

        let outputs: Vec<PathBuf> = match params.format {
            OutputFormat::ImageSequence => (params.frame_start..=params.frame_end)
                .map(|f| PathBuf::from(render_template(&params.output, f)))
                .collect(),
            OutputFormat::H264Quicktime => {
                // Movies carry the range instead of per-frame numbers.
                let base = movie_base(&params.output, PathStyle::Native);
                let range = format!("{:04}-{:04}.mov", params.frame_start, params.frame_end);
                vec![PathBuf::from(format!("{base}{range}"))]
            }
        };

        tracing::debug!(outputs = outputs.len(), "planned render");
        self.plan.steps.push(PlanStep::RenderAnimation {
            outputs: outputs.clone(),
        });
        Ok(outputs)
    }
}

/// Drop `#` placeholders from the final component of `output`, leaving the
/// directory part untouched.
fn movie_base(output: &str, style: PathStyle) -> String {
    let name = style.basename(output);
    let (dir, _) = output.split_at(output.len() - name.len());
    format!("{dir}{}", name.replace('#', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(format: OutputFormat) -> RenderParams {
        RenderParams {
            output: "/tmp/out/shot_###".into(),
            resolution: (64, 32),
            percentage: 100,
            frame_start: 1,
            frame_end: 3,
            format,
        }
    }

    #[test]
    fn strip_ids_are_sequential() {
        let mut host = PlanHost::new();
        let (img, len) = host
            .create_sequence("img", &[PathBuf::from("a1.png"), PathBuf::from("a2.png")], 1)
            .unwrap();
        assert_eq!(img, StripId(0));
        assert_eq!(len, 2);
        let color = host
            .add_color_overlay(ColorOverlay {
                name: "bg".into(),
                channel: 3,
                start: 1,
                end: 2,
                color: [0.0, 0.0, 1.0],
                blend: BlendMode::Multiply,
            })
            .unwrap();
        assert_eq!(color, StripId(1));
        let meta = host.group_strips(&[img, color], BlendMode::OverDrop).unwrap();
        assert_eq!(meta, StripId(2));
        assert_eq!(host.plan().steps.len(), 3);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let mut host = PlanHost::new();
        assert!(host.create_sequence("img", &[], 1).is_err());
        assert!(host.group_strips(&[], BlendMode::OverDrop).is_err());
        assert!(host.render_animation().is_err());
    }

    #[test]
    fn image_sequence_outputs_follow_the_template() {
        let mut host = PlanHost::new();
        host.set_render_params(params(OutputFormat::ImageSequence))
            .unwrap();
        let out = host.render_animation().unwrap();
        assert_eq!(
            out,
            vec![
                PathBuf::from("/tmp/out/shot_001"),
                PathBuf::from("/tmp/out/shot_002"),
                PathBuf::from("/tmp/out/shot_003"),
            ]
        );
    }

    #[test]
    fn movie_output_names_the_range() {
        let mut host = PlanHost::new();
        host.set_render_params(params(OutputFormat::H264Quicktime))
            .unwrap();
        let out = host.render_animation().unwrap();
        assert_eq!(out, vec![PathBuf::from("/tmp/out/shot_0001-0003.mov")]);
    }

    #[test]
    fn movie_output_keeps_placeholders_in_directories() {
        let mut host = PlanHost::new();
        host.set_render_params(RenderParams {
            output: "out_##/take_##".into(),
            ..params(OutputFormat::H264Quicktime)
        })
        .unwrap();
        let out = host.render_animation().unwrap();
        assert_eq!(out, vec![PathBuf::from("out_##/take_0001-0003.mov")]);

        assert_eq!(movie_base(r"C:\out_#\take_#", PathStyle::Windows), r"C:\out_#\take_");
    }

    #[test]
    fn plan_serialises_with_op_tags() {
        let mut host = PlanHost::new();
        host.add_text_overlay(TextOverlay {
            name: "label".into(),
            text: "Frame: 0000".into(),
            channel: 2,
            start: 1,
            end: 2,
            location: [0.5, 0.0],
        })
        .unwrap();
        let json = host.plan().to_json().unwrap();
        assert!(json.contains("\"op\": \"add_text_overlay\""));
        assert!(json.contains("\"text\": \"Frame: 0000\""));

        let back: RenderPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, host.plan());
    }
}
