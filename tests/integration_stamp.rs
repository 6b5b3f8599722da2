use eyre::Result;
use seqstamp::host::{OutputFormat, PlanHost, PlanStep};
use seqstamp::stamp::StampJob;
use seqstamp::{DiskSource, SequenceOptions, resolve_inputs};
use tempfile::tempdir;

#[test]
fn stamps_a_sequence_found_on_disk() -> Result<()> {
    let tmpdir = tempdir()?;
    let tmp = tmpdir.path();
    for f in [3, 1, 2] {
        image::RgbImage::new(16, 8).save(tmp.join(format!("plate_{f:04}.png")))?;
    }

    let frames = resolve_inputs(
        &DiskSource,
        &[tmp.join("plate_0002.png")],
        SequenceOptions::default(),
    )?;
    assert_eq!(frames.len(), 3);
    assert!(frames[0].ends_with("plate_0001.png"));

    let mut job = StampJob::new(frames);
    job.output = tmp.join("preview_###.jpg").to_string_lossy().to_string();
    job.format = OutputFormat::ImageSequence;

    let mut host = PlanHost::new();
    let outputs = job.run(&mut host)?;
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[2], tmp.join("preview_003.jpg"));

    let params = host
        .plan()
        .steps
        .iter()
        .find_map(|s| match s {
            PlanStep::SetRenderParams(p) => Some(p.clone()),
            _ => None,
        })
        .expect("render params recorded");
    assert_eq!(params.resolution, (16, 8));
    assert_eq!(params.frame_end, 3);

    let groups = host
        .plan()
        .steps
        .iter()
        .filter(|s| matches!(s, PlanStep::GroupStrips { .. }))
        .count();
    assert_eq!(groups, 3);
    Ok(())
}

#[test]
fn movie_output_goes_next_to_the_frames_by_default() -> Result<()> {
    let tmpdir = tempdir()?;
    let tmp = tmpdir.path();
    let frame = tmp.join("take_1.png");
    image::RgbImage::new(4, 4).save(&frame)?;

    let job = StampJob::new(vec![frame]);
    let mut host = PlanHost::new();
    let outputs = job.run(&mut host)?;
    assert_eq!(outputs, vec![tmp.join("0001-0001.mov")]);
    Ok(())
}
