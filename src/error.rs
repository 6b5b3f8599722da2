use std::path::PathBuf;

/// Failures of the frame-pattern resolver.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("empty name")]
    EmptyInputName,

    #[error("no frame number found in `{0}`")]
    NoDigitRunFound(String),

    #[error("frame number `{digits}` in `{name}` is out of range")]
    FrameNumberOutOfRange { name: String, digits: String },
}

/// Failures while turning input paths into an ordered frame list.
#[derive(thiserror::Error, Debug)]
pub enum SequenceError {
    #[error("no input images given")]
    NoInputs,

    #[error("`{}` has no file name", .0.display())]
    InvalidSample(PathBuf),

    #[error(
        "no image sequence detected for `{pattern}` in `{}` - check that filenames contain frame numbers",
        .dir.display()
    )]
    NoSequenceFound { dir: PathBuf, pattern: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(PatternError::EmptyInputName.to_string(), "empty name");
        assert!(
            PatternError::NoDigitRunFound("frame.png".into())
                .to_string()
                .contains("frame.png")
        );
        let err = SequenceError::NoSequenceFound {
            dir: PathBuf::from("renders"),
            pattern: "shot_#.png".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("no image sequence detected"));
        assert!(msg.contains("shot_#.png"));
    }

    #[test]
    fn pattern_errors_convert() {
        let err: SequenceError = PatternError::EmptyInputName.into();
        assert!(matches!(
            err,
            SequenceError::Pattern(PatternError::EmptyInputName)
        ));
    }
}
