//! Two-line sequence pair input: sequence A on the first line, B on the second.

use std::path::Path;

use log::debug;

use crate::{AlignerError, Sequence};

pub fn parse_sequence_pair(contents: &str) -> Result<(Sequence, Sequence), AlignerError> {
    let mut lines = contents.lines().map(str::trim_end);
    let (Some(a), Some(b)) = (lines.next(), lines.next()) else {
        return Err(AlignerError::InvalidInput(
            "expected two lines, one sequence per line".to_string(),
        ));
    };
    Ok((Sequence::try_from(a)?, Sequence::try_from(b)?))
}

pub fn read_sequence_pair(path: impl AsRef<Path>) -> Result<(Sequence, Sequence), AlignerError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let (a, b) = parse_sequence_pair(&contents)?;
    debug!(
        "Read sequences of length {} and {} from {}",
        a.len(),
        b.len(),
        path.display()
    );
    Ok((a, b))
}
