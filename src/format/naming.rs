//! Segment file naming from `$Identifier$` templates.
//!
//! Supported identifiers are `$Number$`, `$Time$` and `$Bandwidth$`, each
//! optionally carrying a `%0<width>d` format tag (`$Number%05d$`). `$$`
//! produces a literal `$`.

use crate::error::{Result, VdkError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identifier {
    Number,
    Time,
    Bandwidth,
}

struct Placeholder {
    identifier: Identifier,
    width: usize,
}

fn parse_placeholder(token: &str) -> Result<Placeholder> {
    let (name, format_tag) = match token.find('%') {
        Some(pos) => (&token[..pos], Some(&token[pos..])),
        None => (token, None),
    };
    let identifier = match name {
        "Number" => Identifier::Number,
        "Time" => Identifier::Time,
        "Bandwidth" => Identifier::Bandwidth,
        other => {
            return Err(VdkError::muxer(format!(
                "SegmentTemplate: unknown identifier ${}$",
                other
            )))
        }
    };
    let width = match format_tag {
        None => 0,
        Some(tag) => parse_format_tag(tag)?,
    };
    Ok(Placeholder { identifier, width })
}

/// Accepts only `%0<width>d`.
fn parse_format_tag(tag: &str) -> Result<usize> {
    tag.strip_prefix("%0")
        .and_then(|rest| rest.strip_suffix('d'))
        .filter(|digits| !digits.is_empty())
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| {
            VdkError::muxer(format!(
                "SegmentTemplate: format tag should follow %0[width]d, got {}",
                tag
            ))
        })
}

/// Checks that `template` can name segments: balanced `$`, known
/// identifiers, valid format tags, and at least one of `$Number$` or
/// `$Time$` so successive segments get distinct names.
pub fn validate_segment_template(template: &str) -> Result<()> {
    if template.is_empty() {
        return Err(VdkError::muxer("Segment template not specified."));
    }
    let splits: Vec<&str> = template.split('$').collect();
    if splits.len() % 2 == 0 {
        return Err(VdkError::muxer(format!(
            "SegmentTemplate: '$' should appear in pairs in {}",
            template
        )));
    }

    let mut has_number_or_time = false;
    for token in splits.iter().skip(1).step_by(2) {
        if token.is_empty() {
            continue;
        }
        let placeholder = parse_placeholder(token)?;
        has_number_or_time |= placeholder.identifier != Identifier::Bandwidth;
    }
    if !has_number_or_time {
        return Err(VdkError::muxer(format!(
            "SegmentTemplate: $Number$ or $Time$ should exist in {}",
            template
        )));
    }
    Ok(())
}

/// Expands `template` for one segment. `segment_number` is zero-based
/// and `$Number$` renders it starting from 1.
pub fn segment_name(
    template: &str,
    segment_start_time: i64,
    segment_number: u32,
    bandwidth: u32,
) -> Result<String> {
    let mut name = String::with_capacity(template.len() + 16);
    for (i, token) in template.split('$').enumerate() {
        if i % 2 == 0 {
            name.push_str(token);
            continue;
        }
        if token.is_empty() {
            name.push('$');
            continue;
        }
        let placeholder = parse_placeholder(token)?;
        let value = match placeholder.identifier {
            Identifier::Number => segment_number as i64 + 1,
            Identifier::Time => segment_start_time,
            Identifier::Bandwidth => bandwidth as i64,
        };
        name.push_str(&format!("{:0width$}", value, width = placeholder.width));
    }
    Ok(name)
}
