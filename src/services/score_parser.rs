use crate::models::Score;

/// Returns the first maximal run of ASCII digits in `response` as a score.
///
/// The first run wins even when later numbers look more like a percentage,
/// so `"between 30 and 70 percent"` yields 30. Runs that overflow `u64`
/// saturate.
pub fn parse_score(response: &str) -> Option<Score> {
    let start = response.find(|c: char| c.is_ascii_digit())?;
    let run = &response[start..];
    let end = run
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(run.len());

    let value = run[..end].bytes().fold(0u64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(u64::from(digit - b'0'))
    });

    tracing::debug!(score = value, offset = start, "Parsed score from model response");
    Some(Score(value))
}
