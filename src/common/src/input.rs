use crate::{error::Result, model::game::Choice};

/// Trim and lowercase raw text, then match it exactly against the canonical
/// symbols. No partial matches or abbreviations.
pub fn normalize(raw: &str) -> Result<Choice> {
    raw.trim().to_lowercase().parse()
}
