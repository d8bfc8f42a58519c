use std::path::{Path, PathBuf};

use crate::error::{PfpError, PfpResult};

/// The pick made for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    Skip,
    Layer(PathBuf),
}

impl Choice {
    pub fn layer_path(&self) -> Option<&Path> {
        match self {
            Choice::Skip => None,
            Choice::Layer(p) => Some(p),
        }
    }
}

/// `"0"` for a skipped category, otherwise the variant number at the end of
/// the file stem (`"stage 12.png"` -> `"12"`). Stems without trailing digits
/// fall back to their last character.
pub fn variant_token(choice: &Choice) -> PfpResult<String> {
    let path = match choice {
        Choice::Skip => return Ok("0".to_string()),
        Choice::Layer(p) => p,
    };
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PfpError::naming(format!("'{}' has no usable stem", path.display())))?;

    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i);
    if let Some(start) = digits_start {
        return Ok(stem[start..].to_string());
    }

    stem.chars()
        .next_back()
        .map(String::from)
        .ok_or_else(|| PfpError::naming(format!("'{}' has an empty stem", path.display())))
}

/// Output file name for a full combination, e.g. `0_2_1_0_3_1.png`.
pub fn combo_name(choices: &[Choice]) -> PfpResult<String> {
    let tokens = choices
        .iter()
        .map(variant_token)
        .collect::<PfpResult<Vec<_>>>()?;
    Ok(format!("{}.png", tokens.join("_")))
}
