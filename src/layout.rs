use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PfpError, PfpResult};

pub const DEFAULT_BASE: &str = "blue jay";
pub const DEFAULT_OUT: &str = "pfps";

pub const MAIN_BIRD_DIR: &str = "main bird";
pub const MAIN_BIRD_COMPOSED_DIR: &str = "main bird COMPOSED";
pub const MAIN_BIRD_COMPOSED_FILE: &str = "main 1.png";
/// Bottom to top.
pub const MAIN_BIRD_LAYERS: [&str; 3] = ["front.png", "lineart.png", "feathers.png"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Directory name under the base path.
    pub dir: String,
    /// Offers a "no item" choice in addition to the files.
    pub optional: bool,
}

impl Category {
    pub fn required(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            optional: false,
        }
    }

    pub fn optional(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            optional: true,
        }
    }
}

/// Where layers are read from, where composites go, and the stacking order
/// of categories (first is bottom-most).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub base: PathBuf,
    pub out: PathBuf,
    pub categories: Vec<Category>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE, DEFAULT_OUT)
    }
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>, out: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            out: out.into(),
            categories: vec![
                Category::optional("stages"),
                Category::required("body"),
                Category::required(MAIN_BIRD_COMPOSED_DIR),
                Category::optional("accent"),
                Category::optional("accessory"),
                Category::optional("object"),
            ],
        }
    }

    pub fn validate(&self) -> PfpResult<()> {
        if self.categories.is_empty() {
            return Err(PfpError::layout("no categories configured"));
        }
        if self.categories.iter().all(|c| c.optional) {
            return Err(PfpError::layout(
                "at least one category must be required, otherwise a combination can be empty",
            ));
        }
        for cat in &self.categories {
            if cat.dir.trim().is_empty() {
                return Err(PfpError::layout("category name must not be empty"));
            }
            if cat.dir.contains(['/', '\\']) || cat.dir == "." || cat.dir == ".." {
                return Err(PfpError::layout(format!(
                    "category '{}' must be a plain directory name",
                    cat.dir
                )));
            }
        }
        Ok(())
    }

    pub fn category_dir(&self, cat: &Category) -> PathBuf {
        self.base.join(&cat.dir)
    }

    pub fn main_bird_dir(&self) -> PathBuf {
        self.base.join(MAIN_BIRD_DIR)
    }

    pub fn main_bird_composed_dir(&self) -> PathBuf {
        self.base.join(MAIN_BIRD_COMPOSED_DIR)
    }

    /// Layer files of `cat`, sorted by path.
    pub fn category_files(&self, cat: &Category) -> PfpResult<Vec<PathBuf>> {
        list_layer_files(&self.category_dir(cat))
    }
}

fn list_layer_files(dir: &Path) -> PfpResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| PfpError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PfpError::io(dir, e))?;
        let path = entry.path();
        if !is_layer_file(&path) {
            continue;
        }
        // Follows symlinks.
        let meta = std::fs::metadata(&path).map_err(|e| PfpError::io(&path, e))?;
        if !meta.is_file() {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

fn is_layer_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
