//! Backtracking enumeration of every layer combination.
//!
//! Categories are visited in stacking order. An optional category first
//! tries "no item", then each of its files; a required category only tries
//! its files. Every complete set of choices is a leaf and is handed to the
//! caller together with the state accumulated along the path.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::RgbaImage;
use serde::Serialize;

use crate::{
    error::{PfpError, PfpResult},
    layer::{Base, compose, save_png},
    layout::{Category, Layout},
    naming::{Choice, combo_name, variant_token},
};

/// State threaded through the recursion. Skipped categories reuse the parent
/// state unchanged.
pub trait LayerStack: Sized {
    fn empty() -> Self;
    fn with_layer(&self, layer: &Path) -> PfpResult<Self>;
}

/// Incrementally composited image; `None` until the first layer lands.
#[derive(Clone, Debug, Default)]
pub struct Composite(pub Option<RgbaImage>);

impl LayerStack for Composite {
    fn empty() -> Self {
        Self(None)
    }

    fn with_layer(&self, layer: &Path) -> PfpResult<Self> {
        let base = Base::from(self.0.clone());
        Ok(Self(Some(compose(base, layer)?)))
    }
}

/// Stack that never touches pixels; used to list combinations.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanOnly;

impl LayerStack for PlanOnly {
    fn empty() -> Self {
        PlanOnly
    }

    fn with_layer(&self, _layer: &Path) -> PfpResult<Self> {
        Ok(PlanOnly)
    }
}

/// Receives finished composites.
pub trait ComboSink {
    fn emit(&mut self, choices: &[Choice], image: &RgbaImage) -> PfpResult<()>;
}

/// Writes each composite to `<dir>/<combo_name>`, replacing existing files.
#[derive(Clone, Debug)]
pub struct PngDirSink {
    dir: PathBuf,
}

impl PngDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ComboSink for PngDirSink {
    fn emit(&mut self, choices: &[Choice], image: &RgbaImage) -> PfpResult<()> {
        let path = self.dir.join(combo_name(choices)?);
        save_png(image, &path)?;
        tracing::debug!(path = %path.display(), "wrote combination");
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerateReport {
    pub written: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlannedCombo {
    pub name: String,
    /// Layer files bottom to top; skipped categories are absent.
    pub layers: Vec<PathBuf>,
}

/// Depth-first walk over all combinations of `layout`. Category directories
/// are listed once up front.
pub fn walk<S, F>(layout: &Layout, root: S, mut visit: F) -> PfpResult<()>
where
    S: LayerStack,
    F: FnMut(&[Choice], &S) -> PfpResult<()>,
{
    if layout.categories.is_empty() {
        return Ok(());
    }
    let options = category_options(layout)?;
    let mut choices = Vec::with_capacity(options.len());
    walk_from(&options, 0, &root, &mut choices, &mut visit)
}

fn walk_from<S, F>(
    options: &[Vec<Choice>],
    depth: usize,
    stack: &S,
    choices: &mut Vec<Choice>,
    visit: &mut F,
) -> PfpResult<()>
where
    S: LayerStack,
    F: FnMut(&[Choice], &S) -> PfpResult<()>,
{
    let is_leaf = depth + 1 == options.len();
    for choice in &options[depth] {
        let next = match choice {
            Choice::Skip => None,
            Choice::Layer(path) => Some(stack.with_layer(path)?),
        };
        let next = next.as_ref().unwrap_or(stack);

        choices.push(choice.clone());
        let res = if is_leaf {
            visit(choices, next)
        } else {
            walk_from(options, depth + 1, next, choices, visit)
        };
        choices.pop();
        res?;
    }
    Ok(())
}

fn category_options(layout: &Layout) -> PfpResult<Vec<Vec<Choice>>> {
    layout
        .categories
        .iter()
        .map(|cat| {
            let files = layout.category_files(cat)?;
            check_unique_tokens(cat, &files)?;
            let mut opts = Vec::with_capacity(files.len() + 1);
            if cat.optional {
                opts.push(Choice::Skip);
            }
            opts.extend(files.into_iter().map(Choice::Layer));
            Ok(opts)
        })
        .collect()
}

/// Two variants of one category must never map to the same output name.
fn check_unique_tokens(cat: &Category, files: &[PathBuf]) -> PfpResult<()> {
    let mut seen: HashMap<String, &Path> = HashMap::with_capacity(files.len());
    for file in files {
        let token = variant_token(&Choice::Layer(file.clone()))?;
        if cat.optional && token == "0" {
            return Err(PfpError::naming(format!(
                "'{}' in optional category '{}' has variant 0, which marks a skipped category",
                file.display(),
                cat.dir
            )));
        }
        if let Some(prev) = seen.insert(token.clone(), file) {
            return Err(PfpError::naming(format!(
                "'{}' and '{}' in category '{}' both map to variant '{token}'",
                prev.display(),
                file.display(),
                cat.dir
            )));
        }
    }
    Ok(())
}

/// Composites and emits every combination of `layout`.
#[tracing::instrument(skip(layout, sink), fields(base = %layout.base.display(), out = %layout.out.display()))]
pub fn generate(layout: &Layout, sink: &mut dyn ComboSink) -> PfpResult<GenerateReport> {
    layout.validate()?;
    std::fs::create_dir_all(&layout.out).map_err(|e| PfpError::io(&layout.out, e))?;

    let mut report = GenerateReport::default();
    walk(layout, Composite::empty(), |choices, stack| {
        let img = stack.0.as_ref().ok_or_else(|| {
            PfpError::composite("combination selected no layers; nothing to save")
        })?;
        sink.emit(choices, img)?;
        report.written += 1;
        if report.written.is_multiple_of(100) {
            tracing::info!(written = report.written, "progress");
        }
        Ok(())
    })?;

    tracing::info!(written = report.written, "generated combinations");
    Ok(report)
}

/// Same traversal and order as [`generate`], without decoding images.
pub fn plan(layout: &Layout) -> PfpResult<Vec<PlannedCombo>> {
    layout.validate()?;
    let mut out = Vec::new();
    walk(layout, PlanOnly, |choices, _| {
        out.push(PlannedCombo {
            name: combo_name(choices)?,
            layers: choices
                .iter()
                .filter_map(|c| c.layer_path().map(Path::to_path_buf))
                .collect(),
        });
        Ok(())
    })?;
    Ok(out)
}

/// Product over categories of the number of choices each offers.
pub fn count_combinations(layout: &Layout) -> PfpResult<u64> {
    layout.validate()?;
    let mut total = 1u64;
    for cat in &layout.categories {
        let n = layout.category_files(cat)?.len() as u64 + u64::from(cat.optional);
        total = total.saturating_mul(n);
    }
    Ok(total)
}
