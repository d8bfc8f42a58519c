use std::path::PathBuf;

use crate::{
    error::{PfpError, PfpResult},
    layer::{combine_list, save_png},
    layout::{Layout, MAIN_BIRD_COMPOSED_FILE, MAIN_BIRD_LAYERS},
};

/// Flattens the main bird's source layers into the single-file category the
/// enumerator consumes. Returns the written path.
#[tracing::instrument(skip(layout), fields(base = %layout.base.display()))]
pub fn make_main_bird(layout: &Layout) -> PfpResult<PathBuf> {
    let src_dir = layout.main_bird_dir();
    let layers: Vec<PathBuf> = MAIN_BIRD_LAYERS.iter().map(|f| src_dir.join(f)).collect();

    let img = combine_list(&layers)?
        .ok_or_else(|| PfpError::composite("main bird has no layers"))?;

    let out_dir = layout.main_bird_composed_dir();
    std::fs::create_dir_all(&out_dir).map_err(|e| PfpError::io(&out_dir, e))?;

    let out_path = out_dir.join(MAIN_BIRD_COMPOSED_FILE);
    save_png(&img, &out_path)?;
    tracing::info!(path = %out_path.display(), "composed main bird");
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use super::*;
    use crate::layer::open_rgba;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pfpgen_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn main_bird_stacks_front_lineart_feathers() {
        let tmp = temp_dir("mainbird");
        let layout = Layout::new(tmp.join("base"), tmp.join("out"));
        let src = layout.main_bird_dir();
        std::fs::create_dir_all(&src).unwrap();

        // Three pixels; each layer is opaque in one more of them.
        let front = RgbaImage::from_raw(3, 1, [[1, 1, 1, 255]; 3].concat()).unwrap();
        let lineart = RgbaImage::from_raw(
            3,
            1,
            [[0, 0, 0, 0], [2, 2, 2, 255], [2, 2, 2, 255]].concat(),
        )
        .unwrap();
        let feathers = RgbaImage::from_raw(
            3,
            1,
            [[0, 0, 0, 0], [0, 0, 0, 0], [3, 3, 3, 255]].concat(),
        )
        .unwrap();
        front.save(src.join("front.png")).unwrap();
        lineart.save(src.join("lineart.png")).unwrap();
        feathers.save(src.join("feathers.png")).unwrap();

        let out = make_main_bird(&layout).unwrap();
        assert_eq!(out, tmp.join("base").join("main bird COMPOSED").join("main 1.png"));

        let img = open_rgba(&out).unwrap();
        assert_eq!(
            img.as_raw(),
            &[[1, 1, 1, 255], [2, 2, 2, 255], [3, 3, 3, 255]].concat()
        );

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn missing_layer_fails() {
        let tmp = temp_dir("mainbird_missing");
        let layout = Layout::new(tmp.join("base"), tmp.join("out"));
        assert!(make_main_bird(&layout).is_err());
        assert!(!layout.main_bird_composed_dir().exists());
    }
}
