use std::path::Path;

use image::RgbaImage;

use crate::{
    composite::over_in_place,
    error::{PfpError, PfpResult},
};

/// What an overlay is composited onto.
#[derive(Debug)]
pub enum Base<'a> {
    Empty,
    Path(&'a Path),
    Image(RgbaImage),
}

impl From<Option<RgbaImage>> for Base<'_> {
    fn from(img: Option<RgbaImage>) -> Self {
        match img {
            Some(img) => Base::Image(img),
            None => Base::Empty,
        }
    }
}

pub fn open_rgba(path: &Path) -> PfpResult<RgbaImage> {
    let img = image::open(path).map_err(|e| PfpError::image(path, e))?;
    Ok(img.to_rgba8())
}

/// Composites the image at `overlay` on top of `base`. With an empty base the
/// overlay itself is returned.
pub fn compose(base: Base<'_>, overlay: &Path) -> PfpResult<RgbaImage> {
    let top = open_rgba(overlay)?;
    let mut bottom = match base {
        Base::Empty => return Ok(top),
        Base::Path(p) => open_rgba(p)?,
        Base::Image(img) => img,
    };
    over_in_place(&mut bottom, &top).map_err(|e| match e {
        PfpError::Composite(msg) => {
            PfpError::composite(format!("{msg} (overlay '{}')", overlay.display()))
        }
        other => other,
    })?;
    Ok(bottom)
}

/// Composites `layers` in order, last on top.
pub fn combine_list<P: AsRef<Path>>(layers: &[P]) -> PfpResult<Option<RgbaImage>> {
    let Some((first, rest)) = layers.split_first() else {
        return Ok(None);
    };
    let mut acc = open_rgba(first.as_ref())?;
    for layer in rest {
        acc = compose(Base::Image(acc), layer.as_ref())?;
    }
    Ok(Some(acc))
}

pub fn save_png(img: &RgbaImage, path: &Path) -> PfpResult<()> {
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| PfpError::image(path, e))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

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

    fn write_px(dir: &Path, name: &str, px: [u8; 4]) -> PathBuf {
        let path = dir.join(name);
        let img = RgbaImage::from_raw(1, 1, px.to_vec()).unwrap();
        save_png(&img, &path).unwrap();
        path
    }

    #[test]
    fn compose_on_empty_returns_overlay() {
        let tmp = temp_dir("layer_empty");
        std::fs::create_dir_all(&tmp).unwrap();
        let top = write_px(&tmp, "top.png", [1, 2, 3, 255]);

        let out = compose(Base::Empty, &top).unwrap();
        assert_eq!(out.as_raw(), &vec![1, 2, 3, 255]);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn compose_from_path_and_image_agree() {
        let tmp = temp_dir("layer_path");
        std::fs::create_dir_all(&tmp).unwrap();
        let bottom = write_px(&tmp, "bottom.png", [0, 0, 255, 255]);
        let top = write_px(&tmp, "top.png", [255, 0, 0, 128]);

        let a = compose(Base::Path(&bottom), &top).unwrap();
        let b = compose(Base::Image(open_rgba(&bottom).unwrap()), &top).unwrap();
        assert_eq!(a.as_raw(), &vec![128, 0, 127, 255]);
        assert_eq!(a, b);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn combine_list_puts_last_on_top() {
        let tmp = temp_dir("layer_combine");
        std::fs::create_dir_all(&tmp).unwrap();
        let a = write_px(&tmp, "a.png", [10, 10, 10, 255]);
        let b = write_px(&tmp, "b.png", [20, 20, 20, 255]);
        let c = write_px(&tmp, "c.png", [30, 30, 30, 255]);

        assert!(combine_list::<PathBuf>(&[]).unwrap().is_none());
        let single = combine_list(&[&a]).unwrap().unwrap();
        assert_eq!(single.as_raw(), &vec![10, 10, 10, 255]);
        let all = combine_list(&[&a, &b, &c]).unwrap().unwrap();
        assert_eq!(all.as_raw(), &vec![30, 30, 30, 255]);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn compose_size_mismatch_names_overlay() {
        let tmp = temp_dir("layer_mismatch");
        std::fs::create_dir_all(&tmp).unwrap();
        let top = write_px(&tmp, "top.png", [1, 1, 1, 255]);

        let err = compose(Base::Image(RgbaImage::new(4, 4)), &top).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("composite error:"));
        assert!(msg.contains("top.png"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn open_missing_file_is_image_error() {
        let err = open_rgba(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, PfpError::Image { .. }));
    }
}
