use image::RgbaImage;

use crate::error::{PfpError, PfpResult};

/// Straight (non-premultiplied) RGBA8.
pub type Rgba8 = [u8; 4];

/// Porter-Duff source-over for straight alpha. A fully transparent result is
/// normalised to `[0, 0, 0, 0]`.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return if dst[3] == 0 { [0, 0, 0, 0] } else { dst };
    }

    // Weights are scaled by 255^2.
    let src_w = sa * 255;
    let dst_w = u32::from(dst[3]) * (255 - sa);
    let total = src_w + dst_w;

    let mut out = [0u8; 4];
    out[3] = div_round(total, 255) as u8;
    for i in 0..3 {
        let num = u32::from(src[i]) * src_w + u32::from(dst[i]) * dst_w;
        out[i] = div_round(num, total) as u8;
    }
    out
}

pub fn over_in_place(dst: &mut RgbaImage, src: &RgbaImage) -> PfpResult<()> {
    if dst.dimensions() != src.dimensions() {
        let (dw, dh) = dst.dimensions();
        let (sw, sh) = src.dimensions();
        return Err(PfpError::composite(format!(
            "layer sizes differ: base is {dw}x{dh}, overlay is {sw}x{sh}"
        )));
    }
    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        d.0 = over(d.0, s.0);
    }
    Ok(())
}

/// Returns `overlay` composited on top of `base`.
pub fn alpha_composite(base: &RgbaImage, overlay: &RgbaImage) -> PfpResult<RgbaImage> {
    let mut out = base.clone();
    over_in_place(&mut out, overlay)?;
    Ok(out)
}

fn div_round(num: u32, den: u32) -> u32 {
    (num + den / 2) / den
}
