/// Source rectangle to draw so that an image covers a destination box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverCrop {
    pub sx: f32,
    pub sy: f32,
    pub sw: f32,
    pub sh: f32,
}

/// "Cover" fit: scale uniformly until the destination is filled, then crop
/// the overflow equally from both sides.
///
/// Returns `None` for empty source or destination sizes.
pub fn cover_crop(src_w: f32, src_h: f32, dst_w: f32, dst_h: f32) -> Option<CoverCrop> {
    if !(src_w > 0.0 && src_h > 0.0 && dst_w > 0.0 && dst_h > 0.0) {
        return None;
    }

    let scale = (dst_w / src_w).max(dst_h / src_h);
    let sw = dst_w / scale;
    let sh = dst_h / scale;

    Some(CoverCrop {
        sx: (src_w - sw) * 0.5,
        sy: (src_h - sh) * 0.5,
        sw,
        sh,
    })
}
