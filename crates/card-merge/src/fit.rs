//! Aspect-preserving image fitting

use crate::types::ImageError;

/// Scaled size of an image and its offset inside the target box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageFit {
    pub draw_width: f32,
    pub draw_height: f32,
    /// Offset from the box's left edge
    pub offset_x: f32,
    /// Offset from the box's top edge
    pub offset_y: f32,
}

/// Scale an `img_width` x `img_height` image uniformly into the box and center it.
///
/// Box and result share one unit; the image size only contributes its ratio.
/// A non-positive image dimension means the metadata could not be read.
pub fn fit(
    box_width: f32,
    box_height: f32,
    img_width: f32,
    img_height: f32,
) -> Result<ImageFit, ImageError> {
    if img_width <= 0.0 || img_height <= 0.0 {
        return Err(ImageError::Unreadable {
            reference: String::new(),
            reason: format!("image reports {}x{}", img_width, img_height),
        });
    }

    let ratio = (box_width / img_width).min(box_height / img_height);
    let draw_width = img_width * ratio;
    let draw_height = img_height * ratio;

    Ok(ImageFit {
        draw_width,
        draw_height,
        offset_x: ((box_width - draw_width) / 2.0).max(0.0),
        offset_y: ((box_height - draw_height) / 2.0).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_wide_image_is_width_limited() {
        let f = fit(100.0, 100.0, 400.0, 200.0).unwrap();
        assert!((f.draw_width - 100.0).abs() < EPS);
        assert!((f.draw_height - 50.0).abs() < EPS);
        assert!(f.offset_x.abs() < EPS);
        assert!((f.offset_y - 25.0).abs() < EPS);
    }

    #[test]
    fn test_tall_image_is_height_limited() {
        let f = fit(60.0, 30.0, 100.0, 200.0).unwrap();
        assert!((f.draw_height - 30.0).abs() < EPS);
        assert!((f.draw_width - 15.0).abs() < EPS);
        assert!((f.offset_x - 22.5).abs() < EPS);
        assert!(f.offset_y.abs() < EPS);
    }

    #[test]
    fn test_never_exceeds_box_and_always_centers() {
        let boxes = [(50.0, 80.0), (120.0, 40.0), (33.3, 33.3)];
        let images = [(1.0, 1.0), (640.0, 480.0), (10.0, 3000.0), (25.0, 80.0)];
        for &(bw, bh) in &boxes {
            for &(iw, ih) in &images {
                let f = fit(bw, bh, iw, ih).unwrap();
                assert!(f.draw_width <= bw + EPS, "{bw}x{bh} <- {iw}x{ih}");
                assert!(f.draw_height <= bh + EPS, "{bw}x{bh} <- {iw}x{ih}");
                assert!((f.offset_x - (bw - f.draw_width) / 2.0).abs() < EPS);
                assert!((f.offset_y - (bh - f.draw_height) / 2.0).abs() < EPS);
                // Aspect ratio preserved
                assert!((f.draw_width / f.draw_height - iw / ih).abs() / (iw / ih) < 1e-3);
            }
        }
    }

    #[test]
    fn test_unreadable_dimensions() {
        assert!(matches!(
            fit(10.0, 10.0, 0.0, 0.0),
            Err(ImageError::Unreadable { .. })
        ));
        assert!(fit(10.0, 10.0, 5.0, -1.0).is_err());
    }
}
