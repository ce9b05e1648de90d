use image::{imageops, DynamicImage};
use ndarray::Array4;

/// Bilinear resize to exactly `width` x `height`, ignoring aspect ratio.
pub fn resize_frame(frame: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if frame.width() == width && frame.height() == height {
        frame.clone()
    } else {
        frame.resize_exact(width, height, imageops::FilterType::Triangle)
    }
}

/// Resizes and converts a frame into a `[1, height, width, 3]` batch with
/// channels scaled to `[0, 1]`.
pub fn frame_to_tensor(frame: &DynamicImage, width: u32, height: u32) -> Array4<f32> {
    let rgb = resize_frame(frame, width, height).to_rgb8();

    Array4::from_shape_fn(
        (1, height as usize, width as usize, 3),
        |(_, y, x, c)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    )
}

/// An all-black frame at model resolution, used to warm the backbone up.
pub fn blank_frame(width: u32, height: u32) -> DynamicImage {
    DynamicImage::new_rgb8(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_frame_to_tensor_shape() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(40, 30, Rgb([255, 0, 0])));

        let tensor = frame_to_tensor(&image, 16, 8);
        assert_eq!(tensor.shape(), &[1, 8, 16, 3]);

        assert_eq!(tensor[[0, 0, 0, 0]], 1.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 0.0);
        assert_eq!(tensor[[0, 7, 15, 2]], 0.0);
    }

    #[test]
    fn test_frame_to_tensor_normalization() {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(10, 10, Rgb([128, 128, 128])));

        let tensor = frame_to_tensor(&image, 10, 10);

        let expected = 128.0 / 255.0;
        assert!(tensor.iter().all(|v| (v - expected).abs() < 0.0001));
    }

    #[test]
    fn test_blank_frame_is_black() {
        let tensor = frame_to_tensor(&blank_frame(4, 4), 4, 4);
        assert!(tensor.iter().all(|v| *v == 0.0));
    }
}
