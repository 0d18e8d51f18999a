//! Model input generation
//!
//! Reshapes an image (or passes a raw buffer through) into the flat
//! little-endian binary a model run expects: unsigned bytes for quantized
//! models, floats normalized into a caller range otherwise. A pure,
//! stateless transform.

use std::error::Error;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::imageops::FilterType;

/// Generate a model input binary at `output_path`.
///
/// `shape` is the model input shape, e.g. `[1, 224, 224, 3]` (at least 3
/// dimensions; the 4th, when present, is the channel count). Inputs with no
/// extension or a `.bin` extension are treated as pre-shaped raw buffers
/// and only size-checked; anything else is decoded as an image and resized
/// to the shape's height and width.
pub fn generate_input(
    input_path: &Path,
    output_path: &Path,
    shape: &[usize],
    quantized: bool,
    float_range: (f32, f32),
) -> Result<(), Box<dyn Error>> {
    if !input_path.exists() {
        return Err(format!("Input file {} doesn't exist", input_path.display()).into());
    }
    if shape.len() < 3 {
        return Err("Input shape < 3 dimensions".into());
    }
    let element_count: usize = shape.iter().product();

    let extension = input_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();

    if extension.is_empty() || extension == "bin" {
        return copy_raw_buffer(input_path, output_path, element_count, quantized);
    }

    let image = image::open(input_path)?;
    let resized = image.resize_exact(shape[2] as u32, shape[1] as u32, FilterType::CatmullRom);

    let channels = if shape.len() > 3 { shape[3] } else { 1 };
    let pixels = match channels {
        1 => resized.to_luma8().into_raw(),
        3 => resized.to_rgb8().into_raw(),
        n => return Err(format!("Unsupported channel count {}", n).into()),
    };

    if pixels.len() != element_count {
        return Err(format!(
            "Image yields {} values but the input shape needs {}",
            pixels.len(),
            element_count
        )
        .into());
    }

    write_binary_file(output_path, &pixels, quantized, float_range)
}

/// Raw buffers are already in the wire layout; only the size is validated.
fn copy_raw_buffer(
    input_path: &Path,
    output_path: &Path,
    element_count: usize,
    quantized: bool,
) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(input_path)?;
    let element_size = if quantized { 1 } else { 4 };
    let expected = element_count * element_size;
    if bytes.len() != expected {
        return Err(format!(
            "Raw input is {} bytes but the input shape needs {}",
            bytes.len(),
            expected
        )
        .into());
    }
    fs::write(output_path, bytes)?;
    Ok(())
}

fn write_binary_file(
    output_path: &Path,
    pixels: &[u8],
    quantized: bool,
    float_range: (f32, f32),
) -> Result<(), Box<dyn Error>> {
    let mut file = BufWriter::new(fs::File::create(output_path)?);

    if quantized {
        file.write_all(pixels)?;
    } else {
        let low = float_range.0.min(float_range.1);
        let high = float_range.0.max(float_range.1);
        for &p in pixels {
            let value = (high - low) * (p as f32) / 255.0 + low;
            file.write_all(&value.to_le_bytes())?;
        }
    }

    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_buffer_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let output = dir.path().join("input_data.bin");
        std::fs::write(&input, [7u8, 8, 9, 10]).unwrap();

        generate_input(&input, &output, &[1, 2, 2], true, (-1.0, 1.0)).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), vec![7u8, 8, 9, 10]);
    }

    #[test]
    fn test_raw_buffer_size_is_checked() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let output = dir.path().join("input_data.bin");
        std::fs::write(&input, [0u8; 5]).unwrap();

        assert!(generate_input(&input, &output, &[1, 2, 2], true, (-1.0, 1.0)).is_err());
    }

    #[test]
    fn test_shape_needs_three_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let output = dir.path().join("input_data.bin");
        std::fs::write(&input, [0u8; 4]).unwrap();

        assert!(generate_input(&input, &output, &[2, 2], true, (-1.0, 1.0)).is_err());
    }

    #[test]
    fn test_quantized_image_writes_raw_channels() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        let output = dir.path().join("input_data.bin");

        let pixels: Vec<u8> = (0..12).map(|v| v * 20).collect();
        let img = image::RgbImage::from_raw(2, 2, pixels.clone()).unwrap();
        img.save(&input).unwrap();

        generate_input(&input, &output, &[1, 2, 2, 3], true, (-1.0, 1.0)).unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), pixels);
    }

    #[test]
    fn test_float_image_is_normalized_into_range() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.png");
        let output = dir.path().join("input_data.bin");

        let pixels = vec![0u8, 255, 128, 64];
        let img = image::GrayImage::from_raw(2, 2, pixels.clone()).unwrap();
        img.save(&input).unwrap();

        generate_input(&input, &output, &[1, 2, 2, 1], false, (-1.0, 1.0)).unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(bytes.len(), 16);
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        for (value, &p) in values.iter().zip(&pixels) {
            let expected = 2.0 * (p as f32) / 255.0 - 1.0;
            assert!((value - expected).abs() < 1e-6);
        }
    }
}
