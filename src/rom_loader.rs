//! Program image loading and management for the runner
//!
//! Images are raw 6502 machine code, loaded verbatim at a base address.
//! There is no header format; the runner decides where the image lands and
//! where execution starts.

use log::info;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during image loading
#[derive(Error, Debug)]
pub enum RomError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image is empty")]
    Empty,

    #[error("Image of {size} bytes does not fit at load address {base:#06X}")]
    TooLarge { size: usize, base: u16 },

    #[error("Invalid image format")]
    InvalidFormat,
}

/// Load a raw program image from a file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, RomError> {
    let path = path.as_ref();
    info!("Loading program image from: {}", path.display());

    if !has_image_extension(path) {
        return Err(RomError::InvalidFormat);
    }

    let data = fs::read(path)?;
    if data.is_empty() {
        return Err(RomError::Empty);
    }

    info!("Image size: {} bytes", data.len());
    Ok(data)
}

/// Check that `data` fits in the address space when loaded at `base`.
pub fn check_fits(data: &[u8], base: u16) -> Result<(), RomError> {
    let room = 0x10000 - base as usize;
    if data.len() > room {
        return Err(RomError::TooLarge {
            size: data.len(),
            base,
        });
    }
    Ok(())
}

/// List the image files available in a directory, sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<String>, RomError> {
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && has_image_extension(&entry.path()) {
            images.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    images.sort();
    Ok(images)
}

/// Raw machine-code images carry a `.bin` or `.prg` extension.
fn has_image_extension(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref(),
        Some("bin") | Some("prg")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_extensions() {
        assert!(has_image_extension(&PathBuf::from("demo.bin")));
        assert!(has_image_extension(&PathBuf::from("demo.PRG")));
        assert!(!has_image_extension(&PathBuf::from("demo.nes")));
        assert!(!has_image_extension(&PathBuf::from("demo")));
    }

    #[test]
    fn test_check_fits() {
        assert!(check_fits(&[0; 0x8000], 0x8000).is_ok());
        assert!(matches!(
            check_fits(&[0; 0x8001], 0x8000),
            Err(RomError::TooLarge { .. })
        ));
    }
}
