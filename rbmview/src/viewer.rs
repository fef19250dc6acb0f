use std::{
    fs, io,
    path::{Path, PathBuf},
};

use rbm_parser::{DecodeError, RawImage};
use thiserror::Error;

pub mod display;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to decode {}: {source}", .path.display())]
    Decode { path: PathBuf, source: DecodeError },
    #[error("display failed: {0}")]
    Window(#[from] minifb::Error),
}

pub fn load(path: &Path) -> Result<RawImage, ViewerError> {
    let bytes = fs::read(path).map_err(|source| ViewerError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    rbm_parser::decode(&bytes).map_err(|source| ViewerError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn show(path: &Path) -> Result<(), ViewerError> {
    let image = load(path)?;
    log::info!(
        "decoded {}x{} pixels from {}",
        image.width,
        image.height,
        path.display()
    );

    if image.is_empty() {
        log::warn!("{}: empty image, nothing to display", path.display());
        return Ok(());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let title = format!("{} ({}x{}) - rbmview", name, image.width, image.height);

    display::present(image.width, image.height, &image.rgb(), &title)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rbmview-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("definitely/not/here.rbm")).unwrap_err();
        assert!(matches!(err, ViewerError::Read { .. }));
    }

    #[test]
    fn test_load_truncated_file() {
        let path = scratch_file("truncated.rbm");
        fs::write(&path, [1, 0, 0, 0]).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(
            err,
            ViewerError::Decode {
                source: DecodeError::TruncatedHeader { found: 4 },
                ..
            }
        ));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_valid_file() {
        let path = scratch_file("valid.rbm");
        let image = RawImage::new(2, 1, vec![[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0]]);
        image.save(&path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.width, 2);
        assert_eq!(loaded.height, 1);
        assert_eq!(loaded.rgb(), vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_show_empty_image() {
        let path = scratch_file("empty.rbm");
        RawImage::new(0, 2, vec![]).save(&path).unwrap();

        // zero-area: show returns before any window is opened
        show(&path).unwrap();

        fs::remove_file(&path).unwrap();
    }
}
