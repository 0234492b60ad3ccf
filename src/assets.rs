// assets.rs - Image decoding for native hosts
//
// The browser decodes images itself. Native hosts (the headless sim, tests)
// decode here and feed the dimensions back as decode events.

use std::path::Path;

use image::ImageReader;

use crate::error::{ArenaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub width: u32,
    pub height: u32,
}

/// Fully decodes the image at `path` and reports its natural size.
pub fn decode(path: &Path) -> Result<Decoded> {
    let failed = |reason: String| ArenaError::AssetDecode {
        path: path.display().to_string(),
        reason,
    };

    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| failed(e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(failed("image has no pixels".into()));
    }

    Ok(Decoded {
        width: img.width(),
        height: img.height(),
    })
}
