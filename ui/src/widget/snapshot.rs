//! Headless PNG capture of a rendered surface (desktop and tests).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;

use super::surface::Surface;
use super::svg;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("nothing has been rendered yet")]
    NothingRendered,
    #[error("dashboard markup did not parse: {0}")]
    Svg(#[from] usvg::Error),
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },
    #[error("png encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("unable to determine export directory")]
    NoExportDir,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

static FONTS: Lazy<Arc<usvg::fontdb::Database>> = Lazy::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts for snapshots");
    Arc::new(db)
});

/// Rasterise the surface (both charts above the metrics table) into PNG bytes.
pub fn render_png(surface: &Surface) -> Result<Vec<u8>, SnapshotError> {
    let markup = svg::dashboard_markup(surface).ok_or(SnapshotError::NothingRendered)?;

    let options = usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(&markup, &options)?;

    let size = tree.size().to_int_size();
    let (width, height) = (size.width(), size.height());
    let mut pixmap =
        tiny_skia::Pixmap::new(width, height).ok_or(SnapshotError::Pixmap { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    // Opaque background: premultiplied and straight alpha are the same bytes.
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.write_header()?.write_image_data(pixmap.data())?;
    }

    tracing::debug!(width, height, bytes = buffer.len(), "rendered dashboard snapshot");
    Ok(buffer)
}

/// Write a snapshot into `dir`, returning the file path.
pub fn export_png_to(surface: &Surface, dir: &Path) -> Result<PathBuf, SnapshotError> {
    let bytes = render_png(surface)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("wbr-dashboard-{}.png", timestamp_slug()));
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), "saved dashboard snapshot");
    Ok(path)
}

/// Write a snapshot into the per-user export directory.
pub fn export_png(surface: &Surface) -> Result<PathBuf, SnapshotError> {
    export_png_to(surface, &export_dir()?)
}

pub fn export_dir() -> Result<PathBuf, SnapshotError> {
    let dirs = directories::ProjectDirs::from("com", "WBR", "WBR Dashboard")
        .ok_or(SnapshotError::NoExportDir)?;
    Ok(dirs.data_dir().join("exports"))
}

fn timestamp_slug() -> String {
    use time::{macros::format_description, OffsetDateTime};

    OffsetDateTime::now_utc()
        .format(&format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "snapshot".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::card::MetricsCard;
    use crate::widget::chart::ContainerSize;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn empty_surface_is_refused() {
        let surface = Surface::uniform(ContainerSize::new(400.0, 300.0));
        assert!(matches!(
            render_png(&surface),
            Err(SnapshotError::NothingRendered)
        ));
    }

    #[test]
    fn card_only_surface_rasterises() {
        let mut surface = Surface::uniform(ContainerSize::default());
        surface.metrics_card = Some(MetricsCard::default());

        let bytes = render_png(&surface).unwrap();

        assert_eq!(&bytes[..8], &PNG_MAGIC);
    }

    #[test]
    fn export_writes_a_png_file() {
        let mut surface = Surface::uniform(ContainerSize::default());
        surface.metrics_card = Some(MetricsCard::default());
        let dir = std::env::temp_dir().join(format!("wbr-snapshot-test-{}", std::process::id()));

        let path = export_png_to(&surface, &dir).unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert!(std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
