//! Strip export ("Download Strip")
//!
//! Takes a snapshot of the mounted strip layout, rasterizes it on a
//! blocking thread, encodes PNG and drops the file into the download
//! directory. Several exports may run at once; each works from its own
//! snapshot and claims its own file name.

use image::ImageFormat;
use std::fs::{self, OpenOptions};
use std::io::{self, Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::compose::{rasterize, StripLayout};
use crate::error::Result;

/// Gives up on finding a free name after this many numbered candidates
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Where exported strips are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub dir: PathBuf,
    pub file_name: String,
}

impl DownloadTarget {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// The user's download directory
    ///
    /// Falls back to the home directory, then the working directory.
    pub fn user_downloads(file_name: impl Into<String>) -> Self {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(dir, file_name)
    }
}

/// Export the mounted strip
///
/// `None` means no strip is mounted: nothing happens and `Ok(None)` comes
/// back. Otherwise returns the path of the written PNG.
pub async fn export_strip(
    snapshot: Option<StripLayout>,
    target: DownloadTarget,
) -> Result<Option<PathBuf>> {
    let Some(layout) = snapshot else {
        log::debug!("Export requested with no strip mounted, ignoring");
        return Ok(None);
    };

    // Spawn blocking because rasterizing and PNG encoding are CPU-bound
    let path = task::spawn_blocking(move || export_blocking(&layout, &target)).await??;

    Ok(Some(path))
}

/// Blocking implementation of the export
fn export_blocking(layout: &StripLayout, target: &DownloadTarget) -> Result<PathBuf> {
    let image = rasterize(layout);

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    fs::create_dir_all(&target.dir)?;
    let path = write_unique(&target.dir, &target.file_name, &png)?;

    log::info!(
        "💾 Saved {}x{} strip to {}",
        image.width(),
        image.height(),
        path.display()
    );

    Ok(path)
}

/// Write `bytes` to the first free name, browser-download style
///
/// `name.png`, then `name (1).png`, `name (2).png`, ... Creation is
/// exclusive, so concurrent exports never overwrite each other.
fn write_unique(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(candidate_name(file_name, attempt));

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                write_or_remove(file, &path, bytes)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free file name for {} in {}", file_name, dir.display()),
    ))
}

/// Write all of `bytes`, deleting the freshly claimed file on failure
///
/// A half-written PNG would otherwise stay in Downloads and hold the name.
fn write_or_remove(mut writer: impl Write, path: &Path, bytes: &[u8]) -> io::Result<()> {
    let written = writer.write_all(bytes).and_then(|()| writer.flush());
    drop(writer);

    if let Err(e) = written {
        if let Err(remove) = fs::remove_file(path) {
            log::warn!("⚠️  Could not remove partial {}: {}", path.display(), remove);
        }
        return Err(e);
    }

    Ok(())
}

/// `n == 0` keeps the name; otherwise ` (n)` goes before the extension
pub fn candidate_name(file_name: &str, n: u32) -> String {
    if n == 0 {
        return file_name.to_string();
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    match path.extension() {
        Some(ext) => format!("{} ({}).{}", stem, n, ext.to_string_lossy()),
        None => format!("{} ({})", stem, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{StripStyle, Typesetter};
    use crate::state::data::PhotoStatus;
    use crate::state::filter::StripFilter;
    use crate::state::strip::PhotoStripState;
    use chrono::NaiveDate;
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;

    fn layout_for(state: &PhotoStripState) -> StripLayout {
        StripLayout::derive(state, &StripStyle::default(), &Typesetter::fallback(14.0))
    }

    fn empty_state() -> PhotoStripState {
        PhotoStripState::with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    fn target(dir: &Path) -> DownloadTarget {
        DownloadTarget::new(dir, "photobooth-strip.png")
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("photobooth-strip.png", 0), "photobooth-strip.png");
        assert_eq!(candidate_name("photobooth-strip.png", 1), "photobooth-strip (1).png");
        assert_eq!(candidate_name("photobooth-strip.png", 12), "photobooth-strip (12).png");
        assert_eq!(candidate_name("strip", 2), "strip (2)");
    }

    /// Accepts a few bytes, then fails like a full disk
    struct DiskFull {
        file: fs::File,
        room: usize,
    }

    impl Write for DiskFull {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.room == 0 {
                return Err(io::Error::new(ErrorKind::Other, "no space left on device"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            self.file.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> {
            self.file.flush()
        }
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photobooth-strip.png");
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .unwrap();

        let err = write_or_remove(DiskFull { file, room: 4 }, &path, &[7u8; 64]).unwrap_err();
        assert_eq!(err.to_string(), "no space left on device");
        assert!(!path.exists());

        // The name is free again for the next export
        let written = write_unique(dir.path(), "photobooth-strip.png", b"png").unwrap();
        assert_eq!(written, path);
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[tokio::test]
    async fn test_nothing_mounted_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();

        let result = export_strip(None, target(dir.path())).await.unwrap();
        assert!(result.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_export_empty_strip() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = empty_state();
        state.set_caption("just the band");

        let path = export_strip(Some(layout_for(&state)), target(dir.path()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(path, dir.path().join("photobooth-strip.png"));
        let png = image::open(&path).unwrap().to_rgba8();
        assert_eq!(png.dimensions(), (308, 68));
        assert_eq!(*png.get_pixel(5, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*png.get_pixel(200, 5), Rgba([255, 255, 255, 255]));
    }

    #[tokio::test]
    async fn test_export_filtered_photos_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = empty_state();
        let generation = state.select_images(vec!["first.png".into(), "second.png".into()]);
        let colors = [Rgba([180, 60, 40, 255]), Rgba([40, 90, 180, 255])];
        state.attach_loaded(
            generation,
            colors
                .iter()
                .map(|c| PhotoStatus::Ready(Arc::new(RgbaImage::from_pixel(256, 80, *c))))
                .collect(),
        );
        state.set_filter(StripFilter::Sepia);

        let layout = layout_for(&state);
        let expected = rasterize(&layout);
        let path = export_strip(Some(layout), target(dir.path()))
            .await
            .unwrap()
            .unwrap();

        let png = image::open(&path).unwrap().to_rgba8();
        assert_eq!(png, expected);

        let sepia = StripFilter::Sepia.transform();
        assert_eq!(*png.get_pixel(100, 16 + 40), sepia.apply(colors[0]));
        assert_eq!(*png.get_pixel(100, 16 + 80 + 16 + 40), sepia.apply(colors[1]));
    }

    #[tokio::test]
    async fn test_rapid_exports_produce_two_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_for(&empty_state());

        let (first, second) = tokio::join!(
            export_strip(Some(layout.clone()), target(dir.path())),
            export_strip(Some(layout), target(dir.path())),
        );

        let first = first.unwrap().unwrap();
        let second = second.unwrap().unwrap();
        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());

        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["photobooth-strip (1).png", "photobooth-strip.png"]);
    }

    #[tokio::test]
    async fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Downloads").join("strips");

        let path = export_strip(Some(layout_for(&empty_state())), target(&nested))
            .await
            .unwrap()
            .unwrap();
        assert!(path.starts_with(&nested));
    }
}
