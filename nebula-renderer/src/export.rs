//! Snapshot export.
//!
//! A long press saves the current frame. How a frame leaves the surface is
//! host-specific, so the frame loop only sees a [`FrameExporter`].

use crate::RenderResult;

/// Exports the current contents of a surface.
pub trait FrameExporter<S: ?Sized> {
    /// Export one frame and return a host-meaningful location for it
    /// (a file path, a data URL, an album entry).
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be encoded or stored.
    fn export(&mut self, surface: &S) -> RenderResult<String>;
}

#[cfg(feature = "raster")]
pub use png::PngExporter;

#[cfg(feature = "raster")]
mod png {
    use std::path::{Path, PathBuf};

    use super::FrameExporter;
    use crate::{RasterSurface, RenderResult};

    /// Writes numbered PNG files into a directory.
    #[derive(Debug, Clone)]
    pub struct PngExporter {
        dir: PathBuf,
        prefix: String,
        next_index: u32,
    }

    impl PngExporter {
        /// Export into `dir` as `nebula-0001.png`, `nebula-0002.png`, ...
        #[must_use]
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self {
                dir: dir.into(),
                prefix: "nebula".to_string(),
                next_index: 1,
            }
        }

        /// Use a different file name prefix.
        #[must_use]
        pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
            self.prefix = prefix.into();
            self
        }

        /// Target directory.
        #[must_use]
        pub fn dir(&self) -> &Path {
            &self.dir
        }

        /// Path the next export will be written to.
        #[must_use]
        pub fn next_path(&self) -> PathBuf {
            self.dir
                .join(format!("{}-{:04}.png", self.prefix, self.next_index))
        }
    }

    impl FrameExporter<RasterSurface> for PngExporter {
        fn export(&mut self, surface: &RasterSurface) -> RenderResult<String> {
            std::fs::create_dir_all(&self.dir)?;
            let path = self.next_path();
            surface.save_png(&path)?;
            self.next_index += 1;
            tracing::info!("Exported frame to {}", path.display());
            Ok(path.display().to_string())
        }
    }

    #[cfg(test)]
    mod tests {
        use nebula_core::SurfaceSize;

        use super::*;

        #[test]
        fn numbers_files_sequentially() {
            let dir = tempfile::tempdir().expect("tempdir");
            let surface = RasterSurface::new(SurfaceSize::new(16.0, 16.0)).expect("surface");
            let mut exporter = PngExporter::new(dir.path().join("shots"));

            let first = exporter.export(&surface).expect("export");
            let second = exporter.export(&surface).expect("export");

            assert!(first.ends_with("nebula-0001.png"));
            assert!(second.ends_with("nebula-0002.png"));
            let bytes = std::fs::read(&second).expect("read");
            assert_eq!(&bytes[..4], b"\x89PNG");
        }

        #[test]
        fn custom_prefix() {
            let exporter = PngExporter::new("/tmp/out").with_prefix("frame");
            assert!(exporter.next_path().ends_with("frame-0001.png"));
        }

        #[test]
        fn unwritable_target_is_an_error() {
            let dir = tempfile::tempdir().expect("tempdir");
            let blocker = dir.path().join("file");
            std::fs::write(&blocker, b"x").expect("write");
            let surface = RasterSurface::new(SurfaceSize::new(4.0, 4.0)).expect("surface");
            let mut exporter = PngExporter::new(blocker.join("nested"));
            assert!(exporter.export(&surface).is_err());
        }
    }
}
