//! Asset copy and download steps.

use std::fs;
use std::path::Path;

use crate::fetch::Fetcher;
use crate::report::Outcome;

/// Copy a local file to `dest`, creating parent directories.
///
/// A missing source is reported, not raised; the destination is left as is.
pub fn copy_asset(source: &Path, dest: &Path, dry_run: bool) -> Result<Outcome, std::io::Error> {
    if !source.is_file() {
        tracing::warn!("[!] {} not found, skipping", source.display());
        return Ok(Outcome::SourceMissing);
    }

    let bytes = fs::read(source)?;
    if !write_if_different(dest, &bytes, dry_run)? {
        tracing::debug!("{} already up to date", dest.display());
        return Ok(Outcome::Unchanged);
    }

    tracing::info!("Copied {} -> {}", source.display(), dest.display());
    Ok(Outcome::Copied {
        bytes: bytes.len() as u64,
    })
}

/// Download `url` to `dest`. The destination is only written after the whole
/// body has been received, so a failed download never truncates it.
pub fn download_asset(
    fetcher: &dyn Fetcher,
    url: &str,
    dest: &Path,
    dry_run: bool,
) -> Result<Outcome, DownloadError> {
    tracing::info!("Downloading {} -> {}", url, dest.display());

    let bytes = fetcher.fetch(url)?;
    if !write_if_different(dest, &bytes, dry_run)? {
        tracing::debug!("{} already up to date", dest.display());
        return Ok(Outcome::Unchanged);
    }

    tracing::info!("Downloaded {} bytes -> {}", bytes.len(), dest.display());
    Ok(Outcome::Downloaded {
        bytes: bytes.len() as u64,
    })
}

/// Errors from a download step.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] crate::fetch::FetchError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Write `bytes` unless `dest` already holds them. Returns whether a write
/// happened (or would happen, in a dry run).
pub(crate) fn write_if_different(
    dest: &Path,
    bytes: &[u8],
    dry_run: bool,
) -> Result<bool, std::io::Error> {
    if let Ok(existing) = fs::read(dest) {
        if existing == bytes {
            return Ok(false);
        }
    }
    if dry_run {
        return Ok(true);
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dest, bytes)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct MapFetcher(HashMap<&'static str, &'static [u8]>);

    impl Fetcher for MapFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.0
                .get(url)
                .map(|b| b.to_vec())
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    #[test]
    fn copies_bytes_and_creates_parents() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("site_icon.png");
        let dest = temp.path().join("app/src/lib/gui/assets/icon.png");
        fs::write(&source, [0x89, b'P', b'N', b'G']).unwrap();

        let outcome = copy_asset(&source, &dest, false).unwrap();

        assert_eq!(outcome, Outcome::Copied { bytes: 4 });
        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[test]
    fn second_copy_is_unchanged() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("overrides.css");
        let dest = temp.path().join("static/overrides.css");
        fs::write(&source, "body {}").unwrap();

        copy_asset(&source, &dest, false).unwrap();
        let outcome = copy_asset(&source, &dest, false).unwrap();

        assert_eq!(outcome, Outcome::Unchanged);
    }

    #[test]
    fn missing_source_leaves_destination_untouched() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("default-project.sb3");
        fs::write(&dest, "original").unwrap();

        let outcome = copy_asset(&temp.path().join("absent.sb3"), &dest, false).unwrap();

        assert_eq!(outcome, Outcome::SourceMissing);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "original");
    }

    #[test]
    fn dry_run_copy_writes_nothing() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("icon.png");
        let dest = temp.path().join("out/icon.png");
        fs::write(&source, "png").unwrap();

        let outcome = copy_asset(&source, &dest, true).unwrap();

        assert_eq!(outcome, Outcome::Copied { bytes: 3 });
        assert!(!dest.exists());
    }

    #[test]
    fn downloads_into_place() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("assets/cursor.png");
        let fetcher = MapFetcher(HashMap::from([(
            "https://example.com/cursor.png",
            b"cursor".as_slice(),
        )]));

        let outcome =
            download_asset(&fetcher, "https://example.com/cursor.png", &dest, false).unwrap();

        assert_eq!(outcome, Outcome::Downloaded { bytes: 6 });
        assert_eq!(fs::read(&dest).unwrap(), b"cursor");
    }

    #[test]
    fn failed_download_keeps_existing_file() {
        let temp = tempdir().unwrap();
        let dest = temp.path().join("cursor.png");
        fs::write(&dest, "old cursor").unwrap();
        let fetcher = MapFetcher(HashMap::new());

        let err = download_asset(&fetcher, "https://example.com/gone.png", &dest, false)
            .unwrap_err();

        assert!(matches!(
            err,
            DownloadError::Fetch(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "old cursor");
    }
}
