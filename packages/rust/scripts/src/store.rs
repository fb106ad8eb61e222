//! Read-only installer script asset store.

use std::path::{Path, PathBuf};

use simplens_shared::{Result, ScriptKind, SimplensError};
use tracing::{debug, instrument};

use crate::transform::{TransformedScript, transform};

/// Resolves each scripted platform to a file under a root directory.
///
/// The store never writes; assets are authored out-of-band and re-read on
/// every request.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the asset for `kind`.
    pub fn path_for(&self, kind: ScriptKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    /// Read the raw asset bytes. No encoding is assumed: PowerShell assets
    /// are often saved as UTF-16. Empty assets are reported as unreadable so a
    /// blank script is never served.
    #[instrument(skip(self), fields(platform = %kind.platform()))]
    pub async fn read(&self, kind: ScriptKind) -> Result<Vec<u8>> {
        let path = self.path_for(kind);
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|e| SimplensError::asset_read(&path, e))?;

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(SimplensError::asset_read(
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, "asset is empty"),
            ));
        }

        debug!(?path, bytes = raw.len(), "script asset read");
        Ok(raw)
    }

    /// Read and transform the asset for `kind`.
    pub async fn load(&self, kind: ScriptKind) -> Result<TransformedScript> {
        let raw = self.read(kind).await?;
        Ok(transform(kind, raw))
    }

    /// Check that every scripted platform has a readable asset file.
    ///
    /// Run at startup so a route is never exposed for a platform that has no
    /// asset behind it.
    pub fn verify(&self) -> Result<()> {
        let mut missing = Vec::new();
        for kind in ScriptKind::ALL {
            let path = self.path_for(kind);
            match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() && meta.len() > 0 => {}
                Ok(_) => missing.push(format!("{} (empty or not a file)", path.display())),
                Err(e) => missing.push(format!("{} ({e})", path.display())),
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SimplensError::config(format!(
                "missing installer assets: {}",
                missing.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::POSIX_PREAMBLE;

    fn fixture_store() -> AssetStore {
        AssetStore::new("../../../fixtures/scripts")
    }

    #[tokio::test]
    async fn loads_fixture_assets() {
        let store = fixture_store();
        store.verify().expect("fixtures present");

        let linux = store.load(ScriptKind::Posix).await.expect("load linux");
        assert!(linux.body().starts_with(POSIX_PREAMBLE.as_bytes()));
        assert!(!linux.body().windows(2).any(|w| w == b"\r\n"));

        let raw = store.read(ScriptKind::PowerShell).await.expect("read ps1");
        let windows = store.load(ScriptKind::PowerShell).await.expect("load ps1");
        assert_eq!(windows.body(), raw.as_slice());
    }

    #[tokio::test]
    async fn crlf_fixture_is_normalized() {
        let store = fixture_store();
        let raw = store.read(ScriptKind::Posix).await.expect("read");
        assert!(
            raw.windows(2).any(|w| w == b"\r\n"),
            "fixture should be authored with CRLF"
        );

        let out = store.load(ScriptKind::Posix).await.expect("load");
        let expected = String::from_utf8(raw).expect("utf-8 fixture").replace("\r\n", "\n");
        assert_eq!(
            out.body().strip_prefix(POSIX_PREAMBLE.as_bytes()),
            Some(expected.as_bytes())
        );
    }

    #[tokio::test]
    async fn utf16_powershell_asset_is_served_verbatim() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut raw = vec![0xFF, 0xFE];
        raw.extend("Write-Host hi\r\n".encode_utf16().flat_map(u16::to_le_bytes));
        std::fs::write(dir.path().join("onboard.ps1"), &raw).expect("write");
        let store = AssetStore::new(dir.path());

        let out = store.load(ScriptKind::PowerShell).await.expect("load utf-16");
        assert_eq!(out.into_body(), raw);
    }

    #[tokio::test]
    async fn missing_asset_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = AssetStore::new(dir.path());

        let err = store.load(ScriptKind::Posix).await.unwrap_err();
        assert!(matches!(err, SimplensError::AssetRead { .. }));
        assert!(store.verify().is_err());
    }

    #[tokio::test]
    async fn empty_asset_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("onboard.sh"), "  \n").expect("write");
        let store = AssetStore::new(dir.path());

        let err = store.read(ScriptKind::Posix).await.unwrap_err();
        assert!(err.to_string().contains("asset is empty"));
    }

    #[test]
    fn verify_reports_every_missing_asset() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("onboard.sh"), "echo hi\n").expect("write");
        let store = AssetStore::new(dir.path());

        let msg = store.verify().unwrap_err().to_string();
        assert!(msg.contains("onboard.ps1"));
        assert!(!msg.contains("onboard.sh"));
    }
}
