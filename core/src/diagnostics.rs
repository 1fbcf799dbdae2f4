/*
    spotify-lookup-rs | Resolve artist/track and artist/album names to Spotify URIs.
    Copyright (C) 2025  Israel Alberto Roldan Vega

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::models::{CatalogKind, SearchPage};
use log::{debug, warn};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Dumps raw search responses as pretty JSON for offline inspection.
///
/// Each search overwrites the dump for its kind: `result.json` for tracks,
/// `result-album.json` for albums. Failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct DiagnosticSink {
    dir: PathBuf,
}

impl DiagnosticSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: CatalogKind) -> PathBuf {
        let file = match kind {
            CatalogKind::Track => "result.json",
            CatalogKind::Album => "result-album.json",
        };
        self.dir.join(file)
    }

    pub fn record(&self, page: &SearchPage) {
        let path = self.path_for(page.kind);
        match write_page(&path, page) {
            Ok(()) => debug!("Wrote search dump to {}", path.display()),
            Err(e) => warn!("Failed to write search dump {}: {}", path.display(), e),
        }
    }
}

fn write_page(path: &Path, page: &SearchPage) -> io::Result<()> {
    let json = serde_json::to_string_pretty(&page.raw)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CatalogItem, CatalogUri};
    use serde_json::json;

    fn album_page() -> SearchPage {
        SearchPage {
            query: "artist:Burial album:Untrue".to_string(),
            kind: CatalogKind::Album,
            total: 1,
            items: vec![CatalogItem {
                uri: CatalogUri::new("spotify:album:untrue"),
                id: "untrue".to_string(),
                name: "Untrue".to_string(),
            }],
            raw: json!({
                "albums": {
                    "items": [{
                        "id": "untrue",
                        "name": "Untrue",
                        "artists": [{"name": "Burial"}],
                        "release_date": "2007-11-05"
                    }],
                    "total": 1
                }
            }),
        }
    }

    #[test]
    fn test_record_writes_raw_response_to_kind_specific_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DiagnosticSink::new(dir.path());

        sink.record(&album_page());

        let album_dump = dir.path().join("result-album.json");
        assert!(album_dump.exists());
        assert!(!dir.path().join("result.json").exists());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(album_dump).unwrap()).unwrap();
        assert_eq!(written, album_page().raw);
        assert_eq!(
            written["albums"]["items"][0]["artists"][0]["name"],
            "Burial"
        );
    }

    #[test]
    fn test_record_into_missing_dir_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DiagnosticSink::new(dir.path().join("does-not-exist"));

        sink.record(&album_page());

        assert!(!sink.path_for(CatalogKind::Album).exists());
    }
}
