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

use serde::{Deserialize, Serialize};
use std::fmt;

/// An artist paired with a track or album title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    pub artist: String,
    pub title: String,
}

#[derive(Deserialize)]
struct TrackRecord {
    artist: String,
    track: String,
}

#[derive(Deserialize)]
struct AlbumRecord {
    artist: String,
    album: String,
}

impl NameQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Parses a JSON feed: a list of `{"artist", "track"}` records for track
    /// lookups, or `{"artist", "album"}` records for album lookups.
    ///
    /// A record missing the title key for `kind` is an error.
    pub fn parse_feed(content: &str, kind: CatalogKind) -> serde_json::Result<Vec<NameQuery>> {
        match kind {
            CatalogKind::Track => {
                let records: Vec<TrackRecord> = serde_json::from_str(content)?;
                Ok(records
                    .into_iter()
                    .map(|r| NameQuery::new(r.artist, r.track))
                    .collect())
            }
            CatalogKind::Album => {
                let records: Vec<AlbumRecord> = serde_json::from_str(content)?;
                Ok(records
                    .into_iter()
                    .map(|r| NameQuery::new(r.artist, r.album))
                    .collect())
            }
        }
    }

    /// Field-filtered search text, e.g. `artist:Boards of Canada track:Roygbiv`.
    pub fn search_text(&self, kind: CatalogKind) -> String {
        format!("artist:{} {}:{}", self.artist, kind.as_str(), self.title)
    }
}

/// The result-type discriminator of a catalog search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Track,
    Album,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Track => "track",
            CatalogKind::Album => "album",
        }
    }

    /// Capitalized label used in console notices.
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Track => "Track",
            CatalogKind::Album => "Album",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque catalog identifier such as `spotify:track:abc123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogUri(String);

impl CatalogUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bare track ID, as found in album listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackIdentifier(String);

impl TrackIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub uri: CatalogUri,
    pub id: String,
    pub name: String,
}

/// A single search response: the candidates in catalog order, plus the
/// response exactly as the catalog returned it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub query: String,
    pub kind: CatalogKind,
    pub total: u32, // Matches reported by the catalog, not items.len()
    pub items: Vec<CatalogItem>,
    pub raw: serde_json::Value,
}

impl SearchPage {
    pub fn first_uri(&self) -> Option<&CatalogUri> {
        self.items.first().map(|item| &item.uri)
    }
}

/// Aggregate of a batch run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LookupReport {
    pub searched: usize,
    pub matched: usize,
    pub uris: Vec<CatalogUri>,
    pub track_ids: Vec<TrackIdentifier>,
}

impl LookupReport {
    pub fn new(searched: usize, uris: Vec<CatalogUri>) -> Self {
        Self {
            searched,
            matched: uris.len(),
            uris,
            track_ids: Vec::new(),
        }
    }

    pub fn missing(&self) -> usize {
        self.searched.saturating_sub(self.matched)
    }
}
