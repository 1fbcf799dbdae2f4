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

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::debug;
use lookup_core::{
    connect, CatalogKind, CatalogUri, ClientSettings, DiagnosticSink, Lookup, LookupOptions,
    LookupReport, NameQuery, SpotifyCatalog,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "spotify-lookup")]
#[command(about = "Resolve artist/track and artist/album names to Spotify URIs", long_about = None)]
struct Cli {
    /// Dump every raw search response as JSON into this directory
    #[arg(long, global = true, value_name = "DIR")]
    debug_dir: Option<PathBuf>,

    /// Number of searches in flight during batch lookups
    #[arg(long, global = true, default_value_t = 1)]
    concurrency: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Searches for a single track by artist and title
    Track {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        track: String,
    },
    /// Searches for a single album by artist and title
    Album {
        #[arg(long)]
        artist: String,
        #[arg(long)]
        album: String,
    },
    /// Searches every {"artist", "track"} record of a JSON feed file
    Tracks {
        #[arg(value_name = "FEED")]
        feed: PathBuf,
        /// Output the lookup report to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Searches every {"artist", "album"} record of a JSON feed file
    Albums {
        #[arg(value_name = "FEED")]
        feed: PathBuf,
        /// Also expand the matched albums into their track IDs
        #[arg(long)]
        expand: bool,
        /// Output the lookup report to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Lists the track IDs of one or more albums
    AlbumTracks {
        /// Album URIs or bare album IDs
        #[arg(value_name = "ALBUM_ID", required = true)]
        albums: Vec<String>,
        /// Output the lookup report to a JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if dotenv().is_err() {
        // No .env file, rely on the environment
    }

    let cli = Cli::parse();
    let options = LookupOptions {
        diagnostics: cli.debug_dir.clone().map(DiagnosticSink::new),
        concurrency: cli.concurrency,
    };

    let outcome = match &cli.command {
        Commands::Track { artist, track } => {
            handle_single(options, CatalogKind::Track, artist, track).await
        }
        Commands::Album { artist, album } => {
            handle_single(options, CatalogKind::Album, artist, album).await
        }
        Commands::Tracks { feed, json } => handle_tracks(options, feed, json.as_deref()).await,
        Commands::Albums { feed, expand, json } => {
            handle_albums(options, feed, *expand, json.as_deref()).await
        }
        Commands::AlbumTracks { albums, json } => {
            handle_album_tracks(options, albums, json.as_deref()).await
        }
    };

    if let Err(e) = outcome {
        eprintln!();
        eprintln!("[ERROR] {:#}", e);
        process::exit(1);
    }
}

async fn get_lookup(options: LookupOptions) -> Result<Lookup<SpotifyCatalog>> {
    let settings = ClientSettings::from_env().context("Invalid Spotify configuration")?;
    let spotify = connect(&settings)
        .await
        .context("Error initializing Spotify client")?;
    Ok(Lookup::with_options(SpotifyCatalog::new(spotify), options))
}

fn read_feed(path: &Path, kind: CatalogKind) -> Result<Vec<NameQuery>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed '{}'", path.display()))?;
    let queries = NameQuery::parse_feed(&content, kind).with_context(|| {
        format!(
            "Feed '{}' is not a JSON list of {{\"artist\", \"{}\"}} records",
            path.display(),
            kind
        )
    })?;
    debug!("Loaded {} records from {}", queries.len(), path.display());
    Ok(queries)
}

fn save_report(report: &LookupReport, path: &Path) -> Result<()> {
    let json_content = serde_json::to_string_pretty(report)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file '{}'", path.display()))?;
    file.write_all(json_content.as_bytes())
        .with_context(|| format!("Failed to write report to '{}'", path.display()))?;
    println!();
    println!("[SAVED] Report saved to: {}", path.display());
    Ok(())
}

async fn handle_single(
    options: LookupOptions,
    kind: CatalogKind,
    artist: &str,
    title: &str,
) -> Result<()> {
    let lookup = get_lookup(options).await?;

    let found = match kind {
        CatalogKind::Track => lookup.find_track(artist, title).await?,
        CatalogKind::Album => lookup.find_album(artist, title).await?,
    };

    println!("{}", "-".repeat(50));
    println!("Searched for {} '{}' by '{}'", kind, title, artist);
    match found {
        Some(uri) => println!("Found {}: {}", kind, uri),
        None => println!("{} not found on Spotify", kind.label()),
    }
    Ok(())
}

async fn handle_tracks(options: LookupOptions, feed: &Path, json: Option<&Path>) -> Result<()> {
    let queries = read_feed(feed, CatalogKind::Track)?;
    let lookup = get_lookup(options).await?;

    println!("Searching {} tracks...", queries.len());
    let uris = lookup.find_tracks(&queries).await?;
    let report = LookupReport::new(queries.len(), uris);

    print_report("TRACK LOOKUP", &report);
    if let Some(path) = json {
        save_report(&report, path)?;
    }
    Ok(())
}

async fn handle_albums(
    options: LookupOptions,
    feed: &Path,
    expand: bool,
    json: Option<&Path>,
) -> Result<()> {
    let queries = read_feed(feed, CatalogKind::Album)?;
    let lookup = get_lookup(options).await?;

    println!("Searching {} albums...", queries.len());
    let uris = lookup.find_albums(&queries).await?;
    let mut report = LookupReport::new(queries.len(), uris);

    if expand {
        report.track_ids = lookup.tracks_for_albums(&report.uris).await?;
    }

    print_report("ALBUM LOOKUP", &report);
    if let Some(path) = json {
        save_report(&report, path)?;
    }
    Ok(())
}

async fn handle_album_tracks(
    options: LookupOptions,
    albums: &[String],
    json: Option<&Path>,
) -> Result<()> {
    let lookup = get_lookup(options).await?;
    let album_ids: Vec<CatalogUri> = albums.iter().map(CatalogUri::new).collect();

    let mut report = LookupReport::new(album_ids.len(), album_ids);
    report.track_ids = lookup.tracks_for_albums(&report.uris).await?;

    println!("Length of track_ids: {}", report.track_ids.len());
    for id in &report.track_ids {
        println!("   {}", id);
    }
    if let Some(path) = json {
        save_report(&report, path)?;
    }
    Ok(())
}

fn print_report(title: &str, report: &LookupReport) {
    println!();
    println!("---------------------------------------------------");
    println!("{}", title);
    println!("---------------------------------------------------");
    println!("Searched:     {}", report.searched);
    println!("Found:        {}", report.matched);
    println!("Not found:    {}", report.missing());
    if !report.track_ids.is_empty() {
        println!("Track IDs:    {}", report.track_ids.len());
    }
    println!("---------------------------------------------------");

    for (i, uri) in report.uris.iter().enumerate() {
        println!("{}. {}", i + 1, uri);
    }
}
