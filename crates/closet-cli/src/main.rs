//! Closet CLI: a personal wardrobe tracker.
//!
//! Commands: init, piece, outfit, wear, stats, dashboard, config, analyze,
//! remove-bg, completions

mod config;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use closet_core::search::{search_outfits, search_pieces};
use closet_core::stats::{recently_worn, seasonal_suggestions, wardrobe_stats, DASHBOARD_LIMIT};
use closet_core::{parse_tags, ClosetError, OutfitDraft, PieceDraft, Provider, Season};
use closet_store::{LoadSource, SqliteStorage, Wardrobe};
use closet_vision::{extension_for_mime, mime_for_extension, EditedImage, VisionClient};

use crate::config::{open_wardrobe, FileConfig};

#[derive(Parser)]
#[command(name = "closet")]
#[command(version)]
#[command(about = "Catalogue clothing pieces and outfits, and log when they are worn")]
struct Cli {
    /// Directory holding the store and closet.toml
    #[arg(long, global = true, env = "CLOSET_DATA_DIR", default_value = ".closet")]
    data_dir: PathBuf,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and seed the store
    Init,
    /// Manage clothing pieces
    #[command(subcommand)]
    Piece(PieceCommand),
    /// Manage outfits
    #[command(subcommand)]
    Outfit(OutfitCommand),
    /// Log that a piece or outfit was worn today
    Wear {
        /// Piece or outfit id
        id: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Totals, most worn items, and wears per month
    Stats,
    /// Current season, seasonal suggestions, and recently worn items
    Dashboard {
        #[arg(long, default_value_t = DASHBOARD_LIMIT)]
        limit: usize,
    },
    /// Show or change provider settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Describe a clothing photo with the configured provider
    Analyze {
        image: PathBuf,
    },
    /// Replace a photo's background with solid white (Gemini only)
    #[command(name = "remove-bg")]
    RemoveBg {
        image: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[derive(clap::Args)]
struct PieceFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    size: Option<String>,
    /// Spring, Summer, Autumn, Winter or All
    #[arg(long)]
    season: Option<Season>,
    #[arg(long)]
    style: Option<String>,
    /// Comma-separated
    #[arg(long)]
    tags: Option<String>,
    /// Image URL or local file (repeatable; the first is the primary image)
    #[arg(long = "image")]
    images: Vec<String>,
}

impl PieceFields {
    fn apply(self, draft: &mut PieceDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if let Some(v) = self.brand {
            draft.brand = v;
        }
        if let Some(v) = self.color {
            draft.color = v;
        }
        if let Some(v) = self.size {
            draft.size = v;
        }
        if let Some(v) = self.season {
            draft.season = v;
        }
        if let Some(v) = self.style {
            draft.style = v;
        }
        if let Some(v) = self.tags {
            draft.tags = parse_tags(&v);
        }
    }
}

#[derive(Subcommand)]
enum PieceCommand {
    /// Add a piece
    Add {
        #[command(flatten)]
        fields: PieceFields,
        /// Describe the first image with the configured provider; flags still win
        #[arg(long)]
        analyze: bool,
    },
    /// Change fields of a piece
    Edit {
        id: String,
        #[command(flatten)]
        fields: PieceFields,
    },
    /// Delete a piece and remove it from every outfit
    Rm { id: String },
    /// Show one piece
    Show { id: String },
    /// List pieces, newest first
    List {
        /// Match title, brand or tag
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(clap::Args)]
struct OutfitFields {
    #[arg(long)]
    title: Option<String>,
    /// Piece id (repeatable, in order)
    #[arg(long = "piece")]
    pieces: Vec<String>,
    /// Remove every piece from the outfit
    #[arg(long, conflicts_with = "pieces")]
    clear_pieces: bool,
    /// Comma-separated
    #[arg(long)]
    tags: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Image URL or local file (repeatable)
    #[arg(long = "image")]
    images: Vec<String>,
}

impl OutfitFields {
    fn apply(self, draft: &mut OutfitDraft) {
        if let Some(v) = self.title {
            draft.title = v;
        }
        if self.clear_pieces {
            draft.piece_ids.clear();
        } else if !self.pieces.is_empty() {
            draft.piece_ids = self.pieces;
        }
        if let Some(v) = self.tags {
            draft.tags = parse_tags(&v);
        }
        if let Some(v) = self.notes {
            draft.notes = (!v.trim().is_empty()).then_some(v);
        }
    }
}

#[derive(Subcommand)]
enum OutfitCommand {
    /// Add an outfit
    Add {
        #[command(flatten)]
        fields: OutfitFields,
    },
    /// Change fields of an outfit
    Edit {
        id: String,
        #[command(flatten)]
        fields: OutfitFields,
    },
    /// Delete an outfit (its pieces are kept)
    Rm { id: String },
    /// Show one outfit with its pieces
    Show { id: String },
    /// List outfits, newest first
    List {
        /// Match title or tag
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the provider and whether a key is set
    Show,
    /// Store the API key
    SetKey { key: String },
    /// Choose gemini or openai
    SetProvider { provider: Provider },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Init => cmd_init(&data_dir),
        Commands::Piece(cmd) => cmd_piece(&data_dir, cmd),
        Commands::Outfit(cmd) => cmd_outfit(&data_dir, cmd),
        Commands::Wear { id, notes } => cmd_wear(&data_dir, &id, notes),
        Commands::Stats => {
            let wardrobe = open_wardrobe(&data_dir)?;
            print_json(&wardrobe_stats(wardrobe.pieces(), wardrobe.outfits()))
        }
        Commands::Dashboard { limit } => cmd_dashboard(&data_dir, limit),
        Commands::Config(cmd) => cmd_config(&data_dir, cmd),
        Commands::Analyze { image } => cmd_analyze(&data_dir, &image),
        Commands::RemoveBg { image, output } => cmd_remove_bg(&data_dir, &image, &output),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "closet", &mut io::stdout());
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// === Commands ===

fn cmd_init(data_dir: &Path) -> Result<()> {
    let wardrobe = open_wardrobe(data_dir)?;
    let source = match wardrobe.load_source() {
        LoadSource::Stored => "stored",
        LoadSource::Seeded => "seeded",
        LoadSource::Recovered => "recovered",
    };
    let pieces = wardrobe.pieces().len();
    let outfits = wardrobe.outfits().len();
    wardrobe.close()?;

    print_json(&json!({
        "dataDir": data_dir.display().to_string(),
        "source": source,
        "pieces": pieces,
        "outfits": outfits,
    }))
}

fn cmd_piece(data_dir: &Path, cmd: PieceCommand) -> Result<()> {
    let mut wardrobe = open_wardrobe(data_dir)?;
    match cmd {
        PieceCommand::Add { fields, analyze } => {
            let images = resolve_images(&fields.images)?;
            let mut draft = PieceDraft::default();
            if analyze {
                let first = fields
                    .images
                    .first()
                    .ok_or_else(|| anyhow!("--analyze needs an --image"))?;
                let image = read_image(Path::new(first))?;
                let result = block_on(analyze_image(data_dir, &wardrobe, &image))??;
                draft.apply_analysis(&result);
            }
            fields.apply(&mut draft);
            draft.validate(&images)?;

            let piece = wardrobe.add_piece(draft, images)?;
            wardrobe.close()?;
            print_json(&piece)
        }
        PieceCommand::Edit { id, fields } => {
            let mut piece = wardrobe
                .piece(&id)
                .cloned()
                .ok_or_else(|| not_found("piece", &id))?;
            if !fields.images.is_empty() {
                piece.images = resolve_images(&fields.images)?;
            }
            let mut draft = PieceDraft::from(&piece);
            fields.apply(&mut draft);
            draft.validate(&piece.images)?;

            piece.title = draft.title;
            piece.brand = draft.brand;
            piece.color = draft.color;
            piece.size = draft.size;
            piece.season = draft.season;
            piece.style = draft.style;
            piece.tags = draft.tags;
            wardrobe.update_piece(piece.clone())?;
            wardrobe.close()?;
            print_json(&piece)
        }
        PieceCommand::Rm { id } => {
            let removed = wardrobe.delete_piece(&id)?;
            wardrobe.close()?;
            if !removed {
                return Err(not_found("piece", &id).into());
            }
            print_json(&json!({ "id": id, "deleted": true }))
        }
        PieceCommand::Show { id } => {
            let piece = wardrobe
                .piece(&id)
                .ok_or_else(|| not_found("piece", &id))?;
            print_json(piece)
        }
        PieceCommand::List { search } => {
            let found = search_pieces(wardrobe.pieces(), search.as_deref().unwrap_or(""));
            print_json(&found)
        }
    }
}

fn cmd_outfit(data_dir: &Path, cmd: OutfitCommand) -> Result<()> {
    let mut wardrobe = open_wardrobe(data_dir)?;
    match cmd {
        OutfitCommand::Add { fields } => {
            let images = resolve_images(&fields.images)?;
            check_pieces_exist(&wardrobe, &fields.pieces)?;
            let mut draft = OutfitDraft::default();
            fields.apply(&mut draft);
            draft.validate(&images)?;

            let outfit = wardrobe.add_outfit(draft, images)?;
            wardrobe.close()?;
            print_json(&outfit)
        }
        OutfitCommand::Edit { id, fields } => {
            let mut outfit = wardrobe
                .outfit(&id)
                .cloned()
                .ok_or_else(|| not_found("outfit", &id))?;
            check_pieces_exist(&wardrobe, &fields.pieces)?;
            if !fields.images.is_empty() {
                outfit.images = resolve_images(&fields.images)?;
            }
            let mut draft = OutfitDraft::from(&outfit);
            fields.apply(&mut draft);
            draft.validate(&outfit.images)?;

            outfit.title = draft.title;
            outfit.piece_ids = draft.piece_ids;
            outfit.tags = draft.tags;
            outfit.notes = draft.notes;
            wardrobe.update_outfit(outfit.clone())?;
            wardrobe.close()?;
            print_json(&outfit)
        }
        OutfitCommand::Rm { id } => {
            let removed = wardrobe.delete_outfit(&id)?;
            wardrobe.close()?;
            if !removed {
                return Err(not_found("outfit", &id).into());
            }
            print_json(&json!({ "id": id, "deleted": true }))
        }
        OutfitCommand::Show { id } => {
            let outfit = wardrobe
                .outfit(&id)
                .ok_or_else(|| not_found("outfit", &id))?;
            let pieces = wardrobe.outfit_pieces(outfit);
            let mut value = serde_json::to_value(outfit)?;
            value["pieces"] = serde_json::to_value(pieces)?;
            print_json(&value)
        }
        OutfitCommand::List { search } => {
            let found = search_outfits(wardrobe.outfits(), search.as_deref().unwrap_or(""));
            print_json(&found)
        }
    }
}

fn cmd_wear(data_dir: &Path, id: &str, notes: Option<String>) -> Result<()> {
    let mut wardrobe = open_wardrobe(data_dir)?;
    let kind = wardrobe
        .kind_of(id)
        .ok_or_else(|| anyhow!("no piece or outfit with id {id}"))?;
    let notes = notes.filter(|n| !n.trim().is_empty());
    let log = wardrobe
        .log_wear(id, kind, notes)?
        .ok_or_else(|| anyhow!("no {kind} with id {id}"))?;
    wardrobe.close()?;

    print_json(&json!({ "kind": kind, "itemId": id, "log": log }))
}

fn cmd_dashboard(data_dir: &Path, limit: usize) -> Result<()> {
    let wardrobe = open_wardrobe(data_dir)?;
    let season = Season::for_date(Utc::now());
    let suggestions = seasonal_suggestions(wardrobe.pieces(), season, limit);
    let recent = recently_worn(wardrobe.pieces(), wardrobe.outfits(), limit);

    print_json(&json!({
        "season": season,
        "suggestions": suggestions,
        "recentlyWorn": recent,
    }))
}

fn cmd_config(data_dir: &Path, cmd: ConfigCommand) -> Result<()> {
    let mut wardrobe = open_wardrobe(data_dir)?;
    match cmd {
        ConfigCommand::Show => {}
        ConfigCommand::SetKey { key } => wardrobe.set_api_key(&key)?,
        ConfigCommand::SetProvider { provider } => wardrobe.set_provider(provider)?,
    }
    let settings = wardrobe.settings()?;
    wardrobe.close()?;

    print_json(&json!({
        "provider": settings.provider,
        "apiKeySet": !settings.api_key.is_empty(),
        "supportsBackgroundRemoval": settings.provider.supports_background_removal(),
    }))
}

fn cmd_analyze(data_dir: &Path, path: &Path) -> Result<()> {
    let image = read_image(path)?;
    let wardrobe = open_wardrobe(data_dir)?;
    let result = block_on(analyze_image(data_dir, &wardrobe, &image))??;
    print_json(&result)
}

fn cmd_remove_bg(data_dir: &Path, path: &Path, output: &Path) -> Result<()> {
    let image = read_image(path)?;
    let wardrobe = open_wardrobe(data_dir)?;
    let settings = wardrobe.settings()?;
    let client = vision_client(data_dir)?;

    let edited = block_on(client.remove_background(
        &settings.api_key,
        settings.provider,
        &image.base64,
        &image.mime_type,
    ))??;
    let bytes = edited
        .to_bytes()
        .context("Provider returned an image that is not valid base64")?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_json(&json!({
        "output": output.display().to_string(),
        "mimeType": edited.mime_type,
        "suggestedExtension": extension_for_mime(&edited.mime_type),
        "bytes": bytes.len(),
    }))
}

// === Helpers ===

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

fn vision_client(data_dir: &Path) -> Result<VisionClient> {
    let config = FileConfig::load(data_dir)?;
    Ok(VisionClient::new(config.vision)?)
}

async fn analyze_image(
    data_dir: &Path,
    wardrobe: &Wardrobe<SqliteStorage>,
    image: &EditedImage,
) -> Result<closet_core::AnalysisResult> {
    let settings = wardrobe.settings()?;
    let client = vision_client(data_dir)?;
    let result = client
        .analyze(
            &settings.api_key,
            settings.provider,
            &image.base64,
            &image.mime_type,
        )
        .await?;
    Ok(result)
}

/// Read a local image, inferring its MIME type from the extension.
fn read_image(path: &Path) -> Result<EditedImage> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let mime = mime_for_extension(ext)
        .ok_or_else(|| anyhow!("unsupported image type: {}", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(EditedImage::from_bytes(&bytes, mime))
}

/// Local files become data URLs; anything else is kept as a URL.
fn resolve_images(values: &[String]) -> Result<Vec<String>> {
    values
        .iter()
        .map(|value| {
            let path = Path::new(value);
            if path.is_file() {
                Ok(read_image(path)?.data_url())
            } else {
                Ok(value.clone())
            }
        })
        .collect()
}

fn not_found(kind: &'static str, id: &str) -> ClosetError {
    ClosetError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn check_pieces_exist(wardrobe: &Wardrobe<SqliteStorage>, ids: &[String]) -> Result<()> {
    match ids.iter().find(|id| wardrobe.piece(id).is_none()) {
        Some(missing) => Err(not_found("piece", missing).into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn piece_fields_override_only_given_values() {
        let mut draft = PieceDraft {
            title: "Old".to_string(),
            brand: "Levi's".to_string(),
            ..PieceDraft::default()
        };
        let fields = PieceFields {
            title: Some("New".to_string()),
            brand: None,
            color: None,
            size: None,
            season: Some(Season::Winter),
            style: None,
            tags: Some("wool, warm,".to_string()),
            images: Vec::new(),
        };
        fields.apply(&mut draft);

        assert_eq!(draft.title, "New");
        assert_eq!(draft.brand, "Levi's");
        assert_eq!(draft.season, Season::Winter);
        assert_eq!(draft.tags, ["wool", "warm"]);
    }

    #[test]
    fn clear_pieces_empties_the_outfit() {
        let mut draft = OutfitDraft {
            title: "Classic Casual".to_string(),
            piece_ids: vec!["p1".to_string(), "p2".to_string()],
            ..OutfitDraft::default()
        };
        let fields = OutfitFields {
            title: None,
            pieces: Vec::new(),
            clear_pieces: true,
            tags: None,
            notes: None,
            images: Vec::new(),
        };
        fields.apply(&mut draft);

        assert!(draft.piece_ids.is_empty());
        assert_eq!(draft.title, "Classic Casual");
    }

    #[test]
    fn clear_pieces_conflicts_with_piece() {
        let parsed = Cli::try_parse_from([
            "closet", "outfit", "edit", "o1", "--clear-pieces", "--piece", "p1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn urls_pass_through_and_files_become_data_urls() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("shirt.png");
        std::fs::write(&file, b"png").unwrap();

        let images = resolve_images(&[
            "https://example.com/a.jpg".to_string(),
            file.display().to_string(),
        ])
        .unwrap();

        assert_eq!(images[0], "https://example.com/a.jpg");
        assert_eq!(images[1], "data:image/png;base64,cG5n");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, b"hi").unwrap();
        assert!(read_image(&file).is_err());
    }
}
