//! site-sync: load, edit and publish the bilingual site configuration.
//!
//! # Architecture Overview
//!
//! ```text
//!   baseline JSON ──┐
//!   cached draft ───┼──▶ ConfigLoader ──▶ SiteStore ──▶ Localizer (show)
//!   GET /static ×7 ─┘                        │
//!                                            ▼
//!                                         Editor ──save──▶ draft on disk
//!                                            │
//!                                  POST /image, DELETE /image/:id
//!
//!   SiteStore ──▶ Publisher ──▶ update-static / add-static ×7
//! ```
//!
//! Every command loads the configuration with the cached draft re-applied over
//! the remote pages, so edits saved by earlier commands stay pending until
//! `publish` pushes them. A full publish then retires the draft.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use site_sync::config::{load_config, parse_config, SyncConfig, TOKEN_ENV};
use site_sync::editor::{Editor, EditorError};
use site_sync::notice::{MediaOp, Notice, NoticeLevel};
use site_sync::observability::logging;
use site_sync::site::schema::{page_schema, FieldKind, ItemShape};
use site_sync::site::SeoField;
use site_sync::storage::{self, DeviceStorage, FileStorage};
use site_sync::sync::{
    BaselineSource, ConfigLoader, Liveness, LoadReport, PublishOutcome, Publisher,
};
use site_sync::{Language, Localizer, PageKey, RemoteClient, SiteStore};

const DEFAULT_CONFIG: &str = "site-sync.toml";

#[derive(Parser)]
#[command(name = "site-sync")]
#[command(about = "Load, edit and publish the bilingual site configuration", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./site-sync.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged configuration
    Load,
    /// Print one field in the active (or given) language
    Show {
        page: PageKey,
        field: String,
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Switch the display language
    Language { lang: Language },
    /// Set a page field in the draft
    Set {
        page: PageKey,
        field: String,
        value: String,
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Set an SEO field in the draft
    Seo {
        page: PageKey,
        field: SeoField,
        value: String,
        /// Defaults to the active display language
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Edit a repeatable list section
    List {
        #[command(subcommand)]
        action: ListCommand,
    },
    /// Upload or delete images
    Image {
        #[command(subcommand)]
        action: ImageCommand,
    },
    /// Publish the configuration to the backend
    Publish,
    /// Drop the local draft
    Discard,
    /// Print the editable fields of every page
    Schema,
}

#[derive(Subcommand)]
enum ListCommand {
    /// Append a record (JSON) or the default record
    Append {
        page: PageKey,
        section: String,
        #[arg(long)]
        json: Option<String>,
    },
    /// Remove the record at an index
    Remove { page: PageKey, section: String, index: usize },
    /// Set one field of one record
    Set {
        page: PageKey,
        section: String,
        index: usize,
        field: String,
        value: String,
        #[arg(long)]
        lang: Option<Language>,
    },
}

#[derive(Subcommand)]
enum ImageCommand {
    /// Upload into a gallery section, or replace an image field with --field
    Upload {
        page: PageKey,
        target: String,
        file: PathBuf,
        #[arg(long)]
        field: bool,
    },
    /// Delete a gallery entry by index, or clear an image field
    Delete {
        page: PageKey,
        target: String,
        #[arg(long)]
        index: Option<usize>,
    },
}

struct Context {
    config: SyncConfig,
    storage: Arc<dyn DeviceStorage>,
    remote: Arc<RemoteClient>,
    store: SiteStore,
    localizer: Localizer,
    liveness: Liveness,
}

impl Context {
    async fn load(&self) -> Result<LoadReport, Box<dyn Error>> {
        let loader = ConfigLoader::new(
            self.remote.clone(),
            self.storage.clone(),
            self.config.backend.request_timeout_secs,
        );
        let baseline = BaselineSource::parse(&self.config.baseline.source);
        let report = loader
            .resume_into(&baseline, &self.store, &self.liveness)
            .await?;
        if let Some(notice) = Notice::from_load(&report) {
            self.print_notice(&notice);
        }
        Ok(report)
    }

    fn print_notice(&self, notice: &Notice) {
        let text = notice.render(self.localizer.language());
        match notice.level {
            NoticeLevel::Success => println!("{text}"),
            NoticeLevel::Warning | NoticeLevel::Error => {
                eprintln!("{}: {text}", notice.level.as_str())
            }
        }
    }

    /// Save the editor's working copy as the draft, reporting the outcome.
    fn save(&self, editor: &mut Editor<'_>) -> Result<(), Box<dyn Error>> {
        editor.save(self.storage.as_ref())?;
        self.print_notice(&Notice::draft_saved());
        Ok(())
    }

    fn edit_failed(&self, error: EditorError) -> Box<dyn Error> {
        self.print_notice(&Notice::editor_failed(&error));
        error.into()
    }
}

fn settings(path: Option<&Path>) -> Result<SyncConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => load_config(Path::new(DEFAULT_CONFIG))?,
        None => parse_config("", std::env::var(TOKEN_ENV).ok())?,
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = settings(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::debug!(
        base_url = %config.backend.base_url,
        baseline = %config.baseline.source,
        storage = %config.storage.dir,
        "Settings loaded"
    );

    let storage: Arc<dyn DeviceStorage> = Arc::new(FileStorage::new(&config.storage.dir));
    let remote = Arc::new(RemoteClient::new(&config.backend)?);
    let localizer =
        Localizer::restore(storage.clone()).with_image_domain(&config.backend.image_domain);
    let mut ctx = Context {
        config,
        storage,
        remote,
        store: SiteStore::default(),
        localizer,
        liveness: Liveness::new(),
    };

    let result = run(&mut ctx, cli.command).await;
    ctx.liveness.close();
    result
}

async fn run(ctx: &mut Context, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Load => {
            ctx.load().await?;
            let lang = ctx.localizer.language();
            for (name, value) in ctx.store.presentation().css_variables(lang) {
                eprintln!("{name}: {value}");
            }
            println!("{}", ctx.store.snapshot().to_pretty_json()?);
        }
        Commands::Show { page, field, lang } => {
            ctx.load().await?;
            if let Some(lang) = lang {
                ctx.localizer = Localizer::new(ctx.storage.clone(), lang)
                    .with_image_domain(&ctx.config.backend.image_domain);
            }
            println!("{}", ctx.localizer.field(&ctx.store.snapshot(), page, &field));
        }
        Commands::Language { lang } => {
            let direction = ctx.localizer.set_language(lang)?;
            println!("{lang} ({})", direction.as_str());
        }
        Commands::Set { page, field, value, lang } => {
            ctx.load().await?;
            let mut editor = Editor::open(&ctx.store);
            editor
                .set_value(page, &field, lang, Value::String(value))
                .map_err(|e| ctx.edit_failed(e))?;
            ctx.save(&mut editor)?;
        }
        Commands::Seo { page, field, value, lang } => {
            ctx.load().await?;
            let lang = lang.unwrap_or_else(|| ctx.localizer.language());
            let mut editor = Editor::open(&ctx.store);
            editor
                .set_seo(page, field, lang, &value)
                .map_err(|e| ctx.edit_failed(e))?;
            ctx.save(&mut editor)?;
        }
        Commands::List { action } => {
            ctx.load().await?;
            let mut editor = Editor::open(&ctx.store);
            let result = match action {
                ListCommand::Append { page, section, json } => {
                    let item = json.map(|text| serde_json::from_str::<Value>(&text)).transpose()?;
                    editor.append(page, &section, item).map(|index| println!("{index}"))
                }
                ListCommand::Remove { page, section, index } => {
                    editor.remove(page, &section, index).map(|_| ())
                }
                ListCommand::Set { page, section, index, field, value, lang } => {
                    editor.update_field(page, &section, index, &field, lang, Value::String(value))
                }
            };
            result.map_err(|e| ctx.edit_failed(e))?;
            ctx.save(&mut editor)?;
        }
        Commands::Image { action } => {
            ctx.load().await?;
            let remote = ctx.remote.clone();
            let mut editor = Editor::open(&ctx.store);
            let (op, result) = match action {
                ImageCommand::Upload { page, target, file, field } => {
                    let bytes = tokio::fs::read(&file).await?;
                    let name = file
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "upload".to_string());
                    let media = remote.as_ref();
                    let result = if field {
                        editor.upload_main_image(media, page, &target, &name, bytes).await
                    } else {
                        editor.upload_gallery_image(media, page, &target, &name, bytes).await
                    };
                    let domain = &ctx.config.backend.image_domain;
                    (MediaOp::Upload, result.map(|image| println!("{}", image.resolve(domain))))
                }
                ImageCommand::Delete { page, target, index } => {
                    let result = match index {
                        Some(index) => editor
                            .delete_gallery_image(remote.as_ref(), page, &target, index)
                            .await
                            .map(|_| ()),
                        None => editor.delete_main_image(remote.as_ref(), page, &target).await,
                    };
                    (MediaOp::Delete, result)
                }
            };
            if let Err(e) = result {
                ctx.print_notice(&Notice::media_failed(op, &e));
                return Err(e.into());
            }
            ctx.save(&mut editor)?;
        }
        Commands::Publish => {
            ctx.load().await?;
            let publisher = Publisher::new(ctx.remote.clone(), ctx.storage.clone());
            let report = publisher.publish_canonical(&ctx.store, &ctx.liveness).await;
            ctx.print_notice(&Notice::from_publish(&report));
            for page in report.failed_pages() {
                eprintln!("  not published: {page}");
            }
            // The edits now live remotely; later sessions read them from there.
            if report.outcome == PublishOutcome::Full {
                storage::clear_draft(ctx.storage.as_ref())?;
            }
        }
        Commands::Discard => {
            storage::clear_draft(ctx.storage.as_ref())?;
            ctx.print_notice(&Notice::draft_discarded());
        }
        Commands::Schema => print_schema(),
    }
    Ok(())
}

fn print_schema() {
    for page in PageKey::ALL {
        let schema = page_schema(page);
        println!("{page}");
        for field in schema.fields {
            println!("  {:<20} {}", field.name, kind_label(field.kind));
        }
        for list in schema.lists {
            match list.item {
                ItemShape::Image => println!("  {:<20} [image]", list.name),
                ItemShape::Record(fields) => {
                    let names = fields.iter().map(|f| f.name).collect::<Vec<_>>().join(", ");
                    println!("  {:<20} [{names}]", list.name);
                }
            }
        }
    }
}

fn kind_label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Bilingual => "ar/en",
        FieldKind::Plain => "text",
        FieldKind::Image => "image",
    }
}
