//! lora-browse CLI application entry point
//!
//! Drives the filter and selection managers against a running LoRA manager
//! server.
//!
//! # Usage
//!
//! ```bash
//! # List candidate tags and base models for the LoRA view
//! lora-browse tags
//!
//! # Toggle a base model filter on the checkpoints view
//! lora-browse filters toggle "SDXL 1.0" --kind base-model -c checkpoints
//!
//! # Open the filtered recipes page in the browser
//! lora-browse open -c recipes
//!
//! # Copy prompt syntax for two LoRAs
//! lora-browse copy /models/loras/a.safetensors /models/loras/b.safetensors
//! ```
//!
//! # Configuration
//!
//! Configuration is stored in the user's config directory
//! (`~/.config/lora-browse/config.toml` on Linux) and created on first run.

use lora_browse::{
    LoraBrowseError,
    cli::{Cli, Commands, ConfigCommands, FilterCommands},
    clipboard::SystemClipboard,
    config::BrowseConfig,
    filters::{
        ApplyOutcome, FilterContext, FilterDeps, FilterManager, ListingContext, TagKind,
        ToggleGroup,
    },
    http::HttpCatalog,
    logging,
    navigate::{BrowserNavigator, PageNavigator, build_page_url},
    notify::{Notifier, Severity, TerminalNotifier},
    selection::{GridView, HeadlessGrid, SelectionManager},
    state::SharedPageState,
    storage::{DurableStorage, MemoryStorage, SledStorage, default_storage_path},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, LoraBrowseError>;

/// Shared collaborators for one run
struct Services {
    config: BrowseConfig,
    server_url: String,
    quiet: bool,
    catalog: Arc<HttpCatalog>,
    storage: Arc<dyn DurableStorage>,
    notifier: Arc<dyn Notifier>,
    state: SharedPageState,
}

impl Services {
    fn new(config: BrowseConfig, server_url: String, quiet: bool) -> Result<Self> {
        let catalog = Arc::new(HttpCatalog::new(&server_url, config.page_size)?);
        let storage = open_storage(&config);

        Ok(Self {
            server_url,
            quiet,
            catalog,
            storage,
            notifier: Arc::new(TerminalNotifier::new(quiet)),
            state: SharedPageState::new(),
            config,
        })
    }

    /// Build the filter manager of one view, restoring its stored criteria
    fn filter_manager(&self, context: ListingContext) -> FilterManager {
        let mut deps = FilterDeps::new(
            self.catalog.clone(),
            Arc::clone(&self.storage),
            Arc::clone(&self.notifier),
            self.state.clone(),
        )
        .with_tag_limit(self.config.tag_limit);

        if self.config.navigation_fallback {
            deps = deps.with_navigator(Arc::new(BrowserNavigator), &self.server_url);
        }

        FilterManager::new(
            FilterContext::new(context.descriptor(), self.catalog.clone()),
            deps,
        )
    }
}

/// Open the sled store, falling back to in-memory storage
///
/// Filters then simply do not survive the run.
fn open_storage(config: &BrowseConfig) -> Arc<dyn DurableStorage> {
    let path = match config.storage_path.clone() {
        Some(path) => Ok(path),
        None => default_storage_path(),
    };

    match path.and_then(SledStorage::open) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            warn!(error = %e, "durable storage unavailable, filters will not persist");
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Report the outcome of an apply to the user
///
/// Success and failure messages are already delivered by the notifier. An
/// applied reload lists the first page the server returned for `context`.
fn report_apply(services: &Services, context: ListingContext, outcome: &ApplyOutcome) {
    match outcome {
        ApplyOutcome::Applied { total_items } if !services.quiet => {
            println!("{total_items} item(s) match");
            if let Some(page) = services.catalog.last_page(context) {
                let mut grid = HeadlessGrid::default();
                grid.render(page.rendered_items());
                for item in grid.rendered_items() {
                    println!("  {} ({})", item.snapshot.display_name, item.key);
                }
            }
        }
        ApplyOutcome::NavigatedAway { url } if !services.quiet => {
            println!("Opened {url}");
        }
        ApplyOutcome::Superseded => info!("apply superseded by a newer one"),
        _ => {}
    }
}

fn print_group(title: &str, group: &ToggleGroup, quiet: bool) {
    match group {
        ToggleGroup::Loaded(toggles) => {
            if !quiet {
                println!("=== {title} ===");
            }
            if toggles.is_empty() && !quiet {
                println!("  (none)");
            }
            for toggle in toggles {
                let marker = if toggle.active { "*" } else { " " };
                if quiet {
                    println!("{}", toggle.value);
                } else {
                    println!("  [{marker}] {} ({})", toggle.value, toggle.count);
                }
            }
        }
        ToggleGroup::Failed(message) => eprintln!("{title}: {message}"),
        ToggleGroup::NotLoaded => {}
    }
}

/// Handle the tags command - list candidate tags with active markers
async fn handle_tags_command(services: &Services, context: ListingContext) {
    let mut manager = services.filter_manager(context);
    manager.load_available_tags().await;

    let panel = manager.panel();
    print_group("Base Models", panel.group(TagKind::Attribute), services.quiet);
    if !services.quiet {
        println!();
    }
    print_group("Tags", panel.group(TagKind::Category), services.quiet);
}

/// Handle the filters subcommands
async fn handle_filters_command(services: &Services, command: &FilterCommands) -> Result<()> {
    match command {
        FilterCommands::Show { context } => {
            let manager = services.filter_manager((*context).into());
            let criteria = manager.criteria();

            if !criteria.has_active() {
                if !services.quiet {
                    println!("No active filters");
                }
                return Ok(());
            }

            if let Some(summary) = criteria.summary() {
                if !services.quiet {
                    println!("{summary}");
                }
            }
            for model in criteria.attribute() {
                println!("  base model: {model}");
            }
            for tag in criteria.category() {
                println!("  tag: {tag}");
            }
        }
        FilterCommands::Toggle { tag, kind, context } => {
            if tag.trim().is_empty() {
                return Err(LoraBrowseError::InvalidInput("Tag must not be empty".into()));
            }

            let context = ListingContext::from(*context);
            let mut manager = services.filter_manager(context);
            let kind = TagKind::from(*kind);
            let outcome = manager
                .toggle_and_apply(tag.trim(), kind, services.config.notify_on_apply)
                .await;

            if !services.quiet {
                let state = if manager.criteria().contains(kind, tag.trim()) {
                    "on"
                } else {
                    "off"
                };
                println!("{kind} '{}' {state}", tag.trim());
            }
            report_apply(services, context, &outcome);
        }
        FilterCommands::Clear { context } => {
            let context = ListingContext::from(*context);
            let mut manager = services.filter_manager(context);
            let outcome = manager.clear_filters().await;
            report_apply(services, context, &outcome);
        }
    }
    Ok(())
}

/// Handle the open command - open the filtered page in the browser
fn handle_open_command(services: &Services, context: ListingContext) -> Result<()> {
    let manager = services.filter_manager(context);
    let url = build_page_url(
        &services.server_url,
        &manager.descriptor().page_path,
        manager.criteria(),
    )?;

    BrowserNavigator.navigate(&url)?;
    if !services.quiet {
        println!("Opened {url}");
    }
    Ok(())
}

/// Handle the copy command - select items across pages and copy their syntax
async fn handle_copy_command(
    services: &Services,
    context: ListingContext,
    file_paths: &[String],
) -> Result<()> {
    let manager = services.filter_manager(context);
    let list_endpoint = manager.descriptor().list_endpoint.clone();

    let mut selection = SelectionManager::new(
        HeadlessGrid::default(),
        Arc::new(SystemClipboard),
        Arc::clone(&services.notifier),
    )
    .with_reveal_delay(services.config.panel_reveal_delay());
    selection.enter_selection_mode();

    let mut wanted: HashSet<&str> = file_paths.iter().map(String::as_str).collect();
    let mut page = 1;
    loop {
        let listing = services
            .catalog
            .fetch_page(&list_endpoint, manager.criteria(), page)
            .await?;

        selection.view_mut().render(listing.rendered_items());
        selection.reapply_selection_on_render();

        let rendered = selection.view().rendered_items();
        for item in &rendered {
            if wanted.remove(item.key.as_str()) {
                selection.toggle_item_selection(item);
            }
        }

        if wanted.is_empty() || page >= listing.total_pages {
            break;
        }
        page += 1;
    }

    if !wanted.is_empty() {
        let mut missing: Vec<&str> = wanted.into_iter().collect();
        missing.sort_unstable();
        services.notifier.notify(
            &format!("Not in the filtered listing: {}", missing.join(", ")),
            Severity::Warning,
        );
    }

    let report = selection.copy_selected_as_text().await;
    if !report.tokens.is_empty() {
        println!("{}", report.text());
    }
    selection.exit_selection_mode();
    Ok(())
}

/// Handle the config subcommands
fn handle_config_command(config: &BrowseConfig, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => print!("{}", config.to_toml()?),
        ConfigCommands::Path => println!("{}", BrowseConfig::config_path()?.display()),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = BrowseConfig::load();
    logging::init(BrowseConfig::log_level_of(&loaded));

    let config = loaded.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        BrowseConfig::default()
    });
    let cli = Cli::parse_args();

    let quiet = cli.quiet || config.quiet;
    let server_url = cli.server.clone().unwrap_or_else(|| config.server_url.clone());
    let services = || Services::new(config.clone(), server_url.clone(), quiet);

    match &cli.command {
        Commands::Tags { context } => handle_tags_command(&services()?, (*context).into()).await,
        Commands::Filters { command } => handle_filters_command(&services()?, command).await?,
        Commands::Open { context } => handle_open_command(&services()?, (*context).into())?,
        Commands::Copy {
            context,
            file_paths,
        } => handle_copy_command(&services()?, (*context).into(), file_paths).await?,
        Commands::Config { command } => handle_config_command(&config, command)?,
    }

    Ok(())
}
