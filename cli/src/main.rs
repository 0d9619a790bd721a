mod output;
mod photo;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use recipesnap_core::ai::{AiCache, AiConfig, CachingAiClient};
use recipesnap_core::{
    resolve_recipe, split_ingredient_list, AiGateway, InferenceGateway, JsonFileRecipeStore,
    RecipeStore, SavedRecipe, Session, Stage,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "recipesnap")]
#[command(about = "Turn a photo of your ingredients into simple recipes", long_about = None)]
struct Cli {
    /// Saved recipes file (default: ~/.recipesnap/saved-recipes.json)
    #[arg(long, global = true, env = "RECIPESNAP_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ingredients visible in a photo
    Analyze {
        /// Photo of the ingredients (JPEG, PNG, GIF or WebP)
        photo: PathBuf,
    },
    /// Suggest recipes for a list of ingredients
    Ideas {
        /// Ingredient names
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Write out the full recipe for a dish
    Recipe {
        /// Recipe name, e.g. "Simple Tomato Soup"
        name: String,
        /// Comma-separated ingredients to base the recipe on
        #[arg(long)]
        ingredients: Option<String>,
        /// Ingredient photo to keep with a saved recipe
        #[arg(long)]
        photo: Option<PathBuf>,
        /// Save the recipe
        #[arg(long)]
        save: bool,
    },
    /// Photo to recipe in one go
    Snap {
        /// Photo of the ingredients
        photo: PathBuf,
        /// Add an ingredient after analysis (repeatable)
        #[arg(long = "add")]
        add: Vec<String>,
        /// Remove an ingredient after analysis (repeatable)
        #[arg(long = "remove")]
        remove: Vec<String>,
        /// Which idea to expand, counting from 1
        #[arg(long, default_value_t = 1)]
        pick: usize,
        /// Save the recipe
        #[arg(long)]
        save: bool,
    },
    /// Manage saved recipes
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
    /// Inspect or clear the AI response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Show how many responses are cached
    Stats,
    /// Delete cached responses
    Clear {
        /// Only clear responses for this prompt (e.g. "extract_ingredients")
        #[arg(long)]
        prompt: Option<String>,
    },
}

#[derive(Subcommand)]
enum SavedCommands {
    /// List saved recipes
    List {
        /// Print the full records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a saved recipe
    Remove {
        /// Recipe id, as shown by `saved list`
        id: String,
    },
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn gateway() -> Result<Arc<dyn InferenceGateway>> {
    let client = CachingAiClient::from_env().context("Failed to set up the AI client")?;
    Ok(Arc::new(AiGateway::new(Arc::new(client))))
}

fn open_store(path: Option<PathBuf>) -> Result<JsonFileRecipeStore> {
    let path = path.unwrap_or_else(JsonFileRecipeStore::default_path);
    JsonFileRecipeStore::open(&path)
        .with_context(|| format!("Failed to open saved recipes at {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { photo } => analyze(photo).await?,
        Commands::Ideas { ingredients } => ideas(ingredients).await?,
        Commands::Recipe {
            name,
            ingredients,
            photo,
            save,
        } => recipe(name, ingredients, photo, save, cli.store).await?,
        Commands::Snap {
            photo,
            add,
            remove,
            pick,
            save,
        } => snap(photo, add, remove, pick, save, cli.store).await?,
        Commands::Saved { command } => saved(command, cli.store)?,
        Commands::Cache { command } => cache(command)?,
    }

    Ok(())
}

async fn analyze(photo: PathBuf) -> Result<()> {
    let mut session = Session::new(gateway()?);
    session.capture(photo::load_photo(&photo)?);
    session.analyze().await?;

    if session.stage() != Stage::Refine {
        bail!("{}", output::notice_text(&session));
    }
    output::print_notice(&session);
    output::print_ingredients(&session);
    Ok(())
}

async fn ideas(ingredients: Vec<String>) -> Result<()> {
    let mut session = Session::new(gateway()?);
    session.start_manual();
    for name in &ingredients {
        session.add_ingredient(name)?;
    }
    session.request_ideas().await?;

    if session.stage() != Stage::Results {
        bail!("{}", output::notice_text(&session));
    }
    output::print_notice(&session);
    output::print_ideas(&session);
    Ok(())
}

async fn recipe(
    name: String,
    ingredients: Option<String>,
    photo: Option<PathBuf>,
    save: bool,
    store: Option<PathBuf>,
) -> Result<()> {
    let gateway = gateway()?;
    let context = ingredients.as_deref().map(split_ingredient_list);
    let source_image = photo.as_deref().map(photo::load_photo).transpose()?;

    let resolved = resolve_recipe(
        gateway.as_ref(),
        &name,
        context.as_deref(),
        source_image.as_ref(),
    )
    .await?;

    if let Some(notice) = &resolved.notice {
        eprintln!("{}", notice);
    }
    output::print_recipe(&resolved.detail);

    if save {
        let mut store = open_store(store)?;
        let added = store.save(SavedRecipe::from_detail(resolved.detail))?;
        output::print_saved(added, store.path());
    }
    Ok(())
}

async fn snap(
    photo: PathBuf,
    add: Vec<String>,
    remove: Vec<String>,
    pick: usize,
    save: bool,
    store: Option<PathBuf>,
) -> Result<()> {
    let mut session = Session::new(gateway()?);
    session.capture(photo::load_photo(&photo)?);

    session.analyze().await?;
    if session.stage() != Stage::Refine {
        bail!("{}", output::notice_text(&session));
    }
    output::print_notice(&session);
    session.dismiss_notice();

    for name in &add {
        session.add_ingredient(name)?;
        output::print_notice(&session);
        session.dismiss_notice();
    }
    for name in &remove {
        session.remove_ingredient(name)?;
    }
    output::print_ingredients(&session);

    session.request_ideas().await?;
    if session.stage() != Stage::Results {
        bail!("{}", output::notice_text(&session));
    }
    output::print_notice(&session);
    output::print_ideas(&session);

    let ideas = session.state().visible_ideas().unwrap_or_default();
    let Some(idea) = pick.checked_sub(1).and_then(|index| ideas.get(index)) else {
        if ideas.is_empty() {
            return Ok(());
        }
        bail!("--pick must be between 1 and {}", ideas.len());
    };

    println!();
    let resolved = session.open_recipe(&idea.name).await?;
    if let Some(notice) = &resolved.notice {
        eprintln!("{}", notice);
    }
    output::print_recipe(&resolved.detail);

    if save {
        let mut store = open_store(store)?;
        let added = session.save_recipe(&mut store, &resolved.detail)?;
        output::print_saved(added, store.path());
    }
    Ok(())
}

fn saved(command: SavedCommands, store: Option<PathBuf>) -> Result<()> {
    let mut store = open_store(store)?;

    match command {
        SavedCommands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.list())?);
            } else {
                output::print_saved_list(store.list());
            }
        }
        SavedCommands::Remove { id } => {
            if !store.remove(&id)? {
                bail!("No saved recipe with id {}", id);
            }
            println!("Removed {}", id);
        }
    }

    Ok(())
}

fn cache(command: CacheCommands) -> Result<()> {
    let Some(dir) = AiConfig::cache_dir_from_env() else {
        bail!("The AI response cache is disabled (RECIPESNAP_AI_CACHE)");
    };
    let cache = AiCache::new(dir);

    match command {
        CacheCommands::Stats => {
            let stats = cache.stats();
            println!("Cache directory: {}", cache.dir().display());
            println!("Cached responses: {}", stats.cached_responses);
            println!("Total size: {} bytes", stats.total_bytes);
        }
        CacheCommands::Clear { prompt } => {
            cache
                .clear(prompt.as_deref())
                .with_context(|| format!("Failed to clear {}", cache.dir().display()))?;
            match prompt {
                Some(prompt) => println!("Cleared cached {} responses", prompt),
                None => println!("Cleared {}", cache.dir().display()),
            }
        }
    }

    Ok(())
}
