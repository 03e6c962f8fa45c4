//! Command-line interface for shelf.
//!
//! Provides commands for searching the book catalog, saving results into
//! the personal library, moving books between reading categories, and
//! removing them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{CatalogSearch, GoogleBooksClient, SearchError, SearchQuery};
use crate::config::{self, ResolvedConfig};
use crate::domain::{BookDefaults, Category, SavedBook};
use crate::library::{AddOutcome, FileStorage, LibraryStore, Mutation, Storage};

pub mod notify;

pub use notify::{ConsoleNotifier, NoticeLevel, Notifier, RecordingNotifier};

/// shelf - Personal book library manager
#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the book catalog
    Search {
        /// Search terms
        query: Option<String>,

        /// Restrict to a genre (catalog subject)
        #[arg(short, long)]
        genre: Option<String>,

        /// Save the results with these ids (repeatable)
        #[arg(short, long = "save", value_name = "ID")]
        save: Vec<String>,
    },

    /// List saved books grouped by category
    List {
        /// Only show one category
        #[arg(short, long, value_enum)]
        category: Option<CategoryArg>,
    },

    /// Move a saved book to another category
    Move {
        /// Book id
        id: String,

        /// Target category
        #[arg(value_enum)]
        category: CategoryArg,
    },

    /// Remove a saved book
    Remove {
        /// Book id
        id: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Category for CLI (maps to Category)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    /// Saved but not started
    #[value(alias = "toread")]
    ToRead,

    /// Currently being read
    Reading,

    /// Finished reading
    #[value(alias = "finished")]
    Completed,
}

impl From<CategoryArg> for Category {
    fn from(c: CategoryArg) -> Self {
        match c {
            CategoryArg::ToRead => Category::ToRead,
            CategoryArg::Reading => Category::Reading,
            CategoryArg::Completed => Category::Completed,
        }
    }
}

/// Outcome of a search command
#[derive(Debug, Default)]
pub struct SearchSummary {
    /// Results converted to library form, in catalog order
    pub results: Vec<SavedBook>,
    /// Ids newly saved by this command
    pub saved: Vec<String>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let cfg = config::config()?;
        let notifier = ConsoleNotifier::new(cfg.emoji);

        match self.command {
            Commands::Search { query, genre, save } => {
                let mut store = open_library(cfg)?;
                let catalog = GoogleBooksClient::from_settings(&cfg.catalog);
                search_books(
                    &mut store,
                    &catalog,
                    &notifier,
                    &cfg.defaults,
                    query.as_deref(),
                    genre.as_deref(),
                    &save,
                )
                .await
                .map(|_| ())
            }
            Commands::List { category } => {
                let store = open_library(cfg)?;
                list_books(&store, category.map(Into::into));
                Ok(())
            }
            Commands::Move { id, category } => {
                let mut store = open_library(cfg)?;
                move_book(&mut store, &notifier, &id, category.into()).map(|_| ())
            }
            Commands::Remove { id } => {
                let mut store = open_library(cfg)?;
                remove_book(&mut store, &notifier, &id).map(|_| ())
            }
            Commands::Config => {
                show_config(cfg);
                Ok(())
            }
        }
    }
}

/// Open the file-backed library described by the configuration
fn open_library(cfg: &ResolvedConfig) -> Result<LibraryStore<FileStorage>> {
    let storage = FileStorage::new(&cfg.home);
    LibraryStore::open_with_defaults(storage, cfg.storage_key.clone(), &cfg.defaults)
        .with_context(|| format!("Failed to open library in {}", cfg.home.display()))
}

/// Search the catalog, print results, and save any requested ids
pub async fn search_books<S: Storage>(
    store: &mut LibraryStore<S>,
    catalog: &dyn CatalogSearch,
    notifier: &dyn Notifier,
    defaults: &BookDefaults,
    text: Option<&str>,
    genre: Option<&str>,
    save: &[String],
) -> Result<SearchSummary> {
    let query = match SearchQuery::new(text, genre) {
        Ok(query) => query,
        Err(e @ (SearchError::EmptyQuery | SearchError::BlankQuery)) => {
            notifier.warning(&e.to_string());
            return Ok(SearchSummary::default());
        }
        Err(e) => return Err(e.into()),
    };

    let items = match catalog.search(&query).await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!(catalog = catalog.name(), error = %e, "catalog search failed");
            notifier.error("An error occurred. Please try again later.");
            return Err(e).context("Catalog search failed");
        }
    };

    if items.is_empty() {
        notifier.info("No books found.");
        return Ok(SearchSummary::default());
    }

    let results: Vec<SavedBook> = items
        .iter()
        .map(|item| SavedBook::from_catalog_item(item, defaults))
        .collect();

    for book in &results {
        let marker = if store.contains(&book.id) {
            " [already saved]"
        } else {
            ""
        };
        println!("{}  {} - {}{}", book.id, book.title, book.authors_display(), marker);
    }

    let mut saved = Vec::new();
    for id in save {
        let Some(book) = results.iter().find(|b| &b.id == id) else {
            notifier.warning(&format!("No search result with id {}", id));
            continue;
        };

        match store.add(book.clone())? {
            AddOutcome::Added => {
                notifier.success(&format!("Book saved! ({})", book.title));
                saved.push(book.id.clone());
            }
            AddOutcome::AlreadyExists => {
                notifier.warning(&format!("Book already in library! ({})", book.title));
            }
        }
    }

    Ok(SearchSummary { results, saved })
}

/// Print the library grouped by category
pub fn list_books<S: Storage>(store: &LibraryStore<S>, only: Option<Category>) {
    if store.is_empty() {
        println!("Library is empty. Use `shelf search <query> --save <id>` to add books.");
        return;
    }

    for (category, books) in store.group_by_category() {
        if only.is_some_and(|c| c != category) {
            continue;
        }

        println!("📚 {} ({})", category, books.len());
        for book in books {
            println!("  {}  {} - {}", book.id, book.title, book.authors_display());
        }
        println!();
    }
}

/// Move a saved book to another category
pub fn move_book<S: Storage>(
    store: &mut LibraryStore<S>,
    notifier: &dyn Notifier,
    id: &str,
    category: Category,
) -> Result<Mutation> {
    let outcome = store.set_category(id, category)?;

    match outcome {
        Mutation::Applied => notifier.success(&format!("Moved {} to {}", id, category)),
        Mutation::NotFound => notifier.warning(&format!("No saved book with id {}", id)),
    }

    Ok(outcome)
}

/// Remove a saved book
pub fn remove_book<S: Storage>(
    store: &mut LibraryStore<S>,
    notifier: &dyn Notifier,
    id: &str,
) -> Result<Mutation> {
    let outcome = store.remove(id)?;

    match outcome {
        Mutation::Applied => notifier.success(&format!("Removed {}", id)),
        Mutation::NotFound => notifier.warning(&format!("No saved book with id {}", id)),
    }

    Ok(outcome)
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) {
    println!("Shelf Configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Storage:");
    println!("  Home:    {}", cfg.home.display());
    println!("  Key:     {}", cfg.storage_key);
    println!("  Library: {}", cfg.library_path().display());
    println!();
    println!("Catalog:");
    println!("  API URL:     {}", cfg.catalog.api_url);
    println!("  Timeout:     {}s", cfg.catalog.timeout_seconds);
    match cfg.catalog.max_results {
        Some(max) => println!("  Max results: {}", max),
        None => println!("  Max results: (catalog default)"),
    }
    println!();
    println!("Defaults:");
    println!("  Author:      {}", cfg.defaults.author);
    println!("  Cover URL:   {}", cfg.defaults.cover_url);
    println!("  Description: {}", cfg.defaults.description);
}
