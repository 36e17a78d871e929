use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::{Builder, Env};
use log::debug;
use serde::Serialize;

use snipit::clipboard::write_text_to_clipboard;
use snipit::commands::{delete_snippet, exit_code, read_code};
use snipit::config::{AppPaths, HOME_ENV};
use snipit::editor;
use snipit::errors::{Result, SnipitError};
use snipit::export::{ExportOutcome, export_to};
use snipit::import::import_file;
use snipit::storage::SnippetStorage;
use snipit::storage::json::JsonStorage;
use snipit::storage::models::{NewSnippet, Snippet, SnippetFilter, parse_tags};

#[derive(Parser)]
#[command(
    name = "snipit",
    version,
    about = "A local snippet manager",
    long_about = "A local snippet manager.\nStop re-typing; start snipping."
)]
struct Cli {
    /// Output results as JSON
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Directory holding snippets.json (default: ~/.snipit)
    #[arg(long, global = true, env = HOME_ENV, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new snippet
    Save {
        /// The title of the snippet to save
        title: String,

        /// Inline code string
        #[arg(short, long, conflicts_with = "file")]
        code: Option<String>,

        /// Read code from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Comma-separated tags, e.g. "ts,async"
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Retrieve a snippet by title
    Get {
        /// The title of the snippet to retrieve
        title: String,

        /// Copy the code to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// List saved snippets
    List {
        /// Filter by tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Search snippet titles
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Delete a snippet by ID
    Delete {
        /// The ID of the snippet to delete (see `snipit list`)
        id: String,
    },

    /// Import snippets from a JSON file
    Import {
        /// File to read snippets from
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Export snippets to a JSON file
    Export {
        /// Path to save the exported JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

fn init_logger() {
    // RUST_LOG=debug snipit list
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();
    let cli = Cli::parse();
    let json = cli.json;

    let result = run(cli);
    if let Err(ref e) = result {
        debug!("{:?}", e);
        if json {
            eprintln!("{}", serde_json::json!({"error": e.to_string()}));
        } else {
            eprintln!("{} {}", "error:".red().bold(), e);
            if let Some(hint) = hint_for(e) {
                eprintln!("  {}", hint.dimmed());
            }
        }
    }
    process::exit(exit_code(&result));
}

fn hint_for(e: &SnipitError) -> Option<String> {
    match e {
        SnipitError::CorruptStore { path, .. } => Some(format!(
            "Fix or move aside {} to start with an empty store.",
            path.display()
        )),
        SnipitError::AlreadyExists(_) => Some("Choose a different --output path.".to_string()),
        SnipitError::InvalidImport { .. } => {
            Some("Expected a JSON array of snippets or an object with a \"snippets\" array.".to_string())
        }
        SnipitError::Editor(_) => Some("Set $EDITOR, or pass --code / --file instead.".to_string()),
        _ => None,
    }
}

fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let Some(command) = cli.command else {
        print_welcome();
        return Ok(());
    };
    let storage = open_storage(cli.home)?;

    match command {
        Commands::Save { title, code, file, tag } => cmd_save(&storage, title, code, file, tag, json),
        Commands::Get { title, copy } => cmd_get(&storage, &title, copy, json),
        Commands::List { tag, search } => cmd_list(&storage, SnippetFilter { tag, search }, json),
        Commands::Delete { id } => cmd_delete(&storage, &id, json),
        Commands::Import { file } => cmd_import(&storage, &file, json),
        Commands::Export { output } => cmd_export(&storage, &output, json),
    }
}

fn open_storage(home: Option<PathBuf>) -> Result<JsonStorage> {
    let paths = match home {
        Some(dir) => AppPaths::from_base(dir),
        None => AppPaths::new()?,
    };
    debug!("using store {}", paths.store_path.display());
    Ok(JsonStorage::new(paths))
}

fn print_welcome() {
    println!("Welcome to Snipit v{}", env!("CARGO_PKG_VERSION"));
    println!("{}", "Stop re-typing; start snipping.".yellow());
    println!("Type \"snipit --help\" for more information");
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn cmd_save(
    storage: &JsonStorage,
    title: String,
    code: Option<String>,
    file: Option<PathBuf>,
    tag: Option<String>,
    json: bool,
) -> Result<()> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err(SnipitError::InvalidInput("Title cannot be empty".to_string()));
    }
    let code = read_code(code, file, std::io::stdin().is_terminal(), || {
        editor::capture(&editor::default_editor(), "")
    })?;
    let tags = tag.as_deref().map(parse_tags).unwrap_or_default();

    if let Some(existing) = storage.get_by_title(&title)? {
        eprintln!(
            "{}",
            format!(
                "⚠ A snippet titled \"{}\" already exists (#{}); saving anyway.",
                existing.title, existing.id
            )
            .yellow()
        );
    }

    let snippet = storage.add(NewSnippet { title, code, tags })?;

    if json {
        return print_json(&snippet);
    }
    println!("{}", format!("✔ Saved \"{}\" as #{}", snippet.title, snippet.id).green());
    if !snippet.tags.is_empty() {
        println!("{}", format!("  Tags: {}", snippet.tags.join(", ")).dimmed());
    }
    Ok(())
}

fn cmd_get(storage: &JsonStorage, title: &str, copy: bool, json: bool) -> Result<()> {
    let snippet = storage.get_by_title(title)?.ok_or_else(|| {
        SnipitError::NotFound(format!(
            "No snippet found with title \"{}\". Run `snipit list` to see all saved snippets.",
            title
        ))
    })?;

    if copy {
        write_text_to_clipboard(&snippet.code)?;
    }

    if json {
        return print_json(&snippet);
    }

    println!();
    println!("{}", format!("  # {}", snippet.title).dimmed());
    println!();
    println!("{}", snippet.code);
    println!();
    if copy {
        println!("{}", "  ✔ Copied to clipboard".green());
        println!();
    }
    Ok(())
}

fn cmd_list(storage: &JsonStorage, filter: SnippetFilter, json: bool) -> Result<()> {
    let snippets = storage.list(&filter)?;

    if json {
        return print_json(&snippets);
    }

    if snippets.is_empty() {
        let hint = match (&filter.tag, filter.is_empty()) {
            (Some(tag), _) => format!("No snippets found with tag \"{}\"", tag),
            (None, false) => "No snippets match your search".to_string(),
            (None, true) => "No snippets saved yet. Use `snipit save` to add one.".to_string(),
        };
        println!("{}", format!("  {}", hint).yellow());
        return Ok(());
    }

    println!();
    println!("{}", format!("  {} snippet(s)", snippets.len()).bold());
    println!();
    for snippet in &snippets {
        print_snippet_row(snippet);
    }
    println!();
    Ok(())
}

fn cmd_delete(storage: &JsonStorage, raw_id: &str, json: bool) -> Result<()> {
    let id = delete_snippet(storage, raw_id)?;
    let message = format!("Deleted snippet #{}", id);
    if json {
        return print_json(&StatusResponse {
            success: true,
            message,
            count: Some(1),
            path: None,
        });
    }
    println!("{}", format!("✔ {}", message).green());
    Ok(())
}

fn cmd_import(storage: &JsonStorage, file: &Path, json: bool) -> Result<()> {
    let report = import_file(storage, file)?;

    if json {
        return print_json(&report);
    }

    if report == Default::default() {
        println!("{}", "⚠ No snippets found in the provided file.".yellow());
        return Ok(());
    }

    println!("{}", "\n✔ Import successful!".green());
    println!("{} Added: {}", "→".cyan(), report.added);
    if report.skipped > 0 {
        println!("{} Skipped (Duplicates): {}", "→".cyan(), report.skipped);
    }
    if report.renamed > 0 {
        println!("{} Renamed (Conflicts): {}", "→".cyan(), report.renamed);
    }
    Ok(())
}

fn cmd_export(storage: &JsonStorage, output: &Path, json: bool) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|e| SnipitError::io(".", e))?;

    match export_to(storage, output, &cwd)? {
        ExportOutcome::Empty => {
            let message = "You don't have any snippets to export yet!".to_string();
            if json {
                return print_json(&StatusResponse {
                    success: true,
                    message,
                    count: Some(0),
                    path: None,
                });
            }
            println!("{}", format!("\n⚠ {}", message).yellow());
        }
        ExportOutcome::Written { path, count } => {
            if json {
                return print_json(&StatusResponse {
                    success: true,
                    message: format!("Exported {} snippet(s)", count),
                    count: Some(count),
                    path: Some(path),
                });
            }
            println!(
                "{}",
                format!("\n✔ Successfully exported {} snippets to:", count.to_string().bold()).green()
            );
            println!("{}", path.display().to_string().cyan());
        }
    }
    Ok(())
}

fn print_snippet_row(snippet: &Snippet) {
    let id = format!("#{:<3}", snippet.id).dimmed();
    let title = snippet.title.cyan();
    let tags = if snippet.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", snippet.tags.join(", ")).green().to_string()
    };
    let date = format!(" · {}", snippet.created_at).dimmed();
    println!("  {} {}{}{}", id, title, tags, date);
}
