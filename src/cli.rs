// AppDeck CLI binary

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use appdeck_lib::commands::{Dashboard, EditMode, Intent, Notice};
use appdeck_lib::config::Config;
use appdeck_lib::db::schema::AppRecord;
use appdeck_lib::reconcile::SyncReport;
use appdeck_lib::sources::capability::{DirectoryHandle, NativeDirectory, NativeFile};

#[derive(Parser)]
#[command(name = "appdeck")]
#[command(about = "AppDeck - A launcher for standalone HTML mini-apps", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory (database and opened copies)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Manifest location, URL or path to apps.json
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull apps from the manifest, then rescan the remembered folder
    Sync,

    /// List apps in grid order
    List {
        /// Only apps whose name or filename contains this text
        #[arg(short, long)]
        query: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Import a single HTML file
    Import {
        path: PathBuf,
    },

    /// Scan a folder for HTML apps and remember it
    Scan {
        /// Folder to scan (defaults to the remembered folder)
        dir: Option<PathBuf>,
    },

    /// Open an app by id, id prefix or filename
    Open {
        app: String,
    },

    /// Delete an app
    Delete {
        app: String,
    },

    /// Move an app into another app's position
    Move {
        from: String,
        to: String,
    },

    /// Re-read a folder app from its file
    Reload {
        app: String,
    },

    /// Remove every app and setting, then pull the manifest again
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Interactive dashboard
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::resolve(cli.data_dir, cli.manifest)?;
    log::debug!("Data dir {}, manifest {}", config.data_dir.display(), config.manifest);
    let mut dashboard = Dashboard::open(config)?;

    match cli.command {
        Commands::Sync => cmd_sync(&mut dashboard),
        Commands::List { query, json } => cmd_list(&mut dashboard, query, json),
        Commands::Import { path } => cmd_import(&mut dashboard, &path),
        Commands::Scan { dir } => cmd_scan(&mut dashboard, dir),
        Commands::Open { app } => cmd_open(&dashboard, &app),
        Commands::Delete { app } => cmd_delete(&mut dashboard, &app),
        Commands::Move { from, to } => cmd_move(&mut dashboard, &from, &to),
        Commands::Reload { app } => cmd_reload(&mut dashboard, &app),
        Commands::Reset { yes } => cmd_reset(&mut dashboard, yes),
        Commands::Shell => cmd_shell(&mut dashboard),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn cmd_sync(dashboard: &mut Dashboard) -> Result<()> {
    println!("Syncing from {}", dashboard.config().manifest);
    let report = dashboard.sync_from_manifest()?;
    print_report("Manifest", &report);

    if let Some(report) = dashboard.auto_scan_if_permitted()? {
        print_report("Folder", &report);
    }

    println!();
    println!("{} apps in the deck", dashboard.view().apps.len());
    Ok(())
}

fn cmd_list(dashboard: &mut Dashboard, query: Option<String>, json: bool) -> Result<()> {
    let total = dashboard.view().apps.len();
    let shown = dashboard.set_query(query.as_deref().unwrap_or(""));

    if json {
        let apps = dashboard.view().visible_apps();
        println!("{}", serde_json::to_string_pretty(&apps)?);
        return Ok(());
    }

    if total == 0 {
        println!("No apps yet. Use 'appdeck sync', 'appdeck scan <dir>' or 'appdeck import <file>'.");
        return Ok(());
    }

    print_table(dashboard);

    if shown < total {
        println!();
        println!("Showing {} of {} apps.", shown, total);
    }
    Ok(())
}

fn cmd_import(dashboard: &mut Dashboard, path: &Path) -> Result<()> {
    let report = dashboard.import_file(&NativeFile::new(path))?;
    if report.skipped > 0 {
        anyhow::bail!("Could not read {}", path.display());
    }
    print_report("Import", &report);
    Ok(())
}

fn cmd_scan(dashboard: &mut Dashboard, dir: Option<PathBuf>) -> Result<()> {
    match dir {
        Some(dir) => {
            let dir = dir.canonicalize()
                .map_err(|_| anyhow::anyhow!("Folder does not exist: {}", dir.display()))?;
            println!("Scanning {}", dir.display());
            let report = dashboard.scan_folder(&NativeDirectory::new(&dir).handle_ref())?;
            print_report("Folder", &report);
        }
        None => match dashboard.auto_scan_if_permitted()? {
            Some(report) => print_report("Folder", &report),
            None => println!("No remembered folder to rescan. Use 'appdeck scan <dir>' first."),
        },
    }
    Ok(())
}

fn cmd_open(dashboard: &Dashboard, key: &str) -> Result<()> {
    let id = resolve_app(dashboard, key)?;
    let target = dashboard.open_app(&id)?;
    println!("Opened {}", target);
    Ok(())
}

fn cmd_delete(dashboard: &mut Dashboard, key: &str) -> Result<()> {
    let app = find_app(dashboard, key)?;
    let (id, name) = (app.id.clone(), app.name.clone());
    dashboard.delete_app(&id)?;
    println!("Deleted '{}' ({})", name, id);
    Ok(())
}

fn cmd_move(dashboard: &mut Dashboard, from: &str, to: &str) -> Result<()> {
    let from_id = resolve_app(dashboard, from)?;
    let to_id = resolve_app(dashboard, to)?;
    if dashboard.reorder(&from_id, &to_id)? {
        print_table(dashboard);
    } else {
        println!("Nothing to move.");
    }
    Ok(())
}

fn cmd_reload(dashboard: &mut Dashboard, key: &str) -> Result<()> {
    let id = resolve_app(dashboard, key)?;
    let report = dashboard.reload_app(&id)?;
    print_report("Reload", &report);
    Ok(())
}

fn cmd_reset(dashboard: &mut Dashboard, yes: bool) -> Result<()> {
    if !yes && !confirm("Remove every app and the remembered folder?")? {
        println!("Reset cancelled.");
        return Ok(());
    }

    let report = dashboard.reset_all()?;
    println!("Deck cleared.");
    print_report("Manifest", &report);
    Ok(())
}

fn cmd_shell(dashboard: &mut Dashboard) -> Result<()> {
    let report = dashboard.sync_from_manifest()?;
    log::info!("Startup sync: {} added, {} updated", report.added, report.updated);
    if let Err(e) = dashboard.auto_scan_if_permitted() {
        log::warn!("Startup rescan failed: {}", e);
    }

    println!("AppDeck shell. Type 'help' for commands.");
    print_table(dashboard);

    let stdin = io::stdin();
    loop {
        let prompt = match dashboard.view().mode {
            EditMode::Browsing => "deck> ",
            EditMode::Editing => "deck (edit)> ",
        };
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command,
            None => continue,
        };
        let args: Vec<&str> = words.collect();

        let intent = match (command, args.as_slice()) {
            ("quit" | "exit" | "q", _) => break,
            ("help" | "?", _) => {
                print_shell_help();
                continue;
            }
            ("ls", _) => {
                print_table(dashboard);
                continue;
            }
            ("find", words) => Intent::SetQuery(words.join(" ")),
            ("edit", []) => Intent::ToggleEditMode,
            ("edit", ["on"]) => Intent::SetEditMode(true),
            ("edit", ["off"]) => Intent::SetEditMode(false),
            ("open", [key]) => match resolve_app(dashboard, key) {
                Ok(id) => Intent::Open(id),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            ("rm", [key]) => match resolve_app(dashboard, key) {
                Ok(id) => Intent::Delete(id),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            ("mv", [from, to]) => match (resolve_app(dashboard, from), resolve_app(dashboard, to)) {
                (Ok(from), Ok(to)) => Intent::Reorder { from, to },
                (Err(e), _) | (_, Err(e)) => {
                    println!("{}", e);
                    continue;
                }
            },
            ("reload", [key]) => match resolve_app(dashboard, key) {
                Ok(id) => Intent::Reload(id),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            ("import", [path]) => Intent::Import(Box::new(NativeFile::new(path))),
            ("scan", []) => Intent::Scan(None),
            ("scan", [dir]) => Intent::Scan(Some(NativeDirectory::new(dir).handle_ref())),
            ("sync", []) => Intent::Sync,
            ("reset", []) => {
                if !confirm("Remove every app and the remembered folder?")? {
                    continue;
                }
                Intent::Reset
            }
            _ => {
                println!("Unknown command '{}'. Type 'help' for commands.", line.trim());
                continue;
            }
        };

        let notice = dashboard.dispatch(intent);
        println!("{}", notice);
        if redraws_grid(&notice) {
            print_table(dashboard);
        }
    }

    Ok(())
}

fn redraws_grid(notice: &Notice) -> bool {
    matches!(
        notice,
        Notice::QueryChanged { .. }
            | Notice::ModeChanged(_)
            | Notice::Deleted(_)
            | Notice::Moved { .. }
            | Notice::Synced(_)
            | Notice::Reset(_)
    )
}

fn print_shell_help() {
    println!("  ls                 show the grid");
    println!("  find <text>        filter by name or filename (empty clears)");
    println!("  edit [on|off]      toggle edit mode");
    println!("  open <app>         open an app (browsing only)");
    println!("  rm <app>           delete an app (editing only)");
    println!("  mv <app> <target>  move an app into the target's position (editing only)");
    println!("  import <file>      import one HTML file");
    println!("  scan [dir]         scan a folder, or rescan the remembered one");
    println!("  reload <app>       re-read a folder app from disk");
    println!("  sync               pull the manifest again");
    println!("  reset              clear everything and pull the manifest");
    println!("  quit               leave the shell");
}

// Helper functions

fn print_table(dashboard: &Dashboard) {
    let cards = dashboard.cards();
    let view = dashboard.view();

    if !view.query.trim().is_empty() {
        println!("Filter: \"{}\"", view.query.trim());
    }
    if cards.is_empty() {
        println!("No apps to show.");
        return;
    }

    println!("{:>3}  {:<12}  {:<7}  {:<24}  {}", "#", "ID", "Source", "Name", "File");
    println!("{}", "-".repeat(70));

    for (idx, card) in cards.iter().enumerate() {
        let name = if card.name.chars().count() > 24 {
            format!("{}...", card.name.chars().take(21).collect::<String>())
        } else {
            card.name.clone()
        };
        let marker = if card.editable { "*" } else { " " };

        println!("{:>3}{} {:<12}  {:<7}  {:<24}  {}",
            idx + 1,
            marker,
            short_id(&card.id),
            card.badge,
            name,
            card.filename
        );
    }
}

fn print_report(label: &str, report: &SyncReport) {
    println!("{}: {} added, {} updated, {} skipped ({} total)",
        label, report.added, report.updated, report.skipped, report.total);
}

fn short_id(id: &str) -> &str {
    let end = id.char_indices().nth(12).map(|(i, _)| i).unwrap_or(id.len());
    &id[..end]
}

/// Match an app by exact id, exact filename, or a unique id prefix.
fn find_app<'a>(dashboard: &'a Dashboard, key: &str) -> Result<&'a AppRecord> {
    let apps = &dashboard.view().apps;

    if let Some(app) = apps.iter().find(|a| a.id == key || a.filename == key) {
        return Ok(app);
    }

    let matches: Vec<&AppRecord> = apps.iter().filter(|a| a.id.starts_with(key)).collect();
    match matches.as_slice() {
        [app] => Ok(*app),
        [] => anyhow::bail!("No app matches '{}'", key),
        _ => anyhow::bail!("'{}' matches {} apps, use a longer id", key, matches.len()),
    }
}

fn resolve_app(dashboard: &Dashboard, key: &str) -> Result<String> {
    find_app(dashboard, key).map(|app| app.id.clone())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
