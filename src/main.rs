use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};

use focusflow_core::color::next_area_color;
use focusflow_core::ids::TaskId;
use focusflow_core::model::Priority;
use focusflow_core::remote::{CrudRemote, SearchRemote, SearchScope};
use focusflow_engine::search::{SearchEngine, SearchPhase};
use focusflow_engine::session::{NoteSession, TaskSession};
use focusflow_engine::sort::{area_notes, area_tasks, group_tasks_for_overview, sort_notes};
use focusflow_engine::store::{Snapshot, WorkingSetStore};
use focusflow_remote::HttpRemote;

#[derive(Parser)]
#[command(name = "focusflow", about = "Tasks and notes, grouped into areas")]
struct Cli {
    /// API root of the remote store.
    #[arg(long, default_value = "http://127.0.0.1:5000/api/v1")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and start a session.
    Register {
        email: String,
        full_name: String,
        password: String,
    },
    /// Start a session with existing credentials.
    Login { email: String, password: String },
    /// Drop the stored session token.
    Logout,
    /// Active tasks grouped by area, completed tasks trailing.
    Overview,
    /// All notes, last edited first.
    Notes,
    /// Tasks and notes of one area.
    Area { name: String },
    /// Search tasks and notes.
    Search {
        query: String,
        /// Restrict to "task" or "note"; default searches both.
        #[arg(long)]
        scope: Option<String>,
    },
    /// Create an area; its color comes from the palette allocator.
    AddArea { name: String },
    /// Create a task.
    AddTask {
        title: String,
        #[arg(long)]
        area: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// "high", "medium" or "low".
        #[arg(long)]
        priority: Option<String>,
        /// RFC 3339 instant, e.g. 2026-08-14T09:00:00Z.
        #[arg(long)]
        due: Option<String>,
    },
    /// Create a note.
    AddNote {
        title: String,
        content: String,
        #[arg(long)]
        area: Option<String>,
    },
    /// Flip a task's completion state.
    Toggle { task_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut remote = HttpRemote::new(&cli.base_url);
    if let Some(token) = load_token()? {
        remote = remote.with_token(token);
    }
    let remote = Arc::new(remote);
    tracing::debug!(base_url = %cli.base_url, "remote configured");

    match cli.command {
        Command::Register {
            email,
            full_name,
            password,
        } => {
            let token = remote.register(&email, &full_name, &password).await?;
            store_token(&token)?;
            println!("registered {email}");
        }
        Command::Login { email, password } => {
            let token = remote.login(&email, &password).await?;
            store_token(&token)?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            remote.logout().await;
            remove_token()?;
            println!("logged out");
        }
        Command::Overview => {
            let snap = load_snapshot(&remote).await?;
            let (groups, completed) = group_tasks_for_overview(&snap.areas, &snap.tasks);
            for group in &groups {
                println!("{} [{}]", group.area.name, group.area.color);
                for task in &group.tasks {
                    print_task(task);
                }
            }
            if !completed.is_empty() {
                println!("completed ({})", completed.len());
                for task in &completed {
                    print_task(task);
                }
            }
        }
        Command::Notes => {
            let snap = load_snapshot(&remote).await?;
            for note in sort_notes(&snap.notes) {
                println!("{:>4}  {}", note.id.as_i64(), note.title);
            }
        }
        Command::Area { name } => {
            let snap = load_snapshot(&remote).await?;
            let area = snap
                .areas
                .iter()
                .find(|a| a.name == name)
                .ok_or_else(|| anyhow!("no area named {name}"))?;
            println!("{} [{}]", area.name, area.color);
            for task in area_tasks(&snap.tasks, area.id) {
                print_task(&task);
            }
            let notes = area_notes(&snap.notes, area.id);
            if notes.is_empty() {
                println!("  (no notes yet)");
            }
            for note in notes {
                println!("  note: {}", note.title);
            }
        }
        Command::Search { query, scope } => {
            let scope = match scope.as_deref() {
                None => SearchScope::All,
                Some("task") => SearchScope::Task,
                Some("note") => SearchScope::Note,
                Some(other) => bail!("unknown scope {other}; use task or note"),
            };
            run_search(Arc::clone(&remote) as Arc<dyn SearchRemote>, scope, &query).await?;
        }
        Command::AddArea { name } => {
            let store = open_store(&remote).await?;
            let snap = store.snapshot().expect("refreshed above");
            let color = next_area_color(&snap.areas);
            let area = store.create_area(&name, color).await?;
            println!("created area {} [{}]", area.name, area.color);
        }
        Command::AddTask {
            title,
            area,
            description,
            priority,
            due,
        } => {
            let store = open_store(&remote).await?;
            let snap = store.snapshot().expect("refreshed above");
            let scope = area_id_by_name(&snap, area.as_deref())?;
            let mut session = TaskSession::new();
            session.start_create(scope, &snap.areas);
            {
                let draft = session.draft_mut().expect("drafting");
                draft.fields.title = title;
                draft.fields.description = description;
                if let Some(p) = priority.as_deref() {
                    draft.fields.priority = Some(parse_priority(p)?);
                }
                if let Some(due) = due.as_deref() {
                    let due = chrono::DateTime::parse_from_rfc3339(due)
                        .context("--due must be an RFC 3339 instant")?;
                    draft.fields.due_date = Some(due.with_timezone(&chrono::Utc));
                }
            }
            session.save(&store).await?;
            println!("task created");
        }
        Command::AddNote {
            title,
            content,
            area,
        } => {
            let store = open_store(&remote).await?;
            let snap = store.snapshot().expect("refreshed above");
            let scope = area_id_by_name(&snap, area.as_deref())?;
            let mut session = NoteSession::new();
            session.start_create(scope, &snap.areas);
            {
                let draft = session.draft_mut().expect("drafting");
                draft.fields.title = title;
                draft.fields.content = content;
            }
            session.save(&store).await?;
            println!("note created");
        }
        Command::Toggle { task_id } => {
            let store = open_store(&remote).await?;
            let snap = store.snapshot().expect("refreshed above");
            let id = TaskId::from_raw(task_id);
            let task = snap
                .tasks
                .iter()
                .find(|t| t.id == id)
                .ok_or_else(|| anyhow!("no task with id {task_id}"))?;
            let toggled = store.toggle_task_completion(id, task.completed).await?;
            println!(
                "{} is now {}",
                toggled.title,
                if toggled.completed { "done" } else { "open" }
            );
        }
    }

    Ok(())
}

/// Build a store and refresh through it; an auth failure tears the session
/// down (token removed) instead of surfacing as a plain error.
async fn open_store(remote: &Arc<HttpRemote>) -> anyhow::Result<WorkingSetStore> {
    let store = WorkingSetStore::new(Arc::clone(remote) as Arc<dyn CrudRemote>);
    if let Err(err) = store.refresh().await {
        if err.is_auth() {
            remove_token()?;
            bail!("session expired; run `focusflow login` again");
        }
        return Err(err.into());
    }
    Ok(store)
}

async fn load_snapshot(remote: &Arc<HttpRemote>) -> anyhow::Result<Snapshot> {
    let store = open_store(remote).await?;
    Ok(store.snapshot().expect("refresh succeeded"))
}

/// Feed one query through the debounced engine and print the first outcome.
async fn run_search(
    remote: Arc<dyn SearchRemote>,
    scope: SearchScope,
    query: &str,
) -> anyhow::Result<()> {
    let engine = SearchEngine::new(remote, scope);
    let mut rx = engine.subscribe();
    engine.set_query(query);
    loop {
        rx.changed().await?;
        let state = rx.borrow().clone();
        match state.phase {
            SearchPhase::Loaded(results) => {
                if results.is_empty() {
                    println!("no results for \"{}\"", state.query);
                } else {
                    for result in results {
                        println!("{}", result.title());
                    }
                }
                return Ok(());
            }
            SearchPhase::Failed(detail) => bail!("search failed: {detail}"),
            SearchPhase::Idle => {
                println!("query too short");
                return Ok(());
            }
            SearchPhase::Pending => {}
        }
    }
}

fn print_task(task: &focusflow_core::model::Task) {
    let mark = if task.completed { "x" } else { " " };
    let priority = task
        .priority
        .map(|p| format!(" ({p:?})"))
        .unwrap_or_default();
    let due = task
        .due_date
        .map(|d| format!(" due {}", d.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    println!("  [{mark}] {:>4}  {}{priority}{due}", task.id.as_i64(), task.title);
}

fn parse_priority(s: &str) -> anyhow::Result<Priority> {
    match s {
        "high" => Ok(Priority::High),
        "medium" => Ok(Priority::Medium),
        "low" => Ok(Priority::Low),
        other => bail!("unknown priority {other}; use high, medium or low"),
    }
}

fn area_id_by_name(
    snap: &Snapshot,
    name: Option<&str>,
) -> anyhow::Result<Option<focusflow_core::ids::AreaId>> {
    match name {
        None => Ok(None),
        Some(name) => snap
            .areas
            .iter()
            .find(|a| a.name == name)
            .map(|a| Some(a.id))
            .ok_or_else(|| anyhow!("no area named {name}")),
    }
}

fn token_path() -> PathBuf {
    dirs_home().join(".focusflow").join("token")
}

fn load_token() -> anyhow::Result<Option<SecretString>> {
    match std::fs::read_to_string(token_path()) {
        Ok(raw) => Ok(Some(SecretString::from(raw.trim().to_string()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).context("failed to read token file"),
    }
}

fn store_token(token: &SecretString) -> anyhow::Result<()> {
    let path = token_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    std::fs::write(&path, token.expose_secret()).context("failed to write token file")?;
    Ok(())
}

fn remove_token() -> anyhow::Result<()> {
    match std::fs::remove_file(token_path()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("failed to remove token file"),
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
