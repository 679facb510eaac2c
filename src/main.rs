//! Markline - print the outline of a markdown post.
//!
//! # Usage
//!
//! ```bash
//! markline README.md
//! markline --json README.md
//! markline --post 7 posts.json
//! markline --watch draft.md
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use markline::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};
use markline::outline::{Outline, extract_outline_with};
use markline::post::{ContentSource, JsonFileSource};
use markline::view::EngineOptions;
use markline::watcher::SourceWatcher;

const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);
const WATCH_POLL: Duration = Duration::from_millis(250);

/// Print the heading outline and anchor ids of a markdown post
#[derive(Parser, Debug)]
#[command(name = "markline", version, about, long_about = None)]
struct Cli {
    /// Markdown file, or a JSON post list with --post
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the outline as JSON
    #[arg(long)]
    json: bool,

    /// Re-print the outline whenever FILE changes
    #[arg(short, long)]
    watch: bool,

    /// Outline the post with this id from a JSON post list
    #[arg(long, value_name = "ID")]
    post: Option<u64>,

    /// Keep repeated heading ids instead of suffixing them
    #[arg(long)]
    keep_duplicate_ids: bool,

    /// Jump to headings without smooth scrolling
    #[arg(long)]
    instant_scroll: bool,

    /// Distance in pixels from the viewport top to the reading focus line
    #[arg(long, value_name = "PX")]
    trigger_offset: Option<f64>,

    /// Log span timings for outline extraction
    #[arg(long)]
    perf: bool,

    /// Write debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn init_logging(flags: &ConfigFlags) -> Result<()> {
    let mut filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if flags.perf || flags.debug_log.is_some() {
        filter = filter.add_directive("markline=debug".parse()?);
    }
    let span_events = if flags.perf {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events);

    if let Some(path) = &flags.debug_log {
        let file = File::create(path)
            .with_context(|| format!("Failed to create debug log {}", path.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn load_outline(file: &Path, post: Option<u64>, options: &EngineOptions) -> Result<Outline> {
    if let Some(id) = post {
        let post = JsonFileSource::new(file).fetch_post(id)?;
        return Ok(post.outline(options.id_policy));
    }
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(extract_outline_with(&raw, options.id_policy))
}

fn print_outline(outline: &Outline, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outline)?);
    } else {
        print!("{outline}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);
    init_logging(&effective)?;

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let options = effective.engine_options();
    tracing::debug!(?options, file = %cli.file.display(), "starting");
    let outline = load_outline(&cli.file, cli.post, &options)?;
    print_outline(&outline, effective.json)?;

    if !effective.watch {
        return Ok(());
    }

    let mut watcher = SourceWatcher::new(&cli.file, WATCH_DEBOUNCE)
        .with_context(|| format!("Failed to watch {}", cli.file.display()))?;
    loop {
        std::thread::sleep(WATCH_POLL);
        if !watcher.poll_changed() {
            continue;
        }
        match load_outline(watcher.path(), cli.post, &options) {
            Ok(outline) => {
                println!();
                print_outline(&outline, effective.json)?;
            }
            Err(err) => tracing::warn!("reload failed: {err:#}"),
        }
    }
}
