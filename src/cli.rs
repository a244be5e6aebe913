// src/cli.rs
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};

use crate::config::options::AppOptions;
use crate::core::HttpSource;
use crate::csv::read_export;
use crate::file::FileDelivery;
use crate::model::RatedStatus;
use crate::pipeline::{PipelineConfig, Step};
use crate::progress::Progress;
use crate::runner::{RunSummary, Runner};
use crate::stats::{self, OpponentOrder};
use crate::store::FileStore;

#[derive(Parser)]
#[command(name = "fab_history")]
#[command(about = "Flesh and Blood GEM match history → CSV", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON options file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output directory or file
    #[arg(short, long, global = true)]
    pub out: Option<String>,

    /// Session store file (default .store/session.json)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Pause before each page (ms)
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Stop after this many pages
    #[arg(long, global = true)]
    pub max_pages: Option<usize>,

    /// Rated status for events without a marker (yes/no/unknown)
    #[arg(long, global = true)]
    pub rated_default: Option<RatedStatus>,

    /// Leave out the `#` player block
    #[arg(long, global = true)]
    pub no_meta: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape the whole history, starting from the player profile
    Run {
        /// Profile page (default from options)
        profile_url: Option<String>,
    },
    /// Process one history page and print the next URL
    Step {
        /// History page to process
        url: Option<String>,

        /// Begin a new run from this profile page instead
        #[arg(long, value_name = "PROFILE_URL")]
        start: Option<String>,
    },
    /// Continue a stored run at the given history page
    Resume {
        url: String,
    },
    /// Show the stored run
    Status,
    /// Forget the stored run
    Reset,
    /// Summarize an exported CSV
    Stats {
        csv: PathBuf,

        /// Opponent list order (name/winrate/matches)
        #[arg(long, default_value = "name")]
        sort: OpponentOrder,

        #[arg(long)]
        desc: bool,
    },
}

/// Prints per-page progress on stderr.
#[derive(Default)]
struct CliProgress {
    last_url: Option<String>,
}

impl CliProgress {
    /// On failure, tell the user where to pick the run up again.
    fn hint_on_error<T>(&self, res: crate::error::Result<T>) -> crate::error::Result<T> {
        if res.is_err() {
            if let Some(url) = &self.last_url {
                eprintln!("Run interrupted; continue with: fab_history resume \"{}\"", url);
            }
        }
        res
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, start_url: &str) {
        eprintln!("Starting at {}", start_url);
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{}", msg);
    }
    fn navigating(&mut self, url: &str) {
        self.last_url = Some(s!(url));
    }
    fn page_done(&mut self, page_index: usize, events_found: usize, events_total: usize) {
        eprintln!("  page {:>3}: {:>3} events ({} total)", page_index, events_found, events_total);
    }
}

impl Cli {
    fn options(&self) -> Result<AppOptions> {
        let mut opts = match &self.config {
            Some(path) => AppOptions::load(path)?,
            None => AppOptions::default(),
        };
        if let Some(o) = &self.out { opts.export.set_path(o); }
        if let Some(d) = self.delay_ms { opts.scrape.delay_ms = d; }
        if let Some(m) = self.max_pages { opts.scrape.max_pages = m; }
        if let Some(r) = self.rated_default { opts.scrape.rated_default = r; }
        if self.no_meta { opts.export.include_meta = false; }
        Ok(opts)
    }

    fn open_store(&self) -> Result<FileStore> {
        let store = match &self.store {
            Some(p) => FileStore::open(p.clone())?,
            None => FileStore::open_default()?,
        };
        Ok(store)
    }
}

fn report(summary: &RunSummary) {
    if let Some(path) = &summary.output {
        println!(
            "Exported {} events / {} matches from {} pages → {}",
            summary.events, summary.matches, summary.pages, path.display()
        );
    }
    if let Some(next) = &summary.next_url {
        println!("Next: {}", next);
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let opts = cli.options()?;

    if let Commands::Stats { csv, sort, desc } = &cli.command {
        let text = fs::read_to_string(csv).wrap_err_with(|| format!("reading {}", csv.display()))?;
        let history = read_export(&text);
        if let Some(meta) = &history.meta {
            println!("{} (GEM ID {}, Elo {})\n", meta.name, meta.gem_id, meta.elo_rating);
        }
        print!("{}", stats::compute(&history.rows).render(*sort, *desc));
        return Ok(());
    }

    let mut runner = Runner::new(
        HttpSource::new()?,
        cli.open_store()?,
        FileDelivery::new(opts.export.out_dir.clone()),
        PipelineConfig::from_options(&opts),
    );
    let history_url = opts.scrape.history_url();

    match &cli.command {
        Commands::Run { profile_url } => {
            let profile = profile_url.clone().unwrap_or_else(|| opts.scrape.profile_url());
            let mut prog = CliProgress::default();
            let res = runner.run(&profile, &history_url, Some(&mut prog));
            let summary = prog.hint_on_error(res)?;
            report(&summary);
        }
        Commands::Step { url, start } => match (start, url) {
            (Some(profile), _) => {
                if let Step::Navigate { url, .. } = runner.start(profile, &history_url)? {
                    println!("Next: {}", url);
                }
            }
            (None, Some(url)) => report(&runner.step(url)?),
            (None, None) => bail!("step needs a history URL or --start <PROFILE_URL>"),
        },
        Commands::Resume { url } => {
            let mut prog = CliProgress::default();
            let res = runner.resume(url, Some(&mut prog));
            let summary = prog.hint_on_error(res)?;
            report(&summary);
        }
        Commands::Status => {
            let st = runner.status();
            if st.in_progress {
                println!("Run in progress: {} events, {} matches stored", st.events.len(), st.match_count());
                if let Some(m) = st.meta {
                    println!("Player: {} (GEM ID {})", m.name, m.gem_id);
                }
            } else {
                println!("No run in progress");
            }
            println!("Store: {}", runner.store().path().display());
        }
        Commands::Reset => {
            runner.reset()?;
            println!("Stored run cleared");
        }
        Commands::Stats { .. } => {}
    }
    Ok(())
}
