use std::path::{Path, PathBuf};

mod list;
mod stats;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use list::List;
use stats::Summary;
use terminal::{Paint, Tone};
use tracing::instrument;
use tracker::{
    Config, FileStore, Level, NewQuestion, PlatformLink, Question, QuestionStore,
    QuestionUpdate, Topic, User, compute_topic_vocabulary,
};

/// Directory under the root that holds the tracker configuration.
const TRACKER_DIR: &str = ".tracker";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The directory holding the tracker data
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(&self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// List questions (default)
    List(List),

    /// Initialize a new tracker
    Init,

    /// Add a question
    Add(Add),

    /// Change the link, level or topic of a question
    Edit(Edit),

    /// Delete a question
    Delete(Delete),

    /// Flip a person's completion mark on a question
    Toggle(Toggle),

    /// Show progress statistics
    Stats(Summary),

    /// List every topic in use
    Topics,
}

impl Command {
    fn run(self, root: &Path) -> anyhow::Result<()> {
        match self {
            Self::List(command) => command.run(root)?,
            Self::Init => init(root)?,
            Self::Add(command) => command.run(root)?,
            Self::Edit(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Toggle(command) => command.run(root)?,
            Self::Stats(command) => command.run(root)?,
            Self::Topics => topics(root)?,
        }
        Ok(())
    }
}

fn config_path(root: &Path) -> PathBuf {
    root.join(TRACKER_DIR).join("config.toml")
}

fn load_config(root: &Path) -> Config {
    Config::load(&config_path(root)).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn open_store(root: &Path, config: &Config) -> anyhow::Result<FileStore> {
    let path = root.join(config.data_file());
    FileStore::open(&path).with_context(|| format!("failed to open {}", path.display()))
}

/// Resolves a full id or unique id prefix to a stored question.
fn find_question(store: &FileStore, id: &str) -> anyhow::Result<Question> {
    let id = store.resolve(id)?;
    store
        .find(id)
        .with_context(|| format!("question {id} not found"))
}

fn describe(question: &Question) -> String {
    format!(
        "{} [{}] {}",
        question.topic(),
        question.level(),
        question.platform_link()
    )
}

#[instrument]
fn init(root: &Path) -> anyhow::Result<()> {
    let tracker_dir = root.join(TRACKER_DIR);
    let config_path = config_path(root);
    if config_path.exists() {
        anyhow::bail!("Tracker already initialized (found existing {TRACKER_DIR}/config.toml)");
    }

    std::fs::create_dir_all(&tracker_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create {TRACKER_DIR} directory: {e}"))?;

    let config = Config::default();
    config
        .save(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

    let store = FileStore::init(root.join(config.data_file()))
        .context("failed to create the question file")?;

    println!("Initialized practice tracker in {}", root.display());
    println!("  Created: {TRACKER_DIR}/config.toml");
    println!("  Data:    {}", store.path().display());
    println!();
    println!("Next steps:");
    println!("  track add https://leetcode.com/problems/two-sum/ --level easy --topic Arrays");

    Ok(())
}

#[derive(Debug, clap::Parser)]
pub struct Add {
    /// Absolute URL of the problem.
    link: PlatformLink,

    /// Difficulty level (easy, medium, hard).
    #[arg(long, short)]
    level: Level,

    /// Topic label, such as 'Arrays' or 'Dynamic Programming'.
    #[arg(long, short)]
    topic: Topic,
}

impl Add {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let mut store = open_store(root, &config)?;

        let question = store.create(NewQuestion::new(self.link, self.level, self.topic))?;

        println!("{} {}", "Added".paint(Tone::Done), describe(&question));
        println!("  id: {}", question.id());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Edit {
    /// The id of the question, or a unique prefix of it.
    id: String,

    /// New absolute URL of the problem.
    #[arg(long)]
    link: Option<PlatformLink>,

    /// New difficulty level.
    #[arg(long, short)]
    level: Option<Level>,

    /// New topic label.
    #[arg(long, short)]
    topic: Option<Topic>,
}

impl Edit {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let update = QuestionUpdate {
            platform_link: self.link,
            level: self.level,
            topic: self.topic,
            ..QuestionUpdate::default()
        };
        if update.is_empty() {
            anyhow::bail!("Nothing to change: pass at least one of --link, --level or --topic");
        }

        let config = load_config(root);
        let mut store = open_store(root, &config)?;
        let question = find_question(&store, &self.id)?;

        let updated = store.update(question.id(), update)?;
        println!("{} {}", "Updated".paint(Tone::Done), describe(&updated));
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The id of the question, or a unique prefix of it.
    id: String,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let mut store = open_store(root, &config)?;
        let question = find_question(&store, &self.id)?;

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete {}?", describe(&question)))
                .default(false)
                .interact()
                .context("failed to read confirmation")?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        let removed = store.delete(question.id())?;
        println!("{} {}", "Deleted".paint(Tone::Caution), describe(&removed));
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Toggle {
    /// The id of the question, or a unique prefix of it.
    id: String,

    /// Whose completion mark to flip (puneet, komal).
    user: User,
}

impl Toggle {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = load_config(root);
        let mut store = open_store(root, &config)?;
        let question = find_question(&store, &self.id)?;

        let toggled = store.toggle_completion(question.id(), self.user)?;
        if toggled.is_completed_by(self.user) {
            println!(
                "{} {}",
                format!("Completed by {}:", self.user).paint(Tone::Done),
                describe(&toggled)
            );
        } else {
            println!(
                "{} {}",
                format!("Not completed by {}:", self.user).paint(Tone::Muted),
                describe(&toggled)
            );
        }
        Ok(())
    }
}

#[instrument]
fn topics(root: &Path) -> anyhow::Result<()> {
    let config = load_config(root);
    let store = open_store(root, &config)?;
    let snapshot = store.snapshot();

    for topic in compute_topic_vocabulary(&snapshot) {
        println!("{topic}");
    }
    Ok(())
}
