use std::{fmt, path::Path};

use anyhow::Context;
use chrono::DateTime;
use clap::{Parser, ValueEnum};
use tracing::instrument;
use tracker::{
    Config, FilterCriteria, LevelFilter, Question, QuestionStore, SortCriteria,
    SortDirection, SortField, User, recompute,
};

use super::terminal::{Paint, Tone, completion_mark, is_narrow};

/// Command arguments for `track list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List questions with filters and sorting")]
pub struct List {
    /// Only questions with exactly this topic (case-sensitive).
    #[arg(long)]
    topic: Option<String>,

    /// Only questions of this level (easy, medium, hard or all).
    #[arg(long, value_name = "LEVEL")]
    level: Option<String>,

    /// Case-insensitive substring match against topic and link.
    #[arg(long, short)]
    search: Option<String>,

    /// Sort field: id, platformLink, level, topic, completedByPuneet,
    /// completedByKomal or createdAt (default from config).
    #[arg(long, value_name = "FIELD")]
    sort: Option<String>,

    /// Sort in descending order.
    #[arg(long, conflicts_with = "asc")]
    desc: bool,

    /// Sort in ascending order.
    #[arg(long)]
    asc: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and format rows for scripting.
    #[arg(long)]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Column {
    Id,
    Level,
    Topic,
    Puneet,
    Komal,
    Created,
    Link,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let store = super::open_store(root, &config)?;
        let snapshot = store.snapshot();

        let filter = self.filter();
        let sort = self.sort(&config);
        let view = recompute(&snapshot, &filter, &sort);

        if view.questions.is_empty() && self.output == OutputFormat::Table && !self.quiet {
            if snapshot.is_empty() {
                println!("No questions yet. Add one with 'track add'.");
            } else {
                println!("No questions match the current filters.");
            }
            return Ok(());
        }

        match self.output {
            OutputFormat::Table => {
                if self.quiet {
                    for question in &view.questions {
                        println!("{}", question.id());
                    }
                } else {
                    render_table(&view.questions);
                    if filter.any() {
                        let shown = format!(
                            "Showing {} of {} questions",
                            view.questions.len(),
                            view.stats.total
                        );
                        println!("{}", shown.paint(Tone::Muted));
                    }
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &view.questions)
                    .context("failed to render json output")?;
                println!();
            }
            OutputFormat::Csv => render_csv(&view.questions, self.quiet),
        }

        Ok(())
    }

    fn filter(&self) -> FilterCriteria {
        let level = self.level.as_deref().map_or(LevelFilter::All, |level| {
            let filter = LevelFilter::parse_lenient(level);
            if filter == LevelFilter::All && !level.eq_ignore_ascii_case("all") {
                tracing::warn!("Unknown level '{level}', showing every level");
            }
            filter
        });

        FilterCriteria {
            topic: self.topic.clone().unwrap_or_default(),
            level,
            search: self.search.clone().unwrap_or_default(),
        }
    }

    /// An explicit `--sort` defaults to ascending; otherwise the configured
    /// default applies. `--asc`/`--desc` override the direction either way.
    fn sort(&self, config: &Config) -> SortCriteria {
        let mut sort = self.sort.as_deref().map_or_else(
            || config.default_sort(),
            |name| {
                let field = SortField::parse(name);
                if field.is_none() {
                    tracing::warn!("Unknown sort field '{name}', leaving questions unsorted");
                }
                SortCriteria::new(field, SortDirection::Asc)
            },
        );

        if self.desc {
            sort.direction = SortDirection::Desc;
        } else if self.asc {
            sort.direction = SortDirection::Asc;
        }
        sort
    }
}

fn render_table(questions: &[&Question]) {
    let columns: &[Column] = if is_narrow() {
        &[Column::Id, Column::Level, Column::Topic, Column::Puneet, Column::Komal]
    } else {
        &[
            Column::Id,
            Column::Level,
            Column::Topic,
            Column::Puneet,
            Column::Komal,
            Column::Created,
            Column::Link,
        ]
    };

    let data: Vec<Vec<String>> = questions
        .iter()
        .map(|question| columns.iter().map(|column| column.value(question)).collect())
        .collect();

    // Determine column widths for alignment.
    let widths = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(column.header().len())
        })
        .collect::<Vec<_>>();

    for (column, width) in columns.iter().zip(&widths) {
        print!("{:<width$}  ", column.header());
    }
    println!();
    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for (question, row) in questions.iter().zip(data) {
        for ((column, value), width) in columns.iter().zip(row).zip(&widths) {
            let padded = format!("{value:<width$}");
            let cell = match column {
                Column::Level => padded.paint(Tone::from(question.level())),
                Column::Puneet if question.is_completed_by(User::Puneet) => padded.paint(Tone::Done),
                Column::Komal if question.is_completed_by(User::Komal) => padded.paint(Tone::Done),
                Column::Id | Column::Created => padded.paint(Tone::Muted),
                _ => padded,
            };
            print!("{cell}  ");
        }
        println!();
    }
}

fn render_csv(questions: &[&Question], quiet: bool) {
    const COLUMNS: [&str; 7] = [
        "id",
        "platformLink",
        "level",
        "topic",
        "completedByPuneet",
        "completedByKomal",
        "createdAt",
    ];

    if !quiet {
        println!("{}", COLUMNS.join(","));
    }

    for question in questions {
        println!("{}", csv_row(question));
    }
}

fn csv_row(question: &Question) -> String {
    [
        question.id().to_string(),
        csv_escape(question.platform_link()),
        question.level().to_string(),
        csv_escape(question.topic()),
        question.is_completed_by(User::Puneet).to_string(),
        question.is_completed_by(User::Komal).to_string(),
        question.created_at().to_string(),
    ]
    .join(",")
}

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Milliseconds since the epoch as a UTC date and time.
fn format_created(created_at: i64) -> String {
    DateTime::from_timestamp_millis(created_at).map_or_else(
        || created_at.to_string(),
        |created| created.format("%Y-%m-%d %H:%M").to_string(),
    )
}

impl Column {
    const fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Level => "Level",
            Self::Topic => "Topic",
            Self::Puneet => "Puneet",
            Self::Komal => "Komal",
            Self::Created => "Created",
            Self::Link => "Link",
        }
    }

    fn value(self, question: &Question) -> String {
        match self {
            Self::Id => short_id(question),
            Self::Level => question.level().to_string(),
            Self::Topic => question.topic().to_string(),
            Self::Puneet => completion_mark(question.is_completed_by(User::Puneet)).to_string(),
            Self::Komal => completion_mark(question.is_completed_by(User::Komal)).to_string(),
            Self::Created => format_created(question.created_at()),
            Self::Link => question.platform_link().to_string(),
        }
    }
}

/// The first block of the id, which is almost always a unique prefix.
fn short_id(question: &Question) -> String {
    question.id().to_string().chars().take(8).collect()
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}
