use std::path::Path;

use clap::Parser;
use tracing::instrument;
use tracker::{Level, QuestionStore, Stats, User, compute_stats};

use super::terminal::{Paint, Tone, is_narrow};

#[derive(Debug, Parser)]
#[command(about = "Show progress per person, per level and per topic")]
pub struct Summary {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Number of topics to show
    #[arg(long, value_name = "N", default_value_t = 5)]
    top: usize,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Summary {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: &Path) -> anyhow::Result<()> {
        let config = super::load_config(root);
        let store = super::open_store(root, &config)?;
        let stats = compute_stats(&store.snapshot());

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
            OutputFormat::Table if self.quiet => println!("{}", quiet_line(&stats)),
            OutputFormat::Table => {
                if stats.total == 0 {
                    println!("No questions yet. Add one with 'track add'.");
                } else {
                    self.output_table(&stats);
                }
            }
        }

        Ok(())
    }

    fn output_table(&self, stats: &Stats) {
        println!("Total questions: {}", stats.total);
        println!();

        println!("Progress");
        println!("{}", "────────".paint(Tone::Muted));
        for user in User::ALL {
            let completed = stats.completed(user);
            let line = format!(
                "{:<8} {completed:>4} done  {:>4} left  {:>3}%",
                user.as_str(),
                stats.remaining(user),
                percent(completed, stats.total)
            );
            if completed == stats.total {
                println!("{}", line.paint(Tone::Done));
            } else {
                println!("{line}");
            }
        }
        println!();

        println!("Levels");
        println!("{}", "──────".paint(Tone::Muted));
        if is_narrow() {
            let levels: Vec<String> = Level::ALL
                .into_iter()
                .map(|level| format!("{level} {}", stats.count(level)))
                .collect();
            println!("{}", levels.join(", "));
        } else {
            for level in Level::ALL {
                let name = format!("{:<8}", level.as_str());
                println!("{} {:>4}", name.paint(Tone::from(level)), stats.count(level));
            }
        }

        let topics = stats.top_topics(self.top);
        if topics.is_empty() {
            return;
        }
        println!();
        println!("Top topics");
        println!("{}", "──────────".paint(Tone::Muted));
        let width = topics
            .iter()
            .map(|(topic, _)| topic.chars().count())
            .max()
            .unwrap_or(0);
        for (topic, count) in &topics {
            println!("{topic:<width$} {count:>4}");
        }
        if stats.topics.len() > topics.len() {
            let more = format!("... and {} more topics", stats.topics.len() - topics.len());
            println!("{}", more.paint(Tone::Muted));
        }
    }
}

fn quiet_line(stats: &Stats) -> String {
    format!(
        "total={} puneet={} komal={} easy={} medium={} hard={} topics={}",
        stats.total,
        stats.completed(User::Puneet),
        stats.completed(User::Komal),
        stats.easy,
        stats.medium,
        stats.hard,
        stats.topics.len()
    )
}

/// Whole-number percentage, rounded down. An empty collection is 0%.
fn percent(part: usize, total: usize) -> usize {
    (part * 100).checked_div(total).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, 0, 0; "empty")]
    #[test_case(1, 3, 33; "rounds down")]
    #[test_case(4, 4, 100; "complete")]
    fn percentages(part: usize, total: usize, expected: usize) {
        assert_eq!(percent(part, total), expected);
    }

    #[test]
    fn quiet_line_lists_every_count() {
        let stats = Stats {
            total: 3,
            completed_by_puneet: 2,
            completed_by_komal: 1,
            easy: 1,
            medium: 1,
            hard: 1,
            topics: [("Arrays".to_string(), 3)].into(),
        };

        assert_eq!(
            quiet_line(&stats),
            "total=3 puneet=2 komal=1 easy=1 medium=1 hard=1 topics=1"
        );
    }
}
