use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use time::PrimitiveDateTime;

use crate::domain::dates::parse_date_text;
use crate::pipeline::DateRange;

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::BrightCyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightGreen.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::BrightMagenta.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "tripboard")]
#[command(bin_name = "tripboard")]
#[command(version)]
#[command(about = "Track trip verification status on a weekday board")]
#[command(styles = cli_styles())]
pub struct Cli {
    #[arg(
        short = 'd',
        long,
        env = "TRIPBOARD_DB_PATH",
        default_value = ".tripboard/state.sqlite",
        help = "Path to the SQLite file holding trip overrides."
    )]
    pub db: String,

    #[arg(
        short = 'f',
        long,
        env = "TRIPBOARD_CSV",
        help = "Trip CSV file to load (header row required)."
    )]
    pub csv: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        env = "TRIPBOARD_CONFIG",
        help = "Board config TOML that overrides the built-in layout."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn styled_command() -> clap::Command {
    Cli::command()
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Render grid, list, and metrics for the working set.")]
    Board(ViewArgs),
    #[command(about = "Render the status x weekday grid.")]
    Grid(ViewArgs),
    #[command(about = "Render the flat trip list.")]
    List(ViewArgs),
    #[command(about = "Show totals and the status distribution.")]
    Metrics(ViewArgs),
    #[command(about = "Show one trip tile with details.")]
    Show(ShowArgs),
    #[command(about = "Print the stored override for a trip.")]
    State(StateArgs),
    #[command(about = "Move a trip to another status (drag and drop).")]
    Move(MoveArgs),
    #[command(about = "Set the assignee name for a trip.")]
    Assign(AssignArgs),
    #[command(about = "Print shell completions.")]
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    #[arg(
        short = 's',
        long,
        value_parser = parse_bound,
        help = "Range start (e.g. 2026-10-19). Defaults to now."
    )]
    pub start: Option<PrimitiveDateTime>,

    #[arg(
        short = 'e',
        long,
        value_parser = parse_bound,
        help = "Range end, inclusive. Defaults to now + 7 days."
    )]
    pub end: Option<PrimitiveDateTime>,

    #[arg(
        short = 'a',
        long,
        conflicts_with_all = ["start", "end"],
        help = "Disable date filtering."
    )]
    pub all: bool,
}

impl RangeArgs {
    /// No flags: the default week from `now`. One bound only: no filtering.
    pub fn resolve(&self, now: PrimitiveDateTime) -> DateRange {
        if self.all {
            return DateRange::unbounded();
        }
        match (self.start, self.end) {
            (None, None) => DateRange::default_from(now),
            (start, end) => DateRange { start, end },
        }
    }
}

fn parse_bound(raw: &str) -> Result<PrimitiveDateTime, String> {
    parse_date_text(raw).ok_or_else(|| format!("'{raw}' is not a recognized date"))
}

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    #[arg(short = 'j', long, help = "Print JSON instead of text.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(help = "Trip ID.")]
    pub id: String,

    #[arg(short = 'j', long, help = "Print JSON instead of text.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct StateArgs {
    #[arg(help = "Trip ID.")]
    pub id: String,

    #[arg(short = 'j', long, help = "Print JSON instead of text.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    #[arg(help = "Trip ID.")]
    pub id: String,

    #[arg(help = "Target status row.")]
    pub status: String,

    #[arg(long, help = "Allow a status that is not a board row.")]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    #[arg(help = "Trip ID.")]
    pub id: String,

    #[arg(help = "Assignee name (surrounding whitespace is trimmed).")]
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(help = "Shell name (bash, zsh, fish, ...). Auto-detected if omitted.")]
    pub shell: Option<Shell>,
}
