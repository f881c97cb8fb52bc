use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Key-value store file [env: LESSONBOOK_STORE, default: .lessonbook/storage.json].
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Document location for lesson links [env: LESSONBOOK_BASE_URL, default: http://localhost/].
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tracks with their progress.
    Tracks,
    /// Print the Track → Phase → Module tree.
    Sidebar(SidebarArgs),
    /// Show one lesson.
    Show(ShowArgs),
    /// Print a lesson's table of contents.
    Toc(TocArgs),
    /// Flip the completion flag of a lesson.
    Toggle(ToggleArgs),
    /// List completed lessons.
    Progress,
    /// Dump the curriculum.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct SidebarArgs {
    /// Module to mark as active (default: the first module).
    #[arg(long)]
    pub select: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Module id, e.g. `p0-m1`.
    pub module: String,

    /// Print the rendered HTML instead of plain text.
    #[arg(long)]
    pub html: bool,
}

#[derive(Debug, Args)]
pub struct TocArgs {
    /// Module id, e.g. `p0-m1`.
    pub module: String,

    /// Heading id to jump to, as if its entry were clicked.
    #[arg(long)]
    pub goto: Option<String>,
}

#[derive(Debug, Args)]
pub struct ToggleArgs {
    /// Module id, e.g. `p0-m1`.
    pub module: String,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
    pub format: ExportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Yaml,
    Json,
}
