use std::io::Write as _;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    lessonbook::logging::init().context("init logging")?;

    let cli = lessonbook::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    let settings =
        lessonbook::config::Settings::resolve(cli.store.as_deref(), cli.base_url.as_deref())
            .context("resolve settings")?;

    let output = match cli.command {
        lessonbook::cli::Command::Tracks => {
            lessonbook::commands::tracks(&settings).context("tracks")?
        }
        lessonbook::cli::Command::Sidebar(args) => {
            lessonbook::commands::sidebar(&settings, args).context("sidebar")?
        }
        lessonbook::cli::Command::Show(args) => {
            lessonbook::commands::show(&settings, args).context("show")?
        }
        lessonbook::cli::Command::Toc(args) => {
            lessonbook::commands::toc(&settings, args).context("toc")?
        }
        lessonbook::cli::Command::Toggle(args) => {
            lessonbook::commands::toggle(&settings, args).context("toggle")?
        }
        lessonbook::cli::Command::Progress => {
            lessonbook::commands::progress(&settings).context("progress")?
        }
        lessonbook::cli::Command::Export(args) => {
            lessonbook::commands::export(args).context("export")?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("write stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
