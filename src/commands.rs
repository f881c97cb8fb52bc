use std::fmt::Write as _;

use anyhow::Context as _;

use crate::cli::{ExportArgs, ExportFormat, ShowArgs, SidebarArgs, TocArgs, ToggleArgs};
use crate::config::Settings;
use crate::curriculum::Curriculum;
use crate::kv_store::JsonFileStore;
use crate::platform::HeadlessPlatform;
use crate::progress::ProgressTracker;
use crate::render::{MarkdownRenderer, render_plain};
use crate::shell::AppShell;
use crate::view::LessonView;

struct Session {
    shell: AppShell,
    platform: HeadlessPlatform,
}

fn open_session(settings: &Settings) -> anyhow::Result<Session> {
    let store = JsonFileStore::new(&settings.store_path);
    tracing::debug!(store = %store.path().display(), "open store");
    let progress = ProgressTracker::load(store);
    let shell = AppShell::new(Curriculum::builtin(), progress).context("start shell")?;
    Ok(Session {
        shell,
        platform: HeadlessPlatform::new(settings.base_url.clone()),
    })
}

fn open_lesson(settings: &Settings, module_id: &str) -> anyhow::Result<Session> {
    let mut session = open_session(settings)?;
    session.platform = HeadlessPlatform::new(settings.lesson_url(module_id)?);
    session.shell.select_by_id(module_id, &mut session.platform)?;
    Ok(session)
}

pub fn tracks(settings: &Settings) -> anyhow::Result<String> {
    let session = open_session(settings)?;
    let progress = session.shell.progress();

    let mut out = String::new();
    for track in session.shell.curriculum().all_tracks() {
        writeln!(
            out,
            "{} {} [{}] {}",
            track.icon,
            track.title,
            track.id,
            progress.summary(track.modules())
        )?;
        writeln!(out, "  {}", track.description)?;
    }
    Ok(out)
}

pub fn sidebar(settings: &Settings, args: SidebarArgs) -> anyhow::Result<String> {
    let mut session = open_session(settings)?;
    if let Some(module_id) = args.select.as_deref() {
        session
            .shell
            .select_by_id(module_id, &mut session.platform)?;
    }

    let mut out = String::new();
    for track in session.shell.sidebar().tracks {
        writeln!(out, "{} {} {}", track.icon, track.title, track.progress)?;
        for phase in track.phases {
            writeln!(out, "  {} {}", phase.title, phase.progress)?;
            for module in phase.modules {
                let marker = if module.active { ">" } else { " " };
                let check = if module.completed { "[x]" } else { "[ ]" };
                writeln!(out, "  {marker} {check} {:<6} {}", module.id, module.title)?;
            }
        }
    }
    Ok(out)
}

pub fn show(settings: &Settings, args: ShowArgs) -> anyhow::Result<String> {
    let mut session = open_lesson(settings, &args.module)?;
    let shell = &session.shell;
    let module = shell.current_module().clone();
    let curriculum = shell.curriculum();

    let mut out = String::new();
    writeln!(out, "{} [{}]", module.title, module.id)?;
    if let Some(location) = curriculum.locate(&module.id) {
        writeln!(
            out,
            "{} > {} | {}",
            location.track.title, location.phase.title, module.topic
        )?;
    }
    let status = if shell.is_current_completed() {
        "completed"
    } else {
        "not completed"
    };
    writeln!(out, "Status: {status}")?;
    out.push('\n');

    let markdown = module.content.as_deref().unwrap_or_default();
    if args.html {
        let mut view = LessonView::new(MarkdownRenderer::default());
        view.show(&module, &mut session.platform);
        out.push_str(&view.content().html);
    } else if !markdown.trim().is_empty() {
        out.push_str(&render_plain(markdown));
    }

    if !module.key_points.is_empty() {
        writeln!(out, "\nKey points:")?;
        for point in &module.key_points {
            writeln!(out, "- {point}")?;
        }
    }

    if !module.code_examples.is_empty() {
        writeln!(out, "\nCode examples:")?;
        for example in &module.code_examples {
            writeln!(out, "## {} ({})", example.title, example.language)?;
            for line in example.code.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }

    if !module.interview_questions.is_empty() {
        writeln!(out, "\nInterview questions:")?;
        for question in &module.interview_questions {
            writeln!(
                out,
                "[{}] {}",
                question.difficulty.label(),
                question.question
            )?;
            writeln!(out, "    {}", question.answer)?;
        }
    }

    let previous = curriculum
        .previous_module(&module.id)
        .map_or("-", |m| m.id.as_str());
    let next = curriculum
        .next_module(&module.id)
        .map_or("-", |m| m.id.as_str());
    writeln!(out, "\nPrevious: {previous}  Next: {next}")?;
    Ok(out)
}

pub fn toc(settings: &Settings, args: TocArgs) -> anyhow::Result<String> {
    let mut session = open_lesson(settings, &args.module)?;
    let module = session.shell.current_module().clone();

    let mut view = LessonView::new(MarkdownRenderer::default());
    view.show(&module, &mut session.platform);
    if !view.scroll_spy().is_visible() {
        return Ok(String::new());
    }

    if let Some(heading_id) = args.goto.as_deref() {
        view.navigate_to(heading_id, &mut session.platform)
            .with_context(|| format!("navigate {}", module.id))?;
    }

    let mut out = String::new();
    for entry in view.scroll_spy().entries() {
        let marker = if entry.active { ">" } else { " " };
        let indent = "  ".repeat(usize::from(entry.heading.level.saturating_sub(1)));
        writeln!(
            out,
            "{marker} {indent}{} (#{})",
            entry.heading.text, entry.heading.id
        )?;
    }
    if args.goto.is_some() {
        writeln!(out, "Location: {}", session.platform.location())?;
    }
    view.unmount(&mut session.platform);
    Ok(out)
}

pub fn toggle(settings: &Settings, args: ToggleArgs) -> anyhow::Result<String> {
    let mut session = open_lesson(settings, &args.module)?;
    let completed = session.shell.toggle_completion();
    let state = if completed {
        "completed"
    } else {
        "not completed"
    };
    Ok(format!("{} marked as {state}\n", args.module))
}

pub fn progress(settings: &Settings) -> anyhow::Result<String> {
    let session = open_session(settings)?;
    let curriculum = session.shell.curriculum();
    let progress = session.shell.progress();

    let mut out = String::new();
    writeln!(out, "Completed {}", progress.summary(curriculum.modules()))?;
    for module in curriculum
        .modules()
        .filter(|module| progress.is_completed(&module.id))
    {
        writeln!(out, "{:<6} {}", module.id, module.title)?;
    }

    let unknown = progress
        .completed_ids()
        .into_iter()
        .filter(|id| curriculum.find_module(id).is_none())
        .collect::<Vec<_>>();
    if !unknown.is_empty() {
        tracing::info!(?unknown, "completion entries for unknown modules");
    }
    Ok(out)
}

pub fn export(args: ExportArgs) -> anyhow::Result<String> {
    let curriculum = Curriculum::builtin();
    match args.format {
        ExportFormat::Yaml => {
            serde_yaml::to_string(&curriculum).context("serialize curriculum yaml")
        }
        ExportFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&curriculum).context("serialize curriculum json")?;
            json.push('\n');
            Ok(json)
        }
    }
}
