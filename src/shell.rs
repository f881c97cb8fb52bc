use std::collections::BTreeSet;

use anyhow::Context as _;

use crate::curriculum::{Curriculum, Module};
use crate::platform::Platform;
use crate::progress::{ProgressSummary, ProgressTracker};

#[derive(Debug)]
pub struct AppShell {
    curriculum: Curriculum,
    progress: ProgressTracker,
    current_module: Module,
    sidebar_open: bool,
}

impl AppShell {
    /// Starts on the first module of the first phase with the sidebar open.
    pub fn new(curriculum: Curriculum, progress: ProgressTracker) -> anyhow::Result<Self> {
        let current_module = curriculum
            .first_module()
            .cloned()
            .context("curriculum has no modules")?;
        Ok(Self {
            curriculum,
            progress,
            current_module,
            sidebar_open: true,
        })
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn current_module(&self) -> &Module {
        &self.current_module
    }

    pub fn completed_module_ids(&self) -> BTreeSet<String> {
        self.progress.completed_ids()
    }

    /// Accepts any module; callers normally pass one taken from the sidebar.
    pub fn select_module<P>(&mut self, module: Module, platform: &mut P)
    where
        P: Platform + ?Sized,
    {
        tracing::debug!(module_id = %module.id, "select module");
        self.current_module = module;
        platform.scroll_to_top();
    }

    pub fn select_by_id<P>(&mut self, module_id: &str, platform: &mut P) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        let module = self
            .curriculum
            .find_module(module_id)
            .cloned()
            .with_context(|| format!("unknown module id: {module_id}"))?;
        self.select_module(module, platform);
        Ok(())
    }

    pub fn select_next<P>(&mut self, platform: &mut P) -> bool
    where
        P: Platform + ?Sized,
    {
        match self.curriculum.next_module(&self.current_module.id).cloned() {
            Some(module) => {
                self.select_module(module, platform);
                true
            }
            None => false,
        }
    }

    pub fn select_previous<P>(&mut self, platform: &mut P) -> bool
    where
        P: Platform + ?Sized,
    {
        match self
            .curriculum
            .previous_module(&self.current_module.id)
            .cloned()
        {
            Some(module) => {
                self.select_module(module, platform);
                true
            }
            None => false,
        }
    }

    /// Flips completion of the current module; returns the new state.
    pub fn toggle_completion(&mut self) -> bool {
        self.progress.toggle(&self.current_module.id)
    }

    pub fn is_current_completed(&self) -> bool {
        self.progress.is_completed(&self.current_module.id)
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }

    /// Also what a click on the overlay does.
    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn sidebar(&self) -> Sidebar {
        let tracks = self
            .curriculum
            .all_tracks()
            .iter()
            .map(|track| SidebarTrack {
                id: track.id.clone(),
                title: track.title.clone(),
                icon: track.icon.clone(),
                color: track.color.clone(),
                progress: self.progress.summary(track.modules()),
                phases: track
                    .phases
                    .iter()
                    .map(|phase| SidebarPhase {
                        id: phase.id.clone(),
                        title: phase.title.clone(),
                        progress: self.progress.summary(&phase.modules),
                        modules: phase
                            .modules
                            .iter()
                            .map(|module| SidebarModule {
                                id: module.id.clone(),
                                title: module.title.clone(),
                                topic: module.topic.clone(),
                                completed: self.progress.is_completed(&module.id),
                                active: module.id == self.current_module.id,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Sidebar {
            open: self.sidebar_open,
            tracks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub open: bool,
    pub tracks: Vec<SidebarTrack>,
}

impl Sidebar {
    pub fn active_module(&self) -> Option<&SidebarModule> {
        self.modules().find(|module| module.active)
    }

    pub fn modules(&self) -> impl Iterator<Item = &SidebarModule> {
        self.tracks
            .iter()
            .flat_map(|track| track.phases.iter())
            .flat_map(|phase| phase.modules.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarTrack {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub color: String,
    pub progress: ProgressSummary,
    pub phases: Vec<SidebarPhase>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarPhase {
    pub id: String,
    pub title: String,
    pub progress: ProgressSummary,
    pub modules: Vec<SidebarModule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarModule {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub completed: bool,
    pub active: bool,
}
