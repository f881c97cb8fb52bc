mod builtin;

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    pub title: String,
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Hell,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Hell => "Hell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
}

/// A single lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    /// Unique across the curriculum; persisted completion is keyed by it.
    pub id: String,
    pub title: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub code_examples: Vec<CodeExample>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_points: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interview_questions: Vec<InterviewQuestion>,
}

impl Module {
    pub fn new(id: impl Into<String>, title: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            topic: topic.into(),
            content: None,
            code_examples: Vec::new(),
            key_points: Vec::new(),
            interview_questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phase {
    pub id: String,
    pub title: String,
    pub goal: String,
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub phases: Vec<Phase>,
}

impl Track {
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.phases.iter().flat_map(|phase| phase.modules.iter())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModuleLocation<'a> {
    pub track: &'a Track,
    pub phase: &'a Phase,
    pub module: &'a Module,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Curriculum {
    tracks: Vec<Track>,
}

impl Curriculum {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// The compiled-in Java, Kotlin and Spring curriculum.
    pub fn builtin() -> Self {
        Self::new(builtin::tracks())
    }

    pub fn all_tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    /// All phases of all tracks in declaration order.
    pub fn flattened_phases(&self) -> Vec<&Phase> {
        self.tracks
            .iter()
            .flat_map(|track| track.phases.iter())
            .collect()
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.tracks.iter().flat_map(|track| track.modules())
    }

    pub fn find_module(&self, id: &str) -> Option<&Module> {
        self.modules().find(|module| module.id == id)
    }

    pub fn first_module(&self) -> Option<&Module> {
        self.flattened_phases()
            .into_iter()
            .find_map(|phase| phase.modules.first())
    }

    pub fn next_module(&self, id: &str) -> Option<&Module> {
        let mut modules = self.modules().skip_while(|module| module.id != id);
        modules.next()?;
        modules.next()
    }

    pub fn previous_module(&self, id: &str) -> Option<&Module> {
        let mut previous = None;
        for module in self.modules() {
            if module.id == id {
                return previous;
            }
            previous = Some(module);
        }
        None
    }

    pub fn locate(&self, id: &str) -> Option<ModuleLocation<'_>> {
        for track in &self.tracks {
            for phase in &track.phases {
                if let Some(module) = phase.modules.iter().find(|module| module.id == id) {
                    return Some(ModuleLocation {
                        track,
                        phase,
                        module,
                    });
                }
            }
        }
        None
    }

    /// Module ids declared more than once, sorted.
    pub fn duplicate_module_ids(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for module in self.modules() {
            *counts.entry(module.id.as_str()).or_default() += 1;
        }
        let mut duplicates = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id.to_owned())
            .collect::<Vec<_>>();
        duplicates.sort();
        duplicates
    }
}
