use crate::curriculum::{Module, Phase};
use crate::progress::ProgressTracker;

/// Collapsible card for the list-of-cards layout.
///
/// Completion is read through the shared [`ProgressTracker`], so a toggle on a
/// card and a toggle in the shell are the same write to the same cache.
#[derive(Debug, Clone)]
pub struct LessonCard {
    module: Module,
    progress: ProgressTracker,
    expanded: bool,
}

impl LessonCard {
    pub fn new(module: Module, progress: ProgressTracker) -> Self {
        Self {
            module,
            progress,
            expanded: false,
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn is_completed(&self) -> bool {
        self.progress.is_completed(&self.module.id)
    }

    pub fn toggle_completion(&self) -> bool {
        self.progress.toggle(&self.module.id)
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn toggle_expanded(&mut self) {
        self.expanded = !self.expanded;
    }
}

pub fn cards_for_phase(phase: &Phase, progress: &ProgressTracker) -> Vec<LessonCard> {
    phase
        .modules
        .iter()
        .map(|module| LessonCard::new(module.clone(), progress.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use url::Url;

    use super::*;
    use crate::curriculum::Curriculum;
    use crate::kv_store::MemoryStore;
    use crate::platform::HeadlessPlatform;
    use crate::shell::AppShell;

    #[test]
    fn card_and_shell_share_one_completion_state() -> anyhow::Result<()> {
        let curriculum = Curriculum::builtin();
        let progress = ProgressTracker::load(MemoryStore::new());
        let cards = cards_for_phase(curriculum.flattened_phases()[0], &progress);
        let mut shell = AppShell::new(curriculum.clone(), progress.clone())?;
        let mut platform = HeadlessPlatform::new(Url::parse("http://localhost/")?);

        let first = &cards[0];
        assert_eq!(first.module().id, "p0-m1");
        assert!(first.toggle_completion());
        assert!(shell.is_current_completed());

        shell.select_by_id("p0-m2", &mut platform)?;
        shell.toggle_completion();
        assert!(cards[1].is_completed());

        shell.toggle_completion();
        assert!(!cards[1].is_completed());
        Ok(())
    }

    #[test]
    fn card_toggles_reach_subscribers() {
        let progress = ProgressTracker::load(MemoryStore::new());
        let card = LessonCard::new(Module::new("p9-m9", "Card", "Topic"), progress.clone());
        let changes = Rc::new(RefCell::new(Vec::new()));
        {
            let changes = Rc::clone(&changes);
            progress.subscribe(move |change| changes.borrow_mut().push(change.completed));
        }

        card.toggle_completion();
        card.toggle_completion();
        assert_eq!(*changes.borrow(), vec![true, false]);
    }

    #[test]
    fn expansion_is_local_to_the_card() {
        let progress = ProgressTracker::load(MemoryStore::new());
        let module = Module::new("p0-m1", "JVM", "Platform");
        let mut a = LessonCard::new(module.clone(), progress.clone());
        let b = LessonCard::new(module, progress);

        assert!(!a.is_expanded());
        a.toggle_expanded();
        assert!(a.is_expanded());
        assert!(!b.is_expanded());
    }
}
