use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::curriculum::Module;
use crate::kv_store::KeyValueStore;

pub const COMPLETION_KEY_PREFIX: &str = "completed-";

const TRUE_VALUE: &str = "true";
const FALSE_VALUE: &str = "false";

pub fn completion_key(module_id: &str) -> String {
    format!("{COMPLETION_KEY_PREFIX}{module_id}")
}

/// Persists the completion flag of one module as the string `"true"` or `"false"`.
///
/// Best-effort: a failing store is logged and otherwise ignored.
pub fn set_completed<S>(store: &mut S, module_id: &str, value: bool)
where
    S: KeyValueStore + ?Sized,
{
    let key = completion_key(module_id);
    let raw = if value { TRUE_VALUE } else { FALSE_VALUE };
    if let Err(err) = store.set_item(&key, raw) {
        tracing::warn!(key = %key, error = %format!("{err:#}"), "persist completion failed");
    }
}

/// Scans every stored key and returns the module ids whose completion value is exactly `"true"`.
pub fn load_all_completed<S>(store: &S) -> BTreeSet<String>
where
    S: KeyValueStore + ?Sized,
{
    let keys = match store.keys() {
        Ok(keys) => keys,
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "list store keys failed; treating as empty");
            return BTreeSet::new();
        }
    };

    let mut completed = BTreeSet::new();
    for key in keys {
        let Some(module_id) = key.strip_prefix(COMPLETION_KEY_PREFIX) else {
            continue;
        };
        match store.get_item(&key) {
            Ok(Some(value)) if value == TRUE_VALUE => {
                completed.insert(module_id.to_owned());
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(key = %key, error = %format!("{err:#}"), "read completion failed");
            }
        }
    }
    completed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChange {
    pub module_id: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSummary {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed * 100 + self.total / 2) / self.total) as u8
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({}%)", self.completed, self.total, self.percent())
    }
}

type Subscriber = Rc<RefCell<dyn FnMut(&CompletionChange)>>;

struct TrackerInner {
    store: Box<dyn KeyValueStore>,
    completed: BTreeSet<String>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    pending: VecDeque<CompletionChange>,
    notifying: bool,
}

/// The one in-memory completion cache shared by every view.
///
/// Cloning yields another handle to the same cache. Writes go to memory first
/// and then to the store; a failed write leaves the two diverged until the
/// next [`ProgressTracker::reload`].
#[derive(Clone)]
pub struct ProgressTracker {
    inner: Rc<RefCell<TrackerInner>>,
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ProgressTracker")
            .field("completed", &inner.completed)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl ProgressTracker {
    pub fn load(store: impl KeyValueStore + 'static) -> Self {
        let completed = load_all_completed(&store);
        tracing::debug!(completed = completed.len(), "loaded completion state");
        Self {
            inner: Rc::new(RefCell::new(TrackerInner {
                store: Box::new(store),
                completed,
                subscribers: Vec::new(),
                next_subscription: 0,
                pending: VecDeque::new(),
                notifying: false,
            })),
        }
    }

    /// Re-derives the cache from the store, dropping any unpersisted toggles.
    pub fn reload(&self) {
        let mut inner = self.inner.borrow_mut();
        let completed = load_all_completed(inner.store.as_ref());
        inner.completed = completed;
    }

    pub fn is_completed(&self, module_id: &str) -> bool {
        self.inner.borrow().completed.contains(module_id)
    }

    pub fn completed_ids(&self) -> BTreeSet<String> {
        self.inner.borrow().completed.clone()
    }

    pub fn set(&self, module_id: &str, completed: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            let changed = if completed {
                inner.completed.insert(module_id.to_owned())
            } else {
                inner.completed.remove(module_id)
            };
            set_completed(inner.store.as_mut(), module_id, completed);
            if !changed {
                return;
            }
        }

        tracing::info!(module_id = %module_id, completed, "completion changed");
        self.notify(CompletionChange {
            module_id: module_id.to_owned(),
            completed,
        });
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self, module_id: &str) -> bool {
        let completed = !self.is_completed(module_id);
        self.set(module_id, completed);
        completed
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CompletionChange) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        let subscriber: Subscriber = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, subscriber));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() != before
    }

    pub fn summary<'a>(&self, modules: impl IntoIterator<Item = &'a Module>) -> ProgressSummary {
        let inner = self.inner.borrow();
        let mut summary = ProgressSummary::default();
        for module in modules {
            summary.total += 1;
            if inner.completed.contains(&module.id) {
                summary.completed += 1;
            }
        }
        summary
    }

    pub fn with_store<T>(&self, f: impl FnOnce(&dyn KeyValueStore) -> T) -> T {
        let inner = self.inner.borrow();
        f(inner.store.as_ref())
    }

    fn notify(&self, change: CompletionChange) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.pending.push_back(change);
            // Writes made from inside a subscriber are delivered by the outer loop.
            if inner.notifying {
                return;
            }
            inner.notifying = true;
        }

        loop {
            let (change, subscribers) = {
                let mut inner = self.inner.borrow_mut();
                let Some(change) = inner.pending.pop_front() else {
                    inner.notifying = false;
                    return;
                };
                let subscribers = inner
                    .subscribers
                    .iter()
                    .map(|(_, sub)| Rc::clone(sub))
                    .collect::<Vec<_>>();
                (change, subscribers)
            };
            for subscriber in subscribers {
                let mut callback = subscriber.borrow_mut();
                (*callback)(&change);
            }
        }
    }
}
