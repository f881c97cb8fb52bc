use std::collections::BTreeMap;

use url::Url;

/// Visibility-observer settings, in intersection-observer terms.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverConfig {
    pub root_margin: String,
    pub threshold: f64,
}

impl Default for ObserverConfig {
    /// A heading counts once it is at least half visible inside the top 60% of the viewport.
    fn default() -> Self {
        Self {
            root_margin: "0px 0px -40% 0px".to_owned(),
            threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target_id: String,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn visible(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_owned(),
            is_intersecting: true,
        }
    }

    pub fn hidden(target_id: &str) -> Self {
        Self {
            target_id: target_id.to_owned(),
            is_intersecting: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Element(String),
}

/// Host capabilities the views need: visibility observation, scrolling and
/// the document location.
pub trait Platform {
    fn observe_visibility(&mut self, ids: &[String], config: &ObserverConfig) -> ObserverHandle;
    fn disconnect(&mut self, handle: ObserverHandle);
    fn scroll_into_view(&mut self, id: &str);
    fn scroll_to_top(&mut self);
    /// Replaces the location fragment without adding a history entry.
    fn set_url_fragment(&mut self, id: &str);
}

/// A platform without a screen: it remembers what a browser would have done.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    location: Url,
    history_len: usize,
    last_scroll: Option<(ScrollTarget, ScrollBehavior)>,
    observers: BTreeMap<ObserverHandle, (Vec<String>, ObserverConfig)>,
    next_handle: u64,
}

impl HeadlessPlatform {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            history_len: 1,
            last_scroll: None,
            observers: BTreeMap::new(),
            next_handle: 0,
        }
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn history_len(&self) -> usize {
        self.history_len
    }

    pub fn last_scroll(&self) -> Option<&(ScrollTarget, ScrollBehavior)> {
        self.last_scroll.as_ref()
    }

    pub fn observed_ids(&self, handle: ObserverHandle) -> Option<&[String]> {
        self.observers.get(&handle).map(|(ids, _)| ids.as_slice())
    }

    pub fn observer_config(&self, handle: ObserverHandle) -> Option<&ObserverConfig> {
        self.observers.get(&handle).map(|(_, config)| config)
    }

    pub fn live_observers(&self) -> usize {
        self.observers.len()
    }
}

impl Platform for HeadlessPlatform {
    fn observe_visibility(&mut self, ids: &[String], config: &ObserverConfig) -> ObserverHandle {
        let handle = ObserverHandle(self.next_handle);
        self.next_handle += 1;
        self.observers.insert(handle, (ids.to_vec(), config.clone()));
        tracing::debug!(handle = handle.0, targets = ids.len(), "observe visibility");
        handle
    }

    fn disconnect(&mut self, handle: ObserverHandle) {
        if self.observers.remove(&handle).is_some() {
            tracing::debug!(handle = handle.0, "observer disconnected");
        }
    }

    fn scroll_into_view(&mut self, id: &str) {
        self.last_scroll = Some((ScrollTarget::Element(id.to_owned()), ScrollBehavior::Smooth));
    }

    fn scroll_to_top(&mut self) {
        self.last_scroll = Some((ScrollTarget::Top, ScrollBehavior::Smooth));
    }

    fn set_url_fragment(&mut self, id: &str) {
        self.location.set_fragment(Some(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_is_replaced_without_history() -> anyhow::Result<()> {
        let mut platform = HeadlessPlatform::new(Url::parse("http://localhost/lessons")?);
        platform.set_url_fragment("setup");
        platform.set_url_fragment("detail");

        assert_eq!(platform.location().as_str(), "http://localhost/lessons#detail");
        assert_eq!(platform.history_len(), 1);
        Ok(())
    }

    #[test]
    fn observers_are_tracked_until_disconnected() -> anyhow::Result<()> {
        let mut platform = HeadlessPlatform::new(Url::parse("http://localhost/")?);
        let ids = vec!["a".to_owned(), "b".to_owned()];
        let first = platform.observe_visibility(&ids, &ObserverConfig::default());
        let second = platform.observe_visibility(&ids[..1], &ObserverConfig::default());

        assert_ne!(first, second);
        assert_eq!(platform.observed_ids(first), Some(ids.as_slice()));
        assert_eq!(
            platform.observer_config(second).map(|c| c.threshold),
            Some(0.5)
        );

        platform.disconnect(first);
        platform.disconnect(first);
        assert_eq!(platform.live_observers(), 1);
        Ok(())
    }
}
