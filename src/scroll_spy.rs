use crate::platform::{IntersectionEntry, ObserverConfig, ObserverHandle, Platform};
use crate::render::RenderedContent;

/// Deepest heading level listed in the table of contents.
pub const TOC_MAX_LEVEL: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// h1–h3 headings in document order; headings without an anchor id are skipped.
pub fn extract_headings(content: &RenderedContent) -> Vec<Heading> {
    content
        .query_headings(TOC_MAX_LEVEL)
        .filter_map(|node| {
            let id = node.id.as_deref().filter(|id| !id.is_empty())?;
            Some(Heading {
                id: id.to_owned(),
                text: node.text.clone(),
                level: node.heading_level()?,
            })
        })
        .collect()
}

/// Stale once the content changes again or the spy unmounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocEntry<'a> {
    pub heading: &'a Heading,
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct ScrollSpy {
    config: ObserverConfig,
    headings: Vec<Heading>,
    active_id: Option<String>,
    generation: u64,
    observer: Option<ObserverHandle>,
}

impl ScrollSpy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ObserverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Observer whose batches [`ScrollSpy::handle_intersections`] accepts.
    pub fn observer(&self) -> Option<ObserverHandle> {
        self.observer
    }

    /// An empty table of contents is not shown at all.
    pub fn is_visible(&self) -> bool {
        !self.headings.is_empty()
    }

    pub fn entries(&self) -> Vec<TocEntry<'_>> {
        self.headings
            .iter()
            .map(|heading| TocEntry {
                heading,
                active: self.active_id.as_deref() == Some(heading.id.as_str()),
            })
            .collect()
    }

    /// Drops everything derived from the previous content and invalidates its tickets.
    pub fn content_changed<P>(&mut self, platform: &mut P) -> RenderTicket
    where
        P: Platform + ?Sized,
    {
        self.teardown(platform);
        RenderTicket {
            generation: self.generation,
        }
    }

    /// Scans the rendered headings and starts observing them.
    ///
    /// Returns `false` (and changes nothing) when the ticket is stale.
    pub fn content_rendered<P>(
        &mut self,
        ticket: RenderTicket,
        content: &RenderedContent,
        platform: &mut P,
    ) -> bool
    where
        P: Platform + ?Sized,
    {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "ignoring stale render signal"
            );
            return false;
        }

        if let Some(handle) = self.observer.take() {
            platform.disconnect(handle);
        }

        self.headings = extract_headings(content);
        if !self.headings.is_empty() {
            let ids = self
                .headings
                .iter()
                .map(|heading| heading.id.clone())
                .collect::<Vec<_>>();
            self.observer = Some(platform.observe_visibility(&ids, &self.config));
        }
        tracing::debug!(headings = self.headings.len(), "table of contents scanned");
        true
    }

    /// Applies one batch of observer callbacks.
    ///
    /// The last intersecting entry of the batch wins; batch order is whatever
    /// the host delivered. Ids outside the table of contents and batches from
    /// a disconnected observer are ignored.
    pub fn handle_intersections(
        &mut self,
        handle: ObserverHandle,
        entries: &[IntersectionEntry],
    ) -> bool {
        if self.observer != Some(handle) {
            return false;
        }

        let mut changed = false;
        for entry in entries.iter().filter(|entry| {
            entry.is_intersecting
                && self
                    .headings
                    .iter()
                    .any(|heading| heading.id == entry.target_id)
        }) {
            if self.active_id.as_deref() != Some(entry.target_id.as_str()) {
                self.active_id = Some(entry.target_id.clone());
                changed = true;
            }
        }
        changed
    }

    /// Click on a table-of-contents entry.
    pub fn navigate_to<P>(&mut self, id: &str, platform: &mut P) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        if !self.headings.iter().any(|heading| heading.id == id) {
            anyhow::bail!("heading not in table of contents: {id}");
        }

        platform.scroll_into_view(id);
        platform.set_url_fragment(id);
        self.active_id = Some(id.to_owned());
        Ok(())
    }

    pub fn unmount<P>(&mut self, platform: &mut P)
    where
        P: Platform + ?Sized,
    {
        self.teardown(platform);
    }

    fn teardown<P>(&mut self, platform: &mut P)
    where
        P: Platform + ?Sized,
    {
        if let Some(handle) = self.observer.take() {
            platform.disconnect(handle);
        }
        self.generation += 1;
        self.headings.clear();
        self.active_id = None;
    }
}
