use crate::curriculum::Module;
use crate::platform::{IntersectionEntry, ObserverHandle, Platform};
use crate::render::{MarkdownRenderer, RenderedContent};
use crate::scroll_spy::{RenderTicket, ScrollSpy};

/// Content change that has not been rendered yet.
#[derive(Debug, Clone)]
#[must_use]
pub struct PendingRender {
    ticket: RenderTicket,
    module_id: String,
    markdown: String,
}

impl PendingRender {
    pub fn module_id(&self) -> &str {
        &self.module_id
    }
}

/// Detail view of one lesson: rendered markdown plus its table of contents.
#[derive(Debug, Default)]
pub struct LessonView {
    renderer: MarkdownRenderer,
    spy: ScrollSpy,
    module_id: Option<String>,
    content: RenderedContent,
}

impl LessonView {
    pub fn new(renderer: MarkdownRenderer) -> Self {
        Self {
            renderer,
            ..Self::default()
        }
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    pub fn content(&self) -> &RenderedContent {
        &self.content
    }

    pub fn scroll_spy(&self) -> &ScrollSpy {
        &self.spy
    }

    /// Renders and wires the table of contents in one step.
    pub fn show<P>(&mut self, module: &Module, platform: &mut P) -> bool
    where
        P: Platform + ?Sized,
    {
        let pending = self.begin(module, platform);
        self.finish(pending, platform)
    }

    /// Switches to `module`; rendering is completed later with [`LessonView::finish`].
    pub fn begin<P>(&mut self, module: &Module, platform: &mut P) -> PendingRender
    where
        P: Platform + ?Sized,
    {
        let ticket = self.spy.content_changed(platform);
        self.module_id = None;
        self.content = RenderedContent::default();
        PendingRender {
            ticket,
            module_id: module.id.clone(),
            markdown: module.content.clone().unwrap_or_default(),
        }
    }

    /// Renders the pending content and signals the scroll-spy.
    ///
    /// A pending render that was overtaken by another switch is dropped and
    /// `false` is returned.
    pub fn finish<P>(&mut self, pending: PendingRender, platform: &mut P) -> bool
    where
        P: Platform + ?Sized,
    {
        let rendered = self.renderer.render(&pending.markdown);
        if !self.spy.content_rendered(pending.ticket, &rendered, platform) {
            tracing::debug!(module_id = %pending.module_id, "dropping overtaken render");
            return false;
        }
        self.module_id = Some(pending.module_id);
        self.content = rendered;
        true
    }

    pub fn handle_intersections(
        &mut self,
        handle: ObserverHandle,
        entries: &[IntersectionEntry],
    ) -> bool {
        self.spy.handle_intersections(handle, entries)
    }

    pub fn navigate_to<P>(&mut self, heading_id: &str, platform: &mut P) -> anyhow::Result<()>
    where
        P: Platform + ?Sized,
    {
        self.spy.navigate_to(heading_id, platform)
    }

    pub fn unmount<P>(&mut self, platform: &mut P)
    where
        P: Platform + ?Sized,
    {
        self.spy.unmount(platform);
        self.module_id = None;
        self.content = RenderedContent::default();
    }
}
