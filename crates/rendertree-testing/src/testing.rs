use rendertree_adapter::{Adapter, AdapterOptions, RendererOptions, RstNode, TreeRenderer};
use rendertree_core::{Element, RenderMode, TreeError};

/// Headless harness for rendering elements and inspecting their canonical
/// trees in tests.
///
/// `RenderTestRule` owns an adapter and one renderer. Content installed with
/// [`set_content`](Self::set_content) is kept so it can be rendered again.
pub struct RenderTestRule {
    adapter: Adapter,
    renderer: TreeRenderer,
    content: Option<Element>,
}

impl RenderTestRule {
    /// Create a rule with default adapter options in the given mode.
    pub fn new(mode: RenderMode) -> Self {
        Self::with_options(AdapterOptions::default(), mode)
    }

    pub fn with_options(options: AdapterOptions, mode: RenderMode) -> Self {
        init_logging();
        let adapter = Adapter::new(options);
        let renderer = adapter.create_renderer(RendererOptions { mode });
        Self {
            adapter,
            renderer,
            content: None,
        }
    }

    pub fn mount() -> Self {
        Self::new(RenderMode::Mount)
    }

    pub fn shallow() -> Self {
        Self::new(RenderMode::Shallow)
    }

    /// Install `element` as the rule's content and render it.
    pub fn set_content(&mut self, element: Element) -> Result<(), TreeError> {
        self.content = Some(element);
        self.rerender()
    }

    /// Render the installed content again from scratch.
    pub fn rerender(&mut self) -> Result<(), TreeError> {
        match &self.content {
            Some(element) => {
                log::debug!("test rule rendering {}", element.ty().name());
                self.renderer.render(element)
            }
            None => Ok(()),
        }
    }

    /// Canonical tree of the current render, instances included.
    pub fn node(&self) -> Result<Option<RstNode>, TreeError> {
        self.renderer.get_node()
    }

    /// Canonical tree with every instance cleared, for structural comparison.
    pub fn cleaned_node(&self) -> Result<Option<RstNode>, TreeError> {
        Ok(self.node()?.map(RstNode::cleaned))
    }

    /// Dump the live tree as text for debugging
    pub fn dump_tree(&self) -> String {
        self.renderer.dump_tree()
    }

    pub fn unmount(&mut self) -> Result<(), TreeError> {
        self.renderer.unmount()
    }

    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Access the renderer for scenarios the helpers do not cover.
    pub fn renderer(&mut self) -> &mut TreeRenderer {
        &mut self.renderer
    }
}

impl Default for RenderTestRule {
    fn default() -> Self {
        Self::mount()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// mount-mode `RenderTestRule`.
pub fn run_test_render<R>(f: impl FnOnce(&mut RenderTestRule) -> R) -> R {
    let mut rule = RenderTestRule::mount();
    f(&mut rule)
}

#[cfg(feature = "logging")]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(not(feature = "logging"))]
fn init_logging() {}

#[cfg(test)]
#[path = "tests/testing_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/adapter_scenarios.rs"]
mod adapter_scenarios;
