/// Presentation collaborator driven by the feed.
///
/// The core never builds or queries UI itself; adapters own that.
pub trait Renderer {
    fn display_item(&mut self, address: &str, label: &str);
    /// `current` is 1-based.
    fn show_progress(&mut self, current: usize, total: usize);
    /// Best effort warm-up of the next address. Outcome is not observed.
    fn prefetch(&mut self, address: &str);
}

/// A call made against a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCall {
    Display { address: String, label: String },
    Progress { current: usize, total: usize },
    Prefetch { address: String },
}

/// Renderer that records calls, for tests and headless hosts.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn displayed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Display { address, .. } => Some(address.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<(usize, usize)> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Progress { current, total } => Some((*current, *total)),
            _ => None,
        })
    }

    pub fn last_prefetch(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::Prefetch { address } => Some(address.as_str()),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn display_item(&mut self, address: &str, label: &str) {
        self.calls.push(RenderCall::Display { address: address.to_string(), label: label.to_string() });
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.calls.push(RenderCall::Progress { current, total });
    }

    fn prefetch(&mut self, address: &str) {
        self.calls.push(RenderCall::Prefetch { address: address.to_string() });
    }
}
