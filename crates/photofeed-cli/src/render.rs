use std::io::Write;

use photofeed_core::Renderer;
use reqwest::Client;
use tracing::debug;

/// Prints the feed to a terminal-like writer.
///
/// Draws its frame on first use, so callers never build any UI themselves.
pub struct TerminalRenderer<W: Write> {
    out: W,
    button_text: String,
    framed: bool,
    muted: bool,
    prefetcher: Option<Client>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, button_text: impl Into<String>) -> Self {
        Self { out, button_text: button_text.into(), framed: false, muted: false, prefetcher: None }
    }

    /// Fire a background GET for each unmuted prefetch. Needs a running tokio runtime.
    ///
    /// reqwest keeps no response cache and the runtime is dropped when a one-shot command
    /// exits, so in the CLI this mostly warms DNS and the connection pool.
    pub fn with_prefetcher(mut self, client: Client) -> Self {
        self.prefetcher = Some(client);
        self
    }

    /// While muted nothing is printed and nothing is prefetched.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn should_prefetch(&self) -> bool {
        !self.muted && self.prefetcher.is_some() && tokio::runtime::Handle::try_current().is_ok()
    }

    fn ensure_frame(&mut self) {
        if self.framed {
            return;
        }
        self.framed = true;
        let _ = writeln!(self.out, "== photofeed ==");
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn display_item(&mut self, address: &str, label: &str) {
        if self.muted {
            return;
        }
        self.ensure_frame();
        let _ = writeln!(self.out, "{label}\n  {address}");
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.muted {
            return;
        }
        self.ensure_frame();
        let _ = writeln!(self.out, "[{current}/{total}]  (`photofeed next`: {})", self.button_text);
    }

    fn prefetch(&mut self, address: &str) {
        if !self.should_prefetch() {
            return;
        }
        let Some(client) = self.prefetcher.clone() else { return };
        debug!("prefetch {address}");
        let address = address.to_string();
        tokio::spawn(async move {
            if let Err(e) = client.get(&address).send().await {
                debug!("prefetch {address} failed: {e}");
            }
        });
    }
}
