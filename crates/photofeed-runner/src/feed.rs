use std::sync::Arc;

use photofeed_core::{resolve, BaseAddress, Cycle, FeedError, Item, ItemList, Renderer, SeedOutcome};
use photofeed_storage::KeyValueStore;
use rand::rngs::StdRng;
use reqwest::Client;
use tracing::{info, warn};

use crate::{fetch_manifest, FeedConfig};

/// One mounted photo feed.
///
/// Inert until `init` succeeds. Independent feeds can share a store as long as their
/// storage keys differ.
pub struct Feed<R: Renderer> {
    config: FeedConfig,
    base: BaseAddress,
    renderer: R,
    cycle: Cycle,
    items: Option<ItemList>,
}

impl<R: Renderer> Feed<R> {
    pub fn mount(config: FeedConfig, store: Arc<dyn KeyValueStore>, renderer: R) -> Self {
        let cycle = Cycle::new(store, config.storage_key.clone());
        Self::from_parts(config, renderer, cycle)
    }

    pub fn mount_with_rng(config: FeedConfig, store: Arc<dyn KeyValueStore>, renderer: R, rng: StdRng) -> Self {
        let cycle = Cycle::with_rng(store, config.storage_key.clone(), rng);
        Self::from_parts(config, renderer, cycle)
    }

    fn from_parts(config: FeedConfig, renderer: R, cycle: Cycle) -> Self {
        let base = BaseAddress::new(&config.image_base_url);
        Self { config, base, renderer, cycle, items: None }
    }

    /// Fetches the manifest, then restores or seeds the cycle and renders.
    ///
    /// A fetch failure leaves the feed unrendered and is returned to the caller.
    pub async fn init(&mut self, client: &Client) -> Result<SeedOutcome, FeedError> {
        let raw = fetch_manifest(client, &self.config.manifest_url).await?;
        Ok(self.init_with_identifiers(&raw))
    }

    pub fn init_with_identifiers<S: AsRef<str>>(&mut self, raw: &[S]) -> SeedOutcome {
        let items = resolve(raw, &self.base);
        let outcome = self.cycle.restore_or_seed(items.len(), items.fingerprint());
        if items.is_empty() {
            warn!(key = %self.config.storage_key, "manifest has no usable entries");
        }
        info!(
            key = %self.config.storage_key,
            items = items.len(),
            fingerprint = %items.fingerprint(),
            "feed ready ({outcome:?})"
        );
        self.items = Some(items);
        self.render();
        outcome
    }

    /// Shows the next item. Inert before init and on an empty list.
    pub fn advance(&mut self) {
        if self.items.is_none() {
            return;
        }
        self.cycle.advance();
        self.render();
    }

    pub fn current_item(&self) -> Result<&Item, FeedError> {
        let items = self.items.as_ref().ok_or(FeedError::EmptyList)?;
        items.get(self.cycle.current()?).ok_or(FeedError::EmptyList)
    }

    pub fn peek_next_item(&self) -> Result<&Item, FeedError> {
        let items = self.items.as_ref().ok_or(FeedError::EmptyList)?;
        items.get(self.cycle.peek_next()?).ok_or(FeedError::EmptyList)
    }

    pub fn items(&self) -> Option<&ItemList> {
        self.items.as_ref()
    }

    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn render(&mut self) {
        let Some(items) = &self.items else { return };
        let Some(item) = self.cycle.current().ok().and_then(|i| items.get(i)) else { return };
        self.renderer.display_item(&item.address, &item.label);
        if let Some((current, total)) = self.cycle.progress() {
            self.renderer.show_progress(current, total);
        }
        if let Some(next) = self.cycle.peek_next().ok().and_then(|i| items.get(i)) {
            self.renderer.prefetch(&next.address);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photofeed_core::{RecordingRenderer, RenderCall};
    use photofeed_storage::InMemoryStore;
    use rand::SeedableRng;

    fn feed(store: Arc<InMemoryStore>, key: &str, seed: u64) -> Feed<RecordingRenderer> {
        let mut cfg = FeedConfig::new("http://unused/manifest.json");
        cfg.image_base_url = "https://cdn/photos".into();
        cfg.storage_key = key.into();
        Feed::mount_with_rng(cfg, store, RecordingRenderer::new(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn mounted_feed_is_inert_until_init() {
        let store = Arc::new(InMemoryStore::new());
        let mut f = feed(store.clone(), "pf_v1", 1);
        f.advance();
        assert!(f.renderer().calls.is_empty());
        assert_eq!(f.current_item(), Err(FeedError::EmptyList));
        assert!(store.is_empty());
    }

    #[test]
    fn init_renders_display_progress_then_prefetch() {
        let store = Arc::new(InMemoryStore::new());
        let mut f = feed(store, "pf_v1", 1);
        assert_eq!(f.init_with_identifiers(&["a.jpg", "b.jpg", "c.jpg"]), SeedOutcome::Seeded);

        let calls = &f.renderer().calls;
        assert_eq!(calls.len(), 3);
        let current = f.current_item().unwrap();
        let next = f.peek_next_item().unwrap();
        assert_eq!(
            calls[0],
            RenderCall::Display { address: current.address.clone(), label: current.label.clone() }
        );
        assert_eq!(calls[1], RenderCall::Progress { current: 1, total: 3 });
        assert_eq!(calls[2], RenderCall::Prefetch { address: next.address.clone() });
        assert!(current.address.starts_with("https://cdn/photos/"));
    }

    #[test]
    fn advance_renders_each_step() {
        let store = Arc::new(InMemoryStore::new());
        let mut f = feed(store, "pf_v1", 2);
        f.init_with_identifiers(&["a.jpg", "b.jpg", "c.jpg"]);
        f.advance();
        let before = f.renderer().calls.len();
        f.advance();

        let current = f.current_item().unwrap().clone();
        let next = f.peek_next_item().unwrap().clone();
        assert_eq!(
            &f.renderer().calls[before..],
            &[
                RenderCall::Display { address: current.address, label: current.label },
                RenderCall::Progress { current: 3, total: 3 },
                RenderCall::Prefetch { address: next.address },
            ]
        );
        assert_eq!(f.renderer().displayed().len(), 3);
        assert_eq!(f.renderer().last_progress(), Some((3, 3)));

        let mut shown: Vec<&str> = f.renderer().displayed();
        shown.sort_unstable();
        assert_eq!(
            shown,
            vec!["https://cdn/photos/a.jpg", "https://cdn/photos/b.jpg", "https://cdn/photos/c.jpg"]
        );
    }

    #[test]
    fn prefetch_at_cycle_end_uses_pre_reshuffle_order() {
        let store = Arc::new(InMemoryStore::new());
        let mut f = feed(store, "pf_v1", 3);
        f.init_with_identifiers(&["a.jpg", "b.jpg", "c.jpg"]);
        f.advance();
        f.advance();
        let first_of_pass = f.cycle().state().order[0];
        let expected = f.items().unwrap().get(first_of_pass).unwrap().address.clone();
        assert_eq!(f.renderer().last_prefetch(), Some(expected.as_str()));
    }

    #[test]
    fn empty_manifest_renders_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let mut f = feed(store, "pf_v1", 1);
        f.init_with_identifiers::<&str>(&["", ""]);
        f.advance();
        assert!(f.renderer().calls.is_empty());
        assert_eq!(f.current_item(), Err(FeedError::EmptyList));
        assert_eq!(f.peek_next_item(), Err(FeedError::EmptyList));
    }

    #[test]
    fn reload_resumes_where_it_left_off() {
        let store = Arc::new(InMemoryStore::new());
        let names = ["a.jpg", "b.jpg", "c.jpg", "d.jpg"];

        let mut first = feed(store.clone(), "pf_v1", 4);
        first.init_with_identifiers(&names);
        first.advance();
        let shown = first.current_item().unwrap().clone();

        let mut second = feed(store, "pf_v1", 5);
        assert_eq!(second.init_with_identifiers(&names), SeedOutcome::Restored);
        assert_eq!(second.current_item().unwrap(), &shown);
        assert_eq!(second.renderer().last_progress(), Some((2, 4)));
    }

    #[test]
    fn feeds_with_different_keys_do_not_interfere() {
        let store = Arc::new(InMemoryStore::new());
        let mut left = feed(store.clone(), "left", 1);
        let mut right = feed(store.clone(), "right", 2);
        left.init_with_identifiers(&["a.jpg", "b.jpg", "c.jpg"]);
        right.init_with_identifiers(&["x.jpg", "y.jpg"]);
        left.advance();
        left.advance();
        assert_eq!(left.cycle().position(), 2);
        assert_eq!(right.cycle().position(), 0);
        assert_eq!(right.renderer().displayed().len(), 1);
    }
}
