//! Theme application against a [`StylesheetRenderer`]
//!
//! Two entry points:
//! - [`ThemeApplier::apply_sync`] runs once at startup, before the renderer's
//!   first refresh. It builds the bundled theme path directly and never
//!   clears first.
//! - [`ThemeApplier::apply`] rescans the theme roots, resolves the theme and
//!   pushes its layers one at a time, then schedules a verification check.
//!
//! Every call takes a new generation. Layer writes from a call that is no
//! longer the latest generation are dropped, so overlapping applies cannot
//! leave a mix of two themes behind.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    layers::map_layers,
    registry::{resolve, ThemeRegistry},
    renderer::StylesheetRenderer,
    types::{StylesheetLayer, ThemeDirectory},
};

/// Default delay before checking that stylesheets were injected
pub const DEFAULT_VERIFICATION_DELAY: Duration = Duration::from_millis(500);

/// Result of a single apply call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// All four layers were pushed for the theme
    Applied { theme: String, directory: PathBuf },
    /// All four layers were set absent
    Cleared,
    /// No theme directory matched; nothing beyond the initial clear was done
    NotFound { theme: String },
    /// A newer apply started before this one finished. Layers this call
    /// already wrote stay until the newer call overwrites or clears them.
    Superseded { theme: Option<String> },
}

/// Outcome of the delayed injection check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub theme: String,
    pub directory: PathBuf,
    pub content_length: usize,
}

impl Verification {
    pub fn succeeded(&self) -> bool {
        self.content_length > 0
    }
}

/// Applies themes to a renderer
pub struct ThemeApplier {
    renderer: Arc<dyn StylesheetRenderer>,
    registry: ThemeRegistry,
    verification_delay: Duration,
    generation: AtomicU64,
    /// Generation whose layer writes have not finished, or 0
    partial: AtomicU64,
    pending_verification: Mutex<Option<JoinHandle<()>>>,
    last_verification: Arc<Mutex<Option<Verification>>>,
}

impl std::fmt::Debug for ThemeApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeApplier")
            .field("registry", &self.registry)
            .field("verification_delay", &self.verification_delay)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}

impl ThemeApplier {
    pub fn new(renderer: Arc<dyn StylesheetRenderer>, registry: ThemeRegistry) -> Self {
        Self {
            renderer,
            registry,
            verification_delay: DEFAULT_VERIFICATION_DELAY,
            generation: AtomicU64::new(0),
            partial: AtomicU64::new(0),
            pending_verification: Mutex::new(None),
            last_verification: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_verification_delay(mut self, delay: Duration) -> Self {
        self.verification_delay = delay;
        self
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    /// Most recent completed verification check
    pub fn last_verification(&self) -> Option<Verification> {
        self.last_verification.lock().clone()
    }

    /// Wait for the pending injection check and return its result.
    ///
    /// Returns the previous result when nothing is pending, and `None` when
    /// the pending check was cancelled.
    pub async fn wait_for_verification(&self) -> Option<Verification> {
        let pending = self.pending_verification.lock().take();
        if let Some(handle) = pending {
            handle.await.ok()?;
        }
        self.last_verification()
    }

    /// Startup fast path.
    ///
    /// Builds `bundled_root/<theme>` directly, so user themes are not
    /// considered. Nothing is awaited and no clear happens first.
    pub fn apply_sync(&self, theme: Option<&str>) -> ApplyOutcome {
        let generation = self.begin();
        debug!(theme = ?theme, "Applying theme synchronously");

        let Some(theme) = theme else {
            debug!("Clearing theme stylesheets");
            return self.set_all_absent(generation, None);
        };

        let directory = self.registry.bundled_root().join(theme);
        self.partial.store(generation, Ordering::SeqCst);
        for (layer, stem) in map_layers(&directory).iter() {
            if !self.write_layer(generation, layer, Some(stem)) {
                return ApplyOutcome::Superseded {
                    theme: Some(theme.to_string()),
                };
            }
        }
        self.finish_writes(generation);

        info!(theme, directory = %directory.display(), "Theme stylesheets set synchronously");
        ApplyOutcome::Applied {
            theme: theme.to_string(),
            directory,
        }
    }

    /// Resolve and apply a theme.
    ///
    /// Unless `initial`, every renderer layer is cleared first. A theme that
    /// matches no directory is logged and leaves the renderer as it is after
    /// that clear. An initial call that matches nothing still clears when an
    /// interrupted call left a partial write behind.
    pub async fn apply(&self, theme: Option<&str>, initial: bool) -> Result<ApplyOutcome> {
        let generation = self.begin();
        debug!(theme = ?theme, initial, generation, "Applying theme");

        if !initial {
            debug!("Clearing existing stylesheets");
            self.renderer.clear_all_layers();
            self.partial.store(0, Ordering::SeqCst);
        }

        let Some(theme) = theme else {
            debug!("Applying null theme, clearing all stylesheets");
            return Ok(self.set_all_absent(generation, None));
        };

        let themes = self.registry.list_themes().await?;
        if !self.is_current(generation) {
            return Ok(self.superseded(theme));
        }

        let Some(selected) = resolve(theme, &themes).cloned() else {
            warn!(
                theme,
                available = ?themes.iter().map(ThemeDirectory::name).collect::<Vec<_>>(),
                "Requested theme not found"
            );
            if initial && self.partial.swap(0, Ordering::SeqCst) != 0 {
                debug!("Clearing layers left by an interrupted apply");
                self.renderer.clear_all_layers();
            }
            return Ok(ApplyOutcome::NotFound {
                theme: theme.to_string(),
            });
        };

        debug!(theme, path = %selected.path().display(), "Selected theme path");

        self.partial.store(generation, Ordering::SeqCst);
        for (layer, stem) in map_layers(selected.path()).iter() {
            if !self.write_layer(generation, layer, Some(stem)) {
                return Ok(self.superseded(theme));
            }
            tokio::task::yield_now().await;
        }
        self.finish_writes(generation);

        self.schedule_verification(theme, selected.path());
        info!(theme, path = %selected.path().display(), "Theme applied");

        Ok(ApplyOutcome::Applied {
            theme: theme.to_string(),
            directory: selected.path().to_path_buf(),
        })
    }

    /// Start a new generation and drop any pending verification
    fn begin(&self) -> u64 {
        if let Some(pending) = self.pending_verification.lock().take() {
            pending.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn superseded(&self, theme: &str) -> ApplyOutcome {
        debug!(theme, "Apply superseded by a newer request");
        ApplyOutcome::Superseded {
            theme: Some(theme.to_string()),
        }
    }

    fn write_layer(&self, generation: u64, layer: StylesheetLayer, stem: Option<&Path>) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        debug!(%layer, path = ?stem, "Loading stylesheet");
        self.renderer.set_layer(layer, stem);
        true
    }

    fn set_all_absent(&self, generation: u64, theme: Option<&str>) -> ApplyOutcome {
        self.partial.store(generation, Ordering::SeqCst);
        for layer in StylesheetLayer::ALL {
            if !self.write_layer(generation, layer, None) {
                return ApplyOutcome::Superseded {
                    theme: theme.map(str::to_string),
                };
            }
        }
        self.finish_writes(generation);
        ApplyOutcome::Cleared
    }

    fn finish_writes(&self, generation: u64) {
        let _ = self
            .partial
            .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    fn schedule_verification(&self, theme: &str, directory: &Path) {
        let renderer = Arc::clone(&self.renderer);
        let last = Arc::clone(&self.last_verification);
        let delay = self.verification_delay;
        let theme = theme.to_string();
        let directory = directory.to_path_buf();

        debug!(theme, ?delay, "Theme stylesheets set, waiting for injection check");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let verification = verify_injection(renderer.as_ref(), theme, directory);
            *last.lock() = Some(verification);
        });

        if let Some(previous) = self.pending_verification.lock().replace(handle) {
            previous.abort();
        }
    }
}

/// Inspect the renderer's injection target and log the observation
fn verify_injection(
    renderer: &dyn StylesheetRenderer,
    theme: String,
    directory: PathBuf,
) -> Verification {
    let content = renderer.injected_content().unwrap_or_default();
    let verification = Verification {
        theme,
        directory,
        content_length: content.len(),
    };

    if verification.succeeded() {
        let preview: String = content.chars().take(100).collect();
        info!(
            theme = %verification.theme,
            path = %verification.directory.display(),
            content_length = verification.content_length,
            preview = %preview,
            "Stylesheet injection verified"
        );
    } else {
        warn!(
            theme = %verification.theme,
            path = %verification.directory.display(),
            "Stylesheet injection check failed, no injected content"
        );
    }

    verification
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{MemoryRenderer, RendererCall};
    use std::{fs, io};
    use tempfile::TempDir;
    use tracing_subscriber::fmt::MakeWriter;

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(self.clone())
                .with_ansi(false)
                .with_max_level(tracing::Level::WARN)
                .finish();
            tracing::subscriber::set_default(subscriber)
        }

        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    struct Fixture {
        _temp: TempDir,
        renderer: Arc<MemoryRenderer>,
        applier: ThemeApplier,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let registry = ThemeRegistry::new(temp.path().join("bundled"), temp.path().join("user"));
        let renderer = Arc::new(MemoryRenderer::new());
        let applier = ThemeApplier::new(renderer.clone(), registry);
        Fixture {
            _temp: temp,
            renderer,
            applier,
        }
    }

    fn make_theme(root: &Path, name: &str, style: Option<&str>) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(css) = style {
            fs::write(dir.join("style.css"), css).unwrap();
        }
        dir
    }

    fn set_calls(dir: &Path) -> Vec<RendererCall> {
        map_layers(dir)
            .iter()
            .map(|(layer, stem)| RendererCall::SetLayer(layer, Some(stem.to_path_buf())))
            .collect()
    }

    #[test]
    fn test_apply_sync_uses_bundled_path_without_clearing() {
        let f = fixture();
        let outcome = f.applier.apply_sync(Some("dark"));

        let expected_dir = f.applier.registry().bundled_root().join("dark");
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                theme: "dark".to_string(),
                directory: expected_dir.clone(),
            }
        );
        assert_eq!(f.renderer.calls(), set_calls(&expected_dir));
    }

    #[test]
    fn test_apply_sync_ignores_user_override() {
        let f = fixture();
        make_theme(f.applier.registry().user_root(), "dark", None);
        f.applier.apply_sync(Some("dark"));
        assert_eq!(
            f.renderer.layer(StylesheetLayer::Style),
            Some(f.applier.registry().bundled_root().join("dark").join("style"))
        );
    }

    #[test]
    fn test_apply_sync_null_clears_all_layers() {
        let f = fixture();
        f.applier.apply_sync(Some("dark"));
        f.renderer.clear_calls();

        assert_eq!(f.applier.apply_sync(None), ApplyOutcome::Cleared);
        assert!(!f.renderer.calls().contains(&RendererCall::ClearAll));
        for layer in StylesheetLayer::ALL {
            assert_eq!(f.renderer.layers().get(&layer), Some(&None));
        }
    }

    #[tokio::test]
    async fn test_apply_resolves_user_override() {
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "b", None);
        let user_b = make_theme(f.applier.registry().user_root(), "b", None);

        let outcome = f.applier.apply(Some("b"), false).await.unwrap();
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                theme: "b".to_string(),
                directory: user_b.clone(),
            }
        );

        let mut expected = vec![RendererCall::ClearAll];
        expected.extend(set_calls(&user_b));
        assert_eq!(f.renderer.calls(), expected);
    }

    #[tokio::test]
    async fn test_initial_apply_does_not_clear() {
        let f = fixture();
        let dir = make_theme(f.applier.registry().bundled_root(), "a", None);

        f.applier.apply(Some("a"), true).await.unwrap();
        assert_eq!(f.renderer.calls(), set_calls(&dir));
    }

    #[tokio::test]
    async fn test_null_apply_clears_then_sets_absent() {
        let f = fixture();
        let outcome = f.applier.apply(None, false).await.unwrap();
        assert_eq!(outcome, ApplyOutcome::Cleared);

        let calls = f.renderer.calls();
        assert_eq!(calls[0], RendererCall::ClearAll);
        assert_eq!(calls.len(), 5);
        for layer in StylesheetLayer::ALL {
            assert_eq!(f.renderer.layers().get(&layer), Some(&None));
        }
    }

    #[tokio::test]
    async fn test_initial_not_found_leaves_layers_untouched() {
        let f = fixture();
        f.applier.apply_sync(Some("previous"));
        let before = f.renderer.layers();

        let outcome = f.applier.apply(Some("c"), true).await.unwrap();
        assert_eq!(
            outcome,
            ApplyOutcome::NotFound {
                theme: "c".to_string()
            }
        );
        assert_eq!(f.renderer.layers(), before);
    }

    #[tokio::test]
    async fn test_non_initial_not_found_stays_cleared() {
        let f = fixture();
        f.applier.apply_sync(Some("previous"));

        let outcome = f.applier.apply(Some("c"), false).await.unwrap();
        assert!(matches!(outcome, ApplyOutcome::NotFound { .. }));
        assert!(f.renderer.layers().is_empty());
    }

    #[tokio::test]
    async fn test_stale_apply_is_superseded() {
        let f = fixture();
        let a = make_theme(f.applier.registry().bundled_root(), "a", None);
        let b = make_theme(f.applier.registry().bundled_root(), "b", None);

        let (first, second) = tokio::join!(
            f.applier.apply(Some("a"), false),
            f.applier.apply(Some("b"), false)
        );

        assert_eq!(
            first.unwrap(),
            ApplyOutcome::Superseded {
                theme: Some("a".to_string())
            }
        );
        assert!(matches!(second.unwrap(), ApplyOutcome::Applied { .. }));

        for (layer, stem) in map_layers(&b).iter() {
            assert_eq!(f.renderer.layer(layer).as_deref(), Some(stem));
        }
        assert!(f
            .renderer
            .layers()
            .values()
            .flatten()
            .all(|stem| !stem.starts_with(&a)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verification_reports_injected_content() {
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "a", Some("body { color: red; }"));

        f.applier.apply(Some("a"), false).await.unwrap();
        assert!(f.applier.last_verification().is_none());

        tokio::time::sleep(DEFAULT_VERIFICATION_DELAY + Duration::from_millis(10)).await;
        let verification = f.applier.last_verification().unwrap();
        assert_eq!(verification.theme, "a");
        assert!(verification.succeeded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_verification_failure_is_reported() {
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "empty", None);

        f.applier.apply(Some("empty"), false).await.unwrap();
        tokio::time::sleep(DEFAULT_VERIFICATION_DELAY + Duration::from_millis(10)).await;

        let verification = f.applier.last_verification().unwrap();
        assert!(!verification.succeeded());
        assert_eq!(f.renderer.layers().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_apply_cancels_pending_verification() {
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "a", Some("a {}"));
        make_theme(f.applier.registry().bundled_root(), "b", Some("b {}"));

        f.applier.apply(Some("a"), false).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        f.applier.apply(Some("b"), false).await.unwrap();

        tokio::time::sleep(DEFAULT_VERIFICATION_DELAY + Duration::from_millis(10)).await;
        assert_eq!(f.applier.last_verification().unwrap().theme, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_verification() {
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "a", Some("a {}"));
        assert!(f.applier.wait_for_verification().await.is_none());

        f.applier.apply(Some("a"), false).await.unwrap();
        let verification = f.applier.wait_for_verification().await.unwrap();
        assert_eq!(verification.theme, "a");
        assert!(verification.succeeded());
    }

    #[tokio::test]
    async fn test_unreadable_user_root_still_applies_bundled_theme() {
        let f = fixture();
        let dark = make_theme(f.applier.registry().bundled_root(), "dark", None);
        fs::write(f.applier.registry().user_root(), "not a directory").unwrap();
        f.applier.apply_sync(Some("dark"));

        let outcome = f.applier.apply(Some("dark"), false).await.unwrap();
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                theme: "dark".to_string(),
                directory: dark.clone(),
            }
        );
        for (layer, stem) in map_layers(&dark).iter() {
            assert_eq!(f.renderer.layer(layer).as_deref(), Some(stem));
        }
    }

    #[tokio::test]
    async fn test_initial_not_found_clears_interrupted_write() {
        let f = fixture();
        let a = make_theme(f.applier.registry().bundled_root(), "a", None);
        f.applier.apply_sync(Some("previous"));
        f.renderer.clear_calls();

        let interrupting = async {
            while !f
                .renderer
                .calls()
                .iter()
                .any(|call| matches!(call, RendererCall::SetLayer(..)))
            {
                tokio::task::yield_now().await;
            }
            f.applier.apply(Some("missing"), true).await
        };
        let (first, second) = tokio::join!(f.applier.apply(Some("a"), false), interrupting);

        assert!(matches!(first.unwrap(), ApplyOutcome::Superseded { .. }));
        assert!(matches!(second.unwrap(), ApplyOutcome::NotFound { .. }));
        assert!(f.renderer.layers().is_empty());
        assert!(f
            .renderer
            .layers()
            .values()
            .flatten()
            .all(|stem| !stem.starts_with(&a)));
    }

    #[tokio::test]
    async fn test_not_found_logs_warning() {
        let logs = LogCapture::default();
        let _guard = logs.install();
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "dark", None);

        f.applier.apply(Some("nope"), false).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Requested theme not found"), "{output}");
        assert!(output.contains("nope"), "{output}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_verification_logs_warning() {
        let logs = LogCapture::default();
        let _guard = logs.install();
        let f = fixture();
        make_theme(f.applier.registry().bundled_root(), "empty", None);

        f.applier.apply(Some("empty"), false).await.unwrap();
        assert!(!f.applier.wait_for_verification().await.unwrap().succeeded());

        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("Stylesheet injection check failed"), "{output}");
    }

    #[tokio::test]
    async fn test_unreadable_root_logs_warning() {
        let logs = LogCapture::default();
        let _guard = logs.install();
        let f = fixture();
        fs::write(f.applier.registry().user_root(), "not a directory").unwrap();

        f.applier.apply(Some("dark"), false).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("Theme root is not readable"), "{output}");
    }
}
