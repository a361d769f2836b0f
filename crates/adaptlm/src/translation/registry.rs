use std::collections::HashMap;
use std::sync::Arc;

use log::info;
use tokio::sync::{Mutex, OnceCell};

use crate::adaptive::{AdaptiveModel, TextInput};
use crate::error::{AdaptError, Result};
use super::TranslationOptions;

/// Model used when a caller does not name one
pub const DEFAULT_TRANSLATION_MODEL: &str = "t5-small";

/// # EasyTranslator
///
/// Translates with models looked up by identifier, loading each one lazily
/// on first use and reusing it afterwards.
///
/// Every identifier owns its own load slot. Concurrent first calls for the
/// same identifier construct it exactly once, while cached identifiers stay
/// available during another identifier's load. Inference runs on tokio's
/// blocking pool.
///
/// # Type Parameters
///
/// * `T` - The translator built for every identifier
pub struct EasyTranslator<T> {
    translators: Mutex<HashMap<String, Slot<T>>>,
}

/// Load-once cell for one identifier; empty until a load succeeds
type Slot<T> = Arc<OnceCell<Arc<T>>>;

impl<T> EasyTranslator<T>
where T: AdaptiveModel<Options = TranslationOptions, Output = Vec<String>> + 'static
{
    pub fn new() -> Self {
        Self {
            translators: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the translator for `identifier`, loading it if it is not cached.
    ///
    /// The map lock is only held to find the identifier's slot. A failed load
    /// leaves the slot empty, so the next call retries.
    pub async fn translator(&self, identifier: &str) -> Result<Arc<T>> {
        let slot = {
            let mut translators = self.translators.lock().await;
            Arc::clone(translators.entry(identifier.to_string()).or_default())
        };

        let translator = slot
            .get_or_try_init(|| async {
                info!("Loading translator for '{}'", identifier);
                T::load(identifier).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(translator))
    }

    /// Translates `text` with the model named by `identifier`.
    ///
    /// # Parameters
    ///
    /// * `text` - A single text or a batch of texts
    /// * `identifier` - Hub identifier or local path, e.g. [`DEFAULT_TRANSLATION_MODEL`]
    /// * `options` - Prefix, batch size and generation parameters
    ///
    /// # Returns
    ///
    /// One translation per input, in input order.
    pub async fn translate(
        &self,
        text: impl Into<TextInput>,
        identifier: &str,
        options: TranslationOptions,
    ) -> Result<Vec<String>> {
        let text = text.into();
        let translator = self.translator(identifier).await?;

        tokio::task::spawn_blocking(move || translator.predict(text, &options))
            .await
            .map_err(|e| AdaptError::Worker(e.into()))?
    }

    /// Identifiers with a loaded translator, sorted
    pub async fn cached_models(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self
            .translators
            .lock()
            .await
            .iter()
            .filter(|(_, slot)| slot.initialized())
            .map(|(identifier, _)| identifier.clone())
            .collect();
        identifiers.sort();
        identifiers
    }

    /// Drops the cached translator for `identifier`, returning whether one was cached.
    ///
    /// In-flight translations keep their own handle and finish normally.
    pub async fn evict(&self, identifier: &str) -> bool {
        self.translators
            .lock()
            .await
            .remove(identifier)
            .is_some_and(|slot| slot.initialized())
    }
}

impl<T> Default for EasyTranslator<T>
where T: AdaptiveModel<Options = TranslationOptions, Output = Vec<String>> + 'static
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::backend::mock_tensor::MockTensor;
    use crate::generation::GenerationRequest;
    use crate::test_utils::{load_count, MockSeq2Seq, MockTokenizer};
    use crate::translation::TransformersTranslator;

    type MockTranslator = TransformersTranslator<MockTensor, MockTokenizer, MockSeq2Seq>;

    fn options() -> TranslationOptions {
        TranslationOptions::default().generation(GenerationRequest::greedy(32))
    }

    #[tokio::test]
    async fn test_translate_loads_each_identifier_once() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        let first = easy.translate("Hello", "mock/cache-once", options()).await.unwrap();
        let second = easy.translate("Hello", "mock/cache-once", options()).await.unwrap();

        assert_eq!(first, vec!["HELLO"]);
        assert_eq!(first, second);
        assert_eq!(load_count("mock/cache-once"), 1);
    }

    #[tokio::test]
    async fn test_cached_translator_is_shared() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        let a = easy.translator("mock/cache-shared").await.unwrap();
        let b = easy.translator("mock/cache-shared").await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_use_loads_once() {
        let easy: Arc<EasyTranslator<MockTranslator>> = Arc::new(EasyTranslator::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let easy = Arc::clone(&easy);
                tokio::spawn(async move { easy.translate(format!("text {}", i), "mock/cache-concurrent", options()).await })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let out = handle.await.unwrap().unwrap();
            assert_eq!(out, vec![format!("TEXT {}", i)]);
        }
        assert_eq!(load_count("mock/cache-concurrent"), 1);
    }

    #[tokio::test]
    async fn test_distinct_identifiers_are_cached_separately() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        easy.translate("a", "mock/cache-b", options()).await.unwrap();
        easy.translate("a", "mock/cache-a", options()).await.unwrap();

        assert_eq!(easy.cached_models().await, vec!["mock/cache-a", "mock/cache-b"]);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        let err = easy.translate("a", "missing/model", options()).await.unwrap_err();
        assert!(matches!(err, AdaptError::Resolution { .. }));
        assert!(easy.cached_models().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        assert!(easy.translator("missing/retry").await.is_err());
        assert!(easy.translator("missing/retry").await.is_err());
        assert!(!easy.evict("missing/retry").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_load_does_not_block_cached_identifiers() {
        let easy: Arc<EasyTranslator<MockTranslator>> = Arc::new(EasyTranslator::new());
        let ready = easy.translator("mock/cache-ready").await.unwrap();

        let slow = {
            let easy = Arc::clone(&easy);
            tokio::spawn(async move { easy.translator("mock/cache-slow").await })
        };
        tokio::task::yield_now().await;

        let hit = tokio::time::timeout(Duration::from_millis(10), easy.translator("mock/cache-ready"))
            .await
            .expect("cache hit waited on another identifier's load")
            .unwrap();
        assert!(Arc::ptr_eq(&ready, &hit));
        assert!(!slow.is_finished());
        assert_eq!(easy.cached_models().await, vec!["mock/cache-ready"]);

        slow.await.unwrap().unwrap();
        assert_eq!(easy.cached_models().await, vec!["mock/cache-ready", "mock/cache-slow"]);
        assert_eq!(load_count("mock/cache-slow"), 1);
    }

    #[tokio::test]
    async fn test_evict_forces_reload() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        easy.translate("a", "mock/cache-evict", options()).await.unwrap();
        assert!(easy.evict("mock/cache-evict").await);
        assert!(!easy.evict("mock/cache-evict").await);

        easy.translate("a", "mock/cache-evict", options()).await.unwrap();
        assert_eq!(load_count("mock/cache-evict"), 2);
    }

    #[tokio::test]
    async fn test_predict_errors_surface_through_translate() {
        let easy: EasyTranslator<MockTranslator> = EasyTranslator::new();

        let err = easy
            .translate(Vec::<String>::new(), "mock/cache-empty", options())
            .await
            .unwrap_err();
        assert!(matches!(err, AdaptError::InvalidArgument(_)));
    }
}
