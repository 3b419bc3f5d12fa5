//! Ordered key resolution: secure store first, then the environment.

use zeroize::Zeroizing;

use crate::{
    error::VaultError,
    key::SymmetricKey,
    source::{EnvKeySource, KeySource, KeySourceKind, StoreKeySource},
    store::default_key_store,
    traits::ResolveKey,
};

/// Tries each [`KeySource`] in order and builds a key from the first
/// non-empty candidate.
///
/// A source that errors is logged and skipped. A candidate that fails key
/// construction is fatal: the resolver never falls through to a later source
/// to paper over a broken key.
pub struct KeyResolver {
    sources: Vec<Box<dyn KeySource>>,
}

impl KeyResolver {
    pub fn new(sources: Vec<Box<dyn KeySource>>) -> Self {
        Self { sources }
    }

    /// The platform secure store, then `MCP_SQLITE_ENCRYPTION_KEY`.
    pub fn from_environment() -> Self {
        Self::new(vec![
            Box::new(StoreKeySource::new(default_key_store())),
            Box::new(EnvKeySource::default()),
        ])
    }

    /// Append a source after the existing ones.
    pub fn with_source(mut self, source: impl KeySource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Kinds of the configured sources, in resolution order.
    pub fn source_kinds(&self) -> Vec<KeySourceKind> {
        self.sources.iter().map(|s| s.kind()).collect()
    }

    fn locate(&self) -> Option<(KeySourceKind, Zeroizing<String>)> {
        for source in &self.sources {
            match source.try_load() {
                Ok(Some(candidate)) if !candidate.is_empty() => {
                    return Some((source.kind(), candidate));
                },
                Ok(_) => {},
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(source = %source.kind(), error = %e, "error loading encryption key, trying next source");
                    #[cfg(not(feature = "tracing"))]
                    let _ = e;
                },
            }
        }
        None
    }

    fn not_found(&self) -> VaultError {
        let mut message = String::from("encryption key not found. To provide one:");
        for source in &self.sources {
            message.push_str("\n  - ");
            message.push_str(&source.remediation());
        }
        VaultError::KeyNotFound(message)
    }

    /// Resolve the key, optionally falling back to a fixed development key.
    ///
    /// With `allow_fallback == false` this is exactly
    /// [`resolve_key`](ResolveKey::resolve_key). With `true`, a missing key is
    /// replaced by a deterministic key anyone can reproduce. Other errors
    /// (weak or malformed keys) are never masked.
    ///
    /// **Insecure.** Local development only, never production. Only built
    /// with the `tracing` feature, so the fallback always announces itself.
    #[cfg(feature = "tracing")]
    #[deprecated(note = "the fallback key is public; use `resolve_key` and provision a real key")]
    pub fn resolve_key_with_fallback(
        &self,
        allow_fallback: bool,
    ) -> Result<SymmetricKey, VaultError> {
        match self.resolve_key() {
            Err(VaultError::KeyNotFound(_)) if allow_fallback => {
                tracing::warn!("no encryption key is configured");
                tracing::warn!("using a deterministic fallback key");
                tracing::warn!("this is INSECURE and must only be used for development");
                tracing::warn!(
                    "for production, set: export {}=\"<key>\"",
                    crate::source::ENCRYPTION_KEY_ENV
                );
                tracing::debug!(source = %KeySourceKind::DevelopmentFallback, "encryption key loaded");
                SymmetricKey::development_fallback()
            },
            other => other,
        }
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::from_environment()
    }
}

impl ResolveKey for KeyResolver {
    fn resolve_key(&self) -> Result<SymmetricKey, VaultError> {
        let (kind, candidate) = self.locate().ok_or_else(|| self.not_found())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(source = %kind, "encryption key loaded");
        #[cfg(not(feature = "tracing"))]
        let _ = kind;

        SymmetricKey::from_base64(&candidate)
    }
}
