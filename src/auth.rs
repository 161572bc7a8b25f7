//! Admin secret check
//!
//! Both sides are hashed with blake3 before comparing; `blake3::Hash`
//! equality is constant-time, so the comparison does not leak prefix matches.

/// The shared admin secret. `None` means admin access is disabled.
#[derive(Clone, Default)]
pub struct AdminSecret {
    digest: Option<blake3::Hash>,
}

impl AdminSecret {
    /// An empty or whitespace-only secret disables admin access
    pub fn new(secret: Option<&str>) -> Self {
        let digest = secret
            .filter(|s| !s.trim().is_empty())
            .map(|s| blake3::hash(s.as_bytes()));
        Self { digest }
    }

    pub fn is_configured(&self) -> bool {
        self.digest.is_some()
    }

    pub fn verify(&self, candidate: &str) -> bool {
        match &self.digest {
            Some(expected) => *expected == blake3::hash(candidate.as_bytes()),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSecret")
            .field("configured", &self.is_configured())
            .finish()
    }
}
