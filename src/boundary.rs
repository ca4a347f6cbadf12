use textnonce::TextNonce;

/// Multipart boundaries of one message
///
/// All three share one random seed, the prefixes keep them distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundarySet {
    tokens: [String; 3],
}

impl BoundarySet {
    /// Fresh boundaries from a random nonce
    pub fn generate() -> Self {
        let seed = TextNonce::sized_urlsafe(24)
            .map(TextNonce::into_string)
            .unwrap_or_else(|_| TextNonce::new().into_string());
        Self::from_seed(&seed)
    }

    /// Boundaries for a known seed
    pub fn from_seed(seed: &str) -> Self {
        BoundarySet {
            tokens: [format!("B1_{}", seed), format!("B2_{}", seed), format!("B3_{}", seed)],
        }
    }

    /// Outermost boundary
    pub fn outer(&self) -> &str {
        &self.tokens[0]
    }

    /// Boundary of the first nested section
    pub fn inner(&self) -> &str {
        &self.tokens[1]
    }

    /// Boundary of the second nested section
    pub fn innermost(&self) -> &str {
        &self.tokens[2]
    }

    pub fn tokens(&self) -> &[String; 3] {
        &self.tokens
    }
}
