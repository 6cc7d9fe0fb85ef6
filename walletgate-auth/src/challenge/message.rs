//! Deterministic challenge message rendering.
//!
//! The client signs the exact text produced here, and the server
//! re-renders the same text from the stored nonce to verify the
//! signature. Any divergence between the two renderings breaks the
//! protocol, so the format below is the shared contract and is locked
//! by tests.

/// Renders challenge messages for a fixed issuing domain.
///
/// `render` is a pure function of the nonce value: the same nonce
/// always produces the same string, and the full nonce is embedded so
/// two distinct nonces can never render identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeTemplate {
    domain: String,
}

impl ChallengeTemplate {
    /// Create a template for the given issuing domain.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// The issuing domain embedded in rendered messages.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Render the exact text the client must sign for this nonce.
    ///
    /// The wording states the sign-in purpose explicitly so the signed
    /// text cannot be mistaken for (or replayed as) authorization of a
    /// transaction.
    #[must_use]
    pub fn render(&self, nonce_hex: &str) -> String {
        format!(
            "{domain} wants you to sign in with your wallet.\n\
             \n\
             This signature proves you control your wallet address.\n\
             It does not authorize a transaction and cannot move funds.\n\
             \n\
             Challenge: {nonce}",
            domain = self.domain,
            nonce = nonce_hex,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeNonce;

    #[test]
    fn test_render_is_deterministic() {
        let template = ChallengeTemplate::new("portal.example");
        let nonce = ChallengeNonce::new().to_hex();

        assert_eq!(template.render(&nonce), template.render(&nonce));
    }

    #[test]
    fn test_distinct_nonces_render_distinct_messages() {
        let template = ChallengeTemplate::new("portal.example");
        let a = ChallengeNonce::new().to_hex();
        let b = ChallengeNonce::new().to_hex();
        assert_ne!(a, b);

        assert_ne!(template.render(&a), template.render(&b));
    }

    #[test]
    fn test_render_embeds_domain_and_full_nonce() {
        let template = ChallengeTemplate::new("portal.example");
        let nonce = ChallengeNonce::new().to_hex();
        let message = template.render(&nonce);

        assert!(message.contains("portal.example"));
        assert!(message.contains(&nonce));
    }

    #[test]
    fn test_exact_format_is_locked() {
        // The byte-exact contract between client and server. Changing
        // this format invalidates every outstanding challenge.
        let template = ChallengeTemplate::new("portal.example");
        let message = template.render("00ff");

        assert_eq!(
            message,
            "portal.example wants you to sign in with your wallet.\n\
             \n\
             This signature proves you control your wallet address.\n\
             It does not authorize a transaction and cannot move funds.\n\
             \n\
             Challenge: 00ff"
        );
    }

    #[test]
    fn test_sign_in_purpose_is_stated() {
        let message = ChallengeTemplate::new("portal.example")
            .render(&ChallengeNonce::new().to_hex());

        assert!(message.contains("sign in"));
        assert!(message.contains("does not authorize a transaction"));
    }
}
