//! Command handlers

pub mod account;
pub mod atm;

use minibank_business::BusinessError;

/// One-line user message for a failed operation.
///
/// Storage divergence gets its own wording so it is never mistaken for a
/// rejected amount.
pub fn describe(err: &BusinessError) -> String {
    match err {
        BusinessError::AuthFailed => {
            "Authentication failed or no account found for that user.".to_string()
        }
        BusinessError::PersistenceInconsistency { account_id, .. } => format!(
            "⚠️  Account {} could not be saved. The stored balance may differ from what you see; \
             re-check the balance before retrying.",
            account_id
        ),
        e if e.is_storage() => format!("Storage error: {}", e),
        e if e.is_validation() => format!("Error: {}", e),
        e => e.to_string(),
    }
}

/// Wrap a business error for `anyhow`, keeping the cause chain
pub fn report(err: BusinessError) -> anyhow::Error {
    let message = describe(&err);
    anyhow::Error::new(err).context(message)
}
