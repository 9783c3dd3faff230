// crates/lantern-media/src/error.rs

use thiserror::Error;

/// Construction is the only fallible path on the provider surface — every
/// relay call is swallowed at the boundary by contract.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The engine hands its dialog event stream to at most one provider.
    #[error("engine dialog stream already claimed by another provider")]
    EngineBusy,
}
