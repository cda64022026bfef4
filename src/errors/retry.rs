/// Classification for retry policy.
///
/// Used to determine how callers should respond to a failed fetch.
///
/// # Behavior Summary
///
/// | Class | Retry? | Typical reaction |
/// |-------|--------|------------------|
/// | `Never` | No | Skip the current ticker, continue the batch |
/// | `Backoff` | Yes | Sleep and retry, or fail over to the other quote provider |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - the request is fundamentally broken (bad status,
    /// undecodable body, missing credential) and retrying won't help.
    Never,

    /// Transient throttling signal (HTTP 429 or 509).
    ///
    /// The request itself is fine; the provider is temporarily rejecting
    /// traffic. Callers either sleep and retry the same provider or switch
    /// their sticky preference to the other quote provider.
    Backoff,
}
