//! Cache policy passed through to the transport.

/// How the transport should use its cache for a request.
///
/// Courier never interprets this value; it travels with the
/// [`TransportRequest`](crate::TransportRequest) for the transport to honour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Follow the caching rules of the protocol.
    #[default]
    UseProtocolCachePolicy,
    /// Ignore locally cached data.
    ReloadIgnoringLocalCacheData,
    /// Ignore local and intermediate caches.
    ReloadIgnoringLocalAndRemoteCacheData,
    /// Use cached data regardless of age, load only when missing.
    ReturnCacheDataElseLoad,
    /// Use cached data only, never load.
    ReturnCacheDataDontLoad,
    /// Revalidate cached data with the origin before use.
    ReloadRevalidatingCacheData,
}
