//! Redis error mapping to CacheError.

use headlines_core::cache::CacheError;

/// Maps Redis errors to CacheError.
///
/// Refused, dropped and timed-out connections are connectivity failures the
/// read path can fall back from; protocol and data errors are not.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_io_error()
    {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
