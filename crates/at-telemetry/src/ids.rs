//! Random identifiers for log correlation.
//!
//! None of these are cryptographically secure; they only need to be
//! unlikely to collide within one debugging session.

use rand::Rng;
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

pub const SPAN_ID_LEN: usize = 16;
pub const CORRELATION_ID_LEN: usize = 13;

/// UUID v4 string, e.g. `3f2b9c1e-8d4a-4f6b-9a1c-2e7d5b8f0a13`.
pub fn trace_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn span_id() -> String {
    base36(SPAN_ID_LEN)
}

/// Per-request token linking `http_request_*` records.
pub fn correlation_id() -> String {
    base36(CORRELATION_ID_LEN)
}

pub fn base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
