//! Opaque identifier generation for boards and tasks.
//!
//! Ids combine a base-36 encoding of the current unix-millis timestamp with
//! eight random alphanumeric characters, optionally namespaced by a caller
//! prefix: `task_m1abc2de_x8K2p9Qr`. Uniqueness relies on entropy, not on a
//! counter or a persisted ledger; collisions are negligible at the volumes a
//! single-user board sees.

use chrono::Utc;
use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const RANDOM_LEN: usize = 8;

/// Generate a fresh identifier, optionally namespaced with a prefix.
pub fn generate_id(prefix: Option<&str>) -> String {
    let time = base36(Utc::now().timestamp_millis().max(0) as u64);
    let mut rng = rand::thread_rng();
    let random: String = (0..RANDOM_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}_{time}_{random}"),
        _ => format!("{time}_{random}"),
    }
}

fn base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let digits = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = Vec::new();
    while value > 0 {
        out.push(digits[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ascii")
}
