//! Session key generation.

use rand::Rng;

/// Characters a generated key is drawn from.
pub const SESSION_KEY_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.=-_";

/// Length of a generated key.
pub const SESSION_KEY_LENGTH: usize = 36;

/// Generates a random session key from the thread-local CSPRNG.
pub fn generate_session_key() -> String {
    let mut rng = rand::thread_rng();
    (0..SESSION_KEY_LENGTH)
        .map(|_| {
            let index = rng.gen_range(0..SESSION_KEY_ALPHABET.len());
            char::from(SESSION_KEY_ALPHABET[index])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{generate_session_key, SESSION_KEY_ALPHABET, SESSION_KEY_LENGTH};
    use std::collections::HashSet;

    #[test]
    fn generated_keys_have_expected_shape() {
        let key = generate_session_key();
        assert_eq!(key.len(), SESSION_KEY_LENGTH);
        assert!(key.bytes().all(|byte| SESSION_KEY_ALPHABET.contains(&byte)));
    }

    #[test]
    fn generated_keys_do_not_repeat() {
        let keys: HashSet<String> = (0..1_000).map(|_| generate_session_key()).collect();
        assert_eq!(keys.len(), 1_000);
    }
}
