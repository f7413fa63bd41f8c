use rand::Rng;

/// Join code characters; 0, 1, I and O are left out so codes read back unambiguously
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LENGTH: usize = 6;

/// Produces a random join code. Uniqueness is the registry's job.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonical form of a code typed by a player
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
