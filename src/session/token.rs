use rand::Rng;

/// Random bytes behind each session token
pub const TOKEN_BYTES: usize = 32;

/// Generates an unguessable session token as lowercase hex.
///
/// `rand::rng()` is a cryptographically secure generator reseeded from the OS.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
