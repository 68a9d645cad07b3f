//! Minisite id generation.
//!
//! Ids are opaque 32-character lowercase hex strings (16 random bytes),
//! stable for the life of the minisite.

use rand::RngCore;

/// Length of a minisite id in characters.
pub const MINISITE_ID_LENGTH: usize = 32;

/// Generate a fresh minisite id.
pub fn generate_minisite_id() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    let mut id = String::with_capacity(MINISITE_ID_LENGTH);
    for b in bytes {
        id.push_str(&format!("{b:02x}"));
    }
    id
}

/// Check that a string is a well-formed minisite id.
pub fn is_valid_minisite_id(id: &str) -> bool {
    id.len() == MINISITE_ID_LENGTH && id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Temporary slug assigned to a draft before a real slug pair is reserved,
/// e.g. `draft-a1b2c3d4e5f6`.
pub fn temp_draft_slug(id: &str) -> String {
    format!("draft-{}", &id[..id.len().min(12)])
}
