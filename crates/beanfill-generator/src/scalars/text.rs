//! String, character and byte generators, including pattern strings.
//!
//! Patterns support placeholders:
//! - `{index}` - invocation counter
//! - `{uuid}` - random UUID
//! - `{rand:N}` - random N-digit number

use super::uuid::generate_uuid_v4;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Maximum length of a default random string or byte array.
const MAX_LENGTH: usize = 16;

/// Generate a random alphanumeric string of 1 to 16 characters.
pub fn generate_string<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(1..=MAX_LENGTH);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Generate a random alphanumeric character.
pub fn generate_char<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(rng.sample(Alphanumeric))
}

/// Generate 1 to 16 random bytes.
pub fn generate_bytes<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let len = rng.gen_range(1..=MAX_LENGTH);
    (0..len).map(|_| rng.gen()).collect()
}

/// Generate a string based on a pattern with placeholders.
pub fn generate_pattern<R: Rng + ?Sized>(pattern: &str, rng: &mut R, index: u64) -> String {
    let mut result = pattern.replace("{index}", &index.to_string());

    while result.contains("{uuid}") {
        let uuid = generate_uuid_v4(rng).to_string();
        result = result.replacen("{uuid}", &uuid, 1);
    }

    // Replace {rand:N} patterns
    let mut search_from = 0;
    while let Some(offset) = result[search_from..].find("{rand:") {
        let start = search_from + offset;
        let Some(end) = result[start..].find('}').map(|e| start + e) else {
            break;
        };
        match result[start + 6..end].parse::<usize>() {
            Ok(digits) => {
                let random_num = generate_random_digits(rng, digits);
                result = format!("{}{}{}", &result[..start], random_num, &result[end + 1..]);
                search_from = start + random_num.len();
            }
            // Leave malformed placeholders in place
            Err(_) => search_from = end + 1,
        }
    }

    result
}

/// Generate a random number with exactly N digits.
fn generate_random_digits<R: Rng + ?Sized>(rng: &mut R, digits: usize) -> String {
    if digits == 0 {
        return String::new();
    }

    let mut result = String::with_capacity(digits);
    // First digit is 1-9 to avoid leading zeros
    result.push(char::from(b'0' + rng.gen_range(1..10u8)));
    for _ in 1..digits {
        result.push(char::from(b'0' + rng.gen_range(0..10u8)));
    }
    result
}
