use rand::distributions::Alphanumeric;
use rand::Rng;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use shared::CONNECTION_ID_LEN;

// Get current timestamp in milliseconds
pub fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

// Random alphanumeric token of the given length
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

// Collectible ids: hex millisecond timestamp followed by 16 random characters
pub fn generate_collectible_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("{:x}{}", get_timestamp(), generate_token(rng, 16))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_token_length_and_charset() {
        let mut rng = StdRng::seed_from_u64(7);
        let token = generate_token(&mut rng, CONNECTION_ID_LEN);
        assert_eq!(token.len(), CONNECTION_ID_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_collectible_id_is_time_prefixed() {
        let mut rng = StdRng::seed_from_u64(7);
        let before = format!("{:x}", get_timestamp());
        let id = generate_collectible_id(&mut rng);

        assert!(id.len() >= before.len() + 16);
        let prefix = &id[..id.len() - 16];
        assert!(u64::from_str_radix(prefix, 16).is_ok());
    }

    #[test]
    fn test_collectible_ids_differ() {
        let mut rng = StdRng::seed_from_u64(99);
        let a = generate_collectible_id(&mut rng);
        let b = generate_collectible_id(&mut rng);
        assert_ne!(a, b);
    }
}
