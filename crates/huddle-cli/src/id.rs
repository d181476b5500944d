//! Plan id generation.

/// Random bytes per plan id; ids are twice as many hex characters.
const PLAN_ID_BYTES: usize = 8;

/// Generate a fresh plan id: 16 lowercase hex characters.
pub fn generate_plan_id() -> String {
    use rand::Rng;
    let mut bytes = [0u8; PLAN_ID_BYTES];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_id_is_sixteen_hex_chars() {
        let id = generate_plan_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn plan_ids_differ() {
        assert_ne!(generate_plan_id(), generate_plan_id());
    }
}
