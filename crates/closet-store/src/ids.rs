//! Record id generation.
//!
//! Ids are a one-letter prefix followed by a millisecond stamp: `p` for
//! pieces, `o` for outfits, `w` for wear logs. Stamps are strictly
//! increasing within one generator, so two records created in the same
//! millisecond still get distinct ids.

use chrono::Utc;

pub const PIECE_PREFIX: char = 'p';
pub const OUTFIT_PREFIX: char = 'o';
pub const WEAR_PREFIX: char = 'w';

#[derive(Debug, Default)]
pub struct IdGenerator {
    last_stamp: i64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id with `prefix` for which `taken` is false.
    pub fn next(&mut self, prefix: char, taken: impl Fn(&str) -> bool) -> String {
        let mut stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        loop {
            let id = format!("{prefix}{stamp}");
            if !taken(&id) {
                self.last_stamp = stamp;
                return id;
            }
            stamp += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn ids_carry_prefix() {
        let mut ids = IdGenerator::new();
        let id = ids.next(PIECE_PREFIX, |_| false);
        assert!(id.starts_with('p'));
        assert!(id[1..].parse::<i64>().is_ok());
    }

    #[test]
    fn skips_ids_already_taken() {
        let mut ids = IdGenerator::new();
        let first = ids.next(OUTFIT_PREFIX, |_| false);
        let stamp: i64 = first[1..].parse().unwrap();
        let blocked = format!("o{}", stamp + 1);

        let second = ids.next(OUTFIT_PREFIX, |id| id == blocked);
        assert_ne!(second, blocked);
        assert_eq!(second, format!("o{}", stamp + 2));
    }

    proptest! {
        #[test]
        fn rapid_ids_never_repeat(n in 1usize..200) {
            let mut ids = IdGenerator::new();
            let mut seen = HashSet::new();
            for _ in 0..n {
                let id = ids.next(WEAR_PREFIX, |_| false);
                prop_assert!(seen.insert(id));
            }
        }
    }
}
