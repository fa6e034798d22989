use std::hash::Hasher;
use std::io;

use plan_schema::{MapCard, PlanOutput, ScenarioCard};
use serde::Serialize;

/// A deterministic FNV-1a 64-bit hasher.
///
/// `DefaultHasher` is randomized per process, so plan digests use this instead.
#[derive(Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

impl io::Write for FnvHasher {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Hasher::write(self, buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct DigestView<'a> {
    id: &'a str,
    map_card: &'a MapCard,
    scenario_cards: &'a [ScenarioCard],
}

/// Content hash of a plan, ignoring `meta.generatedAt`.
pub fn plan_digest(plan: &PlanOutput) -> Result<u64, serde_json::Error> {
    let view = DigestView {
        id: &plan.meta.id,
        map_card: &plan.map_card,
        scenario_cards: &plan.scenario_cards,
    };
    let mut hasher = FnvHasher::new();
    serde_json::to_writer(&mut hasher, &view)?;
    Ok(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vector() {
        let mut hasher = FnvHasher::new();
        Hasher::write(&mut hasher, b"a");
        assert_eq!(hasher.finish(), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn empty_input_is_offset_basis() {
        assert_eq!(FnvHasher::new().finish(), 0xcbf29ce484222325);
    }
}
