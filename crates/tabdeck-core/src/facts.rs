//! Cat facts — a fixed local list, one picked at random after a short delay.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::types::Fact;

pub const CAT_FACTS: &[&str] = &[
    "Cats sleep for about 70% of their lives.",
    "The oldest known cat lived to 38 years.",
    "Cats have 32 muscles in each ear.",
    "A cat's nose print is unique, like a human fingerprint.",
    "Cats can make about 100 different sounds, while dogs make only about 10.",
    "Cats have no collarbone, so they can squeeze through very narrow gaps.",
    "A cat named Stubbs was honorary mayor of Talkeetna, Alaska, for 20 years.",
];

#[derive(Debug, Clone)]
pub struct FactGenerator {
    delay: Duration,
}

impl FactGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Uniform pick from [`CAT_FACTS`].
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Fact {
        let index = rng.gen_range(0..CAT_FACTS.len());
        Fact {
            index,
            text: CAT_FACTS[index],
        }
    }

    /// Wait out the simulated latency, then pick.
    pub async fn generate(&self) -> Fact {
        tokio::time::sleep(self.delay).await;
        let fact = self.pick(&mut rand::thread_rng());
        debug!("Picked fact #{}", fact.index + 1);
        fact
    }
}
