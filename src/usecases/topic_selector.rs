//! Picks what the next post is about and who "writes" it.

use crate::domain::{TOPICS, Topic, VOICES, Voice};
use rand::Rng;

/// Uniform, independent pick of one topic and one voice.
pub fn select<R: Rng + ?Sized>(rng: &mut R) -> (Topic, Voice) {
    let topic = Topic::from_index(rng.gen_range(0..TOPICS.len()));
    let voice = Voice::from_index(rng.gen_range(0..VOICES.len()));
    (topic, voice)
}
