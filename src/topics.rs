use rand::seq::SliceRandom;
use rand::Rng;

/// How many prompts one generation shows
pub const TOPICS_PER_ROUND: usize = 5;

/// Draws conversation prompts for the "viewing" exercise
#[derive(Debug, Clone)]
pub struct TopicGenerator {
    pool: Vec<String>,
    current: Vec<String>,
}

impl TopicGenerator {
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            current: Vec::new(),
        }
    }

    /// Replace the current set with a fresh uniform draw without repeats.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[String] {
        let mut shuffled = self.pool.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(TOPICS_PER_ROUND);
        self.current = shuffled;
        &self.current
    }

    pub fn current(&self) -> &[String] {
        &self.current
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}
