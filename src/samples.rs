use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Ham,
    Spam,
}

pub const HAM_SAMPLES: [&str; 3] = [
    "Hey, are we still meeting at 3pm tomorrow?",
    "Thanks for your help with the project",
    "Don't forget to bring the documents",
];

pub const SPAM_SAMPLES: [&str; 3] = [
    "WINNER! You have won $1000! Click here NOW!!!",
    "FREE iPhone! Call this number immediately",
    "Congratulations! You have been selected for a prize",
];

impl Category {
    pub fn pool(self) -> &'static [&'static str] {
        match self {
            Category::Ham => &HAM_SAMPLES,
            Category::Spam => &SPAM_SAMPLES,
        }
    }

    /// Uniform pick from the category's pool.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        let pool = self.pool();
        pool.choose(rng).copied().unwrap_or(pool[0])
    }
}
