//! Hero tagline typewriter.
//!
//! A deterministic state machine over the tagline list: each `tick()`
//! returns the next visible prefix and the delay until the following
//! tick. The host owns the timer; the engine never sleeps.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Delay while typing a character.
const TYPING_MS: u64 = 100;

/// Delay while deleting a character.
const DELETING_MS: u64 = 50;

/// Pause at a fully typed or fully deleted word.
const PAUSE_MS: u64 = 2000;

/// The taglines the hero section cycles through.
pub const DEFAULT_TAGLINES: [&str; 5] = [
    "Supercharge Your Browsing Experience",
    "Transform Your Browser Into a Powerhouse",
    "Enhance Your Productivity Online",
    "Unlock Your Browser's Potential",
    "Boost Your Web Workflow",
];

/// One animation step: the text to show and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub text: String,
    pub delay_ms: u64,
}

/// Typewriter state machine.
pub struct Typewriter {
    taglines: Vec<String>,
    current: Vec<char>,
    index: usize,
    deleting: bool,
    rng: SmallRng,
}

impl Typewriter {
    /// Build over a tagline list; an empty list falls back to
    /// [`DEFAULT_TAGLINES`].
    pub fn new(taglines: Vec<String>) -> Self {
        Self::with_rng(taglines, SmallRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(taglines: Vec<String>, seed: u64) -> Self {
        Self::with_rng(taglines, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(taglines: Vec<String>, mut rng: SmallRng) -> Self {
        let taglines = if taglines.is_empty() {
            DEFAULT_TAGLINES.iter().map(|s| s.to_string()).collect()
        } else {
            taglines
        };
        let first = taglines[rng.gen_range(0..taglines.len())].chars().collect();
        Self {
            taglines,
            current: first,
            index: 0,
            deleting: false,
            rng,
        }
    }

    /// The tagline currently being typed or deleted.
    pub fn current_tagline(&self) -> String {
        self.current.iter().collect()
    }

    /// Advance one step.
    pub fn tick(&mut self) -> Tick {
        if self.deleting {
            self.index -= 1;
            let text = self.prefix();
            if self.index == 0 {
                self.deleting = false;
                self.pick_next();
                Tick {
                    text,
                    delay_ms: PAUSE_MS,
                }
            } else {
                Tick {
                    text,
                    delay_ms: DELETING_MS,
                }
            }
        } else {
            self.index += 1;
            let text = self.prefix();
            if self.index == self.current.len() {
                self.deleting = true;
                Tick {
                    text,
                    delay_ms: PAUSE_MS,
                }
            } else {
                Tick {
                    text,
                    delay_ms: TYPING_MS,
                }
            }
        }
    }

    fn prefix(&self) -> String {
        self.current[..self.index].iter().collect()
    }

    /// Pick the next tagline at random, never repeating the current one
    /// while more than one is available.
    fn pick_next(&mut self) {
        let current: String = self.current.iter().collect();
        loop {
            let candidate = &self.taglines[self.rng.gen_range(0..self.taglines.len())];
            if *candidate != current || self.taglines.len() == 1 {
                self.current = candidate.chars().collect();
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taglines() -> Vec<String> {
        vec!["ab".to_string(), "cd".to_string()]
    }

    #[test]
    fn test_types_then_pauses() {
        let mut tw = Typewriter::with_seed(taglines(), 1);
        let word = tw.current_tagline();

        let first = tw.tick();
        assert_eq!(first.text, word[..1]);
        assert_eq!(first.delay_ms, TYPING_MS);

        let second = tw.tick();
        assert_eq!(second.text, word);
        // Fully typed: long pause before deletion begins.
        assert_eq!(second.delay_ms, PAUSE_MS);
    }

    #[test]
    fn test_deletes_then_switches_tagline() {
        let mut tw = Typewriter::with_seed(taglines(), 1);
        let word = tw.current_tagline();

        tw.tick();
        tw.tick();

        let deleting = tw.tick();
        assert_eq!(deleting.text, word[..1]);
        assert_eq!(deleting.delay_ms, DELETING_MS);

        let emptied = tw.tick();
        assert_eq!(emptied.text, "");
        assert_eq!(emptied.delay_ms, PAUSE_MS);

        // With two taglines the next word is always the other one.
        assert_ne!(tw.current_tagline(), word);
    }

    #[test]
    fn test_single_tagline_repeats() {
        let mut tw = Typewriter::with_seed(vec!["xy".to_string()], 3);
        for _ in 0..8 {
            tw.tick();
        }
        assert_eq!(tw.current_tagline(), "xy");
    }

    #[test]
    fn test_empty_list_uses_defaults() {
        let tw = Typewriter::with_seed(Vec::new(), 0);
        assert!(DEFAULT_TAGLINES.contains(&tw.current_tagline().as_str()));
    }
}
