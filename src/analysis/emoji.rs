use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::analysis::{EmojiCount, EmojiUsage};

/// Emoticons, misc symbols & pictographs, transport & map, regional
/// indicators, misc symbols, dingbats, supplemental symbols & pictographs.
const EMOJI_CLASS: &str = r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}\x{1F900}-\x{1F9FF}]";

pub fn emoji_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMOJI_CLASS).expect("emoji pattern is valid"))
}

pub fn contains_emoji(text: &str) -> bool {
    emoji_regex().is_match(text)
}

/// Running per-glyph tally that remembers first-encounter order.
#[derive(Debug, Default)]
pub struct EmojiTally {
    total: u32,
    glyphs: Vec<EmojiCount>,
    index: HashMap<String, usize>,
}

impl EmojiTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, text: &str) {
        for m in emoji_regex().find_iter(text) {
            self.total += 1;
            match self.index.get(m.as_str()) {
                Some(&i) => self.glyphs[i].count += 1,
                None => {
                    self.index.insert(m.as_str().to_string(), self.glyphs.len());
                    self.glyphs.push(EmojiCount {
                        emoji: m.as_str().to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn count_of(&self, glyph: &str) -> u32 {
        self.index
            .get(glyph)
            .map(|&i| self.glyphs[i].count)
            .unwrap_or(0)
    }

    pub fn into_usage(self, top_n: usize) -> EmojiUsage {
        let unique_emojis = self.glyphs.len() as u32;
        let mut top = self.glyphs;
        // Stable sort keeps first-encountered order among equal counts
        top.sort_by(|a, b| b.count.cmp(&a.count));
        top.truncate(top_n);

        EmojiUsage {
            count: self.total,
            unique_emojis,
            top_emojis: top,
        }
    }
}
