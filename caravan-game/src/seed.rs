//! Reversible share codes naming a difficulty and a seed.
//! Code format: <DIFF>-<WORD><NN>, e.g., NM-BISON42, HD-FERRY07

use std::fmt;
use std::str::FromStr;

use crate::difficulty::Difficulty;

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "OXEN", "WAGON", "BISON", "PRAIRIE", "RIVER", "FERRY", "CANVAS", "AXLE", "YOKE", "SADDLE",
    "MESA", "BLUFF", "CANYON", "SAGE", "CEDAR", "WILLOW", "ASPEN", "PINE", "ELK", "DEER", "RABBIT",
    "HAWK", "EAGLE", "COYOTE", "BADGER", "BEAVER", "TRAIL", "SCOUT", "PIONEER", "LANTERN",
    "KETTLE", "SKILLET", "BACON", "COFFEE", "FLOUR", "BEANS", "RIFLE", "POWDER", "COMPASS", "FORT",
    "PASS", "SUMMIT", "RIDGE", "VALLEY", "CREEK", "SPRING", "MEADOW", "THUNDER", "DUST", "SUNSET",
    "DAWN", "COMET", "STAR", "MOON", "FROST", "EMBER", "HARVEST", "CHAPEL", "BANJO", "FIDDLE",
    "QUILT", "BONNET", "SPUR", "GRANITE",
];

const WORD_BITS: u16 = 6;
const WORD_MASK: u16 = (1 << WORD_BITS) - 1;
const NN_MASK: u16 = 0x7F;

/// Two-letter code prefix for a difficulty.
#[must_use]
pub const fn prefix(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "EZ",
        Difficulty::Normal => "NM",
        Difficulty::Hard => "HD",
    }
}

fn difficulty_for_prefix(prefix: &str) -> Option<Difficulty> {
    match prefix.trim().to_ascii_uppercase().as_str() {
        "EZ" => Some(Difficulty::Easy),
        "NM" => Some(Difficulty::Normal),
        "HD" => Some(Difficulty::Hard),
        _ => None,
    }
}

#[inline]
const fn pack(word_index: u16, nn: u8) -> u16 {
    (word_index & WORD_MASK) | ((nn as u16 & NN_MASK) << WORD_BITS)
}

#[inline]
const fn unpack(packed: u16) -> (u16, u8) {
    (packed & WORD_MASK, ((packed >> WORD_BITS) & NN_MASK) as u8)
}

fn compose_seed(difficulty: Difficulty, word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let mut buf = [0u8; 11];
    buf[..6].copy_from_slice(b"TRAIL-");
    buf[6..8].copy_from_slice(prefix(difficulty).as_bytes());
    buf[8..10].copy_from_slice(&packed.to_le_bytes());
    buf[10] = 0x5A;
    let hash = fnv1a64(&buf);
    (hash & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the share code for a seed. Only the low bits of the seed show.
#[must_use]
pub fn encode_friendly(difficulty: Difficulty, seed: u64) -> String {
    let (word_index, nn) = unpack((seed & 0xFFFF) as u16);
    let word = WORD_LIST[usize::from(word_index)];
    format!("{}-{word}{:02}", prefix(difficulty), nn % 100)
}

/// Decode a share code back to the difficulty and seed it names.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<(Difficulty, u64)> {
    let (head, rest) = code.trim().split_once('-')?;
    let difficulty = difficulty_for_prefix(head)?;
    if rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let index = WORD_LIST.iter().position(|w| *w == word)?;
    let word_index = u16::try_from(index).ok()?;
    Some((difficulty, compose_seed(difficulty, word_index, nn)))
}

/// Fresh code from arbitrary entropy (clock, OS randomness).
#[must_use]
pub fn generate_code_from_entropy(difficulty: Difficulty, entropy: u64) -> String {
    ShareCode::generate(difficulty, entropy).to_string()
}

/// A parsed share code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShareCode {
    pub difficulty: Difficulty,
    pub seed: u64,
}

impl ShareCode {
    #[must_use]
    pub fn generate(difficulty: Difficulty, entropy: u64) -> Self {
        let word_index = (entropy % WORD_LIST.len() as u64) as u16;
        let nn = ((entropy >> 17) % 100) as u8;
        Self {
            difficulty,
            seed: compose_seed(difficulty, word_index, nn),
        }
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_friendly(self.difficulty, self.seed))
    }
}

impl FromStr for ShareCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_share_code(s).ok_or(())
    }
}

#[must_use]
pub fn parse_share_code(code: &str) -> Option<ShareCode> {
    decode_to_seed(code).map(|(difficulty, seed)| ShareCode { difficulty, seed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_seed_encodes_back_to_the_same_code() {
        let (difficulty, seed) = decode_to_seed("NM-BISON42").unwrap();
        assert_eq!(difficulty, Difficulty::Normal);
        assert_eq!(encode_friendly(difficulty, seed), "NM-BISON42");
    }

    #[test]
    fn codes_are_case_and_space_tolerant() {
        let loose = decode_to_seed("  hd-ferry07 ").unwrap();
        let strict = decode_to_seed("HD-FERRY07").unwrap();
        assert_eq!(loose, strict);
        assert_eq!(loose.0, Difficulty::Hard);
    }

    #[test]
    fn difficulty_separates_seeds() {
        let (_, easy) = decode_to_seed("EZ-OXEN01").unwrap();
        let (_, hard) = decode_to_seed("HD-OXEN01").unwrap();
        assert_ne!(easy, hard);
        assert_eq!(easy & 0xFFFF, hard & 0xFFFF);
    }

    #[test]
    fn rejects_unknown_parts() {
        assert!(decode_to_seed("XX-BISON42").is_none());
        assert!(decode_to_seed("NM-TRACTOR42").is_none());
        assert!(decode_to_seed("NM-BISON4X").is_none());
        assert!(decode_to_seed("NMBISON42").is_none());
        assert!(decode_to_seed("NM-42").is_none());
    }

    #[test]
    fn generated_codes_parse() {
        for entropy in [0, 1, 0xDEAD_BEEF, u64::MAX] {
            let code = generate_code_from_entropy(Difficulty::Easy, entropy);
            let parsed: ShareCode = code.parse().unwrap();
            assert_eq!(parsed.difficulty, Difficulty::Easy);
            assert_eq!(parsed.to_string(), code);
            assert_eq!(ShareCode::generate(Difficulty::Easy, entropy), parsed);
        }
    }
}
