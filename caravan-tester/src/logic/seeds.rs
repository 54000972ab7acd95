use anyhow::{Context, Result, bail};
use caravan_game::seed::{self, WORD_LIST};
use caravan_game::{Difficulty, encode_friendly, parse_share_code};
use std::collections::HashMap;

/// Seed metadata used for batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
    /// Difficulty named by the share code, if the seed came from one.
    pub source_difficulty: Option<Difficulty>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            code: None,
            source_difficulty: None,
        }
    }

    #[must_use]
    pub fn from_share_code(seed: u64, difficulty: Difficulty, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
            source_difficulty: Some(difficulty),
        }
    }

    /// Share-code seeds only run at the difficulty they name.
    #[must_use]
    pub fn matches_difficulty(&self, difficulty: Difficulty) -> bool {
        self.source_difficulty.is_none_or(|source| source == difficulty)
    }

    #[must_use]
    pub fn share_code_for(&self, difficulty: Difficulty) -> String {
        if let (Some(code), Some(source)) = (&self.code, self.source_difficulty)
            && source == difficulty
        {
            return code.clone();
        }
        encode_friendly(difficulty, self.seed)
    }
}

/// Resolve CLI seed tokens into canonical seed metadata.
///
/// Accepts integers, share codes, and `all` (every share code at every
/// difficulty). Duplicates collapse, keeping the share-code form.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }
        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }
        if let Some(code) = parse_share_code(token) {
            pending.push(SeedInfo::from_share_code(
                code.seed,
                code.difficulty,
                token.trim().to_uppercase(),
            ));
            continue;
        }
        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(all_share_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<(u64, Option<Difficulty>), usize> = HashMap::new();
    for info in pending {
        let key = (info.seed, info.source_difficulty);
        if let Some(&existing) = index.get(&key) {
            if deduped[existing].code.is_none() && info.code.is_some() {
                deduped[existing] = info;
            }
        } else {
            index.insert(key, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1848));
    }
    Ok(deduped)
}

fn all_share_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100 * Difficulty::ALL.len());
    for difficulty in Difficulty::ALL {
        let prefix = seed::prefix(difficulty);
        for word in WORD_LIST {
            for suffix in 0..100 {
                let code = format!("{prefix}-{word}{suffix:02}");
                let parsed = parse_share_code(&code)
                    .with_context(|| format!("failed to parse share code: {code}"))?;
                seeds.push(SeedInfo::from_share_code(parsed.seed, parsed.difficulty, code));
            }
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_share_code() {
        let raw = vec!["42".to_string(), "-7".to_string(), "hd-bison42".to_string()];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        let coded = seeds
            .iter()
            .find(|s| s.code.as_deref() == Some("HD-BISON42"))
            .unwrap();
        assert!(coded.matches_difficulty(Difficulty::Hard));
        assert!(!coded.matches_difficulty(Difficulty::Easy));
        assert_eq!(coded.share_code_for(Difficulty::Hard), "HD-BISON42");
    }

    #[test]
    fn duplicates_collapse() {
        let raw = vec!["5".to_string(), "5".to_string()];
        assert_eq!(resolve_seed_inputs(&raw).unwrap().len(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(resolve_seed_inputs(&["not-a-seed".to_string()]).is_err());
    }

    #[test]
    fn empty_input_gets_a_default() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1848)]);
    }

    #[test]
    fn expands_all_share_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert_eq!(seeds.len(), WORD_LIST.len() * 100 * Difficulty::ALL.len());
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }
}
