// Term selection: ranking, truncation, normalization and tier binning.
//
// Tiers are contiguous blocks over the ranked list, sized by percentage of
// the selected term count. Each block gets floor(N * pct / 100) slots and
// the rounding remainder goes to the last tier, so every term gets exactly
// one tier and a better-ranked term never lands in a worse tier.

use serde::Serialize;
use tracing::info;

use super::tficf::ScoredTerm;
use crate::error::PipelineError;

/// A selected term with its importance tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTerm {
    pub term: String,
    /// TF-ICF score
    pub raw_score: f64,
    /// Share of the total score mass of the selected terms (0.0 to 1.0)
    pub score: f64,
    /// Importance tier, 1 = most important
    pub tier: u32,
}

/// Check that tier percentages are usable: at least one tier, summing to 100.
pub fn validate_tiers(percentages: &[u32]) -> Result<(), PipelineError> {
    if percentages.is_empty() {
        return Err(PipelineError::InvalidConfig(
            "at least one tier percentage is required".to_string(),
        ));
    }
    let total: u32 = percentages.iter().sum();
    if total != 100 {
        return Err(PipelineError::InvalidConfig(format!(
            "tier percentages must sum to 100, got {total}"
        )));
    }
    Ok(())
}

/// Slot count of each tier for `n` ranked terms.
///
/// Integer arithmetic, so 30% of 10 is exactly 3. The remainder lands in the
/// last tier.
pub fn tier_sizes(n: usize, percentages: &[u32]) -> Vec<usize> {
    let mut sizes: Vec<usize> = percentages
        .iter()
        .map(|&pct| n * pct as usize / 100)
        .collect();
    let assigned: usize = sizes.iter().sum();
    if let Some(last) = sizes.last_mut() {
        *last += n.saturating_sub(assigned);
    }
    sizes
}

/// Tier number (1-based) for each of `n` ranked positions.
pub fn assign_tiers(n: usize, percentages: &[u32]) -> Vec<u32> {
    tier_sizes(n, percentages)
        .into_iter()
        .enumerate()
        .flat_map(|(i, size)| std::iter::repeat_n(i as u32 + 1, size))
        .collect()
}

/// Rank scored terms, keep the top `top_n`, normalize and assign tiers.
///
/// Ties on score keep first-occurrence order.
pub fn select_terms(
    mut scored: Vec<ScoredTerm>,
    top_n: usize,
    percentages: &[u32],
) -> Result<Vec<RankedTerm>, PipelineError> {
    validate_tiers(percentages)?;

    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    scored.truncate(top_n);

    if scored.is_empty() {
        return Err(PipelineError::NoTerms);
    }

    let sum_scores: f64 = scored.iter().map(|s| s.score).sum();
    if sum_scores == 0.0 {
        return Err(PipelineError::Normalization);
    }

    let tiers = assign_tiers(scored.len(), percentages);

    let ranked: Vec<RankedTerm> = scored
        .into_iter()
        .zip(tiers)
        .map(|(s, tier)| RankedTerm {
            score: s.score / sum_scores,
            raw_score: s.score,
            term: s.term,
            tier,
        })
        .collect();

    info!(
        selected = ranked.len(),
        top_term = %ranked[0].term,
        top_score = ranked[0].score,
        "Selected top terms"
    );

    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [u32; 5] = [30, 30, 25, 10, 5];

    fn scored(entries: &[(&str, f64)]) -> Vec<ScoredTerm> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (term, score))| ScoredTerm {
                term: term.to_string(),
                score: *score,
                first_seen: i,
            })
            .collect()
    }

    #[test]
    fn test_tier_sizes_ten() {
        assert_eq!(tier_sizes(10, &TIERS), vec![3, 3, 2, 1, 1]);
    }

    #[test]
    fn test_tier_sizes_remainder_to_last() {
        // 7 * 30% = 2.1, 7 * 25% = 1.75, 7 * 10% = 0.7, 7 * 5% = 0.35
        assert_eq!(tier_sizes(7, &TIERS), vec![2, 2, 1, 0, 2]);
    }

    #[test]
    fn test_tier_sizes_two() {
        assert_eq!(tier_sizes(2, &TIERS), vec![0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_assign_tiers_contiguous() {
        assert_eq!(assign_tiers(10, &TIERS), vec![1, 1, 1, 2, 2, 2, 3, 3, 4, 5]);
    }

    #[test]
    fn test_select_orders_and_normalizes() {
        let ranked = select_terms(scored(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]), 500, &TIERS).unwrap();
        let terms: Vec<&str> = ranked.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["b", "c", "a"]);
        assert!((ranked[0].score - 0.5).abs() < 1e-12);
        let total: f64 = ranked.iter().map(|r| r.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let ranked = select_terms(
            scored(&[("zeta", 1.0), ("alpha", 2.0), ("mid", 1.0), ("beta", 2.0)]),
            500,
            &TIERS,
        )
        .unwrap();
        let terms: Vec<&str> = ranked.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["alpha", "beta", "zeta", "mid"]);
    }

    #[test]
    fn test_truncation() {
        let entries: Vec<(String, f64)> = (0..20).map(|i| (format!("t{i}"), i as f64 + 1.0)).collect();
        let refs: Vec<(&str, f64)> = entries.iter().map(|(t, s)| (t.as_str(), *s)).collect();
        let ranked = select_terms(scored(&refs), 5, &TIERS).unwrap();
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].term, "t19");
        // Normalization is over the kept terms only
        let total: f64 = ranked.iter().map(|r| r.score).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mass_fails() {
        let result = select_terms(scored(&[("a", 0.0), ("b", 0.0)]), 500, &TIERS);
        assert!(matches!(result, Err(PipelineError::Normalization)));
    }

    #[test]
    fn test_empty_fails() {
        let result = select_terms(Vec::new(), 500, &TIERS);
        assert!(matches!(result, Err(PipelineError::NoTerms)));
    }

    #[test]
    fn test_invalid_tiers() {
        assert!(validate_tiers(&[]).is_err());
        assert!(validate_tiers(&[50, 40]).is_err());
        assert!(validate_tiers(&[100]).is_ok());
        let result = select_terms(scored(&[("a", 1.0)]), 500, &[60, 60]);
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
    }
}
