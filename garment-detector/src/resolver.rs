use crate::extractors::{ColorExtractors, ExtractionContext};
use crate::types::{ColorCandidate, ImageReference};
use tracing::{debug, info};

/// Handed to the translation layer when no extractor produced anything.
pub const UNKNOWN_COLOR: &str = "unknown";

/// Frequency vote over normalized tokens; ties go to the earliest candidate.
pub fn vote(candidates: &[ColorCandidate]) -> Option<String> {
    if let [only] = candidates {
        let token = only.token.trim();
        return (!token.is_empty()).then(|| token.to_string());
    }

    // (token, count) in order of first appearance
    let mut tally: Vec<(String, usize)> = Vec::new();
    for candidate in candidates {
        let token = candidate.normalized();
        if token.is_empty() {
            continue;
        }
        match tally.iter_mut().find(|(seen, _)| *seen == token) {
            Some((_, count)) => *count += 1,
            None => tally.push((token, 1)),
        }
    }

    let mut winner: Option<(String, usize)> = None;
    for (token, count) in tally {
        // strictly greater keeps the earliest on ties
        if winner.as_ref().map_or(true, |(_, best)| count > *best) {
            winner = Some((token, count));
        }
    }
    winner.map(|(token, _)| token)
}

/// Merges extractor output into one English color decision.
pub struct CandidateResolver<'a> {
    extractors: &'a ColorExtractors,
}

impl<'a> CandidateResolver<'a> {
    pub fn new(extractors: &'a ColorExtractors) -> Self {
        Self { extractors }
    }

    /// Never empty: falls back to the dominant-color query, then to `UNKNOWN_COLOR`.
    pub async fn resolve(
        &self,
        candidates: &[ColorCandidate],
        image: &ImageReference,
        context: ExtractionContext<'_>,
    ) -> String {
        if let Some(token) = vote(candidates) {
            debug!("Resolved {} candidates to {:?}", candidates.len(), token);
            return token;
        }

        info!("No color candidates, asking for the dominant color");
        match self.extractors.dominant_color(image, context).await {
            Some(candidate) => candidate.normalized(),
            None => {
                info!("Dominant color query failed too, color is {}", UNKNOWN_COLOR);
                UNKNOWN_COLOR.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionMethod;

    fn candidates(tokens: &[&str]) -> Vec<ColorCandidate> {
        let methods = [
            ExtractionMethod::DirectQuery,
            ExtractionMethod::Caption,
            ExtractionMethod::AlternateQuery,
            ExtractionMethod::DominantColor,
        ];
        tokens
            .iter()
            .zip(methods.iter().cycle())
            .map(|(token, method)| ColorCandidate::new(*token, *method))
            .collect()
    }

    #[test]
    fn empty_list_has_no_winner() {
        assert_eq!(vote(&[]), None);
        assert_eq!(vote(&candidates(&["  "])), None);
    }

    #[test]
    fn single_candidate_is_returned() {
        assert_eq!(vote(&candidates(&["Burgundy"])), Some("Burgundy".to_string()));
    }

    #[test]
    fn majority_wins() {
        assert_eq!(vote(&candidates(&["red", "blue", "Blue"])), Some("blue".to_string()));
    }

    #[test]
    fn ties_go_to_the_earliest() {
        assert_eq!(vote(&candidates(&["green", "red"])), Some("green".to_string()));
        assert_eq!(vote(&candidates(&["red", "green", "green", "red"])), Some("red".to_string()));
    }

    #[test]
    fn repeated_votes_agree() {
        let list = candidates(&["grey", "black", "black", "grey", "white"]);
        let first = vote(&list);
        for _ in 0..100 {
            assert_eq!(vote(&list), first);
        }
    }
}
