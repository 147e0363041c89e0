//! Cross-venue event matching.
//!
//! For every venue A event the matcher picks at most one venue B partner:
//! the highest similarity at or above the threshold, then the closer
//! resolution end, and otherwise nothing. Scoring is pluggable but must
//! be deterministic.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::id::EventId;
use crate::domain::pair::EventPair;
use crate::domain::venue::VenueEvent;

/// Words that carry no identity for a binary question.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "will", "be", "by", "before", "after", "on", "in", "to", "of", "for", "and",
    "or", "is", "at",
];

/// Normalize question text into comparable tokens.
///
/// Lowercases, splits on anything that is not alphanumeric, and drops
/// tokens of two characters or fewer and stopwords.
#[must_use]
pub fn normalize(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 2 && !STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Similarity function between two question texts.
///
/// Implementations must return the same score for the same inputs.
pub trait SimilarityScorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Score in `[0, 1]`.
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Jaccard overlap of normalized token sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardScorer;

impl SimilarityScorer for JaccardScorer {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn score(&self, a: &str, b: &str) -> f64 {
        let a = normalize(a);
        let b = normalize(b);
        let union = a.union(&b).count();
        if union == 0 {
            return 0.0;
        }
        let intersection = a.intersection(&b).count();
        intersection as f64 / union as f64
    }
}

/// Stable hash of what both venues say about resolution.
#[must_use]
pub fn fingerprint(a: &VenueEvent, b: &VenueEvent) -> u64 {
    let mut hasher = DefaultHasher::new();
    normalize(a.question()).hash(&mut hasher);
    a.resolves_at().hash(&mut hasher);
    normalize(b.question()).hash(&mut hasher);
    b.resolves_at().hash(&mut hasher);
    hasher.finish()
}

/// Result of matching two event lists.
#[derive(Debug, Default)]
pub struct MatchReport {
    pub pairs: Vec<EventPair>,
    /// Pairings rejected because candidates tied.
    pub ambiguous: Vec<DomainError>,
    /// Venue A events with no candidate above threshold.
    pub unmatched: usize,
    /// Pairs served from the cache.
    pub cache_hits: usize,
}

#[derive(Debug, Clone)]
struct CachedPairing {
    partner: EventId,
    fingerprint: u64,
    similarity: f64,
}

/// Pairs events across two venues.
pub struct EventMatcher {
    scorer: Box<dyn SimilarityScorer>,
    threshold: f64,
    cache: Option<RwLock<HashMap<EventId, CachedPairing>>>,
}

impl EventMatcher {
    /// Jaccard matcher with the pairing cache enabled.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self::with_scorer(Box::new(JaccardScorer), threshold)
    }

    #[must_use]
    pub fn with_scorer(scorer: Box<dyn SimilarityScorer>, threshold: f64) -> Self {
        Self {
            scorer,
            threshold,
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    /// Disable the cross-scan pairing cache.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Match every venue A event against the venue B list.
    ///
    /// Output order follows the order of `events_a`.
    #[must_use]
    pub fn match_events(&self, events_a: &[VenueEvent], events_b: &[VenueEvent]) -> MatchReport {
        let mut report = MatchReport::default();
        let by_id: HashMap<&EventId, &VenueEvent> = events_b.iter().map(|e| (e.id(), e)).collect();
        self.retain_listed(events_a);

        for a in events_a {
            if let Some(pair) = self.cached_pair(a, &by_id) {
                report.cache_hits += 1;
                report.pairs.push(pair);
                continue;
            }

            match self.best_match(a, events_b) {
                Ok(Some((b, similarity))) => {
                    let fp = fingerprint(a, b);
                    self.remember(a.id(), b.id(), fp, similarity);
                    debug!(
                        a = %a.id(),
                        b = %b.id(),
                        similarity,
                        scorer = self.scorer.name(),
                        "Events paired"
                    );
                    report
                        .pairs
                        .push(EventPair::new(a.clone(), b.clone(), similarity, fp));
                }
                Ok(None) => {
                    self.forget(a.id());
                    report.unmatched += 1;
                }
                Err(err) => {
                    self.forget(a.id());
                    warn!(error = %err, "Skipping ambiguous pairing");
                    report.ambiguous.push(err);
                }
            }
        }

        report
    }

    fn best_match<'b>(
        &self,
        a: &VenueEvent,
        events_b: &'b [VenueEvent],
    ) -> Result<Option<(&'b VenueEvent, f64)>, DomainError> {
        let candidates: Vec<(&VenueEvent, f64)> = events_b
            .iter()
            .map(|b| (b, self.scorer.score(a.question(), b.question())))
            .filter(|(_, score)| *score >= self.threshold)
            .collect();

        let Some(top) = candidates
            .iter()
            .map(|(_, score)| *score)
            .max_by(f64::total_cmp)
        else {
            return Ok(None);
        };

        let tied: Vec<(&VenueEvent, f64)> = candidates
            .into_iter()
            .filter(|(_, score)| *score == top)
            .collect();
        if let [only] = tied.as_slice() {
            return Ok(Some(*only));
        }

        // Closer resolution end wins; an unknown end never wins a tie.
        let distance = |b: &VenueEvent| match (a.resolves_at(), b.resolves_at()) {
            (Some(x), Some(y)) => Some((x - y).num_seconds().unsigned_abs()),
            _ => None,
        };
        let Some(closest) = tied.iter().filter_map(|(b, _)| distance(b)).min() else {
            return Err(DomainError::AmbiguousMatch {
                event_id: a.id().to_string(),
                candidates: tied.len(),
            });
        };

        let nearest: Vec<(&VenueEvent, f64)> = tied
            .into_iter()
            .filter(|(b, _)| distance(b) == Some(closest))
            .collect();
        match nearest.as_slice() {
            [only] => Ok(Some(*only)),
            _ => Err(DomainError::AmbiguousMatch {
                event_id: a.id().to_string(),
                candidates: nearest.len(),
            }),
        }
    }

    fn cached_pair(&self, a: &VenueEvent, by_id: &HashMap<&EventId, &VenueEvent>) -> Option<EventPair> {
        let cache = self.cache.as_ref()?;
        let cached = cache.read().get(a.id()).cloned()?;
        let b = by_id.get(&cached.partner)?;
        if fingerprint(a, b) != cached.fingerprint {
            return None;
        }
        Some(EventPair::new(
            a.clone(),
            (*b).clone(),
            cached.similarity,
            cached.fingerprint,
        ))
    }

    fn remember(&self, a: &EventId, b: &EventId, fingerprint: u64, similarity: f64) {
        if let Some(cache) = &self.cache {
            cache.write().insert(
                a.clone(),
                CachedPairing {
                    partner: b.clone(),
                    fingerprint,
                    similarity,
                },
            );
        }
    }

    /// Drop cached pairings for venue A events no longer listed.
    fn retain_listed(&self, events_a: &[VenueEvent]) {
        if let Some(cache) = &self.cache {
            let listed: HashSet<&EventId> = events_a.iter().map(VenueEvent::id).collect();
            cache.write().retain(|id, _| listed.contains(id));
        }
    }

    /// Cached pairings currently held.
    #[must_use]
    pub fn cached_pairings(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.read().len())
    }

    fn forget(&self, a: &EventId) {
        if let Some(cache) = &self.cache {
            cache.write().remove(a);
        }
    }
}
