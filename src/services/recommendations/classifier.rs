use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use super::ranking_config::RankingConfig;
use crate::models::{PlaceCategory, RecommendationCandidate, Tag, TravelPlanQuery};

/// Tags a traveler uses to say "show me anything"
pub const BROAD_MARKER_TAGS: [&str; 4] = ["anything", "everything", "surprise_me", "general"];

/// How strictly candidates are admitted for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryClass {
    /// A few explicitly picked categories: admit everything in them
    SpecificCategory,
    /// Broad request: admit well-rated or matching places, then diversify
    General,
    /// Admit only tag matches or outstanding places
    Mixed,
}

impl QueryClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryClass::SpecificCategory => "specific_category",
            QueryClass::General => "general",
            QueryClass::Mixed => "mixed",
        }
    }
}

pub fn classify(
    query: &TravelPlanQuery,
    resolved_categories: &[PlaceCategory],
    preferred_tags: &BTreeSet<Tag>,
    config: &RankingConfig,
) -> QueryClass {
    if query.has_explicit_categories()
        && query.categories.as_ref().map_or(0, |c| c.len()) <= config.specific_max_categories
    {
        return QueryClass::SpecificCategory;
    }

    let has_broad_marker = preferred_tags
        .iter()
        .any(|tag| BROAD_MARKER_TAGS.contains(&tag.as_str()));

    if resolved_categories.len() >= config.general_min_categories
        || has_broad_marker
        || preferred_tags.len() <= config.general_max_preferred_tags
    {
        QueryClass::General
    } else {
        QueryClass::Mixed
    }
}

/// Candidates admitted for a query class
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub candidates: Vec<RecommendationCandidate>,
    /// True when nothing passed the class rules and the rating fallback ran
    pub used_fallback: bool,
}

pub fn filter_candidates(
    class: QueryClass,
    candidates: Vec<RecommendationCandidate>,
    explicit_categories: Option<&BTreeSet<PlaceCategory>>,
    config: &RankingConfig,
) -> FilterOutcome {
    let admitted: Vec<RecommendationCandidate> = candidates
        .iter()
        .filter(|c| admits(class, c, explicit_categories, config))
        .cloned()
        .collect();

    if !admitted.is_empty() || candidates.is_empty() {
        return FilterOutcome {
            candidates: admitted,
            used_fallback: false,
        };
    }

    // Nothing passed: fall back to any well-rated place, ignoring class rules
    let fallback: Vec<RecommendationCandidate> = candidates
        .into_iter()
        .filter(|c| c.average_rating() >= config.fallback_min_rating)
        .collect();

    tracing::debug!(
        class = class.as_str(),
        fallback_count = fallback.len(),
        "No candidates passed classification, using rating fallback"
    );

    FilterOutcome {
        candidates: fallback,
        used_fallback: true,
    }
}

fn admits(
    class: QueryClass,
    candidate: &RecommendationCandidate,
    explicit_categories: Option<&BTreeSet<PlaceCategory>>,
    config: &RankingConfig,
) -> bool {
    match class {
        QueryClass::SpecificCategory => {
            explicit_categories.is_some_and(|categories| categories.contains(&candidate.category()))
        }
        QueryClass::General => {
            candidate.average_rating() >= config.general_min_rating || candidate.tag_confidence > 0.0
        }
        QueryClass::Mixed => {
            candidate.tag_confidence > 0.0 || candidate.average_rating() >= config.mixed_min_rating
        }
    }
}

fn diversity_key(candidate: &RecommendationCandidate) -> f64 {
    candidate.average_rating() + candidate.social_trust_boost
}

/// Spreads a general query's candidates across categories
///
/// Takes the best candidate of each category (by rating plus social boost)
/// until `diversity_max_categories` are covered, then tops up with the next
/// best regardless of category, up to `diversity_max_results`. The category
/// representatives come first, in pick order, followed by the top-up. Lists
/// of `diversity_min_candidates` or fewer are returned unchanged.
pub fn diversify(
    mut candidates: Vec<RecommendationCandidate>,
    config: &RankingConfig,
) -> Vec<RecommendationCandidate> {
    if candidates.len() <= config.diversity_min_candidates {
        return candidates;
    }

    candidates.sort_by(|a, b| {
        diversity_key(b)
            .partial_cmp(&diversity_key(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.place.name.cmp(&b.place.name))
            .then_with(|| a.place.id.cmp(&b.place.id))
    });

    let total = candidates.len();
    let mut covered: HashSet<PlaceCategory> = HashSet::new();
    let mut representatives = Vec::new();
    let mut rest = Vec::new();

    for candidate in candidates {
        if covered.len() < config.diversity_max_categories
            && representatives.len() < config.diversity_max_results
            && covered.insert(candidate.category())
        {
            representatives.push(candidate);
        } else {
            rest.push(candidate);
        }
    }

    let fill = config
        .diversity_max_results
        .saturating_sub(representatives.len());
    let mut diversified = representatives;
    diversified.extend(rest.into_iter().take(fill));

    tracing::debug!(
        before = total,
        after = diversified.len(),
        categories = covered.len(),
        "Diversified general query"
    );

    diversified
}

/// Orders candidates by ranking score, best first
///
/// Ties go to the higher average rating, then to name and id so that the
/// output is stable between requests.
pub fn rank(candidates: &mut [RecommendationCandidate]) {
    candidates.sort_by(|a, b| {
        b.final_ranking_score
            .partial_cmp(&a.final_ranking_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.average_rating()
                    .partial_cmp(&a.average_rating())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.place.name.cmp(&b.place.name))
            .then_with(|| a.place.id.cmp(&b.place.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DestinationArea, Place, PlaceSignal, TravelType};
    use uuid::Uuid;

    fn config() -> RankingConfig {
        RankingConfig::default()
    }

    fn query(categories: Option<&[PlaceCategory]>, tags: &[&str]) -> TravelPlanQuery {
        TravelPlanQuery {
            categories: categories.map(|c| c.iter().copied().collect()),
            destination_area: "Lisbon".to_string(),
            experience_tags: tags.iter().map(|t| t.to_string()).collect(),
            travel_type: TravelType::Couple,
        }
    }

    fn tagset(values: &[&str]) -> BTreeSet<Tag> {
        values.iter().map(|t| t.to_string()).collect()
    }

    fn candidate(
        name: &str,
        category: PlaceCategory,
        rating: f64,
        tag_confidence: f64,
        final_score: f64,
    ) -> RecommendationCandidate {
        RecommendationCandidate {
            place: Place {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category,
                city: "Lisbon".to_string(),
                coordinates: None,
                description: None,
                verified: false,
                created_at: None,
            },
            signal: PlaceSignal {
                average_rating: rating,
                review_count: 3,
                ..PlaceSignal::default()
            },
            matching_tags: BTreeSet::new(),
            tag_confidence,
            social_trust_boost: 0.0,
            popularity_score: 0.0,
            novelty_score: 0.5,
            quality_score: rating / 5.0,
            final_ranking_score: final_score,
        }
    }

    #[test]
    fn test_classify_specific_category() {
        let q = query(Some(&[PlaceCategory::Restaurant][..]), &["rooftop", "seafood", "views"]);
        let class = classify(&q, &[PlaceCategory::Restaurant], &q.preferred_tags(), &config());
        assert_eq!(class, QueryClass::SpecificCategory);
    }

    #[test]
    fn test_classify_empty_explicit_set_is_not_specific() {
        let q = query(Some(&[][..]), &["rooftop", "seafood", "views"]);
        let class = classify(&q, &[PlaceCategory::Cafe], &q.preferred_tags(), &config());
        assert_eq!(class, QueryClass::Mixed);
    }

    #[test]
    fn test_classify_many_explicit_categories_is_not_specific() {
        let categories = [
            PlaceCategory::Restaurant,
            PlaceCategory::Bar,
            PlaceCategory::Cafe,
            PlaceCategory::Park,
        ];
        let q = query(Some(&categories[..]), &["rooftop", "seafood", "views"]);
        let class = classify(&q, &categories, &q.preferred_tags(), &config());
        assert_eq!(class, QueryClass::Mixed);
    }

    #[test]
    fn test_classify_general_by_category_count() {
        let q = query(None, &["rooftop", "seafood", "views"]);
        let class = classify(&q, &DestinationArea::DEFAULT_CATEGORIES, &q.preferred_tags(), &config());
        assert_eq!(class, QueryClass::General);
    }

    #[test]
    fn test_classify_general_by_broad_marker() {
        let q = query(None, &["surprise_me", "seafood", "views"]);
        let class = classify(&q, &[PlaceCategory::Cafe], &q.preferred_tags(), &config());
        assert_eq!(class, QueryClass::General);
    }

    #[test]
    fn test_classify_general_by_few_tags() {
        let q = query(None, &[]);
        let class = classify(&q, &[PlaceCategory::Cafe], &tagset(&["quiet"]), &config());
        assert_eq!(class, QueryClass::General);
    }

    #[test]
    fn test_classify_mixed() {
        let q = query(None, &["rooftop", "seafood", "views"]);
        let class = classify(
            &q,
            &[PlaceCategory::Cafe, PlaceCategory::Restaurant],
            &q.preferred_tags(),
            &config(),
        );
        assert_eq!(class, QueryClass::Mixed);
    }

    #[test]
    fn test_specific_admits_every_candidate_in_category() {
        let explicit: BTreeSet<PlaceCategory> = [PlaceCategory::Restaurant].into_iter().collect();
        let candidates = vec![
            candidate("Low", PlaceCategory::Restaurant, 1.5, 0.0, 0.1),
            candidate("High", PlaceCategory::Restaurant, 4.9, 0.0, 0.5),
            candidate("Other", PlaceCategory::Bar, 4.9, 0.5, 0.9),
        ];

        let outcome = filter_candidates(
            QueryClass::SpecificCategory,
            candidates,
            Some(&explicit),
            &config(),
        );

        assert!(!outcome.used_fallback);
        let names: Vec<&str> = outcome.candidates.iter().map(|c| c.place.name.as_str()).collect();
        assert_eq!(names, vec!["Low", "High"]);
    }

    #[test]
    fn test_mixed_excludes_untagged_four_star() {
        let candidates = vec![
            candidate("Untagged", PlaceCategory::Restaurant, 4.0, 0.0, 0.4),
            candidate("Tagged", PlaceCategory::Restaurant, 3.0, 0.25, 0.4),
            candidate("Outstanding", PlaceCategory::Restaurant, 4.5, 0.0, 0.4),
        ];

        let outcome = filter_candidates(QueryClass::Mixed, candidates, None, &config());
        let names: Vec<&str> = outcome.candidates.iter().map(|c| c.place.name.as_str()).collect();
        assert_eq!(names, vec!["Tagged", "Outstanding"]);
    }

    #[test]
    fn test_general_admits_rated_or_tagged() {
        let candidates = vec![
            candidate("Rated", PlaceCategory::Cafe, 3.5, 0.0, 0.4),
            candidate("Tagged", PlaceCategory::Cafe, 2.0, 0.1, 0.4),
            candidate("Neither", PlaceCategory::Cafe, 3.4, 0.0, 0.4),
        ];

        let outcome = filter_candidates(QueryClass::General, candidates, None, &config());
        assert_eq!(outcome.candidates.len(), 2);
    }

    #[test]
    fn test_fallback_admits_four_star_places() {
        let candidates = vec![
            candidate("Good", PlaceCategory::Museum, 4.2, 0.0, 0.4),
            candidate("Average", PlaceCategory::Museum, 3.9, 0.0, 0.4),
        ];

        let outcome = filter_candidates(QueryClass::Mixed, candidates, None, &config());
        assert!(outcome.used_fallback);
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].place.name, "Good");
    }

    #[test]
    fn test_fallback_can_be_empty() {
        let candidates = vec![candidate("Weak", PlaceCategory::Museum, 2.0, 0.0, 0.1)];
        let outcome = filter_candidates(QueryClass::Mixed, candidates, None, &config());
        assert!(outcome.used_fallback);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn test_no_candidates_no_fallback() {
        let outcome = filter_candidates(QueryClass::Mixed, Vec::new(), None, &config());
        assert!(!outcome.used_fallback);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn test_diversify_skips_small_lists() {
        let candidates: Vec<_> = (0..5)
            .map(|i| candidate(&format!("Cafe {}", i), PlaceCategory::Cafe, 4.0, 0.0, 0.5))
            .collect();
        assert_eq!(diversify(candidates, &config()).len(), 5);
    }

    #[test]
    fn test_diversify_picks_best_per_category_first() {
        let mut candidates: Vec<_> = (0..20)
            .map(|i| {
                candidate(
                    &format!("Cafe {:02}", i),
                    PlaceCategory::Cafe,
                    5.0 - i as f64 * 0.01,
                    0.0,
                    0.5,
                )
            })
            .collect();
        candidates.push(candidate("Museum", PlaceCategory::Museum, 3.6, 0.0, 0.5));
        candidates.push(candidate("Park", PlaceCategory::Park, 3.7, 0.0, 0.5));

        let diversified = diversify(candidates, &config());

        assert_eq!(diversified.len(), 15);
        let names: Vec<&str> = diversified.iter().map(|c| c.place.name.as_str()).collect();
        assert!(names.contains(&"Museum"));
        assert!(names.contains(&"Park"));
        assert!(names.contains(&"Cafe 00"));
        // Fill continues with the best remaining cafes
        assert!(names.contains(&"Cafe 12"));
        assert!(!names.contains(&"Cafe 13"));
    }

    #[test]
    fn test_diversify_puts_one_per_category_first() {
        let mut candidates: Vec<_> = (0..12)
            .map(|i| candidate(&format!("Cafe {:02}", i), PlaceCategory::Cafe, 5.0, 0.0, 0.5))
            .collect();
        candidates.push(candidate("Museum", PlaceCategory::Museum, 3.6, 0.0, 0.1));
        candidates.push(candidate("Park", PlaceCategory::Park, 3.7, 0.0, 0.1));

        let diversified = diversify(candidates, &config());

        let names: Vec<&str> = diversified.iter().take(3).map(|c| c.place.name.as_str()).collect();
        assert_eq!(names, vec!["Cafe 00", "Park", "Museum"]);
        let top: HashSet<PlaceCategory> = diversified.iter().take(10).map(|c| c.category()).collect();
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_diversify_caps_category_pass() {
        let categories = PlaceCategory::ALL;
        let candidates: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| candidate(&format!("P{:02}", i), *category, 4.0, 0.0, 0.5))
            .collect();

        let diversified = diversify(candidates, &config());
        // 13 categories, but only 10 are covered in the first pass; fill adds 3 more
        assert_eq!(diversified.len(), 13);
    }

    #[test]
    fn test_rank_orders_by_score_then_rating() {
        let mut candidates = vec![
            candidate("B", PlaceCategory::Cafe, 4.0, 0.0, 0.5),
            candidate("A", PlaceCategory::Cafe, 4.5, 0.0, 0.5),
            candidate("C", PlaceCategory::Cafe, 3.0, 0.0, 0.9),
        ];
        rank(&mut candidates);
        let names: Vec<&str> = candidates.iter().map(|c| c.place.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
