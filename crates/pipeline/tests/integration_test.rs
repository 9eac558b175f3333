//! Integration tests for the pipeline.
//!
//! These tests verify that filters, scorers and sort orders work together
//! in a realistic scenario.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use data_loader::{ContentItem, InteractionKind, InteractionRecord, Location, Profile, TravelWindow, UserType};
use pipeline::filters::*;
use pipeline::{
    build_ranked_content, build_ranked_profiles, sort_content, sort_profiles, CompatibilityScorer,
    CompatibilityTier, FeedbackScorer, FilterPipeline, RankingPolicy,
};
use sources::{ContentCandidate, SeriesDeduplicator};

fn at(m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, m, d, 19, 0, 0).unwrap()
}

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

fn tokens(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn create_viewer() -> Profile {
    let mut viewer = Profile::new("maya");
    viewer.interests = tokens(&["Hiking", "photography", "food"]);
    viewer.activities = tokens(&["surfing", "museums"]);
    viewer.travel_style = Some("backpacker".to_string());
    viewer.age = Some(29);
    viewer.user_type = Some(UserType::Traveler);
    viewer.home = Location::new(Some("Lisbon"), Some("Lisboa"), Some("Portugal"));
    viewer.travel_windows.push(
        TravelWindow::new(
            Location::new(Some("Kyoto"), None, Some("Japan")),
            day(6, 1),
            Some(day(6, 20)),
        )
        .active(),
    );
    viewer
}

fn create_pool() -> Vec<Profile> {
    let mut kenji = Profile::new("kenji");
    kenji.interests = tokens(&["photography", "hiking", "tea"]);
    kenji.activities = tokens(&["Museums"]);
    kenji.travel_style = Some("Backpacker".to_string());
    kenji.age = Some(31);
    kenji.verified = true;
    kenji.user_type = Some(UserType::Local);
    kenji.home = Location::new(Some("Kyoto"), None, Some("Japan"));

    let mut ines = Profile::new("ines");
    ines.interests = tokens(&["food"]);
    ines.age = Some(45);
    ines.home = Location::new(Some("Lisbon"), None, Some("Portugal"));

    let mut tom = Profile::new("tom");
    tom.interests = tokens(&["golf"]);
    tom.home = Location::new(Some("Osaka"), None, Some("Japan"));

    let mut duplicate_kenji = Profile::new("kenji");
    duplicate_kenji.interests = tokens(&["golf"]);

    vec![
        Profile::new(""),
        kenji,
        create_viewer(),
        ines,
        duplicate_kenji,
        tom,
    ]
}

fn people_filters() -> FilterPipeline<Profile> {
    FilterPipeline::new()
        .add_filter(MissingIdFilter)
        .add_filter(DuplicateIdFilter)
        .add_filter(ExcludeViewerFilter)
}

#[test]
fn test_people_pipeline_end_to_end() {
    let viewer = create_viewer();
    let pool = people_filters().apply(create_pool(), &viewer);

    let ids: Vec<_> = pool.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["kenji", "ines", "tom"]);

    let mut ranked = build_ranked_profiles(&viewer, pool, &CompatibilityScorer::new());
    sort_profiles(&mut ranked, RankingPolicy::Compatibility);

    let top = &ranked[0];
    assert_eq!(top.profile.id, "kenji");
    // 2 interests + 1 activity + age + style + verified
    assert_eq!(top.compatibility.score, 20 + 8 + 18 + 15 + 5);
    assert_eq!(top.compatibility.tier, CompatibilityTier::High);
    assert!(top.compatibility.facets.location_overlap);
    assert!(top.compatibility.facets.user_type_compatible);
    assert!(top.compatibility.reasons.len() <= 3);
    assert_eq!(top.distance, 0);

    assert_eq!(ranked[1].profile.id, "ines");
    assert_eq!(ranked[2].profile.id, "tom");
}

#[test]
fn test_closest_nearby_end_to_end() {
    let viewer = create_viewer();
    let pool = people_filters().apply(create_pool(), &viewer);

    let mut ranked = build_ranked_profiles(&viewer, pool, &CompatibilityScorer::new());
    sort_profiles(&mut ranked, RankingPolicy::ClosestNearby);

    // Viewer is in Kyoto: same city, then same country, then elsewhere
    let ids: Vec<_> = ranked.iter().map(|r| r.profile.id.as_str()).collect();
    assert_eq!(ids, vec!["kenji", "tom", "ines"]);
}

fn candidate(item: ContentItem, engaged: bool) -> ContentCandidate {
    ContentCandidate {
        item,
        is_engaged: engaged,
        found_at: "Current trip".to_string(),
    }
}

#[test]
fn test_content_pipeline_end_to_end() {
    let viewer = create_viewer();

    let mut weekly_a = ContentItem::new("walk-jun", "Temple walk", at(6, 10));
    weekly_a.series_id = Some("temple-walk".to_string());
    weekly_a.category = "Hiking".to_string();
    let mut weekly_b = ContentItem::new("walk-jul", "Temple walk", at(7, 10));
    weekly_b.series_id = Some("temple-walk".to_string());
    weekly_b.category = "Hiking".to_string();

    let mut ai_pick = ContentItem::new("ai-ramen", "Ramen crawl", at(6, 15));
    ai_pick.ai_generated = true;
    ai_pick.category = "food".to_string();

    let mut own = ContentItem::new("own-photo", "Photo meetup", at(6, 18));
    own.organizer_id = Some("maya".to_string());
    own.category = "photography".to_string();

    let mut past = ContentItem::new("past", "Old fair", at(5, 1));
    past.category = "food".to_string();

    let deduped = SeriesDeduplicator::new().dedup(vec![weekly_b, ai_pick, weekly_a, own, past]);
    let candidates: Vec<ContentCandidate> = deduped
        .into_iter()
        .map(|item| {
            let engaged = item.id == "ai-ramen";
            candidate(item, engaged)
        })
        .collect();

    let filters = FilterPipeline::new()
        .add_filter(MissingIdFilter)
        .add_filter(UpcomingFilter::new(at(6, 2)));
    let candidates = filters.apply(candidates, &viewer);

    let history = vec![
        InteractionRecord::new("maya", "other-hike", InteractionKind::Like, at(4, 1))
            .with_category("hiking"),
    ];
    let mut ranked = build_ranked_content(&viewer, candidates, &history, &FeedbackScorer::new());
    sort_content(&mut ranked);

    let ids: Vec<_> = ranked.iter().map(|r| r.item.id.as_str()).collect();
    assert_eq!(ids, vec!["ai-ramen", "own-photo", "walk-jun"]);

    let walk = &ranked[2];
    // default 3 + interest match 1 + one like 0.5
    assert_eq!(walk.feedback_score, 4.5);
    assert!(ranked[1].authored_by_viewer);
    assert!(ranked[0].is_engaged);
}
