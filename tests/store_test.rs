//! Scenario tests against the in-memory backend: rating arithmetic under
//! concurrency, blog lifecycle, SEO pages and testimonial moderation.

use serde_json::json;
use std::sync::Arc;

use roost::content::{IntakeStore, ProjectStore};
use roost::db::schemas::{RatingInput, TestimonialSubmissionInput};
use roost::fanout::FanoutHub;
use roost::site::store::fill_blog_defaults;
use roost::site::SiteStore;

fn rating(name: &str, email: &str, stars: u8) -> RatingInput {
    serde_json::from_value(json!({
        "userName": name,
        "userEmail": email,
        "rating": stars,
    }))
    .unwrap()
}

async fn one_project(store: &ProjectStore) -> String {
    let input = serde_json::from_value(json!({ "title": "Neon Odyssey", "type": "3D" })).unwrap();
    store.create(input).await.unwrap().id
}

#[tokio::test]
async fn concurrent_ratings_both_land() {
    let store = Arc::new(ProjectStore::memory_only());
    let id = one_project(&store).await;

    let a = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.rate(&id, rating("A", "a@example.com", 3), None).await })
    };
    let b = {
        let store = Arc::clone(&store);
        let id = id.clone();
        tokio::spawn(async move { store.rate(&id, rating("B", "b@example.com", 5), None).await })
    };
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();

    let project = store.get(&id).await.unwrap();
    assert_eq!(project.ratings.count, 2);
    assert!((project.ratings.average - 4.0).abs() < 1e-9);
    let breakdown = &project.ratings.breakdown;
    let total: i64 = [
        breakdown.one,
        breakdown.two,
        breakdown.three,
        breakdown.four,
        breakdown.five,
    ]
    .iter()
    .sum();
    assert_eq!(total, project.ratings.count);
}

#[tokio::test]
async fn duplicate_rating_leaves_summary_untouched() {
    let store = ProjectStore::memory_only();
    let id = one_project(&store).await;

    store
        .rate(&id, rating("A", "dev@example.com", 4), None)
        .await
        .unwrap();
    let err = store
        .rate(&id, rating("A again", "DEV@Example.com", 1), None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("already rated"));

    let project = store.get(&id).await.unwrap();
    assert_eq!(project.ratings.count, 1);
    assert!((project.ratings.average - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn rating_removal_reverses_the_arithmetic() {
    let store = ProjectStore::memory_only();
    let id = one_project(&store).await;

    store
        .rate(&id, rating("A", "a@example.com", 5), None)
        .await
        .unwrap();
    let (_, entries) = store.ratings_for(&id).await.unwrap();
    store.delete_rating(&entries[0].id).await.unwrap();

    let project = store.get(&id).await.unwrap();
    assert_eq!(project.ratings.count, 0);
    assert_eq!(project.ratings.average, 0.0);
}

#[tokio::test]
async fn same_reviewer_can_rate_again_after_removal() {
    let store = ProjectStore::memory_only();
    let id = one_project(&store).await;

    store
        .rate(&id, rating("A", "a@example.com", 2), None)
        .await
        .unwrap();
    let (_, entries) = store.ratings_for(&id).await.unwrap();
    store.delete_rating(&entries[0].id).await.unwrap();

    store
        .rate(&id, rating("A", "a@example.com", 5), None)
        .await
        .unwrap();

    let project = store.get(&id).await.unwrap();
    assert_eq!(project.ratings.count, 1);
    assert!((project.ratings.average - 5.0).abs() < 1e-9);
}

#[tokio::test]
async fn blog_lifecycle_broadcasts_whole_array() {
    let site = SiteStore::memory_only();
    site.bootstrap().await.unwrap();
    let hub = FanoutHub::new(16);
    let mut rx = hub.subscribe();

    let mut post = json!({ "title": "Devlog #1", "content": "We shipped a prototype." });
    fill_blog_defaults(&mut post);
    assert!(post["id"].is_string() || post["id"].is_number());
    assert!(post["date"].is_string());

    let id = post["id"].as_str().unwrap().to_string();
    let (stored, blog) = site.blog_create(post).await.unwrap();
    hub.notify("blog", blog);
    assert_eq!(stored["title"], "Devlog #1");

    let update = rx.recv().await.unwrap();
    assert_eq!(update.key, "blog");
    assert!(update.data.as_array().unwrap().iter().any(|p| p["id"] == id.as_str()));

    let after_delete = site.blog_delete(&id).await.unwrap();
    assert!(!after_delete
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p["id"] == id.as_str()));
}

#[tokio::test]
async fn seo_update_replaces_one_page_only() {
    let site = SiteStore::memory_only();
    site.bootstrap().await.unwrap();

    let entry = json!({
        "title": "Projects - TechNest",
        "description": "Our portfolio",
        "ogImage": "/og/projects.png"
    });
    let (stored, seo) = site.update_seo_page("projects", entry).await.unwrap();
    assert_eq!(stored["title"], "Projects - TechNest");
    assert_eq!(seo["projects"]["title"], "Projects - TechNest");
    // siblings untouched
    assert!(seo["home"]["title"].is_string());

    let err = site
        .update_seo_page("nonsense", json!({ "title": "x", "description": "y" }))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("nonsense"));
}

#[tokio::test]
async fn approved_testimonial_lands_in_curated_section() {
    let site = SiteStore::memory_only();
    site.bootstrap().await.unwrap();
    let intake = IntakeStore::memory_only();

    let input: TestimonialSubmissionInput = serde_json::from_value(json!({
        "name": "Jordan",
        "email": "jordan@bigco.example",
        "role": "Producer",
        "company": "BigCo",
        "rating": 5,
        "testimonial": "Great studio to work with."
    }))
    .unwrap();
    let submission = intake.add_testimonial_submission(input).await.unwrap();
    assert!(!submission.approved);

    let (updated, entry) = intake.approve_testimonial(&submission.id).await.unwrap();
    assert!(updated.approved);
    assert_eq!(entry["role"], "Producer, BigCo");

    let testimonials = site.push_testimonial(entry).await.unwrap();
    let list = testimonials.as_array().unwrap();
    assert_eq!(list.last().unwrap()["name"], "Jordan");

    // approved submissions leave the pending queue
    let pending = intake.pending_testimonials_json().await.unwrap();
    assert!(pending.as_array().unwrap().is_empty());
}
