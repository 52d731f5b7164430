// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scan pipeline tests against the in-memory fakes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use ecosort_core::{ClassificationResult, EcosortError, ProgressStore, UserId, WasteCategory};
use ecosort_scan::{ScanContext, ScanRequest, ScanService};
use ecosort_test_utils::{MemoryProgressStore, MockClassifier};

fn request(user: Option<&str>) -> ScanRequest {
    ScanRequest {
        image_base64: "aGVsbG8=".to_string(),
        user_id: user.map(UserId::from),
    }
}

fn service(classifier: MockClassifier) -> (ScanService, Arc<MockClassifier>, Arc<MemoryProgressStore>) {
    let classifier = Arc::new(classifier);
    let store = Arc::new(MemoryProgressStore::new());
    let service = ScanService::new(classifier.clone(), store.clone());
    (service, classifier, store)
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

#[tokio::test]
async fn empty_image_is_rejected_before_classifying() {
    let (service, classifier, _) = service(MockClassifier::new());
    let req = ScanRequest {
        image_base64: "   ".to_string(),
        user_id: None,
    };

    let err = service.submit(&ScanContext::default(), req).await.unwrap_err();
    match err {
        EcosortError::InvalidInput(msg) => assert_eq!(msg, "No image provided"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn anonymous_scan_returns_classification_only() {
    let (service, _, store) = service(MockClassifier::new());

    let outcome = service
        .submit(&ScanContext::default(), request(None))
        .await
        .unwrap();

    assert_eq!(outcome.classification.category, WasteCategory::DryRecyclable);
    assert_eq!(outcome.bin_color, "blue");
    assert_eq!(outcome.bin_type, "Recyclable Bin");
    assert!(outcome.points_earned.is_none());
    assert!(outcome.new_badges.is_none());
    assert!(store.all_scans().await.is_empty());

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["itemName"], "Plastic bottle");
    assert_eq!(json["category"], "dry_recyclable");
    assert!(json.get("pointsEarned").is_none());
    assert!(json.get("newBadges").is_none());
}

#[tokio::test]
async fn blank_user_id_counts_as_anonymous() {
    let (service, _, store) = service(MockClassifier::new());

    let outcome = service
        .submit(&ScanContext::default(), request(Some("  ")))
        .await
        .unwrap();

    assert!(outcome.points_earned.is_none());
    assert!(store.all_scans().await.is_empty());
}

#[tokio::test]
async fn signed_in_scan_credits_points_and_badges() {
    let (service, _, store) = service(MockClassifier::new());
    let user = UserId::from("alice");

    let outcome = service
        .submit(&ScanContext::default(), request(Some("alice")))
        .await
        .unwrap();

    assert_eq!(outcome.points_earned, Some(12));
    let badge_ids: Vec<_> = outcome
        .new_badges
        .as_ref()
        .unwrap()
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(badge_ids, ["first_scan", "recycling_hero"]);
    assert_eq!(outcome.new_badges.as_ref().unwrap()[0].name, "First Steps");

    let profile = store.get_profile(&user).await.unwrap().unwrap();
    assert_eq!(profile.eco_points, 12);
    assert_eq!(profile.total_scans, 1);
    assert_eq!(profile.streak_days, 1);

    let scans = store.all_scans().await;
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].event.points_earned, 12);
    assert_eq!(scans[0].event.bin_color, "blue");

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["pointsEarned"], 12);
    assert_eq!(json["newBadges"][1]["id"], "recycling_hero");
}

#[tokio::test]
async fn badges_are_not_awarded_twice() {
    let (service, _, _) = service(MockClassifier::new());
    let ctx = ScanContext::default();

    let first = service.submit(&ctx, request(Some("bob"))).await.unwrap();
    let second = service.submit(&ctx, request(Some("bob"))).await.unwrap();

    assert_eq!(first.new_badges.unwrap().len(), 2);
    assert_eq!(second.points_earned, Some(12));
    assert_eq!(second.new_badges, Some(Vec::new()));
}

#[tokio::test]
async fn unknown_item_is_recorded_without_scoring() {
    let classifier = MockClassifier::with_results(vec![ClassificationResult::new(
        "Unidentified Item",
        WasteCategory::Unknown,
        0.9,
        "Please try again with a clearer image.",
    )]);
    let (service, _, store) = service(classifier);
    let user = UserId::from("carol");

    let outcome = service
        .submit(&ScanContext::default(), request(Some("carol")))
        .await
        .unwrap();

    assert_eq!(outcome.points_earned, Some(0));
    assert_eq!(outcome.new_badges, Some(Vec::new()));
    assert_eq!(outcome.bin_color, "gray");

    let scans = store.all_scans().await;
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].event.category, WasteCategory::Unknown);
    assert_eq!(scans[0].event.points_earned, 0);
    assert!(store.get_profile(&user).await.unwrap().is_none());
}

#[tokio::test]
async fn storage_failure_still_returns_classification() {
    let (service, _, store) = service(MockClassifier::new());
    store.set_fail_writes(true);

    let outcome = service
        .submit(&ScanContext::default(), request(Some("dave")))
        .await
        .unwrap();

    assert_eq!(outcome.classification.item_name, "Plastic bottle");
    assert_eq!(outcome.bin_color, "blue");
    assert!(outcome.points_earned.is_none());
    assert!(outcome.new_badges.is_none());
}

#[tokio::test]
async fn failed_scoring_leaves_no_scored_history() {
    let (service, _, store) = service(MockClassifier::new());
    store.set_fail_scoring(true);

    let outcome = service
        .submit(&ScanContext::default(), request(Some("dave")))
        .await
        .unwrap();

    assert_eq!(outcome.classification.item_name, "Plastic bottle");
    assert!(outcome.points_earned.is_none());
    assert!(store.all_scans().await.is_empty());
    assert!(service.profile(&UserId::from("dave")).await.unwrap().is_none());
}

#[tokio::test]
async fn classification_errors_propagate_without_persisting() {
    let classifier = MockClassifier::new();
    classifier
        .push_error(EcosortError::RateLimited {
            message: "Rate limit exceeded. Please try again later.".to_string(),
        })
        .await;
    let (service, _, store) = service(classifier);

    let err = service
        .submit(&ScanContext::default(), request(Some("erin")))
        .await
        .unwrap_err();

    assert!(matches!(err, EcosortError::RateLimited { .. }));
    assert!(err.is_retryable());
    assert!(store.all_scans().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancellation_abandons_slow_classification() {
    let (service, classifier, store) =
        service(MockClassifier::new().with_delay(Duration::from_secs(30)));
    let ctx = ScanContext::default();

    let cancel_soon = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        ctx.cancel.cancel();
    };
    let (result, ()) = tokio::join!(service.submit(&ctx, request(Some("frank"))), cancel_soon);

    assert!(matches!(result, Err(EcosortError::Cancelled)));
    assert_eq!(classifier.calls(), 1);
    assert!(store.all_scans().await.is_empty());
}

#[tokio::test]
async fn already_cancelled_context_never_reaches_classifier() {
    let (service, classifier, _) = service(MockClassifier::new());
    let ctx = ScanContext::default();
    ctx.cancel.cancel();

    let result = service.submit(&ctx, request(None)).await;

    assert!(matches!(result, Err(EcosortError::Cancelled)));
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn data_url_prefix_is_accepted() {
    let (service, classifier, _) = service(MockClassifier::new());
    let req = ScanRequest {
        image_base64: "data:image/jpeg;base64,aGVsbG8=".to_string(),
        user_id: None,
    };

    service.submit(&ScanContext::default(), req).await.unwrap();
    assert_eq!(classifier.calls(), 1);
}

#[tokio::test]
async fn streak_follows_the_scan_clock() {
    let now = Arc::new(Mutex::new(at(10, 9)));
    let clock = now.clone();
    let classifier = Arc::new(MockClassifier::new());
    let store = Arc::new(MemoryProgressStore::new());
    let service = ScanService::new(classifier, store.clone())
        .with_clock(move || *clock.lock().unwrap());
    let user = UserId::from("gina");
    let ctx = ScanContext::default();

    service.submit(&ctx, request(Some("gina"))).await.unwrap();
    *now.lock().unwrap() = at(11, 20);
    service.submit(&ctx, request(Some("gina"))).await.unwrap();
    *now.lock().unwrap() = at(11, 21);
    service.submit(&ctx, request(Some("gina"))).await.unwrap();

    let profile = store.get_profile(&user).await.unwrap().unwrap();
    assert_eq!(profile.streak_days, 2);
    assert_eq!(profile.total_scans, 3);

    *now.lock().unwrap() = at(14, 8);
    service.submit(&ctx, request(Some("gina"))).await.unwrap();
    let profile = store.get_profile(&user).await.unwrap().unwrap();
    assert_eq!(profile.streak_days, 1);
}

#[tokio::test]
async fn queries_pass_through_to_the_store() {
    let (service, _, _) = service(MockClassifier::new());
    let user = UserId::from("hank");

    service
        .submit(&ScanContext::default(), request(Some("hank")))
        .await
        .unwrap();
    service.set_display_name(&user, "  Hank  ").await.unwrap();

    let history = service.history(&user, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    let earned = service.earned_badges(&user).await.unwrap();
    assert_eq!(earned.len(), 2);
    let board = service.leaderboard(10).await.unwrap();
    assert_eq!(board[0].display_name, "Hank");
    assert_eq!(service.badge_catalog().await.unwrap().len(), 4);
}
