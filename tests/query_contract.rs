//! The list-endpoint contract exercised against real serialized documents:
//! wire field names, filter translation, projection, ordering, and the
//! filtered pagination totals.

use std::collections::HashMap;

use campdir::model::{Bootcamp, Career, Course, MinimumSkill};
use campdir::query::{engine, to_documents, ListParams};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

fn params(pairs: &[(&str, &str)]) -> ListParams {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ListParams::parse(&map).unwrap()
}

fn bootcamp(name: &str, cost: Option<f64>, housing: bool, minutes: i64) -> Bootcamp {
    Bootcamp {
        id: Uuid::new_v4(),
        name: name.to_string(),
        slug: name.to_lowercase(),
        description: "A bootcamp".to_string(),
        website: None,
        phone: None,
        email: None,
        location: None,
        careers: vec![Career::WebDevelopment],
        average_rating: None,
        average_cost: cost,
        photo: "no-photo.jpg".to_string(),
        housing,
        job_assistance: false,
        job_guarantee: false,
        accept_gi: false,
        user: Uuid::new_v4(),
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(minutes),
    }
}

fn course(title: &str, tuition: f64, bootcamp_id: Uuid) -> Course {
    Course {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "A course".to_string(),
        weeks: "8".to_string(),
        tuition,
        minimum_skill: MinimumSkill::Beginner,
        scholarships_available: false,
        bootcamp: bootcamp_id,
        user: Uuid::new_v4(),
        created_at: Utc::now(),
    }
}

#[test]
fn documents_use_wire_field_names() {
    let docs = to_documents(vec![bootcamp("Devworks", Some(8000.0), true, 0)]).unwrap();
    let doc = docs[0].as_object().unwrap();

    assert!(doc.contains_key("averageCost"));
    assert!(doc.contains_key("jobAssistance"));
    assert!(doc.contains_key("createdAt"));
    assert!(doc.contains_key("acceptGi"));
    assert!(!doc.contains_key("average_cost"));
}

#[test]
fn comparison_filter_only_matches_strictly() {
    let docs = to_documents(vec![
        course("A", 900.0, Uuid::new_v4()),
        course("B", 1000.0, Uuid::new_v4()),
        course("C", 1500.0, Uuid::new_v4()),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[("tuition[gt]", "1000")]));
    assert_eq!(result.total, 1);
    assert_eq!(result.data[0]["title"], "C");
}

#[test]
fn in_filter_matches_set_membership() {
    let docs = to_documents(vec![
        bootcamp("Devworks", Some(4000.0), false, 0),
        bootcamp("ModernTech", Some(6000.0), false, 1),
        bootcamp("Codemasters", Some(8000.0), false, 2),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[("averageCost[in]", "4000,8000")]));
    assert_eq!(result.total, 2);
    let names: Vec<&str> = result
        .data
        .iter()
        .map(|doc| doc["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Devworks"));
    assert!(names.contains(&"Codemasters"));
}

#[test]
fn equality_filter_on_boolean_field() {
    let docs = to_documents(vec![
        bootcamp("HasHousing", None, true, 0),
        bootcamp("NoHousing", None, false, 1),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[("housing", "true")]));
    assert_eq!(result.total, 1);
    assert_eq!(result.data[0]["name"], "HasHousing");
}

#[test]
fn default_order_is_newest_first() {
    let docs = to_documents(vec![
        bootcamp("Oldest", None, false, 0),
        bootcamp("Newest", None, false, 20),
        bootcamp("Middle", None, false, 10),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[]));
    assert_eq!(result.data[0]["name"], "Newest");
    assert_eq!(result.data[2]["name"], "Oldest");
}

#[test]
fn explicit_sort_keys_override_the_default() {
    let docs = to_documents(vec![
        bootcamp("B", Some(2000.0), false, 0),
        bootcamp("A", Some(2000.0), false, 1),
        bootcamp("C", Some(1000.0), false, 2),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[("sort", "-averageCost,name")]));
    let names: Vec<&str> = result
        .data
        .iter()
        .map(|doc| doc["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn select_projects_fields_and_keeps_id() {
    let docs = to_documents(vec![bootcamp("Devworks", Some(8000.0), true, 0)]).unwrap();
    let result = engine::run(docs, &params(&[("select", "name,averageCost")]));

    let doc = result.data[0].as_object().unwrap();
    assert_eq!(doc.len(), 3);
    assert!(doc.contains_key("id"));
    assert!(doc.contains_key("name"));
    assert!(doc.contains_key("averageCost"));
}

#[test]
fn pagination_boundaries_follow_the_filtered_total() {
    let mut camps = Vec::new();
    for i in 0..9 {
        camps.push(bootcamp(
            &format!("Camp{}", i),
            Some(if i < 5 { 1000.0 } else { 9000.0 }),
            false,
            i,
        ));
    }
    let docs = to_documents(camps).unwrap();

    // 5 matching documents, pages of 2: pages 1-3, no next on page 3
    let page3 = engine::run(
        docs.clone(),
        &params(&[("averageCost[lte]", "1000"), ("limit", "2"), ("page", "3")]),
    );
    assert_eq!(page3.total, 5);
    assert_eq!(page3.data.len(), 1);
    assert!(page3.pagination.next.is_none());
    assert_eq!(page3.pagination.prev.as_ref().unwrap().page, 2);

    let page1 = engine::run(
        docs,
        &params(&[("averageCost[lte]", "1000"), ("limit", "2")]),
    );
    assert_eq!(page1.data.len(), 2);
    assert_eq!(page1.pagination.next.as_ref().unwrap().page, 2);
    assert!(page1.pagination.prev.is_none());
}

#[test]
fn returned_page_never_exceeds_limit() {
    let docs = to_documents((0..30).map(|i| bootcamp(&format!("C{}", i), None, false, i)).collect::<Vec<_>>())
        .unwrap();

    for (limit, page) in [(3, 1), (7, 2), (25, 1), (25, 2)] {
        let result = engine::run(
            docs.clone(),
            &params(&[("limit", &limit.to_string()), ("page", &page.to_string())]),
        );
        assert!(result.data.len() <= limit);
        assert_eq!(result.total, 30);
    }
}

#[test]
fn malformed_filters_are_client_errors() {
    let map: HashMap<String, String> =
        [("tuition[between]".to_string(), "1,2".to_string())].into();
    assert!(ListParams::parse(&map).is_err());

    let map: HashMap<String, String> = [("limit".to_string(), "lots".to_string())].into();
    assert!(ListParams::parse(&map).is_err());
}

#[test]
fn scoped_params_pin_the_parent() {
    let parent = Uuid::new_v4();
    let docs = to_documents(vec![
        course("Mine", 100.0, parent),
        course("Other", 100.0, Uuid::new_v4()),
    ])
    .unwrap();

    let result = engine::run(docs, &params(&[]).scope("bootcamp", Value::String(parent.to_string())));
    assert_eq!(result.total, 1);
    assert_eq!(result.data[0]["title"], "Mine");
}
