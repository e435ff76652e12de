//! This bench test recomputes the list view of a large question collection,
//! with the default criteria and with a level filter, a search and a text
//! sort. It also times loading a file store from disk.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tempfile::TempDir;
use tracker::{
    Collection, FileStore, FilterCriteria, Level, LevelFilter, NewQuestion, QuestionStore,
    SortCriteria, SortDirection, SortField, User, recompute,
};

const TOPICS: [&str; 8] = [
    "Arrays",
    "Graphs",
    "Trees",
    "Dynamic Programming",
    "Strings",
    "Heaps",
    "Math",
    "Greedy",
];

/// Generates a collection with mixed levels, topics and completion.
fn preseed_collection(size: usize) -> Collection {
    let mut collection = Collection::default();
    for i in 0..size {
        let level = Level::ALL[i % Level::ALL.len()];
        let topic = TOPICS[i % TOPICS.len()];
        let link = format!("https://leetcode.com/problems/problem-{i}/");
        let question = collection.create_at(
            NewQuestion::new(link.parse().unwrap(), level, topic.parse().unwrap()),
            i64::try_from(i).unwrap(),
        );
        if i % 3 == 0 {
            collection
                .toggle_completion(question.id(), User::Puneet)
                .unwrap();
        }
    }
    collection
}

fn recompute_view(c: &mut Criterion) {
    let collection = preseed_collection(10_000);
    let snapshot = collection.snapshot();

    c.bench_function("recompute default view", |b| {
        let filter = FilterCriteria::default();
        let sort = SortCriteria::new(Some(SortField::CreatedAt), SortDirection::Desc);
        b.iter(|| black_box(recompute(&snapshot, &filter, &sort)));
    });

    c.bench_function("recompute filtered view sorted by topic", |b| {
        let filter = FilterCriteria {
            topic: String::new(),
            level: LevelFilter::Only(Level::Medium),
            search: "problem-1".to_string(),
        };
        let sort = SortCriteria::new(Some(SortField::Topic), SortDirection::Asc);
        b.iter(|| black_box(recompute(&snapshot, &filter, &sort)));
    });
}

fn reopen_store(c: &mut Criterion) {
    let tmp_dir = TempDir::new().unwrap();
    let path = tmp_dir.path().join("questions.json");
    let mut store = FileStore::open(&path).unwrap();
    for question in preseed_collection(1_000).questions() {
        store
            .create(NewQuestion::new(
                question.platform_link().clone(),
                question.level(),
                question.topic().clone(),
            ))
            .unwrap();
    }

    c.bench_function("open file store", |b| {
        b.iter(|| black_box(FileStore::open(&path).unwrap().snapshot()));
    });
}

criterion_group!(benches, recompute_view, reopen_store);
criterion_main!(benches);
