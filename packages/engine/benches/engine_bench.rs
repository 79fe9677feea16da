//! Benchmark suite for adaptive-quiz-engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use adaptive_quiz_engine::{
    selection_rng, AdaptiveEngine, AnswerEvent, DifficultyAdjuster, EngineConfig,
    InMemoryQuestionStore, Item, ItemCalibrator, MasteryRecord, PerformanceWindow,
    QuestionSelector, ResponseRecord, SelectionStrategy, SessionTotals,
};

fn pool(size: usize) -> Vec<Item> {
    (0..size)
        .map(|i| {
            Item::new(format!("q{}", i), 1.0 + (i % 41) as f64 / 10.0)
                .with_discrimination((i % 10) as f64 / 10.0)
        })
        .collect()
}

fn bench_recommend(c: &mut Criterion) {
    let adjuster = DifficultyAdjuster::default();
    let window = PerformanceWindow::from_scores(&[1, 1, 0, 1, 1, 0, 1, 1, 1, 0]);

    c.bench_function("DifficultyAdjuster::recommend", |b| {
        b.iter(|| adjuster.recommend(black_box(3.2), true, black_box(9.0), &window, 0.55))
    });
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for size in [50, 500, 5000] {
        let items = pool(size);
        let history: Vec<String> = items.iter().step_by(3).map(|i| i.id.clone()).collect();
        let selector = QuestionSelector::default();
        let mut rng = selection_rng(Some(7));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let picked =
                    selector.select(&mut rng, &items, 3.0, SelectionStrategy::Targeted, &history);
                black_box(picked).map(|item| item.id.len())
            })
        });
    }
    group.finish();
}

fn bench_answer_loop(c: &mut Criterion) {
    let items = pool(200);

    c.bench_function("answer_loop_20", |b| {
        b.iter(|| {
            let mut config = EngineConfig::default();
            config.selection.seed = Some(11);
            let Ok(engine) = AdaptiveEngine::new(config) else {
                return;
            };
            let mut session = engine.start_session("bench", 3.0);
            let mut mastery = MasteryRecord::default();

            for n in 0..20 {
                let Some(item) = engine.next_item(&mut session, &items) else {
                    break;
                };
                let event = AnswerEvent {
                    item_id: item.id.clone(),
                    is_correct: n % 3 != 0,
                    response_time_seconds: 12.0,
                };
                let _ = engine.process_answer(&mut session, &mut mastery, &event);
            }
            black_box(mastery.value());
        })
    });
}

fn bench_topic_calibration(c: &mut Criterion) {
    let store = InMemoryQuestionStore::new();
    for i in 0..40 {
        let session_id = format!("s{}", i);
        store.set_session_totals(
            &session_id,
            SessionTotals {
                correct_answers: (i % 10) as u32,
                questions_answered: 10,
            },
        );
    }
    for item in pool(100) {
        for s in 0..40 {
            store.record_response(ResponseRecord {
                item_id: item.id.clone(),
                correct: (s + item.id.len()) % 3 != 0,
                response_time_seconds: 10.0 + (s % 7) as f64,
                session_id: format!("s{}", s),
            });
        }
        store.insert_item("bench", item);
    }
    let calibrator = ItemCalibrator::default();

    c.bench_function("topic_metrics_100x40", |b| {
        b.iter(|| black_box(calibrator.topic_metrics(&store, "bench").map(|items| items.len())))
    });
}

criterion_group!(
    benches,
    bench_recommend,
    bench_select,
    bench_answer_loop,
    bench_topic_calibration
);
criterion_main!(benches);
