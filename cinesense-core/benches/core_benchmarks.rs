use cinesense_core::analysis::{extract_grounding_sources, parse_generate_response, parse_review};
use cinesense_core::brain::MockLlmProvider;
use cinesense_core::present::{render_plain, sentiment_distribution};
use cinesense_core::shell::{Command, ShellEvent, ShellState};
use cinesense_core::types::Analysis;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn payload() -> serde_json::Value {
    serde_json::json!({
        "movieName": "Interstellar",
        "overallSentiment": "Positive",
        "emotions": ["wonder", "awe", "melancholy"],
        "strengths": ["visuals", "score", "ambition"],
        "weaknesses": ["pacing", "exposition"],
        "reviewText": "A sweeping, sincere space epic that occasionally buckles under its own ideas.",
        "rating": 4.2,
        "releaseYear": "2014",
        "genre": "Sci-Fi"
    })
}

fn bench_response_parsing(c: &mut Criterion) {
    let text = payload().to_string();
    let fenced = format!("```json\n{}\n```", text);
    let body = MockLlmProvider::json_response(
        &payload(),
        &[
            ("IMDb", "https://www.imdb.com/title/tt0816692/"),
            ("Wikipedia", "https://en.wikipedia.org/wiki/Interstellar_(film)"),
            ("Rotten Tomatoes", "https://www.rottentomatoes.com/m/interstellar_2014"),
        ],
    );

    c.bench_function("parse_review_plain", |b| {
        b.iter(|| parse_review(black_box(&text)))
    });

    c.bench_function("parse_review_fenced", |b| {
        b.iter(|| parse_review(black_box(&fenced)))
    });

    c.bench_function("parse_generate_response", |b| {
        b.iter(|| parse_generate_response(black_box(&body)))
    });

    c.bench_function("extract_grounding_sources", |b| {
        b.iter(|| extract_grounding_sources(black_box(&body)))
    });
}

fn bench_shell_reducer(c: &mut Criterion) {
    let body = MockLlmProvider::json_response(&payload(), &[]);
    let analysis: Analysis = match parse_generate_response(&body) {
        Ok(a) => a,
        Err(e) => panic!("benchmark payload must parse: {e}"),
    };

    c.bench_function("shell_submit_and_succeed", |b| {
        let mut state = ShellState::new();
        b.iter(|| {
            state.apply(ShellEvent::QueryChanged("Interstellar".into()));
            if let Some(Command::Analyze { request_id, .. }) = state.apply(ShellEvent::Submit) {
                state.apply(ShellEvent::AnalysisSucceeded {
                    request_id,
                    analysis: black_box(analysis.clone()),
                });
            }
        })
    });

    c.bench_function("render_plain", |b| b.iter(|| render_plain(black_box(&analysis))));

    c.bench_function("sentiment_distribution", |b| {
        b.iter(|| sentiment_distribution(black_box("Very Positive")))
    });
}

criterion_group!(benches, bench_response_parsing, bench_shell_reducer);
criterion_main!(benches);
