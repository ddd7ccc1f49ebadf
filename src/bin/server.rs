use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use word_search::fill::fill_random;
use word_search::prep::{
    InputError, check_grid_size, dedup_words, normalize_word, parse_word, resolve_dimensions,
};
use word_search::solver::{Solver, SolverConfig};
use word_search::types::{PuzzleReport, WordEntry};

const MAX_TIME_MS: u64 = 30_000;
const MAX_SIDE: usize = 100;

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum WordInput {
    /// Raw line, `*` prefix marks it required
    Line(String),
    Entry(WordEntry),
}

#[derive(Deserialize, Serialize)]
struct GenerateRequest {
    words: Vec<WordInput>,
    #[serde(default)]
    rows: usize,
    #[serde(default)]
    cols: usize,
    #[serde(default = "default_time_ms")]
    time_ms: u64,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_true")]
    fill: bool,
}

fn default_time_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn to_entries(words: Vec<WordInput>) -> Result<Vec<WordEntry>, InputError> {
    if words.is_empty() {
        return Err(InputError::NoInput);
    }
    let entries = words.into_iter().filter_map(|w| match w {
        WordInput::Line(line) => parse_word(&line),
        WordInput::Entry(entry) => {
            let text = normalize_word(&entry.text);
            (!text.is_empty()).then(|| WordEntry::new(text, entry.required))
        }
    });
    dedup_words(entries)
}

async fn generate(
    Json(req): Json<GenerateRequest>,
) -> Result<Json<PuzzleReport>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /generate"
    );

    let bad_request = |e: InputError| (StatusCode::BAD_REQUEST, e.to_string());
    let words = to_entries(req.words).map_err(bad_request)?;
    let (rows, cols) = resolve_dimensions(req.rows, req.cols, &words);
    let (rows, cols) = check_grid_size(rows, cols, MAX_SIDE).map_err(bad_request)?;
    let time_limit = Duration::from_millis(req.time_ms.min(MAX_TIME_MS));
    let (seed, fill) = (req.seed, req.fill);

    let report = tokio::task::spawn_blocking(move || {
        let mut result = Solver::new(SolverConfig::new(rows, cols, time_limit), words).solve();
        if fill {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            fill_random(&mut result.grid, &mut rng);
        }
        result.report()
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(report))
}

async fn serve() {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/generate", post(generate))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}

fn main() {
    // Sentry has to be up before the runtime starts its worker threads
    let _sentry = sentry::init(sentry::ClientOptions {
        dsn: std::env::var("SENTRY_DSN").ok().and_then(|dsn| dsn.parse().ok()),
        release: sentry::release_name!(),
        ..Default::default()
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_lines_and_entries() {
        let req: GenerateRequest = serde_json::from_str(
            r#"{"words": ["*hello", {"text": "world"}, {"text": "songs", "required": true}]}"#,
        )
        .unwrap();
        assert_eq!(req.time_ms, 2000);
        assert!(req.fill);
        assert_eq!(req.rows, 0);

        let words = to_entries(req.words).unwrap();
        assert_eq!(
            words,
            vec![
                WordEntry::required("HELLO"),
                WordEntry::optional("WORLD"),
                WordEntry::required("SONGS"),
            ]
        );
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"words": ["cat"], "rows": 200000, "cols": 200000}"#).unwrap();
        let words = to_entries(req.words).unwrap();
        let (rows, cols) = resolve_dimensions(req.rows, req.cols, &words);
        let err = check_grid_size(rows, cols, MAX_SIDE).unwrap_err();
        assert_eq!(
            err,
            InputError::GridTooLarge {
                rows: 200_000,
                cols: 200_000,
                max: MAX_SIDE
            }
        );
        assert!(err.to_string().contains("100x100"));

        assert_eq!(check_grid_size(MAX_SIDE, MAX_SIDE, MAX_SIDE), Ok((MAX_SIDE, MAX_SIDE)));
    }

    #[tokio::test]
    async fn test_generate_answers_bad_request_for_huge_grid() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"words": ["cat"], "rows": 200000, "cols": 3}"#).unwrap();
        let (status, body) = generate(Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("200000x3"));
    }

    #[test]
    fn test_request_without_words_is_rejected() {
        assert_eq!(to_entries(vec![]), Err(InputError::NoInput));
        assert_eq!(
            to_entries(vec![WordInput::Line("  ".into())]),
            Err(InputError::NoValidWords)
        );
    }
}
