//! HTTP API for the analysis pipeline
//!
//! One POST endpoint drives the whole pipeline; failures collapse into a
//! uniform `{error, message}` envelope and no partial results are ever
//! returned. CORS is open because the caller is a browser app.

use std::convert::Infallible;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use signal_core::{
    AiConfig, AnalysisMode, AnalysisPipeline, AnalysisResult, AnalyzeRequest, AnalyzeResponse,
    BinanceMarketData,
};

/// Uniform failure envelope
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub fn routes(
    market: Arc<BinanceMarketData>,
    mode: AnalysisMode,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let health = warp::path("health").and(warp::get()).map(|| {
        warp::reply::json(&json!({
            "status": "ok",
            "service": "signal-server",
            "timestamp": chrono::Utc::now()
        }))
    });

    let scenarios = warp::path!("api" / "scenarios")
        .and(warp::get())
        .map(|| warp::reply::json(&signal_core::builtin_scenarios()));

    let analyze = warp::path!("api" / "analyze")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_market(market))
        .and(with_mode(mode))
        .and_then(handle_analyze);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);

    health.or(scenarios).or(analyze).with(cors)
}

fn with_market(
    market: Arc<BinanceMarketData>,
) -> impl Filter<Extract = (Arc<BinanceMarketData>,), Error = Infallible> + Clone {
    warp::any().map(move || market.clone())
}

fn with_mode(
    mode: AnalysisMode,
) -> impl Filter<Extract = (AnalysisMode,), Error = Infallible> + Clone {
    warp::any().map(move || mode)
}

async fn handle_analyze(
    request: AnalyzeRequest,
    market: Arc<BinanceMarketData>,
    mode: AnalysisMode,
) -> Result<impl Reply, Rejection> {
    if request.image.trim().is_empty() {
        return Ok(warp::reply::with_status(
            warp::reply::json(&ErrorBody {
                error: "Image is required",
                message: None,
            }),
            StatusCode::BAD_REQUEST,
        ));
    }

    match analyze(&request, market, mode).await {
        Ok(response) => Ok(warp::reply::with_status(
            warp::reply::json(&response),
            StatusCode::OK,
        )),
        Err(err) => {
            error!(error = %err, "analysis failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ErrorBody {
                    error: "Analysis failed",
                    message: Some(err.to_string()),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn analyze(
    request: &AnalyzeRequest,
    market: Arc<BinanceMarketData>,
    mode: AnalysisMode,
) -> AnalysisResult<AnalyzeResponse> {
    // Credentials are resolved once per request, before any network call
    let config = AiConfig::from_env()?;
    let pipeline = AnalysisPipeline::with_config(config, market, mode);
    pipeline.run(request).await
}

/// Map rejections into the same JSON envelope the handlers use.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, error) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if err
        .find::<warp::filters::body::BodyDeserializeError>()
        .is_some()
    {
        (StatusCode::BAD_REQUEST, "Invalid request body")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        warn!(?err, "unhandled rejection");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error,
            message: None,
        }),
        status,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_routes {
        () => {
            routes(Arc::new(BinanceMarketData::new()), AnalysisMode::Standard)
                .recover(handle_rejection)
        };
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let resp = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&test_routes!())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn scenarios_lists_the_builtin_catalog() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/scenarios")
            .reply(&test_routes!())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn missing_image_is_a_bad_request() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/analyze")
            .json(&serde_json::json!({"image": ""}))
            .reply(&test_routes!())
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Image is required");
    }

    #[tokio::test]
    async fn wrong_method_is_rejected_with_405() {
        let resp = warp::test::request()
            .method("GET")
            .path("/api/analyze")
            .reply(&test_routes!())
            .await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = serde_json::from_slice(resp.body()).unwrap();
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn garbage_body_is_a_bad_request() {
        let resp = warp::test::request()
            .method("POST")
            .path("/api/analyze")
            .header("content-type", "application/json")
            .body("not json")
            .reply(&test_routes!())
            .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
