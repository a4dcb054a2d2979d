//! HTTP handler functions for the festival map dashboard.

use actix_web::{HttpResponse, web};
use festival_map_server_models::{ApiHealth, ApiOptions, MapQueryParams, VideoQueryParams};

use crate::pipeline::{self, PipelineOutcome};
use crate::{AppState, ServerError, html, video};

const HTML: &str = "text/html; charset=utf-8";

/// `GET /`
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let map = &state.config.map;
    HttpResponse::Ok()
        .content_type(HTML)
        .body(html::dashboard_page(map.width, map.height))
}

/// `GET /map`
///
/// Renders the map for the town and month filters in the query string, or
/// a warning page when no town is selected.
pub async fn map(state: web::Data<AppState>, params: web::Query<MapQueryParams>) -> HttpResponse {
    let dataset = match state.dataset().await {
        Ok(dataset) => dataset,
        Err(e) => return internal_error("Failed to load dataset", &e),
    };

    let filter = match pipeline::filter_state_from_params(&dataset, &params) {
        Ok(filter) => filter,
        Err(e) => {
            log::debug!("Rejected map query: {e}");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": e.to_string()
            }));
        }
    };

    match pipeline::render_map(&dataset, &filter, &state.config.map.options()) {
        Ok(PipelineOutcome::Map(page)) => HttpResponse::Ok().content_type(HTML).body(page),
        Ok(PipelineOutcome::Halted(warning)) => HttpResponse::Ok()
            .content_type(HTML)
            .body(html::warning_page(warning)),
        Err(e) => internal_error("Failed to render map", &e),
    }
}

/// `GET /api/options`
///
/// Returns the town multi-select options and the month slider bounds.
pub async fn options(state: web::Data<AppState>) -> HttpResponse {
    match state.dataset().await {
        Ok(dataset) => HttpResponse::Ok().json(ApiOptions::new(dataset.town_options())),
        Err(e) => internal_error("Failed to load dataset", &e),
    }
}

/// `GET /api/video`
///
/// Resolves the pasted link into a player description.
pub async fn video(params: web::Query<VideoQueryParams>) -> HttpResponse {
    HttpResponse::Ok().json(video::resolve_video(&params.url))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn internal_error(message: &str, e: &ServerError) -> HttpResponse {
    log::error!("{message}: {e}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": message
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};
    use festival_map_festival::filter::NO_TOWNS_WARNING;

    use super::*;
    use crate::config::AppConfig;
    use crate::pipeline::tests::dataset;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(AppConfig::default(), dataset()))
    }

    async fn get_text(uri: &str) -> (u16, String) {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::routes)).await;
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn index_serves_dashboard() {
        let (status, body) = get_text("/").await;
        assert_eq!(status, 200);
        assert!(body.contains("能登3市3町祭りマップ"));
        assert!(body.contains(r#"width="700" height="500""#));
    }

    #[actix_web::test]
    async fn map_renders_with_default_filters() {
        let (status, body) = get_text("/map").await;
        assert_eq!(status, 200);
        assert!(body.contains("leaflet"));
        assert!(body.contains("キリコ-7"));
        assert!(!body.contains("キリコ-11"));
    }

    #[actix_web::test]
    async fn map_with_no_towns_shows_warning() {
        let (status, body) = get_text("/map?towns=&start=0&stop=12").await;
        assert_eq!(status, 200);
        assert!(body.contains(NO_TOWNS_WARNING));
        assert!(!body.contains("leaflet"));
    }

    #[actix_web::test]
    async fn map_with_reversed_months_is_bad_request() {
        let (status, body) = get_text("/map?start=9&stop=3").await;
        assert_eq!(status, 400);
        assert!(body.contains("invalid month range"));
    }

    #[actix_web::test]
    async fn options_lists_towns_in_order() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::routes)).await;
        let req = test::TestRequest::get().uri("/api/options").to_request();
        let options: ApiOptions = test::call_and_read_body_json(&app, req).await;

        let labels: Vec<&str> = options.towns.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["キリコ", "獅子舞", "(不明)"]);
        assert_eq!((options.default_start, options.default_stop), (4, 10));
    }

    #[actix_web::test]
    async fn video_resolves_youtube_links() {
        let (status, body) = get_text("/api/video?url=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ").await;
        assert_eq!(status, 200);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["kind"], "youtube");
        assert_eq!(json["id"], "dQw4w9WgXcQ");
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let (status, body) = get_text("/api/health").await;
        assert_eq!(status, 200);
        assert!(body.contains("\"healthy\":true"));
    }
}
