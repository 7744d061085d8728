//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`. CORS is permissive — the frontend is
//! served from the device itself.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the citizen API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/booking/options", get(endpoints::catalog::options))
        .route("/booking/start", post(endpoints::booking::start))
        .route("/booking/selection", post(endpoints::booking::selection))
        .route("/booking/next", post(endpoints::booking::next))
        .route("/booking/back", post(endpoints::booking::back))
        .route("/booking/confirm", post(endpoints::booking::confirm))
        .route("/booking/ticket", get(endpoints::booking::ticket))
        .route("/booking/finish", post(endpoints::booking::finish))
        .route("/notifications", get(endpoints::notifications::feed))
        .route(
            "/notifications/:id/read",
            post(endpoints::notifications::mark_read),
        )
        .route("/auth/login", post(endpoints::auth::login))
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/auth/profile", get(endpoints::auth::profile))
        .route("/chat/send", post(endpoints::chat::send))
        .route("/chat/history", get(endpoints::chat::history))
        .route("/chat/options", get(endpoints::chat::options))
        .route("/chat/persona", post(endpoints::chat::persona))
        .with_state(ctx);

    Router::new().nest("/api", routes).layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use chrono::{Datelike, NaiveDate, Weekday};
    use tower::ServiceExt;

    use crate::assistant::ScriptedBackend;
    use crate::profile_store::MemoryStore;
    use crate::webhook::RecordingSink;

    fn test_core() -> Arc<CoreState> {
        Arc::new(CoreState::with_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingSink::new()),
            Arc::new(ScriptedBackend::replying("Dạ, tôi có thể hỗ trợ.")),
        ))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn call(core: &Arc<CoreState>, request: Request<Body>) -> axum::http::Response<Body> {
        api_router(core.clone()).oneshot(request).await.unwrap()
    }

    /// First offered date that is a plain weekday (not Saturday).
    async fn pick_weekday(core: &Arc<CoreState>) -> String {
        let response = call(core, get_request("/api/booking/options")).await;
        let json = response_json(response).await;
        json["dates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["date"].as_str().unwrap().to_string())
            .find(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap().weekday() != Weekday::Sat
            })
            .expect("horizon always contains a weekday")
    }

    /// First offered Saturday.
    async fn pick_saturday(core: &Arc<CoreState>) -> String {
        let response = call(core, get_request("/api/booking/options")).await;
        let json = response_json(response).await;
        json["dates"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["date"].as_str().unwrap().to_string())
            .find(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap().weekday() == Weekday::Sat
            })
            .expect("a 14-business-day horizon always contains a Saturday")
    }

    // ── Health + options ─────────────────────────────────────

    #[tokio::test]
    async fn health_response_shape() {
        let core = test_core();
        let response = call(&core, get_request("/api/health")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["citizen_identified"], false);
        assert_eq!(json["webhook_failures"], 0);
        assert!(!json["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn options_lists_catalog_and_horizon() {
        let core = test_core();
        let response = call(&core, get_request("/api/booking/options")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["services"].as_array().unwrap().len(), 7);
        assert_eq!(json["dates"].as_array().unwrap().len(), 14);
        assert!(!json["slots"].as_array().unwrap().is_empty());
        // The picker never offers a Sunday
        for entry in json["dates"].as_array().unwrap() {
            let date =
                NaiveDate::parse_from_str(entry["date"].as_str().unwrap(), "%Y-%m-%d").unwrap();
            assert_ne!(date.weekday(), Weekday::Sun);
        }
    }

    #[tokio::test]
    async fn options_for_saturday_are_morning_only() {
        let core = test_core();
        let saturday = pick_saturday(&core).await;
        let response = call(&core, get_request(&format!("/api/booking/options?date={saturday}"))).await;
        let json = response_json(response).await;

        let slots = json["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 8);
        assert!(json["saturday_note"].is_string());
        for slot in slots {
            let hour: u32 = slot.as_str().unwrap()[0..2].parse().unwrap();
            assert!(hour < 12);
        }
    }

    #[tokio::test]
    async fn options_reject_malformed_and_out_of_horizon_dates() {
        let core = test_core();
        let response = call(&core, get_request("/api/booking/options?date=08-05-2026")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = call(&core, get_request("/api/booking/options?date=1999-01-01")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Booking flow ─────────────────────────────────────────

    #[tokio::test]
    async fn full_booking_scenario_end_to_end() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::new());
        let core = Arc::new(CoreState::with_parts(
            store.clone(),
            sink.clone(),
            Arc::new(ScriptedBackend::replying("OK")),
        ));
        let date = pick_weekday(&core).await;

        let response = call(&core, post_empty("/api/booking/start")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["step"], "selection");

        let response = call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({
                    "service": "Chứng thực bản sao/chữ ký",
                    "date": date,
                    "time_slot": "08:00 - 08:30"
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&core, post_empty("/api/booking/next")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["step"], "personal_info");

        let response = call(
            &core,
            post_json(
                "/api/booking/confirm",
                serde_json::json!({
                    "citizen_name": "Nguyen Van A",
                    "national_id": "079012345678",
                    "phone": "0909000000"
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;

        let code = json["record"]["code"].as_str().unwrap();
        assert!(code.starts_with("TT-"), "{code}");
        assert!(code.contains("-0800-"), "{code}");
        assert_eq!(json["record"]["counter"], "07");
        assert_eq!(
            json["ticket_filename"],
            format!("PhieuHen_{code}.png")
        );
        assert!(json["arrival_note"]
            .as_str()
            .unwrap()
            .contains("Quầy số 07"));

        // Notification prepended with booking data
        let response = call(&core, get_request("/api/notifications")).await;
        let feed = response_json(response).await;
        let top = &feed["notifications"][0];
        assert_eq!(top["is_booking"], true);
        assert_eq!(top["booking"]["counter"], "07");
        assert_eq!(top["booking"]["code"], code);

        // Webhook dispatched once, with the same code
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].code, code);

        // Ticket downloads as PNG with the code-bearing filename
        let response = call(&core, get_request("/api/booking/ticket")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        assert!(response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .contains(code));
        let body = axum::body::to_bytes(response.into_body(), 1 << 22)
            .await
            .unwrap();
        assert_eq!(&body[0..4], b"\x89PNG");
    }

    #[tokio::test]
    async fn next_is_blocked_until_selection_is_complete() {
        let core = test_core();
        call(&core, post_empty("/api/booking/start")).await;

        let response = call(&core, post_empty("/api/booking/next")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BLOCKED");
    }

    #[tokio::test]
    async fn selection_rejects_unknown_service() {
        let core = test_core();
        call(&core, post_empty("/api/booking/start")).await;

        let response = call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({ "service": "Cấp hộ chiếu" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn saturday_afternoon_slot_is_rejected() {
        let core = test_core();
        let saturday = pick_saturday(&core).await;
        call(&core, post_empty("/api/booking/start")).await;

        let response = call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({ "date": saturday, "time_slot": "14:00 - 14:30" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn moving_to_saturday_clears_afternoon_slot() {
        let core = test_core();
        let weekday = pick_weekday(&core).await;
        let saturday = pick_saturday(&core).await;
        call(&core, post_empty("/api/booking/start")).await;

        let response = call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({ "date": weekday, "time_slot": "14:00 - 14:30" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({ "date": saturday }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["draft"]["time_slot"], "");
    }

    #[tokio::test]
    async fn confirm_rejects_short_national_id() {
        let core = test_core();
        let date = pick_weekday(&core).await;
        call(&core, post_empty("/api/booking/start")).await;
        call(
            &core,
            post_json(
                "/api/booking/selection",
                serde_json::json!({
                    "service": "Hộ tịch (Khai sinh/Kết hôn)",
                    "date": date,
                    "time_slot": "09:00 - 09:30"
                }),
            ),
        )
        .await;
        call(&core, post_empty("/api/booking/next")).await;

        let response = call(
            &core,
            post_json(
                "/api/booking/confirm",
                serde_json::json!({
                    "citizen_name": "Nguyen Van A",
                    "national_id": "07901234567",
                    "phone": "0909000000"
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn booking_routes_require_active_session() {
        let core = test_core();
        for uri in ["/api/booking/next", "/api/booking/back"] {
            let response = call(&core, post_empty(uri)).await;
            assert_eq!(response.status(), StatusCode::CONFLICT, "{uri}");
            let json = response_json(response).await;
            assert_eq!(json["error"]["code"], "NO_ACTIVE_BOOKING");
        }
        let response = call(&core, get_request("/api/booking/ticket")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn finish_discards_the_session() {
        let core = test_core();
        call(&core, post_empty("/api/booking/start")).await;
        let response = call(&core, post_empty("/api/booking/finish")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&core, post_empty("/api/booking/next")).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    // ── Notifications ────────────────────────────────────────

    #[tokio::test]
    async fn notifications_seeded_filtered_and_markable() {
        let core = test_core();

        let response = call(&core, get_request("/api/notifications")).await;
        let json = response_json(response).await;
        let all = json["notifications"].as_array().unwrap().len();
        assert!(all >= 3);
        assert_eq!(json["unread"], all);

        let response = call(
            &core,
            get_request("/api/notifications?category=S%E1%BB%B1%20ki%E1%BB%87n"),
        )
        .await;
        let json = response_json(response).await;
        assert_eq!(json["notifications"].as_array().unwrap().len(), 1);

        let id = json["notifications"][0]["id"].as_u64().unwrap();
        let response = call(&core, post_empty(&format!("/api/notifications/{id}/read"))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&core, get_request("/api/notifications")).await;
        let json = response_json(response).await;
        assert_eq!(json["unread"].as_u64().unwrap() as usize, all - 1);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_is_404() {
        let core = test_core();
        let response = call(&core, post_empty("/api/notifications/9999/read")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn notifications_reject_unknown_category() {
        let core = test_core();
        let response = call(&core, get_request("/api/notifications?category=Spam")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Auth ─────────────────────────────────────────────────

    #[tokio::test]
    async fn login_boundary_on_id_length() {
        let core = test_core();
        for (id, expected) in [
            ("07901234567", StatusCode::BAD_REQUEST),
            ("079012345678", StatusCode::OK),
            ("0790123456789", StatusCode::BAD_REQUEST),
        ] {
            let response = call(
                &core,
                post_json(
                    "/api/auth/login",
                    serde_json::json!({ "name": "Nguyen Van A", "national_id": id }),
                ),
            )
            .await;
            assert_eq!(response.status(), expected, "id {id}");
        }
    }

    #[tokio::test]
    async fn login_then_profile_then_logout() {
        let core = test_core();
        let response = call(
            &core,
            post_json(
                "/api/auth/login",
                serde_json::json!({
                    "name": "  Tran Thi B  ",
                    "national_id": "079098765432",
                    "email": "b@example.com"
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["identified"], true);
        assert_eq!(json["profile"]["name"], "Tran Thi B");

        let response = call(&core, get_request("/api/auth/profile")).await;
        let json = response_json(response).await;
        assert_eq!(json["profile"]["email"], "b@example.com");

        call(&core, post_empty("/api/auth/logout")).await;
        let response = call(&core, get_request("/api/auth/profile")).await;
        let json = response_json(response).await;
        assert_eq!(json["identified"], false);
    }

    #[tokio::test]
    async fn login_requires_name() {
        let core = test_core();
        let response = call(
            &core,
            post_json(
                "/api/auth/login",
                serde_json::json!({ "name": "   ", "national_id": "079012345678" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── Chat ─────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_send_round_trip() {
        let core = test_core();
        let response = call(
            &core,
            post_json(
                "/api/chat/send",
                serde_json::json!({ "message": "Thủ tục khai sinh?" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["reply"]["role"], "model");
        assert_eq!(json["reply"]["text"], "Dạ, tôi có thể hỗ trợ.");

        let response = call(&core, get_request("/api/chat/history")).await;
        let json = response_json(response).await;
        // greeting + user + reply
        assert_eq!(json["messages"].as_array().unwrap().len(), 3);
        assert_eq!(json["busy"], false);
    }

    #[tokio::test]
    async fn chat_send_rejects_empty_message() {
        let core = test_core();
        let response = call(
            &core,
            post_json("/api/chat/send", serde_json::json!({ "message": "  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_failure_shows_fallback_bubble() {
        let core = Arc::new(CoreState::with_parts(
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingSink::new()),
            Arc::new(ScriptedBackend::failing()),
        ));
        let response = call(
            &core,
            post_json("/api/chat/send", serde_json::json!({ "message": "Hỏi" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(
            json["reply"]["text"],
            crate::language::Language::Vi.assistant_fallback()
        );
    }

    #[tokio::test]
    async fn chat_options_and_persona() {
        let core = test_core();
        let response = call(&core, get_request("/api/chat/options")).await;
        let json = response_json(response).await;
        assert_eq!(json["avatars"].as_array().unwrap().len(), 6);
        assert_eq!(json["languages"], serde_json::json!(["vi", "en"]));

        let response = call(
            &core,
            post_json(
                "/api/chat/persona",
                serde_json::json!({ "avatar": "tech", "language": "en" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = call(&core, get_request("/api/chat/history")).await;
        let json = response_json(response).await;
        assert_eq!(json["avatar"], "tech");
        assert_eq!(json["language"], "en");

        let response = call(
            &core,
            post_json(
                "/api/chat/persona",
                serde_json::json!({ "avatar": "hologram" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let core = test_core();
        let response = call(&core, get_request("/api/nonexistent")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
