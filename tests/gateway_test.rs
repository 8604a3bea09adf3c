//! Gateway dispatch tests over the mock transport
//!
//! Pins down the wire intent of each operation group including:
//! - Method, path, and query of the emitted descriptors
//! - Request body shapes (JSON, form, multipart)
//! - Error taxonomy mapping and decode failures
//! - Session teardown on a 401

use std::sync::Arc;

use serde_json::json;

use swapspec_client::transport::{Method, MockTransport, RequestBody};
use swapspec_client::{
    ApiError, BuildCreate, BuildFilter, ChatRole, EngineFilter, MemoryTokenStore, RegisterRequest,
    SwapSpecClient, TransmissionFilter,
};

fn mock_client() -> (Arc<MockTransport>, SwapSpecClient) {
    let transport = Arc::new(MockTransport::new());
    let client = SwapSpecClient::with_transport(
        transport.clone(),
        Arc::new(MemoryTokenStore::new()),
    );
    (transport, client)
}

fn logged_in_mock_client(token: &str) -> (Arc<MockTransport>, SwapSpecClient) {
    let transport = Arc::new(MockTransport::new());
    let client = SwapSpecClient::with_transport(
        transport.clone(),
        Arc::new(MemoryTokenStore::with_token(token)),
    );
    (transport, client)
}

fn build_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": "user-1",
        "vehicle_id": "veh-1",
        "engine_id": "eng-1",
        "transmission_id": null,
        "status": "draft",
        "created_at": "2024-03-01T12:00:00Z"
    })
}

// =============================================================================
// Descriptor Shapes
// =============================================================================

#[tokio::test]
async fn test_register_posts_json_without_unset_account_type() {
    let (transport, client) = mock_client();
    transport.enqueue_json(
        201,
        json!({
            "id": "user-1",
            "email": "new@example.com",
            "account_type": "hobbyist",
            "subscription_status": "free",
            "created_at": "2024-03-01T12:00:00Z"
        }),
    );

    let request = RegisterRequest {
        email: "new@example.com".to_string(),
        password: "hunter2".to_string(),
        account_type: None,
    };
    client.register(&request).await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Post);
    assert_eq!(seen.request.path, "/api/auth/register");
    match &seen.request.body {
        RequestBody::Json(value) => {
            assert_eq!(value["email"], "new@example.com");
            assert!(value.get("account_type").is_none());
        }
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_login_uses_the_password_flow_field_names() {
    let (transport, client) = mock_client();
    transport.enqueue_json(200, json!({"access_token": "tok", "token_type": "bearer"}));

    client.login("swap@example.com", "hunter2").await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(
        seen.request.body,
        RequestBody::Form(vec![
            ("username".to_string(), "swap@example.com".to_string()),
            ("password".to_string(), "hunter2".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_engine_filters_reach_the_query() {
    let (transport, client) = mock_client();
    transport.enqueue_json(200, json!({"engines": [], "total": 0}));

    let filter = EngineFilter {
        make: Some("Chevrolet".to_string()),
        min_hp: Some(300),
        limit: Some(25),
        ..EngineFilter::default()
    };
    client.engines(&filter).await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.path, "/api/engines");
    assert_eq!(
        seen.request.query,
        vec![
            ("make".to_string(), "Chevrolet".to_string()),
            ("min_hp".to_string(), "300".to_string()),
            ("limit".to_string(), "25".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_compatibility_lookup_is_keyed_by_engine() {
    let (transport, client) = mock_client();
    transport.enqueue_json(200, json!({"transmissions": [], "total": 0}));

    client.compatible_transmissions("eng-42").await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Get);
    assert_eq!(seen.request.path, "/api/transmissions/compatible/eng-42");
    assert!(seen.request.query.is_empty());
}

#[tokio::test]
async fn test_build_create_omits_the_unset_transmission() {
    let (transport, client) = mock_client();
    transport.enqueue_json(201, build_json("bld-1"));

    let request = BuildCreate {
        vehicle_id: "veh-1".to_string(),
        engine_id: "eng-1".to_string(),
        transmission_id: None,
    };
    let build = client.create_build(&request).await.unwrap();
    assert!(build.transmission_id.is_none());

    let seen = transport.last_request().unwrap();
    match &seen.request.body {
        RequestBody::Json(value) => {
            assert_eq!(value["vehicle_id"], "veh-1");
            assert!(value.get("transmission_id").is_none());
        }
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_build_update_goes_out_as_a_put() {
    let (transport, client) = logged_in_mock_client("tok");
    transport.enqueue_json(200, build_json("bld-1"));

    let update = swapspec_client::BuildUpdate {
        status: Some(swapspec_client::BuildStatus::Complete),
        ..Default::default()
    };
    client.update_build("bld-1", &update).await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Put);
    assert_eq!(seen.request.path, "/api/builds/bld-1");
    match &seen.request.body {
        RequestBody::Json(value) => assert_eq!(value["status"], "complete"),
        other => panic!("expected JSON body, got {other:?}"),
    }
}

#[tokio::test]
async fn test_build_export_decodes_the_trimmed_component_payloads() {
    let (transport, client) = logged_in_mock_client("tok");
    // the export endpoint sends component summaries, not catalog records:
    // no created_at, no quality_status
    transport.enqueue_json(
        200,
        json!({
            "build": build_json("bld-1"),
            "vehicle": {
                "id": "veh-1",
                "year": 1969,
                "make": "Chevrolet",
                "model": "Camaro",
                "trim": "SS",
                "curb_weight_lbs": 3350,
                "engine_bay_length_in": 34.0,
                "engine_bay_width_in": 28.5,
                "engine_bay_height_in": 24.0,
                "stock_ground_clearance_in": 5.5,
                "driveline_angle_deg": 3.0,
                "data_sources": null
            },
            "engine": {
                "id": "eng-1",
                "make": "General Motors",
                "model": "LS3",
                "variant": "6.2L",
                "power_hp": 430,
                "torque_lb_ft": 424,
                "fuel_pressure_psi": 58.0,
                "fuel_flow_lph": 255.0,
                "cooling_btu_min": 950.0,
                "displacement_liters": 6.2,
                "compression_ratio": "10.7:1",
                "valve_train": "OHV",
                "bore_mm": 103.25,
                "stroke_mm": 92.0,
                "balance_type": "internal",
                "redline_rpm": 6600,
                "can_bus_protocol": "GMLAN",
                "oil_pan_depth_in": 8.25,
                "data_sources": null
            },
            "transmission": {
                "id": "trn-1",
                "make": "Tremec",
                "model": "T56 Magnum",
                "bellhousing_pattern": "GM LS",
                "trans_type": "manual",
                "gear_count": 6,
                "gear_ratios": [2.66, 1.78, 1.3, 1.0, 0.8, 0.63],
                "max_torque_capacity_lb_ft": 700,
                "input_shaft_spline": "26-spline",
                "data_sources": null
            },
            "recommendations": [
                "Verify oil pan clearance against the crossmember",
                "Budget for a hydraulic clutch conversion"
            ]
        }),
    );

    let export = client.export_build("bld-1").await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Get);
    assert_eq!(seen.request.path, "/api/builds/bld-1/export");

    assert_eq!(export.build.id, "bld-1");
    assert_eq!(export.vehicle["make"], "Chevrolet");
    assert_eq!(export.engine["power_hp"], 430);
    let transmission = export.transmission.unwrap();
    assert_eq!(transmission["model"], "T56 Magnum");
    assert_eq!(export.recommendations.unwrap().len(), 2);
}

#[tokio::test]
async fn test_build_export_tolerates_null_transmission_and_recommendations() {
    let (transport, client) = logged_in_mock_client("tok");
    transport.enqueue_json(
        200,
        json!({
            "build": build_json("bld-1"),
            "vehicle": { "id": "veh-1", "make": "Chevrolet", "model": "Camaro", "year": 1969 },
            "engine": { "id": "eng-1", "make": "General Motors", "model": "LS3" },
            "transmission": null,
            "recommendations": null
        }),
    );

    let export = client.export_build("bld-1").await.unwrap();
    assert!(export.transmission.is_none());
    assert!(export.recommendations.is_none());
    assert_eq!(export.vehicle["model"], "Camaro");
}

#[tokio::test]
async fn test_upload_descriptor_carries_the_file_bytes() {
    let (transport, client) = mock_client();
    transport.enqueue_json(
        200,
        json!({
            "filename": "dyno.csv",
            "stored_path": "uploads/dyno.csv",
            "url": "/files/uploads/dyno.csv",
            "size_bytes": 9
        }),
    );

    client
        .upload_file("dyno.csv", b"rpm,power".to_vec())
        .await
        .unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.path, "/api/files/upload");
    assert_eq!(
        seen.request.body,
        RequestBody::Multipart {
            filename: "dyno.csv".to_string(),
            bytes: b"rpm,power".to_vec(),
        }
    );
}

#[tokio::test]
async fn test_chat_clear_is_a_delete_with_no_body() {
    let (transport, client) = logged_in_mock_client("tok");
    transport.enqueue_status(204, "");

    client.clear_chat_history("bld-1").await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Delete);
    assert_eq!(seen.request.path, "/api/advisor/chat/bld-1/history");
    assert_eq!(seen.request.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_chat_history_returns_the_build_thread() {
    let (transport, client) = logged_in_mock_client("tok");
    transport.enqueue_json(
        200,
        json!({
            "messages": [
                {
                    "id": "msg-1",
                    "build_id": "bld-1",
                    "role": "user",
                    "content": "Will the stock hood still close?",
                    "created_at": "2024-03-01T12:00:00Z"
                },
                {
                    "id": "msg-2",
                    "build_id": "bld-1",
                    "role": "assistant",
                    "content": "With a low-profile intake, yes.",
                    "created_at": "2024-03-01T12:00:05Z"
                }
            ],
            "total": 2
        }),
    );

    let history = client.chat_history("bld-1").await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.request.method, Method::Get);
    assert_eq!(seen.request.path, "/api/advisor/chat/bld-1/history");

    assert_eq!(history.total, 2);
    assert_eq!(history.messages.len(), 2);
    assert_eq!(history.messages[1].role, ChatRole::Assistant);
}

// =============================================================================
// Bearer Propagation
// =============================================================================

#[tokio::test]
async fn test_session_token_rides_every_request() {
    let (transport, client) = logged_in_mock_client("tok-xyz");
    transport.enqueue_json(200, json!({"builds": [], "total": 0}));

    client.builds(&BuildFilter::default()).await.unwrap();

    let seen = transport.last_request().unwrap();
    assert_eq!(seen.bearer.as_deref(), Some("tok-xyz"));
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_bearer() {
    let (transport, client) = mock_client();
    transport.enqueue_json(200, json!({"transmissions": [], "total": 0}));

    client
        .transmissions(&TransmissionFilter::default())
        .await
        .unwrap();

    assert_eq!(transport.last_request().unwrap().bearer, None);
}

// =============================================================================
// Error Taxonomy
// =============================================================================

#[tokio::test]
async fn test_detail_field_becomes_the_error_message() {
    let (transport, client) = mock_client();
    transport.enqueue_json(404, json!({"detail": "Vehicle not found"}));

    let err = client.vehicle("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Vehicle not found");
}

#[tokio::test]
async fn test_transport_failures_pass_straight_through() {
    let (transport, client) = mock_client();
    transport.enqueue_error(ApiError::Transport("connection refused".to_string()));

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_undecodable_success_body_is_a_transport_error() {
    let (transport, client) = mock_client();
    transport.enqueue_status(200, "<html>proxy page</html>");

    let err = client.me().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_binary_downloads_skip_json_decoding() {
    let (transport, client) = logged_in_mock_client("tok");
    transport.enqueue_bytes(200, b"%PDF-1.4 report".to_vec());

    let bytes = client.download_build_pdf("bld-1").await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4 report".to_vec());
}

// =============================================================================
// 401 Teardown
// =============================================================================

#[tokio::test]
async fn test_a_401_invalidates_the_session_once() {
    let (transport, client) = logged_in_mock_client("stale");
    transport.enqueue_json(401, json!({"detail": "Could not validate credentials"}));
    transport.enqueue_json(200, json!({"vehicles": [], "total": 0}));

    let fired = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let observer = fired.clone();
    client.session().on_invalidated(move || {
        observer.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    });

    let err = client.vehicles(&Default::default()).await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(err.to_string(), "Could not validate credentials");
    assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);

    // the next request goes out anonymously
    client.vehicles(&Default::default()).await.unwrap();
    assert_eq!(transport.last_request().unwrap().bearer, None);
    assert_eq!(fired.load(std::sync::atomic::Ordering::SeqCst), 1);
}
