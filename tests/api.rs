use axum::body::to_bytes;
use axum::extract::{Json, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use claim_audit_rust::api;
use claim_audit_rust::config::AuditConfig;
use claim_audit_rust::models::AuditRequest;
use claim_audit_rust::{AuditService, LayoutConfig};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn service() -> Arc<AuditService> {
    Arc::new(AuditService::default())
}

fn cramped_service() -> Arc<AuditService> {
    let layout = LayoutConfig {
        page_height: 150.0,
        ..LayoutConfig::default()
    };
    Arc::new(AuditService::new(&AuditConfig::default(), layout))
}

fn claim() -> AuditRequest {
    serde_json::from_value(json!({
        "claim": {"claimNumber": "CLM-1042", "insured": "J. Rivera"},
        "original": {
            "lineItems": [
                {"category": "LABOR", "description": "Body Labor", "quantity": 1, "unitPrice": 100, "total": 100},
                {"category": "PARTS", "description": "Trim Clip", "quantity": 1, "unitPrice": 12, "total": 12}
            ]
        },
        "supplement": {
            "items": [
                {"category": "labor", "description": "body  labor", "quantity": 1, "unitPrice": 150, "total": 150},
                {"category": "PARTS", "description": "Repl Rear Bumper Cover", "quantity": 1, "unitPrice": 450, "total": 450}
            ]
        }
    }))
    .unwrap()
}

async fn body(resp: Response) -> Vec<u8> {
    to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn json_body(resp: Response) -> Value {
    serde_json::from_slice(&body(resp).await).unwrap()
}

#[tokio::test]
async fn health_check_answers_ok() {
    assert_eq!(api::health_check().await, "OK");
}

#[tokio::test]
async fn audit_returns_a_summary() {
    let resp = api::audit_claim(State(service()), Json(claim())).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], json!(true));
    let summary = &body["summary"];
    assert_eq!(summary["claim"], json!("CLM-1042"));
    assert_eq!(summary["counts"], json!({"new": 1, "changed": 1, "removed": 1, "same": 0}));
    assert_eq!(summary["categories"][0]["category"], json!("PARTS"));
    assert_eq!(summary["categories"][1]["category"], json!("LABOR"));
    assert_eq!(summary["warranty_items"].as_array().map(Vec::len), Some(1));
    assert_eq!(summary["page_count"], json!(1));
}

#[tokio::test]
async fn report_endpoint_streams_a_pdf() {
    let resp = api::audit_report_pdf(State(service()), Json(claim())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"CLM-1042-audit.pdf\""
    );

    let bytes = body(resp).await;
    assert!(bytes.starts_with(b"%PDF-"));
}

#[tokio::test]
async fn export_endpoint_returns_csv_rows() {
    let resp = api::audit_export_csv(State(service()), Json(claim())).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");

    let text = String::from_utf8(body(resp).await).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("status,category,description"));
    assert!(lines[1].starts_with("CHANGED,LABOR,"));
}

#[tokio::test]
async fn layout_overflow_is_unprocessable() {
    let resp = api::audit_claim(State(cramped_service()), Json(claim())).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!(api::REPORT_FAILED));
    assert_eq!(body["summary"], Value::Null);
}

#[tokio::test]
async fn batch_reports_each_claim() {
    let mut second = claim();
    second.claim.claim_number = Some("CLM-2000".to_string());

    let resp = api::audit_batch(State(service()), Json(vec![claim(), second])).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Audited 2 of 2 claims"));
    let claims: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["summary"]["claim"].as_str())
        .collect();
    assert_eq!(claims, vec!["CLM-1042", "CLM-2000"]);
}
