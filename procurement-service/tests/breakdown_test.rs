//! Financial breakdown endpoint tests.

mod common;

use common::{decimal, Seed, TestApp};
use procurement_service::models::DocumentKind;
use rust_decimal::Decimal;
use serde_json::{json, Value};

fn purchase_order_body() -> Value {
    json!({
        "document_kind": "purchase_order",
        "line_items": [
            {"quantity": 10, "unit_price": 100}
        ],
        "charges": {
            "freight": {"percentage": 5, "taxable": true}
        },
        "sales_taxes": {
            "sales_tax_1": {"percentage": 13}
        }
    })
}

#[tokio::test]
async fn computes_purchase_order_breakdown() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/financial-breakdown"))
        .json(&purchase_order_body())
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    let breakdown = &body["financial_breakdown"];

    assert_eq!(decimal(&breakdown["charges"]["freight"]["amount"]), Decimal::from(50));
    assert_eq!(breakdown["charges"]["freight"]["taxable"], true);
    assert_eq!(
        decimal(&breakdown["sales_taxes"]["sales_tax_1"]["amount"]),
        Decimal::new(1365, 1)
    );
    assert_eq!(decimal(&breakdown["totals"]["item_total"]), Decimal::from(1000));
    assert_eq!(
        decimal(&breakdown["totals"]["total_po_amount"]),
        Decimal::new(11865, 1)
    );
    assert!(breakdown["totals"].get("total_invoice_amount").is_none());
    assert_eq!(decimal(&body["items"][0]["total"]), Decimal::new(11865, 1));
}

#[tokio::test]
async fn identical_input_gives_identical_output() {
    let app = TestApp::spawn().await;
    let body = json!({
        "document_kind": "vendor_invoice",
        "line_items": [
            {"quantity": 3, "unit_price": "19.99"},
            {"quantity": 1, "unit_price": 250.5, "freight_amount": 12}
        ],
        "charges": {
            "freight": {"fixedAmount": 40, "taxable": true},
            "other": {"percentage": 1.5}
        },
        "sales_taxes": {
            "sales_tax_1": {"percentage": 5},
            "sales_tax_2": {"percentage": 7}
        }
    });

    let mut outputs = Vec::new();
    for _ in 0..2 {
        let response = app
            .client
            .post(app.url("/api/financial-breakdown"))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);
        outputs.push(response.text().await.expect("Failed to read body"));
    }

    assert_eq!(outputs[0], outputs[1]);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_as_bad_request() {
    let app = TestApp::spawn().await;
    let body = json!({
        "document_kind": "purchase_order",
        "line_items": [
            {"quantity": 1000000000000000u64, "unit_price": 1000000000000000u64}
        ]
    });

    let response = app
        .client
        .post(app.url("/api/financial-breakdown"))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn unparsable_body_gets_json_error() {
    let app = TestApp::spawn().await;
    let body = json!({
        "document_kind": "purchase_order",
        "line_items": [{"quantity": "abc", "unit_price": 10}]
    });

    let response = app
        .client
        .post(app.url("/api/financial-breakdown"))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].as_str().unwrap().contains("Invalid JSON body"));
}

#[tokio::test]
async fn too_many_line_items_is_422() {
    let app = TestApp::spawn().await;
    let items: Vec<Value> = (0..5001).map(|_| json!({"quantity": 1})).collect();
    let body = json!({"document_kind": "change_order", "line_items": items});

    let response = app
        .client
        .post(app.url("/api/financial-breakdown"))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn recompute_persists_breakdown_on_document() {
    let app = TestApp::spawn().await;
    let seed = Seed::project(&app, "Harbour Tower", "PRJ-0042").await;
    let vendor = seed.vendor(&app, "Acme Supply").await;
    let uuid = seed
        .insert(
            &app,
            DocumentKind::PurchaseOrder,
            seed.document(vendor, "Approved", None),
        )
        .await;

    let mut body = purchase_order_body();
    body.as_object_mut().unwrap().remove("document_kind");

    let response = app
        .client
        .put(app.url(&format!(
            "/api/documents/purchase-orders/{}/financial-breakdown",
            uuid
        )))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);

    let stored = app
        .store
        .get_document(DocumentKind::PurchaseOrder, uuid)
        .await
        .expect("document should exist");
    let totals = &stored.financial_breakdown.expect("breakdown stored")["totals"];
    assert_eq!(decimal(&totals["total_po_amount"]), Decimal::new(11865, 1));

    // The stored breakdown now feeds the AP summary.
    let report: Value = app
        .ap_summary(&seed.query())
        .await
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(decimal(&report["totals"]["poAmount"]), Decimal::new(11865, 1));
}

#[tokio::test]
async fn recompute_of_missing_document_is_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .put(app.url(&format!(
            "/api/documents/change-orders/{}/financial-breakdown",
            uuid::Uuid::new_v4()
        )))
        .json(&json!({"line_items": []}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn unknown_document_kind_is_400() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .put(app.url(&format!(
            "/api/documents/receipt-notes/{}/financial-breakdown",
            uuid::Uuid::new_v4()
        )))
        .json(&json!({"line_items": []}))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn get_on_breakdown_route_is_405() {
    let app = TestApp::spawn().await;

    let response = app.get("/api/financial-breakdown").await;

    assert_eq!(response.status().as_u16(), 405);
}
