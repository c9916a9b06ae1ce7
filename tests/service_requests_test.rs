mod common;

use std::collections::HashSet;

use common::TestApp;
use genset_service::models::Role;
use mongodb::bson::doc;
use serde_json::{Value, json};

async fn create_ticket(app: &TestApp, token: &str, payload: Value) -> Value {
    let response = app
        .client
        .post(format!("{}/service-requests", app.address))
        .bearer_auth(token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute create-ticket request");
    assert_eq!(response.status(), 201, "ticket creation should succeed");
    let body: Value = response.json().await.expect("Failed to parse JSON");
    body["data"].clone()
}

fn repair_payload() -> Value {
    json!({
        "service_type": "Repair",
        "description": "Genset trips on load",
        "contact_number": "555-0102"
    })
}

#[tokio::test]
async fn new_tickets_open_with_default_priority() {
    let app = TestApp::spawn().await;
    let (token, customer_id) = app.register_customer().await;

    let ticket = create_ticket(&app, &token, repair_payload()).await;

    assert_eq!(ticket["status"], "Open");
    assert_eq!(ticket["priority"], "Medium");
    assert_eq!(ticket["customer_id"], customer_id.as_str());
    assert!(ticket["ticket_number"].as_str().unwrap().starts_with("SR-"));
    assert!(ticket.get("customer_feedback").is_none());
    assert!(ticket.get("assigned_technician").is_none());

    app.cleanup().await;
}

#[tokio::test]
async fn ticket_may_reference_a_catalog_item() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let genset_id = app.seed_genset(3, 250_000.0).await;

    let mut payload = repair_payload();
    payload["genset_id"] = json!(genset_id);
    payload["priority"] = json!("High");
    let ticket = create_ticket(&app, &token, payload).await;

    assert_eq!(ticket["genset_id"], genset_id.as_str());
    assert_eq!(ticket["priority"], "High");
    // The reference is resolved for display.
    assert_eq!(ticket["genset"]["model"], "DG-5000");

    app.cleanup().await;
}

#[tokio::test]
async fn malformed_catalog_reference_is_rejected() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;

    let mut payload = repair_payload();
    payload["genset_id"] = json!("not-a-valid-id");
    let response = app
        .client
        .post(format!("{}/service-requests", app.address))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn empty_description_is_a_validation_error() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;

    let mut payload = repair_payload();
    payload["description"] = json!("");
    let response = app
        .client
        .post(format!("{}/service-requests", app.address))
        .bearer_auth(&token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 422);

    app.cleanup().await;
}

#[tokio::test]
async fn customers_list_only_their_own_tickets() {
    let app = TestApp::spawn().await;
    let (cust_a, id_a) = app.register_customer().await;
    let (cust_b, id_b) = app.register_customer().await;
    let (staff, _) = app.create_user_with_role(Role::Employee).await;

    create_ticket(&app, &cust_a, repair_payload()).await;
    create_ticket(&app, &cust_a, repair_payload()).await;
    create_ticket(&app, &cust_b, repair_payload()).await;

    let own = app
        .client
        .get(format!("{}/service-requests", app.address))
        .bearer_auth(&cust_a)
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = own.json().await.unwrap();
    assert_eq!(body["count"], 2);
    for ticket in body["data"].as_array().unwrap() {
        assert_eq!(ticket["customer_id"], id_a.as_str());
    }

    // A customer cannot widen the scope through the query string.
    let sneaky = app
        .client
        .get(format!("{}/service-requests", app.address))
        .bearer_auth(&cust_a)
        .query(&[("customer_id", id_b.as_str())])
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = sneaky.json().await.unwrap();
    assert_eq!(body["count"], 2);
    for ticket in body["data"].as_array().unwrap() {
        assert_eq!(ticket["customer_id"], id_a.as_str());
    }

    let all = app
        .client
        .get(format!("{}/service-requests", app.address))
        .bearer_auth(&staff)
        .send()
        .await
        .expect("Failed to execute request");
    let body: Value = all.json().await.unwrap();
    assert_eq!(body["count"], 3);

    app.cleanup().await;
}

#[tokio::test]
async fn foreign_tickets_are_forbidden_to_other_customers() {
    let app = TestApp::spawn().await;
    let (cust_a, _) = app.register_customer().await;
    let (cust_b, _) = app.register_customer().await;
    let (staff, _) = app.create_user_with_role(Role::Technician).await;
    let ticket = create_ticket(&app, &cust_a, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    let foreign = app
        .client
        .get(format!("{}/service-requests/{}", app.address, ticket_id))
        .bearer_auth(&cust_b)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(foreign.status(), 403);

    let staff_read = app
        .client
        .get(format!("{}/service-requests/{}", app.address, ticket_id))
        .bearer_auth(&staff)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(staff_read.status(), 200);

    app.cleanup().await;
}

#[tokio::test]
async fn assign_sets_technician_and_schedule() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let (staff, _) = app.create_user_with_role(Role::Employee).await;
    let (_, technician_id) = app.create_user_with_role(Role::Technician).await;
    let ticket = create_ticket(&app, &token, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    let denied = app
        .client
        .patch(format!("{}/service-requests/{}/assign", app.address, ticket_id))
        .bearer_auth(&token)
        .json(&json!({ "technician_id": technician_id }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(denied.status(), 403);

    let response = app
        .client
        .patch(format!("{}/service-requests/{}/assign", app.address, ticket_id))
        .bearer_auth(&staff)
        .json(&json!({
            "technician_id": technician_id,
            "scheduled_date": "2026-08-10T09:00:00Z"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "Assigned");
    assert_eq!(body["data"]["assigned_technician"], technician_id.as_str());

    app.cleanup().await;
}

#[tokio::test]
async fn status_machine_enforces_legal_edges() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let (staff, _) = app.create_user_with_role(Role::Employee).await;
    let ticket = create_ticket(&app, &token, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    let set_status = |status: &'static str| {
        let app = &app;
        let staff = &staff;
        async move {
            app.client
                .patch(format!(
                    "{}/service-requests/{}/status",
                    app.address, ticket_id
                ))
                .bearer_auth(staff)
                .json(&json!({ "status": status }))
                .send()
                .await
                .expect("Failed to execute request")
        }
    };

    // Open -> Completed is not a legal edge of the generic update.
    assert_eq!(set_status("Completed").await.status(), 409);

    assert_eq!(set_status("In Progress").await.status(), 200);
    assert_eq!(set_status("On Hold").await.status(), 200);
    assert_eq!(set_status("In Progress").await.status(), 200);
    assert_eq!(set_status("Completed").await.status(), 200);

    // Completed is terminal.
    assert_eq!(set_status("Open").await.status(), 409);
    assert_eq!(set_status("Cancelled").await.status(), 409);

    app.cleanup().await;
}

#[tokio::test]
async fn complete_records_cost_parts_and_notes() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let (staff, _) = app.create_user_with_role(Role::Technician).await;
    let ticket = create_ticket(&app, &token, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    // Completion straight from Open is allowed for walk-in fixes.
    let response = app
        .client
        .patch(format!(
            "{}/service-requests/{}/complete",
            app.address, ticket_id
        ))
        .bearer_auth(&staff)
        .json(&json!({
            "actual_cost": 12_500.0,
            "parts_used": [
                { "part_name": "AVR module", "quantity": 1, "cost": 8_000.0 }
            ],
            "technician_notes": "Replaced AVR, load tested for 30 minutes"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let stored = app
        .db
        .service_requests()
        .find_one(doc! { "_id": ticket_id }, None)
        .await
        .unwrap()
        .expect("Ticket not found in DB");
    assert_eq!(stored.status.as_str(), "Completed");
    assert!(stored.completed_date.is_some());
    assert_eq!(stored.actual_cost, Some(12_500.0));
    assert_eq!(stored.parts_used.len(), 1);
    assert_eq!(stored.parts_used[0].part_name, "AVR module");

    // A terminal ticket cannot be completed again.
    let again = app
        .client
        .patch(format!(
            "{}/service-requests/{}/complete",
            app.address, ticket_id
        ))
        .bearer_auth(&staff)
        .json(&json!({ "actual_cost": 1.0 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(again.status(), 409);

    app.cleanup().await;
}

#[tokio::test]
async fn feedback_rating_must_stay_in_range() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let ticket = create_ticket(&app, &token, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    for rating in [0, 6] {
        let response = app
            .client
            .patch(format!(
                "{}/service-requests/{}/feedback",
                app.address, ticket_id
            ))
            .bearer_auth(&token)
            .json(&json!({ "rating": rating }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 422, "rating {}", rating);
    }

    let stored = app
        .db
        .service_requests()
        .find_one(doc! { "_id": ticket_id }, None)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.customer_feedback.is_none());

    app.cleanup().await;
}

#[tokio::test]
async fn feedback_overwrites_instead_of_accumulating() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;
    let (cust_b, _) = app.register_customer().await;
    let ticket = create_ticket(&app, &token, repair_payload()).await;
    let ticket_id = ticket["id"].as_str().unwrap();

    // Another customer may not rate this ticket.
    let foreign = app
        .client
        .patch(format!(
            "{}/service-requests/{}/feedback",
            app.address, ticket_id
        ))
        .bearer_auth(&cust_b)
        .json(&json!({ "rating": 1 }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(foreign.status(), 403);

    let first = app
        .client
        .patch(format!(
            "{}/service-requests/{}/feedback",
            app.address, ticket_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "rating": 2, "comment": "Slow turnaround" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(first.status(), 200);

    let second = app
        .client
        .patch(format!(
            "{}/service-requests/{}/feedback",
            app.address, ticket_id
        ))
        .bearer_auth(&token)
        .json(&json!({ "rating": 5, "comment": "Resolved after follow-up" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(second.status(), 200);

    let stored = app
        .db
        .service_requests()
        .find_one(doc! { "_id": ticket_id }, None)
        .await
        .unwrap()
        .unwrap();
    let feedback = stored.customer_feedback.expect("Feedback not stored");
    assert_eq!(feedback.rating, 5);
    assert_eq!(feedback.comment.as_deref(), Some("Resolved after follow-up"));

    app.cleanup().await;
}

#[tokio::test]
async fn ticket_numbers_never_collide() {
    let app = TestApp::spawn().await;
    let (token, _) = app.register_customer().await;

    let mut numbers = HashSet::new();
    for _ in 0..5 {
        let ticket = create_ticket(&app, &token, repair_payload()).await;
        numbers.insert(ticket["ticket_number"].as_str().unwrap().to_string());
    }
    assert_eq!(numbers.len(), 5);

    app.cleanup().await;
}
