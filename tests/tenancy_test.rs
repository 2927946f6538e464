//! Tenant isolation and pharmacy-scope scenarios, end to end through the
//! router and the route access table.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{app, send, World};
use pharmacare::domain::{DonationStatus, Role, StaffRole};

#[tokio::test]
async fn test_medication_of_another_user_is_not_found() {
    let world = World::new();
    let (owner, owner_token) = world.account("owner@example.com", &[Role::User]);
    let (_, other_token) = world.account("other@example.com", &[Role::User]);
    let medication = world.medication(owner.id);
    let uri = format!("/api/medications/{}", medication);

    let (status, _) = send(app(&world), Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(app(&world), Method::GET, &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Medication not found");
}

#[tokio::test]
async fn test_deleting_another_users_medication_leaves_it_intact() {
    let world = World::new();
    let (owner, owner_token) = world.account("owner@example.com", &[Role::User]);
    let (_, other_token) = world.account("other@example.com", &[Role::User]);
    let medication = world.medication(owner.id);
    let uri = format!("/api/medications/{}", medication);

    let (status, _) = send(app(&world), Method::DELETE, &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(&world), Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app(&world), Method::DELETE, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_non_member_gets_not_found_for_pharmacy() {
    let world = World::new();
    let (owner, owner_token) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (_, outsider_token) = world.account("outsider@example.com", &[Role::Pharmacy]);
    let pharmacy = world.pharmacy(owner.id, "RX-100");
    let uri = format!("/api/pharmacies/{}", pharmacy);

    let (status, body) = send(app(&world), Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrationNumber"], "RX-100");

    let (status, _) = send(app(&world), Method::GET, &uri, Some(&outsider_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_pharmacy_id_is_not_found() {
    let world = World::new();
    let (_, token) = world.account("staff@example.com", &[Role::Pharmacy]);

    let (status, _) = send(
        app(&world),
        Method::GET,
        "/api/pharmacies/not-a-uuid/staff",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patient_role_is_forbidden_from_staff_roster() {
    let world = World::new();
    let (owner, _) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (_, patient_token) = world.account("patient@example.com", &[Role::User]);
    let pharmacy = world.pharmacy(owner.id, "RX-100");

    let (status, _) = send(
        app(&world),
        Method::GET,
        &format!("/api/pharmacies/{}/staff", pharmacy),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_platform_admin_bypasses_pharmacy_scope() {
    let world = World::new();
    let (owner, _) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (_, admin_token) = world.account("root@example.com", &[Role::Admin]);
    let pharmacy = world.pharmacy(owner.id, "RX-100");

    let (status, _) = send(
        app(&world),
        Method::GET,
        &format!("/api/pharmacies/{}/staff", pharmacy),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_listing_all_pharmacies_needs_admin() {
    let world = World::new();
    let (_, pharmacy_token) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (_, admin_token) = world.account("root@example.com", &[Role::Admin]);

    let (status, _) = send(
        app(&world),
        Method::GET,
        "/api/pharmacies",
        Some(&pharmacy_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(app(&world), Method::GET, "/api/pharmacies", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deactivated_staff_loses_access() {
    let world = World::new();
    let (owner, owner_token) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (clerk, clerk_token) = world.account("clerk@example.com", &[Role::Pharmacy]);
    let pharmacy = world.pharmacy(owner.id, "RX-100");
    let row = world.staff(pharmacy, clerk.id, StaffRole::Staff);
    let roster = format!("/api/pharmacies/{}/staff", pharmacy);

    let (status, _) = send(app(&world), Method::GET, &roster, Some(&clerk_token), None).await;
    assert_eq!(status, StatusCode::OK);

    // Plain staff cannot manage the roster
    let (status, _) = send(
        app(&world),
        Method::PUT,
        &format!("{}/{}", roster, row),
        Some(&clerk_token),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        app(&world),
        Method::PUT,
        &format!("{}/{}", roster, row),
        Some(&owner_token),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);

    let (status, _) = send(app(&world), Method::GET, &roster, Some(&clerk_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sales_summary_scoped_by_query_parameter() {
    let world = World::new();
    let (owner, owner_token) = world.account("owner@example.com", &[Role::Pharmacy]);
    let (_, outsider_token) = world.account("outsider@example.com", &[Role::Pharmacy]);
    let pharmacy = world.pharmacy(owner.id, "RX-100");
    let uri = format!("/api/analytics/sales/summary?pharmacyId={}&period=month", pharmacy);

    let (status, body) = send(app(&world), Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["period"], "month");

    let (status, _) = send(app(&world), Method::GET, &uri, Some(&outsider_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        app(&world),
        Method::GET,
        "/api/analytics/sales/summary",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_registration_number_on_pharmacy_signup() {
    let world = World::new();
    let signup = |admin_email: &str| {
        json!({
            "pharmacyName": "Corner Pharmacy",
            "registrationNumber": "RX-100",
            "address": "1 Main St",
            "phone": "555-0100",
            "pharmacyEmail": "corner@example.com",
            "adminFirstName": "Ada",
            "adminLastName": "Admin",
            "adminEmail": admin_email,
            "adminPassword": "SecurePass123!"
        })
    };

    let (status, body) = send(
        app(&world),
        Method::POST,
        "/auth/pharmacy/signup",
        None,
        Some(signup("first@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["staff"]["role"], "ADMIN");

    let (status, body) = send(
        app(&world),
        Method::POST,
        "/auth/pharmacy/signup",
        None,
        Some(signup("second@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Pharmacy registration number already exists");
}

#[tokio::test]
async fn test_completed_donation_cannot_return_to_pending() {
    let world = World::new();
    let (donor, token) = world.account("donor@example.com", &[Role::User]);
    let donation = world.donation(donor.id, DonationStatus::Completed);

    let (status, _) = send(
        app(&world),
        Method::PUT,
        &format!("/donations/{}/status", donation),
        Some(&token),
        Some(json!({ "status": "PENDING" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(world.donation_status(donation), Some(DonationStatus::Completed));
}

#[tokio::test]
async fn test_donation_of_another_user_is_not_found() {
    let world = World::new();
    let (donor, _) = world.account("donor@example.com", &[Role::User]);
    let (_, other_token) = world.account("other@example.com", &[Role::User]);
    let donation = world.donation(donor.id, DonationStatus::Pending);

    let (status, _) = send(
        app(&world),
        Method::PUT,
        &format!("/donations/{}/status", donation),
        Some(&other_token),
        Some(json!({ "status": "COMPLETED" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(world.donation_status(donation), Some(DonationStatus::Pending));
}
