//! Integration tests for ticket lifecycle transitions.
//!
//! Exercises the repository layer against a real database: creation with
//! SLA snapshot, assignment auto-transition, transfer rules, pause/resume
//! restoration (including the fallback path), reply side effects, and
//! rating uniqueness.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use helpdesk_core::error::CoreError;
use helpdesk_core::sla;
use sqlx::PgPool;

use helpdesk_db::models::company::CreateCompany;
use helpdesk_db::models::ticket::{CreateTicket, Ticket};
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{
    CompanyRepo, HistoryRepo, TicketRepo, TransitionError, UserRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_company(pool: &PgPool, code: &str) -> i64 {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: format!("Company {code}"),
            code: code.to_string(),
            contact_person: None,
            contact_email: Some(format!("contact@{code}.example")),
            contact_phone: None,
        },
    )
    .await
    .expect("create company");
    company.id
}

async fn seed_user(pool: &PgPool, username: &str, role: &str, company_id: Option<i64>) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@example.com")),
            password: "unused".to_string(),
            role: Some(role.to_string()),
            company_id,
            phone: None,
            feishu_id: None,
            enterprise_wechat_id: None,
        },
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA",
    )
    .await
    .expect("create user");
    user.id
}

async fn seed_ticket(pool: &PgPool, company_id: i64, created_by: i64) -> Ticket {
    let now = Utc::now();
    let deadlines = sla::compute_deadlines(now, Some(240), Some(2880));
    TicketRepo::create(
        pool,
        &CreateTicket {
            title: "Printer on fire".to_string(),
            description: "It is very much on fire.".to_string(),
            company_id,
            urgency: Some(2),
            category: None,
            subcategory: None,
            contact_method: None,
            contact_info: Some("reporter@example.com".to_string()),
            ticket_type_id: None,
        },
        created_by,
        3,
        now,
        deadlines,
        &format!("slug-{created_by}-{}", now.timestamp_nanos_opt().unwrap_or_default()),
    )
    .await
    .expect("create ticket")
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_snapshots_sla_and_defaults_submitter(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;

    assert_eq!(ticket.status, "new_issue");
    assert_eq!(ticket.created_by, Some(customer));
    // submitted_by defaults to created_by.
    assert_eq!(ticket.submitted_by, Some(customer));

    // Deadline arithmetic: created_at + minutes.
    let ir = ticket.sla_ir_deadline.expect("ir deadline set");
    let resolution = ticket.sla_resolution_deadline.expect("resolution deadline set");
    assert_eq!(ir - ticket.created_at, Duration::minutes(240));
    assert_eq!(resolution - ticket.created_at, Duration::minutes(2880));

    // Fresh ticket has not missed anything.
    assert!(!sla::is_ir_missed(
        ticket.sla_ir_deadline,
        ticket.first_replied_at,
        Utc::now()
    ));
}

// ---------------------------------------------------------------------------
// Assignment and transfer
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn assign_auto_transitions_and_logs_once(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let admin = seed_user(&pool, "admin1", "technical_support_admin", None).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;

    let outcome = TicketRepo::assign(&pool, ticket.id, support, admin, None)
        .await
        .expect("assign");
    assert!(outcome.assignee_changed);
    assert_eq!(outcome.ticket.status, "in_progress");
    assert_eq!(outcome.ticket.assigned_to, Some(support));

    let transfers = HistoryRepo::transfer_history(&pool, ticket.id).await.unwrap();
    assert_eq!(transfers.len(), 1);
    assert_eq!(transfers[0].transferred_to, Some(support));
    assert_eq!(transfers[0].transferred_from, None);

    // Re-assigning the same user: no error, no new history row, state kept.
    let outcome = TicketRepo::assign(&pool, ticket.id, support, admin, None)
        .await
        .expect("re-assign");
    assert!(!outcome.assignee_changed);
    assert_eq!(outcome.ticket.status, "in_progress");
    let transfers = HistoryRepo::transfer_history(&pool, ticket.id).await.unwrap();
    assert_eq!(transfers.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn transfer_rejects_noop_and_non_owner(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let admin = seed_user(&pool, "admin1", "system_admin", None).await;
    let sup_a = seed_user(&pool, "sup_a", "support", None).await;
    let sup_b = seed_user(&pool, "sup_b", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;
    TicketRepo::assign(&pool, ticket.id, sup_a, admin, None).await.unwrap();

    // Same assignee is rejected.
    let err = TicketRepo::transfer(&pool, ticket.id, sup_a, admin, "system_admin", None)
        .await
        .unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));

    // A support user who does not own the ticket may not transfer it.
    let err = TicketRepo::transfer(&pool, ticket.id, sup_b, sup_b, "support", None)
        .await
        .unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Forbidden(_)));

    // The current assignee may.
    let updated = TicketRepo::transfer(&pool, ticket.id, sup_b, sup_a, "support", Some("handover"))
        .await
        .expect("transfer");
    assert_eq!(updated.assigned_to, Some(sup_b));

    let transfers = HistoryRepo::transfer_history(&pool, ticket.id).await.unwrap();
    assert_eq!(transfers.len(), 2);
    assert_eq!(transfers[1].reason, "handover");
}

// ---------------------------------------------------------------------------
// Pause / resume
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn pause_resume_restores_prior_status(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let admin = seed_user(&pool, "admin1", "system_admin", None).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;
    TicketRepo::assign(&pool, ticket.id, support, admin, None).await.unwrap();

    // Scenario E: pause from in_progress, resume restores it.
    let paused = TicketRepo::pause(&pool, ticket.id, support, "waiting on vendor")
        .await
        .expect("pause");
    assert_eq!(paused.status, "paused");
    assert_eq!(paused.pause_reason.as_deref(), Some("waiting on vendor"));
    assert!(paused.paused_at.is_some());

    // Pausing twice is rejected.
    let err = TicketRepo::pause(&pool, ticket.id, support, "again").await.unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));

    let resumed = TicketRepo::resume(&pool, ticket.id, support).await.expect("resume");
    assert_eq!(resumed.status, "in_progress");
    assert_eq!(resumed.pause_reason, None);
    assert_eq!(resumed.paused_at, None);

    // Resuming a non-paused ticket is rejected.
    let err = TicketRepo::resume(&pool, ticket.id, support).await.unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));

    // The resumed status equals the old_status of the pause history row.
    let history = HistoryRepo::status_history(&pool, ticket.id).await.unwrap();
    let pause_row = history
        .iter()
        .rev()
        .find(|h| h.new_status == "paused")
        .expect("pause row");
    assert_eq!(pause_row.old_status, resumed.status);
}

#[sqlx::test(migrations = "./migrations")]
async fn resume_fallback_without_history(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;

    // Force a paused ticket with no pause history row (incomplete history).
    sqlx::query("UPDATE tickets SET status = 'paused', paused_at = NOW() WHERE id = $1")
        .bind(ticket.id)
        .execute(&pool)
        .await
        .unwrap();

    // Unassigned → pending_assignment.
    let resumed = TicketRepo::resume(&pool, ticket.id, support).await.unwrap();
    assert_eq!(resumed.status, "pending_assignment");

    // Assigned → in_progress.
    sqlx::query("UPDATE tickets SET status = 'paused', paused_at = NOW(), assigned_to = $2 WHERE id = $1")
        .bind(ticket.id)
        .bind(support)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM ticket_status_history WHERE ticket_id = $1")
        .bind(ticket.id)
        .execute(&pool)
        .await
        .unwrap();
    let resumed = TicketRepo::resume(&pool, ticket.id, support).await.unwrap();
    assert_eq!(resumed.status, "in_progress");
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn reply_side_effects(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let admin = seed_user(&pool, "admin1", "system_admin", None).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;
    TicketRepo::assign(&pool, ticket.id, support, admin, None).await.unwrap();

    // First support reply stamps first_replied_at (the IR SLA stop).
    let (updated, _) =
        TicketRepo::add_reply(&pool, ticket.id, support, "support", "Looking into it", false)
            .await
            .expect("support reply");
    let first = updated.first_replied_at.expect("first reply stamped");
    assert_eq!(updated.last_support_reply_at, Some(first));
    // Scenario C: the predicate now ignores `now`.
    assert!(!sla::is_ir_missed(
        updated.sla_ir_deadline,
        updated.first_replied_at,
        Utc::now() + Duration::days(30)
    ));

    // A second support reply does not move first_replied_at.
    let (updated, _) =
        TicketRepo::add_reply(&pool, ticket.id, support, "support", "Update", false)
            .await
            .unwrap();
    assert_eq!(updated.first_replied_at, Some(first));

    // Customer reply to a waiting_for_customer ticket bumps the status.
    TicketRepo::set_status(&pool, ticket.id, support, "waiting_for_customer", None, None, None)
        .await
        .unwrap();
    let (updated, _) =
        TicketRepo::add_reply(&pool, ticket.id, customer, "customer", "Still broken", false)
            .await
            .unwrap();
    assert_eq!(updated.status, "customer_follow_up");
    assert!(updated.last_customer_reply_at.is_some());

    // Customer replies to resolved tickets are rejected; support may.
    TicketRepo::set_status(&pool, ticket.id, support, "resolved", None, None, None)
        .await
        .unwrap();
    let err = TicketRepo::add_reply(&pool, ticket.id, customer, "customer", "hello?", false)
        .await
        .unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));
    TicketRepo::add_reply(&pool, ticket.id, support, "support", "closing note", false)
        .await
        .expect("staff may reply to resolved tickets");
}

// ---------------------------------------------------------------------------
// Status changes and ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn status_change_stamps_and_audits(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;

    let resolved =
        TicketRepo::set_status(&pool, ticket.id, support, "resolved", Some("fixed"), None, None)
            .await
            .unwrap();
    assert!(resolved.resolved_at.is_some());

    let closed = TicketRepo::set_status(
        &pool,
        ticket.id,
        support,
        "closed",
        None,
        Some("customer_completed"),
        Some("confirmed by phone"),
    )
    .await
    .unwrap();
    assert!(closed.closed_at.is_some());
    assert_eq!(closed.closing_reason_type.as_deref(), Some("customer_completed"));

    // One history row per observed transition.
    let history = HistoryRepo::status_history(&pool, ticket.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_status, "new_issue");
    assert_eq!(history[0].new_status, "resolved");
    assert_eq!(history[1].new_status, "closed");

    // Writing the current status again adds no row.
    TicketRepo::set_status(&pool, ticket.id, support, "closed", None, None, None)
        .await
        .unwrap();
    let history = HistoryRepo::status_history(&pool, ticket.id).await.unwrap();
    assert_eq!(history.len(), 2);

    // Pausing through set_status is rejected.
    let err = TicketRepo::set_status(&pool, ticket.id, support, "paused", None, None, None)
        .await
        .unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn rating_is_exactly_once_and_gated(pool: PgPool) {
    let company_id = seed_company(&pool, "acme").await;
    let customer = seed_user(&pool, "cust1", "customer", Some(company_id)).await;
    let other = seed_user(&pool, "cust2", "customer", Some(company_id)).await;
    let support = seed_user(&pool, "sup1", "support", None).await;

    let ticket = seed_ticket(&pool, company_id, customer).await;

    // Not rateable while open.
    let err = TicketRepo::rate(&pool, ticket.id, customer, 5, None).await.unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Validation(_)));

    TicketRepo::set_status(&pool, ticket.id, support, "resolved", None, None, None)
        .await
        .unwrap();

    // Only creator/submitter may rate.
    let err = TicketRepo::rate(&pool, ticket.id, other, 5, None).await.unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Forbidden(_)));

    let rating = TicketRepo::rate(&pool, ticket.id, customer, 4, Some("pretty good"))
        .await
        .expect("rate");
    assert_eq!(rating.rating, 4);

    // Second attempt rejected regardless of actor.
    let err = TicketRepo::rate(&pool, ticket.id, customer, 5, None).await.unwrap_err();
    assert_matches!(err, TransitionError::Domain(CoreError::Conflict(_)));
}
