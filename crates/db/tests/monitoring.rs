//! Integration tests for the SLA / idle monitoring queries.

use chrono::Utc;
use helpdesk_core::sla;
use sqlx::PgPool;

use helpdesk_db::models::company::CreateCompany;
use helpdesk_db::models::ticket::CreateTicket;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{CompanyRepo, MonitoringRepo, TicketRepo, UserRepo};

async fn seed(pool: &PgPool) -> (i64, i64) {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            name: "Acme".to_string(),
            code: "acme".to_string(),
            contact_person: None,
            contact_email: None,
            contact_phone: None,
        },
    )
    .await
    .unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "cust1".to_string(),
            email: None,
            password: "unused".to_string(),
            role: Some("customer".to_string()),
            company_id: Some(company.id),
            phone: None,
            feishu_id: None,
            enterprise_wechat_id: None,
        },
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$AAAAAAAAAAA",
    )
    .await
    .unwrap();
    (company.id, user.id)
}

async fn seed_ticket(pool: &PgPool, company_id: i64, user_id: i64, n: u32) -> i64 {
    let now = Utc::now();
    let ticket = TicketRepo::create(
        pool,
        &CreateTicket {
            title: format!("Ticket {n}"),
            description: "desc".to_string(),
            company_id,
            urgency: None,
            category: None,
            subcategory: None,
            contact_method: None,
            contact_info: None,
            ticket_type_id: None,
        },
        user_id,
        3,
        now,
        sla::compute_deadlines(now, Some(240), Some(2880)),
        &format!("mon-slug-{n}"),
    )
    .await
    .unwrap();
    ticket.id
}

#[sqlx::test(migrations = "./migrations")]
async fn approaching_and_missed_ir(pool: PgPool) {
    let (company_id, user_id) = seed(&pool).await;

    // Deadline 30 minutes out: approaching within a 60-minute window.
    let approaching = seed_ticket(&pool, company_id, user_id, 1).await;
    sqlx::query("UPDATE tickets SET sla_ir_deadline = NOW() + INTERVAL '30 minutes' WHERE id = $1")
        .bind(approaching)
        .execute(&pool)
        .await
        .unwrap();

    // Deadline one minute in the past, never replied: missed.
    let missed = seed_ticket(&pool, company_id, user_id, 2).await;
    sqlx::query("UPDATE tickets SET sla_ir_deadline = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(missed)
        .execute(&pool)
        .await
        .unwrap();

    // No deadline at all: never missed, never approaching.
    let untracked = seed_ticket(&pool, company_id, user_id, 3).await;
    sqlx::query("UPDATE tickets SET sla_ir_deadline = NULL WHERE id = $1")
        .bind(untracked)
        .execute(&pool)
        .await
        .unwrap();

    let result = MonitoringRepo::approaching_ir(&pool, 60).await.unwrap();
    assert_eq!(result.iter().map(|t| t.id).collect::<Vec<_>>(), vec![approaching]);

    let result = MonitoringRepo::missed_ir(&pool).await.unwrap();
    assert_eq!(result.iter().map(|t| t.id).collect::<Vec<_>>(), vec![missed]);
}

#[sqlx::test(migrations = "./migrations")]
async fn paused_tickets_are_exempt(pool: PgPool) {
    let (company_id, user_id) = seed(&pool).await;

    // Scenario B counterpart: a missed ticket disappears from the result
    // when paused.
    let ticket = seed_ticket(&pool, company_id, user_id, 1).await;
    sqlx::query("UPDATE tickets SET sla_ir_deadline = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(ticket)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(MonitoringRepo::missed_ir(&pool).await.unwrap().len(), 1);

    sqlx::query("UPDATE tickets SET status = 'paused' WHERE id = $1")
        .bind(ticket)
        .execute(&pool)
        .await
        .unwrap();
    assert!(MonitoringRepo::missed_ir(&pool).await.unwrap().is_empty());
    assert!(MonitoringRepo::idle(&pool, 0).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn late_first_reply_counts_as_missed(pool: PgPool) {
    let (company_id, user_id) = seed(&pool).await;

    let ticket = seed_ticket(&pool, company_id, user_id, 1).await;
    sqlx::query(
        "UPDATE tickets \
         SET sla_ir_deadline = NOW() - INTERVAL '2 hours', \
             first_replied_at = NOW() - INTERVAL '1 hour' \
         WHERE id = $1",
    )
    .bind(ticket)
    .execute(&pool)
    .await
    .unwrap();

    let result = MonitoringRepo::missed_ir(&pool).await.unwrap();
    assert_eq!(result.len(), 1);

    // An in-time first reply clears it.
    sqlx::query("UPDATE tickets SET first_replied_at = NOW() - INTERVAL '3 hours' WHERE id = $1")
        .bind(ticket)
        .execute(&pool)
        .await
        .unwrap();
    assert!(MonitoringRepo::missed_ir(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn resolution_queries_mirror_ir(pool: PgPool) {
    let (company_id, user_id) = seed(&pool).await;

    let approaching = seed_ticket(&pool, company_id, user_id, 1).await;
    sqlx::query(
        "UPDATE tickets SET sla_resolution_deadline = NOW() + INTERVAL '2 hours' WHERE id = $1",
    )
    .bind(approaching)
    .execute(&pool)
    .await
    .unwrap();

    let missed = seed_ticket(&pool, company_id, user_id, 2).await;
    sqlx::query(
        "UPDATE tickets SET sla_resolution_deadline = NOW() - INTERVAL '1 hour' WHERE id = $1",
    )
    .bind(missed)
    .execute(&pool)
    .await
    .unwrap();

    let result = MonitoringRepo::approaching_resolution(&pool, 180).await.unwrap();
    assert!(result.iter().any(|t| t.id == approaching));
    assert!(!result.iter().any(|t| t.id == missed));

    let result = MonitoringRepo::missed_resolution(&pool).await.unwrap();
    assert_eq!(result.iter().map(|t| t.id).collect::<Vec<_>>(), vec![missed]);
}

#[sqlx::test(migrations = "./migrations")]
async fn idle_orders_stalest_first(pool: PgPool) {
    let (company_id, user_id) = seed(&pool).await;

    let stale = seed_ticket(&pool, company_id, user_id, 1).await;
    let staler = seed_ticket(&pool, company_id, user_id, 2).await;
    let fresh = seed_ticket(&pool, company_id, user_id, 3).await;

    sqlx::query("UPDATE tickets SET last_activity_at = NOW() - INTERVAL '4 days' WHERE id = $1")
        .bind(stale)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE tickets SET last_activity_at = NOW() - INTERVAL '9 days' WHERE id = $1")
        .bind(staler)
        .execute(&pool)
        .await
        .unwrap();

    let result = MonitoringRepo::idle(&pool, 3).await.unwrap();
    assert_eq!(
        result.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![staler, stale]
    );
    assert!(!result.iter().any(|t| t.id == fresh));
}
