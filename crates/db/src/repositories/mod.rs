//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Ticket lifecycle transitions run
//! inside a single transaction that locks the ticket row and writes the
//! audit trail together with the state change.

pub mod company_repo;
pub mod history_repo;
pub mod label_repo;
pub mod monitoring_repo;
pub mod notification_log_repo;
pub mod notification_preference_repo;
pub mod rating_repo;
pub mod reply_repo;
pub mod template_repo;
pub mod ticket_repo;
pub mod ticket_type_repo;
pub mod user_repo;

pub use company_repo::CompanyRepo;
pub use history_repo::HistoryRepo;
pub use label_repo::LabelRepo;
pub use monitoring_repo::MonitoringRepo;
pub use notification_log_repo::NotificationLogRepo;
pub use notification_preference_repo::NotificationPreferenceRepo;
pub use rating_repo::RatingRepo;
pub use reply_repo::ReplyRepo;
pub use template_repo::TemplateRepo;
pub use ticket_repo::{TicketRepo, TransitionError};
pub use ticket_type_repo::TicketTypeRepo;
pub use user_repo::UserRepo;
