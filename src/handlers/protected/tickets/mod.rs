// Ticket lifecycle handlers. Writes go through the hook pipeline, which
// persists the ticket and relays it to the tenant room.

use uuid::Uuid;

use crate::auth::Role;
use crate::database::models::Ticket;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

pub mod assign;
pub mod create;
pub mod list;
pub mod rating;
pub mod show;
pub mod suggestions;
pub mod update;

pub use assign::assign;
pub use create::create;
pub use list::list;
pub use rating::rate;
pub use show::show;
pub use suggestions::suggestions;
pub use update::update;

/// Load a ticket the caller may see. Other tenants' tickets and, for
/// employees, other people's tickets look like they do not exist.
pub(crate) async fn load_visible(state: &AppState, user: &AuthUser, id: Uuid) -> Result<Ticket, ApiError> {
    let not_found = || ApiError::not_found(format!("Ticket {} not found", id));
    let ticket = state.store.get_ticket(id).await?.ok_or_else(not_found)?;

    if !user.can_see(ticket.company_id) {
        return Err(not_found());
    }
    if user.role == Role::Employee && ticket.created_by != user.user_id {
        return Err(not_found());
    }
    Ok(ticket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn employees_only_see_their_own_tickets() {
        let ctx = TestContext::new().await.unwrap();
        let ticket = ctx.file_ticket("abebe@mesob.et", "Laptop fan", "Hardware").await.unwrap();

        let owner = ctx.auth_user("abebe@mesob.et").await.unwrap();
        assert_eq!(load_visible(&ctx.state, &owner, ticket.id).await.unwrap().id, ticket.id);

        let admin = ctx.auth_user("admin@mesob.et").await.unwrap();
        assert!(load_visible(&ctx.state, &admin, ticket.id).await.is_ok());

        let technician = ctx.auth_user("tigist@mesob.et").await.unwrap();
        assert!(load_visible(&ctx.state, &technician, ticket.id).await.is_ok());
    }

    #[tokio::test]
    async fn other_tenants_get_not_found() {
        let ctx = TestContext::new().await.unwrap();
        let ticket = ctx.file_ticket("abebe@mesob.et", "Laptop fan", "Hardware").await.unwrap();

        let foreign_admin = ctx.auth_user("admin@abay.et").await.unwrap();
        let err = load_visible(&ctx.state, &foreign_admin, ticket.id).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let super_admin = ctx.auth_user("super@mesob.et").await.unwrap();
        assert!(load_visible(&ctx.state, &super_admin, ticket.id).await.is_ok());
    }
}
