use std::sync::Arc;

use shared::{
    CreateUserRequest, DeleteUserResponse, PendingUsersResponse, UpdateUserRequest, User, UserListResponse,
    UserResponse, UserWithPaymentStatus,
};
use tracing::{info, warn};

use super::aggregation::{pending_users, MonthSelector};
use super::clock::Clock;
use super::error::DomainError;
use super::filters::filter_users;
use super::months::display_name;
use super::payment_status::{compute_payment_status, TargetMonths};
use super::validation::validate_user;
use crate::storage::{PaymentStorage, UserStorage};

/// Service for managing members and deriving their payment status
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStorage>,
    payments: Arc<dyn PaymentStorage>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStorage>, payments: Arc<dyn PaymentStorage>) -> Self {
        Self { users, payments }
    }

    /// List users, narrowed by a free-text search when one is given
    pub async fn list_users(&self, search: &str) -> Result<UserListResponse, DomainError> {
        info!("Listing users (search={:?})", search);

        let users = self.users.list_users().await?;
        let users = filter_users(&users, search.trim());

        info!("Found {} users", users.len());
        Ok(UserListResponse { users })
    }

    /// Create a new user
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, DomainError> {
        info!("Creating user: name={}, email={}", request.name, request.email);

        let request = trimmed(request);
        validate_user(&request).map_err(DomainError::Validation)?;

        let user = User {
            id: User::generate_id(),
            name: request.name,
            email: request.email,
            mobile: request.mobile,
            address: request.address,
            seat_no: request.seat_no,
            joining_date: request.joining_date,
        };
        self.users.store_user(&user).await?;

        info!("Created user: {} with ID: {}", user.name, user.id);

        let users = self.users.list_users().await?;
        Ok(UserResponse {
            user,
            users,
            success_message: "User added successfully".to_string(),
        })
    }

    /// Update an existing user. Fields missing from the request keep their
    /// current value; the merged user must still pass validation.
    pub async fn update_user(&self, user_id: &str, request: UpdateUserRequest) -> Result<UserResponse, DomainError> {
        info!("Updating user: {}", user_id);

        let existing = self.find_user(user_id).await?;

        let merged = trimmed(CreateUserRequest {
            name: request.name.unwrap_or(existing.name),
            email: request.email.unwrap_or(existing.email),
            mobile: request.mobile.unwrap_or(existing.mobile),
            address: request.address.unwrap_or(existing.address),
            seat_no: request.seat_no.unwrap_or(existing.seat_no),
            joining_date: request.joining_date.unwrap_or(existing.joining_date),
        });
        validate_user(&merged).map_err(DomainError::Validation)?;

        let user = User {
            id: existing.id,
            name: merged.name,
            email: merged.email,
            mobile: merged.mobile,
            address: merged.address,
            seat_no: merged.seat_no,
            joining_date: merged.joining_date,
        };
        self.users.update_user(&user).await?;

        info!("Updated user: {} with ID: {}", user.name, user.id);

        let users = self.users.list_users().await?;
        Ok(UserResponse {
            user,
            users,
            success_message: "User updated successfully".to_string(),
        })
    }

    /// Delete a user together with their payments
    pub async fn delete_user(&self, user_id: &str) -> Result<DeleteUserResponse, DomainError> {
        info!("Deleting user: {}", user_id);

        let user = self.find_user(user_id).await?;

        let removed = self.payments.delete_payments_for_user(user_id).await?;
        self.users.delete_user(user_id).await?;

        info!("Deleted user: {} with ID: {} ({} payments removed)", user.name, user.id, removed);

        let (users, payments) = tokio::try_join!(self.users.list_users(), self.payments.list_payments())?;
        Ok(DeleteUserResponse {
            deleted_user_id: user.id,
            users,
            payments,
            success_message: "User deleted successfully".to_string(),
        })
    }

    /// Every user with their paid flags for this month and last month
    pub async fn users_with_status(&self, clock: &dyn Clock) -> Result<Vec<UserWithPaymentStatus>, DomainError> {
        self.statuses_for(&TargetMonths::from_clock(clock)).await
    }

    /// Users who have not paid for the selected month
    pub async fn pending_users(
        &self,
        clock: &dyn Clock,
        selector: MonthSelector,
    ) -> Result<PendingUsersResponse, DomainError> {
        let targets = TargetMonths::from_clock(clock);
        let month = match selector {
            MonthSelector::Current => targets.current,
            MonthSelector::Previous => targets.previous,
        };

        let statuses = self.statuses_for(&targets).await?;
        let users = pending_users(&statuses, selector);
        info!("{} users pending for {}", users.len(), month);

        Ok(PendingUsersResponse {
            month,
            month_name: display_name(&month),
            users,
        })
    }

    async fn statuses_for(&self, targets: &TargetMonths) -> Result<Vec<UserWithPaymentStatus>, DomainError> {
        // both lists must be loaded before deriving anything
        let (users, payments) = tokio::try_join!(self.users.list_users(), self.payments.list_payments())?;

        info!(
            "Deriving payment status for {} users over {} payments ({} / {})",
            users.len(),
            payments.len(),
            targets.current,
            targets.previous
        );

        Ok(compute_payment_status(&users, &payments, targets))
    }

    async fn find_user(&self, user_id: &str) -> Result<User, DomainError> {
        let users = self.users.list_users().await?;
        match users.into_iter().find(|u| u.id == user_id) {
            Some(user) => Ok(user),
            None => {
                warn!("User not found: {}", user_id);
                Err(DomainError::NotFound(format!("User {}", user_id)))
            }
        }
    }
}

fn trimmed(request: CreateUserRequest) -> CreateUserRequest {
    CreateUserRequest {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        mobile: request.mobile.trim().to_string(),
        address: request.address.trim().to_string(),
        seat_no: request.seat_no.trim().to_string(),
        joining_date: request.joining_date.trim().to_string(),
    }
}
