use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Actor, CreateUserCmd, EngineError, Operation, ResultEngine, Role, UpdateUserCmd, User,
    UserFilter, UserStatus,
    access::authorize,
    movements, users,
    util::{normalize_optional_text, validate_email},
};

use super::{Engine, with_tx};

/// Turns a unique index violation on `users.email` into `DuplicateEmail`.
fn map_unique_email(err: DbErr, email: &str) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::DuplicateEmail(email.to_string()),
        _ => EngineError::Database(err),
    }
}

/// Case-insensitive substring match on display name or email.
///
/// Folded in Rust: SQLite's `LOWER` leaves non-ASCII capitals alone.
fn matches_query(user: &User, needle: &str) -> bool {
    user.display_name.to_lowercase().contains(needle) || user.email.to_lowercase().contains(needle)
}

/// Validated fields of a user about to be inserted.
struct NewUser {
    email: String,
    display_name: String,
    phone: Option<String>,
    status: UserStatus,
}

impl NewUser {
    fn from_cmd(cmd: &CreateUserCmd) -> ResultEngine<Self> {
        let email = validate_email(&cmd.email)?;
        let display_name =
            normalize_optional_text(cmd.display_name.as_deref()).unwrap_or_else(|| email.clone());
        Ok(Self {
            phone: normalize_optional_text(cmd.phone.as_deref()),
            status: cmd.status.unwrap_or(UserStatus::Active),
            email,
            display_name,
        })
    }
}

impl Engine {
    async fn email_taken(
        &self,
        db: &DatabaseTransaction,
        email: &str,
        except: Option<Uuid>,
    ) -> ResultEngine<bool> {
        let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
        if let Some(except) = except {
            query = query.filter(users::Column::Id.ne(except.to_string()));
        }
        Ok(query.one(db).await?.is_some())
    }

    async fn insert_user(
        &self,
        db: &DatabaseTransaction,
        new: NewUser,
        role: Role,
    ) -> ResultEngine<User> {
        if self.email_taken(db, &new.email, None).await? {
            return Err(EngineError::DuplicateEmail(new.email));
        }
        let user = User {
            id: Uuid::now_v7(),
            display_name: new.display_name,
            email: new.email,
            phone: new.phone,
            role,
            status: new.status,
            created_at: Utc::now(),
        };
        users::ActiveModel::from(&user)
            .insert(db)
            .await
            .map_err(|err| map_unique_email(err, &user.email))?;
        Ok(user)
    }

    /// Resolves a forwarded user id into the session actor.
    ///
    /// Unknown and inactive users have no session.
    pub async fn resolve_session(&self, user_id: Uuid) -> ResultEngine<Actor> {
        let model = users::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or(EngineError::Unauthenticated)?;
        let user = User::try_from(model)?;
        if !user.is_active() {
            tracing::warn!(user_id = %user_id, "inactive user refused a session");
            return Err(EngineError::Unauthenticated);
        }
        Ok(Actor::new(user.id, user.role))
    }

    /// Looks a user up by email, bypassing the access gate.
    ///
    /// Meant for trusted local tooling only.
    pub async fn find_user_by_email(&self, email: &str) -> ResultEngine<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.database)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Creates the first administrator. Refused once any administrator exists.
    pub async fn bootstrap_admin(&self, cmd: CreateUserCmd) -> ResultEngine<User> {
        let new = NewUser::from_cmd(&cmd)?;
        with_tx!(self, |db_tx| {
            let existing_admin = users::Entity::find()
                .filter(users::Column::Role.eq(Role::Admin.as_str()))
                .one(&db_tx)
                .await?;
            if existing_admin.is_some() {
                return Err(EngineError::Forbidden(
                    "an administrator already exists".to_string(),
                ));
            }
            let user = self.insert_user(&db_tx, new, Role::Admin).await?;
            tracing::info!(user_id = %user.id, "administrator bootstrapped");
            Ok(user)
        })
    }

    /// Lists users newest first.
    pub async fn list_users(&self, actor: &Actor, filter: &UserFilter) -> ResultEngine<Vec<User>> {
        authorize(actor, Operation::ListUsers)?;

        let mut query = users::Entity::find();
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(users::Column::Status.eq(status.as_str()));
        }

        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .order_by_desc(users::Column::Id)
            .all(&self.database)
            .await?;
        let needle = normalize_optional_text(filter.query.as_deref()).map(|q| q.to_lowercase());
        let found = models
            .into_iter()
            .map(User::try_from)
            .filter(|user| match (user, needle.as_deref()) {
                (Ok(user), Some(needle)) => matches_query(user, needle),
                _ => true,
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        tracing::debug!(count = found.len(), "users listed");
        Ok(found)
    }

    /// Registers a user. Role defaults to [`Role::User`].
    pub async fn create_user(&self, actor: &Actor, cmd: CreateUserCmd) -> ResultEngine<User> {
        authorize(actor, Operation::CreateUser)?;
        let new = NewUser::from_cmd(&cmd)?;
        let role = cmd.role.unwrap_or(Role::User);

        with_tx!(self, |db_tx| {
            let user = self.insert_user(&db_tx, new, role).await?;
            tracing::info!(user_id = %user.id, role = %user.role, "user created");
            Ok(user)
        })
    }

    /// Applies a partial update to a user.
    pub async fn update_user(&self, actor: &Actor, cmd: UpdateUserCmd) -> ResultEngine<User> {
        authorize(actor, Operation::UpdateUser)?;
        let new_email = normalize_optional_text(cmd.email.as_deref())
            .map(|email| validate_email(&email))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, cmd.user_id).await?;
            let current_email = model.email.clone();
            let mut active: users::ActiveModel = model.into();

            let mut email = current_email.clone();
            if let Some(new_email) = new_email
                && new_email != current_email
            {
                if self
                    .email_taken(&db_tx, &new_email, Some(cmd.user_id))
                    .await?
                {
                    return Err(EngineError::DuplicateEmail(new_email));
                }
                active.email = ActiveValue::Set(new_email.clone());
                email = new_email;
            }
            if let Some(display_name) = cmd.display_name.as_deref() {
                let display_name =
                    normalize_optional_text(Some(display_name)).unwrap_or_else(|| email.clone());
                active.display_name = ActiveValue::Set(display_name);
            }
            if let Some(phone) = cmd.phone.as_deref() {
                active.phone = ActiveValue::Set(normalize_optional_text(Some(phone)));
            }
            if let Some(role) = cmd.role {
                active.role = ActiveValue::Set(role.as_str().to_string());
            }
            if let Some(status) = cmd.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }

            let updated = active
                .update(&db_tx)
                .await
                .map_err(|err| map_unique_email(err, &email))?;
            tracing::info!(user_id = %cmd.user_id, "user updated");
            User::try_from(updated)
        })
    }

    /// Deletes a user together with every movement they own.
    pub async fn delete_user(&self, actor: &Actor, user_id: Uuid) -> ResultEngine<Uuid> {
        authorize(actor, Operation::DeleteUser)?;
        if user_id == actor.user_id {
            return Err(EngineError::SelfDeletionForbidden);
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let removed = movements::Entity::delete_many()
                .filter(movements::Column::OwnerUserId.eq(user_id.to_string()))
                .exec(&db_tx)
                .await?;
            users::Entity::delete_by_id(user_id.to_string())
                .exec(&db_tx)
                .await?;

            tracing::info!(
                user_id = %user_id,
                movements_removed = removed.rows_affected,
                "user deleted"
            );
            Ok(user_id)
        })
    }
}
