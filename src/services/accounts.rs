use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Page, Pagination, lookup, nullable, paginate, search_term};
use crate::auth::password;
use crate::entities::document::Document;
use crate::entities::user::{self, Role};
use crate::entities::{buyer_profile, seller_profile};
use crate::error::AppError;

// ─────────────────────────────────────────────────────────────────────────────
// Inputs
// ─────────────────────────────────────────────────────────────────────────────

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub profile_picture: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub q: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBuyerProfile {
    pub user_id: Uuid,
    #[serde(default)]
    pub saved_searches: Document,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProfileChanges {
    pub saved_searches: Option<Document>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSellerProfile {
    pub user_id: Uuid,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfileChanges {
    #[serde(default, deserialize_with = "nullable")]
    pub company_name: Option<Option<String>>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFilter {
    pub q: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Outputs
// ─────────────────────────────────────────────────────────────────────────────

/// A user with whichever profiles they own.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: user::Model,
    pub buyer_profile: Option<buyer_profile::Model>,
    pub seller_profile: Option<seller_profile::Model>,
}

/// A profile row labelled with its owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRow<P> {
    #[serde(flatten)]
    pub profile: P,
    pub user: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

pub struct UserService;

impl UserService {
    /// List users, newest first. `q` matches username, email, first or last name.
    pub async fn list(
        db: &DatabaseConnection,
        filter: &UserFilter,
        pagination: Pagination,
    ) -> Result<Page<user::Model>, AppError> {
        let mut select = user::Entity::find().order_by_desc(user::Column::CreatedAt);

        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(user::Column::Username.contains(q))
                    .add(user::Column::Email.contains(q))
                    .add(user::Column::FirstName.contains(q))
                    .add(user::Column::LastName.contains(q)),
            );
        }
        if let Some(role) = filter.role {
            select = select.filter(user::Column::Role.eq(role));
        }
        if let Some(is_active) = filter.is_active {
            select = select.filter(user::Column::IsActive.eq(is_active));
        }

        paginate(db, select, pagination).await
    }

    pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found.")))
    }

    pub async fn detail(db: &DatabaseConnection, id: Uuid) -> Result<UserDetail, AppError> {
        let user = Self::find(db, id).await?;
        let buyer_profile = user.find_related(buyer_profile::Entity).one(db).await?;
        let seller_profile = user.find_related(seller_profile::Entity).one(db).await?;
        Ok(UserDetail {
            user,
            buyer_profile,
            seller_profile,
        })
    }

    /// Create an account with an Argon2id password hash.
    pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<user::Model, AppError> {
        password::validate_password(&input.password).map_err(AppError::Validation)?;
        let password_hash = password::hash_password(&input.password)?;

        let model = user::ActiveModel {
            username: Set(input.username.trim().to_string()),
            email: Set(normalize_email(&input.email)),
            password_hash: Set(password_hash),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            role: Set(input.role),
            phone_number: Set(input.phone_number),
            profile_picture: Set(input.profile_picture),
            is_active: Set(input.is_active),
            ..Default::default()
        };

        let created = model.insert(db).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "User created");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<user::Model, AppError> {
        let mut active = Self::find(db, id).await?.into_active_model();

        if let Some(username) = changes.username {
            active.username = Set(username.trim().to_string());
        }
        if let Some(email) = changes.email {
            active.email = Set(normalize_email(&email));
        }
        if let Some(new_password) = changes.password {
            password::validate_password(&new_password).map_err(AppError::Validation)?;
            active.password_hash = Set(password::hash_password(&new_password)?);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        if let Some(phone_number) = changes.phone_number {
            active.phone_number = Set(phone_number);
        }
        if let Some(profile_picture) = changes.profile_picture {
            active.profile_picture = Set(profile_picture);
        }
        if let Some(is_active) = changes.is_active {
            active.is_active = Set(is_active);
        }

        Ok(active.update(db).await?)
    }

    /// Delete a user. Profiles, listings, favorites, messages and reports go with it.
    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = user::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("User {id} not found.")));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Resolve `login` (username or email) and check the password.
    ///
    /// Unknown logins and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate(
        db: &DatabaseConnection,
        login: &str,
        supplied_password: &str,
    ) -> Result<user::Model, AppError> {
        let invalid = || AppError::Unauthorized("Invalid login or password.".to_string());

        let login = login.trim();
        let found = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(login))
                    .add(user::Column::Email.eq(normalize_email(login))),
            )
            .one(db)
            .await?
            .ok_or_else(invalid)?;

        if !password::verify_password(supplied_password, &found.password_hash)? {
            return Err(invalid());
        }
        if !found.is_active {
            return Err(AppError::Forbidden("Account is inactive.".to_string()));
        }

        Ok(found)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Profiles
// ─────────────────────────────────────────────────────────────────────────────

pub struct ProfileService;

impl ProfileService {
    async fn label_owners<P>(
        db: &DatabaseConnection,
        page: Page<P>,
        owner: impl Fn(&P) -> Uuid,
    ) -> Result<Page<ProfileRow<P>>, AppError> {
        let users = lookup::users(db, page.items.iter().map(&owner)).await?;
        Ok(page.map(|profile| {
            let user = users
                .get(&owner(&profile))
                .map(user::Model::label)
                .unwrap_or_default();
            ProfileRow { profile, user }
        }))
    }

    pub async fn list_buyers(
        db: &DatabaseConnection,
        filter: &ProfileFilter,
        pagination: Pagination,
    ) -> Result<Page<ProfileRow<buyer_profile::Model>>, AppError> {
        let mut select = buyer_profile::Entity::find().order_by_desc(buyer_profile::Column::CreatedAt);
        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(buyer_profile::Column::UserId.in_subquery(lookup::users_matching(q)));
        }
        let page = paginate(db, select, pagination).await?;
        Self::label_owners(db, page, |p| p.user_id).await
    }

    pub async fn find_buyer(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<buyer_profile::Model, AppError> {
        buyer_profile::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Buyer profile {id} not found.")))
    }

    /// A second profile for the same user is rejected as a conflict.
    pub async fn create_buyer(
        db: &DatabaseConnection,
        input: NewBuyerProfile,
    ) -> Result<buyer_profile::Model, AppError> {
        let model = buyer_profile::ActiveModel {
            user_id: Set(input.user_id),
            saved_searches: Set(input.saved_searches),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update_buyer(
        db: &DatabaseConnection,
        id: Uuid,
        changes: BuyerProfileChanges,
    ) -> Result<buyer_profile::Model, AppError> {
        let mut active = Self::find_buyer(db, id).await?.into_active_model();
        if let Some(saved_searches) = changes.saved_searches {
            active.saved_searches = Set(saved_searches);
        }
        Ok(active.update(db).await?)
    }

    pub async fn delete_buyer(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = buyer_profile::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Buyer profile {id} not found.")));
        }
        Ok(())
    }

    /// `q` matches the owner's username or email, or the company name.
    pub async fn list_sellers(
        db: &DatabaseConnection,
        filter: &ProfileFilter,
        pagination: Pagination,
    ) -> Result<Page<ProfileRow<seller_profile::Model>>, AppError> {
        let mut select =
            seller_profile::Entity::find().order_by_desc(seller_profile::Column::CreatedAt);
        if let Some(q) = search_term(filter.q.as_deref()) {
            select = select.filter(
                Condition::any()
                    .add(seller_profile::Column::UserId.in_subquery(lookup::users_matching(q)))
                    .add(seller_profile::Column::CompanyName.contains(q)),
            );
        }
        let page = paginate(db, select, pagination).await?;
        Self::label_owners(db, page, |p| p.user_id).await
    }

    pub async fn find_seller(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<seller_profile::Model, AppError> {
        seller_profile::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Seller profile {id} not found.")))
    }

    pub async fn create_seller(
        db: &DatabaseConnection,
        input: NewSellerProfile,
    ) -> Result<seller_profile::Model, AppError> {
        let model = seller_profile::ActiveModel {
            user_id: Set(input.user_id),
            company_name: Set(input.company_name),
            rating: Set(input.rating),
            ..Default::default()
        };
        Ok(model.insert(db).await?)
    }

    pub async fn update_seller(
        db: &DatabaseConnection,
        id: Uuid,
        changes: SellerProfileChanges,
    ) -> Result<seller_profile::Model, AppError> {
        let mut active = Self::find_seller(db, id).await?.into_active_model();
        if let Some(company_name) = changes.company_name {
            active.company_name = Set(company_name);
        }
        if let Some(rating) = changes.rating {
            active.rating = Set(rating);
        }
        Ok(active.update(db).await?)
    }

    pub async fn delete_seller(db: &DatabaseConnection, id: Uuid) -> Result<(), AppError> {
        let result = seller_profile::Entity::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Seller profile {id} not found.")));
        }
        Ok(())
    }
}
