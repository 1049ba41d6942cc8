//! Integration tests for the profile repository.

use assert_matches::assert_matches;
use chimaek_core::roles::Role;
use chimaek_db::repositories::ProfileRepo;
use chimaek_db::{violated_constraint, UNIQUE_VIOLATION};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_ensure_creates_once_with_initial_role(pool: PgPool) {
    let created = ProfileRepo::ensure(&pool, 10, Role::Admin).await.unwrap();
    assert_eq!(created.role(), Role::Admin);
    assert!(created.display_name.is_none());

    // A later token with another role does not overwrite the stored one.
    let again = ProfileRepo::ensure(&pool, 10, Role::Customer).await.unwrap();
    assert_eq!(again.id, created.id);
    assert_eq!(again.role(), Role::Admin);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_display_name_upsert_keeps_role(pool: PgPool) {
    ProfileRepo::set_role(&pool, 3, Role::Admin).await.unwrap();

    let profile = ProfileRepo::set_display_name(&pool, 3, Some("Hana"), Role::Customer)
        .await
        .unwrap();
    assert_eq!(profile.display_name.as_deref(), Some("Hana"));
    assert_eq!(profile.role(), Role::Admin);

    let cleared = ProfileRepo::set_display_name(&pool, 3, None, Role::Customer)
        .await
        .unwrap();
    assert!(cleared.display_name.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_role_reflects_latest_change(pool: PgPool) {
    assert_eq!(ProfileRepo::find_role(&pool, 5).await.unwrap(), None);

    ProfileRepo::set_role(&pool, 5, Role::SuperAdmin).await.unwrap();
    assert_eq!(ProfileRepo::find_role(&pool, 5).await.unwrap(), Some(Role::SuperAdmin));

    ProfileRepo::set_role(&pool, 5, Role::Customer).await.unwrap();
    assert_eq!(ProfileRepo::find_role(&pool, 5).await.unwrap(), Some(Role::Customer));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_role_rejected_by_check_constraint(pool: PgPool) {
    let result = sqlx::query("INSERT INTO profiles (user_id, role) VALUES (1, 'owner')")
        .execute(&pool)
        .await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_profile_per_user(pool: PgPool) {
    ProfileRepo::ensure(&pool, 8, Role::Customer).await.unwrap();
    let err = sqlx::query("INSERT INTO profiles (user_id) VALUES (8)")
        .execute(&pool)
        .await
        .unwrap_err();
    assert_eq!(
        violated_constraint(&err, UNIQUE_VIOLATION),
        Some("uq_profiles_user_id")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_all_newest_first(pool: PgPool) {
    ProfileRepo::ensure(&pool, 1, Role::Customer).await.unwrap();
    ProfileRepo::ensure(&pool, 2, Role::Customer).await.unwrap();

    let users: Vec<i64> = ProfileRepo::list_all(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.user_id)
        .collect();
    assert_eq!(users, vec![2, 1]);
}
