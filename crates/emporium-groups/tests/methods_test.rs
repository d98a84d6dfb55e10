//! End-to-end tests for the remote method surface.

use emporium_core::error::EmporiumError;
use emporium_core::models::account::CreateAccount;
use emporium_core::models::shop::CreateShop;
use emporium_core::repository::{AccountRepository, ShopRepository};
use emporium_db::repository::{SurrealAccountRepository, SurrealShopRepository};
use emporium_groups::methods::{ADD_USER, CREATE_GROUP, REMOVE_USER};
use emporium_groups::{GroupService, GroupServiceConfig, MethodRegistry, StaticGate};
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Registry =
    MethodRegistry<SurrealShopRepository<Db>, SurrealAccountRepository<Db>, StaticGate>;

async fn setup(gate: StaticGate) -> (Registry, Surreal<Db>, Uuid, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    emporium_db::run_migrations(&db).await.unwrap();

    let shop = SurrealShopRepository::new(db.clone())
        .create(CreateShop {
            name: "Test Shop".into(),
        })
        .await
        .unwrap();
    let user = SurrealAccountRepository::new(db.clone())
        .create(CreateAccount {
            username: "alice".into(),
        })
        .await
        .unwrap();

    let registry = MethodRegistry::new(GroupService::new(
        SurrealShopRepository::new(db.clone()),
        SurrealAccountRepository::new(db.clone()),
        gate,
        GroupServiceConfig::default(),
    ));

    (registry, db, shop.id, user.id)
}

fn shop_manager() -> serde_json::Value {
    json!({
        "name": "Shop Manager",
        "permissions": ["sample-role1", "sample-role2"],
    })
}

#[tokio::test]
async fn create_group_via_method_name() {
    let (registry, db, shop_id, actor) = setup(StaticGate::allow()).await;

    let created = registry
        .call(actor, CREATE_GROUP, json!([shop_manager(), shop_id]))
        .await
        .unwrap();
    assert_eq!(created["name"], "Shop Manager");
    assert!(created["groupId"].is_string());

    let shop = SurrealShopRepository::new(db).get_by_id(shop_id).await.unwrap();
    assert_eq!(shop.groups[0].name, "Shop Manager");
}

#[tokio::test]
async fn create_group_denied_via_method_name() {
    let (registry, _db, shop_id, actor) = setup(StaticGate::deny()).await;

    let err = registry
        .call(actor, CREATE_GROUP, json!([shop_manager(), shop_id]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Access Denied"));
}

#[tokio::test]
async fn add_and_remove_user_via_method_names() {
    let (registry, db, shop_id, user_id) = setup(StaticGate::allow()).await;

    // The group record is passed back exactly as the shop stores it.
    registry
        .call(user_id, CREATE_GROUP, json!([shop_manager(), shop_id]))
        .await
        .unwrap();
    let shop = SurrealShopRepository::new(db.clone())
        .get_by_id(shop_id)
        .await
        .unwrap();
    let group_data = serde_json::to_value(&shop.groups[0]).unwrap();

    let added = registry
        .call(user_id, ADD_USER, json!([user_id, group_data, shop_id]))
        .await
        .unwrap();
    assert_eq!(added["groups"][0]["shopId"], shop_id.to_string());
    assert_eq!(added["groups"][0]["groupId"][0], group_data["groupId"]);
    let roles = added["roles"][shop_id.to_string()].as_array().unwrap();
    assert!(roles.contains(&json!("sample-role1")));
    assert!(roles.contains(&json!("sample-role2")));

    let removed = registry
        .call(
            user_id,
            REMOVE_USER,
            json!([user_id, group_data["groupId"], shop_id]),
        )
        .await
        .unwrap();
    assert_eq!(removed["groups"], json!([]));

    let account = SurrealAccountRepository::new(db)
        .get_by_id(user_id)
        .await
        .unwrap();
    assert!(!account.has_role(shop_id, "sample-role1"));
    assert!(!account.has_role(shop_id, "sample-role2"));
}

#[tokio::test]
async fn unknown_method_is_not_found() {
    let (registry, _db, shop_id, actor) = setup(StaticGate::allow()).await;

    let err = registry
        .call(actor, "group/deleteGroup", json!([shop_id]))
        .await
        .unwrap_err();
    assert!(matches!(err, EmporiumError::NotFound { ref entity, .. } if entity == "method"));
    assert_eq!(registry.methods().len(), 3);
}

#[tokio::test]
async fn wrong_arity_is_a_validation_error() {
    let (registry, _db, shop_id, actor) = setup(StaticGate::allow()).await;

    let err = registry
        .call(actor, ADD_USER, json!([actor, shop_id]))
        .await
        .unwrap_err();
    assert!(matches!(err, EmporiumError::Validation { .. }));
}
