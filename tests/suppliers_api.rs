//! Supplier CRUD and the delete-detaches-items policy

mod common;

use common::TestApp;
use stockroom::model::{ItemInput, SupplierInput};
use uuid::Uuid;

fn acme_input() -> SupplierInput {
    SupplierInput {
        name: "Acme Supplies".to_string(),
        email: Some("sales@acme.example".to_string()),
        phone: Some("555-0100".to_string()),
        address: None,
    }
}

#[tokio::test]
async fn supplier_crud_roundtrip() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let created = client.create_supplier(&acme_input()).await.expect("create");
    assert_eq!(created.name, "Acme Supplies");
    assert_eq!(created.email.as_deref(), Some("sales@acme.example"));
    assert_eq!(created.address, None);

    let mut input = acme_input();
    input.address = Some("1 Industrial Way".to_string());
    let updated = client
        .update_supplier(created.id, &input)
        .await
        .expect("update");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.address.as_deref(), Some("1 Industrial Way"));
    assert_eq!(updated.created_at, created.created_at);

    let listed = client.list_suppliers().await.expect("list");
    assert_eq!(listed, vec![updated.clone()]);

    let ack = client.delete_supplier(created.id).await.expect("delete");
    assert_eq!(ack.deleted, created.id);
    assert_eq!(ack.detached_items, 0);
    assert!(client.list_suppliers().await.expect("list").is_empty());
}

#[tokio::test]
async fn supplier_name_is_required() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let err = client
        .create_supplier(&SupplierInput {
            name: "   ".to_string(),
            ..SupplierInput::default()
        })
        .await
        .expect_err("blank name");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn deleting_a_supplier_detaches_its_items() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let acme = client.create_supplier(&acme_input()).await.expect("acme");
    let other = client
        .create_supplier(&SupplierInput {
            name: "Other Parts Co".to_string(),
            ..SupplierInput::default()
        })
        .await
        .expect("other");

    let item = |name: &str, supplier| ItemInput {
        name: name.to_string(),
        quantity: 10,
        low_stock_threshold: 2,
        supplier,
        price: 1.0,
        category: String::new(),
    };
    let linked_a = client
        .create_item(&item("Widget", Some(acme.id)))
        .await
        .expect("linked a");
    let linked_b = client
        .create_item(&item("Bolt", Some(acme.id)))
        .await
        .expect("linked b");
    let unrelated = client
        .create_item(&item("Plate", Some(other.id)))
        .await
        .expect("unrelated");

    let ack = client.delete_supplier(acme.id).await.expect("delete");
    assert_eq!(ack.deleted, acme.id);
    assert_eq!(ack.detached_items, 2);

    // the supplier is gone
    let err = client.get_supplier(acme.id).await.expect_err("gone");
    assert_eq!(err.status(), Some(404));

    // its items survive, unlinked; the unrelated link is untouched
    let a = client.get_item(linked_a.id).await.expect("still there");
    let b = client.get_item(linked_b.id).await.expect("still there");
    let c = client.get_item(unrelated.id).await.expect("still there");
    assert_eq!(a.supplier, None);
    assert_eq!(b.supplier, None);
    assert_eq!(c.supplier, Some(other.id));
}

#[tokio::test]
async fn deleting_an_unknown_supplier_is_not_found() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let err = client
        .delete_supplier(Uuid::new_v4())
        .await
        .expect_err("missing");
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(""), "Supplier not found");
}
