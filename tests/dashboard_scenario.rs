//! End-to-end page flows: add a supplier and a low item, watch the
//! dashboard report them

mod common;

use common::TestApp;
use stockroom::model::ItemInput;
use stockroom::ui::dashboard::DashboardPage;
use stockroom::ui::inventory::InventoryPage;
use stockroom::ui::suppliers::SuppliersPage;
use stockroom::ui::toast::{ToastBus, ToastLevel};

#[tokio::test]
async fn acme_widget_reaches_the_dashboard() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;
    let toasts = ToastBus::new();

    // Suppliers page: add "Acme Supplies" through the form dialog
    let mut suppliers_page = SuppliersPage::new();
    suppliers_page.load(&client, &toasts).await;
    assert!(suppliers_page.suppliers.is_empty());

    suppliers_page.open_form();
    suppliers_page.form.as_mut().expect("open form").input.name =
        "Acme Supplies".to_string();
    assert!(suppliers_page.submit_form(&client, &toasts).await);
    assert_eq!(suppliers_page.suppliers.len(), 1);
    let acme_id = suppliers_page.suppliers[0].id;

    // Inventory page: add "Widget" (5 on hand, threshold 10) linked to Acme
    let mut inventory_page = InventoryPage::new();
    inventory_page.load(&client, &toasts).await;
    assert_eq!(inventory_page.suppliers.len(), 1, "form picker sees Acme");

    inventory_page.open_form();
    inventory_page.form.as_mut().expect("open form").input = ItemInput {
        name: "Widget".to_string(),
        quantity: 5,
        low_stock_threshold: 10,
        supplier: Some(acme_id),
        price: 3.75,
        category: "parts".to_string(),
    };
    assert!(inventory_page.submit_form(&client, &toasts).await);
    assert_eq!(inventory_page.items.len(), 1);
    assert_eq!(inventory_page.items[0].supplier, Some(acme_id));

    // Dashboard: totals and the low stock list reflect the new data
    let mut dashboard = DashboardPage::new();
    dashboard.load(&client, &toasts).await;
    assert!(!dashboard.loading);
    assert_eq!(dashboard.stats.total_items, 1);
    assert_eq!(dashboard.stats.total_suppliers, 1);
    assert_eq!(dashboard.stats.low_stock_items.len(), 1);
    assert_eq!(dashboard.stats.low_stock_items[0].name, "Widget");

    let messages: Vec<String> = toasts.drain().into_iter().map(|t| t.message).collect();
    assert!(messages.contains(&"Supplier added successfully".to_string()));
    assert!(messages.contains(&"Item added successfully".to_string()));
}

#[tokio::test]
async fn submit_splices_the_server_entity_into_local_state() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;
    let toasts = ToastBus::new();

    let mut page = InventoryPage::new();
    page.load(&client, &toasts).await;

    page.open_form();
    page.form.as_mut().expect("form").input = ItemInput {
        name: "Bolt".to_string(),
        quantity: 100,
        low_stock_threshold: 10,
        supplier: None,
        price: 0.1,
        category: String::new(),
    };
    assert!(page.submit_form(&client, &toasts).await);
    assert!(page.form.is_none(), "dialog closes on success");

    // local state carries the server's entity without a reload
    let local = page.items[0].clone();
    let server = client.get_item(local.id).await.expect("server copy");
    assert_eq!(local, server);

    // edit through the prefilled form
    assert!(page.edit(local.id));
    page.form.as_mut().expect("form").input.quantity = 7;
    assert!(page.submit_form(&client, &toasts).await);
    assert_eq!(page.items[0].quantity, 7);
    assert_eq!(
        client.get_item(local.id).await.expect("server copy").quantity,
        7
    );

    // delete through the confirm dialog
    page.request_delete(local.id);
    assert!(page.delete_confirmed(&client, &toasts).await);
    assert!(page.items.is_empty());
    assert!(client.list_items().await.expect("list").is_empty());
}

#[tokio::test]
async fn failed_submit_keeps_the_dialog_open_and_toasts_the_server_message() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;
    let toasts = ToastBus::new();

    let mut page = InventoryPage::new();
    page.load(&client, &toasts).await;

    page.open_form();
    // blank name is rejected server-side
    assert!(!page.submit_form(&client, &toasts).await);
    assert!(page.form.is_some(), "dialog stays open for a retry");
    assert!(page.items.is_empty(), "nothing spliced in on failure");

    let errors: Vec<_> = toasts
        .drain()
        .into_iter()
        .filter(|t| t.level == ToastLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Item name is required");
}

#[tokio::test]
async fn reload_sees_changes_made_elsewhere() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;
    let toasts = ToastBus::new();

    let mut page = DashboardPage::new();
    page.load(&client, &toasts).await;
    assert_eq!(page.stats.total_items, 0);

    // another client writes while our page is idle
    let other = app.logged_in_client().await;
    other
        .create_item(&ItemInput {
            name: "Plate".to_string(),
            quantity: 1,
            low_stock_threshold: 5,
            supplier: None,
            price: 9.0,
            category: String::new(),
        })
        .await
        .expect("create elsewhere");

    // a fresh visit recomputes everything from live data
    page.load(&client, &toasts).await;
    assert_eq!(page.stats.total_items, 1);
    assert_eq!(page.stats.low_stock_items.len(), 1);
}

#[tokio::test]
async fn a_newer_load_wins_over_an_older_one() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;
    let toasts = ToastBus::new();

    client
        .create_item(&ItemInput {
            name: "Gear".to_string(),
            quantity: 50,
            low_stock_threshold: 5,
            supplier: None,
            price: 4.0,
            category: String::new(),
        })
        .await
        .expect("seed item");

    let mut page = InventoryPage::new();
    // first load is immediately superseded without being awaited
    page.start_load(&client);
    page.start_load(&client);
    page.finish_load(&toasts).await;

    assert!(!page.loading);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Gear");
}
