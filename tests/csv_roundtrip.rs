//! CSV export from one deployment, import into another

mod common;

use common::TestApp;
use stockroom::model::{ItemInput, SupplierInput};
use stockroom::ui::csv_ops::{export_items, import_items};

fn supplier_input(name: &str) -> SupplierInput {
    SupplierInput {
        name: name.to_string(),
        ..SupplierInput::default()
    }
}

fn item_input(name: &str, quantity: u32, supplier: Option<uuid::Uuid>) -> ItemInput {
    ItemInput {
        name: name.to_string(),
        quantity,
        low_stock_threshold: 4,
        supplier,
        price: 2.25,
        category: "parts".to_string(),
    }
}

#[tokio::test]
async fn exported_items_import_into_a_fresh_deployment() {
    // source deployment: two suppliers, three items
    let source = TestApp::spawn().await;
    let exporter = source.logged_in_client().await;

    let acme = exporter
        .create_supplier(&supplier_input("Acme Supplies"))
        .await
        .expect("create Acme");
    let globex = exporter
        .create_supplier(&supplier_input("Globex"))
        .await
        .expect("create Globex");

    exporter
        .create_item(&item_input("Widget", 5, Some(acme.id)))
        .await
        .expect("create Widget");
    exporter
        .create_item(&item_input("Gizmo", 9, Some(globex.id)))
        .await
        .expect("create Gizmo");
    exporter
        .create_item(&item_input("Bolt", 120, None))
        .await
        .expect("create Bolt");

    let items = exporter.list_items().await.expect("list items");
    let suppliers = exporter.list_suppliers().await.expect("list suppliers");
    let csv = export_items(&items, &suppliers).expect("export");

    // target deployment only knows Acme, under a different casing and id
    let target = TestApp::spawn().await;
    let importer = target.logged_in_client().await;
    let target_acme = importer
        .create_supplier(&supplier_input("acme supplies"))
        .await
        .expect("create target supplier");

    let report = import_items(csv.as_bytes(), &importer)
        .await
        .expect("import");
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.imported, 3);
    assert_eq!(report.failed, 0);
    assert!(report.errors.is_empty());

    let imported = importer.list_items().await.expect("list imported");
    assert_eq!(imported.len(), 3);

    let find = |name: &str| {
        imported
            .iter()
            .find(|item| item.name == name)
            .unwrap_or_else(|| panic!("{name} missing after import"))
    };

    // supplier names resolve case-insensitively against the target's list
    let widget = find("Widget");
    assert_eq!(widget.supplier, Some(target_acme.id));
    assert_eq!(widget.quantity, 5);
    assert_eq!(widget.low_stock_threshold, 4);
    assert_eq!(widget.price, 2.25);
    assert_eq!(widget.category, "parts");

    // Globex does not exist in the target, so Gizmo arrives unlinked
    assert_eq!(find("Gizmo").supplier, None);
    assert_eq!(find("Bolt").supplier, None);
}

#[tokio::test]
async fn bad_rows_are_reported_and_good_rows_still_import() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    let csv = "name,quantity\nWidget,5\n,3\nBolt,many\nNut,7\n";
    let report = import_items(csv.as_bytes(), &client).await.expect("import");

    assert_eq!(report.total_rows, 4);
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 2);
    assert_eq!(report.summary(), "Imported 2 of 4 items");

    // error entries carry the 1-based source line, counting the header
    assert_eq!(report.errors[0], (3, "Missing item name".to_string()));
    assert_eq!(
        report.errors[1],
        (4, "Quantity must be a non-negative integer".to_string())
    );

    let names: Vec<String> = client
        .list_items()
        .await
        .expect("list")
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert!(names.contains(&"Widget".to_string()));
    assert!(names.contains(&"Nut".to_string()));
    assert_eq!(names.len(), 2);
}

#[tokio::test]
async fn rows_the_server_rejects_carry_its_message() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client().await;

    // parses fine, rejected by the create endpoint
    let csv = "name,quantity,price\nWidget,5,-2\nNut,7,1.5\n";
    let report = import_items(csv.as_bytes(), &client).await.expect("import");

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.imported, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.errors[0],
        (2, "Price must be a non-negative number".to_string())
    );
}
