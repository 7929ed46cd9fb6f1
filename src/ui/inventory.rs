//! Inventory page: item list, form dialog, delete confirmation

use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::model::{InventoryItem, ItemInput, Supplier};

use super::task::ViewTask;
use super::toast::ToastBus;

/// Item form dialog state. `editing` carries the id when the form was
/// opened on an existing item.
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    pub editing: Option<Uuid>,
    pub input: ItemInput,
}

impl ItemForm {
    /// Blank form for the add flow
    pub fn blank() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing item for the edit flow
    pub fn for_item(item: &InventoryItem) -> Self {
        Self {
            editing: Some(item.id),
            input: ItemInput {
                name: item.name.clone(),
                quantity: item.quantity,
                low_stock_threshold: item.low_stock_threshold,
                supplier: item.supplier,
                price: item.price,
                category: item.category.clone(),
            },
        }
    }
}

type LoadResult = Result<(Vec<InventoryItem>, Vec<Supplier>), ClientError>;

/// Inventory page state
///
/// The supplier list rides along with the items so the form can offer a
/// supplier picker without a second round trip.
#[derive(Default)]
pub struct InventoryPage {
    pub items: Vec<InventoryItem>,
    pub suppliers: Vec<Supplier>,
    pub loading: bool,
    pub form: Option<ItemForm>,
    pub confirm_delete: Option<Uuid>,
    epoch: u64,
    pending: Option<ViewTask<LoadResult>>,
}

impl InventoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch items and suppliers in parallel for this visit
    pub fn start_load(&mut self, client: &ApiClient) {
        self.epoch += 1;
        self.loading = true;

        let client = client.clone();
        self.pending = Some(ViewTask::spawn(self.epoch, async move {
            let (items, suppliers) = tokio::join!(client.list_items(), client.list_suppliers());
            Ok((items?, suppliers?))
        }));
    }

    /// Await the pending fetch; stale results are discarded
    pub async fn finish_load(&mut self, toasts: &ToastBus) {
        let Some(task) = self.pending.take() else {
            return;
        };
        let task_epoch = task.epoch();
        let Some(result) = task.join().await else {
            return;
        };
        if task_epoch != self.epoch {
            return;
        }

        match result {
            Ok((items, suppliers)) => {
                self.items = items;
                self.suppliers = suppliers;
                self.loading = false;
            }
            Err(e) => {
                self.loading = false;
                toasts.error(e.user_message("Error loading data"));
            }
        }
    }

    /// Start and await a load in one step
    pub async fn load(&mut self, client: &ApiClient, toasts: &ToastBus) {
        self.start_load(client);
        self.finish_load(toasts).await;
    }

    /// Mark any in-flight load stale without starting a new one
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }

    /// Resolve a supplier name against the page's fetched list
    pub fn supplier_by_name(&self, name: &str) -> Option<&Supplier> {
        self.suppliers
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn supplier_name(&self, id: Uuid) -> Option<&str> {
        self.suppliers
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    // ========================================================================
    // Form dialog
    // ========================================================================

    /// Open the blank form (Add Item)
    pub fn open_form(&mut self) {
        self.form = Some(ItemForm::blank());
    }

    /// Open the form pre-filled for editing. Returns false when the id is
    /// not in the current list.
    pub fn edit(&mut self, id: Uuid) -> bool {
        match self.items.iter().find(|item| item.id == id) {
            Some(item) => {
                self.form = Some(ItemForm::for_item(item));
                true
            }
            None => false,
        }
    }

    /// Close the dialog without saving
    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form. On success the server's returned entity is
    /// spliced into the local list, so no reload is needed.
    pub async fn submit_form(&mut self, client: &ApiClient, toasts: &ToastBus) -> bool {
        let Some(form) = self.form.clone() else {
            return false;
        };

        match form.editing {
            Some(id) => match client.update_item(id, &form.input).await {
                Ok(updated) => {
                    if let Some(slot) = self.items.iter_mut().find(|item| item.id == id) {
                        *slot = updated;
                    }
                    toasts.success("Item updated successfully");
                    self.form = None;
                    true
                }
                Err(e) => {
                    toasts.error(e.user_message("Error saving item"));
                    false
                }
            },
            None => match client.create_item(&form.input).await {
                Ok(created) => {
                    self.items.push(created);
                    toasts.success("Item added successfully");
                    self.form = None;
                    true
                }
                Err(e) => {
                    toasts.error(e.user_message("Error saving item"));
                    false
                }
            },
        }
    }

    // ========================================================================
    // Delete confirmation
    // ========================================================================

    /// Open the confirmation dialog for an item
    pub fn request_delete(&mut self, id: Uuid) {
        self.confirm_delete = Some(id);
    }

    /// Close the confirmation dialog without deleting
    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Delete the item awaiting confirmation. On failure the dialog stays
    /// open so the user can retry or cancel.
    pub async fn delete_confirmed(&mut self, client: &ApiClient, toasts: &ToastBus) -> bool {
        let Some(id) = self.confirm_delete else {
            return false;
        };

        match client.delete_item(id).await {
            Ok(_) => {
                self.items.retain(|item| item.id != id);
                toasts.success("Item deleted successfully");
                self.confirm_delete = None;
                true
            }
            Err(e) => {
                toasts.error(e.user_message("Error deleting item"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(name: &str) -> InventoryItem {
        let now = Utc::now();
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity: 3,
            low_stock_threshold: 1,
            supplier: None,
            price: 2.5,
            category: "parts".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn edit_prefills_the_form_from_the_list() {
        let mut page = InventoryPage::new();
        let existing = item("Widget");
        let id = existing.id;
        page.items.push(existing);

        assert!(page.edit(id));
        let form = page.form.as_ref().unwrap();
        assert_eq!(form.editing, Some(id));
        assert_eq!(form.input.name, "Widget");
        assert_eq!(form.input.quantity, 3);

        assert!(!page.edit(Uuid::new_v4()));
    }

    #[test]
    fn delete_dialog_lifecycle() {
        let mut page = InventoryPage::new();
        let id = Uuid::new_v4();

        page.request_delete(id);
        assert_eq!(page.confirm_delete, Some(id));

        page.cancel_delete();
        assert_eq!(page.confirm_delete, None);
    }

    #[tokio::test]
    async fn stale_results_are_discarded() {
        let mut page = InventoryPage::new();
        page.epoch = 5;
        page.pending = Some(ViewTask::spawn(4, async {
            Ok((vec![item("Stale")], Vec::new()))
        }));

        page.finish_load(&ToastBus::new()).await;
        assert!(page.items.is_empty());
    }
}
