//! Suppliers page: list, form dialog, delete confirmation

use uuid::Uuid;

use crate::client::{ApiClient, ClientError};
use crate::model::{Supplier, SupplierInput};

use super::task::ViewTask;
use super::toast::ToastBus;

/// Supplier form dialog state
#[derive(Debug, Clone, Default)]
pub struct SupplierForm {
    pub editing: Option<Uuid>,
    pub input: SupplierInput,
}

impl SupplierForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn for_supplier(supplier: &Supplier) -> Self {
        Self {
            editing: Some(supplier.id),
            input: SupplierInput {
                name: supplier.name.clone(),
                email: supplier.email.clone(),
                phone: supplier.phone.clone(),
                address: supplier.address.clone(),
            },
        }
    }
}

type LoadResult = Result<Vec<Supplier>, ClientError>;

/// Suppliers page state
#[derive(Default)]
pub struct SuppliersPage {
    pub suppliers: Vec<Supplier>,
    pub loading: bool,
    pub form: Option<SupplierForm>,
    pub confirm_delete: Option<Uuid>,
    epoch: u64,
    pending: Option<ViewTask<LoadResult>>,
}

impl SuppliersPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_load(&mut self, client: &ApiClient) {
        self.epoch += 1;
        self.loading = true;

        let client = client.clone();
        self.pending = Some(ViewTask::spawn(self.epoch, async move {
            client.list_suppliers().await
        }));
    }

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
            Ok(suppliers) => {
                self.suppliers = suppliers;
                self.loading = false;
            }
            Err(e) => {
                self.loading = false;
                toasts.error(e.user_message("Error loading suppliers"));
            }
        }
    }

    pub async fn load(&mut self, client: &ApiClient, toasts: &ToastBus) {
        self.start_load(client);
        self.finish_load(toasts).await;
    }

    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }

    // ========================================================================
    // Form dialog
    // ========================================================================

    pub fn open_form(&mut self) {
        self.form = Some(SupplierForm::blank());
    }

    pub fn edit(&mut self, id: Uuid) -> bool {
        match self.suppliers.iter().find(|s| s.id == id) {
            Some(supplier) => {
                self.form = Some(SupplierForm::for_supplier(supplier));
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form, splicing the server's entity into the list
    pub async fn submit_form(&mut self, client: &ApiClient, toasts: &ToastBus) -> bool {
        let Some(form) = self.form.clone() else {
            return false;
        };

        match form.editing {
            Some(id) => match client.update_supplier(id, &form.input).await {
                Ok(updated) => {
                    if let Some(slot) = self.suppliers.iter_mut().find(|s| s.id == id) {
                        *slot = updated;
                    }
                    toasts.success("Supplier updated successfully");
                    self.form = None;
                    true
                }
                Err(e) => {
                    toasts.error(e.user_message("Error saving supplier"));
                    false
                }
            },
            None => match client.create_supplier(&form.input).await {
                Ok(created) => {
                    self.suppliers.push(created);
                    toasts.success("Supplier added successfully");
                    self.form = None;
                    true
                }
                Err(e) => {
                    toasts.error(e.user_message("Error saving supplier"));
                    false
                }
            },
        }
    }

    // ========================================================================
    // Delete confirmation
    // ========================================================================

    pub fn request_delete(&mut self, id: Uuid) {
        self.confirm_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = None;
    }

    /// Delete the supplier awaiting confirmation. Items that referenced it
    /// are unlinked server-side; the count is surfaced as an info toast.
    pub async fn delete_confirmed(&mut self, client: &ApiClient, toasts: &ToastBus) -> bool {
        let Some(id) = self.confirm_delete else {
            return false;
        };

        match client.delete_supplier(id).await {
            Ok(ack) => {
                self.suppliers.retain(|s| s.id != id);
                toasts.success("Supplier deleted successfully");
                if ack.detached_items > 0 {
                    toasts.info(format!(
                        "{} item(s) no longer have a supplier",
                        ack.detached_items
                    ));
                }
                self.confirm_delete = None;
                true
            }
            Err(e) => {
                toasts.error(e.user_message("Error deleting supplier"));
                false
            }
        }
    }
}
