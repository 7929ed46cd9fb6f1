//! Stockroom console - terminal frontend
//!
//! Drives the same page state machines the web UI used, over the same REST
//! API: a dashboard view, inventory and supplier pages with form and
//! confirm dialogs, CSV import/export, and an auth session. Each command
//! visits a page the way a navigation would, so data is fetched fresh and
//! discarded when the command finishes.

use std::io::Write as _;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use uuid::Uuid;

use stockroom::client::ApiClient;
use stockroom::ui::csv_ops;
use stockroom::ui::dashboard::DashboardPage;
use stockroom::ui::inventory::InventoryPage;
use stockroom::ui::session::{LoginForm, RegisterForm, Session};
use stockroom::ui::suppliers::SuppliersPage;
use stockroom::ui::toast::{ToastBus, ToastLevel};

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:2000".to_string());
    let client = ApiClient::new(base_url);
    let toasts = ToastBus::new();
    let mut shell = Shell {
        session: Session::new(client.clone()),
        client,
        toasts,
    };

    println!("Stockroom console - {}", shell.client.base_url());
    println!("Type 'help' for the command list.");

    // Saved token, the localStorage counterpart
    if let Ok(token) = std::env::var("STOCKROOM_TOKEN") {
        match shell.session.restore(token).await {
            Ok(()) => {
                if let Some(user) = shell.session.current_user() {
                    println!("Restored session for {}.", user.email);
                }
            }
            Err(e) => println!("Saved token rejected: {}", e.user_message("session expired")),
        }
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        shell.prompt();
        let Some(line) = input.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if matches!(line.as_str(), "quit" | "exit") {
            break;
        }

        shell.run(&line, &mut input).await;
        shell.flush_toasts();
    }

    println!("Bye.");
    Ok(())
}

struct Shell {
    client: ApiClient,
    session: Session,
    toasts: ToastBus,
}

impl Shell {
    fn prompt(&self) {
        match self.session.current_user() {
            Some(user) => print!("{}@stockroom> ", user.name),
            None => print!("stockroom> "),
        }
        let _ = std::io::stdout().flush();
    }

    fn flush_toasts(&self) {
        for toast in self.toasts.drain() {
            let tag = match toast.level {
                ToastLevel::Success => "ok",
                ToastLevel::Error => "error",
                ToastLevel::Info => "info",
            };
            println!("[{tag}] {}", toast.message);
        }
    }

    fn require_login(&self) -> bool {
        if self.session.is_authenticated() {
            true
        } else {
            println!("Please log in first ('login <email> <password>').");
            false
        }
    }

    async fn run(&mut self, line: &str, input: &mut Input) {
        let tokens = split_args(line);
        let Some(command) = tokens.first().map(String::as_str) else {
            return;
        };
        let args = &tokens[1..];

        match command {
            "help" => print_help(),
            "status" => self.status().await,
            "register" => self.register(args).await,
            "login" => self.login(args).await,
            "logout" => {
                self.session.logout();
                self.toasts.info("Logged out");
            }
            "whoami" => match self.session.current_user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("Not logged in."),
            },
            "dash" => self.dashboard().await,
            "items" => self.list_items().await,
            "item" => self.item_command(args, input).await,
            "suppliers" => self.list_suppliers().await,
            "supplier" => self.supplier_command(args, input).await,
            "export" => self.export(args).await,
            "import" => self.import(args).await,
            _ => println!("Unknown command '{command}'. Type 'help'."),
        }
    }

    async fn status(&self) {
        match self.client.health().await {
            Ok(health) => println!(
                "Server {} ({}), up {}s",
                health.status,
                self.client.base_url(),
                health.uptime_secs
            ),
            Err(e) => println!("Server unreachable: {}", e.user_message("no response")),
        }
    }

    // ========================================================================
    // Auth commands
    // ========================================================================

    async fn register(&mut self, args: &[String]) {
        let [name, email, password, confirm] = args else {
            println!("Usage: register <name> <email> <password> <confirm-password>");
            return;
        };
        let form = RegisterForm {
            name: name.clone(),
            email: email.clone(),
            password: password.clone(),
            confirm_password: confirm.clone(),
        };
        if let Err(message) = form.validate() {
            self.toasts.error(message);
            return;
        }
        match self.session.register(&form).await {
            Ok(()) => self.toasts.success("Account created, you are now logged in"),
            Err(e) => self.toasts.error(e.user_message("Registration failed")),
        }
    }

    async fn login(&mut self, args: &[String]) {
        let [email, password] = args else {
            println!("Usage: login <email> <password>");
            return;
        };
        let form = LoginForm {
            email: email.clone(),
            password: password.clone(),
        };
        match self.session.login(&form).await {
            Ok(()) => self.toasts.success(format!("Logged in as {email}")),
            Err(e) => self.toasts.error(e.user_message("Login failed")),
        }
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    async fn dashboard(&mut self) {
        if !self.require_login() {
            return;
        }
        let mut page = DashboardPage::new();
        page.load(self.session.client(), &self.toasts).await;
        if page.loading {
            return;
        }

        println!("Total items:     {}", page.stats.total_items);
        println!("Low stock items: {}", page.stats.low_stock_items.len());
        println!("Total suppliers: {}", page.stats.total_suppliers);
        if page.stats.low_stock_items.is_empty() {
            println!("No items are currently low in stock.");
        } else {
            println!("Low stock alerts:");
            for item in &page.stats.low_stock_items {
                println!(
                    "  {:<24} {:>5} on hand (threshold {})",
                    item.name, item.quantity, item.low_stock_threshold
                );
            }
        }
    }

    // ========================================================================
    // Inventory commands
    // ========================================================================

    async fn loaded_inventory(&mut self) -> InventoryPage {
        let mut page = InventoryPage::new();
        page.load(self.session.client(), &self.toasts).await;
        page
    }

    async fn list_items(&mut self) {
        if !self.require_login() {
            return;
        }
        let page = self.loaded_inventory().await;
        if page.items.is_empty() {
            println!("No items yet. Add one with 'item add name=... quantity=...'.");
            return;
        }

        println!(
            "{:<36}  {:<24} {:>6} {:>6} {:>9}  {:<12} {}",
            "ID", "NAME", "QTY", "LOW@", "PRICE", "CATEGORY", "SUPPLIER"
        );
        for item in &page.items {
            let supplier = item
                .supplier
                .and_then(|id| page.supplier_name(id))
                .unwrap_or("-");
            let marker = if item.is_low_stock() { " !" } else { "" };
            println!(
                "{:<36}  {:<24} {:>6} {:>6} {:>9.2}  {:<12} {}{}",
                item.id, item.name, item.quantity, item.low_stock_threshold, item.price,
                item.category, supplier, marker
            );
        }
    }

    async fn item_command(&mut self, args: &[String], input: &mut Input) {
        if !self.require_login() {
            return;
        }
        match args.first().map(String::as_str) {
            Some("add") => self.item_add(&args[1..]).await,
            Some("edit") => self.item_edit(&args[1..]).await,
            Some("rm") => self.item_rm(&args[1..], input).await,
            _ => println!("Usage: item add|edit|rm ..."),
        }
    }

    async fn item_add(&mut self, fields: &[String]) {
        let mut page = self.loaded_inventory().await;
        page.open_form();
        if !self.fill_item_form(&mut page, fields) {
            return;
        }
        page.submit_form(self.session.client(), &self.toasts).await;
    }

    async fn item_edit(&mut self, args: &[String]) {
        let Some((id, fields)) = parse_leading_id(args) else {
            println!("Usage: item edit <id> field=value ...");
            return;
        };
        let mut page = self.loaded_inventory().await;
        if !page.edit(id) {
            self.toasts.error("Item not found");
            return;
        }
        if !self.fill_item_form(&mut page, fields) {
            return;
        }
        page.submit_form(self.session.client(), &self.toasts).await;
    }

    async fn item_rm(&mut self, args: &[String], input: &mut Input) {
        let Some((id, _)) = parse_leading_id(args) else {
            println!("Usage: item rm <id>");
            return;
        };
        let mut page = self.loaded_inventory().await;
        let Some(item) = page.items.iter().find(|item| item.id == id) else {
            self.toasts.error("Item not found");
            return;
        };
        let name = item.name.clone();

        page.request_delete(id);
        if confirm(input, &format!("Delete item '{name}'?")).await {
            page.delete_confirmed(self.session.client(), &self.toasts)
                .await;
        } else {
            page.cancel_delete();
            println!("Cancelled.");
        }
    }

    /// Apply field=value arguments onto the open item form. Supplier values
    /// are names resolved against the page's supplier list.
    fn fill_item_form(&self, page: &mut InventoryPage, fields: &[String]) -> bool {
        let Some(mut form) = page.form.take() else {
            return false;
        };

        for (key, value) in parse_kv(fields) {
            let result = match key.as_str() {
                "name" => {
                    form.input.name = value.clone();
                    Ok(())
                }
                "quantity" | "qty" => value
                    .parse()
                    .map(|quantity| form.input.quantity = quantity)
                    .map_err(|_| "quantity must be a whole number".to_string()),
                "threshold" | "lowstockthreshold" => value
                    .parse()
                    .map(|threshold| form.input.low_stock_threshold = threshold)
                    .map_err(|_| "threshold must be a whole number".to_string()),
                "price" => value
                    .parse()
                    .map(|price| form.input.price = price)
                    .map_err(|_| "price must be a number".to_string()),
                "category" => {
                    form.input.category = value.clone();
                    Ok(())
                }
                "supplier" => {
                    if value.is_empty() {
                        form.input.supplier = None;
                        Ok(())
                    } else {
                        match page.supplier_by_name(&value) {
                            Some(supplier) => {
                                form.input.supplier = Some(supplier.id);
                                Ok(())
                            }
                            None => Err(format!("Unknown supplier: {value}")),
                        }
                    }
                }
                other => Err(format!("Unknown field: {other}")),
            };

            if let Err(message) = result {
                self.toasts.error(message);
                return false;
            }
        }

        page.form = Some(form);
        true
    }

    // ========================================================================
    // Supplier commands
    // ========================================================================

    async fn loaded_suppliers(&mut self) -> SuppliersPage {
        let mut page = SuppliersPage::new();
        page.load(self.session.client(), &self.toasts).await;
        page
    }

    async fn list_suppliers(&mut self) {
        if !self.require_login() {
            return;
        }
        let page = self.loaded_suppliers().await;
        if page.suppliers.is_empty() {
            println!("No suppliers yet. Add one with 'supplier add name=...'.");
            return;
        }

        println!(
            "{:<36}  {:<24} {:<28} {:<16} {}",
            "ID", "NAME", "EMAIL", "PHONE", "ADDRESS"
        );
        for supplier in &page.suppliers {
            println!(
                "{:<36}  {:<24} {:<28} {:<16} {}",
                supplier.id,
                supplier.name,
                supplier.email.as_deref().unwrap_or("-"),
                supplier.phone.as_deref().unwrap_or("-"),
                supplier.address.as_deref().unwrap_or("-"),
            );
        }
    }

    async fn supplier_command(&mut self, args: &[String], input: &mut Input) {
        if !self.require_login() {
            return;
        }
        match args.first().map(String::as_str) {
            Some("add") => self.supplier_add(&args[1..]).await,
            Some("edit") => self.supplier_edit(&args[1..]).await,
            Some("rm") => self.supplier_rm(&args[1..], input).await,
            _ => println!("Usage: supplier add|edit|rm ..."),
        }
    }

    async fn supplier_add(&mut self, fields: &[String]) {
        let mut page = self.loaded_suppliers().await;
        page.open_form();
        if !self.fill_supplier_form(&mut page, fields) {
            return;
        }
        page.submit_form(self.session.client(), &self.toasts).await;
    }

    async fn supplier_edit(&mut self, args: &[String]) {
        let Some((id, fields)) = parse_leading_id(args) else {
            println!("Usage: supplier edit <id> field=value ...");
            return;
        };
        let mut page = self.loaded_suppliers().await;
        if !page.edit(id) {
            self.toasts.error("Supplier not found");
            return;
        }
        if !self.fill_supplier_form(&mut page, fields) {
            return;
        }
        page.submit_form(self.session.client(), &self.toasts).await;
    }

    async fn supplier_rm(&mut self, args: &[String], input: &mut Input) {
        let Some((id, _)) = parse_leading_id(args) else {
            println!("Usage: supplier rm <id>");
            return;
        };
        let mut page = self.loaded_suppliers().await;
        let Some(supplier) = page.suppliers.iter().find(|s| s.id == id) else {
            self.toasts.error("Supplier not found");
            return;
        };
        let name = supplier.name.clone();

        page.request_delete(id);
        if confirm(
            input,
            &format!("Delete supplier '{name}'? Items keep their data but lose the link."),
        )
        .await
        {
            page.delete_confirmed(self.session.client(), &self.toasts)
                .await;
        } else {
            page.cancel_delete();
            println!("Cancelled.");
        }
    }

    fn fill_supplier_form(&self, page: &mut SuppliersPage, fields: &[String]) -> bool {
        let Some(mut form) = page.form.take() else {
            return false;
        };

        for (key, value) in parse_kv(fields) {
            let cleared = value.is_empty();
            match key.as_str() {
                "name" => form.input.name = value,
                "email" => form.input.email = (!cleared).then_some(value),
                "phone" => form.input.phone = (!cleared).then_some(value),
                "address" => form.input.address = (!cleared).then_some(value),
                other => {
                    self.toasts.error(format!("Unknown field: {other}"));
                    return false;
                }
            }
        }

        page.form = Some(form);
        true
    }

    // ========================================================================
    // CSV commands
    // ========================================================================

    async fn export(&mut self, args: &[String]) {
        if !self.require_login() {
            return;
        }
        let Some(path) = args.first() else {
            println!("Usage: export <file.csv>");
            return;
        };

        let page = self.loaded_inventory().await;
        match csv_ops::export_items(&page.items, &page.suppliers) {
            Ok(text) => match std::fs::write(path, text) {
                Ok(()) => self
                    .toasts
                    .success(format!("Exported {} items to {path}", page.items.len())),
                Err(e) => self.toasts.error(format!("Could not write {path}: {e}")),
            },
            Err(e) => self.toasts.error(format!("Export failed: {e}")),
        }
    }

    async fn import(&mut self, args: &[String]) {
        if !self.require_login() {
            return;
        }
        let Some(path) = args.first() else {
            println!("Usage: import <file.csv>");
            return;
        };

        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.toasts.error(format!("Could not open {path}: {e}"));
                return;
            }
        };

        match csv_ops::import_items(file, self.session.client()).await {
            Ok(report) => {
                for (line, message) in &report.errors {
                    println!("  line {line}: {message}");
                }
                if report.failed > 0 {
                    self.toasts.error(report.summary());
                } else {
                    self.toasts.success(report.summary());
                }
            }
            Err(e) => self.toasts.error(format!("Import failed: {e}")),
        }
    }
}

async fn confirm(input: &mut Input, prompt: &str) -> bool {
    print!("{prompt} [y/N]: ");
    let _ = std::io::stdout().flush();
    match input.next_line().await {
        Ok(Some(line)) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Split a command line on whitespace, honoring double quotes so values
/// like name="Steel Bolt" survive
fn split_args(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Split field=value tokens; a bare token becomes a key with an empty value
fn parse_kv(fields: &[String]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|field| match field.split_once('=') {
            Some((key, value)) => (key.trim().to_lowercase(), value.to_string()),
            None => (field.trim().to_lowercase(), String::new()),
        })
        .collect()
}

/// Pull a uuid off the front of the argument list
fn parse_leading_id(args: &[String]) -> Option<(Uuid, &[String])> {
    let raw = args.first()?;
    let id = Uuid::parse_str(raw).ok()?;
    Some((id, &args[1..]))
}

fn print_help() {
    println!("Commands:");
    println!("  status                          server health");
    println!("  register <name> <email> <pw> <confirm>");
    println!("  login <email> <password>        start a session");
    println!("  logout | whoami");
    println!("  dash                            dashboard stats and low stock alerts");
    println!("  items                           list inventory");
    println!("  item add name=.. quantity=.. [threshold=..] [price=..] [category=..] [supplier=<name>]");
    println!("  item edit <id> field=value ...  change only the given fields");
    println!("  item rm <id>                    delete after confirmation");
    println!("  suppliers                       list suppliers");
    println!("  supplier add name=.. [email=..] [phone=..] [address=..]");
    println!("  supplier edit <id> field=value ...");
    println!("  supplier rm <id>                delete and unlink items");
    println!("  export <file.csv>               write inventory as CSV");
    println!("  import <file.csv>               create items from CSV rows");
    println!("  quit");
    println!("Quote values containing spaces: name=\"Steel Bolt\"");
}
