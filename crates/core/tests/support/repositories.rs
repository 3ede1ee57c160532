//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core repository ports, enabling
//! deterministic tests without database dependencies.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use printshop_core::audit::AuditLogRepository;
use printshop_core::crm::{ClientRepository, InvoiceRepository, OrderRepository};
use printshop_core::inventory::{ProductRepository, ProviderRepository, PurchaseOrderRepository};
use printshop_core::production::{IncidentRepository, PhaseRepository};
use printshop_core::session::SessionStore;
use printshop_core::user::UserProfileRepository;
use printshop_core::workflow::{AssignmentChange, TransitionWrite, WorkflowStore};
use printshop_domain::{
    AuditEntry, BillingStatus, Client, Incident, Invoice, InvoiceKind, Milestone, Order,
    OrderItem, OrderStatus, Phase, PhaseAssignment, PhaseRecord, PhaseTask, PrintShopError,
    Product, Provider, PurchaseOrder, PurchaseOrderStatus, QueueCandidate, RelatedRecord,
    Result as DomainResult, Session, UserProfile, UserStatus,
};

#[derive(Default)]
pub struct ShopState {
    pub orders: Vec<Order>,
    pub items: Vec<OrderItem>,
    pub phases: Vec<PhaseRecord>,
    pub clients: Vec<Client>,
    pub invoices: Vec<Invoice>,
    pub incidents: Vec<Incident>,
    pub users: Vec<UserProfile>,
    pub products: Vec<Product>,
    pub providers: Vec<Provider>,
    pub purchases: Vec<PurchaseOrder>,
}

/// One in-memory data source behind every business port
///
/// The workflow store writes to the same orders and phase records the
/// repositories read, like the single database does in production.
#[derive(Default)]
pub struct InMemoryShop {
    state: Mutex<ShopState>,
    fail_workflow: AtomicBool,
}

impl InMemoryShop {
    /// Make every workflow write fail before touching state
    pub fn fail_workflow_writes(&self, fail: bool) {
        self.fail_workflow.store(fail, Ordering::SeqCst);
    }

    pub fn insert_user(&self, profile: UserProfile) {
        self.state.lock().users.push(profile);
    }

    pub fn insert_product(&self, product: Product) {
        self.state.lock().products.push(product);
    }

    pub fn insert_order(&self, order: Order) {
        self.state.lock().orders.push(order);
    }

    /// Current copy of an order, by any key
    pub fn order_by_key(&self, key: &str) -> Order {
        self.state
            .lock()
            .orders
            .iter()
            .find(|order| order.matches_key(key))
            .cloned()
            .expect("order exists")
    }

    pub fn phase_record(&self, order_id: &str, phase: Phase) -> Option<PhaseRecord> {
        self.state
            .lock()
            .phases
            .iter()
            .find(|record| record.order_id == order_id && record.phase == phase)
            .cloned()
    }

    pub fn user_status(&self, id: &str) -> Option<UserStatus> {
        self.state.lock().users.iter().find(|user| user.id == id).map(|user| user.status)
    }

    pub fn product_stock(&self, name: &str) -> Option<i64> {
        self.state
            .lock()
            .products
            .iter()
            .find(|product| product.name == name)
            .map(|product| product.stock)
    }
}

fn upsert_record(records: &mut Vec<PhaseRecord>, record: PhaseRecord) {
    match records
        .iter_mut()
        .find(|existing| existing.order_id == record.order_id && existing.phase == record.phase)
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[async_trait]
impl WorkflowStore for InMemoryShop {
    async fn apply(&self, write: &TransitionWrite) -> DomainResult<()> {
        if self.fail_workflow.load(Ordering::SeqCst) {
            return Err(PrintShopError::Database("workflow store unavailable".to_string()));
        }
        let mut state = self.state.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|order| order.id == write.order.order_id)
            .ok_or_else(|| PrintShopError::NotFound(write.order.order_id.clone()))?;

        if let Some(status) = write.order.status {
            order.status = status;
        }
        for milestone in &write.order.milestones {
            order.milestones.stamp(*milestone, write.at);
        }
        match &write.order.assignment {
            AssignmentChange::Keep => {}
            AssignmentChange::Set(user_id) => {
                order.current_assignee_id = Some(user_id.clone());
                order.assigned_at = Some(write.at);
            }
            AssignmentChange::Clear => {
                order.current_assignee_id = None;
                order.assigned_at = None;
            }
        }
        order.updated_at = write.at;

        upsert_record(&mut state.phases, write.record.clone());
        if let Some(seed) = &write.seed {
            upsert_record(&mut state.phases, seed.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryShop {
    async fn create(&self, order: Order, items: Vec<OrderItem>) -> DomainResult<()> {
        let mut state = self.state.lock();
        state.orders.push(order);
        state.items.extend(items);
        Ok(())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Order>> {
        Ok(self.state.lock().orders.iter().find(|order| order.id == id).cloned())
    }

    async fn find_by_reference(&self, key: &str) -> DomainResult<Option<Order>> {
        Ok(self.state.lock().orders.iter().find(|order| order.matches_key(key)).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<Order>> {
        let mut orders = self.state.lock().orders.clone();
        orders.reverse();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update(&self, order: &Order, items: Vec<OrderItem>) -> DomainResult<()> {
        let mut state = self.state.lock();
        if let Some(existing) = state.orders.iter_mut().find(|o| o.id == order.id) {
            *existing = order.clone();
        }
        state.items.retain(|item| item.order_id != order.id);
        state.items.extend(items);
        Ok(())
    }

    async fn items(&self, order_id: &str) -> DomainResult<Vec<OrderItem>> {
        Ok(self.state.lock().items.iter().filter(|i| i.order_id == order_id).cloned().collect())
    }

    async fn set_status(&self, id: &str, status: OrderStatus, now: i64) -> DomainResult<()> {
        if let Some(order) = self.state.lock().orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
            order.updated_at = now;
        }
        Ok(())
    }

    async fn convert(&self, id: &str, production_id: &str, now: i64) -> DomainResult<bool> {
        let mut state = self.state.lock();
        if state
            .orders
            .iter()
            .any(|o| o.id != id && o.production_id.as_deref() == Some(production_id))
        {
            return Err(PrintShopError::Conflict(format!("{production_id} is taken")));
        }
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| PrintShopError::NotFound(id.to_string()))?;
        if order.production_id.is_some() {
            return Ok(false);
        }
        order.production_id = Some(production_id.to_string());
        order.status = OrderStatus::OrderCreated;
        order.milestones.stamp(Milestone::Converted, now);
        order.updated_at = now;
        Ok(true)
    }

    async fn set_billing_status(
        &self,
        id: &str,
        status: BillingStatus,
        now: i64,
    ) -> DomainResult<()> {
        if let Some(order) = self.state.lock().orders.iter_mut().find(|o| o.id == id) {
            order.billing_status = status;
            order.updated_at = now;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let mut state = self.state.lock();
        state.orders.retain(|o| o.id != id);
        state.items.retain(|i| i.order_id != id);
        state.phases.retain(|r| r.order_id != id);
        Ok(())
    }
}

#[async_trait]
impl PhaseRepository for InMemoryShop {
    async fn get(&self, order_id: &str, phase: Phase) -> DomainResult<Option<PhaseRecord>> {
        Ok(self.phase_record(order_id, phase))
    }

    async fn list_incoming(&self, phase: Phase) -> DomainResult<Vec<QueueCandidate>> {
        let state = self.state.lock();
        Ok(state
            .orders
            .iter()
            .filter(|order| order.status == phase.entry_status())
            .map(|order| {
                let assignment = state
                    .phases
                    .iter()
                    .find(|r| r.order_id == order.id && r.phase == phase)
                    .map(|r| PhaseAssignment {
                        assignee_id: r.assignee_id.clone(),
                        status: r.status,
                    });
                // Mirrors the array shape of the embedded relation
                let phase_record = match assignment {
                    Some(assignment) => RelatedRecord::Many(vec![assignment]),
                    None => RelatedRecord::Many(Vec::new()),
                };
                QueueCandidate { order: order.clone(), phase_record }
            })
            .collect())
    }

    async fn list_assigned(&self, phase: Phase, assignee_id: &str) -> DomainResult<Vec<PhaseTask>> {
        let state = self.state.lock();
        let mut tasks: Vec<PhaseTask> = state
            .phases
            .iter()
            .filter(|r| r.phase == phase && r.is_held_by(assignee_id) && !r.status.is_terminal())
            .filter_map(|record| {
                let order = state.orders.iter().find(|o| o.id == record.order_id)?;
                Some(PhaseTask { record: record.clone(), order: order.clone() })
            })
            .collect();
        tasks.sort_by(|a, b| b.record.assigned_at.cmp(&a.record.assigned_at));
        Ok(tasks)
    }

    async fn list_for_order(&self, order_id: &str) -> DomainResult<Vec<PhaseRecord>> {
        let mut records: Vec<PhaseRecord> =
            self.state.lock().phases.iter().filter(|r| r.order_id == order_id).cloned().collect();
        records.sort_by_key(|r| r.phase);
        Ok(records)
    }
}

#[async_trait]
impl IncidentRepository for InMemoryShop {
    async fn create(&self, incident: Incident) -> DomainResult<()> {
        self.state.lock().incidents.push(incident);
        Ok(())
    }

    async fn list_for_order(&self, order_id: &str) -> DomainResult<Vec<Incident>> {
        Ok(self.state.lock().incidents.iter().filter(|i| i.order_id == order_id).cloned().collect())
    }
}

#[async_trait]
impl ClientRepository for InMemoryShop {
    async fn list(&self) -> DomainResult<Vec<Client>> {
        let mut clients = self.state.lock().clients.clone();
        clients.sort_by(|a, b| a.business_name.cmp(&b.business_name));
        Ok(clients)
    }

    async fn search(&self, query: &str, limit: usize) -> DomainResult<Vec<Client>> {
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .clients
            .iter()
            .filter(|c| {
                c.business_name.to_lowercase().contains(&needle)
                    || c.document_number.contains(&needle)
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Client>> {
        Ok(self.state.lock().clients.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_document(&self, document_number: &str) -> DomainResult<Option<Client>> {
        Ok(self.state.lock().clients.iter().find(|c| c.document_number == document_number).cloned())
    }

    async fn create(&self, client: Client) -> DomainResult<()> {
        self.state.lock().clients.push(client);
        Ok(())
    }

    async fn update(&self, client: Client) -> DomainResult<()> {
        if let Some(existing) = self.state.lock().clients.iter_mut().find(|c| c.id == client.id) {
            *existing = client;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.lock().clients.retain(|c| c.id != id);
        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryShop {
    async fn create(&self, invoice: Invoice) -> DomainResult<()> {
        let mut state = self.state.lock();
        if state.invoices.iter().any(|i| i.order_id == invoice.order_id) {
            return Err(PrintShopError::Conflict("This order has already been invoiced.".into()));
        }
        state.invoices.push(invoice);
        Ok(())
    }

    async fn find_by_order(&self, order_id: &str) -> DomainResult<Option<Invoice>> {
        Ok(self.state.lock().invoices.iter().find(|i| i.order_id == order_id).cloned())
    }

    async fn count_by_kind(&self, kind: InvoiceKind) -> DomainResult<u64> {
        Ok(self.state.lock().invoices.iter().filter(|i| i.kind == kind).count() as u64)
    }

    async fn list(&self) -> DomainResult<Vec<Invoice>> {
        let mut invoices = self.state.lock().invoices.clone();
        invoices.reverse();
        Ok(invoices)
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryShop {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.state.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.state.lock().users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn list(&self) -> DomainResult<Vec<UserProfile>> {
        let mut users = self.state.lock().users.clone();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(users)
    }

    async fn create(&self, profile: UserProfile) -> DomainResult<()> {
        self.state.lock().users.push(profile);
        Ok(())
    }

    async fn update(&self, profile: UserProfile) -> DomainResult<()> {
        if let Some(existing) = self.state.lock().users.iter_mut().find(|u| u.id == profile.id) {
            *existing = profile;
        }
        Ok(())
    }

    async fn set_status(&self, id: &str, status: UserStatus, now: i64) -> DomainResult<()> {
        if let Some(user) = self.state.lock().users.iter_mut().find(|u| u.id == id) {
            user.status = status;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.lock().users.retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryShop {
    async fn list(&self) -> DomainResult<Vec<Product>> {
        let mut products = self.state.lock().products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Product>> {
        Ok(self.state.lock().products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_provider(&self, provider_id: &str) -> DomainResult<Vec<Product>> {
        Ok(self
            .state
            .lock()
            .products
            .iter()
            .filter(|p| p.provider_id.as_deref() == Some(provider_id))
            .cloned()
            .collect())
    }

    async fn create(&self, product: Product) -> DomainResult<()> {
        let mut state = self.state.lock();
        if state.products.iter().any(|p| p.sku == product.sku) {
            return Err(PrintShopError::Conflict(format!("SKU {} already exists", product.sku)));
        }
        state.products.push(product);
        Ok(())
    }

    async fn update(&self, product: Product) -> DomainResult<()> {
        if let Some(existing) = self.state.lock().products.iter_mut().find(|p| p.id == product.id)
        {
            *existing = product;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.lock().products.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ProviderRepository for InMemoryShop {
    async fn list(&self) -> DomainResult<Vec<Provider>> {
        let mut providers = self.state.lock().providers.clone();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(providers)
    }

    async fn search(&self, query: &str) -> DomainResult<Vec<Provider>> {
        let needle = query.to_lowercase();
        Ok(self
            .state
            .lock()
            .providers
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.supplies.as_deref().is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Provider>> {
        Ok(self.state.lock().providers.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, provider: Provider) -> DomainResult<()> {
        self.state.lock().providers.push(provider);
        Ok(())
    }

    async fn update(&self, provider: Provider) -> DomainResult<()> {
        if let Some(existing) = self.state.lock().providers.iter_mut().find(|p| p.id == provider.id)
        {
            *existing = provider;
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.state.lock().providers.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl PurchaseOrderRepository for InMemoryShop {
    async fn list(&self) -> DomainResult<Vec<PurchaseOrder>> {
        let mut purchases = self.state.lock().purchases.clone();
        purchases.reverse();
        Ok(purchases)
    }

    async fn find(&self, key: &str) -> DomainResult<Option<PurchaseOrder>> {
        Ok(self.state.lock().purchases.iter().find(|p| p.id == key || p.code == key).cloned())
    }

    async fn create(&self, order: PurchaseOrder) -> DomainResult<()> {
        self.state.lock().purchases.push(order);
        Ok(())
    }

    async fn receive(&self, id: &str, comments: Option<String>, now: i64) -> DomainResult<bool> {
        let mut state = self.state.lock();
        let Some(purchase) = state.purchases.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        if purchase.status != PurchaseOrderStatus::Sent {
            return Ok(false);
        }
        purchase.status = PurchaseOrderStatus::Received;
        purchase.received_at = Some(now);
        if comments.is_some() {
            purchase.comments = comments;
        }
        let items = purchase.items.clone();
        for item in items {
            if let Some(product) = state
                .products
                .iter_mut()
                .find(|p| p.name.eq_ignore_ascii_case(&item.product_name))
            {
                product.stock += item.quantity;
                product.updated_at = now;
            }
        }
        Ok(true)
    }
}

/// Audit log that can be switched to fail every append
#[derive(Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    failing: AtomicBool,
}

impl MemoryAuditLog {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.action.clone()).collect()
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLog {
    async fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PrintShopError::Database("audit table is locked".to_string()));
        }
        self.entries.lock().push(entry);
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> DomainResult<Vec<AuditEntry>> {
        Ok(self.entries.lock().iter().rev().take(limit).cloned().collect())
    }

    async fn list_by_actions(
        &self,
        actions: &[&str],
        limit: usize,
    ) -> DomainResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .lock()
            .iter()
            .rev()
            .filter(|e| actions.contains(&e.action.as_str()))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search(&self, needle: &str) -> DomainResult<Vec<AuditEntry>> {
        Ok(self.entries.lock().iter().filter(|e| e.mentions(needle)).cloned().collect())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn put(&self, session: Option<Session>) {
        *self.session.lock() = session;
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> DomainResult<Option<Session>> {
        Ok(self.session.lock().clone())
    }

    async fn save(&self, session: &Session) -> DomainResult<()> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> DomainResult<()> {
        *self.session.lock() = None;
        Ok(())
    }
}
