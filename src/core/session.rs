//! One cashier's working state over a [`PosBackend`].
//!
//! Every mutation goes to the server first; local state (selection, stage,
//! caches) only moves once the server has accepted the change, and lists are
//! always re-read rather than patched.

use crate::core::catalog::{CatalogCache, ItemDisplay};
use crate::core::checkout::{CheckoutReceipt, CheckoutSequencer, CheckoutStage};
use crate::core::order_selector::{OrderSelector, OrderTotals};
use crate::domain::model::{
    Customer, CustomerDraft, Order, OrderDraft, OrderItem, OrderLineDraft, OrderUpdate, Payment,
    PaymentDraft, PaymentMethod, Variant,
};
use crate::domain::ports::{ConfigProvider, PosBackend};
use crate::utils::error::{PosError, Result};
use crate::utils::validation::Validate;

/// Outcome of picking a product from the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Added straight to the cart; carries the order it landed in.
    Added(Option<String>),
    /// The product has variants; one of these must be chosen next.
    ChooseVariant(Vec<Variant>),
}

pub struct PosSession<B: PosBackend> {
    backend: B,
    branch_id: Option<String>,
    fallback_tax_rate_bps: u32,
    catalog: CatalogCache,
    selector: OrderSelector,
    pending: Vec<Order>,
    customers: Vec<Customer>,
    customers_loaded: bool,
    customer_id: Option<String>,
    checkout: CheckoutSequencer,
    variant_selection: Option<String>,
}

impl<B: PosBackend> PosSession<B> {
    pub fn new(backend: B, branch_id: Option<String>, fallback_tax_rate_bps: u32) -> Self {
        Self {
            backend,
            branch_id,
            fallback_tax_rate_bps,
            catalog: CatalogCache::default(),
            selector: OrderSelector::new(),
            pending: Vec::new(),
            customers: Vec::new(),
            customers_loaded: false,
            customer_id: None,
            checkout: CheckoutSequencer::new(),
            variant_selection: None,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(backend: B, config: &C) -> Self {
        Self::new(
            backend,
            config.branch_id().map(str::to_string),
            config.fallback_tax_rate_bps(),
        )
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn pending_orders(&self) -> &[Order] {
        &self.pending
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn stage(&self) -> &CheckoutStage {
        self.checkout.stage()
    }

    pub fn variant_selection(&self) -> Option<&str> {
        self.variant_selection.as_deref()
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.selector.current(&self.pending)
    }

    pub fn current_totals(&self) -> Option<OrderTotals> {
        self.current_order()
            .map(|order| OrderTotals::derive(order, self.fallback_tax_rate_bps))
    }

    /// Cart lines of the current order with their display name and image.
    pub fn current_lines(&self) -> Vec<(ItemDisplay, &OrderItem)> {
        self.current_order()
            .map(|order| {
                order
                    .items
                    .iter()
                    .map(|item| (self.catalog.describe_item(item), item))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub async fn refresh_catalog(&mut self) -> Result<()> {
        let branch = self.branch_id.as_deref();
        let (products, variants) = tokio::try_join!(
            self.backend.list_products(branch),
            self.backend.list_variants(branch)
        )?;
        self.catalog = CatalogCache::build(products, variants);
        Ok(())
    }

    pub async fn refresh_orders(&mut self) -> Result<()> {
        let orders = self.backend.list_orders(self.branch_id.as_deref()).await?;
        self.pending = self.selector.reconcile(&orders);
        self.checkout.reconcile(&self.pending);
        tracing::debug!("{} pending orders", self.pending.len());
        Ok(())
    }

    pub async fn refresh_customers(&mut self) -> Result<()> {
        self.customers = self.backend.list_customers().await?;
        self.customers_loaded = true;
        Ok(())
    }

    pub async fn select_product(&mut self, product_id: &str) -> Result<Selection> {
        if self.catalog.product(product_id).is_none() {
            return Err(PosError::NotFound {
                kind: "product",
                id: product_id.to_string(),
            });
        }

        if self.catalog.has_variants(product_id) {
            let variants: Vec<Variant> = self
                .catalog
                .variants_of(product_id)
                .into_iter()
                .cloned()
                .collect();
            tracing::info!(
                "Product {} has {} variants; waiting for a choice",
                product_id,
                variants.len()
            );
            self.variant_selection = Some(product_id.to_string());
            return Ok(Selection::ChooseVariant(variants));
        }

        let order_id = self.add_to_cart(product_id, None).await?;
        Ok(Selection::Added(order_id))
    }

    pub async fn choose_variant(&mut self, variant_id: &str) -> Result<Option<String>> {
        let product_id = self
            .variant_selection
            .clone()
            .ok_or(PosError::NoVariantSelection)?;
        self.add_to_cart(&product_id, Some(variant_id)).await
    }

    pub fn cancel_variant_selection(&mut self) {
        if let Some(product_id) = self.variant_selection.take() {
            tracing::debug!("Variant selection for {} cancelled", product_id);
        }
    }

    /// Adds one unit to the current order, or starts a new order when none
    /// is selected. Returns the order the line landed in.
    pub async fn add_to_cart(
        &mut self,
        product_id: &str,
        variant_id: Option<&str>,
    ) -> Result<Option<String>> {
        self.checkout.ensure_cart_editable()?;
        let line = self.line_for(product_id, variant_id)?;

        let draft = OrderDraft {
            order_id: self.selector.selected().map(str::to_string),
            branch_id: self.branch_id.clone(),
            customer_id: self.customer_id.clone(),
            items: vec![line],
            ..Default::default()
        };
        draft.validate()?;

        let created = self.backend.create_order(&draft).await?;
        self.checkout.cart_changed()?;
        self.variant_selection = None;

        if let Some(id) = created.order_id.as_deref() {
            if self.selector.selected() != Some(id) {
                tracing::info!("Order {} is now current", id);
                self.selector.select(id);
            }
        }
        self.refresh_orders().await?;

        Ok(created
            .order_id
            .or_else(|| self.selector.selected().map(str::to_string)))
    }

    fn line_for(&self, product_id: &str, variant_id: Option<&str>) -> Result<OrderLineDraft> {
        let product = self
            .catalog
            .product(product_id)
            .ok_or_else(|| PosError::NotFound {
                kind: "product",
                id: product_id.to_string(),
            })?;

        let price = match variant_id {
            Some(variant_id) => {
                let variant = self
                    .catalog
                    .variant(variant_id)
                    .ok_or_else(|| PosError::NotFound {
                        kind: "variant",
                        id: variant_id.to_string(),
                    })?;
                if variant.product_id.as_deref() != Some(product_id) {
                    return Err(PosError::VariantMismatch {
                        product_id: product_id.to_string(),
                        variant_id: variant_id.to_string(),
                    });
                }
                variant.price
            }
            None if self.catalog.has_variants(product_id) => {
                return Err(PosError::validation(
                    "variantId",
                    format!("Choose a variant of {}", product.name_product),
                ));
            }
            None => product.price,
        };

        Ok(OrderLineDraft {
            product_id: Some(product_id.to_string()),
            variant_id: variant_id.map(str::to_string),
            quantity: "1".to_string(),
            price: price.as_decimal(),
        })
    }

    pub async fn update_quantity(&mut self, item_id: &str, quantity: i64) -> Result<()> {
        if quantity < 1 {
            tracing::warn!("Rejected quantity {} for item {}", quantity, item_id);
            return Err(PosError::InvalidQuantity(quantity));
        }
        self.checkout.ensure_cart_editable()?;
        let order_id = self.require_current_order_id()?;

        self.backend
            .update_item_quantity(&order_id, item_id, quantity)
            .await?;
        tracing::info!("Item {} in order {} set to {}", item_id, order_id, quantity);
        self.checkout.cart_changed()?;
        self.refresh_orders().await
    }

    pub async fn remove_item(&mut self, item_id: &str) -> Result<()> {
        self.checkout.ensure_cart_editable()?;
        let order_id = self.require_current_order_id()?;

        self.backend.delete_order_item(&order_id, item_id).await?;
        tracing::info!("Item {} removed from order {}", item_id, order_id);
        self.checkout.cart_changed()?;
        self.refresh_orders().await
    }

    fn require_current_order_id(&self) -> Result<String> {
        match self.current_order() {
            Some(order) => Ok(order.id.clone()),
            None => {
                tracing::warn!("No active order to update");
                Err(PosError::NoActiveOrder)
            }
        }
    }

    pub fn assign_customer(&mut self, customer_id: &str) -> Result<()> {
        let customer_id = customer_id.trim();
        if customer_id.is_empty() {
            return Err(PosError::validation("customer_id", "Customer is required"));
        }
        if self.customers_loaded && !self.customers.iter().any(|c| c.id == customer_id) {
            return Err(PosError::NotFound {
                kind: "customer",
                id: customer_id.to_string(),
            });
        }
        if self.customer_id.as_deref() != Some(customer_id) {
            self.checkout.cart_changed()?;
            tracing::info!("Customer {} assigned", customer_id);
            self.customer_id = Some(customer_id.to_string());
        }
        Ok(())
    }

    pub async fn create_customer(&mut self, draft: &CustomerDraft) -> Result<Customer> {
        draft.validate()?;
        let customer = self.backend.create_customer(draft).await?;
        tracing::info!("Customer {} created", customer.id);

        self.refresh_customers().await?;
        if !self.customers.iter().any(|c| c.id == customer.id) {
            self.customers.push(customer.clone());
        }
        self.assign_customer(&customer.id)?;
        Ok(customer)
    }

    /// Checkout step 1: attaches the customer to the current order.
    pub async fn process_payment(&mut self) -> Result<String> {
        let order_id = match self
            .checkout
            .check_confirm(self.current_order(), self.customer_id.as_deref())
        {
            Ok(order) => order.id.clone(),
            Err(e) => {
                tracing::warn!("Checkout blocked: {}", e.user_friendly_message());
                return Err(e);
            }
        };

        let update = OrderUpdate {
            customer_id: self.customer_id.clone(),
            notes: None,
        };
        self.backend.update_order(&order_id, &update).await?;
        self.checkout.confirmed(order_id.clone());
        self.refresh_orders().await?;
        Ok(order_id)
    }

    /// Checkout step 2.
    pub async fn create_payment(&mut self, method: PaymentMethod) -> Result<Payment> {
        let order_id = self.checkout.check_create_payment()?.to_string();
        let draft = PaymentDraft { order_id, method };
        tracing::debug!("Creating payment: {:?}", draft);

        let payment = self.backend.create_payment(&draft).await?;
        self.checkout.payment_created(payment.clone(), method)?;
        Ok(payment)
    }

    /// Checkout step 3. The receipt carries the totals as they stood before
    /// the order left the pending set.
    pub async fn verify_payment(&mut self) -> Result<CheckoutReceipt> {
        let payment_id = self.checkout.check_verify()?.id.clone();
        let totals = match self.checkout.stage() {
            CheckoutStage::AwaitingVerification { order_id, .. } => self
                .pending
                .iter()
                .find(|o| &o.id == order_id)
                .map(|o| OrderTotals::derive(o, self.fallback_tax_rate_bps))
                .unwrap_or_default(),
            _ => OrderTotals::default(),
        };

        self.backend.verify_payment(&payment_id).await?;
        let receipt = self.checkout.verified(totals)?;

        if let Err(e) = self.refresh_orders().await {
            tracing::warn!("Payment verified but orders could not be refreshed: {}", e);
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Category, CreatedOrder, OrderStatus, Product};
    use crate::domain::money::Money;
    use crate::domain::ports::{CatalogSource, CustomerDirectory, OrderGateway, PaymentGateway};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct BackendState {
        products: Vec<Product>,
        variants: Vec<Variant>,
        customers: Vec<Customer>,
        orders: Vec<Order>,
        next_id: u32,
        calls: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl BackendState {
        fn next(&mut self, prefix: &str) -> String {
            self.next_id += 1;
            format!("{}{}", prefix, self.next_id)
        }

        fn record(&mut self, call: &'static str) -> Result<()> {
            self.calls.push(call.to_string());
            if self.fail_on == Some(call) {
                return Err(PosError::Api {
                    status: 500,
                    message: format!("{} failed", call),
                });
            }
            Ok(())
        }

        fn order_mut(&mut self, id: &str) -> Result<&mut Order> {
            self.orders
                .iter_mut()
                .find(|o| o.id == id)
                .ok_or_else(|| PosError::NotFound {
                    kind: "order",
                    id: id.to_string(),
                })
        }
    }

    /// In-memory backend that behaves like the real one for the cart flow.
    #[derive(Clone, Default)]
    struct MockBackend {
        state: Arc<Mutex<BackendState>>,
    }

    impl MockBackend {
        fn with_catalog() -> Self {
            let backend = Self::default();
            {
                let mut state = backend.state.try_lock().unwrap();
                state.products = vec![
                    product("p1", "Espresso", 250),
                    product("p2", "Latte", 400),
                    product("p3", "Croissant", 325),
                ];
                state.variants = vec![
                    variant("v1", "p2", "Latte Small", 375),
                    variant("v2", "p2", "Latte Large", 450),
                ];
                state.customers = vec![customer("c1")];
            }
            backend
        }

        async fn fail_on(&self, call: &'static str) {
            self.state.lock().await.fail_on = Some(call);
        }

        async fn calls(&self) -> Vec<String> {
            self.state.lock().await.calls.clone()
        }

        async fn orders(&self) -> Vec<Order> {
            self.state.lock().await.orders.clone()
        }
    }

    #[async_trait]
    impl CatalogSource for MockBackend {
        async fn list_products(&self, _branch_id: Option<&str>) -> Result<Vec<Product>> {
            let mut state = self.state.lock().await;
            state.record("list_products")?;
            Ok(state.products.clone())
        }

        async fn list_variants(&self, _branch_id: Option<&str>) -> Result<Vec<Variant>> {
            let mut state = self.state.lock().await;
            state.record("list_variants")?;
            Ok(state.variants.clone())
        }

        async fn list_categories(&self) -> Result<Vec<Category>> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl OrderGateway for MockBackend {
        async fn list_orders(&self, _branch_id: Option<&str>) -> Result<Vec<Order>> {
            let mut state = self.state.lock().await;
            state.record("list_orders")?;
            Ok(state.orders.clone())
        }

        async fn create_order(&self, draft: &OrderDraft) -> Result<CreatedOrder> {
            let mut state = self.state.lock().await;
            state.record("create_order")?;

            let order_id = match draft.order_id.as_deref() {
                Some(id) if state.orders.iter().any(|o| o.id == id) => id.to_string(),
                _ => {
                    let id = state.next("o");
                    state.orders.push(Order {
                        id: id.clone(),
                        status: OrderStatus::Pending,
                        customer_id: draft.customer_id.clone(),
                        branch_id: draft.branch_id.clone(),
                        items: vec![],
                        subtotal: None,
                        tax_amount: None,
                        discount_amount: None,
                        total_amount: None,
                        created_at: None,
                        updated_at: None,
                    });
                    id
                }
            };

            let stamp = state.next_id;
            let mut new_items = Vec::new();
            for line in &draft.items {
                let price = Money::from_decimal(line.price);
                let qty: i64 = line.quantity.parse().unwrap_or(1);
                new_items.push(OrderItem {
                    id: state.next("i"),
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                    qty,
                    price,
                    subtotal: Some(price * qty),
                    image: None,
                });
            }
            let order = state.order_mut(&order_id)?;
            order.items.extend(new_items);
            order.updated_at = Some(format!("2024-06-01T12:00:{:02}Z", stamp % 60));

            Ok(CreatedOrder {
                order_id: Some(order_id),
            })
        }

        async fn update_order(&self, order_id: &str, update: &OrderUpdate) -> Result<()> {
            let mut state = self.state.lock().await;
            state.record("update_order")?;
            state.order_mut(order_id)?.customer_id = update.customer_id.clone();
            Ok(())
        }

        async fn update_item_quantity(
            &self,
            order_id: &str,
            item_id: &str,
            quantity: i64,
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            state.record("update_item_quantity")?;
            let order = state.order_mut(order_id)?;
            if let Some(item) = order.items.iter_mut().find(|i| i.id == item_id) {
                item.qty = quantity;
                item.subtotal = Some(item.price * quantity);
            }
            Ok(())
        }

        async fn delete_order_item(&self, order_id: &str, item_id: &str) -> Result<()> {
            let mut state = self.state.lock().await;
            state.record("delete_order_item")?;
            state.order_mut(order_id)?.items.retain(|i| i.id != item_id);
            Ok(())
        }
    }

    #[async_trait]
    impl PaymentGateway for MockBackend {
        async fn create_payment(&self, draft: &PaymentDraft) -> Result<Payment> {
            let mut state = self.state.lock().await;
            state.record("create_payment")?;
            Ok(Payment {
                id: state.next("pay"),
                order_id: Some(draft.order_id.clone()),
                method: Some(draft.method.to_string()),
                status: Some("pending".to_string()),
                amount: None,
            })
        }

        async fn verify_payment(&self, _payment_id: &str) -> Result<()> {
            let mut state = self.state.lock().await;
            state.record("verify_payment")?;
            let order_id = state
                .orders
                .iter()
                .find(|o| o.is_pending())
                .map(|o| o.id.clone())
                .unwrap_or_default();
            if let Ok(order) = state.order_mut(&order_id) {
                order.status = OrderStatus::Paid;
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CustomerDirectory for MockBackend {
        async fn list_customers(&self) -> Result<Vec<Customer>> {
            let mut state = self.state.lock().await;
            state.record("list_customers")?;
            Ok(state.customers.clone())
        }

        async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
            let mut state = self.state.lock().await;
            state.record("create_customer")?;
            let created = Customer {
                id: state.next("c"),
                name: draft.name.clone(),
                email: draft.email.clone(),
                phone: draft.phone.clone(),
                address: draft.address.clone(),
                city: draft.city.clone(),
                country: draft.country.clone(),
                loyal_points: 0,
            };
            state.customers.push(created.clone());
            Ok(created)
        }
    }

    fn product(id: &str, name: &str, cents: i64) -> Product {
        Product {
            id: id.to_string(),
            name_product: name.to_string(),
            category_id: Some("drinks".to_string()),
            category_name: None,
            price: Money::from_cents(cents),
            description: None,
            slug: None,
            sku: None,
            thumbnail: None,
            images: vec![],
            product_stock: None,
        }
    }

    fn variant(id: &str, product_id: &str, name: &str, cents: i64) -> Variant {
        Variant {
            id: id.to_string(),
            product_id: Some(product_id.to_string()),
            name_variant: name.to_string(),
            sku: None,
            price: Money::from_cents(cents),
            weight: None,
            color: None,
            thumbnail: None,
        }
    }

    fn customer(id: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            country: "US".to_string(),
            loyal_points: 0,
        }
    }

    async fn ready_session(backend: &MockBackend) -> PosSession<MockBackend> {
        let mut session = PosSession::new(backend.clone(), Some("b1".to_string()), 500);
        session.refresh_catalog().await.unwrap();
        session.refresh_orders().await.unwrap();
        session.refresh_customers().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_first_add_creates_order_and_selects_it() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;
        assert!(session.current_order().is_none());

        let selection = session.select_product("p1").await.unwrap();
        assert_eq!(selection, Selection::Added(Some("o1".to_string())));
        assert_eq!(session.current_order().unwrap().id, "o1");

        // Second add goes into the same order.
        session.add_to_cart("p3", None).await.unwrap();
        let orders = backend.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].items.len(), 2);

        let totals = session.current_totals().unwrap();
        assert_eq!(totals.subtotal.cents(), 575);
        assert_eq!(totals.tax.cents(), 29);
        assert_eq!(totals.total.cents(), 604);
    }

    #[tokio::test]
    async fn test_variant_selection_flow() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;

        let selection = session.select_product("p2").await.unwrap();
        match selection {
            Selection::ChooseVariant(variants) => assert_eq!(variants.len(), 2),
            other => panic!("expected variant choice, got {:?}", other),
        }
        assert_eq!(session.variant_selection(), Some("p2"));
        assert!(!backend.calls().await.contains(&"create_order".to_string()));

        session.choose_variant("v2").await.unwrap();
        assert_eq!(session.variant_selection(), None);

        let line = &session.current_order().unwrap().items[0];
        assert_eq!(line.variant_id.as_deref(), Some("v2"));
        assert_eq!(line.price.cents(), 450);
        let (shown, _) = &session.current_lines()[0];
        assert_eq!(shown.name, "Latte Large");
    }

    #[tokio::test]
    async fn test_variant_choice_errors() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;

        assert!(matches!(
            session.choose_variant("v1").await,
            Err(PosError::NoVariantSelection)
        ));
        assert!(matches!(
            session.add_to_cart("p1", Some("v1")).await,
            Err(PosError::VariantMismatch { .. })
        ));
        assert!(matches!(
            session.add_to_cart("p2", None).await,
            Err(PosError::Validation { .. })
        ));
        assert!(matches!(
            session.select_product("nope").await,
            Err(PosError::NotFound { kind: "product", .. })
        ));

        session.select_product("p2").await.unwrap();
        session.cancel_variant_selection();
        assert_eq!(session.variant_selection(), None);
        assert!(backend.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_quantity_and_removal() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;

        assert!(matches!(
            session.update_quantity("i1", 2).await,
            Err(PosError::NoActiveOrder)
        ));

        session.add_to_cart("p1", None).await.unwrap();
        let item_id = session.current_order().unwrap().items[0].id.clone();

        assert!(matches!(
            session.update_quantity(&item_id, 0).await,
            Err(PosError::InvalidQuantity(0))
        ));

        session.update_quantity(&item_id, 3).await.unwrap();
        assert_eq!(session.current_order().unwrap().items[0].qty, 3);
        assert_eq!(session.current_totals().unwrap().subtotal.cents(), 750);

        session.remove_item(&item_id).await.unwrap();
        assert!(session.current_order().unwrap().items.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_happy_path() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;
        session.add_to_cart("p1", None).await.unwrap();
        session.add_to_cart("p3", None).await.unwrap();
        session.assign_customer("c1").unwrap();

        let order_id = session.process_payment().await.unwrap();
        assert_eq!(
            session.stage(),
            &CheckoutStage::AwaitingPayment {
                order_id: order_id.clone()
            }
        );
        assert_eq!(backend.orders().await[0].customer_id.as_deref(), Some("c1"));

        let payment = session.create_payment(PaymentMethod::Cash).await.unwrap();
        assert_eq!(payment.order_id.as_deref(), Some(order_id.as_str()));

        let receipt = session.verify_payment().await.unwrap();
        assert_eq!(receipt.order_id, order_id);
        assert_eq!(receipt.payment_id, payment.id);
        assert_eq!(receipt.totals.total.cents(), 604);
        assert_eq!(session.stage(), &CheckoutStage::Building);
        assert!(session.current_order().is_none());
        assert!(session.pending_orders().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_preconditions() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;

        assert!(matches!(
            session.process_payment().await,
            Err(PosError::NoActiveOrder)
        ));
        assert!(matches!(
            session.create_payment(PaymentMethod::Cash).await,
            Err(PosError::PaymentNotReady)
        ));
        assert!(matches!(
            session.verify_payment().await,
            Err(PosError::NoPaymentToVerify)
        ));

        session.add_to_cart("p1", None).await.unwrap();
        assert!(matches!(
            session.process_payment().await,
            Err(PosError::CustomerNotAssigned)
        ));
        assert!(matches!(
            session.assign_customer("ghost"),
            Err(PosError::NotFound { kind: "customer", .. })
        ));
        assert!(!backend.calls().await.contains(&"update_order".to_string()));
    }

    #[tokio::test]
    async fn test_cart_change_after_confirmation_requires_reconfirm() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;
        session.add_to_cart("p1", None).await.unwrap();
        session.assign_customer("c1").unwrap();
        session.process_payment().await.unwrap();

        session.add_to_cart("p3", None).await.unwrap();
        assert_eq!(session.stage(), &CheckoutStage::Building);
        assert!(matches!(
            session.create_payment(PaymentMethod::Cash).await,
            Err(PosError::PaymentNotReady)
        ));

        session.process_payment().await.unwrap();
        session
            .create_payment(PaymentMethod::CreditCard)
            .await
            .unwrap();
        assert!(matches!(
            session.add_to_cart("p1", None).await,
            Err(PosError::PaymentInProgress)
        ));
    }

    #[tokio::test]
    async fn test_failed_remote_call_keeps_stage() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;
        session.add_to_cart("p1", None).await.unwrap();
        session.assign_customer("c1").unwrap();

        backend.fail_on("update_order").await;
        assert!(matches!(
            session.process_payment().await,
            Err(PosError::Api { status: 500, .. })
        ));
        assert_eq!(session.stage(), &CheckoutStage::Building);

        backend.fail_on("create_payment").await;
        session.process_payment().await.unwrap();
        assert!(session.create_payment(PaymentMethod::Cash).await.is_err());
        assert!(matches!(
            session.stage(),
            CheckoutStage::AwaitingPayment { .. }
        ));
    }

    #[tokio::test]
    async fn test_create_customer_assigns_it() {
        let backend = MockBackend::with_catalog();
        let mut session = ready_session(&backend).await;

        let invalid = CustomerDraft {
            name: "".to_string(),
            email: "x@example.com".to_string(),
            phone: None,
            address: "a".to_string(),
            city: "b".to_string(),
            country: "c".to_string(),
        };
        assert!(session.create_customer(&invalid).await.is_err());
        assert!(!backend.calls().await.contains(&"create_customer".to_string()));

        let draft = CustomerDraft {
            name: "Grace".to_string(),
            ..invalid
        };
        let created = session.create_customer(&draft).await.unwrap();
        assert_eq!(session.customer_id(), Some(created.id.as_str()));
        assert_eq!(session.customers().len(), 2);
    }

    #[test]
    fn test_session_from_config_uses_branch_and_rate() {
        struct Fixed;
        impl ConfigProvider for Fixed {
            fn api_base_url(&self) -> &str {
                "http://localhost"
            }
            fn auth_token(&self) -> Option<&str> {
                None
            }
            fn branch_id(&self) -> Option<&str> {
                Some("b7")
            }
            fn request_timeout(&self) -> std::time::Duration {
                std::time::Duration::from_secs(5)
            }
            fn fallback_tax_rate_bps(&self) -> u32 {
                1_000
            }
        }

        let backend = MockBackend::with_catalog();
        let mut session = PosSession::from_config(backend, &Fixed);
        tokio_test::block_on(session.refresh_catalog()).unwrap();
        tokio_test::block_on(session.add_to_cart("p1", None)).unwrap();

        assert_eq!(session.current_order().unwrap().branch_id.as_deref(), Some("b7"));
        assert_eq!(session.current_totals().unwrap().tax.cents(), 25);
    }
}
