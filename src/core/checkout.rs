//! Checkout as a linear state machine.
//!
//! ```text
//!   Building ──confirm──► AwaitingPayment ──payment_created──► AwaitingVerification
//!      ▲                        │                                    │
//!      └──── cart_changed ──────┘                                    │
//!      └────────────────────────── verified ─────────────────────────┘
//! ```
//!
//! Each step is split into a `check_*` call made before the remote request
//! and a commit call made after it succeeds, so a failed request never moves
//! the stage.

use crate::core::order_selector::OrderTotals;
use crate::domain::model::{Order, Payment, PaymentMethod};
use crate::utils::error::{PosError, Result};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckoutStage {
    #[default]
    Building,
    AwaitingPayment {
        order_id: String,
    },
    AwaitingVerification {
        order_id: String,
        payment: Payment,
        method: PaymentMethod,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub payment_id: String,
    pub method: PaymentMethod,
    pub totals: OrderTotals,
}

#[derive(Debug, Clone, Default)]
pub struct CheckoutSequencer {
    stage: CheckoutStage,
}

impl CheckoutSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &CheckoutStage {
        &self.stage
    }

    /// Step 1 preconditions, checked in the order the cashier sees them.
    pub fn check_confirm<'a>(
        &self,
        current: Option<&'a Order>,
        customer_id: Option<&str>,
    ) -> Result<&'a Order> {
        if matches!(self.stage, CheckoutStage::AwaitingVerification { .. }) {
            return Err(PosError::PaymentInProgress);
        }
        let order = current.ok_or(PosError::NoActiveOrder)?;
        if order.items.is_empty() {
            return Err(PosError::EmptyCart);
        }
        if customer_id.map_or(true, |id| id.trim().is_empty()) {
            return Err(PosError::CustomerNotAssigned);
        }
        Ok(order)
    }

    pub fn confirmed(&mut self, order_id: impl Into<String>) {
        let order_id = order_id.into();
        tracing::info!("Order {} confirmed, awaiting payment", order_id);
        self.stage = CheckoutStage::AwaitingPayment { order_id };
    }

    /// Step 2 precondition: returns the confirmed order id.
    pub fn check_create_payment(&self) -> Result<&str> {
        match &self.stage {
            CheckoutStage::AwaitingPayment { order_id } => Ok(order_id),
            _ => Err(PosError::PaymentNotReady),
        }
    }

    pub fn payment_created(&mut self, payment: Payment, method: PaymentMethod) -> Result<()> {
        let order_id = self.check_create_payment()?.to_string();
        tracing::info!("Payment {} created for order {}", payment.id, order_id);
        self.stage = CheckoutStage::AwaitingVerification {
            order_id,
            payment,
            method,
        };
        Ok(())
    }

    /// Step 3 precondition: returns the payment awaiting verification.
    pub fn check_verify(&self) -> Result<&Payment> {
        match &self.stage {
            CheckoutStage::AwaitingVerification { payment, .. } => Ok(payment),
            _ => Err(PosError::NoPaymentToVerify),
        }
    }

    pub fn verified(&mut self, totals: OrderTotals) -> Result<CheckoutReceipt> {
        match std::mem::take(&mut self.stage) {
            CheckoutStage::AwaitingVerification {
                order_id,
                payment,
                method,
            } => {
                tracing::info!("Payment {} verified; order {} is paid", payment.id, order_id);
                Ok(CheckoutReceipt {
                    order_id,
                    payment_id: payment.id,
                    method,
                    totals,
                })
            }
            other => {
                self.stage = other;
                Err(PosError::NoPaymentToVerify)
            }
        }
    }

    /// Called once an add, quantity change or removal has gone through. A
    /// confirmed order goes back to `Building`; a payment in flight blocks it.
    pub fn cart_changed(&mut self) -> Result<()> {
        self.ensure_cart_editable()?;
        if let CheckoutStage::AwaitingPayment { .. } = self.stage {
            tracing::info!("Cart changed; order needs to be confirmed again");
            self.stage = CheckoutStage::Building;
        }
        Ok(())
    }

    /// Checked before the cart request is sent.
    pub fn ensure_cart_editable(&self) -> Result<()> {
        match self.stage {
            CheckoutStage::AwaitingVerification { .. } => Err(PosError::PaymentInProgress),
            _ => Ok(()),
        }
    }

    /// Drops a confirmation whose order is no longer pending on the server.
    pub fn reconcile(&mut self, pending: &[Order]) {
        if let CheckoutStage::AwaitingPayment { order_id } = &self.stage {
            if !pending.iter().any(|o| &o.id == order_id) {
                tracing::warn!("Confirmed order {} is no longer pending", order_id);
                self.stage = CheckoutStage::Building;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{OrderItem, OrderStatus};
    use crate::domain::money::Money;

    fn order(id: &str, items: usize) -> Order {
        Order {
            id: id.to_string(),
            status: OrderStatus::Pending,
            customer_id: None,
            branch_id: None,
            items: (0..items)
                .map(|i| OrderItem {
                    id: format!("i{}", i),
                    product_id: Some("p1".to_string()),
                    variant_id: None,
                    qty: 1,
                    price: Money::from_cents(225),
                    subtotal: Some(Money::from_cents(225)),
                    image: None,
                })
                .collect(),
            subtotal: None,
            tax_amount: None,
            discount_amount: None,
            total_amount: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn payment(id: &str) -> Payment {
        Payment {
            id: id.to_string(),
            order_id: Some("o1".to_string()),
            method: Some("cash".to_string()),
            status: Some("pending".to_string()),
            amount: None,
        }
    }

    #[test]
    fn test_confirm_preconditions_in_order() {
        let seq = CheckoutSequencer::new();
        let empty = order("o1", 0);
        let full = order("o1", 2);

        assert!(matches!(
            seq.check_confirm(None, Some("c1")),
            Err(PosError::NoActiveOrder)
        ));
        assert!(matches!(
            seq.check_confirm(Some(&empty), None),
            Err(PosError::EmptyCart)
        ));
        assert!(matches!(
            seq.check_confirm(Some(&full), None),
            Err(PosError::CustomerNotAssigned)
        ));
        assert!(matches!(
            seq.check_confirm(Some(&full), Some("  ")),
            Err(PosError::CustomerNotAssigned)
        ));
        assert_eq!(seq.check_confirm(Some(&full), Some("c1")).unwrap().id, "o1");
    }

    #[test]
    fn test_full_sequence() {
        let mut seq = CheckoutSequencer::new();
        assert!(matches!(seq.check_create_payment(), Err(PosError::PaymentNotReady)));
        assert!(matches!(seq.check_verify(), Err(PosError::NoPaymentToVerify)));

        seq.confirmed("o1");
        assert_eq!(seq.check_create_payment().unwrap(), "o1");

        seq.payment_created(payment("pay1"), PaymentMethod::Cash)
            .unwrap();
        assert_eq!(seq.check_verify().unwrap().id, "pay1");

        let receipt = seq.verified(OrderTotals::default()).unwrap();
        assert_eq!(receipt.order_id, "o1");
        assert_eq!(receipt.payment_id, "pay1");
        assert_eq!(receipt.method, PaymentMethod::Cash);
        assert_eq!(seq.stage(), &CheckoutStage::Building);
    }

    #[test]
    fn test_payment_cannot_skip_confirmation() {
        let mut seq = CheckoutSequencer::new();
        assert!(seq
            .payment_created(payment("pay1"), PaymentMethod::Cash)
            .is_err());
        assert!(seq.verified(OrderTotals::default()).is_err());
        assert_eq!(seq.stage(), &CheckoutStage::Building);
    }

    #[test]
    fn test_cart_change_resets_confirmation_but_not_payment() {
        let mut seq = CheckoutSequencer::new();
        seq.confirmed("o1");
        seq.cart_changed().unwrap();
        assert_eq!(seq.stage(), &CheckoutStage::Building);

        seq.confirmed("o1");
        seq.payment_created(payment("pay1"), PaymentMethod::CreditCard)
            .unwrap();
        assert!(matches!(seq.cart_changed(), Err(PosError::PaymentInProgress)));
        assert!(matches!(
            seq.check_confirm(Some(&order("o1", 1)), Some("c1")),
            Err(PosError::PaymentInProgress)
        ));
    }

    #[test]
    fn test_reconcile_drops_vanished_confirmation() {
        let mut seq = CheckoutSequencer::new();
        seq.confirmed("o1");
        seq.reconcile(&[order("o1", 1)]);
        assert!(matches!(seq.stage(), CheckoutStage::AwaitingPayment { .. }));

        seq.reconcile(&[order("o2", 1)]);
        assert_eq!(seq.stage(), &CheckoutStage::Building);
    }
}
