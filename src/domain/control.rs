//! Order control actions: create, cancel, and extend orders outside a message

use tracing::debug;

use crate::domain::entities::{Customer, Order, Priority};

/// A single change applied to an order.
///
/// `execute` consumes the action and returns the resulting order.
#[derive(Debug, Clone)]
pub enum OrderControl {
    /// Create an order for `customer`.
    New {
        customer: Customer,
        priority: Priority,
    },
    /// Mark `order` cancelled, keeping `reason`.
    Cancel { order: Order, reason: String },
    /// Append a line to `order`.
    AddLine {
        order: Order,
        product: String,
        quantity: i64,
    },
}

impl OrderControl {
    /// New order with the default priority.
    pub fn new_order(customer: Customer) -> Self {
        OrderControl::New {
            customer,
            priority: Priority::default(),
        }
    }

    pub fn execute(self) -> Order {
        match self {
            OrderControl::New { customer, priority } => {
                let order = Order::for_customer(customer, priority);
                debug!(order = %order.id(), %priority, "new order");
                order
            }
            OrderControl::Cancel { mut order, reason } => {
                debug!(order = %order.id(), reason = %reason, "cancel order");
                order.cancel(reason);
                order
            }
            OrderControl::AddLine {
                mut order,
                product,
                quantity,
            } => {
                order.add(product, quantity);
                order
            }
        }
    }
}
