//! Domain entities: customers, orders and the bundle a message describes

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};

pub type CustomerId = Uuid;
pub type OrderId = Uuid;

/// A customer known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    /// New customer with a freshly generated identifier.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: CustomerId) -> Self {
        Self {
            id,
            name: None,
            address: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(DomainError::InvalidPriority(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Cancelled,
}

/// One product line of an order.
///
/// A line remembers the order it belongs to; a detached line has no owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLine {
    order: Option<OrderId>,
    pub product: Option<String>,
    pub quantity: i64,
}

impl OrderLine {
    /// Detached line without product or quantity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty line already owned by `order`.
    pub fn for_order(order: OrderId) -> Self {
        Self {
            order: Some(order),
            ..Self::default()
        }
    }

    pub fn with(product: impl Into<String>, quantity: i64) -> Self {
        Self {
            order: None,
            product: Some(product.into()),
            quantity,
        }
    }

    pub fn order(&self) -> Option<OrderId> {
        self.order
    }

    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// An order and the lines it owns.
///
/// Orders compare equal by identifier only.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    pub customer: Option<Customer>,
    pub priority: Priority,
    pub status: OrderStatus,
    cancel_reason: Option<String>,
    lines: Vec<OrderLine>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            customer: None,
            priority: Priority::default(),
            status: OrderStatus::default(),
            cancel_reason: None,
            lines: Vec::new(),
        }
    }

    pub fn for_customer(customer: Customer, priority: Priority) -> Self {
        Self {
            customer: Some(customer),
            priority,
            ..Self::new()
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Why the order was cancelled; None unless it is.
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn cancel(&mut self, reason: impl Into<String>) {
        self.status = OrderStatus::Cancelled;
        self.cancel_reason = Some(reason.into());
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Attach a line, taking ownership of it.
    ///
    /// Fails if the line already belongs to another order.
    pub fn push_line(&mut self, mut line: OrderLine) -> DomainResult<()> {
        match line.order {
            Some(owner) if owner != self.id => return Err(DomainError::ForeignOrderLine),
            _ => line.order = Some(self.id),
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn add(&mut self, product: impl Into<String>, quantity: i64) -> &OrderLine {
        let mut line = OrderLine::with(product, quantity);
        line.order = Some(self.id);
        self.lines.push(line);
        &self.lines[self.lines.len() - 1]
    }

    /// Detach and return the line at `index`.
    pub fn remove_line(&mut self, index: usize) -> Option<OrderLine> {
        if index >= self.lines.len() {
            return None;
        }
        let mut line = self.lines.remove(index);
        line.order = None;
        Some(line)
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order {}", self.id)
    }
}

/// Finished result of a message: who sent it, to whom, and its orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBundle {
    sender: String,
    receiver: String,
    orders: Vec<Order>,
}

impl OrderBundle {
    pub fn new(sender: String, receiver: String, orders: Vec<Order>) -> Self {
        Self {
            sender,
            receiver,
            orders,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn into_orders(self) -> Vec<Order> {
        self.orders
    }
}
