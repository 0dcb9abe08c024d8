//! Order bundle builder
//!
//! Consumes segment starts and field values in message order and assembles an
//! [`OrderBundle`]. Lines and orders are validated when they are closed, which
//! happens on the next segment of the same or a higher level and on `build`.

use std::sync::Arc;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::application::ApplicationResult;
use crate::domain::{
    Customer, DomainError, FieldAction, MissingLineField, Order, OrderBundle, OrderLine,
    Priority, Segment,
};
use crate::infrastructure::traits::Repository;

/// Where the builder currently is in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    NoOrder,
    InOrder,
    InOrderLine,
}

/// Builds one [`OrderBundle`] from one message.
pub struct BundleBuilder {
    customers: Arc<dyn Repository<Customer>>,
    sender: Option<String>,
    receiver: Option<String>,
    orders: Vec<Order>,
    current_order: Option<Order>,
    current_line: Option<OrderLine>,
}

impl std::fmt::Debug for BundleBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleBuilder")
            .field("sender", &self.sender)
            .field("receiver", &self.receiver)
            .field("orders", &self.orders)
            .field("current_order", &self.current_order)
            .field("current_line", &self.current_line)
            .finish_non_exhaustive()
    }
}

impl BundleBuilder {
    /// Create a builder resolving customers through `customers`.
    pub fn new(customers: Arc<dyn Repository<Customer>>) -> Self {
        Self {
            customers,
            sender: None,
            receiver: None,
            orders: Vec::new(),
            current_order: None,
            current_line: None,
        }
    }

    pub fn state(&self) -> BuilderState {
        match (&self.current_order, &self.current_line) {
            (Some(_), Some(_)) => BuilderState::InOrderLine,
            (Some(_), None) => BuilderState::InOrder,
            _ => BuilderState::NoOrder,
        }
    }

    /// Start a new segment of the given kind.
    pub fn new_segment(&mut self, segment: Segment) -> ApplicationResult<&mut Self> {
        trace!(%segment, state = ?self.state(), "new segment");
        match segment {
            Segment::Header => Ok(self),
            Segment::Order => self.start_order(),
            Segment::OrderLine => self.start_order_line(),
        }
    }

    /// Apply a field value to the part of the bundle `action` addresses.
    pub fn set_field(&mut self, action: FieldAction, value: &str) -> ApplicationResult<&mut Self> {
        trace!(%action, value, "set field");
        match action {
            FieldAction::Sender => self.set_sender(value),
            FieldAction::Receiver => self.set_receiver(value),
            FieldAction::Priority => self.set_priority(value),
            FieldAction::Customer => self.set_customer(value),
            FieldAction::Product => self.set_product(value),
            FieldAction::Quantity => self.set_quantity(value),
        }
    }

    pub fn set_sender(&mut self, sender: &str) -> ApplicationResult<&mut Self> {
        if self.sender.is_some() {
            return Err(DomainError::DuplicateField(FieldAction::Sender).into());
        }
        self.sender = Some(sender.to_string());
        Ok(self)
    }

    pub fn set_receiver(&mut self, receiver: &str) -> ApplicationResult<&mut Self> {
        if self.receiver.is_some() {
            return Err(DomainError::DuplicateField(FieldAction::Receiver).into());
        }
        self.receiver = Some(receiver.to_string());
        Ok(self)
    }

    pub fn start_order(&mut self) -> ApplicationResult<&mut Self> {
        self.finish_current_order()?;
        let order = Order::new();
        debug!(order = %order.id(), "start order");
        self.current_order = Some(order);
        Ok(self)
    }

    pub fn set_priority(&mut self, priority: &str) -> ApplicationResult<&mut Self> {
        let order = self.order_in_progress()?;
        order.priority = priority.parse::<Priority>()?;
        Ok(self)
    }

    /// Resolve `customer_id` through the registry and assign it to the current order.
    pub fn set_customer(&mut self, customer_id: &str) -> ApplicationResult<&mut Self> {
        self.order_in_progress()?;
        let customer = Uuid::parse_str(customer_id)
            .ok()
            .and_then(|id| self.customers.get(&id))
            .ok_or_else(|| DomainError::UnknownCustomer(customer_id.to_string()))?;
        self.order_in_progress()?.customer = Some(customer);
        Ok(self)
    }

    pub fn start_order_line(&mut self) -> ApplicationResult<&mut Self> {
        let order_id = self.order_in_progress()?.id();
        self.finish_current_line()?;
        self.current_line = Some(OrderLine::for_order(order_id));
        Ok(self)
    }

    pub fn set_product(&mut self, product: &str) -> ApplicationResult<&mut Self> {
        self.line_in_progress()?.product = Some(product.to_string());
        Ok(self)
    }

    /// Set the quantity of the current line; it is range-checked when the line closes.
    pub fn set_quantity(&mut self, quantity: &str) -> ApplicationResult<&mut Self> {
        let line = self.line_in_progress()?;
        line.quantity = quantity
            .trim()
            .parse()
            .map_err(|_| DomainError::InvalidQuantity(quantity.to_string()))?;
        Ok(self)
    }

    /// Close everything still open and return the bundle.
    pub fn build(mut self) -> ApplicationResult<OrderBundle> {
        self.finish_current_order()?;

        let sender = self.sender.take().ok_or(DomainError::MissingSender)?;
        let receiver = self.receiver.take().ok_or(DomainError::MissingReceiver)?;

        debug!(orders = self.orders.len(), "bundle built");
        Ok(OrderBundle::new(sender, receiver, self.orders))
    }

    fn finish_current_order(&mut self) -> ApplicationResult<()> {
        self.finish_current_line()?;
        if let Some(order) = self.current_order.take() {
            debug!(order = %order.id(), lines = order.len(), "finish order");
            self.orders.push(order);
        }
        Ok(())
    }

    fn finish_current_line(&mut self) -> ApplicationResult<()> {
        let Some(line) = self.current_line.take() else {
            return Ok(());
        };
        if line.product.is_none() {
            return Err(DomainError::IncompleteOrderLine(MissingLineField::Product).into());
        }
        if line.quantity <= 0 {
            return Err(DomainError::IncompleteOrderLine(MissingLineField::Quantity).into());
        }
        let order = self
            .current_order
            .as_mut()
            .ok_or(DomainError::MissingOrderContext)?;
        order.push_line(line)?;
        Ok(())
    }

    fn order_in_progress(&mut self) -> Result<&mut Order, DomainError> {
        self.current_order
            .as_mut()
            .ok_or(DomainError::MissingOrderContext)
    }

    fn line_in_progress(&mut self) -> Result<&mut OrderLine, DomainError> {
        if self.current_order.is_none() {
            return Err(DomainError::MissingOrderContext);
        }
        self.current_line
            .as_mut()
            .ok_or(DomainError::MissingOrderLineContext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::InMemoryRepository;

    fn builder() -> BundleBuilder {
        BundleBuilder::new(Arc::new(InMemoryRepository::new()))
    }

    #[test]
    fn given_fresh_builder_then_no_order() {
        assert_eq!(builder().state(), BuilderState::NoOrder);
    }

    #[test]
    fn given_segments_when_started_then_state_follows() {
        let mut b = builder();
        b.new_segment(Segment::Header).unwrap();
        assert_eq!(b.state(), BuilderState::NoOrder);
        b.new_segment(Segment::Order).unwrap();
        assert_eq!(b.state(), BuilderState::InOrder);
        b.new_segment(Segment::OrderLine).unwrap();
        assert_eq!(b.state(), BuilderState::InOrderLine);
        b.set_product("p").unwrap().set_quantity("1").unwrap();
        b.new_segment(Segment::Order).unwrap();
        assert_eq!(b.state(), BuilderState::InOrder);
    }

    #[test]
    fn given_line_without_quantity_when_closing_then_incomplete() {
        let mut b = builder();
        b.start_order().unwrap().start_order_line().unwrap();
        b.set_product("p").unwrap();

        let err = b.start_order_line().unwrap_err();
        assert_eq!(
            err.as_domain(),
            Some(&DomainError::IncompleteOrderLine(MissingLineField::Quantity))
        );
        assert_eq!(err.to_string(), "incomplete order line: quantity not set");
    }

    #[test]
    fn given_quantity_with_whitespace_when_setting_then_parses() {
        let mut b = builder();
        b.start_order().unwrap().start_order_line().unwrap();
        b.set_quantity(" 7 ").unwrap();
        assert_eq!(b.current_line.as_ref().map(|l| l.quantity), Some(7));
    }
}
