//! End-to-end tests for MessageService with the ASWM label tables

use std::io::Cursor;
use std::sync::Arc;

use msgbundle::application::services::MessageService;
use msgbundle::config::Settings;
use msgbundle::domain::{
    Customer, DomainError, FieldAction, FieldRule, Priority, Segment, SeparatorSpec,
};
use msgbundle::infrastructure::traits::{InMemoryRepository, LabelMapping, Repository};
use msgbundle::infrastructure::ServiceContainer;
use msgbundle::util::testing::init_test_setup;

/// Container with one registered customer.
fn container_with_customer(customer: &Customer) -> ServiceContainer {
    init_test_setup();
    let customers = Arc::new(InMemoryRepository::new());
    customers.put(customer.id, customer.clone());
    ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(LabelMapping::aswm()),
        customers,
    )
}

fn service() -> MessageService {
    init_test_setup();
    ServiceContainer::new(Settings::default()).message_service()
}

#[test]
fn given_aswm_message_when_parsing_then_bundle_built() {
    // Arrange
    let customer = Customer::new().named("ACME");
    let service = container_with_customer(&customer).message_service();
    let text = format!(
        "H|~|LAB|HOSP\n\
         O|High|{id}\n\
         L|glucose|2\n\
         L|insulin^fast|1\n\
         O|Low|{id}\n\
         L|saline|10\n",
        id = customer.id
    );

    // Act
    let bundle = service.parse_bundle(Cursor::new(text)).unwrap();

    // Assert
    assert_eq!(bundle.sender(), "LAB");
    assert_eq!(bundle.receiver(), "HOSP");
    assert_eq!(bundle.orders().len(), 2);

    let first = &bundle.orders()[0];
    assert_eq!(first.priority, Priority::High);
    assert_eq!(first.customer.as_ref(), Some(&customer));
    assert_eq!(first.len(), 2);
    assert_eq!(first.lines()[0].product(), Some("glucose"));
    assert_eq!(first.lines()[1].product(), Some("insulin^fast"));

    let second = &bundle.orders()[1];
    assert_eq!(second.priority, Priority::Low);
    assert_eq!(second.lines()[0].quantity(), 10);
}

#[test]
fn given_unknown_label_when_parsing_then_unknown_segment_label() {
    let err = service().parse_bundle_str("H|^|s|r\nX|1").unwrap_err();

    assert_eq!(
        err.as_domain(),
        Some(&DomainError::UnknownSegmentLabel("X".to_string()))
    );
}

#[test]
fn given_missing_mapped_field_when_parsing_then_field_has_no_value() {
    let err = service().parse_bundle_str("H|^|sender").unwrap_err();

    assert_eq!(
        err.as_domain(),
        Some(&DomainError::FieldHasNoValue {
            label: "H".to_string(),
            field_index: 2,
            subfield_index: 0
        })
    );
}

#[test]
fn given_repeated_mapped_field_when_parsing_then_ambiguous() {
    let err = service()
        .parse_bundle_str("H|^|s|r\nO|High^Low")
        .unwrap_err();

    assert_eq!(
        err.as_domain(),
        Some(&DomainError::AmbiguousRepeatingValue)
    );
}

#[test]
fn given_unregistered_customer_when_parsing_then_unknown_customer() {
    let err = service()
        .parse_bundle_str("H|^|s|r\nO|High|nobody")
        .unwrap_err();

    assert_eq!(
        err.as_domain(),
        Some(&DomainError::UnknownCustomer("nobody".to_string()))
    );
}

#[test]
fn given_line_before_order_when_parsing_then_missing_order_context() {
    let err = service().parse_bundle_str("H|^|s|r\nL|p|1").unwrap_err();

    assert_eq!(err.as_domain(), Some(&DomainError::MissingOrderContext));
}

#[test]
fn given_empty_message_when_parsing_then_missing_header() {
    let err = service().parse_bundle_str("").unwrap_err();

    assert_eq!(err.as_domain(), Some(&DomainError::MissingHeader));
}

#[test]
fn given_custom_mapping_with_subfields_when_parsing_then_rules_address_subfields() {
    // Arrange: three-letter labels, sender and receiver share one field
    init_test_setup();
    let mapping = LabelMapping::new()
        .with_segment("HDR", Segment::Header)
        .with_segment("ORD", Segment::Order)
        .with_segment("LIN", Segment::OrderLine)
        .with_rule("HDR", FieldRule::new(1, 0, FieldAction::Sender))
        .with_rule("HDR", FieldRule::new(1, 1, FieldAction::Receiver))
        .with_rule("LIN", FieldRule::new(0, 1, FieldAction::Product))
        .with_rule("LIN", FieldRule::new(1, 0, FieldAction::Quantity));
    let settings = Settings {
        separators: SeparatorSpec {
            special_chars_start_index: 3,
            ..SeparatorSpec::default()
        },
    };
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(mapping),
        Arc::new(InMemoryRepository::<Customer>::new()),
    );

    // Act
    let bundle = container
        .message_service()
        .parse_bundle_str("HDR|~^|LAB^HOSP\nORD\nLIN|7^aspirin|4")
        .unwrap();

    // Assert
    assert_eq!(bundle.sender(), "LAB");
    assert_eq!(bundle.receiver(), "HOSP");
    assert_eq!(bundle.orders()[0].lines()[0].product(), Some("aspirin"));
    assert_eq!(bundle.orders()[0].lines()[0].quantity(), 4);
}

#[test]
fn given_parsed_message_when_building_bundle_then_same_as_direct_parse() {
    let customer = Customer::new();
    let service = container_with_customer(&customer).message_service();
    let text = format!("H|^|s|r\nO|Medium|{}\nL|p|3", customer.id);

    let message = service.reader().read_str(&text).unwrap();
    let bundle = service.build_bundle(&message).unwrap();

    assert_eq!(bundle.sender(), "s");
    assert_eq!(bundle.orders()[0].lines()[0].quantity(), 3);
}

#[test]
fn given_container_when_building_by_hand_then_registry_shared() {
    // Arrange
    let customer = Customer::new().named("ACME");
    let container = container_with_customer(&customer);
    let mut builder = container.bundle_builder();

    // Act
    builder.set_sender("s").unwrap().set_receiver("r").unwrap();
    builder.start_order().unwrap();
    builder.set_customer(&customer.id.to_string()).unwrap();
    let orders = builder.build().unwrap().into_orders();

    // Assert
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer.as_ref(), Some(&customer));
}
