use super::*;
use crate::{
    definition::AttributeKind,
    test_utils::{
        fixtures::{employee, Address, Employee, Phone},
        MockCursor,
    },
    udt::Udt,
    MetadataRegistry, Preset,
};
use alloc::vec;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

#[test_log::test]
fn constructor_and_binds_share_numbering() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Employee>().unwrap();
    let value = employee().to_value();

    let fragment = metadata.build_query_constructor_string(&value, 1).unwrap();
    assert_eq!(
        fragment.text,
        "HR.EMP(:1, :2, HR.ADDRESS(:3, :4), HR.PHONE_TBL(HR.PHONE(:5), HR.PHONE(:6)))"
    );
    assert_eq!(fragment.last_number, 7);

    let binds = metadata.get_oracle_parameters(&value, 1).unwrap();
    assert_eq!(
        binds,
        vec![
            BindParameter::new(
                1,
                Direction::Input,
                Some(OracleDbType::Int64),
                None,
                Value::Int64(7)
            ),
            BindParameter::new(
                2,
                Direction::Input,
                Some(OracleDbType::Varchar2),
                Some(3),
                Value::Text("Ada".into())
            ),
            BindParameter::new(
                3,
                Direction::Input,
                Some(OracleDbType::Varchar2),
                Some(7),
                Value::Text("Main St".into())
            ),
            BindParameter::new(4, Direction::Input, Some(OracleDbType::Int32), None, Value::Null),
            BindParameter::new(
                5,
                Direction::Input,
                Some(OracleDbType::Varchar2),
                Some(8),
                Value::Text("555-0100".into())
            ),
            BindParameter::new(
                6,
                Direction::Input,
                Some(OracleDbType::Varchar2),
                Some(8),
                Value::Text("555-0199".into())
            ),
        ]
    );
    for (position, bind) in binds.iter().enumerate() {
        assert_eq!(bind.number(), 1 + position as u32);
    }
}

#[test]
fn numbering_starts_where_asked() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Phone>().unwrap();
    let phones = vec![
        Phone {
            number: "1".into(),
        },
        Phone {
            number: "2".into(),
        },
    ];

    let fragment = metadata
        .build_query_constructor_string(&phones.to_value(), 6)
        .unwrap();
    assert_eq!(fragment.text, "HR.PHONE_TBL(HR.PHONE(:6), HR.PHONE(:7))");
    assert_eq!(fragment.last_number, 8);

    let empty = metadata
        .build_query_constructor_string(&Vec::<Phone>::new().to_value(), 6)
        .unwrap();
    assert_eq!(empty.text, "HR.PHONE_TBL()");
    assert_eq!(empty.last_number, 6);
}

#[test]
fn null_nested_values() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Employee>().unwrap();
    let mut employee = employee();
    employee.address = None;
    let mut value = employee.to_value();
    if let Value::Object(record) = &mut value {
        record.insert("phones", Value::Null);
    }

    let (fragment, binds) = metadata.render(&value, 1).unwrap();
    assert_eq!(fragment.text, "HR.EMP(:1, :2, NULL, NULL)");
    assert_eq!(binds.len(), 2);

    let fragment = metadata.build_query_constructor_string(&Value::Null, 4).unwrap();
    assert_eq!(fragment.text, "NULL");
    assert_eq!(fragment.last_number, 4);
}

#[test]
fn collection_of_object_only_type() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Address>().unwrap();
    let addresses = vec![Address {
        street: "Main St".into(),
        zip: Some(1000),
    }];

    let err = metadata
        .build_query_constructor_string(&addresses.to_value(), 1)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    let err = metadata
        .declare_line(UdtKind::Collection, "P_ADDRESSES", None)
        .unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn collection_property_needs_collection_type() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "HR.SITE")]
    struct Site {
        addresses: Vec<Address>,
    }

    let registry = MetadataRegistry::new();
    let err = registry.metadata::<Site>().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn declare_lines() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Employee>().unwrap();

    assert_eq!(
        metadata
            .declare_line(UdtKind::Object, "P_EMP", Some("HR.EMP(:1, :2, NULL, NULL)"))
            .unwrap(),
        "v_p_emp HR.EMP := HR.EMP(:1, :2, NULL, NULL);"
    );
    assert_eq!(
        metadata
            .declare_line(UdtKind::Collection, "teamMembers", None)
            .unwrap(),
        "v_team_members HR.EMP_TBL := NULL;"
    );
}

#[test]
fn ref_cursor_queries() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Employee>().unwrap();

    let object = metadata.get_ref_cursor_query(8, "P_EMP");
    assert_eq!(
        object.text,
        "OPEN :8 FOR SELECT v_p_emp.ID AS ID, v_p_emp.NAME AS NAME, \
         v_p_emp.ADDRESS AS ADDRESS, v_p_emp.PHONES AS PHONES \
         FROM DUAL WHERE v_p_emp IS NOT NULL;"
    );
    assert_eq!(object.last_number, 9);

    let collection = metadata.get_ref_cursor_collection_query(9, "P_EMPS");
    assert_eq!(collection.text, "OPEN :9 FOR SELECT * FROM TABLE(v_p_emps);");
    assert_eq!(collection.last_number, 10);

    assert_eq!(
        metadata.get_oracle_parameter_for_ref_cursor(9),
        BindParameter::new(
            9,
            Direction::Output,
            Some(OracleDbType::RefCursor),
            None,
            Value::Null
        )
    );
}

#[test_log::test]
fn binds_round_trip_through_cursor() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Employee>().unwrap();
    let original = employee();
    let binds = metadata.get_oracle_parameters(&original.to_value(), 1).unwrap();
    let bound = |number: usize| binds[number - 1].value().clone();

    // The row the database returns for the object the constructor built.
    let mut cursor = MockCursor::new(
        &["ID", "NAME", "ADDRESS", "PHONES"],
        vec![vec![
            bound(1),
            bound(2),
            Value::Object(
                Record::new()
                    .with("STREET", bound(3))
                    .with("ZIP", bound(4)),
            ),
            Value::Collection(vec![
                Value::Object(Record::new().with("NUMBER", bound(5))),
                Value::Object(Record::new().with("NUMBER", bound(6))),
            ]),
        ]],
    );

    let value = metadata
        .get_value_from_ref_cursor(&mut cursor, UdtKind::Object)
        .unwrap();
    assert_eq!(Employee::from_value(value).unwrap(), original);
}

#[test]
fn renamed_properties_read_back() {
    let registry = MetadataRegistry::new();
    registry.register_preset(
        Address::OBJECT.name(),
        Preset::default().map("street", "street_name"),
    );
    let metadata = registry.metadata::<Address>().unwrap();
    assert_eq!(
        metadata.attributes().collect::<Vec<_>>(),
        ["STREET_NAME", "ZIP"]
    );

    let mut cursor = MockCursor::new(
        &["STREET_NAME", "ZIP", "AUDITED_AT"],
        vec![
            vec![
                Value::Text("Main St".into()),
                Value::Decimal(Decimal::from(1000)),
                Value::Null,
            ],
            vec![Value::Text("Side St".into()), Value::Null, Value::Null],
        ],
    );
    let value = metadata
        .get_value_from_ref_cursor(&mut cursor, UdtKind::Collection)
        .unwrap();

    assert_eq!(
        Vec::<Address>::from_value(value).unwrap(),
        vec![
            Address {
                street: "Main St".into(),
                zip: Some(1000),
            },
            Address {
                street: "Side St".into(),
                zip: None,
            },
        ]
    );
}

#[test]
fn empty_object_cursor_is_null() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Address>().unwrap();
    let mut cursor = MockCursor::new(&["STREET", "ZIP"], vec![]);

    let value = metadata
        .get_value_from_ref_cursor(&mut cursor, UdtKind::Object)
        .unwrap();
    assert_eq!(value, Value::Null);
    assert_eq!(Option::<Address>::from_value(value).unwrap(), None);
}

#[test]
fn fuzzy_and_strict_matching() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "SHOP.ORDER_LINE", attributes = "ORDER_ID, QTY")]
    struct OrderLine {
        orderid: i64,
        qty: i32,
    }

    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "SHOP.ORDER_LINE", attributes = "ORDER_ID, QTY", strict)]
    struct StrictOrderLine {
        orderid: i64,
        qty: i32,
    }

    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<OrderLine>().unwrap();
    assert!(metadata.is_fuzzy());
    assert_eq!(
        metadata.correspondence().attribute_for("orderid"),
        Some("ORDER_ID")
    );

    let err = registry.metadata::<StrictOrderLine>().unwrap_err();
    assert!(matches!(
        err,
        Error::PropertyCorrespondence { ref property, .. } if property == "orderid"
    ));

    // A strict preset turns fuzzy matching off too.
    let registry = MetadataRegistry::new();
    registry.register_preset(OrderLine::OBJECT.name(), Preset::default().strict());
    assert!(matches!(
        registry.metadata::<OrderLine>(),
        Err(Error::PropertyCorrespondence { .. })
    ));
}

#[test]
fn declared_attributes_without_property_render_null() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "APP.TAG", attributes = "ID, LEGACY, LABEL")]
    struct Tag {
        id: u16,
        label: String,
    }

    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Tag>().unwrap();
    let tag = Tag {
        id: 3,
        label: "new".into(),
    };

    let (fragment, binds) = metadata.render(&tag.to_value(), 1).unwrap();
    assert_eq!(fragment.text, "APP.TAG(:1, NULL, :2)");
    // Unsigned host types bind without a remote kind.
    assert_eq!(binds[0].kind(), None);
    assert_eq!(binds[0].value(), &Value::Int32(3));

    let kinds: Vec<_> = metadata
        .definition()
        .attributes()
        .map(|attribute| attribute.kind().clone())
        .collect();
    assert_eq!(
        kinds,
        vec![
            AttributeKind::Scalar(None),
            AttributeKind::Unknown,
            AttributeKind::Scalar(Some(OracleDbType::Varchar2)),
        ]
    );
}

#[test]
fn marker_identity_wins_over_preset() {
    let registry = MetadataRegistry::new();
    registry.register_preset(
        Phone::OBJECT.name(),
        Preset::new(UdtIdentity::parse("CRM.PHONE").unwrap()),
    );

    let metadata = registry.metadata::<Phone>().unwrap();
    assert_eq!(metadata.identity().full_object_name(), "HR.PHONE");
}

#[test]
fn definitions_are_shared_per_remote_object() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "HR.ADDRESS")]
    struct PostalAddress {
        street: String,
        zip: Option<i32>,
    }

    let registry = MetadataRegistry::new();
    let address = registry.metadata::<Address>().unwrap();
    let postal = registry.metadata::<PostalAddress>().unwrap();

    assert!(Arc::ptr_eq(address.definition(), postal.definition()));
    assert_eq!(
        address.definition().to_string(),
        "CREATE OR REPLACE TYPE HR.ADDRESS AS OBJECT (\n  STREET VARCHAR2(4000),\n  ZIP NUMBER(10)\n)"
    );
}

#[test]
fn metadata_does_not_depend_on_build_order() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "APP.TICKET")]
    struct Ticket {
        id: i64,
        name: String,
    }

    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "APP.TICKET")]
    struct TicketView {
        name: String,
        id: i64,
    }

    let alone = MetadataRegistry::new();
    let view_alone = alone.metadata::<TicketView>().unwrap();
    let ticket_alone = MetadataRegistry::new().metadata::<Ticket>().unwrap();

    let registry = MetadataRegistry::new();
    let ticket = registry.metadata::<Ticket>().unwrap();
    let view = registry.metadata::<TicketView>().unwrap();
    assert_eq!(*view, *view_alone);
    assert_eq!(*ticket, *ticket_alone);
    assert_eq!(view.attributes().collect::<Vec<_>>(), ["NAME", "ID"]);
    assert_eq!(view.definition().attribute_names(), ["NAME", "ID"]);
    assert!(!Arc::ptr_eq(ticket.definition(), view.definition()));
    // The stored definition stays the first build's.
    assert!(Arc::ptr_eq(
        &registry.definition("APP.TICKET").unwrap(),
        ticket.definition()
    ));

    let registry = MetadataRegistry::new();
    let view = registry.metadata::<TicketView>().unwrap();
    let ticket = registry.metadata::<Ticket>().unwrap();
    assert_eq!(*view, *view_alone);
    assert_eq!(*ticket, *ticket_alone);

    let value = Value::Object(
        Record::new()
            .with("id", Value::Int64(1))
            .with("name", Value::Text("a".into())),
    );
    let (fragment, _) = ticket.render(&value, 1).unwrap();
    assert_eq!(fragment.text, "APP.TICKET(:1, :2)");
    let binds = view.get_oracle_parameters(&value, 1).unwrap();
    assert_eq!(binds[0].value(), &Value::Text("a".into()));
}

#[test]
fn properties_cannot_share_an_attribute() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "APP.DUP", attributes = "ORDER_ID")]
    struct Dup {
        order_id: i64,
        orderid: i64,
    }

    let registry = MetadataRegistry::new();
    let err = registry.metadata::<Dup>().unwrap_err();
    assert!(matches!(
        err,
        Error::PropertyCorrespondence { ref property, .. } if property == "orderid"
    ));
    assert!(!registry.is_built(Dup::OBJECT.name()));
}

#[test]
fn types_without_attributes_are_rejected() {
    #[derive(Debug, Udt)]
    #[udt(crate = "crate", name = "APP.NOTHING")]
    struct Nothing;

    let registry = MetadataRegistry::new();
    let err = registry.metadata::<Nothing>().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)), "{err:?}");
}

#[test]
fn scalar_outputs_convert_to_host_types() {
    let registry = MetadataRegistry::new();
    let metadata = registry.metadata::<Address>().unwrap();

    let zip: i32 = metadata
        .convert_oracle_parameter_to_base_type(Value::Decimal(Decimal::from(42)))
        .unwrap();
    assert_eq!(zip, 42);
    let missing: Option<i32> = metadata
        .convert_oracle_parameter_to_base_type(Value::Null)
        .unwrap();
    assert_eq!(missing, None);
    assert!(matches!(
        metadata.convert_oracle_parameter_to_base_type::<i32>(Value::Text("x".into())),
        Err(Error::Conversion { .. })
    ));
}
