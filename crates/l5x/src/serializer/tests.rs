// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for the decorated-data codec.

use super::*;
use crate::error::L5xError;
use crate::radix::Radix;
use crate::registry::MAX_NESTING_DEPTH;
use crate::types::{Array, AtomicKind, AtomicValue, MemberDefinition, TypeDefinition};

fn registry() -> TypeRegistry<'static> {
    let registry = TypeRegistry::new();
    registry
        .register(
            TypeDefinition::user("MOTOR")
                .member(MemberDefinition::new("Run", "BOOL"))
                .member(MemberDefinition::new("Speed", "DINT")),
        )
        .expect("MOTOR");
    registry
        .register(
            TypeDefinition::user("LINE")
                .member(MemberDefinition::new("Drive", "MOTOR"))
                .member(MemberDefinition::new("Limits", "INT").with_dimension(3))
                .member(MemberDefinition::new("Label", "STRING")),
        )
        .expect("LINE");
    registry
}

fn parse(xml: &str) -> Element {
    Element::parse(xml).expect("xml")
}

fn atomic(value: &LogixType) -> AtomicValue {
    *value.as_atomic().expect("atomic")
}

#[test]
fn decodes_atomic_literals_in_their_radix() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);

    let value = serializer
        .decode(&parse(r#"<DataValue DataType="SINT" Radix="Binary" Value="2#0000_1010"/>"#))
        .expect("decode");
    assert_eq!(atomic(&value).as_i64(), 10);
    assert_eq!(atomic(&value).radix(), Radix::Binary);

    let flag = serializer
        .decode(&parse(r#"<DataValue DataType="BOOL" Value="1"/>"#))
        .expect("decode");
    assert!(atomic(&flag).as_bool());
}

#[test]
fn bool_literals_omit_radix_unless_configured() {
    let registry = TypeRegistry::new();
    let value = LogixType::Atomic(AtomicValue::from_bool(true));

    let plain = Serializer::new(&registry).encode(&value).expect("encode");
    assert_eq!(plain, parse(r#"<DataValue DataType="BOOL" Value="1"/>"#));

    let config = SerializerConfig::builder().bool_radix_attribute(true).build();
    let tagged = Serializer::with_config(&registry, config)
        .encode(&value)
        .expect("encode");
    assert_eq!(tagged.attribute("Radix"), Some("Decimal"));
}

#[test]
fn radix_errors_are_reported() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);

    let unknown = serializer
        .decode(&parse(r#"<DataValue DataType="DINT" Radix="Base64" Value="1"/>"#))
        .unwrap_err();
    assert!(matches!(unknown, L5xError::RadixUnsupported { .. }));

    let incompatible = serializer
        .decode(&parse(r#"<DataValue DataType="REAL" Radix="Hex" Value="16#0"/>"#))
        .unwrap_err();
    assert!(matches!(incompatible, L5xError::RadixUnsupported { .. }));

    let bad_text = serializer
        .decode(&parse(r#"<DataValue DataType="SINT" Radix="Decimal" Value="300"/>"#))
        .unwrap_err();
    assert!(matches!(bad_text, L5xError::InvalidValue { .. }));
}

#[test]
fn motor_round_trip_keeps_backing_member_hidden() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let node = parse(
        r#"<Structure DataType="MOTOR">
             <DataValueMember Name="Run" DataType="BOOL" Value="1"/>
             <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="1500"/>
           </Structure>"#,
    );

    let value = serializer.decode(&node).expect("decode");
    let motor = value.as_structure().expect("structure");
    assert_eq!(motor.members().count(), 2);
    assert_eq!(motor.hidden_members().count(), 1);
    assert_eq!(atomic(motor.get("Speed").expect("Speed")).as_i64(), 1500);
    assert_eq!(motor.packed_backing("ZZZZZZZZZZMOTOR0"), 1);

    let encoded = serializer.encode(&value).expect("encode");
    let names: Vec<&str> = encoded
        .children()
        .iter()
        .filter_map(|c| c.attribute("Name"))
        .collect();
    assert_eq!(names, ["ZZZZZZZZZZMOTOR0", "Run", "Speed"]);
    assert_eq!(encoded.children()[0].attribute("Value"), Some("1"));

    assert_eq!(serializer.decode(&encoded).expect("decode again"), value);
}

#[test]
fn hidden_members_can_be_left_out() {
    let registry = registry();
    let config = SerializerConfig::builder().emit_hidden_members(false).build();
    let serializer = Serializer::with_config(&registry, config);
    let value = registry.instantiate("MOTOR").expect("MOTOR");
    let encoded = serializer.encode(&value).expect("encode");
    assert_eq!(encoded.children().len(), 2);
}

#[test]
fn absent_bools_are_derived_from_their_backing_byte() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let value = serializer
        .decode(&parse(
            r#"<Structure DataType="MOTOR">
                 <DataValueMember Name="ZZZZZZZZZZMOTOR0" DataType="SINT" Radix="Decimal" Value="1"/>
               </Structure>"#,
        ))
        .expect("decode");
    let motor = value.as_structure().expect("structure");
    assert!(atomic(motor.get("Run").expect("Run")).as_bool());
}

#[test]
fn explicit_bools_win_over_backing_bytes() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let value = serializer
        .decode(&parse(
            r#"<Structure DataType="MOTOR">
                 <DataValueMember Name="Run" DataType="BOOL" Value="0"/>
                 <DataValueMember Name="ZZZZZZZZZZMOTOR0" DataType="SINT" Radix="Decimal" Value="1"/>
               </Structure>"#,
        ))
        .expect("decode");
    let motor = value.as_structure().expect("structure");
    assert!(!atomic(motor.get("Run").expect("Run")).as_bool());
    assert_eq!(motor.packed_backing("ZZZZZZZZZZMOTOR0"), 0);
}

#[test]
fn absent_members_default_and_unknown_children_are_ignored() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let value = serializer
        .decode(&parse(
            r#"<Structure DataType="motor">
                 <DataValueMember Name="SPEED" DataType="DINT" Radix="Hex" Value="16#0000_0010"/>
                 <DataValueMember Name="Torque" DataType="REAL" Radix="Float" Value="1.5"/>
               </Structure>"#,
        ))
        .expect("decode");
    let motor = value.as_structure().expect("structure");
    assert_eq!(motor.name, "MOTOR");
    assert!(!atomic(motor.get("Run").expect("Run")).as_bool());
    let speed = motor.member("Speed").expect("Speed");
    assert_eq!(atomic(&speed.value).as_i64(), 16);
    assert_eq!(speed.radix(), Radix::Hex);
    assert!(motor.member("Torque").is_none());
}

#[test]
fn malformed_members_report_their_path() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let err = serializer
        .decode(&parse(
            r#"<Structure DataType="MOTOR"><DataValueMember Name="Speed" DataType="DINT" Radix="Decimal"/></Structure>"#,
        ))
        .unwrap_err();
    match err {
        L5xError::DecodeMalformed { path, .. } => {
            assert_eq!(path, "Structure[MOTOR]/DataValueMember[Speed]");
        }
        other => panic!("unexpected error {other:?}"),
    }

    let err = serializer
        .decode(&parse(r#"<Structure><DataValueMember Name="Speed"/></Structure>"#))
        .unwrap_err();
    assert!(matches!(err, L5xError::DecodeMalformed { .. }));
}

#[test]
fn declared_member_types_must_match() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let err = serializer
        .decode(&parse(
            r#"<Structure DataType="MOTOR"><DataValueMember Name="Speed" DataType="INT" Radix="Decimal" Value="1"/></Structure>"#,
        ))
        .unwrap_err();
    assert!(matches!(err, L5xError::DecodeMalformed { .. }));
}

#[test]
fn array_members_must_match_their_declaration() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let reject = |xml: &str| match serializer.decode(&parse(xml)) {
        Err(L5xError::DecodeMalformed { path, .. }) => path,
        other => panic!("accepted {xml}: {other:?}"),
    };

    // Array data for the scalar DINT member Speed.
    let path = reject(
        r#"<Structure DataType="MOTOR">
             <ArrayMember Name="Speed" DataType="REAL" Dimensions="2" Radix="Float">
               <Element Index="[0]" Value="1.5"/>
               <Element Index="[1]" Value="2.5"/>
             </ArrayMember>
           </Structure>"#,
    );
    assert_eq!(path, "Structure[MOTOR]/ArrayMember[Speed]");

    // Limits is INT[3].
    reject(
        r#"<Structure DataType="LINE">
             <ArrayMember Name="Limits" DataType="DINT" Dimensions="3" Radix="Decimal">
               <Element Index="[0]" Value="1"/>
               <Element Index="[1]" Value="2"/>
               <Element Index="[2]" Value="3"/>
             </ArrayMember>
           </Structure>"#,
    );
    reject(
        r#"<Structure DataType="LINE">
             <ArrayMember Name="Limits" DataType="INT" Dimensions="2" Radix="Decimal">
               <Element Index="[0]" Value="1"/>
               <Element Index="[1]" Value="2"/>
             </ArrayMember>
           </Structure>"#,
    );
    reject(
        r#"<Structure DataType="LINE">
             <ArrayMember Name="Limits" DataType="INT" Dimensions="1 3" Radix="Decimal">
               <Element Index="[0,0]" Value="1"/>
               <Element Index="[0,1]" Value="2"/>
               <Element Index="[0,2]" Value="3"/>
             </ArrayMember>
           </Structure>"#,
    );
    reject(
        r#"<Structure DataType="LINE">
             <StructureMember Name="Limits" DataType="INT"/>
           </Structure>"#,
    );
    reject(
        r#"<Structure DataType="LINE">
             <DataValueMember Name="Limits" DataType="INT" Radix="Decimal" Value="1"/>
           </Structure>"#,
    );
}

#[test]
fn oversized_arrays_are_rejected_before_allocating() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);
    for dims in ["4294967295 4294967295 4294967295", "2000000000"] {
        let node = Element::new("Array")
            .with_attribute("DataType", "DINT")
            .with_attribute("Dimensions", dims);
        assert!(
            matches!(serializer.decode(&node), Err(L5xError::DecodeMalformed { .. })),
            "{dims}"
        );
        let tag = Element::new("Tag")
            .with_attribute("Name", "Huge")
            .with_attribute("DataType", "DINT")
            .with_attribute("Dimensions", dims);
        assert!(
            matches!(serializer.decode_tag(&tag), Err(L5xError::DecodeMalformed { .. })),
            "{dims}"
        );
    }

    // Within the limit, but strict decoding counts the elements first.
    let sparse = parse(
        r#"<Array DataType="DINT" Dimensions="4000000" Radix="Decimal"><Element Index="[0]" Value="1"/></Array>"#,
    );
    match serializer.decode(&sparse) {
        Err(L5xError::DecodeMalformed { path, reason }) => {
            assert_eq!(path, "Array[DINT]");
            assert_eq!(reason, "expected 4000000 elements, found 1");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn deepest_nesting_round_trips() {
    let registry = TypeRegistry::new();
    registry
        .register(TypeDefinition::user("LEVEL1").member(MemberDefinition::new("Count", "DINT")))
        .expect("LEVEL1");
    for depth in 2..=MAX_NESTING_DEPTH {
        registry
            .register(
                TypeDefinition::user(format!("LEVEL{depth}"))
                    .member(MemberDefinition::new("Inner", format!("LEVEL{}", depth - 1)))
                    .member(MemberDefinition::new("Count", "DINT")),
            )
            .expect("register");
    }
    let top = format!("LEVEL{MAX_NESTING_DEPTH}");
    let serializer = Serializer::new(&registry);

    let value = registry.instantiate(&top).expect("instantiate");
    let encoded = serializer.encode(&value).expect("encode");
    assert_eq!(serializer.decode(&encoded).expect("decode"), value);

    let deeper = TypeDefinition::user("LEVELX").member(MemberDefinition::new("Inner", top.as_str()));
    assert!(matches!(
        registry.register(deeper),
        Err(L5xError::NestingTooDeep { .. })
    ));
    assert!(registry.resolve("LEVELX").expect("resolve").is_undefined());
}

#[test]
fn unresolved_types_decode_to_undefined() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);
    let node = parse(r#"<Structure DataType="Mystery"><DataValueMember Name="X" DataType="DINT" Value="1"/></Structure>"#);
    let value = serializer.decode(&node).expect("decode");
    assert_eq!(value, LogixType::Undefined { name: "Mystery".to_string() });
    assert_eq!(
        serializer.encode(&value).expect("encode"),
        parse(r#"<Structure DataType="Mystery"/>"#)
    );

    // Arrays of an unresolved type keep their shape.
    let value = serializer
        .decode(&parse(r#"<Array DataType="Mystery" Dimensions="2"/>"#))
        .expect("decode");
    let array = value.as_array().expect("array");
    assert_eq!(array.element_type(), "Mystery");
    assert_eq!(array.length(), 2);
    assert!(array.elements().iter().all(LogixType::is_undefined));

    let tag = serializer.encode_tag("Spare", &value).expect("encode tag");
    assert_eq!(tag.attribute("DataType"), Some("Mystery"));
    assert_eq!(tag.attribute("Dimensions"), Some("2"));
    let (_, again) = serializer.decode_tag(&tag).expect("decode tag");
    assert_eq!(again, value);

    let (_, defaults) = serializer
        .decode_tag(&parse(r#"<Tag Name="Spare" DataType="Mystery" Dimensions="3"/>"#))
        .expect("tag");
    assert_eq!(defaults.as_array().map(Array::length), Some(3));
}

#[test]
fn arrays_round_trip() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);
    let node = parse(
        r#"<Array DataType="DINT" Dimensions="3" Radix="Decimal">
             <Element Index="[0]" Value="1"/>
             <Element Index="[1]" Value="-2"/>
             <Element Index="[2]" Value="3"/>
           </Array>"#,
    );
    let value = serializer.decode(&node).expect("decode");
    let array = value.as_array().expect("array");
    assert_eq!(array.length(), 3);
    assert_eq!(array.get(1).map(|v| atomic(v).as_i64()), Some(-2));
    assert_eq!(serializer.encode(&value).expect("encode"), node);
}

#[test]
fn multi_dimensional_arrays_use_row_major_labels() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);
    let mut node = Element::new("Array")
        .with_attribute("DataType", "INT")
        .with_attribute("Dimensions", "2 3")
        .with_attribute("Radix", "Decimal");
    for (i, label) in ["[0,0]", "[0,1]", "[0,2]", "[1,0]", "[1,1]", "[1,2]"].iter().enumerate() {
        node.push(
            Element::new("Element")
                .with_attribute("Index", *label)
                .with_attribute("Value", i.to_string()),
        );
    }
    let value = serializer.decode(&node).expect("decode");
    let array = value.as_array().expect("array");
    assert_eq!(array.dimensions().dims(), [2, 3]);
    assert_eq!(array.get(4).map(|v| atomic(v).as_i64()), Some(4));
    assert_eq!(serializer.encode(&value).expect("encode"), node);
}

#[test]
fn array_indices_must_be_contiguous_when_strict() {
    let registry = TypeRegistry::new();
    let shuffled = parse(
        r#"<Array DataType="INT" Dimensions="3" Radix="Decimal">
             <Element Index="[0]" Value="1"/>
             <Element Index="[2]" Value="3"/>
             <Element Index="[1]" Value="2"/>
           </Array>"#,
    );
    let err = Serializer::new(&registry).decode(&shuffled).unwrap_err();
    match err {
        L5xError::DecodeMalformed { path, .. } => assert_eq!(path, "Array[INT]/Element[2]"),
        other => panic!("unexpected error {other:?}"),
    }

    let gappy = parse(
        r#"<Array DataType="INT" Dimensions="3" Radix="Decimal">
             <Element Index="[0]" Value="1"/>
             <Element Index="[2]" Value="3"/>
           </Array>"#,
    );
    assert!(Serializer::new(&registry).decode(&gappy).is_err());

    let relaxed = SerializerConfig::builder().strict_array_indices(false).build();
    let value = Serializer::with_config(&registry, relaxed)
        .decode(&gappy)
        .expect("relaxed decode");
    let values: Vec<i64> = value
        .as_array()
        .expect("array")
        .elements()
        .iter()
        .map(|v| atomic(v).as_i64())
        .collect();
    assert_eq!(values, [1, 0, 3]);

    let short = parse(
        r#"<Array DataType="INT" Dimensions="3" Radix="Decimal"><Element Index="[0]" Value="1"/></Array>"#,
    );
    assert!(Serializer::new(&registry).decode(&short).is_err());
}

#[test]
fn nested_structures_arrays_and_strings_round_trip() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let node = parse(
        r#"<Structure DataType="LINE">
             <StructureMember Name="Drive" DataType="MOTOR">
               <DataValueMember Name="Run" DataType="BOOL" Value="1"/>
               <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="900"/>
             </StructureMember>
             <ArrayMember Name="Limits" DataType="INT" Dimensions="3" Radix="Hex">
               <Element Index="[0]" Value="16#0001"/>
               <Element Index="[1]" Value="16#0002"/>
               <Element Index="[2]" Value="16#00ff"/>
             </ArrayMember>
             <StructureMember Name="Label" DataType="STRING">
               <DataValueMember Name="LEN" DataType="DINT" Radix="Decimal" Value="6"/>
               <DataValueMember Name="DATA" DataType="STRING" Radix="ASCII"><![CDATA['Pump$'s']]></DataValueMember>
             </StructureMember>
           </Structure>"#,
    );

    let value = serializer.decode(&node).expect("decode");
    let line = value.as_structure().expect("LINE");

    let limits = line.member("Limits").expect("Limits");
    assert_eq!(limits.radix(), Radix::Hex);

    let label = line.get("Label").and_then(LogixType::as_structure).expect("Label");
    let data = label.get("DATA").and_then(LogixType::as_array).expect("DATA");
    let text: Vec<u8> = data
        .elements()
        .iter()
        .take(7)
        .map(|v| atomic(v).bits() as u8)
        .collect();
    assert_eq!(text, b"Pump's\0");

    let encoded = serializer.encode(&value).expect("encode");
    let label_el = encoded
        .children()
        .iter()
        .find(|c| c.attribute("Name") == Some("Label"))
        .expect("Label element");
    let data_el = label_el
        .children_named("DataValueMember")
        .find(|c| c.attribute("Name") == Some("DATA"))
        .expect("DATA");
    assert_eq!(data_el.text(), Some("'Pump$'s'"));

    assert_eq!(serializer.decode(&encoded).expect("decode again"), value);
}

#[test]
fn string_values_decode_from_a_single_literal() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);
    let value = serializer
        .decode(&parse(r#"<DataValue DataType="STRING" Radix="ASCII" Value="'OK$0D'"/>"#))
        .expect("decode");
    let s = value.as_structure().expect("STRING");
    assert_eq!(atomic(s.get("LEN").expect("LEN")).as_i64(), 3);

    let too_long = format!("'{}'", "x".repeat(83));
    let err = serializer
        .decode(&Element::new("DataValue")
            .with_attribute("DataType", "STRING")
            .with_attribute("Value", too_long))
        .unwrap_err();
    assert!(matches!(err, L5xError::DecodeMalformed { .. }));
}

#[test]
fn arrays_of_structures() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let node = parse(
        r#"<Array DataType="MOTOR" Dimensions="2">
             <Element Index="[0]">
               <Structure DataType="MOTOR">
                 <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="10"/>
               </Structure>
             </Element>
             <Element Index="[1]">
               <Structure DataType="MOTOR">
                 <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="20"/>
               </Structure>
             </Element>
           </Array>"#,
    );
    let value = serializer.decode(&node).expect("decode");
    let array = value.as_array().expect("array");
    let speeds: Vec<i64> = array
        .elements()
        .iter()
        .filter_map(|e| e.as_structure()?.get("Speed").map(|v| atomic(v).as_i64()))
        .collect();
    assert_eq!(speeds, [10, 20]);

    let encoded = serializer.encode(&value).expect("encode");
    assert_eq!(encoded.attribute("Radix"), None);
    assert_eq!(serializer.decode(&encoded).expect("decode again"), value);
}

#[test]
fn data_wrapper_and_tags() {
    let registry = registry();
    let serializer = Serializer::new(&registry);
    let tag = parse(
        r#"<Tag Name="M1" TagType="Base" DataType="MOTOR">
             <Data Format="L5K"><![CDATA[[1,1500]]]></Data>
             <Data Format="Decorated">
               <Structure DataType="MOTOR">
                 <DataValueMember Name="Speed" DataType="DINT" Radix="Decimal" Value="1500"/>
               </Structure>
             </Data>
           </Tag>"#,
    );
    let (name, value) = serializer.decode_tag(&tag).expect("tag");
    assert_eq!(name, "M1");
    let speed = value.as_structure().and_then(|s| s.get("Speed")).map(|v| atomic(v).as_i64());
    assert_eq!(speed, Some(1500));

    let data = serializer.encode_data(&value).expect("encode");
    assert_eq!(data.attribute("Format"), Some("Decorated"));
    assert_eq!(serializer.decode_data(&data).expect("decode"), value);

    let encoded_tag = serializer.encode_tag("M1", &value).expect("tag");
    assert_eq!(serializer.decode_tag(&encoded_tag).expect("decode"), (name, value));

    let l5k = parse(r#"<Data Format="L5K"><![CDATA[[0]]]></Data>"#);
    assert!(matches!(
        serializer.decode_data(&l5k),
        Err(L5xError::DecodeMalformed { .. })
    ));
}

#[test]
fn tags_without_decorated_data_get_defaults() {
    let registry = TypeRegistry::new();
    let serializer = Serializer::new(&registry);

    let (_, value) = serializer
        .decode_tag(&parse(r#"<Tag Name="Counts" DataType="DINT" Dimensions="4" Radix="Hex"/>"#))
        .expect("tag");
    let array = value.as_array().expect("array");
    assert_eq!(array.length(), 4);
    assert_eq!(array.radix(), Radix::Hex);

    let (_, timer) = serializer
        .decode_tag(&parse(r#"<Tag Name="T1" DataType="TIMER"/>"#))
        .expect("tag");
    assert_eq!(timer.type_name(), "TIMER");
    assert_eq!(
        atomic(timer.as_structure().and_then(|s| s.get("PRE")).expect("PRE")).kind(),
        AtomicKind::Dint
    );
}
