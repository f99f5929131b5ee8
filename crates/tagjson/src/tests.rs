use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use tagval::Error;
use tagval::Field;
use tagval::List;
use tagval::Map;
use tagval::Message;
use tagval::MessageKind;
use tagval::Number;
use tagval::Primitive;
use tagval::ProtocolErrorKind;
use tagval::Result;
use tagval::Scalar;
use tagval::Set;
use tagval::Struct;
use tagval::TypeTag;
use tagval::Value;

use crate::*;

fn kind_of<T: std::fmt::Debug>(r: Result<T>) -> ProtocolErrorKind {
    match r {
        Err(Error::Protocol(e)) => e.kind,
        other => panic!("expected protocol error, got {:?}", other),
    }
}

fn assert_roundtrip(value: &Value) -> Result<()> {
    let json = serialize(value)?;
    let back = deserialize(&json, value.type_tag())?;
    assert_eq!(&back, value, "json was {}", json);

    let text = to_string(value)?;
    assert_eq!(&from_str(&text, value.type_tag())?, value, "text was {}", text);
    Ok(())
}

// ============================================================================
//  1. TAG TABLE
// ============================================================================

#[test]
fn test_tag_table_bijection() -> Result<()> {
    let tags = [
        TypeTag::Bool,
        TypeTag::I08,
        TypeTag::I16,
        TypeTag::I32,
        TypeTag::I64,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::List,
        TypeTag::Map,
        TypeTag::Set,
        TypeTag::Struct,
    ];
    for t in tags {
        assert_eq!(type_of_string(type_string(t)?)?, t);
    }
    assert_eq!(type_string(TypeTag::UTF16)?, "str");
    assert_eq!(type_string(TypeTag::Struct)?, "rec");
    Ok(())
}

#[test]
fn test_unknown_tags() {
    assert_eq!(kind_of(type_of_string("u32")), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(type_string(TypeTag::Stop)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(type_string(TypeTag::Void)), ProtocolErrorKind::InvalidData);
}

// ============================================================================
//  2. SERIALIZE SCENARIOS
// ============================================================================

#[test]
fn test_bool_serializes_as_digit() -> Result<()> {
    assert_eq!(serialize(&Value::bool(true))?, json!(1));
    assert_eq!(serialize(&Value::bool(false))?, json!(0));
    assert_eq!(serialize(&Value::unset(TypeTag::Bool)?)?, json!(null));
    Ok(())
}

#[test]
fn test_list_scenario() -> Result<()> {
    let items = vec![Value::i32(1), Value::i32(2), Value::i32(3)];
    let list = Value::List(List::new(TypeTag::I32, items));
    assert_eq!(serialize(&list)?, json!(["i32", 3, 1, 2, 3]));
    Ok(())
}

#[test]
fn test_map_scenario() -> Result<()> {
    let map = Value::Map(Map::new(
        TypeTag::String,
        TypeTag::I32,
        vec![(Value::string("a"), Value::i32(1))],
    ));
    let json = serialize(&map)?;
    assert_eq!(json, json!(["str", "i32", 1, {"a": 1}]));
    assert_eq!(deserialize(&json, TypeTag::Map)?, map);
    Ok(())
}

#[test]
fn test_struct_scenario() -> Result<()> {
    let s = Value::Struct(Struct::new().with_field(1, Field::new(TypeTag::I32, Value::i32(7))));
    assert_eq!(serialize(&s)?, json!({"1": {"i32": 7}}));
    Ok(())
}

#[test]
fn test_set_and_nested_shapes() -> Result<()> {
    let set = Value::Set(Set::new(TypeTag::String, vec![Value::string("x"), Value::string("y")]));
    assert_eq!(serialize(&set)?, json!(["str", 2, "x", "y"]));

    let nested = Value::List(List::new(
        TypeTag::List,
        vec![Value::List(List::new(TypeTag::Bool, vec![Value::bool(true)]))],
    ));
    assert_eq!(serialize(&nested)?, json!(["lst", 1, ["tf", 1, 1]]));
    Ok(())
}

#[test]
fn test_unset_scalars_serialize_as_null() -> Result<()> {
    for t in [TypeTag::Byte, TypeTag::I64, TypeTag::Double, TypeTag::String] {
        assert_eq!(serialize(&Value::unset(t)?)?, json!(null));
    }
    Ok(())
}

#[test]
fn test_non_string_map_keys_are_stringified() -> Result<()> {
    let map = Value::Map(Map::new(
        TypeTag::I32,
        TypeTag::String,
        vec![(Value::i32(10), Value::string("ten")), (Value::i32(-2), Value::string("minus two"))],
    ));
    let json = serialize(&map)?;
    assert_eq!(json, json!(["i32", "str", 2, {"10": "ten", "-2": "minus two"}]));

    let back = deserialize(&json, TypeTag::Map)?;
    assert_eq!(back, map);
    assert_eq!(back.as_map()?.entries[0].0.as_number()?, Number::Int(10));
    Ok(())
}

#[test]
fn test_duplicate_stringified_keys_rejected() {
    let map = Value::Map(Map::new(
        TypeTag::I32,
        TypeTag::I32,
        vec![(Value::i32(1), Value::i32(1)), (Value::i32(1), Value::i32(2))],
    ));
    assert_eq!(kind_of(serialize(&map)), ProtocolErrorKind::InvalidData);
}

// ============================================================================
//  3. SERIALIZE FAILURES
// ============================================================================

#[test]
fn test_nan_rejected() {
    assert_eq!(kind_of(serialize(&Value::double(f64::NAN))), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(serialize(&Value::double(f64::INFINITY))), ProtocolErrorKind::InvalidData);
}

#[test]
fn test_wrong_payload_rejected() -> Result<()> {
    let cases = [
        (TypeTag::Bool, Primitive::Number(Number::Int(1))),
        (TypeTag::I32, Primitive::String("1".into())),
        (TypeTag::String, Primitive::Bool(true)),
        (TypeTag::I16, Primitive::Number(Number::Double(1.5))),
        (TypeTag::Byte, Primitive::Number(Number::Int(300))),
    ];
    for (ty, payload) in cases {
        let v = Value::Scalar(Scalar::new(ty, Some(payload))?);
        assert_eq!(kind_of(serialize(&v)), ProtocolErrorKind::InvalidData);
    }
    Ok(())
}

#[test]
fn test_strict_sets() {
    let dup = Value::Set(Set::new(TypeTag::I32, vec![Value::i32(1), Value::i32(1)]));
    assert!(serialize(&dup).is_ok());

    let strict = JsonCodec::new(CodecOptions::new().strict_sets(true));
    assert_eq!(kind_of(strict.serialize(&dup)), ProtocolErrorKind::InvalidData);
    assert_eq!(
        kind_of(strict.deserialize(&json!(["i32", 2, 1, 1]), TypeTag::Set)),
        ProtocolErrorKind::InvalidData
    );
}

#[test]
fn test_max_depth() {
    let deep = Value::List(List::new(
        TypeTag::List,
        vec![Value::List(List::new(
            TypeTag::List,
            vec![Value::List(List::new(TypeTag::I32, vec![]))],
        ))],
    ));
    let codec = JsonCodec::new(CodecOptions::new().max_depth(1));
    assert_eq!(kind_of(codec.serialize(&deep)), ProtocolErrorKind::SizeLimit);

    let json = json!(["lst", 1, ["lst", 1, ["i32", 0]]]);
    assert_eq!(kind_of(codec.deserialize(&json, TypeTag::List)), ProtocolErrorKind::SizeLimit);
    assert!(deserialize(&json, TypeTag::List).is_ok());
}

// ============================================================================
//  4. DESERIALIZE FAILURES
// ============================================================================

#[test]
fn test_list_size_mismatch() {
    let r = deserialize(&json!(["i32", 3, 1, 2]), TypeTag::List);
    assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData);
}

#[test]
fn test_list_malformed() {
    let bad = [
        (json!(["i32"]), TypeTag::List),
        (json!({"a": 1}), TypeTag::Set),
        (json!(["nope", 0]), TypeTag::List),
        (json!(["i32", "1", 1]), TypeTag::List),
    ];
    for (json, ty) in bad {
        assert_eq!(kind_of(deserialize(&json, ty)), ProtocolErrorKind::InvalidData, "{}", json);
    }
    let negative = deserialize(&json!(["i32", -1]), TypeTag::List);
    assert_eq!(kind_of(negative), ProtocolErrorKind::NegativeSize);
}

#[test]
fn test_list_items_use_declared_tag() {
    let r = deserialize(&json!(["str", 2, "a", 1]), TypeTag::List);
    assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData);
}

#[test]
fn test_map_malformed() {
    let bad = [
        json!(["str", "i32", 1]),
        json!(["str", "i32", 1, {"a": 1}, 5]),
        json!(["str", "i32", 2, {"a": 1}]),
        json!(["str", "i32", 1, ["a", 1]]),
        json!(["i32", "i32", 1, {"a": 1}]),
    ];
    for json in bad {
        let r = deserialize(&json, TypeTag::Map);
        assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData, "{}", json);
    }
}

#[test]
fn test_map_keys_unique_after_decoding() {
    let json = json!(["i32", "str", 2, {"1": "a", "1.0": "b"}]);
    let r = deserialize(&json, TypeTag::Map);
    match r {
        Err(Error::Protocol(e)) => {
            assert_eq!(e.kind, ProtocolErrorKind::InvalidData);
            assert!(e.message.is_some_and(|m| m.starts_with("duplicate map key")));
        }
        other => panic!("expected duplicate map key, got {:?}", other),
    }
}

#[test]
fn test_struct_malformed() {
    let bad = [
        json!(null),
        json!([1, 2]),
        json!({"x": {"i32": 1}}),
        json!({"1": 7}),
        json!({"1": {}}),
        json!({"1": {"i32": 1, "str": "a"}}),
        json!({"1": {"i32": "a"}}),
    ];
    for json in bad {
        let r = deserialize(&json, TypeTag::Struct);
        assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData, "{}", json);
    }
}

#[test]
fn test_struct_field_ids_are_canonical() {
    let bad = [
        json!({"1": {"i32": 1}, "+1": {"str": "x"}, "01": {"i64": 3}}),
        json!({"+1": {"i32": 1}}),
        json!({"01": {"i32": 1}}),
        json!({"-0": {"i32": 1}}),
        json!({" 1": {"i32": 1}}),
    ];
    for json in bad {
        let r = deserialize(&json, TypeTag::Struct);
        assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData, "{}", json);
    }
}

#[test]
fn test_struct_negative_field_ids() -> Result<()> {
    let s = deserialize(&json!({"-1": {"i32": 1}, "0": {"tf": 1}}), TypeTag::Struct)?;
    let s = s.as_struct()?;
    assert_eq!(s.len(), 2);
    assert!(s.get_field(-1, TypeTag::I32).is_some());
    Ok(())
}

#[test]
fn test_scalars_never_coerce() {
    assert_eq!(kind_of(deserialize(&json!("1"), TypeTag::I32)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!(1), TypeTag::String)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!("true"), TypeTag::Bool)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!(2), TypeTag::Bool)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!(1.5), TypeTag::I64)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!(128), TypeTag::Byte)), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(deserialize(&json!([]), TypeTag::Double)), ProtocolErrorKind::InvalidData);
}

#[test]
fn test_scalar_decoding() -> Result<()> {
    assert_eq!(deserialize(&json!(null), TypeTag::I32)?, Value::unset(TypeTag::I32)?);
    assert_eq!(deserialize(&json!(true), TypeTag::Bool)?, Value::bool(true));
    assert_eq!(deserialize(&json!(0), TypeTag::Bool)?, Value::bool(false));
    assert_eq!(deserialize(&json!(-128), TypeTag::Byte)?, Value::byte(-128));
    assert_eq!(deserialize(&json!(3), TypeTag::Double)?, Value::double(3.0));
    assert_eq!(deserialize(&json!(2.0), TypeTag::I16)?, Value::i16(2));
    Ok(())
}

// ============================================================================
//  5. MESSAGES
// ============================================================================

#[test]
fn test_message_encoding() -> Result<()> {
    let args = Struct::new().with_field(1, Field::new(TypeTag::String, Value::string("hi")));
    let msg = Message::call("ping", 42, args);
    let json = encode_message(&msg, &CodecOptions::default())?;
    assert_eq!(json, json!([1, "ping", 1, 42, {"1": {"str": "hi"}}]));
    assert_eq!(decode_message(&json, &CodecOptions::default())?, msg);
    Ok(())
}

#[test]
fn test_message_bad_version() {
    let r = decode_message(&json!([2, "ping", 1, 42, {}]), &CodecOptions::default());
    assert_eq!(kind_of(r), ProtocolErrorKind::BadVersion);

    let r = message_from_str(r#"[1.5,"ping",1,42,{}]"#);
    assert_eq!(kind_of(r), ProtocolErrorKind::BadVersion);
}

#[test]
fn test_message_version_compares_numerically() -> Result<()> {
    let msg = message_from_str(r#"[1.0,"ping",1,42,{}]"#)?;
    assert_eq!(msg, Message::call("ping", 42, Struct::new()));
    Ok(())
}

#[test]
fn test_message_illegal_format() {
    let r = decode_message(&json!([1, "ping", 1, 42]), &CodecOptions::default());
    match r {
        Err(Error::Protocol(e)) => {
            assert_eq!(e.kind, ProtocolErrorKind::InvalidData);
            assert_eq!(e.message.as_deref(), Some("illegal data format"));
        }
        other => panic!("expected illegal data format, got {:?}", other),
    }
}

#[test]
fn test_message_bad_slots() {
    let opts = CodecOptions::default();
    let bad = [
        json!([1, 7, 1, 42, {}]),
        json!([1, "ping", 9, 42, {}]),
        json!([1, "ping", 1, "42", {}]),
        json!([1, "ping", 1, 4_294_967_296_i64, {}]),
        json!([1, "ping", 1, 42, []]),
    ];
    for json in bad {
        let r = decode_message(&json, &opts);
        assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData, "{}", json);
    }
}

#[test]
fn test_every_message_kind_roundtrips() -> Result<()> {
    let kinds = [
        MessageKind::Call,
        MessageKind::Reply,
        MessageKind::Exception,
        MessageKind::Oneway,
    ];
    for kind in kinds {
        let msg = Message::new("m", kind, -3, Struct::new());
        assert_eq!(message_from_str(&message_to_string(&msg)?)?, msg);
    }
    Ok(())
}

#[test]
fn test_decode_seqid() -> Result<()> {
    let garbled = json!([1, "ping", 2, 99, {"1": {"i32": "garbage"}}]);
    assert_eq!(decode_seqid(&garbled)?, 99);
    let r = decode_seqid(&json!([3, "ping", 2, 99, {}]));
    assert_eq!(kind_of(r), ProtocolErrorKind::BadVersion);
    Ok(())
}

#[test]
fn test_invalid_json_text() {
    let r = from_str("[\"i32\", 1,", TypeTag::List);
    assert_eq!(kind_of(r), ProtocolErrorKind::InvalidData);
    assert_eq!(kind_of(message_from_str("not json")), ProtocolErrorKind::InvalidData);
}

#[test]
fn test_struct_text_helpers() -> Result<()> {
    let codec = JsonCodec::default();
    let s = Struct::new()
        .with_field(2, Field::new(TypeTag::Double, Value::double(0.25)))
        .with_field(1, Field::new(TypeTag::Bool, Value::bool(false)));
    let text = codec.struct_to_string(&s)?;
    assert_eq!(text, r#"{"1":{"tf":0},"2":{"dbl":0.25}}"#);
    assert_eq!(codec.struct_from_str(&text)?, s);
    Ok(())
}

// ============================================================================
//  6. ROUND TRIPS
// ============================================================================

#[test]
fn test_roundtrip_fixed_shapes() -> Result<()> {
    let inner = Struct::new()
        .with_field(1, Value::i64(i64::MIN).into_field())
        .with_field(2, Value::unset(TypeTag::String)?.into_field());

    let values = [
        Value::byte(i8::MAX),
        Value::i16(i16::MIN),
        Value::i64(i64::MAX),
        Value::double(-0.5),
        Value::string("Hello World 🚀"),
        Value::Set(Set::new(TypeTag::Double, vec![Value::double(1.0), Value::double(2.5)])),
        Value::Map(Map::new(
            TypeTag::Struct,
            TypeTag::List,
            vec![(
                Value::Struct(inner.clone()),
                Value::List(List::new(
                    TypeTag::Bool,
                    vec![Value::bool(true), Value::unset(TypeTag::Bool)?],
                )),
            )],
        )),
        Value::Map(Map::new(TypeTag::Bool, TypeTag::Double, vec![
            (Value::bool(true), Value::double(1.0)),
            (Value::bool(false), Value::double(0.0)),
        ])),
        Value::Struct(Struct::new().with_field(5, Value::Struct(inner).into_field())),
    ];

    for v in &values {
        assert_roundtrip(v)?;
    }
    Ok(())
}

const SCALAR_TAGS: [TypeTag; 7] = [
    TypeTag::Bool,
    TypeTag::Byte,
    TypeTag::I16,
    TypeTag::I32,
    TypeTag::I64,
    TypeTag::Double,
    TypeTag::String,
];

fn random_tag(rng: &mut StdRng, depth: usize) -> TypeTag {
    if depth >= 3 || rng.gen_bool(0.5) {
        SCALAR_TAGS[rng.gen_range(0..SCALAR_TAGS.len())]
    } else {
        [TypeTag::List, TypeTag::Set, TypeTag::Map, TypeTag::Struct][rng.gen_range(0..4)]
    }
}

fn random_scalar(rng: &mut StdRng, ty: TypeTag, allow_unset: bool) -> Value {
    if allow_unset && rng.gen_bool(0.1) {
        return Value::unset(ty).expect("scalar tag");
    }
    match ty {
        TypeTag::Bool => Value::bool(rng.gen_bool(0.5)),
        TypeTag::Byte => Value::byte(rng.gen_range(i8::MIN..=i8::MAX)),
        TypeTag::I16 => Value::i16(rng.gen_range(i16::MIN..=i16::MAX)),
        TypeTag::I32 => Value::i32(rng.gen_range(i32::MIN..=i32::MAX)),
        TypeTag::I64 => Value::i64(rng.gen_range(i64::MIN..=i64::MAX)),
        TypeTag::Double => Value::double(rng.gen_range(-4096i32..4096) as f64 / 8.0),
        _ => Value::string(format!("s{}", rng.gen_range(0..1_000_000u32))),
    }
}

fn random_value(rng: &mut StdRng, ty: TypeTag, depth: usize) -> Value {
    let len = rng.gen_range(0..4);
    match ty {
        TypeTag::List => {
            let item = random_tag(rng, depth + 1);
            let items = (0..len).map(|_| random_value(rng, item, depth + 1)).collect();
            Value::List(List::new(item, items))
        }
        TypeTag::Set => {
            let item = random_tag(rng, depth + 1);
            let items = (0..len).map(|_| random_value(rng, item, depth + 1)).collect();
            Value::Set(Set::new(item, items))
        }
        TypeTag::Map => {
            // Keys stay unique once stringified.
            let value_type = random_tag(rng, depth + 1);
            let (key_type, keys): (TypeTag, Vec<Value>) = if rng.gen_bool(0.5) {
                (TypeTag::String, (0..len).map(|i| Value::string(format!("k{}", i))).collect())
            } else {
                (TypeTag::I32, (0..len).map(|i| Value::i32(i * 7 - 5)).collect())
            };
            let entries = keys
                .into_iter()
                .map(|k| (k, random_value(rng, value_type, depth + 1)))
                .collect();
            Value::Map(Map::new(key_type, value_type, entries))
        }
        TypeTag::Struct => {
            let mut s = Struct::new();
            for _ in 0..len {
                let id = rng.gen_range(1..20i16);
                let field_type = random_tag(rng, depth + 1);
                s.insert(id, random_value(rng, field_type, depth + 1).into_field());
            }
            Value::Struct(s)
        }
        scalar => random_scalar(rng, scalar, true),
    }
}

#[test]
fn test_roundtrip_random_trees() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x7a6a_5011);
    for _ in 0..500 {
        let ty = random_tag(&mut rng, 0);
        let value = random_value(&mut rng, ty, 0);
        assert_roundtrip(&value)?;
    }
    Ok(())
}
