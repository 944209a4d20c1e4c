use std::{collections::HashMap, sync::Arc};

use prefsync::{
    register_persisted_key, Codec, JsonCodec, OptionalStructured, PersistedObservable, Primitive,
    RawValue, Store, Structured,
};
use prefsync_store::{MemoryStore, SqliteStore};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SimpleStruct {
    name: String,
    age: i32,
}

fn simple(name: &str, age: i32) -> SimpleStruct {
    SimpleStruct {
        name: name.to_owned(),
        age,
    }
}

register_persisted_key!(const INT_SAMPLE: Primitive<i64> = "test-int");
register_persisted_key!(const STRING_SAMPLE: Primitive<String> = "test-string");
register_persisted_key!(const INT_ARRAY_SAMPLE: Structured<Vec<i32>> = "test-int-array");
register_persisted_key!(const STRUCT_ARRAY_SAMPLE: Structured<Vec<SimpleStruct>> = "test-struct-array");
register_persisted_key!(const DICTIONARY_SAMPLE: Structured<HashMap<i32, SimpleStruct>> = "test-dictionary");
register_persisted_key!(const NULLABLE_STRING_SAMPLE: OptionalStructured<String> = "test-nullable-string");
register_persisted_key!(const NULLABLE_STRUCT_SAMPLE: OptionalStructured<SimpleStruct> = "test-nullable-struct");

/// A settings object with one binding per encoding shape.
struct SimpleExample {
    int_sample: PersistedObservable<Primitive<i64>>,
    string_sample: PersistedObservable<Primitive<String>>,
    int_array_sample: PersistedObservable<Structured<Vec<i32>>>,
    struct_array_sample: PersistedObservable<Structured<Vec<SimpleStruct>>>,
    dictionary_sample: PersistedObservable<Structured<HashMap<i32, SimpleStruct>>>,
    nullable_string_sample: PersistedObservable<OptionalStructured<String>>,
    nullable_struct_sample: PersistedObservable<OptionalStructured<SimpleStruct>>,
}

impl SimpleExample {
    fn new(store: Arc<dyn Store>) -> Self {
        Self {
            int_sample: PersistedObservable::new(store.clone(), INT_SAMPLE, 42),
            string_sample: PersistedObservable::new(
                store.clone(),
                STRING_SAMPLE,
                "I'm a String".to_owned(),
            ),
            int_array_sample: PersistedObservable::new(
                store.clone(),
                INT_ARRAY_SAMPLE,
                vec![1, 2, 3, 4, 5],
            ),
            struct_array_sample: PersistedObservable::new(
                store.clone(),
                STRUCT_ARRAY_SAMPLE,
                vec![simple("one", 1), simple("two", 2)],
            ),
            dictionary_sample: PersistedObservable::new(
                store.clone(),
                DICTIONARY_SAMPLE,
                HashMap::from([(1, simple("one", 1)), (2, simple("two", 2))]),
            ),
            nullable_string_sample: PersistedObservable::new(
                store.clone(),
                NULLABLE_STRING_SAMPLE,
                None,
            ),
            nullable_struct_sample: PersistedObservable::new(store, NULLABLE_STRUCT_SAMPLE, None),
        }
    }
}

fn encoded<T: Serialize>(value: &T) -> RawValue {
    RawValue::Bytes(JsonCodec::encode(value).unwrap())
}

fn stored<T: DeserializeOwned>(store: &dyn Store, key: &str) -> T {
    let bytes = store
        .get(key)
        .unwrap()
        .and_then(RawValue::into_bytes)
        .unwrap_or_else(|| panic!("no bytes stored under {key}"));
    JsonCodec::decode(&bytes).unwrap()
}

fn make_changes(properties: &SimpleExample) {
    properties.int_sample.set(84);
    properties
        .string_sample
        .set("Am I still a String?".to_owned());
    properties
        .int_array_sample
        .update(|values| values.extend([100, 99, 98, 97, 96, 95]));
    properties
        .struct_array_sample
        .update(|values| values.push(simple("Hello", 8)));
    properties.dictionary_sample.update(|map| {
        map.insert(11, simple("Eleven", 11));
    });
}

#[test]
fn test_bindings_from_clean_store() {
    let store = Arc::new(MemoryStore::new());
    let properties = SimpleExample::new(store.clone());

    assert_eq!(properties.int_sample.get(), 42);
    assert_eq!(properties.string_sample.get(), "I'm a String");
    assert_eq!(properties.int_array_sample.get(), vec![1, 2, 3, 4, 5]);
    assert_eq!(
        properties.struct_array_sample.get(),
        vec![simple("one", 1), simple("two", 2)]
    );
    assert_eq!(
        properties.dictionary_sample.get(),
        HashMap::from([(1, simple("one", 1)), (2, simple("two", 2))])
    );
    assert_eq!(properties.nullable_string_sample.get(), None);
    assert_eq!(properties.nullable_struct_sample.get(), None);

    // Nothing is written until the first assignment.
    assert!(store.is_empty());

    make_changes(&properties);
    properties
        .nullable_string_sample
        .set(Some("It's not nil no more".to_owned()));
    properties
        .nullable_struct_sample
        .set(Some(simple("Bill", 43)));

    assert_eq!(properties.int_sample.get(), 84);
    assert_eq!(
        properties.int_array_sample.get(),
        vec![1, 2, 3, 4, 5, 100, 99, 98, 97, 96, 95]
    );

    assert_eq!(store.get("test-int").unwrap(), Some(RawValue::Int(84)));
    assert_eq!(
        store.get("test-string").unwrap(),
        Some(RawValue::String("Am I still a String?".to_owned()))
    );
    assert_eq!(
        stored::<Vec<i32>>(&*store, "test-int-array"),
        vec![1, 2, 3, 4, 5, 100, 99, 98, 97, 96, 95]
    );
    assert_eq!(
        stored::<Vec<SimpleStruct>>(&*store, "test-struct-array"),
        vec![simple("one", 1), simple("two", 2), simple("Hello", 8)]
    );
    assert_eq!(
        stored::<HashMap<i32, SimpleStruct>>(&*store, "test-dictionary"),
        HashMap::from([
            (1, simple("one", 1)),
            (2, simple("two", 2)),
            (11, simple("Eleven", 11)),
        ])
    );
    assert_eq!(
        stored::<String>(&*store, "test-nullable-string"),
        "It's not nil no more"
    );
    assert_eq!(
        stored::<SimpleStruct>(&*store, "test-nullable-struct"),
        simple("Bill", 43)
    );

    properties.nullable_string_sample.set(None);
    properties.nullable_struct_sample.set(None);

    assert_eq!(store.get("test-nullable-string").unwrap(), None);
    assert_eq!(store.get("test-nullable-struct").unwrap(), None);
}

#[test]
fn test_bindings_from_previous_values() {
    let store = Arc::new(MemoryStore::new());
    store.set("test-int", RawValue::Int(99)).unwrap();
    store
        .set("test-string", RawValue::from("Still a String"))
        .unwrap();
    store
        .set("test-int-array", encoded(&vec![6, 7, 8, 9]))
        .unwrap();
    store
        .set(
            "test-struct-array",
            encoded(&vec![simple("three", 3), simple("four", 4)]),
        )
        .unwrap();
    store
        .set(
            "test-dictionary",
            encoded(&HashMap::from([
                (3, simple("three", 3)),
                (4, simple("four", 4)),
            ])),
        )
        .unwrap();
    store
        .set("test-nullable-string", encoded(&"Not a nil String"))
        .unwrap();
    store
        .set("test-nullable-struct", encoded(&simple("Jill", 34)))
        .unwrap();

    let properties = SimpleExample::new(store.clone());

    assert_eq!(properties.int_sample.get(), 99);
    assert_eq!(properties.string_sample.get(), "Still a String");
    assert_eq!(properties.int_array_sample.get(), vec![6, 7, 8, 9]);
    assert_eq!(
        properties.struct_array_sample.get(),
        vec![simple("three", 3), simple("four", 4)]
    );
    assert_eq!(
        properties.dictionary_sample.get(),
        HashMap::from([(3, simple("three", 3)), (4, simple("four", 4))])
    );
    assert_eq!(
        properties.nullable_string_sample.get(),
        Some("Not a nil String".to_owned())
    );
    assert_eq!(
        properties.nullable_struct_sample.get(),
        Some(simple("Jill", 34))
    );

    make_changes(&properties);
    properties.nullable_string_sample.set(None);
    properties.nullable_struct_sample.set(None);

    assert_eq!(
        properties.int_array_sample.get(),
        vec![6, 7, 8, 9, 100, 99, 98, 97, 96, 95]
    );
    assert_eq!(
        stored::<Vec<SimpleStruct>>(&*store, "test-struct-array"),
        vec![simple("three", 3), simple("four", 4), simple("Hello", 8)]
    );
    assert_eq!(
        stored::<HashMap<i32, SimpleStruct>>(&*store, "test-dictionary"),
        HashMap::from([
            (3, simple("three", 3)),
            (4, simple("four", 4)),
            (11, simple("Eleven", 11)),
        ])
    );
    assert_eq!(store.get("test-int").unwrap(), Some(RawValue::Int(84)));
    assert!(!store.contains("test-nullable-string").unwrap());
    assert!(!store.contains("test-nullable-struct").unwrap());
}

#[test]
fn test_structured_record_scenario() {
    register_persisted_key!(const K1: Structured<SimpleStruct> = "k1");

    let store = Arc::new(MemoryStore::new());
    store.set("k1", encoded(&simple("three", 3))).unwrap();

    let value = PersistedObservable::new(store.clone(), K1, simple("one", 1));
    assert_eq!(value.get(), simple("three", 3));

    value.set(simple("four", 4));
    assert_eq!(stored::<SimpleStruct>(&*store, "k1"), simple("four", 4));
}

#[test]
fn test_malformed_entries_fall_back_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    store.set("test-int", RawValue::from("ninety-nine")).unwrap();
    store
        .set("test-int-array", RawValue::Bytes(b"\xff\xfe".to_vec()))
        .unwrap();
    store
        .set("test-struct-array", encoded(&vec![1, 2, 3]))
        .unwrap();
    store
        .set("test-dictionary", RawValue::from("{}"))
        .unwrap();

    let properties = SimpleExample::new(store.clone());

    assert_eq!(properties.int_sample.get(), 42);
    assert_eq!(properties.int_array_sample.get(), vec![1, 2, 3, 4, 5]);
    assert_eq!(
        properties.struct_array_sample.get(),
        vec![simple("one", 1), simple("two", 2)]
    );
    assert_eq!(
        properties.dictionary_sample.get(),
        HashMap::from([(1, simple("one", 1)), (2, simple("two", 2))])
    );

    // The malformed entries stay until something is written.
    assert_eq!(
        store.get("test-int").unwrap(),
        Some(RawValue::from("ninety-nine"))
    );
}

#[test]
fn test_instances_sharing_a_key_are_last_write_wins() {
    let store = Arc::new(MemoryStore::new());
    let first = PersistedObservable::new(store.clone(), INT_SAMPLE, 1);
    let second = PersistedObservable::new(store.clone(), INT_SAMPLE, 2);

    first.set(10);
    second.set(20);

    assert_eq!(first.get(), 10);
    assert_eq!(second.get(), 20);
    assert_eq!(store.get("test-int").unwrap(), Some(RawValue::Int(20)));
}

#[test]
fn test_values_survive_sqlite_reopen() {
    let path = std::env::temp_dir().join(format!("prefsync-{}.sqlite", uuid::Uuid::new_v4()));

    {
        let store = Arc::new(SqliteStore::open(&path).unwrap());
        let properties = SimpleExample::new(store);
        make_changes(&properties);
        properties
            .nullable_struct_sample
            .set(Some(simple("Bill", 43)));
    }

    let store = Arc::new(SqliteStore::open(&path).unwrap());
    let properties = SimpleExample::new(store);

    assert_eq!(properties.int_sample.get(), 84);
    assert_eq!(properties.string_sample.get(), "Am I still a String?");
    assert_eq!(
        properties.int_array_sample.get(),
        vec![1, 2, 3, 4, 5, 100, 99, 98, 97, 96, 95]
    );
    assert_eq!(
        properties.dictionary_sample.get().get(&11),
        Some(&simple("Eleven", 11))
    );
    assert_eq!(properties.nullable_string_sample.get(), None);
    assert_eq!(
        properties.nullable_struct_sample.get(),
        Some(simple("Bill", 43))
    );

    drop(properties);
    let _ = std::fs::remove_file(&path);
}
