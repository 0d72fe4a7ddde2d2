use crate::reset;
use microrm::{Criteria, Executor, Model, TextEnum, Value};
use std::sync::{Mutex, PoisonError};

static MUTEX: Mutex<()> = Mutex::new(());

#[derive(TextEnum, Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    Light,
    #[microrm(value = "dark-mode")]
    Dark,
}

#[derive(Model, Debug, Clone, PartialEq)]
pub struct SimpleFields {
    #[microrm(surrogate)]
    id: Option<i64>,
    alpha: Option<u8>,
    bravo: Option<i32>,
    charlie: Option<i16>,
    delta: Option<u32>,
    echo: Option<i64>,
    foxtrot: Option<f32>,
    golf: Option<f64>,
    hotel: Option<String>,
    india: Box<Option<bool>>,
    juliet: Option<Vec<u8>>,
    kilo: Option<Shade>,
    lima: i8,
}

pub fn simple<E: Executor>(executor: &E) {
    let _lock = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    // Setup
    reset::<SimpleFields, _>(executor);

    // Simple 1
    let mut entity = SimpleFields {
        id: None,
        alpha: None,
        bravo: 777.into(),
        charlie: (-2).into(),
        delta: 4_000_000_000.into(),
        echo: i64::MIN.into(),
        foxtrot: 1.5.into(),
        golf: None,
        hotel: Some("Hello world!".into()),
        india: Box::new(Some(true)),
        juliet: Some(vec![0, 1, 2, 255]),
        kilo: Some(Shade::Dark),
        lima: -128,
    };
    entity.save(executor).expect("Failed to save simple 1");
    let id = entity.id.expect("The key of simple 1 was not set");
    let loaded = SimpleFields::get(executor, &Criteria::new().eq(SimpleFields::id, id))
        .expect("Failed to query simple 1")
        .expect("Failed to find simple 1");
    assert_eq!(loaded, entity);
    assert_eq!(loaded.delta, Some(4_000_000_000));
    assert_eq!(loaded.echo, Some(i64::MIN));
    assert_eq!(*loaded.india, Some(true));
    assert_eq!(loaded.kilo, Some(Shade::Dark));

    // The enum is stored through its text
    let rows = executor.fetch_all(
        "SELECT kilo, india FROM simplefields WHERE id = ?",
        &[Value::from(id)],
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Varchar(Some("dark-mode".into())));
    assert_eq!(rows[0][1], Value::Int64(Some(1)));

    // Simple 2
    let mut entity = SimpleFields {
        id: None,
        alpha: 255.into(),
        bravo: None,
        charlie: None,
        delta: None,
        echo: None,
        foxtrot: None,
        golf: Some(-0.25),
        hotel: None,
        india: Box::new(None),
        juliet: Some(Vec::new()),
        kilo: Some(Shade::Light),
        lima: 127,
    };
    entity.save(executor).expect("Failed to save simple 2");
    let loaded = SimpleFields::get_required(
        executor,
        &Criteria::new()
            .eq(SimpleFields::lima, 127i8)
            .eq(SimpleFields::hotel, Option::<String>::None),
    )
    .expect("Failed to find simple 2");
    assert_eq!(loaded.id, entity.id);
    assert_eq!(loaded.alpha, Some(255));
    assert_eq!(loaded.bravo, None);
    assert_eq!(loaded.golf, Some(-0.25));
    assert_eq!(*loaded.india, None);
    assert_eq!(loaded.juliet, Some(Vec::new()));
    assert_eq!(loaded.kilo, Some(Shade::Light));

    let all = SimpleFields::all(executor).expect("Failed to query all simple fields");
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter_map(|v| v.id).collect::<Vec<_>>().len(), 2);

    // A value the model cannot decode
    executor.execute(
        "UPDATE simplefields SET kilo = 'purple' WHERE id = ?",
        &[Value::from(id)],
    );
    let result = SimpleFields::get(executor, &Criteria::new().eq(SimpleFields::id, id));
    assert!(
        matches!(result, Err(microrm::Error::Conversion(..))),
        "Expected a conversion error, got {:?}",
        result
    );
}
