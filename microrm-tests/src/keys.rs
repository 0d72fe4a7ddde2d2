use crate::{Recorder, reset};
use microrm::{Criteria, Executor, Model};
use std::sync::{Mutex, PoisonError};

static MUTEX: Mutex<()> = Mutex::new(());

#[derive(Model, Debug, Clone, PartialEq)]
#[microrm(pk = "code")]
pub struct Product {
    pub code: Option<i64>,
    pub label: String,
    pub price: f32,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[microrm(pk = "sku")]
pub struct Item {
    pub sku: String,
    pub stock: u32,
}

#[derive(Model, Debug, Clone, PartialEq)]
pub struct Author {
    #[microrm(surrogate)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Model, Debug, Clone, PartialEq)]
pub struct Publisher {
    #[microrm(surrogate)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[microrm(pk = none)]
pub struct Event {
    pub kind: String,
    pub payload: Option<Vec<u8>>,
}

pub fn keys<E: Executor>(executor: &E) {
    let _lock = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    // Cleanup
    reset::<Product, _>(executor);
    reset::<Item, _>(executor);
    reset::<Event, _>(executor);
    reset::<Author, _>(executor);
    reset::<Publisher, _>(executor);

    // Declared integer key, filled in after the insert
    let recorder = Recorder::new(executor);
    let mut product = Product {
        code: None,
        label: "keyboard".into(),
        price: 49.5,
    };
    product.save(&recorder).expect("Failed to save the product");
    assert_eq!(
        recorder.statements(),
        [
            "CREATE TABLE IF NOT EXISTS product (code INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT, price REAL)",
            "INSERT INTO product (label, price) VALUES (?, ?)",
        ]
    );
    let executor = recorder.into_inner();
    let code = product.code.expect("The declared key was not set");
    product.price = 45.0;
    product.save(executor).expect("Failed to update the product");
    let loaded = Product::get_required(executor, &Criteria::new().eq(Product::code, code))
        .expect("Failed to find the product");
    assert_eq!(loaded, product);

    // A set key always means update, even when no row has it yet
    let mut item = Item {
        sku: "A-1".into(),
        stock: 3,
    };
    let result = item
        .write(executor, &[] as &[&str])
        .expect("Failed to save the item");
    assert!(result.success);
    assert_eq!(result.rows_affected, 0);
    assert!(Item::all(executor).expect("Failed to query items").is_empty());
    executor.execute(
        "INSERT INTO item (sku, stock) VALUES ('A-1', 0)",
        &[],
    );
    item.save(executor).expect("Failed to save the item again");
    let loaded = Item::get_required(executor, &Criteria::new().eq(Item::sku, "A-1"))
        .expect("Failed to find the item");
    assert_eq!(loaded.stock, 3);

    // No key at all: plain inserts, nothing to track
    for kind in ["start", "start"] {
        let mut event = Event {
            kind: kind.into(),
            payload: None,
        };
        let result = event
            .write(executor, &[] as &[&str])
            .expect("Failed to save the event");
        assert!(result.success);
        assert_eq!(result.rows_affected, 1);
    }
    let events = Event::filter(executor, &Criteria::new().eq(Event::kind, "start"))
        .expect("Failed to query events");
    assert_eq!(events.len(), 2);
    let result = Event::get(executor, &Criteria::new().eq(Event::kind, "start"));
    assert!(result.is_err_and(|e| e.is_multiple_results()));

    // First rows of two tables share the same rowid
    let mut author = Author {
        id: None,
        name: "Ursula".into(),
    };
    author.save(executor).expect("Failed to save the author");
    let mut publisher = Publisher {
        id: None,
        name: "Ace".into(),
    };
    publisher.save(executor).expect("Failed to save the publisher");
    assert_eq!(author.id, Some(1));
    assert_eq!(publisher.id, Some(1));
    let loaded = Publisher::get_required(executor, &Criteria::new().eq(Publisher::name, "Ace"))
        .expect("Failed to find the publisher");
    assert_eq!(loaded, publisher);
}
