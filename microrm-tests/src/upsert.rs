use crate::{Recorder, reset};
use microrm::{Criteria, Executor, Model};
use std::sync::{Mutex, PoisonError};

static MUTEX: Mutex<()> = Mutex::new(());

#[derive(Model, Debug, Clone, PartialEq)]
#[microrm(table = "subscriptions", pk = none, unique = "email")]
pub struct Subscription {
    pub email: String,
    pub topic: String,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[microrm(unique("provider", "handle"))]
pub struct Account {
    #[microrm(surrogate)]
    pub id: Option<i64>,
    pub provider: String,
    pub handle: String,
    pub score: f64,
}

pub fn upsert<E: Executor>(executor: &E) {
    let _lock = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    // Cleanup
    reset::<Subscription, _>(executor);
    reset::<Account, _>(executor);

    // Inserting the same unique value twice keeps one row and is not an error
    let mut subscription = Subscription {
        email: "alice@example.com".into(),
        topic: "rust".into(),
    };
    let recorder = Recorder::new(executor);
    let result = subscription
        .write(&recorder, &[] as &[&str])
        .expect("Failed to save the subscription");
    assert!(result.success);
    assert_eq!(result.rows_affected, 1);
    assert_eq!(
        recorder.statements().last().map(String::as_str),
        Some(
            "INSERT INTO subscriptions (email, topic) VALUES (?, ?) ON CONFLICT (email) DO NOTHING"
        )
    );
    subscription.topic = "sqlite".into();
    let result = subscription
        .write(executor, &[] as &[&str])
        .expect("Failed to save the subscription again");
    assert!(result.success);
    assert_eq!(result.rows_affected, 0);
    let stored = Subscription::all(executor).expect("Failed to query subscriptions");
    assert_eq!(
        stored,
        [Subscription {
            email: "alice@example.com".into(),
            topic: "rust".into(),
        }]
    );

    // The instance is not refreshed, even on a real insert
    let mut account = Account {
        id: None,
        provider: "github".into(),
        handle: "alice".into(),
        score: 1.5,
    };
    account.save(executor).expect("Failed to save the account");
    assert_eq!(account.id, None);
    account.score = 9.0;
    account.save(executor).expect("Failed to save the account again");
    assert_eq!(account.id, None);
    let mut stored = Account::get_required(
        executor,
        &Criteria::new()
            .eq(Account::provider, "github")
            .eq(Account::handle, "alice"),
    )
    .expect("Failed to find the account");
    assert!(stored.id.is_some(), "Loaded rows carry their key");
    assert_eq!(stored.score, 1.5);

    // Once the key is known, saving updates
    stored.score = 9.0;
    stored.save(executor).expect("Failed to update the account");
    let accounts = Account::all(executor).expect("Failed to query accounts");
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].score, 9.0);

    // Another handle on the same provider is a distinct row
    Account {
        id: None,
        provider: "github".into(),
        handle: "bob".into(),
        score: 0.0,
    }
    .save(executor)
    .expect("Failed to save the second account");
    assert_eq!(Account::all(executor).expect("Failed to query accounts").len(), 2);
}
