use crate::{Recorder, reset};
use microrm::{Criteria, Error, Executor, Model, TextEnum, Value};
use std::sync::{Mutex, PoisonError};

static MUTEX: Mutex<()> = Mutex::new(());

#[derive(TextEnum, Debug, Clone, Copy, PartialEq)]
pub enum Role {
    Admin,
    Member,
    Guest,
}

#[derive(Model, Debug, Clone, PartialEq)]
#[table_name("users")]
pub struct UserProfile {
    #[microrm(surrogate)]
    pub id: Option<i64>,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub follower_count: u32,
}

fn profile(username: &str, email: Option<&str>, role: Role) -> UserProfile {
    UserProfile {
        id: None,
        username: username.into(),
        email: email.map(Into::into),
        role,
        follower_count: 0,
    }
}

pub fn users<E: Executor>(executor: &E) {
    let _lock = MUTEX.lock().unwrap_or_else(PoisonError::into_inner);

    // Cleanup
    reset::<UserProfile, _>(executor);

    // Insert sets the surrogate key
    let mut alice = profile("alice", Some("alice@example.com"), Role::Admin);
    alice.save(executor).expect("Failed to save alice");
    let alice_id = alice.id.expect("The key of alice was not set");
    let mut bob = profile("bob", None, Role::Member);
    bob.save(executor).expect("Failed to save bob");
    let bob_id = bob.id.expect("The key of bob was not set");
    assert!(bob_id > alice_id);

    // Round trip
    let loaded = UserProfile::get(executor, &Criteria::new().eq(UserProfile::id, alice_id))
        .expect("Failed to query alice")
        .expect("Failed to find alice");
    assert_eq!(loaded, alice);

    // A set key means update, the key is left as is
    alice.email = None;
    alice.follower_count = 12;
    let recorder = Recorder::new(executor);
    let result = alice.write(&recorder, &[] as &[&str]).expect("Failed to update alice");
    assert!(result.success);
    assert_eq!(result.rows_affected, 1);
    assert_eq!(alice.id, Some(alice_id));
    assert_eq!(
        recorder.statements(),
        ["UPDATE users SET username = ?, email = ?, role = ?, follower_count = ? WHERE id = ?"]
    );
    let loaded = UserProfile::get_required(executor, &Criteria::new().eq(UserProfile::id, alice_id))
        .expect("Failed to find alice after the update");
    assert_eq!(loaded.email, None);
    assert_eq!(loaded.follower_count, 12);
    assert_eq!(UserProfile::all(executor).expect("Failed to query all").len(), 2);

    // Restricted update
    bob.role = Role::Admin;
    bob.follower_count = 99;
    bob.save_fields(executor, &[UserProfile::follower_count])
        .expect("Failed to update bob");
    let loaded = UserProfile::get_required(executor, &Criteria::new().eq("username", "bob"))
        .expect("Failed to find bob");
    assert_eq!(loaded.follower_count, 99);
    assert_eq!(loaded.role, Role::Member);
    let result = bob.save_fields(executor, &["nickname"]);
    assert!(matches!(result, Err(Error::UnknownField { .. })));

    // Stored as the variant name
    let rows = executor.fetch_all("SELECT role FROM users WHERE id = ?", &[Value::from(bob_id)]);
    assert_eq!(rows.len(), 1);
    assert_eq!(&*rows[0], [Value::Varchar(Some("Member".into()))]);

    // Not found
    let criteria = Criteria::new().eq(UserProfile::username, "nobody");
    let result = UserProfile::get(executor, &criteria).expect("Failed to query nobody");
    assert!(result.is_none());
    let error = UserProfile::get_required(executor, &criteria).unwrap_err();
    assert!(error.is_not_found(), "Expected not found, got {:?}", error);
    assert!(matches!(
        UserProfile::lookup(executor, &criteria, true),
        Err(Error::NotFound { .. })
    ));

    // Multiple results, with two and with three matches
    let criteria = Criteria::new().eq(UserProfile::role, Role::Guest);
    for name in ["carol", "dave", "erin"] {
        profile(name, None, Role::Guest)
            .save(executor)
            .expect("Failed to save a guest");
        let count = UserProfile::filter(executor, &criteria)
            .expect("Failed to filter guests")
            .len();
        let result = UserProfile::get(executor, &criteria);
        if count == 1 {
            assert!(matches!(result, Ok(Some(..))));
        } else {
            let error = result.unwrap_err();
            assert!(error.is_multiple_results(), "Expected multiple results, got {:?}", error);
        }
    }
    let guests = UserProfile::filter(executor, &criteria).expect("Failed to filter guests");
    assert_eq!(
        guests.iter().map(|v| v.username.as_str()).collect::<Vec<_>>(),
        ["carol", "dave", "erin"]
    );

    // Null criteria
    let without_email = UserProfile::filter(
        executor,
        &Criteria::new().eq(UserProfile::email, Option::<String>::None),
    )
    .expect("Failed to filter by null email");
    assert_eq!(without_email.len(), 5);

    // Unknown field
    let result = UserProfile::filter(executor, &Criteria::new().eq("age", 30));
    assert!(matches!(result, Err(Error::UnknownField { .. })));
}
